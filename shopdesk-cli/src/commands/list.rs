//! `shopdesk list`: one page of a resource through a grid controller.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use shopdesk_lib::api::ApiClient;
use shopdesk_lib::grid::{
    FilterClause, FilterSpec, GridConfig, GridController, GridData, SortDirection, SortSpec,
};
use shopdesk_lib::prefs::PreferenceStore;
use tokio::sync::mpsc;

use crate::cli::ListArgs;
use crate::columns;
use crate::table::print_grid;

pub async fn run_list(args: ListArgs, store: PreferenceStore) -> Result<()> {
    let mut builder = ApiClient::builder()
        .base_url(args.api.api_url.clone())
        .timeout(Duration::from_secs(args.api.timeout));
    if let Some(token) = &args.api.token {
        builder = builder.token(token.clone());
    }
    let client = builder.build()?;

    let grid_id = args
        .grid_id
        .clone()
        .unwrap_or_else(|| args.resource.name().to_string());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let grid = GridController::initialize(
        GridConfig::new(grid_id),
        columns::for_resource(args.resource),
        store,
        move |params| {
            let _ = tx.send(params);
        },
    )
    .await;

    // Filters and search reset the page, so the page goes last.
    if let Some(sort) = &args.sort {
        let sort = parse_sort(sort)?;
        for entry in sort.entries() {
            if !grid.can_sort(&entry.field) {
                bail!("cannot sort {} by `{}`", args.resource, entry.field);
            }
        }
        grid.on_sort_change(sort);
    }
    if !args.filters.is_empty() {
        let clauses = args
            .filters
            .iter()
            .map(|f| parse_filter(f))
            .collect::<Result<Vec<_>>>()?;
        if let Some(clause) = clauses.iter().find(|c| !grid.can_filter(&c.field)) {
            bail!("cannot filter {} by `{}`", args.resource, clause.field);
        }
        grid.on_filter_change(FilterSpec::from(clauses));
    }
    if let Some(search) = &args.search {
        grid.on_quick_filter_change(search.clone());
    }
    if args.page.is_some() || args.page_size.is_some() {
        let view = grid.view_state();
        let page = args.page.map_or(view.page, |p| p.saturating_sub(1));
        let page_size = args.page_size.unwrap_or(view.page_size);
        if !grid.config().allows(page_size) {
            bail!(
                "page size {page_size} is not one of {:?}",
                grid.config().page_size_options
            );
        }
        grid.on_page_change(page, page_size).await;
    }

    let params = if grid.has_pending_change() {
        rx.recv().await.context("grid stopped before emitting")?
    } else {
        grid.params()
    };

    let query = params.to_list_query();
    log::info!(
        "listing {} page {} ({} per page)",
        args.resource,
        query.page,
        query.limit
    );
    let page = match client.list::<serde_json::Value>(args.resource, &query).await {
        Ok(page) => page,
        Err(e) if e.is_unauthorized() => {
            bail!("failed to list {}: {e} (check --token or SHOPDESK_TOKEN)", args.resource)
        }
        Err(e) if e.is_not_found() => {
            bail!("failed to list {}: {e} (check --api-url or SHOPDESK_API_URL)", args.resource)
        }
        Err(e) => return Err(e).with_context(|| format!("failed to list {}", args.resource)),
    };

    grid.set_data(GridData::from(page));
    print_grid(&grid.render());
    grid.dispose();
    Ok(())
}

/// `field` or `field:asc|desc`.
fn parse_sort(raw: &str) -> Result<SortSpec> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, "asc")) => (field, SortDirection::Asc),
        Some((field, "desc")) => (field, SortDirection::Desc),
        Some((_, other)) => bail!("unknown sort direction `{other}`, expected asc or desc"),
        None => (raw, SortDirection::Asc),
    };
    if field.is_empty() {
        bail!("sort field is empty");
    }
    Ok(SortSpec::none().then(field, direction))
}

/// `field:operator:value`. The value is read as JSON when it parses, else as text.
fn parse_filter(raw: &str) -> Result<FilterClause> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("filter `{raw}` is not field:operator:value");
    };
    if field.is_empty() || operator.is_empty() {
        bail!("filter `{raw}` is missing a field or operator");
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(FilterClause::new(field, operator, value))
}
