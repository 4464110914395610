//! Integration tests for the grid controller.
//!
//! Timer-dependent tests run on a paused clock, so quiet periods elapse as
//! soon as every task is idle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use shopdesk_lib::api::Paginated;
use shopdesk_lib::grid::{
    Column, ColumnWidth, FilterClause, FilterSpec, GridConfig, GridController, GridData,
    GridParams, RowActions, SortDirection, SortSpec,
};
use shopdesk_lib::prefs::{self, MemoryBackend, PreferenceStore};

type Emitted = Arc<Mutex<Vec<GridParams>>>;

fn product_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("brand", "Brand"),
        Column::number("price", "Price"),
        Column::boolean("isActive", "Active"),
    ]
}

async fn grid_with(config: GridConfig, store: PreferenceStore) -> (GridController, Emitted) {
    let emitted: Emitted = Arc::default();
    let sink = Arc::clone(&emitted);
    let grid = GridController::initialize(config, product_columns(), store, move |params| {
        if let Ok(mut guard) = sink.lock() {
            guard.push(params);
        }
    })
    .await;
    (grid, emitted)
}

async fn products_grid(store: PreferenceStore) -> (GridController, Emitted) {
    grid_with(GridConfig::new("products"), store).await
}

fn emitted(emitted: &Emitted) -> Vec<GridParams> {
    emitted.lock().unwrap().clone()
}

/// Let the quiet period run out and the emitting task finish.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(350)).await;
    tokio::task::yield_now().await;
}

// =============================================================================
// Initialization
// =============================================================================

mod initialization {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_defaults_without_stored_preferences() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        let view = grid.view_state();
        assert_eq!(view.page, 0);
        assert_eq!(view.page_size, 10);
        assert!(view.sort.is_empty());
        assert!(view.filters.is_empty());
        assert_eq!(view.quick_filter, None);
        assert!(view.column_widths.is_empty());
        assert!(view.column_visibility.is_empty());

        settle().await;
        assert!(emitted(&emitted_params).is_empty());
    }

    #[tokio::test]
    async fn test_stored_preferences_are_restored() {
        let store = PreferenceStore::in_memory();
        store.set(&prefs::grid_page_size_key("products"), &50u32).await;
        store
            .set(&prefs::grid_widths_key("products"), &json!({"name": 240}))
            .await;
        store
            .set(&prefs::grid_visibility_key("products"), &json!({"brand": false}))
            .await;

        let (grid, _) = products_grid(store).await;
        let view = grid.view_state();
        assert_eq!(view.page_size, 50);
        assert_eq!(view.column_widths.get("name"), Some(&240));
        assert!(!view.is_visible("brand"));
        assert!(view.is_visible("price"));
    }

    #[tokio::test]
    async fn test_malformed_preferences_fall_back_to_defaults() {
        let store = PreferenceStore::in_memory();
        store.set(&prefs::grid_page_size_key("products"), "huge").await;
        store.set(&prefs::grid_widths_key("products"), &json!([1, 2, 3])).await;
        store.set(&prefs::grid_visibility_key("products"), &17).await;

        let (grid, _) = products_grid(store).await;
        let view = grid.view_state();
        assert_eq!(view.page_size, 10);
        assert!(view.column_widths.is_empty());
        assert!(view.column_visibility.is_empty());
    }

    #[tokio::test]
    async fn test_stored_page_size_outside_options_is_ignored() {
        let store = PreferenceStore::in_memory();
        store.set(&prefs::grid_page_size_key("products"), &7u32).await;

        let (grid, _) = products_grid(store.clone()).await;
        assert_eq!(grid.view_state().page_size, 10);

        store.set(&prefs::grid_page_size_key("products"), &0u32).await;
        let (grid, _) = products_grid(store).await;
        assert_eq!(grid.view_state().page_size, 10);
    }

    #[tokio::test]
    async fn test_row_actions_append_actions_column() {
        let config = GridConfig::new("products").with_row_actions(RowActions::all());
        let (grid, _) = grid_with(config, PreferenceStore::in_memory()).await;

        let columns = grid.columns();
        let actions = columns.last().unwrap();
        assert_eq!(actions.field, "actions");
        assert_eq!(actions.width, Some(100));
        assert!(!actions.sortable);
        assert!(!actions.filterable);
    }
}

// =============================================================================
// Debounced emission
// =============================================================================

mod emission {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_final_state_once() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_sort_change(SortSpec::desc("price"));
        grid.on_filter_change(FilterSpec::none().with(FilterClause::new("brand", "contains", "acme")));
        grid.on_quick_filter_change("shoe");
        assert!(grid.has_pending_change());

        settle().await;

        let params = emitted(&emitted_params);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0], grid.params());
        assert_eq!(params[0].sort, SortSpec::desc("price"));
        assert_eq!(params[0].quick_filter.as_deref(), Some("shoe"));
        assert!(!grid.has_pending_change());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_changes_emit_final_state() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        let tasks: Vec<_> = (0..8)
            .map(|worker| {
                let grid = grid.clone();
                tokio::spawn(async move {
                    for n in 0..50 {
                        grid.on_quick_filter_change(format!("{worker}-{n}"));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        let params = emitted(&emitted_params);
        assert_eq!(params.last(), Some(&grid.params()));
        grid.dispose();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_storm_emits_once() {
        let store = PreferenceStore::in_memory();
        let (grid, emitted_params) = products_grid(store.clone()).await;

        grid.on_column_resize("name", 240).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        grid.on_column_resize("brand", 180).await;
        settle().await;

        let stored: BTreeMap<String, u32> = store
            .get(&prefs::grid_widths_key("products"))
            .await
            .unwrap();
        assert_eq!(
            stored,
            BTreeMap::from([("brand".to_string(), 180), ("name".to_string(), 240)])
        );

        let params = emitted(&emitted_params);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].page, 0);
        assert_eq!(params[0].page_size, 10);
        assert!(params[0].sort.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_emits_first_page() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_page_change(4, 10).await;
        settle().await;
        grid.on_filter_change(FilterSpec::none().with(FilterClause::equals("isActive", true)));
        settle().await;

        let pages: Vec<u32> = emitted(&emitted_params).iter().map(|p| p.page).collect();
        assert_eq!(pages, [4, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_change_restarts_quiet_period() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_sort_change(SortSpec::asc("name"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        grid.on_sort_change(SortSpec::desc("name"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(emitted(&emitted_params).is_empty());

        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        let params = emitted(&emitted_params);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].sort, SortSpec::desc("name"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_quick_filter_change("a");
        settle().await;
        grid.on_quick_filter_change("");
        settle().await;

        let params = emitted(&emitted_params);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].quick_filter.as_deref(), Some("a"));
        assert_eq!(params[1].quick_filter, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_quiet_period() {
        let config = GridConfig::new("orders").with_quiet_period(Duration::from_millis(50));
        let (grid, emitted_params) = grid_with(config, PreferenceStore::in_memory()).await;

        grid.on_sort_change(SortSpec::desc("price"));
        tokio::time::sleep(Duration::from_millis(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(emitted(&emitted_params).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_drops_pending_change() {
        let (grid, emitted_params) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_sort_change(SortSpec::asc("price"));
        grid.dispose();
        settle().await;
        grid.on_sort_change(SortSpec::desc("price"));
        settle().await;

        assert!(emitted(&emitted_params).is_empty());
    }
}

// =============================================================================
// Interactions
// =============================================================================

mod interactions {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_page_size_is_persisted_and_restored() {
        let store = PreferenceStore::in_memory();
        let (grid, emitted_params) = products_grid(store.clone()).await;

        grid.on_page_change(0, 25).await;
        assert_eq!(
            store.get::<u32>(&prefs::grid_page_size_key("products")).await,
            Some(25)
        );
        settle().await;
        assert_eq!(emitted(&emitted_params)[0].page_size, 25);

        grid.dispose();
        let (fresh, _) = products_grid(store).await;
        assert_eq!(fresh.view_state().page_size, 25);
        assert_eq!(fresh.view_state().page, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disallowed_page_size_is_ignored() {
        let store = PreferenceStore::in_memory();
        let (grid, emitted_params) = products_grid(store.clone()).await;

        grid.on_page_change(2, 7).await;
        settle().await;

        assert_eq!(grid.view_state().page_size, 10);
        assert_eq!(grid.view_state().page, 0);
        assert!(emitted(&emitted_params).is_empty());
        assert_eq!(store.get::<u32>(&prefs::grid_page_size_key("products")).await, None);
    }

    #[tokio::test]
    async fn test_filter_and_quick_filter_reset_page() {
        let (grid, _) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_page_change(3, 10).await;
        assert_eq!(grid.view_state().page, 3);
        grid.on_filter_change(FilterSpec::none().with(FilterClause::equals("isActive", true)));
        assert_eq!(grid.view_state().page, 0);

        grid.on_page_change(2, 10).await;
        grid.on_quick_filter_change("boots");
        assert_eq!(grid.view_state().page, 0);

        grid.on_page_change(4, 10).await;
        grid.on_sort_change(SortSpec::asc("name"));
        assert_eq!(grid.view_state().page, 4);
    }

    #[tokio::test]
    async fn test_resize_merges_with_stored_widths() {
        let store = PreferenceStore::in_memory();
        let (first, _) = products_grid(store.clone()).await;
        let (second, _) = products_grid(store.clone()).await;

        first.on_column_resize("name", 200).await;
        second.on_column_resize("price", 120).await;

        let stored: BTreeMap<String, u32> = store
            .get(&prefs::grid_widths_key("products"))
            .await
            .unwrap();
        assert_eq!(
            stored,
            BTreeMap::from([("name".to_string(), 200), ("price".to_string(), 120)])
        );

        // Each instance only knows its own resize in memory.
        assert_eq!(second.view_state().column_widths.get("name"), None);

        let (third, _) = products_grid(store).await;
        let layout = third.layout();
        assert_eq!(layout[0].width, ColumnWidth::Fixed(200));
        assert_eq!(layout[1].width, ColumnWidth::Flex(1.0));
        assert_eq!(layout[2].width, ColumnWidth::Fixed(120));
    }

    #[tokio::test]
    async fn test_zero_width_is_rejected() {
        let store = PreferenceStore::in_memory();
        let (grid, _) = products_grid(store.clone()).await;

        grid.on_column_resize("name", 0).await;

        assert!(grid.view_state().column_widths.is_empty());
        assert!(store.keys_with_prefix("gridWidths_").await.is_empty());
    }

    #[tokio::test]
    async fn test_visibility_is_persisted() {
        let store = PreferenceStore::in_memory();
        let (grid, _) = products_grid(store.clone()).await;

        grid.set_column_visible("brand", false).await;

        let fields: Vec<String> = grid.layout().into_iter().map(|l| l.column.field).collect();
        assert_eq!(fields, ["name", "price", "isActive"]);

        let stored: BTreeMap<String, bool> = store
            .get(&prefs::grid_visibility_key("products"))
            .await
            .unwrap();
        assert_eq!(stored, BTreeMap::from([("brand".to_string(), false)]));

        grid.set_column_visible("brand", true).await;
        assert_eq!(grid.layout().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failures_do_not_block_interaction() {
        let store = PreferenceStore::new(MemoryBackend::with_quota(0));
        let (grid, emitted_params) = products_grid(store.clone()).await;

        grid.on_page_change(1, 50).await;
        grid.on_column_resize("name", 180).await;
        settle().await;

        assert_eq!(grid.view_state().page_size, 50);
        assert_eq!(grid.view_state().column_widths.get("name"), Some(&180));
        assert_eq!(emitted(&emitted_params).len(), 1);
        assert_eq!(store.get::<u32>(&prefs::grid_page_size_key("products")).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_and_filter_respect_column_flags() {
        let columns = vec![
            Column::new("bannerImages", "Images").sortable(false).filterable(false),
            Column::number("imageCount", "Total Images"),
            Column::date("createdAt", "Created At"),
        ];
        let config = GridConfig::new("banners").with_row_actions(RowActions::all());
        let grid = GridController::initialize(config, columns, PreferenceStore::in_memory(), |_| {})
            .await;

        assert!(grid.can_sort("createdAt"));
        assert!(!grid.can_sort("actions"));
        assert!(!grid.can_filter("bannerImages"));
        assert!(!grid.can_filter("unknownField"));

        grid.on_sort_change(SortSpec::asc("actions"));
        grid.on_filter_change(FilterSpec::none().with(FilterClause::equals("bannerImages", "x")));
        let query = grid.params().to_list_query();
        assert_eq!(query.sort_by, None);
        assert!(query.filters.is_empty());

        grid.on_sort_change(SortSpec::asc("bannerImages").then("createdAt", SortDirection::Desc));
        grid.on_filter_change(
            FilterSpec::none()
                .with(FilterClause::equals("missing", 1))
                .with(FilterClause::new("imageCount", ">", 2)),
        );
        let params = grid.params();
        assert_eq!(params.sort, SortSpec::desc("createdAt"));
        assert_eq!(params.filters.clauses(), [FilterClause::new("imageCount", ">", 2)]);
        grid.dispose();
    }
}

// =============================================================================
// Data & rendering
// =============================================================================

mod rendering {
    use super::*;

    #[tokio::test]
    async fn test_products_page_renders() {
        let config = GridConfig::new("products").with_row_actions(RowActions {
            edit: true,
            delete: true,
            ..RowActions::none()
        });
        let (grid, _) = grid_with(config, PreferenceStore::in_memory()).await;

        let page: Paginated<serde_json::Value> = serde_json::from_value(json!({
            "docs": [
                {"_id": "p1", "name": "Runner", "brand": {"name": "Acme"}, "price": 49.0, "isActive": true},
                {"id": 2, "name": "Hiker", "brand": null, "price": 89.5, "isActive": false}
            ],
            "totalCount": 41,
            "currentPage": 1,
            "totalPages": 5
        }))
        .unwrap();
        grid.set_data(GridData::from(page));

        assert_eq!(grid.total_count(), 41);
        assert_eq!(grid.page_count(), 5);
        assert_eq!(grid.rows().len(), 2);

        let rendered = grid.render();
        assert_eq!(rendered.headers, ["Name", "Brand", "Price", "Active", "Actions"]);
        assert_eq!(rendered.widths.last(), Some(&ColumnWidth::Fixed(100)));
        assert_eq!(rendered.rows[0].id.as_deref(), Some("p1"));
        assert_eq!(rendered.rows[0].cells, ["Runner", "Acme", "49", "Yes", "edit | delete"]);
        assert_eq!(rendered.rows[1].id.as_deref(), Some("2"));
        assert_eq!(rendered.rows[1].cells, ["Hiker", "", "89.5", "No", "edit | delete"]);
        assert_eq!(rendered.total_count, 41);
    }

    #[tokio::test]
    async fn test_params_translate_to_list_query() {
        let (grid, _) = products_grid(PreferenceStore::in_memory()).await;

        grid.on_page_change(2, 25).await;
        grid.on_sort_change(SortSpec::desc("price"));
        let query = grid.params().to_list_query();

        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert_eq!(query.sort_by.as_deref(), Some("price"));
        assert!(query.filters.is_empty());
        assert_eq!(query.search, None);
    }
}
