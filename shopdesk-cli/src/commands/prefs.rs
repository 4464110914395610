//! `shopdesk prefs`: grid preference maintenance.

use std::collections::BTreeMap;

use anyhow::Result;
use shopdesk_lib::grid::{GridConfig, GridController};
use shopdesk_lib::prefs::{self, PreferenceStore};

use crate::cli::PrefsCommand;

pub async fn run_prefs(command: PrefsCommand, store: PreferenceStore) -> Result<()> {
    match command {
        PrefsCommand::List { prefix } => {
            for key in store.try_keys_with_prefix(&prefix).await? {
                println!("{key}");
            }
        }
        PrefsCommand::Show { grid_id } => {
            for line in describe(&store, &grid_id).await? {
                println!("{line}");
            }
        }
        PrefsCommand::Resize {
            grid_id,
            field,
            width,
        } => {
            if width == 0 {
                anyhow::bail!("width must be greater than zero");
            }
            let grid = headless_grid(&grid_id, store).await;
            grid.on_column_resize(&field, width).await;
            println!("{grid_id}: {field} = {width}px");
        }
        PrefsCommand::Hide { grid_id, field } => {
            headless_grid(&grid_id, store).await.set_column_visible(&field, false).await;
            println!("{grid_id}: {field} hidden");
        }
        PrefsCommand::Unhide { grid_id, field } => {
            headless_grid(&grid_id, store).await.set_column_visible(&field, true).await;
            println!("{grid_id}: {field} visible");
        }
        PrefsCommand::Reset { grid_id } => {
            for key in prefs::grid_keys(&grid_id) {
                store.try_remove(&key).await?;
            }
            println!("{grid_id}: preferences cleared");
        }
    }
    Ok(())
}

/// A grid with no columns or listener, used only to apply preference
/// changes the way an interactive grid would.
async fn headless_grid(grid_id: &str, store: PreferenceStore) -> GridController {
    let grid = GridController::initialize(GridConfig::new(grid_id), Vec::new(), store, |_| {}).await;
    grid.dispose();
    grid
}

/// A grid's stored preferences, one line each.
async fn describe(store: &PreferenceStore, grid_id: &str) -> Result<Vec<String>> {
    let page_size: Option<u32> = store.try_get(&prefs::grid_page_size_key(grid_id)).await?;
    let widths: BTreeMap<String, u32> = store
        .try_get(&prefs::grid_widths_key(grid_id))
        .await?
        .unwrap_or_default();
    let visibility: BTreeMap<String, bool> = store
        .try_get(&prefs::grid_visibility_key(grid_id))
        .await?
        .unwrap_or_default();

    let mut lines = vec![format!("grid: {grid_id}")];
    lines.push(match page_size {
        Some(size) => format!("page size: {size}"),
        None => "page size: default".to_string(),
    });
    for (field, width) in &widths {
        lines.push(format!("width  {field}: {width}px"));
    }
    for (field, visible) in &visibility {
        lines.push(format!("{}  {field}", if *visible { "shown " } else { "hidden" }));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_lib::prefs::SqliteBackend;

    async fn sqlite_store() -> PreferenceStore {
        PreferenceStore::new(SqliteBackend::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_show_missing_grid() {
        let store = sqlite_store().await;
        let lines = describe(&store, "products").await.unwrap();
        assert_eq!(lines, ["grid: products", "page size: default"]);
    }

    #[tokio::test]
    async fn test_show_reports_malformed_preferences() {
        let store = sqlite_store().await;
        store.set(&prefs::grid_page_size_key("products"), &"ten").await;
        assert!(describe(&store, "products").await.is_err());
    }

    #[tokio::test]
    async fn test_resize_and_hide_are_stored() {
        let store = sqlite_store().await;
        let resize = PrefsCommand::Resize {
            grid_id: "orders".into(),
            field: "user.fullName".into(),
            width: 240,
        };
        run_prefs(resize, store.clone()).await.unwrap();
        let hide = PrefsCommand::Hide {
            grid_id: "orders".into(),
            field: "paymentType".into(),
        };
        run_prefs(hide, store.clone()).await.unwrap();

        let lines = describe(&store, "orders").await.unwrap();
        assert_eq!(
            lines,
            [
                "grid: orders",
                "page size: default",
                "width  user.fullName: 240px",
                "hidden  paymentType",
            ]
        );

        let unhide = PrefsCommand::Unhide {
            grid_id: "orders".into(),
            field: "paymentType".into(),
        };
        run_prefs(unhide, store.clone()).await.unwrap();
        let visibility: BTreeMap<String, bool> =
            store.get(&prefs::grid_visibility_key("orders")).await.unwrap();
        assert_eq!(visibility.get("paymentType"), Some(&true));
    }

    #[tokio::test]
    async fn test_zero_width_is_rejected() {
        let store = sqlite_store().await;
        let resize = PrefsCommand::Resize {
            grid_id: "orders".into(),
            field: "totalAmount".into(),
            width: 0,
        };
        assert!(run_prefs(resize, store.clone()).await.is_err());
        assert!(store.keys_with_prefix("").await.is_empty());
    }

    #[tokio::test]
    async fn test_reset_removes_only_that_grid() {
        let store = sqlite_store().await;
        for grid_id in ["products", "products_archive"] {
            for key in prefs::grid_keys(grid_id) {
                store.set(&key, &1u32).await;
            }
        }
        store.set("productFormData", &"draft").await;

        let reset = PrefsCommand::Reset {
            grid_id: "products".into(),
        };
        run_prefs(reset, store.clone()).await.unwrap();

        assert_eq!(
            store.keys_with_prefix("").await,
            [
                "gridVisibility_products_archive",
                "gridWidths_products_archive",
                "grid_pageSize_products_archive",
                "productFormData",
            ]
        );
    }
}
