//! Grid controller state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;

use crate::api::Paginated;
use crate::debounce::Debouncer;
use crate::prefs::{self, PreferenceStore};

use super::cell::{format_cell, row_id};
use super::column::{Column, ColumnLayout, ColumnWidth, RowActions, resolve_layout};
use super::params::{FilterClause, FilterSpec, GridParams, SortEntry, SortSpec};

/// Page sizes offered when the owner does not choose its own.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 25, 50, 100];

/// Page size used when neither the owner nor stored preferences pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Quiet period before parameter changes are emitted.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Configuration for a grid instance.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Stable identifier namespacing the grid's stored preferences.
    pub grid_id: String,
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
    pub quiet_period: Duration,
    pub row_actions: RowActions,
}

impl GridConfig {
    pub fn new(grid_id: impl Into<String>) -> Self {
        Self {
            grid_id: grid_id.into(),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            quiet_period: DEFAULT_QUIET_PERIOD,
            row_actions: RowActions::none(),
        }
    }

    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn with_page_size_options(mut self, options: impl Into<Vec<u32>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn with_row_actions(mut self, row_actions: RowActions) -> Self {
        self.row_actions = row_actions;
        self
    }

    /// Whether `page_size` is one of the offered options.
    pub fn allows(&self, page_size: u32) -> bool {
        page_size > 0 && self.page_size_options.contains(&page_size)
    }

    /// Make sure the default is offered and options are sorted and unique.
    fn normalized(mut self) -> Self {
        if self.default_page_size == 0 {
            self.default_page_size = DEFAULT_PAGE_SIZE;
        }
        self.page_size_options.retain(|&size| size > 0);
        self.page_size_options.push(self.default_page_size);
        self.page_size_options.sort_unstable();
        self.page_size_options.dedup();
        self
    }
}

/// Interaction state of one grid instance.
///
/// `page_size`, `column_widths` and `column_visibility` are persisted; the
/// rest resets whenever a grid is initialized.
#[derive(Debug, Clone, PartialEq)]
pub struct GridViewState {
    /// Zero-based page index.
    pub page: u32,
    pub page_size: u32,
    pub sort: SortSpec,
    pub filters: FilterSpec,
    pub quick_filter: Option<String>,
    /// Pixel widths set by explicit resizes. Absent columns flex.
    pub column_widths: BTreeMap<String, u32>,
    /// Absent columns are visible.
    pub column_visibility: BTreeMap<String, bool>,
}

impl GridViewState {
    fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            sort: SortSpec::none(),
            filters: FilterSpec::none(),
            quick_filter: None,
            column_widths: BTreeMap::new(),
            column_visibility: BTreeMap::new(),
        }
    }

    /// The parameter object handed to the owner.
    pub fn params(&self) -> GridParams {
        GridParams {
            page: self.page,
            page_size: self.page_size,
            sort: self.sort.clone(),
            filters: self.filters.clone(),
            quick_filter: self.quick_filter.clone(),
        }
    }

    /// Whether a column is shown.
    pub fn is_visible(&self, field: &str) -> bool {
        self.column_visibility.get(field).copied().unwrap_or(true)
    }
}

/// One page of server rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridData {
    pub rows: Vec<Value>,
    pub total_count: u64,
}

impl From<Paginated<Value>> for GridData {
    fn from(page: Paginated<Value>) -> Self {
        Self {
            rows: page.docs,
            total_count: page.total_count,
        }
    }
}

/// A formatted row ready for a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub id: Option<String>,
    pub cells: Vec<String>,
}

/// The current page laid out against the visible columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGrid {
    pub headers: Vec<String>,
    pub widths: Vec<ColumnWidth>,
    pub rows: Vec<RenderedRow>,
    pub page: u32,
    pub page_count: u32,
    pub total_count: u64,
}

#[derive(Debug)]
struct GridInner {
    view: GridViewState,
    columns: Vec<Column>,
    data: GridData,
}

/// Controller for a server-paginated grid.
///
/// Owns pagination, sort, filter and column layout state, persists layout
/// preferences through a [`PreferenceStore`], and reports parameter changes
/// to its owner once per quiet period. Cheap to clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let grid = GridController::initialize(
///     GridConfig::new("products").with_row_actions(RowActions::all()),
///     vec![Column::new("name", "Name"), Column::number("price", "Price")],
///     store,
///     move |params| refetch(params.to_list_query()),
/// )
/// .await;
///
/// grid.on_sort_change(SortSpec::desc("price"));
/// ```
#[derive(Clone)]
pub struct GridController {
    config: Arc<GridConfig>,
    inner: Arc<RwLock<GridInner>>,
    store: PreferenceStore,
    emitter: Arc<Debouncer<GridParams>>,
    disposed: Arc<AtomicBool>,
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("grid_id", &self.config.grid_id)
            .field("view", &self.view_state())
            .finish_non_exhaustive()
    }
}

impl GridController {
    /// Create a grid seeded from stored preferences.
    ///
    /// Missing, unreadable or out-of-range preferences fall back to the
    /// configured defaults without surfacing an error.
    pub async fn initialize<F>(
        config: GridConfig,
        columns: Vec<Column>,
        store: PreferenceStore,
        on_params_change: F,
    ) -> Self
    where
        F: Fn(GridParams) + Send + Sync + 'static,
    {
        let config = config.normalized();
        let grid_id = config.grid_id.clone();

        let page_size = store
            .get::<u32>(&prefs::grid_page_size_key(&grid_id))
            .await
            .filter(|&size| config.allows(size))
            .unwrap_or(config.default_page_size);

        let mut view = GridViewState::new(page_size);
        view.column_widths = store
            .get::<BTreeMap<String, u32>>(&prefs::grid_widths_key(&grid_id))
            .await
            .unwrap_or_default();
        view.column_widths.retain(|_, width| *width > 0);
        view.column_visibility = store
            .get(&prefs::grid_visibility_key(&grid_id))
            .await
            .unwrap_or_default();

        let mut columns = columns;
        if config.row_actions.any() {
            columns.push(Column::actions());
        }

        let emitter = Debouncer::new(config.quiet_period, move |params: GridParams| {
            log::debug!(
                "grid `{grid_id}` params changed: page {} size {}",
                params.page,
                params.page_size
            );
            on_params_change(params);
        });

        Self {
            config: Arc::new(config),
            inner: Arc::new(RwLock::new(GridInner {
                view,
                columns,
                data: GridData::default(),
            })),
            store,
            emitter: Arc::new(emitter),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn grid_id(&self) -> &str {
        &self.config.grid_id
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn read<R>(&self, f: impl FnOnce(&GridInner) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Apply a state change and restart the quiet period.
    fn update(&self, f: impl FnOnce(&mut GridViewState)) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        f(&mut guard.view);
        // Triggered under the view lock so snapshots reach the emitter in
        // the order the changes were applied.
        if !self.disposed.load(Ordering::SeqCst) {
            self.emitter.trigger(guard.view.params());
        }
    }

    fn column_allows(&self, field: &str, allows: impl Fn(&Column) -> bool) -> bool {
        self.read(|inner| inner.columns.iter().any(|c| c.field == field && allows(c)))
    }

    /// Whether `field` names a sortable column.
    pub fn can_sort(&self, field: &str) -> bool {
        self.column_allows(field, |c| c.sortable)
    }

    /// Whether `field` names a filterable column.
    pub fn can_filter(&self, field: &str) -> bool {
        self.column_allows(field, |c| c.filterable)
    }

    // -------------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------------

    /// Snapshot of the current view state.
    pub fn view_state(&self) -> GridViewState {
        self.read(|inner| inner.view.clone())
    }

    /// Parameters as they would be emitted now.
    pub fn params(&self) -> GridParams {
        self.read(|inner| inner.view.params())
    }

    /// Whether a parameter change is waiting for the quiet period.
    pub fn has_pending_change(&self) -> bool {
        self.emitter.is_pending()
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Move to a page, possibly with a new page size.
    ///
    /// A changed page size is stored before the in-memory state changes.
    /// Sizes outside the configured options are ignored.
    pub async fn on_page_change(&self, page: u32, page_size: u32) {
        if !self.config.allows(page_size) {
            log::warn!(
                "grid `{}`: ignoring page size {page_size}, not one of {:?}",
                self.config.grid_id,
                self.config.page_size_options
            );
            return;
        }
        let current = self.read(|inner| inner.view.page_size);
        if page_size != current {
            self.store
                .set(&prefs::grid_page_size_key(&self.config.grid_id), &page_size)
                .await;
        }
        self.update(|view| {
            view.page = page;
            view.page_size = page_size;
        });
    }

    /// Replace the sort order. The page is kept.
    ///
    /// Entries on unknown or non-sortable columns are dropped.
    pub fn on_sort_change(&self, sort: SortSpec) {
        let entries: Vec<SortEntry> = sort
            .entries()
            .iter()
            .filter(|entry| {
                let allowed = self.can_sort(&entry.field);
                if !allowed {
                    log::warn!(
                        "grid `{}`: ignoring sort on `{}`, not a sortable column",
                        self.config.grid_id,
                        entry.field
                    );
                }
                allowed
            })
            .cloned()
            .collect();
        let sort = SortSpec::from(entries);
        self.update(|view| view.sort = sort);
    }

    /// Replace the filters and return to the first page.
    ///
    /// Clauses on unknown or non-filterable columns are dropped.
    pub fn on_filter_change(&self, filters: FilterSpec) {
        let clauses: Vec<FilterClause> = filters
            .clauses()
            .iter()
            .filter(|clause| {
                let allowed = self.can_filter(&clause.field);
                if !allowed {
                    log::warn!(
                        "grid `{}`: ignoring filter on `{}`, not a filterable column",
                        self.config.grid_id,
                        clause.field
                    );
                }
                allowed
            })
            .cloned()
            .collect();
        let filters = FilterSpec::from(clauses);
        self.update(|view| {
            view.filters = filters;
            view.page = 0;
        });
    }

    /// Set the free-text quick filter and return to the first page.
    ///
    /// Empty text clears the quick filter.
    pub fn on_quick_filter_change(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|view| {
            view.quick_filter = (!text.is_empty()).then_some(text);
            view.page = 0;
        });
    }

    /// Record an explicit column resize and store it.
    ///
    /// The stored widths are re-read and merged rather than overwritten, so
    /// widths saved by another instance of the same grid survive.
    pub async fn on_column_resize(&self, field: &str, width: u32) {
        if width == 0 {
            log::warn!("grid `{}`: ignoring zero width for `{field}`", self.config.grid_id);
            return;
        }
        self.update(|view| {
            view.column_widths.insert(field.to_string(), width);
        });

        let key = prefs::grid_widths_key(&self.config.grid_id);
        let mut stored: BTreeMap<String, u32> = self.store.get(&key).await.unwrap_or_default();
        stored.insert(field.to_string(), width);
        self.store.set(&key, &stored).await;
    }

    /// Replace column visibility wholesale and store it.
    pub async fn on_column_visibility_change(&self, visibility: BTreeMap<String, bool>) {
        let key = prefs::grid_visibility_key(&self.config.grid_id);
        self.update(|view| view.column_visibility = visibility.clone());
        self.store.set(&key, &visibility).await;
    }

    /// Show or hide a single column.
    pub async fn set_column_visible(&self, field: &str, visible: bool) {
        let mut visibility = self.read(|inner| inner.view.column_visibility.clone());
        visibility.insert(field.to_string(), visible);
        self.on_column_visibility_change(visibility).await;
    }

    /// Stop emitting. A pending change is dropped.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.emitter.cancel();
    }

    // -------------------------------------------------------------------------
    // Data & rendering
    // -------------------------------------------------------------------------

    /// Replace the rows of the current page.
    pub fn set_data(&self, data: GridData) {
        if let Ok(mut guard) = self.inner.write() {
            guard.data = data;
        }
    }

    pub fn rows(&self) -> Vec<Value> {
        self.read(|inner| inner.data.rows.clone())
    }

    pub fn total_count(&self) -> u64 {
        self.read(|inner| inner.data.total_count)
    }

    /// Number of pages at the current page size.
    pub fn page_count(&self) -> u32 {
        self.read(|inner| {
            let size = u64::from(inner.view.page_size.max(1));
            inner.data.total_count.div_ceil(size) as u32
        })
    }

    pub fn columns(&self) -> Vec<Column> {
        self.read(|inner| inner.columns.clone())
    }

    /// Visible columns with their resolved widths.
    pub fn layout(&self) -> Vec<ColumnLayout> {
        self.read(|inner| {
            resolve_layout(
                &inner.columns,
                &inner.view.column_widths,
                &inner.view.column_visibility,
            )
        })
    }

    /// Format the current page against the visible columns.
    pub fn render(&self) -> RenderedGrid {
        let layout = self.layout();
        let actions = self.config.row_actions;
        let (rows, page) = self.read(|inner| (inner.data.rows.clone(), inner.view.page));

        RenderedGrid {
            headers: layout.iter().map(|l| l.column.header.clone()).collect(),
            widths: layout.iter().map(|l| l.width).collect(),
            rows: rows
                .iter()
                .map(|row| RenderedRow {
                    id: row_id(row),
                    cells: layout
                        .iter()
                        .map(|l| format_cell(row, &l.column.field, l.column.kind, actions))
                        .collect(),
                })
                .collect(),
            page,
            page_count: self.page_count(),
            total_count: self.total_count(),
        }
    }
}
