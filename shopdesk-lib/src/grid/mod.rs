//! Server-driven data grid.
//!
//! A [`GridController`] sits between a page component and a rendering
//! surface. The page supplies a column schema and the rows of the current
//! page; the controller tracks what the user did to the grid and hands back
//! a single [`GridParams`] object, at most once per quiet period, describing
//! what the page should fetch next.

mod cell;
mod column;
mod params;
mod state;

pub use cell::{field_value, format_cell, format_value, row_id};
pub use column::{
    ACTIONS_FIELD, ACTIONS_WIDTH, Column, ColumnKind, ColumnLayout, ColumnWidth, RowActions,
    resolve_layout,
};
pub use params::{FilterClause, FilterSpec, GridParams, SortDirection, SortEntry, SortSpec};
pub use state::{
    DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, DEFAULT_QUIET_PERIOD, GridConfig,
    GridController, GridData, GridViewState, RenderedGrid, RenderedRow,
};
