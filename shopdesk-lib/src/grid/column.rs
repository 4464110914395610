//! Column schema and resolved layout.

use std::collections::BTreeMap;

/// Field name of the synthetic row-actions column.
pub const ACTIONS_FIELD: &str = "actions";

/// Fixed width of the row-actions column.
pub const ACTIONS_WIDTH: u32 = 100;

/// How a column's values are interpreted and displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    /// Row action buttons; has no data.
    Actions,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Row field this column displays (also the preference key).
    pub field: String,
    /// Header text.
    pub header: String,
    pub kind: ColumnKind,
    pub sortable: bool,
    pub filterable: bool,
    /// Flex grow factor used while no width has been persisted.
    pub flex: f32,
    /// Declared fixed width, overridden by a persisted width.
    pub width: Option<u32>,
}

impl Column {
    /// Create a sortable, filterable text column.
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            kind: ColumnKind::Text,
            sortable: true,
            filterable: true,
            flex: 1.0,
            width: None,
        }
    }

    pub fn number(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(field, header).kind(ColumnKind::Number)
    }

    pub fn date(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(field, header).kind(ColumnKind::Date)
    }

    pub fn boolean(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(field, header).kind(ColumnKind::Boolean)
    }

    /// The synthetic actions column.
    pub fn actions() -> Self {
        Self {
            field: ACTIONS_FIELD.to_string(),
            header: "Actions".to_string(),
            kind: ColumnKind::Actions,
            sortable: false,
            filterable: false,
            flex: 0.0,
            width: Some(ACTIONS_WIDTH),
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn flex(mut self, flex: f32) -> Self {
        self.flex = flex;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Which per-row actions the owner handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl RowActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
        }
    }

    pub fn any(&self) -> bool {
        self.view || self.edit || self.delete
    }
}

/// Width a column is rendered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed pixel width.
    Fixed(u32),
    /// Share of the remaining space.
    Flex(f32),
}

/// A visible column with its resolved width.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub column: Column,
    pub width: ColumnWidth,
}

/// Resolve widths and drop hidden columns.
///
/// A persisted width wins over the declared one; columns with neither flex.
/// Columns absent from `visibility` are visible.
pub fn resolve_layout(
    columns: &[Column],
    widths: &BTreeMap<String, u32>,
    visibility: &BTreeMap<String, bool>,
) -> Vec<ColumnLayout> {
    columns
        .iter()
        .filter(|col| visibility.get(&col.field).copied().unwrap_or(true))
        .map(|col| {
            let width = match (widths.get(&col.field), col.width) {
                (Some(&px), _) | (None, Some(px)) => ColumnWidth::Fixed(px),
                (None, None) => ColumnWidth::Flex(if col.flex > 0.0 { col.flex } else { 1.0 }),
            };
            ColumnLayout {
                column: col.clone(),
                width,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_width_overrides_flex() {
        let columns = vec![Column::new("name", "Name"), Column::new("brand", "Brand")];
        let widths = BTreeMap::from([("name".to_string(), 240)]);
        let layout = resolve_layout(&columns, &widths, &BTreeMap::new());

        assert_eq!(layout[0].width, ColumnWidth::Fixed(240));
        assert_eq!(layout[1].width, ColumnWidth::Flex(1.0));
    }

    #[test]
    fn test_hidden_columns_are_dropped() {
        let columns = vec![Column::new("name", "Name"), Column::new("sku", "SKU")];
        let visibility = BTreeMap::from([("sku".to_string(), false), ("name".to_string(), true)]);
        let layout = resolve_layout(&columns, &BTreeMap::new(), &visibility);

        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].column.field, "name");
    }

    #[test]
    fn test_actions_column_is_fixed() {
        let layout = resolve_layout(&[Column::actions()], &BTreeMap::new(), &BTreeMap::new());
        assert_eq!(layout[0].width, ColumnWidth::Fixed(ACTIONS_WIDTH));
        assert!(!layout[0].column.sortable);
    }
}
