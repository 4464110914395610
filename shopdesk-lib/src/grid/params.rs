//! Sort, filter and pagination parameters emitted by a grid.

use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, SortOrder};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Asc,
            SortDirection::Desc => SortOrder::Desc,
        }
    }
}

/// One key of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered list of sort entries. Empty means unsorted.
///
/// The grid keeps every entry it is given, but downstream consumers only
/// honor the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortEntry>);

impl SortSpec {
    /// No sorting.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ascending sort on a single field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self(vec![SortEntry {
            field: field.into(),
            direction: SortDirection::Asc,
        }])
    }

    /// Descending sort on a single field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self(vec![SortEntry {
            field: field.into(),
            direction: SortDirection::Desc,
        }])
    }

    /// Adds a secondary sort entry.
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.0.push(SortEntry {
            field: field.into(),
            direction,
        });
        self
    }

    /// The entry downstream consumers honor.
    pub fn primary(&self) -> Option<&SortEntry> {
        self.0.first()
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SortEntry>> for SortSpec {
    fn from(entries: Vec<SortEntry>) -> Self {
        Self(entries)
    }
}

/// A single filter clause.
///
/// The operator is opaque to the grid and passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: String,
    pub value: serde_json::Value,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Equality clause, the implicit operator of the object filter form.
    pub fn equals(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, "equals", value)
    }
}

/// Unordered list of filter clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(Vec<FilterClause>);

impl FilterSpec {
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a clause.
    pub fn with(mut self, clause: FilterClause) -> Self {
        self.0.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reduce to the lossy object form: field -> value, implicit equality.
    ///
    /// Operators are dropped; when a field appears twice the later clause wins.
    pub fn to_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.0
            .iter()
            .map(|clause| (clause.field.clone(), clause.value.clone()))
            .collect()
    }
}

impl From<Vec<FilterClause>> for FilterSpec {
    fn from(clauses: Vec<FilterClause>) -> Self {
        Self(clauses)
    }
}

/// The canonical parameter object handed to a grid's owner.
///
/// `page` is zero-based; [`GridParams::to_list_query`] converts to the
/// one-based wire convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortSpec,
    pub filters: FilterSpec,
    pub quick_filter: Option<String>,
}

impl GridParams {
    /// Translate to the REST list query.
    pub fn to_list_query(&self) -> ListQuery {
        let primary = self.sort.primary();
        ListQuery {
            page: self.page + 1,
            limit: self.page_size,
            filters: self.filters.clauses().to_vec(),
            sort_by: primary.map(|entry| entry.field.clone()),
            sort_order: primary.map(|entry| entry.direction.into()),
            search: self.quick_filter.clone(),
        }
    }
}
