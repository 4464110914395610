//! List request parameters.

use serde::{Deserialize, Serialize};

use crate::grid::FilterClause;

/// Sort order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query for a list endpoint. `page` is one-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            filters: Vec::new(),
            sort_by: None,
            sort_order: None,
            search: None,
        }
    }
}

impl ListQuery {
    /// Lossy object form of the filters: field -> value, later clauses win.
    pub fn filters_as_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.filters
            .iter()
            .map(|clause| (clause.field.clone(), clause.value.clone()))
            .collect()
    }

    /// Encode as URL query pairs. Filters travel as one JSON array.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if !self.filters.is_empty() {
            // Serializing a Vec of plain structs cannot fail.
            let filters = serde_json::to_string(&self.filters).unwrap_or_default();
            pairs.push(("filters", filters));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_query_pairs() {
        let pairs = ListQuery::default().to_query_pairs();
        assert_eq!(pairs, vec![("page", "1".to_string()), ("limit", "10".to_string())]);
    }

    #[test]
    fn test_full_query_pairs() {
        let query = ListQuery {
            page: 3,
            limit: 25,
            filters: vec![FilterClause::new("status", "equals", "pending")],
            sort_by: Some("createdAt".into()),
            sort_order: Some(SortOrder::Desc),
            search: Some("jane".into()),
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "3".to_string()),
                ("limit", "25".to_string()),
                (
                    "filters",
                    r#"[{"field":"status","operator":"equals","value":"pending"}]"#.to_string()
                ),
                ("sortBy", "createdAt".to_string()),
                ("sortOrder", "desc".to_string()),
                ("search", "jane".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_as_object_last_wins() {
        let query = ListQuery {
            filters: vec![
                FilterClause::equals("status", "pending"),
                FilterClause::new("status", "isAnyOf", "shipped"),
                FilterClause::equals("isActive", true),
            ],
            ..ListQuery::default()
        };
        let object = query.filters_as_object();
        assert_eq!(object.len(), 2);
        assert_eq!(object["status"], serde_json::json!("shipped"));
        assert_eq!(object["isActive"], serde_json::json!(true));
    }

    #[test]
    fn test_serializes_camel_case() {
        let query = ListQuery {
            sort_by: Some("price".into()),
            sort_order: Some(SortOrder::Asc),
            ..ListQuery::default()
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"page": 1, "limit": 10, "sortBy": "price", "sortOrder": "asc"})
        );
    }
}
