//! Merging snapshots given in their JSON form

use refine_core::{ParameterField, SearchParameters};
use serde_json::Value;

use crate::{merge, MergeError, Result};

/// Fields every merged-in snapshot must carry under [`merge_strict_json`]
pub const REQUIRED_FIELDS: [ParameterField; 3] = [
    ParameterField::Facets,
    ParameterField::DisjunctiveFacets,
    ParameterField::TagRefinements,
];

fn parse_all(values: &[Value]) -> Result<Vec<SearchParameters>> {
    let mut snapshots = Vec::with_capacity(values.len());
    for value in values {
        snapshots.push(SearchParameters::from_value(value.clone())?);
    }
    Ok(snapshots)
}

/// Parse and merge JSON snapshots
///
/// Missing facet fields count as empty.
pub fn merge_json_values(values: &[Value]) -> Result<SearchParameters> {
    let snapshots = parse_all(values)?;
    merge(&snapshots)
}

/// Parse and merge JSON snapshots, requiring the list fields to be spelled out
///
/// Every snapshot after the first must contain `facets`, `disjunctiveFacets`
/// and `tagRefinements`, even if empty.
pub fn merge_strict_json(values: &[Value]) -> Result<SearchParameters> {
    let snapshots = parse_all(values)?;

    for (index, value) in values.iter().enumerate().skip(1) {
        for field in REQUIRED_FIELDS {
            if value.get(field.as_str()).is_none() {
                return Err(MergeError::MissingField {
                    index,
                    field: field.as_str(),
                });
            }
        }
    }

    merge(&snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_json_values() {
        let values = [
            json!({"facets": ["brand"], "query": "shoes"}),
            json!({"disjunctiveFacets": ["color"], "page": 1}),
        ];
        let merged = merge_json_values(&values).unwrap();
        assert_eq!(merged.facets(), ["brand"]);
        assert_eq!(merged.disjunctive_facets(), ["color"]);
        assert_eq!(merged.query(), Some("shoes"));
        assert_eq!(merged.page(), Some(1));
    }

    #[test]
    fn test_merge_json_values_empty() {
        let result = merge_json_values(&[]);
        assert!(matches!(result, Err(MergeError::EmptyInput)));
    }

    #[test]
    fn test_merge_json_values_invalid_snapshot() {
        let values = [json!({"facets": "brand"})];
        let err = merge_json_values(&values).unwrap_err();
        assert!(matches!(err, MergeError::Core(_)));
    }

    #[test]
    fn test_strict_requires_list_fields() {
        let values = [
            json!({"query": "shoes"}),
            json!({"facets": [], "disjunctiveFacets": []}),
        ];
        match merge_strict_json(&values).unwrap_err() {
            MergeError::MissingField { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "tagRefinements");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_strict_accepts_first_snapshot_without_lists() {
        let complete = json!({
            "facets": ["brand"],
            "disjunctiveFacets": [],
            "tagRefinements": ["sale"]
        });
        let values = [json!({"query": "shoes"}), complete];
        let merged = merge_strict_json(&values).unwrap();
        assert_eq!(merged.facets(), ["brand"]);
        assert_eq!(merged.tag_refinements(), ["sale"]);
    }
}
