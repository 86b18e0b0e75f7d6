//! The ordered merge pipeline and the fold over snapshots

use std::fmt;

use refine_core::{ParameterField, SearchParameters};
use tracing::{debug, trace};

use crate::mergers::*;
use crate::{MergeError, Result};

/// How a step combines the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Append values of the right list that the left list lacks
    Union,
    /// Right map entries replace left entries with the same key
    ShallowMerge,
    /// Right entries replace left entries with the same name, others are appended
    UpsertByName,
    /// Right value replaces the left value
    Replace,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePolicy::Union => "union",
            MergePolicy::ShallowMerge => "shallow-merge",
            MergePolicy::UpsertByName => "upsert-by-name",
            MergePolicy::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// A named step of the pipeline
#[derive(Clone, Copy)]
pub struct MergeStep {
    pub name: &'static str,

    /// Field the step merges; `None` for the query parameter step
    pub field: Option<ParameterField>,

    pub policy: MergePolicy,

    pub apply: Merger,
}

impl fmt::Debug for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeStep")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Steps applied, in order, for every snapshot after the first
pub const PIPELINE: [MergeStep; 10] = [
    MergeStep {
        name: "hierarchical_facets_refinements",
        field: Some(ParameterField::HierarchicalFacetsRefinements),
        policy: MergePolicy::ShallowMerge,
        apply: merge_hierarchical_facets_refinements,
    },
    MergeStep {
        name: "hierarchical_facets",
        field: Some(ParameterField::HierarchicalFacets),
        policy: MergePolicy::UpsertByName,
        apply: merge_hierarchical_facets,
    },
    MergeStep {
        name: "tag_refinements",
        field: Some(ParameterField::TagRefinements),
        policy: MergePolicy::Union,
        apply: merge_tag_refinements,
    },
    MergeStep {
        name: "numeric_refinements",
        field: Some(ParameterField::NumericRefinements),
        policy: MergePolicy::ShallowMerge,
        apply: merge_numeric_refinements,
    },
    MergeStep {
        name: "disjunctive_facets_refinements",
        field: Some(ParameterField::DisjunctiveFacetsRefinements),
        policy: MergePolicy::ShallowMerge,
        apply: merge_disjunctive_facets_refinements,
    },
    MergeStep {
        name: "facets_excludes",
        field: Some(ParameterField::FacetsExcludes),
        policy: MergePolicy::ShallowMerge,
        apply: merge_facets_excludes,
    },
    MergeStep {
        name: "facets_refinements",
        field: Some(ParameterField::FacetsRefinements),
        policy: MergePolicy::ShallowMerge,
        apply: merge_facets_refinements,
    },
    MergeStep {
        name: "disjunctive_facets",
        field: Some(ParameterField::DisjunctiveFacets),
        policy: MergePolicy::Union,
        apply: merge_disjunctive_facets,
    },
    MergeStep {
        name: "facets",
        field: Some(ParameterField::Facets),
        policy: MergePolicy::Union,
        apply: merge_facets,
    },
    MergeStep {
        name: "query_parameters",
        field: None,
        policy: MergePolicy::Replace,
        apply: merge_with_rest,
    },
];

/// Merge `right` into `left` by running every pipeline step
pub fn merge_pair(left: SearchParameters, right: &SearchParameters) -> SearchParameters {
    PIPELINE.iter().fold(left, |acc, step| {
        trace!(step = step.name, policy = %step.policy, "Applying merge step");
        (step.apply)(acc, right)
    })
}

/// Fold snapshots left to right into a single snapshot
///
/// The first snapshot is the starting accumulator. Fails with
/// [`MergeError::EmptyInput`] when there is nothing to merge.
pub fn merge<'a, I>(parameters: I) -> Result<SearchParameters>
where
    I: IntoIterator<Item = &'a SearchParameters>,
{
    let mut snapshots = parameters.into_iter();
    let first = snapshots.next().ok_or(MergeError::EmptyInput)?;

    let mut merged = first.clone();
    let mut count = 1usize;
    for right in snapshots {
        debug!("Folding snapshot {} into the accumulator", count);
        merged = merge_pair(merged, right);
        count += 1;
    }

    debug!("Merged {} search parameter snapshots", count);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use refine_core::{HierarchicalFacet, NumericOperator};
    use serde_json::json;

    fn from_json(value: serde_json::Value) -> SearchParameters {
        SearchParameters::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let none: Vec<SearchParameters> = Vec::new();
        assert!(matches!(merge(&none), Err(MergeError::EmptyInput)));
    }

    #[test]
    fn test_single_input_is_returned_unchanged() {
        let params = from_json(json!({"facets": ["brand"], "query": "shoes"}));
        let merged = merge([&params]).unwrap();
        assert_eq!(merged, params);
    }

    #[test]
    fn test_union_dedup_keeps_order() {
        let a = from_json(json!({"facets": ["a", "b"]}));
        let b = from_json(json!({"facets": ["b", "c"]}));
        let merged = merge([&a, &b]).unwrap();
        assert_eq!(merged.facets(), ["a", "b", "c"]);
    }

    #[test]
    fn test_map_collision_right_wins() {
        let a = from_json(json!({"facetsRefinements": {"color": ["red"]}}));
        let b = from_json(json!({"facetsRefinements": {"color": ["blue"]}}));
        let merged = merge([&a, &b]).unwrap();
        assert_eq!(merged.facets_refinements()["color"], ["blue"]);
    }

    #[test]
    fn test_hierarchical_upsert() {
        let a = from_json(json!({
            "hierarchicalFacets": [{"name": "categories", "attributes": ["lvl0"]}]
        }));
        let b = from_json(json!({
            "hierarchicalFacets": [{"name": "categories", "attributes": ["lvl0", "lvl1"]}]
        }));
        let merged = merge([&a, &b]).unwrap();
        let expected = HierarchicalFacet::new("categories", ["lvl0", "lvl1"]);
        assert_eq!(merged.hierarchical_facets(), [expected]);
    }

    #[test]
    fn test_hierarchical_refinements_fold() {
        let a = from_json(json!({
            "hierarchicalFacetsRefinements": {"cat": ["A"], "x": ["1"]}
        }));
        let b = from_json(json!({
            "hierarchicalFacetsRefinements": {"cat": ["B > C"]}
        }));
        let c = from_json(json!({
            "hierarchicalFacetsRefinements": {"x": ["2"]}
        }));

        let ab = merge([&a, &b]).unwrap();
        let refinements = ab.hierarchical_facets_refinements();
        assert_eq!(refinements["cat"], ["B > C"]);
        assert_eq!(refinements["x"], ["1"]);

        let abc = merge([&a, &b, &c]).unwrap();
        let refinements = abc.hierarchical_facets_refinements();
        assert_eq!(refinements["cat"], ["B > C"]);
        assert_eq!(refinements["x"], ["2"]);
    }

    #[test]
    fn test_rest_passthrough() {
        let a = from_json(json!({"query": "shoes"}));
        let b = from_json(json!({"query": "boots", "page": 2}));
        let merged = merge([&a, &b]).unwrap();
        assert_eq!(merged.to_json().unwrap()["query"], json!("boots"));
        assert_eq!(merged.page(), Some(2));
        assert_eq!(merged.query_parameters().len(), 2);
    }

    #[test]
    fn test_multi_way_fold() {
        let a = from_json(json!({"facets": ["a"]}));
        let b = from_json(json!({"facets": ["b"]}));
        let c = from_json(json!({"facets": ["a"]}));
        let merged = merge([&a, &b, &c]).unwrap();
        assert_eq!(merged.facets(), ["a", "b"]);
    }

    #[test]
    fn test_fold_is_left_to_right() {
        let a = from_json(json!({
            "query": "a",
            "tagRefinements": ["x"],
            "disjunctiveFacetsRefinements": {"brand": ["acme"], "size": ["S"]}
        }));
        let b = from_json(json!({
            "query": "b",
            "tagRefinements": ["y"],
            "disjunctiveFacetsRefinements": {"brand": ["globex"]}
        }));
        let c = from_json(json!({
            "tagRefinements": ["z", "x"],
            "disjunctiveFacetsRefinements": {"size": ["M"]}
        }));

        let merged = merge([&a, &b, &c]).unwrap();
        let folded = merge_pair(merge_pair(a.clone(), &b), &c);
        assert_eq!(merged, folded);

        assert_eq!(merged.query(), Some("b"));
        assert_eq!(merged.tag_refinements(), ["x", "y", "z"]);
        let disjunctive = merged.disjunctive_facets_refinements();
        assert_eq!(disjunctive["brand"], ["globex"]);
        assert_eq!(disjunctive["size"], ["M"]);
    }

    #[test]
    fn test_order_of_inputs_matters() {
        let a = from_json(json!({"query": "shoes", "facets": ["a"]}));
        let b = from_json(json!({"query": "boots", "facets": ["b"]}));
        let ab = merge([&a, &b]).unwrap();
        let ba = merge([&b, &a]).unwrap();
        assert_eq!(ab.query(), Some("boots"));
        assert_eq!(ba.query(), Some("shoes"));
        assert_eq!(ab.facets(), ["a", "b"]);
        assert_eq!(ba.facets(), ["b", "a"]);
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let a = SearchParameters::new()
            .add_facet("brand")
            .add_numeric_refinement("price", NumericOperator::Gt, 5.0)
            .unwrap()
            .with_query("shoes");
        let b = SearchParameters::new()
            .add_facet("color")
            .add_numeric_refinement("price", NumericOperator::Lt, 50.0)
            .unwrap()
            .with_query("boots");
        let (a_before, b_before) = (a.clone(), b.clone());

        let merged = merge(vec![&a, &b]).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
        assert_eq!(merged.facets(), ["brand", "color"]);
        let price = &merged.numeric_refinements()["price"];
        assert!(price.contains_key(&NumericOperator::Lt));
        assert!(!price.contains_key(&NumericOperator::Gt));
    }

    #[test]
    fn test_pipeline_order() {
        let fields: Vec<Option<&str>> = PIPELINE
            .iter()
            .map(|step| step.field.map(|f| f.as_str()))
            .collect();
        assert_eq!(
            fields,
            [
                Some("hierarchicalFacetsRefinements"),
                Some("hierarchicalFacets"),
                Some("tagRefinements"),
                Some("numericRefinements"),
                Some("disjunctiveFacetsRefinements"),
                Some("facetsExcludes"),
                Some("facetsRefinements"),
                Some("disjunctiveFacets"),
                Some("facets"),
                None,
            ]
        );
        assert_eq!(PIPELINE[9].policy, MergePolicy::Replace);
    }

    #[test]
    fn test_pipeline_covers_every_managed_field() {
        for field in ParameterField::ALL {
            let steps = PIPELINE
                .iter()
                .filter(|step| step.field == Some(field))
                .count();
            assert_eq!(steps, 1, "field {} should be merged exactly once", field);
        }
    }
}
