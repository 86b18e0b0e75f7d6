//! Field mergers
//!
//! Each merger folds one field of `right` into `left` and returns the new
//! accumulator. `right` is only read.

use std::collections::BTreeMap;

use refine_core::{HierarchicalFacet, ParametersPatch, SearchParameters};

/// One merge step: `(accumulator, right) -> accumulator`
pub type Merger = fn(SearchParameters, &SearchParameters) -> SearchParameters;

fn shallow_merge<V: Clone>(
    left: &BTreeMap<String, V>,
    right: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    let mut merged = left.clone();
    for (key, value) in right {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn upsert_by_name(
    left: &[HierarchicalFacet],
    right: &[HierarchicalFacet],
) -> Vec<HierarchicalFacet> {
    right.iter().fold(left.to_vec(), |mut facets, facet| {
        match facets.iter().position(|f| f.name == facet.name) {
            Some(index) => facets[index] = facet.clone(),
            None => facets.push(facet.clone()),
        }
        facets
    })
}

pub fn merge_hierarchical_facets_refinements(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    let merged = shallow_merge(
        left.hierarchical_facets_refinements(),
        right.hierarchical_facets_refinements(),
    );
    let patch = ParametersPatch::new().hierarchical_facets_refinements(merged);
    left.set_query_parameters(patch)
}

pub fn merge_hierarchical_facets(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    let merged = upsert_by_name(left.hierarchical_facets(), right.hierarchical_facets());
    left.set_query_parameters(ParametersPatch::new().hierarchical_facets(merged))
}

pub fn merge_tag_refinements(left: SearchParameters, right: &SearchParameters) -> SearchParameters {
    right
        .tag_refinements()
        .iter()
        .fold(left, |acc, tag| acc.add_tag_refinement(tag.as_str()))
}

pub fn merge_numeric_refinements(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    let merged = shallow_merge(left.numeric_refinements(), right.numeric_refinements());
    left.set_query_parameters(ParametersPatch::new().numeric_refinements(merged))
}

pub fn merge_disjunctive_facets_refinements(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    let merged = shallow_merge(
        left.disjunctive_facets_refinements(),
        right.disjunctive_facets_refinements(),
    );
    let patch = ParametersPatch::new().disjunctive_facets_refinements(merged);
    left.set_query_parameters(patch)
}

pub fn merge_facets_excludes(left: SearchParameters, right: &SearchParameters) -> SearchParameters {
    let merged = shallow_merge(left.facets_excludes(), right.facets_excludes());
    left.set_query_parameters(ParametersPatch::new().facets_excludes(merged))
}

pub fn merge_facets_refinements(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    let merged = shallow_merge(left.facets_refinements(), right.facets_refinements());
    left.set_query_parameters(ParametersPatch::new().facets_refinements(merged))
}

pub fn merge_disjunctive_facets(
    left: SearchParameters,
    right: &SearchParameters,
) -> SearchParameters {
    right
        .disjunctive_facets()
        .iter()
        .fold(left, |acc, facet| acc.add_disjunctive_facet(facet.as_str()))
}

pub fn merge_facets(left: SearchParameters, right: &SearchParameters) -> SearchParameters {
    right
        .facets()
        .iter()
        .fold(left, |acc, attribute| acc.add_facet(attribute.as_str()))
}

/// Copy every non-facet query parameter of `right` onto `left`
pub fn merge_with_rest(left: SearchParameters, right: &SearchParameters) -> SearchParameters {
    left.set_query_parameters(ParametersPatch::rest_of(right))
}
