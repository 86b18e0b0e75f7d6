//! Batch updates for search parameter snapshots

use serde_json::{Map, Value};

use crate::{
    CoreError, HierarchicalFacet, NumericRefinements, ParameterField, RefinementMap, Result,
    SearchParameters,
};

/// A set of fields to assign with [`SearchParameters::set_query_parameters`]
///
/// Unset slots leave the target's value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParametersPatch {
    pub(crate) facets: Option<Vec<String>>,
    pub(crate) disjunctive_facets: Option<Vec<String>>,
    pub(crate) tag_refinements: Option<Vec<String>>,
    pub(crate) facets_refinements: Option<RefinementMap>,
    pub(crate) facets_excludes: Option<RefinementMap>,
    pub(crate) disjunctive_facets_refinements: Option<RefinementMap>,
    pub(crate) numeric_refinements: Option<NumericRefinements>,
    pub(crate) hierarchical_facets_refinements: Option<RefinementMap>,
    pub(crate) hierarchical_facets: Option<Vec<HierarchicalFacet>>,
    pub(crate) parameters: Map<String, Value>,
}

impl ParametersPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch carrying every query parameter of `params` and none of its facet fields
    pub fn rest_of(params: &SearchParameters) -> Self {
        Self {
            parameters: params.query_parameters().clone(),
            ..Self::default()
        }
    }

    pub fn facets(mut self, facets: Vec<String>) -> Self {
        self.facets = Some(facets);
        self
    }

    pub fn disjunctive_facets(mut self, facets: Vec<String>) -> Self {
        self.disjunctive_facets = Some(facets);
        self
    }

    pub fn tag_refinements(mut self, tags: Vec<String>) -> Self {
        self.tag_refinements = Some(tags);
        self
    }

    pub fn facets_refinements(mut self, map: RefinementMap) -> Self {
        self.facets_refinements = Some(map);
        self
    }

    pub fn facets_excludes(mut self, map: RefinementMap) -> Self {
        self.facets_excludes = Some(map);
        self
    }

    pub fn disjunctive_facets_refinements(mut self, map: RefinementMap) -> Self {
        self.disjunctive_facets_refinements = Some(map);
        self
    }

    pub fn numeric_refinements(mut self, map: NumericRefinements) -> Self {
        self.numeric_refinements = Some(map);
        self
    }

    pub fn hierarchical_facets_refinements(mut self, map: RefinementMap) -> Self {
        self.hierarchical_facets_refinements = Some(map);
        self
    }

    pub fn hierarchical_facets(mut self, facets: Vec<HierarchicalFacet>) -> Self {
        self.hierarchical_facets = Some(facets);
        self
    }

    /// Assign a query parameter; managed field names are rejected
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let key = key.into();
        if ParameterField::from_key(&key).is_some() {
            return Err(CoreError::ReservedParameter(key));
        }
        self.parameters.insert(key, value.into());
        Ok(self)
    }

    /// True when applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
