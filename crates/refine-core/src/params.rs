//! Search parameter snapshots

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    CoreError, HierarchicalFacet, NumericOperator, NumericRefinements, NumericValue,
    ParameterField, ParametersPatch, RefinementMap, Result,
};

/// An immutable snapshot of a search's filtering state
///
/// Every builder method consumes the snapshot and returns the updated one,
/// so a value that is shared by reference never changes underneath its
/// readers.
///
/// The managed fields are always present; a snapshot that never set
/// `facets` simply has an empty list. Every other top-level key is kept in
/// the query parameter map (`query`, `page`, `hitsPerPage`, ...) and is
/// present only once it has been set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParameters {
    /// Attributes to compute conjunctive facet counts for
    facets: Vec<String>,

    /// Attributes to compute disjunctive facet counts for
    disjunctive_facets: Vec<String>,

    /// Tag filters
    tag_refinements: Vec<String>,

    /// Selected values of conjunctive facets
    facets_refinements: RefinementMap,

    /// Excluded values of conjunctive facets
    facets_excludes: RefinementMap,

    /// Selected values of disjunctive facets
    disjunctive_facets_refinements: RefinementMap,

    /// Numeric constraints per attribute
    numeric_refinements: NumericRefinements,

    /// Selected path per hierarchical facet
    hierarchical_facets_refinements: RefinementMap,

    /// Declared hierarchical facets, at most one per name
    hierarchical_facets: Vec<HierarchicalFacet>,

    /// All remaining query parameters
    #[serde(flatten)]
    query_parameters: Map<String, Value>,
}

impl SearchParameters {
    pub const QUERY: &'static str = "query";
    pub const PAGE: &'static str = "page";
    pub const HITS_PER_PAGE: &'static str = "hitsPerPage";

    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from its JSON form
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Convert a JSON value into a snapshot
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Convert the snapshot to its JSON form
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn facets(&self) -> &[String] {
        &self.facets
    }

    pub fn disjunctive_facets(&self) -> &[String] {
        &self.disjunctive_facets
    }

    pub fn tag_refinements(&self) -> &[String] {
        &self.tag_refinements
    }

    pub fn facets_refinements(&self) -> &RefinementMap {
        &self.facets_refinements
    }

    pub fn facets_excludes(&self) -> &RefinementMap {
        &self.facets_excludes
    }

    pub fn disjunctive_facets_refinements(&self) -> &RefinementMap {
        &self.disjunctive_facets_refinements
    }

    pub fn numeric_refinements(&self) -> &NumericRefinements {
        &self.numeric_refinements
    }

    pub fn hierarchical_facets_refinements(&self) -> &RefinementMap {
        &self.hierarchical_facets_refinements
    }

    pub fn hierarchical_facets(&self) -> &[HierarchicalFacet] {
        &self.hierarchical_facets
    }

    /// Get a declared hierarchical facet by name
    pub fn hierarchical_facet(&self, name: &str) -> Option<&HierarchicalFacet> {
        self.hierarchical_facets.iter().find(|f| f.name == name)
    }

    /// Query parameters other than the managed facet fields
    pub fn query_parameters(&self) -> &Map<String, Value> {
        &self.query_parameters
    }

    /// Get a single query parameter
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.query_parameters.get(key)
    }

    pub fn query(&self) -> Option<&str> {
        self.parameter(Self::QUERY).and_then(Value::as_str)
    }

    pub fn page(&self) -> Option<u64> {
        self.parameter(Self::PAGE).and_then(Value::as_u64)
    }

    pub fn hits_per_page(&self) -> Option<u64> {
        self.parameter(Self::HITS_PER_PAGE).and_then(Value::as_u64)
    }

    /// Set a batch of fields at once
    ///
    /// Fields present in the patch replace the current value whole; query
    /// parameters in the patch are assigned one key at a time.
    pub fn set_query_parameters(mut self, patch: ParametersPatch) -> Self {
        if let Some(facets) = patch.facets {
            self.facets = facets;
        }
        if let Some(facets) = patch.disjunctive_facets {
            self.disjunctive_facets = facets;
        }
        if let Some(tags) = patch.tag_refinements {
            self.tag_refinements = tags;
        }
        if let Some(map) = patch.facets_refinements {
            self.facets_refinements = map;
        }
        if let Some(map) = patch.facets_excludes {
            self.facets_excludes = map;
        }
        if let Some(map) = patch.disjunctive_facets_refinements {
            self.disjunctive_facets_refinements = map;
        }
        if let Some(map) = patch.numeric_refinements {
            self.numeric_refinements = map;
        }
        if let Some(map) = patch.hierarchical_facets_refinements {
            self.hierarchical_facets_refinements = map;
        }
        if let Some(facets) = patch.hierarchical_facets {
            self.hierarchical_facets = facets;
        }
        for (key, value) in patch.parameters {
            self.query_parameters.insert(key, value);
        }
        self
    }

    /// Add a conjunctive facet unless it is already declared
    pub fn add_facet(mut self, attribute: impl Into<String>) -> Self {
        push_unique(&mut self.facets, attribute.into());
        self
    }

    /// Add a disjunctive facet unless it is already declared
    pub fn add_disjunctive_facet(mut self, attribute: impl Into<String>) -> Self {
        push_unique(&mut self.disjunctive_facets, attribute.into());
        self
    }

    /// Add a tag filter unless it is already present
    pub fn add_tag_refinement(mut self, tag: impl Into<String>) -> Self {
        push_unique(&mut self.tag_refinements, tag.into());
        self
    }

    pub fn add_facet_refinement(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        refine(&mut self.facets_refinements, attribute.into(), value.into());
        self
    }

    pub fn add_facet_exclusion(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        refine(&mut self.facets_excludes, attribute.into(), value.into());
        self
    }

    pub fn add_disjunctive_facet_refinement(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        refine(
            &mut self.disjunctive_facets_refinements,
            attribute.into(),
            value.into(),
        );
        self
    }

    /// Add a numeric constraint, e.g. `price >= 10`
    ///
    /// NaN and infinite values are rejected: they cannot be compared for
    /// duplicates and have no JSON form.
    pub fn add_numeric_refinement(
        mut self,
        attribute: impl Into<String>,
        operator: NumericOperator,
        value: impl Into<NumericValue>,
    ) -> Result<Self> {
        let attribute = attribute.into();
        let value = value.into();
        if !value.is_finite() {
            return Err(CoreError::NonFiniteNumber(attribute));
        }
        let values = self
            .numeric_refinements
            .entry(attribute)
            .or_default()
            .entry(operator)
            .or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        Ok(self)
    }

    /// Declare a hierarchical facet
    pub fn add_hierarchical_facet(mut self, facet: HierarchicalFacet) -> Result<Self> {
        if self.hierarchical_facet(&facet.name).is_some() {
            return Err(CoreError::DuplicateHierarchicalFacet(facet.name));
        }
        self.hierarchical_facets.push(facet);
        Ok(self)
    }

    /// Select a path of a declared hierarchical facet, replacing any previous one
    pub fn add_hierarchical_facet_refinement(
        mut self,
        facet: &str,
        path: impl Into<String>,
    ) -> Result<Self> {
        if self.hierarchical_facet(facet).is_none() {
            return Err(CoreError::UnknownHierarchicalFacet(facet.to_string()));
        }
        self.hierarchical_facets_refinements
            .insert(facet.to_string(), vec![path.into()]);
        Ok(self)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query_parameters
            .insert(Self::QUERY.to_string(), Value::String(query.into()));
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.query_parameters
            .insert(Self::PAGE.to_string(), page.into());
        self
    }

    pub fn with_hits_per_page(mut self, hits_per_page: u64) -> Self {
        self.query_parameters
            .insert(Self::HITS_PER_PAGE.to_string(), hits_per_page.into());
        self
    }

    /// Set an arbitrary query parameter
    ///
    /// Managed field names are rejected; use the dedicated builders for those.
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let key = key.into();
        if ParameterField::from_key(&key).is_some() {
            return Err(CoreError::ReservedParameter(key));
        }
        self.query_parameters.insert(key, value.into());
        Ok(self)
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn refine(map: &mut RefinementMap, attribute: String, value: String) {
    push_unique(map.entry(attribute).or_default(), value);
}
