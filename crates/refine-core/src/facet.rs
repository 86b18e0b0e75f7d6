//! Facet declarations and refinement value types

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attribute name to selected (or excluded) values
pub type RefinementMap = BTreeMap<String, Vec<String>>;

/// Attribute name to operator constraints
pub type NumericRefinements = BTreeMap<String, BTreeMap<NumericOperator, Vec<NumericValue>>>;

/// A tree-structured facet such as `categories.lvl0 > categories.lvl1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalFacet {
    /// Facet name, unique within a snapshot
    pub name: String,

    /// Attributes for each level of the tree, root first
    pub attributes: Vec<String>,

    /// Separator between levels in a refinement path
    #[serde(default = "HierarchicalFacet::default_separator")]
    pub separator: String,

    /// Only show values under this path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,

    /// Keep the parent level visible when a child is refined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_parent_level: Option<bool>,
}

impl HierarchicalFacet {
    /// Separator used when none is given
    pub const DEFAULT_SEPARATOR: &'static str = " > ";

    /// Create a facet with the default separator
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            separator: Self::default_separator(),
            root_path: None,
            show_parent_level: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = Some(root_path.into());
        self
    }

    pub fn with_show_parent_level(mut self, show: bool) -> Self {
        self.show_parent_level = Some(show);
        self
    }

    fn default_separator() -> String {
        Self::DEFAULT_SEPARATOR.to_string()
    }
}

/// Comparison operator of a numeric refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumericOperator {
    Lt,
    Lte,
    Eq,
    Neq,
    Gte,
    Gt,
}

impl NumericOperator {
    pub const ALL: [NumericOperator; 6] = [
        NumericOperator::Lt,
        NumericOperator::Lte,
        NumericOperator::Eq,
        NumericOperator::Neq,
        NumericOperator::Gte,
        NumericOperator::Gt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOperator::Lt => "<",
            NumericOperator::Lte => "<=",
            NumericOperator::Eq => "=",
            NumericOperator::Neq => "!=",
            NumericOperator::Gte => ">=",
            NumericOperator::Gt => ">",
        }
    }
}

impl fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown numeric operator: {}", s))
    }
}

impl TryFrom<String> for NumericOperator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NumericOperator> for String {
    fn from(op: NumericOperator) -> Self {
        op.as_str().to_string()
    }
}

/// Operand of a numeric refinement
///
/// A group matches when any of its numbers matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Single(f64),
    Group(Vec<f64>),
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Single(value)
    }
}

impl NumericValue {
    /// True when every number in the value is finite
    pub fn is_finite(&self) -> bool {
        match self {
            NumericValue::Single(value) => value.is_finite(),
            NumericValue::Group(values) => values.iter().all(|v| v.is_finite()),
        }
    }
}

impl From<Vec<f64>> for NumericValue {
    fn from(values: Vec<f64>) -> Self {
        NumericValue::Group(values)
    }
}

/// The facet and refinement fields a snapshot manages itself
///
/// Any other top-level key is a plain query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Facets,
    DisjunctiveFacets,
    TagRefinements,
    FacetsRefinements,
    FacetsExcludes,
    DisjunctiveFacetsRefinements,
    NumericRefinements,
    HierarchicalFacetsRefinements,
    HierarchicalFacets,
}

impl ParameterField {
    pub const ALL: [ParameterField; 9] = [
        ParameterField::Facets,
        ParameterField::DisjunctiveFacets,
        ParameterField::TagRefinements,
        ParameterField::FacetsRefinements,
        ParameterField::FacetsExcludes,
        ParameterField::DisjunctiveFacetsRefinements,
        ParameterField::NumericRefinements,
        ParameterField::HierarchicalFacetsRefinements,
        ParameterField::HierarchicalFacets,
    ];

    /// Name of the field in the JSON form
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterField::Facets => "facets",
            ParameterField::DisjunctiveFacets => "disjunctiveFacets",
            ParameterField::TagRefinements => "tagRefinements",
            ParameterField::FacetsRefinements => "facetsRefinements",
            ParameterField::FacetsExcludes => "facetsExcludes",
            ParameterField::DisjunctiveFacetsRefinements => "disjunctiveFacetsRefinements",
            ParameterField::NumericRefinements => "numericRefinements",
            ParameterField::HierarchicalFacetsRefinements => "hierarchicalFacetsRefinements",
            ParameterField::HierarchicalFacets => "hierarchicalFacets",
        }
    }

    /// Look up a managed field by its JSON name
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
