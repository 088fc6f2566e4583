//! Variable hierarchy construction from "|"-delimited names.
//!
//! An aggregate is a variable name that some other present variable extends
//! with further pipe-delimited segments. Each variable is attributed to at
//! most one aggregate: the nearest of its own prefixes that is itself
//! present in the dataset. A variable can be a child of one aggregate and an
//! aggregate of its own children at the same time.

use std::collections::{BTreeMap, BTreeSet};

/// Mapping from aggregate variable name to its immediate present children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableHierarchy {
    children: BTreeMap<String, Vec<String>>,
}

impl VariableHierarchy {
    /// Build the hierarchy restricted to variable names actually present.
    ///
    /// For each name, its "|"-delimited prefixes are walked from the most
    /// specific to the least; the first prefix that is itself present is
    /// recorded as the name's aggregate, and the walk stops so a variable is
    /// never attributed to more than one ancestor level. O(V·D) for V
    /// distinct names of pipe-depth at most D.
    pub fn build(variables: &BTreeSet<String>) -> Self {
        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for variable in variables {
            let segments: Vec<&str> = variable.split('|').collect();
            for depth in (1..segments.len()).rev() {
                let prefix = segments[..depth].join("|");
                if variables.contains(&prefix) {
                    children.entry(prefix).or_default().push(variable.clone());
                    break;
                }
            }
        }
        Self { children }
    }

    /// Present children attributed to `aggregate`, sorted by name.
    pub fn children_of(&self, aggregate: &str) -> &[String] {
        self.children
            .get(aggregate)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_aggregate(&self, variable: &str) -> bool {
        self.children.contains_key(variable)
    }

    /// Aggregate names with their children, in name order.
    pub fn aggregates(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.children
            .iter()
            .map(|(name, children)| (name.as_str(), children.as_slice()))
    }

    pub fn aggregate_count(&self) -> usize {
        self.children.len()
    }
}
