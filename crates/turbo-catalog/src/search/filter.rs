//! Active facet filter selection.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::CatalogError;
use crate::ids::{FacetId, FacetValueId};

/// Selected facet values, keyed by facet group.
///
/// A group is only present while at least one of its values is selected.
/// Every mutating operation returns a new state so callers can compare old
/// and new snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterState {
    groups: BTreeMap<FacetId, BTreeSet<FacetValueId>>,
}

impl FilterState {
    /// Create an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `group=value[,value...]` argument, as typed on a command line.
    pub fn parse_arg(arg: &str) -> Result<(FacetId, Vec<FacetValueId>), CatalogError> {
        let (group, values) = arg
            .split_once('=')
            .ok_or_else(|| CatalogError::InvalidFilter(arg.to_string()))?;
        let group = group.trim();
        let values: Vec<FacetValueId> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(FacetValueId::from)
            .collect();

        if group.is_empty() || values.is_empty() {
            return Err(CatalogError::InvalidFilter(arg.to_string()));
        }
        Ok((FacetId::new(group), values))
    }

    /// Check if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups with at least one selected value.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Total number of selected values across all groups.
    pub fn active_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Selected values for a group.
    pub fn values(&self, group: &FacetId) -> Option<&BTreeSet<FacetValueId>> {
        self.groups.get(group)
    }

    pub fn is_selected(&self, group: &FacetId, value: &FacetValueId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|values| values.contains(value))
    }

    /// Iterate over `(group, selected values)` in group order.
    pub fn iter(&self) -> impl Iterator<Item = (&FacetId, &BTreeSet<FacetValueId>)> {
        self.groups.iter()
    }

    /// Select the value if unselected, otherwise unselect it.
    pub fn toggle(&self, group: &FacetId, value: &FacetValueId) -> Self {
        if self.is_selected(group, value) {
            self.without_value(group, value)
        } else {
            self.with_value(group, value)
        }
    }

    /// Select a value; selecting an already-selected value is a no-op.
    pub fn with_value(&self, group: &FacetId, value: &FacetValueId) -> Self {
        let mut next = self.clone();
        next.insert(group.clone(), value.clone());
        next
    }

    /// Unselect a value, dropping the group once it has no values left.
    pub fn without_value(&self, group: &FacetId, value: &FacetValueId) -> Self {
        let mut next = self.clone();
        if let Some(values) = next.groups.get_mut(group) {
            values.remove(value);
            if values.is_empty() {
                next.groups.remove(group);
            }
        }
        next
    }

    pub(crate) fn insert(&mut self, group: FacetId, value: FacetValueId) {
        self.groups.entry(group).or_default().insert(value);
    }
}

impl FromIterator<(FacetId, FacetValueId)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (FacetId, FacetValueId)>>(iter: I) -> Self {
        let mut state = FilterState::new();
        for (group, value) in iter {
            state.insert(group, value);
        }
        state
    }
}
