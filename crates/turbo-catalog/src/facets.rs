//! Facet catalogue and facet-count reduction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::{FacetId, FacetValueId};

/// A single value of a facet group (e.g., "Acme" in "Brand").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub id: FacetValueId,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// A facet group with every value the catalogue knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub id: FacetId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

impl FacetGroup {
    /// Resolve a URL value token against this group's values.
    ///
    /// Tries an exact id match first, then a case-insensitive name match.
    pub fn resolve_value(&self, token: &str) -> Option<&FacetValue> {
        self.values
            .iter()
            .find(|v| v.id.as_str() == token)
            .or_else(|| self.values.iter().find(|v| eq_ignore_case(&v.name, token)))
    }
}

/// Case-insensitive comparison that also folds non-ASCII letters.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Parent facet as embedded in a search-result facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetParent {
    pub id: FacetId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// Facet value as returned alongside search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValueRef {
    pub id: FacetValueId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub facet: FacetParent,
}

/// Raw `{facetValue, count}` annotation from a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValueResult {
    pub facet_value: FacetValueRef,
    pub count: u32,
}

/// A facet value with the number of current results carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedFacetValue {
    pub id: FacetValueId,
    pub name: String,
    pub code: String,
    pub count: u32,
}

/// A facet group with counted values, ready for a filter sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedFacetGroup {
    pub id: FacetId,
    pub name: String,
    pub code: String,
    pub values: Vec<CountedFacetValue>,
}

impl CountedFacetGroup {
    /// Total count across all values of the group.
    pub fn total_count(&self) -> u32 {
        self.values.iter().map(|v| v.count).sum()
    }
}

/// Group raw facet counts by their parent facet.
///
/// Groups appear in the order their first value appears, and values keep
/// first-seen order within a group. A value id seen more than once has its
/// counts summed into a single entry. Groups are only created for values
/// present in the input, so no group is ever empty.
pub fn reduce_facets(raw: &[FacetValueResult]) -> Vec<CountedFacetGroup> {
    let mut groups: Vec<CountedFacetGroup> = Vec::new();
    let mut group_index: HashMap<&FacetId, usize> = HashMap::new();
    let mut value_index: HashMap<&FacetValueId, (usize, usize)> = HashMap::new();

    for entry in raw {
        let value = &entry.facet_value;

        if let Some(&(g, v)) = value_index.get(&value.id) {
            let slot = &mut groups[g].values[v];
            slot.count = slot.count.saturating_add(entry.count);
            continue;
        }

        let g = *group_index.entry(&value.facet.id).or_insert_with(|| {
            groups.push(CountedFacetGroup {
                id: value.facet.id.clone(),
                name: value.facet.name.clone(),
                code: value.facet.code.clone(),
                values: Vec::new(),
            });
            groups.len() - 1
        });

        groups[g].values.push(CountedFacetValue {
            id: value.id.clone(),
            name: value.name.clone(),
            code: value.code.clone(),
            count: entry.count,
        });
        value_index.insert(&value.id, (g, groups[g].values.len() - 1));
    }

    groups
}

/// Human-readable `{group, value}` pair for a facet value id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetDescriptor {
    pub group: String,
    pub value: String,
}

/// Read-mostly catalogue of every facet group and value.
///
/// Fetched once per collection view and used to resolve URL filter tokens
/// and to describe the facet values attached to search results.
#[derive(Debug, Clone, Default)]
pub struct FacetCatalog {
    groups: Vec<FacetGroup>,
    values: HashMap<FacetValueId, (usize, usize)>,
}

impl FacetCatalog {
    /// Build a catalogue from the API's facet list.
    pub fn new(groups: Vec<FacetGroup>) -> Self {
        let mut values = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for (v, value) in group.values.iter().enumerate() {
                values.entry(value.id.clone()).or_insert((g, v));
            }
        }
        Self { groups, values }
    }

    /// An empty catalogue; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[FacetGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Find a group by id.
    pub fn group(&self, id: &FacetId) -> Option<&FacetGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Resolve a URL key to a facet group.
    ///
    /// Priority: exact id, then case-insensitive code, then case-insensitive name.
    pub fn resolve_group(&self, key: &str) -> Option<&FacetGroup> {
        self.groups
            .iter()
            .find(|g| g.id.as_str() == key)
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|g| !g.code.is_empty() && eq_ignore_case(&g.code, key))
            })
            .or_else(|| self.groups.iter().find(|g| eq_ignore_case(&g.name, key)))
    }

    /// Describe a facet value id as `{group, value}` names.
    pub fn describe(&self, id: &FacetValueId) -> Option<FacetDescriptor> {
        let &(g, v) = self.values.get(id)?;
        let group = &self.groups[g];
        Some(FacetDescriptor {
            group: group.name.clone(),
            value: group.values[v].name.clone(),
        })
    }

    /// Describe every id the catalogue knows; unknown ids are dropped.
    pub fn describe_all(&self, ids: &[FacetValueId]) -> Vec<FacetDescriptor> {
        ids.iter().filter_map(|id| self.describe(id)).collect()
    }
}
