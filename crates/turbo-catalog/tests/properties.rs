//! Property tests for facet reduction and the filter codec.

use std::collections::HashMap;

use proptest::prelude::*;
use turbo_catalog::prelude::*;

fn arb_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("g[0-4]", "v[0-9]"), 0..20)
}

fn to_state(pairs: &[(String, String)]) -> FilterState {
    pairs
        .iter()
        .map(|(g, v)| (FacetId::new(g.as_str()), FacetValueId::new(format!("{}-{}", g, v))))
        .collect()
}

/// Catalogue containing every group and value `arb_pairs` can produce.
fn full_catalog() -> FacetCatalog {
    let groups = (0..5)
        .map(|g| FacetGroup {
            id: FacetId::new(format!("g{}", g)),
            name: format!("Group {}", g),
            code: format!("group-{}", g),
            values: (0..10)
                .map(|v| FacetValue {
                    id: FacetValueId::new(format!("g{}-v{}", g, v)),
                    name: format!("Value {} of {}", v, g),
                    code: format!("value-{}-{}", g, v),
                })
                .collect(),
        })
        .collect();
    FacetCatalog::new(groups)
}

fn raw(value: &str, facet: &str, count: u32) -> FacetValueResult {
    FacetValueResult {
        facet_value: FacetValueRef {
            id: FacetValueId::new(value),
            name: value.to_string(),
            code: value.to_string(),
            facet: FacetParent {
                id: FacetId::new(facet),
                name: facet.to_string(),
                code: facet.to_string(),
            },
        },
        count,
    }
}

proptest! {
    #[test]
    fn codec_round_trip(pairs in arb_pairs()) {
        let state = to_state(&pairs);
        let query = encode_filters(&state, &QueryParams::parse("slug=boards&sort=price-desc"));
        let reparsed = QueryParams::parse(&query.to_query_string());

        prop_assert_eq!(decode_filters(&reparsed, &full_catalog()), state);
    }

    #[test]
    fn toggle_twice_restores_state(pairs in arb_pairs(), g in "g[0-4]", v in "v[0-9]") {
        let state = to_state(&pairs);
        let group = FacetId::new(g.as_str());
        let value = FacetValueId::new(format!("{}-{}", g, v));

        prop_assert_eq!(state.toggle(&group, &value).toggle(&group, &value), state);
    }

    #[test]
    fn toggling_never_leaves_empty_groups(pairs in arb_pairs(), toggles in arb_pairs()) {
        let mut state = to_state(&pairs);
        for (g, v) in &toggles {
            state = state.toggle(&FacetId::new(g.as_str()), &FacetValueId::new(format!("{}-{}", g, v)));
            prop_assert!(state.iter().all(|(_, values)| !values.is_empty()));
        }
    }

    #[test]
    fn reduction_sums_counts_per_value(entries in prop::collection::vec(("f[0-3]", "[a-e]", 0u32..50), 0..40)) {
        // value ids are scoped to their facet so each id has exactly one parent
        let input: Vec<FacetValueResult> = entries
            .iter()
            .map(|(f, v, c)| raw(&format!("{}:{}", f, v), f, *c))
            .collect();
        let groups = reduce_facets(&input);

        let mut expected: HashMap<String, u32> = HashMap::new();
        for (f, v, c) in &entries {
            *expected.entry(format!("{}:{}", f, v)).or_default() += c;
        }

        let mut seen = 0;
        for group in &groups {
            prop_assert!(!group.values.is_empty());
            for value in &group.values {
                prop_assert!(value.id.as_str().starts_with(group.id.as_str()));
                prop_assert_eq!(Some(&value.count), expected.get(value.id.as_str()));
                seen += 1;
            }
        }
        prop_assert_eq!(seen, expected.len());
    }

    #[test]
    fn reduction_preserves_first_seen_order(entries in prop::collection::vec("[a-h]", 0..30)) {
        let input: Vec<FacetValueResult> = entries.iter().map(|v| raw(v, "f", 1)).collect();
        let groups = reduce_facets(&input);

        let mut first_seen: Vec<&str> = Vec::new();
        for v in &entries {
            if !first_seen.contains(&v.as_str()) {
                first_seen.push(v);
            }
        }
        let actual: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.values.iter().map(|v| v.id.as_str()))
            .collect();
        prop_assert_eq!(actual, first_seen);
    }
}
