//! Query Invariant Tests
//!
//! Properties of the filter engine and aggregations that must hold for any
//! valid filter chain:
//! - Filtering only ever narrows the dataset
//! - Exact matching selects a subset of substring matching
//! - Reapplying a satisfied filter changes nothing
//! - Statistics agree with hand-computed values

use mandi_api::data::{Attribute, DataStore, Record};
use mandi_api::query::{
    narrow, Filter, FilterEngine, MatchMode, PathPair, QueryRefinement, StatsAggregator,
    UniqueValuesIndex,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn fixture() -> DataStore {
    DataStore::from_records(vec![
        Record::new("Karnataka", "Bangalore", "Central Market", "Rice", 40.0, 52.0, 47.0),
        Record::new("Karnataka", "Mysore", "Bandipalya", "Rice", 38.0, 46.0, 42.0),
        Record::new("Karnataka", "Bangalore", "Binny Mill", "Tomato", 8.0, 14.0, 11.0),
        Record::new("Kerala", "Kollam", "Kottarakkara", "Banana", 35.0, 37.0, 36.0),
        Record::new("Kerala", "Ernakulam", "Perumbavoor", "Rice", 39.0, 43.0, 41.0),
        Record::new("Tamil Nadu", "Madurai", "Madurai Central Market", "Brown Rice", 30.0, 34.0, 32.0),
        Record::new("Punjab", "Ludhiana", "Khanna", "Wheat", 22.0, 23.0, 22.5),
    ])
}

/// Filter chains exercised by the property tests
fn chains() -> Vec<Vec<PathPair>> {
    vec![
        vec![PathPair::full("state", "karnataka")],
        vec![PathPair::full("state", "ka")],
        vec![PathPair::full("commodity", "rice")],
        vec![PathPair::full("market", "central market")],
        vec![PathPair::full("state", "kerala"), PathPair::full("commodity", "Rice")],
        vec![
            PathPair::full("state", "a"),
            PathPair::full("district", "a"),
            PathPair::full("commodity", "rice"),
        ],
        vec![
            PathPair::full("state", "Karnataka"),
            PathPair::full("district", "Bangalore"),
            PathPair::full("commodity", "Tomato"),
            PathPair::full("market", "Binny Mill"),
        ],
    ]
}

fn contains_all(superset: &[&Record], subset: &[&Record]) -> bool {
    subset
        .iter()
        .all(|r| superset.iter().any(|s| std::ptr::eq(*s, *r)))
}

// =============================================================================
// Subset Properties
// =============================================================================

/// Every filter chain yields a subset of the full dataset, in load order.
#[test]
fn test_filtering_narrows_dataset() {
    let store = fixture();
    let engine = FilterEngine::new(&store);
    let all = engine.all();

    for chain in chains() {
        let result = engine.general(&chain, &QueryRefinement::default()).unwrap();
        assert!(result.len() <= all.len());
        assert!(contains_all(&all, &result));

        let positions: Vec<usize> = result
            .iter()
            .map(|r| all.iter().position(|s| std::ptr::eq(*s, *r)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

/// Exact matching never selects a record substring matching would not.
#[test]
fn test_exact_is_subset_of_substring() {
    let store = fixture();
    let engine = FilterEngine::new(&store);

    for chain in chains() {
        let substring = engine.general(&chain, &QueryRefinement::default()).unwrap();
        let exact = engine.strict(&chain).unwrap();
        assert!(contains_all(&substring, &exact), "chain {:?}", chain);
    }
}

#[test]
fn test_exact_can_be_strictly_smaller() {
    let store = fixture();
    let engine = FilterEngine::new(&store);
    let chain = vec![PathPair::full("commodity", "rice")];

    let substring = engine.general(&chain, &QueryRefinement::default()).unwrap();
    let exact = engine.strict(&chain).unwrap();
    assert_eq!(substring.len(), 4);
    assert_eq!(exact.len(), 3);
}

/// The query-string layer only narrows the path result.
#[test]
fn test_refinement_narrows_path_result() {
    let store = fixture();
    let engine = FilterEngine::new(&store);
    let chain = vec![PathPair::full("commodity", "rice")];

    let refinement = QueryRefinement {
        state: Some("KARNATAKA".to_string()),
        ..Default::default()
    };

    let unrefined = engine.general(&chain, &QueryRefinement::default()).unwrap();
    let refined = engine.general(&chain, &refinement).unwrap();
    assert!(contains_all(&unrefined, &refined));
    assert_eq!(refined.len(), 2);
}

// =============================================================================
// Idempotence
// =============================================================================

/// Applying a filter to its own output changes nothing.
#[test]
fn test_reapplying_filter_is_idempotent() {
    let store = fixture();
    let engine = FilterEngine::new(&store);

    for chain in chains() {
        let filters = Filter::from_path_pairs(&chain).unwrap();
        for mode in [MatchMode::Substring, MatchMode::Exact] {
            let once = engine.apply(&filters, mode);
            let twice = narrow(once.clone(), &filters, mode);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn test_duplicated_pair_matches_single_pair() {
    let store = fixture();
    let engine = FilterEngine::new(&store);

    let single = vec![PathPair::full("state", "kerala")];
    let doubled = vec![
        PathPair::full("state", "kerala"),
        PathPair::full("state", "kerala"),
    ];

    let refinement = QueryRefinement::default();
    assert_eq!(
        engine.general(&single, &refinement).unwrap(),
        engine.general(&doubled, &refinement).unwrap()
    );
}

// =============================================================================
// Validation
// =============================================================================

/// An invalid type anywhere in the chain rejects the whole request.
#[test]
fn test_invalid_type_rejected_before_filtering() {
    let store = fixture();
    let engine = FilterEngine::new(&store);

    let chain = vec![PathPair::full("state", "Kerala"), PathPair::full("grade", "FAQ")];
    assert!(engine.general(&chain, &QueryRefinement::default()).is_err());
    assert!(engine.strict(&chain).is_err());
}

#[test]
fn test_attribute_names_round_trip() {
    for attribute in Attribute::ALL {
        assert_eq!(attribute.as_str().parse::<Attribute>().unwrap(), attribute);
    }
}

// =============================================================================
// Aggregations
// =============================================================================

#[test]
fn test_stats_against_hand_computed_values() {
    let store = fixture();
    let stats = StatsAggregator::for_commodity(&store, Some("rice")).unwrap();

    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.price_stats.min_price, 38.0);
    assert_eq!(stats.price_stats.max_price, 52.0);
    assert_eq!(stats.price_stats.avg_modal_price, (47.0 + 42.0 + 41.0) / 3.0);
    assert_eq!(stats.statewise.states(), vec!["Karnataka", "Kerala"]);
}

#[test]
fn test_top_markets_do_not_reorder_groups() {
    let store = fixture();
    let stats = StatsAggregator::for_commodity(&store, None).unwrap();

    assert_eq!(stats.top_markets.len(), 5);
    assert!(stats
        .top_markets
        .windows(2)
        .all(|w| w[0].modal_price >= w[1].modal_price));
    assert_eq!(
        stats.statewise.states(),
        vec!["Karnataka", "Kerala", "Tamil Nadu", "Punjab"]
    );
    assert_eq!(
        stats.unique_commodities,
        vec!["Rice", "Tomato", "Banana", "Brown Rice", "Wheat"]
    );
}

#[test]
fn test_unique_values_have_no_duplicates() {
    let store = fixture();
    let unique = UniqueValuesIndex::compute(&store);

    for values in [&unique.states, &unique.districts, &unique.commodities, &unique.markets] {
        let mut sorted = values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), values.len());
    }
    assert_eq!(unique.districts.len(), 6);
}
