#![allow(clippy::unwrap_used)]
//! Property-based tests for the container invariants.
//!
//! Uses proptest to verify that construction, reordering, partitioning,
//! and weighted sampling hold their invariants across random inputs.

use std::cmp::Ordering;

use proptest::prelude::*;

use muestra::{Dataset, Labeled, Row, Unlabeled, Value, WeightedSampler};

fn int_rows(width: usize, max_rows: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        prop::collection::vec((-1000i64..1000).prop_map(Value::Int), width),
        0..max_rows,
    )
}

/// Rows whose first cell encodes the row's label times 100, so lockstep
/// violations are detectable after any reorder.
fn tagged_dataset(max_rows: usize) -> impl Strategy<Value = Labeled> {
    prop::collection::vec(-50i64..50, 1..max_rows).prop_map(|classes| {
        let rows = classes
            .iter()
            .map(|&c| vec![Value::Int(c * 100), Value::Int(c)])
            .collect();
        let labels = classes.into_iter().map(Value::Int).collect();
        Labeled::new(rows, labels).unwrap()
    })
}

fn row_cmp(a: &Row, b: &Row) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn sorted_rows<D: Dataset>(dataset: &D) -> Vec<Row> {
    let mut rows = dataset.rows().to_vec();
    rows.sort_by(row_cmp);
    rows
}

fn assert_lockstep(dataset: &Labeled) {
    for (row, label) in dataset.rows().iter().zip(dataset.labels()) {
        let Value::Int(class) = label else {
            panic!("label kind changed");
        };
        assert_eq!(row[0], Value::Int(class * 100));
    }
}

proptest! {
    /// Property: homogeneous integer rows always construct, with counts
    /// preserved
    #[test]
    fn prop_valid_rows_construct(rows in int_rows(3, 30)) {
        let n = rows.len();
        let dataset = Unlabeled::new(rows).unwrap();
        prop_assert_eq!(dataset.len(), n);
        prop_assert_eq!(dataset.columns(), if n == 0 { 0 } else { 3 });
    }

    /// Property: randomize is a permutation, never a resample
    #[test]
    fn prop_randomize_is_permutation(rows in int_rows(2, 30), seed in any::<u64>()) {
        let original = Unlabeled::new(rows).unwrap();
        let mut shuffled = original.clone();
        shuffled.randomize(Some(seed));
        prop_assert_eq!(sorted_rows(&shuffled), sorted_rows(&original));
    }

    /// Property: split sizes are exact and merging restores the dataset
    #[test]
    fn prop_split_merge_roundtrip(rows in int_rows(2, 30), ratio in 0.0f64..=1.0) {
        let dataset = Unlabeled::new(rows).unwrap();
        let (front, back) = dataset.split(ratio).unwrap();
        prop_assert_eq!(front.len(), (dataset.len() as f64 * ratio).floor() as usize);
        prop_assert_eq!(front.len() + back.len(), dataset.len());
        prop_assert_eq!(front.merge(&back).unwrap(), dataset);
    }

    /// Property: labels stay in lockstep through randomize, sort, and
    /// extraction
    #[test]
    fn prop_lockstep_survives_reorders(dataset in tagged_dataset(40), seed in any::<u64>()) {
        let mut dataset = dataset;
        dataset.randomize(Some(seed));
        assert_lockstep(&dataset);

        dataset.sort_by_label(seed % 2 == 0);
        assert_lockstep(&dataset);

        let n = (dataset.len() / 2).max(1);
        let taken = dataset.take(n).unwrap();
        assert_lockstep(&taken);
        assert_lockstep(&dataset);
    }

    /// Property: stratification conserves rows and groups purely
    #[test]
    fn prop_stratify_conserves_rows(dataset in tagged_dataset(40)) {
        let strata = dataset.stratify().unwrap();
        let total: usize = strata.iter().map(|(_, s)| s.len()).sum();
        prop_assert_eq!(total, dataset.len());

        for (label, stratum) in &strata {
            assert_lockstep(stratum);
            for l in stratum.labels() {
                prop_assert_eq!(l, label);
            }
        }
    }

    /// Property: stratified_split conserves rows across both sides
    #[test]
    fn prop_stratified_split_conserves_rows(
        dataset in tagged_dataset(40),
        ratio in 0.0f64..=1.0,
    ) {
        let (left, right) = dataset.stratified_split(ratio).unwrap();
        prop_assert_eq!(left.len() + right.len(), dataset.len());
        assert_lockstep(&left);
        assert_lockstep(&right);
    }

    /// Property: deduplication is idempotent and never grows the dataset
    #[test]
    fn prop_dedup_idempotent(rows in int_rows(1, 30)) {
        let mut dataset = Unlabeled::new(rows).unwrap();
        let before = dataset.len();
        dataset.deduplicate();
        prop_assert!(dataset.len() <= before);
        let once = dataset.clone();
        dataset.deduplicate();
        prop_assert_eq!(dataset, once);
    }

    /// Property: the sampler only ever draws rows with positive weight
    #[test]
    fn prop_sampler_respects_zero_weights(
        weights in prop::collection::vec(0.0f64..10.0, 1..50),
        seed in any::<u64>(),
    ) {
        prop_assume!(weights.iter().sum::<f64>() > 0.0);
        use rand::SeedableRng;

        let sampler = WeightedSampler::new(&weights).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for _ in 0..200 {
            let index = sampler.sample(&mut rng);
            prop_assert!(index < weights.len());
            prop_assert!(weights[index] > 0.0);
        }
    }

    /// Property: batching covers every row exactly once, in order
    #[test]
    fn prop_batches_tile_the_dataset(rows in int_rows(2, 40), n in 1usize..10) {
        let dataset = Unlabeled::new(rows).unwrap();
        prop_assume!(!dataset.is_empty());
        let batches = dataset.batch(n).unwrap();
        let flattened: Vec<Row> = batches
            .iter()
            .flat_map(|b| b.rows().iter().cloned())
            .collect();
        prop_assert_eq!(&flattened[..], dataset.rows());
    }
}
