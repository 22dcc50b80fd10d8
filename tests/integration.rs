//! End-to-end behavior across the container API: construction
//! diagnostics, lockstep maintenance, multiset identities of the
//! partitioning operations, and weighted sampling convergence.

use std::cmp::Ordering;

use muestra::{Dataset, Error, Labeled, Row, Unlabeled, Value, ValueKind};

fn ints(data: &[&[i64]]) -> Vec<Row> {
    data.iter()
        .map(|row| row.iter().map(|&v| Value::Int(v)).collect())
        .collect()
}

fn labels(data: &[i64]) -> Vec<Value> {
    data.iter().map(|&v| Value::Int(v)).collect()
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

// The worked example from the documentation: four rows, two classes.
fn reference_dataset() -> Labeled {
    Labeled::new(
        ints(&[&[1, 2], &[3, 4], &[5, 6], &[7, 8]]),
        labels(&[0, 1, 0, 1]),
    )
    .expect("reference dataset")
}

#[test]
fn test_reference_example_stratify() {
    let strata = reference_dataset().stratify().expect("stratify");
    assert_eq!(strata.len(), 2);

    let (label, stratum) = &strata[0];
    assert_eq!(label, &Value::Int(0));
    assert_eq!(stratum.rows(), &ints(&[&[1, 2], &[5, 6]])[..]);
    assert_eq!(stratum.labels(), &labels(&[0, 0])[..]);

    let (label, stratum) = &strata[1];
    assert_eq!(label, &Value::Int(1));
    assert_eq!(stratum.rows(), &ints(&[&[3, 4], &[7, 8]])[..]);
}

#[test]
fn test_reference_example_split_half() {
    let (front, back) = reference_dataset().split(0.5).expect("split");
    assert_eq!(front.rows(), &ints(&[&[1, 2], &[3, 4]])[..]);
    assert_eq!(front.labels(), &labels(&[0, 1])[..]);
    assert_eq!(back.rows(), &ints(&[&[5, 6], &[7, 8]])[..]);
    assert_eq!(back.labels(), &labels(&[0, 1])[..]);
}

#[test]
fn test_reference_example_head() {
    let head = reference_dataset().head(2).expect("head");
    assert_eq!(head.rows(), &ints(&[&[1, 2], &[3, 4]])[..]);
    assert_eq!(head.labels(), &labels(&[0, 1])[..]);

    assert!(reference_dataset().head(0).is_err());
}

#[test]
fn test_construction_reports_offending_offsets() {
    let result = Unlabeled::new(vec![
        vec![Value::Int(1), Value::Int(2)],
        vec![Value::Int(3), Value::Int(4)],
        vec![Value::Int(5)],
    ]);
    assert!(matches!(
        result,
        Err(Error::RaggedRow {
            row: 2,
            expected: 2,
            actual: 1
        })
    ));

    let result = Unlabeled::new(vec![
        vec![Value::Int(1), Value::from("x")],
        vec![Value::Int(2), Value::Float(0.5)],
    ]);
    assert!(matches!(
        result,
        Err(Error::TypeMismatch {
            row: 1,
            column: 1,
            expected: ValueKind::Categorical,
            actual: ValueKind::Continuous
        })
    ));
}

#[test]
fn test_lockstep_through_operation_chain() {
    // First cell always equals 100x the label so any desync shows up.
    let rows: Vec<Row> = (0..20)
        .map(|i| vec![Value::Int(i * 100), Value::Int(i)])
        .collect();
    let class_labels: Vec<Value> = (0..20).map(Value::Int).collect();
    let mut dataset = Labeled::new(rows, class_labels).expect("dataset");

    dataset.randomize(Some(11));
    dataset.sort_by_column(1, true).expect("sort");
    let mut front = dataset.take(12).expect("take");
    front.randomize(Some(12));
    let batches = front.batch(5).expect("batch");

    for batch in batches {
        for (row, label) in batch.rows().iter().zip(batch.labels()) {
            let Value::Int(class) = label else {
                panic!("label kind changed");
            };
            assert_eq!(row[0], Value::Int(class * 100));
        }
    }
}

#[test]
fn test_split_then_merge_is_identity() {
    let dataset = reference_dataset();
    for ratio in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let (front, back) = dataset.split(ratio).expect("split");
        let rebuilt = front.merge(&back).expect("merge");
        assert_eq!(rebuilt, dataset);
    }
}

#[test]
fn test_stratify_then_concatenate_is_multiset_identity() {
    let dataset = Labeled::new(
        ints(&[&[1], &[2], &[3], &[4], &[5], &[6], &[7]]),
        labels(&[0, 1, 2, 0, 1, 2, 0]),
    )
    .expect("dataset");

    let mut rebuilt = Labeled::new(vec![], vec![]).expect("empty");
    for (_, stratum) in dataset.stratify().expect("stratify") {
        rebuilt = rebuilt.merge(&stratum).expect("merge");
    }

    assert_eq!(rebuilt.len(), dataset.len());
    assert_eq!(sorted_rows(&rebuilt), sorted_rows(&dataset));
}

#[test]
fn test_stratified_split_preserves_proportions() {
    // 12 of class 0, 6 of class 1.
    let rows: Vec<Row> = (0..18).map(|i| vec![Value::Int(i)]).collect();
    let class_labels: Vec<Value> = (0..18).map(|i| Value::Int(i % 3 / 2)).collect();
    let dataset = Labeled::new(rows, class_labels).expect("dataset");

    let (left, right) = dataset.stratified_split(0.5).expect("split");
    for side in [&left, &right] {
        let zeros = side
            .labels()
            .iter()
            .filter(|l| **l == Value::Int(0))
            .count();
        let ones = side.labels().len() - zeros;
        assert_eq!(zeros, 6);
        assert_eq!(ones, 3);
    }
}

#[test]
fn test_stratified_fold_proportions() {
    // 9 of class "a", 6 of class "b", 3 folds.
    let rows: Vec<Row> = (0..15).map(|i| vec![Value::Int(i)]).collect();
    let class_labels: Vec<Value> = (0..15)
        .map(|i| Value::from(if i < 9 { "a" } else { "b" }))
        .collect();
    let dataset = Labeled::new(rows, class_labels).expect("dataset");

    let folds = dataset.stratified_fold(3).expect("fold");
    assert_eq!(folds.len(), 3);
    for fold in &folds {
        assert_eq!(fold.len(), 5);
        let a = fold
            .labels()
            .iter()
            .filter(|l| **l == Value::from("a"))
            .count();
        assert_eq!(a, 3);
    }
}

#[test]
fn test_deduplicate_is_idempotent() {
    let mut dataset = Unlabeled::new(ints(&[
        &[1, 1],
        &[2, 2],
        &[1, 1],
        &[3, 3],
        &[2, 2],
        &[1, 1],
    ]))
    .expect("dataset");

    dataset.deduplicate();
    let once = dataset.clone();
    dataset.deduplicate();
    assert_eq!(dataset, once);
    assert_eq!(dataset.len(), 3);
}

#[test]
fn test_equal_weights_sample_roughly_uniformly() {
    let dataset = Unlabeled::new(ints(&[&[0], &[1], &[2], &[3]])).expect("dataset");
    let draws = 40_000;
    let subset = dataset
        .random_weighted_subset_with_replacement(draws, &[1.0; 4], Some(5))
        .expect("subset");

    let mut counts = [0usize; 4];
    for row in subset.rows() {
        let Value::Int(v) = row[0] else {
            panic!("unexpected value");
        };
        counts[usize::try_from(v).expect("index")] += 1;
    }

    let expected = draws / 4;
    for count in counts {
        let deviation = count.abs_diff(expected) as f64 / expected as f64;
        assert!(deviation < 0.05, "count {count} too far from {expected}");
    }
}

#[test]
fn test_split_by_categorical_column_is_exact_partition() {
    let rows = vec![
        vec![Value::from("red"), Value::Int(1)],
        vec![Value::from("blue"), Value::Int(2)],
        vec![Value::from("red"), Value::Int(3)],
        vec![Value::from("green"), Value::Int(4)],
    ];
    let dataset = Unlabeled::new(rows).expect("dataset");

    let (matching, rest) = dataset
        .split_by_column(0, &Value::from("red"))
        .expect("partition");
    assert_eq!(matching.len(), 2);
    assert_eq!(rest.len(), 2);
    for row in matching.rows() {
        assert_eq!(row[0], Value::from("red"));
    }
    for row in rest.rows() {
        assert_ne!(row[0], Value::from("red"));
    }

    let whole = matching.merge(&rest).expect("merge");
    assert_eq!(sorted_rows(&whole), sorted_rows(&dataset));
}

#[test]
fn test_fold_sources_are_disjoint() {
    let dataset = Unlabeled::new(ints(&[&[1], &[2], &[3], &[4], &[5], &[6]])).expect("dataset");
    let folds = dataset.fold(3).expect("fold");

    let mut rebuilt = Unlabeled::new(vec![]).expect("empty");
    for fold in &folds {
        rebuilt = rebuilt.merge(fold).expect("merge");
    }
    let mut check = rebuilt.clone();
    check.deduplicate();
    assert_eq!(check.len(), rebuilt.len());
    assert_eq!(rebuilt.len(), 6);
}

#[test]
fn test_randomize_unseeded_still_permutes() {
    let mut dataset = Unlabeled::new(ints(&[&[1], &[2], &[3], &[4], &[5]])).expect("dataset");
    let original = dataset.clone();
    dataset.randomize(None);
    assert_eq!(sorted_rows(&dataset), sorted_rows(&original));
}
