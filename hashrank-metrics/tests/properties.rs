/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Whole-pipeline properties of the Hamming surrogate and mAP computation.

use hashrank_metrics::{hamming, mean_average_precision, quantize};
use hashrank_utils::views::{Matrix, MatrixView};
use rand::{Rng, SeedableRng, rngs::StdRng};

const EPSILON: f64 = 1e-6;

fn random_bipolar(rng: &mut StdRng, nrows: usize, ncols: usize) -> Matrix<f32> {
    Matrix::from_fn(nrows, ncols, |_, _| {
        if rng.random_bool(0.5) { 1.0 } else { -1.0 }
    })
}

fn random_labels(rng: &mut StdRng, nrows: usize, classes: usize) -> Matrix<f32> {
    Matrix::from_fn(nrows, classes, |_, _| {
        if rng.random_bool(0.3) { 1.0 } else { 0.0 }
    })
}

fn relevant_counts(query_labels: MatrixView<'_, f32>, retrieval_labels: MatrixView<'_, f32>) -> Vec<usize> {
    query_labels
        .row_iter()
        .map(|q| {
            retrieval_labels
                .row_iter()
                .filter(|r| q.iter().zip(r.iter()).map(|(x, y)| x * y).sum::<f32>() > 0.0)
                .count()
        })
        .collect()
}

#[test]
fn map_stays_in_unit_interval() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bits = 16;
        let num_query = 1 + rng.random_range(0..20);
        let num_retrieval = 1 + rng.random_range(0..50);

        let query_codes = random_bipolar(&mut rng, num_query, bits);
        let retrieval_codes = random_bipolar(&mut rng, num_retrieval, bits);
        let query_labels = random_labels(&mut rng, num_query, 5);
        let retrieval_labels = random_labels(&mut rng, num_retrieval, 5);

        for k in [None, Some(0), Some(1), Some(num_retrieval / 2), Some(num_retrieval)] {
            let map = mean_average_precision(
                query_codes.as_view(),
                retrieval_codes.as_view(),
                query_labels.as_view(),
                retrieval_labels.as_view(),
                k,
            )
            .unwrap();
            assert!((0.0..=1.0).contains(&map), "seed {seed}, k {k:?}, map {map}");
        }
    }
}

#[test]
fn distances_stay_in_code_length_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let bits = 24;
    let a = random_bipolar(&mut rng, 15, bits);
    let b = random_bipolar(&mut rng, 40, bits);

    let distances = hamming::distance_matrix(a.as_view(), b.as_view()).unwrap();
    for &d in distances.as_slice() {
        assert!((0.0..=bits as f32).contains(&d), "distance {d}");
    }

    let self_distances = hamming::distance_matrix(a.as_view(), a.as_view()).unwrap();
    for i in 0..a.nrows() {
        assert_eq!(self_distances[(i, i)], 0.0, "diagonal entry {i}");
    }
}

#[test]
fn perfect_ranking_scores_one() {
    // Every query shares its code with the relevant items and is bitwise
    // complementary to the irrelevant ones, so all relevant items rank first.
    let bits = 16;
    let code: Vec<f32> = (0..bits).map(|i| if i % 3 == 0 { -1.0 } else { 1.0 }).collect();
    let complement: Vec<f32> = code.iter().map(|x| -x).collect();

    let num_query = 5;
    let num_relevant = 4;
    let num_irrelevant = 6;

    let query_codes = Matrix::from_fn(num_query, bits, |_, col| code[col]);
    let query_labels = Matrix::from_fn(num_query, 2, |_, col| if col == 0 { 1.0 } else { 0.0 });
    let retrieval_codes = Matrix::from_fn(num_relevant + num_irrelevant, bits, |row, col| {
        if row < num_relevant { code[col] } else { complement[col] }
    });
    let retrieval_labels = Matrix::from_fn(num_relevant + num_irrelevant, 2, |row, col| {
        let class = usize::from(row >= num_relevant);
        if col == class { 1.0 } else { 0.0 }
    });

    let map = mean_average_precision(
        query_codes.as_view(),
        retrieval_codes.as_view(),
        query_labels.as_view(),
        retrieval_labels.as_view(),
        None,
    )
    .unwrap();
    assert!((map - 1.0).abs() < EPSILON, "map = {map}");
}

#[test]
fn disjoint_labels_score_zero() {
    let mut rng = StdRng::seed_from_u64(11);
    let query_codes = random_bipolar(&mut rng, 6, 16);
    let retrieval_codes = random_bipolar(&mut rng, 30, 16);

    // Queries live entirely in class 0, retrieval items entirely in class 1.
    let query_labels = Matrix::from_fn(6, 2, |_, col| if col == 0 { 1.0 } else { 0.0 });
    let retrieval_labels = Matrix::from_fn(30, 2, |_, col| if col == 1 { 1.0 } else { 0.0 });

    let map = mean_average_precision(
        query_codes.as_view(),
        retrieval_codes.as_view(),
        query_labels.as_view(),
        retrieval_labels.as_view(),
        None,
    )
    .unwrap();
    assert_eq!(map, 0.0);
}

#[test]
fn truncation_matches_full_ap_past_relevant_count() {
    let mut rng = StdRng::seed_from_u64(23);
    let num_retrieval = 40;
    let query_codes = random_bipolar(&mut rng, 10, 16);
    let retrieval_codes = random_bipolar(&mut rng, num_retrieval, 16);
    let query_labels = random_labels(&mut rng, 10, 4);
    let retrieval_labels = random_labels(&mut rng, num_retrieval, 4);

    let run = |k| {
        mean_average_precision(
            query_codes.as_view(),
            retrieval_codes.as_view(),
            query_labels.as_view(),
            retrieval_labels.as_view(),
            k,
        )
        .unwrap()
    };

    let full = run(None);
    let max_relevant = relevant_counts(query_labels.as_view(), retrieval_labels.as_view())
        .into_iter()
        .max()
        .unwrap();

    // Once k covers every query's relevant count, truncation is a no-op.
    for k in max_relevant.max(1)..=num_retrieval {
        assert_eq!(run(Some(k)).to_bits(), full.to_bits(), "k = {k}");
    }
}

#[test]
fn reruns_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(31);
    let query_codes = random_bipolar(&mut rng, 12, 16);
    // Force heavy distance ties: only 4 distinct codes among 48 items.
    let retrieval_codes = Matrix::from_fn(48, 16, |row, col| {
        if (row % 4 + col) % 2 == 0 { 1.0 } else { -1.0 }
    });
    let query_labels = random_labels(&mut rng, 12, 3);
    let retrieval_labels = random_labels(&mut rng, 48, 3);

    let run = || {
        mean_average_precision(
            query_codes.as_view(),
            retrieval_codes.as_view(),
            query_labels.as_view(),
            retrieval_labels.as_view(),
            Some(20),
        )
        .unwrap()
    };

    let first = run();
    for _ in 0..5 {
        assert_eq!(run().to_bits(), first.to_bits());
    }
}

#[test]
fn quantized_embeddings_flow_through() {
    // Real-valued embeddings, sign-quantized the way the encode step would.
    let mut rng = StdRng::seed_from_u64(47);
    let query_embeddings = Matrix::from_fn(8, 32, |_, _| rng.random_range(-1.0f32..1.0));
    let retrieval_embeddings = Matrix::from_fn(64, 32, |_, _| rng.random_range(-1.0f32..1.0));

    let query_codes = quantize::sign(query_embeddings.as_view());
    let retrieval_codes = quantize::sign(retrieval_embeddings.as_view());
    assert!(query_codes.as_slice().iter().all(|&x| x == 1.0 || x == -1.0));

    let query_labels = random_labels(&mut rng, 8, 4);
    let retrieval_labels = random_labels(&mut rng, 64, 4);

    let map = mean_average_precision(
        query_codes.as_view(),
        retrieval_codes.as_view(),
        query_labels.as_view(),
        retrieval_labels.as_view(),
        None,
    )
    .unwrap();
    assert!((0.0..=1.0).contains(&map), "map = {map}");
}
