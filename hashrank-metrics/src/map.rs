/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use hashrank_utils::views::MatrixView;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator};
use thiserror::Error;
use tracing::debug;

use crate::hamming::{self, HammingError, dot};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("query codes have {0} bits per code but retrieval codes have {1}")]
    CodeLengthMismatch(usize, usize),
    #[error("query codes have {0} rows but query labels have {1}")]
    QueryRowsMismatch(usize, usize),
    #[error("retrieval codes have {0} rows but retrieval labels have {1}")]
    RetrievalRowsMismatch(usize, usize),
    #[error("query labels have {0} classes but retrieval labels have {1}")]
    LabelClassesMismatch(usize, usize),
    #[error("mean average precision over zero queries is undefined")]
    NoQueries,
}

impl From<HammingError> for MapError {
    fn from(err: HammingError) -> Self {
        match err {
            HammingError::CodeLengthMismatch(a, b) => MapError::CodeLengthMismatch(a, b),
        }
    }
}

/// Compute the mean Average Precision of Hamming-ranked retrieval.
///
/// A retrieval item is relevant to a query when the inner product of their
/// label rows is strictly positive, i.e. they share at least one positively
/// weighted class. Retrieval items are ranked per query by ascending
/// Hamming-surrogate distance (see [`hamming::distance_matrix`]); ties keep
/// their original retrieval-set order, so results are bit-identical across
/// runs.
///
/// `k` caps the number of relevant hits scored per query at
/// `min(relevant_count, k)`, giving AP@k semantics. `None` evaluates full AP.
/// A query with no relevant items contributes an AP of 0 and still counts
/// toward the mean.
pub fn mean_average_precision(
    query_codes: MatrixView<'_, f32>,
    retrieval_codes: MatrixView<'_, f32>,
    query_labels: MatrixView<'_, f32>,
    retrieval_labels: MatrixView<'_, f32>,
    k: Option<usize>,
) -> Result<f64, MapError> {
    if query_codes.nrows() != query_labels.nrows() {
        return Err(MapError::QueryRowsMismatch(
            query_codes.nrows(),
            query_labels.nrows(),
        ));
    }
    if retrieval_codes.nrows() != retrieval_labels.nrows() {
        return Err(MapError::RetrievalRowsMismatch(
            retrieval_codes.nrows(),
            retrieval_labels.nrows(),
        ));
    }
    if query_labels.ncols() != retrieval_labels.ncols() {
        return Err(MapError::LabelClassesMismatch(
            query_labels.ncols(),
            retrieval_labels.ncols(),
        ));
    }

    let num_query = query_codes.nrows();
    if num_query == 0 {
        return Err(MapError::NoQueries);
    }

    let num_retrieval = retrieval_codes.nrows();
    let k = k.unwrap_or(num_retrieval);
    let distances = hamming::distance_matrix(query_codes, retrieval_codes)?;

    debug!(
        "mean average precision: {} queries against {} retrieval items, k = {}",
        num_query, num_retrieval, k
    );

    // Each query's AP depends only on its own distance and label rows. The
    // per-query values are collected in index order and summed sequentially,
    // so the result does not depend on rayon's reduction tree.
    let per_query: Vec<f64> = distances
        .par_row_iter()
        .zip(query_labels.par_row_iter())
        .map(|(distance_row, query_label)| {
            average_precision(distance_row, query_label, retrieval_labels, k)
        })
        .collect();

    Ok(per_query.iter().sum::<f64>() / num_query as f64)
}

/// Average Precision of a single query over its distance row.
///
/// Scans the ranking in ascending-distance order and accumulates
/// `found_so_far / position` at each relevant hit, stopping after
/// `min(relevant_count, k)` hits.
fn average_precision(
    distances: &[f32],
    query_label: &[f32],
    retrieval_labels: MatrixView<'_, f32>,
    k: usize,
) -> f64 {
    let relevant: Vec<bool> = retrieval_labels
        .row_iter()
        .map(|label| dot(query_label, label) > 0.0)
        .collect();

    let total = relevant.iter().filter(|&&r| r).count().min(k);
    if total == 0 {
        return 0.0;
    }

    // `sort_by` is stable: equal distances keep original retrieval order.
    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

    let mut found = 0usize;
    let mut sum = 0.0f64;
    for (rank, &item) in order.iter().enumerate() {
        if relevant[item] {
            found += 1;
            sum += found as f64 / (rank + 1) as f64;
            if found == total {
                break;
            }
        }
    }

    sum / total as f64
}

///////////
// Tests //
///////////
