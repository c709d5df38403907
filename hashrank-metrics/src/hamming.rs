/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use hashrank_utils::views::{Matrix, MatrixView};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HammingError {
    #[error("left codes have {0} bits per code but right codes have {1}")]
    CodeLengthMismatch(usize, usize),
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Compute the pairwise Hamming-distance surrogate between two sets of bipolar
/// codes.
///
/// Entry `(i, j)` of the result is `0.5 * (D - <a_i, b_j>)` where `D` is the
/// number of bits per code. For strictly bipolar (±1) codes this is the exact
/// Hamming distance: each agreeing bit adds 1 to the inner product and each
/// disagreeing bit subtracts 1, so the distance ranges from 0 (identical) to
/// `D` (bitwise complementary).
///
/// Near-bipolar floating inputs are not rounded or clamped; the formula's value
/// is propagated as-is and acts as a generalized similarity-based distance.
///
/// A single code can be compared against a set by promoting it with
/// [`MatrixView::row_vector`].
pub fn distance_matrix(
    codes_a: MatrixView<'_, f32>,
    codes_b: MatrixView<'_, f32>,
) -> Result<Matrix<f32>, HammingError> {
    let bits = codes_b.ncols();
    if codes_a.ncols() != bits {
        return Err(HammingError::CodeLengthMismatch(codes_a.ncols(), bits));
    }

    Ok(Matrix::from_fn(codes_a.nrows(), codes_b.nrows(), |i, j| {
        0.5 * (bits as f32 - dot(codes_a.row(i), codes_b.row(j)))
    }))
}

///////////
// Tests //
///////////
