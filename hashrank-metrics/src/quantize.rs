/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use hashrank_utils::views::{Matrix, MatrixView};

/// Sign-quantize real-valued embeddings into bipolar codes.
///
/// Strictly negative entries map to -1 and everything else maps to +1, so the
/// output is always a valid bipolar code even when an embedding coordinate
/// lands exactly on zero.
pub fn sign(embeddings: MatrixView<'_, f32>) -> Matrix<f32> {
    Matrix::from_fn(embeddings.nrows(), embeddings.ncols(), |row, col| {
        if embeddings[(row, col)] < 0.0 { -1.0 } else { 1.0 }
    })
}

///////////
// Tests //
///////////
