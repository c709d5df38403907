/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use hashrank_utils::views::MatrixView;
use tracing::info;

use crate::map::{MapError, mean_average_precision};

/// Image and text hash codes for one split (query or retrieval) of a
/// cross-modal dataset, row-aligned with that split's label matrix.
#[derive(Debug, Clone, Copy)]
pub struct ModalCodes<'a> {
    pub image: MatrixView<'a, f32>,
    pub text: MatrixView<'a, f32>,
}

/// Mean Average Precision for the four cross-modal retrieval directions.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CrossModalReport {
    /// Query with image codes, retrieve over text codes.
    pub image_to_text: f64,
    /// Query with text codes, retrieve over image codes.
    pub text_to_image: f64,
    pub image_to_image: f64,
    pub text_to_text: f64,
}

/// Evaluate all four retrieval directions between two modalities.
///
/// Labels are shared per item across modalities, so a single label matrix per
/// split covers both code sets. `k` has the same AP@k meaning as in
/// [`mean_average_precision`].
pub fn evaluate(
    query: ModalCodes<'_>,
    retrieval: ModalCodes<'_>,
    query_labels: MatrixView<'_, f32>,
    retrieval_labels: MatrixView<'_, f32>,
    k: Option<usize>,
) -> Result<CrossModalReport, MapError> {
    let image_to_text =
        mean_average_precision(query.image, retrieval.text, query_labels, retrieval_labels, k)?;
    let text_to_image =
        mean_average_precision(query.text, retrieval.image, query_labels, retrieval_labels, k)?;
    let image_to_image =
        mean_average_precision(query.image, retrieval.image, query_labels, retrieval_labels, k)?;
    let text_to_text =
        mean_average_precision(query.text, retrieval.text, query_labels, retrieval_labels, k)?;

    info!(
        "MAP(i->t): {image_to_text:.4}, MAP(t->i): {text_to_image:.4}, \
         MAP(i->i): {image_to_image:.4}, MAP(t->t): {text_to_text:.4}"
    );

    Ok(CrossModalReport {
        image_to_text,
        text_to_image,
        image_to_image,
        text_to_text,
    })
}

///////////
// Tests //
///////////
