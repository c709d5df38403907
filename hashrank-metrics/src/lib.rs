/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Retrieval-quality metrics for learned binary hash codes.
//!
//! Given bipolar (±1) codes for a query set and a retrieval set plus their
//! label matrices, this crate ranks retrieval items per query by a
//! Hamming-distance surrogate and reports mean Average Precision, the standard
//! quality metric for approximate nearest-neighbor hash codes.

pub mod crossmodal;
pub mod hamming;
pub mod map;
pub mod quantize;

// Top level exports.
pub use crossmodal::{CrossModalReport, ModalCodes};
pub use hamming::HammingError;
pub use map::{MapError, mean_average_precision};
