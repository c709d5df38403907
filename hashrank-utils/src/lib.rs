/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod views;
pub use views::{Matrix, MatrixView, TryFromError};
