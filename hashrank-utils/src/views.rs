/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::ops::Index;

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use thiserror::Error;

/// Abstraction over owned and borrowed dense storage backing a matrix.
///
/// Implementations must return the same slice (same base, same length) on every
/// call to [`Self::as_slice`]. Row accessors use checked slicing, so violating
/// this requirement yields panics or wrong rows, never unsoundness.
pub trait DenseData {
    type Elem;

    /// Return the underlying data as a slice.
    fn as_slice(&self) -> &[Self::Elem];
}

impl<T> DenseData for &[T] {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

impl<T> DenseData for Box<[T]> {
    type Elem = T;
    fn as_slice(&self) -> &[Self::Elem] {
        self
    }
}

/// A view over a dense chunk of memory, interpreting that memory as a
/// 2-dimensional matrix laid out in row-major order.
///
/// When this type views immutable memory, it is `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBase<T>
where
    T: DenseData,
{
    data: T,
    nrows: usize,
    ncols: usize,
}

/// Represents an owning, 2-dimensional view of a contiguous block of memory,
/// interpreted as a matrix in row-major order.
pub type Matrix<T> = MatrixBase<Box<[T]>>;

/// Represents a non-owning, 2-dimensional view of a contiguous block of memory,
/// interpreted as a matrix in row-major order.
///
/// Functions that only need to read matrix data should accept a `MatrixView` so
/// that they work over both owned matrices and existing borrows.
pub type MatrixView<'a, T> = MatrixBase<&'a [T]>;

#[derive(Debug, Error)]
#[non_exhaustive]
#[error(
    "tried to construct a matrix view with {nrows} rows and {ncols} columns over a slice \
     of length {len}"
)]
pub struct TryFromError {
    len: usize,
    nrows: usize,
    ncols: usize,
}

impl<T> MatrixBase<T>
where
    T: DenseData,
{
    /// Try to construct a `MatrixBase` over the provided base.
    ///
    /// The length of the base must be equal to `nrows * ncols`.
    pub fn try_from(data: T, nrows: usize, ncols: usize) -> Result<Self, TryFromError> {
        let len = data.as_slice().len();
        if len != nrows * ncols {
            Err(TryFromError { len, nrows, ncols })
        } else {
            Ok(Self { data, nrows, ncols })
        }
    }

    /// Construct a new `MatrixBase` over the raw data.
    ///
    /// The returned `MatrixBase` has a single row with contents equal to `data`.
    pub fn row_vector(data: T) -> Self {
        let ncols = data.as_slice().len();
        Self {
            data,
            nrows: 1,
            ncols,
        }
    }

    /// Return the number of rows in the matrix.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return the number of columns in the matrix.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the underlying data as a flat slice.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[T::Elem] {
        assert!(
            row < self.nrows(),
            "tried to access row {row} of a matrix with {} rows",
            self.nrows()
        );
        let start = row * self.ncols;
        &self.as_slice()[start..start + self.ncols]
    }

    /// Return row `row` if `row < self.nrows()`. Otherwise, return `None`.
    pub fn get_row(&self, row: usize) -> Option<&[T::Elem]> {
        (row < self.nrows()).then(|| self.row(row))
    }

    /// Return an iterator over all rows in the matrix.
    ///
    /// Rows are yielded sequentially beginning with row 0. A zero-column
    /// matrix still yields `nrows` rows, each an empty slice.
    pub fn row_iter(&self) -> impl ExactSizeIterator<Item = &[T::Elem]> {
        let data = self.as_slice();
        let ncols = self.ncols;
        (0..self.nrows).map(move |row| &data[row * ncols..(row + 1) * ncols])
    }

    /// Return a parallel iterator over the rows of the matrix.
    ///
    /// A zero-column matrix still yields `nrows` rows, each an empty slice.
    #[cfg(feature = "rayon")]
    pub fn par_row_iter(&self) -> impl IndexedParallelIterator<Item = &[T::Elem]>
    where
        T::Elem: Sync,
    {
        let data = self.as_slice();
        let ncols = self.ncols;
        (0..self.nrows)
            .into_par_iter()
            .map(move |row| &data[row * ncols..(row + 1) * ncols])
    }

    /// Return a view over the matrix.
    pub fn as_view(&self) -> MatrixView<'_, T::Elem> {
        MatrixBase {
            data: self.as_slice(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Copy the viewed data into an owning matrix.
    pub fn to_owned(&self) -> Matrix<T::Elem>
    where
        T::Elem: Clone,
    {
        Matrix {
            data: self.as_slice().into(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T> Matrix<T> {
    /// Construct a matrix whose entry `(row, col)` is `f(row, col)`.
    ///
    /// Entries are initialized in memory (row-major) order.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        // The range is empty when `ncols == 0`, so the division is safe.
        let data: Box<[T]> = (0..nrows * ncols).map(|i| f(i / ncols, i % ncols)).collect();
        Self { data, nrows, ncols }
    }

    /// Construct a matrix with every entry equal to `value`.
    pub fn filled(value: T, nrows: usize, ncols: usize) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; nrows * ncols].into_boxed_slice(),
            nrows,
            ncols,
        }
    }
}

/// Return a reference to the item at entry `(row, col)` in the matrix.
///
/// # Panics
///
/// Panics if `row >= self.nrows()` or `col >= self.ncols()`.
impl<T> Index<(usize, usize)> for MatrixBase<T>
where
    T: DenseData,
{
    type Output = T::Elem;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            col < self.ncols(),
            "col {col} is out of bounds (max: {})",
            self.ncols()
        );
        &self.row(row)[col]
    }
}

///////////
// Tests //
///////////
