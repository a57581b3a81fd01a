// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Row-major dense matrix.
//!
//! Used both as the storage of precomputed distance matrices and for dense
//! communication patterns where every task pair may exchange data.

use crate::error::MatrixError;

/// A `rows x cols` matrix stored row-major in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>, // len = rows * cols
}

#[inline(always)]
fn flatten_index(cols: usize, row: usize, col: usize) -> usize {
    row * cols + col
}

impl<T> DenseMatrix<T>
where
    T: Copy,
{
    /// Wraps a row-major buffer of exactly `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        let expected = rows.checked_mul(cols).ok_or(MatrixError::DimensionMismatch {
            rows,
            cols,
            expected: usize::MAX,
            found: data.len(),
        })?;
        if data.len() != expected {
            return Err(MatrixError::DimensionMismatch {
                rows,
                cols,
                expected,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a `rows x cols` matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()` or `col >= self.cols()`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.rows,
            "called `DenseMatrix::get` with row index out of bounds: the len is {} but the index is {}",
            self.rows,
            row
        );
        assert!(
            col < self.cols,
            "called `DenseMatrix::get` with column index out of bounds: the len is {} but the index is {}",
            self.cols,
            col
        );
        self.data[flatten_index(self.cols, row, col)]
    }

    /// Returns the entry at `(row, col)` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `row < self.rows()` and `col < self.cols()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.rows,
            "called `DenseMatrix::get_unchecked` with row index out of bounds: the len is {} but the index is {}",
            self.rows,
            row
        );
        debug_assert!(
            col < self.cols,
            "called `DenseMatrix::get_unchecked` with column index out of bounds: the len is {} but the index is {}",
            self.cols,
            col
        );
        unsafe { *self.data.get_unchecked(flatten_index(self.cols, row, col)) }
    }

    /// Overwrites the entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()` or `col >= self.cols()`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rows && col < self.cols,
            "called `DenseMatrix::set` with index out of bounds: the shape is {}x{} but the index is ({}, {})",
            self.rows,
            self.cols,
            row,
            col
        );
        self.data[flatten_index(self.cols, row, col)] = value;
    }

    /// Returns row `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(
            row < self.rows,
            "called `DenseMatrix::row` with row index out of bounds: the len is {} but the index is {}",
            self.rows,
            row
        );
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns the row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
