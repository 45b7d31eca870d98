// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Fixed-shape counter storage shared by every sketch.

use std::fmt::Debug;

/// Numeric cell types a [`CounterMatrix`] can hold.
pub trait CounterValue: Copy + Default + PartialEq + Debug + 'static {
    /// The zero value every cell starts at.
    const ZERO: Self;

    /// Whether the cell counts as occupied for load-factor purposes.
    fn is_occupied(self) -> bool;

    /// Cell-wise accumulation used when merging matrices.
    fn accumulate(self, other: Self) -> Self;
}

impl CounterValue for i64 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn is_occupied(self) -> bool {
        self != 0
    }

    #[inline(always)]
    fn accumulate(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl CounterValue for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn is_occupied(self) -> bool {
        self != 0.0
    }

    #[inline(always)]
    fn accumulate(self, other: Self) -> Self {
        self + other
    }
}

/// A `depth x width` grid of counters, each bucket holding `fields` cells.
///
/// Every variant except the sliding window uses a single field per bucket,
/// in which case a bucket and a cell are the same thing. Cells are stored
/// contiguously, row-major, with the fields of one bucket adjacent.
///
/// The shape is fixed at construction; only cell values change.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterMatrix<T: CounterValue> {
    depth: usize,
    width: usize,
    fields: usize,
    cells: Vec<T>,
}

impl<T: CounterValue> CounterMatrix<T> {
    /// Creates a zeroed `depth x width` matrix with one field per bucket.
    pub fn new(depth: usize, width: usize) -> Self {
        Self::with_fields(depth, width, 1)
    }

    /// Creates a zeroed `depth x width` matrix with `fields` cells per bucket.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn with_fields(depth: usize, width: usize, fields: usize) -> Self {
        assert!(
            depth > 0 && width > 0 && fields > 0,
            "matrix dimensions must be positive"
        );
        CounterMatrix {
            depth,
            width,
            fields,
            cells: vec![T::ZERO; depth * width * fields],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells per bucket.
    pub fn num_fields(&self) -> usize {
        self.fields
    }

    /// Number of buckets (`depth * width`).
    pub fn num_buckets(&self) -> usize {
        self.depth * self.width
    }

    /// Value of the first field of bucket `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[self.offset(row, col)]
    }

    /// Mutable reference to the first field of bucket `(row, col)`.
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let offset = self.offset(row, col);
        &mut self.cells[offset]
    }

    /// All fields of bucket `(row, col)`.
    #[inline]
    pub fn fields(&self, row: usize, col: usize) -> &[T] {
        let offset = self.offset(row, col);
        &self.cells[offset..offset + self.fields]
    }

    /// All fields of bucket `(row, col)`, mutably.
    #[inline]
    pub fn fields_mut(&mut self, row: usize, col: usize) -> &mut [T] {
        let offset = self.offset(row, col);
        &mut self.cells[offset..offset + self.fields]
    }

    /// All cells of `row`, `width * fields` of them.
    pub fn row(&self, row: usize) -> &[T] {
        let len = self.width * self.fields;
        &self.cells[row * len..(row + 1) * len]
    }

    /// Number of buckets in `row` with at least one occupied field.
    pub fn occupancy(&self, row: usize) -> usize {
        self.row(row)
            .chunks_exact(self.fields)
            .filter(|bucket| bucket.iter().any(|cell| cell.is_occupied()))
            .count()
    }

    /// Occupied fraction of the most saturated row, in `[0, 1]`.
    pub fn load_factor(&self) -> f64 {
        let max_occupied = (0..self.depth)
            .map(|row| self.occupancy(row))
            .max()
            .unwrap_or(0);
        max_occupied as f64 / self.width as f64
    }

    /// Resets every cell to zero.
    pub fn clear(&mut self) {
        self.cells.fill(T::ZERO);
    }

    /// Adds `other` into `self` cell by cell.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn merge_from(&mut self, other: &CounterMatrix<T>) {
        assert!(self.same_shape(other), "matrix shapes differ");
        for (cell, other_cell) in self.cells.iter_mut().zip(&other.cells) {
            *cell = cell.accumulate(*other_cell);
        }
    }

    /// Whether `other` has the same depth, width and field count.
    pub fn same_shape(&self, other: &CounterMatrix<T>) -> bool {
        self.depth == other.depth && self.width == other.width && self.fields == other.fields
    }

    /// Bytes held by the cells.
    pub fn size_bytes(&self) -> usize {
        self.cells.len() * size_of::<T>()
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.depth && col < self.width);
        (row * self.width + col) * self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let matrix = CounterMatrix::<i64>::new(3, 10);
        assert_eq!(matrix.depth(), 3);
        assert_eq!(matrix.width(), 10);
        assert_eq!(matrix.num_fields(), 1);
        assert_eq!(matrix.num_buckets(), 30);
        assert_eq!(matrix.load_factor(), 0.0);
        assert_eq!(matrix.size_bytes(), 30 * 8);
        assert!((0..3).all(|row| matrix.row(row).iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_load_factor_is_max_over_rows() {
        let mut matrix = CounterMatrix::<i64>::new(2, 4);
        *matrix.get_mut(0, 1) = 5;
        *matrix.get_mut(1, 0) = -2;
        *matrix.get_mut(1, 3) = 1;
        assert_eq!(matrix.occupancy(0), 1);
        assert_eq!(matrix.occupancy(1), 2);
        assert_eq!(matrix.load_factor(), 0.5);

        matrix.clear();
        assert_eq!(matrix.load_factor(), 0.0);
    }

    #[test]
    fn test_fields_are_per_bucket() {
        let mut matrix = CounterMatrix::<i64>::with_fields(2, 3, 4);
        matrix.fields_mut(1, 2)[3] = 7;
        assert_eq!(matrix.fields(1, 2), &[0, 0, 0, 7]);
        assert_eq!(matrix.fields(1, 1), &[0, 0, 0, 0]);
        assert_eq!(matrix.get(1, 2), 0);
        assert_eq!(matrix.occupancy(1), 1);
        assert_eq!(matrix.load_factor(), 1.0 / 3.0);
        assert_eq!(matrix.size_bytes(), 2 * 3 * 4 * 8);
    }

    #[test]
    fn test_float_cells() {
        let mut matrix = CounterMatrix::<f64>::new(1, 2);
        *matrix.get_mut(0, 0) = 0.25;
        assert_eq!(matrix.get(0, 0), 0.25);
        assert_eq!(matrix.load_factor(), 0.5);
    }

    #[test]
    fn test_merge_saturates() {
        let mut left = CounterMatrix::<i64>::new(1, 2);
        let mut right = CounterMatrix::<i64>::new(1, 2);
        *left.get_mut(0, 0) = i64::MAX - 1;
        *right.get_mut(0, 0) = 5;
        *right.get_mut(0, 1) = 3;
        left.merge_from(&right);
        assert_eq!(left.row(0), &[i64::MAX, 3]);
    }

    #[test]
    #[should_panic(expected = "matrix shapes differ")]
    fn test_merge_shape_mismatch_panics() {
        let mut left = CounterMatrix::<i64>::new(1, 2);
        let right = CounterMatrix::<i64>::new(2, 2);
        left.merge_from(&right);
    }
}
