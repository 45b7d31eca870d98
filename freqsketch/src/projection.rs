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

//! Projection of items onto sketch rows.
//!
//! A [`HashProjector`] maps an item to one bucket per row (and, for the
//! signed sketch, one sign per row). Projections are pure functions of the
//! item, the row and the seed fixed at construction: the same item always
//! lands in the same cells of a given sketch.

use std::hash::Hash;

use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::hash::MurmurHash3X64128;

/// Derives `depth` independent bucket indices and signs for an item.
///
/// Each row has its own MurmurHash3 seed for bucket selection and a second,
/// distinct seed for sign selection. Both sets are drawn once from a
/// xorshift generator seeded with the sketch seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashProjector {
    width: usize,
    seed: u64,
    row_seeds: Vec<u64>,
    sign_seeds: Vec<u64>,
}

impl HashProjector {
    /// Creates a projector for `depth` rows of `width` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `depth` is zero. Sketch constructors validate
    /// their dimensions before getting here.
    pub fn new(width: usize, depth: usize, seed: u64) -> Self {
        assert!(width > 0, "width must be at least 1");
        assert!(depth > 0, "depth must be at least 1");

        let mut rng = XorShift64::seeded(seed);
        let row_seeds = (0..depth).map(|_| rng.next_u64()).collect();
        let sign_seeds = (0..depth).map(|_| rng.next_u64()).collect();
        HashProjector {
            width,
            seed,
            row_seeds,
            sign_seeds,
        }
    }

    /// Number of buckets per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn depth(&self) -> usize {
        self.row_seeds.len()
    }

    /// Seed the row seeds were derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Bucket index in `[0, width)` of `item` in `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= depth`.
    pub fn bucket<T: Hash + ?Sized>(&self, item: &T, row: usize) -> usize {
        self.check_row(row);
        let (h1, _) = hash_with_seed(item, self.row_seeds[row]);
        (h1 % self.width as u64) as usize
    }

    /// Bucket indices of `item`, one per row.
    pub fn buckets<'a, T: Hash + ?Sized>(
        &'a self,
        item: &'a T,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.depth()).map(move |row| self.bucket(item, row))
    }

    /// Sign (`+1` or `-1`) of `item` in `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= depth`.
    pub fn sign<T: Hash + ?Sized>(&self, item: &T, row: usize) -> i64 {
        self.check_row(row);
        let (h1, _) = hash_with_seed(item, self.sign_seeds[row]);
        if h1 >> 63 == 0 { 1 } else { -1 }
    }

    /// `(bucket, sign)` pairs of `item`, one per row.
    pub fn signed_buckets<'a, T: Hash + ?Sized>(
        &'a self,
        item: &'a T,
    ) -> impl Iterator<Item = (usize, i64)> + 'a {
        (0..self.depth()).map(move |row| (self.bucket(item, row), self.sign(item, row)))
    }

    fn check_row(&self, row: usize) {
        assert!(
            row < self.depth(),
            "row {row} out of range for depth {}",
            self.depth()
        );
    }

    pub(crate) fn size_bytes(&self) -> usize {
        (self.row_seeds.len() + self.sign_seeds.len()) * size_of::<u64>()
    }
}

fn hash_with_seed<T: Hash + ?Sized>(item: &T, seed: u64) -> (u64, u64) {
    let mut hasher = MurmurHash3X64128::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish128()
}
