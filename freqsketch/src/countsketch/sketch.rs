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

use std::hash::Hash;

use tracing::debug;

use crate::builder::validate_dimensions;
use crate::common::median_i64;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::matrix::CounterMatrix;
use crate::projection::HashProjector;
use crate::traits::impl_frequency_sketch;

/// Count-Sketch with median-of-rows estimation.
///
/// `total_count` accumulates the absolute value of every update, so an
/// increment followed by the matching decrement counts twice.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSketch {
    projector: HashProjector,
    counters: CounterMatrix<i64>,
    total_count: u64,
}

impl CountSketch {
    /// Creates a sketch with `depth` rows of `width` buckets and the default seed.
    ///
    /// An odd `depth` gives a true median; with an even depth the midpoint of
    /// the two middle rows is used.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `width` or `depth` is zero.
    pub fn new(width: usize, depth: usize) -> Result<Self, Error> {
        Self::with_seed(width, depth, DEFAULT_UPDATE_SEED)
    }

    /// Creates a sketch with `depth` rows of `width` buckets and a custom seed.
    pub fn with_seed(width: usize, depth: usize, seed: u64) -> Result<Self, Error> {
        validate_dimensions(width, depth, 1)?;
        debug!(width, depth, seed, "created count-sketch");
        Ok(CountSketch {
            projector: HashProjector::new(width, depth, seed),
            counters: CounterMatrix::new(depth, width),
            total_count: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.projector.width()
    }

    pub fn depth(&self) -> usize {
        self.projector.depth()
    }

    pub fn seed(&self) -> u64 {
        self.projector.seed()
    }

    /// Returns the sum of absolute update weights.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Records one occurrence of `item`.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.apply(item, 1);
    }

    /// Adds `count` (possibly negative) to the frequency of `item`.
    ///
    /// Never fails; the `Result` matches the other sketches.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: i64) -> Result<(), Error> {
        self.apply(item, count);
        Ok(())
    }

    /// Returns the median of the per-row signed estimates of `item`.
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        let mut estimates: Vec<i64> = self
            .projector
            .signed_buckets(item)
            .enumerate()
            .map(|(row, (col, sign))| signed(self.counters.get(row, col), sign))
            .collect();
        median_i64(&mut estimates)
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// unless both sketches have the same width, depth and seed.
    pub fn merge(&mut self, other: &CountSketch) -> Result<(), Error> {
        if self.projector != other.projector {
            return Err(
                Error::config_invalid("incompatible sketches cannot be merged")
                    .with_context("width", format!("{} vs {}", self.width(), other.width()))
                    .with_context("depth", format!("{} vs {}", self.depth(), other.depth()))
                    .with_context("seed", format!("{} vs {}", self.seed(), other.seed())),
            );
        }
        self.counters.merge_from(&other.counters);
        self.total_count = self.total_count.saturating_add(other.total_count);
        debug!(total_count = self.total_count, "merged count-sketch");
        Ok(())
    }

    /// Resets the sketch to its initial empty state.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.total_count = 0;
        debug!("reset count-sketch");
    }

    /// Returns the non-zero fraction of the most saturated row, regardless of
    /// counter sign.
    pub fn load_factor(&self) -> f64 {
        self.counters.load_factor()
    }

    pub fn size_bytes(&self) -> usize {
        self.counters.size_bytes() + self.projector.size_bytes()
    }

    fn apply<T: Hash + ?Sized>(&mut self, item: &T, count: i64) {
        if count == 0 {
            return;
        }
        for (row, (col, sign)) in self.projector.signed_buckets(item).enumerate() {
            let cell = self.counters.get_mut(row, col);
            *cell = cell.saturating_add(signed(count, sign));
        }
        self.total_count = self.total_count.saturating_add(count.unsigned_abs());
    }
}

impl_frequency_sketch!(CountSketch, i64);

#[inline]
fn signed(value: i64, sign: i64) -> i64 {
    if sign < 0 {
        value.saturating_neg()
    } else {
        value
    }
}
