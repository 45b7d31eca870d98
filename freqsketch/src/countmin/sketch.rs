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
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::matrix::CounterMatrix;
use crate::projection::HashProjector;
use crate::traits::impl_frequency_sketch;

/// Count-Min sketch for append-only streams.
///
/// Each update adds its weight to one counter per row; a query returns the
/// minimum of the item's counters. The estimate is never below the true
/// frequency and exceeds it by at most `relative_error() * total_count()`
/// with high probability.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMinSketch {
    projector: HashProjector,
    counters: CounterMatrix<i64>,
    total_count: u64,
}

impl CountMinSketch {
    /// Creates a sketch with `depth` rows of `width` buckets and the default seed.
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
        debug!(width, depth, seed, "created count-min sketch");
        Ok(CountMinSketch {
            projector: HashProjector::new(width, depth, seed),
            counters: CounterMatrix::new(depth, width),
            total_count: 0,
        })
    }

    /// Returns the number of buckets per row.
    pub fn width(&self) -> usize {
        self.projector.width()
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> usize {
        self.projector.depth()
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.projector.seed()
    }

    /// Returns the total weight added to the sketch.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns true if nothing has been added since construction or reset.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns the relative error `e / width` of the upper bound.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.width() as f64
    }

    /// Records one occurrence of `item`.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.apply(item, 1);
    }

    /// Records `count` occurrences of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `count` is negative; the sketch is left unchanged.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: i64) -> Result<(), Error> {
        if count < 0 {
            return Err(Error::negative_count(count));
        }
        self.apply(item, count);
        Ok(())
    }

    /// Returns the estimated frequency of `item`.
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        self.projector
            .buckets(item)
            .enumerate()
            .map(|(row, col)| self.counters.get(row, col))
            .min()
            .unwrap_or(0)
    }

    /// Returns the upper bound of the true frequency of `item`:
    /// `query(item) + relative_error() * total_count()`.
    pub fn upper_bound<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        let slack = (self.relative_error() * self.total_count as f64) as i64;
        self.query(item).saturating_add(slack)
    }

    /// Returns the lower bound of the true frequency of `item`, which is the
    /// estimate itself.
    pub fn lower_bound<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        self.query(item)
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// unless both sketches have the same width, depth and seed; this sketch
    /// is left unchanged.
    pub fn merge(&mut self, other: &CountMinSketch) -> Result<(), Error> {
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
        debug!(total_count = self.total_count, "merged count-min sketch");
        Ok(())
    }

    /// Resets the sketch to its initial empty state.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.total_count = 0;
        debug!("reset count-min sketch");
    }

    /// Returns the occupied fraction of the most saturated row.
    pub fn load_factor(&self) -> f64 {
        self.counters.load_factor()
    }

    /// Returns the bytes held by counters and row seeds.
    pub fn size_bytes(&self) -> usize {
        self.counters.size_bytes() + self.projector.size_bytes()
    }

    pub(crate) fn projector(&self) -> &HashProjector {
        &self.projector
    }

    pub(crate) fn counters(&self) -> &CounterMatrix<i64> {
        &self.counters
    }

    fn apply<T: Hash + ?Sized>(&mut self, item: &T, count: i64) {
        if count == 0 {
            return;
        }
        for (row, col) in self.projector.buckets(item).enumerate() {
            let cell = self.counters.get_mut(row, col);
            *cell = cell.saturating_add(count);
        }
        self.total_count = self.total_count.saturating_add(count as u64);
    }
}

impl_frequency_sketch!(CountMinSketch, i64);
