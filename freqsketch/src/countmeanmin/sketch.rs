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

use crate::common::median_f64;
use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::traits::impl_frequency_sketch;

/// Count-Mean-Min sketch.
///
/// The estimate is non-negative and never exceeds the Count-Min estimate of
/// the same counters, but unlike Count-Min it may fall below the true
/// frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMeanMinSketch {
    inner: CountMinSketch,
}

impl CountMeanMinSketch {
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
        let inner = CountMinSketch::with_seed(width, depth, seed)?;
        debug!(width, depth, seed, "created count-mean-min sketch");
        Ok(CountMeanMinSketch { inner })
    }

    pub fn width(&self) -> usize {
        self.inner.width()
    }

    pub fn depth(&self) -> usize {
        self.inner.depth()
    }

    pub fn seed(&self) -> u64 {
        self.inner.seed()
    }

    pub fn total_count(&self) -> u64 {
        self.inner.total_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Records one occurrence of `item`.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.inner.update(item);
    }

    /// Records `count` occurrences of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `count` is negative; the sketch is left unchanged.
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T, count: i64) -> Result<(), Error> {
        self.inner.add(item, count)
    }

    /// Returns the bias-corrected frequency estimate of `item`.
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        let width = self.width();
        let total = self.total_count() as f64;
        let counters = self.inner.counters();

        let mut min_raw = i64::MAX;
        let mut residuals = Vec::with_capacity(self.depth());
        for (row, col) in self.inner.projector().buckets(item).enumerate() {
            let raw = counters.get(row, col);
            min_raw = min_raw.min(raw);
            let noise = if width > 1 {
                (total - raw as f64) / (width - 1) as f64
            } else {
                0.0
            };
            residuals.push(raw as f64 - noise);
        }

        let median = median_f64(&mut residuals).round() as i64;
        median.min(min_raw).max(0)
    }

    /// Returns the plain Count-Min estimate of `item` from the same counters,
    /// which caps [`query`](Self::query).
    pub fn count_min_estimate<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        self.inner.query(item)
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// unless both sketches have the same width, depth and seed.
    pub fn merge(&mut self, other: &CountMeanMinSketch) -> Result<(), Error> {
        self.inner.merge(&other.inner)
    }

    /// Resets the sketch to its initial empty state.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn load_factor(&self) -> f64 {
        self.inner.load_factor()
    }

    pub fn size_bytes(&self) -> usize {
        self.inner.size_bytes()
    }
}

impl_frequency_sketch!(CountMeanMinSketch, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_single_item_is_exact() {
        let mut sketch = CountMeanMinSketch::new(10, 3).unwrap();
        sketch.add("a", 5).unwrap();
        // noise is zero: every other bucket is empty and total == counter
        assert_eq!(sketch.query("a"), 5);
    }

    #[test]
    fn test_width_one_has_no_noise_term() {
        let mut sketch = CountMeanMinSketch::new(1, 3).unwrap();
        sketch.add("a", 2).unwrap();
        sketch.add("b", 3).unwrap();
        assert_eq!(sketch.query("a"), 5);
        assert_eq!(sketch.query("zzz"), 5);
    }

    #[test]
    fn test_estimate_is_clamped() {
        let mut sketch = CountMeanMinSketch::new(16, 5).unwrap();
        for i in 0..2000u64 {
            sketch.update(&i);
        }
        for i in 0..3000u64 {
            let estimate = sketch.query(&i);
            assert!(estimate >= 0);
            assert!(estimate <= sketch.count_min_estimate(&i));
        }
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut sketch = CountMeanMinSketch::new(16, 5).unwrap();
        let err = sketch.add("a", -2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(sketch.is_empty());
    }
}
