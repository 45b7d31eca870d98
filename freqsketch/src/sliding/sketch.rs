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
use tracing::trace;

use crate::builder::validate_dimensions;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::matrix::CounterMatrix;
use crate::projection::HashProjector;
use crate::traits::impl_frequency_sketch;

/// Count-Min sketch over the last `window_size` insertions.
///
/// See the [module documentation](crate::sliding) for the windowing scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingCountMinSketch {
    projector: HashProjector,
    /// `depth x width` buckets of `num_fields` temporal fields each
    counters: CounterMatrix<i64>,
    window_size: u64,
    /// Next bucket, in the flattened `depth * width` space, the hand retires
    clock_pos: usize,
    /// Current field of the buckets the hand has not passed in this sweep
    cycle: usize,
    /// Ticks applied since construction or reset
    ticks: u64,
}

impl SlidingCountMinSketch {
    /// Creates a sketch over the last `window_size` insertions with the
    /// default number of fields and the default seed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `width`, `depth` or `window_size` is zero.
    pub fn new(width: usize, depth: usize, window_size: u64) -> Result<Self, Error> {
        Self::with_seed(width, depth, window_size, DEFAULT_UPDATE_SEED)
    }

    /// Creates a sketch with the default number of fields and a custom seed.
    pub fn with_seed(
        width: usize,
        depth: usize,
        window_size: u64,
        seed: u64,
    ) -> Result<Self, Error> {
        validate_dimensions(width, depth, 1)?;
        let fields = Self::default_num_fields(width, depth, window_size);
        Self::from_config(width, depth, window_size, fields, seed)
    }

    /// Creates a sketch with `fields` temporal fields per bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `fields < 2` or `(fields - 1) * width * depth < window_size`: such a
    /// sketch would retire data before it leaves the window and underestimate.
    pub fn with_fields(
        width: usize,
        depth: usize,
        window_size: u64,
        fields: usize,
    ) -> Result<Self, Error> {
        Self::from_config(width, depth, window_size, fields, DEFAULT_UPDATE_SEED)
    }

    /// Default field count: `ceil(window_size / (width * depth)) + 1`, the
    /// smallest count whose retained history covers the window.
    pub fn default_num_fields(width: usize, depth: usize, window_size: u64) -> usize {
        let buckets = (width as u64).saturating_mul(depth as u64).max(1);
        let fields = window_size.div_ceil(buckets).saturating_add(1);
        usize::try_from(fields).unwrap_or(usize::MAX)
    }

    pub(crate) fn from_config(
        width: usize,
        depth: usize,
        window_size: u64,
        fields: usize,
        seed: u64,
    ) -> Result<Self, Error> {
        validate_dimensions(width, depth, fields)?;
        if window_size == 0 {
            return Err(Error::config_invalid("window_size must be at least 1")
                .with_context("window_size", window_size));
        }
        if fields < 2 {
            return Err(
                Error::config_invalid("a sliding window needs at least 2 fields per bucket")
                    .with_context("fields", fields),
            );
        }
        let retained = (fields as u128 - 1) * width as u128 * depth as u128;
        if retained < window_size as u128 {
            return Err(Error::config_invalid(
                "too few fields per bucket to cover the window; data would be retired early",
            )
            .with_context("window_size", window_size)
            .with_context("fields", fields)
            .with_context("min_fields", Self::default_num_fields(width, depth, window_size)));
        }

        debug!(
            width,
            depth,
            window_size,
            fields,
            seed,
            "created sliding-window count-min sketch"
        );
        Ok(SlidingCountMinSketch {
            projector: HashProjector::new(width, depth, seed),
            counters: CounterMatrix::with_fields(depth, width, fields),
            window_size,
            clock_pos: 0,
            cycle: 0,
            ticks: 0,
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

    /// Returns the number of insertions the window spans.
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Returns the number of temporal fields per bucket.
    pub fn num_fields(&self) -> usize {
        self.counters.num_fields()
    }

    /// Returns the number of ticks applied, one per unit of inserted weight.
    pub fn virtual_time(&self) -> u64 {
        self.ticks
    }

    /// Returns the all-time inserted weight, which equals the virtual time.
    pub fn total_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_empty(&self) -> bool {
        self.ticks == 0
    }

    /// Records one occurrence of `item`.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.apply(item, 1);
    }

    /// Records `count` occurrences of `item`, each one tick of virtual time.
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

    /// Returns the estimated frequency of `item` within the window.
    ///
    /// Never exceeds `window_size`: buckets retain a little more history than
    /// the window, so the row minimum is capped at what the window can hold.
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> i64 {
        let cap = i64::try_from(self.window_size).unwrap_or(i64::MAX);
        self.projector
            .buckets(item)
            .enumerate()
            .map(|(row, col)| {
                self.counters
                    .fields(row, col)
                    .iter()
                    .fold(0i64, |sum, field| sum.saturating_add(*field))
            })
            .min()
            .unwrap_or(0)
            .min(cap)
    }

    /// Resets the sketch, including the clock, to its initial empty state.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.clock_pos = 0;
        self.cycle = 0;
        self.ticks = 0;
        debug!("reset sliding-window count-min sketch");
    }

    /// Returns the fraction of buckets with any live field in the most
    /// saturated row.
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
        let buckets: Vec<usize> = self.projector.buckets(item).collect();
        let mut remaining = count.unsigned_abs();
        // every field is retired within one retention span, so only the last
        // span of ticks can leave anything behind
        let span = self.retention_span();
        if remaining > span {
            let skipped = remaining - span;
            self.counters.clear();
            self.advance_clock(skipped);
            remaining = span;
        }
        for _ in 0..remaining {
            self.tick();
            for (row, &col) in buckets.iter().enumerate() {
                let field = self.current_field(row, col);
                let cell = &mut self.counters.fields_mut(row, col)[field];
                *cell = cell.saturating_add(1);
            }
        }
    }

    /// Ticks needed for the hand to retire every field of every bucket.
    fn retention_span(&self) -> u64 {
        (self.num_fields() as u64).saturating_mul(self.counters.num_buckets() as u64)
    }

    /// Moves the hand `ticks` buckets forward without retiring anything.
    fn advance_clock(&mut self, ticks: u64) {
        let buckets = self.counters.num_buckets() as u128;
        let fields = self.num_fields() as u128;
        let target = self.clock_pos as u128 + ticks as u128;
        let sweeps = target / buckets;
        self.clock_pos = (target % buckets) as usize;
        self.cycle = ((self.cycle as u128 + sweeps % fields) % fields) as usize;
        self.ticks = self.ticks.saturating_add(ticks);
        trace!(cycle = self.cycle, ticks = self.ticks, "sliding window clock fast-forwarded");
    }

    /// Advances virtual time by one tick, retiring the bucket under the hand.
    fn tick(&mut self) {
        let width = self.width();
        let fields = self.num_fields();
        let next = (self.cycle + 1) % fields;

        let (row, col) = (self.clock_pos / width, self.clock_pos % width);
        self.counters.fields_mut(row, col)[next] = 0;

        self.clock_pos += 1;
        if self.clock_pos == self.counters.num_buckets() {
            self.clock_pos = 0;
            self.cycle = next;
            trace!(
                cycle = self.cycle,
                ticks = self.ticks.saturating_add(1),
                "sliding window sweep completed"
            );
        }
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Field receiving writes to bucket `(row, col)` at the current tick:
    /// buckets already passed in this sweep have moved on to the next field.
    fn current_field(&self, row: usize, col: usize) -> usize {
        let flat = row * self.width() + col;
        if flat < self.clock_pos {
            (self.cycle + 1) % self.num_fields()
        } else {
            self.cycle
        }
    }
}

impl_frequency_sketch!(SlidingCountMinSketch, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_num_fields() {
        assert_eq!(SlidingCountMinSketch::default_num_fields(4, 1, 8), 3);
        assert_eq!(SlidingCountMinSketch::default_num_fields(10, 4, 11), 2);
        assert_eq!(SlidingCountMinSketch::default_num_fields(10, 3, 100), 5);
        assert_eq!(SlidingCountMinSketch::default_num_fields(64, 4, 1), 2);
    }

    #[test]
    fn test_under_provisioned_fields_rejected() {
        let err = SlidingCountMinSketch::with_fields(10, 2, 100, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("min_fields: 6"));

        let sketch = SlidingCountMinSketch::with_fields(10, 2, 100, 6).unwrap();
        assert_eq!(sketch.num_fields(), 6);

        let err = SlidingCountMinSketch::with_fields(10, 2, 1, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = SlidingCountMinSketch::new(10, 2, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "window_size must be at least 1");
    }

    #[test]
    fn test_clock_sweeps_one_bucket_per_tick() {
        let mut sketch = SlidingCountMinSketch::new(4, 2, 8).unwrap();
        assert_eq!(sketch.num_fields(), 2);
        for _ in 0..7 {
            sketch.tick();
        }
        assert_eq!((sketch.clock_pos, sketch.cycle, sketch.ticks), (7, 0, 7));
        sketch.tick();
        assert_eq!((sketch.clock_pos, sketch.cycle, sketch.ticks), (0, 1, 8));
        for _ in 0..8 {
            sketch.tick();
        }
        assert_eq!((sketch.clock_pos, sketch.cycle, sketch.ticks), (0, 0, 16));
    }

    #[test]
    fn test_single_item_capped_at_window() {
        // 4 buckets, 3 fields: every bucket keeps 9..=12 ticks of history
        let mut sketch = SlidingCountMinSketch::new(4, 1, 8).unwrap();
        assert_eq!(sketch.num_fields(), 3);
        for n in 1..=100i64 {
            sketch.update("x");
            assert_eq!(sketch.query("x"), n.min(8), "n={n}");
        }
        assert_eq!(sketch.total_count(), 100);
    }

    #[test]
    fn test_huge_count_fast_forwards() {
        let mut sketch = SlidingCountMinSketch::new(4, 2, 16).unwrap();
        sketch.update("y");
        sketch.add("x", i64::MAX).unwrap();
        assert_eq!(sketch.query("x"), 16);
        assert_eq!(sketch.virtual_time(), i64::MAX as u64 + 1);

        sketch.add("x", i64::MAX).unwrap();
        sketch.add("x", i64::MAX).unwrap();
        assert_eq!(sketch.virtual_time(), u64::MAX);
        assert_eq!(sketch.query("x"), 16);
    }

    #[test]
    fn test_fast_forward_matches_unit_ticks() {
        // retention span is 3 fields * 8 buckets = 24 ticks
        let mut bulk = SlidingCountMinSketch::new(4, 2, 16).unwrap();
        for i in 0..13u64 {
            bulk.update(&i);
        }
        let mut units = bulk.clone();
        for count in [25, 61, 24, 100] {
            bulk.add("x", count).unwrap();
            for _ in 0..count {
                units.update("x");
            }
            assert_eq!(bulk, units, "count={count}");
            bulk.update(&count);
            units.update(&count);
        }
    }

    #[test]
    fn test_weighted_add_is_unit_ticks() {
        let mut bulk = SlidingCountMinSketch::new(8, 2, 20).unwrap();
        let mut units = bulk.clone();
        bulk.add("a", 7).unwrap();
        bulk.add("b", 30).unwrap();
        for _ in 0..7 {
            units.update("a");
        }
        for _ in 0..30 {
            units.update("b");
        }
        assert_eq!(bulk, units);
        assert_eq!(bulk.virtual_time(), 37);
    }

    #[test]
    fn test_negative_count_leaves_clock_alone() {
        let mut sketch = SlidingCountMinSketch::new(8, 2, 20).unwrap();
        sketch.update("a");
        let before = sketch.clone();
        let err = sketch.add("a", -5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(sketch, before);
    }

    #[test]
    fn test_reset_rewinds_clock() {
        let mut sketch = SlidingCountMinSketch::new(8, 2, 20).unwrap();
        for i in 0..50u64 {
            sketch.update(&i);
        }
        sketch.reset();
        assert_eq!((sketch.clock_pos, sketch.cycle, sketch.ticks), (0, 0, 0));
        assert_eq!(sketch.load_factor(), 0.0);
        assert_eq!(sketch, SlidingCountMinSketch::new(8, 2, 20).unwrap());
    }
}
