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

/// Count-Min sketch whose counters decay lazily, on write.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayingCountMinSketch {
    projector: HashProjector,
    counters: CounterMatrix<f64>,
    alpha: f64,
    total_count: u64,
}

impl DecayingCountMinSketch {
    /// Creates a sketch with `depth` rows of `width` buckets, decay rate
    /// `alpha` and the default seed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `width` or `depth` is zero or `alpha` is not in `(0, 1)`.
    pub fn new(width: usize, depth: usize, alpha: f64) -> Result<Self, Error> {
        Self::with_seed(width, depth, alpha, DEFAULT_UPDATE_SEED)
    }

    /// Creates a sketch with a custom seed.
    pub fn with_seed(width: usize, depth: usize, alpha: f64, seed: u64) -> Result<Self, Error> {
        validate_dimensions(width, depth, 1)?;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(
                Error::config_invalid("alpha must be between 0.0 and 1.0 (exclusive)")
                    .with_context("alpha", alpha),
            );
        }
        debug!(width, depth, alpha, seed, "created decaying count-min sketch");
        Ok(DecayingCountMinSketch {
            projector: HashProjector::new(width, depth, seed),
            counters: CounterMatrix::new(depth, width),
            alpha,
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

    /// Returns the decay rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the total (undecayed) weight added to the sketch.
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

    /// Blends `count` into the counters of `item`.
    ///
    /// A zero `count` still decays the item's counters.
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

    /// Returns the recency-weighted estimate of `item`.
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> f64 {
        self.projector
            .buckets(item)
            .enumerate()
            .map(|(row, col)| self.counters.get(row, col))
            .fold(f64::INFINITY, f64::min)
    }

    /// Resets the sketch to its initial empty state.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.total_count = 0;
        debug!("reset decaying count-min sketch");
    }

    pub fn load_factor(&self) -> f64 {
        self.counters.load_factor()
    }

    pub fn size_bytes(&self) -> usize {
        self.counters.size_bytes() + self.projector.size_bytes()
    }

    fn apply<T: Hash + ?Sized>(&mut self, item: &T, count: i64) {
        let weight = self.alpha * count as f64;
        let keep = 1.0 - self.alpha;
        for (row, col) in self.projector.buckets(item).enumerate() {
            let cell = self.counters.get_mut(row, col);
            *cell = keep * *cell + weight;
        }
        self.total_count = self.total_count.saturating_add(count as u64);
    }
}

impl_frequency_sketch!(DecayingCountMinSketch, f64);
