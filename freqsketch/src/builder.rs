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

//! Construction-time configuration shared by all sketch families.

use crate::countmeanmin::CountMeanMinSketch;
use crate::countmin::CountMinSketch;
use crate::countsketch::CountSketch;
use crate::decay::DecayingCountMinSketch;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::sliding::SlidingCountMinSketch;

/// Width used when none is configured.
pub const DEFAULT_WIDTH: usize = 1024;
/// Depth used when none is configured.
pub const DEFAULT_DEPTH: usize = 4;

/// Builder for every sketch in the crate.
///
/// Holds the dimensions and seed common to all variants; the terminal
/// `build_*` methods take the variant-specific parameters and validate the
/// whole configuration.
///
/// # Examples
///
/// ```
/// use freqsketch::SketchBuilder;
///
/// // By accuracy: estimates within 1% of the stream weight, 99% of the time
/// let sketch = SketchBuilder::with_accuracy(0.01, 0.99)
///     .unwrap()
///     .seed(42)
///     .build_count_min()
///     .unwrap();
/// assert_eq!(sketch.width(), 272);
/// assert_eq!(sketch.depth(), 5);
///
/// // By size
/// let sketch = SketchBuilder::with_dimensions(10, 3).build_count_sketch().unwrap();
/// assert_eq!(sketch.width(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchBuilder {
    width: usize,
    depth: usize,
    seed: u64,
}

impl Default for SketchBuilder {
    fn default() -> Self {
        SketchBuilder {
            width: DEFAULT_WIDTH,
            depth: DEFAULT_DEPTH,
            seed: DEFAULT_UPDATE_SEED,
        }
    }
}

impl SketchBuilder {
    /// Creates a builder for `depth` rows of `width` buckets.
    ///
    /// Dimensions are validated by the `build_*` methods.
    pub fn with_dimensions(width: usize, depth: usize) -> Self {
        SketchBuilder {
            width,
            depth,
            ..Default::default()
        }
    }

    /// Creates a builder sized so a Count-Min estimate exceeds the true
    /// frequency by at most `relative_error * total_count` with probability
    /// `confidence`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if either argument is outside `(0, 1)`.
    pub fn with_accuracy(relative_error: f64, confidence: f64) -> Result<Self, Error> {
        Ok(Self::with_dimensions(
            Self::suggest_width(relative_error)?,
            Self::suggest_depth(confidence)?,
        ))
    }

    /// Sets the number of buckets per row.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the number of rows.
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the hash seed (default: 9001).
    ///
    /// Sketches with different seeds project items differently and cannot be
    /// merged.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds a [`CountMinSketch`].
    pub fn build_count_min(self) -> Result<CountMinSketch, Error> {
        CountMinSketch::with_seed(self.width, self.depth, self.seed)
    }

    /// Builds a [`CountMeanMinSketch`].
    pub fn build_count_mean_min(self) -> Result<CountMeanMinSketch, Error> {
        CountMeanMinSketch::with_seed(self.width, self.depth, self.seed)
    }

    /// Builds a [`CountSketch`].
    pub fn build_count_sketch(self) -> Result<CountSketch, Error> {
        CountSketch::with_seed(self.width, self.depth, self.seed)
    }

    /// Builds a [`DecayingCountMinSketch`] with decay rate `alpha`.
    pub fn build_decaying(self, alpha: f64) -> Result<DecayingCountMinSketch, Error> {
        DecayingCountMinSketch::with_seed(self.width, self.depth, alpha, self.seed)
    }

    /// Builds a [`SlidingCountMinSketch`] over the last `window_size`
    /// insertions, with the default number of temporal fields.
    pub fn build_sliding(self, window_size: u64) -> Result<SlidingCountMinSketch, Error> {
        SlidingCountMinSketch::with_seed(self.width, self.depth, window_size, self.seed)
    }

    /// Builds a [`SlidingCountMinSketch`] with an explicit number of temporal
    /// fields per bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if `fields` is too small to cover `window_size`.
    pub fn build_sliding_with_fields(
        self,
        window_size: u64,
        fields: usize,
    ) -> Result<SlidingCountMinSketch, Error> {
        SlidingCountMinSketch::from_config(self.width, self.depth, window_size, fields, self.seed)
    }

    /// Suggests the width for a target relative error.
    ///
    /// Formula: `w = ceil(e / relative_error)`
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::SketchBuilder;
    /// assert_eq!(SketchBuilder::suggest_width(0.01).unwrap(), 272);
    /// assert!(SketchBuilder::suggest_width(0.0).is_err());
    /// ```
    pub fn suggest_width(relative_error: f64) -> Result<usize, Error> {
        if !(relative_error > 0.0 && relative_error < 1.0) {
            return Err(Error::config_invalid(
                "relative_error must be between 0.0 and 1.0 (exclusive)",
            )
            .with_context("relative_error", relative_error));
        }
        Ok((std::f64::consts::E / relative_error).ceil() as usize)
    }

    /// Suggests the depth for a target confidence.
    ///
    /// Formula: `d = ceil(ln(1 / (1 - confidence)))`, at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::SketchBuilder;
    /// assert_eq!(SketchBuilder::suggest_depth(0.99).unwrap(), 5);
    /// assert_eq!(SketchBuilder::suggest_depth(0.5).unwrap(), 1);
    /// ```
    pub fn suggest_depth(confidence: f64) -> Result<usize, Error> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(
                Error::config_invalid("confidence must be between 0.0 and 1.0 (exclusive)")
                    .with_context("confidence", confidence),
            );
        }
        let depth = (1.0 / (1.0 - confidence)).ln().ceil() as usize;
        Ok(depth.max(1))
    }
}

/// Rejects zero dimensions and grids whose cell count overflows `usize`.
pub(crate) fn validate_dimensions(width: usize, depth: usize, fields: usize) -> Result<(), Error> {
    if width == 0 {
        return Err(Error::config_invalid("width must be at least 1").with_context("width", width));
    }
    if depth == 0 {
        return Err(Error::config_invalid("depth must be at least 1").with_context("depth", depth));
    }
    let cells = (width as u128)
        .checked_mul(depth as u128)
        .and_then(|n| n.checked_mul(fields as u128))
        .unwrap_or(u128::MAX);
    match usize::try_from(cells) {
        Ok(_) => Ok(()),
        Err(err) => Err(Error::config_invalid("sketch cell count overflows usize")
            .with_context("width", width)
            .with_context("depth", depth)
            .with_context("fields", fields)
            .set_source(err)),
    }
}
