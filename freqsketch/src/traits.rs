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

//! The contract shared by every frequency sketch.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Error;

/// A fixed-memory summary of a stream that estimates per-item frequencies.
///
/// Every sketch in this crate implements this trait for any `T: Hash`, so a
/// stream driver or an evaluator can hold them interchangeably, including
/// as trait objects:
///
/// ```
/// use freqsketch::FrequencySketch;
/// use freqsketch::SketchBuilder;
///
/// let builder = SketchBuilder::with_dimensions(256, 4);
/// let mut sketches: Vec<Box<dyn FrequencySketch<str, Estimate = i64>>> = vec![
///     Box::new(builder.build_count_min().unwrap()),
///     Box::new(builder.build_count_mean_min().unwrap()),
///     Box::new(builder.build_count_sketch().unwrap()),
///     Box::new(builder.build_sliding(1000).unwrap()),
/// ];
/// for sketch in &mut sketches {
///     sketch.add("apple", 3).unwrap();
///     assert!(sketch.query("apple") > 0);
/// }
/// ```
///
/// None of the operations are safe to run concurrently with `add` or
/// `reset` on the same instance; readers that need a consistent view take a
/// `clone()` at a quiescent point.
pub trait FrequencySketch<T: Hash + ?Sized> {
    /// The estimate type returned by [`query`](Self::query).
    type Estimate: Copy + PartialOrd + Debug;

    /// Records `count` occurrences of `item`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// for a negative `count` on a sketch that does not support decrements;
    /// the sketch is left unchanged.
    fn add(&mut self, item: &T, count: i64) -> Result<(), Error>;

    /// Estimates the frequency of `item`.
    fn query(&self, item: &T) -> Self::Estimate;

    /// Zeroes all counters and the running totals.
    fn reset(&mut self);

    /// Occupied fraction of the most saturated row, in `[0, 1]`.
    fn load_factor(&self) -> f64;

    /// Sum of the absolute weights added since construction or the last reset.
    fn total_count(&self) -> u64;

    /// Bytes of counter and seed storage, fixed at construction.
    fn size_bytes(&self) -> usize;
}

macro_rules! impl_frequency_sketch {
    ($sketch:ty, $estimate:ty) => {
        impl<T: ::std::hash::Hash + ?Sized> $crate::traits::FrequencySketch<T> for $sketch {
            type Estimate = $estimate;

            fn add(&mut self, item: &T, count: i64) -> Result<(), $crate::error::Error> {
                <$sketch>::add(self, item, count)
            }

            fn query(&self, item: &T) -> $estimate {
                <$sketch>::query(self, item)
            }

            fn reset(&mut self) {
                <$sketch>::reset(self)
            }

            fn load_factor(&self) -> f64 {
                <$sketch>::load_factor(self)
            }

            fn total_count(&self) -> u64 {
                <$sketch>::total_count(self)
            }

            fn size_bytes(&self) -> usize {
                <$sketch>::size_bytes(self)
            }
        }
    };
}

pub(crate) use impl_frequency_sketch;
