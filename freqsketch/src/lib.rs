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

//! Bounded-memory frequency estimation sketches for high-volume streams.
//!
//! Every sketch is a fixed `depth x width` grid of counters addressed by
//! `depth` independent hash projections of the item. Memory is fixed at
//! construction and never grows; [`FrequencySketch::load_factor`] reports how
//! saturated the grid is.
//!
//! | Sketch | Updates | Estimate |
//! |--------|---------|----------|
//! | [`countmin::CountMinSketch`] | non-negative | min of counters, never below the truth |
//! | [`countmeanmin::CountMeanMinSketch`] | non-negative | median of noise-corrected counters |
//! | [`countsketch::CountSketch`] | signed (turnstile) | median of signed counters, unbiased |
//! | [`decay::DecayingCountMinSketch`] | non-negative | recency-weighted, decays on write |
//! | [`sliding::SlidingCountMinSketch`] | non-negative | frequency over the last `window_size` insertions |
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::SketchBuilder;
//!
//! let mut sketch = SketchBuilder::with_dimensions(10, 3).build_count_min().unwrap();
//! for _ in 0..5 {
//!     sketch.update("a");
//! }
//! sketch.update("b");
//!
//! assert!(sketch.query("a") >= 5);
//! assert!(sketch.query("c") >= 0);
//! assert_eq!(sketch.total_count(), 6);
//!
//! sketch.reset();
//! assert_eq!(sketch.query("a"), 0);
//! assert_eq!(sketch.load_factor(), 0.0);
//! ```
//!
//! Sketches are single-writer structures. None of the operations block or
//! perform I/O; to read a consistent snapshot while a stream is being
//! ingested, `clone()` the sketch at a quiescent point and query the copy.

pub mod builder;
pub mod countmeanmin;
pub mod countmin;
pub mod countsketch;
pub mod decay;
pub mod error;
pub mod matrix;
pub mod projection;
pub mod sliding;

mod common;
mod hash;
mod traits;

pub use self::builder::SketchBuilder;
pub use self::hash::DEFAULT_UPDATE_SEED;
pub use self::hash::MurmurHash3X64128;
pub use self::traits::FrequencySketch;
