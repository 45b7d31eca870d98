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

//! Sliding-window Count-Min sketch.
//!
//! Estimates frequencies over the last `window_size` insertions instead of
//! the whole stream, in fixed memory. Time is virtual: every unit of
//! inserted weight is one tick.
//!
//! # Windowing
//!
//! Each bucket of the `depth x width` grid holds `F` temporal fields used as
//! a ring. A clock hand sweeps the flattened bucket space one bucket per
//! tick. When the hand passes a bucket it zeroes the field that is about to
//! become that bucket's current one, retiring the oldest generation of data
//! in it. A full sweep takes `depth * width` ticks and advances the global
//! cycle, which selects the current field of every bucket the hand has not
//! passed yet in this sweep.
//!
//! A query sums the surviving fields of the item's bucket in every row and
//! returns the minimum. A bucket always holds between
//! `(F - 1) * depth * width + 1` and `F * depth * width` ticks of history, so
//! as long as `(F - 1) * depth * width >= window_size` nothing inserted in
//! the last `window_size` ticks is dropped and the estimate never falls
//! below the windowed frequency. Older ticks still retained, plus the usual
//! collision noise, can inflate the row sums, so the estimate is capped at
//! `window_size`, the most any item can occur within the window.
//!
//! A weighted `add` longer than `F * depth * width` ticks only replays the
//! last `F * depth * width` of them; everything earlier would be retired
//! before the call returns.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::sliding::SlidingCountMinSketch;
//!
//! let mut sketch = SlidingCountMinSketch::new(64, 4, 1000).unwrap();
//! assert_eq!(sketch.num_fields(), 5);
//!
//! for i in 0..10_000u64 {
//!     sketch.update(&(i % 2));
//! }
//! // roughly half of the retained window, far below the all-time 5000
//! let estimate = sketch.query(&0u64);
//! assert!(estimate >= 500 && estimate <= 1000);
//! ```

mod sketch;
pub use self::sketch::SlidingCountMinSketch;
