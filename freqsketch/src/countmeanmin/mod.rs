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

//! Count-Mean-Min sketch: a Count-Min sketch with a bias-corrected estimator.
//!
//! Storage and updates are exactly those of
//! [`CountMinSketch`](crate::countmin::CountMinSketch). The query subtracts
//! from every counter the noise expected from other items sharing its
//! bucket, `(total_count - counter) / (width - 1)`, and reports the median of
//! these residuals, capped by the plain Count-Min estimate. This trades the
//! no-underestimate guarantee for a tighter expected error on skewed streams.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::countmeanmin::CountMeanMinSketch;
//!
//! let mut sketch = CountMeanMinSketch::new(64, 5).unwrap();
//! for i in 0..1000u64 {
//!     sketch.update(&(i % 100));
//! }
//! sketch.add(&7u64, 50).unwrap();
//!
//! let estimate = sketch.query(&7u64);
//! assert!(estimate <= sketch.count_min_estimate(&7u64));
//! ```

mod sketch;
pub use self::sketch::CountMeanMinSketch;
