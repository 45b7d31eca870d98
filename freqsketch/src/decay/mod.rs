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

//! Count-Min sketch with exponential forgetting.
//!
//! Counters hold exponentially weighted averages instead of sums. Writing
//! `count` to a counter sets it to `(1 - alpha) * old + alpha * count`; only
//! the counters an update touches decay, nothing ages between writes. The
//! query is the minimum over the item's counters, a recency-weighted
//! frequency rather than an all-time count.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::decay::DecayingCountMinSketch;
//!
//! let mut sketch = DecayingCountMinSketch::new(128, 4, 0.5).unwrap();
//! sketch.add("a", 4).unwrap();
//! assert_eq!(sketch.query("a"), 2.0);
//! sketch.add("a", 4).unwrap();
//! assert_eq!(sketch.query("a"), 3.0);
//! ```

mod sketch;
pub use self::sketch::DecayingCountMinSketch;
