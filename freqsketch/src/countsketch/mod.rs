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

//! Count-Sketch (Fast-AGMS) for turnstile streams.
//!
//! Every row hashes an item to a bucket and to a sign in `{+1, -1}`; updates
//! add `sign * count` to the bucket, queries multiply the bucket back by the
//! sign and take the median across rows. Colliding items cancel out in
//! expectation, so the estimate is unbiased, with error on both sides.
//! Negative counts are decrements.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::countsketch::CountSketch;
//!
//! let mut sketch = CountSketch::new(256, 5).unwrap();
//! sketch.add("x", 3).unwrap();
//! sketch.add("x", -3).unwrap();
//!
//! assert_eq!(sketch.total_count(), 6);
//! assert_eq!(sketch.query("x"), 0);
//! ```

mod sketch;
pub use self::sketch::CountSketch;
