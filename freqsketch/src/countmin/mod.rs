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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts for streaming data
//! with configurable relative error and confidence bounds. Estimates never fall
//! below the true frequency; hash collisions can only add weight.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(256, 5).unwrap();
//!
//! sketch.update("apple");
//! sketch.add("banana", 3).unwrap();
//!
//! let banana = sketch.query("banana");
//! assert!(banana >= 3);
//!
//! let upper = sketch.upper_bound("banana");
//! assert!(upper >= banana);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! use freqsketch::SketchBuilder;
//!
//! let sketch = SketchBuilder::with_accuracy(0.01, 0.99)
//!     .unwrap()
//!     .build_count_min()
//!     .unwrap();
//! assert!(sketch.relative_error() <= 0.01);
//! ```

mod sketch;
pub use self::sketch::CountMinSketch;
