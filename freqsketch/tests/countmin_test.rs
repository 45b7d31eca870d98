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

use std::collections::HashMap;

use freqsketch::SketchBuilder;
use freqsketch::countmin::CountMinSketch;
use freqsketch::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::le;

/// 500 items, item `i` appearing `i % 23 + 1` times.
fn skewed_stream() -> Vec<(u64, i64)> {
    (0..500u64).map(|i| (i, (i % 23 + 1) as i64)).collect()
}

fn feed(sketch: &mut CountMinSketch, stream: &[(u64, i64)]) -> HashMap<u64, i64> {
    let mut truth = HashMap::new();
    for &(item, count) in stream {
        sketch.add(&item, count).unwrap();
        *truth.entry(item).or_insert(0) += count;
    }
    truth
}

#[test]
fn test_small_sketch_scenario() {
    let mut sketch = CountMinSketch::new(10, 3).unwrap();
    for _ in 0..5 {
        sketch.update("a");
    }
    sketch.update("b");

    // "a" can only pick up the single "b" through a collision
    assert_that!(sketch.query("a"), ge(5));
    assert_that!(sketch.query("a"), le(6));
    assert_that!(sketch.query("b"), ge(1));
    assert_that!(sketch.query("c"), ge(0));
    assert_that!(sketch.query("c"), le(6));
    assert_that!(sketch.total_count(), eq(6));
}

#[test]
fn test_never_underestimates() {
    let mut sketch = CountMinSketch::new(64, 4).unwrap();
    let truth = feed(&mut sketch, &skewed_stream());

    for (item, count) in &truth {
        assert_that!(sketch.query(item), ge(*count));
    }
    for item in 10_000..10_100u64 {
        assert_that!(sketch.query(&item), ge(0));
    }
}

#[test]
fn test_overestimate_within_error_bound() {
    let mut sketch = CountMinSketch::new(64, 4).unwrap();
    let truth = feed(&mut sketch, &skewed_stream());
    let bound = sketch.relative_error() * sketch.total_count() as f64;

    let within = truth
        .iter()
        .filter(|(item, count)| (sketch.query(*item) - **count) as f64 <= bound)
        .count();
    assert_that!(within as f64 / truth.len() as f64, ge(0.95));

    for (item, count) in &truth {
        assert_that!(sketch.upper_bound(item), ge(*count));
        assert_that!(sketch.lower_bound(item), ge(*count));
    }
}

#[test]
fn test_monotonic_under_positive_updates() {
    let mut sketch = CountMinSketch::new(16, 3).unwrap();
    let mut previous = sketch.query("hot");
    for i in 0..200u64 {
        sketch.add("hot", (i % 3) as i64).unwrap();
        sketch.update(&i);
        let current = sketch.query("hot");
        assert_that!(current, ge(previous));
        previous = current;
    }
}

#[test]
fn test_query_is_idempotent() {
    let mut sketch = CountMinSketch::new(32, 3).unwrap();
    feed(&mut sketch, &skewed_stream());
    for item in 0..600u64 {
        assert_that!(sketch.query(&item), eq(sketch.query(&item)));
    }
}

#[test]
fn test_reset() {
    let mut sketch = CountMinSketch::new(32, 3).unwrap();
    feed(&mut sketch, &skewed_stream());
    assert_that!(sketch.load_factor(), eq(1.0));

    sketch.reset();
    assert!(sketch.is_empty());
    assert_that!(sketch.load_factor(), eq(0.0));
    for item in 0..500u64 {
        assert_that!(sketch.query(&item), eq(0));
    }
}

#[test]
fn test_load_factor_tracks_cardinality() {
    let mut sketch = CountMinSketch::new(1000, 3).unwrap();
    sketch.update(&1u64);
    let sparse = sketch.load_factor();
    assert_that!(sparse, eq(0.001));

    for item in 0..500u64 {
        sketch.update(&item);
    }
    let dense = sketch.load_factor();
    assert_that!(dense, ge(0.3));
    assert_that!(dense, le(0.5));
}

#[test]
fn test_negative_count_rejected() {
    let mut sketch = CountMinSketch::new(32, 3).unwrap();
    sketch.add("a", 2).unwrap();
    let err = sketch.add("a", -1).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidArgument));
    assert_that!(err.message(), contains_substring("may not be negative"));
    assert_that!(sketch.query("a"), eq(2));
    assert_that!(sketch.total_count(), eq(2));
}

#[test]
fn test_merge_matches_single_stream() {
    let stream = skewed_stream();
    let (left_half, right_half) = stream.split_at(stream.len() / 2);
    let builder = SketchBuilder::with_dimensions(64, 4).seed(7);

    let mut whole = builder.build_count_min().unwrap();
    feed(&mut whole, &stream);

    let mut left = builder.build_count_min().unwrap();
    feed(&mut left, left_half);
    let mut right = builder.build_count_min().unwrap();
    feed(&mut right, right_half);

    left.merge(&right).unwrap();
    assert_eq!(left, whole);
}

#[test]
fn test_merge_rejects_other_shapes() {
    let mut sketch = CountMinSketch::new(64, 4).unwrap();
    let other = CountMinSketch::new(32, 4).unwrap();
    let err = sketch.merge(&other).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ConfigInvalid));
    assert_that!(err.to_string(), contains_substring("width: 64 vs 32"));
}
