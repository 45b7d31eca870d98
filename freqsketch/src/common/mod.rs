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

//! Helpers shared by the sketch families.

mod random;

pub use self::random::RandomSource;
pub use self::random::XorShift64;

/// Median of `values`, averaging the two middle values for an even count.
///
/// Reorders `values`. Returns `0.0` for an empty slice.
pub(crate) fn median_f64(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Median of `values`; for an even count the midpoint of the two middle
/// values, truncated toward zero.
///
/// Reorders `values`. Returns `0` for an empty slice.
pub(crate) fn median_i64(values: &mut [i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        // i128 so the sum of two extreme counters cannot overflow
        ((values[mid - 1] as i128 + values[mid] as i128) / 2) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_f64() {
        assert_eq!(median_f64(&mut []), 0.0);
        assert_eq!(median_f64(&mut [3.0]), 3.0);
        assert_eq!(median_f64(&mut [5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median_f64(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median_f64(&mut [-1.5, 2.5]), 0.5);
    }

    #[test]
    fn test_median_i64() {
        assert_eq!(median_i64(&mut []), 0);
        assert_eq!(median_i64(&mut [7]), 7);
        assert_eq!(median_i64(&mut [9, -2, 4]), 4);
        assert_eq!(median_i64(&mut [1, 2, 3, 4]), 2);
        assert_eq!(median_i64(&mut [-4, -3, 5, 100]), 1);
        assert_eq!(median_i64(&mut [-3, 0]), -1);
        assert_eq!(median_i64(&mut [i64::MAX, i64::MAX]), i64::MAX);
    }
}
