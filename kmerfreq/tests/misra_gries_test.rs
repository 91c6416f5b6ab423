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

use googletest::prelude::*;
use kmerfreq::frequencies::MisraGriesSummary;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A stream over `alphabet` symbols with a few planted heavy hitters.
fn skewed_stream(len: usize, alphabet: u64, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.random_bool(0.3) {
                rng.random_range(0..3)
            } else {
                rng.random_range(0..alphabet)
            }
        })
        .collect()
}

fn true_counts(stream: &[u64]) -> HashMap<u64, u64> {
    let mut counts = HashMap::new();
    for &item in stream {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_recall_above_stream_over_capacity() {
    for (capacity, seed) in [(4, 1), (10, 2), (32, 3), (100, 4)] {
        let stream = skewed_stream(20_000, 5_000, seed);
        let mut summary = MisraGriesSummary::new(capacity);
        for &item in &stream {
            summary.observe(item);
        }
        let bound = stream.len() as u64 / capacity as u64;
        for (item, count) in true_counts(&stream) {
            if count > bound {
                assert!(
                    summary.contains(&item),
                    "item {item} with count {count} > {bound} missing at capacity {capacity}"
                );
            }
        }
    }
}

#[test]
fn test_capacity_never_exceeded() {
    let mut summary = MisraGriesSummary::new(16);
    for item in skewed_stream(10_000, 200, 9) {
        summary.observe(item);
        assert!(summary.len() <= 16);
    }
}

#[googletest::test]
fn test_bounds_bracket_true_counts() {
    let stream = skewed_stream(5_000, 300, 21);
    let mut summary = MisraGriesSummary::new(20);
    for &item in &stream {
        summary.observe(item);
    }
    expect_that!(summary.total_weight(), eq(5_000u64));
    expect_that!(summary.num_decrements(), le(5_000u64 / 21));
    for (item, count) in true_counts(&stream) {
        expect_that!(summary.lower_bound(&item), le(count));
        expect_that!(summary.upper_bound(&item), ge(count));
    }
}

#[test]
fn test_exact_below_capacity() {
    let mut summary = MisraGriesSummary::new(8);
    for item in ["x", "y", "x", "z", "x", "y"] {
        summary.observe(item);
    }
    assert_eq!(summary.num_decrements(), 0);
    assert_eq!(summary.estimate(&"x"), 3);
    assert_eq!(summary.estimate(&"y"), 2);
    assert_eq!(summary.estimate(&"z"), 1);
    assert_eq!(summary.estimate(&"w"), 0);

    let mut items: Vec<_> = summary.clone().into_items().collect();
    items.sort();
    assert_eq!(items, ["x", "y", "z"]);

    summary.clear();
    assert!(summary.is_empty());
    assert_eq!(summary.total_weight(), 0);
    assert_eq!(summary.capacity(), 8);
}

#[test]
fn test_eviction_rule() {
    let mut summary = MisraGriesSummary::new(3);
    for item in [1, 1, 2, 3] {
        summary.observe(item);
    }
    // full: 4 decrements every counter and is dropped
    summary.observe(4);
    assert_eq!(summary.len(), 1);
    assert_eq!(summary.estimate(&1), 1);
    assert!(!summary.contains(&4));
    // a free counter is taken again
    summary.observe(4);
    assert_eq!(summary.estimate(&4), 1);
}
