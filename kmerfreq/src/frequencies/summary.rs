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

//! Misra-Gries summary implementation.

use std::collections::HashMap;
use std::hash::Hash;

/// Bounded map from item to running count with Misra-Gries decrement rounds.
///
/// See [`crate::frequencies`] for an overview and error guarantees.
#[derive(Debug, Clone)]
pub struct MisraGriesSummary<T> {
    capacity: usize,
    counts: HashMap<T, u64>,
    total_weight: u64,
    num_decrements: u64,
}

impl<T: Eq + Hash> MisraGriesSummary<T> {
    /// Creates an empty summary holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "capacity must be at least 1");
        Self {
            capacity,
            counts: HashMap::with_capacity(capacity),
            total_weight: 0,
            num_decrements: 0,
        }
    }

    /// Returns the maximum number of tracked items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of tracked items.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no item is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the number of observations so far.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns the number of decrement rounds so far.
    ///
    /// This bounds how far any stored count may undercount its item's true frequency.
    pub fn num_decrements(&self) -> u64 {
        self.num_decrements
    }

    /// Returns true if `item` is tracked.
    pub fn contains(&self, item: &T) -> bool {
        self.counts.contains_key(item)
    }

    /// Returns the stored count of `item`, or zero if it is not tracked.
    pub fn estimate(&self, item: &T) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Returns a lower bound on the true frequency of `item`.
    ///
    /// This is the stored count.
    pub fn lower_bound(&self, item: &T) -> u64 {
        self.estimate(item)
    }

    /// Returns an upper bound on the true frequency of `item`.
    ///
    /// This is the stored count plus the number of decrement rounds; for an untracked item it
    /// is the number of decrement rounds alone.
    pub fn upper_bound(&self, item: &T) -> u64 {
        self.estimate(item) + self.num_decrements
    }

    /// Observes one occurrence of `item`.
    pub fn observe(&mut self, item: T) {
        self.total_weight += 1;
        if let Some(count) = self.counts.get_mut(&item) {
            *count += 1;
        } else if self.counts.len() < self.capacity {
            self.counts.insert(item, 1);
        } else {
            self.num_decrements += 1;
            self.counts.retain(|_, count| {
                *count -= 1;
                *count > 0
            });
        }
    }

    /// Returns an iterator over tracked items and their stored counts.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.counts.iter().map(|(item, &count)| (item, count))
    }

    /// Consumes the summary and returns the tracked items.
    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.counts.into_keys()
    }

    /// Resets the summary to an empty state, keeping its capacity.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total_weight = 0;
        self.num_decrements = 0;
    }
}
