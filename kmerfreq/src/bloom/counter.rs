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

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bloom::CounterValue;

/// Counting Bloom filter with universal hashing over a prime field.
///
/// See [`crate::bloom`] for the estimation guarantees.
#[derive(Debug, Clone)]
pub struct BloomCounter<C = u16> {
    counters: Vec<C>,
    hash_params: Vec<(u64, u64)>,
    prime: u64,
}

impl<C: CounterValue> BloomCounter<C> {
    /// Creates a counter with `num_slots` zeroed slots and `num_hashes` hash functions whose
    /// parameters are drawn from the thread-local RNG.
    ///
    /// `prime` should be a prime much larger than `num_slots` so that the hash functions are
    /// close to independent uniform mappings.
    ///
    /// # Panics
    ///
    /// Panics if `num_slots` or `num_hashes` is zero, or if `prime` does not exceed
    /// `num_slots`.
    pub fn new(num_slots: usize, num_hashes: usize, prime: u64) -> Self {
        Self::with_rng(num_slots, num_hashes, prime, &mut rand::rng())
    }

    /// Creates a counter whose hash parameters are derived from `seed`.
    ///
    /// Two counters built with the same arguments hash every key to the same slots.
    ///
    /// # Panics
    ///
    /// Same as [`BloomCounter::new`].
    pub fn with_seed(num_slots: usize, num_hashes: usize, prime: u64, seed: u64) -> Self {
        Self::with_rng(
            num_slots,
            num_hashes,
            prime,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng<R: Rng>(num_slots: usize, num_hashes: usize, prime: u64, rng: &mut R) -> Self {
        assert!(num_slots >= 1, "num_slots must be at least 1");
        assert!(num_hashes >= 1, "num_hashes must be at least 1");
        assert!(prime > num_slots as u64, "prime must exceed num_slots");

        // a = 0 would send every key to the same slot
        let hash_params = (0..num_hashes)
            .map(|_| (rng.random_range(1..prime), rng.random_range(0..prime)))
            .collect();
        Self {
            counters: vec![C::ZERO; num_slots],
            hash_params,
            prime,
        }
    }

    /// Returns the number of counter slots.
    pub fn num_slots(&self) -> usize {
        self.counters.len()
    }

    /// Returns the number of hash functions.
    pub fn num_hashes(&self) -> usize {
        self.hash_params.len()
    }

    /// Returns the prime modulus of the hash functions.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Returns true if every slot is zero.
    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(|&c| c == C::ZERO)
    }

    /// Inserts the key with hash code `x` and returns its frequency estimate.
    ///
    /// Every one of the key's slots is incremented (saturating), and the estimate is the
    /// minimum of the incremented values.
    pub fn insert(&mut self, x: u64) -> C {
        let mut min = C::MAX;
        for i in 0..self.hash_params.len() {
            let slot = self.slot(i, x);
            let value = self.counters[slot].saturating_increment();
            self.counters[slot] = value;
            min = min.min(value);
        }
        min
    }

    /// Returns the frequency estimate of `x` without modifying the counter.
    pub fn estimate(&self, x: u64) -> C {
        (0..self.hash_params.len())
            .map(|i| self.counters[self.slot(i, x)])
            .min()
            .unwrap_or(C::ZERO)
    }

    /// Zeroes all slots, keeping the hash parameters.
    pub fn reset(&mut self) {
        self.counters.fill(C::ZERO);
    }

    #[inline]
    fn slot(&self, i: usize, x: u64) -> usize {
        let (a, b) = self.hash_params[i];
        let mixed = (a as u128 * x as u128 + b as u128) % self.prime as u128;
        (mixed % self.counters.len() as u128) as usize
    }
}
