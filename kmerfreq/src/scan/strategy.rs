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

//! Candidate admission strategies for the first pass of a bin.

use crate::bloom::BloomCounter;
use crate::bloom::CounterValue;
use crate::frequencies::MisraGriesSummary;
use crate::kmer::CanonicalKmer;
use crate::table::ResultTable;

/// Approximate structure deciding which k-mers of a bin get counted exactly.
///
/// The structure must never reject a k-mer whose true count within the bin reaches the
/// threshold, and it must hold all of its state itself: [`CandidateFilter::reset`] is the only
/// thing that happens between bins.
pub trait CandidateFilter {
    /// Feeds one k-mer of the current bin, possibly admitting candidates.
    fn observe(&mut self, kmer: CanonicalKmer, candidates: &mut ResultTable);

    /// Called once the admission pass has seen the whole source.
    fn finish_pass(&mut self, _candidates: &mut ResultTable) {}

    /// Clears all state before the next bin.
    fn reset(&mut self);
}

/// Admits a k-mer as soon as its counting Bloom filter estimate reaches the threshold.
#[derive(Debug, Clone)]
pub struct BloomAdmission<C = u16> {
    counter: BloomCounter<C>,
    gate: u64,
}

impl<C: CounterValue> BloomAdmission<C> {
    /// Wraps `counter`, admitting at `threshold`.
    ///
    /// A saturated slot cannot tell how far past its maximum it went, so a threshold above
    /// the counter's maximum is lowered to that maximum.
    pub fn new(counter: BloomCounter<C>, threshold: u64) -> Self {
        Self {
            counter,
            gate: threshold.min(C::MAX.to_u64()),
        }
    }

    /// Returns the underlying counter.
    pub fn counter(&self) -> &BloomCounter<C> {
        &self.counter
    }
}

impl<C: CounterValue> CandidateFilter for BloomAdmission<C> {
    fn observe(&mut self, kmer: CanonicalKmer, candidates: &mut ResultTable) {
        let estimate = self.counter.insert(kmer.hash_code());
        if estimate.to_u64() >= self.gate {
            candidates.admit(kmer);
        }
    }

    fn reset(&mut self) {
        self.counter.reset();
    }
}

/// Admits every k-mer still tracked by a Misra-Gries summary at the end of the pass.
#[derive(Debug, Clone)]
pub struct MisraGriesAdmission {
    summary: MisraGriesSummary<CanonicalKmer>,
}

impl MisraGriesAdmission {
    /// Creates an admission filter tracking at most `capacity` k-mers per bin.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            summary: MisraGriesSummary::new(capacity),
        }
    }

    /// Returns the summary of the current bin.
    pub fn summary(&self) -> &MisraGriesSummary<CanonicalKmer> {
        &self.summary
    }
}

impl CandidateFilter for MisraGriesAdmission {
    fn observe(&mut self, kmer: CanonicalKmer, _candidates: &mut ResultTable) {
        self.summary.observe(kmer);
    }

    fn finish_pass(&mut self, candidates: &mut ResultTable) {
        for (&kmer, _) in self.summary.iter() {
            candidates.admit(kmer);
        }
    }

    fn reset(&mut self) {
        self.summary.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmer(dna: &str) -> CanonicalKmer {
        CanonicalKmer::encode(dna, dna.len()).unwrap()
    }

    #[test]
    fn test_bloom_admits_at_threshold() {
        let counter = BloomCounter::<u16>::with_seed(1 << 12, 1, 1_982_627, 11);
        let mut filter = BloomAdmission::new(counter, 3);
        let mut table = ResultTable::new();
        filter.observe(kmer("ACGTA"), &mut table);
        filter.observe(kmer("ACGTA"), &mut table);
        assert!(!table.contains(&kmer("ACGTA")));
        filter.observe(kmer("TACGT"), &mut table);
        assert!(table.contains(&kmer("ACGTA")));
        assert_eq!(filter.counter().estimate(kmer("ACGTA").hash_code()), 3);
        filter.reset();
        assert!(filter.counter().is_empty());
    }

    #[test]
    fn test_bloom_gate_clamps_to_counter_max() {
        let counter = BloomCounter::<u8>::with_seed(16, 1, 101, 5);
        let mut filter = BloomAdmission::new(counter, 1_000);
        let mut table = ResultTable::new();
        for _ in 0..255 {
            filter.observe(kmer("GATTACA"), &mut table);
        }
        assert!(table.contains(&kmer("GATTACA")));
    }

    #[test]
    fn test_misra_gries_admits_survivors() {
        let mut filter = MisraGriesAdmission::new(2);
        let mut table = ResultTable::new();
        for dna in ["AAA", "AAC", "TTT", "ACC", "AAA"] {
            filter.observe(kmer(dna), &mut table);
        }
        assert!(table.is_empty());
        filter.finish_pass(&mut table);
        assert!(table.contains(&kmer("AAA")));
        assert!(table.len() <= 2);
        filter.reset();
        assert!(filter.summary().is_empty());
    }
}
