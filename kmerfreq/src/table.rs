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

//! Exact re-count of admitted candidates.
//!
//! A [`ResultTable`] lives for one bin. During the admission pass candidates are added with
//! [`ResultTable::admit`]; [`ResultTable::start_recount`] then freezes the key set, and the
//! exact pass only increments keys that are already present.

use std::collections::HashMap;
use std::fmt;

use crate::kmer::CanonicalKmer;

/// An emitted k-mer together with its exact count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerCount {
    /// Exact number of occurrences, counting both orientations.
    pub count: u64,
    /// The canonical k-mer.
    pub kmer: CanonicalKmer,
}

impl fmt::Display for KmerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.kmer)
    }
}

/// Candidate k-mers of one bin and their exact counts.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    counts: HashMap<CanonicalKmer, u64>,
    recounting: bool,
}

impl ResultTable {
    /// Creates an empty table in the admission phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns true if `kmer` is a candidate.
    pub fn contains(&self, kmer: &CanonicalKmer) -> bool {
        self.counts.contains_key(kmer)
    }

    /// Returns true once [`ResultTable::start_recount`] has been called.
    pub fn is_recounting(&self) -> bool {
        self.recounting
    }

    /// Admits `kmer` as a candidate. Admitting a candidate twice has no further effect.
    ///
    /// # Panics
    ///
    /// Panics if the table is already recounting.
    pub fn admit(&mut self, kmer: CanonicalKmer) {
        assert!(!self.recounting, "cannot admit candidates while recounting");
        self.counts.entry(kmer).or_insert(0);
    }

    /// Freezes the candidate set and zeroes every count.
    pub fn start_recount(&mut self) {
        self.counts.values_mut().for_each(|count| *count = 0);
        self.recounting = true;
    }

    /// Counts one occurrence of `kmer` if it is a candidate, returning whether it was.
    pub fn record(&mut self, kmer: &CanonicalKmer) -> bool {
        debug_assert!(self.recounting, "recording before the recount started");
        match self.counts.get_mut(kmer) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Returns the exact count of `kmer`, or `None` if it is not a candidate.
    pub fn count(&self, kmer: &CanonicalKmer) -> Option<u64> {
        self.counts.get(kmer).copied()
    }

    /// Consumes the table, returning candidates counted at least `threshold` times.
    ///
    /// Results are ordered by descending count, then ascending k-mer.
    pub fn into_frequent(self, threshold: u64) -> Vec<KmerCount> {
        let mut rows: Vec<KmerCount> = self
            .counts
            .into_iter()
            .filter(|&(_, count)| count >= threshold)
            .map(|(kmer, count)| KmerCount { count, kmer })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kmer.cmp(&b.kmer)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmer(dna: &str) -> CanonicalKmer {
        CanonicalKmer::encode(dna, dna.len()).unwrap()
    }

    #[test]
    fn test_recount_ignores_unadmitted() {
        let mut table = ResultTable::new();
        table.admit(kmer("AAA"));
        table.start_recount();
        assert!(table.record(&kmer("AAA")));
        assert!(table.record(&kmer("TTT")));
        assert!(!table.record(&kmer("CCA")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&kmer("AAA")), Some(2));
        assert_eq!(table.count(&kmer("CCA")), None);
    }

    #[test]
    fn test_start_recount_zeroes_counts() {
        let mut table = ResultTable::new();
        assert!(!table.is_recounting());
        table.admit(kmer("ACG"));
        table.start_recount();
        assert!(table.is_recounting());
        table.record(&kmer("ACG"));
        table.start_recount();
        assert_eq!(table.count(&kmer("ACG")), Some(0));
    }

    #[test]
    #[should_panic(expected = "cannot admit candidates while recounting")]
    fn test_admit_after_recount_panics() {
        let mut table = ResultTable::new();
        table.start_recount();
        table.admit(kmer("ACG"));
    }

    #[test]
    fn test_into_frequent_filters_and_orders() {
        let mut table = ResultTable::new();
        for dna in ["AAC", "AAA", "ACC"] {
            table.admit(kmer(dna));
        }
        table.start_recount();
        for dna in ["ACC", "AAC", "AAA", "ACC", "AAC", "GGT"] {
            table.record(&kmer(dna));
        }
        let rows: Vec<String> = table
            .into_frequent(2)
            .iter()
            .map(|row| row.to_string())
            .collect();
        assert_eq!(rows, ["3 acc", "2 aac"]);
    }
}
