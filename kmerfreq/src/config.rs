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

//! Run configuration and bin planning.
//!
//! ```rust
//! # use kmerfreq::config::BinPolicy;
//! # use kmerfreq::config::CountingConfigBuilder;
//! # use kmerfreq::config::Strategy;
//! let config = CountingConfigBuilder::new(21, 5)
//!     .misra_gries(4096)
//!     .bins(BinPolicy::Fixed(4))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.strategy(), Strategy::MisraGries { capacity: 4096 });
//! assert_eq!(config.plan_bins(1 << 30), 4);
//! ```

use crate::error::Error;
use crate::kmer::MAX_K;

/// Default number of Bloom counter slots.
pub const DEFAULT_BLOOM_SLOTS: usize = 100_000;
/// Default number of Bloom hash functions.
pub const DEFAULT_BLOOM_HASHES: usize = 2;
/// Default prime modulus of the Bloom hash functions; much larger than the default slot count.
pub const DEFAULT_BLOOM_PRIME: u64 = 1_982_627;
/// Default Misra-Gries capacity.
pub const DEFAULT_MISRA_GRIES_CAPACITY: usize = 65_536;
/// Default headroom of [`BinPolicy::Auto`].
pub const DEFAULT_HEADROOM: u64 = 2;

/// Approximate structure used to admit candidates in the first pass of a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Admit a k-mer once its counting Bloom filter estimate reaches the threshold.
    Bloom {
        /// Number of counter slots.
        slots: usize,
        /// Number of hash functions.
        hashes: usize,
        /// Prime modulus of the hash functions.
        prime: u64,
    },
    /// Admit every k-mer left in a Misra-Gries summary at the end of the pass.
    MisraGries {
        /// Maximum number of tracked k-mers.
        capacity: usize,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Bloom {
            slots: DEFAULT_BLOOM_SLOTS,
            hashes: DEFAULT_BLOOM_HASHES,
            prime: DEFAULT_BLOOM_PRIME,
        }
    }
}

/// How the k-mer universe is split into bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinPolicy {
    /// Use exactly this many bins.
    Fixed(u64),
    /// Plan the bin count from the estimated input length.
    ///
    /// Larger `headroom` means more bins and a lighter load on the approximate structure:
    /// for the Bloom strategy the expected load per slot is `threshold / headroom`, and for
    /// the Misra-Gries strategy the expected stream length per bin is
    /// `threshold * capacity / headroom`. More bins cost two extra scans each.
    Auto {
        /// Load reduction factor, at least 1.
        headroom: u64,
    },
}

impl Default for BinPolicy {
    fn default() -> Self {
        BinPolicy::Auto {
            headroom: DEFAULT_HEADROOM,
        }
    }
}

/// How lines of the sequence source map to sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// FASTA: `>` and `;` lines are headers; the sequence lines of a record are joined.
    #[default]
    Fasta,
    /// Every line is an independent sequence.
    Lines,
}

/// Validated configuration of a counting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingConfig {
    k: usize,
    threshold: u64,
    strategy: Strategy,
    bins: BinPolicy,
    layout: RecordLayout,
    seed: Option<u64>,
}

impl CountingConfig {
    /// Returns the k-mer length.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the frequency threshold.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Returns the admission strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the bin policy.
    pub fn bin_policy(&self) -> BinPolicy {
        self.bins
    }

    /// Returns the record layout.
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Returns the seed of the Bloom hash parameters, if fixed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the number of bins for a source of `estimated_kmers` k-mers.
    ///
    /// The source length in bytes is a fine estimate of its k-mer count.
    pub fn plan_bins(&self, estimated_kmers: u64) -> u64 {
        match (self.bins, self.strategy) {
            (BinPolicy::Fixed(bins), _) => bins,
            (BinPolicy::Auto { headroom }, Strategy::Bloom { slots, hashes, .. }) => {
                bloom_bins(estimated_kmers, self.threshold, slots, hashes, headroom)
            }
            (BinPolicy::Auto { headroom }, Strategy::MisraGries { capacity }) => {
                misra_gries_bins(estimated_kmers, self.threshold, capacity, headroom)
            }
        }
    }
}

/// Bins for the Bloom strategy: keep the expected per-slot load near `threshold / headroom`.
pub fn bloom_bins(
    estimated_kmers: u64,
    threshold: u64,
    slots: usize,
    hashes: usize,
    headroom: u64,
) -> u64 {
    let load = (threshold / headroom.max(1)).max(1) as u128;
    let increments = estimated_kmers as u128 * hashes as u128;
    saturate(increments / load / slots.max(1) as u128).saturating_add(1)
}

/// Bins for the Misra-Gries strategy: keep the expected per-bin stream length below
/// `threshold * capacity / headroom`, so frequent k-mers stay above the `T / N` recall bound.
pub fn misra_gries_bins(
    estimated_kmers: u64,
    threshold: u64,
    capacity: usize,
    headroom: u64,
) -> u64 {
    let budget = threshold.max(1) as u128 * capacity.max(1) as u128;
    saturate(estimated_kmers as u128 * headroom.max(1) as u128 / budget).saturating_add(1)
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Builder for [`CountingConfig`].
#[derive(Debug, Clone)]
pub struct CountingConfigBuilder {
    k: usize,
    threshold: u64,
    strategy: Strategy,
    bins: BinPolicy,
    layout: RecordLayout,
    seed: Option<u64>,
}

impl CountingConfigBuilder {
    /// Starts a configuration for k-mers of length `k` reported at `threshold` occurrences.
    ///
    /// Defaults to the Bloom strategy with [`DEFAULT_BLOOM_SLOTS`], [`DEFAULT_BLOOM_HASHES`]
    /// and [`DEFAULT_BLOOM_PRIME`], automatic bins, and FASTA layout.
    pub fn new(k: usize, threshold: u64) -> Self {
        Self {
            k,
            threshold,
            strategy: Strategy::default(),
            bins: BinPolicy::default(),
            layout: RecordLayout::default(),
            seed: None,
        }
    }

    /// Uses a counting Bloom filter to admit candidates.
    pub fn bloom(mut self, slots: usize, hashes: usize, prime: u64) -> Self {
        self.strategy = Strategy::Bloom {
            slots,
            hashes,
            prime,
        };
        self
    }

    /// Uses a Misra-Gries summary to admit candidates.
    pub fn misra_gries(mut self, capacity: usize) -> Self {
        self.strategy = Strategy::MisraGries { capacity };
        self
    }

    /// Sets the admission strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the bin policy.
    pub fn bins(mut self, bins: BinPolicy) -> Self {
        self.bins = bins;
        self
    }

    /// Sets the record layout.
    pub fn layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Fixes the seed of the Bloom hash parameters for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if any value is
    /// out of range.
    pub fn build(self) -> Result<CountingConfig, Error> {
        if !(1..=MAX_K).contains(&self.k) {
            return Err(Error::invalid_argument(format!(
                "k must be in [1, {MAX_K}]; got {}",
                self.k
            )));
        }
        if self.threshold == 0 {
            return Err(Error::invalid_argument("threshold must be at least 1"));
        }
        match self.strategy {
            Strategy::Bloom {
                slots,
                hashes,
                prime,
            } => {
                if slots == 0 {
                    return Err(Error::invalid_argument("bloom slots must be at least 1"));
                }
                if hashes == 0 {
                    return Err(Error::invalid_argument(
                        "bloom hash count must be at least 1",
                    ));
                }
                if prime <= slots as u64 {
                    return Err(Error::invalid_argument(format!(
                        "bloom prime must exceed the slot count {slots}; got {prime}"
                    )));
                }
            }
            Strategy::MisraGries { capacity } => {
                if capacity == 0 {
                    return Err(Error::invalid_argument(
                        "misra-gries capacity must be at least 1",
                    ));
                }
            }
        }
        match self.bins {
            BinPolicy::Fixed(0) => {
                return Err(Error::invalid_argument("bin count must be at least 1"));
            }
            BinPolicy::Auto { headroom: 0 } => {
                return Err(Error::invalid_argument("bin headroom must be at least 1"));
            }
            _ => {}
        }
        Ok(CountingConfig {
            k: self.k,
            threshold: self.threshold,
            strategy: self.strategy,
            bins: self.bins,
            layout: self.layout,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bloom_bins_follow_half_threshold_load() {
        // 10 MB, 2 hashes, threshold 10 -> load 5 per slot over 100k slots
        assert_eq!(bloom_bins(10_000_000, 10, 100_000, 2, 2), 41);
        assert_eq!(bloom_bins(0, 10, 100_000, 2, 2), 1);
    }

    #[test]
    fn test_bloom_bins_threshold_one() {
        assert_eq!(bloom_bins(1_000, 1, 100, 2, 2), 21);
    }

    #[test]
    fn test_misra_gries_bins() {
        assert_eq!(misra_gries_bins(1_000_000, 10, 1_000, 2), 201);
        assert_eq!(misra_gries_bins(100, 10, 1_000, 2), 1);
    }

    #[test]
    fn test_huge_estimate_saturates() {
        let bins = bloom_bins(u64::MAX, 1, 1, 64, 1);
        assert_eq!(bins, u64::MAX);
    }

    #[test]
    fn test_quotient_at_u64_max_saturates() {
        assert_eq!(bloom_bins(u64::MAX, 1, 1, 1, 1), u64::MAX);
        assert_eq!(misra_gries_bins(u64::MAX, 1, 1, 1), u64::MAX);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let cases = [
            CountingConfigBuilder::new(0, 2),
            CountingConfigBuilder::new(65, 2),
            CountingConfigBuilder::new(3, 0),
            CountingConfigBuilder::new(3, 2).bloom(0, 2, 7),
            CountingConfigBuilder::new(3, 2).bloom(10, 0, 11),
            CountingConfigBuilder::new(3, 2).bloom(10, 2, 10),
            CountingConfigBuilder::new(3, 2).misra_gries(0),
            CountingConfigBuilder::new(3, 2).bins(BinPolicy::Fixed(0)),
            CountingConfigBuilder::new(3, 2).bins(BinPolicy::Auto { headroom: 0 }),
        ];
        for builder in cases {
            let err = builder.clone().build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{builder:?}");
        }
    }

    #[test]
    fn test_defaults() {
        let config = CountingConfigBuilder::new(31, 3).build().unwrap();
        assert_eq!(config.strategy(), Strategy::default());
        assert_eq!(config.bin_policy(), BinPolicy::Auto { headroom: 2 });
        assert_eq!(config.layout(), RecordLayout::Fasta);
        assert_eq!(config.seed(), None);
    }
}
