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

//! Binned two-pass scanning of a sequence source.
//!
//! # Protocol
//!
//! Every canonical k-mer is routed to bin `hash_code(kmer) mod num_bins`. Bins are processed
//! one after the other, and each bin costs two full scans of the source:
//!
//! 1. **Admission.** K-mers of the current bin feed a [`CandidateFilter`]. The Bloom strategy
//!    admits a k-mer once its estimate reaches the threshold; the Misra-Gries strategy admits
//!    whatever its summary still tracks at the end of the scan.
//! 2. **Exact recount.** Every k-mer of the source is counted if, and only if, it was
//!    admitted. No new candidates appear in this scan.
//!
//! Candidates whose exact count reaches the threshold are emitted, then the filter is reset
//! and the candidate table dropped before the next bin. Peak memory is the filter plus one
//! bin's candidates, independent of the number of distinct k-mers in the input.
//!
//! Windows holding symbols outside `{A, C, G, T}` are skipped in both scans.
//!
//! # Usage
//!
//! ```rust
//! # use kmerfreq::config::BinPolicy;
//! # use kmerfreq::config::CountingConfigBuilder;
//! # use kmerfreq::scan::MemorySource;
//! # use kmerfreq::scan::count_kmers;
//! let source = MemorySource::new(">a\nACGTNACGT\n>b\nACGT\n");
//! let config = CountingConfigBuilder::new(4, 3)
//!     .misra_gries(16)
//!     .bins(BinPolicy::Fixed(3))
//!     .build()
//!     .unwrap();
//! let counts = count_kmers(&source, &config).unwrap();
//! assert_eq!(counts.len(), 1);
//! assert_eq!(counts[0].count, 3);
//! assert_eq!(counts[0].kmer.to_string(), "acgt");
//! ```

mod counter;
mod source;
mod strategy;
mod windows;

pub use self::counter::KmerCounter;
pub use self::counter::RunStats;
pub use self::counter::bin_of;
pub use self::source::FastaFile;
pub use self::source::MemorySource;
pub use self::source::SequenceSource;
pub use self::strategy::BloomAdmission;
pub use self::strategy::CandidateFilter;
pub use self::strategy::MisraGriesAdmission;
pub use self::windows::PassStats;
pub use self::windows::for_each_kmer;

use crate::bloom::BloomCounter;
use crate::config::CountingConfig;
use crate::config::Strategy;
use crate::error::Error;
use crate::table::KmerCount;

/// Counts `source` under `config`, streaming each reported k-mer into `emit`.
///
/// The bin count is planned from [`SequenceSource::estimated_len`].
///
/// # Errors
///
/// Returns an error if the source cannot be opened or measured, or the first error returned
/// by `emit`.
pub fn count_kmers_with<S, E>(
    source: &S,
    config: &CountingConfig,
    emit: E,
) -> Result<RunStats, Error>
where
    S: SequenceSource + ?Sized,
    E: FnMut(KmerCount) -> Result<(), Error>,
{
    let num_bins = config.plan_bins(source.estimated_len()?);
    match config.strategy() {
        Strategy::Bloom {
            slots,
            hashes,
            prime,
        } => {
            let counter = match config.seed() {
                Some(seed) => BloomCounter::<u16>::with_seed(slots, hashes, prime, seed),
                None => BloomCounter::<u16>::new(slots, hashes, prime),
            };
            let filter = BloomAdmission::new(counter, config.threshold());
            KmerCounter::new(source, filter, config, num_bins).run_with(emit)
        }
        Strategy::MisraGries { capacity } => {
            let filter = MisraGriesAdmission::new(capacity);
            KmerCounter::new(source, filter, config, num_bins).run_with(emit)
        }
    }
}

/// Counts `source` under `config` and collects the reported k-mers.
///
/// Within a bin the k-mers are ordered by descending count, then ascending k-mer; bins follow
/// each other in index order.
pub fn count_kmers<S>(source: &S, config: &CountingConfig) -> Result<Vec<KmerCount>, Error>
where
    S: SequenceSource + ?Sized,
{
    let mut rows = Vec::new();
    count_kmers_with(source, config, |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}
