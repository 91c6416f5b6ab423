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

//! The two-pass-per-bin counting driver.

use tracing::info;

use crate::config::CountingConfig;
use crate::config::RecordLayout;
use crate::error::Error;
use crate::kmer::CanonicalKmer;
use crate::scan::CandidateFilter;
use crate::scan::SequenceSource;
use crate::scan::for_each_kmer;
use crate::table::KmerCount;
use crate::table::ResultTable;

/// Totals of a counting run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of bins processed.
    pub bins: u64,
    /// Number of full passes over the source.
    pub passes: u64,
    /// Candidates admitted over all bins.
    pub candidates: u64,
    /// K-mers reported at or above the threshold.
    pub reported: u64,
    /// Valid k-mers seen per pass.
    pub kmers_per_pass: u64,
    /// Passes a read error ended before the end of the source.
    ///
    /// When non-zero the reported counts only cover the input read before the errors.
    pub truncated_passes: u64,
}

/// What one bin contributed to a run.
struct BinOutcome {
    rows: Vec<KmerCount>,
    candidates: usize,
    kmers: u64,
    truncated_passes: u64,
}

/// Returns the bin a k-mer is routed to.
pub fn bin_of(kmer: &CanonicalKmer, num_bins: u64) -> u64 {
    kmer.hash_code() % num_bins
}

/// Drives the admission and exact passes of every bin over one source.
///
/// For each bin the source is scanned twice: first the k-mers routed to the bin feed the
/// [`CandidateFilter`], then every k-mer of the source is re-counted exactly if it was
/// admitted. Candidates counted at least `threshold` times are emitted before the filter is
/// reset for the next bin.
#[derive(Debug)]
pub struct KmerCounter<'a, S: ?Sized, F> {
    source: &'a S,
    filter: F,
    k: usize,
    threshold: u64,
    layout: RecordLayout,
    num_bins: u64,
}

impl<'a, S, F> KmerCounter<'a, S, F>
where
    S: SequenceSource + ?Sized,
    F: CandidateFilter,
{
    /// Creates a driver over `source` with `num_bins` bins.
    ///
    /// # Panics
    ///
    /// Panics if `num_bins` is zero.
    pub fn new(source: &'a S, filter: F, config: &CountingConfig, num_bins: u64) -> Self {
        assert!(num_bins >= 1, "num_bins must be at least 1");
        Self {
            source,
            filter,
            k: config.k(),
            threshold: config.threshold(),
            layout: config.layout(),
            num_bins,
        }
    }

    /// Returns the number of bins.
    pub fn num_bins(&self) -> u64 {
        self.num_bins
    }

    /// Returns the candidate filter.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Runs every bin, handing each reported k-mer to `emit` as soon as its bin completes.
    ///
    /// # Errors
    ///
    /// Returns the first error from opening the source or from `emit`.
    pub fn run_with<E>(&mut self, mut emit: E) -> Result<RunStats, Error>
    where
        E: FnMut(KmerCount) -> Result<(), Error>,
    {
        let mut stats = RunStats::default();
        for bin in 0..self.num_bins {
            let outcome = self.count_bin(bin)?;
            info!(
                bin,
                bins = self.num_bins,
                candidates = outcome.candidates,
                reported = outcome.rows.len(),
                "finished bin"
            );
            stats.bins += 1;
            stats.passes += 2;
            stats.candidates += outcome.candidates as u64;
            stats.reported += outcome.rows.len() as u64;
            stats.kmers_per_pass = outcome.kmers;
            stats.truncated_passes += outcome.truncated_passes;
            for row in outcome.rows {
                emit(row)?;
            }
        }
        Ok(stats)
    }

    /// Runs every bin and collects the reported k-mers.
    pub fn run(&mut self) -> Result<Vec<KmerCount>, Error> {
        let mut rows = Vec::new();
        self.run_with(|row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(rows)
    }

    /// Runs both passes of a single bin. The filter is empty when this returns, whether or not
    /// the passes succeeded.
    fn count_bin(&mut self, bin: u64) -> Result<BinOutcome, Error> {
        self.filter.reset();
        let outcome = self.scan_bin(bin);
        self.filter.reset();
        outcome
    }

    fn scan_bin(&mut self, bin: u64) -> Result<BinOutcome, Error> {
        let num_bins = self.num_bins;
        let mut table = ResultTable::new();

        let filter = &mut self.filter;
        let admission = for_each_kmer(self.source, self.k, self.layout, |kmer| {
            if bin_of(&kmer, num_bins) == bin {
                filter.observe(kmer, &mut table);
            }
        })?;
        filter.finish_pass(&mut table);
        let candidates = table.len();

        table.start_recount();
        let recount = for_each_kmer(self.source, self.k, self.layout, |kmer| {
            table.record(&kmer);
        })?;

        Ok(BinOutcome {
            rows: table.into_frequent(self.threshold),
            candidates,
            kmers: recount.valid,
            truncated_passes: u64::from(admission.truncated) + u64::from(recount.truncated),
        })
    }
}
