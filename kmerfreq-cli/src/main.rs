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

//! Command-line front end: count frequent k-mers of a FASTA file.

use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use kmerfreq::config::BinPolicy;
use kmerfreq::config::CountingConfig;
use kmerfreq::config::CountingConfigBuilder;
use kmerfreq::config::DEFAULT_BLOOM_HASHES;
use kmerfreq::config::DEFAULT_BLOOM_PRIME;
use kmerfreq::config::DEFAULT_BLOOM_SLOTS;
use kmerfreq::config::DEFAULT_HEADROOM;
use kmerfreq::config::DEFAULT_MISRA_GRIES_CAPACITY;
use kmerfreq::config::RecordLayout;
use kmerfreq::error::Error;
use kmerfreq::error::ErrorKind;
use kmerfreq::scan::FastaFile;
use kmerfreq::scan::count_kmers_with;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Counting Bloom filter admission
    Bloom,
    /// Misra-Gries summary admission
    MisraGries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Header lines start with '>' or ';'; sequence lines of a record are joined
    Fasta,
    /// Every line is its own sequence
    Lines,
}

#[derive(Debug, Parser)]
#[command(name = "kmerfreq")]
#[command(version)]
#[command(about = "Report k-mers occurring at least q times, in bounded memory", long_about = None)]
struct Cli {
    /// Input FASTA file
    input: PathBuf,

    /// K-mer length
    #[arg(short, long)]
    k: usize,

    /// Frequency threshold
    #[arg(short, long)]
    q: u64,

    /// Candidate admission algorithm
    #[arg(long, value_enum, default_value_t = Algorithm::Bloom)]
    algorithm: Algorithm,

    /// Bloom counter slots
    #[arg(long, default_value_t = DEFAULT_BLOOM_SLOTS)]
    slots: usize,

    /// Bloom hash functions
    #[arg(long, default_value_t = DEFAULT_BLOOM_HASHES)]
    hashes: usize,

    /// Prime modulus of the Bloom hash functions
    #[arg(long, default_value_t = DEFAULT_BLOOM_PRIME)]
    prime: u64,

    /// Misra-Gries capacity
    #[arg(long, default_value_t = DEFAULT_MISRA_GRIES_CAPACITY)]
    capacity: usize,

    /// Fixed number of bins (planned from the file size when absent)
    #[arg(long)]
    bins: Option<u64>,

    /// Load reduction factor used when planning bins
    #[arg(long, default_value_t = DEFAULT_HEADROOM)]
    headroom: u64,

    /// Input line layout
    #[arg(long, value_enum, default_value_t = Layout::Fasta)]
    layout: Layout,

    /// Seed for the Bloom hash parameters
    #[arg(long)]
    seed: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<CountingConfig, Error> {
        let mut builder = CountingConfigBuilder::new(self.k, self.q);
        builder = match self.algorithm {
            Algorithm::Bloom => builder.bloom(self.slots, self.hashes, self.prime),
            Algorithm::MisraGries => builder.misra_gries(self.capacity),
        };
        builder = match self.bins {
            Some(bins) => builder.bins(BinPolicy::Fixed(bins)),
            None => builder.bins(BinPolicy::Auto {
                headroom: self.headroom,
            }),
        };
        builder = builder.layout(match self.layout {
            Layout::Fasta => RecordLayout::Fasta,
            Layout::Lines => RecordLayout::Lines,
        });
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config().context("invalid arguments")?;
    let source = FastaFile::new(&cli.input);
    info!(input = %source.path().display(), ?config, "counting k-mers");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = count_kmers_with(&source, &config, |row| {
        writeln!(out, "{row}")
            .map_err(|err| Error::new(ErrorKind::Io, "failed to write output").with_source(err))
    })
    .with_context(|| format!("failed to count k-mers of {}", cli.input.display()))?;
    out.flush().context("failed to flush output")?;

    info!(
        bins = stats.bins,
        passes = stats.passes,
        candidates = stats.candidates,
        reported = stats.reported,
        "done"
    );
    if stats.truncated_passes > 0 {
        warn!(
            truncated_passes = stats.truncated_passes,
            "read errors cut passes short, counts may be incomplete"
        );
    }
    Ok(())
}
