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

//! Memory-bounded k-mer frequency counting.
//!
//! This crate reports every canonical k-mer of a DNA sequence source whose occurrence count
//! reaches a threshold, while keeping working memory far below the size of the input. The
//! source is scanned twice per bin:
//!
//! 1. An approximate structure (a counting Bloom filter or a Misra-Gries summary) admits
//!    provisional candidates among the k-mers routed to the current bin.
//! 2. A second scan counts the candidates exactly, and those reaching the threshold are emitted.
//!
//! The number of bins is planned from the estimated input size so that the approximate
//! structure's load stays bounded no matter how many distinct k-mers the input holds.
//!
//! # Usage
//!
//! ```rust
//! # use kmerfreq::config::CountingConfigBuilder;
//! # use kmerfreq::scan::MemorySource;
//! # use kmerfreq::scan::count_kmers;
//! let source = MemorySource::new(">read\nAAACCCAAAGGG\n");
//! let config = CountingConfigBuilder::new(3, 2).build().unwrap();
//! let counts = count_kmers(&source, &config).unwrap();
//! // GGG is the reverse complement of CCC, so both fold into "ccc".
//! let lines: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
//! assert_eq!(lines, ["2 aaa", "2 ccc"]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod config;
pub mod error;
pub mod frequencies;
pub mod kmer;
pub mod scan;
pub mod table;

mod hash;
