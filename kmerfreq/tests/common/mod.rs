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
use std::path::PathBuf;

use kmerfreq::config::RecordLayout;
use kmerfreq::kmer::CanonicalKmer;
use kmerfreq::scan::SequenceSource;
use kmerfreq::scan::for_each_kmer;

#[allow(dead_code)]
pub fn test_data(name: &str) -> PathBuf {
    const TEST_DATA_DIR: &str = "tests/data";

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(TEST_DATA_DIR)
        .join(name)
}

/// Exact single-pass count of every canonical k-mer, formatted and sorted like the driver's
/// output for a single bin.
#[allow(dead_code)]
pub fn naive_frequent<S: SequenceSource + ?Sized>(
    source: &S,
    k: usize,
    threshold: u64,
    layout: RecordLayout,
) -> Vec<String> {
    let mut counts: HashMap<CanonicalKmer, u64> = HashMap::new();
    for_each_kmer(source, k, layout, |kmer| {
        *counts.entry(kmer).or_insert(0) += 1;
    })
    .unwrap();
    let mut rows: Vec<(u64, CanonicalKmer)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= threshold)
        .map(|(kmer, count)| (count, kmer))
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    rows.into_iter()
        .map(|(count, kmer)| format!("{count} {kmer}"))
        .collect()
}

/// A random DNA string of `len` bases.
#[allow(dead_code)]
pub fn random_dna(len: usize, seed: u64) -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| BASES[rng.random_range(0..4)]).collect()
}
