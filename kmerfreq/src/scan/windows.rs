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

//! Sliding k-mer windows over a sequence source.

use std::io::BufRead;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::RecordLayout;
use crate::error::Error;
use crate::kmer::CanonicalKmer;
use crate::kmer::MAX_K;
use crate::kmer::check_k;
use crate::kmer::encode_byte;
use crate::scan::SequenceSource;

/// Counters gathered during one pass over a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Full-length windows seen.
    pub windows: u64,
    /// Windows that encoded to a k-mer and reached the operation.
    pub valid: u64,
    /// Windows dropped for holding a symbol outside `{A, C, G, T}`.
    pub invalid: u64,
    /// True if a read error ended the pass before the end of the source.
    pub truncated: bool,
}

enum Slide {
    /// Fewer than `k` symbols since the window was last cleared.
    Filling,
    /// The last `k` symbols include one outside `{A, C, G, T}`.
    Invalid,
    Kmer(CanonicalKmer),
}

/// Rolling 2-bit encoding of the last `k` symbols on both strands.
struct Window {
    k: usize,
    mask: u128,
    shift: usize,
    forward: u128,
    reverse: u128,
    filled: usize,
    run: usize,
}

impl Window {
    fn new(k: usize) -> Self {
        let mask = if k == MAX_K {
            u128::MAX
        } else {
            (1u128 << (2 * k)) - 1
        };
        Self {
            k,
            mask,
            shift: 2 * (k - 1),
            forward: 0,
            reverse: 0,
            filled: 0,
            run: 0,
        }
    }

    fn clear(&mut self) {
        self.forward = 0;
        self.reverse = 0;
        self.filled = 0;
        self.run = 0;
    }

    /// Slides `symbol` in. An invalid symbol restarts the run of valid bases, and the window
    /// yields k-mers again once `k` valid bases follow it.
    fn push(&mut self, symbol: u8) -> Slide {
        self.filled = (self.filled + 1).min(self.k);
        match encode_byte(symbol) {
            Some(code) => {
                self.forward = ((self.forward << 2) | code) & self.mask;
                self.reverse = (self.reverse >> 2) | ((0b11 ^ code) << self.shift);
                self.run = (self.run + 1).min(self.k);
            }
            None => self.run = 0,
        }
        if self.filled < self.k {
            Slide::Filling
        } else if self.run < self.k {
            Slide::Invalid
        } else {
            Slide::Kmer(CanonicalKmer::from_strands(
                self.forward,
                self.reverse,
                self.k,
            ))
        }
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}

/// Streams every valid canonical k-mer of `source` into `op`, in input order.
///
/// Windows holding an invalid symbol are skipped. A read error in the middle of the pass is
/// logged and ends the pass as if the source had ended.
///
/// # Errors
///
/// Returns an [`Io`](crate::error::ErrorKind::Io) error if the source cannot be opened, or
/// [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if `k` is not in
/// `1..=MAX_K`.
pub fn for_each_kmer<S, F>(
    source: &S,
    k: usize,
    layout: RecordLayout,
    mut op: F,
) -> Result<PassStats, Error>
where
    S: SequenceSource + ?Sized,
    F: FnMut(CanonicalKmer),
{
    check_k(k)?;
    let mut reader = source.open()?;
    let mut window = Window::new(k);
    let mut line = Vec::new();
    let mut stats = PassStats::default();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "read error, ending pass early");
                stats.truncated = true;
                break;
            }
        }
        let sequence = trim_line_end(&line);
        match layout {
            RecordLayout::Fasta => {
                if matches!(sequence.first(), Some(b'>' | b';')) {
                    window.clear();
                    continue;
                }
            }
            RecordLayout::Lines => window.clear(),
        }
        for &symbol in sequence {
            match window.push(symbol) {
                Slide::Filling => {}
                Slide::Invalid => {
                    stats.windows += 1;
                    stats.invalid += 1;
                    trace!(window = stats.windows, "skipping k-mer with invalid symbol");
                }
                Slide::Kmer(kmer) => {
                    stats.windows += 1;
                    stats.valid += 1;
                    op(kmer);
                }
            }
        }
    }
    debug!(
        windows = stats.windows,
        valid = stats.valid,
        invalid = stats.invalid,
        "finished pass"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide_all(window: &mut Window, dna: &[u8]) -> Vec<Option<String>> {
        dna.iter()
            .filter_map(|&symbol| match window.push(symbol) {
                Slide::Filling => None,
                Slide::Invalid => Some(None),
                Slide::Kmer(kmer) => Some(Some(kmer.to_string())),
            })
            .collect()
    }

    #[test]
    fn test_window_slides() {
        let mut window = Window::new(2);
        assert_eq!(
            slide_all(&mut window, b"acg"),
            [Some("ac".to_string()), Some("cg".to_string())]
        );
        window.clear();
        assert!(matches!(window.push(b't'), Slide::Filling));
    }

    #[test]
    fn test_invalid_symbol_restarts_run() {
        let mut window = Window::new(3);
        let slides = slide_all(&mut window, b"ACGNTTGCA");
        let expected = [
            Some("acg"),
            None,
            None,
            None,
            Some("caa"),
            Some("gca"),
            Some("gca"),
        ];
        let expected: Vec<Option<String>> = expected
            .iter()
            .map(|kmer| kmer.map(str::to_string))
            .collect();
        assert_eq!(slides, expected);
    }

    #[test]
    fn test_rolling_matches_direct_encoding() {
        let dna = b"GATTACAnNACGTTGCAtgcaGGGTTTAAACCCrACGTACGTAGCTAGCTAGGCTTACGGATCC";
        for k in [1, 2, 5, 13, 31] {
            let mut window = Window::new(k);
            let rolled = slide_all(&mut window, dna);
            let direct: Vec<Option<String>> = dna
                .windows(k)
                .map(|bytes| CanonicalKmer::from_bytes(bytes, k).ok().map(|c| c.to_string()))
                .collect();
            assert_eq!(rolled, direct, "k = {k}");
        }
    }

    #[test]
    fn test_full_width_window() {
        let dna = "ACGT".repeat(20);
        let mut window = Window::new(MAX_K);
        let rolled = slide_all(&mut window, dna.as_bytes());
        assert_eq!(rolled.len(), 80 - MAX_K + 1);
        for (start, kmer) in rolled.iter().enumerate() {
            let direct = CanonicalKmer::from_bytes(&dna.as_bytes()[start..start + MAX_K], MAX_K)
                .unwrap()
                .to_string();
            assert_eq!(kmer.as_deref(), Some(direct.as_str()));
        }
    }

    #[test]
    fn test_trim_line_end() {
        assert_eq!(trim_line_end(b"ACGT\r\n"), b"ACGT");
        assert_eq!(trim_line_end(b"ACGT"), b"ACGT");
        assert_eq!(trim_line_end(b"\n"), b"");
    }
}
