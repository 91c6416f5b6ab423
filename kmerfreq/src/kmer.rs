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

//! Packed k-mers and their canonical form.
//!
//! A k-mer of length `k` is stored in `2k` bits using two bits per base:
//!
//! | base | bits |
//! |------|------|
//! | `A`  | `00` |
//! | `C`  | `01` |
//! | `G`  | `10` |
//! | `T`  | `11` |
//!
//! Base `i` (counted from the start of the string) occupies bits `2(k-1-i)` and `2(k-1-i)+1`,
//! so the first base is the most significant pair and comparing the packed values compares the
//! k-mers lexicographically.
//!
//! Double-stranded DNA may be read in either direction, so counting works on
//! [`CanonicalKmer`]s: the smaller of a k-mer and its reverse complement.
//!
//! ```rust
//! # use kmerfreq::kmer::CanonicalKmer;
//! let forward = CanonicalKmer::encode("GGGT", 4).unwrap();
//! let reverse = CanonicalKmer::encode("acCC", 4).unwrap();
//! assert_eq!(forward, reverse);
//! assert_eq!(forward.to_string(), "accc");
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;
use crate::hash::hash_packed;

/// The longest supported k-mer; `2 * MAX_K` bits fill a `u128`.
pub const MAX_K: usize = 64;

const BASES: [char; 4] = ['a', 'c', 'g', 't'];

#[inline]
fn encode_base(symbol: char) -> Option<u128> {
    match symbol {
        'A' | 'a' => Some(0b00),
        'C' | 'c' => Some(0b01),
        'G' | 'g' => Some(0b10),
        'T' | 't' => Some(0b11),
        _ => None,
    }
}

/// Encodes one ASCII symbol, or `None` if it is not a nucleotide.
#[inline]
pub(crate) fn encode_byte(symbol: u8) -> Option<u128> {
    encode_base(symbol as char)
}

pub(crate) fn check_k(k: usize) -> Result<(), Error> {
    if (1..=MAX_K).contains(&k) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "k must be in [1, {MAX_K}]; got {k}"
        )))
    }
}

fn pack(symbols: impl Iterator<Item = char>, len: usize, k: usize) -> Result<u128, Error> {
    check_k(k)?;
    if len != k {
        return Err(Error::invalid_length(k, len));
    }
    let mut bits = 0u128;
    for (position, symbol) in symbols.enumerate() {
        let code =
            encode_base(symbol).ok_or_else(|| Error::invalid_character(symbol, position))?;
        bits = (bits << 2) | code;
    }
    Ok(bits)
}

/// A k-mer in the orientation it was read, not canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kmer {
    bits: u128,
    k: u8,
}

impl Kmer {
    /// Packs a DNA string of exactly `k` bases, case-insensitively.
    ///
    /// # Errors
    ///
    /// * [`InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if `k` is not in
    ///   `1..=MAX_K`.
    /// * [`InvalidLength`](crate::error::ErrorKind::InvalidLength) if `dna` does not hold
    ///   exactly `k` characters.
    /// * [`InvalidCharacter`](crate::error::ErrorKind::InvalidCharacter) naming the first
    ///   character outside `{A, C, G, T}`.
    pub fn new(dna: &str, k: usize) -> Result<Self, Error> {
        let bits = pack(dna.chars(), dna.chars().count(), k)?;
        Ok(Self { bits, k: k as u8 })
    }

    /// Packs a window of raw ASCII bytes; see [`Kmer::new`].
    pub fn from_bytes(dna: &[u8], k: usize) -> Result<Self, Error> {
        let bits = pack(dna.iter().map(|&b| b as char), dna.len(), k)?;
        Ok(Self { bits, k: k as u8 })
    }

    /// Returns the length of this k-mer.
    pub fn k(&self) -> usize {
        self.k as usize
    }

    /// Returns the packed `2k`-bit representation.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Returns the reverse complement: bases in reverse order, each replaced by its pair.
    ///
    /// Complementing a base flips both of its bits.
    pub fn reverse_complement(&self) -> Kmer {
        let mut forward = self.bits;
        let mut reverse = 0u128;
        for _ in 0..self.k {
            reverse = (reverse << 2) | (0b11 ^ (forward & 0b11));
            forward >>= 2;
        }
        Kmer {
            bits: reverse,
            k: self.k,
        }
    }

    /// Returns the canonical form, keeping this orientation on ties.
    pub fn canonical(&self) -> CanonicalKmer {
        let reverse = self.reverse_complement();
        if reverse.less_than(self) {
            CanonicalKmer(reverse)
        } else {
            CanonicalKmer(*self)
        }
    }

    /// Returns true if this k-mer sorts strictly before `other`.
    ///
    /// Bit pairs are compared from the most significant one down, and the side holding a 0 at
    /// the first differing bit is the smaller one.
    pub fn less_than(&self, other: &Kmer) -> bool {
        self.cmp(other) == Ordering::Less
    }

    /// Returns the deterministic 64-bit hash code of this k-mer.
    pub fn hash_code(&self) -> u64 {
        hash_packed(self.bits, self.k)
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for i in (0..self.k()).rev() {
            let code = (self.bits >> (2 * i)) & 0b11;
            f.write_char(BASES[code as usize])?;
        }
        Ok(())
    }
}

/// A k-mer stored as the smaller of itself and its reverse complement.
///
/// Equality, ordering and hashing follow the packed bits, so a k-mer and its reverse
/// complement are indistinguishable once canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKmer(Kmer);

impl CanonicalKmer {
    /// Packs `dna` and canonicalizes it.
    ///
    /// Fails exactly when [`Kmer::new`] fails.
    pub fn encode(dna: &str, k: usize) -> Result<Self, Error> {
        Kmer::new(dna, k).map(|kmer| kmer.canonical())
    }

    /// Packs a window of raw ASCII bytes and canonicalizes it.
    pub fn from_bytes(dna: &[u8], k: usize) -> Result<Self, Error> {
        Kmer::from_bytes(dna, k).map(|kmer| kmer.canonical())
    }

    /// Picks the canonical strand from a forward encoding and its reverse complement.
    #[inline]
    pub(crate) fn from_strands(forward: u128, reverse: u128, k: usize) -> Self {
        let bits = if reverse < forward { reverse } else { forward };
        CanonicalKmer(Kmer { bits, k: k as u8 })
    }

    /// Returns the length of this k-mer.
    pub fn k(&self) -> usize {
        self.0.k()
    }

    /// Returns the packed `2k`-bit representation.
    pub fn bits(&self) -> u128 {
        self.0.bits
    }

    /// Returns the stored orientation as a plain [`Kmer`].
    pub fn as_kmer(&self) -> Kmer {
        self.0
    }

    /// Returns the reverse complement of the stored orientation.
    ///
    /// The result is the larger (or, for palindromes, the equal) orientation and is therefore
    /// returned as an oriented [`Kmer`].
    pub fn reverse_complement(&self) -> Kmer {
        self.0.reverse_complement()
    }

    /// Returns true if this k-mer sorts strictly before `other`.
    pub fn less_than(&self, other: &CanonicalKmer) -> bool {
        self.0.less_than(&other.0)
    }

    /// Returns the deterministic 64-bit hash code used for binning and Bloom hashing.
    pub fn hash_code(&self) -> u64 {
        self.0.hash_code()
    }
}

impl From<CanonicalKmer> for Kmer {
    fn from(kmer: CanonicalKmer) -> Self {
        kmer.0
    }
}

impl fmt::Display for CanonicalKmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
