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

//! Deterministic 64-bit mixing used for k-mer hash codes.
//!
//! Hash codes feed bin routing and Bloom slot selection, both of which must agree across the
//! repeated passes of a run, so the randomly keyed `std` hasher cannot be used here.

const C1: u64 = 0xff51_afd7_ed55_8ccd;
const C2: u64 = 0xc4ce_b9fe_1a85_ec53;

/// The MurmurHash3 64-bit finalizer.
#[inline]
pub(crate) fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(C1);
    k ^= k >> 33;
    k = k.wrapping_mul(C2);
    k ^= k >> 33;
    k
}

/// Mixes a packed 128-bit value together with its length into a 64-bit code.
#[inline]
pub(crate) fn hash_packed(bits: u128, len: u8) -> u64 {
    let lo = bits as u64;
    let hi = (bits >> 64) as u64;
    fmix64(lo ^ fmix64(hi ^ u64::from(len)))
}
