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

//! Counting Bloom filter for approximate k-mer frequencies.
//!
//! A [`BloomCounter`] keeps a fixed array of small counters and `h` universal hash functions
//! `slot_i(x) = ((a_i * x + b_i) mod p) mod slots`. Inserting a key increments all of its `h`
//! slots and returns the smallest of the incremented values as the key's frequency estimate.
//!
//! Collisions only ever add to a slot, so the estimate never falls below the key's true count
//! (until a counter saturates at its type's maximum). It may overshoot when every slot of a key
//! is shared with other frequent keys.
//!
//! # Usage
//!
//! ```rust
//! # use kmerfreq::bloom::BloomCounter;
//! let mut counter = BloomCounter::<u16>::with_seed(1024, 2, 1_982_627, 7);
//! for _ in 0..4 {
//!     counter.insert(42);
//! }
//! assert!(counter.estimate(42) >= 4);
//!
//! counter.reset();
//! assert_eq!(counter.estimate(42), 0);
//! ```
//!
//! # Overflow
//!
//! Counters saturate: once a slot holds [`CounterValue::MAX`] further increments leave it there.
//! Pick the counter width from the expected per-slot load; the default `u16` matches the
//! original short counters and is ample when bins are planned for a load around the threshold.

mod counter;
pub use self::counter::BloomCounter;

mod value;
pub use self::value::CounterValue;
