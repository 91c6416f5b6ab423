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

//! Misra-Gries summary for finding heavy hitters in a stream.
//!
//! # Overview
//!
//! A [`MisraGriesSummary`] with capacity `N` keeps at most `N` counters. Observing an item
//! that is already tracked increments its counter; an untracked item takes a free counter if
//! one is left. Otherwise every counter is decremented by one, counters reaching zero are
//! evicted, and the new item is dropped.
//!
//! # Accuracy
//!
//! Each decrement round cancels `N + 1` observations (the `N` decremented counters and the
//! dropped item), so after a stream of total weight `T` there have been at most `T / (N + 1)`
//! rounds. Consequently:
//!
//! * every item whose true frequency exceeds `T / N` is still tracked after the stream;
//! * a tracked item's stored count undercounts its true frequency by at most
//!   [`MisraGriesSummary::num_decrements`].
//!
//! The summary is deterministic and never fails.
//!
//! # Background
//!
//! "Finding repeated elements", Misra, Gries, 1982.
//!
//! # Examples
//!
//! ```
//! # use kmerfreq::frequencies::MisraGriesSummary;
//! let mut summary = MisraGriesSummary::new(2);
//! for item in ["a", "b", "a", "c", "a"] {
//!     summary.observe(item);
//! }
//! assert!(summary.contains(&"a"));
//! assert!(summary.len() <= 2);
//! assert!(summary.lower_bound(&"a") <= 3 && 3 <= summary.upper_bound(&"a"));
//! ```

mod summary;

pub use self::summary::MisraGriesSummary;
