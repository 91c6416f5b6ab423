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

mod private {
    // Sealed trait to prevent external implementations of CounterValue.
    pub trait Sealed {}
}

/// Counter type supported in a [`BloomCounter`](super::BloomCounter).
pub trait CounterValue: private::Sealed + Copy + Ord + std::fmt::Debug {
    /// Zero value for fresh slots.
    const ZERO: Self;

    /// Maximum representable value; increments saturate here.
    const MAX: Self;

    /// Adds one, saturating at [`CounterValue::MAX`].
    fn saturating_increment(self) -> Self;

    /// Widens into `u64`.
    fn to_u64(self) -> u64;
}

macro_rules! impl_unsigned {
    ($name:ty) => {
        impl private::Sealed for $name {}

        impl CounterValue for $name {
            const ZERO: Self = 0;
            const MAX: Self = <$name>::MAX;

            #[inline(always)]
            fn saturating_increment(self) -> Self {
                self.saturating_add(1)
            }

            #[inline(always)]
            fn to_u64(self) -> u64 {
                self as u64
            }
        }
    };
}

impl_unsigned!(u8);
impl_unsigned!(u16);
impl_unsigned!(u32);
impl_unsigned!(u64);
