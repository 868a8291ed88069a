// Copyright 2021 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the [`Ttl`] type for record TTLs.

use std::convert::TryFrom;
use std::fmt;

/// Represents the TTL of a record set.
///
/// [RFC 2181 § 8] limits TTLs to the range 0 through 2<sup>31</sup> − 1
/// seconds. Where a DNS server would treat larger values as zero, a
/// record-management API rejects them outright, so conversion from
/// [`u32`] is fallible.
///
/// [RFC 2181 § 8]: https://datatracker.ietf.org/doc/html/rfc2181#section-8
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Ttl(u32);

/// The error produced when converting an out-of-range value to a
/// [`Ttl`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TtlOutOfRange;

impl fmt::Display for TtlOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("TTL is larger than 2147483647 seconds")
    }
}

impl std::error::Error for TtlOutOfRange {}

impl TryFrom<u32> for Ttl {
    type Error = TtlOutOfRange;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        if raw > i32::MAX as u32 {
            Err(TtlOutOfRange)
        } else {
            Ok(Self(raw))
        }
    }
}

impl From<Ttl> for u32 {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
