// Copyright 2022 Matthew Ingwersen.
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

//! Routing policies for record sets.

use std::fmt;
use std::str::FromStr;

use crate::util::{lookup_mnemonic, mnemonic_of};

/// How a record set participates in answering queries when several
/// record sets share a name and type.
///
/// A record set has at most one routing policy. Each non-simple policy
/// is normally paired with a set identifier (see
/// [`ResourceRecordSet::set_identifier`](super::ResourceRecordSet::set_identifier))
/// that distinguishes it from its siblings.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RoutingPolicy {
    /// No routing policy.
    #[default]
    Simple,

    /// Weighted routing; the weight is relative to the other record
    /// sets with the same name and type.
    Weighted(u8),

    /// Latency-based routing for the given region (e.g. `us-west-2`).
    Latency(Box<str>),

    /// Failover routing.
    Failover(Failover),

    /// Geolocation routing.
    Geolocation(GeoLocation),
}

impl RoutingPolicy {
    /// Returns the weight, if this is a weighted policy.
    pub fn weight(&self) -> Option<u8> {
        match self {
            Self::Weighted(weight) => Some(*weight),
            _ => None,
        }
    }

    /// Returns the region, if this is a latency-based policy.
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Latency(region) => Some(region),
            _ => None,
        }
    }

    /// Returns the failover role, if this is a failover policy.
    pub fn failover(&self) -> Option<Failover> {
        match self {
            Self::Failover(failover) => Some(*failover),
            _ => None,
        }
    }

    /// Returns the location, if this is a geolocation policy.
    pub fn geo_location(&self) -> Option<&GeoLocation> {
        match self {
            Self::Geolocation(location) => Some(location),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// FAILOVER                                                           //
////////////////////////////////////////////////////////////////////////

/// The role of a record set under failover routing.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum Failover {
    Primary,
    Secondary,
}

const FAILOVER_MNEMONICS: &[(&str, Failover)] = &[
    ("PRIMARY", Failover::Primary),
    ("SECONDARY", Failover::Secondary),
];

impl FromStr for Failover {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        lookup_mnemonic(FAILOVER_MNEMONICS, text).ok_or("unknown failover role")
    }
}

impl fmt::Debug for Failover {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Failover {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(mnemonic_of(FAILOVER_MNEMONICS, *self))
    }
}

////////////////////////////////////////////////////////////////////////
// GEOLOCATION                                                        //
////////////////////////////////////////////////////////////////////////

/// The location that a geolocation record set answers for: either a
/// whole continent, or a country with an optional subdivision (such as
/// a US state).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GeoLocation {
    Continent(Box<str>),
    Country {
        country_code: Box<str>,
        subdivision_code: Option<Box<str>>,
    },
}

impl GeoLocation {
    /// Creates a continent location from its two-letter code.
    pub fn continent(code: &str) -> Self {
        Self::Continent(code.into())
    }

    /// Creates a country location, optionally narrowed to a
    /// subdivision.
    pub fn country(country_code: &str, subdivision_code: Option<&str>) -> Self {
        Self::Country {
            country_code: country_code.into(),
            subdivision_code: subdivision_code.map(Into::into),
        }
    }

    /// Returns the continent code, if this is a continent location.
    pub fn continent_code(&self) -> Option<&str> {
        match self {
            Self::Continent(code) => Some(code),
            Self::Country { .. } => None,
        }
    }

    /// Returns the country code, if this is a country location.
    pub fn country_code(&self) -> Option<&str> {
        match self {
            Self::Continent(_) => None,
            Self::Country { country_code, .. } => Some(country_code),
        }
    }

    /// Returns the subdivision code, if there is one.
    pub fn subdivision_code(&self) -> Option<&str> {
        match self {
            Self::Continent(_) => None,
            Self::Country {
                subdivision_code, ..
            } => subdivision_code.as_deref(),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
