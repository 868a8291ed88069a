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

//! Implementation of the [`Type`] type for record types.

use std::fmt;
use std::str::FromStr;

use crate::util::{lookup_mnemonic, mnemonic_of};

/// The record types that a hosted zone can hold.
///
/// Unlike the DNS at large, the set of types a hosted zone accepts is
/// closed, so this is an enumeration rather than a wrapper over the
/// 16-bit on-the-wire value (which is still available through
/// `u16::from`).
///
/// Record sets are ordered by type *mnemonic*, not by numeric value.
/// The variants are therefore declared in alphabetical order so that
/// the derived [`Ord`] implementation is the alphabetical one.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Type {
    A,
    AAAA,
    CAA,
    CNAME,
    DS,
    MX,
    NAPTR,
    NS,
    PTR,
    SOA,
    SPF,
    SRV,
    TXT,
}

const MNEMONICS: &[(&str, Type)] = &[
    ("A", Type::A),
    ("AAAA", Type::AAAA),
    ("CAA", Type::CAA),
    ("CNAME", Type::CNAME),
    ("DS", Type::DS),
    ("MX", Type::MX),
    ("NAPTR", Type::NAPTR),
    ("NS", Type::NS),
    ("PTR", Type::PTR),
    ("SOA", Type::SOA),
    ("SPF", Type::SPF),
    ("SRV", Type::SRV),
    ("TXT", Type::TXT),
];

impl From<Type> for u16 {
    fn from(rr_type: Type) -> Self {
        match rr_type {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::PTR => 12,
            Type::MX => 15,
            Type::TXT => 16,
            Type::AAAA => 28,
            Type::SRV => 33,
            Type::NAPTR => 35,
            Type::DS => 43,
            Type::SPF => 99,
            Type::CAA => 257,
        }
    }
}

impl FromStr for Type {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        lookup_mnemonic(MNEMONICS, text).ok_or("unknown type")
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(mnemonic_of(MNEMONICS, *self))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
