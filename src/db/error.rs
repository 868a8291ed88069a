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

//! Implementation of the [`Error`] type for store and change-batch
//! failures.

use std::fmt;

use crate::name::Name;
use crate::rr::Type;

/// An error produced by one of the stores or by the change-batch
/// engine.
///
/// Each variant belongs to one of the broad [`ErrorKind`]s (see
/// [`Error::kind`]), and has a provider error code (see
/// [`Error::code`]) that a transport layer can put in its error
/// envelope alongside the [`Display`](fmt::Display) message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// No hosted zone has the given id. The id is kept exactly as the
    /// caller gave it.
    NoSuchHostedZone(Box<str>),

    /// No health check has the given id.
    NoSuchHealthCheck(Box<str>),

    /// The hosted zone still contains record sets and cannot be
    /// deleted.
    HostedZoneNotEmpty(Box<str>),

    /// A request parameter was malformed, such as an unknown record
    /// type or an invalid combination of pagination parameters.
    BadRequest,

    /// A change batch was rejected. Nothing in the batch was applied.
    InvalidChangeBatch(ChangeBatchIssue),
}

/// The broad categories of [`Error`]s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    InvalidChangeBatch,
    ResourceInUse,
}

/// The reason a change batch was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChangeBatchIssue {
    /// The batch contained more resource records than allowed. The
    /// limit is included.
    RecordLimitExceeded(usize),

    /// A CREATE targeted a record set that already exists.
    AlreadyExists {
        name: Name,
        rr_type: Type,
        set_identifier: Option<Box<str>>,
    },

    /// A change's record name is not within the hosted zone.
    NotInZone { name: Name, zone: Name },

    /// A CREATE or UPSERT would leave record sets of one name and type
    /// where some have a set identifier and others do not.
    MixedSetIdentifiers { name: Name, rr_type: Type },
}

impl Error {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSuchHostedZone(_) | Self::NoSuchHealthCheck(_) => ErrorKind::NotFound,
            Self::HostedZoneNotEmpty(_) => ErrorKind::ResourceInUse,
            Self::BadRequest => ErrorKind::BadRequest,
            Self::InvalidChangeBatch(_) => ErrorKind::InvalidChangeBatch,
        }
    }

    /// Returns the provider's error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchHostedZone(_) => "NoSuchHostedZone",
            Self::NoSuchHealthCheck(_) => "NoSuchHealthCheck",
            Self::HostedZoneNotEmpty(_) => "HostedZoneNotEmpty",
            Self::BadRequest => "400",
            Self::InvalidChangeBatch(_) => "InvalidChangeBatch",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoSuchHostedZone(id) => write!(f, "No hosted zone found with ID: {id}"),
            Self::NoSuchHealthCheck(id) => {
                write!(f, "A health check with id {id} does not exist.")
            }
            Self::HostedZoneNotEmpty(_) => f.write_str(
                "The hosted zone contains resource records that are not SOA or NS records.",
            ),
            Self::BadRequest => f.write_str("Bad Request"),
            Self::InvalidChangeBatch(issue) => issue.fmt(f),
        }
    }
}

impl fmt::Display for ChangeBatchIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RecordLimitExceeded(limit) => {
                write!(f, "Number of records limit of {limit} exceeded.")
            }
            Self::AlreadyExists {
                name,
                rr_type,
                set_identifier: None,
            } => write!(
                f,
                "Tried to create resource record set [name='{name}', type='{rr_type}'] \
                 but it already exists",
            ),
            Self::AlreadyExists {
                name,
                rr_type,
                set_identifier: Some(set_identifier),
            } => write!(
                f,
                "Tried to create resource record set [name='{name}', type='{rr_type}', \
                 set-identifier='{set_identifier}'] but it already exists",
            ),
            Self::NotInZone { name, zone } => {
                write!(f, "RRSet with DNS name {name} is not permitted in zone {zone}")
            }
            Self::MixedSetIdentifiers { name, rr_type } => write!(
                f,
                "RRSet with DNS name {name} and type {rr_type} cannot contain both \
                 records with a set identifier and records without one",
            ),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
