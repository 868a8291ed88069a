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

//! The change-batch engine.
//!
//! A [`ChangeBatch`] is an ordered list of [`Change`]s to the record
//! sets of one hosted zone. [`apply`] validates the batch and applies
//! it as a unit: either every change takes effect, or (if any change is
//! invalid) none does.

use std::fmt;
use std::str::FromStr;

use log::debug;

use super::{ChangeBatchIssue, Error, HostedZone, RecordSetCollection};
use crate::name::Name;
use crate::rr::ResourceRecordSet;
use crate::util::{lookup_mnemonic, mnemonic_of};

/// The prefix with which change ids are reported.
pub const CHANGE_ID_PREFIX: &str = "/change/";

////////////////////////////////////////////////////////////////////////
// CHANGES                                                            //
////////////////////////////////////////////////////////////////////////

/// The action a [`Change`] performs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    /// Adds a record set, which must not already exist.
    Create,

    /// Adds a record set, replacing any existing record set with the
    /// same name, type, and set identifier.
    Upsert,

    /// Removes a record set, if it exists.
    Delete,
}

const ACTIONS: &[(&str, Action)] = &[
    ("CREATE", Action::Create),
    ("UPSERT", Action::Upsert),
    ("DELETE", Action::Delete),
];

impl Action {
    /// Returns how many times each resource record of a change with
    /// this action counts toward a batch's resource-record limit. An
    /// UPSERT counts twice, since it may delete a record set as well
    /// as create one.
    fn record_weight(self) -> usize {
        match self {
            Self::Create => 1,
            Self::Upsert => 2,
            Self::Delete => 0,
        }
    }
}

impl FromStr for Action {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        lookup_mnemonic(ACTIONS, text).ok_or("unknown change action")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(mnemonic_of(ACTIONS, *self))
    }
}

/// A single change to a zone's record sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Change {
    pub action: Action,
    pub record_set: ResourceRecordSet,
}

impl Change {
    pub fn new(action: Action, record_set: ResourceRecordSet) -> Self {
        Self { action, record_set }
    }
}

/// An ordered list of changes to apply to one hosted zone as a unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeBatch {
    pub comment: Option<String>,
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            comment: None,
            changes,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_owned());
        self
    }

    /// Returns the number of resource records the batch counts as
    /// toward the resource-record limit.
    pub fn weighted_record_count(&self) -> usize {
        self.changes
            .iter()
            .map(|c| c.action.record_weight() * c.record_set.resource_record_count())
            .sum()
    }
}

////////////////////////////////////////////////////////////////////////
// CHANGE INFORMATION                                                 //
////////////////////////////////////////////////////////////////////////

/// The propagation status of a change.
///
/// Changes take effect immediately, so the only status there is is
/// [`ChangeStatus::InSync`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChangeStatus {
    InSync,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InSync => f.write_str("INSYNC"),
        }
    }
}

/// Information about a submitted change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangeInfo {
    pub id: Box<str>,
    pub status: ChangeStatus,
    pub comment: Option<String>,
}

impl ChangeInfo {
    /// Creates the [`ChangeInfo`] for a change with the given id. The
    /// status is always [`ChangeStatus::InSync`].
    pub fn in_sync(id: &str, comment: Option<String>) -> Self {
        Self {
            id: id.into(),
            status: ChangeStatus::InSync,
            comment,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// APPLICATION                                                        //
////////////////////////////////////////////////////////////////////////

/// Validates `batch` and applies it to `zone`'s record sets.
///
/// The batch is rejected with [`Error::InvalidChangeBatch`] if
///
/// * its weighted resource-record count (see
///   [`ChangeBatch::weighted_record_count`]) exceeds `record_limit`;
/// * any change names a record set outside the zone; or
/// * a CREATE targets a record set that already exists (including one
///   created earlier in the same batch); or
/// * a CREATE or UPSERT would leave record sets of one name and type
///   where some have a set identifier and others do not.
///
/// A DELETE of a record set that does not exist does nothing. On
/// error, the zone is left exactly as it was.
pub fn apply(zone: &HostedZone, batch: &ChangeBatch, record_limit: usize) -> Result<(), Error> {
    let result = validate_limit(batch, record_limit)
        .and_then(|()| validate_membership(zone.name(), batch))
        .and_then(|()| zone.update(|record_sets| apply_changes(record_sets, batch)));
    if let Err(ref e) = result {
        debug!("Rejected change batch for zone {}: {}", zone.id(), e);
    }
    result
}

fn validate_limit(batch: &ChangeBatch, record_limit: usize) -> Result<(), Error> {
    if batch.weighted_record_count() > record_limit {
        Err(Error::InvalidChangeBatch(
            ChangeBatchIssue::RecordLimitExceeded(record_limit),
        ))
    } else {
        Ok(())
    }
}

fn validate_membership(apex: &Name, batch: &ChangeBatch) -> Result<(), Error> {
    match batch
        .changes
        .iter()
        .find(|c| !c.record_set.name().eq_or_subdomain_of(apex))
    {
        Some(change) => Err(Error::InvalidChangeBatch(ChangeBatchIssue::NotInZone {
            name: change.record_set.name().clone(),
            zone: apex.clone(),
        })),
        None => Ok(()),
    }
}

fn apply_changes(record_sets: &mut RecordSetCollection, batch: &ChangeBatch) -> Result<(), Error> {
    for change in &batch.changes {
        let record_set = &change.record_set;
        match change.action {
            Action::Create => {
                if record_sets
                    .find(
                        record_set.name(),
                        record_set.rr_type(),
                        record_set.set_identifier(),
                    )
                    .is_some()
                {
                    return Err(Error::InvalidChangeBatch(ChangeBatchIssue::AlreadyExists {
                        name: record_set.name().clone(),
                        rr_type: record_set.rr_type(),
                        set_identifier: record_set.set_identifier().map(Into::into),
                    }));
                }
                check_set_identifiers(record_sets, record_set)?;
                record_sets.insert_or_replace(record_set.clone());
            }
            Action::Upsert => {
                check_set_identifiers(record_sets, record_set)?;
                record_sets.insert_or_replace(record_set.clone());
            }
            Action::Delete => {
                record_sets.remove(&record_set.key());
            }
        }
    }
    Ok(())
}

/// Checks that `record_set` agrees with the existing record sets of its
/// name and type on whether a set identifier is present. The record set
/// that `record_set` would replace is not considered.
fn check_set_identifiers(
    record_sets: &RecordSetCollection,
    record_set: &ResourceRecordSet,
) -> Result<(), Error> {
    let identified = record_set.set_identifier().is_some();
    let conflict = record_sets
        .with_name_and_type(record_set.name(), record_set.rr_type())
        .iter()
        .filter(|r| r.set_identifier() != record_set.set_identifier())
        .any(|r| r.set_identifier().is_some() != identified);
    if conflict {
        Err(Error::InvalidChangeBatch(
            ChangeBatchIssue::MixedSetIdentifiers {
                name: record_set.name().clone(),
                rr_type: record_set.rr_type(),
            },
        ))
    } else {
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
