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

//! Implementation of the [`HostedZone`] type.

use std::sync::{Arc, Mutex, RwLock};

use super::{Error, RecordSetCollection};
use crate::name::Name;
use crate::util::strip_id_prefix;

/// The prefix with which hosted zone ids are reported.
pub const ZONE_ID_PREFIX: &str = "/hostedzone/";

/// A hosted zone: its metadata and its record sets.
///
/// The record sets are held as a copy-on-write snapshot. Readers take
/// a cheap [`Arc`] clone of the current [`RecordSetCollection`] with
/// [`HostedZone::record_sets`] and are never blocked by writers for
/// longer than it takes to swap a pointer. Writers are serialized by a
/// separate per-zone lock, build a modified copy of the collection,
/// and install it only if the whole modification succeeds. A reader
/// therefore sees either all of a change batch or none of it.
#[derive(Debug)]
pub struct HostedZone {
    id: Box<str>,
    name: Name,
    caller_reference: Box<str>,
    config: HostedZoneConfig,
    record_sets: RwLock<Arc<RecordSetCollection>>,
    writer: Mutex<()>,
}

/// The caller-supplied configuration of a [`HostedZone`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostedZoneConfig {
    pub private_zone: bool,
    pub comment: Option<String>,
}

impl HostedZone {
    /// Creates a new, empty hosted zone. `raw_id` is the bare generated
    /// id (without [`ZONE_ID_PREFIX`]).
    pub(crate) fn new(
        raw_id: &str,
        name: Name,
        caller_reference: &str,
        config: HostedZoneConfig,
    ) -> Self {
        Self {
            id: format!("{ZONE_ID_PREFIX}{raw_id}").into(),
            name,
            caller_reference: caller_reference.into(),
            config,
            record_sets: RwLock::new(Arc::new(RecordSetCollection::default())),
            writer: Mutex::new(()),
        }
    }

    /// Returns the zone's id in its reported form,
    /// `/hostedzone/{id}`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the zone's id without the `/hostedzone/` prefix.
    pub fn bare_id(&self) -> &str {
        strip_id_prefix(&self.id, ZONE_ID_PREFIX)
    }

    /// Returns whether `id` refers to this zone. Both the bare and the
    /// prefixed forms are accepted.
    pub fn has_id(&self, id: &str) -> bool {
        self.bare_id() == strip_id_prefix(id, ZONE_ID_PREFIX)
    }

    /// Returns the zone's name, which always ends in exactly one dot.
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn caller_reference(&self) -> &str {
        &self.caller_reference
    }

    pub fn config(&self) -> &HostedZoneConfig {
        &self.config
    }

    /// Returns a snapshot of the zone's current record sets.
    pub fn record_sets(&self) -> Arc<RecordSetCollection> {
        self.record_sets.read().unwrap().clone()
    }

    /// Returns the number of record sets in the zone. The SOA and NS
    /// record sets at the apex are not counted.
    pub fn record_set_count(&self) -> usize {
        self.record_sets().non_implicit_count(&self.name)
    }

    /// Modifies the zone's record sets as one unit.
    ///
    /// `f` is applied to a copy of the current collection. If it
    /// returns `Ok`, the copy replaces the current collection;
    /// otherwise the zone is left untouched and the error is returned.
    /// Concurrent calls on the same zone are serialized.
    pub(crate) fn update<F, T>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut RecordSetCollection) -> Result<T, Error>,
    {
        let _guard = self.writer.lock().unwrap();
        let mut working = RecordSetCollection::clone(&self.record_sets());
        let result = f(&mut working)?;
        *self.record_sets.write().unwrap() = Arc::new(working);
        Ok(result)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
