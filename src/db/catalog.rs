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

//! The [`Catalog`] of hosted zones.

use std::sync::Arc;

use super::{Error, HostedZone, HostedZoneConfig};
use crate::name::Name;

/// The collection of all hosted zones.
///
/// Zones are kept in creation order. Several zones may share a name;
/// they are told apart only by id.
#[derive(Debug, Default)]
pub struct Catalog {
    zones: Vec<Arc<HostedZone>>,
}

impl Catalog {
    /// Creates a new, empty `Catalog`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new, empty hosted zone with the bare id `raw_id`.
    pub fn create(
        &mut self,
        raw_id: &str,
        name: Name,
        caller_reference: &str,
        config: HostedZoneConfig,
    ) -> Arc<HostedZone> {
        let zone = Arc::new(HostedZone::new(raw_id, name, caller_reference, config));
        self.zones.push(zone.clone());
        zone
    }

    /// Finds the hosted zone with the given id. The id may be given
    /// with or without the `/hostedzone/` prefix.
    pub fn get(&self, id: &str) -> Result<&Arc<HostedZone>, Error> {
        self.zones
            .iter()
            .find(|zone| zone.has_id(id))
            .ok_or_else(|| Error::NoSuchHostedZone(id.into()))
    }

    /// Returns all hosted zones in creation order.
    pub fn list(&self) -> &[Arc<HostedZone>] {
        &self.zones
    }

    /// Returns the hosted zones in canonical DNS order of their names.
    /// Zones with the same name stay in creation order.
    ///
    /// If `dns_name` is given, only the zones with exactly that name
    /// are returned.
    pub fn list_by_name(&self, dns_name: Option<&Name>) -> Vec<Arc<HostedZone>> {
        let mut zones: Vec<_> = self
            .zones
            .iter()
            .filter(|zone| dns_name.map_or(true, |name| zone.name() == name))
            .cloned()
            .collect();
        zones.sort_by(|a, b| a.name().cmp(b.name()));
        zones
    }

    /// Returns the number of hosted zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Removes the hosted zone with the given id.
    ///
    /// This fails with [`Error::HostedZoneNotEmpty`] if the zone has
    /// any record sets besides the SOA and NS record sets at its apex.
    pub fn delete(&mut self, id: &str) -> Result<Arc<HostedZone>, Error> {
        let index = self
            .zones
            .iter()
            .position(|zone| zone.has_id(id))
            .ok_or_else(|| Error::NoSuchHostedZone(id.into()))?;
        let zone = &self.zones[index];
        if zone.record_set_count() > 0 {
            return Err(Error::HostedZoneNotEmpty(zone.id().into()));
        }
        Ok(self.zones.remove(index))
    }

    /// Removes all hosted zones.
    pub fn clear(&mut self) {
        self.zones.clear();
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
