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

//! Resource tags and the [`TagStore`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::util::{lookup_mnemonic, mnemonic_of};

/// The kinds of resources that can be tagged.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum ResourceType {
    HealthCheck,
    HostedZone,
}

const RESOURCE_TYPES: &[(&str, ResourceType)] = &[
    ("healthcheck", ResourceType::HealthCheck),
    ("hostedzone", ResourceType::HostedZone),
];

impl FromStr for ResourceType {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        lookup_mnemonic(RESOURCE_TYPES, text).ok_or("unknown resource type")
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(mnemonic_of(RESOURCE_TYPES, *self))
    }
}

/// A key-value tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// The tags of one resource, by key.
pub type TagMap = BTreeMap<String, String>;

/// Stores the tags of all resources.
///
/// Resources are identified by type and id. The store does not check
/// that the resources exist. Once a resource has been tagged, it keeps
/// a (possibly empty) tag mapping until [`TagStore::remove_resource`]
/// is called for it.
#[derive(Debug, Default)]
pub struct TagStore {
    tags: HashMap<(ResourceType, Box<str>), TagMap>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tags of a resource. A resource that was never tagged
    /// has no tags.
    pub fn list(&self, resource_type: ResourceType, resource_id: &str) -> TagMap {
        self.tags
            .get(&(resource_type, resource_id.into()))
            .cloned()
            .unwrap_or_default()
    }

    /// Adds the tags in `add`, then removes the tags with the keys in
    /// `remove_keys`. A later tag in `add` overwrites an earlier one
    /// with the same key, and keys in `remove_keys` that are not
    /// present are ignored.
    pub fn apply(
        &mut self,
        resource_type: ResourceType,
        resource_id: &str,
        add: &[Tag],
        remove_keys: &[String],
    ) {
        let tags = self
            .tags
            .entry((resource_type, resource_id.into()))
            .or_default();
        for tag in add {
            tags.insert(tag.key.clone(), tag.value.clone());
        }
        for key in remove_keys {
            tags.remove(key);
        }
    }

    /// Forgets all tags of a resource.
    pub fn remove_resource(&mut self, resource_type: ResourceType, resource_id: &str) {
        self.tags.remove(&(resource_type, resource_id.into()));
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
