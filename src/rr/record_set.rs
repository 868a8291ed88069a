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

//! The [`ResourceRecordSet`] type and its parts.

use crate::name::Name;

use super::{RoutingPolicy, Ttl, Type};

/// A resource-record set as held by a hosted zone.
///
/// A record set is identified within its zone by its name, type, and
/// (optional) set identifier; see [`ResourceRecordSet::key`]. Its
/// content is either a list of literal values or an alias to another
/// DNS name (see [`RecordData`]), and it may carry a
/// [`RoutingPolicy`] and a reference to a health check.
///
/// Record sets are built up from [`ResourceRecordSet::new`] with the
/// `with_*` methods:
///
/// ```
/// use zonestead::rr::{ResourceRecordSet, RoutingPolicy, Type};
///
/// let record_set = ResourceRecordSet::new("www.example.com".parse().unwrap(), Type::A)
///     .with_ttl(300u32.try_into().unwrap())
///     .with_values(["192.0.2.1", "192.0.2.2"])
///     .with_set_identifier("blue")
///     .with_routing_policy(RoutingPolicy::Weighted(10));
/// assert_eq!(record_set.resource_record_count(), 2);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceRecordSet {
    name: Name,
    rr_type: Type,
    set_identifier: Option<Box<str>>,
    ttl: Option<Ttl>,
    data: RecordData,
    routing_policy: RoutingPolicy,
    health_check_id: Option<Box<str>>,
}

/// The content of a [`ResourceRecordSet`].
///
/// Literal values and alias targets are mutually exclusive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordData {
    /// Literal record values, in the order they were given. The list
    /// may be empty.
    Values(Vec<Box<str>>),

    /// An alias to another DNS name.
    Alias(AliasTarget),
}

impl Default for RecordData {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

/// The target of an alias record set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AliasTarget {
    pub hosted_zone_id: Box<str>,
    pub dns_name: Name,
    pub evaluate_target_health: bool,
}

/// The identity of a record set within a hosted zone.
///
/// The derived [`Ord`] implementation is the canonical ordering of
/// record sets: by name (in DNS canonical order), then by type
/// mnemonic, then by set identifier, with record sets lacking an
/// identifier first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct RecordSetKey<'a> {
    pub name: &'a Name,
    pub rr_type: Type,
    pub set_identifier: Option<&'a str>,
}

impl ResourceRecordSet {
    /// Creates a new record set with no TTL, no values, and the simple
    /// routing policy.
    pub fn new(name: Name, rr_type: Type) -> Self {
        Self {
            name,
            rr_type,
            set_identifier: None,
            ttl: None,
            data: RecordData::default(),
            routing_policy: RoutingPolicy::Simple,
            health_check_id: None,
        }
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the record set's content to the given literal values,
    /// replacing any values or alias target.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        self.data = RecordData::Values(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the record set's content to an alias target, replacing any
    /// values.
    pub fn with_alias_target(mut self, target: AliasTarget) -> Self {
        self.data = RecordData::Alias(target);
        self
    }

    /// Sets the set identifier.
    pub fn with_set_identifier(mut self, set_identifier: &str) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self
    }

    /// Sets the routing policy.
    pub fn with_routing_policy(mut self, routing_policy: RoutingPolicy) -> Self {
        self.routing_policy = routing_policy;
        self
    }

    /// Sets the health check that this record set refers to. The id is
    /// not checked against the health checks that actually exist.
    pub fn with_health_check_id(mut self, health_check_id: &str) -> Self {
        self.health_check_id = Some(health_check_id.into());
        self
    }

    /// Returns the record set's name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record set's type.
    pub fn rr_type(&self) -> Type {
        self.rr_type
    }

    /// Returns the set identifier, if any.
    pub fn set_identifier(&self) -> Option<&str> {
        self.set_identifier.as_deref()
    }

    /// Returns the TTL, if any.
    pub fn ttl(&self) -> Option<Ttl> {
        self.ttl
    }

    /// Returns the record set's content.
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Returns the literal values, or `None` for an alias record set.
    pub fn values(&self) -> Option<&[Box<str>]> {
        match &self.data {
            RecordData::Values(values) => Some(values),
            RecordData::Alias(_) => None,
        }
    }

    /// Returns the alias target, or `None` for a record set with
    /// literal values.
    pub fn alias_target(&self) -> Option<&AliasTarget> {
        match &self.data {
            RecordData::Values(_) => None,
            RecordData::Alias(target) => Some(target),
        }
    }

    /// Returns the routing policy.
    pub fn routing_policy(&self) -> &RoutingPolicy {
        &self.routing_policy
    }

    /// Returns the id of the health check this record set refers to.
    pub fn health_check_id(&self) -> Option<&str> {
        self.health_check_id.as_deref()
    }

    /// Returns the number of resource records (literal values) in the
    /// record set. Alias record sets have none.
    pub fn resource_record_count(&self) -> usize {
        self.values().map_or(0, <[_]>::len)
    }

    /// Returns the key that identifies this record set within its
    /// zone.
    pub fn key(&self) -> RecordSetKey<'_> {
        RecordSetKey {
            name: &self.name,
            rr_type: self.rr_type,
            set_identifier: self.set_identifier(),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;

    lazy_static! {
        static ref WWW: Name = "www.zonestead.test.".parse().unwrap();
        static ref TTL: Ttl = Ttl::try_from(60u32).unwrap();
    }

    #[test]
    fn values_and_alias_are_exclusive() {
        let target = AliasTarget {
            hosted_zone_id: "Z3AADJGX6KTTL2".into(),
            dns_name: "lb.zonestead.test.".parse().unwrap(),
            evaluate_target_health: true,
        };
        let record_set = ResourceRecordSet::new(WWW.clone(), Type::A)
            .with_values(["127.0.0.1"])
            .with_alias_target(target.clone());
        assert_eq!(record_set.values(), None);
        assert_eq!(record_set.alias_target(), Some(&target));
        assert_eq!(record_set.resource_record_count(), 0);

        let record_set = record_set.with_values(["127.0.0.1", "127.0.0.2"]);
        assert_eq!(record_set.alias_target(), None);
        assert_eq!(record_set.resource_record_count(), 2);
    }

    #[test]
    fn new_record_sets_are_empty_and_simple() {
        let record_set = ResourceRecordSet::new(WWW.clone(), Type::TXT);
        assert_eq!(record_set.ttl(), None);
        assert_eq!(record_set.values(), Some(&[][..]));
        assert_eq!(record_set.routing_policy(), &RoutingPolicy::Simple);
        assert_eq!(record_set.set_identifier(), None);
        assert_eq!(record_set.health_check_id(), None);
    }

    #[test]
    fn keys_order_canonically() {
        let apex: Name = "zonestead.test.".parse().unwrap();
        let a = ResourceRecordSet::new(WWW.clone(), Type::A).with_ttl(*TTL);
        let cname = ResourceRecordSet::new(WWW.clone(), Type::CNAME);
        let cname_blue = cname.clone().with_set_identifier("blue");
        let cname_green = cname.clone().with_set_identifier("green");
        let apex_txt = ResourceRecordSet::new(apex, Type::TXT);

        let mut keys = vec![
            cname_green.key(),
            a.key(),
            cname_blue.key(),
            apex_txt.key(),
            cname.key(),
        ];
        keys.sort();
        assert_eq!(
            keys,
            [
                apex_txt.key(),
                a.key(),
                cname.key(),
                cname_blue.key(),
                cname_green.key()
            ]
        );
    }
}
