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

//! Implementation of the [`RecordSetCollection`] structure, which
//! stores the record sets of one hosted zone.

use std::cmp::Ordering;

use super::Error;
use crate::name::Name;
use crate::rr::{RecordSetKey, ResourceRecordSet, Type};

/// Stores the record sets of a hosted zone in canonical order.
///
/// The record sets are kept in a sorted [`Vec`], ordered by
/// [`RecordSetKey`]: name in DNS canonical order, then type, then set
/// identifier. Lookups use binary search, and listing is simply a walk
/// over a subslice.
///
/// The mutating methods are crate-private. All changes to a zone's
/// records go through the change-batch engine (see
/// [`apply`](super::change::apply)).
#[derive(Clone, Debug, Default)]
pub struct RecordSetCollection {
    record_sets: Vec<ResourceRecordSet>,
}

impl RecordSetCollection {
    /// Returns the number of record sets in the collection.
    pub fn len(&self) -> usize {
        self.record_sets.len()
    }

    /// Returns whether the collection has no record sets at all.
    pub fn is_empty(&self) -> bool {
        self.record_sets.is_empty()
    }

    /// Returns an iterator over the record sets in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceRecordSet> {
        self.record_sets.iter()
    }

    /// Looks up the record set with the given name, type, and set
    /// identifier.
    pub fn find(
        &self,
        name: &Name,
        rr_type: Type,
        set_identifier: Option<&str>,
    ) -> Option<&ResourceRecordSet> {
        let key = RecordSetKey {
            name,
            rr_type,
            set_identifier,
        };
        self.search(&key).ok().map(|index| &self.record_sets[index])
    }

    /// Returns every record set with the given name and type, whatever
    /// its set identifier.
    pub fn with_name_and_type(&self, name: &Name, rr_type: Type) -> &[ResourceRecordSet] {
        let target = (name, rr_type);
        let start = self
            .record_sets
            .partition_point(|r| (r.name(), r.rr_type()) < target);
        let len = self.record_sets[start..]
            .partition_point(|r| (r.name(), r.rr_type()) == target);
        &self.record_sets[start..start + len]
    }

    /// Returns the number of record sets, not counting the SOA and NS
    /// record sets at `apex`.
    pub fn non_implicit_count(&self, apex: &Name) -> usize {
        self.record_sets
            .iter()
            .filter(|r| !(r.name() == apex && matches!(r.rr_type(), Type::SOA | Type::NS)))
            .count()
    }

    /// Inserts `record_set`, replacing any record set with the same
    /// key. Returns the replaced record set, if there was one.
    pub(crate) fn insert_or_replace(
        &mut self,
        record_set: ResourceRecordSet,
    ) -> Option<ResourceRecordSet> {
        match self.search(&record_set.key()) {
            Ok(index) => Some(std::mem::replace(&mut self.record_sets[index], record_set)),
            Err(index) => {
                self.record_sets.insert(index, record_set);
                None
            }
        }
    }

    /// Removes the record set with the given key, if present.
    pub(crate) fn remove(&mut self, key: &RecordSetKey) -> Option<ResourceRecordSet> {
        self.search(key)
            .ok()
            .map(|index| self.record_sets.remove(index))
    }

    /// Returns one page of record sets, beginning with the first
    /// record set at or after `start` and containing at most
    /// `max_items` record sets.
    pub fn page(&self, start: &StartPosition, max_items: usize) -> RecordSetPage {
        let first = self.record_sets.partition_point(|r| start.is_after(r));
        let remaining = &self.record_sets[first..];
        let (returned, rest) = remaining.split_at(remaining.len().min(max_items));
        let next = rest.first();
        RecordSetPage {
            record_sets: returned.to_vec(),
            is_truncated: next.is_some(),
            next_name: next.map(|r| r.name().clone()),
            next_type: next.map(ResourceRecordSet::rr_type),
            next_identifier: next.and_then(|r| r.set_identifier().map(Into::into)),
        }
    }

    fn search(&self, key: &RecordSetKey) -> Result<usize, usize> {
        self.record_sets.binary_search_by(|r| r.key().cmp(key))
    }
}

impl<'a> IntoIterator for &'a RecordSetCollection {
    type Item = &'a ResourceRecordSet;
    type IntoIter = std::slice::Iter<'a, ResourceRecordSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

////////////////////////////////////////////////////////////////////////
// PAGINATION                                                         //
////////////////////////////////////////////////////////////////////////

/// The position in canonical order at which a listing begins.
///
/// Each part narrows the position further: a start name alone begins
/// at the first record set with that name (or the next name after it),
/// adding a type begins within that name, and adding a set identifier
/// begins within that name and type.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StartPosition {
    name: Option<Name>,
    rr_type: Option<Type>,
    set_identifier: Option<Box<str>>,
}

impl StartPosition {
    /// Builds a start position from the raw request parameters.
    ///
    /// This fails with [`Error::BadRequest`] if a type is given without
    /// a name, an identifier is given without a type, the name does
    /// not parse, or the type is not a known record type.
    pub fn parse(
        name: Option<&str>,
        rr_type: Option<&str>,
        set_identifier: Option<&str>,
    ) -> Result<Self, Error> {
        if (rr_type.is_some() && name.is_none()) || (set_identifier.is_some() && rr_type.is_none())
        {
            return Err(Error::BadRequest);
        }
        let name = name
            .map(|n| n.parse::<Name>())
            .transpose()
            .map_err(|_| Error::BadRequest)?;
        let rr_type = rr_type
            .map(|t| t.parse::<Type>())
            .transpose()
            .map_err(|_| Error::BadRequest)?;
        Ok(Self {
            name,
            rr_type,
            set_identifier: set_identifier.map(Into::into),
        })
    }

    /// Returns whether `record_set` sorts before this start position.
    fn is_after(&self, record_set: &ResourceRecordSet) -> bool {
        let name = match &self.name {
            Some(name) => name,
            None => return false,
        };
        match record_set.name().cmp(name) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => (),
        }
        let rr_type = match self.rr_type {
            Some(rr_type) => rr_type,
            None => return false,
        };
        match record_set.rr_type().cmp(&rr_type) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match self.set_identifier.as_deref() {
                Some(set_identifier) => record_set.set_identifier() < Some(set_identifier),
                None => false,
            },
        }
    }
}

/// One page of a record-set listing.
#[derive(Clone, Debug)]
pub struct RecordSetPage {
    pub record_sets: Vec<ResourceRecordSet>,
    pub is_truncated: bool,
    pub next_name: Option<Name>,
    pub next_type: Option<Type>,
    pub next_identifier: Option<Box<str>>,
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;
    use crate::rr::Ttl;

    lazy_static! {
        static ref APEX: Name = "db.".parse().unwrap();
        static ref COLLECTION: RecordSetCollection = {
            let mut collection = RecordSetCollection::default();
            for (rr_type, name) in [
                (Type::CNAME, "c.c.db."),
                (Type::A, "b.b.db."),
                (Type::CNAME, "b.c.db."),
                (Type::A, "a.b.db."),
                (Type::CNAME, "b.b.db."),
                (Type::A, "a.a.db."),
            ] {
                collection.insert_or_replace(record_set(name, rr_type));
            }
            collection
        };
    }

    fn record_set(name: &str, rr_type: Type) -> ResourceRecordSet {
        ResourceRecordSet::new(name.parse().unwrap(), rr_type)
            .with_ttl(Ttl::try_from(10u32).unwrap())
            .with_values(["127.0.0.1"])
    }

    fn summary(record_sets: &[ResourceRecordSet]) -> Vec<(String, Type)> {
        record_sets
            .iter()
            .map(|r| (r.name().to_string(), r.rr_type()))
            .collect()
    }

    #[test]
    fn collection_is_kept_in_canonical_order() {
        let all: Vec<_> = COLLECTION.iter().cloned().collect();
        assert_eq!(
            summary(&all),
            [
                ("a.a.db.".to_owned(), Type::A),
                ("a.b.db.".to_owned(), Type::A),
                ("b.b.db.".to_owned(), Type::A),
                ("b.b.db.".to_owned(), Type::CNAME),
                ("b.c.db.".to_owned(), Type::CNAME),
                ("c.c.db.".to_owned(), Type::CNAME),
            ]
        );
    }

    #[test]
    fn find_is_exact() {
        let name: Name = "B.B.DB".parse().unwrap();
        assert!(COLLECTION.find(&name, Type::CNAME, None).is_some());
        assert!(COLLECTION.find(&name, Type::TXT, None).is_none());
        assert!(COLLECTION.find(&name, Type::A, Some("blue")).is_none());
    }

    #[test]
    fn insert_or_replace_replaces() {
        let mut collection = COLLECTION.clone();
        let replacement = record_set("a.a.db.", Type::A).with_values(["192.0.2.1"]);
        let old = collection.insert_or_replace(replacement.clone());
        assert_eq!(old, Some(record_set("a.a.db.", Type::A)));
        assert_eq!(collection.len(), COLLECTION.len());
        assert_eq!(
            collection.find(replacement.name(), Type::A, None),
            Some(&replacement)
        );
    }

    #[test]
    fn set_identifiers_distinguish_record_sets() {
        let mut collection = COLLECTION.clone();
        let routed = record_set("w.db.", Type::CNAME);
        let blue = routed.clone().with_set_identifier("blue");
        let green = routed.with_set_identifier("green");
        collection.insert_or_replace(green.clone());
        collection.insert_or_replace(blue.clone());
        assert_eq!(collection.len(), COLLECTION.len() + 2);

        let name: Name = "W.DB.".parse().unwrap();
        assert_eq!(
            collection.with_name_and_type(&name, Type::CNAME),
            [blue.clone(), green.clone()]
        );
        assert!(collection.with_name_and_type(&name, Type::A).is_empty());

        assert_eq!(collection.remove(&blue.key()), Some(blue));
        assert_eq!(collection.with_name_and_type(&name, Type::CNAME), [green]);
    }

    #[test]
    fn with_name_and_type_is_exact() {
        let name: Name = "b.b.db.".parse().unwrap();
        assert_eq!(
            COLLECTION.with_name_and_type(&name, Type::A),
            [record_set("b.b.db.", Type::A)]
        );
        let name: Name = "c.db.".parse().unwrap();
        assert!(COLLECTION.with_name_and_type(&name, Type::CNAME).is_empty());
    }

    #[test]
    fn non_implicit_count_ignores_apex_soa_and_ns() {
        let mut collection = RecordSetCollection::default();
        collection.insert_or_replace(record_set("db.", Type::SOA));
        collection.insert_or_replace(record_set("db.", Type::NS));
        assert_eq!(collection.non_implicit_count(&APEX), 0);
        collection.insert_or_replace(record_set("sub.db.", Type::NS));
        assert_eq!(collection.non_implicit_count(&APEX), 1);
    }

    #[test]
    fn page_starts_at_name_and_type() {
        let start = StartPosition::parse(Some("b.b.db."), Some("A"), None).unwrap();
        let page = COLLECTION.page(&start, 100);
        assert!(!page.is_truncated);
        assert_eq!(page.record_sets, COLLECTION.iter().skip(2).cloned().collect::<Vec<_>>());
    }

    #[test]
    fn page_starts_at_name_only() {
        let start = StartPosition::parse(Some("b.a.db"), None, None).unwrap();
        let page = COLLECTION.page(&start, 100);
        assert_eq!(page.record_sets.len(), 5);
        assert_eq!(page.record_sets[0].name().as_str(), "a.b.db.");
    }

    #[test]
    fn page_is_truncated_with_markers() {
        let page = COLLECTION.page(&StartPosition::default(), 3);
        assert_eq!(page.record_sets.len(), 3);
        assert!(page.is_truncated);
        assert_eq!(page.next_name, Some("b.b.db.".parse().unwrap()));
        assert_eq!(page.next_type, Some(Type::CNAME));
        assert_eq!(page.next_identifier, None);

        let start = StartPosition::parse(
            page.next_name.as_ref().map(Name::as_str),
            Some("CNAME"),
            None,
        )
        .unwrap();
        let page = COLLECTION.page(&start, 3);
        assert_eq!(page.record_sets.len(), 3);
        assert!(!page.is_truncated);
        assert_eq!(page.next_name, None);
    }

    #[test]
    fn page_starts_within_set_identifiers() {
        let mut collection = RecordSetCollection::default();
        for id in ["a", "b", "c"] {
            collection.insert_or_replace(record_set("w.db.", Type::A).with_set_identifier(id));
        }
        let start = StartPosition::parse(Some("w.db."), Some("A"), Some("b")).unwrap();
        let page = collection.page(&start, 100);
        assert_eq!(
            page.record_sets
                .iter()
                .map(|r| r.set_identifier().unwrap())
                .collect::<Vec<_>>(),
            ["b", "c"]
        );
    }

    #[test]
    fn invalid_start_positions_are_rejected() {
        assert_eq!(StartPosition::parse(None, Some("A"), None), Err(Error::BadRequest));
        assert_eq!(
            StartPosition::parse(Some("a.db."), Some("BOGUS"), None),
            Err(Error::BadRequest)
        );
        assert_eq!(
            StartPosition::parse(Some("a.db."), None, Some("blue")),
            Err(Error::BadRequest)
        );
        assert_eq!(StartPosition::parse(Some("a..db."), None, None), Err(Error::BadRequest));
    }
}
