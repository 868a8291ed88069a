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

//! Implementation of the [`Backend`], which owns all of the stores and
//! exposes the typed operations on them.

use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;

use crate::config::Config;
use crate::db::change::{self, CHANGE_ID_PREFIX};
use crate::db::zone::ZONE_ID_PREFIX;
use crate::db::{
    Catalog, ChangeBatch, ChangeInfo, Error, HealthCheck, HealthCheckConfig, HealthCheckStore,
    HostedZone, HostedZoneConfig, RecordSetPage, ResourceType, StartPosition, Tag, TagMap,
    TagStore,
};
use crate::id::IdGenerator;
use crate::name::Name;
use crate::util::strip_id_prefix;

lazy_static! {
    static ref GLOBAL: Backend = Backend::default();
}

/// Returns the process-wide [`Backend`], which is created with the
/// default configuration on first use. Use [`Backend::reset`] to clear
/// it between tests.
pub fn global() -> &'static Backend {
    &GLOBAL
}

/// The emulated DNS hosting backend.
///
/// A `Backend` owns the [`Catalog`] of hosted zones, the
/// [`HealthCheckStore`], and the [`TagStore`], and generates the ids of
/// everything created through it. All operations are synchronous and
/// take `&self`, so a `Backend` can be shared between threads.
///
/// Change batches for the same zone are serialized by the zone itself
/// (see [`HostedZone`]). Deleting a zone excludes all concurrent change
/// batches, so a zone cannot gain record sets while it is being
/// deleted.
pub struct Backend {
    config: Config,
    ids: IdGenerator,
    catalog: RwLock<Catalog>,
    health_checks: RwLock<HealthCheckStore>,
    tags: RwLock<TagStore>,
}

/// The result of [`Backend::create_hosted_zone`].
#[derive(Clone, Debug)]
pub struct CreatedHostedZone {
    pub hosted_zone: Arc<HostedZone>,
    pub change_info: ChangeInfo,
    pub delegation_set: Vec<Name>,
}

/// The result of [`Backend::list_hosted_zones_by_name`].
#[derive(Clone, Debug)]
pub struct HostedZonesByName {
    /// The requested name, with its trailing dot.
    pub dns_name: Option<Name>,
    pub hosted_zones: Vec<Arc<HostedZone>>,
}

/// The parameters of [`Backend::list_resource_record_sets`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ListRecordSetsRequest<'a> {
    pub start_name: Option<&'a str>,
    pub start_type: Option<&'a str>,
    pub start_identifier: Option<&'a str>,
    pub max_items: Option<usize>,
}

impl Backend {
    /// Creates a new, empty `Backend` with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            ids: IdGenerator::from_seed(config.id_seed),
            config,
            catalog: RwLock::new(Catalog::new()),
            health_checks: RwLock::new(HealthCheckStore::new()),
            tags: RwLock::new(TagStore::new()),
        }
    }

    /// Returns the configuration the `Backend` was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clears every store and restarts the id sequence.
    pub fn reset(&self) {
        self.catalog.write().unwrap().clear();
        self.health_checks.write().unwrap().clear();
        self.tags.write().unwrap().clear();
        self.ids.reset();
        debug!("Backend reset");
    }

    ////////////////////////////////////////////////////////////////////
    // HOSTED ZONES                                                   //
    ////////////////////////////////////////////////////////////////////

    /// Creates a new, empty hosted zone. Zone names need not be
    /// unique, and the caller reference is not checked.
    pub fn create_hosted_zone(
        &self,
        name: Name,
        caller_reference: &str,
        config: HostedZoneConfig,
    ) -> CreatedHostedZone {
        let raw_id = self.ids.zone_id();
        let hosted_zone =
            self.catalog
                .write()
                .unwrap()
                .create(&raw_id, name, caller_reference, config);
        debug!(
            "Created hosted zone {} ({})",
            hosted_zone.id(),
            hosted_zone.name()
        );
        CreatedHostedZone {
            hosted_zone,
            change_info: self.new_change_info(None),
            delegation_set: self.config.name_servers().cloned().collect(),
        }
    }

    /// Looks up a hosted zone by id, with or without the
    /// `/hostedzone/` prefix.
    pub fn get_hosted_zone(&self, id: &str) -> Result<Arc<HostedZone>, Error> {
        self.catalog.read().unwrap().get(id).cloned()
    }

    /// Deletes a hosted zone and its tags. The zone must not contain
    /// any record sets besides the SOA and NS record sets at its apex.
    pub fn delete_hosted_zone(&self, id: &str) -> Result<ChangeInfo, Error> {
        let zone = self.catalog.write().unwrap().delete(id)?;
        self.tags
            .write()
            .unwrap()
            .remove_resource(ResourceType::HostedZone, zone.bare_id());
        debug!("Deleted hosted zone {} ({})", zone.id(), zone.name());
        Ok(self.new_change_info(None))
    }

    /// Returns all hosted zones in creation order.
    pub fn list_hosted_zones(&self) -> Vec<Arc<HostedZone>> {
        self.catalog.read().unwrap().list().to_vec()
    }

    /// Returns the hosted zones in canonical DNS order of their names,
    /// optionally only those named `dns_name`.
    pub fn list_hosted_zones_by_name(&self, dns_name: Option<Name>) -> HostedZonesByName {
        let hosted_zones = self
            .catalog
            .read()
            .unwrap()
            .list_by_name(dns_name.as_ref());
        HostedZonesByName {
            dns_name,
            hosted_zones,
        }
    }

    pub fn hosted_zone_count(&self) -> usize {
        self.catalog.read().unwrap().len()
    }

    ////////////////////////////////////////////////////////////////////
    // RECORD SETS                                                    //
    ////////////////////////////////////////////////////////////////////

    /// Applies a change batch to a hosted zone's record sets. See
    /// [`change::apply`] for the validation rules; on any error, no
    /// change in the batch takes effect.
    pub fn change_resource_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo, Error> {
        let catalog = self.catalog.read().unwrap();
        let zone = catalog.get(zone_id)?;
        change::apply(zone, batch, self.config.max_batch_resource_records)?;
        let change_info = self.new_change_info(batch.comment.clone());
        debug!(
            "Applied change {} to hosted zone {}: {} change(s)",
            change_info.id,
            zone.id(),
            batch.changes.len(),
        );
        Ok(change_info)
    }

    /// Lists a hosted zone's record sets in canonical order.
    ///
    /// If `max_items` is not given, the configured default page size is
    /// used.
    pub fn list_resource_record_sets(
        &self,
        zone_id: &str,
        request: &ListRecordSetsRequest,
    ) -> Result<RecordSetPage, Error> {
        let zone = self.get_hosted_zone(zone_id)?;
        let start = StartPosition::parse(
            request.start_name,
            request.start_type,
            request.start_identifier,
        )?;
        let max_items = match request.max_items {
            Some(0) => return Err(Error::BadRequest),
            Some(max_items) => max_items,
            None => self.config.default_max_items,
        };
        Ok(zone.record_sets().page(&start, max_items))
    }

    ////////////////////////////////////////////////////////////////////
    // CHANGES                                                        //
    ////////////////////////////////////////////////////////////////////

    /// Returns the status of a change. Every change takes effect
    /// immediately, so any id is reported as in sync.
    pub fn get_change(&self, id: &str) -> ChangeInfo {
        ChangeInfo::in_sync(id, None)
    }

    fn new_change_info(&self, comment: Option<String>) -> ChangeInfo {
        let id = format!("{CHANGE_ID_PREFIX}{}", self.ids.change_id());
        ChangeInfo::in_sync(&id, comment)
    }

    ////////////////////////////////////////////////////////////////////
    // HEALTH CHECKS                                                  //
    ////////////////////////////////////////////////////////////////////

    pub fn create_health_check(
        &self,
        caller_reference: &str,
        config: HealthCheckConfig,
    ) -> Arc<HealthCheck> {
        let id = self.ids.health_check_id();
        let health_check = self
            .health_checks
            .write()
            .unwrap()
            .create(&id, caller_reference, config);
        debug!(
            "Created health check {} ({})",
            health_check.id, health_check.config.check_type
        );
        health_check
    }

    pub fn get_health_check(&self, id: &str) -> Result<Arc<HealthCheck>, Error> {
        self.health_checks.read().unwrap().get(id).cloned()
    }

    /// Returns all health checks in creation order.
    pub fn list_health_checks(&self) -> Vec<Arc<HealthCheck>> {
        self.health_checks.read().unwrap().list().to_vec()
    }

    /// Deletes a health check and its tags. Record sets that refer to
    /// the health check are not changed.
    pub fn delete_health_check(&self, id: &str) -> Result<(), Error> {
        let health_check = self.health_checks.write().unwrap().delete(id)?;
        self.tags
            .write()
            .unwrap()
            .remove_resource(ResourceType::HealthCheck, &health_check.id);
        debug!("Deleted health check {}", health_check.id);
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////
    // TAGS                                                           //
    ////////////////////////////////////////////////////////////////////

    /// Returns the tags of a resource. Zone ids may be given with or
    /// without the `/hostedzone/` prefix.
    pub fn list_tags_for_resource(&self, resource_type: ResourceType, resource_id: &str) -> TagMap {
        self.tags
            .read()
            .unwrap()
            .list(resource_type, tag_resource_id(resource_type, resource_id))
    }

    /// Adds and removes tags on a resource. The resource does not have
    /// to exist.
    pub fn change_tags_for_resource(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        add: &[Tag],
        remove_keys: &[String],
    ) {
        let resource_id = tag_resource_id(resource_type, resource_id);
        self.tags
            .write()
            .unwrap()
            .apply(resource_type, resource_id, add, remove_keys);
        debug!(
            "Changed tags of {} {}: {} added, {} removed",
            resource_type,
            resource_id,
            add.len(),
            remove_keys.len(),
        );
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Normalizes the id of a tagged resource. Hosted zones are tagged by
/// their bare id.
fn tag_resource_id(resource_type: ResourceType, resource_id: &str) -> &str {
    match resource_type {
        ResourceType::HostedZone => strip_id_prefix(resource_id, ZONE_ID_PREFIX),
        ResourceType::HealthCheck => resource_id,
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use lazy_static::lazy_static;

    use super::*;
    use crate::db::{Action, Change, ChangeBatchIssue, ErrorKind, HealthCheckType};
    use crate::rr::{
        AliasTarget, Failover, GeoLocation, ResourceRecordSet, RoutingPolicy, Ttl, Type,
    };

    lazy_static! {
        static ref TTL: Ttl = Ttl::try_from(60u32).unwrap();
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn create_zone(backend: &Backend, name: &str) -> Arc<HostedZone> {
        backend
            .create_hosted_zone(name.parse().unwrap(), "ref", HostedZoneConfig::default())
            .hosted_zone
    }

    fn a_record(name: &str, value: &str) -> ResourceRecordSet {
        ResourceRecordSet::new(name.parse().unwrap(), Type::A)
            .with_ttl(*TTL)
            .with_values([value])
    }

    fn submit(
        backend: &Backend,
        zone: &HostedZone,
        changes: impl IntoIterator<Item = (Action, ResourceRecordSet)>,
    ) -> Result<ChangeInfo, Error> {
        let batch = ChangeBatch::new(
            changes
                .into_iter()
                .map(|(action, record_set)| Change::new(action, record_set))
                .collect(),
        );
        backend.change_resource_record_sets(zone.id(), &batch)
    }

    fn list_all(backend: &Backend, zone: &HostedZone) -> Vec<ResourceRecordSet> {
        backend
            .list_resource_record_sets(zone.id(), &ListRecordSetsRequest::default())
            .unwrap()
            .record_sets
    }

    #[test]
    fn created_zones_can_be_fetched() {
        init_logging();
        let backend = Backend::default();
        let created = backend.create_hosted_zone(
            "testdns.aws.com".parse().unwrap(),
            "caller",
            HostedZoneConfig {
                private_zone: false,
                comment: Some("test com".to_owned()),
            },
        );
        assert_eq!(created.delegation_set.len(), 4);
        assert_eq!(created.change_info.status.to_string(), "INSYNC");
        assert!(created.change_info.id.starts_with("/change/C"));

        let zone = backend.get_hosted_zone(created.hosted_zone.id()).unwrap();
        assert_eq!(zone.name().as_str(), "testdns.aws.com.");
        assert_eq!(zone.config().comment.as_deref(), Some("test com"));
        assert_eq!(zone.record_set_count(), 0);
        assert!(zone.id().starts_with("/hostedzone/Z"));
        assert!(Arc::ptr_eq(
            &backend.get_hosted_zone(zone.bare_id()).unwrap(),
            &zone
        ));
        assert_eq!(backend.hosted_zone_count(), 1);
    }

    #[test]
    fn unknown_zones_are_not_found() {
        let backend = Backend::default();
        let error = backend.get_hosted_zone("abcd").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.to_string(), "No hosted zone found with ID: abcd");
        assert_eq!(
            backend.delete_hosted_zone("abcd").unwrap_err(),
            Error::NoSuchHostedZone("abcd".into())
        );
        let error = backend
            .change_resource_record_sets("abcd", &ChangeBatch::default())
            .unwrap_err();
        assert_eq!(error.code(), "NoSuchHostedZone");
    }

    #[test]
    fn only_empty_zones_can_be_deleted() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let record = a_record("a.db.", "127.0.0.1");
        submit(&backend, &zone, [(Action::Create, record.clone())]).unwrap();
        assert_eq!(
            backend.delete_hosted_zone(zone.id()).unwrap_err().kind(),
            ErrorKind::ResourceInUse
        );

        submit(&backend, &zone, [(Action::Delete, record)]).unwrap();
        backend.delete_hosted_zone(zone.id()).unwrap();
        assert_eq!(backend.hosted_zone_count(), 0);
    }

    #[test]
    fn list_hosted_zones_by_name_works() {
        let backend = Backend::default();
        create_zone(&backend, "test.b.com.");
        create_zone(&backend, "test.a.org.");
        create_zone(&backend, "test.a.org.");
        create_zone(&backend, "my.test.net.");

        let listed = backend.list_hosted_zones_by_name(None);
        assert_eq!(
            listed
                .hosted_zones
                .iter()
                .map(|z| z.name().as_str())
                .collect::<Vec<_>>(),
            ["test.b.com.", "my.test.net.", "test.a.org.", "test.a.org."]
        );

        let listed = backend.list_hosted_zones_by_name(Some("test.b.com".parse().unwrap()));
        assert_eq!(listed.dns_name.unwrap().as_str(), "test.b.com.");
        assert_eq!(listed.hosted_zones.len(), 1);
        assert_eq!(listed.hosted_zones[0].name().as_str(), "test.b.com.");

        assert_eq!(
            backend
                .list_hosted_zones()
                .iter()
                .map(|z| z.name().as_str())
                .collect::<Vec<_>>(),
            ["test.b.com.", "test.a.org.", "test.a.org.", "my.test.net."]
        );
    }

    #[test]
    fn upsert_replaces_created_record() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        submit(&backend, &zone, [(Action::Create, a_record("prod.db.", "127.0.0.1"))]).unwrap();
        submit(&backend, &zone, [(Action::Upsert, a_record("prod.db.", "192.168.1.1"))])
            .unwrap();

        let record_sets = list_all(&backend, &zone);
        assert_eq!(record_sets.len(), 1);
        let values = record_sets[0].values().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(&*values[0], "192.168.1.1");
    }

    #[test]
    fn record_limit_is_enforced_through_the_backend() {
        let backend = Backend::new(Config {
            max_batch_resource_records: 3,
            ..Config::default()
        });
        let zone = create_zone(&backend, "db.");
        let record = |name: &str, n: usize| {
            ResourceRecordSet::new(name.parse().unwrap(), Type::TXT)
                .with_values((0..n).map(|i| format!("\"{i}\"")))
        };
        submit(&backend, &zone, [(Action::Create, record("a.db.", 3))]).unwrap();
        let error = submit(&backend, &zone, [(Action::Create, record("b.db.", 4))]).unwrap_err();
        assert_eq!(error.to_string(), "Number of records limit of 3 exceeded.");
        assert_eq!(zone.record_set_count(), 1);
    }

    #[test]
    fn delete_with_wrong_type_is_a_noop() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        submit(&backend, &zone, [(Action::Create, a_record("cname.db.", "127.0.0.1"))]).unwrap();
        let wrong_type = ResourceRecordSet::new("cname.db.".parse().unwrap(), Type::CNAME)
            .with_ttl(*TTL)
            .with_values(["example.com"]);
        submit(&backend, &zone, [(Action::Delete, wrong_type)]).unwrap();
        assert_eq!(list_all(&backend, &zone).len(), 1);
    }

    #[test]
    fn weighted_record_sets_coexist() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "testdns.aws.com.");
        let weighted = |id: &str, weight: u8| {
            ResourceRecordSet::new("cname.testdns.aws.com.".parse().unwrap(), Type::CNAME)
                .with_set_identifier(id)
                .with_routing_policy(RoutingPolicy::Weighted(weight))
        };
        submit(
            &backend,
            &zone,
            [
                (Action::Create, weighted("test1", 90)),
                (Action::Create, weighted("test2", 10)),
            ],
        )
        .unwrap();

        let page = backend
            .list_resource_record_sets(
                zone.id(),
                &ListRecordSetsRequest {
                    start_name: Some("cname.testdns.aws.com"),
                    start_type: Some("CNAME"),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(page.record_sets.len(), 2);
        assert_eq!(page.record_sets[0].set_identifier(), Some("test1"));
        assert_eq!(page.record_sets[0].routing_policy().weight(), Some(90));
        assert_eq!(page.record_sets[1].set_identifier(), Some("test2"));

        submit(&backend, &zone, [(Action::Delete, weighted("test1", 90))]).unwrap();
        let record_sets = list_all(&backend, &zone);
        assert_eq!(record_sets.len(), 1);
        assert_eq!(record_sets[0].set_identifier(), Some("test2"));
    }

    #[test]
    fn failover_and_geolocation_are_stored() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "test.zone.");
        let failover = a_record("failover.test.zone.", "10.0.0.4")
            .with_routing_policy(RoutingPolicy::Failover(Failover::Primary));
        let europe = a_record("georecord1.test.zone.", "8.8.8.8")
            .with_set_identifier("EU")
            .with_routing_policy(RoutingPolicy::Geolocation(GeoLocation::continent("EU")));
        let new_york = a_record("georecord2.test.zone.", "8.8.8.8")
            .with_set_identifier("US NY")
            .with_routing_policy(RoutingPolicy::Geolocation(GeoLocation::country(
                "US",
                Some("NY"),
            )));
        submit(
            &backend,
            &zone,
            [
                (Action::Create, failover),
                (Action::Create, europe),
                (Action::Create, new_york),
            ],
        )
        .unwrap();

        let record_sets = list_all(&backend, &zone);
        assert_eq!(
            record_sets[0].routing_policy().failover().map(|f| f.to_string()),
            Some("PRIMARY".to_owned())
        );
        let europe = record_sets[1].routing_policy().geo_location().unwrap();
        assert_eq!(europe.continent_code(), Some("EU"));
        let new_york = record_sets[2].routing_policy().geo_location().unwrap();
        assert_eq!(new_york.country_code(), Some("US"));
        assert_eq!(new_york.subdivision_code(), Some("NY"));
    }

    #[test]
    fn plain_record_set_cannot_join_weighted_ones() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let blue = a_record("w.db.", "10.0.0.1")
            .with_set_identifier("blue")
            .with_routing_policy(RoutingPolicy::Weighted(50));
        submit(&backend, &zone, [(Action::Create, blue)]).unwrap();

        let error = submit(&backend, &zone, [(Action::Create, a_record("w.db.", "10.0.0.2"))])
            .unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidChangeBatch(ChangeBatchIssue::MixedSetIdentifiers { .. })
        ));
        assert_eq!(zone.record_set_count(), 1);
        assert_eq!(list_all(&backend, &zone)[0].set_identifier(), Some("blue"));
    }

    #[test]
    fn weighted_record_set_cannot_join_a_plain_one() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        submit(&backend, &zone, [(Action::Create, a_record("w.db.", "10.0.0.1"))]).unwrap();

        let green = a_record("w.db.", "10.0.0.2")
            .with_set_identifier("green")
            .with_routing_policy(RoutingPolicy::Weighted(50));
        let error = submit(&backend, &zone, [(Action::Create, green)]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidChangeBatch);
        assert_eq!(zone.record_set_count(), 1);
        assert_eq!(list_all(&backend, &zone)[0].set_identifier(), None);
    }

    #[test]
    fn health_check_ids_are_stored() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let health_check =
            backend.create_health_check("caller", HealthCheckConfig::new(HealthCheckType::Tcp));
        let primary = a_record("app.db.", "10.0.0.1")
            .with_routing_policy(RoutingPolicy::Failover(Failover::Primary))
            .with_health_check_id(&health_check.id);
        submit(&backend, &zone, [(Action::Create, primary)]).unwrap();

        let record_sets = list_all(&backend, &zone);
        assert_eq!(record_sets.len(), 1);
        assert_eq!(record_sets[0].health_check_id(), Some(&*health_check.id));
    }

    #[test]
    fn latency_record_sets_are_deleted_by_set_identifier() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let latency = |region: &str, value: &str| {
            a_record("api.db.", value)
                .with_set_identifier(region)
                .with_routing_policy(RoutingPolicy::Latency(region.into()))
        };
        submit(
            &backend,
            &zone,
            [
                (Action::Create, latency("us-east-1", "10.0.0.1")),
                (Action::Create, latency("eu-west-1", "10.0.1.1")),
            ],
        )
        .unwrap();
        assert_eq!(zone.record_set_count(), 2);

        submit(&backend, &zone, [(Action::Delete, latency("us-east-1", "10.0.0.1"))]).unwrap();
        let record_sets = list_all(&backend, &zone);
        assert_eq!(record_sets.len(), 1);
        assert_eq!(record_sets[0].set_identifier(), Some("eu-west-1"));
        assert_eq!(record_sets[0].routing_policy().region(), Some("eu-west-1"));
        assert_eq!(
            record_sets[0].values().map(|v| v.to_vec()),
            Some(vec!["10.0.1.1".into()])
        );
    }

    #[test]
    fn weighted_alias_weight_is_changed_by_upsert() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let alias = |id: &str, dns_name: &str, weight: u8| {
            ResourceRecordSet::new("www.db.".parse().unwrap(), Type::A)
                .with_alias_target(AliasTarget {
                    hosted_zone_id: "Z3AADJGX6KTTL2".into(),
                    dns_name: dns_name.parse().unwrap(),
                    evaluate_target_health: true,
                })
                .with_set_identifier(id)
                .with_routing_policy(RoutingPolicy::Weighted(weight))
        };
        submit(
            &backend,
            &zone,
            [
                (Action::Create, alias("one", "lb-1.example.com.", 70)),
                (Action::Create, alias("two", "lb-2.example.com.", 30)),
            ],
        )
        .unwrap();

        submit(&backend, &zone, [(Action::Upsert, alias("two", "lb-2.example.com.", 0))])
            .unwrap();
        let record_sets = list_all(&backend, &zone);
        assert_eq!(record_sets.len(), 2);
        assert_eq!(record_sets[0].set_identifier(), Some("one"));
        assert_eq!(record_sets[0].routing_policy().weight(), Some(70));
        assert_eq!(record_sets[1].set_identifier(), Some("two"));
        assert_eq!(record_sets[1].routing_policy().weight(), Some(0));
        assert_eq!(
            record_sets[1].alias_target().map(|t| t.dns_name.as_str()),
            Some("lb-2.example.com.")
        );
    }

    #[test]
    fn concurrent_batches_are_applied_whole() {
        const N_THREADS: usize = 4;
        const N_BATCHES: usize = 25;
        const BATCH_SIZE: usize = 5;

        let backend = Arc::new(Backend::default());
        let zone = create_zone(&backend, "db.");
        let done = Arc::new(AtomicBool::new(false));

        let reader = {
            let zone = zone.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let len = zone.record_sets().len();
                    assert_eq!(len % BATCH_SIZE, 0, "saw a partial batch ({len} record sets)");
                    thread::yield_now();
                }
            })
        };

        let writers: Vec<_> = (0..N_THREADS)
            .map(|t| {
                let backend = backend.clone();
                let zone_id = zone.id().to_owned();
                thread::spawn(move || {
                    for b in 0..N_BATCHES {
                        let changes = (0..BATCH_SIZE)
                            .map(|r| {
                                let name = format!("r{r}.b{b}.t{t}.db.");
                                Change::new(Action::Create, a_record(&name, "10.0.0.1"))
                            })
                            .collect();
                        backend
                            .change_resource_record_sets(&zone_id, &ChangeBatch::new(changes))
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        reader.join().unwrap();

        assert_eq!(zone.record_set_count(), N_THREADS * N_BATCHES * BATCH_SIZE);
    }

    #[test]
    fn out_of_zone_changes_mutate_nothing() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        for action in [Action::Create, Action::Upsert] {
            let error = submit(
                &backend,
                &zone,
                [(action, a_record("prod.scooby.doo", "127.0.0.1"))],
            )
            .unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidChangeBatch);
        }
        assert!(list_all(&backend, &zone).is_empty());
    }

    #[test]
    fn listing_validates_start_parameters() {
        let backend = Backend::default();
        let zone = create_zone(&backend, "db.");
        let request = ListRecordSetsRequest {
            start_type: Some("A"),
            ..Default::default()
        };
        let error = backend
            .list_resource_record_sets(zone.id(), &request)
            .unwrap_err();
        assert_eq!(error.code(), "400");
        assert_eq!(error.to_string(), "Bad Request");

        let request = ListRecordSetsRequest {
            max_items: Some(0),
            ..Default::default()
        };
        assert!(backend.list_resource_record_sets(zone.id(), &request).is_err());
    }

    #[test]
    fn listing_paginates() {
        let backend = Backend::new(Config {
            default_max_items: 2,
            ..Config::default()
        });
        let zone = create_zone(&backend, "db.");
        submit(
            &backend,
            &zone,
            ["a.db.", "b.db.", "c.db."]
                .into_iter()
                .map(|name| (Action::Create, a_record(name, "127.0.0.1"))),
        )
        .unwrap();

        let first = backend
            .list_resource_record_sets(zone.id(), &ListRecordSetsRequest::default())
            .unwrap();
        assert_eq!(first.record_sets.len(), 2);
        assert!(first.is_truncated);
        let next_name = first.next_name.unwrap();
        let next_type = first.next_type.unwrap().to_string();

        let second = backend
            .list_resource_record_sets(
                zone.id(),
                &ListRecordSetsRequest {
                    start_name: Some(next_name.as_str()),
                    start_type: Some(next_type.as_str()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(second.record_sets.len(), 1);
        assert_eq!(second.record_sets[0].name().as_str(), "c.db.");
        assert!(!second.is_truncated);
    }

    #[test]
    fn get_change_echoes_any_id() {
        let backend = Backend::default();
        let change = backend.get_change("123456");
        assert_eq!(&*change.id, "123456");
        assert_eq!(change.status.to_string(), "INSYNC");
    }

    #[test]
    fn health_checks_work() {
        let backend = Backend::default();
        let config = HealthCheckConfig {
            ip_address: Some("10.0.0.25".parse().unwrap()),
            port: Some(80),
            resource_path: Some("/".to_owned()),
            fully_qualified_domain_name: Some("example.com".to_owned()),
            search_string: Some("a good response".to_owned()),
            request_interval: 10,
            failure_threshold: 2,
            ..HealthCheckConfig::new(HealthCheckType::HttpStrMatch)
        };
        let health_check = backend.create_health_check("caller", config.clone());
        assert_eq!(health_check.version, 1);
        assert_eq!(health_check.config, config);
        assert_eq!(backend.list_health_checks().len(), 1);
        assert_eq!(
            backend.get_health_check(&health_check.id).unwrap(),
            health_check
        );

        backend.delete_health_check(&health_check.id).unwrap();
        assert!(backend.list_health_checks().is_empty());
        assert_eq!(
            backend.delete_health_check(&health_check.id).unwrap_err().code(),
            "NoSuchHealthCheck"
        );
    }

    #[test]
    fn tags_round_trip_and_follow_resources() {
        let backend = Backend::default();
        let health_check =
            backend.create_health_check("caller", HealthCheckConfig::new(HealthCheckType::Tcp));
        let id = &*health_check.id;
        backend.change_tags_for_resource(
            ResourceType::HealthCheck,
            id,
            &[Tag::new("key1", "value1"), Tag::new("key2", "value2")],
            &[],
        );
        assert_eq!(
            backend
                .list_tags_for_resource(ResourceType::HealthCheck, id)
                .len(),
            2
        );

        backend.change_tags_for_resource(ResourceType::HealthCheck, id, &[], &["key1".to_owned()]);
        let tags = backend.list_tags_for_resource(ResourceType::HealthCheck, id);
        assert_eq!(tags.keys().collect::<Vec<_>>(), ["key2"]);

        backend.change_tags_for_resource(ResourceType::HealthCheck, id, &[], &["key2".to_owned()]);
        assert!(backend
            .list_tags_for_resource(ResourceType::HealthCheck, id)
            .is_empty());

        let zone = create_zone(&backend, "db.");
        backend.change_tags_for_resource(
            ResourceType::HostedZone,
            zone.id(),
            &[Tag::new("env", "test")],
            &[],
        );
        assert_eq!(
            backend
                .list_tags_for_resource(ResourceType::HostedZone, zone.bare_id())
                .len(),
            1
        );
        backend.delete_hosted_zone(zone.id()).unwrap();
        assert!(backend
            .list_tags_for_resource(ResourceType::HostedZone, zone.bare_id())
            .is_empty());
    }

    #[test]
    fn reset_clears_everything_and_restarts_ids() {
        let backend = Backend::new(Config {
            id_seed: Some(1),
            ..Config::default()
        });
        let first_id = create_zone(&backend, "db.").id().to_owned();
        backend.create_health_check("caller", HealthCheckConfig::new(HealthCheckType::Tcp));
        backend.change_tags_for_resource(
            ResourceType::HostedZone,
            &first_id,
            &[Tag::new("k", "v")],
            &[],
        );

        backend.reset();
        assert_eq!(backend.hosted_zone_count(), 0);
        assert!(backend.list_health_checks().is_empty());
        assert!(backend
            .list_tags_for_resource(ResourceType::HostedZone, &first_id)
            .is_empty());
        assert_eq!(create_zone(&backend, "db.").id(), first_id);
    }

    #[test]
    fn global_backend_is_shared() {
        assert!(std::ptr::eq(global(), global()));
        assert_eq!(global().config().default_max_items, 100);
    }
}
