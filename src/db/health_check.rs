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

//! Health checks and the [`HealthCheckStore`].

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use super::Error;
use crate::util::{lookup_mnemonic, mnemonic_of};

/// The protocol a health check uses to probe its endpoint.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum HealthCheckType {
    Http,
    Https,
    HttpStrMatch,
    HttpsStrMatch,
    Tcp,
    Calculated,
}

const HEALTH_CHECK_TYPES: &[(&str, HealthCheckType)] = &[
    ("HTTP", HealthCheckType::Http),
    ("HTTPS", HealthCheckType::Https),
    ("HTTP_STR_MATCH", HealthCheckType::HttpStrMatch),
    ("HTTPS_STR_MATCH", HealthCheckType::HttpsStrMatch),
    ("TCP", HealthCheckType::Tcp),
    ("CALCULATED", HealthCheckType::Calculated),
];

impl FromStr for HealthCheckType {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        lookup_mnemonic(HEALTH_CHECK_TYPES, text).ok_or("unknown health check type")
    }
}

impl fmt::Debug for HealthCheckType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for HealthCheckType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(mnemonic_of(HEALTH_CHECK_TYPES, *self))
    }
}

/// The configuration of a health check. It cannot be changed once the
/// health check is created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthCheckConfig {
    pub ip_address: Option<IpAddr>,
    pub port: Option<u16>,
    pub check_type: HealthCheckType,
    pub resource_path: Option<String>,
    pub fully_qualified_domain_name: Option<String>,
    pub search_string: Option<String>,
    pub request_interval: u32,
    pub failure_threshold: u32,
    pub health_threshold: Option<u32>,
}

impl HealthCheckConfig {
    /// Creates a configuration of the given type with the provider's
    /// defaults: a 30-second interval and a failure threshold of 3.
    pub fn new(check_type: HealthCheckType) -> Self {
        Self {
            ip_address: None,
            port: None,
            check_type,
            resource_path: None,
            fully_qualified_domain_name: None,
            search_string: None,
            request_interval: 30,
            failure_threshold: 3,
            health_threshold: None,
        }
    }
}

/// A stored health check.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthCheck {
    pub id: Box<str>,
    pub caller_reference: Box<str>,
    pub config: HealthCheckConfig,
    pub version: u64,
}

/// Owns all health checks, in creation order.
#[derive(Debug, Default)]
pub struct HealthCheckStore {
    health_checks: Vec<Arc<HealthCheck>>,
}

impl HealthCheckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new health check with the given id. Its version starts
    /// at 1.
    pub fn create(
        &mut self,
        id: &str,
        caller_reference: &str,
        config: HealthCheckConfig,
    ) -> Arc<HealthCheck> {
        let health_check = Arc::new(HealthCheck {
            id: id.into(),
            caller_reference: caller_reference.into(),
            config,
            version: 1,
        });
        self.health_checks.push(health_check.clone());
        health_check
    }

    pub fn get(&self, id: &str) -> Result<&Arc<HealthCheck>, Error> {
        self.health_checks
            .iter()
            .find(|h| &*h.id == id)
            .ok_or_else(|| Error::NoSuchHealthCheck(id.into()))
    }

    /// Returns all health checks in creation order.
    pub fn list(&self) -> &[Arc<HealthCheck>] {
        &self.health_checks
    }

    pub fn delete(&mut self, id: &str) -> Result<Arc<HealthCheck>, Error> {
        let index = self
            .health_checks
            .iter()
            .position(|h| &*h.id == id)
            .ok_or_else(|| Error::NoSuchHealthCheck(id.into()))?;
        Ok(self.health_checks.remove(index))
    }

    pub fn clear(&mut self) {
        self.health_checks.clear();
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_config() -> HealthCheckConfig {
        HealthCheckConfig {
            ip_address: Some("10.0.0.25".parse().unwrap()),
            port: Some(80),
            ..HealthCheckConfig::new(HealthCheckType::Tcp)
        }
    }

    #[test]
    fn health_check_types_parse() {
        assert_eq!(
            "http_str_match".parse(),
            Ok(HealthCheckType::HttpStrMatch)
        );
        assert_eq!(HealthCheckType::HttpsStrMatch.to_string(), "HTTPS_STR_MATCH");
        assert!("ICMP".parse::<HealthCheckType>().is_err());
    }

    #[test]
    fn store_works() {
        let mut store = HealthCheckStore::new();
        let first = store.create("hc-1", "caller", tcp_config());
        store.create("hc-2", "caller", HealthCheckConfig::new(HealthCheckType::Http));
        assert_eq!(first.version, 1);
        assert_eq!(store.get("hc-1").unwrap().config, tcp_config());
        assert_eq!(
            store.list().iter().map(|h| &*h.id).collect::<Vec<_>>(),
            ["hc-1", "hc-2"]
        );

        store.delete("hc-1").unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(
            store.delete("hc-1").unwrap_err(),
            Error::NoSuchHealthCheck("hc-1".into())
        );
        assert!(store.get("hc-1").is_err());
    }
}
