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

//! Zonestead is an in-memory emulation of a cloud DNS provider's
//! hosted-zone API.
//!
//! It keeps authoritative state only: hosted zones and their record
//! sets, health checks, and tags. It never answers DNS queries. The
//! entry point is the [`Backend`], which exposes typed operations for a
//! transport layer (not part of this crate) to call:
//!
//! ```
//! use zonestead::db::{Action, Change, ChangeBatch, HostedZoneConfig};
//! use zonestead::rr::{ResourceRecordSet, Type};
//! use zonestead::Backend;
//!
//! let backend = Backend::default();
//! let zone = backend
//!     .create_hosted_zone("example.com".parse().unwrap(), "ref-1", HostedZoneConfig::default())
//!     .hosted_zone;
//! assert_eq!(zone.name().as_str(), "example.com.");
//!
//! let www = ResourceRecordSet::new("www.example.com".parse().unwrap(), Type::A)
//!     .with_ttl(300u32.try_into().unwrap())
//!     .with_values(["192.0.2.1"]);
//! let batch = ChangeBatch::new(vec![Change::new(Action::Create, www)]);
//! let change = backend.change_resource_record_sets(zone.id(), &batch).unwrap();
//! assert_eq!(change.status.to_string(), "INSYNC");
//! assert_eq!(zone.record_set_count(), 1);
//! ```
//!
//! Everything happens synchronously and immediately; there is no
//! propagation delay to model. A process-wide backend is available
//! from [`backend::global`], and [`Backend::reset`] clears it.

pub mod backend;
pub mod config;
pub mod db;
pub mod id;
pub mod name;
pub mod rr;
mod util;

pub use backend::Backend;
pub use config::Config;
