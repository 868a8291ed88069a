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

//! The in-memory stores behind the backend.
//!
//! ## Zones and the catalog
//!
//! The [`Catalog`] owns every [`HostedZone`], and each zone owns one
//! [`RecordSetCollection`] holding its record sets in canonical order.
//! Zone names need not be unique; a zone is identified only by its id.
//!
//! Record sets are never modified directly. Instead, callers submit a
//! [`ChangeBatch`] to [`change::apply`], which validates the whole
//! batch and then applies it as a unit. Each zone's collection is
//! copy-on-write: the engine modifies a private copy and swaps it in
//! only when every change has succeeded, so readers holding a snapshot
//! from [`HostedZone::record_sets`] never see half of a batch.
//!
//! ## Health checks and tags
//!
//! The [`HealthCheckStore`] is independent of the zones. Record sets
//! may name a health check by id, but the reference is not checked.
//! The [`TagStore`] attaches key-value tags to zones and health checks.

pub mod catalog;
pub mod change;
mod error;
pub mod health_check;
pub mod record_sets;
pub mod tags;
pub mod zone;

pub use catalog::Catalog;
pub use change::{Action, Change, ChangeBatch, ChangeInfo, ChangeStatus};
pub use error::{ChangeBatchIssue, Error, ErrorKind};
pub use health_check::{HealthCheck, HealthCheckConfig, HealthCheckStore, HealthCheckType};
pub use record_sets::{RecordSetCollection, RecordSetPage, StartPosition};
pub use tags::{ResourceType, Tag, TagMap, TagStore};
pub use zone::{HostedZone, HostedZoneConfig};
