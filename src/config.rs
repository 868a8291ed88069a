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

//! Implements the backend configuration file.
//!
//! The configuration is TOML. Every setting is optional:
//!
//! ```toml
//! id_seed = 42
//! name_servers = ["ns-1.example.com.", "ns-2.example.net."]
//! max_batch_resource_records = 1000
//! default_max_items = 100
//! ```

use std::fmt::{self, Write};
use std::fs;
use std::io;
use std::path::Path;

use log::Level::Debug;
use log::{debug, log_enabled};
use paste::paste;
use serde::{de, Deserialize};

use crate::name::Name;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(Error::Parse)
    }

    /// Loads the configuration from the file given by `path`.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path.as_ref()).map_err(Error::Io)?;
        let config = Self::from_toml_str(&text)?;
        log_config_summary(&config);
        Ok(config)
    }

    /// Returns the name servers of the delegation set.
    pub fn name_servers(&self) -> impl Iterator<Item = &Name> {
        self.name_servers.iter().map(|n| &n.0)
    }
}

/// Summarizes the configuration in the log, if the debug log level is
/// enabled.
fn log_config_summary(config: &Config) {
    if !log_enabled!(Debug) {
        return;
    }

    let seed = match config.id_seed {
        Some(seed) => seed.to_string(),
        None => "none (random)".to_owned(),
    };
    let mut message = format!(
        "Configuration loaded:\n\
         Id seed:           {}\n\
         Batch record limit: {}\n\
         Default page size: {}\n\
         Name servers:      ",
        seed, config.max_batch_resource_records, config.default_max_items,
    );
    if config.name_servers.is_empty() {
        message.push_str("none");
    } else {
        write!(message, "{}", config.name_servers.len()).unwrap();
        for name_server in &config.name_servers {
            write!(message, "\n  {}", name_server.0).unwrap();
        }
    }
    debug!("{}", message);
}

/// An error that occurs while loading the configuration.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(_) => f.write_str("failed to read the configuration file"),
            Self::Parse(_) => f.write_str("failed to parse the configuration file"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seeds the id generator, making generated ids reproducible.
    pub id_seed: Option<u64>,
    #[serde(default = "default_name_servers")]
    pub name_servers: Vec<ConfigName>,
    #[serde(default = "default_max_batch_resource_records")]
    pub max_batch_resource_records: usize,
    #[serde(default = "default_max_items")]
    pub default_max_items: usize,
}

const DEFAULT_NAME_SERVERS: &[&str] = &[
    "ns-2048.awsdns-64.com.",
    "ns-2049.awsdns-65.net.",
    "ns-2050.awsdns-66.org.",
    "ns-2051.awsdns-67.co.uk.",
];

fn default_name_servers() -> Vec<ConfigName> {
    DEFAULT_NAME_SERVERS
        .iter()
        .filter_map(|n| n.parse().ok())
        .map(ConfigName)
        .collect()
}

fn default_max_batch_resource_records() -> usize {
    1000
}

fn default_max_items() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_seed: None,
            name_servers: default_name_servers(),
            max_batch_resource_records: default_max_batch_resource_records(),
            default_max_items: default_max_items(),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// WRAPPERS OVER LIBRARY TYPES FOR SERDE                              //
////////////////////////////////////////////////////////////////////////

/// Generates a deserializable `ConfigX` structure wrapping an `X` type,
/// using its [`FromStr`](std::str::FromStr) implementation.
macro_rules! make_serde_wrapper {
    ($wrapper:ident, $over:ty, $description:literal) => {
        /// A macro-generated deserializable wrapper over a library
        /// type.
        #[derive(Clone, Debug)]
        pub struct $wrapper(pub $over);

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                deserializer.deserialize_str(paste! { [<$wrapper Visitor>] })
            }
        }

        paste! {
            /// A macro-generated [`Visitor`](de::Visitor).
            #[derive(Debug)]
            struct [<$wrapper Visitor>];
        }

        impl<'de> de::Visitor<'de> for paste! { [<$wrapper Visitor>] } {
            type Value = $wrapper;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str($description)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map($wrapper)
                    .map_err(|e| E::custom(format!("invalid {}: {}", $description, e)))
            }
        }
    };
}

make_serde_wrapper!(ConfigName, Name, "domain name");

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
