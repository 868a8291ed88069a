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

//! Generation of opaque resource identifiers.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// The characters that make up the random part of zone and change ids.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The length of the random part of zone and change ids.
const RANDOM_PART_LEN: usize = 13;

/// A source of unique, opaque ids for hosted zones, change requests,
/// and health checks.
///
/// Ids are drawn from a pseudo-random generator. When the generator is
/// created with a seed (see [`IdGenerator::with_seed`]), the sequence
/// of ids it produces is reproducible, and [`IdGenerator::reset`]
/// rewinds it to the beginning.
pub struct IdGenerator {
    seed: Option<u64>,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Creates a new generator seeded from the operating system's
    /// entropy source.
    pub fn new() -> Self {
        Self {
            seed: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a new generator whose ids are determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates a generator from an optional seed.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Restarts a seeded generator's sequence, or reseeds an unseeded
    /// generator from the operating system.
    pub fn reset(&self) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        *self.rng.lock().unwrap() = rng;
    }

    /// Returns a new hosted zone id: `Z` followed by 13 uppercase
    /// alphanumeric characters.
    pub fn zone_id(&self) -> String {
        self.prefixed('Z')
    }

    /// Returns a new change id: `C` followed by 13 uppercase
    /// alphanumeric characters.
    pub fn change_id(&self) -> String {
        self.prefixed('C')
    }

    /// Returns a new health check id, formatted as a (version 4) UUID.
    pub fn health_check_id(&self) -> String {
        let bytes: [u8; 16] = self.rng.lock().unwrap().gen();
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    fn prefixed(&self, prefix: char) -> String {
        let mut rng = self.rng.lock().unwrap();
        let mut id = String::with_capacity(RANDOM_PART_LEN + 1);
        id.push(prefix);
        for _ in 0..RANDOM_PART_LEN {
            id.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
        }
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
