// Copyright 2021 Matthew Ingwersen.
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

//! Crate-private utilities.

/// Looks up `text` among the mnemonics of `table`, ignoring ASCII case,
/// and returns the associated value.
pub fn lookup_mnemonic<T: Copy>(table: &[(&str, T)], text: &str) -> Option<T> {
    table
        .iter()
        .find(|(mnemonic, _)| mnemonic.eq_ignore_ascii_case(text))
        .map(|(_, value)| *value)
}

/// Returns the mnemonic that `table` associates with `value`.
pub fn mnemonic_of<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    table
        .iter()
        .find(|(_, v)| *v == value)
        .map_or("?", |(mnemonic, _)| mnemonic)
}

/// Strips `prefix` from the start of `s`, if present. Resource ids are
/// reported with a path-like prefix (e.g. `/hostedzone/`), but callers
/// may pass them back either with or without it.
pub fn strip_id_prefix<'a>(s: &'a str, prefix: &str) -> &'a str {
    s.strip_prefix(prefix).unwrap_or(s)
}
