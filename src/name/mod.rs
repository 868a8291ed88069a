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

//! Implementation of data structures related to domain names.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::str::FromStr;

use arrayvec::ArrayVec;

mod error;
pub use error::Error;

/// The maximum number of labels in a domain name, not counting the
/// root label.
const MAX_N_LABELS: usize = 127;

/// The maximum length of the textual representation of a domain name,
/// including the trailing dot.
const MAX_TEXT_LEN: usize = 255;

/// The maximum length of a label in a domain name.
const MAX_LABEL_LEN: usize = 63;

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A fully-qualified domain name, as used for hosted zones and record
/// sets.
///
/// A `Name` is stored in its textual (presentation) form, always with
/// exactly one trailing dot. Names are accepted with or without the
/// trailing dot through the [`FromStr`] implementation; either way,
/// the result is absolute. Escape sequences are decoded and the text
/// is rewritten in a canonical form: only periods, backslashes, and
/// non-printable octets stay escaped, so `\065.db.` becomes `A.db.`.
/// An escaped period (`\.`) does not end a label.
///
/// Along with the text, the offset at which each label begins is
/// recorded, so that labels can be iterated in either direction
/// without re-scanning the text.
///
/// In accordance with [RFC 1034 § 3.1] (clarified by [RFC 4343]):
///
/// * comparisons between `Name`s are case-insensitive assuming ASCII,
///   but
/// * case is preserved in the internal representation.
///
/// [RFC 1034 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1034#section-3.1
/// [RFC 4343]: https://datatracker.ietf.org/doc/html/rfc4343
#[derive(Clone)]
pub struct Name {
    text: Box<str>,
    label_starts: ArrayVec<u8, MAX_N_LABELS>,
}

impl Name {
    /// Returns the `Name` of the DNS root, `.`.
    pub fn root() -> Self {
        Self {
            text: ".".into(),
            label_starts: ArrayVec::new(),
        }
    }

    /// Returns the textual representation of the `Name`, which always
    /// ends in a dot.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns whether this `Name` is equal to or a subdomain of
    /// `other`.
    pub fn eq_or_subdomain_of(&self, other: &Name) -> bool {
        self.len() >= other.len()
            && self
                .labels()
                .rev()
                .zip(other.labels().rev())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns whether the `Name` is the DNS root `.`.
    pub fn is_root(&self) -> bool {
        self.label_starts.is_empty()
    }

    /// Returns an iterator over the labels in this `Name`, from left
    /// to right. The (empty) root label is not produced.
    pub fn labels(&self) -> Labels<'_> {
        Labels::new(self)
    }

    /// Returns the number of labels in this `Name`, not counting the
    /// root label.
    pub fn len(&self) -> usize {
        self.label_starts.len()
    }

    /// Returns the `n`-th label of the name, or `None` if there are not
    /// enough labels.
    fn label(&self, n: usize) -> Option<&str> {
        let start = *self.label_starts.get(n)? as usize;
        let end = self
            .label_starts
            .get(n + 1)
            .map_or(self.text.len(), |next| *next as usize)
            - 1;
        Some(&self.text[start..end])
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::StrEmpty);
        } else if s == "." {
            return Ok(Self::root());
        } else if !s.is_ascii() {
            return Err(Error::StrNotAscii);
        }

        let mut text = String::with_capacity(s.len() + 1);
        let mut label_starts = ArrayVec::new();
        let mut label_start = 0;
        let mut label_len = 0;
        let mut octets = s.bytes();
        while let Some(octet) = octets.next() {
            match octet {
                b'.' => {
                    end_label(&mut text, &mut label_starts, label_start, label_len)?;
                    label_start = text.len();
                    label_len = 0;
                }
                b'\\' => {
                    push_octet(&mut text, parse_escape(&mut octets)?);
                    label_len += 1;
                }
                _ => {
                    text.push(octet as char);
                    label_len += 1;
                }
            }
        }
        if label_len > 0 {
            // The trailing dot was omitted.
            end_label(&mut text, &mut label_starts, label_start, label_len)?;
        }

        Ok(Self {
            text: text.into_boxed_str(),
            label_starts,
        })
    }
}

/// Terminates the label of `label_len` octets that begins at offset
/// `label_start` of `text`.
fn end_label(
    text: &mut String,
    label_starts: &mut ArrayVec<u8, MAX_N_LABELS>,
    label_start: usize,
    label_len: usize,
) -> Result<(), Error> {
    if label_len == 0 {
        return Err(Error::NullNonTerminal);
    } else if label_len > MAX_LABEL_LEN {
        return Err(Error::LabelTooLong);
    }
    text.push('.');
    if text.len() > MAX_TEXT_LEN {
        return Err(Error::NameTooLong);
    }
    // NOTE: text is at most 255 octets long, so every offset fits in a
    // u8.
    label_starts
        .try_push(label_start as u8)
        .or(Err(Error::NameTooLong))
}

/// Parses an escape sequence (see [RFC 1035 § 5.1] and [RFC 4343 §
/// 2.1]) after the leading `\` has been consumed.
///
/// [RFC 1035 § 5.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-5.1
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
fn parse_escape(octets: &mut std::str::Bytes<'_>) -> Result<u8, Error> {
    let first = octets.next().ok_or(Error::InvalidEscape)?;
    if !first.is_ascii_digit() {
        return Ok(first);
    }
    let mut value = (first - b'0') as usize;
    for _ in 0..2 {
        match octets.next() {
            Some(digit) if digit.is_ascii_digit() => value = 10 * value + (digit - b'0') as usize,
            _ => return Err(Error::InvalidEscape),
        }
    }
    value.try_into().or(Err(Error::InvalidEscape))
}

/// Appends `octet` to `text` in canonical presentation form: periods
/// and backslashes are escaped with a backslash, other printable ASCII
/// is written literally, and everything else is written as a
/// three-digit decimal escape.
fn push_octet(text: &mut String, octet: u8) {
    if octet == b'.' || octet == b'\\' {
        text.push('\\');
        text.push(octet as char);
    } else if octet.is_ascii_graphic() {
        text.push(octet as char);
    } else {
        text.push('\\');
        for digit in [octet / 100, octet / 10 % 10, octet % 10] {
            text.push((b'0' + digit) as char);
        }
    }
}

/// Iterates over the octets of a label in canonical presentation form,
/// decoding its escape sequences.
fn label_octets(label: &str) -> impl Iterator<Item = u8> + '_ {
    let mut bytes = label.bytes();
    std::iter::from_fn(move || {
        let octet = bytes.next()?;
        if octet != b'\\' {
            return Some(octet);
        }
        let first = bytes.next()?;
        if !first.is_ascii_digit() {
            return Some(first);
        }
        let digits = [first, bytes.next()?, bytes.next()?];
        Some(
            digits
                .iter()
                .fold(0u8, |value, digit| value.wrapping_mul(10).wrapping_add(digit - b'0')),
        )
    })
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.text.eq_ignore_ascii_case(&other.text)
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The [`Ord`] implementation for `Name` employs DNSSEC's canonical
/// ordering of domain names. Per [RFC 4034 § 6.1], `Name`s are ordered
/// as strings of labels read from right to left, and labels are
/// ordered as case-insensitive octet strings.
///
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.labels()
            .rev()
            .zip(other.labels().rev())
            .find_map(|(a, b)| Some(cmp_labels(a, b)).filter(|ordering| ordering.is_ne()))
            .unwrap_or_else(|| self.len().cmp(&other.len()))
    }
}

/// Compares two labels as unsigned left-justified octet strings, with
/// uppercase ASCII letters treated as if they were lowercase.
fn cmp_labels(a: &str, b: &str) -> Ordering {
    label_octets(a)
        .map(|octet| octet.to_ascii_lowercase())
        .cmp(label_octets(b).map(|octet| octet.to_ascii_lowercase()))
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // We have to hash in a case-insensitive manner to match our
        // implementations of [`PartialEq`] and [`Eq`].
        for octet in self.text.bytes().map(|octet| octet.to_ascii_lowercase()) {
            state.write_u8(octet);
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ITERATION OVER A NAME'S LABELS                                     //
////////////////////////////////////////////////////////////////////////

/// An iterator over the labels in a [`Name`].
///
/// To use this iterator, construct one from a [`Name`] using
/// [`Name::labels`].
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    name: &'a Name,
    front: usize,
    back: usize,
}

impl Labels<'_> {
    fn new(name: &Name) -> Labels<'_> {
        Labels {
            name,
            front: 0,
            back: name.len(),
        }
    }
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let this_one = self.front;
            self.front += 1;
            self.name.label(this_one)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Labels<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back > self.front {
            self.back -= 1;
            self.name.label(self.back)
        } else {
            None
        }
    }
}

impl ExactSizeIterator for Labels<'_> {}

impl FusedIterator for Labels<'_> {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
