/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! AWSQuery protocol runtime.
//!
//! A query request body is an ordered set of dot-path keys and string values,
//! form encoded and joined with `&`. Generated serializers fill a [`QueryPayload`]
//! using the leaf formatters in this crate and then call [`QueryPayload::into_body`].

use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Characters left untouched by form encoding (RFC 1738 style): alphanumerics plus `-`, `_` and `.`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Form-encode a key or a value. Spaces become `+`.
pub fn fmt_string<T: AsRef<str>>(t: T) -> String {
    // A literal "%20" in the input is escaped to "%2520", so every "%20" here came from a space.
    utf8_percent_encode(t.as_ref(), FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

pub fn fmt_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn fmt_integer(value: i64) -> String {
    value.to_string()
}

/// Standard base64 of the bytes.
pub fn fmt_blob(value: impl AsRef<[u8]>) -> String {
    base64_simd::STANDARD.encode_to_string(value.as_ref())
}

/// `[year]-[month]-[day]T[hour]:[minute]:[second]±[hh]:[mm]`; the year keeps its full
/// width and sign.
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year repr:full sign:automatic]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

/// ISO-8601 date-time with a numeric offset, e.g. `2005-08-15T15:52:01+00:00`.
pub fn fmt_timestamp(value: &OffsetDateTime) -> String {
    // every component of the description is present on an `OffsetDateTime`
    value
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|err| err.to_string())
}

/// Ordered key/value mapping of a query request body.
///
/// Inserting an existing key replaces its value in place, so the key keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPayload {
    entries: IndexMap<String, String>,
}

impl QueryPayload {
    /// Creates a payload seeded with the `Action` and `Version` entries.
    pub fn new(action: impl Into<String>, version: impl Into<String>) -> Self {
        let mut payload = QueryPayload::default();
        payload.insert("Action", action);
        payload.insert("Version", version);
        payload
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the payload as `key1=val1&key2=val2`, in insertion order.
    pub fn into_body(self) -> String {
        let mut body = String::new();
        for (key, value) in &self.entries {
            if !body.is_empty() {
                body.push('&');
            }
            body.push_str(&fmt_string(key));
            body.push('=');
            body.push_str(&fmt_string(value));
        }
        body
    }
}
