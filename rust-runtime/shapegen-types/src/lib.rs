/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Value types shared by the generator and the DTOs it emits.
//!
//! [`Value`] is the discriminated, untyped input that a DTO is hydrated from. A
//! hydrated instance is a [`Dto`]. [`RawInput`] wraps the keyed bag during hydration
//! and enforces the per-member collection and null defaults.

mod byte_stream;
mod convert;
mod error;
mod raw;
mod value;

pub use crate::byte_stream::ByteStream;
pub use crate::convert::{FromValue, Input};
pub use crate::error::InvalidArgument;
pub use crate::raw::RawInput;
pub use crate::value::{Dto, Value};

pub use indexmap::IndexMap;
pub use time::OffsetDateTime;

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Blob {
    inner: Vec<u8>,
}

impl Blob {
    pub fn new<T: Into<Vec<u8>>>(inp: T) -> Self {
        Blob { inner: inp.into() }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<&str> for Blob {
    fn from(value: &str) -> Self {
        Blob::new(value.as_bytes())
    }
}

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Blob::new(value)
    }
}
