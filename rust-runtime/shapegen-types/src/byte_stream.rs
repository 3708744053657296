/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::Blob;
use bytes::{Buf, Bytes};
use std::io::Read;

/// Readable body of a streaming payload member.
///
/// Generated accessors hand out a `ByteStream` instead of `Option`; a member that
/// was never set reads as an empty stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteStream {
    inner: Bytes,
}

impl ByteStream {
    pub fn new(inner: Bytes) -> Self {
        ByteStream { inner }
    }

    pub fn into_bytes(self) -> Bytes {
        self.inner
    }

    pub fn reader(self) -> impl Read {
        self.inner.reader()
    }
}

impl AsRef<[u8]> for ByteStream {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Blob> for ByteStream {
    fn from(blob: Blob) -> Self {
        ByteStream::new(Bytes::from(blob.into_inner()))
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(bytes: Vec<u8>) -> Self {
        ByteStream::new(Bytes::from(bytes))
    }
}
