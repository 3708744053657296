/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Request body serializers.
//!
//! A serializer turns an operation's input shape into a [`BodyProgram`]: the body of the
//! generated `request_body` function, kept as a structured program so it can be rendered
//! to source and also run against a hydrated [`Dto`].

pub mod query;

use crate::code::Block;
use crate::error::CodegenError;
use crate::model::{Member, Operation, Shape};
use bytes::Bytes;
use shapegen_types::{Dto, InvalidArgument};

pub trait BodyProgram {
    /// Statements of `fn request_body(input: &Input) -> bytes::Bytes`.
    fn render(&self) -> Block;

    /// Builds the body for `input`.
    fn serialize(&self, input: &Dto) -> Result<Bytes, InvalidArgument>;
}

/// Protocol specific body generation.
pub trait RequestSerializer {
    type Program: BodyProgram;

    fn content_type(&self) -> &'static str;

    /// The whole body is the value of one member, or empty when it is absent.
    fn generate_for_member(&self, member: &Member, payload_property: &str) -> Self::Program;

    /// The body is built from every body-bound member of `shape`, the input of `operation`.
    fn generate_for_shape(
        &self,
        operation: &Operation,
        shape: &Shape,
    ) -> Result<Self::Program, CodegenError>;
}
