/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Read-only description of a service: its operations and the shape graph they reference.
//!
//! Members refer to shapes by name. The graph may be shared and may be cyclic, so
//! references are resolved through [`ShapeModel::resolve`] rather than owned.

mod raw;

use crate::error::{CodegenError, ModelError};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Timestamp,
    Blob,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Long => "long",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Boolean => "boolean",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Blob => "blob",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport location of a member. Located members are serialized outside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Header,
    Headers,
    Uri,
    QueryString,
}

/// A named edge from a structure, list or map to a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: String,
    shape: String,
    required: bool,
    location: Option<Location>,
    location_name: Option<String>,
    query_name: Option<String>,
    flattened: bool,
    streaming: bool,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the shape this member points to.
    pub fn shape_name(&self) -> &str {
        &self.shape
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn query_name(&self) -> Option<&str> {
        self.query_name.as_deref()
    }

    pub fn is_flattened(&self) -> bool {
        self.flattened
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureShape {
    members: Vec<Member>,
    payload: Option<String>,
}

impl StructureShape {
    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// The member holding the whole request body, when the structure declares one.
    pub fn payload(&self) -> Option<&Member> {
        self.payload.as_deref().and_then(|name| self.member(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListShape {
    member: Member,
}

impl ListShape {
    pub fn member(&self) -> &Member {
        &self.member
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapShape {
    key: Member,
    value: Member,
}

impl MapShape {
    pub fn key(&self) -> &Member {
        &self.key
    }

    pub fn value(&self) -> &Member {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Scalar(ScalarType),
    Structure(StructureShape),
    List(ListShape),
    Map(MapShape),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    name: String,
    kind: ShapeKind,
    flattened: bool,
    enum_values: Vec<String>,
    streaming: bool,
    documentation: Option<String>,
}

impl Shape {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn as_structure(&self) -> Option<&StructureShape> {
        match &self.kind {
            ShapeKind::Structure(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListShape> {
        match &self.kind {
            ShapeKind::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapShape> {
        match &self.kind {
            ShapeKind::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<ScalarType> {
        match &self.kind {
            ShapeKind::Scalar(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, ShapeKind::List(_) | ShapeKind::Map(_))
    }

    pub fn is_flattened(&self) -> bool {
        self.flattened
    }

    /// The closed set of allowed values, when the shape is an enumeration.
    pub fn enum_values(&self) -> Option<&[String]> {
        if self.enum_values.is_empty() {
            None
        } else {
            Some(&self.enum_values)
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    api_version: String,
    input: String,
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Name of the input structure shape.
    pub fn input_shape(&self) -> &str {
        &self.input
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    api_version: String,
    protocol: String,
    service_id: Option<String>,
}

impl Metadata {
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }
}

/// A loaded service definition.
///
/// Shape names are assumed unique within one model; everything keyed by shape name
/// (notably the object generator's memo table) relies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeModel {
    metadata: Metadata,
    operations: IndexMap<String, Operation>,
    shapes: IndexMap<String, Shape>,
}

impl ShapeModel {
    /// Parses a service definition in the AWS JSON format.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let raw: raw::RawModel = serde_json::from_str(json)?;
        raw.into_model()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        let raw: raw::RawModel = serde_json::from_value(value)?;
        raw.into_model()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// The shape a member points to.
    pub fn resolve(&self, member: &Member) -> Result<&Shape, CodegenError> {
        self.shape(&member.shape)
            .ok_or_else(|| CodegenError::UnresolvedShape(member.shape.clone()))
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Operations in definition order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }
}
