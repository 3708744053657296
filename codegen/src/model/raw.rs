/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Serde view of the AWS JSON service definition.

use super::{
    ListShape, Location, MapShape, Member, Metadata, Operation, ScalarType, Shape, ShapeKind,
    ShapeModel, StructureShape,
};
use crate::error::ModelError;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RawModel {
    metadata: RawMetadata,
    #[serde(default)]
    operations: IndexMap<String, RawOperation>,
    #[serde(default)]
    shapes: IndexMap<String, RawShape>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    api_version: String,
    protocol: String,
    service_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOperation {
    name: Option<String>,
    input: Option<RawShapeRef>,
}

#[derive(Debug, Deserialize)]
struct RawShapeRef {
    shape: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShape {
    #[serde(rename = "type")]
    shape_type: String,
    #[serde(default)]
    members: IndexMap<String, RawMember>,
    #[serde(default)]
    required: Vec<String>,
    member: Option<RawMember>,
    key: Option<RawMember>,
    value: Option<RawMember>,
    payload: Option<String>,
    #[serde(default)]
    flattened: bool,
    #[serde(default, rename = "enum")]
    enum_values: Vec<String>,
    #[serde(default)]
    streaming: bool,
    documentation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    shape: String,
    location: Option<String>,
    location_name: Option<String>,
    query_name: Option<String>,
    #[serde(default)]
    flattened: bool,
    #[serde(default)]
    streaming: bool,
}

impl RawModel {
    pub(super) fn into_model(self) -> Result<ShapeModel, ModelError> {
        let api_version = self.metadata.api_version;
        let mut shapes = IndexMap::with_capacity(self.shapes.len());
        for (name, raw) in &self.shapes {
            let shape = convert_shape(name, raw, &self.shapes)?;
            shapes.insert(name.clone(), shape);
        }
        let mut operations = IndexMap::with_capacity(self.operations.len());
        for (key, raw) in self.operations {
            let input = raw.input.ok_or_else(|| ModelError::MissingField {
                owner: key.clone(),
                field: "input",
            })?;
            let operation = Operation {
                name: raw.name.unwrap_or_else(|| key.clone()),
                api_version: api_version.clone(),
                input: input.shape,
            };
            operations.insert(key, operation);
        }
        Ok(ShapeModel {
            metadata: Metadata {
                api_version,
                protocol: self.metadata.protocol,
                service_id: self.metadata.service_id,
            },
            operations,
            shapes,
        })
    }
}

fn convert_shape(
    name: &str,
    raw: &RawShape,
    all: &IndexMap<String, RawShape>,
) -> Result<Shape, ModelError> {
    let member = |field: &'static str, raw_member: &Option<RawMember>| {
        raw_member
            .as_ref()
            .ok_or_else(|| ModelError::MissingField {
                owner: name.to_string(),
                field,
            })
            .and_then(|m| convert_member(name, field, m, false, all))
    };
    let kind = match raw.shape_type.as_str() {
        "structure" => ShapeKind::Structure(StructureShape {
            members: raw
                .members
                .iter()
                .map(|(member_name, m)| {
                    let required = raw.required.iter().any(|r| r == member_name);
                    convert_member(name, member_name, m, required, all)
                })
                .collect::<Result<_, _>>()?,
            payload: raw.payload.clone(),
        }),
        "list" => ShapeKind::List(ListShape {
            member: member("member", &raw.member)?,
        }),
        "map" => ShapeKind::Map(MapShape {
            key: member("key", &raw.key)?,
            value: member("value", &raw.value)?,
        }),
        "string" => ShapeKind::Scalar(ScalarType::String),
        "integer" => ShapeKind::Scalar(ScalarType::Integer),
        "long" => ShapeKind::Scalar(ScalarType::Long),
        "float" => ShapeKind::Scalar(ScalarType::Float),
        "double" => ShapeKind::Scalar(ScalarType::Double),
        "boolean" => ShapeKind::Scalar(ScalarType::Boolean),
        "timestamp" => ShapeKind::Scalar(ScalarType::Timestamp),
        "blob" => ShapeKind::Scalar(ScalarType::Blob),
        other => {
            return Err(ModelError::UnknownShapeType {
                shape: name.to_string(),
                shape_type: other.to_string(),
            })
        }
    };
    Ok(Shape {
        name: name.to_string(),
        kind,
        flattened: raw.flattened,
        enum_values: raw.enum_values.clone(),
        streaming: raw.streaming,
        documentation: raw.documentation.clone(),
    })
}

fn convert_member(
    owner: &str,
    name: &str,
    raw: &RawMember,
    required: bool,
    all: &IndexMap<String, RawShape>,
) -> Result<Member, ModelError> {
    let location = match raw.location.as_deref() {
        None | Some("body") => None,
        Some("header") => Some(Location::Header),
        Some("headers") => Some(Location::Headers),
        Some("uri") => Some(Location::Uri),
        Some("querystring") => Some(Location::QueryString),
        Some(other) => {
            return Err(ModelError::UnknownLocation {
                shape: owner.to_string(),
                member: name.to_string(),
                location: other.to_string(),
            })
        }
    };
    // Streaming is usually declared on the target blob shape rather than on the member.
    let target_streaming = all.get(&raw.shape).map(|s| s.streaming).unwrap_or(false);
    Ok(Member {
        name: name.to_string(),
        shape: raw.shape.clone(),
        required,
        location,
        location_name: raw.location_name.clone(),
        query_name: raw.query_name.clone(),
        flattened: raw.flattened,
        streaming: raw.streaming || target_streaming,
    })
}
