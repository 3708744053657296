/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Failure while loading a service definition.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid service definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shape `{shape}` has unknown type `{shape_type}`")]
    UnknownShapeType { shape: String, shape_type: String },
    #[error("member `{member}` of `{shape}` has unknown location `{location}`")]
    UnknownLocation {
        shape: String,
        member: String,
        location: String,
    },
    #[error("`{owner}` is missing required field `{field}`")]
    MissingField { owner: String, field: &'static str },
}

/// Fatal error aborting generation of the current unit.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("shape `{0}` is not defined in the model")]
    UnresolvedShape(String),
    #[error("shape `{0}` is not a structure")]
    NotAStructure(String),
    #[error("complex maps are not supported: map `{map}` has `{key_type}` keys")]
    ComplexMapKey { map: String, key_type: String },
    #[error("type {scalar} is not yet implemented (shape `{shape}`)")]
    UnsupportedScalar { shape: String, scalar: String },
    #[error("operation `{0}` is not defined in the model")]
    UnknownOperation(String),
    #[error("protocol `{0}` is not supported")]
    UnsupportedProtocol(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}
