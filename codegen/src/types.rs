/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Mapping from model members to Rust types.

use crate::error::CodegenError;
use crate::model::{Member, ScalarType, ShapeKind, ShapeModel};
use crate::naming::{NamespaceRegistry, TypeName};

/// The Rust spellings of a member's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Type handed out by the accessor, e.g. `&[crate::model::Tag]`.
    pub return_type: String,
    /// Owned type the member is stored and accepted as, e.g. `Vec<crate::model::Tag>`.
    pub parameter_type: String,
    /// Innermost generated type, if any.
    pub named_type: Option<TypeName>,
}

impl ResolvedType {
    fn owned(rust_type: &str) -> Self {
        ResolvedType {
            return_type: rust_type.to_string(),
            parameter_type: rust_type.to_string(),
            named_type: None,
        }
    }

    fn borrowed(rust_type: &str, borrowed: &str) -> Self {
        ResolvedType {
            return_type: borrowed.to_string(),
            parameter_type: rust_type.to_string(),
            named_type: None,
        }
    }

    fn named(name: TypeName) -> Self {
        ResolvedType {
            return_type: format!("&{}", name.fqdn()),
            parameter_type: name.fqdn(),
            named_type: Some(name),
        }
    }
}

/// Resolves the type of a member. Must not generate anything itself.
pub trait TypeResolver {
    fn resolve(&self, model: &ShapeModel, member: &Member) -> Result<ResolvedType, CodegenError>;
}

#[derive(Debug, Clone, Default)]
pub struct RustTypeResolver {
    namespaces: NamespaceRegistry,
}

impl RustTypeResolver {
    pub fn new(namespaces: NamespaceRegistry) -> Self {
        RustTypeResolver { namespaces }
    }
}

impl TypeResolver for RustTypeResolver {
    fn resolve(&self, model: &ShapeModel, member: &Member) -> Result<ResolvedType, CodegenError> {
        let shape = model.resolve(member)?;
        let resolved = match shape.kind() {
            ShapeKind::Structure(_) => ResolvedType::named(self.namespaces.object(shape.name())),
            ShapeKind::List(list) => {
                let inner = self.resolve(model, list.member())?;
                ResolvedType {
                    return_type: format!("&[{}]", inner.parameter_type),
                    parameter_type: format!("Vec<{}>", inner.parameter_type),
                    named_type: inner.named_type,
                }
            }
            ShapeKind::Map(map) => {
                let key = model.resolve(map.key())?;
                if key.as_scalar() != Some(ScalarType::String) {
                    return Err(CodegenError::ComplexMapKey {
                        map: shape.name().to_string(),
                        key_type: key.name().to_string(),
                    });
                }
                let inner = self.resolve(model, map.value())?;
                let map_type = format!("shapegen_types::IndexMap<String, {}>", inner.parameter_type);
                ResolvedType {
                    return_type: format!("&{}", map_type),
                    parameter_type: map_type,
                    named_type: inner.named_type,
                }
            }
            ShapeKind::Scalar(ScalarType::String) => match shape.enum_values() {
                Some(_) => ResolvedType::named(self.namespaces.enumeration(shape.name())),
                None => ResolvedType::borrowed("String", "&str"),
            },
            ShapeKind::Scalar(ScalarType::Integer) => ResolvedType::owned("i32"),
            ShapeKind::Scalar(ScalarType::Long) => ResolvedType::owned("i64"),
            ShapeKind::Scalar(ScalarType::Float) => ResolvedType::owned("f32"),
            ShapeKind::Scalar(ScalarType::Double) => ResolvedType::owned("f64"),
            ShapeKind::Scalar(ScalarType::Boolean) => ResolvedType::owned("bool"),
            ShapeKind::Scalar(ScalarType::Timestamp) => {
                ResolvedType::owned("shapegen_types::OffsetDateTime")
            }
            ShapeKind::Scalar(ScalarType::Blob) if member.is_streaming() => {
                ResolvedType::owned("shapegen_types::ByteStream")
            }
            ShapeKind::Scalar(ScalarType::Blob) => {
                ResolvedType::borrowed("shapegen_types::Blob", "&shapegen_types::Blob")
            }
        };
        Ok(resolved)
    }
}

#[cfg(test)]
mod test {
    use super::{RustTypeResolver, TypeResolver};
    use crate::error::CodegenError;
    use crate::model::ShapeModel;
    use crate::naming::TypeName;
    use serde_json::json;

    fn model() -> ShapeModel {
        ShapeModel::from_value(json!({
            "metadata": { "apiVersion": "1", "protocol": "query" },
            "shapes": {
                "Input": {
                    "type": "structure",
                    "members": {
                        "Name": { "shape": "String" },
                        "Count": { "shape": "Integer" },
                        "Status": { "shape": "Status" },
                        "Tags": { "shape": "TagList" },
                        "Attributes": { "shape": "AttributeMap" },
                        "Body": { "shape": "Stream" },
                        "Broken": { "shape": "BrokenMap" }
                    }
                },
                "Tag": { "type": "structure", "members": {} },
                "TagList": { "type": "list", "member": { "shape": "Tag" } },
                "AttributeMap": { "type": "map", "key": { "shape": "String" }, "value": { "shape": "Status" } },
                "BrokenMap": { "type": "map", "key": { "shape": "Integer" }, "value": { "shape": "String" } },
                "Status": { "type": "string", "enum": ["Enabled", "Disabled"] },
                "Stream": { "type": "blob", "streaming": true },
                "String": { "type": "string" },
                "Integer": { "type": "integer" }
            }
        }))
        .unwrap()
    }

    fn resolve(member: &str) -> Result<super::ResolvedType, CodegenError> {
        let model = model();
        let input = model.shape("Input").unwrap().as_structure().unwrap();
        RustTypeResolver::default().resolve(&model, input.member(member).unwrap())
    }

    #[test]
    fn scalars() {
        let name = resolve("Name").unwrap();
        assert_eq!(name.parameter_type, "String");
        assert_eq!(name.return_type, "&str");
        assert_eq!(resolve("Count").unwrap().return_type, "i32");
        assert_eq!(resolve("Body").unwrap().return_type, "shapegen_types::ByteStream");
    }

    #[test]
    fn named_types_are_namespaced() {
        let status = resolve("Status").unwrap();
        assert_eq!(status.parameter_type, "crate::types::Status");
        assert_eq!(status.named_type, Some(TypeName::new("crate::types", "Status")));

        let tags = resolve("Tags").unwrap();
        assert_eq!(tags.parameter_type, "Vec<crate::model::Tag>");
        assert_eq!(tags.return_type, "&[crate::model::Tag]");
        assert_eq!(tags.named_type, Some(TypeName::new("crate::model", "Tag")));

        assert_eq!(
            resolve("Attributes").unwrap().parameter_type,
            "shapegen_types::IndexMap<String, crate::types::Status>"
        );
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        let err = resolve("Broken").unwrap_err();
        assert_eq!(
            err.to_string(),
            "complex maps are not supported: map `BrokenMap` has `Integer` keys"
        );
    }
}
