/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! AWSQuery request bodies.
//!
//! Members are flattened into dot separated keys: `Name`, `Destination.ToAddresses.member.1`,
//! `Tags.entry.1.key`. Lists and maps count their elements from 1. Members bound to a
//! header, uri or querystring location never appear in the body.

mod program;

pub use program::{
    Base, Expr, Helper, Ident, Idents, KeyPath, Leaf, QueryProgram, Segment, Stmt,
};

use crate::error::CodegenError;
use crate::model::{Member, Operation, ScalarType, Shape, ShapeKind, ShapeModel, StructureShape};
use crate::naming::{field_name, snake_case, NamespaceRegistry};
use crate::serializer::RequestSerializer;
use indexmap::IndexMap;
use tracing::debug;

pub struct QuerySerializer<'m> {
    model: &'m ShapeModel,
    namespaces: NamespaceRegistry,
}

/// State of lowering one operation input.
#[derive(Debug, Default)]
struct Lowering {
    idents: Idents,
    /// Structures whose members are being inlined, outermost first.
    open: Vec<String>,
    /// Helpers by shape name; `None` while the helper's own body is lowered.
    helpers: IndexMap<String, Option<Helper>>,
}

impl<'m> QuerySerializer<'m> {
    pub fn new(model: &'m ShapeModel, namespaces: NamespaceRegistry) -> Self {
        QuerySerializer { model, namespaces }
    }

    /// Flattens `value`, of type `shape` and reached through `member`, under `key`.
    fn dump(
        &self,
        cx: &mut Lowering,
        key: KeyPath,
        value: Expr,
        member: &Member,
        shape: &Shape,
    ) -> Result<Vec<Stmt>, CodegenError> {
        match shape.kind() {
            ShapeKind::Structure(structure) => {
                let base = match value {
                    Expr::Var(ident) => ident,
                    field => {
                        return guarded(cx, field, |cx, var| {
                            self.dump(cx, key, var, member, shape)
                        })
                    }
                };
                if cx.open.iter().any(|open| open == shape.name()) {
                    let helper = self.helper(cx, shape, structure)?;
                    return Ok(vec![Stmt::Call {
                        helper,
                        key,
                        value: Expr::Var(base),
                    }]);
                }
                cx.open.push(shape.name().to_string());
                let statements = self.members(cx, &key, &base, structure);
                cx.open.pop();
                statements
            }
            ShapeKind::List(list) => {
                let element_member = list.member();
                let element = self.model.resolve(element_member)?;
                let index = cx.idents.index();
                let item = cx.idents.value();
                let item_key = if member.is_flattened() || shape.is_flattened() {
                    key.index(&index)
                } else {
                    key.child(element_name(element_member, "member")).index(&index)
                };
                let body = self.dump(
                    cx,
                    item_key,
                    Expr::Var(item.clone()),
                    element_member,
                    element,
                )?;
                Ok(vec![Stmt::ForEachList {
                    index,
                    item,
                    list: value,
                    body,
                }])
            }
            ShapeKind::Map(map) => {
                let key_shape = self.model.resolve(map.key())?;
                if key_shape.as_scalar() != Some(ScalarType::String) {
                    return Err(CodegenError::ComplexMapKey {
                        map: shape.name().to_string(),
                        key_type: key_shape.name().to_string(),
                    });
                }
                let value_shape = self.model.resolve(map.value())?;
                let index = cx.idents.index();
                let entry_key = cx.idents.key();
                let entry_value = cx.idents.value();
                let entry = if member.is_flattened() || shape.is_flattened() {
                    key.index(&index)
                } else {
                    key.child("entry").index(&index)
                };
                let mut body = vec![Stmt::Assign {
                    key: entry.child(element_name(map.key(), "key")),
                    value: Expr::Var(entry_key.clone()),
                    leaf: Leaf::String,
                }];
                body.extend(self.dump(
                    cx,
                    entry.child(element_name(map.value(), "value")),
                    Expr::Var(entry_value.clone()),
                    map.value(),
                    value_shape,
                )?);
                Ok(vec![Stmt::ForEachMap {
                    index,
                    key: entry_key,
                    value: entry_value,
                    map: value,
                    body,
                }])
            }
            ShapeKind::Scalar(scalar) => {
                let leaf = match scalar {
                    ScalarType::String => Leaf::String,
                    ScalarType::Integer => Leaf::Integer,
                    ScalarType::Boolean => Leaf::Boolean,
                    ScalarType::Timestamp => Leaf::Timestamp,
                    ScalarType::Blob => Leaf::Blob { fallback: false },
                    other => {
                        return Err(CodegenError::UnsupportedScalar {
                            shape: shape.name().to_string(),
                            scalar: other.to_string(),
                        })
                    }
                };
                let required_blob = matches!(leaf, Leaf::Blob { .. }) && member.is_required();
                match value {
                    field @ Expr::Field { .. } if required_blob => Ok(vec![Stmt::Assign {
                        key,
                        value: field,
                        leaf: Leaf::Blob { fallback: true },
                    }]),
                    field @ Expr::Field { .. } => guarded(cx, field, |_, var| {
                        Ok(vec![Stmt::Assign {
                            key,
                            value: var,
                            leaf,
                        }])
                    }),
                    var => Ok(vec![Stmt::Assign {
                        key,
                        value: var,
                        leaf,
                    }]),
                }
            }
        }
    }

    /// Every member of the structure bound to `base`, under `key`.
    fn members(
        &self,
        cx: &mut Lowering,
        key: &KeyPath,
        base: &Ident,
        structure: &StructureShape,
    ) -> Result<Vec<Stmt>, CodegenError> {
        let mut statements = Vec::new();
        for child in structure.members() {
            let target = self.model.resolve(child)?;
            let field = Expr::Field {
                base: Base::Var(base.clone()),
                member: child.name().to_string(),
                field: field_name(child.name()),
            };
            let child_key = key.child(self.name(child)?);
            statements.extend(self.dump(cx, child_key, field, child, target)?);
        }
        Ok(statements)
    }

    /// Name of the helper serializing `shape`, lowered on first use.
    ///
    /// The helper body is lowered with only `shape` open, so a structure that reaches
    /// itself calls the helper instead of inlining its members again.
    fn helper(
        &self,
        cx: &mut Lowering,
        shape: &Shape,
        structure: &StructureShape,
    ) -> Result<String, CodegenError> {
        let name = format!("serialize_{}", snake_case(shape.name()));
        if cx.helpers.contains_key(shape.name()) {
            return Ok(name);
        }
        debug!(shape = shape.name(), helper = %name, "structure is recursive, serializing it through a helper");
        cx.helpers.insert(shape.name().to_string(), None);
        let param = cx.idents.value();
        let open = std::mem::replace(&mut cx.open, vec![shape.name().to_string()]);
        let body = self.members(cx, &KeyPath::prefixed(), &param, structure);
        cx.open = open;
        let helper = Helper {
            name: name.clone(),
            type_name: self.namespaces.object(shape.name()),
            param,
            body: body?,
        };
        cx.helpers.insert(shape.name().to_string(), Some(helper));
        Ok(name)
    }

    /// Key segment of a structure member: `queryName`, then `locationName`, then the
    /// element `locationName` of a flattened list, then the member name.
    fn name(&self, member: &Member) -> Result<String, CodegenError> {
        if let Some(name) = member.query_name().or_else(|| member.location_name()) {
            return Ok(name.to_string());
        }
        if member.is_flattened() {
            if let Some(list) = self.model.resolve(member)?.as_list() {
                if let Some(name) = list.member().location_name() {
                    return Ok(name.to_string());
                }
            }
        }
        Ok(member.name().to_string())
    }
}

/// Key segment of a list element or map entry part.
fn element_name<'a>(member: &'a Member, default: &'a str) -> &'a str {
    member
        .query_name()
        .or_else(|| member.location_name())
        .unwrap_or(default)
}

/// Runs `body` only when `value` is present, with the value bound to a fresh variable.
fn guarded(
    cx: &mut Lowering,
    value: Expr,
    body: impl FnOnce(&mut Lowering, Expr) -> Result<Vec<Stmt>, CodegenError>,
) -> Result<Vec<Stmt>, CodegenError> {
    let binding = cx.idents.value();
    let body = body(cx, Expr::Var(binding.clone()))?;
    Ok(vec![Stmt::IfPresent {
        binding,
        value,
        body,
    }])
}

impl<'m> RequestSerializer for QuerySerializer<'m> {
    type Program = QueryProgram;

    fn content_type(&self) -> &'static str {
        shapegen_query::CONTENT_TYPE
    }

    fn generate_for_member(&self, member: &Member, payload_property: &str) -> QueryProgram {
        QueryProgram::Payload {
            member: member.name().to_string(),
            field: payload_property.to_string(),
        }
    }

    fn generate_for_shape(
        &self,
        operation: &Operation,
        shape: &Shape,
    ) -> Result<QueryProgram, CodegenError> {
        let structure = shape
            .as_structure()
            .ok_or_else(|| CodegenError::NotAStructure(shape.name().to_string()))?;
        let mut cx = Lowering::default();
        cx.open.push(shape.name().to_string());
        let mut statements = Vec::new();
        for member in structure.members() {
            if let Some(location) = member.location() {
                debug!(
                    member = member.name(),
                    ?location,
                    "member is bound to a location, leaving it out of the body"
                );
                continue;
            }
            let target = self.model.resolve(member)?;
            let value = Expr::Field {
                base: Base::Input,
                member: member.name().to_string(),
                field: field_name(member.name()),
            };
            let key = KeyPath::new(self.name(member)?);
            statements.extend(self.dump(&mut cx, key, value, member, target)?);
        }
        Ok(QueryProgram::Body {
            action: operation.name().to_string(),
            version: operation.api_version().to_string(),
            statements,
            helpers: cx.helpers.into_values().flatten().collect(),
        })
    }
}
