/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Realization of structure shapes as DTO types.
//!
//! [`ObjectGenerator::generate`] walks a structure shape, realizes the DTO types of every
//! nested structure it reaches, and hands one rendered unit per type to the output sink.
//! Each realized type is also recorded in a [`TypeTable`], which can hydrate and validate
//! instances of it without compiling the rendered source.

mod render;
mod table;

pub use table::TypeTable;

use crate::enums::{EnumGenerator, EnumRealizer};
use crate::error::CodegenError;
use crate::model::{Member, ScalarType, Shape, ShapeKind, ShapeModel};
use crate::naming::{field_name, NamespaceRegistry, TypeName};
use crate::settings::CodegenSettings;
use crate::sink::{OutputSink, OutputUnit};
use crate::types::{ResolvedType, RustTypeResolver, TypeResolver};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// How a member is hydrated from the raw keyed bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// Nested structure, built through its own factory. Absent is null.
    Structure(TypeName),
    /// List whose elements are hydrated by the inner rule. Absent is empty.
    List(Box<Hydration>),
    /// Map whose values are hydrated by the inner rule. Absent is empty.
    Map(Box<Hydration>),
    /// Scalar or streaming payload, passed through. Absent is null.
    Scalar(ScalarType),
}

impl Hydration {
    pub fn is_collection(&self) -> bool {
        matches!(self, Hydration::List(_) | Hydration::Map(_))
    }

    /// Rule of the innermost values, below every level of list and map.
    pub fn leaf(&self) -> &Hydration {
        match self {
            Hydration::List(inner) | Hydration::Map(inner) => inner.leaf(),
            other => other,
        }
    }
}

/// Enumeration a member's values must belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBinding {
    pub type_name: TypeName,
    pub values: Vec<String>,
}

impl EnumBinding {
    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// One member of a realized DTO type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Member name in the model, also the key in the raw bag.
    pub member: String,
    /// Rust field identifier.
    pub field: String,
    pub hydration: Hydration,
    /// Whether the accessor may return nothing.
    pub nullable: bool,
    pub required: bool,
    pub streaming: bool,
    pub enum_binding: Option<EnumBinding>,
    pub resolved: ResolvedType,
    /// Documentation of the target shape.
    pub documentation: Option<String>,
}

/// A realized DTO type: its fields in member order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoType {
    pub type_name: TypeName,
    pub documentation: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl DtoType {
    pub fn field(&self, member: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.member == member)
    }
}

/// Realizes DTO types for structure shapes, once per shape name per run.
pub struct ObjectGenerator<'m, S> {
    model: &'m ShapeModel,
    namespaces: NamespaceRegistry,
    resolver: Box<dyn TypeResolver>,
    enums: Box<dyn EnumRealizer>,
    generated: IndexMap<String, TypeName>,
    table: TypeTable,
    sink: S,
}

impl<'m, S: OutputSink> ObjectGenerator<'m, S> {
    pub fn new(model: &'m ShapeModel, settings: &CodegenSettings, sink: S) -> Self {
        let namespaces = NamespaceRegistry::new(settings);
        ObjectGenerator::with_collaborators(
            model,
            namespaces.clone(),
            Box::new(RustTypeResolver::new(namespaces.clone())),
            Box::new(EnumGenerator::new(namespaces)),
            sink,
        )
    }

    pub fn with_collaborators(
        model: &'m ShapeModel,
        namespaces: NamespaceRegistry,
        resolver: Box<dyn TypeResolver>,
        enums: Box<dyn EnumRealizer>,
        sink: S,
    ) -> Self {
        ObjectGenerator {
            model,
            namespaces,
            resolver,
            enums,
            generated: IndexMap::new(),
            table: TypeTable::default(),
            sink,
        }
    }

    /// Realizes the DTO type of `shape` and returns its name.
    ///
    /// A shape name that was already realized in this run returns the cached name
    /// without emitting anything. The name is registered before members are visited,
    /// so recursive shapes terminate.
    pub fn generate(&mut self, shape: &Shape) -> Result<TypeName, CodegenError> {
        let structure = shape
            .as_structure()
            .ok_or_else(|| CodegenError::NotAStructure(shape.name().to_string()))?;
        if let Some(type_name) = self.generated.get(shape.name()) {
            trace!(shape = shape.name(), "object already generated");
            return Ok(type_name.clone());
        }
        let type_name = self.namespaces.object(shape.name());
        self.generated
            .insert(shape.name().to_string(), type_name.clone());
        debug!(shape = shape.name(), members = structure.members().len(), "generating object");

        let fields = structure
            .members()
            .iter()
            .map(|member| self.field(member))
            .collect::<Result<Vec<_>, _>>();
        let fields = match fields {
            Ok(fields) => fields,
            Err(err) => {
                // a shape that failed is never reported as realized
                self.generated.shift_remove(shape.name());
                return Err(err);
            }
        };
        let dto = DtoType {
            type_name: type_name.clone(),
            documentation: shape.documentation().map(str::to_string),
            fields,
        };
        self.sink.persist(OutputUnit {
            type_name: type_name.clone(),
            source: render::render(&dto).render(),
        });
        self.table.insert(shape.name(), dto);
        Ok(type_name)
    }

    fn field(&mut self, member: &Member) -> Result<FieldDef, CodegenError> {
        let model = self.model;
        let target = model.resolve(member)?;
        let hydration = self.hydration(target)?;
        let enum_binding = match self.enum_shape(target)? {
            Some(shape) => Some(EnumBinding {
                type_name: self.enums.generate(shape, &mut self.sink),
                values: shape.enum_values().unwrap_or_default().to_vec(),
            }),
            None => None,
        };
        let streaming = member.is_streaming();
        Ok(FieldDef {
            member: member.name().to_string(),
            field: field_name(member.name()),
            nullable: !(member.is_required() || target.is_collection() || streaming),
            required: member.is_required(),
            streaming,
            enum_binding,
            resolved: self.resolver.resolve(model, member)?,
            documentation: target.documentation().map(str::to_string),
            hydration,
        })
    }

    /// Hydration rule of a value of type `shape`, realizing every structure it reaches.
    fn hydration(&mut self, shape: &'m Shape) -> Result<Hydration, CodegenError> {
        Ok(match shape.kind() {
            ShapeKind::Structure(_) => Hydration::Structure(self.generate(shape)?),
            ShapeKind::List(list) => {
                let element = self.model.resolve(list.member())?;
                Hydration::List(Box::new(self.hydration(element)?))
            }
            ShapeKind::Map(map) => {
                let key = self.model.resolve(map.key())?;
                if key.as_scalar() != Some(ScalarType::String) {
                    return Err(CodegenError::ComplexMapKey {
                        map: shape.name().to_string(),
                        key_type: key.name().to_string(),
                    });
                }
                let value = self.model.resolve(map.value())?;
                Hydration::Map(Box::new(self.hydration(value)?))
            }
            ShapeKind::Scalar(scalar) => Hydration::Scalar(*scalar),
        })
    }

    /// The enumeration constraining a member's values: its own shape, or the innermost
    /// element or value shape of nested collections.
    fn enum_shape(&self, target: &'m Shape) -> Result<Option<&'m Shape>, CodegenError> {
        match target.kind() {
            ShapeKind::Scalar(_) => Ok(target.enum_values().map(|_| target)),
            ShapeKind::List(list) => self.enum_shape(self.model.resolve(list.member())?),
            ShapeKind::Map(map) => self.enum_shape(self.model.resolve(map.value())?),
            ShapeKind::Structure(_) => Ok(None),
        }
    }

    /// Name realized for `shape_name` in this run, if any.
    pub fn generated(&self, shape_name: &str) -> Option<&TypeName> {
        self.generated.get(shape_name)
    }

    pub fn table(&self) -> &TypeTable {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (TypeTable, S) {
        (self.table, self.sink)
    }
}
