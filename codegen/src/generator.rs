/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Service level driver: one generation run over the operations of a model.

use crate::code::Block;
use crate::error::CodegenError;
use crate::model::{Operation, ShapeModel};
use crate::naming::{field_name, NamespaceRegistry, TypeName};
use crate::object::{ObjectGenerator, TypeTable};
use crate::serializer::query::{QueryProgram, QuerySerializer};
use crate::serializer::{BodyProgram, RequestSerializer};
use crate::settings::CodegenSettings;
use crate::sink::{OutputSink, OutputUnit};
use bytes::Bytes;
use indexmap::IndexMap;
use shapegen_types::{Dto, InvalidArgument};
use tracing::{debug, info_span, trace};

const QUERY_PROTOCOL: &str = "query";

/// Request body generation for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOperation {
    operation: String,
    shape: String,
    input: TypeName,
    content_type: &'static str,
    program: QueryProgram,
}

impl GeneratedOperation {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Name of the input shape.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// DTO type realized for the input shape.
    pub fn input(&self) -> &TypeName {
        &self.input
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn program(&self) -> &QueryProgram {
        &self.program
    }

    /// Builds the request body of `input`, exactly as the generated `request_body` would.
    pub fn serialize(&self, input: &Dto) -> Result<Bytes, InvalidArgument> {
        self.program.serialize(input)
    }
}

/// Drives the generation of input types and request serializers.
///
/// Every operation of one `ServiceGenerator` shares a single [`ObjectGenerator`], so a
/// structure reachable from several inputs is realized only once. Operations are
/// memoized the same way.
pub struct ServiceGenerator<'m, S> {
    model: &'m ShapeModel,
    namespaces: NamespaceRegistry,
    objects: ObjectGenerator<'m, S>,
    operations: IndexMap<String, GeneratedOperation>,
}

impl<'m, S: OutputSink> ServiceGenerator<'m, S> {
    pub fn new(model: &'m ShapeModel, settings: CodegenSettings, sink: S) -> Self {
        ServiceGenerator {
            model,
            namespaces: NamespaceRegistry::new(&settings),
            objects: ObjectGenerator::new(model, &settings, sink),
            operations: IndexMap::new(),
        }
    }

    pub fn generate_operation(&mut self, name: &str) -> Result<GeneratedOperation, CodegenError> {
        let span = info_span!("generate_operation", operation = name);
        let _enter = span.enter();

        let operation = self
            .model
            .operation(name)
            .ok_or_else(|| CodegenError::UnknownOperation(name.to_string()))?;
        if let Some(generated) = self.operations.get(operation.name()) {
            trace!("operation already generated");
            return Ok(generated.clone());
        }
        let protocol = self.model.metadata().protocol();
        if protocol != QUERY_PROTOCOL {
            return Err(CodegenError::UnsupportedProtocol(protocol.to_string()));
        }
        let shape = self
            .model
            .shape(operation.input_shape())
            .ok_or_else(|| CodegenError::UnresolvedShape(operation.input_shape().to_string()))?;
        let input = self.objects.generate(shape)?;

        let serializer = QuerySerializer::new(self.model, self.namespaces.clone());
        let payload = shape.as_structure().and_then(|structure| structure.payload());
        let program = match payload {
            Some(member) => {
                debug!(payload = member.name(), "input has a raw payload");
                serializer.generate_for_member(member, &field_name(member.name()))
            }
            None => serializer.generate_for_shape(operation, shape)?,
        };
        let content_type = serializer.content_type();

        let type_name = self.namespaces.input(operation.name());
        let source = render_request(&type_name, operation, &input, content_type, &program);
        self.objects.sink_mut().persist(OutputUnit {
            type_name,
            source: source.render(),
        });
        let generated = GeneratedOperation {
            operation: operation.name().to_string(),
            shape: shape.name().to_string(),
            input,
            content_type,
            program,
        };
        self.operations
            .insert(generated.operation.clone(), generated.clone());
        Ok(generated)
    }

    /// Generates every operation, in model order.
    pub fn generate_all(&mut self) -> Result<Vec<GeneratedOperation>, CodegenError> {
        let model = self.model;
        model
            .operations()
            .map(|operation| self.generate_operation(operation.name()))
            .collect()
    }

    /// Types realized so far in this run.
    pub fn types(&self) -> &TypeTable {
        self.objects.table()
    }

    pub fn sink(&self) -> &S {
        self.objects.sink()
    }

    pub fn into_parts(self) -> (TypeTable, S) {
        self.objects.into_parts()
    }
}

fn render_request(
    type_name: &TypeName,
    operation: &Operation,
    input: &TypeName,
    content_type: &str,
    program: &QueryProgram,
) -> Block {
    let mut code = Block::new();
    code.doc(&format!("Request serializer of the `{}` operation.", operation.name()));
    code.line("#[derive(Debug, Clone, Copy, Default)]");
    code.line(format!("pub struct {};", type_name.name()));
    code.blank();
    code.block(format!("impl {}", type_name.name()), |b| {
        b.line(format!(
            "pub const CONTENT_TYPE: &'static str = {:?};",
            content_type
        ));
        b.blank();
        b.block(
            format!(
                "pub fn request_body(input: &{}) -> bytes::Bytes",
                input.fqdn()
            ),
            |b| {
                b.append(program.render());
            },
        );
    });
    code
}
