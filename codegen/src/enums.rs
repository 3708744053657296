/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Enumeration types for string shapes with a closed value set.

use crate::code::Block;
use crate::model::Shape;
use crate::naming::{variant_name, NamespaceRegistry, TypeName};
use crate::sink::{OutputSink, OutputUnit};
use indexmap::IndexMap;
use tracing::debug;

/// Realizes the enumeration type of a shape and returns its name.
///
/// Called once per enum-typed member; implementations are expected to memoize.
pub trait EnumRealizer {
    fn generate(&mut self, shape: &Shape, sink: &mut dyn OutputSink) -> TypeName;
}

#[derive(Debug, Default)]
pub struct EnumGenerator {
    namespaces: NamespaceRegistry,
    generated: IndexMap<String, TypeName>,
}

impl EnumGenerator {
    pub fn new(namespaces: NamespaceRegistry) -> Self {
        EnumGenerator {
            namespaces,
            generated: IndexMap::new(),
        }
    }
}

impl EnumRealizer for EnumGenerator {
    fn generate(&mut self, shape: &Shape, sink: &mut dyn OutputSink) -> TypeName {
        if let Some(name) = self.generated.get(shape.name()) {
            return name.clone();
        }
        let type_name = self.namespaces.enumeration(shape.name());
        self.generated
            .insert(shape.name().to_string(), type_name.clone());
        let values = shape.enum_values().unwrap_or_default();
        debug!(shape = shape.name(), values = values.len(), "generating enum");
        sink.persist(OutputUnit {
            type_name: type_name.clone(),
            source: render(&type_name, values, shape.documentation()).render(),
        });
        type_name
    }
}

fn variants(values: &[String]) -> Vec<(String, &str)> {
    let mut out: Vec<(String, &str)> = Vec::with_capacity(values.len());
    for value in values {
        let base = variant_name(value);
        let mut name = base.clone();
        let mut n = 2;
        while out.iter().any(|(existing, _)| *existing == name) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        out.push((name, value.as_str()));
    }
    out
}

fn render(type_name: &TypeName, values: &[String], documentation: Option<&str>) -> Block {
    let name = type_name.name();
    let variants = variants(values);
    let mut code = Block::new();
    if let Some(doc) = documentation {
        code.doc(doc);
    }
    code.line("#[non_exhaustive]");
    code.line("#[derive(Debug, Clone, PartialEq, Eq, Hash)]");
    code.block(format!("pub enum {}", name), |b| {
        for (variant, _) in &variants {
            b.line(format!("{},", variant));
        }
        b.line("/// A value outside the modeled set.");
        b.line("Unknown(String),");
    });
    code.blank();
    code.block(format!("impl {}", name), |b| {
        let list = values
            .iter()
            .map(|v| format!("{:?}", v))
            .collect::<Vec<_>>()
            .join(", ");
        b.line(format!("pub const VALUES: &'static [&'static str] = &[{}];", list));
        b.blank();
        b.block("pub fn as_str(&self) -> &str", |b| {
            b.block("match self", |b| {
                for (variant, value) in &variants {
                    b.line(format!("{}::{} => {:?},", name, variant, value));
                }
                b.line(format!("{}::Unknown(value) => value.as_str(),", name));
            });
        });
        b.blank();
        b.block("pub fn exists(value: &str) -> bool", |b| {
            b.line("Self::VALUES.contains(&value)");
        });
    });
    code.blank();
    code.block(format!("impl From<&str> for {}", name), |b| {
        b.block("fn from(value: &str) -> Self", |b| {
            b.block("match value", |b| {
                for (variant, value) in &variants {
                    b.line(format!("{:?} => {}::{},", value, name, variant));
                }
                b.line(format!("other => {}::Unknown(other.to_string()),", name));
            });
        });
    });
    code.blank();
    code.block(format!("impl std::fmt::Display for {}", name), |b| {
        b.block(
            "fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result",
            |b| {
                b.line("f.write_str(self.as_str())");
            },
        );
    });
    code.blank();
    code.block(format!("impl shapegen_types::FromValue for {}", name), |b| {
        b.block(
            "fn from_value(value: shapegen_types::Value, member: &str, owner: &str) -> Result<Self, shapegen_types::InvalidArgument>",
            |b| {
                b.line("<String as shapegen_types::FromValue>::from_value(value, member, owner)");
                b.line("    .map(|s| Self::from(s.as_str()))");
            },
        );
    });
    code
}
