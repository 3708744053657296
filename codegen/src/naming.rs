/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Namespaces and identifier conversion.

use crate::settings::CodegenSettings;
use convert_case::{Boundary, Case, Casing};
use std::fmt;

/// Fully qualified name of a generated type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    module: String,
    name: String,
}

impl TypeName {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `module::Name`
    pub fn fqdn(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Maps shape kinds to the module their generated types live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRegistry {
    object: String,
    input: String,
    enumeration: String,
}

impl NamespaceRegistry {
    pub fn new(settings: &CodegenSettings) -> Self {
        let qualify = |module: &str| format!("{}::{}", settings.root_module, module);
        NamespaceRegistry {
            object: qualify(&settings.object_module),
            input: qualify(&settings.input_module),
            enumeration: qualify(&settings.enum_module),
        }
    }

    pub fn object(&self, shape_name: &str) -> TypeName {
        TypeName::new(&self.object, shape_name)
    }

    pub fn input(&self, shape_name: &str) -> TypeName {
        TypeName::new(&self.input, shape_name)
    }

    pub fn enumeration(&self, shape_name: &str) -> TypeName {
        TypeName::new(&self.enumeration, shape_name)
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        NamespaceRegistry::new(&CodegenSettings::default())
    }
}

const RESERVED: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "yield",
];

/// Converts a member name into a Rust field name.
///
/// Runs of capitals are treated as one word, so `SSEKMSKeyId` becomes `ssekms_key_id`
/// and `DBInstanceIdentifier` becomes `db_instance_identifier`.
pub fn field_name(member: &str) -> String {
    let name = snake_case(member);
    if RESERVED.contains(&name.as_str()) {
        if matches!(name.as_str(), "self" | "super" | "crate") {
            format!("{}_", name)
        } else {
            format!("r#{}", name)
        }
    } else {
        name
    }
}

/// Words split on separators, lower to upper transitions, digit to upper transitions
/// and acronym ends. A digit never starts a word of its own.
const WORD_BOUNDARIES: &[Boundary] = &[
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

/// Replaces every character that cannot appear in an identifier with a space.
fn words(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect()
}

/// `snake_case` spelling of a shape or member name, without keyword escaping.
pub fn snake_case(input: &str) -> String {
    let mut out = words(input)
        .with_boundaries(WORD_BOUNDARIES)
        .to_case(Case::Snake);
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Converts an enum value into a variant name.
pub fn variant_name(value: &str) -> String {
    let mut out = words(value)
        .with_boundaries(WORD_BOUNDARIES)
        .to_case(Case::Pascal);
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'V');
    }
    // `Unknown` is taken by the catch-all variant
    if out == "Unknown" {
        out.push_str("Value");
    }
    out
}
