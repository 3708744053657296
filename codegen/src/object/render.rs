/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::{DtoType, FieldDef, Hydration};
use crate::code::Block;

const RESULT: &str = "Result<Self, shapegen_types::InvalidArgument>";
const OWNER: &str = "std::any::type_name::<Self>()";

/// Methods whose names a member accessor must not take.
const RESERVED_METHODS: &[&str] = &["new", "create", "validate"];

pub(super) fn render(dto: &DtoType) -> Block {
    let name = dto.type_name.name();
    let mut code = Block::new();
    if let Some(doc) = &dto.documentation {
        code.doc(doc);
    }
    code.line("#[non_exhaustive]");
    code.line("#[derive(Debug, Clone, PartialEq)]");
    code.block(format!("pub struct {}", name), |b| {
        for field in &dto.fields {
            if let Some(doc) = &field.documentation {
                b.doc(doc);
            }
            b.line(format!("pub(crate) {}: {},", field.field, storage_type(field)));
        }
    });
    code.blank();
    code.block(format!("impl {}", name), |b| {
        render_new(b, dto);
        b.blank();
        render_create(b);
        for field in &dto.fields {
            b.blank();
            render_accessor(b, field);
        }
        b.blank();
        render_validate(b, dto);
    });
    code.blank();
    code.block(format!("impl From<{0}> for shapegen_types::Input<{0}>", name), |b| {
        b.block(format!("fn from(value: {}) -> Self", name), |b| {
            b.line("shapegen_types::Input::Instance(value)");
        });
    });
    code.blank();
    code.block(format!("impl shapegen_types::FromValue for {}", name), |b| {
        b.block(
            format!(
                "fn from_value(value: shapegen_types::Value, member: &str, owner: &str) -> {}",
                RESULT
            ),
            |b| {
                b.block("match value", |b| {
                    b.line(format!(
                        "shapegen_types::Value::Map(fields) => Self::new(shapegen_types::RawInput::new({}, fields)),",
                        OWNER
                    ));
                    b.line(format!(
                        "shapegen_types::Value::Structure(dto) => Self::new(shapegen_types::RawInput::new({}, dto.into_fields())),",
                        OWNER
                    ));
                    b.block_with(
                        "other => Err(shapegen_types::InvalidArgument::unexpected(",
                        ")),",
                        |b| {
                            b.line("member,");
                            b.line("owner,");
                            b.line("\"a structure\",");
                            b.line("other.kind(),");
                        },
                    );
                });
            },
        );
    });
    code
}

fn storage_type(field: &FieldDef) -> String {
    let ty = &field.resolved.parameter_type;
    match field.hydration {
        Hydration::Structure(_) => format!("Option<Box<{}>>", ty),
        ref h if h.is_collection() => ty.clone(),
        _ => format!("Option<{}>", ty),
    }
}

fn render_new(b: &mut Block, dto: &DtoType) {
    b.doc("Hydrates an instance from a keyed bag.");
    b.block(
        format!("pub fn new(mut input: shapegen_types::RawInput) -> {}", RESULT),
        |b| {
            if dto.fields.is_empty() {
                b.line("let _ = &mut input;");
            }
            b.block_with(format!("Ok({} {{", dto.type_name.name()), "})", |b| {
                for field in &dto.fields {
                    let member = &field.member;
                    let take = match &field.hydration {
                        Hydration::Structure(type_name) => format!(
                            "input.structure::<{}>({:?})?.map(Box::new)",
                            type_name.fqdn(),
                            member
                        ),
                        Hydration::List(_) => format!("input.list({:?})?", member),
                        Hydration::Map(_) => format!("input.map({:?})?", member),
                        Hydration::Scalar(_) => format!("input.scalar({:?})?", member),
                    };
                    b.line(format!("{}: {},", field.field, take));
                }
            });
        },
    );
}

fn render_create(b: &mut Block) {
    b.doc("Returns `input` unchanged when it already is an instance, hydrates it otherwise.");
    b.block(
        format!(
            "pub fn create(input: impl Into<shapegen_types::Input<Self>>) -> {}",
            RESULT
        ),
        |b| {
            b.block("match input.into()", |b| {
                b.line("shapegen_types::Input::Instance(instance) => Ok(instance),");
                b.block("shapegen_types::Input::Raw(value) =>", |b| {
                    b.line(format!(
                        "Self::new(shapegen_types::RawInput::try_from_value({}, value)?)",
                        OWNER
                    ));
                });
            });
        },
    );
}

fn accessor_name(field: &FieldDef) -> String {
    if RESERVED_METHODS.contains(&field.field.as_str()) {
        format!("get_{}", field.field)
    } else {
        field.field.clone()
    }
}

fn render_accessor(b: &mut Block, field: &FieldDef) {
    let resolved = &field.resolved;
    let this = format!("self.{}", field.field);
    let name = accessor_name(field);
    if let Some(doc) = &field.documentation {
        b.doc(doc);
    }
    if field.hydration.is_collection() {
        b.block(
            format!("pub fn {}(&self) -> {}", name, resolved.return_type),
            |b| {
                b.line(format!("&{}", this));
            },
        );
        return;
    }
    if field.streaming {
        b.block(
            format!("pub fn {}(&self) -> {}", name, resolved.return_type),
            |b| {
                b.line(format!("{}.clone().unwrap_or_default()", this));
            },
        );
        return;
    }
    let borrowed = resolved.return_type.starts_with('&');
    let access = match &field.hydration {
        Hydration::Structure(_) => format!("{}.as_deref()", this),
        _ if resolved.return_type == "&str" => format!("{}.as_deref()", this),
        _ if borrowed => format!("{}.as_ref()", this),
        _ => this,
    };
    if field.nullable {
        b.block(
            format!("pub fn {}(&self) -> Option<{}>", name, resolved.return_type),
            |b| {
                b.line(access);
            },
        );
    } else {
        if field.documentation.is_some() {
            b.doc("");
        }
        b.doc("# Panics");
        b.doc("");
        b.doc(&format!(
            "Panics when `{}` was not provided; `validate` reports that case as an error.",
            field.member
        ));
        b.block(
            format!("pub fn {}(&self) -> {}", name, resolved.return_type),
            |b| {
                b.line(format!("{}.expect({:?})", access, format!("`{}` is required", field.member)));
            },
        );
    }
}

fn render_validate(b: &mut Block, dto: &DtoType) {
    b.block(
        "pub fn validate(&self) -> Result<(), shapegen_types::InvalidArgument>",
        |b| {
            let mut constrained = false;
            for field in &dto.fields {
                let this = format!("self.{}", field.field);
                let member = &field.member;
                if field.required && !field.hydration.is_collection() {
                    constrained = true;
                    b.if_(&format!("{}.is_none()", this), |b| {
                        b.line(format!(
                            "return Err(shapegen_types::InvalidArgument::missing({:?}, {}));",
                            member, OWNER
                        ));
                    });
                }
                if let Some(binding) = &field.enum_binding {
                    constrained = true;
                    let check = |b: &mut Block| {
                        b.if_(
                            &format!("!{}::exists(value.as_str())", binding.type_name.fqdn()),
                            |b| {
                                b.block_with(
                                    "return Err(shapegen_types::InvalidArgument::invalid_enum(",
                                    "));",
                                    |b| {
                                        b.line(format!("{:?},", member));
                                        b.line(format!("{},", OWNER));
                                        b.line("value.as_str(),");
                                        b.line(format!("{:?},", binding.type_name.name()));
                                    },
                                );
                            },
                        );
                    };
                    for_each_leaf(b, &field.hydration, &this, &check);
                }
                if let Hydration::Structure(_) = field.hydration.leaf() {
                    constrained = true;
                    for_each_leaf(b, &field.hydration, &this, &|b: &mut Block| {
                        b.line("value.validate()?;");
                    });
                }
            }
            if !constrained {
                b.line("// no constraints");
            }
            b.line("Ok(())");
        },
    );
}

/// Runs `leaf` with `value` bound to each innermost value of `source`, descending
/// through every level of list and map.
fn for_each_leaf(b: &mut Block, hydration: &Hydration, source: &str, leaf: &dyn Fn(&mut Block)) {
    let nested = source == "value";
    match hydration {
        Hydration::List(element) => {
            let iter = if nested {
                "value.iter()".to_string()
            } else {
                format!("&{}", source)
            };
            b.for_each("value", &iter, |b| for_each_leaf(b, element, "value", leaf));
        }
        Hydration::Map(element) => {
            b.for_each("value", &format!("{}.values()", source), |b| {
                for_each_leaf(b, element, "value", leaf)
            });
        }
        _ if nested => leaf(b),
        _ => {
            b.if_let("Some(value)", &format!("&{}", source), leaf);
        }
    }
}
