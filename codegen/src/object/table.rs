/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::{DtoType, FieldDef, Hydration};
use crate::model::ScalarType;
use indexmap::IndexMap;
use shapegen_types::{Blob, Dto, InvalidArgument, RawInput, Value};

/// The DTO types realized during one run, keyed by shape name.
///
/// Applies the factory and validation contracts of the realized types directly to
/// [`Value`] input, producing [`Dto`] instances.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: IndexMap<String, DtoType>,
}

impl TypeTable {
    pub(super) fn insert(&mut self, shape_name: &str, dto: DtoType) {
        self.types.insert(shape_name.to_string(), dto);
    }

    pub fn get(&self, shape_name: &str) -> Option<&DtoType> {
        self.types.get(shape_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Realized types in completion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DtoType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn lookup(&self, shape_name: &str) -> Result<&DtoType, InvalidArgument> {
        self.types.get(shape_name).ok_or_else(|| {
            InvalidArgument::unexpected("input", shape_name, "a generated type", "an unknown type")
        })
    }

    /// Factory of the `shape_name` type.
    ///
    /// An instance of the same type is returned unchanged; a keyed bag is hydrated member
    /// by member; anything else is rejected.
    pub fn create(&self, shape_name: &str, input: Value) -> Result<Dto, InvalidArgument> {
        let dto_type = self.lookup(shape_name)?;
        match input {
            Value::Structure(dto) if dto.type_name() == shape_name => Ok(*dto),
            other => {
                let owner = dto_type.type_name.fqdn();
                let mut raw = RawInput::try_from_value(owner.as_str(), other)?;
                let mut fields = IndexMap::with_capacity(dto_type.fields.len());
                for field in &dto_type.fields {
                    let value = self.hydrate(field, &mut raw, &owner)?;
                    fields.insert(field.member.clone(), value);
                }
                Ok(Dto::new(shape_name, fields))
            }
        }
    }

    fn hydrate(
        &self,
        field: &FieldDef,
        raw: &mut RawInput,
        owner: &str,
    ) -> Result<Value, InvalidArgument> {
        let member = field.member.as_str();
        Ok(match &field.hydration {
            Hydration::Structure(_) => match raw.take_structure(member)? {
                Some(value) => self.convert(&field.hydration, value, member, owner)?,
                None => Value::Null,
            },
            Hydration::List(element) => Value::List(
                raw.take_list(member)?
                    .into_iter()
                    .map(|value| self.convert(element, value, member, owner))
                    .collect::<Result<_, _>>()?,
            ),
            Hydration::Map(element) => Value::Map(
                raw.take_map(member)?
                    .into_iter()
                    .map(|(key, value)| {
                        Ok::<_, InvalidArgument>((key, self.convert(element, value, member, owner)?))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Hydration::Scalar(_) => match raw.take_scalar(member)? {
                Some(value) => self.convert(&field.hydration, value, member, owner)?,
                None => Value::Null,
            },
        })
    }

    /// Hydrates one present value following `hydration`, at any collection depth.
    fn convert(
        &self,
        hydration: &Hydration,
        value: Value,
        member: &str,
        owner: &str,
    ) -> Result<Value, InvalidArgument> {
        match (hydration, value) {
            (Hydration::Structure(type_name), value) => self
                .create(type_name.name(), value)
                .map(|dto| Value::Structure(Box::new(dto))),
            (Hydration::List(element), Value::List(items)) => items
                .into_iter()
                .map(|item| self.convert(element, item, member, owner))
                .collect::<Result<_, _>>()
                .map(Value::List),
            (Hydration::Map(element), Value::Map(entries)) => entries
                .into_iter()
                .map(|(key, item)| {
                    Ok::<_, InvalidArgument>((key, self.convert(element, item, member, owner)?))
                })
                .collect::<Result<_, _>>()
                .map(Value::Map),
            (Hydration::List(_), other) => {
                Err(InvalidArgument::unexpected(member, owner, "a list", other.kind()))
            }
            (Hydration::Map(_), other) => {
                Err(InvalidArgument::unexpected(member, owner, "a map", other.kind()))
            }
            (Hydration::Scalar(_), Value::Null) => Ok(Value::Null),
            (Hydration::Scalar(scalar), value) => check_scalar(*scalar, value, member, owner),
        }
    }

    /// Checks the constraints of `dto` and of every structure nested in it.
    pub fn validate(&self, dto: &Dto) -> Result<(), InvalidArgument> {
        let dto_type = self.lookup(dto.type_name())?;
        let owner = dto_type.type_name.fqdn();
        for field in &dto_type.fields {
            let member = field.member.as_str();
            let value = dto.get(member);
            if field.required && !field.hydration.is_collection() && value.is_null() {
                return Err(InvalidArgument::missing(member, &owner));
            }
            if let Some(binding) = &field.enum_binding {
                let mut leaves = Vec::new();
                collect_leaves(value, &mut leaves);
                for s in leaves.into_iter().filter_map(Value::as_str) {
                    if !binding.allows(s) {
                        return Err(InvalidArgument::invalid_enum(
                            member,
                            &owner,
                            s,
                            binding.type_name.name(),
                        ));
                    }
                }
            }
            self.validate_nested(&field.hydration, value)?;
        }
        Ok(())
    }

    fn validate_nested(&self, hydration: &Hydration, value: &Value) -> Result<(), InvalidArgument> {
        match (hydration, value) {
            (Hydration::Structure(_), Value::Structure(nested)) => self.validate(nested),
            (Hydration::List(element), Value::List(items)) => items
                .iter()
                .try_for_each(|item| self.validate_nested(element, item)),
            (Hydration::Map(element), Value::Map(entries)) => entries
                .values()
                .try_for_each(|item| self.validate_nested(element, item)),
            _ => Ok(()),
        }
    }
}

/// Values below every level of list and map nesting.
fn collect_leaves<'v>(value: &'v Value, out: &mut Vec<&'v Value>) {
    match value {
        Value::List(items) => items.iter().for_each(|item| collect_leaves(item, out)),
        Value::Map(entries) => entries.values().for_each(|item| collect_leaves(item, out)),
        other => out.push(other),
    }
}

fn check_scalar(
    scalar: ScalarType,
    value: Value,
    member: &str,
    owner: &str,
) -> Result<Value, InvalidArgument> {
    let found = match (scalar, value) {
        (ScalarType::String, value @ Value::String(_)) => return Ok(value),
        (ScalarType::Integer, Value::Integer(i)) if i32::try_from(i).is_err() => {
            return Err(InvalidArgument::unexpected(
                member,
                owner,
                "a 32-bit integer",
                "an out of range integer",
            ))
        }
        (ScalarType::Integer | ScalarType::Long, value @ Value::Integer(_)) => return Ok(value),
        (ScalarType::Float | ScalarType::Double, value @ (Value::Float(_) | Value::Integer(_))) => {
            return Ok(value)
        }
        (ScalarType::Boolean, value @ Value::Boolean(_)) => return Ok(value),
        (ScalarType::Timestamp, value @ Value::Timestamp(_)) => return Ok(value),
        (ScalarType::Blob, value @ Value::Blob(_)) => return Ok(value),
        (ScalarType::Blob, Value::String(s)) => return Ok(Value::Blob(Blob::new(s))),
        (_, other) => other.kind(),
    };
    Err(InvalidArgument::unexpected(member, owner, expectation(scalar), found))
}

fn expectation(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::String => "a string",
        ScalarType::Integer | ScalarType::Long => "an integer",
        ScalarType::Float | ScalarType::Double => "a float",
        ScalarType::Boolean => "a boolean",
        ScalarType::Timestamp => "a timestamp",
        ScalarType::Blob => "a blob",
    }
}
