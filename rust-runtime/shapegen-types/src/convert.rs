/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::{Blob, ByteStream, InvalidArgument, Value};
use indexmap::IndexMap;
use time::OffsetDateTime;

/// Conversion from an untyped [`Value`] into a typed member.
///
/// Generated DTOs and enums implement this so [`RawInput`](crate::RawInput) can
/// hydrate nested members. `member` and `owner` are only used for error reporting.
pub trait FromValue: Sized {
    fn from_value(value: Value, member: &str, owner: &str) -> Result<Self, InvalidArgument>;
}

/// Input of a generated `create`: an already realized instance or a keyed bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Instance(T),
    Raw(Value),
}

impl<T> From<Value> for Input<T> {
    fn from(value: Value) -> Self {
        Input::Raw(value)
    }
}

macro_rules! from_value {
    ($ty:ty, $expected:literal, $($pat:pat => $out:expr),+) => {
        impl FromValue for $ty {
            fn from_value(value: Value, member: &str, owner: &str) -> Result<Self, InvalidArgument> {
                match value {
                    $($pat => Ok($out),)+
                    other => Err(InvalidArgument::unexpected(member, owner, $expected, other.kind())),
                }
            }
        }
    };
}

from_value!(String, "a string", Value::String(s) => s);
from_value!(bool, "a boolean", Value::Boolean(b) => b);
from_value!(i64, "an integer", Value::Integer(i) => i);
from_value!(f64, "a float", Value::Float(f) => f, Value::Integer(i) => i as f64);
from_value!(f32, "a float", Value::Float(f) => f as f32, Value::Integer(i) => i as f32);
from_value!(OffsetDateTime, "a timestamp", Value::Timestamp(t) => t);
from_value!(Blob, "a blob", Value::Blob(b) => b, Value::String(s) => Blob::new(s));
from_value!(ByteStream, "a blob", Value::Blob(b) => b.into(), Value::String(s) => Blob::new(s).into());

impl FromValue for Value {
    fn from_value(value: Value, _member: &str, _owner: &str) -> Result<Self, InvalidArgument> {
        Ok(value)
    }
}

impl FromValue for i32 {
    fn from_value(value: Value, member: &str, owner: &str) -> Result<Self, InvalidArgument> {
        match value {
            Value::Integer(i) => i32::try_from(i).map_err(|_| {
                InvalidArgument::unexpected(member, owner, "a 32-bit integer", "an out of range integer")
            }),
            other => Err(InvalidArgument::unexpected(member, owner, "an integer", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value, member: &str, owner: &str) -> Result<Self, InvalidArgument> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| T::from_value(item, member, owner))
                .collect(),
            other => Err(InvalidArgument::unexpected(member, owner, "a list", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value, member: &str, owner: &str) -> Result<Self, InvalidArgument> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| Ok::<_, InvalidArgument>((key, T::from_value(value, member, owner)?)))
                .collect(),
            other => Err(InvalidArgument::unexpected(member, owner, "a map", other.kind())),
        }
    }
}
