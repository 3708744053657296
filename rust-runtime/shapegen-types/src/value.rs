/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::Blob;
use indexmap::IndexMap;
use time::OffsetDateTime;

/// Untyped input value
///
/// Values are what a DTO is hydrated from and what a hydrated DTO stores per member.
/// `Map` is the keyed bag accepted by a generated `create`; `Structure` is an already
/// realized instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(OffsetDateTime),
    Blob(Blob),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Structure(Box<Dto>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Structure(_) => "structure",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Dto> {
        match self {
            Value::Structure(dto) => Some(dto),
            _ => None,
        }
    }

    /// Builds a keyed bag from `(name, value)` pairs, keeping their order.
    pub fn bag<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Blob> for Value {
    fn from(value: Blob) -> Self {
        Value::Blob(value)
    }
}

impl From<Dto> for Value {
    fn from(value: Dto) -> Self {
        Value::Structure(Box::new(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A hydrated instance of a generated DTO type.
///
/// Fields are stored in member declaration order. Absent optional scalars and
/// structures are [`Value::Null`]; absent collections are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Dto {
    type_name: String,
    fields: IndexMap<String, Value>,
}

impl Dto {
    pub fn new(type_name: impl Into<String>, fields: IndexMap<String, Value>) -> Self {
        Dto {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Value of `member`, or `Null` when the type has no such member.
    pub fn get(&self, member: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(member).unwrap_or(&NULL)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Turns the instance back into a keyed bag.
    pub fn into_fields(self) -> IndexMap<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod test {
    use crate::{Dto, Value};
    use indexmap::IndexMap;

    #[test]
    fn bag_preserves_insertion_order() {
        let bag = Value::bag([("b", Value::from(1)), ("a", Value::from("x"))]);
        let keys: Vec<_> = bag.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn missing_field_reads_as_null() {
        let dto = Dto::new("Tag", IndexMap::new());
        assert!(dto.get("Key").is_null());
        assert_eq!(dto.type_name(), "Tag");
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::String("a".into()));
        assert_eq!(Value::from(vec!["a", "b"]).kind(), "list");
    }
}
