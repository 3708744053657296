/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::{FromValue, InvalidArgument, Value};
use indexmap::IndexMap;

/// The keyed bag a DTO is hydrated from.
///
/// Each `take_*` method removes one member from the bag and applies the default for
/// an absent member: `None` for scalars and structures, empty for collections. A
/// `Null` entry counts as absent. Values of the wrong kind are rejected with
/// [`InvalidArgument::UnexpectedValue`].
#[derive(Debug, Clone)]
pub struct RawInput {
    owner: String,
    fields: IndexMap<String, Value>,
}

impl RawInput {
    pub fn new(owner: impl Into<String>, fields: IndexMap<String, Value>) -> Self {
        RawInput {
            owner: owner.into(),
            fields,
        }
    }

    /// Wraps `value`, which must be a keyed bag.
    pub fn try_from_value(owner: impl Into<String>, value: Value) -> Result<Self, InvalidArgument> {
        let owner = owner.into();
        match value {
            Value::Map(fields) => Ok(RawInput::new(owner, fields)),
            other => Err(InvalidArgument::unexpected(
                "input",
                owner,
                "a keyed bag",
                other.kind(),
            )),
        }
    }

    /// Name of the type being hydrated.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn take(&mut self, member: &str) -> Option<Value> {
        self.fields
            .shift_remove(member)
            .filter(|value| !value.is_null())
    }

    /// Takes a scalar (or streaming payload) member, passed through unchanged.
    pub fn take_scalar(&mut self, member: &str) -> Result<Option<Value>, InvalidArgument> {
        match self.take(member) {
            Some(value @ (Value::List(_) | Value::Map(_) | Value::Structure(_))) => Err(
                InvalidArgument::unexpected(member, &self.owner, "a scalar", value.kind()),
            ),
            other => Ok(other),
        }
    }

    /// Takes a structure member: either a nested bag or an already realized instance.
    pub fn take_structure(&mut self, member: &str) -> Result<Option<Value>, InvalidArgument> {
        match self.take(member) {
            None => Ok(None),
            Some(value @ (Value::Map(_) | Value::Structure(_))) => Ok(Some(value)),
            Some(other) => Err(InvalidArgument::unexpected(
                member,
                &self.owner,
                "a structure",
                other.kind(),
            )),
        }
    }

    pub fn take_list(&mut self, member: &str) -> Result<Vec<Value>, InvalidArgument> {
        match self.take(member) {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(items),
            Some(other) => Err(InvalidArgument::unexpected(
                member,
                &self.owner,
                "a list",
                other.kind(),
            )),
        }
    }

    pub fn take_map(&mut self, member: &str) -> Result<IndexMap<String, Value>, InvalidArgument> {
        match self.take(member) {
            None => Ok(IndexMap::new()),
            Some(Value::Map(entries)) => Ok(entries),
            Some(other) => Err(InvalidArgument::unexpected(
                member,
                &self.owner,
                "a map",
                other.kind(),
            )),
        }
    }

    pub fn scalar<T: FromValue>(&mut self, member: &str) -> Result<Option<T>, InvalidArgument> {
        self.take_scalar(member)?
            .map(|value| T::from_value(value, member, &self.owner))
            .transpose()
    }

    pub fn structure<T: FromValue>(&mut self, member: &str) -> Result<Option<T>, InvalidArgument> {
        self.take_structure(member)?
            .map(|value| T::from_value(value, member, &self.owner))
            .transpose()
    }

    pub fn list<T: FromValue>(&mut self, member: &str) -> Result<Vec<T>, InvalidArgument> {
        self.take_list(member)?
            .into_iter()
            .map(|value| T::from_value(value, member, &self.owner))
            .collect()
    }

    pub fn map<T: FromValue>(&mut self, member: &str) -> Result<IndexMap<String, T>, InvalidArgument> {
        self.take_map(member)?
            .into_iter()
            .map(|(key, value)| {
                Ok::<_, InvalidArgument>((key, T::from_value(value, member, &self.owner)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use crate::{InvalidArgument, RawInput, Value};
    use indexmap::IndexMap;

    fn input(value: Value) -> RawInput {
        match value {
            Value::Map(fields) => RawInput::new("Destination", fields),
            _ => unreachable!(),
        }
    }

    #[test]
    fn absent_collections_default_to_empty() {
        let mut raw = input(Value::bag([("Other", "x")]));
        assert!(raw.take_list("ToAddresses").unwrap().is_empty());
        assert_eq!(raw.take_map("Tags").unwrap(), IndexMap::new());
        assert_eq!(raw.take_scalar("Name").unwrap(), None);
    }

    #[test]
    fn null_counts_as_absent() {
        let mut raw = input(Value::bag([("Name", Value::Null)]));
        assert_eq!(raw.take_scalar("Name").unwrap(), None);
    }

    #[test]
    fn typed_members() {
        let mut raw = input(Value::bag([
            ("MaxItems", Value::from(10)),
            ("ToAddresses", Value::from(vec!["a", "b"])),
        ]));
        assert_eq!(raw.scalar::<i32>("MaxItems").unwrap(), Some(10));
        assert_eq!(raw.list::<String>("ToAddresses").unwrap(), vec!["a", "b"]);
        assert_eq!(raw.scalar::<String>("Marker").unwrap(), None);
    }

    #[test]
    fn bag_is_required() {
        assert!(RawInput::try_from_value("Destination", Value::from("x")).is_err());
        assert_eq!(
            RawInput::try_from_value("Destination", Value::bag([("a", 1)]))
                .unwrap()
                .owner(),
            "Destination"
        );
    }

    #[test]
    fn wrong_kind_names_member_and_owner() {
        let mut raw = input(Value::bag([("ToAddresses", "a@example.com")]));
        assert_eq!(
            raw.take_list("ToAddresses").unwrap_err(),
            InvalidArgument::unexpected("ToAddresses", "Destination", "a list", "string")
        );
    }
}
