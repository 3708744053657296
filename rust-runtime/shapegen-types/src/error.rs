/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

/// Raised by a DTO when its content breaks the constraints of the shape it was
/// generated from.
///
/// Every variant names the offending member and the type that owns it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error(
        "Missing parameter \"{member}\" when validating the \"{owner}\". The value cannot be null."
    )]
    MissingParameter { member: String, owner: String },
    #[error(
        "Invalid parameter \"{member}\" when validating the \"{owner}\". The value \"{value}\" is not a valid \"{enum_name}\"."
    )]
    InvalidEnumValue {
        member: String,
        owner: String,
        value: String,
        enum_name: String,
    },
    #[error(
        "Invalid parameter \"{member}\" for the \"{owner}\". Expected {expected}, found {found}."
    )]
    UnexpectedValue {
        member: String,
        owner: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl InvalidArgument {
    pub fn missing(member: impl Into<String>, owner: impl Into<String>) -> Self {
        InvalidArgument::MissingParameter {
            member: member.into(),
            owner: owner.into(),
        }
    }

    pub fn invalid_enum(
        member: impl Into<String>,
        owner: impl Into<String>,
        value: impl Into<String>,
        enum_name: impl Into<String>,
    ) -> Self {
        InvalidArgument::InvalidEnumValue {
            member: member.into(),
            owner: owner.into(),
            value: value.into(),
            enum_name: enum_name.into(),
        }
    }

    pub fn unexpected(
        member: impl Into<String>,
        owner: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        InvalidArgument::UnexpectedValue {
            member: member.into(),
            owner: owner.into(),
            expected,
            found,
        }
    }

    /// Name of the member the error is about.
    pub fn member(&self) -> &str {
        match self {
            InvalidArgument::MissingParameter { member, .. }
            | InvalidArgument::InvalidEnumValue { member, .. }
            | InvalidArgument::UnexpectedValue { member, .. } => member,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::InvalidArgument;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_name_member_and_owner() {
        assert_eq!(
            InvalidArgument::missing("LayerName", "ListLayerVersionsRequest").to_string(),
            "Missing parameter \"LayerName\" when validating the \"ListLayerVersionsRequest\". The value cannot be null."
        );
        let err = InvalidArgument::InvalidEnumValue {
            member: "Permission".into(),
            owner: "Grant".into(),
            value: "EVERYTHING".into(),
            enum_name: "Permission".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter \"Permission\" when validating the \"Grant\". The value \"EVERYTHING\" is not a valid \"Permission\"."
        );
        assert_eq!(err.member(), "Permission");
    }
}
