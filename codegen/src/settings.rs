/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Generator settings.

use serde::Deserialize;

/// Where generated units are placed.
///
/// Every field has a default, so an empty JSON object is a valid configuration:
///
/// ```json
/// { "rootModule": "aws_sdk_ses", "objectModule": "model" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodegenSettings {
    pub root_module: String,
    pub object_module: String,
    pub input_module: String,
    pub enum_module: String,
}

impl Default for CodegenSettings {
    fn default() -> Self {
        CodegenSettings {
            root_module: "crate".to_string(),
            object_module: "model".to_string(),
            input_module: "input".to_string(),
            enum_module: "types".to_string(),
        }
    }
}

impl CodegenSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod test {
    use super::CodegenSettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_use_defaults() {
        let settings = CodegenSettings::from_json(r#"{ "rootModule": "aws_sdk_ses" }"#).unwrap();
        assert_eq!(settings.root_module, "aws_sdk_ses");
        assert_eq!(settings.object_module, "model");
        assert_eq!(CodegenSettings::from_json("{}").unwrap(), CodegenSettings::default());
    }
}
