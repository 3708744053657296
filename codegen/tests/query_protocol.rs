#![recursion_limit = "256"]
/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use pretty_assertions::assert_eq;
use serde_json::json;
use shapegen::{CodegenError, CodegenSettings, MemorySink, ServiceGenerator, ShapeModel};
use shapegen_types::{Blob, Value};
use std::collections::HashSet;

fn model() -> ShapeModel {
    ShapeModel::from_value(json!({
        "metadata": { "apiVersion": "2015-01-01", "protocol": "query", "serviceId": "Test" },
        "operations": {
            "Foo": { "name": "Foo", "input": { "shape": "FooRequest" } },
            "SetName": { "name": "SetName", "input": { "shape": "SetNameRequest" } },
            "Toggle": { "name": "Toggle", "input": { "shape": "ToggleRequest" } },
            "PutItems": { "name": "PutItems", "input": { "shape": "PutItemsRequest" } },
            "PutFlatItems": { "name": "PutFlatItems", "input": { "shape": "PutFlatItemsRequest" } },
            "PutNamedItems": { "name": "PutNamedItems", "input": { "shape": "PutNamedItemsRequest" } },
            "PutEntries": { "name": "PutEntries", "input": { "shape": "PutEntriesRequest" } },
            "TagResource": { "name": "TagResource", "input": { "shape": "TagResourceRequest" } },
            "FlatTags": { "name": "FlatTags", "input": { "shape": "FlatTagsRequest" } },
            "SendEmail": { "name": "SendEmail", "input": { "shape": "SendEmailRequest" } },
            "Schedule": { "name": "Schedule", "input": { "shape": "ScheduleRequest" } },
            "Upload": { "name": "Upload", "input": { "shape": "UploadRequest" } },
            "Measure": { "name": "Measure", "input": { "shape": "MeasureRequest" } },
            "Route": { "name": "Route", "input": { "shape": "RouteRequest" } },
            "PutGrid": { "name": "PutGrid", "input": { "shape": "PutGridRequest" } },
            "PutRules": { "name": "PutRules", "input": { "shape": "PutRulesRequest" } },
            "PutChunks": { "name": "PutChunks", "input": { "shape": "PutChunksRequest" } },
            "PutLevels": { "name": "PutLevels", "input": { "shape": "PutLevelsRequest" } }
        },
        "shapes": {
            "FooRequest": { "type": "structure", "members": {} },
            "SetNameRequest": {
                "type": "structure",
                "members": { "Name": { "shape": "String" } }
            },
            "ToggleRequest": {
                "type": "structure",
                "required": ["Enabled", "Body"],
                "members": {
                    "Enabled": { "shape": "Boolean" },
                    "Body": { "shape": "Blob" }
                }
            },
            "PutItemsRequest": {
                "type": "structure",
                "members": { "Items": { "shape": "StringList" } }
            },
            "PutFlatItemsRequest": {
                "type": "structure",
                "members": { "Items": { "shape": "FlatItemList" } }
            },
            "PutNamedItemsRequest": {
                "type": "structure",
                "members": { "Items": { "shape": "ItemList" } }
            },
            "PutEntriesRequest": {
                "type": "structure",
                "members": { "Entries": { "shape": "ItemList", "flattened": true } }
            },
            "TagResourceRequest": {
                "type": "structure",
                "members": {
                    "ResourceId": { "shape": "String", "location": "uri", "locationName": "id" },
                    "Tags": { "shape": "TagMap" },
                    "Token": { "shape": "String", "location": "header", "locationName": "x-token" },
                    "Page": { "shape": "Integer", "location": "querystring", "locationName": "page" }
                }
            },
            "FlatTagsRequest": {
                "type": "structure",
                "members": { "Attributes": { "shape": "NamedMap", "flattened": true } }
            },
            "SendEmailRequest": {
                "type": "structure",
                "required": ["Source", "Destination"],
                "members": {
                    "Source": { "shape": "String" },
                    "Destination": { "shape": "Destination" },
                    "Groups": { "shape": "GroupList" },
                    "Priority": { "shape": "Integer", "queryName": "Prio" }
                }
            },
            "Destination": {
                "type": "structure",
                "members": {
                    "ToAddresses": { "shape": "StringList" },
                    "CcAddresses": { "shape": "StringList" }
                }
            },
            "GroupList": { "type": "list", "member": { "shape": "Group" } },
            "Group": {
                "type": "structure",
                "members": { "Members": { "shape": "StringList" } }
            },
            "ScheduleRequest": {
                "type": "structure",
                "members": { "At": { "shape": "Timestamp" } }
            },
            "UploadRequest": {
                "type": "structure",
                "payload": "Body",
                "members": { "Body": { "shape": "Stream" } }
            },
            "MeasureRequest": {
                "type": "structure",
                "members": { "Value": { "shape": "Long" } }
            },
            "RouteRequest": {
                "type": "structure",
                "members": { "Dest": { "shape": "Dest" } }
            },
            "Dest": {
                "type": "structure",
                "members": {
                    "Name": { "shape": "String" },
                    "Parent": { "shape": "Dest" },
                    "Children": { "shape": "DestList" }
                }
            },
            "DestList": { "type": "list", "member": { "shape": "Dest" } },
            "PutGridRequest": {
                "type": "structure",
                "members": { "Grid": { "shape": "Grid" } }
            },
            "Grid": { "type": "list", "member": { "shape": "Row" } },
            "Row": { "type": "list", "member": { "shape": "Cell" } },
            "Cell": {
                "type": "structure",
                "required": ["Value"],
                "members": { "Value": { "shape": "String" } }
            },
            "PutRulesRequest": {
                "type": "structure",
                "members": { "Rules": { "shape": "RuleMap" } }
            },
            "RuleMap": { "type": "map", "key": { "shape": "String" }, "value": { "shape": "Rule" } },
            "Rule": {
                "type": "structure",
                "members": {
                    "Name": { "shape": "String" },
                    "Limit": { "shape": "Integer" }
                }
            },
            "PutChunksRequest": {
                "type": "structure",
                "members": { "Chunks": { "shape": "BlobList" } }
            },
            "BlobList": { "type": "list", "member": { "shape": "Blob" } },
            "PutLevelsRequest": {
                "type": "structure",
                "members": { "Levels": { "shape": "LevelMap" } }
            },
            "LevelMap": { "type": "map", "key": { "shape": "String" }, "value": { "shape": "Level" } },
            "Level": { "type": "string", "enum": ["low", "high"] },
            "StringList": { "type": "list", "member": { "shape": "String" } },
            "FlatItemList": {
                "type": "list",
                "member": { "shape": "String", "locationName": "Item" },
                "flattened": true
            },
            "ItemList": { "type": "list", "member": { "shape": "String", "locationName": "Item" } },
            "TagMap": { "type": "map", "key": { "shape": "String" }, "value": { "shape": "String" } },
            "NamedMap": {
                "type": "map",
                "key": { "shape": "String", "locationName": "Name" },
                "value": { "shape": "String", "locationName": "Value" }
            },
            "Stream": { "type": "blob", "streaming": true },
            "Blob": { "type": "blob" },
            "Boolean": { "type": "boolean" },
            "Integer": { "type": "integer" },
            "Long": { "type": "long" },
            "Timestamp": { "type": "timestamp" },
            "String": { "type": "string" }
        }
    }))
    .unwrap()
}

fn body(operation: &str, input: Value) -> String {
    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    let generated = generator.generate_operation(operation).unwrap();
    let dto = generator.types().create(generated.shape(), input).unwrap();
    let bytes = generated.serialize(&dto).unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn source(operation: &str) -> String {
    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    generator.generate_operation(operation).unwrap();
    generator.sink().find(operation).unwrap().source.clone()
}

fn empty() -> Value {
    Value::bag(Vec::<(&str, Value)>::new())
}

#[test]
fn empty_operation() {
    assert_eq!(body("Foo", empty()), "Action=Foo&Version=2015-01-01");
}

#[test]
fn optional_scalar_present_and_absent() {
    assert_eq!(
        body("SetName", Value::bag([("Name", "x")])),
        "Action=SetName&Version=2015-01-01&Name=x"
    );
    assert_eq!(body("SetName", empty()), "Action=SetName&Version=2015-01-01");
    assert_eq!(
        body("SetName", Value::bag([("Name", Value::Null)])),
        "Action=SetName&Version=2015-01-01"
    );
}

#[test]
fn values_are_form_encoded() {
    assert_eq!(
        body("SetName", Value::bag([("Name", "a b&c=d/é")])),
        "Action=SetName&Version=2015-01-01&Name=a+b%26c%3Dd%2F%C3%A9"
    );
}

#[test]
fn boolean_and_blob_leaves() {
    let input = Value::bag([("Enabled", Value::from(true)), ("Body", Value::from(Blob::new("abc")))]);
    assert_eq!(
        body("Toggle", input),
        "Action=Toggle&Version=2015-01-01&Enabled=true&Body=YWJj"
    );
    // blob members also take their bytes as a string
    let input = Value::bag([("Enabled", Value::from(false)), ("Body", Value::from("abc"))]);
    assert_eq!(
        body("Toggle", input),
        "Action=Toggle&Version=2015-01-01&Enabled=false&Body=YWJj"
    );
}

#[test]
fn absent_required_blob_is_empty() {
    assert_eq!(body("Toggle", empty()), "Action=Toggle&Version=2015-01-01&Body=");
}

#[test]
fn lists() {
    let items = || Value::bag([("Items", Value::from(vec!["a", "b"]))]);
    assert_eq!(
        body("PutItems", items()),
        "Action=PutItems&Version=2015-01-01&Items.member.1=a&Items.member.2=b"
    );
    assert_eq!(
        body("PutFlatItems", items()),
        "Action=PutFlatItems&Version=2015-01-01&Items.1=a&Items.2=b"
    );
    assert_eq!(
        body("PutNamedItems", items()),
        "Action=PutNamedItems&Version=2015-01-01&Items.Item.1=a&Items.Item.2=b"
    );
    assert_eq!(body("PutItems", empty()), "Action=PutItems&Version=2015-01-01");
}

#[test]
fn flattened_member_takes_element_name() {
    let input = Value::bag([("Entries", Value::from(vec!["a", "b"]))]);
    assert_eq!(
        body("PutEntries", input),
        "Action=PutEntries&Version=2015-01-01&Item.1=a&Item.2=b"
    );
}

#[test]
fn maps() {
    let input = Value::bag([("Tags", Value::bag([("k1", "v1")]))]);
    assert_eq!(
        body("TagResource", input),
        "Action=TagResource&Version=2015-01-01&Tags.entry.1.key=k1&Tags.entry.1.value=v1"
    );

    let input = Value::bag([("Attributes", Value::bag([("a", "1"), ("b", "2")]))]);
    assert_eq!(
        body("FlatTags", input),
        "Action=FlatTags&Version=2015-01-01\
         &Attributes.1.Name=a&Attributes.1.Value=1\
         &Attributes.2.Name=b&Attributes.2.Value=2"
    );
}

#[test]
fn located_members_stay_out_of_the_body() {
    let input = Value::bag([
        ("ResourceId", Value::from("r-1")),
        ("Token", Value::from("secret")),
        ("Page", Value::from(2)),
    ]);
    assert_eq!(body("TagResource", input), "Action=TagResource&Version=2015-01-01");
    let source = source("TagResource");
    assert!(!source.contains("resource_id"));
    assert!(!source.contains("token"));
    assert!(!source.contains("page"));
}

#[test]
fn nested_structures_and_lists() {
    let input = Value::bag([
        ("Source", Value::from("me@example.com")),
        (
            "Destination",
            Value::bag([("ToAddresses", Value::from(vec!["a@example.com", "b@example.com"]))]),
        ),
        (
            "Groups",
            Value::from(vec![
                Value::bag([("Members", Value::from(vec!["x", "y"]))]),
                Value::bag([("Members", Value::from(vec!["z"]))]),
            ]),
        ),
        ("Priority", Value::from(5)),
    ]);
    assert_eq!(
        body("SendEmail", input),
        "Action=SendEmail&Version=2015-01-01\
         &Source=me%40example.com\
         &Destination.ToAddresses.member.1=a%40example.com\
         &Destination.ToAddresses.member.2=b%40example.com\
         &Groups.member.1.Members.member.1=x\
         &Groups.member.1.Members.member.2=y\
         &Groups.member.2.Members.member.1=z\
         &Prio=5"
    );
}

#[test]
fn timestamps_use_offset_format() {
    let at = time::macros::datetime!(2005-08-15 15:52:01 +2);
    assert_eq!(
        body("Schedule", Value::bag([("At", at)])),
        "Action=Schedule&Version=2015-01-01&At=2005-08-15T15%3A52%3A01%2B02%3A00"
    );
}

#[test]
fn payload_member_is_the_body() {
    assert_eq!(body("Upload", Value::bag([("Body", "raw bytes")])), "raw bytes");
    assert_eq!(body("Upload", empty()), "");
}

#[test]
fn loop_indexes_never_collide() {
    let source = source("SendEmail");
    let declared: Vec<&str> = source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("let mut "))
        .filter_map(|rest| rest.strip_suffix(" = 0;"))
        .collect();
    // Destination.ToAddresses, Destination.CcAddresses, Groups and Groups.Members
    assert_eq!(declared.len(), 4);
    let unique: HashSet<_> = declared.iter().collect();
    assert_eq!(unique.len(), declared.len());
}

#[test]
fn generated_request_body() {
    let source = source("SendEmail");
    let expected = r#"    pub fn request_body(input: &crate::model::SendEmailRequest) -> bytes::Bytes {
        let mut payload = shapegen_query::QueryPayload::new("SendEmail", "2015-01-01");
        if let Some(v0) = &input.source {
            payload.insert("Source", v0.as_str());
        }
        if let Some(v1) = &input.destination {
            let mut idx2 = 0;
            for v3 in &v1.to_addresses {
                idx2 += 1;
                payload.insert(format!("Destination.ToAddresses.member.{}", idx2), v3.as_str());
            }
            let mut idx4 = 0;
            for v5 in &v1.cc_addresses {
                idx4 += 1;
                payload.insert(format!("Destination.CcAddresses.member.{}", idx4), v5.as_str());
            }
        }
        let mut idx6 = 0;
        for v7 in &input.groups {
            idx6 += 1;
            let mut idx8 = 0;
            for v9 in &v7.members {
                idx8 += 1;
                payload.insert(format!("Groups.member.{}.Members.member.{}", idx6, idx8), v9.as_str());
            }
        }
        if let Some(v10) = &input.priority {
            payload.insert("Prio", v10.to_string());
        }
        bytes::Bytes::from(payload.into_body())
    }
"#;
    assert!(source.contains(expected), "{}", source);
}

#[test]
fn unsupported_scalar_aborts_generation() {
    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    let err = generator.generate_operation("Measure").unwrap_err();
    assert!(matches!(
        &err,
        CodegenError::UnsupportedScalar { shape, scalar } if shape == "Long" && scalar == "long"
    ));
    assert_eq!(err.to_string(), "type long is not yet implemented (shape `Long`)");
}

#[test]
fn runtime_type_mismatch_is_rejected() {
    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    let generated = generator.generate_operation("SetName").unwrap();
    let err = generator
        .types()
        .create(generated.shape(), Value::bag([("Name", vec!["a"])]))
        .unwrap_err();
    assert_eq!(err.member(), "Name");
}

#[test]
fn recursive_inputs_terminate() {
    let input = Value::bag([(
        "Dest",
        Value::bag([
            ("Name", Value::from("a")),
            (
                "Parent",
                Value::bag([
                    ("Name", Value::from("b")),
                    ("Parent", Value::bag([("Name", "c")])),
                ]),
            ),
            ("Children", Value::from(vec![Value::bag([("Name", "d")])])),
        ]),
    )]);
    assert_eq!(
        body("Route", input),
        "Action=Route&Version=2015-01-01\
         &Dest.Name=a\
         &Dest.Parent.Name=b\
         &Dest.Parent.Parent.Name=c\
         &Dest.Children.member.1.Name=d"
    );
}

#[test]
fn recursive_structures_are_serialized_through_a_helper() {
    let source = source("Route");
    let expected = r#"    pub fn request_body(input: &crate::model::RouteRequest) -> bytes::Bytes {
        fn serialize_dest(payload: &mut shapegen_query::QueryPayload, prefix: &str, v3: &crate::model::Dest) {
            if let Some(v4) = &v3.name {
                payload.insert(format!("{}.Name", prefix), v4.as_str());
            }
            if let Some(v5) = &v3.parent {
                serialize_dest(payload, &format!("{}.Parent", prefix), v5);
            }
            let mut idx6 = 0;
            for v7 in &v3.children {
                idx6 += 1;
                serialize_dest(payload, &format!("{}.Children.member.{}", prefix, idx6), v7);
            }
        }

        let mut payload = shapegen_query::QueryPayload::new("Route", "2015-01-01");
        if let Some(v0) = &input.dest {
            if let Some(v1) = &v0.name {
                payload.insert("Dest.Name", v1.as_str());
            }
            if let Some(v2) = &v0.parent {
                serialize_dest(&mut payload, "Dest.Parent", v2);
            }
            let mut idx8 = 0;
            for v9 in &v0.children {
                idx8 += 1;
                serialize_dest(&mut payload, &format!("Dest.Children.member.{}", idx8), v9);
            }
        }
        bytes::Bytes::from(payload.into_body())
    }
"#;
    assert!(source.contains(expected), "{}", source);
}

#[test]
fn lists_of_lists_of_structures() {
    let cell = |value: &str| Value::bag([("Value", value)]);
    let input = Value::bag([(
        "Grid",
        Value::from(vec![
            Value::from(vec![cell("a"), cell("b")]),
            Value::from(vec![cell("c")]),
        ]),
    )]);
    assert_eq!(
        body("PutGrid", input),
        "Action=PutGrid&Version=2015-01-01\
         &Grid.member.1.member.1.Value=a\
         &Grid.member.1.member.2.Value=b\
         &Grid.member.2.member.1.Value=c"
    );

    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    let generated = generator.generate_operation("PutGrid").unwrap();
    let input = Value::bag([("Grid", Value::from(vec![Value::from(vec![empty()])]))]);
    let dto = generator.types().create(generated.shape(), input).unwrap();
    assert_eq!(
        generator.types().validate(&dto).unwrap_err().to_string(),
        "Missing parameter \"Value\" when validating the \"crate::model::Cell\". The value cannot be null."
    );
}

#[test]
fn map_values_that_are_structures() {
    let input = Value::bag([(
        "Rules",
        Value::bag([("r1", Value::bag([("Name", Value::from("n")), ("Limit", Value::from(3))]))]),
    )]);
    assert_eq!(
        body("PutRules", input),
        "Action=PutRules&Version=2015-01-01\
         &Rules.entry.1.key=r1\
         &Rules.entry.1.value.Name=n\
         &Rules.entry.1.value.Limit=3"
    );
}

#[test]
fn blobs_inside_lists() {
    let input = Value::bag([(
        "Chunks",
        Value::from(vec![Value::from("abc"), Value::from(Blob::new("hi"))]),
    )]);
    assert_eq!(
        body("PutChunks", input),
        "Action=PutChunks&Version=2015-01-01&Chunks.member.1=YWJj&Chunks.member.2=aGk%3D"
    );
    assert!(source("PutChunks").contains("shapegen_query::fmt_blob(v1)"));
}

#[test]
fn enums_inside_map_values() {
    let input = Value::bag([("Levels", Value::bag([("cpu", "high"), ("disk", "low")]))]);
    assert_eq!(
        body("PutLevels", input),
        "Action=PutLevels&Version=2015-01-01\
         &Levels.entry.1.key=cpu&Levels.entry.1.value=high\
         &Levels.entry.2.key=disk&Levels.entry.2.value=low"
    );

    let model = model();
    let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
    let generated = generator.generate_operation("PutLevels").unwrap();
    let input = Value::bag([("Levels", Value::bag([("cpu", "max")]))]);
    let dto = generator.types().create(generated.shape(), input).unwrap();
    assert_eq!(
        generator.types().validate(&dto).unwrap_err().to_string(),
        "Invalid parameter \"Levels\" when validating the \"crate::model::PutLevelsRequest\". The value \"max\" is not a valid \"Level\"."
    );
}
