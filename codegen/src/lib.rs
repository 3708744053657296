/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Generates typed DTOs and AWSQuery request serializers from AWS service definitions.
//!
//! A [`ShapeModel`] is loaded from the JSON service definition. [`ObjectGenerator`]
//! realizes a Rust DTO type for every structure reachable from a shape, and a
//! [`RequestSerializer`] produces the body of the request each operation sends.
//! [`ServiceGenerator`] ties the two together for whole operations:
//!
//! ```no_run
//! use shapegen::{CodegenSettings, MemorySink, ServiceGenerator, ShapeModel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ShapeModel::from_json(&std::fs::read_to_string("email-2010-12-01.json")?)?;
//! let mut generator = ServiceGenerator::new(&model, CodegenSettings::default(), MemorySink::new());
//! generator.generate_operation("SendEmail")?;
//! for unit in generator.sink().units() {
//!     println!("// {}\n{}", unit.type_name, unit.source);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Everything generated is also kept in an executable form: [`TypeTable`] hydrates and
//! validates instances, and [`BodyProgram::serialize`] builds the exact body the generated
//! `request_body` would send.

pub mod code;
pub mod enums;
pub mod error;
pub mod generator;
pub mod model;
pub mod naming;
pub mod object;
pub mod serializer;
pub mod settings;
pub mod sink;
pub mod types;

pub use crate::error::{CodegenError, ModelError};
pub use crate::generator::{GeneratedOperation, ServiceGenerator};
pub use crate::model::ShapeModel;
pub use crate::object::{ObjectGenerator, TypeTable};
pub use crate::serializer::query::QuerySerializer;
pub use crate::serializer::{BodyProgram, RequestSerializer};
pub use crate::settings::CodegenSettings;
pub use crate::sink::{MemorySink, OutputSink, OutputUnit};
