/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Destination for generated units.

use crate::naming::TypeName;

/// One generated source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub type_name: TypeName,
    pub source: String,
}

pub trait OutputSink {
    fn persist(&mut self, unit: OutputUnit);
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn persist(&mut self, unit: OutputUnit) {
        (**self).persist(unit)
    }
}

/// Keeps every persisted unit in memory, in persistence order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    units: Vec<OutputUnit>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[OutputUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<OutputUnit> {
        self.units
    }

    /// Most recent unit persisted under `name` (matched against the bare type name).
    pub fn find(&self, name: &str) -> Option<&OutputUnit> {
        self.units.iter().rev().find(|u| u.type_name.name() == name)
    }
}

impl OutputSink for MemorySink {
    fn persist(&mut self, unit: OutputUnit) {
        self.units.push(unit);
    }
}
