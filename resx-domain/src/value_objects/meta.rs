// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A side-channel value persisted alongside a stored resource but never
/// hashed. Modeled as a small closed enum rather than a free-form `Any` so
/// the sidecar encoding (see [`crate::value_objects::meta::Meta`] docs and
/// `DESIGN.md`) stays self-delimiting without a schema registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Bool(bool),
}

/// Side-channel key/value list persisted alongside stored resources but
/// never hashed (§3). `BTreeMap` gives deterministic iteration order for
/// the sidecar encoding.
pub type Meta = BTreeMap<String, MetaValue>;
