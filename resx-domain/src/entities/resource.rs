// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{Content, Reference};
use crate::value_objects::Meta;

/// `(Reference, Content, Meta)` — §3. Immutable by contract: a `Resource`
/// is never mutated in place, only replaced by constructing a new value.
/// A `Resource` exclusively owns its `Content` and `Reference`.
#[derive(Debug, Clone)]
pub struct Resource {
    pub reference: Reference,
    pub content: Content,
    pub meta: Meta,
}

impl Resource {
    pub fn new(reference: Reference, content: Content, meta: Meta) -> Self {
        Self { reference, content, meta }
    }

    pub fn without_meta(reference: Reference, content: Content) -> Self {
        Self { reference, content, meta: Meta::new() }
    }
}
