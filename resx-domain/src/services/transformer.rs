// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Transformer trait and registry (§4.I): name-addressable transformations
//! with options, applied by the transform producer (§4.H).

use crate::entities::Resource;
use crate::ResourceError;
use std::collections::HashMap;
use std::sync::Arc;

/// A named, parametric content-transforming function. `transform` may
/// replace a resource's content (eager or streaming) but must not
/// rewrite its reference — the transform producer owns reference
/// construction on the transformer's behalf (§4.I).
pub trait Transformer: Send + Sync {
    fn transform(&self, resource: Resource, options: &serde_json::Value) -> Result<Resource, ResourceError>;
}

/// Name-addressable registry the embedding application populates at
/// startup. Resolving an unregistered name yields
/// `InvalidReference("transformation (<name>) does not exist")` per
/// §4.H, matched verbatim by the transform producer's URI parser.
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    entries: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, transformer: Arc<dyn Transformer>) {
        self.entries.insert(name.into(), transformer);
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Transformer>, ResourceError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::invalid_reference(format!("transformation ({name}) does not exist")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
