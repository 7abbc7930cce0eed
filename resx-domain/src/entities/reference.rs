// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::{AdapterId, MediaType, NodeId};
use crate::entities::Integrity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Adapter-private opaque state, §3. Modeled as a closed sum over the
/// three producers this system ships (data, file, transform) rather than
/// a trait-object `Any`: each producer only ever constructs and inspects
/// its own variant, which is what "adapter-exclusive" means in practice,
/// and a closed enum lets every other producer reject a foreign
/// repository at compile time instead of via a runtime downcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Repository {
    /// `(media_type, attribute_map, raw_bytes)` for `data:` references.
    Data { media_type: MediaType, attributes: BTreeMap<String, String>, raw: Vec<u8> },
    /// `(node, path, optional_source_reference)` for `file:` references.
    File { node: NodeId, path: String, source: Option<Box<Reference>> },
    /// `(transformer_id, options, inner_reference)` for `resx-transform:`
    /// references.
    Transform { transformer_id: String, options: serde_json::Value, inner: Box<Reference> },
}

/// `(AdapterId, Repository, Integrity)` — the identity of a resource (§3).
/// Cloneable and serialisable; references are freely shareable, unlike
/// the content they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub adapter_id: AdapterId,
    pub repository: Repository,
    pub integrity: Integrity,
}

impl Reference {
    pub fn new(adapter_id: AdapterId, repository: Repository, integrity: Integrity) -> Self {
        Self { adapter_id, repository, integrity }
    }

    /// The immediately-underlying reference, or `None` if this reference
    /// is a leaf. Glossary: "Source (of a reference)".
    pub fn source(&self) -> Option<&Reference> {
        match &self.repository {
            Repository::Data { .. } => None,
            Repository::File { source, .. } => source.as_deref(),
            Repository::Transform { inner, .. } => Some(inner),
        }
    }

    /// Walks `source()` repeatedly, collecting the full lineage from this
    /// reference down to its leaf. Finite and acyclic by construction
    /// (§9): each wrapper adds exactly one layer.
    pub fn lineage(&self) -> Vec<&Reference> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(next) = current.source() {
            chain.push(next);
            current = next;
        }
        chain
    }
}
