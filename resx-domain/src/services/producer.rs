// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The producer contract (§4.F): the uniform operation set every
//! scheme-specific adapter implements, wrapped by the application-layer
//! façade.

use crate::entities::{Reference, Resource};
use crate::ResourceError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Per-operation options, passed through to the producer uninterpreted
/// by the façade. Concrete producers define their own option keys (e.g.
/// the file producer's `path`/`node`/`modes`/`bytes` for `store`).
pub type ProducerOptions = BTreeMap<String, serde_json::Value>;

/// How a producer participates in the façade's cache-miss recovery path
/// (§4.F, §4.J): whether an `UnknownResource` from `open`/`stream`
/// should trigger resolving the reference's source and re-storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCompatibility {
    /// No fallback; `UnknownResource` propagates.
    Incompatible,
    /// The façade performs the fallback (resolve source, open it, call
    /// `prepare_store`, re-return).
    CompatibleDefault,
    /// The producer handles its own fallback internally; the façade does
    /// nothing extra.
    CompatibleInternal,
}

/// The uniform operation set implemented by every scheme adapter (§4.F).
///
/// Domain-pure producers (data, transform) can implement every method
/// synchronously under the hood; the trait is `async` throughout because
/// the file producer's remote dispatch (§4.K.3) may suspend on an RPC
/// hop, and the façade must treat every producer uniformly.
#[async_trait]
pub trait Producer: Send + Sync {
    /// The nonempty set of URI schemes this producer handles.
    fn schemes(&self) -> &'static [&'static str];

    /// Parses a URI this producer owns into a `Reference`, the inverse of
    /// `uri(ref)`. Called by the façade before `open`/`stream` when the
    /// caller supplies a URI string rather than a typed reference.
    fn reference_of(&self, uri: &str) -> Result<Reference, ResourceError>;

    async fn open(&self, reference: &Reference, options: &ProducerOptions) -> Result<Resource, ResourceError>;

    async fn stream(&self, reference: &Reference, options: &ProducerOptions) -> Result<Resource, ResourceError>;

    async fn exists(&self, reference: &Reference) -> Result<bool, ResourceError>;

    /// No error channel (§4.F): producers that could error (e.g. a
    /// remote existence check) degrade to `false`.
    async fn alike(&self, a: &Reference, b: &Reference) -> bool;

    async fn source(&self, reference: &Reference) -> Result<Option<Reference>, ResourceError>;

    fn uri(&self, reference: &Reference) -> Result<String, ResourceError>;

    async fn attribute(&self, reference: &Reference, key: &str) -> Result<serde_json::Value, ResourceError>;

    async fn attributes(&self, reference: &Reference) -> Result<BTreeMap<String, serde_json::Value>, ResourceError>;

    async fn attribute_keys(&self, reference: &Reference) -> Result<Vec<String>, ResourceError>;

    /// §4.F cache-miss recovery: whether this producer opts into the
    /// façade's fallback, and whether the fallback is the façade's
    /// default implementation or handled internally.
    fn source_compatibility(&self) -> SourceCompatibility {
        SourceCompatibility::Incompatible
    }

    /// Producers that accept the façade's default cache-miss fallback
    /// implement this to persist a recovered resource at the reference's
    /// location. Unused by `Incompatible`/`CompatibleInternal` producers.
    async fn prepare_store(&self, _reference: &Reference, resource: Resource) -> Result<Resource, ResourceError> {
        Ok(resource)
    }
}
