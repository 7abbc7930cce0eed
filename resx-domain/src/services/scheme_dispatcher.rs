// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The scheme dispatcher (§4.E): maps a URI scheme, or a reference's
//! embedded adapter, to the producer that handles it.

use crate::entities::Reference;
use crate::services::producer::Producer;
use crate::ResourceError;
use std::collections::HashMap;
use std::sync::Arc;

/// One scheme-dispatcher configuration entry: either a producer (whose
/// declared `schemes()` become keys) or an explicit `(scheme, producer)`
/// binding that overrides a producer's own scheme declaration.
pub enum DispatcherEntry {
    Producer(Arc<dyn Producer>),
    Binding(String, Arc<dyn Producer>),
}

/// Merges configuration entries over a set of defaults to yield a final
/// scheme→producer mapping, then resolves URIs/references against it.
///
/// Per §9, the dispatcher's mapping is process-wide and must be re-read
/// (re-resolved) per operation rather than cached by callers — this type
/// is cheap to rebuild; the embedding application is expected to hold it
/// behind something it can hot-swap (e.g. an `ArcSwap` or a fresh build
/// per request) rather than memoise resolution results.
#[derive(Clone, Default)]
pub struct SchemeDispatcher {
    by_scheme: HashMap<String, Arc<dyn Producer>>,
}

impl SchemeDispatcher {
    /// Builds the mapping from `defaults` overlaid by `entries`, in
    /// order — later entries win on scheme collisions.
    pub fn new(defaults: Vec<DispatcherEntry>, entries: Vec<DispatcherEntry>) -> Self {
        let mut by_scheme = HashMap::new();
        for entry in defaults.into_iter().chain(entries) {
            match entry {
                DispatcherEntry::Producer(producer) => {
                    for scheme in producer.schemes() {
                        by_scheme.insert(scheme.to_string(), producer.clone());
                    }
                }
                DispatcherEntry::Binding(scheme, producer) => {
                    by_scheme.insert(scheme, producer);
                }
            }
        }
        Self { by_scheme }
    }

    pub fn producer_for_scheme(&self, scheme: &str) -> Option<Arc<dyn Producer>> {
        self.by_scheme.get(scheme).cloned()
    }

    /// `producer_of(uri_or_reference)` (§4.E): prefers the adapter
    /// embedded in a reference (a reference is adapter-exclusive). Adapter
    /// ids line up with scheme strings in this system (each producer
    /// names itself after the scheme it owns), so resolution reuses the
    /// scheme map directly.
    pub fn producer_of_reference(&self, reference: &Reference) -> Result<Arc<dyn Producer>, ResourceError> {
        self.by_scheme
            .get(reference.adapter_id.as_str())
            .cloned()
            .ok_or_else(|| ResourceError::invalid_reference("no producer for URI"))
    }

    pub fn producer_of_uri(&self, uri: &str) -> Result<Arc<dyn Producer>, ResourceError> {
        let scheme = uri_scheme(uri).ok_or_else(|| ResourceError::invalid_reference("no producer for URI"))?;
        self.producer_for_scheme(scheme).ok_or_else(|| ResourceError::invalid_reference("no producer for URI"))
    }
}

/// Extracts the scheme component (everything before the first `:`) of a
/// URI, rejecting schemes embedded after a `/` (which would mean there
/// was no scheme at all).
pub fn uri_scheme(uri: &str) -> Option<&str> {
    let (scheme, rest) = uri.split_once(':')?;
    if scheme.is_empty() || scheme.contains('/') || rest.is_empty() {
        return None;
    }
    Some(scheme)
}
