// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::MediaType;
use crate::ResourceError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One unit produced by a [`ContentStream`]. Chunks may be binary or
/// opaque (§3): a binary chunk is raw bytes; an opaque chunk is any
/// JSON-representable value a non-byte media type (e.g.
/// `application/x.resx.term`) wants to pass through without committing
/// to a byte encoding until a reducer asks for one.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Binary(Vec<u8>),
    Value(serde_json::Value),
}

impl Chunk {
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            Self::Value(_) => None,
        }
    }
}

/// Materialised content, produced by [`data`] from a list of chunks.
/// Mirrors the "concatenate if all byte strings, else collect a list"
/// default combiner behaviour from §4.A.
#[derive(Debug, Clone, PartialEq)]
pub enum EagerData {
    Bytes(Vec<u8>),
    Values(Vec<Chunk>),
}

impl EagerData {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Values(_) => None,
        }
    }
}

/// A configurable combiner: materialises a chunk list into one [`EagerData`]
/// value. Pluggable per §6 `content_combiner` configuration key.
pub type Combiner = Arc<dyn Fn(Vec<Chunk>) -> EagerData + Send + Sync>;

/// A configurable reducer: maps one chunk to the byte representation a
/// given "kind" (e.g. `"binary"`, used for hashing) needs. Pluggable per
/// §6 `content_reducer` configuration key, keyed by media type.
pub type Reducer = Arc<dyn Fn(&Chunk) -> Vec<u8> + Send + Sync>;

/// Default combiner: concatenates if every chunk is binary, else collects
/// the chunks verbatim into a list.
pub fn default_combiner(chunks: Vec<Chunk>) -> EagerData {
    if chunks.iter().all(|c| matches!(c, Chunk::Binary(_))) {
        let mut out = Vec::new();
        for c in chunks {
            if let Chunk::Binary(b) = c {
                out.extend(b);
            }
        }
        EagerData::Bytes(out)
    } else {
        EagerData::Values(chunks)
    }
}

/// The only built-in reducer kind (§4.A): reduces any chunk to its raw
/// byte representation, serialising opaque values as compact JSON.
pub fn binary_reducer(chunk: &Chunk) -> Vec<u8> {
    match chunk {
        Chunk::Binary(b) => b.clone(),
        Chunk::Value(v) => serde_json::to_vec(v).unwrap_or_default(),
    }
}

/// A lazy chunk producer. Model per §9: "a single `reduce(init, step)`
/// entry point". Streams are single-writer and, by default, single-shot
/// (§5): driving a stream a second time is implementation-defined but
/// must not silently return empty, so we surface a `ResourceError::Internal`
/// on reuse.
pub trait ChunkProducer: Send + Sync {
    fn produce(&self, sink: &mut dyn FnMut(Chunk) -> Result<(), ResourceError>) -> Result<(), ResourceError>;
}

/// A stream wrapping a [`ChunkProducer`], tracking whether it has already
/// been driven once.
#[derive(Clone)]
pub struct ContentStream {
    producer: Arc<dyn ChunkProducer>,
    consumed: Arc<AtomicBool>,
}

impl ContentStream {
    pub fn new(producer: Arc<dyn ChunkProducer>) -> Self {
        Self { producer, consumed: Arc::new(AtomicBool::new(false)) }
    }

    /// Drives the producer, folding `step` over each chunk in production
    /// order. Fails if the stream was already reduced once.
    pub fn reduce<A>(&self, init: A, mut step: impl FnMut(A, Chunk) -> A) -> Result<A, ResourceError> {
        if self.consumed.swap(true, Ordering::SeqCst) {
            return Err(ResourceError::internal("content stream already consumed"));
        }
        let mut acc = Some(init);
        self.producer.produce(&mut |chunk| {
            let current = acc.take().expect("reduce step invariant: acc always present");
            acc = Some(step(current, chunk));
            Ok(())
        })?;
        Ok(acc.expect("producer always calls sink at least zero times"))
    }

    /// Materialises all chunks into a `Vec`, consuming the stream.
    pub fn collect(&self) -> Result<Vec<Chunk>, ResourceError> {
        self.reduce(Vec::new(), |mut acc, chunk| {
            acc.push(chunk);
            acc
        })
    }
}

impl std::fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStream")
            .field("consumed", &self.consumed.load(Ordering::Relaxed))
            .finish()
    }
}

/// Typed payload: either eager (already materialised) or streaming
/// (a lazy chunk sequence). §3.
#[derive(Debug, Clone)]
pub enum Content {
    Eager { media_type: MediaType, data: EagerData },
    Stream { media_type: MediaType, stream: ContentStream },
}

impl Content {
    pub fn media_type(&self) -> &MediaType {
        match self {
            Self::Eager { media_type, .. } => media_type,
            Self::Stream { media_type, .. } => media_type,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream { .. })
    }

    /// `data(c)`: materialises a stream into `EagerData` via `combiner`;
    /// identity (a clone) on already-eager content.
    pub fn data(&self, combiner: &Combiner) -> Result<EagerData, ResourceError> {
        match self {
            Self::Eager { data, .. } => Ok(data.clone()),
            Self::Stream { stream, .. } => {
                let chunks = stream.collect()?;
                Ok(combiner(chunks))
            }
        }
    }

    /// `new(c)`: promotes a stream to eager content by invoking `data`;
    /// identity on already-eager content.
    pub fn new_eager(&self, combiner: &Combiner) -> Result<Content, ResourceError> {
        match self {
            Self::Eager { .. } => Ok(self.clone()),
            Self::Stream { media_type, .. } => {
                Ok(Content::Eager { media_type: media_type.clone(), data: self.data(combiner)? })
            }
        }
    }

    /// `reducer(c, kind)`: returns the reducer for the given kind. Only
    /// `"binary"` is built in; any other kind falls back to it unless a
    /// `content_reducer` override is supplied by the caller.
    pub fn reducer(_kind: &str, override_reducer: Option<&Reducer>) -> Reducer {
        if let Some(r) = override_reducer {
            return r.clone();
        }
        // "binary" is the only built-in kind; anything else without an
        // explicit content_reducer override degrades to it.
        Arc::new(binary_reducer)
    }
}
