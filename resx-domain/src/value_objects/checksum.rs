// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// `(algorithm_name, digest)`. Present or absent on an [`crate::entities::Integrity`];
/// never conflate "absent" with a zero digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: String,
    #[serde(with = "hex_bytes")]
    pub digest: Vec<u8>,
}

impl Checksum {
    pub fn new(algorithm: impl Into<String>, digest: Vec<u8>) -> Self {
        Self { algorithm: algorithm.into(), digest }
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(&self.digest)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// A hashing strategy, per §4.F.3: either a fixed built-in algorithm name,
/// a `(name, fn)` whole-buffer hasher, or a `(name, init, update, final)`
/// incremental hasher whose running state is an opaque byte blob threaded
/// through the three callbacks.
#[derive(Clone)]
pub enum HashAlgorithm {
    /// Resolved against the small built-in registry (currently "sha256").
    Named(String),
    /// `(name, fn)`: hash a fully materialised buffer in one call.
    WholeBuffer {
        name: String,
        hash: Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>,
    },
    /// `(name, init, update, final)`: drive the hash over stream chunks.
    Incremental {
        name: String,
        init: Arc<dyn Fn() -> Vec<u8> + Send + Sync>,
        update: Arc<dyn Fn(Vec<u8>, &[u8]) -> Vec<u8> + Send + Sync>,
        finalize: Arc<dyn Fn(Vec<u8>) -> Vec<u8> + Send + Sync>,
    },
}

impl HashAlgorithm {
    pub fn sha256() -> Self {
        Self::Named("sha256".to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Named(n) => n,
            Self::WholeBuffer { name, .. } => name,
            Self::Incremental { name, .. } => name,
        }
    }

    /// Hash a fully materialised buffer, dispatching to the built-in
    /// registry or the supplied callback depending on variant.
    pub fn hash_buffer(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Named(name) if name == "sha256" => {
                let mut hasher = Sha256::new();
                hasher.update(data);
                hasher.finalize().to_vec()
            }
            Self::Named(_unknown) => {
                // Unknown built-in names degrade to sha256 rather than panic;
                // a registry miss is a configuration error, not a crash.
                let mut hasher = Sha256::new();
                hasher.update(data);
                hasher.finalize().to_vec()
            }
            Self::WholeBuffer { hash, .. } => hash(data),
            Self::Incremental { init, update, finalize, .. } => {
                finalize(update(init(), data))
            }
        }
    }

    /// Drive the incremental state machine over a sequence of chunks.
    /// Named/whole-buffer algorithms fall back to buffering the chunks.
    pub fn hash_chunks<'a>(&self, chunks: impl Iterator<Item = &'a [u8]>) -> Vec<u8> {
        match self {
            Self::Incremental { init, update, finalize, .. } => {
                let mut state = init();
                for chunk in chunks {
                    state = update(state, chunk);
                }
                finalize(state)
            }
            Self::Named(name) if name == "sha256" => {
                let mut hasher = Sha256::new();
                for chunk in chunks {
                    hasher.update(chunk);
                }
                hasher.finalize().to_vec()
            }
            _ => {
                let buffer: Vec<u8> = chunks.flatten().copied().collect();
                self.hash_buffer(&buffer)
            }
        }
    }
}

impl std::fmt::Debug for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashAlgorithm").field("name", &self.name()).finish()
    }
}
