// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use thiserror::Error;

/// The error taxonomy for the resource pipeline.
///
/// Every fallible operation in the system returns one of these four kinds.
/// They are disjoint: a caller can match on the variant to decide recovery
/// without inspecting the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The reference is syntactically or semantically unusable: a bad URI,
    /// an unknown transformer, a path blocked by the access matrix.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The reference is valid but the underlying resource does not exist.
    /// Compatible producers get a chance to recover from this via the
    /// cache-miss path in [`crate::services::producer::SourceCompatibility`].
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// The requested attribute key is not available on this reference.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// Anything else: POSIX errors, RPC transport failures, serialisation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn unknown_resource(msg: impl Into<String>) -> Self {
        Self::UnknownResource(msg.into())
    }

    pub fn unknown_key(msg: impl Into<String>) -> Self {
        Self::UnknownKey(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the cache-miss recovery path in the façade applies to this
    /// error. Only `UnknownResource` is retried; everything else propagates.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownResource(_))
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => Self::UnknownResource(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

/// Ergonomic panic-class wrappers for call sites that want `?`-free code
/// (tests, CLI glue, REPL-style usage). Each wraps the tagged error
/// verbatim in the panic message so the underlying [`ResourceError`] is
/// still discoverable by a human reading the output.
#[macro_export]
macro_rules! unwrap_or_panic {
    ($result:expr, $what:literal) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("{}: {:?}", $what, err),
        }
    };
}
