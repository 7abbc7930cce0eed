// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # resx
//!
//! A referenceable resource pipeline: open, stream, transform, cache,
//! compare, and persist heterogeneous resources while preserving a
//! verifiable lineage across process boundaries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Presentation Layer                        │
//! │  (CLI commands over the resource service façade)             │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (ResourceService façade: open/stream/transform/store/...)  │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (resx-domain)                │
//! │  (Resource/Reference/Content, Producer/Transformer/Storer)   │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                          │
//! │  (data/file/transform producers, RPC, config, logging)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate wires the pure domain model in `resx_domain` to concrete
//! adapters — the **data** producer (`data:` URIs, RFC 2397), the
//! **transform** producer (`resx-transform:` URIs, chained
//! transformations), and the **file** producer/store (`file:` URIs,
//! access matrix, distributed RPC, source-backed caching) — and exposes
//! them through a single [`application::services::ResourceService`]
//! façade that the CLI in `presentation` drives.

pub mod application;
pub mod infrastructure;
#[macro_use]
pub mod macros;
pub mod presentation;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: separate files in tests/ directory

pub use resx_domain::{Content, ContentStream, Integrity, Reference, Repository, Resource, ResourceError};
