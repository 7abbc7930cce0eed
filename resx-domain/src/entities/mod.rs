// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain entities: [`Resource`], its [`Reference`] identity, and its
//! [`Content`]/[`ContentStream`] payload, bound together by [`Integrity`].

pub mod content;
pub mod integrity;
pub mod reference;
pub mod resource;

pub use content::{binary_reducer, default_combiner, Chunk, ChunkProducer, Combiner, Content, ContentStream, EagerData, Reducer};
pub use integrity::{Integrity, TimestampOrder};
pub use reference::{Reference, Repository};
pub use resource::Resource;
