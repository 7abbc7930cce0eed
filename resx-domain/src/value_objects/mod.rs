// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects: immutable, identity-free types defined entirely by
//! their attributes. [`Timestamp`], [`Checksum`]/[`HashAlgorithm`],
//! [`AdapterId`], [`NodeId`], [`MediaType`], and [`Meta`] compose into
//! the entities in [`crate::entities`].

pub mod adapter_id;
pub mod checksum;
pub mod media_type;
pub mod meta;
pub mod node_id;
pub mod timestamp;

pub use adapter_id::AdapterId;
pub use checksum::{Checksum, HashAlgorithm};
pub use media_type::{derive_media_type, MediaType, MimeLookup};
pub use meta::{Meta, MetaValue};
pub use node_id::NodeId;
pub use timestamp::Timestamp;
