// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The storer contract (§4.J): `store`/`discard`/`source_compatibility`,
//! implemented by the file producer/store (§4.K) and by any adapter that
//! also persists resources.

use crate::entities::Resource;
use crate::services::producer::{ProducerOptions, SourceCompatibility};
use crate::ResourceError;
use async_trait::async_trait;

#[async_trait]
pub trait Storer: Send + Sync {
    async fn store(&self, resource: Resource, options: &ProducerOptions) -> Result<Resource, ResourceError>;

    /// Most storers support reversal; the default implementation treats
    /// discard as a no-op success for storers that never erase data.
    async fn discard(&self, _resource: &Resource, _options: &ProducerOptions) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Storers that also implement `Producer` default to
    /// `CompatibleDefault` unless they override this (§4.J).
    fn source_compatibility(&self) -> SourceCompatibility {
        SourceCompatibility::CompatibleDefault
    }
}
