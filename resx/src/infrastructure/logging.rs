// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Structured logging setup via `tracing`/`tracing-subscriber`. Producer
//! operations emit spans (`producer.open`, `producer.store`, ...); the
//! file producer additionally logs at `warn` on a cache miss and `info`
//! on a successful restoration from source (§4.K.4).

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global subscriber reading `RUST_LOG` (defaulting to
/// `info`), human-readable on a terminal. Call once from `main`; a
/// second call is a no-op rather than a panic, since tests may share a
/// process.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
