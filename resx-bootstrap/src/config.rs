// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Bootstrap-phase configuration: the handful of settings needed before
//! the application layer's own `ResxConfig` (scheme dispatcher, access
//! matrix) is loaded — log verbosity and shutdown grace period.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub log_level: String,
    pub grace_period: Duration,
}

impl BootstrapConfig {
    /// Reads `RESX_LOG` (default `info`) and `RESX_GRACE_PERIOD_SECS`
    /// (default 5), overridden by `--verbose` when set.
    pub fn from_env(verbose: bool) -> Self {
        let mut log_level = std::env::var("RESX_LOG").unwrap_or_else(|_| "info".to_string());
        if verbose {
            log_level = "debug".to_string();
        }
        let grace_period_secs = std::env::var("RESX_GRACE_PERIOD_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(5);
        Self { log_level, grace_period: Duration::from_secs(grace_period_secs) }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::from_env(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_log_level() {
        let cfg = BootstrapConfig::from_env(true);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn default_grace_period_is_five_seconds() {
        let cfg = BootstrapConfig::from_env(false);
        assert_eq!(cfg.grace_period, Duration::from_secs(5));
    }
}
