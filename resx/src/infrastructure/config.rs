// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Layered configuration (§6): scheme-dispatcher overrides, transformer
//! registrations, and the file producer's access matrix and node
//! identity, loaded from a TOML/YAML file and overridden by `RESX_*`
//! environment variables.

use serde::Deserialize;

/// One `[[dispatcher]]` entry: binds a URI scheme to a producer name
/// the embedding application resolves at startup (§4.E "configuration
/// entries... override a producer's own scheme declaration").
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherBinding {
    pub scheme: String,
    pub producer: String,
}

/// One `[[access]]` entry: a glob or regex pattern, optionally scoped to
/// a node name (§4.K.2).
#[derive(Debug, Clone, Deserialize)]
pub struct AccessRule {
    pub pattern: String,
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub node: Option<String>,
}

/// Top-level configuration document (§6). Every field has a usable
/// default so a fresh checkout with no config file still runs.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResxConfig {
    /// This node's name, used to decide whether a `file:` reference is
    /// local or must be dispatched over RPC.
    #[serde(default)]
    pub node: Option<String>,

    #[serde(default)]
    pub dispatcher: Vec<DispatcherBinding>,

    #[serde(default)]
    pub access: Vec<AccessRule>,
}

impl ResxConfig {
    /// Loads configuration the way the rest of the pipeline does it:
    /// an optional file (TOML or YAML, by extension) at `path`, then
    /// `RESX_`-prefixed environment variables layered on top using
    /// `__` as the nesting separator (e.g. `RESX__NODE=N1`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix("RESX").separator("__"));
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both assertions share one test: `RESX__NODE` is process-global state,
    // and running them as separate #[test] fns risks a race under the
    // default parallel test runner.
    #[test]
    fn defaults_then_environment_override() {
        let cfg = ResxConfig::load(None).unwrap();
        assert!(cfg.node.is_none());
        assert!(cfg.dispatcher.is_empty());
        assert!(cfg.access.is_empty());

        std::env::set_var("RESX__NODE", "N1");
        let cfg = ResxConfig::load(None).unwrap();
        std::env::remove_var("RESX__NODE");
        assert_eq!(cfg.node.as_deref(), Some("N1"));
    }
}

