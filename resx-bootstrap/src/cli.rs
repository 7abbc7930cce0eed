// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. clap::Parser::parse()            │  Parse CLI
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                   │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                     │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Top-level CLI over the resource service façade (§4.F's operations,
/// §4.M's command surface).
#[derive(Debug, Parser)]
#[command(name = "resx", version, about = "A referenceable resource pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose (debug-level) logging.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Path to a TOML or YAML configuration file (§6).
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a reference eagerly and print its content.
    Open {
        uri: String,
        #[arg(long)]
        json: bool,
    },
    /// Open a reference as a stream and print its reduced content.
    Stream { uri: String },
    /// Check whether a reference resolves to an existing resource.
    Exists { uri: String },
    /// Print a reference's attribute map.
    Attributes { uri: String },
    /// Persist an opened resource through a storer (the file producer).
    Store {
        uri: String,
        #[arg(long)]
        path: String,
        #[arg(long)]
        node: Option<String>,
    },
    /// Discard a previously stored resource.
    Discard {
        uri: String,
        #[arg(long)]
        path: String,
    },
    /// Finalise a resource: promote to eager content and stamp a checksum.
    Finalise {
        uri: String,
        #[arg(long)]
        hash: Option<String>,
    },
    /// Compare two references' lineages (§4.F.1).
    Compare {
        a: String,
        b: String,
        #[arg(long)]
        content: bool,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Validated CLI configuration: every string argument has passed
/// [`validate_argument`]; nothing here can contain shell-metacharacter
/// or control-character injection by the time the application layer
/// sees it.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Open { uri: String, json: bool },
    Stream { uri: String },
    Exists { uri: String },
    Attributes { uri: String },
    Store { uri: String, path: String, node: Option<String> },
    Discard { uri: String, path: String },
    Finalise { uri: String, hash: Option<String> },
    Compare { a: String, b: String, content: bool },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid value for `{arg}`: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Rejects control characters and shell-metacharacters in any argument
/// that flows into a URI, path, or node name (every resx CLI argument
/// is a URI, a store path, or an algorithm name; none is a
/// pre-existing filesystem path that needs canonicalisation).
fn validate_argument(name: &str, value: &str) -> Result<(), ParseError> {
    if value.is_empty() {
        return Err(ParseError::InvalidValue { arg: name.to_string(), reason: "must not be empty".to_string() });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ParseError::InvalidValue { arg: name.to_string(), reason: "must not contain control characters".to_string() });
    }
    const DANGEROUS: &[char] = &['`', '$', ';', '|', '&', '\n', '\r'];
    if value.chars().any(|c| DANGEROUS.contains(&c)) {
        return Err(ParseError::InvalidValue { arg: name.to_string(), reason: "must not contain shell metacharacters".to_string() });
    }
    Ok(())
}

fn validate_command(command: Commands) -> Result<ValidatedCommand, ParseError> {
    Ok(match command {
        Commands::Open { uri, json } => {
            validate_argument("uri", &uri)?;
            ValidatedCommand::Open { uri, json }
        }
        Commands::Stream { uri } => {
            validate_argument("uri", &uri)?;
            ValidatedCommand::Stream { uri }
        }
        Commands::Exists { uri } => {
            validate_argument("uri", &uri)?;
            ValidatedCommand::Exists { uri }
        }
        Commands::Attributes { uri } => {
            validate_argument("uri", &uri)?;
            ValidatedCommand::Attributes { uri }
        }
        Commands::Store { uri, path, node } => {
            validate_argument("uri", &uri)?;
            validate_argument("path", &path)?;
            if let Some(node) = &node {
                validate_argument("node", node)?;
            }
            ValidatedCommand::Store { uri, path, node }
        }
        Commands::Discard { uri, path } => {
            validate_argument("uri", &uri)?;
            validate_argument("path", &path)?;
            ValidatedCommand::Discard { uri, path }
        }
        Commands::Finalise { uri, hash } => {
            validate_argument("uri", &uri)?;
            if let Some(hash) = &hash {
                validate_argument("hash", hash)?;
            }
            ValidatedCommand::Finalise { uri, hash }
        }
        Commands::Compare { a, b, content } => {
            validate_argument("a", &a)?;
            validate_argument("b", &b)?;
            ValidatedCommand::Compare { a, b, content }
        }
    })
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if let Some(config) = &cli.config {
        validate_argument("config", config)?;
    }
    Ok(ValidatedCli { command: validate_command(cli.command)?, verbose: cli.verbose, config: cli.config })
}

pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}
