// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure layer: concrete scheme adapters (data/file/transform),
//! the pluggable RPC and access-matrix collaborators the file producer
//! depends on, layered configuration, and structured logging setup.

pub mod access;
pub mod adapters;
pub mod config;
pub mod logging;
pub mod mime_table;
pub mod rpc;
