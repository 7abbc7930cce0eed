// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain error module.
//!
//! Defines [`ResourceError`], the four-way error taxonomy
//! (`InvalidReference`, `UnknownResource`, `UnknownKey`, `Internal`) that
//! every fallible operation in the system returns.

mod resource_error;

pub use resource_error::ResourceError;
