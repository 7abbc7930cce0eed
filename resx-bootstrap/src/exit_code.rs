// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Unix exit code mapping (§7): every fallible top-level operation maps
//! to one of the BSD `sysexits.h` codes, so shell callers can branch on
//! the failure class without parsing stderr.

use resx_domain::ResourceError;
use std::process::ExitCode as StdExitCode;

/// `sysexits.h` subset used by this CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok,
    /// EX_USAGE: bad CLI arguments.
    Usage,
    /// EX_DATAERR: the input reference/URI was malformed.
    DataErr,
    /// EX_NOINPUT: the referenced resource does not exist.
    NoInput,
    /// EX_SOFTWARE: an internal error.
    Software,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Usage => 64,
            Self::DataErr => 65,
            Self::NoInput => 66,
            Self::Software => 70,
        }
    }
}

impl From<ExitCode> for StdExitCode {
    fn from(code: ExitCode) -> Self {
        StdExitCode::from(code.code())
    }
}

/// Maps the four-way [`ResourceError`] taxonomy onto an [`ExitCode`].
pub fn map_error_to_exit_code(error: &ResourceError) -> ExitCode {
    match error {
        ResourceError::InvalidReference(_) => ExitCode::DataErr,
        ResourceError::UnknownResource(_) => ExitCode::NoInput,
        ResourceError::UnknownKey(_) => ExitCode::DataErr,
        ResourceError::Internal(_) => ExitCode::Software,
    }
}

/// Converts an application result directly into the process exit code,
/// printing the error to stderr on failure.
pub fn result_to_exit_code(result: Result<(), ResourceError>) -> StdExitCode {
    match result {
        Ok(()) => ExitCode::Ok.into(),
        Err(err) => {
            eprintln!("resx: {err}");
            map_error_to_exit_code(&err).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_error_variant() {
        assert_eq!(map_error_to_exit_code(&ResourceError::invalid_reference("x")), ExitCode::DataErr);
        assert_eq!(map_error_to_exit_code(&ResourceError::unknown_resource("x")), ExitCode::NoInput);
        assert_eq!(map_error_to_exit_code(&ResourceError::unknown_key("x")), ExitCode::DataErr);
        assert_eq!(map_error_to_exit_code(&ResourceError::internal("x")), ExitCode::Software);
    }

    #[test]
    fn ok_result_is_exit_zero() {
        assert_eq!(ExitCode::Ok.code(), 0);
    }
}
