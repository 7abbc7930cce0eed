// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named participant in the distributed runtime. File references are
/// node-qualified: `file://user@host/path` names a node as `user@host`;
/// no authority (or `localhost`) names [`NodeId::local`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeId {
    Local,
    Remote(String),
}

impl NodeId {
    pub fn local() -> Self {
        Self::Local
    }

    pub fn remote(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() || name == "localhost" {
            Self::Local
        } else {
            Self::Remote(name)
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "localhost",
            Self::Remote(s) => s,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
