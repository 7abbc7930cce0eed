// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The file producer's access-control matrix (§4.K.2): a list of entries,
//! each matched against a `(node, path)` pair. A reference passes iff
//! *any* entry matches. Built on the domain's [`resx_domain::services::path_matcher`].

use resx_domain::services::path_matcher::PathPattern;
use resx_domain::value_objects::NodeId;
use std::sync::Arc;

/// How an entry restricts the node a path is visible to.
#[derive(Clone)]
pub enum NodeMatch {
    /// Matches every node.
    Any,
    /// Matches only the named node.
    Literal(NodeId),
    /// Arbitrary predicate over the node.
    Callback(Arc<dyn Fn(&NodeId) -> bool + Send + Sync>),
}

impl NodeMatch {
    fn matches(&self, node: &NodeId) -> bool {
        match self {
            Self::Any => true,
            Self::Literal(expected) => expected == node,
            Self::Callback(f) => f(node),
        }
    }
}

/// One access-matrix entry: a path pattern, optionally scoped to a node
/// (or node predicate). A callback-path entry receives the path and
/// returns a bool directly.
#[derive(Clone)]
pub enum AccessEntry {
    Pattern { node: NodeMatch, pattern: PathPattern },
    Callback(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl AccessEntry {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Pattern { node: NodeMatch::Any, pattern: PathPattern::Glob(pattern.into()) }
    }

    pub fn glob_for_node(node: NodeId, pattern: impl Into<String>) -> Self {
        Self::Pattern { node: NodeMatch::Literal(node), pattern: PathPattern::Glob(pattern.into()) }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Pattern { node: NodeMatch::Any, pattern: PathPattern::Regex(pattern.into()) }
    }

    pub fn regex_for_node(node: NodeId, pattern: impl Into<String>) -> Self {
        Self::Pattern { node: NodeMatch::Literal(node), pattern: PathPattern::Regex(pattern.into()) }
    }
}

/// The evaluated access-control list for one producer configuration.
/// Consulted fresh per operation (§9): build a new `AccessMatrix` (or
/// swap one behind an `ArcSwap`) whenever the underlying configuration
/// changes, rather than caching a resolution.
#[derive(Clone, Default)]
pub struct AccessMatrix {
    entries: Vec<AccessEntry>,
}

impl AccessMatrix {
    pub fn new(entries: Vec<AccessEntry>) -> Self {
        Self { entries }
    }

    pub fn allow_all() -> Self {
        Self::new(vec![AccessEntry::glob("**")])
    }

    /// A reference passes iff any entry matches both the path and,
    /// when the entry scopes by node, the given node.
    pub fn permits(&self, node: &NodeId, path: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            AccessEntry::Pattern { node: node_match, pattern } => node_match.matches(node) && pattern.matches(path),
            AccessEntry::Callback(f) => f(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_denies_everything() {
        let matrix = AccessMatrix::default();
        assert!(!matrix.permits(&NodeId::local(), "/foo.txt"));
    }

    #[test]
    fn glob_entry_permits_matching_paths() {
        let matrix = AccessMatrix::new(vec![AccessEntry::glob("**/bar.txt")]);
        assert!(matrix.permits(&NodeId::local(), "/any/dir/bar.txt"));
        assert!(!matrix.permits(&NodeId::local(), "/foo.txt"));
    }

    #[test]
    fn node_scoped_entry_restricts_by_node() {
        let matrix = AccessMatrix::new(vec![AccessEntry::glob_for_node(NodeId::remote("N2"), "**")]);
        assert!(matrix.permits(&NodeId::remote("N2"), "/p"));
        assert!(!matrix.permits(&NodeId::remote("N3"), "/p"));
    }
}
