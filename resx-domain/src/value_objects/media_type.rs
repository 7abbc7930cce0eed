// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// A nonempty, ordered list of MIME strings. The head is the outermost
/// type (e.g. `text/plain` for `file.jpg.txt`); later entries describe
/// what the content was before each suffix was stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType(Vec<String>);

impl MediaType {
    /// Builds a `MediaType`, defaulting to `application/octet-stream` if
    /// given an empty list — `type` is never empty per the data model
    /// invariant.
    pub fn new(types: Vec<String>) -> Self {
        if types.is_empty() {
            Self(vec!["application/octet-stream".to_string()])
        } else {
            Self(types)
        }
    }

    pub fn single(mime: impl Into<String>) -> Self {
        Self(vec![mime.into()])
    }

    pub fn octet_stream() -> Self {
        Self::single("application/octet-stream")
    }

    pub fn outermost(&self) -> &str {
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// The external MIME lookup table collaborator (§1, §6): maps a filename
/// suffix (e.g. `"txt"`) to a MIME string. The core only owns the
/// derivation *algorithm* (basename splitting, outermost-first ordering);
/// the table itself is supplied by the embedding application.
pub trait MimeLookup: Send + Sync {
    fn lookup(&self, extension: &str) -> Option<String>;
}

/// Derives a [`MediaType`] from a filename per §6 "MIME derivation":
/// split the basename on `.`, ignoring leading dots; zero or one
/// remaining suffix yields `application/octet-stream` when the table has
/// no entry; multiple suffixes yield a list, outermost-first.
pub fn derive_media_type(filename: &str, table: &dyn MimeLookup) -> MediaType {
    let trimmed = filename.trim_start_matches('.');
    let mut parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() <= 1 {
        return MediaType::octet_stream();
    }
    // First element is the stem, not a suffix.
    parts.remove(0);
    let types: Vec<String> = parts
        .iter()
        .rev()
        .map(|ext| table.lookup(ext).unwrap_or_else(|| "application/octet-stream".to_string()))
        .collect();
    MediaType::new(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTable;
    impl MimeLookup for FakeTable {
        fn lookup(&self, extension: &str) -> Option<String> {
            match extension {
                "txt" => Some("text/plain".to_string()),
                "jpg" => Some("image/jpeg".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn no_suffix_is_octet_stream() {
        assert_eq!(derive_media_type("README", &FakeTable).outermost(), "application/octet-stream");
    }

    #[test]
    fn single_suffix() {
        assert_eq!(derive_media_type("file.txt", &FakeTable).outermost(), "text/plain");
    }

    #[test]
    fn multiple_suffixes_outermost_first() {
        let mt = derive_media_type("file.jpg.txt", &FakeTable);
        assert_eq!(mt.as_slice(), &["text/plain".to_string(), "image/jpeg".to_string()]);
    }

    #[test]
    fn leading_dot_ignored() {
        assert_eq!(derive_media_type(".gitignore", &FakeTable).outermost(), "application/octet-stream");
    }
}
