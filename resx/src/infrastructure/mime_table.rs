// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A small built-in MIME table (§6): the concrete [`MimeLookup`]
//! collaborator the domain's `derive_media_type` needs. Covers common
//! extensions; unrecognised ones fall back to `application/octet-stream`
//! as the domain function already does.

use resx_domain::value_objects::MimeLookup;
use std::collections::HashMap;

pub struct StaticMimeTable {
    entries: HashMap<&'static str, &'static str>,
}

impl StaticMimeTable {
    pub fn new() -> Self {
        let entries = [
            ("txt", "text/plain"),
            ("json", "application/json"),
            ("html", "text/html"),
            ("css", "text/css"),
            ("js", "application/javascript"),
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("pdf", "application/pdf"),
            ("gz", "application/gzip"),
            ("tar", "application/x-tar"),
            ("zip", "application/zip"),
            ("xml", "application/xml"),
            ("yaml", "application/yaml"),
            ("yml", "application/yaml"),
            ("toml", "application/toml"),
            ("csv", "text/csv"),
            ("md", "text/markdown"),
            ("bin", "application/octet-stream"),
        ]
        .into_iter()
        .collect();
        Self { entries }
    }
}

impl Default for StaticMimeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeLookup for StaticMimeTable {
    fn lookup(&self, extension: &str) -> Option<String> {
        self.entries.get(extension.to_ascii_lowercase().as_str()).map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extension_resolves() {
        assert_eq!(StaticMimeTable::new().lookup("json"), Some("application/json".to_string()));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(StaticMimeTable::new().lookup("zzzz"), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(StaticMimeTable::new().lookup("JSON"), Some("application/json".to_string()));
    }
}
