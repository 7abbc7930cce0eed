// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The path matcher (§4.D): extended-glob and regex path matching used
//! by the file producer's access matrix.
//!
//! Extended glob syntax: `*` (any segment component), `**` (any number
//! of segments), `?` (any single char), `[abc]`/`[a-z]`/`[!abc]`
//! (character class with negation), `{a,b}` (alternation), `\` (escape).
//! Matching is anchored and whole-path.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// A path pattern: an extended glob, or a directly-supplied regex.
#[derive(Debug, Clone)]
pub enum PathPattern {
    Glob(String),
    Regex(String),
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Glob(glob) => glob_matches(glob, path),
            Self::Regex(pattern) => Regex::new(pattern).map(|re| re.is_match(path)).unwrap_or(false),
        }
    }
}

fn segment_regex_cache() -> &'static Mutex<HashMap<String, Regex>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Non-glob segment tokens are compiled to anchored regexes on first use
/// (§4.D), then memoised process-wide.
fn segment_matches(glob_segment: &str, path_segment: &str) -> bool {
    if glob_segment == "*" {
        return true;
    }
    let mut cache = segment_regex_cache().lock().unwrap();
    let re = cache
        .entry(glob_segment.to_string())
        .or_insert_with(|| Regex::new(&segment_to_regex(glob_segment)).unwrap_or_else(|_| Regex::new("$^").unwrap()));
    re.is_match(path_segment)
}

/// Translates one path-segment glob (no `/`) into an anchored regex
/// pattern: `*`→`.*`, `?`→`.`, `[...]` character classes (with `!`
/// negation translated to `^`), `{a,b}` alternation, `\` escape.
fn segment_to_regex(glob_segment: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = glob_segment.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() => {
                out.push_str(&regex::escape(&chars[i + 1].to_string()));
                i += 2;
            }
            '*' => {
                out.push_str(".*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            '[' => {
                let close = chars[i..].iter().position(|&c| c == ']').map(|p| p + i);
                if let Some(close) = close {
                    let mut class: String = chars[i + 1..close].iter().collect();
                    if let Some(stripped) = class.strip_prefix('!') {
                        class = format!("^{stripped}");
                    }
                    out.push('[');
                    out.push_str(&class);
                    out.push(']');
                    i = close + 1;
                } else {
                    out.push_str(&regex::escape("["));
                    i += 1;
                }
            }
            '{' => {
                let close = chars[i..].iter().position(|&c| c == '}').map(|p| p + i);
                if let Some(close) = close {
                    let alts: Vec<String> =
                        chars[i + 1..close].iter().collect::<String>().split(',').map(regex::escape).collect();
                    out.push('(');
                    out.push_str(&alts.join("|"));
                    out.push(')');
                    i = close + 1;
                } else {
                    out.push_str(&regex::escape("{"));
                    i += 1;
                }
            }
            other => {
                out.push_str(&regex::escape(&other.to_string()));
                i += 1;
            }
        }
    }
    out.push('$');
    out
}

/// Whole-path, anchored extended-glob match. Splits path and glob on `/`
/// and recurses with a memoised position; a `**` segment is allowed to
/// consume zero or more path segments before the remainder resumes
/// matching.
pub fn glob_matches(glob: &str, path: &str) -> bool {
    let glob_segments: Vec<&str> = glob.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&glob_segments, &path_segments)
}

fn match_segments(glob_segments: &[&str], path_segments: &[&str]) -> bool {
    match glob_segments.split_first() {
        None => path_segments.is_empty(),
        Some((&"**", rest_glob)) => {
            if rest_glob.is_empty() {
                return true;
            }
            // Advance the path cursor segment-by-segment until the
            // remainder matches (§4.D).
            (0..=path_segments.len()).any(|skip| match_segments(rest_glob, &path_segments[skip..]))
        }
        Some((&first, rest_glob)) => match path_segments.split_first() {
            Some((&path_first, rest_path)) => {
                segment_matches(first, path_first) && match_segments(rest_glob, rest_path)
            }
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_star_matches_any_depth() {
        assert!(glob_matches("**/bar.txt", "/any/dir/bar.txt"));
        assert!(glob_matches("**/bar.txt", "/bar.txt"));
        assert!(!glob_matches("**/bar.txt", "/any/dir/foo.txt"));
    }

    #[test]
    fn bare_double_star_matches_everything() {
        assert!(glob_matches("**", "/any/dir/bar.txt"));
    }

    #[test]
    fn single_star_is_one_segment() {
        assert!(glob_matches("/foo/*.txt", "/foo/bar.txt"));
        assert!(!glob_matches("/foo/*.txt", "/foo/bar/baz.txt"));
    }

    #[test]
    fn character_class_and_negation() {
        assert!(glob_matches("/file[0-9].txt", "/file1.txt"));
        assert!(!glob_matches("/file[!0-9].txt", "/file1.txt"));
    }

    #[test]
    fn alternation() {
        assert!(glob_matches("/file.{txt,md}", "/file.md"));
        assert!(!glob_matches("/file.{txt,md}", "/file.rs"));
    }

    #[test]
    fn empty_access_list_matches_nothing() {
        assert!(!glob_matches("", "/foo.txt"));
    }

    #[test]
    fn regex_form() {
        let p = PathPattern::Regex(r"^/etc/.*\.conf$".to_string());
        assert!(p.matches("/etc/app.conf"));
        assert!(!p.matches("/etc/app.txt"));
    }
}
