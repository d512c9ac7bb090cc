// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

pub const PRAGMA_ONCE: &str = "#pragma once";
pub const DEFAULT_VERSION_MACRO: &str = "LIBRARY_VERSION";

lazy_static! {
    static ref PRAGMA_ONCE_RE: Regex = Regex::new(r"#[ \t]*pragma[ \t]+once\b").unwrap();
}

/// Header block that goes on top of the amalgamated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble<'a> {
    pub license: &'a str,
    pub version_macro: &'a str,
    pub version: &'a str,
}

impl<'a> Preamble<'a> {
    /// The license, a blank line, a single compile-once directive and the
    /// version define, each of the last two on its own line.
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n#define {} \"{}\"\n",
            self.license, PRAGMA_ONCE, self.version_macro, self.version
        )
    }

    /// Prepends the preamble to `body`.
    pub fn wrap(&self, body: &str) -> String {
        let mut content = self.render();
        content.push_str(body);
        content
    }
}

/// Removes every compile-once directive from `content`.
pub fn strip_pragma_once(content: &str) -> String {
    PRAGMA_ONCE_RE.replace_all(content, "").into_owned()
}

/// Version macro name derived from the output file: `cclip.hpp` gives
/// `CCLIP_VERSION`.
pub fn version_macro_for(output: &Path) -> String {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if stem.is_empty() {
        return String::from(DEFAULT_VERSION_MACRO);
    }
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name.push_str("_VERSION");
    name
}
