// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

//! Textual detection of quoted `#include` directives.
//!
//! This is a plain pattern scan, not a preprocessor: a directive inside a
//! comment or a string literal is matched all the same.

use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref QUOTED_INCLUDE_RE: Regex =
        Regex::new(r#"#[ \t]*include[ \t]*"(?P<name>[^"\r\n]*)""#).unwrap();
}

/// A quoted include directive found in a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIncludeReference<'a> {
    /// Byte range of the whole directive in the content.
    pub span: Range<usize>,
    /// The directive as written, e.g. `#include "option.h"`.
    pub directive: &'a str,
    /// The quoted file name.
    pub name: &'a str,
}

/// All quoted include directives in `content`, in order of appearance.
pub fn quoted_includes(content: &str) -> impl Iterator<Item = LocalIncludeReference<'_>> {
    QUOTED_INCLUDE_RE.captures_iter(content).filter_map(|cap| {
        let whole = cap.get(0)?;
        let name = cap.name("name")?;
        Some(LocalIncludeReference {
            span: whole.range(),
            directive: whole.as_str(),
            name: name.as_str(),
        })
    })
}

/// The directives in `content` that include one of `known_names`.
pub fn find_local_references<'a>(
    content: &'a str,
    known_names: &HashSet<String>,
) -> Vec<LocalIncludeReference<'a>> {
    quoted_includes(content)
        .filter(|r| known_names.contains(r.name))
        .collect()
}

/// Quoted includes that look local but will survive stripping: the name
/// is one of `nearby_names`, or its last path component is a known name.
pub fn find_unresolved_references<'a>(
    content: &'a str,
    known_names: &HashSet<String>,
    nearby_names: &HashSet<String>,
) -> Vec<LocalIncludeReference<'a>> {
    quoted_includes(content)
        .filter(|r| !known_names.contains(r.name))
        .filter(|r| {
            nearby_names.contains(r.name)
                || Path::new(r.name)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| known_names.contains(n))
        })
        .collect()
}

/// Removes every local include directive from `content`, leaving all the
/// surrounding text (including the line break) in place.
pub fn strip_local_includes(content: &str, known_names: &HashSet<String>) -> String {
    strip_references(content, &find_local_references(content, known_names))
}

/// Removes the given directives from `content`. `references` must come from
/// a scan of this same `content`, in order of appearance.
pub fn strip_references(content: &str, references: &[LocalIncludeReference]) -> String {
    let mut stripped = String::with_capacity(content.len());
    let mut last = 0;
    for reference in references {
        stripped.push_str(&content[last..reference.span.start]);
        last = reference.span.end;
    }
    stripped.push_str(&content[last..]);
    stripped
}
