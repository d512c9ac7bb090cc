// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// The files that make up an amalgamation, as names relative to their
/// group's directory.
///
/// Within a group the order is the order the directory listing returned,
/// unless the set was discovered with sorting enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    pub interface: Vec<String>,
    pub implementation: Vec<String>,
    /// Regular files found in either directory that were filtered out by
    /// their extension.
    pub skipped: Vec<String>,
}

/// One directory plus the extension its files must end with.
#[derive(Debug, Clone, Copy)]
pub struct Group<'a> {
    pub dir: &'a Path,
    pub extension: &'a str,
}

impl FileSet {
    pub fn discover(interface: Group, implementation: Group, sorted: bool) -> Result<FileSet> {
        let mut fileset = FileSet::default();
        fileset.interface = list_group(interface, &mut fileset.skipped)?;
        fileset.implementation = list_group(implementation, &mut fileset.skipped)?;
        if sorted {
            fileset.interface.sort();
            fileset.implementation.sort();
        }
        Ok(fileset)
    }

    /// Names that count as local includes: exactly the interface files.
    pub fn interface_names(&self) -> HashSet<String> {
        self.interface.iter().cloned().collect()
    }

    /// Names of files that sit next to the amalgamated ones but are not
    /// interface files. An include of one of these is almost certainly
    /// meant to be local, yet it can't be stripped.
    pub fn nearby_names(&self) -> HashSet<String> {
        self.implementation
            .iter()
            .chain(self.skipped.iter())
            .cloned()
            .collect()
    }
}

/// Lists the regular files directly inside `group.dir` whose name ends with
/// `group.extension`. Subdirectories are not traversed. A matching entry
/// that can't be stat'ed, such as a dangling symlink, is an error.
fn list_group(group: Group, skipped: &mut Vec<String>) -> Result<Vec<String>> {
    let list_err = |source| Error::ListDir {
        path: group.dir.to_path_buf(),
        source,
    };
    let mut names = vec![];
    for entry in fs::read_dir(group.dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                debug!("skipping non-utf8 file name {:?}", name);
                continue;
            }
        };
        if !name.ends_with(group.extension) {
            if path.is_file() {
                skipped.push(name);
            }
            continue;
        }
        let metadata = fs::metadata(&path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;
        if metadata.is_file() {
            debug!("found {}", path.display());
            names.push(name);
        }
    }
    Ok(names)
}
