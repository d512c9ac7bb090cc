// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::discovery::{FileSet, Group};
use crate::error::{Error, Result};
use crate::includes;
use crate::preamble::{self, Preamble};

pub const INTERFACE_DIR: &str = "includes";
pub const INTERFACE_EXTENSION: &str = ".h";
pub const IMPLEMENTATION_DIR: &str = "src";
pub const IMPLEMENTATION_EXTENSION: &str = ".cpp";
pub const OUTPUT_FILENAME: &str = "cclip.hpp";

enum Output<'a> {
    Path(&'a Path),
    Fd(Box<dyn Write + 'a>),
}

pub struct Amalgamator<'a> {
    interface_dir: &'a Path,
    implementation_dir: &'a Path,
    output: Output<'a>,
    interface_extension: &'a str,
    implementation_extension: &'a str,
    version: &'a str,
    license: &'a str,
    version_macro: Option<&'a str>,
    sorted: bool,
    atomic: bool,
}

impl<'a> Amalgamator<'a> {
    pub fn new(
        interface_dir: &'a Path,
        implementation_dir: &'a Path,
        output_path: &'a Path,
    ) -> Amalgamator<'a> {
        Self::with_output(interface_dir, implementation_dir, Output::Path(output_path))
    }

    /// Like [`Amalgamator::new`], but the result goes to `fd` instead of a
    /// file.
    pub fn new_fd(
        interface_dir: &'a Path,
        implementation_dir: &'a Path,
        fd: Box<dyn Write + 'a>,
    ) -> Amalgamator<'a> {
        Self::with_output(interface_dir, implementation_dir, Output::Fd(fd))
    }

    fn with_output(
        interface_dir: &'a Path,
        implementation_dir: &'a Path,
        output: Output<'a>,
    ) -> Amalgamator<'a> {
        Amalgamator {
            interface_dir,
            implementation_dir,
            output,
            interface_extension: INTERFACE_EXTENSION,
            implementation_extension: IMPLEMENTATION_EXTENSION,
            version: "",
            license: "",
            version_macro: None,
            sorted: false,
            atomic: false,
        }
    }

    pub fn version(&mut self, version: &'a str) {
        self.version = version;
    }

    pub fn license(&mut self, license: &'a str) {
        self.license = license;
    }

    /// Overrides the name of the generated version define.
    pub fn version_macro(&mut self, name: &'a str) {
        self.version_macro = Some(name);
    }

    pub fn interface_extension(&mut self, extension: &'a str) {
        self.interface_extension = extension;
    }

    pub fn implementation_extension(&mut self, extension: &'a str) {
        self.implementation_extension = extension;
    }

    /// Sort each group by name instead of keeping the listing order.
    pub fn sorted(&mut self, enable: bool) {
        self.sorted = enable;
    }

    /// Write to a temporary file next to the output and rename it into
    /// place once complete. Has no effect with [`Amalgamator::new_fd`].
    pub fn atomic(&mut self, enable: bool) {
        self.atomic = enable;
    }

    pub fn discover(&self) -> Result<FileSet> {
        FileSet::discover(
            Group {
                dir: self.interface_dir,
                extension: self.interface_extension,
            },
            Group {
                dir: self.implementation_dir,
                extension: self.implementation_extension,
            },
            self.sorted,
        )
    }

    /// Reads every file in `files`, interface group first, strips the local
    /// includes and compile-once directives and puts the preamble on top.
    pub fn amalgamate(&self, files: &FileSet) -> Result<String> {
        let known = files.interface_names();
        let nearby = files.nearby_names();
        let mut body = String::new();
        let groups = [
            (self.interface_dir, &files.interface),
            (self.implementation_dir, &files.implementation),
        ];
        for (dir, names) in groups {
            for name in names {
                let path = dir.join(name);
                let content = fs::read_to_string(&path).map_err(|source| Error::ReadFile {
                    path: path.clone(),
                    source,
                })?;
                for reference in includes::find_unresolved_references(&content, &known, &nearby)
                {
                    warn!(
                        "{}: {} looks local but is not an interface file, leaving it in place",
                        path.display(),
                        reference.directive
                    );
                }
                let references = includes::find_local_references(&content, &known);
                for reference in &references {
                    debug!("{}: stripping {}", path.display(), reference.directive);
                }
                body.push_str(&includes::strip_references(&content, &references));
            }
        }
        let body = preamble::strip_pragma_once(&body);
        let version_macro = self.version_macro_name();
        let preamble = Preamble {
            license: self.license,
            version_macro: &version_macro,
            version: self.version,
        };
        Ok(preamble.wrap(&body))
    }

    pub fn run(&mut self) -> Result<()> {
        let files = self.discover()?;
        let content = self.amalgamate(&files)?;
        self.write_output(&content)?;
        info!(
            "amalgamated {} interface and {} implementation files into {}",
            files.interface.len(),
            files.implementation.len(),
            self.output_name()
        );
        Ok(())
    }

    fn version_macro_name(&self) -> String {
        match (self.version_macro, &self.output) {
            (Some(name), _) => String::from(name),
            (None, Output::Path(path)) => preamble::version_macro_for(path),
            (None, Output::Fd(_)) => String::from(preamble::DEFAULT_VERSION_MACRO),
        }
    }

    fn output_name(&self) -> String {
        match self.output {
            Output::Path(path) => path.display().to_string(),
            Output::Fd(_) => String::from("<fd>"),
        }
    }

    fn write_output(&mut self, content: &str) -> Result<()> {
        match self.output {
            Output::Path(path) => {
                let write_err = |source| Error::WriteOutput {
                    path: path.to_path_buf(),
                    source,
                };
                if self.atomic {
                    write_atomic(path, content).map_err(write_err)
                } else {
                    fs::write(path, content).map_err(write_err)
                }
            }
            Output::Fd(ref mut fd) => {
                fd.write_all(content.as_bytes())?;
                fd.flush()?;
                Ok(())
            }
        }
    }
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
