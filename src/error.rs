// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure of an amalgamation run is an I/O failure; the text
/// transformations themselves cannot fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("error listing directory {}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing amalgamated output")]
    Write(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
