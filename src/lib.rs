//! Amalgamate a C++ library's headers and sources into a single header.
//!
//! The interface files (`includes/*.h` by default) and then the
//! implementation files (`src/*.cpp`) are concatenated into one file. Quoted
//! `#include` directives that name one of the interface files are removed,
//! since their content is already part of the output, and every
//! `#pragma once` is replaced by a single one at the top, together with the
//! license text and a version define.
//!
//! Use it from a build script or through the `amalgamate` binary:
//!
//! ```no_run
//! use std::path::Path;
//! use hppamalgam::Amalgamator;
//!
//! let mut amalgamator = Amalgamator::new(
//!     Path::new("includes"),
//!     Path::new("src"),
//!     Path::new("cclip.hpp"),
//! );
//! amalgamator.version("0.0.8");
//! amalgamator.license("/* MIT */");
//! amalgamator.run()?;
//! # Ok::<(), hppamalgam::Error>(())
//! ```

pub mod amalgamator;
pub mod discovery;
pub mod error;
pub mod includes;
pub mod preamble;

pub use amalgamator::Amalgamator;
pub use discovery::FileSet;
pub use error::{Error, Result};
pub use includes::{find_local_references, strip_local_includes, LocalIncludeReference};
pub use preamble::Preamble;
