// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hppamalgam::amalgamator::{
    IMPLEMENTATION_DIR, IMPLEMENTATION_EXTENSION, INTERFACE_DIR, INTERFACE_EXTENSION,
    OUTPUT_FILENAME,
};
use hppamalgam::Amalgamator;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {
    /// Directory with the interface (header) files.
    #[clap(long, default_value = INTERFACE_DIR)]
    pub includes: PathBuf,
    /// Extension the interface files end with.
    #[clap(long, default_value = INTERFACE_EXTENSION)]
    pub include_ext: String,
    /// Directory with the implementation (source) files.
    #[clap(long, default_value = IMPLEMENTATION_DIR)]
    pub sources: PathBuf,
    /// Extension the implementation files end with.
    #[clap(long, default_value = IMPLEMENTATION_EXTENSION)]
    pub source_ext: String,
    /// The output file.
    #[clap(short, long, default_value = OUTPUT_FILENAME)]
    pub output: PathBuf,
    /// Write to stdout instead of the output file.
    #[clap(long, conflicts_with = "atomic")]
    pub stdout: bool,
    /// Version string for the generated version define.
    #[clap(long, default_value = "0.0.0")]
    pub lib_version: String,
    /// Name of the version define, derived from the output file by default.
    #[clap(long)]
    pub version_macro: Option<String>,
    /// License text to put at the top.
    #[clap(long, conflicts_with = "license_file")]
    pub license: Option<String>,
    /// File with the license text to put at the top.
    #[clap(long)]
    pub license_file: Option<PathBuf>,
    /// Sort files by name within each group.
    #[clap(long)]
    pub sort: bool,
    /// Write to a temporary file and rename it over the output.
    #[clap(long)]
    pub atomic: bool,
    /// Log every processed file and stripped directive.
    #[clap(short, long)]
    pub verbose: bool,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose {
        "hppamalgam=debug"
    } else {
        "hppamalgam=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let license = match (&cli.license, &cli.license_file) {
        (Some(license), _) => license.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("error reading license file {}", path.display()))?
            .trim_end()
            .to_string(),
        (None, None) => String::new(),
    };

    let mut amalgamator = if cli.stdout {
        Amalgamator::new_fd(&cli.includes, &cli.sources, Box::new(std::io::stdout()))
    } else {
        Amalgamator::new(&cli.includes, &cli.sources, &cli.output)
    };
    amalgamator.interface_extension(&cli.include_ext);
    amalgamator.implementation_extension(&cli.source_ext);
    amalgamator.version(&cli.lib_version);
    amalgamator.license(&license);
    if let Some(ref name) = cli.version_macro {
        amalgamator.version_macro(name);
    }
    amalgamator.sorted(cli.sort);
    amalgamator.atomic(cli.atomic);
    amalgamator.run().context("amalgamation failed")?;
    Ok(())
}
