// Copyright (C) 2022 Leandro Lisboa Penz <lpenz@lpenz.org>
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use hppamalgam::{Amalgamator, Error, FileSet};

const LICENSE: &str = "/* test license */";
const PREAMBLE: &str = "/* test license */\n\n#pragma once\n#define LIB_VERSION \"1.2.3\"\n";

struct Project {
    tempdir: TempDir,
}

impl Project {
    fn new() -> Result<Project> {
        let tempdir = TempDir::new()?;
        fs::create_dir(tempdir.path().join("includes"))?;
        fs::create_dir(tempdir.path().join("src"))?;
        Ok(Project { tempdir })
    }

    fn includes(&self) -> PathBuf {
        self.tempdir.path().join("includes")
    }

    fn src(&self) -> PathBuf {
        self.tempdir.path().join("src")
    }

    fn output(&self) -> PathBuf {
        self.tempdir.path().join("lib.hpp")
    }

    fn header(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.includes().join(name), content)?;
        Ok(())
    }

    fn source(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.src().join(name), content)?;
        Ok(())
    }

    fn run(&self) -> Result<String> {
        let (includes, src, output) = (self.includes(), self.src(), self.output());
        let mut amalgamator = configured(&includes, &src, &output);
        amalgamator.run()?;
        Ok(fs::read_to_string(&output)?)
    }
}

fn configured<'a>(includes: &'a Path, src: &'a Path, output: &'a Path) -> Amalgamator<'a> {
    let mut amalgamator = Amalgamator::new(includes, src, output);
    amalgamator.license(LICENSE);
    amalgamator.version("1.2.3");
    amalgamator
}

#[test]
fn strips_local_keeps_system_include() -> Result<()> {
    let project = Project::new()?;
    project.header("opt.h", "#include \"util.h\"\n#include <string>\nstruct opt {};\n")?;
    project.header("util.h", "inline int util() { return 1; }\n")?;
    let output = project.run()?;
    assert!(!output.contains("#include \"util.h\""));
    assert!(output.contains("#include <string>\n"));
    assert!(output.contains("struct opt {};\n"));
    assert!(output.contains("inline int util() { return 1; }\n"));
    Ok(())
}

#[test]
fn single_pragma_once_at_top() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "#pragma once\nint a();\n")?;
    project.header("b.h", "#pragma once\nint b();\n")?;
    let output = project.run()?;
    assert_eq!(output.matches("#pragma once").count(), 1);
    assert!(output.starts_with(PREAMBLE));
    Ok(())
}

#[test]
fn external_include_in_source_untouched() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "int a();\n")?;
    project.source("a.cpp", "#include \"a.h\"\n#include \"zlib.h\"\nint a() { return 0; }\n")?;
    let output = project.run()?;
    assert_eq!(
        output,
        format!("{}int a();\n\n#include \"zlib.h\"\nint a() {{ return 0; }}\n", PREAMBLE)
    );
    Ok(())
}

#[test]
fn empty_project_is_preamble_only() -> Result<()> {
    let project = Project::new()?;
    assert_eq!(project.run()?, PREAMBLE);
    Ok(())
}

#[test]
fn version_define_appears_once() -> Result<()> {
    let project = Project::new()?;
    for i in 0..5 {
        project.header(&format!("h{}.h", i), "#pragma once\nint x;\n")?;
        project.source(&format!("s{}.cpp", i), "int y;\n")?;
    }
    let output = project.run()?;
    assert_eq!(output.matches("#define LIB_VERSION").count(), 1);
    assert!(output.contains("#define LIB_VERSION \"1.2.3\"\n"));
    Ok(())
}

#[test]
fn rerun_is_byte_identical() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "#pragma once\n#include \"b.h\"\nint a();\n")?;
    project.header("b.h", "#pragma once\nint b();\n")?;
    project.source("a.cpp", "#include \"a.h\"\nint a() { return b(); }\n")?;
    let first = project.run()?;
    let second = project.run()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn interface_group_then_implementation_group_in_given_order() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "A\n")?;
    project.header("b.h", "B\n")?;
    project.source("c.cpp", "C\n")?;
    project.source("d.cpp", "D\n")?;
    let (includes, src, output) = (project.includes(), project.src(), project.output());
    let amalgamator = configured(&includes, &src, &output);
    let files = FileSet {
        interface: vec!["b.h".into(), "a.h".into()],
        implementation: vec!["d.cpp".into(), "c.cpp".into()],
        skipped: vec![],
    };
    assert_eq!(amalgamator.amalgamate(&files)?, format!("{}B\nA\nD\nC\n", PREAMBLE));
    Ok(())
}

#[test]
fn discovery_ignores_other_extensions() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "A\n")?;
    project.header("a.hpp", "HPP\n")?;
    project.source("a.cpp", "C\n")?;
    project.source("a.h", "PRIVATE\n")?;
    let output = project.run()?;
    assert_eq!(output, format!("{}A\nC\n", PREAMBLE));
    Ok(())
}

#[test]
fn custom_extensions_and_macro() -> Result<()> {
    let project = Project::new()?;
    project.header("a.hh", "A\n")?;
    project.source("a.cc", "#include \"a.hh\"\nC\n")?;
    let (includes, src, output) = (project.includes(), project.src(), project.output());
    let mut amalgamator = configured(&includes, &src, &output);
    amalgamator.interface_extension(".hh");
    amalgamator.implementation_extension(".cc");
    amalgamator.version_macro("MYLIB_VERSION");
    amalgamator.run()?;
    assert_eq!(
        fs::read_to_string(&output)?,
        "/* test license */\n\n#pragma once\n#define MYLIB_VERSION \"1.2.3\"\nA\n\nC\n"
    );
    Ok(())
}

#[test]
fn overwrites_existing_output() -> Result<()> {
    let project = Project::new()?;
    fs::write(project.output(), "stale content that is longer than the new output\n")?;
    assert_eq!(project.run()?, PREAMBLE);
    Ok(())
}

#[test]
fn atomic_write() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "A\n")?;
    let (includes, src, output) = (project.includes(), project.src(), project.output());
    let mut amalgamator = configured(&includes, &src, &output);
    amalgamator.atomic(true);
    amalgamator.run()?;
    assert_eq!(fs::read_to_string(&output)?, format!("{}A\n", PREAMBLE));
    let leftovers: Vec<_> = fs::read_dir(project.tempdir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && e.path() != output)
        .collect();
    assert!(leftovers.is_empty());
    Ok(())
}

#[test]
fn missing_interface_dir_fails() -> Result<()> {
    let project = Project::new()?;
    fs::remove_dir(project.includes())?;
    let (includes, src, output) = (project.includes(), project.src(), project.output());
    let err = configured(&includes, &src, &output).run().unwrap_err();
    assert!(matches!(err, Error::ListDir { ref path, .. } if path == &includes));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn unwritable_output_fails() -> Result<()> {
    let project = Project::new()?;
    let output = project.tempdir.path().join("missing").join("lib.hpp");
    let (includes, src) = (project.includes(), project.src());
    let err = configured(&includes, &src, &output).run().unwrap_err();
    assert!(matches!(err, Error::WriteOutput { ref path, .. } if path == &output));
    Ok(())
}

#[test]
fn unreadable_file_fails() -> Result<()> {
    let project = Project::new()?;
    project.header("good.h", "A\n")?;
    fs::write(project.includes().join("bad.h"), [0xff, 0xfe, 0x00])?;
    let err = project.run().unwrap_err();
    let err = err.downcast::<Error>()?;
    assert!(matches!(err, Error::ReadFile { ref path, .. } if path.ends_with("bad.h")));
    assert!(!project.output().exists());
    Ok(())
}

#[test]
fn inputs_are_not_modified() -> Result<()> {
    let project = Project::new()?;
    let header = "#pragma once\n#include \"b.h\"\n";
    project.header("a.h", header)?;
    project.header("b.h", "B\n")?;
    project.run()?;
    assert_eq!(fs::read_to_string(project.includes().join("a.h"))?, header);
    Ok(())
}

#[test]
fn unresolved_local_looking_includes_survive() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "int a();\n")?;
    project.source(
        "options_manager.cpp",
        "#include \"a.h\"\n#include \"options_manager.cpp\"\n#include \"detail/a.h\"\n",
    )?;
    let output = project.run()?;
    assert_eq!(
        output,
        format!(
            "{}int a();\n\n#include \"options_manager.cpp\"\n#include \"detail/a.h\"\n",
            PREAMBLE
        )
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn dangling_header_symlink_fails() -> Result<()> {
    let project = Project::new()?;
    project.header("a.h", "A\n")?;
    let broken = project.includes().join("broken.h");
    std::os::unix::fs::symlink(project.includes().join("gone.h"), &broken)?;
    let err = project.run().unwrap_err().downcast::<Error>()?;
    assert!(matches!(err, Error::ReadFile { ref path, .. } if path == &broken));
    assert!(!project.output().exists());
    Ok(())
}
