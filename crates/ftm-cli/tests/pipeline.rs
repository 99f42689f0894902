//! Integration tests for the generate and check stages.

use std::fs;
use std::path::Path;

use ftm_cli::compiler::Compiler;
use ftm_cli::pipeline::{CheckOptions, run_check, testsuite_path, write_testsuites};
use ftm_model::{Implementation, Kind, Registry, StandardLadder};
use ftm_registry::parse_registry;

const REGISTRY: &str = r#"
attributes:
  - name: nodiscard
    support:
      clang:
        - value: 201603
language:
  - name: __cpp_x
    rows:
      - value: 201603
        cppreference-description: X
    support:
      clang:
        - value: 201603
          since: C++17
  - name: __cpp_gone
    support:
      clang:
        - value: 201103
        - removed: true
library: []
"#;

fn ladder() -> StandardLadder {
    StandardLadder::cpp()
}

fn registry() -> Registry {
    parse_registry(REGISTRY, &ladder()).unwrap()
}

fn check_options(compiler: Compiler, dry_run: bool) -> CheckOptions {
    CheckOptions {
        compiler,
        extra_args: Vec::new(),
        dry_run,
        show_commands: false,
    }
}

// --- generate ---

#[test]
fn testsuite_paths_follow_kind_and_implementation() {
    assert_eq!(
        testsuite_path(Path::new("test"), Kind::Library, Implementation::Msvc),
        Path::new("test/library/msvc.cpp")
    );
}

#[test]
fn writes_one_file_per_kind_and_implementation() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_testsuites(&registry(), &ladder(), dir.path()).unwrap();
    assert_eq!(written.len(), 9);
    for path in &written {
        assert!(path.is_file(), "{} missing", path.display());
    }

    let clang = fs::read_to_string(dir.path().join("language/clang.cpp")).unwrap();
    assert!(clang.contains("\n// __cpp_x\n"));
    assert!(!clang.contains("__cpp_gone"));
    let gcc = fs::read_to_string(dir.path().join("language/gcc.cpp")).unwrap();
    assert!(gcc.contains("\n// __cpp_gone\n"));
    let library = fs::read_to_string(dir.path().join("library/gcc.cpp")).unwrap();
    assert!(library.starts_with("#include <version>\n"));
}

// --- check ---

#[test]
fn dry_run_prints_the_plan() {
    let mut out = Vec::new();
    let outcome = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Clang,
        Path::new("test"),
        &check_options(Compiler::for_implementation(Implementation::Clang), true),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.features, 1);
    assert_eq!(outcome.invocations, 7);
    assert!(!outcome.has_diagnostics());
    insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
    Dry run...
    Would touch test/individuals
    Would create test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++98 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++11 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++14 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++17 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++20 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++23 test/individuals/__cpp_x.cpp
    + clang -E -fno-caret-diagnostics -std=c++26 test/individuals/__cpp_x.cpp
    ");
}

#[test]
fn msvc_dry_run_uses_its_standard_switches() {
    let mut out = Vec::new();
    let mut options = check_options(Compiler::for_implementation(Implementation::Msvc), true);
    options.extra_args = vec!["-EHsc".to_string()];
    let outcome = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Msvc,
        Path::new("test"),
        &options,
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.features, 2);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(
        "+ cl -E -nologo -Zc:__cplusplus -EHsc -std:c++latest test/individuals/__cpp_gone.cpp\n"
    ));
    assert!(!text.contains("-std:c++11"));
}

#[test]
fn writes_individual_tests() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let outcome = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Clang,
        dir.path(),
        &check_options(Compiler::custom("true"), false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.invocations, 7);
    assert!(!outcome.has_diagnostics());
    assert!(out.is_empty());
    let source = fs::read_to_string(dir.path().join("individuals/__cpp_x.cpp")).unwrap();
    assert!(source.starts_with("\n\"__cpp_x\": __cpp_x\n"));
    assert!(!dir.path().join("individuals/__cpp_gone.cpp").exists());
}

#[test]
fn show_commands_prints_each_invocation() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = check_options(Compiler::custom("true"), false);
    options.show_commands = true;
    let mut out = Vec::new();
    let outcome = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Clang,
        dir.path(),
        &options,
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    let commands: Vec<&str> = text.lines().filter(|line| line.starts_with("+ true ")).collect();
    assert_eq!(commands.len(), outcome.invocations);
    assert!(!text.contains("Dry run"));
    assert!(dir.path().join("individuals/__cpp_x.cpp").exists());
}

#[cfg(unix)]
#[test]
fn diagnostics_are_reported_with_the_expansion_line() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fake-cc");
    fs::write(
        &script,
        "#!/bin/sh\necho \"warning: unexpected value\" >&2\necho '\"__cpp_x\": 201603L'\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let mut out = Vec::new();
    let outcome = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Clang,
        dir.path(),
        &check_options(Compiler::custom(script.display().to_string()), false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.diagnostics.len(), 7);
    let first = &outcome.diagnostics[0];
    assert_eq!(first.feature, "__cpp_x");
    assert_eq!(first.options, ["-std=c++98"]);
    assert_eq!(first.message, "warning: unexpected value");
    assert_eq!(first.probe.as_deref(), Some("\"__cpp_x\": 201603L"));

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(
        "warning: unexpected value\ncompiler options:  -std=c++98\n\"__cpp_x\": 201603L\n"
    ));
}

#[test]
fn missing_compiler_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let err = run_check(
        &registry(),
        &ladder(),
        Kind::Language,
        Implementation::Clang,
        dir.path(),
        &check_options(Compiler::custom("ftm-no-such-compiler"), false),
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "run ftm-no-such-compiler");
}
