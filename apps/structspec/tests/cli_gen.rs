//! Integration tests for the `structspec gen` CLI subcommand

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample")
}

/// Command running in an empty directory, so no stray `structspec.toml` is picked up
fn structspec_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_structspec"));
    cmd.current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_FORMAT");
    cmd
}

fn copy_fixture(dest: &Path) {
    std::fs::create_dir_all(dest).unwrap();
    for entry in std::fs::read_dir(fixture_dir()).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), dest.join(entry.file_name())).unwrap();
    }
}

#[test]
fn test_gen_single_struct_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let output = structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--structs", "OrderDraft"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let expected = "\
// Code generated by structspec. DO NOT EDIT.

package sample

// OrderDraftSpec lists struct tag names of OrderDraft fields.
var OrderDraftSpec = struct {
\tJson struct {
\t\tItems string
\t}
}{
\tJson: struct {
\t\tItems string
\t}{
\t\tItems: \"items\",
\t},
}
";
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn test_gen_tag_allow_list() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--structs", "MyEntity", "--tag", "pg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("var MyEntitySpec = struct {"))
        .stdout(predicate::str::contains("\tPg: struct {"))
        .stdout(predicate::str::contains("\"optional_field\","))
        .stdout(predicate::str::contains("OrderSpec").not());
}

#[test]
fn test_gen_tags_missing_from_struct_give_empty_spec() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--structs", "MyEntity", "--tag", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("var MyEntitySpec = struct{}{}"));
}

#[test]
fn test_gen_regex_patterns_and_ignore() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--structs", "Order.*", "--ignore", "OrderDraft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("var OrderSpec = struct {"))
        .stdout(predicate::str::contains("\tDb: struct {"))
        .stdout(predicate::str::contains("\"order_id\","))
        .stdout(predicate::str::contains("OrderDraftSpec").not())
        .stdout(predicate::str::contains("MyEntitySpec").not());
}

#[test]
fn test_gen_exact_match_mode_treats_patterns_literally() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--structs", "Order.*", "--match-mode", "exact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package sample"))
        .stdout(predicate::str::contains("Spec = ").not());
}

#[test]
fn test_gen_skips_test_files() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("var MyEntitySpec"))
        .stdout(predicate::str::contains("var NameSpec").not())
        .stdout(predicate::str::contains("FixtureSpec").not());
}

#[test]
fn test_gen_out_pkg_overrides_package() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(fixture_dir())
        .args(["--out-pkg", "specs", "--structs", "Order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\npackage specs\n"));
}

#[test]
fn test_gen_writes_out_file_and_skips_it_on_rerun() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("models");
    copy_fixture(&src);
    let out_file = src.join("gen").join("specs.go");

    for _ in 0..2 {
        structspec_cmd(temp_dir.path())
            .args(["gen", "--src"])
            .arg(&src)
            .arg("--out-file")
            .arg(&out_file)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    let first = std::fs::read_to_string(&out_file).unwrap();
    assert!(first.starts_with("// Code generated by structspec. DO NOT EDIT."));

    // Generated into the source directory itself, the output must not feed back
    let in_src = src.join("specs.go");
    for _ in 0..2 {
        structspec_cmd(temp_dir.path())
            .args(["gen", "--src"])
            .arg(&src)
            .arg("--out-file")
            .arg(&in_src)
            .assert()
            .success();
    }
    assert_eq!(std::fs::read_to_string(&in_src).unwrap(), first);
}

#[test]
fn test_gen_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("structspec.toml"),
        format!(
            "[generate]\nsrc = {:?}\nstructs = [\"Order\"]\ntags = [\"db\"]\n",
            fixture_dir().display().to_string()
        ),
    )
    .unwrap();

    structspec_cmd(temp_dir.path())
        .arg("gen")
        .assert()
        .success()
        .stdout(predicate::str::contains("\tDb: struct {"))
        .stdout(predicate::str::contains("Json").not());

    // Flags win over the file
    structspec_cmd(temp_dir.path())
        .args(["gen", "--tag", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\tJson: struct {"))
        .stdout(predicate::str::contains("Db").not());
}

#[test]
fn test_gen_without_src_fails() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .arg("gen")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad configuration"))
        .stderr(predicate::str::contains("--src"));
}

#[test]
fn test_gen_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--config", "missing.toml", "--src"])
        .arg(fixture_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad configuration"))
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_gen_invalid_regex_fails_as_configuration() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .args(["gen", "--structs", "Order(", "--src"])
        .arg(fixture_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad configuration"))
        .stderr(predicate::str::contains("Order("));
}

#[test]
fn test_gen_syntax_error_fails_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("models");
    copy_fixture(&src);
    std::fs::write(src.join("broken.go"), "package sample\n\ntype Broken struct {\n").unwrap();
    let out_file = temp_dir.path().join("specs.go");

    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(&src)
        .arg("--out-file")
        .arg(&out_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse files"))
        .stderr(predicate::str::contains("broken.go"));

    assert!(!out_file.exists());
}

#[test]
fn test_version_flag() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_gen_debug_logs_loaded_configuration_on_stderr() {
    let temp_dir = TempDir::new().unwrap();
    structspec_cmd(temp_dir.path())
        .env("LOG_LEVEL", "debug")
        .args(["gen", "--structs", "Order", "--src"])
        .arg(fixture_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("var OrderSpec"))
        .stdout(predicate::str::contains("Configuration loaded").not())
        .stderr(predicate::str::contains("Configuration loaded"));
}

#[test]
fn test_gen_ignores_build_ignored_generator_file() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("models");
    copy_fixture(&src);
    std::fs::write(
        src.join("gen.go"),
        "//go:build ignore\n\npackage main\n\ntype Generator struct {\n\tOut string `json:\"out\"`\n}\n",
    )
    .unwrap();

    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("\npackage sample\n"))
        .stdout(predicate::str::contains("GeneratorSpec").not());
}

#[test]
fn test_gen_duplicate_local_structs_fail() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("models");
    copy_fixture(&src);
    std::fs::write(
        src.join("rows.go"),
        "package sample\n\nfunc f() {\n\ttype row struct{ A int `db:\"a\"` }\n}\n\nfunc g() {\n\ttype row struct{ B int `db:\"b\"` }\n}\n",
    )
    .unwrap();

    structspec_cmd(temp_dir.path())
        .args(["gen", "--src"])
        .arg(&src)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("parse files"))
        .stderr(predicate::str::contains("struct 'row'"));
}
