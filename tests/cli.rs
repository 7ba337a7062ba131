use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_doxyref")))
}

fn docs_root() -> String {
    format!("{}/tests/fixtures/doxygen-xml", env!("CARGO_MANIFEST_DIR"))
}

/// Run with the fixture docs, plain emphasis and a scratch working directory.
fn doxyref(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cmd();
    cmd.current_dir(dir.path())
        .args(["--root", &docs_root(), "--emphasis", "plain"]);
    cmd
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- load --

#[test]
fn load_reports_counts() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .args(["load", "sample"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "5 classes and 15 methods loaded in ",
        ));
}

#[test]
fn load_missing_version_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .args(["load", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Doxygen XML not found."));
}

// -- describe --

#[test]
fn describe_class() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(
        doxyref(&dir)
            .args(["describe", "sample", "wxFrame"])
            .assert()
            .success(),
    );
    assert_eq!(
        out,
        "wxFrame (Super-classes: wxWindow)\n\
         A frame is a window whose size and position can be changed by the user. See: wxWindow\n"
    );
}

#[test]
fn describe_scoped_method_with_separator() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(
        doxyref(&dir)
            .args(["describe", "sample", "wxString::Len"])
            .assert()
            .success(),
    );
    assert_eq!(
        out,
        "size_t wxString::Len() const\nReturns the length of the string.\n"
    );
}

#[test]
fn describe_ambiguous_method() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .args(["describe", "sample", "Show"])
        .assert()
        .success()
        .stdout("2 methods found: wxFrame::Show, wxWindow::Show\n");
}

#[test]
fn describe_signatures_only() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(
        doxyref(&dir)
            .args(["describe", "sample", "wxArray", "Add", "--signature"])
            .assert()
            .success(),
    );
    assert_eq!(out.lines().count(), 3);
    assert!(!out.contains("Appends"));
}

#[test]
fn describe_json() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(
        doxyref(&dir)
            .args(["describe", "sample", "wxGetHostName", "--json"])
            .assert()
            .success(),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["api"], "sample");
    assert_eq!(value["method"], serde_json::Value::Null);
    assert_eq!(value["lines"][0], "bool wxGetHostName(char *buf, int sz)");
}

#[test]
fn describe_unknown_names() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .args(["describe", "sample", "Frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Class or method not found."));

    doxyref(&dir)
        .args(["describe", "sample", "wxString", "Frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Method not found in the given class or anywhere else.",
        ));
}

#[test]
fn irc_emphasis_marks_names() {
    let dir = TempDir::new().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["--root", &docs_root(), "--emphasis", "irc"])
        .args(["describe", "sample", "wxFrame"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\x02wxFrame\x02 (Super-classes: \x02wxWindow\x02)"));
}

// -- shell --

#[test]
fn shell_requires_load_first() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .arg("shell")
        .write_stdin("describe wxString\nload sample\nwxString::Clear\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Doxygen XML has not been loaded."))
        .stdout(predicate::str::contains("5 classes and 15 methods loaded"))
        .stdout(predicate::str::contains("void wxString::Clear()"));
}

#[test]
fn shell_exits_on_end_of_input() {
    let dir = TempDir::new().unwrap();
    doxyref(&dir)
        .args(["shell", "sample"])
        .write_stdin("Refresh\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Refresh has no description."));
}

// -- config --

#[test]
fn init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    cmd().current_dir(dir.path()).arg("init").assert().success();
    assert!(dir.path().join("doxyref.toml").is_file());

    cmd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cmd()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn config_file_sets_root_and_indicator() {
    let dir = TempDir::new().unwrap();
    let config = format!(
        "docs_root = \"{}\"\nemphasis = \"markdown\"\n\n[reducer]\npara_indicator = \" // \"\n",
        docs_root()
    );
    std::fs::write(dir.path().join("doxyref.toml"), config).unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["describe", "sample", "wxWindow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**wxWindow**"))
        .stdout(predicate::str::contains("display it. // **Deprecated**: Prefer"));
}
