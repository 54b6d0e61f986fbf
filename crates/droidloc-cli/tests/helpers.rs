use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub const DEFAULT_DOC: &str = "<resources>\n    <string name=\"app_name\">Demo App</string>\n    <string name=\"greeting\">Hello</string>\n</resources>\n";
pub const FRENCH_DOC: &str =
    "<resources>\n    <string name=\"app_name\">Demo App FR</string>\n</resources>\n";

/// Module tree with a default and a French values directory. `greeting` is
/// missing from French, so every command has exactly one gap to work with.
pub fn seed_module(dir: &Path) -> PathBuf {
    let module = dir.join("demoapp");
    let values = module.join("res").join("values");
    let values_fr = module.join("res").join("values-fr");
    fs::create_dir_all(&values).expect("create values dir");
    fs::create_dir_all(&values_fr).expect("create values-fr dir");
    fs::write(values.join("strings.xml"), DEFAULT_DOC).expect("write default doc");
    fs::write(values_fr.join("strings.xml"), FRENCH_DOC).expect("write french doc");
    module
}

pub fn french_doc_path(module: &Path) -> PathBuf {
    module.join("res").join("values-fr").join("strings.xml")
}

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_droidloc"));
    cmd.env("NO_COLOR", "1")
        .env_remove("DROIDLOC_API_KEY")
        .env_remove("DROIDLOC_ACCESS_TOKEN");
    cmd
}

pub fn run_cli(cwd: &Path, args: &[&str]) -> Output {
    let mut cmd = bin();
    cmd.current_dir(cwd).args(args);
    cmd.output().expect("spawn droidloc")
}

/// Like `run_cli` but feeds `input` to the child's stdin, for the
/// confirmation prompt.
pub fn run_cli_with_stdin(cwd: &Path, args: &[&str], input: &str) -> Output {
    let mut child = bin()
        .current_dir(cwd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn droidloc");
    child
        .stdin
        .as_mut()
        .expect("child stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for droidloc")
}

pub fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!("{context_msg}\n--- needle ---\n{needle}\n--- head(10) ---\n{head}");
}
