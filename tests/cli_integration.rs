/*!
 * Integration tests for the reposcribe binary
 */

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

fn reposcribe(cwd: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_reposcribe"))
        .current_dir(cwd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn create_project(root: &Path) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("main.py"), "print('hi')\n").unwrap();
    fs::write(root.join("src/util.py"), "def f():\n    return 1\n").unwrap();
    fs::write(root.join("debug.log"), "noise").unwrap();
    fs::write(root.join(".gitignore"), "*.tmp\n").unwrap();
    fs::write(root.join("scratch.tmp"), "tmp").unwrap();
}

#[test]
fn test_export_with_yes() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("proj");
    create_project(&root);
    let output = root.join("context.txt");

    let args = [root.to_str().unwrap(), output.to_str().unwrap(), "--yes", "-q"];
    let result = reposcribe(temp_dir.path(), &args, "");
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("  - main.py"));
    assert!(stdout.contains("Total files: 2"));
    assert!(stdout.contains("SCRIBING COMPLETE"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("--- START FILE TREE ---\nExported File Structure:\n.\n"));
    assert!(text.contains("--- START FILE: main.py ---\nprint('hi')\n\n--- END FILE: main.py ---\n\n"));
    assert!(text.contains("--- START FILE: src/util.py ---"));
    assert!(!text.contains("debug.log"));
    assert!(!text.contains("scratch.tmp"));

    // A second run must not pick up its own previous output
    let result = reposcribe(temp_dir.path(), &args, "");
    assert!(result.status.success());
    let second = fs::read_to_string(&output).unwrap();
    assert_eq!(text, second);
    assert!(!second.contains("START FILE: context.txt"));
}

#[test]
fn test_confirmation_declined() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("proj");
    create_project(&root);
    let output = temp_dir.path().join("out.txt");

    let result = reposcribe(
        temp_dir.path(),
        &[root.to_str().unwrap(), output.to_str().unwrap(), "--no-tree"],
        "n\n",
    );

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Scribing cancelled by user."));
    assert!(!output.exists());
}

#[test]
fn test_confirmation_accepted() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("proj");
    create_project(&root);
    let output = temp_dir.path().join("out.txt");

    let result = reposcribe(
        temp_dir.path(),
        &[root.to_str().unwrap(), output.to_str().unwrap(), "--no-tree"],
        "YES\n",
    );

    assert!(result.status.success());
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("--- START FILE: main.py ---"));
}

#[test]
fn test_default_output_and_json_report() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("proj");
    create_project(&root);

    let result = reposcribe(
        temp_dir.path(),
        &["proj", "-y", "-q", "--report", "json", "--ignore", "src/"],
        "",
    );
    assert!(result.status.success());

    let output = temp_dir.path().join("output").join("proj_context.txt");
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("--- START FILE: main.py ---"));
    assert!(!text.contains("src/util.py"));

    let stdout = String::from_utf8_lossy(&result.stdout);
    let json_start = stdout.find('{').unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout[json_start..].trim()).unwrap();
    assert_eq!(value["file_count"], 1);
    assert_eq!(value["failed_files"], 0);
}

#[test]
fn test_nothing_to_export() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("proj");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("only.log"), "noise").unwrap();
    let output = temp_dir.path().join("out.txt");

    let result = reposcribe(
        temp_dir.path(),
        &[root.to_str().unwrap(), output.to_str().unwrap(), "-y"],
        "",
    );

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("No files found to scribe"));
    assert!(!output.exists());
}

#[test]
fn test_missing_project_dir_exits_with_one() {
    let temp_dir = tempdir().unwrap();
    let result = reposcribe(temp_dir.path(), &["does-not-exist", "-y"], "");

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Project directory not found"));
}
