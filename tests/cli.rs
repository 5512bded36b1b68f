use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const DOC: &str = "\
<html>
<body>
<ul>
<li>
A cat on a mat.
</li>
</ul>
<table>
<tr>
<td>
red
</td>
<td>
blue
</td>
</tr>
</table>
</body>
</html>
";

fn tagtree(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tagtree"))
        .args(args)
        .output()
        .expect("failed to run tagtree")
}

fn write_doc(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("doc.html");
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_no_edits_round_trips() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, DOC);
    let out = tagtree(&[&input]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), DOC);
}

#[test]
fn test_edits_apply_in_order_to_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, DOC);
    let output = dir.path().join("out.html");
    let out = tagtree(&[
        "-e",
        "remove:ul",
        "--edit",
        "add:cat:b",
        "-e",
        "bold-row:1",
        "-e",
        "replace:b:em",
        &input,
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let expected = "\
<html>
<body>
<p>
A
<em>
cat
</em>
on a mat.
</p>
<table>
<tr>
<td>
<em>
red
</em>
</td>
<td>
<em>
blue
</em>
</td>
</tr>
</table>
</body>
</html>
";
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    assert_eq!(fs::read_to_string(&input).unwrap(), DOC);
}

#[test]
fn test_in_place() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "<html>\n<p>\nhi\n</p>\n</html>\n");
    let out = tagtree(&["-i", "-e", "remove:p", &input]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&input).unwrap(), "<html>\nhi\n</html>\n");
}

#[test]
fn test_failed_edit_reports_error() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, DOC);
    let out = tagtree(&["-e", "bold-row:5", &input]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid operation"));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_bad_edit_syntax_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, DOC);
    let out = tagtree(&["-e", "shuffle:1", &input]);
    assert!(!out.status.success());
}

#[test]
fn test_strict_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "<html>\n<em>\nx\n</b>\n</html>\n");
    assert!(tagtree(&[&input]).status.success());

    let out = tagtree(&["--strict", &input]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("line 4"));
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.html");
    let out = tagtree(&[missing.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope.html"));
}
