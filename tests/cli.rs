//! Exit-code contract of the `pdfdiff` binary.
//!
//! None of these cases reach pdfium: argument errors are caught by clap and
//! unreadable inputs by the input check, so the tests run without a
//! pdfium library installed.

use std::io::Write;
use std::process::{Command, Output};

fn pdfdiff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdfdiff"))
        .args(args)
        .env_remove("PDFDIFF_DPI")
        .env_remove("PDFDIFF_CHANNEL_TOLERANCE")
        .output()
        .expect("failed to run pdfdiff")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_exits_zero() {
    let output = pdfdiff(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--output-diff"));
}

#[test]
fn no_arguments_exits_two() {
    assert_eq!(pdfdiff(&[]).status.code(), Some(2));
}

#[test]
fn single_file_exits_two() {
    assert_eq!(pdfdiff(&["a.pdf"]).status.code(), Some(2));
}

#[test]
fn dpi_out_of_range_exits_two() {
    assert_eq!(pdfdiff(&["--dpi=0", "a.pdf", "b.pdf"]).status.code(), Some(2));
    assert_eq!(
        pdfdiff(&["--dpi=2401", "a.pdf", "b.pdf"]).status.code(),
        Some(2)
    );
}

#[test]
fn tolerance_out_of_range_exits_two() {
    let output = pdfdiff(&["--channel-tolerance=300", "a.pdf", "b.pdf"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_flag_exits_two() {
    assert_eq!(
        pdfdiff(&["--frobnicate", "a.pdf", "b.pdf"]).status.code(),
        Some(2)
    );
}

#[test]
fn missing_file_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("missing-a.pdf");
    let second = dir.path().join("missing-b.pdf");

    let output = pdfdiff(&[first.to_str().unwrap(), second.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("error:"), "stderr: {err}");
    assert!(err.contains("missing-a.pdf"), "stderr: {err}");
}

#[test]
fn non_pdf_exits_three() {
    let mut text = tempfile::NamedTempFile::new().unwrap();
    text.write_all(b"just some text").unwrap();
    text.flush().unwrap();
    let path = text.path().to_str().unwrap();

    let output = pdfdiff(&[path, path]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("not a PDF"));
}
