//! Process-level tests driving the actual `grepcidr` binary end to end:
//! its documented command-line interface and a set of named scenarios
//! (S1-S6), using `CARGO_BIN_EXE_grepcidr` the way Cargo wires up binary
//! integration tests, with `tempfile` for scratch input/pattern files.

use std::io::Write;
use std::process::{Command, Stdio};

fn run(args: &[&str], stdin_data: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_grepcidr"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn grepcidr binary");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin_data.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn s1_single_cidr_default_mode_via_stdin() {
    let (stdout, _stderr, code) = run(
        &["192.168.0.0/16"],
        "192.168.1.1\n10.0.0.1\n172.16.1.1\n",
    );
    assert_eq!(stdout, "192.168.1.1\n");
    assert_eq!(code, 0);
}

#[test]
fn s2_count_mode() {
    let (stdout, _stderr, code) = run(
        &["-c", "10.0.0.0/8"],
        "10.1.1.1\n10.2.2.2\n11.0.0.1\n",
    );
    assert_eq!(stdout, "2\n");
    assert_eq!(code, 0);
}

#[test]
fn s3_invert_plus_include_non_ip() {
    let (stdout, _stderr, code) = run(
        &["-v", "-i", "192.168.0.0/16"],
        "noise\n192.168.1.1\n8.8.8.8\n",
    );
    assert_eq!(stdout, "noise\n8.8.8.8\n");
    assert_eq!(code, 0);
}

#[test]
fn s4_embedded_v4_in_v6_only_v4_pattern() {
    let (stdout, _stderr, code) = run(
        &["192.168.0.0/16"],
        "::ffff:192.168.1.1\n::ffff:10.0.0.1\n",
    );
    assert_eq!(stdout, "::ffff:192.168.1.1\n");
    assert_eq!(code, 0);
}

#[test]
fn s5_strict_rejection_exits_two_and_emits_nothing() {
    let (stdout, stderr, code) = run(&["-s", "192.168.1.0/23"], "192.168.1.1\n");
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
    assert_eq!(code, 2);
}

#[test]
fn s6_unspecified_v6_under_slash_zero() {
    let (stdout, _stderr, code) = run(&["::/0"], "::\n::1\n2001:db8::1\n");
    assert_eq!(stdout, "::\n::1\n2001:db8::1\n");
    assert_eq!(code, 0);
}

#[test]
fn no_matches_exits_with_code_one() {
    let (stdout, _stderr, code) = run(&["10.0.0.0/8"], "192.168.1.1\n172.16.0.1\n");
    assert!(stdout.is_empty());
    assert_eq!(code, 1);
}

#[test]
fn exact_mode_via_flag() {
    let (stdout, _stderr, code) = run(
        &["-x", "10.0.0.0/8"],
        "10.1.1.1\nprefix 10.1.1.1 suffix\n",
    );
    assert_eq!(stdout, "10.1.1.1\n");
    assert_eq!(code, 0);
}

#[test]
fn repeated_e_flags_accumulate_patterns() {
    let (stdout, _stderr, code) = run(
        &["-e", "10.0.0.0/8", "-e", "192.168.0.0/16"],
        "10.1.1.1\n192.168.2.2\n172.16.0.1\n",
    );
    assert_eq!(stdout, "10.1.1.1\n192.168.2.2\n");
    assert_eq!(code, 0);
}

#[test]
fn pattern_file_with_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let pattern_path = dir.path().join("patterns.txt");
    std::fs::write(
        &pattern_path,
        "# comment line\n\n10.0.0.0/8, 192.168.0.0/16\n",
    )
    .unwrap();

    let pattern_path_str = pattern_path.to_str().unwrap();
    let (stdout, _stderr, code) = run(
        &["-f", pattern_path_str],
        "10.1.1.1\n192.168.2.2\n172.16.0.1\n",
    );
    assert_eq!(stdout, "10.1.1.1\n192.168.2.2\n");
    assert_eq!(code, 0);
}

#[test]
fn reads_from_named_input_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let file_a = dir.path().join("a.log");
    let file_b = dir.path().join("b.log");
    std::fs::write(&file_a, "10.0.0.1\nnoise\n").unwrap();
    std::fs::write(&file_b, "10.0.0.2\n").unwrap();

    let (stdout, _stderr, code) = run(
        &[
            "10.0.0.0/8",
            file_a.to_str().unwrap(),
            file_b.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(stdout, "10.0.0.1\n10.0.0.2\n");
    assert_eq!(code, 0);
}

#[test]
fn version_flag_exits_with_code_two() {
    let (stdout, _stderr, code) = run(&["-V"], "");
    assert!(stdout.starts_with("grepcidr "));
    assert_eq!(code, 2);
}

#[test]
fn preserves_lines_without_trailing_newline() {
    let (stdout, _stderr, code) = run(&["10.0.0.0/8"], "10.0.0.1");
    assert_eq!(stdout, "10.0.0.1");
    assert_eq!(code, 0);
}
