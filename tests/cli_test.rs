use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use vibezip::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("vz")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&["./zip.txt"])).unwrap();

    assert_eq!(parsed.source.as_deref(), Some("./zip.txt"));
    assert_eq!(parsed.output_dir, PathBuf::from("."));
    assert!(!parsed.zip);
    assert!(!parsed.yes);
    assert!(!parsed.backup);
    assert!(!parsed.check_update);
    assert!(!parsed.self_update);
    assert_eq!(parsed.timeout, None);
}

#[test]
fn test_all_creation_flags() {
    let parsed = Args::try_parse_from(make_args(&[
        "--zip",
        "--yes",
        "--backup",
        "--verbose",
        "--output-dir",
        "out",
        "--timeout",
        "30",
        "--config",
        "vz.yml",
        "https://example.com/zip.txt",
    ]))
    .unwrap();

    assert!(parsed.zip);
    assert!(parsed.yes);
    assert!(parsed.backup);
    assert!(parsed.verbose);
    assert_eq!(parsed.output_dir, PathBuf::from("out"));
    assert_eq!(parsed.timeout, Some(30));
    assert_eq!(parsed.config, Some(PathBuf::from("vz.yml")));
    assert_eq!(parsed.source.as_deref(), Some("https://example.com/zip.txt"));
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-z", "-y", "-b", "-v", "-o", "out", "doc"])).unwrap();

    assert!(parsed.zip);
    assert!(parsed.yes);
    assert!(parsed.backup);
    assert!(parsed.verbose);
    assert_eq!(parsed.output_dir, PathBuf::from("out"));
}

#[test]
fn test_check_update_without_source() {
    let parsed =
        Args::try_parse_from(make_args(&["--check-update", "--project-dir", "app.zip"])).unwrap();

    assert!(parsed.check_update);
    assert_eq!(parsed.source, None);
    assert_eq!(parsed.project_dir, PathBuf::from("app.zip"));
}

#[test]
fn test_check_update_conflicts_with_source() {
    assert!(Args::try_parse_from(make_args(&["-u", "doc.txt"])).is_err());
    assert!(Args::try_parse_from(make_args(&["--self-update", "doc.txt"])).is_err());
    assert!(Args::try_parse_from(make_args(&["--self-update", "--check-update"])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["doc.txt", "extra"])).is_err());
}

#[test]
fn test_invalid_timeout() {
    assert!(Args::try_parse_from(make_args(&["--timeout", "soon", "doc.txt"])).is_err());
}
