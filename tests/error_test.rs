use std::io;

use vibezip::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_zip_error_conversion() {
    let err: Error = zip::result::ZipError::FileNotFound.into();
    assert!(matches!(err, Error::ArchiveError(_)));
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::ParseError { line: 3, message: "'x' is not followed by a file block".to_string() };
    assert_eq!(err.to_string(), "Parse error at line 3: 'x' is not followed by a file block.");

    let err = Error::MetadataAbsent { location: "/tmp/app".to_string() };
    assert_eq!(err.to_string(), "No vibezip project found at '/tmp/app'.");

    let err = Error::VersionIncomparable { local: "1.0".to_string(), remote: "none".to_string() };
    assert_eq!(err.to_string(), "Cannot compare versions (local: 1.0, remote: none).");
}
