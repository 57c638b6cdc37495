// Tests for error module

use hashsum::hash::HashSumError;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

#[test]
fn test_directory_not_found_display() {
    let error = HashSumError::DirectoryNotFound {
        path: PathBuf::from("/path/to/dir"),
    };
    let message = error.to_string();
    assert!(message.contains("Directory not found"));
    assert!(message.contains("/path/to/dir"));
    assert!(message.contains("Suggestion"));
}

#[test]
fn test_permission_denied_display() {
    let error = HashSumError::PermissionDenied {
        path: PathBuf::from("/protected/file.txt"),
        operation: "reading".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("Permission denied"));
    assert!(message.contains("reading"));
    assert!(message.contains("/protected/file.txt"));
}

#[test]
fn test_io_error_keeps_source() {
    let error = HashSumError::Io {
        path: PathBuf::from("data.bin"),
        operation: "reading".to_string(),
        source: io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"),
    };
    assert!(error.source().is_some());
    assert!(error.to_string().contains("truncated"));
}

#[test]
fn test_from_io_error_not_found_while_walking() {
    let err = io::Error::new(io::ErrorKind::NotFound, "gone");
    let error = HashSumError::from_io_error(err, "walking directory", "/missing");
    assert!(matches!(error, HashSumError::DirectoryNotFound { .. }));
    assert!(error.is_walk_error());
}

#[test]
fn test_from_io_error_not_found_on_file() {
    let err = io::Error::new(io::ErrorKind::NotFound, "gone");
    let error = HashSumError::from_io_error(err, "opening", "a.txt");
    assert!(matches!(error, HashSumError::Io { .. }));
    assert!(!error.is_walk_error());
}

#[test]
fn test_from_io_error_permission_denied() {
    let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    let error = HashSumError::from_io_error(err, "opening", "secret.txt");
    match &error {
        HashSumError::PermissionDenied { path, operation } => {
            assert_eq!(path, Path::new("secret.txt"));
            assert_eq!(operation, "opening");
        }
        other => panic!("Expected PermissionDenied, got {:?}", other),
    }
    assert!(!error.is_walk_error());
}

#[test]
fn test_walk_error_classification() {
    let walk = HashSumError::Walk {
        path: PathBuf::from("root/sub"),
        reason: "denied".to_string(),
    };
    let not_dir = HashSumError::NotADirectory {
        path: PathBuf::from("file.txt"),
    };
    let report = HashSumError::ReportWrite {
        path: PathBuf::from("out.csv"),
        source: io::Error::new(io::ErrorKind::Other, "disk full"),
    };
    assert!(walk.is_walk_error());
    assert!(not_dir.is_walk_error());
    assert!(!report.is_walk_error());
    assert_eq!(walk.path(), Path::new("root/sub"));
    assert_eq!(report.path(), Path::new("out.csv"));
}
