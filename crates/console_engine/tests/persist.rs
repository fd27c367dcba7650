use std::fs;

use console_engine::{ensure_state_dir, read_optional, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("state").join("nested");
    assert!(!dir.exists());
    ensure_state_dir(&dir).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn rewriting_replaces_the_previous_state() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(".agent_console_state.ron", "(context: Some(\"a\"))").unwrap();
    let second = writer.write(".agent_console_state.ron", "(context: None)").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "(context: None)");
    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn file_in_place_of_the_dir_fails_without_writing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("state.ron", "data").is_err());
    assert!(!file_path.with_file_name("state.ron").exists());
}

#[test]
fn missing_file_reads_as_none() {
    let temp = TempDir::new().unwrap();
    assert_eq!(read_optional(&temp.path().join("absent.ron")).unwrap(), None);

    let present = temp.path().join("present.ron");
    fs::write(&present, "()").unwrap();
    assert_eq!(read_optional(&present).unwrap().as_deref(), Some("()"));
}
