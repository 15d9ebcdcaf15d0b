/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use subpolish::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists distinguishes directories from files
#[test]
fn test_dir_exists_withExistingDir_shouldReturnTrue() {
    assert!(FileManager::dir_exists("."));
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/episode01.srt");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::generate_output_path(input_file, output_dir, "clean", "srt");
    assert_eq!(output_path, Path::new("/tmp/output/episode01.clean.srt"));

    let dotted = FileManager::generate_output_path(input_file, output_dir, "clean", ".txt");
    assert_eq!(dotted, Path::new("/tmp/output/episode01.clean.txt"));
}

/// Test that a UTF-8 byte order mark is dropped on read
#[test]
fn test_read_to_string_withByteOrderMark_shouldStripIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bom.srt", "\u{FEFF}1\nts\nHi\n")?;

    assert_eq!(FileManager::read_to_string(&path)?, "1\nts\nHi\n");
    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("deeper").join("out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(fs::read_to_string(&path)?, "content");
    Ok(())
}

/// Test recursive file search by extension
#[test]
fn test_find_files_withNestedFiles_shouldFindByExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "a.srt", "")?;
    common::create_test_file(&nested, "b.SRT", "")?;
    common::create_test_file(&nested, "notes.md", "")?;

    let found = FileManager::find_files(temp_dir.path(), "srt")?;
    assert_eq!(found.len(), 2);

    let dotted = FileManager::find_files(temp_dir.path(), ".md")?;
    assert_eq!(dotted.len(), 1);
    Ok(())
}

/// Test appending lines to a file without a trailing newline
#[test]
fn test_append_lines_withUnterminatedFile_shouldStartOnNewLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "names.txt", "Tony = 托尼")?;

    FileManager::append_lines(&path, &["Pepper = ".to_string(), "Happy = ".to_string()])?;

    assert_eq!(fs::read_to_string(&path)?, "Tony = 托尼\nPepper = \nHappy = \n");
    Ok(())
}
