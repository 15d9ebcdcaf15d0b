/*!
 * Tests for error types and conversions
 */

use subpolish::errors::{AppError, DictionaryError, SubtitleError};

#[test]
fn test_subtitleError_malformedGroup_shouldDisplayGroup() {
    let error = SubtitleError::MalformedGroup {
        group: "1\nts\nA\nB\nC".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Malformed subtitle group"));
    assert!(display.contains("1\nts\nA\nB\nC"));
}

#[test]
fn test_subtitleError_separatorCollision_shouldDisplayIndex() {
    let error = SubtitleError::SeparatorCollision {
        separator: "|".to_string(),
        index: "12".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("\"|\""));
    assert!(display.contains("record 12"));
}

#[test]
fn test_subtitleError_segmentCountMismatch_shouldDisplayCounts() {
    let error = SubtitleError::SegmentCountMismatch { expected: 3, actual: 4 };
    let display = format!("{}", error);
    assert!(display.contains("4"));
    assert!(display.contains("expected 3"));
}

#[test]
fn test_dictionaryError_unreadable_shouldDisplayPath() {
    let error = DictionaryError::Unreadable {
        path: "names.txt".to_string(),
        message: "No such file".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("names.txt"));
    assert!(display.contains("No such file"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let subtitle_error = SubtitleError::MalformedGroup { group: "x".to_string() };
    let app_error: AppError = subtitle_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Subtitle error"));
}

#[test]
fn test_appError_fromDictionaryError_shouldWrapCorrectly() {
    let dictionary_error = DictionaryError::Unreadable {
        path: "names.txt".to_string(),
        message: "denied".to_string(),
    };
    let app_error: AppError = dictionary_error.into();
    assert!(format!("{}", app_error).contains("Dictionary error"));
}

#[test]
fn test_appError_fileAndConfig_shouldDisplayPrefix() {
    let file_error = AppError::File("Input file does not exist: \"a.srt\"".to_string());
    assert!(format!("{}", file_error).starts_with("File error: Input file does not exist"));

    let config_error = AppError::Config("Output suffix must not be empty".to_string());
    assert!(format!("{}", config_error).starts_with("Configuration error:"));
}
