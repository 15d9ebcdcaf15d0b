/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::str::FromStr;
use subpolish::app_config::{Config, InputFormat, LogLevel, NAME_DELIMITER, LINE_ENDING};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.input_format, InputFormat::Subtitle);
    assert_eq!(config.dictionary_path, None);
    assert!(config.processing.reformat);
    assert!(config.processing.translate_names);
    assert_eq!(config.processing.translation_separator, "\n");
    assert_eq!(config.processing.output_suffix, "clean");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test the shared glyph constants
#[test]
fn test_constants_withDefaults_shouldMatchOutputConventions() {
    assert_eq!(NAME_DELIMITER, '·');
    assert_eq!(LINE_ENDING, "\r\n");
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() -> Result<()> {
    // Start with a valid config
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.processing.translation_separator = String::new();
    assert!(config.validate().is_err());

    config.processing.translation_separator = "\r\n".to_string();
    assert!(config.validate().is_err());

    config.processing.translation_separator = "\n".to_string();
    config.processing.output_suffix = "  ".to_string();
    assert!(config.validate().is_err());

    config.processing.output_suffix = "clean".to_string();
    config.dictionary_path = Some("/definitely/not/here/names.txt".to_string());
    assert!(config.validate().is_err());

    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;
    config.dictionary_path = Some(dictionary.to_string_lossy().to_string());
    assert!(config.validate().is_ok());

    Ok(())
}

/// Test that an empty JSON object deserializes to defaults
#[test]
fn test_config_deserialize_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;

    assert_eq!(config.input_format, InputFormat::Subtitle);
    assert_eq!(config.processing.translation_separator, "\n");
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

/// Test partial JSON configuration
#[test]
fn test_config_deserialize_withPartialProcessing_shouldFillMissingFields() -> Result<()> {
    let json = r#"{
        "input_format": "caption",
        "dictionary_path": "names.txt",
        "processing": { "reformat": false },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.input_format, InputFormat::Caption);
    assert_eq!(config.dictionary_path.as_deref(), Some("names.txt"));
    assert!(!config.processing.reformat);
    assert!(config.processing.translate_names);
    assert_eq!(config.processing.output_suffix, "clean");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test serialization round trip keeps every field
#[test]
fn test_config_serialize_withCustomValues_shouldRoundTrip() -> Result<()> {
    let mut config = Config::default();
    config.input_format = InputFormat::Caption;
    config.processing.translation_separator = "\u{1E}".to_string();

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.input_format, InputFormat::Caption);
    assert_eq!(parsed.processing.translation_separator, "\u{1E}");
    Ok(())
}

/// Test InputFormat parsing and display
#[test]
fn test_input_format_fromStr_withAliases_shouldParse() {
    assert_eq!(InputFormat::from_str("subtitle").unwrap(), InputFormat::Subtitle);
    assert_eq!(InputFormat::from_str("SRT").unwrap(), InputFormat::Subtitle);
    assert_eq!(InputFormat::from_str("cc").unwrap(), InputFormat::Caption);
    assert!(InputFormat::from_str("vtt").is_err());

    assert_eq!(InputFormat::Caption.to_string(), "caption");
    assert_eq!(InputFormat::Subtitle.display_name(), "Subtitle");
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
}
