use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings, plus the fixed glyphs
/// shared by the processing modules.

/// Canonical separator between the segments of a translated full name
pub const NAME_DELIMITER: char = '·';

/// Segment separators accepted in the name dictionary source
pub const ACCEPTED_NAME_DELIMITERS: [char; 2] = ['·', '•'];

/// Line ending used when serializing subtitles
pub const LINE_ENDING: &str = "\r\n";

/// Marker character for sung lyrics
pub const LYRICS_MARKER: char = '#';

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Shape of the input text
    #[serde(default)]
    pub input_format: InputFormat,

    /// Path to the `source = target` name dictionary
    #[serde(default)]
    pub dictionary_path: Option<String>,

    /// Processing pass settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Accepted input shapes
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    // @format: index, timestamp, [primary], secondary
    #[default]
    Subtitle,
    // @format: index, timestamp, any number of caption lines
    Caption,
}

impl InputFormat {
    // @returns: Capitalized format name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Subtitle => "Subtitle",
            Self::Caption => "Caption",
        }
    }

    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Subtitle => "subtitle".to_string(),
            Self::Caption => "caption".to_string(),
        }
    }
}

// Implement Display trait for InputFormat
impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for InputFormat
impl std::str::FromStr for InputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "subtitle" | "srt" => Ok(Self::Subtitle),
            "caption" | "captions" | "cc" => Ok(Self::Caption),
            _ => Err(anyhow!("Invalid input format: {}", s)),
        }
    }
}

/// Settings for the processing passes
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Run the punctuation/lyrics/dialog reformat pass
    #[serde(default = "default_true")]
    pub reformat: bool,

    /// Run the name translation pass when a dictionary is configured
    #[serde(default = "default_true")]
    pub translate_names: bool,

    /// Separator used to join secondary lines into one block for name translation.
    /// It must never occur inside a subtitle line.
    #[serde(default = "default_translation_separator")]
    pub translation_separator: String,

    /// Suffix inserted before the output file extension
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            reformat: true,
            translate_names: true,
            translation_separator: default_translation_separator(),
            output_suffix: default_output_suffix(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_translation_separator() -> String {
    "\n".to_string()
}

fn default_output_suffix() -> String {
    "clean".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let separator = &self.processing.translation_separator;
        if separator.is_empty() {
            return Err(anyhow!("Translation separator must not be empty"));
        }
        if separator.contains('\r') {
            return Err(anyhow!("Translation separator must not contain a carriage return"));
        }

        if self.processing.output_suffix.trim().is_empty() {
            return Err(anyhow!("Output suffix must not be empty"));
        }

        if let Some(path) = &self.dictionary_path {
            if !Path::new(path).is_file() {
                return Err(anyhow!("Name dictionary not found: {}", path));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_format: InputFormat::default(),
            dictionary_path: None,
            processing: ProcessingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
