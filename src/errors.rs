/*!
 * Error types for the subpolish application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A subtitle-file group carried more than two content lines
    #[error("Malformed subtitle group (more than two content lines):\n{group}")]
    MalformedGroup {
        /// The offending group, verbatim
        group: String,
    },

    /// The translation separator already occurs inside a subtitle line
    #[error("Translation separator {separator:?} collides with subtitle text at record {index}")]
    SeparatorCollision {
        /// Separator that was requested
        separator: String,
        /// Index token of the first record containing it
        index: String,
    },

    /// Re-splitting the translated block did not give back one segment per record
    #[error("Translated block split into {actual} segments, expected {expected}")]
    SegmentCountMismatch {
        /// Number of records in the list
        expected: usize,
        /// Number of segments after translation
        actual: usize,
    },
}

/// Errors that can occur while loading a name dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file could not be read
    #[error("Failed to read name dictionary {path}: {message}")]
    Unreadable {
        /// Path that was requested
        path: String,
        /// Underlying I/O message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the name dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
