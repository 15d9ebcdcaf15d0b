/*!
 * # subpolish - bilingual subtitle cleanup
 *
 * A Rust library for preparing bilingual subtitle tracks from noisy sources.
 *
 * ## Features
 *
 * - Parse timestamped bilingual subtitle files and raw closed-caption transcripts
 * - Strip caption boilerplate (credits, hearing-aid annotations, markup)
 * - Normalize punctuation, dialog lines and lyrics lines
 * - Translate proper names with a `source = target` name dictionary
 * - Discover names still untranslated, for growing the dictionary
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and shared glyph constants
 * - `line_formatter`: Per-line text rewrites
 * - `name_dictionary`: Name dictionary parsing, organization and translation
 * - `subtitle_processor`: Group splitting, record building and list passes
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod line_formatter;
pub mod name_dictionary;
pub mod subtitle_processor;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleList, SubtitleRecord};
pub use name_dictionary::{NameDictionary, OrganizedNameDictionary};
pub use errors::{AppError, DictionaryError, SubtitleError};
