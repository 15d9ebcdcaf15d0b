/*!
 * Name dictionary for translating proper names left untranslated in subtitles.
 *
 * The raw dictionary is read from flat `source = target` lines. Organizing it
 * produces two lookup tables:
 * - full names: the whole source name mapped to its rendering, segments joined
 *   by the canonical delimiter
 * - partial names: single source tokens mapped to the aligned target segment,
 *   derived only when token and segment counts agree
 *
 * Translation is literal substring replacement, longest key first, with every
 * full name replaced before any partial name is tried. Keys are not anchored
 * to word boundaries, so a key embedded in a longer word is replaced as well.
 */

use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::app_config::{ACCEPTED_NAME_DELIMITERS, NAME_DELIMITER};

/// Raw mapping from source full name to target rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDictionary {
    entries: BTreeMap<String, String>,
}

impl NameDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source = target` lines.
    ///
    /// Only the first two `=`-separated segments of a line are used. Lines with
    /// an empty or missing source or target are skipped; a repeated source
    /// keeps its last target.
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let mut parts = line.split('=');
            let source = parts.next().map(str::trim).unwrap_or_default();
            let target = parts.next().map(str::trim).unwrap_or_default();

            if source.is_empty() || target.is_empty() {
                continue;
            }

            if let Some(previous) = entries.insert(source.to_string(), target.to_string()) {
                debug!(
                    "Name dictionary line {}: '{}' redefined ('{}' -> '{}')",
                    line_no + 1, source, previous, target
                );
            }
        }

        Self { entries }
    }

    /// Sources written as `source =` stubs that still wait for a target.
    ///
    /// `parse` skips these lines, so they are collected separately.
    pub fn parse_stubs(content: &str) -> BTreeSet<String> {
        content
            .lines()
            .filter_map(|line| {
                let (source, rest) = line.split_once('=')?;
                let source = source.trim();
                let target = rest.split('=').next().unwrap_or_default().trim();
                (!source.is_empty() && target.is_empty()).then(|| source.to_string())
            })
            .collect()
    }

    /// Number of raw entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target rendering for a source name
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Whether a source name is mapped
    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Iterate entries in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Derive the full-name and partial-name tables.
    ///
    /// Deterministic: the same raw dictionary always yields the same tables.
    /// When two full names disagree on a shared token, the first in source
    /// order wins.
    pub fn organize(&self) -> OrganizedNameDictionary {
        let delimiter = NAME_DELIMITER.to_string();
        let mut full_names = BTreeMap::new();
        let mut partial_names: BTreeMap<String, String> = BTreeMap::new();

        for (source, target) in &self.entries {
            let tokens: Vec<&str> = source.split_whitespace().collect();
            let key = tokens.join(" ");

            if !target.contains(&ACCEPTED_NAME_DELIMITERS[..]) {
                full_names.insert(key, target.clone());
                continue;
            }

            let segments: Vec<&str> = target
                .split(&ACCEPTED_NAME_DELIMITERS[..])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

            full_names.insert(key, segments.join(delimiter.as_str()));

            if tokens.len() != segments.len() {
                debug!(
                    "Skipping partial names for '{}': {} tokens vs {} segments",
                    source, tokens.len(), segments.len()
                );
                continue;
            }

            for (token, segment) in tokens.iter().zip(segments.iter()) {
                match partial_names.get(*token) {
                    Some(existing) if existing != segment => {
                        debug!(
                            "Partial name '{}' already maps to '{}', ignoring '{}'",
                            token, existing, segment
                        );
                    }
                    Some(_) => {}
                    None => {
                        partial_names.insert(token.to_string(), segment.to_string());
                    }
                }
            }
        }

        OrganizedNameDictionary {
            full_names,
            partial_names,
        }
    }
}

impl FromIterator<(String, String)> for NameDictionary {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        Self { entries }
    }
}

/// Full-name and partial-name lookup tables derived from a `NameDictionary`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizedNameDictionary {
    full_names: BTreeMap<String, String>,
    partial_names: BTreeMap<String, String>,
}

impl OrganizedNameDictionary {
    /// Source full name to canonical target rendering
    pub fn full_names(&self) -> &BTreeMap<String, String> {
        &self.full_names
    }

    /// Source name token to target segment
    pub fn partial_names(&self) -> &BTreeMap<String, String> {
        &self.partial_names
    }

    /// Whether neither table has entries
    pub fn is_empty(&self) -> bool {
        self.full_names.is_empty() && self.partial_names.is_empty()
    }

    /// Replace every occurrence of every known name in `text`.
    ///
    /// All full names go first, longest key first, then all partial names in
    /// the same order, so a short key never splits a longer match.
    pub fn translate(&self, text: &str) -> String {
        let mut result = text.to_string();

        for table in [&self.full_names, &self.partial_names] {
            for (source, target) in longest_first(table) {
                if result.contains(source) {
                    result = result.replace(source, target);
                }
            }
        }

        result
    }
}

// Longer keys first; equal lengths fall back to key order for determinism
fn longest_first(table: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = table.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    pairs.sort_by(|a, b| {
        b.0.chars()
            .count()
            .cmp(&a.0.chars().count())
            .then_with(|| a.0.cmp(b.0))
    });
    pairs
}
