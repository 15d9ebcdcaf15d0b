use std::collections::BTreeSet;
use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};
use crate::app_config::LINE_ENDING;
use crate::errors::SubtitleError;
use crate::line_formatter::{clean_caption, format_dialog, format_lyrics, format_punctuation};
use crate::name_dictionary::OrganizedNameDictionary;

// @module: Subtitle parsing, processing passes and serialization

// @const: Untranslated Latin name candidates inside target-language text
static NAME_CANDIDATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z'’])([A-Z][A-Za-z]*(?:(?:\.\s?|['’]|\s)[A-Z][A-Za-z]*)*)").unwrap()
});

// @struct: Single subtitle record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleRecord {
    // @field: Index token, kept as written
    pub index: String,

    // @field: Timestamp token, kept as written
    pub timestamp: String,

    // @field: Source-language line
    pub primary_text: Option<String>,

    // @field: Target-language line
    pub secondary_text: Option<String>,
}

impl SubtitleRecord {
    /// Creates a new subtitle record
    pub fn new(
        index: impl Into<String>,
        timestamp: impl Into<String>,
        primary_text: Option<String>,
        secondary_text: Option<String>,
    ) -> Self {
        SubtitleRecord {
            index: index.into(),
            timestamp: timestamp.into(),
            primary_text,
            secondary_text,
        }
    }

    // @creates: Record from a subtitle-file group
    // @validates: At most two content lines
    pub fn from_subtitle_group(group: &str) -> Result<Self, SubtitleError> {
        let lines: Vec<&str> = group.lines().collect();
        let (index, timestamp, content) = Self::split_header(&lines);

        let (primary_text, secondary_text) = match content {
            [] => (None, None),
            [secondary] => (None, non_empty(secondary)),
            [primary, secondary] => (non_empty(primary), non_empty(secondary)),
            _ => {
                return Err(SubtitleError::MalformedGroup {
                    group: group.to_string(),
                });
            }
        };

        Ok(Self::new(index, timestamp, primary_text, secondary_text))
    }

    // @creates: Record from a caption group, content folded into one primary line
    pub fn from_caption_group(group: &str) -> Self {
        let lines: Vec<&str> = group.lines().collect();
        let (index, timestamp, content) = Self::split_header(&lines);

        let joined = content
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self::new(index, timestamp, non_empty(&joined), None)
    }

    /// Whether both text fields are absent
    pub fn is_empty(&self) -> bool {
        self.primary_text.is_none() && self.secondary_text.is_none()
    }

    // @returns: Index line, timestamp line and the remaining content lines
    fn split_header<'a, 'b>(lines: &'b [&'a str]) -> (&'a str, &'a str, &'b [&'a str]) {
        let index = lines.first().copied().unwrap_or_default();
        let timestamp = lines.get(1).copied().unwrap_or_default();
        let content = lines.get(2..).unwrap_or(&[]);
        (index, timestamp, content)
    }
}

impl fmt::Display for SubtitleRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.index, LINE_ENDING)?;
        write!(f, "{}{}", self.timestamp, LINE_ENDING)?;
        if let Some(primary) = &self.primary_text {
            write!(f, "{}{}", primary, LINE_ENDING)?;
        }
        if let Some(secondary) = &self.secondary_text {
            write!(f, "{}{}", secondary, LINE_ENDING)?;
        }
        write!(f, "{}", LINE_ENDING)
    }
}

/// Ordered subtitle records with whole-list processing passes.
///
/// Every pass consumes the list and returns the transformed one, so passes
/// chain: `list.clean_captions().reformat()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleList {
    records: Vec<SubtitleRecord>,
}

impl SubtitleList {
    /// Create a list from already built records
    pub fn from_records(records: Vec<SubtitleRecord>) -> Self {
        SubtitleList { records }
    }

    /// Parse subtitle-file text (index, timestamp, optional primary, secondary)
    pub fn from_subtitle_text(text: &str) -> Result<Self, SubtitleError> {
        let normalized = normalize_line_endings(text);
        let records = split_groups(&normalized)
            .iter()
            .map(|group| SubtitleRecord::from_subtitle_group(group))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed {} subtitle records", records.len());
        Ok(SubtitleList { records })
    }

    /// Parse closed-caption text (index, timestamp, any number of lines)
    pub fn from_caption_text(text: &str) -> Self {
        let normalized = normalize_line_endings(text);
        let records: Vec<SubtitleRecord> = split_groups(&normalized)
            .iter()
            .map(|group| SubtitleRecord::from_caption_group(group))
            .collect();

        debug!("Parsed {} caption records", records.len());
        SubtitleList { records }
    }

    /// Records in source order
    pub fn records(&self) -> &[SubtitleRecord] {
        &self.records
    }

    /// Take the records out of the list
    pub fn into_records(self) -> Vec<SubtitleRecord> {
        self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the list holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clean the primary line of every caption record.
    ///
    /// Records whose primary line is absent or cleaned away (credits, blank
    /// or underscore-only lines) are dropped; survivors keep their order.
    pub fn clean_captions(self) -> Self {
        let before = self.records.len();

        let records: Vec<SubtitleRecord> = self
            .records
            .into_iter()
            .filter_map(|mut record| {
                let cleaned = record.primary_text.as_deref().and_then(clean_caption)?;
                record.primary_text = Some(cleaned);
                Some(record)
            })
            .collect();

        debug!("Caption cleanup kept {} of {} records", records.len(), before);
        SubtitleList { records }
    }

    /// Reformat both lines of every record: trim, punctuation, lyrics, dialog.
    ///
    /// Lines that end up empty become absent and records with nothing left are
    /// dropped. Applying the pass twice gives the same result as once.
    pub fn reformat(self) -> Self {
        let before = self.records.len();

        let records: Vec<SubtitleRecord> = self
            .records
            .into_iter()
            .filter_map(|mut record| {
                record.primary_text = record.primary_text.as_deref().and_then(reformat_line);
                record.secondary_text = record.secondary_text.as_deref().and_then(reformat_line);
                if record.is_empty() {
                    debug!("Dropping empty record {}", record.index);
                    None
                } else {
                    Some(record)
                }
            })
            .collect();

        if records.len() != before {
            debug!("Reformat dropped {} empty records", before - records.len());
        }
        SubtitleList { records }
    }

    /// Collect Latin capitalized names still present in the target-language lines.
    ///
    /// Names that are a contiguous run of words inside a longer discovered
    /// name are left out. The result is sorted and meant for an operator
    /// extending the name dictionary.
    pub fn discover_names(&self) -> Vec<String> {
        let found: BTreeSet<String> = self
            .records
            .iter()
            .filter_map(|record| record.secondary_text.as_deref())
            .flat_map(|text| {
                NAME_CANDIDATE_REGEX
                    .captures_iter(text)
                    .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim_end().to_string()))
            })
            .collect();

        found
            .iter()
            .filter(|name| !found.iter().any(|other| is_sub_segment(name, other)))
            .cloned()
            .collect()
    }

    /// Translate names in all target-language lines with one dictionary pass.
    ///
    /// The lines are joined with `separator`, translated as one block and split
    /// back. The separator must not occur in any line.
    pub fn translate_names(
        self,
        dictionary: &OrganizedNameDictionary,
        separator: &str,
    ) -> Result<Self, SubtitleError> {
        if self.records.is_empty() || dictionary.is_empty() {
            return Ok(self);
        }

        if let Some(record) = self.records.iter().find(|record| {
            record
                .secondary_text
                .as_deref()
                .is_some_and(|text| separator.is_empty() || text.contains(separator))
        }) {
            return Err(SubtitleError::SeparatorCollision {
                separator: separator.to_string(),
                index: record.index.clone(),
            });
        }

        let joined = self
            .records
            .iter()
            .map(|record| record.secondary_text.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(separator);

        let translated = dictionary.translate(&joined);
        let segments: Vec<&str> = translated.split(separator).collect();
        if segments.len() != self.records.len() {
            warn!(
                "Name translation changed the segment count ({} -> {})",
                self.records.len(),
                segments.len()
            );
            return Err(SubtitleError::SegmentCountMismatch {
                expected: self.records.len(),
                actual: segments.len(),
            });
        }

        let records = self
            .records
            .into_iter()
            .zip(segments)
            .map(|(mut record, segment)| {
                record.secondary_text = non_empty(segment);
                record
            })
            .collect();

        Ok(SubtitleList { records })
    }

    /// Render every record as index, timestamp, primary and secondary lines
    pub fn serialize(&self) -> String {
        let mut output = String::new();
        for record in &self.records {
            output.push_str(&record.to_string());
        }
        output
    }
}

impl fmt::Display for SubtitleList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle List")?;
        writeln!(f, "Records: {}", self.records.len())?;
        writeln!(
            f,
            "Bilingual: {}",
            self.records
                .iter()
                .filter(|r| r.primary_text.is_some() && r.secondary_text.is_some())
                .count()
        )?;
        Ok(())
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split subtitle text into one group per entry.
///
/// A bare-numeral line opens a new group. When entries are separated by blank
/// lines, only a numeral right after a blank line counts. Without blank lines
/// the group being built must already hold an index, a timestamp and some
/// content, the next line must be a non-blank, non-numeral timestamp line, and
/// a numeric current index must be followed by its successor. Numerals inside
/// the content are therefore kept as text.
///
/// Text before the first such line is the first group; input without any
/// index lines is one group. Trailing whitespace is stripped from each line and
/// blank lines are dropped.
pub fn split_groups(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let blank_separated = has_interior_blank_line(&lines);
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }

        let next = lines.get(i + 1).copied().unwrap_or_default();
        let after_separator = if blank_separated {
            i > 0 && lines[i - 1].is_empty()
        } else {
            current.len() >= 3 && !is_index_line(next) && follows_index(current[0], line)
        };
        let opens_group = !current.is_empty()
            && is_index_line(line)
            && !next.is_empty()
            && after_separator;

        if opens_group {
            groups.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }

    if !current.is_empty() {
        groups.push(current.join("\n"));
    }

    groups
}

fn is_index_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

// @checks: A blank line sits between two non-blank lines
fn has_interior_blank_line(lines: &[&str]) -> bool {
    let Some(first) = lines.iter().position(|line| !line.is_empty()) else {
        return false;
    };
    let last = lines.iter().rposition(|line| !line.is_empty()).unwrap_or(first);
    lines[first..last].iter().any(|line| line.is_empty())
}

// @checks: `candidate` continues the numbering of a group opened by `current_index`
fn follows_index(current_index: &str, candidate: &str) -> bool {
    match (current_index.trim().parse::<u64>(), candidate.trim().parse::<u64>()) {
        (Ok(current), Ok(next)) => current.checked_add(1) == Some(next),
        // Leading segment without a numeric index
        _ => true,
    }
}

fn reformat_line(line: &str) -> Option<String> {
    let punctuated = format_punctuation(line.trim());
    let lyrics = format_lyrics(&punctuated);
    let dialog = format_dialog(&lyrics);

    // A single speaker loses its dash; the bare line it exposes has not been
    // through the punctuation and lyrics rules yet.
    if lyrics.trim_start().starts_with('-') && !dialog.starts_with('-') {
        return reformat_line(&dialog);
    }

    non_empty(&dialog)
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// @checks: `name` is a shorter contiguous word run inside `other`
fn is_sub_segment(name: &str, other: &str) -> bool {
    let name_tokens: Vec<&str> = name.split_whitespace().collect();
    let other_tokens: Vec<&str> = other.split_whitespace().collect();

    !name_tokens.is_empty()
        && name_tokens.len() < other_tokens.len()
        && other_tokens
            .windows(name_tokens.len())
            .any(|window| window == name_tokens.as_slice())
}
