/*!
 * Text rewrites applied to individual subtitle lines.
 *
 * Every function here is total: a line that does not trigger a rule comes back
 * unchanged. Only `clean_caption` may return `None`, which tells the owning
 * list to drop the record.
 *
 * - `format_punctuation`: half-width, single-trailing-space punctuation
 * - `format_lyrics`: `# <lyrics> #`
 * - `format_dialog`: `- <first>  - <second>`
 * - `clean_caption`: closed-caption boilerplate removal
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::app_config::LYRICS_MARKER;

const ELLIPSIS: &str = "...";

// Private-use code point standing in for an ellipsis while periods are respaced
const ELLIPSIS_PLACEHOLDER: char = '\u{E000}';

const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

const MUSIC_NOTES: [char; 2] = ['♪', '♫'];

/// Ellipsis at the very start of a line, optionally behind a dialog dash
static LEADING_ELLIPSIS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*-?)\s*\.{2,}\s*").unwrap()
});

/// Ellipsis right after a second speaker's dash
static DASH_ELLIPSIS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s-)\s*\.{2,}\s*").unwrap()
});

static ELLIPSIS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\.{2,}\s*").unwrap()
});

static TERMINAL_PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*([?!]+)\s*").unwrap()
});

/// Words that open an attribution line
const CREDIT_KEYWORDS: &str = r"(?:caption(?:s|ed|ing)?|subtitle[sd]?|subtitling|transcri(?:pt|bed|ption)s?|sync(?:ed|hronized)?|correct(?:ed|ions?)|translat(?:ed|ion)|timing|ripped|encoded)";

/// "Captioning by ...", "Subtitles provided by ...", "Synced and corrected by ..."
///
/// The keyword run must lead straight into `by`, so dialogue that merely starts
/// with one of the words is kept.
static CREDIT_BY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:closed[\s-]+)?{kw}(?:\s*(?:,|&|and)\s*{kw})*(?:\s+(?:made|provided|done|created|possible|brought\s+to\s+you))*\s+by\b",
        kw = CREDIT_KEYWORDS
    ))
    .unwrap()
});

/// Subtitle site names anywhere, or a line that is nothing but a web address
static CREDIT_SITE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)addic7ed|opensubtitles|subscene|podnapisi|^\W*(?:https?://)?www\.[a-z0-9-]+(?:\.[a-z0-9-]+)+\S*\s*$",
    )
    .unwrap()
});

/// Hearing-aid annotations such as `[door slams]` or `(laughs)`
static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\]]*\]|\([^)]*\)").unwrap()
});

static ITALICS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?i>").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// Normalize punctuation to half-width characters followed by exactly one space.
///
/// The passes run in a fixed order: ellipses are parked behind a placeholder,
/// `?`/`!` are respaced, then `,`/`.`, then runs of initials are glued back
/// together, edge quotes are straightened, and finally the placeholder is
/// restored. Initials must see the respaced periods, and the placeholder keeps
/// ellipses out of the period rule.
pub fn format_punctuation(line: &str) -> String {
    let half_width = to_half_width(line);

    let without_leading = LEADING_ELLIPSIS_REGEX.replace(&half_width, |caps: &Captures| {
        if caps[1].trim().is_empty() {
            String::new()
        } else {
            "- ".to_string()
        }
    });
    let without_dash = DASH_ELLIPSIS_REGEX.replace_all(&without_leading, "${1} ");
    let placeholder = format!("{} ", ELLIPSIS_PLACEHOLDER);
    let parked = ELLIPSIS_REGEX.replace_all(&without_dash, placeholder.as_str());

    let terminal = TERMINAL_PUNCTUATION_REGEX.replace_all(&parked, "${1} ");
    let separated = space_separators(&terminal);
    let initials = collapse_initials(&separated);
    let quoted = normalize_edge_quotes(&initials);

    quoted.replace(ELLIPSIS_PLACEHOLDER, ELLIPSIS)
}

/// Normalize a sung line to `# <lyrics> #`.
///
/// The trailing marker is optional on input. A marker with nothing inside
/// collapses to an empty line.
pub fn format_lyrics(line: &str) -> String {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(LYRICS_MARKER) else {
        return line.to_string();
    };

    let inner = rest.strip_suffix(LYRICS_MARKER).unwrap_or(rest).trim();
    if inner.is_empty() {
        return String::new();
    }

    format!("{marker} {inner} {marker}", marker = LYRICS_MARKER)
}

/// Normalize a dialog line.
///
/// A leading dash marks dialog; a later dash preceded by whitespace starts the
/// second speaker. Two speakers render as `- <first>  - <second>`, a single
/// speaker loses the dash.
pub fn format_dialog(line: &str) -> String {
    let trimmed = line.trim();
    if !trimmed.starts_with('-') {
        return line.to_string();
    }

    let rest = trim_dialog_prefix(trimmed);
    let Some(dash) = find_speaker_dash(rest) else {
        return rest.trim_end().to_string();
    };

    let first = rest[..dash].trim();
    let second = trim_dialog_prefix(&rest[dash..]).trim_end();
    if second.is_empty() {
        first.to_string()
    } else {
        format!("- {}  - {}", first, second)
    }
}

/// Clean one closed-caption line.
///
/// Returns `None` for credit lines and for lines left with nothing but
/// whitespace or underscores.
pub fn clean_caption(line: &str) -> Option<String> {
    let without_italics = ITALICS_REGEX.replace_all(line, "");

    if CREDIT_BY_REGEX.is_match(&without_italics) || CREDIT_SITE_REGEX.is_match(&without_italics) {
        return None;
    }

    let without_annotations = ANNOTATION_REGEX.replace_all(&without_italics, " ");
    let with_markers: String = without_annotations
        .chars()
        .map(|c| if MUSIC_NOTES.contains(&c) { LYRICS_MARKER } else { c })
        .collect();
    let collapsed = WHITESPACE_REGEX.replace_all(&with_markers, " ");
    let cleaned = collapsed.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return None;
    }

    Some(cleaned.to_string())
}

fn to_half_width(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '？' => result.push('?'),
            '！' => result.push('!'),
            '，' => result.push(','),
            '．' | '。' => result.push('.'),
            '…' => result.push_str(ELLIPSIS),
            _ => result.push(c),
        }
    }
    result
}

/// Give `,` and `.` no leading space and exactly one trailing space.
/// Separators between two digits (`3.14`, `1,000`) are left alone.
fn space_separators(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::with_capacity(line.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != ',' && c != '.' {
            result.push(c);
            i += 1;
            continue;
        }

        let prev_is_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if prev_is_digit && next_is_digit {
            result.push(c);
            i += 1;
            continue;
        }

        let kept = result.trim_end().len();
        result.truncate(kept);
        result.push(c);
        i += 1;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        result.push(' ');
    }

    result
}

/// Glue runs of two or more initials (`U. S. A. `) into `U.S.A. `.
fn collapse_initials(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        let at_word_start = i == 0 || !chars[i - 1].is_alphanumeric();
        if at_word_start {
            let (letters, end) = scan_initials(&chars, i);
            if letters.len() >= 2 {
                for letter in letters {
                    result.push(letter);
                    result.push('.');
                }
                result.push(' ');
                i = end;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }

    result
}

// @returns: Initial letters found from `start` and the index after the run
fn scan_initials(chars: &[char], start: usize) -> (Vec<char>, usize) {
    let mut letters = Vec::new();
    let mut i = start;

    while i + 1 < chars.len() && chars[i].is_ascii_uppercase() && chars[i + 1] == '.' {
        letters.push(chars[i]);
        i += 2;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
    }

    (letters, i)
}

fn normalize_edge_quotes(line: &str) -> String {
    let body = line.trim_start();
    let leading_ws = &line[..line.len() - body.len()];

    let (has_leading, body) = match body.strip_prefix(&QUOTE_CHARS[..]) {
        Some(rest) => (true, rest.trim_start()),
        None => (false, body),
    };

    let (has_trailing, body) = match body.trim_end().strip_suffix(&QUOTE_CHARS[..]) {
        Some(rest) => (true, rest.trim_end()),
        None => (false, body),
    };

    if !has_leading && !has_trailing {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len());
    result.push_str(leading_ws);
    if has_leading {
        result.push('"');
    }
    result.push_str(body);
    if has_trailing {
        result.push('"');
    }
    result
}

fn trim_dialog_prefix(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '-' || c.is_whitespace())
}

// @returns: Byte offset of the first dash preceded by whitespace
fn find_speaker_dash(text: &str) -> Option<usize> {
    let mut prev_is_space = false;
    for (offset, c) in text.char_indices() {
        if c == '-' && prev_is_space {
            return Some(offset);
        }
        prev_is_space = c.is_whitespace();
    }
    None
}
