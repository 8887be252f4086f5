// 🧹 Name Normalization - Raw owner strings → clean tokens
//
// "SMITH, JOHN A"             → SMITH, | JOHN | A
// "SMITH JOHN ET AL TRUSTEE"  → SMITH | JOHN
// "DOE JANE 50% INTEREST"     → DOE | JANE
// "SMITH JOHN & JANE"         → SMITH | JOHN | & | JANE  (split later on "&")

use crate::rules::NameRules;
use regex::Regex;
use std::sync::LazyLock;

// ============================================================================
// PATTERNS
// ============================================================================

/// Parenthetical asides, e.g. "(LIFE ESTATE)".
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Percentage-interest tokens: "50%", "33.3%".
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d+)?%$").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters ignored at the edges of a token when comparing against tables.
const EDGE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '"', '(', ')'];

// ============================================================================
// CLEANED NAME
// ============================================================================

/// A raw mention after noise removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedName {
    /// Surviving tokens, original spelling and inner punctuation kept
    pub tokens: Vec<String>,
}

impl CleanedName {
    /// Whitespace-normalized text of the surviving tokens
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Comparison keys for the surviving tokens
    pub fn keys(&self) -> Vec<String> {
        self.tokens.iter().map(|t| token_key(t)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when a comma separates leading tokens ("DOE, JOHN").
    ///
    /// A comma on the final token is dangling punctuation and does not count.
    pub fn has_interior_comma(&self) -> bool {
        has_interior_comma(&self.tokens)
    }
}

pub fn has_interior_comma(tokens: &[String]) -> bool {
    match tokens.split_last() {
        Some((_, leading)) => leading.iter().any(|t| t.contains(',')),
        None => false,
    }
}

/// Upper-cased token with surrounding punctuation removed, used for table lookups.
///
/// Inner punctuation is kept so "C/O" and "CO" stay distinct.
pub fn token_key(token: &str) -> String {
    token.trim_matches(EDGE_PUNCTUATION).to_uppercase()
}

// ============================================================================
// CLEANING
// ============================================================================

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").to_string()
}

/// Remove parenthetical asides and pad joiners/commas so they tokenize cleanly.
fn prepare(raw: &str) -> String {
    let text = PARENTHETICAL_RE.replace_all(raw, " ");
    let text = text.replace('&', " & ").replace(',', ", ");
    collapse_whitespace(&text)
}

/// Clean a raw mention: strip noise phrases, percentage fragments,
/// and leading/trailing joiners.
pub fn clean(raw: &str, rules: &NameRules) -> CleanedName {
    let prepared = prepare(raw);
    let tokens: Vec<String> = prepared
        .split_whitespace()
        .filter(|t| !token_key(t).is_empty())
        .map(str::to_string)
        .collect();
    let keys: Vec<String> = tokens.iter().map(|t| token_key(t)).collect();

    let mut kept = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if PERCENT_RE.is_match(&keys[i]) {
            i += 1;
            if keys.get(i).map(String::as_str) == Some("INTEREST") {
                i += 1;
            }
            continue;
        }
        if let Some(len) = rules.noise_at(&keys, i) {
            i += len;
            continue;
        }
        kept.push(tokens[i].clone());
        i += 1;
    }

    let mut cleaned = CleanedName { tokens: trim_joiners(kept, rules) };
    if let Some(last) = cleaned.tokens.last_mut() {
        *last = last.trim_end_matches([',', ';']).to_string();
    }
    cleaned
}

/// Drop joiner tokens at either end ("& SMITH JOHN AND").
fn trim_joiners(mut tokens: Vec<String>, rules: &NameRules) -> Vec<String> {
    while tokens.last().is_some_and(|t| rules.is_joiner(&token_key(t))) {
        tokens.pop();
    }
    let leading = tokens
        .iter()
        .take_while(|t| rules.is_joiner(&token_key(t)))
        .count();
    tokens.split_off(leading)
}

/// Split a cleaned token list on joiner tokens. Empty segments are dropped.
pub fn split_on_joiners(tokens: &[String], rules: &NameRules) -> Vec<Vec<String>> {
    tokens
        .split(|t| rules.is_joiner(&token_key(t)))
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut segment = segment.to_vec();
            if let Some(last) = segment.last_mut() {
                *last = last.trim_end_matches([',', ';']).to_string();
            }
            segment
        })
        .collect()
}

// ============================================================================
// NAME PARTS
// ============================================================================

/// Keep only the characters allowed in a name part.
///
/// Letters, digits, hyphens and apostrophes always survive; periods only when
/// `keep_periods` is set (middle names such as "J.").
pub fn clean_name_token(token: &str, keep_periods: bool) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'' || (keep_periods && *c == '.'))
        .collect::<String>()
        .trim_matches(|c: char| c == '-' || c == '\'')
        .to_string()
}

/// Title case: first letter of each whitespace/hyphen/apostrophe segment upper, rest lower.
///
/// "O'BRIEN-SMITH" → "O'Brien-Smith"
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_segment_start = true;

    for c in text.chars() {
        if c.is_whitespace() || c == '-' || c == '\'' {
            result.push(c);
            at_segment_start = true;
        } else if at_segment_start {
            result.extend(c.to_uppercase());
            at_segment_start = !c.is_alphanumeric();
        } else {
            result.extend(c.to_lowercase());
        }
    }

    result
}

// ============================================================================
// TESTS
// ============================================================================
