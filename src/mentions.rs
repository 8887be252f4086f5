// 📥 Owner Mentions - Raw party mentions tagged with where they came from
//
// Sources:
// - Owner sidecar JSON: {"owners_by_date": {"current": [...], "2019-05-01": [...]}}
// - CSV rows: context,name
//
// Processing order: current owners first, then dated mentions newest first,
// then any other context keys in key order.

use crate::entities::ClassifiedParty;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

const CURRENT_KEY: &str = "current";

// ============================================================================
// MENTION CONTEXT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MentionContext {
    /// Present-day owner list
    Current,

    /// Owners as of a transaction date
    Dated(NaiveDate),

    /// Any other key, kept verbatim
    Other(String),
}

impl MentionContext {
    /// Parse a context key ("current", "2019-05-01", "05/01/2019", anything else)
    pub fn parse(key: &str) -> Self {
        let key = key.trim();

        if key.eq_ignore_ascii_case(CURRENT_KEY) {
            return MentionContext::Current;
        }

        match parse_date(key) {
            Some(date) => MentionContext::Dated(date),
            None => MentionContext::Other(key.to_string()),
        }
    }

    /// Label used in link records
    pub fn label(&self) -> String {
        match self {
            MentionContext::Current => CURRENT_KEY.to_string(),
            MentionContext::Dated(date) => date.format("%Y-%m-%d").to_string(),
            MentionContext::Other(key) => key.clone(),
        }
    }
}

impl fmt::Display for MentionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse date from string (supports YYYY-MM-DD and MM/DD/YYYY)
fn parse_date(date_str: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%m/%d/%Y") {
        return Some(date);
    }

    None
}

// ============================================================================
// OWNER ENTRY
// ============================================================================

/// One mention payload: free text, or a party some upstream step already structured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerEntry {
    Raw(String),
    Structured(ClassifiedParty),
}

impl fmt::Display for OwnerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerEntry::Raw(raw) => write!(f, "{}", raw),
            OwnerEntry::Structured(party) => write!(f, "{}", party),
        }
    }
}

impl From<&str> for OwnerEntry {
    fn from(raw: &str) -> Self {
        OwnerEntry::Raw(raw.to_string())
    }
}

// ============================================================================
// OWNER MENTIONS
// ============================================================================

#[derive(Debug, Deserialize)]
struct OwnerSidecar {
    owners_by_date: BTreeMap<String, Vec<OwnerEntry>>,
}

#[derive(Debug, Deserialize)]
struct MentionRow {
    context: String,
    name: String,
}

/// All mentions of one extraction run, grouped by context
#[derive(Debug, Clone, Default)]
pub struct OwnerMentions {
    groups: BTreeMap<MentionContext, Vec<OwnerEntry>>,
}

impl OwnerMentions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mention; source order within a context is preserved
    pub fn push(&mut self, context: MentionContext, entry: impl Into<OwnerEntry>) {
        self.groups.entry(context).or_default().push(entry.into());
    }

    /// Load an owner sidecar file
    pub fn from_sidecar_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read owner sidecar: {:?}", path))?;
        Self::from_sidecar_str(&content)
            .with_context(|| format!("Failed to parse owner sidecar: {:?}", path))
    }

    /// Parse sidecar JSON.
    ///
    /// Accepts `{"owners_by_date": {...}}` directly, or keyed by property id:
    /// `{"property_123": {"owners_by_date": {...}}}`. With several properties,
    /// the id that sorts first wins; file order is not kept.
    pub fn from_sidecar_str(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Invalid JSON")?;

        let sidecar_value = if value.get("owners_by_date").is_some() {
            value
        } else {
            value
                .as_object()
                .and_then(|map| map.values().find(|v| v.get("owners_by_date").is_some()))
                .cloned()
                .ok_or_else(|| anyhow!("No owners_by_date section found"))?
        };

        let sidecar: OwnerSidecar =
            serde_json::from_value(sidecar_value).context("Malformed owners_by_date section")?;

        let mut mentions = OwnerMentions::new();
        for (key, entries) in sidecar.owners_by_date {
            let context = MentionContext::parse(&key);
            for entry in entries {
                mentions.push(context.clone(), entry);
            }
        }

        Ok(mentions)
    }

    /// Load `context,name` rows from a CSV file
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;

        let mut mentions = OwnerMentions::new();
        for result in rdr.deserialize() {
            let row: MentionRow = result.context("Failed to deserialize mention row")?;
            mentions.push(MentionContext::parse(&row.context), OwnerEntry::Raw(row.name));
        }

        Ok(mentions)
    }

    /// Load by file extension: `.csv` as rows, anything else as sidecar JSON
    pub fn from_path(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        if is_csv {
            Self::from_csv(path)
        } else {
            Self::from_sidecar_json(path)
        }
    }

    /// Mentions in processing order
    pub fn ordered(&self) -> Vec<(&MentionContext, &OwnerEntry)> {
        let current = self
            .groups
            .iter()
            .filter(|(c, _)| matches!(c, MentionContext::Current));
        let dated = self
            .groups
            .iter()
            .filter(|(c, _)| matches!(c, MentionContext::Dated(_)))
            .rev();
        let other = self
            .groups
            .iter()
            .filter(|(c, _)| matches!(c, MentionContext::Other(_)));

        current
            .chain(dated)
            .chain(other)
            .flat_map(|(context, entries)| entries.iter().map(move |e| (context, e)))
            .collect()
    }

    pub fn contexts(&self) -> impl Iterator<Item = &MentionContext> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================
