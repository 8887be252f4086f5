// 👤 Party Entity - Person or Company
//
// "SMITH, JOHN", "JOHN SMITH", "SMITH JOHN ET AL" → one person, one identity key
// Middle names are values that may arrive later; (first, last) is the identity.

use crate::normalize::{clean_name_token, collapse_whitespace, title_case};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PARTY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Person,
    Company,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Person => "person",
            PartyKind::Company => "company",
        }
    }
}

// ============================================================================
// CLASSIFIED PARTY
// ============================================================================

/// Output of the classifier: a person with split name parts, or a company.
///
/// Constructed only through [`ClassifiedParty::person`] / [`ClassifiedParty::company`]
/// (or deserialized and checked with [`ClassifiedParty::is_complete`]) so that
/// required fields are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifiedParty {
    Person {
        first_name: String,
        #[serde(default)]
        middle_name: Option<String>,
        last_name: String,
    },
    Company {
        name: String,
    },
}

impl ClassifiedParty {
    /// Person from already formatted parts.
    ///
    /// `None` if first or last has no letter ("", "123"); a middle name
    /// without a letter is dropped.
    pub fn person(
        first_name: impl Into<String>,
        middle_name: Option<String>,
        last_name: impl Into<String>,
    ) -> Option<Self> {
        let first_name = first_name.into().trim().to_string();
        let last_name = last_name.into().trim().to_string();
        if !has_letter(&first_name) || !has_letter(&last_name) {
            return None;
        }

        let middle_name = middle_name
            .map(|m| m.trim().to_string())
            .filter(|m| has_letter(m));

        Some(ClassifiedParty::Person {
            first_name,
            middle_name,
            last_name,
        })
    }

    /// Company from cleaned text; `None` if blank
    pub fn company(name: impl Into<String>) -> Option<Self> {
        let name = collapse_whitespace(&name.into());
        if name.is_empty() {
            return None;
        }
        Some(ClassifiedParty::Company { name })
    }

    pub fn kind(&self) -> PartyKind {
        match self {
            ClassifiedParty::Person { .. } => PartyKind::Person,
            ClassifiedParty::Company { .. } => PartyKind::Company,
        }
    }

    pub fn is_person(&self) -> bool {
        self.kind() == PartyKind::Person
    }

    pub fn is_company(&self) -> bool {
        self.kind() == PartyKind::Company
    }

    pub fn last_name(&self) -> Option<&str> {
        match self {
            ClassifiedParty::Person { last_name, .. } => Some(last_name),
            ClassifiedParty::Company { .. } => None,
        }
    }

    pub fn middle_name(&self) -> Option<&str> {
        match self {
            ClassifiedParty::Person { middle_name, .. } => middle_name.as_deref(),
            ClassifiedParty::Company { .. } => None,
        }
    }

    /// Identity key used for deduplication
    pub fn key(&self) -> PartyKey {
        match self {
            ClassifiedParty::Person {
                first_name,
                last_name,
                ..
            } => PartyKey::Person {
                first_name: first_name.trim().to_uppercase(),
                last_name: last_name.trim().to_uppercase(),
            },
            ClassifiedParty::Company { name } => PartyKey::Company {
                name: name.trim().to_uppercase(),
            },
        }
    }

    /// All required fields present
    pub fn is_complete(&self) -> bool {
        match self {
            ClassifiedParty::Person {
                first_name,
                last_name,
                ..
            } => !first_name.trim().is_empty() && !last_name.trim().is_empty(),
            ClassifiedParty::Company { name } => !name.trim().is_empty(),
        }
    }

    /// Re-format a party that arrived pre-structured (e.g. from a sidecar file)
    /// the same way the classifier formats its own output.
    pub fn normalized(&self) -> Option<Self> {
        match self {
            ClassifiedParty::Person {
                first_name,
                middle_name,
                last_name,
            } => {
                let format_part = |part: &str, keep_periods: bool| {
                    let words: Vec<String> = part
                        .split_whitespace()
                        .map(|w| clean_name_token(w, keep_periods))
                        .filter(|w| !w.is_empty())
                        .collect();
                    title_case(&words.join(" "))
                };
                ClassifiedParty::person(
                    format_part(first_name.as_str(), false),
                    middle_name.as_deref().map(|m| format_part(m, true)),
                    format_part(last_name.as_str(), false),
                )
            }
            ClassifiedParty::Company { name } => ClassifiedParty::company(name.as_str()),
        }
    }

    /// Fill in a missing middle name. Returns true if the record changed.
    pub fn backfill_middle_name(&mut self, candidate: Option<&str>) -> bool {
        let Some(middle) = candidate.map(str::trim).filter(|m| !m.is_empty()) else {
            return false;
        };

        match self {
            ClassifiedParty::Person { middle_name, .. } if middle_name.is_none() => {
                *middle_name = Some(middle.to_string());
                true
            }
            _ => false,
        }
    }
}

fn has_letter(part: &str) -> bool {
    part.chars().any(char::is_alphabetic)
}

impl fmt::Display for ClassifiedParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedParty::Person {
                first_name,
                middle_name: Some(middle),
                last_name,
            } => write!(f, "{} {} {}", first_name, middle, last_name),
            ClassifiedParty::Person {
                first_name,
                last_name,
                ..
            } => write!(f, "{} {}", first_name, last_name),
            ClassifiedParty::Company { name } => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// PARTY KEY
// ============================================================================

/// Normalized identity: upper-cased (first, last) for persons, upper-cased name for companies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartyKey {
    Person { first_name: String, last_name: String },
    Company { name: String },
}

// ============================================================================
// CANONICAL PARTY
// ============================================================================

/// A deduplicated party with its stable 1-based index within one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalParty {
    pub index: usize,

    #[serde(flatten)]
    pub party: ClassifiedParty,
}

impl CanonicalParty {
    pub fn key(&self) -> PartyKey {
        self.party.key()
    }

    pub fn kind(&self) -> PartyKind {
        self.party.kind()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_requires_first_and_last() {
        assert!(ClassifiedParty::person("John", None, "Smith").is_some());
        assert!(ClassifiedParty::person("", None, "Smith").is_none());
        assert!(ClassifiedParty::person("John", None, "  ").is_none());
    }

    #[test]
    fn test_person_parts_need_a_letter() {
        assert!(ClassifiedParty::person("123", None, "456").is_none());
        assert!(ClassifiedParty::person("Smith", None, "12").is_none());

        let party = ClassifiedParty::person("John", Some("2".to_string()), "Smith").unwrap();
        assert_eq!(party.middle_name(), None);
    }

    #[test]
    fn test_blank_middle_becomes_none() {
        let party = ClassifiedParty::person("John", Some(" ".to_string()), "Smith").unwrap();
        assert_eq!(party.middle_name(), None);
    }

    #[test]
    fn test_company_requires_name() {
        assert!(ClassifiedParty::company("").is_none());
        assert_eq!(
            ClassifiedParty::company("  ACME   HOLDINGS LLC "),
            Some(ClassifiedParty::Company {
                name: "ACME HOLDINGS LLC".to_string()
            })
        );
    }

    #[test]
    fn test_person_key_ignores_middle_name_and_case() {
        let a = ClassifiedParty::person("John", None, "Smith").unwrap();
        let b = ClassifiedParty::person("JOHN", Some("Michael".to_string()), "smith").unwrap();

        assert_eq!(a.key(), b.key());
        assert_eq!(
            a.key(),
            PartyKey::Person {
                first_name: "JOHN".to_string(),
                last_name: "SMITH".to_string()
            }
        );
    }

    #[test]
    fn test_company_key_upper_trimmed() {
        let a = ClassifiedParty::company("Acme Holdings LLC").unwrap();
        let b = ClassifiedParty::company("ACME HOLDINGS LLC").unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_backfill_middle_name_only_when_missing() {
        let mut party = ClassifiedParty::person("John", None, "Doe").unwrap();

        assert!(party.backfill_middle_name(Some("Michael")));
        assert_eq!(party.middle_name(), Some("Michael"));

        // Already set - never overwritten
        assert!(!party.backfill_middle_name(Some("Robert")));
        assert_eq!(party.middle_name(), Some("Michael"));
    }

    #[test]
    fn test_normalized_structured_person() {
        let raw = ClassifiedParty::Person {
            first_name: "JOHN".to_string(),
            middle_name: Some("a.".to_string()),
            last_name: "O'BRIEN".to_string(),
        };

        let party = raw.normalized().unwrap();
        assert_eq!(party.to_string(), "John A. O'Brien");
    }

    #[test]
    fn test_normalized_rejects_incomplete_person() {
        let raw = ClassifiedParty::Person {
            first_name: "".to_string(),
            middle_name: None,
            last_name: "SMITH".to_string(),
        };

        assert!(!raw.is_complete());
        assert!(raw.normalized().is_none());
    }

    #[test]
    fn test_serialize_tagged() {
        let party = CanonicalParty {
            index: 1,
            party: ClassifiedParty::person("John", None, "Smith").unwrap(),
        };

        let json = serde_json::to_value(&party).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["type"], "person");
        assert_eq!(json["first_name"], "John");
        assert_eq!(json["last_name"], "Smith");
        assert!(json["middle_name"].is_null());
    }

    #[test]
    fn test_deserialize_structured_company() {
        let party: ClassifiedParty =
            serde_json::from_str(r#"{"type":"company","name":"ACME LLC"}"#).unwrap();
        assert_eq!(party.kind(), PartyKind::Company);
    }
}
