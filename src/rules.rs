// 🏷️ Name Rules - Rules as Data
// Noise phrases, company keywords, first names and scoring weights used by the classifier

use crate::normalize::token_key;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

/// Legal boilerplate removed before classification (whole-word, case-insensitive)
const NOISE_PHRASES: &[&str] = &[
    "ET AL", "ETAL", "ET UX", "ETUX", "ET VIR", "ETVIR", "ET UXOR",
    "TRUSTEE", "TRUSTEES", "TTEE", "TTEES", "CO-TRUSTEE", "CO-TRUSTEES",
    "U/A", "U/D/T", "UDT", "AKA", "A/K/A", "FBO", "C/O",
    "JTWROS", "JT TEN", "TEN ENT", "H/W", "W/H", "DECEASED",
];

/// Organizational tokens; any whole-word match makes the mention a company
const COMPANY_KEYWORDS: &[&str] = &[
    // Legal entity suffixes
    "LLC", "L.L.C", "LC", "L.C", "INC", "INCORPORATED", "CORP", "CORPORATION",
    "CO", "COMPANY", "LTD", "LIMITED", "LP", "L.P", "LLP", "L.L.P", "PLLC",
    "PLC", "PC", "P.C",
    // Trusts and estates
    "TRUST", "TR", "REVOCABLE", "IRREVOCABLE", "ESTATE OF",
    // Institutions
    "FOUNDATION", "ASSOCIATION", "ASSOC", "ASSN", "ASSOCIATES", "PARTNERS",
    "PARTNERSHIP", "SOCIETY", "CLUB", "CHURCH", "MINISTRIES", "SCHOOL",
    "UNIVERSITY", "COLLEGE", "HOSPITAL", "FUND",
    // Real estate and finance
    "HOLDINGS", "PROPERTIES", "PROPERTY", "MANAGEMENT", "MGMT", "REALTY",
    "INVESTMENTS", "INVESTMENT", "INVESTORS", "CAPITAL", "VENTURES",
    "ENTERPRISES", "DEVELOPMENT", "DEVELOPERS", "BUILDERS", "HOMES", "RENTALS",
    "CONDOMINIUM", "CONDO", "HOA", "HOMEOWNERS", "BANK", "MORTGAGE",
    "FINANCIAL", "SAVINGS", "CREDIT UNION", "GROUP", "SERVICES", "SOLUTIONS",
    "INTERNATIONAL", "INTL",
    // Government
    "AUTHORITY", "DISTRICT", "COUNTY", "CITY OF", "STATE OF", "TOWN OF",
    "VILLAGE OF", "UNITED STATES", "DEPARTMENT", "DEPT", "COMMISSION", "BOARD",
    "FEDERAL", "NATIONAL", "HOUSING",
];

/// Curated common given names; a second token found here hints "LAST FIRST" order
const COMMON_FIRST_NAMES: &[&str] = &[
    "JOHN", "JAMES", "ROBERT", "MICHAEL", "WILLIAM", "DAVID", "RICHARD",
    "JOSEPH", "THOMAS", "CHARLES", "CHRISTOPHER", "DANIEL", "MATTHEW",
    "ANTHONY", "MARK", "DONALD", "STEVEN", "PAUL", "ANDREW", "JOSHUA",
    "KENNETH", "KEVIN", "BRIAN", "GEORGE", "TIMOTHY", "RONALD", "EDWARD",
    "JASON", "JEFFREY", "RYAN", "JACOB", "GARY", "NICHOLAS", "ERIC",
    "JONATHAN", "STEPHEN", "LARRY", "JUSTIN", "SCOTT", "BRANDON", "BENJAMIN",
    "SAMUEL", "GREGORY", "FRANK", "RAYMOND", "PATRICK", "JACK", "DENNIS",
    "JERRY", "PETER", "HENRY", "CARL", "ARTHUR", "WALTER", "ROGER", "JOSE",
    "JUAN", "CARLOS", "LUIS", "MARY", "PATRICIA", "JENNIFER", "LINDA",
    "ELIZABETH", "BARBARA", "SUSAN", "JESSICA", "SARAH", "KAREN", "NANCY",
    "LISA", "BETTY", "MARGARET", "SANDRA", "ASHLEY", "KIMBERLY", "EMILY",
    "DONNA", "MICHELLE", "DOROTHY", "CAROL", "AMANDA", "MELISSA", "DEBORAH",
    "STEPHANIE", "REBECCA", "SHARON", "LAURA", "CYNTHIA", "KATHLEEN", "AMY",
    "SHIRLEY", "ANGELA", "HELEN", "ANNA", "BRENDA", "PAMELA", "NICOLE",
    "EMMA", "SAMANTHA", "KATHERINE", "CHRISTINE", "DEBRA", "RACHEL",
    "CAROLYN", "JANET", "CATHERINE", "MARIA", "HEATHER", "DIANE", "JULIE",
    "JOYCE", "VICTORIA", "KELLY", "CHRISTINA", "JOAN", "EVELYN", "LAUREN",
    "JUDITH", "MARTHA", "CHERYL", "MEGAN", "ANDREA", "ANN", "ANNE", "ALICE",
    "JEAN", "DORIS", "JANE", "ROSE",
];

const GENERATIONAL_SUFFIXES: &[&str] = &["JR", "SR", "II", "III", "IV", "V", "2ND", "3RD"];

/// Values that mean "no owner recorded"
const SENTINEL_VALUES: &[&str] = &["UNKNOWN", "UNKNOWN OWNER", "OWNER UNKNOWN", "NONE", "N/A"];

const JOINERS: &[&str] = &["&", "AND"];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ============================================================================
// SCORING WEIGHTS
// ============================================================================

/// Weights for "First Last" vs "Last First" disambiguation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// First name longer than one character
    pub first_name_length: f64,

    /// Last name longer than one character
    pub last_name_length: f64,

    /// A middle name is present
    pub middle_present: f64,

    /// Last-First: a comma separates the leading tokens ("DOE, JOHN")
    pub comma: f64,

    /// Last-First: final token is a bare initial ("SMITH JOHN A")
    pub trailing_initial: f64,

    /// Last-First: second token is a bare initial ("SMITH J")
    pub second_token_initial: f64,

    /// Last-First: second token is a common given name ("SMITH JOHN")
    pub second_token_first_name: f64,

    /// First-Last: first token is a common given name ("JOHN MICHAEL SMITH")
    pub first_token_first_name: f64,

    /// First-Last: subtracted when the resulting last name is one character
    pub single_char_last_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            first_name_length: 1.0,
            last_name_length: 2.0,
            middle_present: 0.5,
            comma: 4.0,
            trailing_initial: 2.0,
            second_token_initial: 1.0,
            second_token_first_name: 1.5,
            first_token_first_name: 1.5,
            single_char_last_penalty: 3.0,
        }
    }
}

// ============================================================================
// RULE TABLES (file format)
// ============================================================================

/// Tables as written in a rules file.
///
/// Every field is optional; missing fields keep the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    pub noise_phrases: Vec<String>,
    pub company_keywords: Vec<String>,
    pub common_first_names: Vec<String>,
    pub generational_suffixes: Vec<String>,
    pub sentinel_values: Vec<String>,
    pub joiners: Vec<String>,
    pub weights: ScoringWeights,
}

impl Default for RuleTables {
    fn default() -> Self {
        RuleTables {
            noise_phrases: to_strings(NOISE_PHRASES),
            company_keywords: to_strings(COMPANY_KEYWORDS),
            common_first_names: to_strings(COMMON_FIRST_NAMES),
            generational_suffixes: to_strings(GENERATIONAL_SUFFIXES),
            sentinel_values: to_strings(SENTINEL_VALUES),
            joiners: to_strings(JOINERS),
            weights: ScoringWeights::default(),
        }
    }
}

// ============================================================================
// NAME RULES
// ============================================================================

/// All lookup tables the classifier consults, indexed by token key.
///
/// Indexes are built once when the rules are created or loaded; `add_*`
/// keeps them in step with the tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RuleTables", into = "RuleTables")]
pub struct NameRules {
    tables: RuleTables,
    noise: PhraseIndex,
    company: PhraseIndex,
    first_names: HashSet<String>,
    suffixes: HashSet<String>,
    sentinels: HashSet<String>,
    joiners: HashSet<String>,
}

impl From<RuleTables> for NameRules {
    fn from(tables: RuleTables) -> Self {
        NameRules {
            noise: PhraseIndex::build(&tables.noise_phrases),
            company: PhraseIndex::build(&tables.company_keywords),
            first_names: key_set(&tables.common_first_names),
            suffixes: key_set(&tables.generational_suffixes),
            sentinels: tables.sentinel_values.iter().map(|s| phrase_keys(s).join(" ")).collect(),
            joiners: key_set(&tables.joiners),
            tables,
        }
    }
}

impl From<NameRules> for RuleTables {
    fn from(rules: NameRules) -> Self {
        rules.tables
    }
}

impl Default for NameRules {
    fn default() -> Self {
        RuleTables::default().into()
    }
}

impl NameRules {
    /// Load rules from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules = Self::from_json_str(&content)?;
        log::info!(
            "Loaded name rules from {:?}: {} company keywords, {} first names",
            path.as_ref(),
            rules.tables.company_keywords.len(),
            rules.tables.common_first_names.len()
        );

        Ok(rules)
    }

    /// Parse rules from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse rules JSON")
    }

    /// The tables as loaded
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.tables.weights
    }

    pub fn weights_mut(&mut self) -> &mut ScoringWeights {
        &mut self.tables.weights
    }

    /// Add a company keyword (single word or phrase)
    pub fn add_company_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.company.insert(&keyword);
        self.tables.company_keywords.push(keyword);
    }

    /// Add a common given name
    pub fn add_first_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.first_names.insert(token_key(&name));
        self.tables.common_first_names.push(name);
    }

    /// Add a noise phrase
    pub fn add_noise_phrase(&mut self, phrase: impl Into<String>) {
        let phrase = phrase.into();
        self.noise.insert(&phrase);
        self.tables.noise_phrases.push(phrase);
    }

    /// Length of the longest noise phrase starting at `keys[i]`
    pub fn noise_at(&self, keys: &[String], i: usize) -> Option<usize> {
        self.noise.longest_at(keys, i)
    }

    /// True if any company keyword occurs in the token keys
    pub fn is_company(&self, keys: &[String]) -> bool {
        (0..keys.len()).any(|i| self.company.longest_at(keys, i).is_some())
    }

    pub fn is_joiner(&self, key: &str) -> bool {
        self.joiners.contains(key)
    }

    pub fn is_generational_suffix(&self, key: &str) -> bool {
        self.suffixes.contains(key)
    }

    pub fn is_common_first_name(&self, key: &str) -> bool {
        self.first_names.contains(key)
    }

    /// True if the whole token sequence is a sentinel ("UNKNOWN", "N/A", ...)
    pub fn is_sentinel(&self, keys: &[String]) -> bool {
        self.sentinels.contains(&keys.join(" "))
    }
}

// ============================================================================
// PHRASE MATCHING
// ============================================================================

fn phrase_keys(phrase: &str) -> Vec<String> {
    phrase
        .split_whitespace()
        .map(token_key)
        .filter(|k| !k.is_empty())
        .collect()
}

fn key_set(table: &[String]) -> HashSet<String> {
    table
        .iter()
        .map(|entry| token_key(entry))
        .filter(|k| !k.is_empty())
        .collect()
}

/// Phrases keyed by their first token: "ET AL" and "ET UX" both live under "ET"
#[derive(Debug, Clone, Default)]
struct PhraseIndex {
    by_first_key: HashMap<String, Vec<Vec<String>>>,
}

impl PhraseIndex {
    fn build(phrases: &[String]) -> Self {
        let mut index = PhraseIndex::default();
        for phrase in phrases {
            index.insert(phrase);
        }
        index
    }

    fn insert(&mut self, phrase: &str) {
        let keys = phrase_keys(phrase);
        if let Some(first) = keys.first() {
            self.by_first_key.entry(first.clone()).or_default().push(keys);
        }
    }

    /// Token count of the longest phrase matching `keys` at position `i`
    fn longest_at(&self, keys: &[String], i: usize) -> Option<usize> {
        let candidates = self.by_first_key.get(keys.get(i)?)?;
        candidates
            .iter()
            .filter(|phrase| keys[i..].starts_with(phrase.as_slice()))
            .map(Vec::len)
            .max()
    }
}

// ============================================================================
// TESTS
// ============================================================================
