// ✅ Report Validation - No partially filled entity leaves a run
//
// Checks an ExtractionReport before callers serialize it:
// - persons have first + last name, companies have a name
// - indices are 1..=n in registration order
// - no two canonical records share an identity key
// - every link points at an existing party

use crate::entities::{ClassifiedParty, PartyKey};
use crate::extraction::ExtractionReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// FINDINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Record would be emitted with a missing or dangling field
    Warning,  // Record is valid but questionable
    Info,     // Nothing wrong, worth noting
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub rule_name: String,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, rule_name: &str, message: String) -> Self {
        Finding {
            severity,
            rule_name: rule_name.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub checked_parties: usize,
    pub checked_links: usize,
}

impl ValidationReport {
    /// True when nothing critical was found
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(|f| f.severity == Severity::Critical)
    }

    pub fn critical_count(&self) -> usize {
        self.count(Severity::Critical)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "Checked {} parties, {} links: {} critical, {} warnings",
            self.checked_parties,
            self.checked_links,
            self.critical_count(),
            self.warning_count()
        )
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

pub fn validate_report(report: &ExtractionReport) -> ValidationReport {
    let mut findings = Vec::new();
    let mut seen_keys: HashMap<PartyKey, usize> = HashMap::new();

    for (position, canonical) in report.parties.iter().enumerate() {
        let index = canonical.index;

        if index != position + 1 {
            findings.push(Finding::new(
                Severity::Critical,
                "index_sequence",
                format!("Party at position {} has index {}, expected {}", position, index, position + 1),
            ));
        }

        if !canonical.party.is_complete() {
            findings.push(Finding::new(
                Severity::Critical,
                "required_fields",
                format!("Party {} is missing a required name field", index),
            ));
        }

        if let ClassifiedParty::Person { first_name, .. } = &canonical.party {
            if first_name.chars().count() == 1 {
                findings.push(Finding::new(
                    Severity::Warning,
                    "initial_only",
                    format!("Party {} has only an initial as first name", index),
                ));
            }
        }

        if let Some(previous) = seen_keys.insert(canonical.key(), index) {
            findings.push(Finding::new(
                Severity::Critical,
                "duplicate_identity",
                format!("Parties {} and {} share an identity key", previous, index),
            ));
        }
    }

    for link in &report.links {
        if link.party_index == 0 || link.party_index > report.parties.len() {
            findings.push(Finding::new(
                Severity::Critical,
                "dangling_link",
                format!("Link {:?} references missing party {}", link.context, link.party_index),
            ));
        }
    }

    if !report.skipped.is_empty() {
        findings.push(Finding::new(
            Severity::Info,
            "skipped_mentions",
            format!("{} mentions produced no party", report.skipped.len()),
        ));
    }

    for finding in &findings {
        match finding.severity {
            Severity::Critical | Severity::Warning => {
                log::warn!("[{}] {}", finding.rule_name, finding.message)
            }
            Severity::Info => log::debug!("[{}] {}", finding.rule_name, finding.message),
        }
    }

    ValidationReport {
        findings,
        checked_parties: report.parties.len(),
        checked_links: report.links.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
