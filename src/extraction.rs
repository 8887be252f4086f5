// 🔗 Extraction Run - Mentions → canonical parties + link records
//
// One run = one parcel / one input document. The run owns a fresh
// PartyRegistry, feeds it every mention in processing order, and emits:
// - parties: canonical records with stable indices
// - links: (context, party index) relationship records
// - skipped: mentions that produced no party

use crate::classifier::PartyClassifier;
use crate::entities::{CanonicalParty, PartyKind, PartyRegistry};
use crate::mentions::{OwnerEntry, OwnerMentions};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Relationship record: a mention context resolved to a canonical party
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyLink {
    pub context: String,
    pub party_index: usize,
}

/// A mention that did not classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMention {
    pub context: String,
    pub raw: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub parties: Vec<CanonicalParty>,
    pub links: Vec<PartyLink>,
    pub skipped: Vec<SkippedMention>,
}

impl ExtractionReport {
    pub fn summary(&self) -> String {
        let persons = self
            .parties
            .iter()
            .filter(|p| p.kind() == PartyKind::Person)
            .count();

        format!(
            "Parties: {} ({} persons, {} companies), Links: {}, Skipped: {}",
            self.parties.len(),
            persons,
            self.parties.len() - persons,
            self.links.len(),
            self.skipped.len()
        )
    }

    /// Indices linked to a context label
    pub fn parties_for(&self, context: &str) -> Vec<usize> {
        self.links
            .iter()
            .filter(|l| l.context == context)
            .map(|l| l.party_index)
            .collect()
    }
}

// ============================================================================
// EXTRACTION RUN
// ============================================================================

pub struct ExtractionRun {
    classifier: PartyClassifier,
}

impl ExtractionRun {
    pub fn new(classifier: PartyClassifier) -> Self {
        ExtractionRun { classifier }
    }

    /// Resolve every mention into canonical parties and link records
    pub fn run(&self, mentions: &OwnerMentions) -> ExtractionReport {
        let mut registry = PartyRegistry::with_classifier(self.classifier.clone());
        let mut links = Vec::new();
        let mut seen_links = HashSet::new();
        let mut skipped = Vec::new();

        for (context, entry) in mentions.ordered() {
            let label = context.label();

            let indices = match entry {
                OwnerEntry::Raw(raw) => registry.register_all(raw),
                OwnerEntry::Structured(party) => registry.register_party(party).into_iter().collect(),
            };

            if indices.is_empty() {
                skipped.push(SkippedMention {
                    context: label,
                    raw: entry.to_string(),
                });
                continue;
            }

            for party_index in indices {
                let link = PartyLink {
                    context: label.clone(),
                    party_index,
                };
                if seen_links.insert(link.clone()) {
                    links.push(link);
                }
            }
        }

        let report = ExtractionReport {
            parties: registry.into_parties(),
            links,
            skipped,
        };
        log::info!("Extraction run complete. {}", report.summary());
        report
    }
}

impl Default for ExtractionRun {
    fn default() -> Self {
        Self::new(PartyClassifier::new())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ClassifiedParty;
    use crate::mentions::MentionContext;
    use chrono::NaiveDate;

    fn dated(y: i32, m: u32, d: u32) -> MentionContext {
        MentionContext::Dated(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_current_owners_get_lowest_indices() {
        let mut mentions = OwnerMentions::new();
        mentions.push(dated(2010, 1, 1), "DOE JANE");
        mentions.push(dated(2010, 1, 1), "SMITH, JOHN");
        mentions.push(MentionContext::Current, "JOHN SMITH");

        let report = ExtractionRun::default().run(&mentions);

        assert_eq!(report.parties.len(), 2);
        assert_eq!(report.parties[0].party, ClassifiedParty::person("John", None, "Smith").unwrap());
        assert_eq!(report.parties_for("current"), vec![1]);
        assert_eq!(report.parties_for("2010-01-01"), vec![2, 1]);
    }

    #[test]
    fn test_composite_mention_links_each_party() {
        let mut mentions = OwnerMentions::new();
        mentions.push(MentionContext::Current, "SMITH JOHN & DOE JANE");

        let report = ExtractionRun::default().run(&mentions);

        assert_eq!(report.parties.len(), 2);
        assert_eq!(report.parties_for("current"), vec![1, 2]);
    }

    #[test]
    fn test_skipped_mentions_recorded() {
        let mut mentions = OwnerMentions::new();
        mentions.push(MentionContext::Current, "UNKNOWN");
        mentions.push(dated(2012, 2, 2), "Madonna");
        mentions.push(dated(2012, 2, 2), "ACME HOLDINGS LLC");

        let report = ExtractionRun::default().run(&mentions);

        assert_eq!(report.parties.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].context, "current");
        assert_eq!(report.skipped[1].raw, "Madonna");
    }

    #[test]
    fn test_duplicate_links_collapsed() {
        let mut mentions = OwnerMentions::new();
        mentions.push(MentionContext::Current, "SMITH JOHN");
        mentions.push(MentionContext::Current, "JOHN SMITH ET AL");

        let report = ExtractionRun::default().run(&mentions);

        assert_eq!(report.links.len(), 1);
    }

    #[test]
    fn test_structured_entries() {
        let mut mentions = OwnerMentions::new();
        mentions.push(
            MentionContext::Current,
            OwnerEntry::Structured(ClassifiedParty::Company {
                name: "ACME  LLC".to_string(),
            }),
        );
        mentions.push(dated(2000, 1, 1), "ACME LLC");

        let report = ExtractionRun::default().run(&mentions);

        assert_eq!(report.parties.len(), 1);
        assert_eq!(report.links.len(), 2);
    }

    #[test]
    fn test_summary() {
        let mut mentions = OwnerMentions::new();
        mentions.push(MentionContext::Current, "SMITH JOHN & ACME LLC");

        let report = ExtractionRun::default().run(&mentions);
        assert_eq!(
            report.summary(),
            "Parties: 2 (1 persons, 1 companies), Links: 2, Skipped: 0"
        );
    }
}
