// Owner Parties - Core Library
// Classifies free-text owner/grantor names into persons and companies and
// deduplicates them into canonical records for one extraction run.

pub mod normalize;
pub mod rules;
pub mod classifier;
pub mod entities;
pub mod mentions;
pub mod extraction;
pub mod validation;

// Re-export commonly used types
pub use rules::{NameRules, RuleTables, ScoringWeights};
pub use classifier::{NameCandidate, NameOrder, OrderingDecision, PartyClassifier};
pub use entities::{CanonicalParty, ClassifiedParty, PartyKey, PartyKind, PartyRegistry};
pub use mentions::{MentionContext, OwnerEntry, OwnerMentions};
pub use extraction::{ExtractionReport, ExtractionRun, PartyLink, SkippedMention};
pub use validation::{validate_report, Finding, Severity, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
