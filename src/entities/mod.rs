// Entity Models
//
// Each party has:
// - Identity key (first + last name, or company name) that decides dedup
// - Values (formatted name parts) that may be backfilled, never rewritten
// - Registry that assigns stable 1-based indices within one extraction run

pub mod party;
pub mod registry;

pub use party::{CanonicalParty, ClassifiedParty, PartyKey, PartyKind};
pub use registry::PartyRegistry;
