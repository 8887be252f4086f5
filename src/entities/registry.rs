// 📇 Party Registry - Stable indices for deduplicated parties
//
// "SMITH, JOHN", "JOHN SMITH" → index 1
// "DOE JOHN" then "DOE JOHN MICHAEL" → index 2, middle name backfilled
//
// One registry per extraction run. Append-only: records are never removed or
// reordered, so an index handed out stays valid for the rest of the run.

use crate::classifier::PartyClassifier;
use crate::entities::party::{CanonicalParty, ClassifiedParty, PartyKey, PartyKind};
use std::collections::HashMap;

// ============================================================================
// PARTY REGISTRY
// ============================================================================

pub struct PartyRegistry {
    classifier: PartyClassifier,

    /// Canonical records in first-seen order; `parties[i].index == i + 1`
    parties: Vec<CanonicalParty>,

    /// Identity key → 1-based index
    index_by_key: HashMap<PartyKey, usize>,
}

impl PartyRegistry {
    /// Empty registry using the built-in rule tables
    pub fn new() -> Self {
        Self::with_classifier(PartyClassifier::new())
    }

    pub fn with_classifier(classifier: PartyClassifier) -> Self {
        PartyRegistry {
            classifier,
            parties: Vec::new(),
            index_by_key: HashMap::new(),
        }
    }

    pub fn classifier(&self) -> &PartyClassifier {
        &self.classifier
    }

    /// Classify `raw` as one name and register it.
    ///
    /// Returns the (possibly pre-existing) 1-based index, or `None` when the
    /// mention is unclassifiable or joins several parties; nothing is
    /// registered in that case. Index order is decided by call order, so
    /// callers feed current owners first (see `OwnerMentions::ordered`).
    pub fn register(&mut self, raw: &str) -> Option<usize> {
        match self.classifier.classify(raw) {
            Some(party) => Some(self.insert(party)),
            None => {
                log::debug!("Skipping unclassifiable mention {:?}", raw);
                None
            }
        }
    }

    /// Register every party of a composite mention ("SMITH JOHN & DOE JANE")
    pub fn register_all(&mut self, raw: &str) -> Vec<usize> {
        let parties = self.classifier.classify_all(raw);
        if parties.is_empty() {
            log::debug!("Skipping unclassifiable mention {:?}", raw);
        }

        parties.into_iter().map(|party| self.insert(party)).collect()
    }

    /// Register an already structured party (e.g. from a sidecar file).
    ///
    /// The party is re-formatted like classifier output; incomplete parties
    /// are rejected.
    pub fn register_party(&mut self, party: &ClassifiedParty) -> Option<usize> {
        match party.normalized() {
            Some(party) => Some(self.insert(party)),
            None => {
                log::debug!("Skipping incomplete structured party {:?}", party);
                None
            }
        }
    }

    /// Look up the index `raw` would resolve to, without registering anything
    pub fn find(&self, raw: &str) -> Option<usize> {
        let party = self.classifier.classify(raw)?;
        self.index_by_key.get(&party.key()).copied()
    }

    /// Canonical records in registration order
    pub fn all(&self) -> &[CanonicalParty] {
        &self.parties
    }

    /// Record for a 1-based index
    pub fn get(&self, index: usize) -> Option<&CanonicalParty> {
        index.checked_sub(1).and_then(|i| self.parties.get(i))
    }

    pub fn persons(&self) -> impl Iterator<Item = &CanonicalParty> {
        self.parties.iter().filter(|p| p.kind() == PartyKind::Person)
    }

    pub fn companies(&self) -> impl Iterator<Item = &CanonicalParty> {
        self.parties.iter().filter(|p| p.kind() == PartyKind::Company)
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Hand the canonical list over at the end of a run
    pub fn into_parties(self) -> Vec<CanonicalParty> {
        self.parties
    }

    fn insert(&mut self, party: ClassifiedParty) -> usize {
        let key = party.key();

        if let Some(&index) = self.index_by_key.get(&key) {
            let middle = party.middle_name();
            if let Some(existing) = self.parties.get_mut(index - 1) {
                if existing.party.backfill_middle_name(middle) {
                    log::debug!("Backfilled middle name for party {}: {}", index, existing.party);
                }
            }
            return index;
        }

        let index = self.parties.len() + 1;
        log::debug!("Registered {} {}: {}", party.kind().as_str(), index, party);
        self.parties.push(CanonicalParty { index, party });
        self.index_by_key.insert(key, index);
        index
    }
}

impl Default for PartyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = PartyRegistry::new();

        let first = registry.register("SMITH JOHN");
        let second = registry.register("SMITH JOHN");

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_token_order_collapses_to_one_party() {
        let mut registry = PartyRegistry::new();

        let a = registry.register("SMITH, JOHN");
        let b = registry.register("JOHN SMITH");
        let c = registry.register("Smith John Et Al");

        assert_eq!(a, Some(1));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_indices_assigned_in_first_seen_order() {
        let mut registry = PartyRegistry::new();

        assert_eq!(registry.register("ACME HOLDINGS LLC"), Some(1));
        assert_eq!(registry.register("DOE JANE"), Some(2));
        assert_eq!(registry.register("acme holdings llc"), Some(1));
        assert_eq!(registry.register("SMITH JOHN"), Some(3));

        let indices: Vec<usize> = registry.all().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_middle_name_backfill() {
        let mut registry = PartyRegistry::new();

        let first = registry.register("DOE JOHN");
        assert_eq!(registry.get(1).unwrap().party.middle_name(), None);

        let second = registry.register("DOE JOHN MICHAEL");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(1).unwrap().party.middle_name(), Some("Michael"));

        // A later, different middle name does not overwrite
        registry.register("DOE JOHN ROBERT");
        assert_eq!(registry.get(1).unwrap().party.middle_name(), Some("Michael"));
    }

    #[test]
    fn test_joined_mention_never_backfills() {
        let mut registry = PartyRegistry::new();

        assert_eq!(registry.register("SMITH JOHN"), Some(1));
        assert_eq!(registry.register("SMITH JOHN & JANE"), None);
        assert_eq!(registry.register("SMITH JOHN & DOE JANE"), None);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(1).unwrap().party.middle_name(), None);

        assert_eq!(registry.register_all("SMITH JOHN & JANE"), vec![1, 2]);
        assert_eq!(registry.get(1).unwrap().party.middle_name(), None);
        assert_eq!(registry.get(2).unwrap().party.to_string(), "Jane Smith");
    }

    #[test]
    fn test_unclassifiable_registers_nothing() {
        let mut registry = PartyRegistry::new();

        assert_eq!(registry.register(""), None);
        assert_eq!(registry.register("UNKNOWN"), None);
        assert_eq!(registry.register("Madonna"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_does_not_mutate() {
        let mut registry = PartyRegistry::new();
        registry.register("SMITH, JOHN");

        assert_eq!(registry.find("JOHN SMITH"), Some(1));
        assert_eq!(registry.find("DOE JANE"), None);
        assert_eq!(registry.find("UNKNOWN"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_all_composite() {
        let mut registry = PartyRegistry::new();

        let indices = registry.register_all("SMITH JOHN & DOE JANE");
        assert_eq!(indices, vec![1, 2]);

        let again = registry.register_all("DOE JANE AND SMITH JOHN");
        assert_eq!(again, vec![2, 1]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_structured_party() {
        let mut registry = PartyRegistry::new();
        registry.register("SMITH JOHN");

        let structured = ClassifiedParty::Person {
            first_name: "JOHN".to_string(),
            middle_name: Some("A".to_string()),
            last_name: "SMITH".to_string(),
        };
        assert_eq!(registry.register_party(&structured), Some(1));
        assert_eq!(registry.get(1).unwrap().party.middle_name(), Some("A"));

        let incomplete = ClassifiedParty::Company {
            name: "   ".to_string(),
        };
        assert_eq!(registry.register_party(&incomplete), None);
    }

    #[test]
    fn test_persons_and_companies() {
        let mut registry = PartyRegistry::new();
        registry.register("SMITH JOHN");
        registry.register("ACME LLC");
        registry.register("DOE JANE");

        assert_eq!(registry.persons().count(), 2);
        assert_eq!(registry.companies().count(), 1);
        assert!(registry.get(0).is_none());
        assert!(registry.get(4).is_none());
    }

    #[test]
    fn test_independent_registries() {
        let mut run_a = PartyRegistry::new();
        let mut run_b = PartyRegistry::new();

        run_a.register("ACME LLC");
        assert_eq!(run_b.register("SMITH JOHN"), Some(1));
        assert_eq!(run_a.find("SMITH JOHN"), None);
    }
}
