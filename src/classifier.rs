// 🔎 Party Classifier - Person or Company?
// Cleans a raw owner string, detects organizations, and splits person names
// into first / middle / last by scoring "First Last" against "Last First".

use crate::entities::ClassifiedParty;
use crate::normalize::{self, clean_name_token, has_interior_comma, title_case, token_key};
use crate::rules::NameRules;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// ORDERING CANDIDATES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameOrder {
    /// "JOHN MICHAEL SMITH"
    FirstLast,

    /// "SMITH JOHN MICHAEL" / "SMITH, JOHN MICHAEL"
    LastFirst,
}

/// One interpretation of a person's tokens, with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameCandidate {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub score: f64,
}

/// Both interpretations and the one chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingDecision {
    pub first_last: NameCandidate,
    pub last_first: NameCandidate,
    pub chosen: NameOrder,
}

impl OrderingDecision {
    pub fn winner(&self) -> &NameCandidate {
        match self.chosen {
            NameOrder::FirstLast => &self.first_last,
            NameOrder::LastFirst => &self.last_first,
        }
    }

    /// Formatted person for the winning candidate
    pub fn into_party(self) -> Option<ClassifiedParty> {
        let winner = match self.chosen {
            NameOrder::FirstLast => self.first_last,
            NameOrder::LastFirst => self.last_first,
        };

        ClassifiedParty::person(
            title_case(&winner.first_name),
            winner.middle_name.as_deref().map(title_case),
            title_case(&winner.last_name),
        )
    }
}

// ============================================================================
// PARTY CLASSIFIER
// ============================================================================

/// Pure classifier over a shared, immutable rule set
#[derive(Debug, Clone)]
pub struct PartyClassifier {
    rules: Arc<NameRules>,
}

impl PartyClassifier {
    /// Classifier with the built-in tables
    pub fn new() -> Self {
        Self::with_rules(NameRules::default())
    }

    pub fn with_rules(rules: NameRules) -> Self {
        Self::from_shared(Arc::new(rules))
    }

    /// Share one rule set between classifiers of parallel runs
    pub fn from_shared(rules: Arc<NameRules>) -> Self {
        PartyClassifier { rules }
    }

    pub fn rules(&self) -> &NameRules {
        &self.rules
    }

    /// Classify `raw` as a single party.
    ///
    /// Returns `None` for empty, sentinel, single-token or otherwise
    /// unclassifiable input, and for joined mentions that name more than one
    /// party ("SMITH JOHN & DOE JANE"); use [`PartyClassifier::classify_all`]
    /// for those. Never panics.
    pub fn classify(&self, raw: &str) -> Option<ClassifiedParty> {
        let mut parties = self.classify_all(raw);
        if parties.len() > 1 {
            log::debug!("Mention {:?} names {} parties, not classifying as one", raw, parties.len());
            return None;
        }
        parties.pop()
    }

    /// Classify a possibly composite mention ("SMITH JOHN & DOE JANE").
    ///
    /// Each joined segment is classified on its own. A lone given name borrows
    /// the surname of the nearest person ("SMITH JOHN & JANE"). If some
    /// segment cannot be resolved and the whole mention names an organization
    /// ("SMITH & SONS INC"), the whole mention is one company.
    pub fn classify_all(&self, raw: &str) -> Vec<ClassifiedParty> {
        let cleaned = normalize::clean(raw, &self.rules);
        let segments = normalize::split_on_joiners(&cleaned.tokens, &self.rules);

        if segments.len() <= 1 {
            return self.classify_tokens(&cleaned.tokens).into_iter().collect();
        }

        let mut resolved: Vec<Option<ClassifiedParty>> = segments
            .iter()
            .map(|segment| self.classify_tokens(segment))
            .collect();

        for i in 0..segments.len() {
            if resolved[i].is_none() {
                let inherited = self.inherit_surname(&segments[i], &resolved, i);
                resolved[i] = inherited;
            }
        }

        if resolved.iter().any(Option::is_none) && self.rules.is_company(&cleaned.keys()) {
            log::debug!("Treating composite mention {:?} as one company", raw);
            return ClassifiedParty::company(cleaned.text()).into_iter().collect();
        }

        resolved.into_iter().flatten().collect()
    }

    /// Score both orderings for `raw` without producing a party.
    ///
    /// `None` when the mention is empty, a sentinel, a company, joined, or has
    /// fewer than two name tokens.
    pub fn explain(&self, raw: &str) -> Option<OrderingDecision> {
        let cleaned = normalize::clean(raw, &self.rules);
        let keys = cleaned.keys();
        if cleaned.is_empty() || self.rules.is_sentinel(&keys) || self.rules.is_company(&keys) {
            return None;
        }
        if normalize::split_on_joiners(&cleaned.tokens, &self.rules).len() > 1 {
            return None;
        }
        self.order_tokens(&cleaned.tokens)
    }

    fn classify_tokens(&self, tokens: &[String]) -> Option<ClassifiedParty> {
        if tokens.is_empty() {
            return None;
        }

        let keys: Vec<String> = tokens.iter().map(|t| token_key(t)).collect();
        if self.rules.is_sentinel(&keys) {
            return None;
        }

        if self.rules.is_company(&keys) {
            return ClassifiedParty::company(tokens.join(" "));
        }

        let decision = self.order_tokens(tokens)?;
        let winner = decision.winner();
        if winner.score <= 0.0 {
            return None;
        }
        decision.into_party()
    }

    /// Single-token segment of a composite mention: first name + neighbour's surname.
    ///
    /// Sentinels ("UNKNOWN", "N/A"), suffixes ("JR") and tokens without a
    /// letter never become given names.
    fn inherit_surname(
        &self,
        segment: &[String],
        resolved: &[Option<ClassifiedParty>],
        position: usize,
    ) -> Option<ClassifiedParty> {
        let keys: Vec<String> = segment.iter().map(|t| token_key(t)).collect();
        if self.rules.is_sentinel(&keys) {
            return None;
        }

        let words = self.person_tokens(segment);
        let [word] = words.as_slice() else {
            return None;
        };
        let key = token_key(word);
        if self.rules.is_generational_suffix(&key) || self.rules.is_joiner(&key) {
            return None;
        }
        let given_name = clean_name_token(word, false);
        if !given_name.chars().any(char::is_alphabetic) {
            return None;
        }

        let before = resolved[..position].iter().rev();
        let after = resolved[position + 1..].iter();
        let surname = before
            .chain(after)
            .flatten()
            .find_map(|party| party.last_name())?;

        ClassifiedParty::person(title_case(&given_name), None, surname)
    }

    /// Tokens usable as name parts: joiners and punctuation-only tokens dropped,
    /// trailing generational suffixes removed while more than two remain.
    fn person_tokens(&self, tokens: &[String]) -> Vec<String> {
        let mut words: Vec<String> = tokens
            .iter()
            .filter(|t| !self.rules.is_joiner(&token_key(t)))
            .map(|t| t.trim_matches([',', ';', ':']).to_string())
            .filter(|t| !clean_name_token(t, false).is_empty())
            .collect();

        while words.len() > 2
            && words
                .last()
                .is_some_and(|w| self.rules.is_generational_suffix(&token_key(w)))
        {
            words.pop();
        }

        words
    }

    /// Build and score the "First Last" and "Last First" interpretations
    fn order_tokens(&self, tokens: &[String]) -> Option<OrderingDecision> {
        let had_comma = has_interior_comma(tokens);
        let words = self.person_tokens(tokens);
        if words.len() < 2 {
            return None;
        }

        let weights = self.rules.weights();
        let name = |w: &String| clean_name_token(w, false);
        let middle = |ws: &[String]| -> Option<String> {
            let parts: Vec<String> = ws
                .iter()
                .map(|w| clean_name_token(w, true))
                .filter(|w| !w.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        };
        let is_initial = |w: &String| name(w).chars().count() == 1;
        let is_first_name = |w: &String| self.rules.is_common_first_name(&name(w).to_uppercase());

        let n = words.len();

        let mut first_last = self.candidate(name(&words[0]), middle(&words[1..n - 1]), name(&words[n - 1]));
        if first_last.last_name.chars().count() == 1 {
            first_last.score -= weights.single_char_last_penalty;
        }
        if is_first_name(&words[0]) {
            first_last.score += weights.first_token_first_name;
        }

        let mut last_first = self.candidate(name(&words[1]), middle(&words[2..]), name(&words[0]));
        if had_comma {
            last_first.score += weights.comma;
        }
        if is_initial(&words[n - 1]) {
            last_first.score += weights.trailing_initial;
        }
        if is_initial(&words[1]) {
            last_first.score += weights.second_token_initial;
        }
        if is_first_name(&words[1]) {
            last_first.score += weights.second_token_first_name;
        }

        let chosen = if last_first.score > first_last.score {
            NameOrder::LastFirst
        } else if first_last.score > last_first.score {
            NameOrder::FirstLast
        } else if had_comma {
            NameOrder::LastFirst
        } else {
            NameOrder::FirstLast
        };

        Some(OrderingDecision {
            first_last,
            last_first,
            chosen,
        })
    }

    /// Base score shared by both orderings
    fn candidate(&self, first_name: String, middle_name: Option<String>, last_name: String) -> NameCandidate {
        let weights = self.rules.weights();
        let mut score = 0.0;

        if first_name.chars().count() > 1 {
            score += weights.first_name_length;
        }
        if last_name.chars().count() > 1 {
            score += weights.last_name_length;
        }
        if middle_name.is_some() {
            score += weights.middle_present;
        }

        NameCandidate {
            first_name,
            middle_name,
            last_name,
            score,
        }
    }
}

impl Default for PartyClassifier {
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

    fn person(first: &str, middle: Option<&str>, last: &str) -> ClassifiedParty {
        ClassifiedParty::person(first, middle.map(str::to_string), last).unwrap()
    }

    fn company(name: &str) -> ClassifiedParty {
        ClassifiedParty::company(name).unwrap()
    }

    #[test]
    fn test_first_last_plain() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("JOHN SMITH"), Some(person("John", None, "Smith")));
    }

    #[test]
    fn test_comma_forces_last_first() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("SMITH, JOHN"), Some(person("John", None, "Smith")));
        assert_eq!(classifier.classify("Doe, Jane"), Some(person("Jane", None, "Doe")));
    }

    #[test]
    fn test_common_first_name_hints_last_first() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("SMITH JOHN"), Some(person("John", None, "Smith")));
        assert_eq!(
            classifier.classify("DOE JOHN MICHAEL"),
            Some(person("John", Some("Michael"), "Doe"))
        );
    }

    #[test]
    fn test_first_middle_last_kept() {
        let classifier = PartyClassifier::new();
        assert_eq!(
            classifier.classify("JOHN MICHAEL SMITH"),
            Some(person("John", Some("Michael"), "Smith"))
        );
    }

    #[test]
    fn test_bare_initial_means_last_first() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("SMITH J"), Some(person("J", None, "Smith")));
        assert_eq!(
            classifier.classify("GARCIA ROSALIND A"),
            Some(person("Rosalind", Some("A"), "Garcia"))
        );
    }

    #[test]
    fn test_noise_contributes_nothing() {
        let classifier = PartyClassifier::new();
        assert_eq!(
            classifier.classify("SMITH JOHN ET AL"),
            Some(person("John", None, "Smith"))
        );
        assert_eq!(
            classifier.classify("JANE DOE TRUSTEE"),
            Some(person("Jane", None, "Doe"))
        );
    }

    #[test]
    fn test_generational_suffix_dropped() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("SMITH JOHN JR"), Some(person("John", None, "Smith")));
        assert_eq!(
            classifier.classify("SMITH JOHN ROBERT III"),
            Some(person("John", Some("Robert"), "Smith"))
        );
    }

    #[test]
    fn test_company_precedence() {
        let classifier = PartyClassifier::new();
        assert_eq!(
            classifier.classify("Acme Holdings LLC"),
            Some(company("Acme Holdings LLC"))
        );
        assert_eq!(
            classifier.classify("JOHN SMITH TRUST"),
            Some(company("JOHN SMITH TRUST"))
        );
        assert_eq!(
            classifier.classify("CITY OF OCALA"),
            Some(company("CITY OF OCALA"))
        );
    }

    #[test]
    fn test_trustee_stripped_but_trust_kept() {
        let classifier = PartyClassifier::new();
        let party = classifier.classify("JOHN SMITH TRUSTEE").unwrap();
        assert!(party.is_person());
    }

    #[test]
    fn test_sentinels_rejected() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify(""), None);
        assert_eq!(classifier.classify("   "), None);
        assert_eq!(classifier.classify("UNKNOWN"), None);
        assert_eq!(classifier.classify("Unknown"), None);
    }

    #[test]
    fn test_single_token_rejected() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify("Madonna"), None);
        assert_eq!(classifier.classify("MADONNA ET AL"), None);
    }

    #[test]
    fn test_title_case_output() {
        let classifier = PartyClassifier::new();
        assert_eq!(
            classifier.classify("O'BRIEN, MARY-KATE"),
            Some(person("Mary-Kate", None, "O'Brien"))
        );
    }

    #[test]
    fn test_classify_all_two_persons() {
        let classifier = PartyClassifier::new();
        let parties = classifier.classify_all("SMITH JOHN & DOE JANE");

        assert_eq!(
            parties,
            vec![person("John", None, "Smith"), person("Jane", None, "Doe")]
        );
    }

    #[test]
    fn test_classify_all_shared_surname() {
        let classifier = PartyClassifier::new();

        assert_eq!(
            classifier.classify_all("SMITH JOHN & JANE TRUSTEE"),
            vec![person("John", None, "Smith"), person("Jane", None, "Smith")]
        );
        assert_eq!(
            classifier.classify_all("JOHN AND JANE SMITH"),
            vec![person("John", None, "Smith"), person("Jane", None, "Smith")]
        );
    }

    #[test]
    fn test_classify_all_company_fallback() {
        let classifier = PartyClassifier::new();

        assert_eq!(
            classifier.classify_all("SMITH & SONS INC"),
            vec![company("SMITH & SONS INC")]
        );
    }

    #[test]
    fn test_classify_all_person_and_company() {
        let classifier = PartyClassifier::new();

        assert_eq!(
            classifier.classify_all("DOE JANE & ACME HOLDINGS LLC"),
            vec![person("Jane", None, "Doe"), company("ACME HOLDINGS LLC")]
        );
    }

    #[test]
    fn test_classify_all_single_segment() {
        let classifier = PartyClassifier::new();
        assert_eq!(classifier.classify_all("JOHN SMITH"), vec![person("John", None, "Smith")]);
        assert!(classifier.classify_all("UNKNOWN").is_empty());
    }

    #[test]
    fn test_classify_rejects_joined_mentions() {
        let classifier = PartyClassifier::new();

        assert_eq!(classifier.classify("SMITH JOHN & DOE JANE"), None);
        assert_eq!(classifier.classify("SMITH JOHN & JANE"), None);
        assert_eq!(classifier.classify("JOHN AND JANE SMITH"), None);
        assert!(classifier.explain("SMITH JOHN & DOE JANE").is_none());
    }

    #[test]
    fn test_classify_joined_mention_with_one_party() {
        let classifier = PartyClassifier::new();

        assert_eq!(
            classifier.classify("SMITH & SONS INC"),
            Some(company("SMITH & SONS INC"))
        );
        assert_eq!(
            classifier.classify("SMITH JOHN & UNKNOWN"),
            Some(person("John", None, "Smith"))
        );
    }

    #[test]
    fn test_classify_all_never_invents_given_names() {
        let classifier = PartyClassifier::new();
        let john = vec![person("John", None, "Smith")];

        assert_eq!(classifier.classify_all("SMITH JOHN & UNKNOWN"), john);
        assert_eq!(classifier.classify_all("SMITH JOHN & N/A"), john);
        assert_eq!(classifier.classify_all("JOHN SMITH & N/A"), john);
        assert_eq!(classifier.classify_all("SMITH JOHN & JR"), john);
        assert_eq!(classifier.classify_all("SMITH JOHN & 1/2"), john);
        assert_eq!(classifier.classify_all("SMITH JOHN & NONE"), john);
    }

    #[test]
    fn test_name_parts_need_a_letter() {
        let classifier = PartyClassifier::new();

        assert_eq!(classifier.classify("123 456"), None);
        assert_eq!(classifier.classify("SMITH 1/2"), None);
        assert!(classifier.classify_all("123 456 & 789 012").is_empty());
    }

    #[test]
    fn test_explain_scores() {
        let classifier = PartyClassifier::new();
        let decision = classifier.explain("SMITH, JOHN").unwrap();

        assert_eq!(decision.chosen, NameOrder::LastFirst);
        assert_eq!(decision.last_first.score, 8.5);
        assert_eq!(decision.first_last.score, 3.0);
        assert!(classifier.explain("ACME LLC").is_none());
    }

    #[test]
    fn test_custom_weights_change_outcome() {
        let mut rules = NameRules::default();
        rules.weights_mut().second_token_first_name = 0.0;
        let classifier = PartyClassifier::with_rules(rules);

        // Without the first-name hint, ties fall back to First-Last
        assert_eq!(classifier.classify("SMITH JOHN"), Some(person("Smith", None, "John")));
    }
}
