use crate::domain::model::{MatchKind, NameKey, Roster};
use std::collections::HashMap;

/// Roster lookup tables, built once per run.
pub struct RosterIndex {
    strict: HashMap<NameKey, usize>,
    loose: HashMap<NameKey, Vec<usize>>,
}

impl RosterIndex {
    pub fn build(roster: &Roster) -> Self {
        let mut strict = HashMap::new();
        let mut loose: HashMap<NameKey, Vec<usize>> = HashMap::new();
        for (i, record) in roster.records.iter().enumerate() {
            let key = NameKey::new(
                &record.first_name,
                &record.middle_initial,
                &record.last_name,
            );
            // Duplicate identities keep the earliest roster entry.
            loose.entry(key.loose()).or_default().push(i);
            strict.entry(key).or_insert(i);
        }
        Self { strict, loose }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub roster_index: usize,
    pub kind: MatchKind,
    /// More than one roster candidate matched; first in roster order won.
    pub ambiguous: bool,
}

/// A single matching pass. Strategies are tried in a fixed order by
/// `MatchPolicy`; the first hit ends the search.
pub trait MatchStrategy {
    fn name(&self) -> &'static str;
    fn resolve(&self, key: &NameKey, index: &RosterIndex) -> Option<Resolution>;
}

/// Identity on (first, MI, last).
pub struct StrictStrategy;

impl MatchStrategy for StrictStrategy {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn resolve(&self, key: &NameKey, index: &RosterIndex) -> Option<Resolution> {
        index.strict.get(key).map(|&roster_index| Resolution {
            roster_index,
            kind: MatchKind::Strict,
            ambiguous: false,
        })
    }
}

/// Identity on (first, last), ignoring the middle initial.
pub struct LooseStrategy;

impl MatchStrategy for LooseStrategy {
    fn name(&self) -> &'static str {
        "loose"
    }

    fn resolve(&self, key: &NameKey, index: &RosterIndex) -> Option<Resolution> {
        index
            .loose
            .get(&key.loose())
            .map(|candidates| Resolution {
                roster_index: candidates[0],
                kind: MatchKind::Loose,
                ambiguous: candidates.len() > 1,
            })
    }
}

/// Ordered strategy chain. Strict precedes loose, so loose is only ever
/// consulted on strict-match failure.
pub struct MatchPolicy {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl MatchPolicy {
    pub fn standard() -> Self {
        Self {
            strategies: vec![Box::new(StrictStrategy), Box::new(LooseStrategy)],
        }
    }

    pub fn resolve(&self, key: &NameKey, index: &RosterIndex) -> Option<Resolution> {
        for strategy in &self.strategies {
            if let Some(resolution) = strategy.resolve(key, index) {
                tracing::debug!(
                    strategy = strategy.name(),
                    roster_index = resolution.roster_index,
                    "matched"
                );
                return Some(resolution);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RosterRecord;

    fn roster(entries: &[(&str, &str, &str)]) -> Roster {
        Roster {
            columns: vec![
                "First Name".to_string(),
                "MI".to_string(),
                "Last Name".to_string(),
            ],
            records: entries
                .iter()
                .map(|(first, mi, last)| RosterRecord {
                    first_name: first.to_string(),
                    middle_initial: mi.to_string(),
                    last_name: last.to_string(),
                    values: vec![first.to_string(), mi.to_string(), last.to_string()],
                })
                .collect(),
        }
    }

    #[test]
    fn test_strict_match_with_mi() {
        let roster = roster(&[("Jane", "A", "Doe")]);
        let index = RosterIndex::build(&roster);
        let resolution = MatchPolicy::standard()
            .resolve(&NameKey::new("Jane", "A", "Doe"), &index)
            .unwrap();
        assert_eq!(resolution.kind, MatchKind::Strict);
        assert_eq!(resolution.roster_index, 0);
    }

    #[test]
    fn test_loose_match_when_raw_has_no_mi() {
        let roster = roster(&[("John", "Q", "Smith")]);
        let index = RosterIndex::build(&roster);
        let resolution = MatchPolicy::standard()
            .resolve(&NameKey::new("John", "", "Smith"), &index)
            .unwrap();
        assert_eq!(resolution.kind, MatchKind::Loose);
    }

    #[test]
    fn test_strict_never_falls_back_to_loose() {
        // Two Johns: a strict hit must pick the MI-exact entry even though
        // a loose pass would have returned the earlier row.
        let roster = roster(&[("John", "A", "Smith"), ("John", "B", "Smith")]);
        let index = RosterIndex::build(&roster);
        let resolution = MatchPolicy::standard()
            .resolve(&NameKey::new("John", "B", "Smith"), &index)
            .unwrap();
        assert_eq!(resolution.kind, MatchKind::Strict);
        assert_eq!(resolution.roster_index, 1);
        assert!(!resolution.ambiguous);
    }

    #[test]
    fn test_ambiguous_loose_match_first_wins() {
        let roster = roster(&[("John", "A", "Smith"), ("John", "B", "Smith")]);
        let index = RosterIndex::build(&roster);
        let resolution = MatchPolicy::standard()
            .resolve(&NameKey::new("John", "", "Smith"), &index)
            .unwrap();
        assert_eq!(resolution.kind, MatchKind::Loose);
        assert_eq!(resolution.roster_index, 0);
        assert!(resolution.ambiguous);
    }

    #[test]
    fn test_unmatched() {
        let roster = roster(&[("Zoe", "", "Nope")]);
        let index = RosterIndex::build(&roster);
        assert!(MatchPolicy::standard()
            .resolve(&NameKey::new("Someone", "", "Else"), &index)
            .is_none());
    }

    #[test]
    fn test_match_is_case_insensitive_and_trimmed() {
        let roster = roster(&[("Jane", "A", "Doe")]);
        let index = RosterIndex::build(&roster);
        let resolution = MatchPolicy::standard()
            .resolve(&NameKey::new(" JANE ", "a", "doe"), &index)
            .unwrap();
        assert_eq!(resolution.kind, MatchKind::Strict);
    }

    #[test]
    fn test_suffix_in_raw_last_name_still_matches() {
        let roster = roster(&[("Alex", "", "Doe")]);
        let index = RosterIndex::build(&roster);
        assert!(MatchPolicy::standard()
            .resolve(&NameKey::new("Alex", "", "Doe Jr"), &index)
            .is_some());
    }
}
