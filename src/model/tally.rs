use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::FromIterator;

/// Votes received by each party (or alliance).
///
/// Entries are kept in a `BTreeMap`, so iteration is always lexicographic
/// by identifier. The highest-average stage breaks ties by taking the first
/// entity in this order, which makes the order part of the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally {
    votes: BTreeMap<String, u64>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, party: impl Into<String>, votes: u64) {
        self.votes.insert(party.into(), votes);
    }

    /// Add votes to a party, creating it if needed. Returns the new count,
    /// or `None` (leaving the tally unchanged) if it would overflow `u64`.
    pub fn add(&mut self, party: &str, votes: u64) -> Option<u64> {
        let count = self.votes.entry(party.to_string()).or_insert(0);
        *count = count.checked_add(votes)?;
        Some(*count)
    }

    pub fn get(&self, party: &str) -> Option<u64> {
        self.votes.get(party).copied()
    }

    pub fn contains(&self, party: &str) -> bool {
        self.votes.contains_key(party)
    }

    /// Sum of all votes, `None` if it does not fit in `u64`.
    pub fn total(&self) -> Option<u64> {
        self.votes
            .values()
            .try_fold(0u64, |sum, votes| sum.checked_add(*votes))
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.votes.iter().map(|(party, votes)| (party.as_str(), *votes))
    }

    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.votes.keys().map(String::as_str)
    }
}

impl FromIterator<(String, u64)> for VoteTally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            votes: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, u64)> for VoteTally {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(party, votes)| (party.to_string(), votes))
            .collect()
    }
}

impl fmt::Display for VoteTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(party, votes)| format!("{}: {}", party, votes))
                .join(", ")
        )
    }
}

/// Seats held by each party or alliance at some stage of the calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatTally {
    seats: BTreeMap<String, u32>,
}

impl SeatTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: impl Into<String>, seats: u32) {
        self.seats.insert(entity.into(), seats);
    }

    pub fn add_seat(&mut self, entity: &str) {
        *self.seats.entry(entity.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, entity: &str) -> Option<u32> {
        self.seats.get(entity).copied()
    }

    pub fn total(&self) -> u32 {
        self.seats.values().sum()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.seats
            .iter()
            .map(|(entity, seats)| (entity.as_str(), *seats))
    }
}

impl FromIterator<(String, u32)> for SeatTally {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            seats: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, u32)> for SeatTally {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(entity, seats)| (entity.to_string(), seats))
            .collect()
    }
}

impl fmt::Display for SeatTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(entity, seats)| format!("{}: {}", entity, seats))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_lexicographic() {
        let votes: VoteTally = vec![("Shas", 10), ("Avoda", 20), ("Meretz", 5)]
            .into_iter()
            .collect();
        let order: Vec<&str> = votes.parties().collect();
        assert_eq!(order, vec!["Avoda", "Meretz", "Shas"]);
    }

    #[test]
    fn totals_and_display() {
        let mut seats = SeatTally::new();
        seats.set("B", 3);
        seats.set("A", 6);
        seats.add_seat("A");
        seats.add_seat("C");
        assert_eq!(seats.total(), 11);
        assert_eq!(seats.to_string(), "{A: 7, B: 3, C: 1}");
    }

    #[test]
    fn add_accumulates_votes() {
        let mut votes = VoteTally::new();
        assert_eq!(votes.add("A", 10), Some(10));
        assert_eq!(votes.add("A", 5), Some(15));
        assert_eq!(votes.get("A"), Some(15));
        assert_eq!(votes.get("B"), None);
        assert_eq!(votes.total(), Some(15));
    }

    #[test]
    fn overflowing_counts_are_refused() {
        let mut votes = VoteTally::new();
        votes.insert("A", u64::MAX);
        assert_eq!(votes.add("A", 1), None);
        assert_eq!(votes.get("A"), Some(u64::MAX));

        votes.insert("B", 1);
        assert_eq!(votes.total(), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let seats: SeatTally = vec![("A", 2), ("B", 1)].into_iter().collect();
        let json = serde_json::to_string(&seats).unwrap();
        assert_eq!(json, r#"{"A":2,"B":1}"#);
    }
}
