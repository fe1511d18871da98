use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub const SEQUENCE_LENGTH: usize = 5;

/// The symbols a sequence is built from, in canonical order.
pub const SYMBOLS: [u8; SEQUENCE_LENGTH] = [1, 2, 3, 4, 5];

/// A permutation of [`SYMBOLS`]. Construction validates, so every `Sequence` in the program
/// holds each value exactly once.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sequence([u8; SEQUENCE_LENGTH]);

impl Sequence {
    pub fn new(values: [u8; SEQUENCE_LENGTH]) -> Option<Self> {
        let is_permutation =
            values.iter().all(|v| SYMBOLS.contains(v)) && values.iter().all_unique();
        is_permutation.then_some(Self(values))
    }

    pub fn values(&self) -> &[u8; SEQUENCE_LENGTH] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = <[u8; SEQUENCE_LENGTH]>::deserialize(deserializer)?;
        Sequence::new(values)
            .ok_or_else(|| serde::de::Error::custom(format!("not a permutation: {:?}", values)))
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_permutations() {
        assert!(Sequence::new([1, 2, 3, 4, 5]).is_some());
        assert!(Sequence::new([5, 3, 1, 2, 4]).is_some());
        assert!(Sequence::new([1, 1, 3, 4, 5]).is_none());
        assert!(Sequence::new([0, 2, 3, 4, 5]).is_none());
        assert!(Sequence::new([1, 2, 3, 4, 6]).is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let sequence: Sequence = serde_json::from_str("[3,1,2,5,4]").unwrap();
        assert_eq!(sequence.values(), &[3, 1, 2, 5, 4]);
        assert!(serde_json::from_str::<Sequence>("[3,3,2,5,4]").is_err());
        assert!(serde_json::from_str::<Sequence>("[3,1,2]").is_err());
    }

    #[test]
    fn test_display() {
        let sequence = Sequence::new([4, 5, 3, 2, 1]).unwrap();
        assert_eq!(sequence.to_string(), "4 5 3 2 1");
    }
}
