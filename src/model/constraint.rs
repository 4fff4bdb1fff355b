//! Column constraint tags and their display ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A constraint tag attached to a column for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    Nullable,
    Unique,
    Check,
    Default,
    AutoIncrement,
    Generated,
    #[serde(rename = "FK")]
    Fk,
}

/// Display priority per tag, lowest renders first.
///
/// Independent of variant declaration order.
const DISPLAY_PRIORITY: [(Constraint, u8); 7] = [
    (Constraint::Fk, 0),
    (Constraint::Unique, 1),
    (Constraint::AutoIncrement, 2),
    (Constraint::Default, 3),
    (Constraint::Check, 4),
    (Constraint::Nullable, 5),
    (Constraint::Generated, 6),
];

impl Constraint {
    /// Fixed display priority of this tag
    pub fn priority(self) -> u8 {
        DISPLAY_PRIORITY
            .iter()
            .find(|(tag, _)| *tag == self)
            .map(|(_, priority)| *priority)
            .unwrap_or(u8::MAX)
    }

    /// Tag text as it appears inside `<<...>>`
    pub fn as_str(self) -> &'static str {
        match self {
            Constraint::Nullable => "NULLABLE",
            Constraint::Unique => "UNIQUE",
            Constraint::Check => "CHECK",
            Constraint::Default => "DEFAULT",
            Constraint::AutoIncrement => "AUTO_INCREMENT",
            Constraint::Generated => "GENERATED",
            Constraint::Fk => "FK",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Constraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NULLABLE" => Ok(Constraint::Nullable),
            "UNIQUE" => Ok(Constraint::Unique),
            "CHECK" => Ok(Constraint::Check),
            "DEFAULT" => Ok(Constraint::Default),
            "AUTO_INCREMENT" => Ok(Constraint::AutoIncrement),
            "GENERATED" => Ok(Constraint::Generated),
            "FK" => Ok(Constraint::Fk),
            _ => Err(format!(
                "Unknown constraint: {}. Valid options: NULLABLE, UNIQUE, CHECK, DEFAULT, AUTO_INCREMENT, GENERATED, FK",
                s
            )),
        }
    }
}

/// Set of constraint tags on a column, without duplicates.
///
/// Insertion order is kept for inspection; rendering always goes through
/// [`ConstraintSet::ordered`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    tags: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning false if it was already present
    pub fn insert(&mut self, tag: Constraint) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Copy of this set with `tag` added
    pub fn with(&self, tag: Constraint) -> Self {
        let mut set = self.clone();
        set.insert(tag);
        set
    }

    pub fn contains(&self, tag: Constraint) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Tags sorted by ascending display priority
    pub fn ordered(&self) -> Vec<Constraint> {
        let mut tags = self.tags.clone();
        tags.sort_by_key(|tag| tag.priority());
        tags
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = ConstraintSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_are_fixed() {
        assert_eq!(Constraint::Fk.priority(), 0);
        assert_eq!(Constraint::Unique.priority(), 1);
        assert_eq!(Constraint::AutoIncrement.priority(), 2);
        assert_eq!(Constraint::Default.priority(), 3);
        assert_eq!(Constraint::Check.priority(), 4);
        assert_eq!(Constraint::Nullable.priority(), 5);
        assert_eq!(Constraint::Generated.priority(), 6);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = ConstraintSet::new();
        assert!(set.insert(Constraint::Unique));
        assert!(!set.insert(Constraint::Unique));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordered_ignores_insertion_order() {
        let set: ConstraintSet = [
            Constraint::Generated,
            Constraint::Nullable,
            Constraint::Fk,
            Constraint::Default,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            set.ordered(),
            vec![
                Constraint::Fk,
                Constraint::Default,
                Constraint::Nullable,
                Constraint::Generated
            ]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "auto_increment".parse::<Constraint>().unwrap(),
            Constraint::AutoIncrement
        );
        assert!("PRIMARY".parse::<Constraint>().is_err());
    }
}
