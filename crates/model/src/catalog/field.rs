use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Type class of a catalogue field. Decides which operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Boolean,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// Filterable and sortable breed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Indoor,
    Adaptability,
    AffectionLevel,
    ChildFriendly,
    DogFriendly,
    EnergyLevel,
    Grooming,
    HealthIssues,
    Intelligence,
    SheddingLevel,
    SocialNeeds,
    StrangerFriendly,
    Vocalisation,
    Experimental,
    Hairless,
    Natural,
    Rare,
    Rex,
    SuppressedTail,
    ShortLegs,
}

impl Field {
    pub const NUMERIC: [Field; 13] = [
        Field::Indoor,
        Field::Adaptability,
        Field::AffectionLevel,
        Field::ChildFriendly,
        Field::DogFriendly,
        Field::EnergyLevel,
        Field::Grooming,
        Field::HealthIssues,
        Field::Intelligence,
        Field::SheddingLevel,
        Field::SocialNeeds,
        Field::StrangerFriendly,
        Field::Vocalisation,
    ];

    pub const BOOLEAN: [Field; 7] = [
        Field::Experimental,
        Field::Hairless,
        Field::Natural,
        Field::Rare,
        Field::Rex,
        Field::SuppressedTail,
        Field::ShortLegs,
    ];

    pub const ALL: [Field; 20] = [
        Field::Indoor,
        Field::Adaptability,
        Field::AffectionLevel,
        Field::ChildFriendly,
        Field::DogFriendly,
        Field::EnergyLevel,
        Field::Grooming,
        Field::HealthIssues,
        Field::Intelligence,
        Field::SheddingLevel,
        Field::SocialNeeds,
        Field::StrangerFriendly,
        Field::Vocalisation,
        Field::Experimental,
        Field::Hairless,
        Field::Natural,
        Field::Rare,
        Field::Rex,
        Field::SuppressedTail,
        Field::ShortLegs,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Experimental
            | Field::Hairless
            | Field::Natural
            | Field::Rare
            | Field::Rex
            | Field::SuppressedTail
            | Field::ShortLegs => FieldKind::Boolean,
            _ => FieldKind::Numeric,
        }
    }

    /// Key of the attribute in a breed record.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Indoor => "indoor",
            Field::Adaptability => "adaptability",
            Field::AffectionLevel => "affection_level",
            Field::ChildFriendly => "child_friendly",
            Field::DogFriendly => "dog_friendly",
            Field::EnergyLevel => "energy_level",
            Field::Grooming => "grooming",
            Field::HealthIssues => "health_issues",
            Field::Intelligence => "intelligence",
            Field::SheddingLevel => "shedding_level",
            Field::SocialNeeds => "social_needs",
            Field::StrangerFriendly => "stranger_friendly",
            Field::Vocalisation => "vocalisation",
            Field::Experimental => "experimental",
            Field::Hairless => "hairless",
            Field::Natural => "natural",
            Field::Rare => "rare",
            Field::Rex => "rex",
            Field::SuppressedTail => "suppressed_tail",
            Field::ShortLegs => "short_legs",
        }
    }

    /// Human readable label, e.g. `Affection level`.
    pub fn label(self) -> String {
        let spaced = self.as_str().replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => spaced,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownField(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_numeric_and_boolean_sets_are_disjoint() {
        let numeric: HashSet<_> = Field::NUMERIC.iter().collect();
        let boolean: HashSet<_> = Field::BOOLEAN.iter().collect();

        assert!(numeric.is_disjoint(&boolean));
        assert_eq!(numeric.len() + boolean.len(), Field::ALL.len());
        assert!(Field::NUMERIC.iter().all(|f| f.kind() == FieldKind::Numeric));
        assert!(Field::BOOLEAN.iter().all(|f| f.kind() == FieldKind::Boolean));
    }

    #[test]
    fn test_parse_round_trips_every_field() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
        assert_eq!("Short_Legs".parse::<Field>(), Ok(Field::ShortLegs));
        assert_eq!(
            "wingspan".parse::<Field>(),
            Err(ParseError::UnknownField("wingspan".into()))
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(Field::AffectionLevel.label(), "Affection level");
        assert_eq!(Field::Rex.label(), "Rex");
    }
}
