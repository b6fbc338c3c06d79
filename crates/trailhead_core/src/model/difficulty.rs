//! Trail difficulty rating.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Difficulty rating, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Moderate,
    Challenging,
    Difficult,
    VeryDifficult,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Self::Easy,
        Self::Moderate,
        Self::Challenging,
        Self::Difficult,
        Self::VeryDifficult,
        Self::Extreme,
    ];

    /// Stable token used in data files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Moderate => "MODERATE",
            Self::Challenging => "CHALLENGING",
            Self::Difficult => "DIFFICULT",
            Self::VeryDifficult => "VERY_DIFFICULT",
            Self::Extreme => "EXTREME",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Exact token match; no trimming or case folding.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str() == value)
            .ok_or_else(|| UnknownDifficulty(value.to_string()))
    }
}

/// Token did not name a `Difficulty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl Display for UnknownDifficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown difficulty: {}", self.0)
    }
}

impl Error for UnknownDifficulty {}

#[cfg(test)]
mod tests {
    use super::{Difficulty, UnknownDifficulty};

    #[test]
    fn every_token_parses_back() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<Difficulty>(), Ok(difficulty));
        }
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(
            "easy".parse::<Difficulty>(),
            Err(UnknownDifficulty("easy".to_string()))
        );
        assert!(" EASY".parse::<Difficulty>().is_err());
    }

    #[test]
    fn ordering_follows_declaration() {
        assert!(Difficulty::Easy < Difficulty::Extreme);
        assert!(Difficulty::Difficult < Difficulty::VeryDifficult);
    }
}
