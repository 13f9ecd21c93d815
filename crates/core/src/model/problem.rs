use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{ProblemId, TopicId};

/// Difficulty tier of a practice problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Returns the lowercase string form used in persistence and markup.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Returns the capitalized label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for parsing a difficulty from its string form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw}")]
pub struct ParseDifficultyError {
    raw: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError {
                raw: other.to_string(),
            }),
        }
    }
}

/// Read-only descriptor of one practice problem.
///
/// Problems are owned by the catalog; completion state lives elsewhere and is
/// keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    id: ProblemId,
    topic: TopicId,
    difficulty: Difficulty,
    title: String,
}

impl Problem {
    /// Creates a new problem descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProblemId>,
        topic: impl Into<TopicId>,
        difficulty: Difficulty,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            difficulty,
            title: title.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProblemId {
        &self.id
    }

    #[must_use]
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}
