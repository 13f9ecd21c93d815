use crate::model::problem::{Difficulty, Problem};

/// Difficulty dimension of the problem filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => wanted == difficulty,
        }
    }
}

/// Transient filter state: difficulty plus case-insensitive title search.
///
/// Never persisted; reset to default on every startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub difficulty: DifficultyFilter,
    pub search: String,
}

impl ProblemFilter {
    #[must_use]
    pub fn new(difficulty: DifficultyFilter, search: impl Into<String>) -> Self {
        Self {
            difficulty,
            search: search.into(),
        }
    }

    /// The visibility predicate: difficulty matches AND the (trimmed,
    /// lowercased) search text is a substring of the lowercased title.
    /// An empty search matches everything.
    #[must_use]
    pub fn matches(&self, problem: &Problem) -> bool {
        if !self.difficulty.matches(problem.difficulty()) {
            return false;
        }
        let query = self.search.trim().to_lowercase();
        query.is_empty() || problem.title().to_lowercase().contains(&query)
    }

    /// True when the filter hides nothing.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.difficulty == DifficultyFilter::All && self.search.trim().is_empty()
    }
}
