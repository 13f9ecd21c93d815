use std::collections::BTreeMap;

use crate::model::catalog::Catalog;
use crate::model::ids::TopicId;
use crate::model::problem::Difficulty;
use crate::model::progress::Progress;

/// Aggregate completion numbers for one scope (global or per-topic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    /// `round(100 * completed / total)`, `0` when `total == 0`.
    pub percentage: u8,
}

impl ProgressStats {
    #[must_use]
    pub fn new(total: usize, completed: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pct = (100.0 * completed as f64 / total as f64).round() as u8;
            pct
        };
        Self {
            total,
            completed,
            percentage,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}

/// Per-difficulty completion slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySlice {
    pub difficulty: Difficulty,
    pub stats: ProgressStats,
}

/// Per-topic completion slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSlice {
    pub topic: TopicId,
    pub name: String,
    pub stats: ProgressStats,
}

/// Full completion breakdown: global, by difficulty, by topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionBreakdown {
    pub global: ProgressStats,
    pub by_difficulty: Vec<DifficultySlice>,
    pub by_topic: Vec<TopicSlice>,
}

/// Global completion stats.
///
/// Totals come from the catalog; completion counts only catalog members, so
/// stale ids lingering in the set never inflate a percentage.
#[must_use]
pub fn global_stats(catalog: &Catalog, progress: &Progress) -> ProgressStats {
    let completed = catalog
        .problems()
        .iter()
        .filter(|p| progress.contains(p.id()))
        .count();
    ProgressStats::new(catalog.len(), completed)
}

/// Completion stats scoped to one topic.
#[must_use]
pub fn topic_stats(catalog: &Catalog, topic: &TopicId, progress: &Progress) -> ProgressStats {
    let mut total = 0;
    let mut completed = 0;
    for problem in catalog.problems_for_topic(topic) {
        total += 1;
        if progress.contains(problem.id()) {
            completed += 1;
        }
    }
    ProgressStats::new(total, completed)
}

/// The full breakdown exposed for insight views.
#[must_use]
pub fn completion_breakdown(catalog: &Catalog, progress: &Progress) -> CompletionBreakdown {
    let mut difficulty_totals: BTreeMap<&'static str, (Difficulty, usize, usize)> = BTreeMap::new();
    for tier in Difficulty::ALL {
        difficulty_totals.insert(tier.as_str(), (tier, 0, 0));
    }

    for problem in catalog.problems() {
        if let Some(entry) = difficulty_totals.get_mut(problem.difficulty().as_str()) {
            entry.1 += 1;
            if progress.contains(problem.id()) {
                entry.2 += 1;
            }
        }
    }

    let by_difficulty = Difficulty::ALL
        .into_iter()
        .map(|tier| {
            let (_, total, completed) = difficulty_totals[tier.as_str()];
            DifficultySlice {
                difficulty: tier,
                stats: ProgressStats::new(total, completed),
            }
        })
        .collect();

    let by_topic = catalog
        .topics()
        .iter()
        .map(|topic| TopicSlice {
            topic: topic.id().clone(),
            name: topic.name().to_string(),
            stats: topic_stats(catalog, topic.id(), progress),
        })
        .collect();

    CompletionBreakdown {
        global: global_stats(catalog, progress),
        by_difficulty,
        by_topic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Topic;
    use crate::model::ids::ProblemId;
    use crate::model::problem::Problem;

    fn ten_problem_catalog() -> Catalog {
        let problems = (0..10)
            .map(|i| {
                let tier = match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                };
                Problem::new(format!("p{i}"), "solo", tier, format!("Problem {i}"))
            })
            .collect();
        Catalog::new(vec![Topic::new("solo", "Solo")], problems)
    }

    #[test]
    fn three_of_ten_is_thirty_percent() {
        let catalog = ten_problem_catalog();
        let progress = Progress::from_completed([
            ProblemId::new("p0"),
            ProblemId::new("p1"),
            ProblemId::new("p2"),
        ]);
        let stats = global_stats(&catalog, &progress);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.percentage, 30);
        assert_eq!(stats.remaining(), 7);
    }

    #[test]
    fn empty_catalog_has_zero_percentage() {
        let catalog = Catalog::new(Vec::new(), Vec::new());
        let stats = global_stats(&catalog, &Progress::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn empty_topic_has_zero_percentage() {
        let catalog = ten_problem_catalog();
        let stats = topic_stats(&catalog, &TopicId::new("missing"), &Progress::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn stale_ids_do_not_inflate_stats() {
        let catalog = ten_problem_catalog();
        let progress = Progress::from_completed([
            ProblemId::new("p0"),
            ProblemId::new("ghost-from-old-catalog"),
        ]);
        let stats = global_stats(&catalog, &progress);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.percentage, 10);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1 of 8 = 12.5 -> 13 under round-half-away-from-zero.
        let problems = (0..8)
            .map(|i| Problem::new(format!("p{i}"), "t", Difficulty::Easy, format!("P{i}")))
            .collect();
        let catalog = Catalog::new(vec![Topic::new("t", "T")], problems);
        let progress = Progress::from_completed([ProblemId::new("p0")]);
        assert_eq!(global_stats(&catalog, &progress).percentage, 13);
    }

    #[test]
    fn breakdown_covers_all_difficulties_and_topics() {
        let catalog = ten_problem_catalog();
        let progress = Progress::from_completed([ProblemId::new("p0"), ProblemId::new("p1")]);
        let breakdown = completion_breakdown(&catalog, &progress);
        assert_eq!(breakdown.global.completed, 2);
        assert_eq!(breakdown.by_difficulty.len(), 3);
        assert_eq!(breakdown.by_topic.len(), 1);
        assert_eq!(breakdown.by_topic[0].name, "Solo");
        let easy = &breakdown.by_difficulty[0];
        assert_eq!(easy.difficulty, Difficulty::Easy);
        // p0, p3, p6, p9 are easy; only p0 is completed.
        assert_eq!(easy.stats.total, 4);
        assert_eq!(easy.stats.completed, 1);
    }
}
