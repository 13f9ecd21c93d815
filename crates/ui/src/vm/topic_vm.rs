use dscode_core::model::{
    Catalog, Difficulty, ProblemFilter, ProblemId, Progress, ProgressStats, TopicId, UiPrefs,
    topic_stats,
};

/// One row in a topic card's problem list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemRowVm {
    pub id: ProblemId,
    pub title: String,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub visible: bool,
}

/// One topic card on the browse page.
///
/// `bar_width` is the CSS width of the progress bar fill and always equals
/// the topic's completion percentage. `visible` is true iff at least one
/// row is visible under the current filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicCardVm {
    pub topic: TopicId,
    pub name: String,
    pub stats: ProgressStats,
    pub bar_width: String,
    pub collapsed: bool,
    pub visible: bool,
    pub rows: Vec<ProblemRowVm>,
}

/// Maps the whole catalog into topic cards, in catalog order.
///
/// Pure: reads the completed set, the filter, and the preferences, and
/// produces everything the browse page renders. Stats ignore the filter on
/// purpose; only row and card visibility react to it.
#[must_use]
pub fn map_topic_cards(
    catalog: &Catalog,
    progress: &Progress,
    filter: &ProblemFilter,
    prefs: &UiPrefs,
) -> Vec<TopicCardVm> {
    catalog
        .topics()
        .iter()
        .map(|topic| {
            let rows: Vec<ProblemRowVm> = catalog
                .problems_for_topic(topic.id())
                .map(|problem| ProblemRowVm {
                    id: problem.id().clone(),
                    title: problem.title().to_string(),
                    difficulty: problem.difficulty(),
                    completed: progress.contains(problem.id()),
                    visible: filter.matches(problem),
                })
                .collect();

            let stats = topic_stats(catalog, topic.id(), progress);
            TopicCardVm {
                topic: topic.id().clone(),
                name: topic.name().to_string(),
                bar_width: format!("{}%", stats.percentage),
                stats,
                collapsed: prefs.is_collapsed(topic.id()),
                visible: rows.iter().any(|row| row.visible),
                rows,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dscode_core::model::DifficultyFilter;

    fn cards(progress: &Progress, filter: &ProblemFilter, prefs: &UiPrefs) -> Vec<TopicCardVm> {
        map_topic_cards(&Catalog::builtin(), progress, filter, prefs)
    }

    #[test]
    fn row_visibility_mirrors_the_filter_predicate() {
        let catalog = Catalog::builtin();
        let filter = ProblemFilter::new(DifficultyFilter::Only(Difficulty::Medium), "");
        let cards = cards(&Progress::new(), &filter, &UiPrefs::default());

        for card in &cards {
            for row in &card.rows {
                let problem = catalog.problem(&row.id).expect("catalog problem");
                assert_eq!(row.visible, filter.matches(problem), "row {}", row.id);
            }
            assert_eq!(card.visible, card.rows.iter().any(|row| row.visible));
        }
    }

    #[test]
    fn search_hides_topics_without_matches() {
        let filter = ProblemFilter::new(DifficultyFilter::All, "graph");
        let cards = cards(&Progress::new(), &filter, &UiPrefs::default());

        let agents = cards.iter().find(|c| c.topic.as_str() == "agents").unwrap();
        let python = cards.iter().find(|c| c.topic.as_str() == "python").unwrap();
        assert!(agents.visible);
        assert!(!python.visible);
    }

    #[test]
    fn bar_width_equals_topic_percentage() {
        let progress =
            Progress::from_completed([ProblemId::new("py1"), ProblemId::new("py2")]);
        let cards = cards(&progress, &ProblemFilter::default(), &UiPrefs::default());

        let python = cards.iter().find(|c| c.topic.as_str() == "python").unwrap();
        assert_eq!(python.stats.completed, 2);
        assert_eq!(python.stats.percentage, 50);
        assert_eq!(python.bar_width, "50%");

        let sql = cards.iter().find(|c| c.topic.as_str() == "sql").unwrap();
        assert_eq!(sql.bar_width, "0%");
    }

    #[test]
    fn stats_ignore_the_filter() {
        let progress = Progress::from_completed([ProblemId::new("py1")]);
        let filter = ProblemFilter::new(DifficultyFilter::Only(Difficulty::Hard), "");
        let cards = cards(&progress, &filter, &UiPrefs::default());

        let python = cards.iter().find(|c| c.topic.as_str() == "python").unwrap();
        assert_eq!(python.stats.completed, 1);
    }

    #[test]
    fn collapsed_flag_comes_from_preferences() {
        let prefs = UiPrefs::new(false, [TopicId::new("sql")]);
        let cards = cards(&Progress::new(), &ProblemFilter::default(), &prefs);

        assert!(cards.iter().find(|c| c.topic.as_str() == "sql").unwrap().collapsed);
        assert!(!cards.iter().find(|c| c.topic.as_str() == "ml").unwrap().collapsed);
    }
}
