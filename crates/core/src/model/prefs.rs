use std::collections::HashSet;

use crate::model::ids::TopicId;

/// Cosmetic UI preferences persisted alongside progress: the dark-mode flag
/// and the per-topic collapsed flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub dark_mode: bool,
    collapsed_topics: HashSet<TopicId>,
}

impl UiPrefs {
    #[must_use]
    pub fn new(dark_mode: bool, collapsed_topics: impl IntoIterator<Item = TopicId>) -> Self {
        Self {
            dark_mode,
            collapsed_topics: collapsed_topics.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_collapsed(&self, topic: &TopicId) -> bool {
        self.collapsed_topics.contains(topic)
    }

    /// Sets the collapsed flag for one topic. Returns `true` if it changed.
    pub fn set_collapsed(&mut self, topic: TopicId, collapsed: bool) -> bool {
        if collapsed {
            self.collapsed_topics.insert(topic)
        } else {
            self.collapsed_topics.remove(&topic)
        }
    }

    pub fn collapsed_topics(&self) -> impl Iterator<Item = &TopicId> {
        self.collapsed_topics.iter()
    }
}
