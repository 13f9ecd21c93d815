mod catalog;
mod content;
mod export;
mod filter;
mod ids;
mod prefs;
mod problem;
mod progress;
mod stats;

pub use ids::{AccountId, ProblemId, TopicId};

pub use catalog::{Catalog, Topic};
pub use content::{TopicContent, content_for};
pub use export::{EXPORT_VERSION, ExportFile, ImportError, parse_import};
pub use filter::{DifficultyFilter, ProblemFilter};
pub use prefs::UiPrefs;
pub use problem::{Difficulty, ParseDifficultyError, Problem};
pub use progress::{Progress, ProgressSnapshot};
pub use stats::{CompletionBreakdown, DifficultySlice, ProgressStats, TopicSlice};
