mod topic_vm;

pub use topic_vm::{ProblemRowVm, TopicCardVm, map_topic_cards};
