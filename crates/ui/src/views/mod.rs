mod home;
mod problem;
mod settings;

pub use home::BrowseView;
pub use problem::ProblemView;
pub use settings::SettingsView;
