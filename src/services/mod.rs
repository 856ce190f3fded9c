pub mod conference;
pub mod insights;
pub mod players;
pub mod season;
pub mod team_performance;
pub mod views;

pub use views::{aggregate, filter_options, quick_stats, Filters, View};
