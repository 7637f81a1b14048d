pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::FirestoreSource;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, LeaderboardConfig};
pub use crate::core::{engine::LeaderboardEngine, pipeline::LeaderboardPipeline};
pub use domain::model::{CriterionMerge, Leaderboard, Project, ProjectStanding, Rating};
pub use utils::error::{LeaderboardError, Result};
