pub use crate::app::pipelines::leaderboard_pipeline::LeaderboardPipeline;
