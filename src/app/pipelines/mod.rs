pub mod leaderboard_pipeline;
