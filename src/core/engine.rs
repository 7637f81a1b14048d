use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct LeaderboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> LeaderboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting leaderboard build...");
        self.monitor.log_stats("Start");

        // Extract
        let raw_data = match self.pipeline.extract().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("❌ Failed to fetch leaderboard data: {}", e);
                // 讀取失敗時仍輸出錯誤頁面，讓畫面不會停在空白
                match self.pipeline.load_error(&e).await {
                    Ok(Some(path)) => tracing::warn!("Error page written to: {}", path),
                    Ok(None) => {}
                    Err(write_err) => {
                        tracing::error!("❌ Failed to write error page: {}", write_err)
                    }
                }
                return Err(e);
            }
        };
        tracing::info!(
            "Extracted {} ratings for {} projects",
            raw_data.ratings.len(),
            raw_data.projects.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Ranked {} projects into {} output file(s)",
            result.leaderboard.standings.len(),
            result.files.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
