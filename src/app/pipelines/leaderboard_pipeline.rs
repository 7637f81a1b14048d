use crate::app::{export, page};
use crate::config::toml_config::LeaderboardConfig;
use crate::domain::model::{Leaderboard, OutputFile, RawData, TransformResult};
use crate::domain::ports::{Pipeline, RatingSource, Storage};
use crate::domain::ranking;
use crate::utils::error::{LeaderboardError, Result};
use chrono::Utc;

/// 讀取評分 → 彙總排名 → 輸出頁面與匯出檔
pub struct LeaderboardPipeline<R: RatingSource, S: Storage> {
    pub(crate) source: R,
    pub(crate) storage: S,
    pub(crate) config: LeaderboardConfig,
}

impl<R: RatingSource, S: Storage> LeaderboardPipeline<R, S> {
    pub fn new(source: R, storage: S, config: LeaderboardConfig) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    fn output_location(&self, filename: &str) -> String {
        format!("{}/{}", self.config.output_path(), filename)
    }

    fn render_files(&self, leaderboard: &Leaderboard) -> Result<Vec<OutputFile>> {
        let output = &self.config.output;
        let mut files = Vec::new();

        if output.wants("html") {
            files.push(OutputFile {
                filename: output.html_filename.clone(),
                content: page::render_page(leaderboard, &self.config.page).into_bytes(),
            });
        }
        if output.wants("json") {
            files.push(OutputFile {
                filename: output.json_filename.clone(),
                content: export::to_json(leaderboard)?.into_bytes(),
            });
        }
        if output.wants("csv") {
            files.push(OutputFile {
                filename: output.csv_filename.clone(),
                content: export::to_csv(leaderboard)?.into_bytes(),
            });
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<R: RatingSource, S: Storage> Pipeline for LeaderboardPipeline<R, S> {
    async fn extract(&self) -> Result<RawData> {
        tracing::info!("🚀 Fetching ratings and projects");

        let (ratings, projects) =
            tokio::try_join!(self.source.fetch_ratings(), self.source.fetch_projects())?;

        tracing::debug!(
            "Fetched {} ratings and {} projects",
            ratings.len(),
            projects.len()
        );

        Ok(RawData { ratings, projects })
    }

    async fn transform(&self, data: RawData) -> Result<TransformResult> {
        let team_names = data.team_names();
        let standings = ranking::rank(&data.ratings, &team_names, self.config.ranking.merge);

        tracing::debug!("Processed standings: {:?}", standings);

        let leaderboard = Leaderboard {
            title: self.config.page.title.clone(),
            generated_at: Utc::now(),
            standings,
        };

        let files = self.render_files(&leaderboard)?;

        Ok(TransformResult { leaderboard, files })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for file in &result.files {
            tracing::debug!(
                "Writing {} ({} bytes) to storage",
                file.filename,
                file.content.len()
            );
            self.storage.write_file(&file.filename, &file.content).await?;
        }

        let output = &self.config.output;
        if output.bundle {
            let zip_data = export::bundle(&result.files)?;
            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.storage
                .write_file(&output.bundle_filename, &zip_data)
                .await?;
            return Ok(self.output_location(&output.bundle_filename));
        }

        let primary = result
            .files
            .first()
            .ok_or_else(|| LeaderboardError::ConfigError {
                message: "No output format selected".to_string(),
            })?;

        Ok(self.output_location(&primary.filename))
    }

    async fn load_error(&self, error: &LeaderboardError) -> Result<Option<String>> {
        let output = &self.config.output;
        if !output.wants("html") {
            return Ok(None);
        }

        let html = page::render_error_page(
            &self.config.page.title,
            &error.user_friendly_message(),
            &self.config.page,
        );
        self.storage
            .write_file(&output.html_filename, html.as_bytes())
            .await?;

        Ok(Some(self.output_location(&output.html_filename)))
    }
}
