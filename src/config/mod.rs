pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::CriterionMerge;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

pub use toml_config::LeaderboardConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "knowcode-leaderboard")]
#[command(about = "Render the KNOWCODE leaderboard from Firestore ratings")]
pub struct CliConfig {
    /// Path to TOML configuration file (optional)
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Firestore project id")]
    pub project_id: Option<String>,

    #[arg(long, help = "Firestore web API key")]
    pub api_key: Option<String>,

    #[arg(long, help = "Override the Firestore REST base URL")]
    pub base_url: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Leaderboard page title")]
    pub title: Option<String>,

    #[arg(long, help = "How repeated ratings of one criterion combine: sum or mean")]
    pub merge: Option<CriterionMerge>,

    #[arg(long, value_delimiter = ',', help = "Output formats: html,json,csv")]
    pub format: Vec<String>,

    #[arg(long, help = "Bundle every output file into a ZIP archive")]
    pub bundle: bool,

    #[arg(long, help = "Show each team's average score on the page")]
    pub show_scores: bool,

    #[arg(long, help = "Validate configuration and exit without fetching")]
    pub dry_run: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (若有) 並套用命令列覆蓋
    pub fn resolve(&self) -> Result<LeaderboardConfig> {
        let mut config = match &self.config {
            Some(path) => LeaderboardConfig::from_file(path)?,
            None => LeaderboardConfig::default(),
        };

        self.apply_overrides(&mut config);
        config.apply_env_fallbacks();
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut LeaderboardConfig) {
        if let Some(project_id) = &self.project_id {
            config.source.project_id = Some(project_id.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.source.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.output.path = output_path.clone();
        }
        if let Some(title) = &self.title {
            config.page.title = title.clone();
        }
        if let Some(merge) = self.merge {
            config.ranking.merge = merge;
        }
        if !self.format.is_empty() {
            config.output.formats = self.format.clone();
        }
        // 旗標只能開啟，不覆蓋設定檔中的 true
        if self.bundle {
            config.output.bundle = true;
        }
        if self.show_scores {
            config.page.show_scores = true;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}
