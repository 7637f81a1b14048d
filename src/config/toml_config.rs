use crate::domain::model::CriterionMerge;
use crate::utils::error::{LeaderboardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const SUPPORTED_FORMATS: [&str; 3] = ["html", "json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub source: SourceConfig,
    pub ranking: RankingConfig,
    pub page: PageConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub project_id: Option<String>,
    pub database: String,
    pub api_key: Option<String>,
    pub ratings_collection: String,
    pub projects_collection: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: None,
            database: "(default)".to_string(),
            api_key: None,
            ratings_collection: "ratings".to_string(),
            projects_collection: "projects".to_string(),
            page_size: 300,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub merge: CriterionMerge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    pub video_src: String,
    pub asset_base: String,
    pub show_scores: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "KNOWCODE 2.0 Leaderboard".to_string(),
            video_src: "/v1.mp4".to_string(),
            asset_base: "/".to_string(),
            show_scores: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub bundle: bool,
    pub html_filename: String,
    pub json_filename: String,
    pub csv_filename: String,
    pub bundle_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            formats: vec!["html".to_string()],
            bundle: false,
            html_filename: "leaderboard.html".to_string(),
            json_filename: "leaderboard.json".to_string(),
            csv_filename: "leaderboard.csv".to_string(),
            bundle_filename: "leaderboard.zip".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn wants(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f == format)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl LeaderboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LeaderboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIRESTORE_API_KEY})；未設定者保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 檔案未指定時，從環境變數補上專案 id 與 API key
    pub fn apply_env_fallbacks(&mut self) {
        if self.source.project_id.is_none() {
            self.source.project_id = std::env::var("FIRESTORE_PROJECT_ID").ok();
        }
        if self.source.api_key.is_none() {
            self.source.api_key = std::env::var("FIRESTORE_API_KEY").ok();
        }
    }

    pub fn project_id(&self) -> Result<&str> {
        validation::validate_required_field("source.project_id", &self.source.project_id)
            .map(String::as_str)
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for LeaderboardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;

        let project_id = self.project_id()?;
        validation::validate_non_empty_string("source.project_id", project_id)?;
        validation::validate_non_empty_string("source.database", &self.source.database)?;
        validation::validate_non_empty_string(
            "source.ratings_collection",
            &self.source.ratings_collection,
        )?;
        validation::validate_non_empty_string(
            "source.projects_collection",
            &self.source.projects_collection,
        )?;
        validation::validate_range("source.page_size", self.source.page_size, 1, 300)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 600)?;

        validation::validate_path("output.path", &self.output.path)?;
        if self.output.formats.is_empty() {
            return Err(LeaderboardError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: String::new(),
                reason: "At least one output format is required".to_string(),
            });
        }
        validation::validate_choices("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;
        validation::validate_filename("output.html_filename", &self.output.html_filename)?;
        validation::validate_filename("output.json_filename", &self.output.json_filename)?;
        validation::validate_filename("output.csv_filename", &self.output.csv_filename)?;
        validation::validate_filename("output.bundle_filename", &self.output.bundle_filename)?;

        validation::validate_non_empty_string("page.title", &self.page.title)?;

        Ok(())
    }
}
