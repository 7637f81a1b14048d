use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 參與平均分計算的評分項目編號範圍
pub const SCORED_CRITERIA: std::ops::RangeInclusive<u32> = 1..=5;

/// 單筆評分 (ratings collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub project_id: String,
    pub criterion_id: u32,
    pub score: f64,
}

impl Rating {
    pub fn new(project_id: impl Into<String>, criterion_id: u32, score: f64) -> Self {
        Self {
            project_id: project_id.into(),
            criterion_id,
            score,
        }
    }
}

/// 專案 (projects collection)，team_name 可能缺漏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub team_name: Option<String>,
}

/// 專案 id → 隊名
pub type TeamNames = HashMap<String, String>;

/// 同一評分項目出現多筆評分時的合併方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionMerge {
    #[default]
    Sum,
    Mean,
}

impl std::str::FromStr for CriterionMerge {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(CriterionMerge::Sum),
            "mean" => Ok(CriterionMerge::Mean),
            other => Err(format!("unknown merge mode '{}', expected sum or mean", other)),
        }
    }
}

/// 彙總後的專案排名資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStanding {
    pub rank: usize,
    pub project_id: String,
    pub team_name: String,
    pub criteria: BTreeMap<u32, f64>,
    pub average: f64,
}

impl ProjectStanding {
    pub fn criterion(&self, criterion_id: u32) -> Option<f64> {
        self.criteria.get(&criterion_id).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub standings: Vec<ProjectStanding>,
}

impl Leaderboard {
    pub fn podium(&self) -> &[ProjectStanding] {
        &self.standings[..self.standings.len().min(3)]
    }

    pub fn rest(&self) -> &[ProjectStanding] {
        self.standings.get(3..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}

/// extract 階段的原始資料
#[derive(Debug, Clone, Default)]
pub struct RawData {
    pub ratings: Vec<Rating>,
    pub projects: Vec<Project>,
}

impl RawData {
    pub fn team_names(&self) -> TeamNames {
        self.projects
            .iter()
            .filter_map(|p| {
                p.team_name
                    .as_ref()
                    .filter(|name| !name.trim().is_empty())
                    .map(|name| (p.id.clone(), name.clone()))
            })
            .collect()
    }
}

/// 一個輸出檔案 (檔名 + 內容)
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub leaderboard: Leaderboard,
    pub files: Vec<OutputFile>,
}
