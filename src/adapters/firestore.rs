//! Cloud Firestore REST 讀取
//!
//! 以 `documents.list` 讀取整個 collection，依 `nextPageToken` 翻頁直到讀完，
//! 再把 Firestore 的型別化欄位值 (`stringValue`、`integerValue`…) 轉成領域模型。

use crate::config::toml_config::SourceConfig;
use crate::domain::model::{Project, Rating};
use crate::domain::ports::RatingSource;
use crate::utils::error::{LeaderboardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;

pub const PROJECT_ID_FIELD: &str = "projectId";
pub const CRITERION_ID_FIELD: &str = "criterionId";
pub const SCORE_FIELD: &str = "score";
pub const TEAM_NAME_FIELD: &str = "teamName";

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// 文件 id = 文件名稱的最後一段
    pub fn id(&self) -> &str {
        last_segment(&self.name)
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn decode_error(&self, message: String) -> LeaderboardError {
        LeaderboardError::DecodeError {
            document: self.name.clone(),
            message,
        }
    }

    pub fn string_field(&self, key: &str) -> Result<String> {
        let value = self
            .field(key)
            .ok_or_else(|| self.decode_error(format!("missing field '{}'", key)))?;

        if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
            return Ok(s.to_string());
        }
        // 以 reference 儲存時取被參照文件的 id
        if let Some(reference) = value.get("referenceValue").and_then(Value::as_str) {
            return Ok(last_segment(reference).to_string());
        }
        if let Some(i) = value.get("integerValue") {
            return integer_value(i)
                .map(|n| n.to_string())
                .ok_or_else(|| self.decode_error(format!("field '{}' is not an integer", key)));
        }

        Err(self.decode_error(format!("field '{}' is not a string", key)))
    }

    pub fn number_field(&self, key: &str) -> Result<f64> {
        let value = self
            .field(key)
            .ok_or_else(|| self.decode_error(format!("missing field '{}'", key)))?;

        let number = if let Some(i) = value.get("integerValue") {
            integer_value(i).map(|n| n as f64)
        } else if let Some(d) = value.get("doubleValue") {
            double_value(d)
        } else if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
            s.trim().parse::<f64>().ok()
        } else {
            None
        };

        number.ok_or_else(|| self.decode_error(format!("field '{}' is not a number", key)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// integerValue 在 REST 上以字串編碼 (int64)
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn double_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn decode_rating(document: &Document) -> Result<Rating> {
    let project_id = document.string_field(PROJECT_ID_FIELD)?;
    let criterion = document.number_field(CRITERION_ID_FIELD)?;

    if criterion.fract() != 0.0 || criterion < 0.0 || criterion > u32::MAX as f64 {
        return Err(LeaderboardError::DecodeError {
            document: document.name.clone(),
            message: format!("criterion id {} is not a valid identifier", criterion),
        });
    }

    Ok(Rating {
        project_id,
        criterion_id: criterion as u32,
        score: document.number_field(SCORE_FIELD)?,
    })
}

pub fn decode_project(document: &Document) -> Project {
    let team_name = match document.string_field(TEAM_NAME_FIELD) {
        Ok(name) if name.trim().is_empty() => {
            tracing::debug!("Project {} has a blank team name", document.id());
            None
        }
        Ok(name) => Some(name),
        Err(e) => {
            tracing::debug!("Project without usable team name: {}", e);
            None
        }
    };

    Project {
        id: document.id().to_string(),
        team_name,
    }
}

#[derive(Debug, Clone)]
pub struct FirestoreSource {
    client: Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: Option<String>,
    ratings_collection: String,
    projects_collection: String,
    page_size: u32,
}

impl FirestoreSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| LeaderboardError::MissingConfigError {
                field: "source.project_id".to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id,
            database: config.database.clone(),
            api_key: config.api_key.clone(),
            ratings_collection: config.ratings_collection.clone(),
            projects_collection: config.projects_collection.clone(),
            page_size: config.page_size,
        })
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents/{}",
            self.base_url, self.project_id, self.database, collection
        )
    }

    /// 讀取整個 collection (所有分頁)
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);

            if let Some(key) = &self.api_key {
                request = request.query(&[("key", key)]);
            }
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            tracing::debug!("Requesting {} (page {})", url, pages + 1);
            let response = request.send().await?;
            let status = response.status();
            tracing::debug!("API response status: {}", status);

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LeaderboardError::ApiStatusError {
                    status: status.as_u16(),
                    url,
                    body,
                });
            }

            let page: ListDocumentsResponse = response.json().await?;
            pages += 1;
            documents.extend(page.documents);

            // 翻頁 token 一旦重複出現就會無限循環
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    return Err(LeaderboardError::DecodeError {
                        document: url,
                        message: format!("server returned page token '{}' twice", token),
                    });
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            "📥 Read {} documents from '{}' in {} page(s)",
            documents.len(),
            collection,
            pages
        );
        Ok(documents)
    }
}

#[async_trait]
impl RatingSource for FirestoreSource {
    async fn fetch_ratings(&self) -> Result<Vec<Rating>> {
        let documents = self.list_documents(&self.ratings_collection).await?;

        let mut ratings = Vec::with_capacity(documents.len());
        for document in &documents {
            match decode_rating(document) {
                Ok(rating) => ratings.push(rating),
                Err(e) => tracing::warn!("⚠️ Skipping rating: {}", e),
            }
        }

        Ok(ratings)
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let documents = self.list_documents(&self.projects_collection).await?;
        Ok(documents.iter().map(decode_project).collect())
    }
}
