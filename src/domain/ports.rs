use crate::domain::model::{Project, RawData, Rating, TransformResult};
use crate::utils::error::{LeaderboardError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 評分資料來源 (託管的文件資料庫)
#[async_trait]
pub trait RatingSource: Send + Sync {
    async fn fetch_ratings(&self) -> Result<Vec<Rating>>;
    async fn fetch_projects(&self) -> Result<Vec<Project>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawData>;
    async fn transform(&self, data: RawData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;

    /// 讀取失敗時輸出可見的錯誤頁面；有寫入時回傳路徑
    async fn load_error(&self, error: &LeaderboardError) -> Result<Option<String>>;
}
