use crate::core::json::JsonOrient;
use crate::domain::model::{SourceEndpoint, TabularDataset};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where `path` lands on disk (or its key, for non-disk storage).
    fn resolve(&self, path: &Path) -> PathBuf;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_dir(&self) -> &Path;
    fn endpoints(&self) -> &[SourceEndpoint];
    fn orient(&self) -> JsonOrient;
    fn connect_timeout(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, endpoint: &SourceEndpoint) -> Result<String>;
    async fn transform(&self, endpoint: &SourceEndpoint, html: String) -> Result<TabularDataset>;
    async fn load(&self, endpoint: &SourceEndpoint, dataset: TabularDataset) -> Result<PathBuf>;
}
