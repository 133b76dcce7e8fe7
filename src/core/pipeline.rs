use crate::core::html_table::parse_first_table;
use crate::core::inference::infer_dataset;
use crate::core::json::{self, JsonOrient};
use crate::core::{ConfigProvider, PageFetcher, Pipeline, SourceEndpoint, Storage, TabularDataset};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Fetches a page, reads its first table and writes it out as JSON.
pub struct SnapshotPipeline<S: Storage, F: PageFetcher> {
    storage: S,
    fetcher: F,
    orient: JsonOrient,
}

impl<S: Storage, F: PageFetcher> SnapshotPipeline<S, F> {
    pub fn new(storage: S, fetcher: F, orient: JsonOrient) -> Self {
        Self {
            storage,
            fetcher,
            orient,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, fetcher: F, config: &C) -> Self {
        Self::new(storage, fetcher, config.orient())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait::async_trait]
impl<S: Storage, F: PageFetcher> Pipeline for SnapshotPipeline<S, F> {
    async fn extract(&self, endpoint: &SourceEndpoint) -> Result<String> {
        tracing::debug!("[{}] Fetching {}", endpoint.name, endpoint.url);
        self.fetcher.fetch(&endpoint.url).await
    }

    async fn transform(&self, endpoint: &SourceEndpoint, html: String) -> Result<TabularDataset> {
        let raw = parse_first_table(&html, &endpoint.url)?;
        tracing::debug!(
            "[{}] First table: {} columns, {} data rows",
            endpoint.name,
            raw.width(),
            raw.rows.len()
        );
        infer_dataset(raw)
    }

    async fn load(&self, endpoint: &SourceEndpoint, dataset: TabularDataset) -> Result<PathBuf> {
        let data = json::encode(&dataset, self.orient)?;

        tracing::debug!(
            "[{}] Writing {} bytes ({} orient)",
            endpoint.name,
            data.len(),
            self.orient
        );
        self.storage.write_file(&endpoint.output, &data).await?;

        Ok(self.storage.resolve(&endpoint.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CellValue;
    use crate::utils::error::SnapshotError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(Path::new(path)).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }

        fn resolve(&self, path: &Path) -> PathBuf {
            Path::new("mock").join(path)
        }
    }

    struct MockFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| SnapshotError::HttpStatusError {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    const STANDINGS: &str = "<html><body><table>\
        <tr><th>Team</th><th>Wins</th><th>Losses</th></tr>\
        <tr><td>Alpha</td><td>5</td><td>2</td></tr>\
        </table></body></html>";

    fn pipeline(orient: JsonOrient) -> SnapshotPipeline<MockStorage, MockFetcher> {
        let mut pages = HashMap::new();
        pages.insert("https://example.com/standings".to_string(), STANDINGS.to_string());
        SnapshotPipeline::new(MockStorage::default(), MockFetcher { pages }, orient)
    }

    fn endpoint() -> SourceEndpoint {
        SourceEndpoint::new(
            "standings",
            "https://example.com/standings",
            "assets/standings.json",
        )
    }

    #[tokio::test]
    async fn test_extract_transform_load() {
        let pipeline = pipeline(JsonOrient::Columns);
        let endpoint = endpoint();

        let html = pipeline.extract(&endpoint).await.unwrap();
        let dataset = pipeline.transform(&endpoint, html).await.unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.cell(0, "Team"), Some(&CellValue::Text("Alpha".to_string())));
        assert_eq!(dataset.cell(0, "Wins"), Some(&CellValue::Integer(5)));
        assert_eq!(dataset.cell(0, "Losses"), Some(&CellValue::Integer(2)));

        let path = pipeline.load(&endpoint, dataset).await.unwrap();
        assert_eq!(path, PathBuf::from("mock/assets/standings.json"));

        let written = pipeline
            .storage()
            .get_file("assets/standings.json")
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            r#"{"Team":{"0":"Alpha"},"Wins":{"0":5},"Losses":{"0":2}}"#
        );
    }

    #[tokio::test]
    async fn test_load_uses_configured_orient() {
        let pipeline = pipeline(JsonOrient::Records);
        let endpoint = endpoint();

        let html = pipeline.extract(&endpoint).await.unwrap();
        let dataset = pipeline.transform(&endpoint, html).await.unwrap();
        pipeline.load(&endpoint, dataset).await.unwrap();

        let written = pipeline
            .storage()
            .get_file("assets/standings.json")
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            r#"[{"Team":"Alpha","Wins":5,"Losses":2}]"#
        );
    }

    #[tokio::test]
    async fn test_transform_without_table_fails() {
        let pipeline = pipeline(JsonOrient::Columns);
        let err = pipeline
            .transform(&endpoint(), "<p>maintenance</p>".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NoTableError { .. }));
    }

    #[tokio::test]
    async fn test_extract_propagates_fetch_error() {
        let pipeline = pipeline(JsonOrient::Columns);
        let missing = SourceEndpoint::new("schedule", "https://example.com/gone", "s.json");
        let err = pipeline.extract(&missing).await.unwrap_err();
        assert!(matches!(err, SnapshotError::HttpStatusError { status: 404, .. }));
    }
}
