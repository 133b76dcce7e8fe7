use anyhow::Result;
use httpmock::prelude::*;
use table_snapshot::core::ConfigProvider;
use table_snapshot::utils::validation::Validate;
use table_snapshot::{EtlEngine, HttpFetcher, LocalStorage, SnapshotConfig, SnapshotPipeline};
use tempfile::TempDir;

/// A TOML file drives endpoints, base directory and orient end to end.
#[tokio::test]
async fn test_toml_config_drives_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/standings");
            then.status(200).body(
                "<table><tr><th>TEAM</th><th>GP</th><th>PF</th></tr>\
                 <tr><td>Alpha</td><td>3</td><td>81.5</td></tr></table>",
            );
        })
        .await;

    let config_content = format!(
        r#"
base_dir = "{}"
orient = "records"

[http]
request_timeout_seconds = 5

[[endpoints]]
name = "standings"
url = "{}"
output = "assets/standings.json"
"#,
        temp_path,
        server.url("/standings")
    );

    let config_path = temp_dir.path().join("snapshot.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = SnapshotConfig::from_file(&config_path)?;
    config.validate()?;

    let fetcher = HttpFetcher::from_config(&config)?;
    let storage = LocalStorage::new(config.base_dir());
    let pipeline = SnapshotPipeline::from_config(storage, fetcher, &config);
    let report = EtlEngine::new(pipeline)
        .with_policy(config.failure_policy)
        .run(config.endpoints())
        .await;

    page.assert_async().await;
    assert!(report.is_success());

    let written =
        tokio::fs::read_to_string(temp_dir.path().join("assets/standings.json")).await?;
    assert_eq!(written, r#"[{"TEAM":"Alpha","GP":3,"PF":81.5}]"#);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/standings");
            then.status(200)
                .body("<table><tr><th>Team</th></tr><tr><td>Alpha</td></tr></table>");
        })
        .await;

    let mut config = SnapshotConfig::default();
    config.base_dir = temp_dir.path().to_path_buf();
    config.endpoints.truncate(1);
    config.endpoints[0].url = server.url("/standings");

    let fetcher = HttpFetcher::from_config(&config)?;
    let pipeline = SnapshotPipeline::from_config(LocalStorage::new(config.base_dir()), fetcher, &config);
    let datasets = EtlEngine::new(pipeline).dry_run(config.endpoints()).await?;

    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].1.len(), 1);
    assert!(!temp_dir.path().join("assets").exists());

    Ok(())
}
