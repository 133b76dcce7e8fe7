use clap::Parser;
use table_snapshot::core::etl::EndpointStatus;
use table_snapshot::core::ConfigProvider;
use table_snapshot::utils::{logger, validation::Validate};
use table_snapshot::{CliConfig, EtlEngine, HttpFetcher, LocalStorage, SnapshotError, SnapshotPipeline};

fn exit_with(e: &SnapshotError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let dry_run = cli.dry_run;

    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting table-snapshot");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.into_snapshot_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    tracing::info!(
        "📁 Writing {} endpoint(s) under {} ({} orient)",
        config.endpoints().len(),
        config.base_dir().display(),
        config.orient()
    );

    let fetcher = match HttpFetcher::from_config(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => exit_with(&e),
    };
    let storage = LocalStorage::new(config.base_dir());
    let pipeline = SnapshotPipeline::from_config(storage, fetcher, &config);
    let engine = EtlEngine::new(pipeline).with_policy(config.failure_policy);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        if let Err(e) = engine.dry_run(config.endpoints()).await {
            exit_with(&e);
        }
        return Ok(());
    }

    let report = engine.run(config.endpoints()).await;

    for outcome in &report.outcomes {
        match &outcome.status {
            EndpointStatus::Written { path, rows } => {
                println!("✅ {}: {} rows -> {}", outcome.name, rows, path.display());
            }
            EndpointStatus::Failed(e) => {
                eprintln!("❌ {}: {}", outcome.name, e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
            }
            EndpointStatus::Skipped => {
                eprintln!("⏭  {}: skipped", outcome.name);
            }
        }
    }

    if !report.is_success() {
        std::process::exit(report.exit_code());
    }

    Ok(())
}
