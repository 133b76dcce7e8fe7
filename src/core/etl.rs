use crate::core::{Pipeline, SourceEndpoint, TabularDataset};
use crate::utils::error::{Result, SnapshotError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// What the engine does with the remaining endpoints after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every endpoint is exported regardless of earlier failures.
    #[default]
    Continue,
    /// Remaining endpoints are skipped after the first failure.
    FailFast,
}

#[derive(Debug)]
pub enum EndpointStatus {
    Written { path: PathBuf, rows: usize },
    Failed(SnapshotError),
    Skipped,
}

#[derive(Debug)]
pub struct EndpointOutcome {
    pub name: String,
    pub status: EndpointStatus,
}

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<EndpointOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.status, EndpointStatus::Written { .. }))
    }

    pub fn first_error(&self) -> Option<&SnapshotError> {
        self.outcomes.iter().find_map(|o| match &o.status {
            EndpointStatus::Failed(e) => Some(e),
            _ => None,
        })
    }

    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EndpointStatus::Written { .. }))
            .count()
    }

    pub fn outcome(&self, name: &str) -> Option<&EndpointOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// 0 when every endpoint was written, otherwise the first failure's code.
    pub fn exit_code(&self) -> i32 {
        match self.first_error() {
            Some(e) => e.exit_code(),
            None if self.is_success() => 0,
            None => 1,
        }
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    policy: FailurePolicy,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Snapshot export of a single endpoint: extract, transform, load.
    pub async fn export(&self, endpoint: &SourceEndpoint) -> Result<(PathBuf, usize)> {
        let started = Instant::now();

        tracing::info!("[{}] Extracting {}", endpoint.name, endpoint.url);
        let html = self.pipeline.extract(endpoint).await?;

        tracing::info!("[{}] Transforming first table", endpoint.name);
        let dataset = self.pipeline.transform(endpoint, html).await?;
        let rows = dataset.len();
        tracing::info!(
            "[{}] Parsed {} rows x {} columns",
            endpoint.name,
            rows,
            dataset.columns().len()
        );

        tracing::info!("[{}] Loading snapshot", endpoint.name);
        let path = self.pipeline.load(endpoint, dataset).await?;
        tracing::info!(
            "[{}] Wrote {} in {:?}",
            endpoint.name,
            path.display(),
            started.elapsed()
        );

        Ok((path, rows))
    }

    pub async fn run(&self, endpoints: &[SourceEndpoint]) -> RunReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(endpoints.len());
        let mut failed = false;

        tracing::info!(
            "Starting snapshot export of {} endpoint(s), policy {:?}",
            endpoints.len(),
            self.policy
        );

        for endpoint in endpoints {
            if failed && self.policy == FailurePolicy::FailFast {
                tracing::warn!("[{}] Skipped after earlier failure", endpoint.name);
                outcomes.push(EndpointOutcome {
                    name: endpoint.name.clone(),
                    status: EndpointStatus::Skipped,
                });
                continue;
            }

            let status = match self.export(endpoint).await {
                Ok((path, rows)) => EndpointStatus::Written { path, rows },
                Err(e) => {
                    tracing::error!(
                        "[{}] Export failed: {} (Category: {:?})",
                        endpoint.name,
                        e,
                        e.category()
                    );
                    failed = true;
                    EndpointStatus::Failed(e)
                }
            };

            outcomes.push(EndpointOutcome {
                name: endpoint.name.clone(),
                status,
            });
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            "Snapshot export finished: {}/{} written in {}ms",
            report.written(),
            endpoints.len(),
            (report.finished_at - report.started_at).num_milliseconds()
        );

        report
    }

    /// Fetches and parses every endpoint without writing anything.
    pub async fn dry_run(&self, endpoints: &[SourceEndpoint]) -> Result<Vec<(String, TabularDataset)>> {
        let mut datasets = Vec::with_capacity(endpoints.len());

        for endpoint in endpoints {
            let html = self.pipeline.extract(endpoint).await?;
            let dataset = self.pipeline.transform(endpoint, html).await?;

            let columns: Vec<&str> = dataset.column_names().collect();
            tracing::info!(
                "[{}] {} rows, columns: {}",
                endpoint.name,
                dataset.len(),
                columns.join(", ")
            );
            tracing::info!("[{}] Would write {}", endpoint.name, endpoint.output.display());

            datasets.push((endpoint.name.clone(), dataset));
        }

        Ok(datasets)
    }
}
