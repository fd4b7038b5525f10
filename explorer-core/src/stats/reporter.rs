//! src/stats/reporter.rs
//!
//! Usage statistics side channel. After a successful listing the total size,
//! processing time, timestamp and root path are POSTed as JSON to an external
//! collector. Failures are logged and never reach the listing's caller.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::StatsConfig;
use crate::error::AppError;

/// Payload accepted by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    #[serde(rename = "serverErrorText")]
    pub error_text: String,

    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Seconds spent producing the listing
    #[serde(rename = "loadTime")]
    pub load_time: f64,

    pub date: DateTime<Local>,

    #[serde(rename = "path")]
    pub root_path: String,
}

impl StatsReport {
    #[must_use]
    pub fn new(total_size: u64, load_time: Duration, root: &Path) -> Self {
        Self {
            error_text: String::new(),
            total_size,
            load_time: load_time.as_secs_f64(),
            date: Local::now(),
            root_path: root.display().to_string(),
        }
    }
}

/// HTTP client for the collector. Without an endpoint every report is a no-op.
#[derive(Debug, Clone)]
pub struct StatsReporter {
    http: Client,
    endpoint: Option<String>,
}

impl StatsReporter {
    /// Builds the collector client, or a [`disabled`](Self::disabled) reporter
    /// when `cfg` names no endpoint.
    pub fn new(cfg: &StatsConfig) -> Result<Self, AppError> {
        let Some(endpoint) = cfg.endpoint() else {
            return Ok(Self::disabled());
        };

        let http: Client = Client::builder()
            .user_agent(concat!("file-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: Some(endpoint),
        })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            endpoint: None,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Sends one report and waits for the collector's answer.
    pub async fn send(&self, report: &StatsReport) -> Result<(), AppError> {
        let Some(url) = self.endpoint.as_deref() else {
            return Ok(());
        };

        let response = self
            .http
            .post(url)
            .json(report)
            .send()
            .await
            .map_err(|e| AppError::Stats(format!("POST {url}: {e}")))?;

        let status: StatusCode = response.status();
        let body: String = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(AppError::Stats(format!(
                "collector at {url} answered {status}: {body}"
            )));
        }

        debug!(
            marker = "STATS_REPORT",
            operation_type = "stats_report_sent",
            url,
            response = %body,
            "Collector accepted report"
        );

        Ok(())
    }

    /// Sends `report` in the background, logging and dropping any failure.
    pub fn spawn_report(&self, report: StatsReport) -> JoinHandle<()> {
        let reporter: Self = self.clone();

        tokio::spawn(async move {
            if let Err(e) = reporter.send(&report).await {
                warn!(
                    marker = "STATS_REPORT",
                    operation_type = "stats_report_failure",
                    error = %e,
                    "Statistics report dropped"
                );
            }
        })
    }
}
