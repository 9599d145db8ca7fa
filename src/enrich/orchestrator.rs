use crate::config::{Config, Repo};
use crate::error::EnrichError;
use crate::github::types::PullRequest;
use crate::github::GithubClient;
use crate::output::write_pr_report;
use crate::reconcile::{ReviewState, ReviewerStatus};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{info, warn};

use super::checks::CheckSummary;
use super::fetch::enrich_pull;

#[derive(Debug, Clone, Default)]
pub struct EnrichOptions {
    /// Restrict the run to these PR numbers
    pub pr_filter: Option<Vec<u64>>,
}

#[derive(Debug)]
pub struct RunReport {
    pub pr_results: Vec<PrStatus>,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn totals(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for result in &self.pr_results {
            for reviewer in &result.reviewers {
                match reviewer.state {
                    ReviewState::Requested => counts.requested += 1,
                    ReviewState::Approved => counts.approved += 1,
                    ReviewState::ChangesRequested => counts.changes_requested += 1,
                    ReviewState::Commented => counts.commented += 1,
                    ReviewState::Dismissed => counts.dismissed += 1,
                }
            }
        }
        counts
    }
}

#[derive(Debug, Default)]
pub struct StateCounts {
    pub requested: usize,
    pub approved: usize,
    pub changes_requested: usize,
    pub commented: usize,
    pub dismissed: usize,
}

/// One pull request's enriched (or degraded) review snapshot.
#[derive(Debug)]
pub struct PrStatus {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub url: String,
    pub draft: bool,
    pub mergeable_state: Option<String>,
    pub status: EnrichmentStatus,
    pub reviewers: Vec<ReviewerStatus>,
    pub checks: Option<CheckSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentStatus {
    Enriched,
    Degraded { reason: String },
}

impl std::fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStatus::Enriched => write!(f, "enriched"),
            EnrichmentStatus::Degraded { reason } => write!(f, "degraded: {}", reason),
        }
    }
}

pub struct Enricher {
    client: Arc<GithubClient>,
    repo: Repo,
    launch_delay: Duration,
    semaphore: Arc<Semaphore>,
}

impl Enricher {
    pub fn new(client: Arc<GithubClient>, repo: Repo, config: &Config) -> Self {
        Self {
            client,
            repo,
            launch_delay: Duration::from_millis(config.launch_delay_ms),
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
        }
    }

    /// Enrich the given pull requests concurrently, writing each report
    /// as soon as that PR completes. One PR's failure never aborts the
    /// others; it lands as a degraded entry instead.
    pub async fn run(
        &self,
        pulls: Vec<PullRequest>,
        options: &EnrichOptions,
        report_dir: &Path,
    ) -> Result<RunReport, EnrichError> {
        let start = std::time::Instant::now();

        let pulls: Vec<PullRequest> = pulls
            .into_iter()
            .filter(|pr| {
                options
                    .pr_filter
                    .as_ref()
                    .map(|f| f.contains(&pr.number))
                    .unwrap_or(true)
            })
            .collect();

        if pulls.is_empty() && options.pr_filter.is_some() {
            return Err(EnrichError::NoPullsMatched);
        }

        info!(
            "Enriching {} pull requests with concurrency {}",
            pulls.len(),
            self.semaphore.available_permits()
        );

        let mut futures = FuturesUnordered::new();

        for (idx, pr) in pulls.into_iter().enumerate() {
            // Small delay between launches to avoid burst rate limits
            if idx > 0 && self.launch_delay > Duration::ZERO {
                sleep(self.launch_delay).await;
            }

            let permit = self.semaphore.clone().acquire_owned().await?;
            let client = self.client.clone();
            let repo = self.repo.clone();

            futures.push(tokio::spawn(async move {
                let _permit = permit; // hold until done
                enrich_pull(&client, &repo, &pr).await
            }));
        }

        let mut results = Vec::new();
        while let Some(result) = futures.next().await {
            match result {
                Ok(pr_status) => {
                    info!(
                        "Completed #{}: {} reviewers ({})",
                        pr_status.number,
                        pr_status.reviewers.len(),
                        pr_status.status
                    );

                    // Write report immediately (streaming mode)
                    if let Err(e) = write_pr_report(report_dir, &pr_status) {
                        warn!("Failed to write report for #{}: {}", pr_status.number, e);
                    }

                    results.push(pr_status);
                }
                Err(e) => {
                    warn!("Enrichment task panicked: {}", e);
                }
            }
        }

        results.sort_by_key(|r| r.number);

        Ok(RunReport {
            pr_results: results,
            total_duration: start.elapsed(),
        })
    }
}
