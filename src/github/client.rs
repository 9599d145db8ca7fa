use crate::config::Repo;
use crate::error::ApiError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

use super::types::{CheckRun, CheckRunList, PullRequest, Review, TimelineEvent};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const PER_PAGE: usize = 100;

/// Thin read-only client for the GitHub REST API.
///
/// Sends `Authorization: Bearer <token>`; on a 401 the request is retried
/// once with the legacy `token` scheme. If that retry authenticates, the
/// legacy scheme sticks for the rest of the run. No other retry policy
/// exists.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    legacy_auth: AtomicBool,
}

impl GithubClient {
    pub fn new(api_url: &str, token: String, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("revq/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            token,
            legacy_auth: AtomicBool::new(false),
        })
    }

    /// Open pull requests, newest first, capped at `max`
    pub async fn list_open_pulls(
        &self,
        repo: &Repo,
        max: usize,
    ) -> Result<Vec<PullRequest>, ApiError> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let mut pulls: Vec<PullRequest> = self
            .get_paged(&path, &[("state", "open".to_string())], max)
            .await?;
        pulls.truncate(max);
        Ok(pulls)
    }

    pub async fn get_pull(&self, repo: &Repo, number: u64) -> Result<PullRequest, ApiError> {
        let path = format!("/repos/{}/{}/pulls/{}", repo.owner, repo.name, number);
        self.get_json(&path, &[]).await
    }

    pub async fn list_reviews(&self, repo: &Repo, number: u64) -> Result<Vec<Review>, ApiError> {
        let path = format!(
            "/repos/{}/{}/pulls/{}/reviews",
            repo.owner, repo.name, number
        );
        self.get_paged(&path, &[], usize::MAX).await
    }

    pub async fn list_timeline(
        &self,
        repo: &Repo,
        number: u64,
    ) -> Result<Vec<TimelineEvent>, ApiError> {
        let path = format!(
            "/repos/{}/{}/issues/{}/timeline",
            repo.owner, repo.name, number
        );
        self.get_paged(&path, &[], usize::MAX).await
    }

    pub async fn list_check_runs(&self, repo: &Repo, sha: &str) -> Result<Vec<CheckRun>, ApiError> {
        let path = format!(
            "/repos/{}/{}/commits/{}/check-runs",
            repo.owner, repo.name, sha
        );

        // Unlike the list endpoints this one wraps pages in an object
        // envelope, so it pages on total_count instead of get_paged.
        let mut runs = Vec::new();
        let mut page = 1u32;

        loop {
            let list: CheckRunList = self
                .get_json(
                    &path,
                    &[
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let batch_len = list.check_runs.len();
            runs.extend(list.check_runs);

            if !more_check_runs(batch_len, runs.len(), list.total_count) {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} check runs for {}", runs.len(), sha);
        Ok(runs)
    }

    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        max: usize,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut q: Vec<(&str, String)> = query.to_vec();
            q.push(("per_page", PER_PAGE.to_string()));
            q.push(("page", page.to_string()));

            let batch: Vec<T> = self.get_json(path, &q).await?;
            let batch_len = batch.len();
            items.extend(batch);

            if batch_len < PER_PAGE || items.len() >= max {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut response = self
            .http
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTHORIZATION, self.auth_header())
            .query(query)
            .send()
            .await?;

        // Single auth-scheme fallback per request: some deployments only
        // accept the legacy "token" scheme. The scheme is latched only
        // once the legacy retry gets past authentication.
        if response.status() == StatusCode::UNAUTHORIZED
            && !self.legacy_auth.load(Ordering::SeqCst)
        {
            debug!("401 with Bearer scheme, retrying {} with token scheme", path);
            let retry = self
                .http
                .get(&url)
                .header(ACCEPT, ACCEPT_JSON)
                .header(AUTHORIZATION, format!("token {}", self.token))
                .query(query)
                .send()
                .await?;

            if retry.status() != StatusCode::UNAUTHORIZED {
                self.legacy_auth.store(true, Ordering::SeqCst);
            }
            response = retry;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn auth_header(&self) -> String {
        if self.legacy_auth.load(Ordering::SeqCst) {
            format!("token {}", self.token)
        } else {
            format!("Bearer {}", self.token)
        }
    }
}

/// Keep paging while the envelope reports more runs than fetched and the
/// last batch was full.
fn more_check_runs(batch_len: usize, fetched: usize, total_count: u64) -> bool {
    batch_len == PER_PAGE && (fetched as u64) < total_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_run_paging_continues_past_a_full_page() {
        // 150 runs: first page is full and short of the total
        assert!(more_check_runs(100, 100, 150));
        // second page is partial, done
        assert!(!more_check_runs(50, 150, 150));
    }

    #[test]
    fn check_run_paging_stops_when_total_reached() {
        assert!(!more_check_runs(100, 100, 100));
        assert!(!more_check_runs(0, 0, 0));
    }

    #[test]
    fn auth_scheme_defaults_to_bearer_until_latched() {
        let client = GithubClient::new(
            "https://api.github.com",
            "t0ken".to_string(),
            std::time::Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.auth_header(), "Bearer t0ken");
        client.legacy_auth.store(true, Ordering::SeqCst);
        assert_eq!(client.auth_header(), "token t0ken");
    }
}
