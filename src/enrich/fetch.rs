use crate::config::Repo;
use crate::github::types::PullRequest;
use crate::github::GithubClient;
use crate::reconcile::{map_reviews, map_timeline, reconcile, ReviewerRef};
use chrono::Utc;
use tracing::{debug, warn};

use super::checks;
use super::orchestrator::{EnrichmentStatus, PrStatus};

/// Enrich one pull request: fetch details, reviews, timeline and check
/// runs concurrently, then reconcile reviewer state.
///
/// Never fails: any fetch or mapping error degrades this PR to an
/// unenriched entry so the rest of the listing is unaffected.
pub async fn enrich_pull(client: &GithubClient, repo: &Repo, pr: &PullRequest) -> PrStatus {
    let mut status = PrStatus {
        number: pr.number,
        title: pr.title.clone(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        url: pr.html_url.clone(),
        draft: pr.draft,
        mergeable_state: None,
        status: EnrichmentStatus::Enriched,
        reviewers: Vec::new(),
        checks: None,
    };

    let (details, reviews, timeline, check_runs) = tokio::join!(
        client.get_pull(repo, pr.number),
        client.list_reviews(repo, pr.number),
        client.list_timeline(repo, pr.number),
        client.list_check_runs(repo, &pr.head.sha),
    );

    macro_rules! or_degrade {
        ($result:expr, $what:literal) => {
            match $result {
                Ok(value) => value,
                Err(e) => {
                    warn!("PR #{}: {} fetch failed: {}", pr.number, $what, e);
                    status.status = EnrichmentStatus::Degraded {
                        reason: format!("{} fetch failed: {}", $what, e),
                    };
                    return status;
                }
            }
        };
    }

    let details = or_degrade!(details, "details");
    let reviews = or_degrade!(reviews, "reviews");
    let timeline = or_degrade!(timeline, "timeline");
    let check_runs = or_degrade!(check_runs, "check-runs");

    let events = match map_timeline(&timeline, &reviews) {
        Ok(events) => events,
        Err(e) => {
            warn!("PR #{}: {}", pr.number, e);
            status.status = EnrichmentStatus::Degraded {
                reason: e.to_string(),
            };
            return status;
        }
    };

    let submissions = match map_reviews(&reviews) {
        Ok(submissions) => submissions,
        Err(e) => {
            warn!("PR #{}: {}", pr.number, e);
            status.status = EnrichmentStatus::Degraded {
                reason: e.to_string(),
            };
            return status;
        }
    };

    let requested_users: Vec<ReviewerRef> = details
        .requested_reviewers
        .iter()
        .map(|u| ReviewerRef::user(&u.login))
        .collect();
    let requested_teams: Vec<ReviewerRef> = details
        .requested_teams
        .iter()
        .map(|t| ReviewerRef::team(&t.slug, &t.name))
        .collect();

    debug!(
        "PR #{}: {} events, {} submissions, {} live requests",
        pr.number,
        events.len(),
        submissions.len(),
        requested_users.len() + requested_teams.len()
    );

    // mergeable_state is the richer field; fall back to the boolean
    // when GitHub has not computed it.
    status.mergeable_state = details.mergeable_state.clone().or(match details.mergeable {
        Some(true) => Some("mergeable".to_string()),
        Some(false) => Some("conflicting".to_string()),
        None => None,
    });
    status.reviewers = reconcile(
        &events,
        &submissions,
        &requested_users,
        &requested_teams,
        Utc::now(),
    );
    status.checks = Some(checks::summarize(&check_runs));
    status
}
