//! Wire types for the GitHub REST endpoints revq reads. Timestamps stay
//! as strings here; parsing happens when mapping into reconciler input.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Head {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Option<User>,

    #[serde(default)]
    pub draft: bool,

    pub head: Head,

    /// Only populated on the single-PR endpoint, not the list endpoint
    #[serde(default)]
    pub mergeable: Option<bool>,

    #[serde(default)]
    pub mergeable_state: Option<String>,

    #[serde(default)]
    pub requested_reviewers: Vec<User>,

    #[serde(default)]
    pub requested_teams: Vec<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user: Option<User>,
    pub state: String,
    /// Null for reviews still pending submission
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DismissedReview {
    pub review_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEvent {
    pub event: String,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub requested_reviewer: Option<User>,

    #[serde(default)]
    pub requested_team: Option<Team>,

    #[serde(default)]
    pub dismissed_review: Option<DismissedReview>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Completed,
    InProgress,
    Queued,
    Requested,
    Pending,
    Waiting,
    /// Statuses GitHub adds later decode here instead of failing the PR
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Skipped,
    Stale,
    StartupFailure,
    Success,
    TimedOut,
    /// Conclusions GitHub adds later decode here instead of failing the PR
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunList {
    pub total_count: u64,
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_decodes_list_payload() {
        // The list endpoint omits mergeable fields entirely
        let json = r#"{
            "number": 42,
            "title": "Add widget",
            "html_url": "https://github.com/acme/widgets/pull/42",
            "user": {"login": "alice"},
            "head": {"sha": "abc123"},
            "requested_reviewers": [{"login": "bob"}],
            "requested_teams": [{"slug": "platform", "name": "Platform"}]
        }"#;

        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 42);
        assert!(pr.mergeable.is_none());
        assert!(!pr.draft);
        assert_eq!(pr.requested_reviewers[0].login, "bob");
        assert_eq!(pr.requested_teams[0].slug, "platform");
    }

    #[test]
    fn timeline_event_decodes_sparse_payloads() {
        let json = r#"[
            {"event": "review_requested", "created_at": "2024-05-01T12:00:00Z",
             "requested_reviewer": {"login": "bob"}},
            {"event": "review_dismissed", "created_at": "2024-05-01T13:00:00Z",
             "dismissed_review": {"review_id": 7}},
            {"event": "labeled", "created_at": "2024-05-01T14:00:00Z"}
        ]"#;

        let events: Vec<TimelineEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].dismissed_review.as_ref().unwrap().review_id, 7);
        assert!(events[2].requested_reviewer.is_none());
    }

    #[test]
    fn unrecognized_check_values_decode_as_unknown() {
        let json = r#"{
            "total_count": 1,
            "check_runs": [{"name": "ci", "status": "warming_up", "conclusion": "exploded"}]
        }"#;

        let list: CheckRunList = serde_json::from_str(json).unwrap();
        assert_eq!(list.check_runs[0].status, CheckStatus::Unknown);
        assert_eq!(list.check_runs[0].conclusion, Some(CheckConclusion::Unknown));
    }

    #[test]
    fn check_run_decodes_in_progress() {
        let json = r#"{
            "total_count": 1,
            "check_runs": [{"name": "ci", "status": "in_progress", "conclusion": null}]
        }"#;

        let list: CheckRunList = serde_json::from_str(json).unwrap();
        assert_eq!(list.check_runs[0].status, CheckStatus::InProgress);
        assert!(list.check_runs[0].conclusion.is_none());
    }
}
