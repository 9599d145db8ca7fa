//! Review-state reconciliation: merges a pull request's timeline events,
//! review submissions, and live requested-reviewer lists into one
//! authoritative status per reviewer or review team.

mod input;

pub use input::{map_reviews, map_timeline};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerKind {
    User,
    Team,
}

/// An individual login or a review team. Identity is `(kind, id)`;
/// a user and a team sharing a display name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerRef {
    pub kind: ReviewerKind,
    /// Login for users, slug for teams
    pub id: String,
    pub display_name: String,
}

impl ReviewerRef {
    pub fn user(login: &str) -> Self {
        Self {
            kind: ReviewerKind::User,
            id: login.to_string(),
            display_name: login.to_string(),
        }
    }

    pub fn team(slug: &str, name: &str) -> Self {
        Self {
            kind: ReviewerKind::Team,
            id: slug.to_string(),
            display_name: name.to_string(),
        }
    }

    fn key(&self) -> (ReviewerKind, String) {
        (self.kind, self.id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Requested,
    RequestRemoved,
    Dismissed,
}

/// A review-request lifecycle event from the PR timeline. For
/// `Dismissed`, `reviewer` is the dismissed review's original author,
/// not the dismisser.
#[derive(Debug, Clone)]
pub struct ReviewEvent {
    pub kind: EventKind,
    pub at: DateTime<Utc>,
    pub reviewer: ReviewerRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
}

impl Verdict {
    /// Map a wire review state to a verdict; unknown states count as a comment
    pub fn from_wire(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "approved" => Verdict::Approved,
            "changes_requested" => Verdict::ChangesRequested,
            "commented" => Verdict::Commented,
            "dismissed" => Verdict::Dismissed,
            _ => Verdict::Commented,
        }
    }
}

/// An explicit reviewer verdict with its submission time.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub login: String,
    pub at: DateTime<Utc>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Requested,
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewState::Requested => write!(f, "requested"),
            ReviewState::Approved => write!(f, "approved"),
            ReviewState::ChangesRequested => write!(f, "changes_requested"),
            ReviewState::Commented => write!(f, "commented"),
            ReviewState::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl From<Verdict> for ReviewState {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approved => ReviewState::Approved,
            Verdict::ChangesRequested => ReviewState::ChangesRequested,
            Verdict::Commented => ReviewState::Commented,
            Verdict::Dismissed => ReviewState::Dismissed,
        }
    }
}

/// The reconciled status of one reviewer at query time.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewerStatus {
    pub reviewer: ReviewerRef,
    pub state: ReviewState,
    pub last_updated: DateTime<Utc>,
}

/// Compute one status per reviewer from three sources, layered in
/// order: timeline events, review submissions, live request lists.
///
/// Events and submissions may arrive unsorted; both are sorted by
/// timestamp before processing. A submission only overwrites an entry
/// when strictly newer than it (ties keep the existing entry). A live
/// request always wins and is stamped with `now`.
pub fn reconcile(
    events: &[ReviewEvent],
    submissions: &[ReviewSubmission],
    requested_users: &[ReviewerRef],
    requested_teams: &[ReviewerRef],
    now: DateTime<Utc>,
) -> Vec<ReviewerStatus> {
    let mut entries: HashMap<(ReviewerKind, String), ReviewerStatus> = HashMap::new();

    // Phase 1: timeline events, chronological. Later events overwrite
    // earlier ones for the same identity; a removal leaves no trace.
    let mut events: Vec<&ReviewEvent> = events.iter().collect();
    events.sort_by_key(|e| e.at);

    for event in events {
        match event.kind {
            EventKind::Requested => {
                entries.insert(
                    event.reviewer.key(),
                    ReviewerStatus {
                        reviewer: event.reviewer.clone(),
                        state: ReviewState::Requested,
                        last_updated: event.at,
                    },
                );
            }
            EventKind::RequestRemoved => {
                entries.remove(&event.reviewer.key());
            }
            EventKind::Dismissed => {
                entries.insert(
                    event.reviewer.key(),
                    ReviewerStatus {
                        reviewer: event.reviewer.clone(),
                        state: ReviewState::Dismissed,
                        last_updated: event.at,
                    },
                );
            }
        }
    }

    // Phase 2: submissions, chronological. Overwrite only when strictly
    // newer than the existing entry, so an out-of-order submission list
    // cannot clobber a later timeline event.
    let mut submissions: Vec<&ReviewSubmission> = submissions.iter().collect();
    submissions.sort_by_key(|s| s.at);

    for submission in submissions {
        let reviewer = ReviewerRef::user(&submission.login);
        let key = reviewer.key();

        if let Some(existing) = entries.get(&key) {
            if submission.at <= existing.last_updated {
                continue;
            }
        }

        entries.insert(
            key,
            ReviewerStatus {
                reviewer,
                state: submission.verdict.into(),
                last_updated: submission.at,
            },
        );
    }

    // Phase 3: a live re-request supersedes history unconditionally.
    for reviewer in requested_users.iter().chain(requested_teams.iter()) {
        entries.insert(
            reviewer.key(),
            ReviewerStatus {
                reviewer: reviewer.clone(),
                state: ReviewState::Requested,
                last_updated: now,
            },
        );
    }

    let mut result: Vec<ReviewerStatus> = entries.into_values().collect();
    result.sort_by(|a, b| {
        (a.reviewer.kind as u8, &a.reviewer.id).cmp(&(b.reviewer.kind as u8, &b.reviewer.id))
    });
    result
}
