//! Maps GitHub wire payloads into reconciler input. Unparseable
//! timestamps are fatal for the PR; an event with no resolvable
//! reviewer is skipped on its own.

use crate::error::ReconcileError;
use crate::github::types::{Review, TimelineEvent};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::{EventKind, ReviewEvent, ReviewSubmission, ReviewerRef, Verdict};

const EVENT_REQUESTED: &str = "review_requested";
const EVENT_REQUEST_REMOVED: &str = "review_request_removed";
const EVENT_DISMISSED: &str = "review_dismissed";

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ReconcileError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| ReconcileError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Filter timeline events down to review-request lifecycle changes.
///
/// Dismissal events name the dismissed review by id only; the original
/// author is resolved against the fetched reviews list.
pub fn map_timeline(
    events: &[TimelineEvent],
    reviews: &[Review],
) -> Result<Vec<ReviewEvent>, ReconcileError> {
    let authors: HashMap<u64, &str> = reviews
        .iter()
        .filter_map(|r| r.user.as_ref().map(|u| (r.id, u.login.as_str())))
        .collect();

    let mut mapped = Vec::new();

    for event in events {
        let kind = match event.event.as_str() {
            EVENT_REQUESTED => EventKind::Requested,
            EVENT_REQUEST_REMOVED => EventKind::RequestRemoved,
            EVENT_DISMISSED => EventKind::Dismissed,
            _ => continue,
        };

        let at = match event.created_at.as_deref() {
            Some(value) => parse_timestamp(value)?,
            None => {
                debug!("Skipping {} event without timestamp", event.event);
                continue;
            }
        };

        let reviewer = match kind {
            EventKind::Requested | EventKind::RequestRemoved => {
                if let Some(ref user) = event.requested_reviewer {
                    ReviewerRef::user(&user.login)
                } else if let Some(ref team) = event.requested_team {
                    ReviewerRef::team(&team.slug, &team.name)
                } else {
                    debug!("Skipping {} event without reviewer or team", event.event);
                    continue;
                }
            }
            EventKind::Dismissed => {
                let author = event
                    .dismissed_review
                    .as_ref()
                    .and_then(|d| authors.get(&d.review_id));
                match author {
                    Some(login) => ReviewerRef::user(login),
                    None => {
                        debug!("Skipping dismissal with unresolvable review author");
                        continue;
                    }
                }
            }
        };

        mapped.push(ReviewEvent { kind, at, reviewer });
    }

    Ok(mapped)
}

/// Convert submitted reviews into reconciler submissions. Reviews still
/// pending submission and reviews from deleted accounts are skipped.
pub fn map_reviews(reviews: &[Review]) -> Result<Vec<ReviewSubmission>, ReconcileError> {
    let mut mapped = Vec::new();

    for review in reviews {
        let login = match review.user.as_ref() {
            Some(user) => user.login.clone(),
            None => {
                debug!("Skipping review {} without an author", review.id);
                continue;
            }
        };

        let at = match review.submitted_at.as_deref() {
            Some(value) => parse_timestamp(value)?,
            None => continue,
        };

        mapped.push(ReviewSubmission {
            login,
            at,
            verdict: Verdict::from_wire(&review.state),
        });
    }

    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{DismissedReview, Team, User};
    use crate::reconcile::ReviewerKind;

    fn user(login: &str) -> Option<User> {
        Some(User {
            login: login.to_string(),
        })
    }

    fn review(id: u64, login: &str, state: &str, submitted_at: Option<&str>) -> Review {
        Review {
            id,
            user: user(login),
            state: state.to_string(),
            submitted_at: submitted_at.map(|s| s.to_string()),
        }
    }

    fn event(name: &str, created_at: Option<&str>) -> TimelineEvent {
        TimelineEvent {
            event: name.to_string(),
            created_at: created_at.map(|s| s.to_string()),
            requested_reviewer: None,
            requested_team: None,
            dismissed_review: None,
        }
    }

    #[test]
    fn maps_request_and_removal_events() {
        let mut requested = event(EVENT_REQUESTED, Some("2024-05-01T12:00:00Z"));
        requested.requested_reviewer = user("bob");
        let mut removed = event(EVENT_REQUEST_REMOVED, Some("2024-05-01T13:00:00Z"));
        removed.requested_team = Some(Team {
            slug: "platform".to_string(),
            name: "Platform".to_string(),
        });

        let mapped = map_timeline(&[requested, removed], &[]).unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].kind, EventKind::Requested);
        assert_eq!(mapped[0].reviewer.kind, ReviewerKind::User);
        assert_eq!(mapped[1].kind, EventKind::RequestRemoved);
        assert_eq!(mapped[1].reviewer.id, "platform");
    }

    #[test]
    fn ignores_unrelated_events() {
        let labeled = event("labeled", Some("2024-05-01T12:00:00Z"));
        let mapped = map_timeline(&[labeled], &[]).unwrap();
        assert!(mapped.is_empty());
    }

    #[test]
    fn skips_event_without_actor() {
        let orphan = event(EVENT_REQUESTED, Some("2024-05-01T12:00:00Z"));
        let mapped = map_timeline(&[orphan], &[]).unwrap();
        assert!(mapped.is_empty());
    }

    #[test]
    fn malformed_timestamp_is_fatal() {
        let mut requested = event(EVENT_REQUESTED, Some("yesterday-ish"));
        requested.requested_reviewer = user("bob");
        let err = map_timeline(&[requested], &[]).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidTimestamp { .. }));
    }

    #[test]
    fn dismissal_resolves_author_from_reviews() {
        let mut dismissal = event(EVENT_DISMISSED, Some("2024-05-01T14:00:00Z"));
        dismissal.dismissed_review = Some(DismissedReview { review_id: 7 });
        let reviews = vec![review(7, "bob", "approved", Some("2024-05-01T12:00:00Z"))];

        let mapped = map_timeline(&[dismissal], &reviews).unwrap();
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].kind, EventKind::Dismissed);
        assert_eq!(mapped[0].reviewer.id, "bob");
    }

    #[test]
    fn dismissal_with_unknown_review_is_skipped() {
        let mut dismissal = event(EVENT_DISMISSED, Some("2024-05-01T14:00:00Z"));
        dismissal.dismissed_review = Some(DismissedReview { review_id: 99 });
        let mapped = map_timeline(&[dismissal], &[]).unwrap();
        assert!(mapped.is_empty());
    }

    #[test]
    fn pending_reviews_are_not_submissions() {
        let reviews = vec![
            review(1, "alice", "APPROVED", Some("2024-05-01T12:00:00Z")),
            review(2, "bob", "PENDING", None),
        ];
        let mapped = map_reviews(&reviews).unwrap();
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].login, "alice");
        assert_eq!(mapped[0].verdict, Verdict::Approved);
    }
}
