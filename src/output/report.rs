use crate::enrich::{EnrichmentStatus, PrStatus};
use crate::error::OutputError;
use crate::reconcile::ReviewerKind;
use std::fs;
use std::path::Path;

/// Render one PR's review snapshot as markdown.
pub fn format_pr_status(result: &PrStatus) -> String {
    let mut content = String::new();

    content.push_str(&format!("# PR #{}: {}\n\n", result.number, result.title));

    content.push_str("| Field | Value |\n");
    content.push_str("|-------|-------|\n");
    content.push_str(&format!("| Author | {} |\n", result.author));
    content.push_str(&format!("| URL | {} |\n", result.url));
    if result.draft {
        content.push_str("| Draft | yes |\n");
    }
    if let Some(ref mergeable_state) = result.mergeable_state {
        content.push_str(&format!("| Mergeable | {} |\n", mergeable_state));
    }
    content.push_str(&format!("| Enrichment | {} |\n", result.status));
    if let Some(ref checks) = result.checks {
        content.push_str(&format!("| Checks | {} |\n", checks));
    }
    content.push('\n');

    if let EnrichmentStatus::Degraded { ref reason } = result.status {
        content.push_str(&format!("*Not enriched: {}*\n", reason));
        return content;
    }

    if result.reviewers.is_empty() {
        content.push_str("*No reviewers*\n");
    } else {
        content.push_str("## Reviewers\n\n");
        content.push_str("| Reviewer | Type | Status | Updated |\n");
        content.push_str("|----------|------|--------|--------|\n");
        for reviewer in &result.reviewers {
            let kind = match reviewer.reviewer.kind {
                ReviewerKind::User => "user",
                ReviewerKind::Team => "team",
            };
            content.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                reviewer.reviewer.display_name,
                kind,
                reviewer.state,
                reviewer.last_updated.format("%Y-%m-%d %H:%M UTC")
            ));
        }
    }

    content
}

/// Write a single PR's report immediately
pub fn write_pr_report(report_dir: &Path, result: &PrStatus) -> Result<(), OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let content = format_pr_status(result);
    let path = report_dir.join(format!("{}.md", result.number));
    fs::write(path, content).map_err(OutputError::WriteReport)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{ReviewState, ReviewerRef, ReviewerStatus};
    use chrono::{TimeZone, Utc};

    fn sample() -> PrStatus {
        PrStatus {
            number: 42,
            title: "Add widget".to_string(),
            author: "alice".to_string(),
            url: "https://github.com/acme/widgets/pull/42".to_string(),
            draft: false,
            mergeable_state: Some("clean".to_string()),
            status: EnrichmentStatus::Enriched,
            reviewers: vec![ReviewerStatus {
                reviewer: ReviewerRef::team("platform", "Platform"),
                state: ReviewState::Requested,
                last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            }],
            checks: None,
        }
    }

    #[test]
    fn renders_reviewer_table() {
        let md = format_pr_status(&sample());
        assert!(md.contains("# PR #42: Add widget"));
        assert!(md.contains("| Platform | team | requested |"));
        assert!(md.contains("| Mergeable | clean |"));
    }

    #[test]
    fn degraded_pr_renders_reason_instead_of_table() {
        let mut result = sample();
        result.status = EnrichmentStatus::Degraded {
            reason: "timeline fetch failed".to_string(),
        };
        let md = format_pr_status(&result);
        assert!(md.contains("*Not enriched: timeline fetch failed*"));
        assert!(!md.contains("## Reviewers"));
    }
}
