use crate::enrich::{CheckSummary, EnrichmentStatus, RunReport};
use crate::error::OutputError;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub timestamp: String,
    pub repo: String,
    pub duration_sec: f64,
    pub prs: Vec<PrSummary>,
    pub totals: HashMap<String, usize>,
    pub degraded: Vec<u64>,
    pub report_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PrSummary {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub status: String,
    pub reviewers: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<CheckSummary>,
    pub url: String,
}

pub fn write_summary(
    report_dir: &Path,
    run_report: &RunReport,
    repo: &str,
) -> Result<(), OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let summary = build_summary(run_report, report_dir.to_path_buf(), repo);

    let json_path = report_dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    let md_path = report_dir.join("summary.md");
    let md = build_summary_markdown(&summary);
    fs::write(&md_path, md).map_err(OutputError::WriteReport)?;

    Ok(())
}

fn build_summary(run_report: &RunReport, report_dir: PathBuf, repo: &str) -> SummaryReport {
    let mut prs = Vec::new();
    let mut degraded = Vec::new();
    let mut totals: HashMap<String, usize> = HashMap::new();

    for result in &run_report.pr_results {
        if let EnrichmentStatus::Degraded { .. } = result.status {
            degraded.push(result.number);
        }

        let mut reviewers: HashMap<String, usize> = HashMap::new();
        for reviewer in &result.reviewers {
            let state = reviewer.state.to_string();
            *reviewers.entry(state.clone()).or_insert(0) += 1;
            *totals.entry(state).or_insert(0) += 1;
        }

        prs.push(PrSummary {
            number: result.number,
            title: result.title.clone(),
            author: result.author.clone(),
            status: result.status.to_string(),
            reviewers,
            checks: result.checks,
            url: result.url.clone(),
        });
    }

    SummaryReport {
        timestamp: Utc::now().to_rfc3339(),
        repo: repo.to_string(),
        duration_sec: run_report.total_duration.as_secs_f64(),
        prs,
        totals,
        degraded,
        report_dir,
    }
}

fn build_summary_markdown(summary: &SummaryReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Review status: {}\n\n", summary.repo));
    md.push_str(&format!(
        "Generated {} in {:.1}s\n\n",
        summary.timestamp, summary.duration_sec
    ));

    md.push_str("| PR | Title | Author | Reviewers | Checks |\n");
    md.push_str("|----|-------|--------|-----------|--------|\n");

    for pr in &summary.prs {
        let reviewers = if pr.reviewers.is_empty() {
            "-".to_string()
        } else {
            let mut parts: Vec<String> = pr
                .reviewers
                .iter()
                .map(|(state, count)| format!("{} {}", count, state))
                .collect();
            parts.sort();
            parts.join(", ")
        };

        let checks = pr
            .checks
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());

        md.push_str(&format!(
            "| [#{}]({}) | {} | {} | {} | {} |\n",
            pr.number, pr.url, pr.title, pr.author, reviewers, checks
        ));
    }

    if !summary.degraded.is_empty() {
        let numbers: Vec<String> = summary.degraded.iter().map(|n| format!("#{}", n)).collect();
        md.push_str(&format!("\nNot enriched: {}\n", numbers.join(", ")));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::PrStatus;
    use crate::reconcile::{ReviewState, ReviewerRef, ReviewerStatus};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn report() -> RunReport {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        RunReport {
            pr_results: vec![
                PrStatus {
                    number: 1,
                    title: "One".to_string(),
                    author: "alice".to_string(),
                    url: "https://github.com/acme/widgets/pull/1".to_string(),
                    draft: false,
                    mergeable_state: None,
                    status: EnrichmentStatus::Enriched,
                    reviewers: vec![
                        ReviewerStatus {
                            reviewer: ReviewerRef::user("bob"),
                            state: ReviewState::Approved,
                            last_updated: at,
                        },
                        ReviewerStatus {
                            reviewer: ReviewerRef::user("carol"),
                            state: ReviewState::Approved,
                            last_updated: at,
                        },
                    ],
                    checks: None,
                },
                PrStatus {
                    number: 2,
                    title: "Two".to_string(),
                    author: "dave".to_string(),
                    url: "https://github.com/acme/widgets/pull/2".to_string(),
                    draft: false,
                    mergeable_state: None,
                    status: EnrichmentStatus::Degraded {
                        reason: "reviews fetch failed".to_string(),
                    },
                    reviewers: Vec::new(),
                    checks: None,
                },
            ],
            total_duration: Duration::from_secs(3),
        }
    }

    #[test]
    fn summary_counts_states_and_degraded() {
        let summary = build_summary(&report(), PathBuf::from("reports"), "acme/widgets");
        assert_eq!(summary.totals.get("approved"), Some(&2));
        assert_eq!(summary.degraded, vec![2]);
        assert_eq!(summary.prs.len(), 2);
    }

    #[test]
    fn markdown_lists_every_pr() {
        let summary = build_summary(&report(), PathBuf::from("reports"), "acme/widgets");
        let md = build_summary_markdown(&summary);
        assert!(md.contains("[#1](https://github.com/acme/widgets/pull/1)"));
        assert!(md.contains("2 approved"));
        assert!(md.contains("Not enriched: #2"));
    }
}
