use crate::github::types::{CheckConclusion, CheckRun, CheckStatus};
use serde::Serialize;

/// Rollup of a commit's check runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

impl std::fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} passed, {} failed, {} pending",
            self.passed, self.total, self.failed, self.pending
        )
    }
}

pub fn summarize(runs: &[CheckRun]) -> CheckSummary {
    let mut summary = CheckSummary {
        total: runs.len(),
        ..CheckSummary::default()
    };

    for run in runs {
        if run.status != CheckStatus::Completed {
            summary.pending += 1;
            continue;
        }
        match run.conclusion {
            Some(CheckConclusion::Success)
            | Some(CheckConclusion::Neutral)
            | Some(CheckConclusion::Skipped) => summary.passed += 1,
            Some(_) => summary.failed += 1,
            // Completed without a conclusion should not happen; count
            // it as still pending rather than inventing a verdict.
            None => summary.pending += 1,
        }
    }

    summary
}
