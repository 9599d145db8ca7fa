mod report;
mod summary;

pub use report::{format_pr_status, write_pr_report};
pub use summary::write_summary;
