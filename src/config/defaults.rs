use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

pub fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

pub fn default_concurrency() -> usize {
    6
}

pub fn default_launch_delay_ms() -> u64 {
    200
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_max_prs() -> usize {
    50
}
