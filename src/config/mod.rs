mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            repo: None,
            api_url: default_api_url(),
            token_env: default_token_env(),
            concurrency: default_concurrency(),
            launch_delay_ms: default_launch_delay_ms(),
            timeout_sec: default_timeout_sec(),
            report_dir: default_report_dir(),
            max_prs: default_max_prs(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_prs == 0 {
            return Err(ConfigError::ZeroMaxPrs);
        }
        if let Some(ref repo) = self.repo {
            repo.parse::<Repo>()
                .map_err(|_| ConfigError::InvalidRepo(repo.clone()))?;
        }
        Ok(())
    }

    /// Resolve the configured repository, if any
    pub fn repo(&self) -> Result<Repo, ConfigError> {
        let raw = self.repo.as_ref().ok_or(ConfigError::RepoNotSet)?;
        raw.parse::<Repo>()
            .map_err(|_| ConfigError::InvalidRepo(raw.clone()))
    }

    /// Read the GitHub token from the configured environment variable
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.token_env).map_err(|_| ConfigError::MissingToken {
            env: self.token_env.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, 6);
        assert_eq!(config.api_url, "https://api.github.com");
    }

    #[test]
    fn load_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "repo: acme/widgets\nconcurrency: 3\n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_prs, 50);
        let repo = config.repo().unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widgets");
    }

    #[test]
    fn invalid_repo_rejected() {
        let config = Config {
            repo: Some("not-a-repo".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(crate::error::ConfigError::InvalidRepo(_))
        ));
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(crate::error::ConfigError::ZeroConcurrency)
        ));
    }

    #[test]
    fn repo_parse_rejects_extra_segments() {
        assert!("a/b/c".parse::<Repo>().is_err());
        assert!("/b".parse::<Repo>().is_err());
        assert!("a/".parse::<Repo>().is_err());
    }
}
