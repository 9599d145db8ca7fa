use crate::cli::PrArgs;
use crate::config::Config;
use crate::enrich::{enrich_pull, EnrichmentStatus};
use crate::github::GithubClient;
use crate::output::format_pr_status;
use std::time::Duration;
use tracing::{debug, info};

pub async fn execute(args: PrArgs) -> anyhow::Result<()> {
    let mut config = if args.config.exists() {
        info!("Loading config from {:?}", args.config);
        Config::load(&args.config)?
    } else {
        debug!("Config {:?} not found, using defaults", args.config);
        Config::default()
    };

    if args.repo.is_some() {
        config.repo = args.repo.clone();
    }

    config.validate()?;
    let repo = config.repo()?;
    let token = config.resolve_token()?;

    let client = GithubClient::new(
        &config.api_url,
        token,
        Duration::from_secs(config.timeout_sec),
    )?;

    let pr = client.get_pull(&repo, args.number).await?;
    let status = enrich_pull(&client, &repo, &pr).await;

    println!("{}", format_pr_status(&status));

    if let EnrichmentStatus::Degraded { .. } = status.status {
        std::process::exit(1);
    }

    Ok(())
}
