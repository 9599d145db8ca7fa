use crate::cli::ReportArgs;
use crate::config::Config;
use crate::enrich::{EnrichOptions, Enricher};
use crate::github::GithubClient;
use crate::github::types::PullRequest;
use crate::output::write_summary;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub async fn execute(args: ReportArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args)?;

    // Apply CLI overrides
    if args.repo.is_some() {
        config.repo = args.repo.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(report_dir) = args.report_dir {
        config.report_dir = report_dir;
    }
    if let Some(max_prs) = args.max_prs {
        config.max_prs = max_prs;
    }

    config.validate()?;
    let repo = config.repo()?;
    let token = config.resolve_token()?;

    let client = Arc::new(GithubClient::new(
        &config.api_url,
        token,
        Duration::from_secs(config.timeout_sec),
    )?);

    info!("Fetching open pull requests for {}", repo);
    let pulls = client.list_open_pulls(&repo, config.max_prs).await?;

    if pulls.is_empty() {
        info!("No open pull requests in {}", repo);
        return Ok(());
    }

    let options = EnrichOptions {
        pr_filter: args.prs,
    };

    if args.dry_run {
        info!("DRY RUN - no enrichment calls will be made");
        print_plan(&config, &options, &pulls);
        return Ok(());
    }

    // Dated report directory (reports/YYYY-MM-DD/)
    let date_str = Local::now().format("%Y-%m-%d").to_string();
    let report_dir = config.report_dir.join(&date_str);

    info!("Reports will be written to {:?}", report_dir);
    let enricher = Enricher::new(client, repo.clone(), &config);
    let report = enricher.run(pulls, &options, &report_dir).await?;

    write_summary(&report_dir, &report, &repo.to_string())?;

    let totals = report.totals();
    info!(
        "Completed in {:.1}s: {} approved, {} changes_requested, {} requested, {} commented, {} dismissed across {} PRs",
        report.total_duration.as_secs_f64(),
        totals.approved,
        totals.changes_requested,
        totals.requested,
        totals.commented,
        totals.dismissed,
        report.pr_results.len()
    );

    if args.fail_on_changes_requested && totals.changes_requested > 0 {
        error!(
            "Exiting with error: {} reviewers requested changes",
            totals.changes_requested
        );
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(args: &ReportArgs) -> anyhow::Result<Config> {
    if args.config.exists() {
        info!("Loading config from {:?}", args.config);
        Ok(Config::load(&args.config)?)
    } else {
        debug!("Config {:?} not found, using defaults", args.config);
        Ok(Config::default())
    }
}

fn print_plan(config: &Config, options: &EnrichOptions, pulls: &[PullRequest]) {
    println!("\n=== Enrichment Plan ===\n");
    println!("Repository: {}", config.repo.as_deref().unwrap_or("-"));
    println!("Concurrency: {}", config.concurrency);
    println!("Report dir: {:?}", config.report_dir);

    println!("\nPull requests to enrich:");
    for pr in pulls {
        if let Some(ref filter) = options.pr_filter {
            if !filter.contains(&pr.number) {
                continue;
            }
        }
        let draft = if pr.draft { " [draft]" } else { "" };
        println!("  - #{} {}{}", pr.number, pr.title, draft);
    }
    println!();
}
