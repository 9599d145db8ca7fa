use crate::cli::InitArgs;
use crate::config::Config;
use tracing::info;

pub fn execute(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite",
            args.path.display()
        );
    }

    let config = Config {
        repo: args.repo.clone(),
        ..Config::default()
    };

    let yaml = serde_yaml::to_string(&config)?;
    std::fs::write(&args.path, yaml)?;

    info!("Wrote starter config to {}", args.path.display());
    println!("Wrote {}", args.path.display());
    Ok(())
}
