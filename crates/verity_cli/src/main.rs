// verity CLI entry point
use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use verity_cli::{Cli, Commands, explain, load_config, run_check};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input, config } => {
            let config = load_config(config.as_deref())?;
            init_tracing(cli.log_level.as_deref().unwrap_or(&config.logging.level));

            let (report, rendered) = run_check(&input, &config)?;
            print!("{rendered}");
            if report.has_errors() {
                bail!("verification of '{}' failed", input.display());
            }
        }
        Commands::Explain { code } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
            print!("{}", explain(&code)?);
        }
    }

    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
