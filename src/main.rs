use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod evaluation;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flags
    let filter = if cli.debug {
        EnvFilter::new("align_eval=debug,info")
    } else if cli.verbose {
        EnvFilter::new("align_eval=info")
    } else {
        EnvFilter::new("align_eval=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Validate(args) => {
            cli::validate::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
