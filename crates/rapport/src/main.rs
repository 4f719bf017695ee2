mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // stdout carries JSON; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { file, catalog } => {
            commands::chat::run(file.as_deref(), catalog.as_deref())
        }
        Commands::Route {
            category,
            capabilities,
            max_cost,
            min_context,
            catalog,
        } => commands::route::run(
            &category,
            capabilities,
            max_cost,
            min_context,
            catalog.as_deref(),
        ),
        Commands::Models { catalog, save } => commands::models::run(catalog.as_deref(), save),
        Commands::Report { top, baseline_cost } => commands::report::run(top, baseline_cost),
        Commands::Version => commands::version::run(),
    }
}
