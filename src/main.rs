use clap::Parser;

use recuerda::cli::{Cli, Commands};
use recuerda::config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recuerda=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Listen) {
        Commands::Listen => {
            let config = Config::load(cli.config.as_deref())?;
            tracing::info!("Starting listening session");
            recuerda::listen::run_listen(config)
        }
        Commands::Parse { text, ai } => {
            let config = Config::load(cli.config.as_deref())?;
            recuerda::commands::run_parse(&config, &text, ai)
        }
        Commands::List => {
            let config = Config::load(cli.config.as_deref())?;
            recuerda::commands::run_list(&config)
        }
        Commands::InitConfig { force } => recuerda::commands::run_init_config(force),
    }
}
