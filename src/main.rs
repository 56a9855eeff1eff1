//! Podforge CLI binary entry point.

use clap::Parser;
use podforge::cli::{commands, CacheCommands, Cli, Commands, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Generate(args) => commands::handle_generate(config, args).await,
        Commands::Voices(args) => commands::handle_voices(config, args),
        Commands::Script(args) => commands::handle_script(args),
        Commands::Cache(cache_args) => match cache_args.command {
            CacheCommands::Clear { cache_dir } => {
                commands::handle_cache_clear(config, cache_dir.as_deref())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.category().exit_code());
    }
}
