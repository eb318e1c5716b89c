use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gleaner::app::AppContext;
use gleaner::cli::{commands, Cli, Commands};
use gleaner::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Documents go to stdout; logs stay on stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(days) = cli.days {
        config.window_days = days;
    }
    if let Some(workers) = cli.workers {
        config.max_concurrency = workers;
    }
    if cli.no_cache {
        config.cache_dir.clear();
    }

    let ctx = AppContext::new(config)?;

    let documents = match cli.command {
        Commands::Site { preset } => commands::collect_preset(&ctx, preset).await?,
        Commands::Feed { url, name } => commands::collect_feed(&ctx, &url, name).await?,
        Commands::Sitemap { url, segment, name } => {
            commands::collect_sitemap(&ctx, &url, &segment, name).await?
        }
        Commands::Api {
            ids_url,
            item_url,
            kind,
            name,
        } => commands::collect_api(&ctx, &ids_url, &item_url, &kind, name).await?,
        Commands::Page { urls } => commands::collect_pages(&ctx, &urls).await?,
    };

    commands::print_documents(&documents);
    Ok(())
}
