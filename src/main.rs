use anyhow::{Context, Result};
use clap::Parser;
use subdl::cli::Cli;
use subdl::{init_tracing_once, read_communities, Downloader, RedditClient};

fn main() -> Result<()> {
    // .env may carry the REDDIT_* credentials picked up by clap below.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing_once();

    let communities = read_communities(&cli.input)?;
    let creds = cli.credentials()?;
    tracing::info!(subreddits = communities.len(), input = %cli.input.display(), "loaded subreddit list");

    let mut client = RedditClient::new(&creds).context("setting up the Reddit client")?;
    let summary = Downloader::from_options(cli.download_options())
        .download_to(&mut client, &communities, &cli.output)?;

    println!(
        "Wrote {} rows ({} submissions, {} duplicates skipped) to {}",
        summary.rows,
        summary.submissions,
        summary.duplicates,
        cli.output.display()
    );
    Ok(())
}
