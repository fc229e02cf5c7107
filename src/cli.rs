//! Command-line surface. Credentials may also come from the environment or a
//! `.env` file loaded before parsing.

use crate::config::{Credentials, DownloadOptions, IncludeFlags, SortMode};
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Download Reddit posts and comments from specified subreddits into a TSV file")]
pub struct Cli {
    /// File containing subreddit names, one per line
    #[arg(long)]
    pub input: PathBuf,

    /// Output TSV file
    #[arg(long)]
    pub output: PathBuf,

    /// Limit of posts to download from each subreddit
    #[arg(long, default_value_t = 100)]
    pub limit: usize,

    /// Sorting option: 'top', 'hot', or 'new'
    #[arg(long, default_value = "new")]
    pub sorting: SortMode,

    /// Include comments in the output (one row per comment)
    #[arg(long)]
    pub include_comments: bool,

    /// Include the title and text of the submission
    #[arg(long)]
    pub include_post: bool,

    /// Include subreddit names in the output
    #[arg(long)]
    pub include_subreddit: bool,

    /// Include the username in the output
    #[arg(long)]
    pub include_username: bool,

    /// Include all fields in the output
    #[arg(long)]
    pub include_all: bool,

    /// Hide per-subreddit progress bars
    #[arg(long)]
    pub no_progress: bool,

    #[arg(long, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, env = "REDDIT_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl Cli {
    /// `--include-all` forces every column on.
    pub fn include_flags(&self) -> IncludeFlags {
        if self.include_all {
            return IncludeFlags::all();
        }
        IncludeFlags {
            comments: self.include_comments,
            post: self.include_post,
            subreddit: self.include_subreddit,
            username: self.include_username,
        }
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions::default()
            .with_limit(self.limit)
            .with_sorting(self.sorting)
            .with_include(self.include_flags())
            .with_progress(!self.no_progress)
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Credentials::resolve(self.client_id.clone(), self.client_secret.clone(), self.user_agent.clone())
    }
}
