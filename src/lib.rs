mod config;
mod error;
mod model;

mod flatten;
mod input;
mod progress;
mod source;
mod tsv;
mod util;

mod api;
mod pipeline;

pub mod cli;

pub use crate::config::{Credentials, DownloadOptions, IncludeFlags, SortMode};
pub use crate::error::ConfigError;
pub use crate::model::{Comment, Field, OutputRow, Submission, DELETED_AUTHOR};
pub use crate::pipeline::{Downloader, RunSummary};

// Record flattening, usable without the run loop.
pub use crate::flatten::{flatten, normalize_text, post_text, resolve_username, Rows};

// Plug in your own source (tests, archives) or use the HTTP client.
pub use crate::source::SubmissionSource;
pub use crate::api::{continue_thread_replies, paginate, parse_listing, parse_submission, walk_comment_forest, MoreData, RedditClient};

pub use crate::input::{normalize_community, read_communities};
pub use crate::tsv::TsvWriter;
pub use crate::util::init_tracing_once;
