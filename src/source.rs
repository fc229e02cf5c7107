use crate::config::SortMode;
use crate::model::{Comment, Submission};
use anyhow::Result;

/// Where submissions and their comments come from.
///
/// The pipeline only needs these two calls; `RedditClient` talks to the API,
/// tests plug in an in-memory implementation.
pub trait SubmissionSource {
    /// Up to `limit` submissions of `community`, in listing order.
    fn submissions(&mut self, community: &str, sort: SortMode, limit: usize) -> Result<Vec<Submission>>;

    /// Every comment of `submission`, with "load more" placeholders resolved.
    fn comments(&mut self, submission: &Submission) -> Result<Vec<Comment>>;
}
