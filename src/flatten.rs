//! Turn a submission (and optionally its comments) into flat output rows.
//!
//! Rows are produced lazily per submission; the caller decides where they go.

use crate::config::IncludeFlags;
use crate::model::{Comment, OutputRow, Submission, DELETED_AUTHOR};
use regex::Regex;
use std::sync::OnceLock;

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+").expect("static regex"))
}

/// Collapse every run of `\r`/`\n` into a single space.
pub fn normalize_text(s: &str) -> String {
    line_breaks().replace_all(s, " ").into_owned()
}

/// Author display name, or `[deleted]` when the account is gone.
pub fn resolve_username(author: Option<&str>) -> String {
    author.unwrap_or(DELETED_AUTHOR).to_string()
}

/// `Post` column value: title and body joined by one space.
pub fn post_text(submission: &Submission) -> String {
    let mut s = normalize_text(&submission.title);
    s.push(' ');
    s.push_str(&normalize_text(&submission.selftext));
    s
}

/// Rows for one submission.
///
/// With comments enabled and a comment stream supplied, yields one row per
/// comment; otherwise yields a single row for the submission itself.
pub fn flatten<'a>(
    submission: &'a Submission,
    comments: Option<&'a [Comment]>,
    flags: IncludeFlags,
) -> Rows<'a> {
    let source = match comments {
        Some(list) if flags.comments => Source::Comments(list.iter()),
        _ => Source::Submission { done: false },
    };
    Rows {
        submission,
        flags,
        post: flags.post.then(|| post_text(submission)),
        source,
    }
}

pub struct Rows<'a> {
    submission: &'a Submission,
    flags: IncludeFlags,
    post: Option<String>,
    source: Source<'a>,
}

enum Source<'a> {
    Comments(std::slice::Iter<'a, Comment>),
    Submission { done: bool },
}

impl Rows<'_> {
    fn row(&self, comment_body: Option<&str>, author: Option<&str>) -> OutputRow {
        OutputRow {
            comment: self.flags.comments.then(|| comment_body.unwrap_or_default().to_string()),
            post: self.post.clone(),
            subreddit: self.flags.subreddit.then(|| self.submission.subreddit.clone()),
            username: self.flags.username.then(|| resolve_username(author)),
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = OutputRow;

    fn next(&mut self) -> Option<OutputRow> {
        match &mut self.source {
            Source::Comments(it) => {
                let c = it.next()?;
                Some(self.row(Some(&c.body), c.author.as_deref()))
            }
            Source::Submission { done } => {
                if *done {
                    return None;
                }
                *done = true;
                Some(self.row(None, self.submission.author.as_deref()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Source::Comments(it) => it.size_hint(),
            Source::Submission { done } => {
                let n = usize::from(!*done);
                (n, Some(n))
            }
        }
    }
}
