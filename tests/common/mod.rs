use anyhow::{bail, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use subdl::{Comment, SortMode, Submission, SubmissionSource};

pub fn submission(id: &str, sub: &str, title: &str, selftext: &str, author: Option<&str>) -> Submission {
    Submission {
        id: id.to_string(),
        title: title.to_string(),
        selftext: selftext.to_string(),
        author: author.map(str::to_string),
        subreddit: sub.to_string(),
    }
}

pub fn comment(id: &str, link: &str, body: &str, author: Option<&str>) -> Comment {
    Comment {
        id: id.to_string(),
        body: body.to_string(),
        author: author.map(str::to_string),
        link_id: format!("t3_{link}"),
        parent_id: format!("t3_{link}"),
    }
}

/// In-memory stand-in for the Reddit API. Records every call it receives.
#[derive(Default)]
pub struct FakeReddit {
    pub listings: HashMap<String, Vec<Submission>>,
    pub comments: HashMap<String, Vec<Comment>>,
    pub calls: Vec<String>,
    pub fail_on: Option<String>,
}

impl SubmissionSource for FakeReddit {
    fn submissions(&mut self, community: &str, sort: SortMode, limit: usize) -> Result<Vec<Submission>> {
        self.calls.push(format!("list {community} {sort} {limit}"));
        if self.fail_on.as_deref() == Some(community) {
            bail!("503 Service Unavailable for r/{community}");
        }
        Ok(self
            .listings
            .get(community)
            .map(|v| v.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn comments(&mut self, submission: &Submission) -> Result<Vec<Comment>> {
        self.calls.push(format!("comments {}", submission.id));
        Ok(self.comments.get(&submission.id).cloned().unwrap_or_default())
    }
}

/// A tiny two-subreddit world:
/// - r/rust: s1 by "bob" (multi-line title/body), s2 by a deleted account, x1 cross-post by "carol"
/// - r/programming: x1 again (same id), p1 by "dave"
/// - comments: s1 → c1 (alice), c2 (deleted); x1 → c3 (erin, multi-line body); p1 → c4 (frank); s2 → none
pub fn make_world_basic() -> FakeReddit {
    let x1 = submission("x1", "rust", "Cross posted", "", Some("carol"));
    let mut w = FakeReddit::default();
    w.listings.insert(
        "rust".into(),
        vec![
            submission("s1", "rust", "Rust news\r\nweekly", "First line\n\nSecond line", Some("bob")),
            submission("s2", "rust", "Orphaned", "body", None),
            x1.clone(),
        ],
    );
    w.listings.insert(
        "programming".into(),
        vec![x1, submission("p1", "programming", "Tabs\tand \"quotes\"", "text", Some("dave"))],
    );
    w.comments.insert(
        "s1".into(),
        vec![comment("c1", "s1", "I love Rust", Some("alice")), comment("c2", "s1", "[removed]", None)],
    );
    w.comments.insert("x1".into(), vec![comment("c3", "x1", "multi\nline reply", Some("erin"))]);
    w.comments.insert("p1".into(), vec![comment("c4", "p1", "nice", Some("frank"))]);
    w
}

pub fn communities(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Read a text file split on `\n`, keeping empty lines (the final terminator is dropped).
pub fn read_raw_lines(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).unwrap();
    let text = text.strip_suffix('\n').unwrap_or(&text);
    text.split('\n').map(str::to_string).collect()
}
