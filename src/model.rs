//! Records pulled from the API and the flat rows written out.

use std::fmt;

/// Author name used when the account is gone.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A top-level post in a subreddit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub author: Option<String>,
    pub subreddit: String,
}

/// A reply belonging to exactly one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: Option<String>,
    pub link_id: String,   // t3_<submission id>
    pub parent_id: String, // t3_ for top level, t1_ for replies
}

/// Output columns, declared in header order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Comment,
    Post,
    Subreddit,
    Username,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Comment, Field::Post, Field::Subreddit, Field::Username];

    pub fn name(self) -> &'static str {
        match self {
            Field::Comment => "Comment",
            Field::Post => "Post",
            Field::Subreddit => "Subreddit",
            Field::Username => "Username",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One flattened row. Unset fields are not part of the row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub comment: Option<String>,
    pub post: Option<String>,
    pub subreddit: Option<String>,
    pub username: Option<String>,
}

impl OutputRow {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Comment => self.comment.as_deref(),
            Field::Post => self.post.as_deref(),
            Field::Subreddit => self.subreddit.as_deref(),
            Field::Username => self.username.as_deref(),
        }
    }

    /// Present fields in header order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}
