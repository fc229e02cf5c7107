use crate::error::ConfigError;
use crate::model::Field;
use std::fmt;
use std::str::FromStr;

/// Listing order requested from each subreddit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    Top,
    Hot,
    #[default]
    New,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Top, SortMode::Hot, SortMode::New];

    /// Path segment used by the listing endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Top => "top",
            SortMode::Hot => "hot",
            SortMode::New => "new",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidSortMode { value: s.to_string() })
    }
}

/// Which columns end up in the output. Applies to every row of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncludeFlags {
    pub comments: bool,
    pub post: bool,
    pub subreddit: bool,
    pub username: bool,
}

impl IncludeFlags {
    pub fn all() -> Self {
        Self { comments: true, post: true, subreddit: true, username: true }
    }

    pub fn includes(&self, field: Field) -> bool {
        match field {
            Field::Comment => self.comments,
            Field::Post => self.post,
            Field::Subreddit => self.subreddit,
            Field::Username => self.username,
        }
    }

    /// Enabled fields in header order.
    pub fn enabled_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.includes(*f)).collect()
    }
}

/// Run options with defaults matching the command line.
#[derive(Clone, Debug)]
pub struct DownloadOptions {
    pub limit: usize,                   // max submissions per subreddit
    pub sorting: SortMode,
    pub include: IncludeFlags,
    pub progress: bool,                 // show one bar per subreddit
    pub progress_label: Option<String>, // overrides the "Subreddit" prefix
    pub write_buffer_bytes: usize,      // BufWriter capacity for the TSV sink
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            sorting: SortMode::New,
            include: IncludeFlags::default(),
            progress: true,
            progress_label: None,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl DownloadOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
    pub fn with_sorting(mut self, sorting: SortMode) -> Self {
        self.sorting = sorting;
        self
    }
    pub fn with_include(mut self, include: IncludeFlags) -> Self {
        self.include = include;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}

/// App-only OAuth credentials. Values are opaque to this crate.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Credentials {
    /// Build from optional sources, rejecting missing or blank values.
    pub fn resolve(
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: Option<String>,
    ) -> Result<Self, ConfigError> {
        fn required(v: Option<String>, name: &'static str) -> Result<String, ConfigError> {
            match v.map(|s| s.trim().to_string()) {
                Some(s) if !s.is_empty() => Ok(s),
                _ => Err(ConfigError::MissingCredential(name)),
            }
        }
        Ok(Self {
            client_id: required(client_id, "REDDIT_CLIENT_ID")?,
            client_secret: required(client_secret, "REDDIT_CLIENT_SECRET")?,
            user_agent: required(user_agent, "REDDIT_USER_AGENT")?,
        })
    }
}
