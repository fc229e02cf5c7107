//! Minimal Reddit API client: app-only OAuth, listing pagination and
//! comment-tree expansion ("load more" placeholders included).

use crate::config::{Credentials, SortMode};
use crate::model::{Comment, Submission, DELETED_AUTHOR};
use crate::source::SubmissionSource;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Listing pages and morechildren batches are capped at 100 by the API.
const MAX_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    subreddit: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    link_id: String,
    #[serde(default)]
    parent_id: String,
    // "" when there are no replies, otherwise a Listing
    #[serde(default)]
    replies: Value,
}

/// A "load more comments" placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub children: Vec<String>,
}

impl MoreData {
    /// "Continue this thread" links carry no child ids.
    pub fn is_continue_thread(&self) -> bool {
        self.children.is_empty()
    }
}

/// The API reports deleted accounts as the literal `[deleted]`.
fn live_author(author: Option<String>) -> Option<String> {
    author.filter(|a| !a.is_empty() && a != DELETED_AUTHOR)
}

fn kind_of(thing: &Value) -> Option<&str> {
    thing.get("kind").and_then(|k| k.as_str())
}

/// Split a Listing into its children and the `after` cursor.
pub fn parse_listing(v: &Value) -> Result<(Vec<Value>, Option<String>)> {
    if kind_of(v) != Some("Listing") {
        bail!("expected a Listing, got kind {:?}", kind_of(v));
    }
    let data = v.get("data").ok_or_else(|| anyhow!("Listing without data"))?;
    let children = data
        .get("children")
        .and_then(|c| c.as_array())
        .cloned()
        .unwrap_or_default();
    let after = data
        .get("after")
        .and_then(|a| a.as_str())
        .filter(|a| !a.is_empty())
        .map(|a| a.to_string());
    Ok((children, after))
}

/// Decode a `t3` thing into a `Submission`. Other kinds yield `None`.
pub fn parse_submission(thing: &Value) -> Result<Option<Submission>> {
    if kind_of(thing) != Some("t3") {
        return Ok(None);
    }
    let data = thing.get("data").cloned().unwrap_or(Value::Null);
    let d: LinkData = serde_json::from_value(data).context("decode submission")?;
    Ok(Some(Submission {
        id: d.id,
        title: d.title,
        selftext: d.selftext,
        author: live_author(d.author),
        subreddit: d.subreddit,
    }))
}

/// Children of a comment's `replies` field (empty when it is `""`).
fn reply_things(replies: &Value) -> Vec<Value> {
    if replies.is_object() {
        parse_listing(replies).map(|(c, _)| c).unwrap_or_default()
    } else {
        Vec::new()
    }
}

/// Comment tree assembled from the initial listing and every expansion.
#[derive(Default)]
struct Forest {
    comments: Vec<Comment>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    index: ahash::AHashMap<String, usize>,
    pending: VecDeque<MoreData>,
}

impl Forest {
    /// Attach a thing under its parent comment (or at the top level) and
    /// recurse into its inline replies. `more` placeholders are queued.
    fn insert(&mut self, thing: &Value) -> Result<()> {
        match kind_of(thing) {
            Some("t1") => {
                let data = thing.get("data").cloned().unwrap_or(Value::Null);
                let d: CommentData = serde_json::from_value(data).context("decode comment")?;
                if self.index.contains_key(&d.id) {
                    return Ok(());
                }
                let slot = self.comments.len();
                let parent = d.parent_id.strip_prefix("t1_").and_then(|p| self.index.get(p)).copied();
                match parent {
                    Some(p) => self.children[p].push(slot),
                    None => self.roots.push(slot),
                }
                self.index.insert(d.id.clone(), slot);
                self.children.push(Vec::new());
                self.comments.push(Comment {
                    id: d.id,
                    body: d.body,
                    author: live_author(d.author),
                    link_id: d.link_id,
                    parent_id: d.parent_id,
                });
                for reply in reply_things(&d.replies) {
                    self.insert(&reply)?;
                }
            }
            Some("more") => {
                let data = thing.get("data").cloned().unwrap_or(Value::Null);
                let more: MoreData = serde_json::from_value(data).context("decode more placeholder")?;
                if more.is_continue_thread() && more.count == 0 && more.parent_id.is_empty() {
                    return Ok(());
                }
                self.pending.push_back(more);
            }
            other => {
                tracing::debug!(kind = ?other, "ignoring unexpected thing in comment forest");
            }
        }
        Ok(())
    }

    fn into_breadth_first(self) -> Vec<Comment> {
        let mut order = Vec::with_capacity(self.comments.len());
        let mut queue: VecDeque<usize> = self.roots.into();
        while let Some(i) = queue.pop_front() {
            order.push(i);
            queue.extend(self.children[i].iter().copied());
        }
        let mut slots: Vec<Option<Comment>> = self.comments.into_iter().map(Some).collect();
        order.into_iter().filter_map(|i| slots[i].take()).collect()
    }
}

/// Resolve every `more` placeholder, then walk the tree breadth-first.
///
/// Each placeholder is handed to `expand`; the things it returns are attached
/// under their `parent_id`, so a top-level placeholder yields top-level
/// comments that come before any second-level reply. Comments already in the
/// tree are skipped if a later expansion repeats them.
pub fn walk_comment_forest<F>(roots: Vec<Value>, mut expand: F) -> Result<Vec<Comment>>
where
    F: FnMut(&MoreData) -> Result<Vec<Value>>,
{
    let mut forest = Forest::default();
    for thing in &roots {
        forest.insert(thing)?;
    }
    while let Some(more) = forest.pending.pop_front() {
        let fetched = expand(&more)?;
        tracing::debug!(id = %more.id, fetched = fetched.len(), "expanded more placeholder");
        for thing in &fetched {
            forest.insert(thing)?;
        }
    }
    Ok(forest.into_breadth_first())
}

/// Page through a listing until `limit` submissions are collected, the
/// listing runs dry, or the `after` cursor ends.
///
/// `fetch` receives the query for one page (`limit`, `raw_json`, `t=all` for
/// top, `after` once known) and returns the Listing.
pub fn paginate<F>(sort: SortMode, limit: usize, mut fetch: F) -> Result<Vec<Submission>>
where
    F: FnMut(&[(&str, String)]) -> Result<Value>,
{
    let mut out = Vec::with_capacity(limit.min(MAX_PAGE));
    let mut after: Option<String> = None;

    while out.len() < limit {
        let page = (limit - out.len()).min(MAX_PAGE);
        let mut query = vec![("limit", page.to_string()), ("raw_json", "1".to_string())];
        if sort == SortMode::Top {
            query.push(("t", "all".to_string()));
        }
        if let Some(a) = &after {
            query.push(("after", a.clone()));
        }

        let v = fetch(&query)?;
        let (children, next) = parse_listing(&v)?;
        tracing::debug!(page = children.len(), after = ?next, "fetched listing page");
        if children.is_empty() {
            break;
        }
        for child in &children {
            if out.len() >= limit {
                break;
            }
            if let Some(s) = parse_submission(child)? {
                out.push(s);
            }
        }
        match next {
            Some(a) => after = Some(a),
            None => break,
        }
    }
    Ok(out)
}

/// Replies of the comment a "continue this thread" request was re-rooted at.
///
/// The response is `[link listing, comment listing]`; the comment listing
/// holds the parent comment, whose replies are the continuation.
pub fn continue_thread_replies(v: &Value) -> Result<Vec<Value>> {
    let listing = v.get(1).ok_or_else(|| anyhow!("comments response without comment listing"))?;
    let (roots, _) = parse_listing(listing)?;
    Ok(roots
        .iter()
        .filter(|t| kind_of(t) == Some("t1"))
        .filter_map(|t| t.get("data").and_then(|d| d.get("replies")))
        .flat_map(reply_things)
        .collect())
}

/// Blocking Reddit client authenticated with the client-credentials grant.
/// The access token is requested on the first API call.
pub struct RedditClient {
    http: reqwest::blocking::Client,
    client_id: String,
    client_secret: String,
    token: Option<String>,
}

impl RedditClient {
    pub fn new(creds: &Credentials) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(creds.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.clone(),
            token: None,
        })
    }

    fn token(&mut self) -> Result<String> {
        if let Some(t) = &self.token {
            return Ok(t.clone());
        }
        let resp = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .context("Failed to request access token")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("Reddit auth error {}: {}", status, excerpt(&body));
        }
        let token: TokenResponse = resp.json().context("Failed to parse token response")?;
        tracing::info!(expires_in = token.expires_in, "authenticated with Reddit");
        self.token = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    fn get_json(&mut self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let token = self.token()?;
        let url = format!("{API_BASE}{path}");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("Reddit API error {} for {}: {}", status, url, excerpt(&body));
        }
        resp.json().with_context(|| format!("parse JSON from {url}"))
    }

    fn expand_more(&mut self, submission_id: &str, more: &MoreData) -> Result<Vec<Value>> {
        if more.is_continue_thread() {
            let parent = more.parent_id.strip_prefix("t1_").unwrap_or(&more.parent_id);
            let v = self.get_json(
                &format!("/comments/{submission_id}"),
                &[("comment", parent.to_string()), ("raw_json", "1".into())],
            )?;
            return continue_thread_replies(&v);
        }

        let mut things = Vec::new();
        for batch in more.children.chunks(MAX_PAGE) {
            let v = self.get_json(
                "/api/morechildren",
                &[
                    ("link_id", format!("t3_{submission_id}")),
                    ("children", batch.join(",")),
                    ("api_type", "json".into()),
                    ("raw_json", "1".into()),
                ],
            )?;
            let batch_things = v
                .pointer("/json/data/things")
                .and_then(|t| t.as_array())
                .cloned()
                .unwrap_or_default();
            things.extend(batch_things);
        }
        Ok(things)
    }
}

impl SubmissionSource for RedditClient {
    fn submissions(&mut self, community: &str, sort: SortMode, limit: usize) -> Result<Vec<Submission>> {
        let path = format!("/r/{community}/{sort}");
        paginate(sort, limit, |query| self.get_json(&path, query))
            .with_context(|| format!("listing r/{community}"))
    }

    fn comments(&mut self, submission: &Submission) -> Result<Vec<Comment>> {
        let v = self.get_json(&format!("/comments/{}", submission.id), &[("raw_json", "1".into())])?;
        let listing = v.get(1).ok_or_else(|| anyhow!("comments response without comment listing"))?;
        let (roots, _) = parse_listing(listing)?;
        walk_comment_forest(roots, |more| self.expand_more(&submission.id, more))
            .with_context(|| format!("comments of {}", submission.id))
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((i, _)) => &body[..i],
        None => body,
    }
}
