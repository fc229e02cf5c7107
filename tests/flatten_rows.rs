#[path = "common/mod.rs"]
mod common;

use common::*;
use subdl::{normalize_text, Downloader, IncludeFlags, SortMode, DELETED_AUTHOR};

/// Cross-posts are flattened once:
/// - x1 shows up in both r/rust and r/programming
/// - with comments on, its single comment (c3) must appear exactly once
#[test]
fn cross_posted_submission_contributes_rows_once() {
    let mut world = make_world_basic();
    let dl = Downloader::new().include_all().progress(false);

    let rows = dl.collect_rows(&mut world, &communities(&["rust", "programming"])).unwrap();

    let c3_rows = rows.iter().filter(|r| r.comment.as_deref() == Some("multi\nline reply")).count();
    assert_eq!(c3_rows, 1);
    // s1 → 2, s2 → 0, x1 → 1, p1 → 1
    assert_eq!(rows.len(), 4);

    // the duplicate is not even asked for its comments
    let x1_fetches = world.calls.iter().filter(|c| c.as_str() == "comments x1").count();
    assert_eq!(x1_fetches, 1);
}

/// Dedup also holds without comments: one row per unique submission.
#[test]
fn dedup_applies_without_comments() {
    let mut world = make_world_basic();
    let dl = Downloader::new().include_post(true).include_username(true).progress(false);

    let mut seen = Vec::new();
    let summary = dl
        .for_each_row(&mut world, &communities(&["rust", "programming"]), |row| {
            seen.push(row.username.clone().unwrap());
            Ok(())
        })
        .unwrap();

    assert_eq!(seen, vec!["bob", DELETED_AUTHOR, "carol", "dave"]);
    assert_eq!(summary.submissions, 4);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.communities, 2);
    assert!(world.calls.iter().all(|c| !c.starts_with("comments")), "comments must not be fetched: {:?}", world.calls);
}

/// Every comment row carries the submission's normalized title + body.
#[test]
fn comment_rows_carry_normalized_post_text() {
    let mut world = make_world_basic();
    let dl = Downloader::new().include_comments(true).include_post(true).progress(false);

    let rows = dl.collect_rows(&mut world, &communities(&["rust"])).unwrap();
    let expected_s1 = format!(
        "{} {}",
        normalize_text("Rust news\r\nweekly"),
        normalize_text("First line\n\nSecond line")
    );
    assert_eq!(expected_s1, "Rust news weekly First line Second line");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].post.as_deref(), Some(expected_s1.as_str()));
    assert_eq!(rows[1].post.as_deref(), Some(expected_s1.as_str()));
    assert_eq!(rows[2].post.as_deref(), Some("Cross posted "));
    // username column is off
    assert!(rows.iter().all(|r| r.username.is_none() && r.subreddit.is_none()));
}

/// Deleted authors resolve to the sentinel, for submissions and comments alike.
#[test]
fn deleted_authors_become_sentinel() {
    let mut world = make_world_basic();

    let post_rows = Downloader::new()
        .include_username(true)
        .progress(false)
        .collect_rows(&mut world, &communities(&["rust"]))
        .unwrap();
    assert_eq!(post_rows[1].username.as_deref(), Some("[deleted]"));

    let comment_rows = Downloader::new()
        .include(IncludeFlags { comments: true, username: true, ..Default::default() })
        .progress(false)
        .collect_rows(&mut world, &communities(&["rust"]))
        .unwrap();
    let names: Vec<_> = comment_rows.iter().map(|r| r.username.as_deref().unwrap()).collect();
    assert_eq!(names, vec!["alice", "[deleted]", "erin"]);
}

/// Limit and sort mode are forwarded to the source for every subreddit, in file order.
#[test]
fn limit_and_sorting_reach_the_source() {
    let mut world = make_world_basic();
    let rows = Downloader::new()
        .limit(2)
        .sorting(SortMode::Top)
        .include_subreddit(true)
        .progress(false)
        .collect_rows(&mut world, &communities(&["rust", "programming"]))
        .unwrap();

    assert_eq!(world.calls, vec!["list rust top 2", "list programming top 2"]);
    let subs: Vec<_> = rows.iter().map(|r| r.subreddit.as_deref().unwrap()).collect();
    assert_eq!(subs, vec!["rust", "rust", "rust", "programming"]);
}
