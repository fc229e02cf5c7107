use crate::config::{DownloadOptions, IncludeFlags, SortMode};
use crate::flatten::flatten;
use crate::model::OutputRow;
use crate::progress::ProgressScope;
use crate::source::SubmissionSource;
use crate::tsv::TsvWriter;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub communities: usize,
    pub submissions: usize, // unique submissions flattened
    pub duplicates: usize,  // skipped because already seen this run
    pub rows: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Downloader {
    pub(crate) opts: DownloadOptions,
}

impl Downloader {
    pub fn new() -> Self {
        Self { opts: DownloadOptions::default() }
    }

    pub fn from_options(opts: DownloadOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn limit(mut self, n: usize) -> Self { self.opts = self.opts.with_limit(n); self }
    pub fn sorting(mut self, sort: SortMode) -> Self { self.opts = self.opts.with_sorting(sort); self }
    pub fn include(mut self, flags: IncludeFlags) -> Self { self.opts = self.opts.with_include(flags); self }
    pub fn include_comments(mut self, yes: bool) -> Self { self.opts.include.comments = yes; self }
    pub fn include_post(mut self, yes: bool) -> Self { self.opts.include.post = yes; self }
    pub fn include_subreddit(mut self, yes: bool) -> Self { self.opts.include.subreddit = yes; self }
    pub fn include_username(mut self, yes: bool) -> Self { self.opts.include.username = yes; self }
    pub fn include_all(self) -> Self { self.include(IncludeFlags::all()) }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_write_buffer(bytes); self }

    // -------- Operations --------

    /// Walk every community in order and hand each flattened row to `f`.
    ///
    /// A submission id seen earlier in the run (cross-posts, overlapping
    /// listings) is skipped, whether or not comments are enabled. Comments are
    /// only fetched when the comment column is on.
    pub fn for_each_row<S, F>(&self, source: &mut S, communities: &[String], mut f: F) -> Result<RunSummary>
    where
        S: SubmissionSource + ?Sized,
        F: FnMut(&OutputRow) -> Result<()>,
    {
        init_tracing_once();
        let flags = self.opts.include;
        let sort = self.opts.sorting;
        let limit = self.opts.limit;
        let label = self.opts.progress_label.as_deref().unwrap_or("Subreddit");

        tracing::info!(communities = communities.len(), %sort, limit, "starting download");

        let mut seen: ahash::AHashSet<String> = ahash::AHashSet::new();
        let mut summary = RunSummary::default();

        for community in communities {
            let pb = ProgressScope::count(self.opts.progress, format!("{label}: {community}"), limit as u64);

            let submissions = source
                .submissions(community, sort, limit)
                .with_context(|| format!("fetching r/{community}"))?;
            pb.set_total(submissions.len() as u64);
            if submissions.is_empty() {
                tracing::warn!(community = %community, "no submissions returned");
            }

            let rows_before = summary.rows;
            for submission in &submissions {
                if !seen.insert(submission.id.clone()) {
                    tracing::debug!(id = %submission.id, community = %community, "skipping duplicate submission");
                    summary.duplicates += 1;
                    pb.inc_items(1);
                    continue;
                }
                summary.submissions += 1;

                let comments = if flags.comments {
                    let list = source
                        .comments(submission)
                        .with_context(|| format!("fetching comments of {}", submission.id))?;
                    Some(list)
                } else {
                    None
                };

                for row in flatten(submission, comments.as_deref(), flags) {
                    f(&row)?;
                    summary.rows += 1;
                }
                pb.inc_items(1);
            }

            summary.communities += 1;
            pb.finish(format!("{label}: {community} done"));
            tracing::info!(
                community = %community,
                submissions = submissions.len(),
                rows = summary.rows - rows_before,
                "finished subreddit"
            );
        }

        tracing::info!(
            submissions = summary.submissions,
            duplicates = summary.duplicates,
            rows = summary.rows,
            "download complete"
        );
        Ok(summary)
    }

    /// Collect all rows in memory.
    pub fn collect_rows<S>(&self, source: &mut S, communities: &[String]) -> Result<Vec<OutputRow>>
    where
        S: SubmissionSource + ?Sized,
    {
        let mut rows = Vec::new();
        self.for_each_row(source, communities, |row| {
            rows.push(row.clone());
            Ok(())
        })?;
        Ok(rows)
    }

    /// Stream rows into a TSV file at `out_path`.
    ///
    /// Rows go to `<out_path>.inprogress` first; the final file only appears
    /// once the whole run succeeded.
    pub fn download_to<S>(&self, source: &mut S, communities: &[String], out_path: &Path) -> Result<RunSummary>
    where
        S: SubmissionSource + ?Sized,
    {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
            }
        }

        let mut tmp = out_path.as_os_str().to_owned();
        tmp.push(".inprogress");
        let tmp = std::path::PathBuf::from(tmp);

        let columns = self.opts.include.enabled_fields();
        let mut w = TsvWriter::create(&tmp, columns, self.opts.write_buffer_bytes)?;

        let res = self.for_each_row(source, communities, |row| w.write_row(row));

        match res {
            Ok(summary) => {
                w.finish_atomic(out_path)?;
                tracing::info!(path = %out_path.display(), rows = summary.rows, "wrote output");
                Ok(summary)
            }
            Err(e) => {
                drop(w);
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        }
    }
}
