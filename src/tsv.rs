use crate::model::{Field, OutputRow};
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Buffered TSV writer with a fixed column set.
/// The header is written on creation; rows are written in column order and
/// missing values become empty cells. Cells are quoted only when they hold a
/// tab, a quote or a line break.
pub struct TsvWriter {
    path: PathBuf,
    columns: Vec<Field>,
    w: Option<csv::Writer<File>>,
}

impl TsvWriter {
    pub fn create(path: &Path, columns: Vec<Field>, buf_bytes: usize) -> Result<Self> {
        let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
        let w = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .buffer_capacity(buf_bytes.max(8 * 1024))
            .from_writer(f);
        let mut me = Self { path: path.to_path_buf(), columns, w: Some(w) };
        let header: Vec<&str> = me.columns.iter().map(|c| c.name()).collect();
        me.write_cells(&header)?;
        Ok(me)
    }

    fn write_cells(&mut self, cells: &[&str]) -> Result<()> {
        let Some(w) = &mut self.w else { return Ok(()) };
        if cells.is_empty() {
            // csv has no notion of a zero-field record; emit the bare line.
            w.flush()?;
            let mut f: &File = w.get_ref();
            f.write_all(b"\n")?;
            return Ok(());
        }
        w.write_record(cells).with_context(|| format!("write {}", self.path.display()))
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        let cells: Vec<&str> = self.columns.iter().map(|c| row.get(*c).unwrap_or("")).collect();
        self.write_cells(&cells)
    }

    /// Flush and move the temp file to `final_path`.
    pub fn finish_atomic(mut self, final_path: &Path) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        }
        replace_file_atomic_backoff(&self.path, final_path)
    }
}
