use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use trendline_core::{KeywordQuery, MergedSeries, OutputSink, TrendsError};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn sink_error(e: impl std::fmt::Display) -> TrendsError {
    TrendsError::Sink(e.to_string())
}

fn write_series<W: io::Write>(
    out: &mut csv::Writer<W>,
    query: &KeywordQuery,
    merged: &MergedSeries,
) -> Result<(), TrendsError> {
    out.write_record(["Date", query.raw_text.as_str()])
        .map_err(sink_error)?;
    for p in merged.series.points() {
        out.write_record([p.date.format(DATE_FORMAT).to_string(), p.value.to_string()])
            .map_err(sink_error)?;
    }
    out.flush().map_err(sink_error)
}

/// Writes each series as CSV to one stream: a `Date,<keyword>` header
/// followed by one `YYYY-MM-DD,value` row per day.
pub struct CsvSink<W: io::Write> {
    out: csv::Writer<W>,
}

impl<W: io::Write> CsvSink<W> {
    /// Write to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            out: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer.
    ///
    /// # Errors
    /// Returns `TrendsError::Sink` if buffered rows cannot be flushed.
    pub fn into_inner(self) -> Result<W, TrendsError> {
        self.out.into_inner().map_err(|e| sink_error(e.error()))
    }
}

impl<W: io::Write> OutputSink for CsvSink<W> {
    fn write(&mut self, query: &KeywordQuery, merged: &MergedSeries) -> Result<(), TrendsError> {
        write_series(&mut self.out, query, merged)
    }
}

/// File name for a keyword's series: the keyword and, when set, the category.
///
/// Characters other than ASCII alphanumerics, `-` and `_` become `_`.
#[must_use]
pub fn csv_file_name(query: &KeywordQuery, category: Option<&str>) -> String {
    let clean = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    match category {
        Some(cat) => format!("{}_{}.csv", clean(&query.raw_text), clean(cat)),
        None => format!("{}.csv", clean(&query.raw_text)),
    }
}

/// Writes each series to its own CSV file inside a directory.
pub struct CsvDirSink {
    dir: PathBuf,
    category: Option<String>,
    written: Vec<PathBuf>,
}

impl CsvDirSink {
    /// Write into `dir`, which must exist.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            category: None,
            written: Vec::new(),
        }
    }

    /// Include the category code in file names.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Files written so far, in order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for CsvDirSink {
    fn write(&mut self, query: &KeywordQuery, merged: &MergedSeries) -> Result<(), TrendsError> {
        let path = self
            .dir
            .join(csv_file_name(query, self.category.as_deref()));
        let file = File::create(&path).map_err(sink_error)?;
        let mut out = csv::Writer::from_writer(file);
        write_series(&mut out, query, merged)?;
        self.written.push(path);
        Ok(())
    }
}
