//! Stateful VCF parsing over a line source
//!
//! [`VcfParser`] is the pull-based front end: it owns the reader, a 1-based
//! line cursor, and a one-line pushback slot so the metadata pass can stop
//! at the first data line *without consuming it*. One parser instance is
//! scoped to exactly one input stream; writers, by contrast, are pure
//! functions and carry no state at all.
//!
//! Errors are fail-fast: the first malformed line aborts the parse with its
//! line number attached. There is no best-effort mode here; a lenient
//! wrapper, if wanted, belongs to the caller.

use crate::core::{MetadataError, MetadataResult, Result};
use crate::formats::vcf::metadata::MetadataLine;
use crate::formats::vcf::position::{parse_data_line, VcfPosition};
use std::io::BufRead;

/// An ordered collection of parsed header lines plus derived facts
#[derive(Debug, Clone, PartialEq)]
pub struct VcfMetadataCollection {
    lines: Vec<MetadataLine>,
    version: String,
    sample_names: Vec<String>,
    header_line: Option<String>,
    // Index into `lines` where the column header was consumed; normally
    // equal to lines.len() since #CHROM comes last
    header_index: Option<usize>,
    lines_processed: usize,
}

impl VcfMetadataCollection {
    /// The `##` metadata lines in file order
    ///
    /// The `#CHROM` column header is counted in [`lines_processed`] but is
    /// not a metadata line and does not appear here.
    ///
    /// [`lines_processed`]: VcfMetadataCollection::lines_processed
    pub fn lines(&self) -> &[MetadataLine] {
        &self.lines
    }

    /// The file format version from the mandatory first line (`"4.2"`)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sample names from the column header, in file order
    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Number of header lines consumed, including the column header
    pub fn lines_processed(&self) -> usize {
        self.lines_processed
    }

    /// The `#CHROM` column header line, verbatim, if one was present
    pub fn header_line(&self) -> Option<&str> {
        self.header_line.as_deref()
    }

    /// Rewrite the full header as text lines (no trailing newlines)
    ///
    /// The structural inverse of the metadata pass: every `##` line is
    /// re-rendered from its model and the column header is re-emitted
    /// verbatim, so the output matches the consumed input line for line.
    pub fn to_vcf_lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        for (i, line) in self.lines.iter().enumerate() {
            if self.header_index == Some(i) {
                out.push(self.header_line.clone().unwrap_or_default());
            }
            out.push(line.to_vcf_string());
        }
        if self.header_index == Some(self.lines.len()) {
            out.push(self.header_line.clone().unwrap_or_default());
        }
        out
    }
}

/// Pull-based parser over one VCF input stream
///
/// Tracks a 1-based line cursor for diagnostics. Not meant to be shared
/// across concurrent consumers; memory use is bounded by a single record.
pub struct VcfParser<R: BufRead> {
    reader: R,
    line_number: usize,
    pending: Option<String>,
}

impl<R: BufRead> VcfParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: None,
        }
    }

    /// 1-based number of the most recently returned line
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Pop the pushback slot or read one line, stripping the terminator
    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            // Cursor already points at this line; do not count it twice
            return Ok(Some(line));
        }

        let mut buf = String::new();
        let bytes_read = self.reader.read_line(&mut buf)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    fn push_back(&mut self, line: String) {
        self.pending = Some(line);
    }

    /// Consume header lines into a [`VcfMetadataCollection`]
    ///
    /// Reads while lines start with `#`; the first line must be the
    /// `##fileformat` version line; the single-`#` `#CHROM` line yields the
    /// sample names. Stops at the first non-header line, leaving it for
    /// [`next_position`].
    ///
    /// [`next_position`]: VcfParser::next_position
    pub fn parse_metadata(&mut self) -> Result<VcfMetadataCollection> {
        let mut lines = Vec::new();
        let mut version: Option<String> = None;
        let mut sample_names = Vec::new();
        let mut header_line: Option<String> = None;
        let mut header_index: Option<usize> = None;
        let mut processed = 0usize;

        while let Some(line) = self.next_line()? {
            if !line.starts_with('#') {
                self.push_back(line);
                break;
            }
            processed += 1;

            if line.starts_with("##") {
                let parsed = MetadataLine::parse(&line, self.line_number)?;
                if processed == 1 {
                    match &parsed {
                        MetadataLine::FileFormat(v) => version = Some(v.clone()),
                        _ => {
                            return Err(MetadataError::VersionMissingOrUnsupported {
                                line_number: self.line_number,
                                content: line.chars().take(100).collect(),
                            }
                            .into())
                        }
                    }
                }
                lines.push(parsed);
            } else if line.starts_with("#CHROM") {
                sample_names = parse_column_header(&line, self.line_number)?;
                header_index = Some(lines.len());
                header_line = Some(line);
            } else {
                return Err(MetadataError::malformed(
                    "unexpected single-'#' header line",
                    self.line_number,
                    &line,
                )
                .into());
            }
        }

        let version = version.ok_or(MetadataError::VersionMissingOrUnsupported {
            line_number: 1,
            content: String::new(),
        })?;

        log::debug!(
            "parsed VCF header: version {}, {} metadata lines, {} samples",
            version,
            lines.len(),
            sample_names.len()
        );

        Ok(VcfMetadataCollection {
            lines,
            version,
            sample_names,
            header_line,
            header_index,
            lines_processed: processed,
        })
    }

    /// Parse the next data line into a position
    ///
    /// Returns `None` at end of input. Empty lines are skipped.
    pub fn next_position(&mut self, sample_names: &[String]) -> Option<Result<VcfPosition>> {
        loop {
            match self.next_line() {
                Err(e) => return Some(Err(e)),
                Ok(None) => return None,
                Ok(Some(line)) => {
                    if line.is_empty() {
                        continue;
                    }
                    return Some(
                        parse_data_line(&line, sample_names, self.line_number)
                            .map_err(Into::into),
                    );
                }
            }
        }
    }
}

/// Split the `#CHROM` column header into sample names
///
/// The fixed first 8 (or 9, with FORMAT) columns are discarded; the rest
/// are sample names in file order.
fn parse_column_header(line: &str, line_number: usize) -> MetadataResult<Vec<String>> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 8 {
        return Err(MetadataError::malformed(
            format!("column header has {} columns, expected at least 8", columns.len()),
            line_number,
            line,
        ));
    }
    Ok(columns
        .get(9..)
        .unwrap_or(&[])
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Parse a whole VCF stream from a reader
///
/// Convenience over [`VcfParser`] for callers that want everything at once.
pub fn parse_vcf_reader<R: BufRead>(
    reader: R,
) -> Result<(VcfMetadataCollection, Vec<VcfPosition>)> {
    let mut parser = VcfParser::new(reader);
    let metadata = parser.parse_metadata()?;
    let sample_names = metadata.sample_names().to_vec();

    let mut positions = Vec::new();
    while let Some(position) = parser.next_position(&sample_names) {
        positions.push(position?);
    }

    Ok((metadata, positions))
}

/// Parse a whole VCF document from in-memory text (mainly for tests)
pub fn parse_vcf_str(text: &str) -> Result<(VcfMetadataCollection, Vec<VcfPosition>)> {
    parse_vcf_reader(std::io::Cursor::new(text.as_bytes()))
}
