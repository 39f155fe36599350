//! Error types for VcfCodec
//!
//! Defines all error types used throughout the library.
//!
//! Parse-time errors are fail-fast and carry the 1-based line number of the
//! offending line wherever the failing layer knows it. Errors raised below
//! the line level (allele tokens, FORMAT values) omit the line number; the
//! data-line parser attaches it when it wraps them.

use thiserror::Error;

/// Main error type for VcfCodec operations
#[derive(Debug, Error)]
pub enum VcfError {
    /// Metadata (header) parsing errors
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Data line parsing errors
    #[error("Data line error: {0}")]
    Data(#[from] DataError),

    /// Typed FORMAT value decoding errors
    #[error("Format value error: {0}")]
    FormatValue(#[from] FormatValueError),

    /// I/O errors from the underlying line source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing `##` metadata lines and the
/// `#CHROM` column header
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// The mandatory first line is not `##fileformat=VCFv<version>`
    #[error("Line {line_number}: expected '##fileformat=VCFv<version>' as the first line, got '{content}'")]
    VersionMissingOrUnsupported { line_number: usize, content: String },

    /// Unparsable metadata line (unbalanced quoting, missing brackets, ...)
    #[error("Line {line_number}: malformed metadata line: {message}")]
    MalformedMetadataLine {
        line_number: usize,
        message: String,
        content: String,
    },

    /// A structured metadata line is missing a mandated sub-tag
    #[error("Line {line_number}: {kind} metadata line is missing required tag '{tag}'")]
    MissingRequiredTag {
        kind: &'static str,
        tag: &'static str,
        line_number: usize,
    },
}

impl MetadataError {
    /// Create a malformed-line error, truncating the content sample
    pub fn malformed(message: impl Into<String>, line_number: usize, content: &str) -> Self {
        Self::MalformedMetadataLine {
            line_number,
            message: message.into(),
            content: content.chars().take(100).collect(),
        }
    }
}

/// Errors that can occur while parsing or dereferencing data lines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// Data line field count inconsistent with the header
    #[error("Line {line_number}: expected {expected} tab-separated columns, found {found}")]
    ColumnCountMismatch {
        expected: usize,
        found: usize,
        line_number: usize,
    },

    /// A sample column has more colon-fields than FORMAT declares
    #[error("Line {line_number}: sample column {sample} has {found} fields but FORMAT declares {declared}")]
    SampleCountMismatch {
        declared: usize,
        found: usize,
        sample: usize,
        line_number: usize,
    },

    /// A token matches no allele grammar
    #[error("Line {line_number}: allele token '{token}' matches no allele form")]
    AlleleSyntax { token: String, line_number: usize },

    /// A genotype allele index exceeds the declared alternate count.
    /// Raised lazily, at the point of dereference.
    #[error("Genotype allele index {index} exceeds alternate allele count {alt_count}")]
    AlleleIndexOutOfRange { index: u32, alt_count: usize },

    /// Non-numeric text where a number is required (POS, QUAL)
    #[error("Line {line_number}: invalid {field} value '{value}': expected a number")]
    InvalidNumber {
        field: &'static str,
        value: String,
        line_number: usize,
    },

    /// Declared span end precedes its start
    #[error("Declared end position ({end}) precedes start position ({start})")]
    InvalidSpan { start: i64, end: i64 },

    /// A required builder field was never supplied
    #[error("Cannot build position: missing required field '{field}'")]
    MissingField { field: &'static str },
}

impl DataError {
    /// Attach line context to a bare allele syntax error
    pub fn from_allele(err: AlleleSyntaxError, line_number: usize) -> Self {
        Self::AlleleSyntax {
            token: err.token,
            line_number,
        }
    }
}

/// A token that matches no allele grammar.
///
/// Carries only the offending token; the data-line parser adds line context
/// via [`DataError::from_allele`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("allele token '{token}' matches no allele form")]
pub struct AlleleSyntaxError {
    /// The token that failed classification
    pub token: String,
}

/// Errors from the typed FORMAT value decode table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatValueError {
    /// Genotype string does not match the `idx(/|idx)*` grammar
    #[error("malformed genotype '{0}'")]
    MalformedGenotype(String),

    /// A typed value failed to decode as its declared shape
    #[error("invalid {kind} value '{value}': expected {expected}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Result type alias for VcfCodec operations
pub type Result<T> = std::result::Result<T, VcfError>;

/// Result type alias for metadata parsing operations
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Result type alias for data line operations
pub type DataResult<T> = std::result::Result<T, DataError>;
