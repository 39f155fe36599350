//! VCF metadata (`##`) line model
//!
//! # Metadata grammar
//!
//! ```text
//! ##fileformat=VCFv4.2                          version line, must be first
//! ##INFO=<ID=DP,Number=1,Type=Integer,...>      structured tag list
//! ##source=myProgram                            simple key=value
//! ##anything-else                               generic passthrough
//! ```
//!
//! Structured values respect double quotes: a comma inside
//! `Description="a,b"` is content, not a separator. Sub-tag order and the
//! original quoting are preserved so each line rewrites to exactly its
//! input text. Lines whose shape is not recognized become
//! [`MetadataLine::Generic`], carrying the verbatim remainder; the parser
//! never silently drops a header line it does not understand.

use crate::core::{MetadataError, MetadataResult};
use indexmap::IndexMap;
use std::fmt;

/// Sub-tag value of a structured metadata line
///
/// `quoted` records whether the input wrapped the value in double quotes;
/// the writer re-quotes when the flag is set or when the value contains a
/// comma (which would otherwise change the token boundaries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub value: String,
    pub quoted: bool,
}

impl TagValue {
    /// An unquoted tag value
    pub fn bare(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// A double-quoted tag value
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }
}

/// Ordered sub-tag mapping of a structured metadata line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredTags {
    tags: IndexMap<String, TagValue>,
}

impl StructuredTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, keeping insertion order
    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    /// Look up a tag value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|t| t.value.as_str())
    }

    /// Iterate tags in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Render the tag list (without the surrounding angle brackets)
    fn to_tag_string(&self) -> String {
        let mut out = String::new();
        for (i, (key, tag)) in self.tags.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push('=');
            if tag.quoted || tag.value.contains(',') {
                out.push('"');
                out.push_str(&tag.value);
                out.push('"');
            } else {
                out.push_str(&tag.value);
            }
        }
        out
    }
}

/// The structured metadata kinds, used for dispatch and error messages
const STRUCTURED_KINDS: &[(&str, &[&str])] = &[
    ("INFO", &["ID", "Number", "Type", "Description"]),
    ("FORMAT", &["ID", "Number", "Type", "Description"]),
    ("FILTER", &["ID", "Description"]),
    ("ALT", &["ID", "Description"]),
    ("contig", &["ID"]),
    ("PEDIGREE", &[]),
];

/// One `##` header line
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataLine {
    /// `##fileformat=VCFv<version>`; stores the version (`"4.2"`)
    FileFormat(String),
    /// `##INFO=<...>`
    Info(StructuredTags),
    /// `##FORMAT=<...>`
    Format(StructuredTags),
    /// `##FILTER=<...>`
    Filter(StructuredTags),
    /// `##ALT=<...>`
    Alt(StructuredTags),
    /// `##contig=<...>`
    Contig(StructuredTags),
    /// `##PEDIGREE=<...>`
    Pedigree(StructuredTags),
    /// `##key=value` where the value is not a tag list
    Simple { key: String, value: String },
    /// Any other `##` line, verbatim after the `##` prefix
    Generic(String),
}

impl MetadataLine {
    /// Parse one metadata line (must start with `##`)
    pub fn parse(line: &str, line_number: usize) -> MetadataResult<Self> {
        let rest = line.strip_prefix("##").ok_or_else(|| {
            MetadataError::malformed("metadata lines start with '##'", line_number, line)
        })?;

        if let Some(version_text) = rest.strip_prefix("fileformat=") {
            let version = version_text.strip_prefix("VCFv").filter(|v| !v.is_empty());
            return match version {
                Some(v) => Ok(MetadataLine::FileFormat(v.to_string())),
                None => Err(MetadataError::VersionMissingOrUnsupported {
                    line_number,
                    content: line.chars().take(100).collect(),
                }),
            };
        }

        let (key, value) = match rest.split_once('=') {
            Some(kv) => kv,
            None => return Ok(MetadataLine::Generic(rest.to_string())),
        };

        if value.starts_with('<') {
            let kind = STRUCTURED_KINDS.iter().find(|(name, _)| *name == key);
            let (kind_name, required) = match kind {
                Some(k) => *k,
                // A bracketed value under an unknown key is kept verbatim
                None => return Ok(MetadataLine::Generic(rest.to_string())),
            };

            let inner = value
                .strip_prefix('<')
                .and_then(|v| v.strip_suffix('>'))
                .ok_or_else(|| {
                    MetadataError::malformed(
                        format!("{} tag list is missing its closing '>'", kind_name),
                        line_number,
                        line,
                    )
                })?;

            let tags = parse_structured_tags(inner, line_number, line)?;
            for tag in required {
                if tags.get(tag).is_none() {
                    return Err(MetadataError::MissingRequiredTag {
                        kind: kind_name,
                        tag,
                        line_number,
                    });
                }
            }

            return Ok(match kind_name {
                "INFO" => MetadataLine::Info(tags),
                "FORMAT" => MetadataLine::Format(tags),
                "FILTER" => MetadataLine::Filter(tags),
                "ALT" => MetadataLine::Alt(tags),
                "contig" => MetadataLine::Contig(tags),
                _ => MetadataLine::Pedigree(tags),
            });
        }

        Ok(MetadataLine::Simple {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Render the line back to its exact text, including the `##` prefix
    pub fn to_vcf_string(&self) -> String {
        match self {
            MetadataLine::FileFormat(version) => format!("##fileformat=VCFv{}", version),
            MetadataLine::Info(tags) => format!("##INFO=<{}>", tags.to_tag_string()),
            MetadataLine::Format(tags) => format!("##FORMAT=<{}>", tags.to_tag_string()),
            MetadataLine::Filter(tags) => format!("##FILTER=<{}>", tags.to_tag_string()),
            MetadataLine::Alt(tags) => format!("##ALT=<{}>", tags.to_tag_string()),
            MetadataLine::Contig(tags) => format!("##contig=<{}>", tags.to_tag_string()),
            MetadataLine::Pedigree(tags) => format!("##PEDIGREE=<{}>", tags.to_tag_string()),
            MetadataLine::Simple { key, value } => format!("##{}={}", key, value),
            MetadataLine::Generic(rest) => format!("##{}", rest),
        }
    }

    /// The structured tag map, for the kinds that carry one
    pub fn tags(&self) -> Option<&StructuredTags> {
        match self {
            MetadataLine::Info(t)
            | MetadataLine::Format(t)
            | MetadataLine::Filter(t)
            | MetadataLine::Alt(t)
            | MetadataLine::Contig(t)
            | MetadataLine::Pedigree(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vcf_string())
    }
}

/// Tokenize a structured tag list, respecting double-quoted values
///
/// This is the one place in the grammar where a naive split breaks:
/// `Description="Allele Frequency, for each ALT"` contains both a comma and
/// (elsewhere) `=` characters inside quotes. The scan walks bytes, treating
/// quotes as opaque spans.
fn parse_structured_tags(
    inner: &str,
    line_number: usize,
    content: &str,
) -> MetadataResult<StructuredTags> {
    let bytes = inner.as_bytes();
    let len = bytes.len();
    let mut tags = StructuredTags::new();
    let mut pos = 0;

    while pos < len {
        let eq = bytes[pos..]
            .iter()
            .position(|&b| b == b'=')
            .map(|p| pos + p)
            .ok_or_else(|| {
                MetadataError::malformed(
                    format!("tag '{}' has no '=' value", &inner[pos..]),
                    line_number,
                    content,
                )
            })?;
        let key = &inner[pos..eq];
        if key.is_empty() || key.contains(',') {
            return Err(MetadataError::malformed(
                "empty or malformed tag key",
                line_number,
                content,
            ));
        }
        pos = eq + 1;

        let tag = if pos < len && bytes[pos] == b'"' {
            pos += 1;
            let close = bytes[pos..]
                .iter()
                .position(|&b| b == b'"')
                .map(|p| pos + p)
                .ok_or_else(|| {
                    MetadataError::malformed("unbalanced quote in tag value", line_number, content)
                })?;
            let value = TagValue::quoted(&inner[pos..close]);
            pos = close + 1;
            if pos < len {
                if bytes[pos] != b',' {
                    return Err(MetadataError::malformed(
                        "expected ',' after quoted tag value",
                        line_number,
                        content,
                    ));
                }
                pos += 1;
                if pos == len {
                    return Err(MetadataError::malformed(
                        "trailing comma in tag list",
                        line_number,
                        content,
                    ));
                }
            }
            value
        } else {
            let comma = bytes[pos..]
                .iter()
                .position(|&b| b == b',')
                .map(|p| pos + p)
                .unwrap_or(len);
            let value = TagValue::bare(&inner[pos..comma]);
            if comma < len && comma + 1 == len {
                return Err(MetadataError::malformed(
                    "trailing comma in tag list",
                    line_number,
                    content,
                ));
            }
            pos = if comma == len { len } else { comma + 1 };
            value
        };

        if tags.get(key).is_some() {
            return Err(MetadataError::malformed(
                format!("duplicate tag '{}'", key),
                line_number,
                content,
            ));
        }
        tags.insert(key, tag);
    }

    Ok(tags)
}
