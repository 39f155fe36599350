//! VCF data record model and data-line codec
//!
//! A data line is 8 fixed tab-separated columns, optionally followed by a
//! FORMAT column and one column per sample:
//!
//! ```text
//! CHROM  POS  ID  REF  ALT  QUAL  FILTER  INFO  [FORMAT  sample...]
//! ```
//!
//! [`parse_data_line`] decomposes one line into a [`VcfPosition`];
//! [`VcfPosition::to_vcf_string`] is its exact structural inverse. The
//! parser is deliberately permissive about values (a `-1` position is
//! preserved, not rejected) because rewriting the original text exactly is
//! the contract here; consistency checks against the header belong to the
//! caller that holds both objects.

use crate::core::{DataError, DataResult, FormatValueError, Locus};
use crate::formats::vcf::allele::{parse_allele, VcfAllele};
use crate::formats::vcf::genotype::{FormatKey, Genotype, GenotypeAllele, ReservedFormatKey};
use indexmap::IndexMap;
use memchr::memchr;
use rayon::prelude::*;

/// A QUAL value: validated as a number, re-emitted with its original spelling
///
/// `30.0` and `3e1` are the same number but different text; the text is what
/// round-trips.
#[derive(Debug, Clone, PartialEq)]
pub struct Quality {
    text: String,
    value: f64,
}

impl Quality {
    /// Parse a QUAL field (not `.`)
    pub fn parse(text: &str, line_number: usize) -> DataResult<Self> {
        let value: f64 = text.parse().map_err(|_| DataError::InvalidNumber {
            field: "QUAL",
            value: text.to_string(),
            line_number,
        })?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Build a quality from a number (text is the default rendering)
    pub fn new(value: f64) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// One sample's property map: FORMAT key to raw field text, `.` as `None`
pub type SampleProperties = IndexMap<FormatKey, Option<String>>;

/// One typed VCF data record
///
/// Immutable after construction; build via [`parse_data_line`] or
/// [`VcfPosition::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct VcfPosition {
    /// Record coordinate (always plus strand)
    pub locus: Locus,
    /// ID column, kept opaque (`.` allowed)
    pub id: String,
    /// Reference allele
    pub reference: VcfAllele,
    /// Alternate alleles in textual comma-split order, duplicates preserved
    pub alts: Vec<VcfAllele>,
    /// QUAL column; `None` when the column was `.`
    pub qual: Option<Quality>,
    /// FILTER entries in order; `.` and `PASS` appear verbatim as given
    pub filters: Vec<String>,
    /// INFO entries in order; a flag key maps to `None`
    pub info: IndexMap<String, Option<String>>,
    /// FORMAT keys in column order (empty when the line had 8 columns)
    pub format: Vec<FormatKey>,
    /// Per-sample property maps, one per sample column
    pub samples: Vec<SampleProperties>,
}

impl VcfPosition {
    /// Start building a position programmatically
    pub fn builder() -> VcfPositionBuilder {
        VcfPositionBuilder::default()
    }

    /// All alleles of the record: reference first, then the alts
    pub fn all_alleles(&self) -> Vec<&VcfAllele> {
        std::iter::once(&self.reference).chain(self.alts.iter()).collect()
    }

    /// Dereference a genotype allele index against this record
    ///
    /// Index 0 is the reference, `n` the n-th alt. Returns `None` for a
    /// no-call. This is where [`DataError::AlleleIndexOutOfRange`] is
    /// raised; genotype decoding itself never checks indices.
    pub fn allele(&self, call: GenotypeAllele) -> DataResult<Option<&VcfAllele>> {
        match call {
            GenotypeAllele::NoCall => Ok(None),
            GenotypeAllele::Index(0) => Ok(Some(&self.reference)),
            GenotypeAllele::Index(n) => self
                .alts
                .get(n as usize - 1)
                .map(Some)
                .ok_or(DataError::AlleleIndexOutOfRange {
                    index: n,
                    alt_count: self.alts.len(),
                }),
        }
    }

    /// Decode the genotype of one sample, if the record carries one
    pub fn genotype(&self, sample: usize) -> Option<Result<Genotype, FormatValueError>> {
        let properties = self.samples.get(sample)?;
        let raw = properties
            .iter()
            .find(|(key, _)| key.kind() == ReservedFormatKey::Genotype)
            .and_then(|(_, value)| value.as_deref())?;
        Some(Genotype::decode(raw))
    }

    /// Render the record as its exact data line
    ///
    /// Pure and stateless; safe to call concurrently across records.
    pub fn to_vcf_string(&self) -> String {
        let mut out = String::with_capacity(128);

        out.push_str(&self.locus.contig);
        out.push('\t');
        out.push_str(&self.locus.position.to_string());
        out.push('\t');
        out.push_str(&self.id);
        out.push('\t');
        out.push_str(&self.reference.to_vcf_string());
        out.push('\t');
        if self.alts.is_empty() {
            out.push('.');
        } else {
            for (i, alt) in self.alts.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&alt.to_vcf_string());
            }
        }
        out.push('\t');
        match &self.qual {
            Some(q) => out.push_str(q.as_str()),
            None => out.push('.'),
        }
        out.push('\t');
        if self.filters.is_empty() {
            out.push('.');
        } else {
            out.push_str(&self.filters.join(";"));
        }
        out.push('\t');
        out.push_str(&info_string(&self.info));

        if !self.format.is_empty() {
            out.push('\t');
            for (i, key) in self.format.iter().enumerate() {
                if i > 0 {
                    out.push(':');
                }
                out.push_str(key.as_str());
            }
            for sample in &self.samples {
                out.push('\t');
                for (i, (_, value)) in sample.iter().enumerate() {
                    if i > 0 {
                        out.push(':');
                    }
                    match value {
                        Some(v) => out.push_str(v),
                        None => out.push('.'),
                    }
                }
            }
        }

        out
    }
}

fn info_string(info: &IndexMap<String, Option<String>>) -> String {
    if info.is_empty() {
        return ".".to_string();
    }
    let mut out = String::new();
    for (i, (key, value)) in info.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(key);
        if let Some(v) = value {
            out.push('=');
            out.push_str(v);
        }
    }
    out
}

/// Validating builder for [`VcfPosition`]
///
/// `build` checks all invariants atomically: a partially invalid record is
/// never observable. When INFO carries an integer `END`, the declared span
/// must not be inverted.
#[derive(Debug, Default)]
pub struct VcfPositionBuilder {
    contig: Option<String>,
    position: Option<i64>,
    id: Option<String>,
    reference: Option<VcfAllele>,
    alts: Vec<VcfAllele>,
    qual: Option<Quality>,
    filters: Vec<String>,
    info: IndexMap<String, Option<String>>,
    format: Vec<FormatKey>,
    samples: Vec<SampleProperties>,
}

impl VcfPositionBuilder {
    pub fn contig(mut self, contig: impl Into<String>) -> Self {
        self.contig = Some(contig.into());
        self
    }

    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn reference(mut self, reference: VcfAllele) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn alts(mut self, alts: Vec<VcfAllele>) -> Self {
        self.alts = alts;
        self
    }

    pub fn qual(mut self, qual: Option<Quality>) -> Self {
        self.qual = qual;
        self
    }

    pub fn filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    pub fn info(mut self, info: IndexMap<String, Option<String>>) -> Self {
        self.info = info;
        self
    }

    pub fn format(mut self, format: Vec<FormatKey>) -> Self {
        self.format = format;
        self
    }

    pub fn samples(mut self, samples: Vec<SampleProperties>) -> Self {
        self.samples = samples;
        self
    }

    /// Validate and construct the record
    pub fn build(self) -> DataResult<VcfPosition> {
        let contig = self
            .contig
            .filter(|c| !c.is_empty())
            .ok_or(DataError::MissingField { field: "CHROM" })?;
        let position = self.position.ok_or(DataError::MissingField { field: "POS" })?;
        let reference = self.reference.ok_or(DataError::MissingField { field: "REF" })?;

        // A declared END that parses as an integer must not invert the span.
        // Non-integer END values are opaque INFO text and stay untouched.
        if let Some(Some(end_text)) = self.info.get("END") {
            if let Ok(end) = end_text.parse::<i64>() {
                if end < position {
                    return Err(DataError::InvalidSpan {
                        start: position,
                        end,
                    });
                }
            }
        }

        Ok(VcfPosition {
            locus: Locus::new(contig, position),
            id: self.id.unwrap_or_else(|| ".".to_string()),
            reference,
            alts: self.alts,
            qual: self.qual,
            filters: self.filters,
            info: self.info,
            format: self.format,
            samples: self.samples,
        })
    }
}

/// Find tab-separated field boundaries with minimal allocation
fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(10);
    let mut start = 0;

    while let Some(tab) = memchr(b'\t', &bytes[start..]) {
        fields.push(&line[start..start + tab]);
        start += tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// Parse one data line against the header's sample names
///
/// The line must have exactly `9 + sample_names.len()` tab-separated columns
/// (or exactly 8 when the header declares no samples). `line_number` is
/// 1-based and only used for diagnostics.
pub fn parse_data_line(
    line: &str,
    sample_names: &[String],
    line_number: usize,
) -> DataResult<VcfPosition> {
    let fields = split_fields(line);
    let expected = if sample_names.is_empty() {
        8
    } else {
        9 + sample_names.len()
    };
    if fields.len() != expected {
        return Err(DataError::ColumnCountMismatch {
            expected,
            found: fields.len(),
            line_number,
        });
    }

    let position: i64 = fields[1].parse().map_err(|_| DataError::InvalidNumber {
        field: "POS",
        value: fields[1].to_string(),
        line_number,
    })?;

    let reference =
        parse_allele(fields[3]).map_err(|e| DataError::from_allele(e, line_number))?;

    let alts = if fields[4] == "." {
        Vec::new()
    } else {
        fields[4]
            .split(',')
            .map(|token| parse_allele(token).map_err(|e| DataError::from_allele(e, line_number)))
            .collect::<DataResult<Vec<_>>>()?
    };

    let qual = if fields[5] == "." {
        None
    } else {
        Some(Quality::parse(fields[5], line_number)?)
    };

    let filters: Vec<String> = fields[6].split(';').map(String::from).collect();

    let info = parse_info(fields[7]);

    let mut builder = VcfPosition::builder()
        .contig(fields[0])
        .position(position)
        .id(fields[2])
        .reference(reference)
        .alts(alts)
        .qual(qual)
        .filters(filters)
        .info(info);

    if !sample_names.is_empty() {
        let format: Vec<FormatKey> = fields[8].split(':').map(FormatKey::new).collect();
        let mut samples = Vec::with_capacity(sample_names.len());
        for (index, column) in fields[9..].iter().copied().enumerate() {
            samples.push(parse_sample_column(column, &format, index, line_number)?);
        }
        builder = builder.format(format).samples(samples);
    }

    builder.build()
}

/// Split the INFO column into its ordered key/value entries
fn parse_info(field: &str) -> IndexMap<String, Option<String>> {
    let mut info = IndexMap::new();
    if field == "." {
        return info;
    }
    for entry in field.split(';') {
        match entry.split_once('=') {
            Some((key, value)) => info.insert(key.to_string(), Some(value.to_string())),
            None => info.insert(entry.to_string(), None),
        };
    }
    info
}

/// Zip one sample column against the FORMAT keys
///
/// Trailing fields may be omitted (standard truncation rule); extra fields
/// are an error.
fn parse_sample_column(
    column: &str,
    format: &[FormatKey],
    sample_index: usize,
    line_number: usize,
) -> DataResult<SampleProperties> {
    let values: Vec<&str> = column.split(':').collect();
    if values.len() > format.len() {
        return Err(DataError::SampleCountMismatch {
            declared: format.len(),
            found: values.len(),
            sample: sample_index,
            line_number,
        });
    }

    Ok(format
        .iter()
        .zip(values)
        .map(|(key, value)| {
            let value = if value == "." {
                None
            } else {
                Some(value.to_string())
            };
            (key.clone(), value)
        })
        .collect())
}

/// Format many positions in parallel
///
/// Writers are pure functions of their record, so records can be rendered
/// independently; order of the output matches the input slice.
pub fn write_data_lines(positions: &[VcfPosition]) -> Vec<String> {
    positions.par_iter().map(VcfPosition::to_vcf_string).collect()
}
