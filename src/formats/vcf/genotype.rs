//! Genotype and per-sample FORMAT property model
//!
//! Two layers live here. [`Genotype`] is the literal decode of a `GT` string:
//! allele indices plus one phase flag per separator, kept exactly as written
//! so `encode(decode(s)) == s`. On top of that, [`ReservedFormatKey`] is a
//! typed decode/encode table for the well-known FORMAT keys; unknown keys
//! fall through to raw text so new vocabulary never aborts a parse.

use crate::core::FormatValueError;
use std::fmt;

/// Phase marker between two genotype allele calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phasing {
    /// `/` separator
    Unphased,
    /// `|` separator
    Phased,
}

impl Phasing {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '/' => Some(Phasing::Unphased),
            '|' => Some(Phasing::Phased),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Phasing::Unphased => '/',
            Phasing::Phased => '|',
        }
    }
}

/// One allele call inside a genotype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeAllele {
    /// Index into the record's alleles: 0 is the reference, `n` the n-th alt
    Index(u32),
    /// The `.` no-call marker
    NoCall,
}

/// A decoded `GT` value: ordered allele calls and their separators
///
/// The grammar allows mixed separators within one genotype (`0/1|2`); the
/// literal sequence is preserved rather than normalized to the first
/// separator, so re-encoding never invents a stricter rule than the format
/// requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genotype {
    calls: Vec<GenotypeAllele>,
    phasing: Vec<Phasing>,
}

impl Genotype {
    /// Decode a raw `GT` string
    ///
    /// Lenient and purely syntactic: indices are not checked against any
    /// alt count here. Dereferencing against a record happens later (and
    /// lazily) via `VcfPosition::allele`.
    pub fn decode(raw: &str) -> Result<Self, FormatValueError> {
        let mut calls = Vec::new();
        let mut phasing = Vec::new();
        let mut token = String::new();

        for c in raw.chars() {
            if let Some(sep) = Phasing::from_char(c) {
                calls.push(Self::decode_call(&token, raw)?);
                phasing.push(sep);
                token.clear();
            } else {
                token.push(c);
            }
        }
        calls.push(Self::decode_call(&token, raw)?);

        Ok(Self { calls, phasing })
    }

    fn decode_call(token: &str, raw: &str) -> Result<GenotypeAllele, FormatValueError> {
        if token == "." {
            return Ok(GenotypeAllele::NoCall);
        }
        token
            .parse::<u32>()
            .map(GenotypeAllele::Index)
            .map_err(|_| FormatValueError::MalformedGenotype(raw.to_string()))
    }

    /// Re-encode the genotype as its exact original string
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, call) in self.calls.iter().enumerate() {
            if i > 0 {
                out.push(self.phasing[i - 1].as_char());
            }
            match call {
                GenotypeAllele::Index(n) => out.push_str(&n.to_string()),
                GenotypeAllele::NoCall => out.push('.'),
            }
        }
        out
    }

    /// The ordered allele calls
    pub fn calls(&self) -> &[GenotypeAllele] {
        &self.calls
    }

    /// The separators between calls (`calls().len() - 1` entries)
    pub fn phasing(&self) -> &[Phasing] {
        &self.phasing
    }

    /// Number of allele calls (2 for a diploid genotype)
    pub fn ploidy(&self) -> usize {
        self.calls.len()
    }

    /// Whether every separator is the phased `|` marker
    pub fn is_fully_phased(&self) -> bool {
        !self.phasing.is_empty() && self.phasing.iter().all(|p| *p == Phasing::Phased)
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// A FORMAT key as written in the file
///
/// The raw spelling is the map key (round trip needs it); the typed
/// classification is derived on demand via [`FormatKey::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatKey(String);

impl FormatKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The key exactly as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reserved-key classification of this key
    pub fn kind(&self) -> ReservedFormatKey {
        ReservedFormatKey::from_key(&self.0)
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of well-known per-sample FORMAT keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedFormatKey {
    /// `GT`
    Genotype,
    /// `DP`
    Depth,
    /// `AD`
    AlleleDepth,
    /// `GQ`
    GenotypeQuality,
    /// `PL`
    PhredLikelihoods,
    /// `GL`
    GenotypeLikelihoods,
    /// `FT`
    Filter,
    /// `PS`
    PhaseSet,
    /// Anything else; decodes as raw text
    Unknown,
}

impl ReservedFormatKey {
    /// Case-insensitive lookup with a safe default: unrecognized vocabulary
    /// maps to [`ReservedFormatKey::Unknown`] instead of failing, so an
    /// otherwise valid record is never aborted by a new key.
    pub fn from_key(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "GT" => ReservedFormatKey::Genotype,
            "DP" => ReservedFormatKey::Depth,
            "AD" => ReservedFormatKey::AlleleDepth,
            "GQ" => ReservedFormatKey::GenotypeQuality,
            "PL" => ReservedFormatKey::PhredLikelihoods,
            "GL" => ReservedFormatKey::GenotypeLikelihoods,
            "FT" => ReservedFormatKey::Filter,
            "PS" => ReservedFormatKey::PhaseSet,
            _ => ReservedFormatKey::Unknown,
        }
    }

    /// Decode a raw field value into the typed shape this key declares
    pub fn decode(&self, raw: &str) -> Result<FormatValue, FormatValueError> {
        match self {
            ReservedFormatKey::Genotype => Genotype::decode(raw).map(FormatValue::Genotype),
            ReservedFormatKey::Depth
            | ReservedFormatKey::GenotypeQuality
            | ReservedFormatKey::PhaseSet => raw
                .parse::<i64>()
                .map(FormatValue::Integer)
                .map_err(|_| invalid(self.name(), raw, "an integer")),
            ReservedFormatKey::AlleleDepth | ReservedFormatKey::PhredLikelihoods => raw
                .split(',')
                .map(|t| t.parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map(FormatValue::IntegerList)
                .map_err(|_| invalid(self.name(), raw, "a comma-separated integer list")),
            ReservedFormatKey::GenotypeLikelihoods => raw
                .split(',')
                .map(|t| t.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map(FormatValue::FloatList)
                .map_err(|_| invalid(self.name(), raw, "a comma-separated float list")),
            ReservedFormatKey::Filter | ReservedFormatKey::Unknown => {
                Ok(FormatValue::Text(raw.to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ReservedFormatKey::Genotype => "GT",
            ReservedFormatKey::Depth => "DP",
            ReservedFormatKey::AlleleDepth => "AD",
            ReservedFormatKey::GenotypeQuality => "GQ",
            ReservedFormatKey::PhredLikelihoods => "PL",
            ReservedFormatKey::GenotypeLikelihoods => "GL",
            ReservedFormatKey::Filter => "FT",
            ReservedFormatKey::PhaseSet => "PS",
            ReservedFormatKey::Unknown => "unknown",
        }
    }
}

fn invalid(kind: &'static str, value: &str, expected: &'static str) -> FormatValueError {
    FormatValueError::InvalidValue {
        kind,
        value: value.to_string(),
        expected,
    }
}

/// A typed FORMAT field value
#[derive(Debug, Clone, PartialEq)]
pub enum FormatValue {
    Genotype(Genotype),
    Integer(i64),
    IntegerList(Vec<i64>),
    FloatList(Vec<f64>),
    Text(String),
}

impl FormatValue {
    /// Encode the value back into field text
    pub fn encode(&self) -> String {
        match self {
            FormatValue::Genotype(gt) => gt.encode(),
            FormatValue::Integer(n) => n.to_string(),
            FormatValue::IntegerList(ns) => ns
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(","),
            FormatValue::FloatList(fs) => fs
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(","),
            FormatValue::Text(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genotype_decode_encode_inverse() {
        for s in ["0/1", "0|1", "./.", "1/2", "0/1/2", "0/1|2", ".", "0", "12|4"] {
            let gt = Genotype::decode(s).unwrap();
            assert_eq!(gt.encode(), s, "round trip of '{}'", s);
        }
    }

    #[test]
    fn test_genotype_calls_and_phasing() {
        let gt = Genotype::decode("0|1").unwrap();
        assert_eq!(
            gt.calls(),
            &[GenotypeAllele::Index(0), GenotypeAllele::Index(1)]
        );
        assert_eq!(gt.phasing(), &[Phasing::Phased]);
        assert!(gt.is_fully_phased());
        assert_eq!(gt.ploidy(), 2);

        let gt = Genotype::decode("0/1|2").unwrap();
        assert_eq!(gt.phasing(), &[Phasing::Unphased, Phasing::Phased]);
        assert!(!gt.is_fully_phased());
    }

    #[test]
    fn test_genotype_no_call() {
        let gt = Genotype::decode("./.").unwrap();
        assert_eq!(gt.calls(), &[GenotypeAllele::NoCall, GenotypeAllele::NoCall]);
    }

    #[test]
    fn test_genotype_malformed() {
        for s in ["", "0/", "/1", "a/b", "0//1", "0/-1"] {
            assert!(
                matches!(
                    Genotype::decode(s),
                    Err(FormatValueError::MalformedGenotype(_))
                ),
                "'{}' should be malformed",
                s
            );
        }
    }

    #[test]
    fn test_reserved_key_lookup_case_insensitive() {
        assert_eq!(ReservedFormatKey::from_key("GT"), ReservedFormatKey::Genotype);
        assert_eq!(ReservedFormatKey::from_key("gt"), ReservedFormatKey::Genotype);
        assert_eq!(ReservedFormatKey::from_key("Dp"), ReservedFormatKey::Depth);
        assert_eq!(ReservedFormatKey::from_key("XYZ"), ReservedFormatKey::Unknown);
    }

    #[test]
    fn test_format_key_preserves_spelling() {
        let key = FormatKey::new("gt");
        assert_eq!(key.as_str(), "gt");
        assert_eq!(key.kind(), ReservedFormatKey::Genotype);
    }

    #[test]
    fn test_typed_decode_integer() {
        assert_eq!(
            ReservedFormatKey::Depth.decode("14").unwrap(),
            FormatValue::Integer(14)
        );
        assert!(ReservedFormatKey::Depth.decode("abc").is_err());
    }

    #[test]
    fn test_typed_decode_lists() {
        assert_eq!(
            ReservedFormatKey::AlleleDepth.decode("12,3").unwrap(),
            FormatValue::IntegerList(vec![12, 3])
        );
        assert_eq!(
            ReservedFormatKey::GenotypeLikelihoods.decode("-0.1,-3.5").unwrap(),
            FormatValue::FloatList(vec![-0.1, -3.5])
        );
    }

    #[test]
    fn test_unknown_key_passthrough() {
        let value = ReservedFormatKey::Unknown.decode("whatever:text").unwrap();
        assert_eq!(value, FormatValue::Text("whatever:text".to_string()));
        assert_eq!(value.encode(), "whatever:text");
    }

    #[test]
    fn test_typed_encode_inverse() {
        for (key, raw) in [
            (ReservedFormatKey::Genotype, "0/1"),
            (ReservedFormatKey::Depth, "14"),
            (ReservedFormatKey::AlleleDepth, "12,3"),
        ] {
            assert_eq!(key.decode(raw).unwrap().encode(), raw);
        }
    }
}
