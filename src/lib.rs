//! VcfCodec - round-trip faithful VCF parsing and writing
//!
//! A typed parser/writer pair for the Variant Call Format. The defining
//! contract is round-trip fidelity: every syntactically valid input line,
//! once parsed and rewritten, reproduces the original text exactly. Parsed
//! entities therefore keep whatever textual detail is needed to regenerate
//! their source (QUAL spelling, sub-tag order and quoting, separator
//! choices inside genotypes).
//!
//! # Features
//!
//! - Typed metadata model with a verbatim `Generic` passthrough for
//!   unrecognized header lines (forward compatible by construction)
//! - Allele model covering bases, symbolic SVs and breakends
//! - Per-sample FORMAT decoding with a typed table for well-known keys
//! - Fail-fast errors carrying 1-based line numbers
//! - Pure, stateless writers, parallelizable with rayon
//!
//! # Example
//!
//! ```
//! use vcf_codec::formats::vcf::parse_vcf_str;
//!
//! let text = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n20\t14370\trs6054257\tG\tA\t29\tPASS\tNS=3;DP=14\n";
//!
//! let (metadata, positions) = parse_vcf_str(text).unwrap();
//! assert_eq!(metadata.version(), "4.2");
//! assert_eq!(positions[0].locus.position, 14370);
//! assert_eq!(
//!     positions[0].to_vcf_string(),
//!     "20\t14370\trs6054257\tG\tA\t29\tPASS\tNS=3;DP=14"
//! );
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    AlleleSyntaxError, DataError, FormatValueError, Locus, MetadataError, Result, Strand,
    VcfError,
};
pub use crate::formats::vcf::{
    parse_allele, parse_data_line, parse_vcf_reader, parse_vcf_str, Genotype, MetadataLine,
    VcfAllele, VcfMetadataCollection, VcfParser, VcfPosition,
};
