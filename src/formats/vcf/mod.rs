//! VCF format codec
//!
//! Typed parse/write for the Variant Call Format:
//!
//! ```text
//! ##fileformat=VCFv4.2            metadata: version line (mandatory, first)
//! ##INFO=<ID=...,...>             metadata: structured tag lists
//! #CHROM  POS  ID  REF  ALT ...   column header; terminates the metadata
//! 20  14370  rs6054257  G  A ...  data lines, one position each
//! ```
//!
//! Parsing builds an immutable typed model; writing is the structural
//! inverse, reproducing the input text exactly.

mod allele;
mod genotype;
mod metadata;
mod position;
mod reader;

pub use allele::{parse_allele, BreakendAllele, BreakendOrientation, VariantKind, VcfAllele};
pub use genotype::{
    FormatKey, FormatValue, Genotype, GenotypeAllele, Phasing, ReservedFormatKey,
};
pub use metadata::{MetadataLine, StructuredTags, TagValue};
pub use position::{
    parse_data_line, write_data_lines, Quality, SampleProperties, VcfPosition,
    VcfPositionBuilder,
};
pub use reader::{parse_vcf_reader, parse_vcf_str, VcfMetadataCollection, VcfParser};
