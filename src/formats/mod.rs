//! File format codecs
//!
//! One module per supported format. VCF is the only resident today; sibling
//! text formats would slot in alongside it.

pub mod vcf;
