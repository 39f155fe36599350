//! Core types shared by the format codecs
//!
//! This module contains the error taxonomy and the genomic coordinate
//! primitives the VCF model is built from.

mod error;
mod locus;

pub use error::{
    AlleleSyntaxError, DataError, DataResult, FormatValueError, MetadataError, MetadataResult,
    Result, VcfError,
};
pub use locus::{Locus, Strand};
