//! Genomic coordinates
//!
//! Provides the [`Strand`] orientation and the [`Locus`] coordinate pair
//! shared by the format models.

use std::fmt;

/// Strand orientation of a genomic feature
///
/// VCF loci are always on the plus strand; the minus variant exists for
/// coordinate values carried inside allele notation (breakend mates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse a strand character ('+' or '-')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    /// The strand as its single-character representation
    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A (contig, position) genomic coordinate
///
/// Positions are 1-based by convention. The field is signed and
/// deliberately unvalidated: input carrying a non-positive position (seen in
/// the wild as `-1`) is preserved exactly, because reproducing the original
/// text outranks coordinate-system validation here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    /// Contig (chromosome) name
    pub contig: String,
    /// 1-based position
    pub position: i64,
    /// Strand; always [`Strand::Plus`] for VCF records
    pub strand: Strand,
}

impl Locus {
    /// Create a plus-strand locus
    pub fn new(contig: impl Into<String>, position: i64) -> Self {
        Self {
            contig: contig.into(),
            position,
            strand: Strand::Plus,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.position)
    }
}
