//! VCF allele model
//!
//! Parses and formats single allele tokens from the REF and ALT columns.
//!
//! # Allele grammar
//!
//! ```text
//! .                  missing
//! <DEL>              symbolic structural variant
//! G]17:198982]       breakend (bracketed mate locus, bases on one side)
//! ACGT               explicit bases (indels are implicit in ref/alt length)
//! ```
//!
//! Every variant stores exactly the substring needed to regenerate its
//! original token, so `to_vcf_string` reverses `parse_allele` character for
//! character.

use crate::core::AlleleSyntaxError;
use std::fmt;

/// One possible sequence state at a locus
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VcfAllele {
    /// An explicit run of bases (`ACGTN`, case preserved)
    Bases(String),
    /// The `.` placeholder
    Missing,
    /// A base run tagged as a deletion by its constructor.
    /// The parser never produces this variant: VCF encodes indels through
    /// the ref/alt length difference, so parsed base runs are [`Bases`]
    /// and indel status is derived via [`VariantKind::classify`].
    ///
    /// [`Bases`]: VcfAllele::Bases
    Deletion(String),
    /// A base run tagged as an insertion by its constructor; see
    /// [`VcfAllele::Deletion`] for why the parser never produces it.
    Insertion(String),
    /// A symbolic structural variant id, the content between `<` and `>`
    Symbolic(String),
    /// A breakend junction to a mate locus
    Breakend(BreakendAllele),
}

/// Orientation of a breakend junction, taken from its bracket characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakendOrientation {
    /// `[` brackets: the joined segment extends to the right of the mate locus
    Right,
    /// `]` brackets: the joined segment extends to the left of the mate locus
    Left,
}

impl BreakendOrientation {
    /// The bracket character this orientation was written with
    pub fn bracket(&self) -> char {
        match self {
            BreakendOrientation::Right => '[',
            BreakendOrientation::Left => ']',
        }
    }
}

/// A breakend allele: local bases plus a bracketed mate locus
///
/// Exactly one of `leading_bases` / `trailing_bases` is non-empty in
/// spec-conformant input; the parser does not enforce that, it captures both
/// sides verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakendAllele {
    /// Bases preceding the bracketed mate descriptor
    pub leading_bases: String,
    /// Junction orientation (`[` vs `]`)
    pub orientation: BreakendOrientation,
    /// Mate contig name
    pub mate_contig: String,
    /// Mate position (1-based)
    pub mate_position: i64,
    /// Bases following the bracketed mate descriptor
    pub trailing_bases: String,
}

impl VcfAllele {
    /// Render the allele as its exact VCF token
    ///
    /// Total and pure: every variant regenerates the text it was parsed
    /// from (or constructed with).
    pub fn to_vcf_string(&self) -> String {
        match self {
            VcfAllele::Bases(bases) => bases.clone(),
            VcfAllele::Missing => ".".to_string(),
            VcfAllele::Deletion(bases) => bases.clone(),
            VcfAllele::Insertion(bases) => bases.clone(),
            VcfAllele::Symbolic(id) => format!("<{}>", id),
            VcfAllele::Breakend(bnd) => {
                let b = bnd.orientation.bracket();
                format!(
                    "{}{}{}:{}{}{}",
                    bnd.leading_bases, b, bnd.mate_contig, bnd.mate_position, b, bnd.trailing_bases
                )
            }
        }
    }
}

impl fmt::Display for VcfAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vcf_string())
    }
}

/// Check if a token is a run of allele bases (`ACGTN`, either case)
///
/// Narrower than a general DNA alphabet: the VCF allele grammar admits only
/// `A`, `C`, `G`, `T` and `N`, not the wider IUPAC ambiguity codes.
#[inline]
fn is_bases(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Parse a single allele token
///
/// Classification order: `.` is missing; `<...>` is symbolic; any token
/// containing a bracket is a breakend; a pure base run is [`VcfAllele::Bases`]
/// regardless of its length relative to the reference. Anything else fails
/// with [`AlleleSyntaxError`] carrying the token (callers add line context).
///
/// # Examples
/// ```
/// use vcf_codec::formats::vcf::{parse_allele, VcfAllele};
///
/// assert_eq!(parse_allele(".").unwrap(), VcfAllele::Missing);
/// assert_eq!(
///     parse_allele("<DEL>").unwrap(),
///     VcfAllele::Symbolic("DEL".to_string())
/// );
/// assert!(parse_allele("123").is_err());
/// ```
pub fn parse_allele(token: &str) -> Result<VcfAllele, AlleleSyntaxError> {
    if token == "." {
        return Ok(VcfAllele::Missing);
    }

    if let Some(inner) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        if inner.is_empty() || inner.contains('<') || inner.contains('>') {
            return Err(syntax_error(token));
        }
        return Ok(VcfAllele::Symbolic(inner.to_string()));
    }

    if token.contains('[') || token.contains(']') {
        return parse_breakend(token);
    }

    if is_bases(token) {
        return Ok(VcfAllele::Bases(token.to_string()));
    }

    Err(syntax_error(token))
}

fn syntax_error(token: &str) -> AlleleSyntaxError {
    AlleleSyntaxError {
        token: token.to_string(),
    }
}

/// Parse a breakend token of the form `t[p[`, `t]p]`, `[p[t` or `]p]t`
fn parse_breakend(token: &str) -> Result<VcfAllele, AlleleSyntaxError> {
    let (bracket, orientation) = if token.contains('[') {
        ('[', BreakendOrientation::Right)
    } else {
        (']', BreakendOrientation::Left)
    };

    let mut parts = token.split(bracket);
    let leading = parts.next().unwrap_or("");
    let mate = parts.next().ok_or_else(|| syntax_error(token))?;
    let trailing = parts.next().ok_or_else(|| syntax_error(token))?;
    // More than two brackets, or a mix of '[' and ']'
    if parts.next().is_some() || trailing.contains(']') || trailing.contains('[') {
        return Err(syntax_error(token));
    }

    // Base runs may sit on either side of the brackets but nowhere else
    if (!leading.is_empty() && !is_bases(leading))
        || (!trailing.is_empty() && !is_bases(trailing))
        || (leading.is_empty() && trailing.is_empty())
    {
        return Err(syntax_error(token));
    }

    let (mate_contig, mate_position) = mate.rsplit_once(':').ok_or_else(|| syntax_error(token))?;
    if mate_contig.is_empty() {
        return Err(syntax_error(token));
    }
    let mate_position: i64 = mate_position.parse().map_err(|_| syntax_error(token))?;

    Ok(VcfAllele::Breakend(BreakendAllele {
        leading_bases: leading.to_string(),
        orientation,
        mate_contig: mate_contig.to_string(),
        mate_position,
        trailing_bases: trailing.to_string(),
    }))
}

/// Derived variant classification
///
/// Indel status is not stored on the allele; it falls out of the ref/alt
/// length difference, so this is a pure function over the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// Equal-length base substitution (SNP or MNP)
    Substitution,
    Insertion,
    Deletion,
    /// Anything involving a non-base allele (symbolic, breakend, missing)
    Other,
}

impl VariantKind {
    /// Classify an alt allele against the reference
    pub fn classify(reference: &VcfAllele, alt: &VcfAllele) -> Self {
        let ref_len = match reference {
            VcfAllele::Bases(b) | VcfAllele::Deletion(b) | VcfAllele::Insertion(b) => b.len(),
            _ => return VariantKind::Other,
        };
        let alt_len = match alt {
            VcfAllele::Bases(b) | VcfAllele::Deletion(b) | VcfAllele::Insertion(b) => b.len(),
            _ => return VariantKind::Other,
        };

        if alt_len == ref_len {
            VariantKind::Substitution
        } else if alt_len > ref_len {
            VariantKind::Insertion
        } else {
            VariantKind::Deletion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_missing() {
        assert_eq!(parse_allele(".").unwrap(), VcfAllele::Missing);
        assert_eq!(parse_allele(".").unwrap().to_vcf_string(), ".");
    }

    #[test]
    fn test_parse_symbolic() {
        assert_eq!(
            parse_allele("<DEL>").unwrap(),
            VcfAllele::Symbolic("DEL".to_string())
        );
        assert_eq!(
            parse_allele("<DUP:TANDEM>").unwrap(),
            VcfAllele::Symbolic("DUP:TANDEM".to_string())
        );
        assert_eq!(parse_allele("<DEL>").unwrap().to_vcf_string(), "<DEL>");
    }

    #[test]
    fn test_parse_bases_case_preserved() {
        assert_eq!(
            parse_allele("AcGtN").unwrap(),
            VcfAllele::Bases("AcGtN".to_string())
        );
        assert_eq!(parse_allele("AcGtN").unwrap().to_vcf_string(), "AcGtN");
    }

    #[test]
    fn test_parse_bases_shorter_than_ref_still_bases() {
        // Deletions are written as a shorter alt; the parser keeps them as Bases
        let reference = parse_allele("GTC").unwrap();
        let alt = parse_allele("G").unwrap();
        assert_eq!(alt, VcfAllele::Bases("G".to_string()));
        assert_eq!(VariantKind::classify(&reference, &alt), VariantKind::Deletion);
    }

    #[test]
    fn test_parse_breakend_forms() {
        for token in ["G]17:198982]", "]13:123456]T", "C[2:321682[", "[17:198983[A"] {
            let allele = parse_allele(token).unwrap();
            assert!(matches!(allele, VcfAllele::Breakend(_)), "{}", token);
            assert_eq!(allele.to_vcf_string(), token);
        }
    }

    #[test]
    fn test_parse_breakend_fields() {
        let allele = parse_allele("G]17:198982]").unwrap();
        match allele {
            VcfAllele::Breakend(bnd) => {
                assert_eq!(bnd.leading_bases, "G");
                assert_eq!(bnd.orientation, BreakendOrientation::Left);
                assert_eq!(bnd.mate_contig, "17");
                assert_eq!(bnd.mate_position, 198982);
                assert_eq!(bnd.trailing_bases, "");
            }
            other => panic!("expected breakend, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        for token in ["123", "", "<>", "A]17]", "A]17:xyz]", "[:5[A", "ACGU", "A[1:2]"] {
            let err = parse_allele(token).unwrap_err();
            assert_eq!(err.token, token);
        }
    }

    #[test]
    fn test_variant_kind() {
        let a = |s: &str| parse_allele(s).unwrap();
        assert_eq!(VariantKind::classify(&a("A"), &a("G")), VariantKind::Substitution);
        assert_eq!(VariantKind::classify(&a("AT"), &a("GC")), VariantKind::Substitution);
        assert_eq!(VariantKind::classify(&a("A"), &a("ATG")), VariantKind::Insertion);
        assert_eq!(VariantKind::classify(&a("ATG"), &a("A")), VariantKind::Deletion);
        assert_eq!(VariantKind::classify(&a("A"), &a("<DEL>")), VariantKind::Other);
    }

    #[test]
    fn test_explicit_indel_variants_roundtrip() {
        assert_eq!(VcfAllele::Deletion("A".to_string()).to_vcf_string(), "A");
        assert_eq!(VcfAllele::Insertion("ATG".to_string()).to_vcf_string(), "ATG");
    }

    #[test]
    fn test_structural_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(parse_allele("<DEL>").unwrap());
        set.insert(parse_allele("<DEL>").unwrap());
        assert_eq!(set.len(), 1);
    }
}
