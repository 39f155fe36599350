//! Property-based tests for the allele model
//!
//! For every token the parser accepts, formatting the parsed allele must
//! reproduce the token exactly.

use proptest::prelude::*;
use vcf_codec::formats::vcf::{parse_allele, VcfAllele};

/// Generate a run of allele bases, mixed case
fn arb_bases() -> impl Strategy<Value = String> {
    "[ACGTNacgtn]{1,8}"
}

/// Generate a symbolic allele token
fn arb_symbolic() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<DEL>".to_string()),
        Just("<INS>".to_string()),
        Just("<DUP:TANDEM>".to_string()),
        "[A-Z]{2,6}".prop_map(|id| format!("<{}>", id)),
    ]
}

/// Generate a breakend token in any of the four bracket forms
fn arb_breakend() -> impl Strategy<Value = String> {
    (
        "[ACGT]{1,3}",
        "(chr)?[0-9]{1,2}",
        1i64..1_000_000,
        0usize..4,
    )
        .prop_map(|(bases, contig, pos, form)| match form {
            0 => format!("{}[{}:{}[", bases, contig, pos),
            1 => format!("{}]{}:{}]", bases, contig, pos),
            2 => format!("[{}:{}[{}", contig, pos, bases),
            _ => format!("]{}:{}]{}", contig, pos, bases),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: bases tokens round trip with case preserved
    #[test]
    fn prop_bases_roundtrip(token in arb_bases()) {
        let allele = parse_allele(&token).unwrap();
        prop_assert!(matches!(allele, VcfAllele::Bases(_)));
        prop_assert_eq!(allele.to_vcf_string(), token);
    }

    /// Property: symbolic tokens round trip
    #[test]
    fn prop_symbolic_roundtrip(token in arb_symbolic()) {
        let allele = parse_allele(&token).unwrap();
        prop_assert!(matches!(allele, VcfAllele::Symbolic(_)));
        prop_assert_eq!(allele.to_vcf_string(), token);
    }

    /// Property: breakend tokens round trip in all four orientations
    #[test]
    fn prop_breakend_roundtrip(token in arb_breakend()) {
        let allele = parse_allele(&token).unwrap();
        prop_assert!(matches!(allele, VcfAllele::Breakend(_)));
        prop_assert_eq!(allele.to_vcf_string(), token);
    }

    /// Property: non-grammar tokens always fail, never panic
    #[test]
    fn prop_garbage_is_rejected(token in "[0-9+*#@ ]{1,10}") {
        prop_assert!(parse_allele(&token).is_err());
    }
}

#[test]
fn test_classification_corpus() {
    assert_eq!(parse_allele(".").unwrap(), VcfAllele::Missing);
    assert_eq!(
        parse_allele("<DEL>").unwrap(),
        VcfAllele::Symbolic("DEL".to_string())
    );
    assert_eq!(
        parse_allele("ACGT").unwrap(),
        VcfAllele::Bases("ACGT".to_string())
    );
    let err = parse_allele("123").unwrap_err();
    assert_eq!(err.token, "123");
}
