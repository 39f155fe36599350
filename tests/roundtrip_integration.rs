//! Full-file round-trip integration tests
//!
//! Parses a complete VCF document (header plus data) and rewrites every
//! line, expecting the original text byte for byte.

use vcf_codec::formats::vcf::{parse_vcf_str, write_data_lines, GenotypeAllele};
use vcf_codec::DataError;

/// A 22-header-line document in the shape of the VCF 4.2 specification
/// example: simple lines, structured lines with quoted commas, a generic
/// passthrough line, and five data lines exercising multi-allelic records,
/// zero-alt records and truncated sample columns.
const FIXTURE: &str = "\
##fileformat=VCFv4.2
##fileDate=20090805
##source=myImputationProgramV3.1
##reference=file:///seq/references/1000GenomesPilot-NCBI36.fasta
##contig=<ID=20,length=62435964,assembly=B36,md5=f126cdf8a6e0c7f379d618ff66beb2da,species=\"Homo sapiens\",taxonomy=x>
##phasing=partial
##INFO=<ID=NS,Number=1,Type=Integer,Description=\"Number of Samples With Data\">
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">
##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele Frequency\">
##INFO=<ID=AA,Number=1,Type=String,Description=\"Ancestral Allele\">
##INFO=<ID=DB,Number=0,Type=Flag,Description=\"dbSNP membership, build 129\">
##INFO=<ID=H2,Number=0,Type=Flag,Description=\"HapMap2 membership\">
##FILTER=<ID=q10,Description=\"Quality below 10\">
##FILTER=<ID=s50,Description=\"Less than 50% of samples have data\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype Quality\">
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read Depth\">
##FORMAT=<ID=HQ,Number=2,Type=Integer,Description=\"Haplotype Quality\">
##ALT=<ID=DEL,Description=\"Deletion\">
##SAMPLE=<ID=NA00001,Genomes=Germline>
##pedigreeDB=http://example.org/pedigrees
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA00001\tNA00002\tNA00003
20\t14370\trs6054257\tG\tA\t29\tPASS\tNS=3;DP=14;AF=0.5;DB;H2\tGT:GQ:DP:HQ\t0|0:48:1:51,51\t1|0:48:8:51,51\t1/1:43:5:.,.
20\t17330\t.\tT\tA\t3\tq10\tNS=3;DP=11;AF=0.017\tGT:GQ:DP:HQ\t0|0:49:3:58,50\t0|1:3:5:65,3\t0/0:41:3
20\t1110696\trs6040355\tA\tG,T\t67\tPASS\tNS=2;DP=10;AF=0.333,0.667;AA=T;DB\tGT:GQ:DP:HQ\t1|2:21:6:23,27\t2|1:2:0:18,2\t2/2:35:4
20\t1230237\t.\tT\t.\t47\tPASS\tNS=3;DP=13;AA=T\tGT:GQ:DP:HQ\t0|0:54:7:56,60\t0|0:48:4:51,51\t0/0:61:2
20\t1234567\tmicrosat1\tGTC\tG,GTCT\t50\tPASS\tNS=3;DP=9;AA=G\tGT:GQ:DP\t0/1:35:4\t0/2:17:2\t1/1:40:3
";

#[test]
fn test_full_file_roundtrip_byte_for_byte() {
    let (metadata, positions) = parse_vcf_str(FIXTURE).unwrap();

    let mut lines = metadata.to_vcf_lines();
    lines.extend(positions.iter().map(|p| p.to_vcf_string()));

    let mut rewritten = lines.join("\n");
    rewritten.push('\n');
    assert_eq!(rewritten, FIXTURE);
}

#[test]
fn test_header_facts() {
    let (metadata, positions) = parse_vcf_str(FIXTURE).unwrap();

    assert_eq!(metadata.version(), "4.2");
    assert_eq!(metadata.sample_names(), &["NA00001", "NA00002", "NA00003"]);
    assert_eq!(metadata.lines_processed(), 22);
    assert_eq!(metadata.lines().len(), 21);
    assert_eq!(positions.len(), 5);
}

#[test]
fn test_cross_entity_sample_consistency() {
    // The model itself never enforces this; the layer holding both objects
    // does, which is exactly what this test is.
    let (metadata, positions) = parse_vcf_str(FIXTURE).unwrap();
    for position in &positions {
        assert_eq!(position.samples.len(), metadata.sample_names().len());
    }
}

#[test]
fn test_parallel_writer_matches_sequential() {
    let (_, positions) = parse_vcf_str(FIXTURE).unwrap();
    let sequential: Vec<String> = positions.iter().map(|p| p.to_vcf_string()).collect();
    assert_eq!(write_data_lines(&positions), sequential);
}

#[test]
fn test_genotype_dereference_against_record() {
    let (_, positions) = parse_vcf_str(FIXTURE).unwrap();

    // Multi-allelic record: genotype 1|2 dereferences into both alts
    let multi = &positions[2];
    let genotype = multi.genotype(0).unwrap().unwrap();
    assert_eq!(genotype.encode(), "1|2");
    let alleles: Vec<String> = genotype
        .calls()
        .iter()
        .map(|call| multi.allele(*call).unwrap().unwrap().to_vcf_string())
        .collect();
    assert_eq!(alleles, vec!["G", "T"]);

    // An index beyond the alt list fails only when dereferenced
    let single = &positions[0];
    assert_eq!(
        single.allele(GenotypeAllele::Index(2)).unwrap_err(),
        DataError::AlleleIndexOutOfRange { index: 2, alt_count: 1 }
    );
}

#[test]
fn test_negative_position_tolerated() {
    let text = "\
##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
20\t-1\t.\tA\tG\t.\tPASS\t.
";
    let (_, positions) = parse_vcf_str(text).unwrap();
    assert_eq!(positions[0].locus.position, -1);
    assert_eq!(positions[0].to_vcf_string(), "20\t-1\t.\tA\tG\t.\tPASS\t.");
}

#[test]
fn test_truncated_sample_column_roundtrip() {
    // Data line 2 truncates NA00003's HQ field; the rewrite keeps it short
    let (_, positions) = parse_vcf_str(FIXTURE).unwrap();
    let truncated = &positions[1];
    assert_eq!(truncated.samples[2].len(), 3);
    assert_eq!(truncated.format.len(), 4);
    assert!(truncated.to_vcf_string().ends_with("0/0:41:3"));
}
