//! End-to-end ranking of literal VCF text.

use pretty_assertions::assert_eq;
use vcf_sample_compare::{Criteria, CriteriaOptions, GlobalMode, RankEngine, RankedFile};

const HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\tS3";

fn engine(options: CriteriaOptions) -> RankEngine {
    RankEngine::new(Criteria::from_options(options).unwrap())
}

fn vcf(rows: &[&str]) -> String {
    let mut text = format!("##fileformat=VCFv4.2\n{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

fn output(ranked: &RankedFile) -> Vec<String> {
    let mut out = Vec::new();
    ranked.write_to(&mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn positions(ranked: &RankedFile) -> Vec<String> {
    ranked
        .records()
        .iter()
        .map(|r| r.row().split('\t').nth(1).unwrap().to_string())
        .collect()
}

#[test]
fn test_single_hit_scenario() {
    let engine = engine(CriteriaOptions {
        min_support_ratio: 0.5,
        min_read_depth: 2,
        ..Default::default()
    });
    let row = "chr1\t100\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:8\t10:1\t.";
    let ranked = engine.rank(vcf(&[row]).lines());

    assert_eq!(
        output(&ranked),
        vec![
            "##fileformat=VCFv4.2".to_string(),
            "##SEARCHCRITERIA=<Mode=SNP,Criteria=\"MINDEPTH>=2,MINSUPPORTRATIO>=0.5\">".to_string(),
            format!("#NUMHITS,SEARCHCRITERIA\tSNPREAD/DEPTH\tSNPSAMPLES\t{}", &HEADER[1..]),
            format!("1,MINDEPTH>=2,MINSUPPORTRATIO>=0.5\t8/10\tS1\t{row}"),
        ]
    );
}

#[test]
fn test_group_pair_rule() {
    let options = CriteriaOptions {
        sample_groups: vec![
            vec!["S1".to_string(), "S2".to_string()],
            vec!["S3".to_string()],
        ],
        group_diff_mins: vec![2, 1],
        ..Default::default()
    };
    let engine = engine(options);
    let ranked = engine.rank(
        vcf(&[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT:DP:AO\t0/1:10:9\t0/1:12:10\t0/0:10:0",
            "chr1\t200\t.\tA\tG\t50\tPASS\t.\tGT:DP:AO\t0/1:10:9\t0/1:12:10\t1/1:10:10",
            "chr1\t300\t.\tA\tG\t50\tPASS\t.\tGT:DP:AO\t0/0:10:0\t0/0:12:0\t1/1:10:10",
            "chr1\t400\t.\tA\tG\t50\tPASS\t.\tGT:DP:AO\t0/1:10:9\t0/0:12:0\t0/0:10:0",
        ])
        .lines(),
    );

    assert_eq!(positions(&ranked), vec!["100", "300"]);
    assert!(ranked.records()[0]
        .summary()
        .ends_with(",GROUPRULEPAIR1[SET(S1,S2)>=2 DIFFERS FROM SET(S3)>=1]"));
    assert!(ranked.records()[1]
        .summary()
        .ends_with(",GROUPRULEPAIR1[SET(S3)>=1 DIFFERS FROM SET(S1,S2)>=2]"));
}

#[test]
fn test_sv_records_rank_by_paired_support() {
    let engine = engine(CriteriaOptions {
        min_discordants: Some(1),
        min_splits: Some(1),
        ..Default::default()
    });
    let ranked = engine.rank(
        vcf(&[
            "chr2\t100\t.\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL\tGT:SU:PE:SR\t0/1:6:3:3\t0/0:0:0:0\t0/0:0:0:0",
            "chr2\t200\t.\tN\t<DUP>\t.\tPASS\tSVTYPE=DUP\tGT:SU:PE:SR\t0/1:9:5:4\t0/0:0:0:0\t0/0:1:1:0",
            "chr2\t300\t.\tN\t<INV>\t.\tPASS\tSVTYPE=INV\tGT:SU:PE:SR\t0/1:2:1:1\t0/1:2:1:1\t0/0:0:0:0",
        ])
        .lines(),
    );

    assert_eq!(positions(&ranked), vec!["300", "200", "100"]);
    assert_eq!(ranked.records()[1].support_list(), "SU9/PE5/SR4");
    assert_eq!(ranked.global_mode(), GlobalMode::Sv);
}

#[test]
fn test_mixed_file() {
    let engine = engine(CriteriaOptions::default());
    let ranked = engine.rank(
        vcf(&[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:9\t10:0\t10:0",
            "chr2\t200\t.\tN\t<DEL>\t.\tPASS\t.\tSU:PE:SR\t3:2:1\t.\t.",
        ])
        .lines(),
    );

    assert_eq!(ranked.global_mode(), GlobalMode::Mixed);
    assert!(ranked.preamble().iter().any(|l| l.starts_with("##SEARCHCRITERIA=<Mode=MIXED,")));
    // SV thresholds are all zero, so every SV sample is a hit and the record drops
    assert_eq!(positions(&ranked), vec!["100"]);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let engine = engine(CriteriaOptions::default());
    let ranked = engine.rank(
        vcf(&[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT\t0/1\t0/1\t0/0",
            "chr1\t200\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:9",
            "chr1\t300\t.\tA\tG\t50\tPASS\t.\tSU:PE\t1:1\t0:0\t0:0",
            "chr1\t400\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:9\t10:0\t10:9",
        ])
        .lines(),
    );

    assert_eq!(ranked.stats().records, 4);
    assert_eq!(ranked.stats().skipped, 3);
    assert_eq!(positions(&ranked), vec!["400"]);
}

#[test]
fn test_rerank_restores_order() {
    let engine = engine(CriteriaOptions::default());
    let ranked = engine.rank(
        vcf(&[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:7\t10:0\t10:0",
            "chr1\t200\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:9\t10:9\t10:0",
            "chr1\t300\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:10\t10:0\t10:0",
        ])
        .lines(),
    );
    let lines = output(&ranked);

    // shuffle the records, keep the header block in front
    let mut shuffled = lines[..3].to_vec();
    shuffled.extend(lines[3..].iter().rev().cloned());

    let reranked = engine.rerank(shuffled.iter());
    assert_eq!(output(&reranked), lines);
    assert_eq!(positions(&reranked), vec!["200", "300", "100"]);
}

#[test]
fn test_mixed_evidence_cycle_ranks_whole_file() {
    // 3/3 outranks 5/10, SU4 outranks 3/3, and 5/10 outranks SU4
    let engine = engine(CriteriaOptions {
        min_support_ratio: 0.5,
        min_sv_reads: Some(1),
        ..Default::default()
    });
    let mut rows = Vec::new();
    for i in 0..30 {
        let pos = 100 + i;
        rows.push(match i % 3 {
            0 => format!("chr1\t{pos}\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:5\t10:0\t10:0"),
            1 => format!("chr2\t{pos}\t.\tN\t<DEL>\t.\tPASS\t.\tSU:PE:SR\t4:0:0\t0:0:0\t0:0:0"),
            _ => format!("chr3\t{pos}\t.\tA\tG\t50\tPASS\t.\tDP:AO\t3:3\t10:0\t10:0"),
        });
    }
    rows.push("chr4\t1\t.\tA\tG\t50\tPASS\t.\tDP:AO\t10:9\t10:9\t10:0".to_string());
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

    let ranked = engine.rank(vcf(&rows).lines());

    assert_eq!(ranked.global_mode(), GlobalMode::Mixed);
    assert_eq!(ranked.stats().passed, 31);
    assert_eq!(ranked.records()[0].sample_list(), "S1,S2");
    assert!(ranked.records()[1..].iter().all(|r| r.hit_count() == 1));

    let reranked = engine.rerank(output(&ranked).iter());
    assert_eq!(reranked.records().len(), 31);
}
