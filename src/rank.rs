//! Ranked records and their ordering.
//!
//! Records sort by descending hit count, then by evidence strength, then by
//! ascending hit sample list. SNP-style evidence is summed as alternate and
//! depth totals; SV-style evidence as SU, PE and SR totals. When a SNP-style
//! record meets an SV-style one, SV totals are compared against the SNP
//! alternate total directly.

use std::cmp::Ordering;
use std::fmt;

/// Which support format a record's hits carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKind {
    /// `AO/DP` per hit (SNP and BOTH records).
    Ratio,
    /// `SUx/PEy/SRz` per hit (SV records).
    Coded,
}

/// Support shown for one hit sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSupport {
    Ratio { alt: u64, depth: u64 },
    /// Terms whose threshold is zero are left out.
    Coded {
        su: Option<u64>,
        pe: Option<u64>,
        sr: Option<u64>,
    },
}

impl fmt::Display for HitSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitSupport::Ratio { alt, depth } => write!(f, "{alt}/{depth}"),
            HitSupport::Coded { su, pe, sr } => {
                let terms: Vec<String> = [("SU", su), ("PE", pe), ("SR", sr)]
                    .into_iter()
                    .filter_map(|(code, value)| value.map(|v| format!("{code}{v}")))
                    .collect();
                f.write_str(&terms.join("/"))
            }
        }
    }
}

/// Totals used by the comparator, computed once per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RankMetrics {
    Snp { alt: u64, depth: u64 },
    Sv { su: u64, pe: u64, sr: u64, both: u64 },
}

impl RankMetrics {
    fn from_support(kind: EvidenceKind, support: &[HitSupport]) -> Self {
        match kind {
            EvidenceKind::Ratio => {
                let (mut alt, mut depth) = (0u64, 0u64);
                for hit in support {
                    if let HitSupport::Ratio { alt: a, depth: d } = hit {
                        alt = alt.saturating_add(*a);
                        depth = depth.saturating_add(*d);
                    }
                }
                RankMetrics::Snp { alt, depth }
            }
            EvidenceKind::Coded => {
                let (mut su, mut pe, mut sr, mut both) = (0u64, 0u64, 0u64, 0u64);
                for hit in support {
                    if let HitSupport::Coded { su: u, pe: p, sr: s } = hit {
                        let (u, p, s) = (u.unwrap_or(0), p.unwrap_or(0), s.unwrap_or(0));
                        su = su.saturating_add(u);
                        pe = pe.saturating_add(p);
                        sr = sr.saturating_add(s);
                        if p > 0 && s > 0 {
                            both = both.saturating_add(p.saturating_add(s));
                        }
                    }
                }
                RankMetrics::Sv { su, pe, sr, both }
            }
        }
    }
}

/// A record that passed filtering, with its output annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    summary: String,
    hit_count: usize,
    hits: Vec<String>,
    sample_list: String,
    support: Vec<HitSupport>,
    kind: EvidenceKind,
    row: String,
    metrics: RankMetrics,
}

impl RankedRecord {
    /// Assemble a ranked record.
    ///
    /// `summary` is the full pass summary text, hit count included.
    pub fn new(
        hit_count: usize,
        summary: String,
        hits: Vec<String>,
        support: Vec<HitSupport>,
        kind: EvidenceKind,
        row: String,
    ) -> Self {
        let metrics = RankMetrics::from_support(kind, &support);
        let sample_list = hits.join(",");
        Self {
            summary,
            hit_count,
            hits,
            sample_list,
            support,
            kind,
            row,
            metrics,
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn hits(&self) -> &[String] {
        &self.hits
    }

    pub fn support(&self) -> &[HitSupport] {
        &self.support
    }

    pub fn kind(&self) -> EvidenceKind {
        self.kind
    }

    /// The original VCF data line.
    pub fn row(&self) -> &str {
        &self.row
    }

    /// Comma-joined hit sample names.
    pub fn sample_list(&self) -> &str {
        &self.sample_list
    }

    /// Comma-joined per-hit support.
    pub fn support_list(&self) -> String {
        self.support
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Alternate over depth totals, zero without depth.
    pub fn support_ratio(&self) -> Option<f64> {
        match self.metrics {
            RankMetrics::Snp { alt, depth } => Some(ratio(alt, depth)),
            RankMetrics::Sv { .. } => None,
        }
    }

    /// The output line: three annotation columns then the original row.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.summary,
            self.support_list(),
            self.sample_list,
            self.row
        )
    }
}

fn ratio(alt: u64, depth: u64) -> f64 {
    if depth == 0 {
        0.0
    } else {
        alt as f64 / depth as f64
    }
}

/// Order two ranked records, strongest first.
pub fn compare_ranked(a: &RankedRecord, b: &RankedRecord) -> Ordering {
    b.hit_count
        .cmp(&a.hit_count)
        .then_with(|| compare_metrics(&a.metrics, &b.metrics))
        .then_with(|| a.sample_list.cmp(&b.sample_list))
}

/// Descending comparison of evidence totals.
fn compare_metrics(a: &RankMetrics, b: &RankMetrics) -> Ordering {
    match (a, b) {
        (
            RankMetrics::Snp { alt: a_alt, depth: a_depth },
            RankMetrics::Snp { alt: b_alt, depth: b_depth },
        ) => ratio(*b_alt, *b_depth)
            .total_cmp(&ratio(*a_alt, *a_depth))
            .then_with(|| b_depth.cmp(a_depth)),
        (RankMetrics::Sv { .. }, RankMetrics::Sv { .. }) => sv_keys(b).cmp(&sv_keys(a)),
        (RankMetrics::Sv { .. }, RankMetrics::Snp { alt, .. }) => [*alt; 5].cmp(&mixed_keys(a)),
        (RankMetrics::Snp { alt, .. }, RankMetrics::Sv { .. }) => mixed_keys(b).cmp(&[*alt; 5]),
    }
}

fn sv_keys(metrics: &RankMetrics) -> [u64; 4] {
    match *metrics {
        RankMetrics::Sv { su, pe, sr, both } => [both, su, sr, pe],
        RankMetrics::Snp { .. } => [0; 4],
    }
}

/// SV totals in the order they are weighed against a SNP alternate total.
fn mixed_keys(metrics: &RankMetrics) -> [u64; 5] {
    match *metrics {
        RankMetrics::Sv { su, pe, sr, both } => {
            let dominant = if su != 0 { su } else { sr.saturating_add(pe) };
            [dominant, both, su, sr, pe]
        }
        RankMetrics::Snp { .. } => [0; 5],
    }
}

/// Sort records into output order. Equal records keep their input order.
///
/// SNP and SV records compared against each other do not form a total
/// order, so this uses a plain merge sort that never checks consistency.
pub fn sort_ranked(records: &mut Vec<RankedRecord>) {
    let unsorted = std::mem::take(records);
    *records = merge_sort(unsorted, &mut compare_ranked);
}

/// Stable top-down merge sort.
fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // the left run wins ties
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snp(hits: &[&str], support: &[(u64, u64)]) -> RankedRecord {
        let support = support
            .iter()
            .map(|&(alt, depth)| HitSupport::Ratio { alt, depth })
            .collect();
        build(hits, support, EvidenceKind::Ratio)
    }

    fn sv(hits: &[&str], support: &[(u64, u64, u64)]) -> RankedRecord {
        let support = support
            .iter()
            .map(|&(su, pe, sr)| HitSupport::Coded {
                su: Some(su),
                pe: Some(pe),
                sr: Some(sr),
            })
            .collect();
        build(hits, support, EvidenceKind::Coded)
    }

    fn build(hits: &[&str], support: Vec<HitSupport>, kind: EvidenceKind) -> RankedRecord {
        let hits: Vec<String> = hits.iter().map(|s| s.to_string()).collect();
        RankedRecord::new(
            hits.len(),
            format!("{},TEST>=0", hits.len()),
            hits,
            support,
            kind,
            "row".to_string(),
        )
    }

    fn sorted_lists(mut records: Vec<RankedRecord>) -> Vec<String> {
        sort_ranked(&mut records);
        records.iter().map(|r| r.support_list()).collect()
    }

    #[test]
    fn test_support_display() {
        assert_eq!(HitSupport::Ratio { alt: 8, depth: 10 }.to_string(), "8/10");
        let coded = HitSupport::Coded {
            su: Some(5),
            pe: None,
            sr: Some(2),
        };
        assert_eq!(coded.to_string(), "SU5/SR2");
        let empty = HitSupport::Coded {
            su: None,
            pe: None,
            sr: None,
        };
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_more_hits_first() {
        let one = snp(&["a"], &[(10, 10)]);
        let two = snp(&["a", "b"], &[(1, 10), (1, 10)]);
        assert_eq!(compare_ranked(&two, &one), Ordering::Less);
        assert_eq!(compare_ranked(&one, &two), Ordering::Greater);
    }

    #[test]
    fn test_snp_ratio_then_depth() {
        let high = snp(&["a"], &[(8, 10)]);
        let low = snp(&["a"], &[(5, 10)]);
        assert_eq!(compare_ranked(&high, &low), Ordering::Less);

        let deep = snp(&["a"], &[(16, 20)]);
        assert_eq!(compare_ranked(&deep, &high), Ordering::Less);
        assert_eq!(
            sorted_lists(vec![low, high, deep]),
            vec!["16/20", "8/10", "5/10"]
        );
    }

    #[test]
    fn test_zero_depth_ratio_is_zero() {
        let record = snp(&["a"], &[(0, 0)]);
        assert_eq!(record.support_ratio(), Some(0.0));
    }

    #[test]
    fn test_sv_ordering() {
        // both-support first: hits with PE and SR both nonzero
        let paired = sv(&["a"], &[(4, 2, 2)]);
        let split_only = sv(&["a"], &[(9, 0, 9)]);
        assert_eq!(compare_ranked(&paired, &split_only), Ordering::Less);

        // then SU
        let more_su = sv(&["a"], &[(6, 2, 2)]);
        assert_eq!(compare_ranked(&more_su, &paired), Ordering::Less);

        // then SR before PE
        let more_sr = sv(&["a"], &[(4, 1, 3)]);
        let more_pe = sv(&["a"], &[(4, 3, 1)]);
        assert_eq!(compare_ranked(&more_sr, &more_pe), Ordering::Less);
    }

    #[test]
    fn test_mixed_modes_compare_against_alt_total() {
        let sv_record = sv(&["a"], &[(6, 3, 3)]);
        let weak_snp = snp(&["b"], &[(5, 5)]);
        let strong_snp = snp(&["b"], &[(7, 8)]);
        assert_eq!(compare_ranked(&sv_record, &weak_snp), Ordering::Less);
        assert_eq!(compare_ranked(&weak_snp, &sv_record), Ordering::Greater);
        assert_eq!(compare_ranked(&strong_snp, &sv_record), Ordering::Less);
    }

    #[test]
    fn test_mixed_dominant_falls_back_to_split_plus_pairs() {
        let sv_record = build(
            &["a"],
            vec![HitSupport::Coded {
                su: None,
                pe: Some(3),
                sr: Some(4),
            }],
            EvidenceKind::Coded,
        );
        let snp_record = snp(&["b"], &[(6, 6)]);
        assert_eq!(compare_ranked(&sv_record, &snp_record), Ordering::Less);
    }

    #[test]
    fn test_mixed_tie_breaks_on_both_support() {
        // dominant 4 == alt 4, both 4 == alt 4, su 4 == 4, sr 2 < 4
        let sv_record = sv(&["a"], &[(4, 2, 2)]);
        let snp_record = snp(&["b"], &[(4, 9)]);
        assert_eq!(compare_ranked(&snp_record, &sv_record), Ordering::Less);
    }

    #[test]
    fn test_sample_list_breaks_ties() {
        let first = snp(&["a", "b"], &[(5, 10), (5, 10)]);
        let second = snp(&["a", "c"], &[(5, 10), (5, 10)]);
        assert_eq!(compare_ranked(&first, &second), Ordering::Less);
        assert_eq!(compare_ranked(&first, &first.clone()), Ordering::Equal);
    }

    #[test]
    fn test_resort_is_stable() {
        let mut records = vec![
            snp(&["a"], &[(5, 10)]),
            sv(&["a", "b"], &[(3, 1, 2), (3, 1, 2)]),
            snp(&["b"], &[(8, 10)]),
            snp(&["a", "c"], &[(2, 2), (9, 10)]),
        ];
        sort_ranked(&mut records);
        let once = records.clone();
        sort_ranked(&mut records);
        assert_eq!(records, once);
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd'), (1, 'e')];
        let sorted = merge_sort(pairs, &mut |a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
        assert_eq!(sorted, vec![(0, 'd'), (1, 'b'), (1, 'e'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_mixed_cycle_sorts_without_panic() {
        // 3/3 beats 5/10 by ratio, SU4 beats 3/3, 5/10 beats SU4
        let high_ratio = snp(&["a"], &[(3, 3)]);
        let low_ratio = snp(&["a"], &[(5, 10)]);
        let sv_record = sv(&["a"], &[(4, 0, 0)]);
        assert_eq!(compare_ranked(&high_ratio, &low_ratio), Ordering::Less);
        assert_eq!(compare_ranked(&sv_record, &high_ratio), Ordering::Less);
        assert_eq!(compare_ranked(&low_ratio, &sv_record), Ordering::Less);

        let mut records: Vec<RankedRecord> = (0..30)
            .map(|i| match i % 3 {
                0 => low_ratio.clone(),
                1 => sv_record.clone(),
                _ => high_ratio.clone(),
            })
            .collect();
        records.push(snp(&["a", "b"], &[(1, 10), (1, 10)]));
        sort_ranked(&mut records);

        assert_eq!(records.len(), 31);
        assert_eq!(records[0].hit_count(), 2);
        assert!(records[1..].iter().all(|r| r.hit_count() == 1));
    }

    #[test]
    fn test_huge_counts_saturate() {
        let snp_record = snp(&["a", "b"], &[(u64::MAX, u64::MAX), (5, 5)]);
        assert_eq!(snp_record.support_ratio(), Some(1.0));

        let sv_record = sv(&["a", "b"], &[(u64::MAX, u64::MAX, 1), (1, 1, 1)]);
        let other = sv(&["a", "b"], &[(1, 1, 1), (1, 1, 1)]);
        assert_eq!(compare_ranked(&sv_record, &other), Ordering::Less);
        // SR 2 falls short of the saturated alternate total
        assert_eq!(compare_ranked(&snp_record, &sv_record), Ordering::Less);
    }

    #[test]
    fn test_to_line() {
        let record = snp(&["S1", "S2"], &[(8, 10), (3, 4)]);
        assert_eq!(record.to_line(), "2,TEST>=0\t8/10,3/4\tS1,S2\trow");
    }
}
