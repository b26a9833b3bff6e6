//! Parser for previously ranked output, using chumsky.
//!
//! A ranked line starts with three annotation columns:
//! - the pass summary, e.g. `2,MINDEPTH>=2,MINSUPPORTRATIO>=0.7,GROUPRULEPAIR1[SET(a,b)>=2 DIFFERS FROM SET(c)>=1]`
//! - the support list, e.g. `8/10,9/12` or `SU5/PE2/SR3,SU4/PE1/SR3`
//! - the hit sample list, e.g. `a,b`
//!
//! Reading these back lets ranked files be re-sorted without re-filtering.

use std::fmt::Display;
use std::str::FromStr;

use chumsky::prelude::*;

use crate::error::{Result, VcfCompareError};
use crate::group::GroupRuleNote;
use crate::rank::{EvidenceKind, HitSupport, RankedRecord};

/// One `NAME>=value` entry of a pass summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub name: String,
    pub value: String,
}

/// A parsed pass summary column.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    pub hit_count: usize,
    pub criteria: Vec<Criterion>,
    pub group_rules: Vec<GroupRuleNote>,
}

impl PassSummary {
    /// Evidence kind implied by the criteria names, if any are known.
    pub fn evidence_kind(&self) -> Option<EvidenceKind> {
        let has = |name: &str| self.criteria.iter().any(|c| c.name == name);
        if has("MINDEPTH") || has("MINSUPPORTRATIO") {
            Some(EvidenceKind::Ratio)
        } else if has("MINSVREADS") || has("MINDISCORDANTS") || has("MINSPLITS") {
            Some(EvidenceKind::Coded)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
enum SummaryItem {
    Criterion(Criterion),
    GroupRule(GroupRuleNote),
}

#[derive(Debug, Clone, Copy)]
enum CodedTerm {
    Su,
    Pe,
    Sr,
}

/// Unsigned integer literal.
fn number<T>() -> impl Parser<char, T, Error = Simple<char>> + Clone
where
    T: FromStr,
    T::Err: Display,
{
    text::int(10).try_map(|s: String, span| {
        s.parse::<T>()
            .map_err(|e| Simple::custom(span, e.to_string()))
    })
}

/// Create the pass summary parser.
pub fn summary_parser() -> impl Parser<char, PassSummary, Error = Simple<char>> {
    // Threshold value, integer or decimal
    let decimal = text::int(10)
        .chain::<char, _, _>(just('.').chain(text::digits(10)).or_not().flatten())
        .collect::<String>();

    // NAME>=value
    let criterion = filter(|c: &char| c.is_ascii_uppercase())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .then_ignore(just(">="))
        .then(decimal)
        .map(|(name, value)| Criterion { name, value });

    // SET(a,b)>=n
    let sample_name = filter(|c: &char| *c != ',' && *c != ')')
        .repeated()
        .at_least(1)
        .collect::<String>();
    let set = just("SET(")
        .ignore_then(sample_name.separated_by(just(',')).at_least(1))
        .then_ignore(just(")>="))
        .then(number::<usize>());

    // GROUPRULEPAIRn[SET(..)>=n DIFFERS FROM SET(..)>=n]
    let group_rule = just("GROUPRULEPAIR")
        .ignore_then(number::<usize>())
        .then(
            set.clone()
                .then_ignore(just(" DIFFERS FROM "))
                .then(set)
                .delimited_by(just('['), just(']')),
        )
        .map(
            |(pair, ((hit_names, hit_min), (ref_names, ref_min)))| GroupRuleNote {
                pair,
                hit_names,
                hit_min,
                ref_names,
                ref_min,
            },
        );

    let item = choice((
        group_rule.map(SummaryItem::GroupRule),
        criterion.map(SummaryItem::Criterion),
    ));

    number::<usize>()
        .then(just(',').ignore_then(item).repeated())
        .then_ignore(end())
        .map(|(hit_count, items)| {
            let mut summary = PassSummary {
                hit_count,
                criteria: Vec::new(),
                group_rules: Vec::new(),
            };
            for item in items {
                match item {
                    SummaryItem::Criterion(c) => summary.criteria.push(c),
                    SummaryItem::GroupRule(g) => summary.group_rules.push(g),
                }
            }
            summary
        })
}

/// Create the parser for a single hit's support token.
pub fn support_parser() -> impl Parser<char, HitSupport, Error = Simple<char>> {
    // AO/DP
    let ratio = number::<u64>()
        .then_ignore(just('/'))
        .then(number::<u64>())
        .map(|(alt, depth)| HitSupport::Ratio { alt, depth });

    // SUx/PEy/SRz, any subset, possibly empty
    let term = choice((
        just("SU").to(CodedTerm::Su),
        just("PE").to(CodedTerm::Pe),
        just("SR").to(CodedTerm::Sr),
    ))
    .then(number::<u64>());
    let coded = term.separated_by(just('/')).map(|terms| {
        let (mut su, mut pe, mut sr) = (None, None, None);
        for (code, value) in terms {
            match code {
                CodedTerm::Su => su = Some(value),
                CodedTerm::Pe => pe = Some(value),
                CodedTerm::Sr => sr = Some(value),
            }
        }
        HitSupport::Coded { su, pe, sr }
    });

    choice((ratio, coded)).then_ignore(end())
}

fn join_errors(errs: Vec<Simple<char>>) -> String {
    errs.into_iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a pass summary column.
pub fn parse_pass_summary(raw: &str) -> Result<PassSummary> {
    summary_parser().parse(raw).map_err(|errs| {
        VcfCompareError::SummaryParseError(format!("summary {raw:?}: {}", join_errors(errs)))
    })
}

/// Parse a comma-separated support column.
pub fn parse_support_list(raw: &str) -> Result<Vec<HitSupport>> {
    let parser = support_parser();
    raw.split(',')
        .map(|token| {
            parser.parse(token).map_err(|errs| {
                VcfCompareError::SummaryParseError(format!(
                    "support {token:?}: {}",
                    join_errors(errs)
                ))
            })
        })
        .collect()
}

impl RankedRecord {
    /// Read a line of ranked output back into a record.
    ///
    /// The evidence kind comes from the criteria names in the summary,
    /// falling back to the shape of the support tokens.
    pub fn from_ranked_line(line: &str) -> Result<RankedRecord> {
        let mut columns = line.splitn(4, '\t');
        let (Some(summary), Some(support), Some(samples), Some(row)) =
            (columns.next(), columns.next(), columns.next(), columns.next())
        else {
            return Err(VcfCompareError::SummaryParseError(
                "expected three annotation columns before the record".to_string(),
            ));
        };

        let summary_text = summary.to_string();
        let summary = parse_pass_summary(summary)?;
        let support = parse_support_list(support)?;
        let hits: Vec<String> = if samples.is_empty() {
            Vec::new()
        } else {
            samples.split(',').map(str::to_string).collect()
        };

        let kind = summary.evidence_kind().unwrap_or_else(|| {
            if support.iter().any(|s| matches!(s, HitSupport::Coded { .. })) {
                EvidenceKind::Coded
            } else {
                EvidenceKind::Ratio
            }
        });

        Ok(RankedRecord::new(
            summary.hit_count,
            summary_text,
            hits,
            support,
            kind,
            row.to_string(),
        ))
    }
}
