//! Paired sample group difference rule.
//!
//! A pair of groups "differs" on a record when enough members of one group
//! are hits while too few of the other group's adequately covered members
//! are.

use std::collections::HashSet;
use std::fmt;

/// A named set of samples with its difference minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGroup {
    names: Vec<String>,
    min_diff: usize,
}

impl SampleGroup {
    pub fn new(names: Vec<String>, min_diff: usize) -> Self {
        Self { names, min_diff }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn min_diff(&self) -> usize {
        self.min_diff
    }

    /// Returns true if the minimum requires more than half of the members.
    pub fn is_majority(&self) -> bool {
        self.min_diff * 2 > self.names.len()
    }

    fn count_in(&self, set: &HashSet<&str>) -> usize {
        self.names.iter().filter(|n| set.contains(n.as_str())).count()
    }
}

/// Two groups compared against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPair {
    first: SampleGroup,
    second: SampleGroup,
}

impl GroupPair {
    pub fn new(first: SampleGroup, second: SampleGroup) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &SampleGroup {
        &self.first
    }

    pub fn second(&self) -> &SampleGroup {
        &self.second
    }

    /// Every sample name mentioned by either group.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.first
            .names
            .iter()
            .chain(self.second.names.iter())
            .map(String::as_str)
    }

    /// Test the pair against one record's hits.
    ///
    /// `adequate` holds the samples whose depth is sufficient to trust a
    /// non-hit. `pair_number` is 1-based and only labels the note.
    pub fn evaluate(
        &self,
        pair_number: usize,
        hits: &HashSet<&str>,
        adequate: &HashSet<&str>,
    ) -> Option<GroupRuleNote> {
        if differs(&self.first, &self.second, hits, adequate) {
            Some(GroupRuleNote::new(pair_number, &self.first, &self.second))
        } else if differs(&self.second, &self.first, hits, adequate) {
            Some(GroupRuleNote::new(pair_number, &self.second, &self.first))
        } else {
            None
        }
    }
}

/// `hit_group` has enough hits while `ref_group` has enough covered members
/// yet too few covered hits.
fn differs(
    hit_group: &SampleGroup,
    ref_group: &SampleGroup,
    hits: &HashSet<&str>,
    adequate: &HashSet<&str>,
) -> bool {
    if hit_group.count_in(hits) < hit_group.min_diff {
        return false;
    }

    let covered: Vec<&str> = ref_group
        .names
        .iter()
        .map(String::as_str)
        .filter(|n| adequate.contains(n))
        .collect();
    let covered_hits = covered.iter().filter(|n| hits.contains(*n)).count();

    covered.len() >= ref_group.min_diff && covered_hits < ref_group.min_diff
}

/// Annotation describing a group pair that passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRuleNote {
    pub pair: usize,
    pub hit_names: Vec<String>,
    pub hit_min: usize,
    pub ref_names: Vec<String>,
    pub ref_min: usize,
}

impl GroupRuleNote {
    fn new(pair: usize, hit_group: &SampleGroup, ref_group: &SampleGroup) -> Self {
        Self {
            pair,
            hit_names: hit_group.names.clone(),
            hit_min: hit_group.min_diff,
            ref_names: ref_group.names.clone(),
            ref_min: ref_group.min_diff,
        }
    }
}

impl fmt::Display for GroupRuleNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GROUPRULEPAIR{}[SET({})>={} DIFFERS FROM SET({})>={}]",
            self.pair,
            self.hit_names.join(","),
            self.hit_min,
            self.ref_names.join(","),
            self.ref_min
        )
    }
}
