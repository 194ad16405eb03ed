use log::{debug, info};
use serde::Serialize;
use std::time::SystemTime;

use crate::containers::{BreakendNotation, BreakendRecord, SvType};
use crate::errors::Result;
use crate::notation;
use crate::record_index::RecordSource;
use crate::strand_classifier::orientations_agree;

/// Which criteria a comparison skips
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct MatchPolicy {
    pub ignore_strand: bool,
    pub ignore_partner_pos: bool,
}

impl MatchPolicy {
    /// Insertions have no comparable strand or partner, so only position counts
    pub fn for_svtype(svtype: &SvType) -> Self {
        match svtype {
            SvType::Ins => MatchPolicy {
                ignore_strand: true,
                ignore_partner_pos: true,
            },
            _ => MatchPolicy::default(),
        }
    }
}

/// Outcome for one query record, one line of the match report
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct MatchResult {
    pub id: String,
    pub svtype: SvType,
    pub matched: bool,
}

impl MatchResult {
    pub fn to_tsv_line(&self) -> String {
        format!("{}\t{}\t{}", self.id, self.svtype, self.matched)
    }
}

fn notations_agree(
    query: &BreakendNotation,
    candidate: &BreakendNotation,
    window: i64,
    policy: MatchPolicy,
) -> bool {
    if !policy.ignore_strand && !orientations_agree(query.orientation, candidate.orientation) {
        return false;
    }
    policy.ignore_partner_pos
        || query
            .partner
            .distance(&candidate.partner)
            .is_some_and(|distance| distance <= window)
}

/// Whether `candidate` describes the same breakend as `query`. Position
/// proximity is not checked here, only strand and partner agreement.
///
/// Two insertion-type records always agree, an insertion-type record never
/// matches any other kind. Anything else needs well-formed notation on both
/// sides.
pub fn record_matches(
    query: &BreakendRecord,
    candidate: &BreakendRecord,
    window: i64,
    policy: MatchPolicy,
) -> bool {
    let query_insertion = query.is_insertion_type();
    if query_insertion != candidate.is_insertion_type() {
        return false;
    }
    if query_insertion {
        return true;
    }
    match (query.notation(), candidate.notation()) {
        (Some(query_notation), Some(candidate_notation)) => {
            notations_agree(&query_notation, &candidate_notation, window, policy)
        }
        _ => false,
    }
}

/// Whether any record of `candidates` within `window` bp of the query (both
/// bounds inclusive) matches it. Stops at the first match.
///
/// A query that is not insertion-type must carry well-formed notation.
pub fn matches<S: RecordSource + ?Sized>(
    query: &BreakendRecord,
    candidates: &S,
    window: i64,
    policy: MatchPolicy,
) -> Result<bool> {
    if !query.is_insertion_type() {
        notation::require_notation(&query.alt)?;
    }
    let start = query.locus.pos.saturating_sub(window);
    let end = query.locus.pos.saturating_add(window);
    let found = candidates
        .range_query(&query.locus.chrom, start, end)
        .any(|candidate| record_matches(query, candidate, window, policy));
    Ok(found)
}

/// Match every query record against the target set, each with the policy of its type
pub fn find_matches<Q, T>(queries: &Q, targets: &T, window: i64) -> Result<Vec<MatchResult>>
where
    Q: RecordSource + ?Sized,
    T: RecordSource + ?Sized,
{
    let start_time = SystemTime::now();
    let mut results = Vec::new();
    for query in queries.records() {
        let policy = MatchPolicy::for_svtype(&query.rearrangement_type);
        let matched = matches(query, targets, window, policy)?;
        debug!("{} matched: {}", query, matched);
        results.push(MatchResult {
            id: query.id.clone(),
            svtype: query.rearrangement_type.clone(),
            matched,
        });
    }
    let matched_count = results.iter().filter(|result| result.matched).count();
    info!(
        "{} of {} query records matched within {}bp",
        matched_count,
        results.len(),
        window
    );
    debug!(
        "Breakend matching: {}s",
        start_time.elapsed().map(|t| t.as_secs()).unwrap_or_default()
    );
    Ok(results)
}
