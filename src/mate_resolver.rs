use log::debug;
use std::collections::HashMap;
use std::time::SystemTime;

use crate::containers::{prefix_of, BreakendRecord, MatePair};
use crate::errors::{Error, Result};

/// Mate pairs found in one record set, in order of first discovery, plus
/// one error for every mate group that could not be paired.
#[derive(Debug, Default)]
pub struct MatePairs {
    pub pairs: Vec<MatePair>,
    pub failures: Vec<Error>,
}

impl MatePairs {
    pub fn get(&self, pair_id: &str) -> Option<&MatePair> {
        self.pairs.iter().find(|pair| pair.pair_id() == pair_id)
    }

    /// All pairs, or the first structural failure if there was any
    pub fn into_result(self) -> Result<Vec<MatePair>> {
        match self.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.pairs),
        }
    }
}

/// Group breakend records into mate pairs by the ID prefix they share with
/// their MATEID.
///
/// Each group must hold exactly two records whose MATEID prefix matches their
/// own ID prefix. Within a pair, the mate declared first by its `:1` suffix
/// (or seen first, when suffixes are absent) leads. On a shared chromosome
/// that mate must not lie after the other; a group where it does is reported
/// as unordered and never swapped, since pair order drives length and END.
pub fn resolve_mate_pairs(records: Vec<BreakendRecord>) -> MatePairs {
    let start_time = SystemTime::now();
    let record_count = records.len();

    let mut discovery_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<BreakendRecord>> = HashMap::new();
    for record in records {
        let pair_id = record.pair_id().to_string();
        if let Some(group) = groups.get_mut(&pair_id) {
            group.push(record);
        } else {
            discovery_order.push(pair_id.clone());
            groups.insert(pair_id, vec![record]);
        }
    }

    let mut mate_pairs = MatePairs::default();
    for pair_id in discovery_order {
        let Some(group) = groups.remove(&pair_id) else {
            continue;
        };
        match pair_group(pair_id, group) {
            Ok(pair) => mate_pairs.pairs.push(pair),
            Err(error) => mate_pairs.failures.push(error),
        }
    }

    debug!(
        "{} breakend records resolved into {} mate pairs, {} failed groups",
        record_count,
        mate_pairs.pairs.len(),
        mate_pairs.failures.len()
    );
    debug!(
        "Mate pairing: {}s",
        start_time.elapsed().map(|t| t.as_secs()).unwrap_or_default()
    );
    mate_pairs
}

fn check_mate_id(record: &BreakendRecord) -> Result<()> {
    let Some(mate_id) = record.mate_id.as_deref() else {
        return Err(Error::MissingMateId {
            id: record.id.clone(),
        });
    };
    if prefix_of(mate_id) != record.pair_id() {
        return Err(Error::MateIdMismatch {
            id: record.id.clone(),
            mate_id: mate_id.to_string(),
        });
    }
    Ok(())
}

fn pair_group(pair_id: String, mut group: Vec<BreakendRecord>) -> Result<MatePair> {
    for record in group.iter() {
        check_mate_id(record)?;
    }
    if group.len() != 2 {
        return Err(Error::UnpairedRecord {
            pair_id,
            count: group.len(),
        });
    }

    let mut second = group.remove(1);
    let mut first = group.remove(0);
    let declared_reversed =
        first.mate_suffix() == Some("2") && second.mate_suffix() == Some("1");
    if declared_reversed {
        std::mem::swap(&mut first, &mut second);
    }

    if first.locus.chrom == second.locus.chrom && first.locus.pos > second.locus.pos {
        return Err(Error::UnorderedMate {
            pair_id,
            first: first.locus,
            second: second.locus,
        });
    }
    Ok(MatePair { first, second })
}
