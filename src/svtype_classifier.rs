use log::{debug, info};
use serde::Serialize;
use std::time::SystemTime;

use crate::containers::{BreakendRecord, ClassifiedPair, MatePair, SvType};
use crate::errors::{Error, Result};
use crate::mate_resolver::resolve_mate_pairs;
use crate::strand_classifier::{classify_orientations, RearrangementCategory};

/// Per-type counts of one classification run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    /// Breakend records that entered classification as members of a mate pair
    pub input_breakends: usize,
    pub bnd: usize,
    pub del: usize,
    pub dup: usize,
    pub inv: usize,
    /// Records of unresolved pairs that were typed something other than BND
    pub other: usize,
    /// Mate groups rejected by pairing
    pub failed_groups: usize,
}

impl ClassificationSummary {
    pub fn add(&mut self, classified: &ClassifiedPair) {
        self.input_breakends += 2;
        match classified {
            ClassifiedPair::Resolved { record, .. } => match record.rearrangement_type {
                SvType::Del => self.del += 1,
                SvType::Dup => self.dup += 1,
                SvType::Inv => self.inv += 1,
                _ => self.other += 2,
            },
            ClassifiedPair::Unresolved { first, second } => {
                for record in [first, second] {
                    if record.rearrangement_type == SvType::Bnd {
                        self.bnd += 1;
                    } else {
                        self.other += 1;
                    }
                }
            }
        }
    }

    pub fn from_pairs<'a, I>(classified: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedPair>,
    {
        classified
            .into_iter()
            .fold(ClassificationSummary::default(), |mut summary, pair| {
                summary.add(pair);
                summary
            })
    }

    pub fn typed(&self) -> usize {
        self.del + self.dup + self.inv
    }

    pub fn emitted_records(&self) -> usize {
        self.bnd + self.other + self.typed()
    }

    /// Every typed record stands for two input breakends, every unresolved
    /// record for itself.
    pub fn check_accounting(&self) -> Result<()> {
        if self.input_breakends != self.bnd + self.other + 2 * self.typed() {
            return Err(Error::AccountingMismatch {
                input: self.input_breakends,
                bnd: self.bnd + self.other,
                typed: self.typed(),
            });
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!("Converted {} BNDs into:", self.input_breakends);
        info!(
            "{} BNDs, {} DELs, {} DUPs, {} INVs",
            self.bnd, self.del, self.dup, self.inv
        );
        if self.other > 0 {
            info!("{} unresolved records of other types", self.other);
        }
    }
}

/// Records to emit from a classification run, with its summary and the mate
/// groups that could not be paired.
#[derive(Debug, Default)]
pub struct ClassificationRun {
    pub records: Vec<BreakendRecord>,
    pub summary: ClassificationSummary,
    pub failures: Vec<Error>,
}

/// Category of a mate pair. Only same-chromosome pairs that are both still
/// BND and both written in bracket notation with a `chrom:pos` partner can be typed.
pub fn pair_category(pair: &MatePair) -> RearrangementCategory {
    let (first, second) = (&pair.first, &pair.second);
    if first.rearrangement_type != SvType::Bnd || second.rearrangement_type != SvType::Bnd {
        return RearrangementCategory::Unresolved;
    }
    if !pair.is_intrachromosomal() {
        return RearrangementCategory::Unresolved;
    }
    match (first.notation(), second.notation()) {
        (Some(first_notation), Some(second_notation)) => {
            classify_orientations(first_notation.orientation, second_notation.orientation)
        }
        _ => RearrangementCategory::Unresolved,
    }
}

/// Type one mate pair.
///
/// A DEL, DUP or INV is carried by the first mate alone, with its length set
/// to the inclusive span between the two mates and its END to the second
/// mate's locus. Unresolved pairs are returned untouched.
pub fn classify_pair(pair: MatePair) -> ClassifiedPair {
    let category = pair_category(&pair);
    let MatePair { first, second } = pair;
    match category.svtype() {
        Some(svtype) => {
            let mut record = first;
            record.rearrangement_type = svtype;
            record.length = Some(second.locus.pos - record.locus.pos + 1);
            record.end = Some(second.locus.clone());
            debug!(
                "{} typed {} spanning {} bp",
                record.pair_id(),
                category,
                second.locus.pos - record.locus.pos + 1
            );
            ClassifiedPair::Resolved {
                record,
                merged_mate: second,
            }
        }
        None => ClassifiedPair::Unresolved { first, second },
    }
}

/// Pair and type every breakend of a record set.
///
/// Mate groups that fail pairing are left out of the emitted records and
/// returned as failures; every other group is classified independently.
pub fn assign_svtypes(records: Vec<BreakendRecord>) -> ClassificationRun {
    let start_time = SystemTime::now();
    let mate_pairs = resolve_mate_pairs(records);

    let mut run = ClassificationRun {
        failures: mate_pairs.failures,
        ..Default::default()
    };
    run.summary.failed_groups = run.failures.len();
    for pair in mate_pairs.pairs {
        let classified = classify_pair(pair);
        run.summary.add(&classified);
        run.records.extend(classified.into_emitted_records());
    }

    debug!(
        "SV type assignment: {}s",
        start_time.elapsed().map(|t| t.as_secs()).unwrap_or_default()
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Locus;

    fn create_test_mate(id: &str, mate_id: &str, chrom: &str, pos: i64, alt: &str) -> BreakendRecord {
        BreakendRecord::new(
            id.to_string(),
            Locus::new(chrom.to_string(), pos),
            "N".to_string(),
            alt.to_string(),
            SvType::Bnd,
        )
        .with_mate_id(mate_id.to_string())
    }

    fn create_test_pair(pair_id: &str, chrom: &str, pos: (i64, i64), alts: (&str, &str)) -> MatePair {
        let first_id = format!("{pair_id}:1");
        let second_id = format!("{pair_id}:2");
        MatePair {
            first: create_test_mate(&first_id, &second_id, chrom, pos.0, alts.0),
            second: create_test_mate(&second_id, &first_id, chrom, pos.1, alts.1),
        }
    }

    #[test]
    fn test_classify_inversion() {
        let pair = create_test_pair("1", "chr3", (200, 400), ("N]chr3:400]", "N]chr3:200]"));
        match classify_pair(pair) {
            ClassifiedPair::Resolved {
                record,
                merged_mate,
            } => {
                assert_eq!(record.rearrangement_type, SvType::Inv);
                assert_eq!(record.length, Some(201));
                assert_eq!(record.end, Some(Locus::new("chr3".to_string(), 400)));
                assert_eq!(record.id, "1:1");
                assert_eq!(merged_mate.rearrangement_type, SvType::Bnd);
            }
            other => panic!("expected INV, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_five_prime_inversion() {
        let pair = create_test_pair("1", "chr3", (200, 400), ("[chr3:400[N", "[chr3:200[N"));
        assert_eq!(pair_category(&pair), RearrangementCategory::Inversion);
    }

    #[test]
    fn test_classify_deletion_and_duplication() {
        let deletion =
            create_test_pair("1", "chr1", (1000, 1600), ("A[chr1:1600[", "]chr1:1000]N"));
        let classified = classify_pair(deletion);
        let record = classified.emitted_records()[0].clone();
        assert_eq!(record.rearrangement_type, SvType::Del);
        assert_eq!(record.length, Some(601));

        let duplication =
            create_test_pair("2", "chr1", (1000, 1600), ("]chr1:1600]N", "N[chr1:1000["));
        let classified = classify_pair(duplication);
        assert!(classified.is_resolved());
        assert_eq!(
            classified.emitted_records()[0].rearrangement_type,
            SvType::Dup
        );
    }

    #[test]
    fn test_classify_leaves_translocation_unresolved() {
        let pair = MatePair {
            first: create_test_mate("5:1", "5:2", "chr1", 100, "N[chr2:500["),
            second: create_test_mate("5:2", "5:1", "chr2", 500, "]chr1:100]N"),
        };
        let classified = classify_pair(pair.clone());
        assert_eq!(
            classified,
            ClassifiedPair::Unresolved {
                first: pair.first,
                second: pair.second
            }
        );
    }

    #[test]
    fn test_classify_unparseable_alt_unresolved() {
        let pair = create_test_pair("1", "chr1", (100, 101), ("[ctg]", "[ctg]"));
        assert_eq!(pair_category(&pair), RearrangementCategory::Unresolved);
        assert!(!classify_pair(pair).is_resolved());
    }

    #[test]
    fn test_classify_malformed_partner_unresolved() {
        // bracket shapes of a deletion, but neither partner is chrom:pos
        let pair = create_test_pair("1", "chr1", (100, 200), ("N[chr1:abc[", "]chr1:xyz]N"));
        assert_eq!(pair_category(&pair), RearrangementCategory::Unresolved);
        assert!(!classify_pair(pair).is_resolved());

        let one_sided = create_test_pair("2", "chr1", (100, 200), ("N[chr1:200[", "]chr1]N"));
        assert_eq!(pair_category(&one_sided), RearrangementCategory::Unresolved);
    }

    #[test]
    fn test_classify_mixed_inversion_orientations_stay_bnd() {
        let pair = create_test_pair("1", "chr3", (200, 400), ("N]chr3:400]", "]chr3:200]N"));
        assert_eq!(pair_category(&pair), RearrangementCategory::Unresolved);
        match classify_pair(pair) {
            ClassifiedPair::Unresolved { first, second } => {
                assert_eq!(first.rearrangement_type, SvType::Bnd);
                assert_eq!(second.rearrangement_type, SvType::Bnd);
                assert_eq!(first.end, None);
            }
            other => panic!("pair was typed: {other:?}"),
        }
    }

    #[test]
    fn test_classify_requires_both_bnd() {
        let mut pair = create_test_pair("1", "chr3", (200, 400), ("N]chr3:400]", "N]chr3:200]"));
        pair.second.rearrangement_type = SvType::Inv;
        assert_eq!(pair_category(&pair), RearrangementCategory::Unresolved);
    }

    #[test]
    fn test_classify_mismatched_orientations_unresolved() {
        let pair = create_test_pair("1", "chr3", (200, 400), ("N]chr3:400]", "[chr3:200[N"));
        let classified = classify_pair(pair);
        assert_eq!(classified.emitted_records().len(), 2);
        for record in classified.emitted_records() {
            assert_eq!(record.rearrangement_type, SvType::Bnd);
            assert_eq!(record.length, None);
        }
    }

    #[test]
    fn test_summary_accounting_mixed() {
        let pairs = vec![
            classify_pair(create_test_pair("1", "chr1", (10, 50), ("N]chr1:50]", "N]chr1:10]"))),
            classify_pair(create_test_pair("2", "chr1", (10, 50), ("N[chr1:50[", "]chr1:10]N"))),
            classify_pair(create_test_pair("3", "chr1", (10, 50), ("]chr1:50]N", "N[chr1:10["))),
            classify_pair(create_test_pair("4", "chr1", (10, 50), ("N[chr1:50[", "N[chr1:10["))),
            classify_pair(create_test_pair("5", "chr1", (10, 11), ("[ctg]", "[ctg]"))),
        ];
        let summary = ClassificationSummary::from_pairs(pairs.iter());
        assert_eq!(summary.input_breakends, 10);
        assert_eq!(summary.inv, 1);
        assert_eq!(summary.del, 1);
        assert_eq!(summary.dup, 1);
        assert_eq!(summary.bnd, 4);
        assert_eq!(summary.emitted_records(), 7);
        assert!(summary.check_accounting().is_ok());
    }

    #[test]
    fn test_summary_accounting_extremes() {
        let all_unresolved: Vec<ClassifiedPair> = (0..4)
            .map(|i| {
                classify_pair(create_test_pair(
                    &i.to_string(),
                    "chr1",
                    (10, 50),
                    ("N]chr1:50]", "[chr1:10[N"),
                ))
            })
            .collect();
        let summary = ClassificationSummary::from_pairs(all_unresolved.iter());
        assert_eq!(summary.bnd, 8);
        assert_eq!(summary.typed(), 0);
        assert!(summary.check_accounting().is_ok());

        let all_resolved: Vec<ClassifiedPair> = (0..4)
            .map(|i| {
                classify_pair(create_test_pair(
                    &i.to_string(),
                    "chr1",
                    (10, 50),
                    ("N[chr1:50[", "]chr1:10]N"),
                ))
            })
            .collect();
        let summary = ClassificationSummary::from_pairs(all_resolved.iter());
        assert_eq!(summary.bnd, 0);
        assert_eq!(summary.del, 4);
        assert_eq!(summary.input_breakends, 8);
        assert!(summary.check_accounting().is_ok());

        let empty = ClassificationSummary::from_pairs(std::iter::empty());
        assert!(empty.check_accounting().is_ok());
    }

    #[test]
    fn test_summary_accounting_mismatch_detected() {
        let summary = ClassificationSummary {
            input_breakends: 6,
            bnd: 2,
            del: 1,
            ..Default::default()
        };
        assert!(matches!(
            summary.check_accounting(),
            Err(Error::AccountingMismatch { input: 6, .. })
        ));
    }

    #[test]
    fn test_assign_svtypes_run() {
        let records = vec![
            create_test_mate("1:1", "1:2", "chr3", 200, "N]chr3:400]"),
            create_test_mate("2:1", "2:2", "chr1", 100, "N[chr2:500["),
            create_test_mate("1:2", "1:1", "chr3", 400, "N]chr3:200]"),
            create_test_mate("2:2", "2:1", "chr2", 500, "]chr1:100]N"),
            create_test_mate("3:1", "3:2", "chr1", 100, "N[chr1:500["),
        ];
        let run = assign_svtypes(records);
        let ids: Vec<&str> = run.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1:1", "2:1", "2:2"]);
        assert_eq!(run.records[0].rearrangement_type, SvType::Inv);
        assert_eq!(run.summary.inv, 1);
        assert_eq!(run.summary.bnd, 2);
        assert_eq!(run.summary.input_breakends, 4);
        assert_eq!(run.summary.failed_groups, 1);
        assert_eq!(run.failures.len(), 1);
        assert!(run.summary.check_accounting().is_ok());
    }
}
