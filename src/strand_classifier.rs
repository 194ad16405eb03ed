use core::fmt;
use serde::Serialize;

use crate::containers::{Orientation, SvType};

/// Rearrangement implied by the orientations of two mated breakends
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum RearrangementCategory {
    Deletion,
    Duplication,
    Inversion,
    Unresolved,
}

impl RearrangementCategory {
    /// SVTYPE written for this category, None while the pair stays BND
    pub fn svtype(&self) -> Option<SvType> {
        match self {
            RearrangementCategory::Deletion => Some(SvType::Del),
            RearrangementCategory::Duplication => Some(SvType::Dup),
            RearrangementCategory::Inversion => Some(SvType::Inv),
            RearrangementCategory::Unresolved => None,
        }
    }
}

impl fmt::Display for RearrangementCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RearrangementCategory::Deletion => "DEL",
            RearrangementCategory::Duplication => "DUP",
            RearrangementCategory::Inversion => "INV",
            RearrangementCategory::Unresolved => "UNRESOLVED",
        };
        formatter.write_str(label)
    }
}

/// Classify a mate pair from the orientations of its lower-position breakend
/// (`first`) and its higher-position breakend (`second`).
///
/// Both ends facing the same strand (`++`/`++` or `--`/`--`) flank an
/// inverted segment. `+-` then `-+` joins the sequence either side of an
/// excised segment. `-+` then `+-` rejoins the end of a segment to its own
/// start, a tandem duplication. Every other combination is left unresolved.
pub fn classify_orientations(first: Orientation, second: Orientation) -> RearrangementCategory {
    use crate::containers::Orientation::*;
    match (first, second) {
        (PlusPlus, PlusPlus) | (MinusMinus, MinusMinus) => RearrangementCategory::Inversion,
        (PlusMinus, MinusPlus) => RearrangementCategory::Deletion,
        (MinusPlus, PlusMinus) => RearrangementCategory::Duplication,
        _ => RearrangementCategory::Unresolved,
    }
}

/// Whether two breakends observed near each other describe the same junction
/// orientation. Identical orientations agree; so does a `+-`/`-+` couple in
/// either order, the two sides of one deletion or duplication junction.
pub fn orientations_agree(query: Orientation, candidate: Orientation) -> bool {
    if query == candidate {
        return true;
    }
    matches!(
        classify_orientations(query, candidate),
        RearrangementCategory::Deletion | RearrangementCategory::Duplication
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Orientation::*;

    #[test]
    fn test_classify_orientations_table() {
        assert_eq!(
            classify_orientations(PlusPlus, PlusPlus),
            RearrangementCategory::Inversion
        );
        assert_eq!(
            classify_orientations(MinusMinus, MinusMinus),
            RearrangementCategory::Inversion
        );
        assert_eq!(
            classify_orientations(PlusMinus, MinusPlus),
            RearrangementCategory::Deletion
        );
        assert_eq!(
            classify_orientations(MinusPlus, PlusMinus),
            RearrangementCategory::Duplication
        );
    }

    #[test]
    fn test_classify_orientations_exhaustive() {
        let mut inversions = 0;
        let mut deletions = 0;
        let mut duplications = 0;
        let mut unresolved = 0;
        for first in Orientation::ALL {
            for second in Orientation::ALL {
                match classify_orientations(first, second) {
                    RearrangementCategory::Inversion => inversions += 1,
                    RearrangementCategory::Deletion => deletions += 1,
                    RearrangementCategory::Duplication => duplications += 1,
                    RearrangementCategory::Unresolved => unresolved += 1,
                }
            }
        }
        assert_eq!(inversions, 2);
        assert_eq!(deletions, 1);
        assert_eq!(duplications, 1);
        assert_eq!(unresolved, 12);
        assert_eq!(inversions + deletions + duplications + unresolved, 16);
    }

    #[test]
    fn test_classify_orientations_is_order_sensitive() {
        // the mixed inversion pairs are not inversions
        assert_eq!(
            classify_orientations(PlusPlus, MinusMinus),
            RearrangementCategory::Unresolved
        );
        assert_eq!(
            classify_orientations(PlusMinus, PlusMinus),
            RearrangementCategory::Unresolved
        );
        assert_ne!(
            classify_orientations(PlusMinus, MinusPlus),
            classify_orientations(MinusPlus, PlusMinus)
        );
    }

    #[test]
    fn test_category_svtype() {
        assert_eq!(RearrangementCategory::Deletion.svtype(), Some(SvType::Del));
        assert_eq!(
            RearrangementCategory::Duplication.svtype(),
            Some(SvType::Dup)
        );
        assert_eq!(RearrangementCategory::Inversion.svtype(), Some(SvType::Inv));
        assert_eq!(RearrangementCategory::Unresolved.svtype(), None);
    }

    #[test]
    fn test_orientations_agree() {
        for orientation in Orientation::ALL {
            assert!(orientations_agree(orientation, orientation));
        }
        assert!(orientations_agree(PlusMinus, MinusPlus));
        assert!(orientations_agree(MinusPlus, PlusMinus));
        assert!(!orientations_agree(PlusPlus, MinusMinus));
        assert!(!orientations_agree(PlusPlus, PlusMinus));
        assert!(!orientations_agree(MinusMinus, MinusPlus));
    }
}
