use core::fmt;
use serde::Serialize;
use std::{collections::BTreeMap, str::FromStr};

use crate::notation;
use crate::utils;

/// Single genomic position, 1-based as written in a VCF POS column.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize)]
pub struct Locus {
    pub chrom: String,
    pub pos: i64,
}

impl Locus {
    pub fn new(chrom: String, pos: i64) -> Self {
        Locus { chrom, pos }
    }

    /// Absolute distance in bp to another locus, None across chromosomes
    pub fn distance(&self, other: &Locus) -> Option<i64> {
        if self.chrom != other.chrom {
            return None;
        }
        Some((self.pos - other.pos).abs())
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", &self.chrom, &self.pos)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLocusError;

impl FromStr for Locus {
    type Err = ParseLocusError;

    /// Parses `chrom:pos`. The position is split off the last colon so that
    /// contig names containing colons (HLA alleles, decoys) survive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, pos) = s.rsplit_once(':').ok_or(ParseLocusError)?;
        if chrom.is_empty() {
            return Err(ParseLocusError);
        }
        let pos: i64 = pos.parse().map_err(|_| ParseLocusError)?;
        if pos < 0 {
            return Err(ParseLocusError);
        }
        Ok(Locus::new(chrom.to_string(), pos))
    }
}

/// The four bracket forms of a breakend ALT, named by the strand each side faces.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// `t]p]`
    PlusPlus,
    /// `t[p[`
    PlusMinus,
    /// `]p]t`
    MinusPlus,
    /// `[p[t`
    MinusMinus,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::PlusPlus,
        Orientation::PlusMinus,
        Orientation::MinusPlus,
        Orientation::MinusMinus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::PlusPlus => "++",
            Orientation::PlusMinus => "+-",
            Orientation::MinusPlus => "-+",
            Orientation::MinusMinus => "--",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for Orientation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Parsed form of one breakend ALT string
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize)]
pub struct BreakendNotation {
    pub orientation: Orientation,
    pub partner: Locus,
}

/// Structural variant type carried in INFO/SVTYPE
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum SvType {
    Bnd,
    Del,
    Dup,
    Inv,
    Ins,
    /// Any SVTYPE value outside the five handled here, e.g. CNV
    Other(String),
    /// No SVTYPE tag at all, as in indel-encoded Svaba calls
    Unassigned,
}

impl SvType {
    pub fn as_str(&self) -> &str {
        match self {
            SvType::Bnd => "BND",
            SvType::Del => "DEL",
            SvType::Dup => "DUP",
            SvType::Inv => "INV",
            SvType::Ins => "INS",
            SvType::Other(svtype) => svtype.as_str(),
            SvType::Unassigned => "",
        }
    }

    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            None => SvType::Unassigned,
            Some("BND") => SvType::Bnd,
            Some("DEL") => SvType::Del,
            Some("DUP") => SvType::Dup,
            Some("INV") => SvType::Inv,
            Some("INS") => SvType::Ins,
            Some(other) => SvType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SvType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for SvType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Value of a single INFO field, typed after its header declaration
#[derive(Debug, PartialEq, Clone)]
pub enum InfoValue {
    Flag,
    Integer(Vec<i32>),
    Float(Vec<f32>),
    String(Vec<String>),
}

/// Which end of an inversion a Manta INV record describes
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum InversionEnd {
    /// INV5: both mates written `[p[N`
    FivePrime,
    /// INV3: both mates written `N]p]`
    ThreePrime,
}

impl InversionEnd {
    pub fn tag(&self) -> &'static str {
        match self {
            InversionEnd::FivePrime => utils::INV5_KEY,
            InversionEnd::ThreePrime => utils::INV3_KEY,
        }
    }
}

/// SV caller that produced a record set. Decides where lengths are read from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum CallerSource {
    #[default]
    Manta,
    Svaba,
}

impl CallerSource {
    /// INFO key holding the event length for this caller
    pub fn length_key(&self) -> &'static str {
        match self {
            CallerSource::Manta => utils::SVLEN_KEY,
            CallerSource::Svaba => utils::SPAN_KEY,
        }
    }
}

impl fmt::Display for CallerSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerSource::Manta => formatter.write_str("manta"),
            CallerSource::Svaba => formatter.write_str("svaba"),
        }
    }
}

impl FromStr for CallerSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manta" => Ok(CallerSource::Manta),
            "svaba" => Ok(CallerSource::Svaba),
            _ => Err(format!("unknown caller source {s:?}, expected manta or svaba")),
        }
    }
}

/// One VCF row describing a breakend or a simple SV, reduced to the fields
/// needed for pairing, typing and matching.
#[derive(Debug, PartialEq, Clone)]
pub struct BreakendRecord {
    pub id: String,
    pub mate_id: Option<String>,
    pub locus: Locus,
    pub ref_allele: String,
    /// First ALT allele, bracket notation for breakends
    pub alt: String,
    pub rearrangement_type: SvType,
    pub length: Option<i64>,
    pub end: Option<Locus>,

    /// Remaining INFO fields, keyed by INFO ID
    pub info: BTreeMap<String, InfoValue>,
}

impl BreakendRecord {
    pub fn new(
        id: String,
        locus: Locus,
        ref_allele: String,
        alt: String,
        rearrangement_type: SvType,
    ) -> Self {
        BreakendRecord {
            id,
            mate_id: None,
            locus,
            ref_allele,
            alt,
            rearrangement_type,
            length: None,
            end: None,
            info: BTreeMap::new(),
        }
    }

    pub fn with_mate_id(mut self, mate_id: String) -> Self {
        self.mate_id = Some(mate_id);
        self
    }

    /// Shared mate prefix, the part of the ID before the first colon
    pub fn pair_id(&self) -> &str {
        prefix_of(&self.id)
    }

    /// Mate number declared in the ID (`1` in `svaba123:1`), if any
    pub fn mate_suffix(&self) -> Option<&str> {
        self.id.split(':').nth(1)
    }

    pub fn notation(&self) -> Option<BreakendNotation> {
        notation::parse_notation(&self.alt)
    }

    /// Insertions carry no comparable partner locus: either typed INS or
    /// written with an insertion ALT (`[ctg]`, `<INS>`, literal bases).
    pub fn is_insertion_type(&self) -> bool {
        self.rearrangement_type == SvType::Ins || notation::is_insertion_alt(&self.alt)
    }

    pub fn info_integers(&self, key: &str) -> Option<&[i32]> {
        match self.info.get(key) {
            Some(InfoValue::Integer(values)) => Some(values),
            _ => None,
        }
    }

    pub fn info_strings(&self, key: &str) -> Option<&[String]> {
        match self.info.get(key) {
            Some(InfoValue::String(values)) => Some(values),
            _ => None,
        }
    }

    pub fn has_flag(&self, key: &str) -> bool {
        matches!(self.info.get(key), Some(InfoValue::Flag))
    }
}

impl fmt::Display for BreakendRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {} {}",
            &self.id, &self.locus, &self.alt, &self.rearrangement_type
        )
    }
}

/// Part of a breakend ID before the first colon
pub fn prefix_of(id: &str) -> &str {
    id.split(':').next().unwrap_or(id)
}

/// Two breakend records sharing a mate prefix, lower position first
#[derive(Debug, PartialEq, Clone)]
pub struct MatePair {
    pub first: BreakendRecord,
    pub second: BreakendRecord,
}

impl MatePair {
    pub fn pair_id(&self) -> &str {
        self.first.pair_id()
    }

    pub fn is_intrachromosomal(&self) -> bool {
        self.first.locus.chrom == self.second.locus.chrom
    }
}

/// Outcome of typing one mate pair.
///
/// A resolved pair is represented downstream by the annotated first record
/// alone; its mate is kept only for bookkeeping.
#[derive(Debug, PartialEq, Clone)]
pub enum ClassifiedPair {
    Resolved {
        record: BreakendRecord,
        merged_mate: BreakendRecord,
    },
    Unresolved {
        first: BreakendRecord,
        second: BreakendRecord,
    },
}

impl ClassifiedPair {
    pub fn emitted_records(&self) -> Vec<&BreakendRecord> {
        match self {
            ClassifiedPair::Resolved { record, .. } => vec![record],
            ClassifiedPair::Unresolved { first, second } => vec![first, second],
        }
    }

    pub fn into_emitted_records(self) -> Vec<BreakendRecord> {
        match self {
            ClassifiedPair::Resolved { record, .. } => vec![record],
            ClassifiedPair::Unresolved { first, second } => vec![first, second],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ClassifiedPair::Resolved { .. })
    }
}
