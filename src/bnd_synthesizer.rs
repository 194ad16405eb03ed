use log::debug;

use crate::containers::{
    BreakendRecord, CallerSource, InversionEnd, Locus, Orientation, SvType,
};
use crate::errors::{Error, Result};
use crate::notation::format_notation;
use crate::utils;

/// Everything needed to write one rearrangement as two mated breakends
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisInput {
    /// ID of the source call; mates become `<id>:1` and `<id>:2`
    pub id: String,
    pub svtype: SvType,
    pub locus_a: Locus,
    pub locus_b: Locus,
    /// REF column of each mate
    pub ref_a: String,
    pub ref_b: String,
    /// Required for inversions
    pub inversion_end: Option<InversionEnd>,
}

/// Write a DEL, DUP, INV or INS as a pair of breakend records, mate A at
/// `locus_a` and mate B at `locus_b`.
///
/// | type | mate A ALT | mate B ALT |
/// |------|------------|------------|
/// | INS  | `[ctg]`    | `[ctg]`    |
/// | DEL  | `ref_a[b[` | `]a]N`     |
/// | DUP  | `]b]N`     | `N[a[`     |
/// | INV5 | `[b[N`     | `[a[N`     |
/// | INV3 | `N]b]`     | `N]a]`     |
///
/// Breakend mates of DEL, DUP and INV are typed BND so that they can be typed
/// again by classification; insertion mates stay INS.
pub fn synthesize(input: &SynthesisInput) -> Result<(BreakendRecord, BreakendRecord)> {
    let placeholder = utils::PLACEHOLDER_REF_BASE;
    let (alt_a, alt_b, mate_type) = match input.svtype {
        SvType::Ins => (
            utils::INSERTION_PLACEHOLDER_ALT.to_string(),
            utils::INSERTION_PLACEHOLDER_ALT.to_string(),
            SvType::Ins,
        ),
        SvType::Del => (
            format_notation(Orientation::PlusMinus, &input.ref_a, &input.locus_b),
            format_notation(Orientation::MinusPlus, placeholder, &input.locus_a),
            SvType::Bnd,
        ),
        SvType::Dup => (
            format_notation(Orientation::MinusPlus, placeholder, &input.locus_b),
            format_notation(Orientation::PlusMinus, placeholder, &input.locus_a),
            SvType::Bnd,
        ),
        SvType::Inv => {
            let orientation = match input.inversion_end {
                Some(InversionEnd::FivePrime) => Orientation::MinusMinus,
                Some(InversionEnd::ThreePrime) => Orientation::PlusPlus,
                None => {
                    return Err(Error::MissingOrientationTag {
                        id: input.id.clone(),
                    })
                }
            };
            (
                format_notation(orientation, placeholder, &input.locus_b),
                format_notation(orientation, placeholder, &input.locus_a),
                SvType::Bnd,
            )
        }
        _ => {
            return Err(Error::UnsupportedSvType {
                id: input.id.clone(),
                svtype: input.svtype.to_string(),
            })
        }
    };

    let base_id = input.id.replace(':', "_");
    let id_a = format!("{base_id}:1");
    let id_b = format!("{base_id}:2");
    let mate_a = BreakendRecord::new(
        id_a.clone(),
        input.locus_a.clone(),
        input.ref_a.clone(),
        alt_a,
        mate_type.clone(),
    )
    .with_mate_id(id_b.clone());
    let mate_b = BreakendRecord::new(
        id_b,
        input.locus_b.clone(),
        input.ref_b.clone(),
        alt_b,
        mate_type,
    )
    .with_mate_id(id_a);
    Ok((mate_a, mate_b))
}

/// Event length of a call as the given caller reports it, always positive.
/// Insertions without a length tag fall back to the length of the assembled contig.
pub fn record_length(record: &BreakendRecord, source: CallerSource) -> Option<i64> {
    let key = source.length_key();
    let tagged = if key == utils::SVLEN_KEY {
        record.length
    } else {
        record
            .info_integers(key)
            .and_then(|values| values.first())
            .map(|value| *value as i64)
    };
    if let Some(length) = tagged {
        return Some(length.abs());
    }
    if record.rearrangement_type == SvType::Ins {
        return record
            .info_strings(utils::CONTIG_KEY)
            .and_then(|contigs| contigs.first())
            .map(|contig| contig.len() as i64);
    }
    None
}

/// Where the second mate of a call sits.
///
/// Insertions occupy no reference span, so their second mate is the next
/// base. Deletions and duplications end `length + 1` past the first mate.
/// Inversions end at END.
pub fn mate_position(record: &BreakendRecord, source: CallerSource) -> Result<Locus> {
    let chrom = record.locus.chrom.clone();
    match record.rearrangement_type {
        SvType::Ins => Ok(Locus::new(chrom, record.locus.pos + 1)),
        SvType::Del | SvType::Dup => {
            let length = record_length(record, source).ok_or_else(|| Error::MissingLength {
                id: record.id.clone(),
                field: source.length_key().to_string(),
            })?;
            Ok(Locus::new(chrom, record.locus.pos + length + 1))
        }
        SvType::Inv => record.end.clone().ok_or_else(|| Error::MissingEnd {
            id: record.id.clone(),
        }),
        _ => Ok(record.locus.clone()),
    }
}

fn inversion_end(record: &BreakendRecord) -> Option<InversionEnd> {
    [InversionEnd::FivePrime, InversionEnd::ThreePrime]
        .into_iter()
        .find(|end| record.has_flag(end.tag()))
}

/// Anchor base shared by REF and ALT of an indel-encoded call
fn anchor_base(record: &BreakendRecord) -> String {
    record
        .ref_allele
        .chars()
        .next()
        .map(|base| base.to_string())
        .unwrap_or_else(|| utils::PLACEHOLDER_REF_BASE.to_string())
}

/// Rewrite a single SV call as breakend mates.
///
/// INS, DEL, DUP and INV calls become two records; every other record is
/// returned unchanged. Both mates keep the INFO fields of the source call.
pub fn convert_to_bnd(record: BreakendRecord, source: CallerSource) -> Result<Vec<BreakendRecord>> {
    let (ref_a, ref_b, inversion) = match record.rearrangement_type {
        SvType::Ins => (record.ref_allele.clone(), record.ref_allele.clone(), None),
        SvType::Del => (
            anchor_base(&record),
            utils::PLACEHOLDER_REF_BASE.to_string(),
            None,
        ),
        SvType::Dup => (record.ref_allele.clone(), record.ref_allele.clone(), None),
        SvType::Inv => {
            if source != CallerSource::Manta {
                return Err(Error::UnsupportedInversionSource {
                    id: record.id.clone(),
                    caller: source,
                });
            }
            let inversion = inversion_end(&record).ok_or_else(|| Error::MissingOrientationTag {
                id: record.id.clone(),
            })?;
            (
                record.ref_allele.clone(),
                record.ref_allele.clone(),
                Some(inversion),
            )
        }
        _ => return Ok(vec![record]),
    };

    let input = SynthesisInput {
        id: record.id.clone(),
        svtype: record.rearrangement_type.clone(),
        locus_a: record.locus.clone(),
        locus_b: mate_position(&record, source)?,
        ref_a,
        ref_b,
        inversion_end: inversion,
    };
    let (mut mate_a, mut mate_b) = synthesize(&input)?;
    if record.rearrangement_type == SvType::Ins {
        let length = record_length(&record, source);
        mate_a.length = length;
        mate_b.length = length;
    }
    mate_a.info = record.info.clone();
    mate_b.info = record.info;
    debug!(
        "{} {} written as breakends {} and {}",
        input.svtype, input.id, mate_a.locus, mate_b.locus
    );
    Ok(vec![mate_a, mate_b])
}

/// Type an indel-encoded call that carries no SVTYPE: a longer ALT than REF is
/// an insertion, anything else a deletion. SVLEN is taken from SPAN, negative
/// for deletions. Records that already have a type are returned unchanged.
pub fn convert_indel(mut record: BreakendRecord) -> Result<BreakendRecord> {
    if record.rearrangement_type != SvType::Unassigned {
        return Ok(record);
    }
    let span = record
        .info_integers(utils::SPAN_KEY)
        .and_then(|values| values.first())
        .map(|value| *value as i64)
        .ok_or_else(|| Error::MissingLength {
            id: record.id.clone(),
            field: utils::SPAN_KEY.to_string(),
        })?;
    if record.alt.len() > record.ref_allele.len() {
        record.rearrangement_type = SvType::Ins;
        record.length = Some(span);
    } else {
        record.rearrangement_type = SvType::Del;
        record.length = Some(-span);
    }
    Ok(record)
}
