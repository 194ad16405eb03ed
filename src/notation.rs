//! Breakend ALT bracket notation.
//!
//! A breakend ALT takes one of four shapes, where `t` is a single reference
//! base and `p` is the partner position written `chrom:pos`:
//!
//! | ALT      | orientation |
//! |----------|-------------|
//! | `t]p]`   | `++`        |
//! | `t[p[`   | `+-`        |
//! | `]p]t`   | `-+`        |
//! | `[p[t`   | `--`        |
//!
//! Anything else (sequence ALTs, symbolic alleles such as `<INS>`, the `[ctg]`
//! insertion placeholder) has no orientation and parses to `None`.
use std::str::FromStr;

use crate::containers::{BreakendNotation, Locus, Orientation};
use crate::errors::{Error, Result};
use crate::utils;

fn is_bracket(b: u8) -> bool {
    b == b'[' || b == b']'
}

/// A reference base is any single character that is neither a bracket nor a digit
fn is_reference_base(b: u8) -> bool {
    !is_bracket(b) && !b.is_ascii_digit()
}

/// Index of the bracket closing the partner field opened at `open_idx`.
/// The partner field must hold at least one character.
fn closing_bracket(alt: &[u8], open_idx: usize) -> Option<usize> {
    let bracket = alt[open_idx];
    alt.iter()
        .skip(open_idx + 2)
        .position(|&b| b == bracket)
        .map(|rel| rel + open_idx + 2)
}

/// Locate the orientation and the byte span of the partner field.
/// Matching is anchored at the first character.
fn scan(alt: &[u8]) -> Option<(Orientation, usize, usize)> {
    let &first = alt.first()?;
    if is_bracket(first) {
        let close_idx = closing_bracket(alt, 0)?;
        let &base = alt.get(close_idx + 1)?;
        if !is_reference_base(base) {
            return None;
        }
        let orientation = if first == b']' {
            Orientation::MinusPlus
        } else {
            Orientation::MinusMinus
        };
        return Some((orientation, 1, close_idx));
    }

    if !is_reference_base(first) {
        return None;
    }
    let &bracket = alt.get(1)?;
    if !is_bracket(bracket) {
        return None;
    }
    let close_idx = closing_bracket(alt, 1)?;
    let orientation = if bracket == b']' {
        Orientation::PlusPlus
    } else {
        Orientation::PlusMinus
    };
    Some((orientation, 2, close_idx))
}

/// Orientation of a breakend ALT, None when it matches none of the four forms
pub fn parse_orientation(alt: &str) -> Option<Orientation> {
    scan(alt.as_bytes()).map(|(orientation, _, _)| orientation)
}

/// Parse a breakend ALT into orientation and partner locus.
///
/// Returns None for ALTs that are not bracket notation or whose partner
/// field is not a `chrom:pos` pair. Never panics on irregular input.
pub fn parse_notation(alt: &str) -> Option<BreakendNotation> {
    let (orientation, start, end) = scan(alt.as_bytes())?;
    let partner = Locus::from_str(alt.get(start..end)?).ok()?;
    Some(BreakendNotation {
        orientation,
        partner,
    })
}

/// As [`parse_notation`], for call sites that need a well-formed breakend
pub fn require_notation(alt: &str) -> Result<BreakendNotation> {
    parse_notation(alt).ok_or_else(|| Error::UnparseableNotation {
        alt: alt.to_string(),
    })
}

/// Raw text between the first and the last bracket of an ALT, independent of
/// orientation. `[ctg]` yields `ctg`.
pub fn partner_locus_string(alt: &str) -> Option<&str> {
    let first = alt.find(&['[', ']'][..])?;
    let last = alt.rfind(&['[', ']'][..])?;
    if last <= first {
        return None;
    }
    alt.get(first + 1..last)
}

/// Partner locus of an ALT when it names one
pub fn partner_locus(alt: &str) -> Option<Locus> {
    partner_locus_string(alt).and_then(|partner| Locus::from_str(partner).ok())
}

/// Whether an ALT stands for inserted sequence rather than a junction: the
/// `[ctg]` placeholder, a symbolic `<INS>` allele (subtypes included) or
/// literal bases.
pub fn is_insertion_alt(alt: &str) -> bool {
    alt == utils::INSERTION_PLACEHOLDER_ALT
        || alt.starts_with("<INS")
        || (!alt.is_empty() && alt.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// Write a breakend ALT in the bracket form for `orientation`
pub fn format_notation(orientation: Orientation, reference_base: &str, partner: &Locus) -> String {
    match orientation {
        Orientation::PlusPlus => format!("{}]{}]", reference_base, partner),
        Orientation::PlusMinus => format!("{}[{}[", reference_base, partner),
        Orientation::MinusPlus => format!("]{}]{}", partner, reference_base),
        Orientation::MinusMinus => format!("[{}[{}", partner, reference_base),
    }
}
