use std::path::PathBuf;

use thiserror::Error;

use crate::containers::{CallerSource, Locus};

#[derive(Error, Debug)]
pub enum Error {
    #[error("ALT {alt:?} does not follow breakend bracket notation")]
    UnparseableNotation { alt: String },
    #[error("mate group {pair_id} has {count} breakend record(s), expected exactly 2")]
    UnpairedRecord { pair_id: String, count: usize },
    #[error("breakend {id} has MATEID {mate_id} with a different mate prefix")]
    MateIdMismatch { id: String, mate_id: String },
    #[error("breakend {id} has no MATEID")]
    MissingMateId { id: String },
    #[error("mate 1 of {pair_id} at {first} lies after mate 2 at {second}")]
    UnorderedMate {
        pair_id: String,
        first: Locus,
        second: Locus,
    },
    #[error("inversion {id} carries neither an INV5 nor an INV3 tag")]
    MissingOrientationTag { id: String },
    #[error("no rule for converting {caller} inversion {id} into breakends")]
    UnsupportedInversionSource { id: String, caller: CallerSource },
    #[error("record {id} has no usable length in INFO/{field}")]
    MissingLength { id: String, field: String },
    #[error("{svtype} call {id} cannot be written as breakends")]
    UnsupportedSvType { id: String, svtype: String },
    #[error("inversion {id} has no END position")]
    MissingEnd { id: String },
    #[error(
        "breakend accounting mismatch: {input} input breakends, but {bnd} BND + 2 x {typed} typed records emitted"
    )]
    AccountingMismatch { input: usize, bnd: usize, typed: usize },
    #[error("contig {chrom} is not declared in the VCF header")]
    UnknownContig { chrom: String },
    #[error("VCF record {index} in {path} does not define a chromosome")]
    RecordMissingChrom { index: usize, path: PathBuf },
    #[error("{tool} exited with {status}")]
    ExternalTool { tool: String, status: String },
    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
