use std::path::Path;

/// Greatest distance in bp between a query breakend and a target breakend
/// (and between their partner positions) for the two to be treated as the same.
pub const DEFAULT_MATCH_WINDOW: i64 = 100;

/// ALT written on both mates of a synthesized insertion. The inserted
/// sequence, not a second genomic locus, is the true mate, so no partner is named.
pub const INSERTION_PLACEHOLDER_ALT: &str = "[ctg]";

/// Reference base used where the real base at a synthesized mate is unknown
pub const PLACEHOLDER_REF_BASE: &str = "N";

pub const SVTYPE_KEY: &str = "SVTYPE";
pub const MATEID_KEY: &str = "MATEID";
pub const SVLEN_KEY: &str = "SVLEN";
pub const SPAN_KEY: &str = "SPAN";
pub const END_KEY: &str = "END";
pub const CONTIG_KEY: &str = "CONTIG";
pub const INV5_KEY: &str = "INV5";
pub const INV3_KEY: &str = "INV3";

/// INFO header lines added to classified output when the input lacks them
pub const SVLEN_HEADER_LINE: &[u8] =
    b"##INFO=<ID=SVLEN,Number=.,Type=Integer,Description=\"Length of structural variant\">";
pub const END_HEADER_LINE: &[u8] =
    b"##INFO=<ID=END,Number=.,Type=Integer,Description=\"End coordinate\">";
pub const MATEID_HEADER_LINE: &[u8] =
    b"##INFO=<ID=MATEID,Number=.,Type=String,Description=\"ID of mate breakends\">";
pub const SVTYPE_HEADER_LINE: &[u8] =
    b"##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">";

pub fn is_local_file(filepath: &Path) -> bool {
    match std::fs::metadata(filepath) {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false, // If there is an error (e.g., path doesn't exist), return false
    }
}

/// Check if an output path asks for compressed output
pub fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("gz")
}
