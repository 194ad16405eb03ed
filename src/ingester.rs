use log::{debug, warn};
use rust_htslib::bcf;
use rust_htslib::bcf::record::Numeric;
use rust_htslib::bcf::Read;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;

use crate::containers::{BreakendRecord, InfoValue, Locus, SvType};
use crate::errors::{Error, Result};
use crate::utils;

/// INFO fields stored as dedicated record fields instead of in the INFO map
const EXTRACTED_INFO_KEYS: [&str; 4] = [
    utils::SVTYPE_KEY,
    utils::MATEID_KEY,
    utils::SVLEN_KEY,
    utils::END_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoType {
    Flag,
    Integer,
    Float,
    String,
}

/// INFO IDs declared in a VCF header, with their value types
fn declared_info_fields(header: &bcf::header::HeaderView) -> Vec<(String, InfoType)> {
    header
        .header_records()
        .into_iter()
        .filter_map(|header_record| {
            if let bcf::header::HeaderRecord::Info { values, .. } = header_record {
                let id = values.get("ID")?.clone();
                if EXTRACTED_INFO_KEYS.contains(&id.as_str()) {
                    return None;
                }
                let info_type = match values.get("Type").map(|t| t.as_str()) {
                    Some("Flag") => InfoType::Flag,
                    Some("Integer") => InfoType::Integer,
                    Some("Float") => InfoType::Float,
                    Some("String") | Some("Character") => InfoType::String,
                    other => {
                        warn!("INFO/{} has unsupported type {:?}, skipping", id, other);
                        return None;
                    }
                };
                return Some((id, info_type));
            }
            None
        })
        .collect()
}

fn first_integer(record: &bcf::Record, key: &str) -> Option<i64> {
    match record.info(key.as_bytes()).integer() {
        Ok(Some(values)) => values
            .iter()
            .find(|value| !value.is_missing())
            .map(|value| *value as i64),
        _ => None,
    }
}

fn first_string(record: &bcf::Record, key: &str) -> Option<String> {
    match record.info(key.as_bytes()).string() {
        Ok(Some(values)) => values
            .first()
            .map(|value| String::from_utf8_lossy(value).to_string()),
        _ => None,
    }
}

fn read_info_value(record: &bcf::Record, key: &str, info_type: InfoType) -> Option<InfoValue> {
    let tag = key.as_bytes();
    match info_type {
        InfoType::Flag => match record.info(tag).flag() {
            Ok(true) => Some(InfoValue::Flag),
            _ => None,
        },
        InfoType::Integer => match record.info(tag).integer() {
            Ok(Some(values)) => Some(InfoValue::Integer(
                values.iter().filter(|v| !v.is_missing()).copied().collect(),
            )),
            _ => None,
        },
        InfoType::Float => match record.info(tag).float() {
            Ok(Some(values)) => Some(InfoValue::Float(
                values.iter().filter(|v| !v.is_missing()).copied().collect(),
            )),
            _ => None,
        },
        InfoType::String => match record.info(tag).string() {
            Ok(Some(values)) => Some(InfoValue::String(
                values
                    .iter()
                    .map(|value| String::from_utf8_lossy(value).to_string())
                    .collect(),
            )),
            _ => None,
        },
    }
}

/// Gets the chromosome name of a VCF record
fn get_vcf_record_chrom(record: &bcf::Record, index: usize, path: &Path) -> Result<String> {
    let Some(ref_id) = record.rid() else {
        return Err(Error::RecordMissingChrom {
            index,
            path: path.to_path_buf(),
        });
    };
    let chrom_bytes = record.header().rid2name(ref_id)?;
    Ok(String::from_utf8_lossy(chrom_bytes).to_string())
}

fn to_breakend_record(
    record: &bcf::Record,
    info_fields: &[(String, InfoType)],
    index: usize,
    path: &Path,
) -> Result<BreakendRecord> {
    let chrom = get_vcf_record_chrom(record, index, path)?;
    let alleles = record.alleles();
    let ref_allele = alleles
        .first()
        .map(|allele| String::from_utf8_lossy(allele).to_string())
        .unwrap_or_default();
    let alt = alleles
        .get(1)
        .map(|allele| String::from_utf8_lossy(allele).to_string())
        .unwrap_or_default();
    let svtype = first_string(record, utils::SVTYPE_KEY);

    let mut breakend = BreakendRecord::new(
        String::from_utf8_lossy(&record.id()).to_string(),
        Locus::new(chrom.clone(), record.pos() + 1),
        ref_allele,
        alt,
        SvType::from_tag(svtype.as_deref()),
    );
    breakend.mate_id = first_string(record, utils::MATEID_KEY);
    breakend.length = first_integer(record, utils::SVLEN_KEY);
    breakend.end = first_integer(record, utils::END_KEY).map(|end| Locus::new(chrom, end));

    let mut info = BTreeMap::new();
    for (key, info_type) in info_fields {
        if let Some(value) = read_info_value(record, key, *info_type) {
            info.insert(key.clone(), value);
        }
    }
    breakend.info = info;
    Ok(breakend)
}

/// Read every record of a VCF or BCF file, in file order
pub fn read_breakend_records(vcf_filename: &Path) -> Result<Vec<BreakendRecord>> {
    let start_time = SystemTime::now();
    if !utils::is_local_file(vcf_filename) {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input VCF does not exist: {}", vcf_filename.display()),
        )));
    }
    let mut reader = bcf::Reader::from_path(vcf_filename)?;
    let info_fields = declared_info_fields(reader.header());

    let mut records = Vec::new();
    for (index, record_result) in reader.records().enumerate() {
        let record = record_result?;
        records.push(to_breakend_record(&record, &info_fields, index, vcf_filename)?);
    }
    debug!(
        "{} records read from {}",
        records.len(),
        vcf_filename.display()
    );
    debug!(
        "VCF ingestion: {}s",
        start_time.elapsed().map(|t| t.as_secs()).unwrap_or_default()
    );
    Ok(records)
}

/// Header of an existing VCF, to template output headers from
pub fn read_header(vcf_filename: &Path) -> Result<bcf::header::HeaderView> {
    let reader = bcf::Reader::from_path(vcf_filename)?;
    Ok(reader.header().clone())
}

/// Test fixtures shared with the writer tests
#[cfg(test)]
pub(crate) mod test_vcf {
    use std::io::Write;
    use std::path::PathBuf;

    pub const HEADER: &str = "##fileformat=VCFv4.2
##contig=<ID=chr1,length=100000>
##contig=<ID=chr2,length=100000>
##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">
##INFO=<ID=MATEID,Number=.,Type=String,Description=\"ID of mate breakends\">
##INFO=<ID=SVLEN,Number=.,Type=Integer,Description=\"Length of structural variant\">
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position\">
##INFO=<ID=CIPOS,Number=2,Type=Integer,Description=\"Confidence interval around POS\">
##INFO=<ID=INV5,Number=0,Type=Flag,Description=\"Inversion breakends open 5' of reported location\">
##INFO=<ID=INV3,Number=0,Type=Flag,Description=\"Inversion breakends open 3' of reported location\">
##INFO=<ID=SPAN,Number=1,Type=Integer,Description=\"Distance between breakends\">
##INFO=<ID=CONTIG,Number=1,Type=String,Description=\"Assembled contig sequence\">
##INFO=<ID=AF,Number=1,Type=Float,Description=\"Allele frequency\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

    pub fn create_test_vcf(dir: &std::path::Path, name: &str, body: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for line in body {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_vcf::create_test_vcf;
    use super::*;

    #[test]
    fn test_read_breakend_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_vcf(
            dir.path(),
            "calls.vcf",
            &[
                "chr1\t1000\t7:1\tA\tA[chr1:1500[\t.\tPASS\tSVTYPE=BND;MATEID=7:2;CIPOS=-5,5",
                "chr1\t1500\t7:2\tC\t]chr1:1000]C\t.\tPASS\tSVTYPE=BND;MATEID=7:1;AF=0.5",
                "chr2\t200\tinv1\tG\t<INV>\t.\tPASS\tSVTYPE=INV;END=900;SVLEN=700;INV3",
                "chr2\t3000\tindel1\tA\tACGT\t.\tPASS\tSPAN=3",
                "chr2\t4000\tcnv1\tT\t<CNV>\t.\tPASS\tSVTYPE=CNV",
            ],
        );
        let records = read_breakend_records(&path).unwrap();
        assert_eq!(records.len(), 5);

        let first = &records[0];
        assert_eq!(first.id, "7:1");
        assert_eq!(first.locus, Locus::new("chr1".to_string(), 1000));
        assert_eq!(first.ref_allele, "A");
        assert_eq!(first.alt, "A[chr1:1500[");
        assert_eq!(first.rearrangement_type, SvType::Bnd);
        assert_eq!(first.mate_id.as_deref(), Some("7:2"));
        assert_eq!(first.info_integers("CIPOS"), Some(&[-5, 5][..]));
        assert!(!first.info.contains_key("SVTYPE"));
        assert!(!first.info.contains_key("MATEID"));

        assert_eq!(records[1].info.get("AF"), Some(&InfoValue::Float(vec![0.5])));

        let inversion = &records[2];
        assert_eq!(inversion.rearrangement_type, SvType::Inv);
        assert_eq!(inversion.end, Some(Locus::new("chr2".to_string(), 900)));
        assert_eq!(inversion.length, Some(700));
        assert!(inversion.has_flag("INV3"));
        assert!(!inversion.has_flag("INV5"));

        assert_eq!(records[3].rearrangement_type, SvType::Unassigned);
        assert_eq!(records[3].info_integers("SPAN"), Some(&[3][..]));
        assert_eq!(records[4].rearrangement_type, SvType::Other("CNV".to_string()));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_breakend_records(&dir.path().join("absent.vcf")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_read_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_vcf(dir.path(), "empty.vcf", &[]);
        let header = read_header(&path).unwrap();
        assert_eq!(header.name2rid(b"chr2").unwrap(), 1);
        assert!(read_breakend_records(&path).unwrap().is_empty());
    }
}
