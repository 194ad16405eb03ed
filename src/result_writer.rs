use bgzip::{BGZFWriter, Compression};
use flate2::write::GzEncoder;
use log::{debug, info};
use rust_htslib::bcf;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::breakend_matcher::MatchResult;
use crate::containers::{BreakendRecord, InfoValue, SvType};
use crate::errors::{Error, Result};
use crate::record_index::RecordSink;
use crate::svtype_classifier::ClassificationSummary;
use crate::utils;

/// INFO lines every output header carries, added when the template lacks them
const REQUIRED_INFO_LINES: [(&[u8], &[u8]); 4] = [
    (b"SVTYPE", utils::SVTYPE_HEADER_LINE),
    (b"MATEID", utils::MATEID_HEADER_LINE),
    (b"SVLEN", utils::SVLEN_HEADER_LINE),
    (b"END", utils::END_HEADER_LINE),
];

/// Appends breakend records to a VCF. Output ending in `.gz` is BGZF compressed.
pub struct VcfRecordWriter {
    writer: bcf::Writer,
    written: usize,
}

impl VcfRecordWriter {
    /// Open `output` with a header copied from `template`
    pub fn create(template: &bcf::header::HeaderView, output: &Path) -> Result<Self> {
        let mut header = bcf::Header::from_template(template);
        for (id, line) in REQUIRED_INFO_LINES {
            if template.info_type(id).is_err() {
                header.push_record(line);
            }
        }
        let uncompressed = !utils::has_gz_extension(output);
        let writer = bcf::Writer::from_path(output, &header, uncompressed, bcf::Format::Vcf)?;
        Ok(VcfRecordWriter { writer, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn build_record(&self, breakend: &BreakendRecord) -> Result<bcf::Record> {
        let mut record = self.writer.empty_record();
        let chrom = &breakend.locus.chrom;
        let rid = self
            .writer
            .header()
            .name2rid(chrom.as_bytes())
            .map_err(|_| Error::UnknownContig {
                chrom: chrom.clone(),
            })?;
        record.set_rid(Some(rid));
        record.set_pos(breakend.locus.pos - 1);
        record.set_id(breakend.id.as_bytes())?;
        if breakend.alt.is_empty() {
            record.set_alleles(&[breakend.ref_allele.as_bytes()])?;
        } else {
            record.set_alleles(&[breakend.ref_allele.as_bytes(), breakend.alt.as_bytes()])?;
        }

        if breakend.rearrangement_type != SvType::Unassigned {
            let svtype = breakend.rearrangement_type.as_str();
            record.push_info_string(utils::SVTYPE_KEY.as_bytes(), &[svtype.as_bytes()])?;
        }
        if let Some(mate_id) = &breakend.mate_id {
            record.push_info_string(utils::MATEID_KEY.as_bytes(), &[mate_id.as_bytes()])?;
        }
        if let Some(length) = breakend.length {
            record.push_info_integer(utils::SVLEN_KEY.as_bytes(), &[length as i32])?;
        }
        if let Some(end) = &breakend.end {
            record.push_info_integer(utils::END_KEY.as_bytes(), &[end.pos as i32])?;
        }
        for (key, value) in breakend.info.iter() {
            let tag = key.as_bytes();
            match value {
                InfoValue::Flag => record.push_info_flag(tag)?,
                InfoValue::Integer(values) => record.push_info_integer(tag, values)?,
                InfoValue::Float(values) => record.push_info_float(tag, values)?,
                InfoValue::String(values) => {
                    let values: Vec<&[u8]> = values.iter().map(|v| v.as_bytes()).collect();
                    record.push_info_string(tag, &values)?
                }
            }
        }
        Ok(record)
    }
}

impl RecordSink for VcfRecordWriter {
    fn write_record(&mut self, breakend: &BreakendRecord) -> Result<()> {
        let record = self.build_record(breakend)?;
        self.writer.write(&record)?;
        self.written += 1;
        Ok(())
    }
}

/// Write every record to a sink, in order
pub fn write_records<'a, S, I>(sink: &mut S, records: I) -> Result<usize>
where
    S: RecordSink + ?Sized,
    I: IntoIterator<Item = &'a BreakendRecord>,
{
    let mut count = 0;
    for record in records {
        sink.write_record(record)?;
        count += 1;
    }
    Ok(count)
}

/// Write one `id<TAB>svtype<TAB>matched` line per query. A path ending in
/// `.gz` gets BGZF output.
pub fn write_match_report(results: &[MatchResult], report_path: &Path) -> Result<()> {
    let report_file = File::create(report_path)?;
    if utils::has_gz_extension(report_path) {
        let mut buf_writer = BufWriter::new(report_file);
        let mut writer = BGZFWriter::new(&mut buf_writer, Compression::default());
        write_match_lines(results, &mut writer)?;
    } else {
        let mut writer = BufWriter::new(report_file);
        write_match_lines(results, &mut writer)?;
        writer.flush()?;
    }
    info!("Match report written to {}", report_path.display());
    Ok(())
}

fn write_match_lines<W: Write>(results: &[MatchResult], writer: &mut W) -> io::Result<()> {
    writer.write_all(b"#id\tsvtype\tmatched\n")?;
    for result in results {
        writeln!(writer, "{}", result.to_tsv_line())?;
    }
    Ok(())
}

/// Write the classification summary as pretty JSON, gzipped when the path ends in `.gz`
pub fn write_summary_json(summary: &ClassificationSummary, json_path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(summary)?;
    let file_handle = File::create(json_path)?;

    if utils::has_gz_extension(json_path) {
        let mut gzip_filehandle = GzEncoder::new(file_handle, flate2::Compression::default());
        gzip_filehandle.write_all(json_string.as_bytes())?;
        gzip_filehandle.finish()?;
    } else {
        let mut writer = io::BufWriter::new(file_handle);
        writer.write_all(json_string.as_bytes())?;
        writer.flush()?
    }
    debug!("Summary JSON written to {}", json_path.display());
    Ok(())
}
