use std::env;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, error, info, LevelFilter};
use svbreak::breakend_matcher::find_matches;
use svbreak::bnd_synthesizer::{convert_indel, convert_to_bnd};
use svbreak::cli::{get_args, Arguments, Command};
use svbreak::containers::CallerSource;
use svbreak::errors::{Error, Result};
use svbreak::ingester::{read_breakend_records, read_header};
use svbreak::record_index::{BreakendIndex, RecordSink};
use svbreak::result_writer::{
    write_match_report, write_records, write_summary_json, VcfRecordWriter,
};
use svbreak::svtype_classifier::assign_svtypes;
use svbreak::utils::is_local_file;

fn set_up() -> Arguments {
    let args = get_args();
    let filter_level: LevelFilter = match args.verbose {
        false => LevelFilter::Info,
        true => LevelFilter::Debug,
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let version = env!("CARGO_PKG_VERSION");
    info!("\nRunning svbreak v{version}\n");

    let cmd: Vec<String> = env::args().collect();
    let cmd_str = cmd.join(" ");
    debug!("Run command: {cmd_str}");

    let inputs: Vec<&PathBuf> = match &args.command {
        Command::AssignSvtype { vcf_filename, .. } => vec![vcf_filename],
        Command::ConvertToBnd { vcf_filename, .. } => vec![vcf_filename],
        Command::MatchBreakends { query, target, .. } => vec![query, target],
    };
    for input in inputs {
        if !is_local_file(input) {
            error!("Input VCF does not exist: \"{}\"", input.display());
            std::process::exit(exitcode::NOINPUT);
        }
    }
    if let Command::MatchBreakends { window, .. } = &args.command {
        if *window < 0 {
            error!("--window must not be negative");
            std::process::exit(exitcode::CONFIG);
        }
    }

    args
}

fn log_time(start_time: SystemTime) {
    let elapsed_time = start_time
        .elapsed()
        .map(|t| t.as_secs())
        .unwrap_or_default();
    let hours = elapsed_time / 3600;
    let minutes = (elapsed_time % 3600) / 60;
    let seconds = elapsed_time % 60;
    debug!("Running time: {hours}h:{minutes}m:{seconds}s");
}

fn exit_code(error: &Error) -> exitcode::ExitCode {
    match error {
        Error::Io(_) | Error::Htslib(_) | Error::Json(_) => exitcode::IOERR,
        Error::ExternalTool { .. } => exitcode::SOFTWARE,
        _ => exitcode::DATAERR,
    }
}

/// Returns the number of mate groups that could not be paired
fn assign_svtype(vcf_filename: &Path, output: &Path, summary_json: Option<&Path>) -> Result<usize> {
    let records = read_breakend_records(vcf_filename)?;
    let run = assign_svtypes(records);
    for failure in run.failures.iter() {
        error!("{}", failure);
    }

    let header = read_header(vcf_filename)?;
    let mut writer = VcfRecordWriter::create(&header, output)?;
    write_records(&mut writer, &run.records)?;
    info!("VCF written to {}", output.display());

    run.summary.log_summary();
    run.summary.check_accounting()?;
    if let Some(json_path) = summary_json {
        write_summary_json(&run.summary, json_path)?;
    }
    Ok(run.failures.len())
}

fn convert_to_breakends(vcf_filename: &Path, output: &Path, source: CallerSource) -> Result<()> {
    let records = read_breakend_records(vcf_filename)?;
    let input_count = records.len();
    let header = read_header(vcf_filename)?;
    let mut writer = VcfRecordWriter::create(&header, output)?;
    for record in records {
        let record = match source {
            CallerSource::Svaba => convert_indel(record)?,
            CallerSource::Manta => record,
        };
        for converted in convert_to_bnd(record, source)? {
            writer.write_record(&converted)?;
        }
    }
    info!(
        "{} {} records written as {} records to {}",
        input_count,
        source,
        writer.written(),
        output.display()
    );
    Ok(())
}

fn match_breakends(query: &Path, target: &Path, output: &Path, window: i64) -> Result<()> {
    let queries = BreakendIndex::new(read_breakend_records(query)?);
    let targets = BreakendIndex::new(read_breakend_records(target)?);
    let results = find_matches(&queries, &targets, window)?;
    write_match_report(&results, output)
}

fn main() {
    ///////////////////////////////////////////////////////////////////////////
    // Set up
    let args = set_up();
    let start_time = SystemTime::now();

    let outcome = match &args.command {
        Command::AssignSvtype {
            vcf_filename,
            output,
            summary_json,
        } => assign_svtype(vcf_filename, output, summary_json.as_deref()).map(|failed_groups| {
            if failed_groups > 0 {
                error!("{} mate groups could not be paired", failed_groups);
                log_time(start_time);
                std::process::exit(exitcode::DATAERR);
            }
        }),
        Command::ConvertToBnd {
            vcf_filename,
            output,
            source,
        } => convert_to_breakends(vcf_filename, output, *source),
        Command::MatchBreakends {
            query,
            target,
            output,
            window,
        } => match_breakends(query, target, output, *window),
    };

    if let Err(error) = outcome {
        error!("{}", error);
        std::process::exit(exit_code(&error));
    }
    log_time(start_time);
}
