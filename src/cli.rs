use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::containers::CallerSource;
use crate::utils::DEFAULT_MATCH_WINDOW;

#[derive(Clone, Parser)]
#[clap(author, version, about,
    after_help = format!("Copyright (C) 2004-{}     Pacific Biosciences of California, Inc.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()))]
pub struct Arguments {
    #[clap(subcommand)]
    pub command: Command,

    /// Optional flag to print verbose output for debugging purposes.
    #[clap(long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Type intrachromosomal BND mate pairs as DEL, DUP or INV
    AssignSvtype {
        /// Structural variant VCF with breakend mate pairs
        #[clap(required = true)]
        #[clap(long = "vcf")]
        #[clap(value_name = "VCF")]
        vcf_filename: PathBuf,

        /// Output VCF. BGZF compressed if the name ends in .gz
        #[clap(required = true)]
        #[clap(long = "output")]
        #[clap(value_name = "VCF")]
        output: PathBuf,

        /// Write run counts as JSON. GZIP compressed if the name ends in .gz
        #[clap(required = false)]
        #[clap(long = "summary-json")]
        #[clap(value_name = "JSON")]
        summary_json: Option<PathBuf>,
    },

    /// Rewrite INS, DEL, DUP and INV calls as BND mate pairs
    ConvertToBnd {
        /// Structural variant VCF
        #[clap(required = true)]
        #[clap(long = "vcf")]
        #[clap(value_name = "VCF")]
        vcf_filename: PathBuf,

        /// Output VCF. BGZF compressed if the name ends in .gz
        #[clap(required = true)]
        #[clap(long = "output")]
        #[clap(value_name = "VCF")]
        output: PathBuf,

        /// Caller that wrote the input, decides where event lengths are read from
        #[clap(long = "source")]
        #[clap(value_name = "manta|svaba")]
        #[clap(default_value_t = CallerSource::Manta)]
        source: CallerSource,
    },

    /// Report which query records have a matching breakend in a target VCF
    MatchBreakends {
        /// VCF of records to look up
        #[clap(required = true)]
        #[clap(long = "query")]
        #[clap(value_name = "VCF")]
        query: PathBuf,

        /// VCF searched for matches
        #[clap(required = true)]
        #[clap(long = "target")]
        #[clap(value_name = "VCF")]
        target: PathBuf,

        /// Report TSV. BGZF compressed if the name ends in .gz
        #[clap(required = true)]
        #[clap(long = "output")]
        #[clap(value_name = "TSV")]
        output: PathBuf,

        /// Largest distance in bp between matching breakends and between their partners
        #[clap(long = "window")]
        #[clap(value_name = "INT")]
        #[clap(default_value_t = DEFAULT_MATCH_WINDOW)]
        window: i64,
    },
}

pub fn get_args() -> Arguments {
    Arguments::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_breakends() {
        let args = Arguments::try_parse_from([
            "svbreak",
            "match-breakends",
            "--query",
            "q.vcf",
            "--target",
            "t.vcf",
            "--output",
            "report.tsv.gz",
            "--verbose",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Command::MatchBreakends { window, output, .. } => {
                assert_eq!(window, 100);
                assert_eq!(output, PathBuf::from("report.tsv.gz"));
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_parse_convert_to_bnd_source() {
        let args = Arguments::try_parse_from([
            "svbreak",
            "convert-to-bnd",
            "--vcf",
            "in.vcf",
            "--output",
            "out.vcf",
            "--source",
            "svaba",
        ])
        .unwrap();
        assert!(!args.verbose);
        match args.command {
            Command::ConvertToBnd { source, .. } => assert_eq!(source, CallerSource::Svaba),
            _ => panic!("wrong subcommand"),
        }

        let bad_source = Arguments::try_parse_from([
            "svbreak",
            "convert-to-bnd",
            "--vcf",
            "in.vcf",
            "--output",
            "out.vcf",
            "--source",
            "delly",
        ]);
        assert!(bad_source.is_err());
    }

    #[test]
    fn test_parse_assign_svtype_requires_output() {
        let missing_output = Arguments::try_parse_from(["svbreak", "assign-svtype", "--vcf", "in.vcf"]);
        assert!(missing_output.is_err());
    }
}
