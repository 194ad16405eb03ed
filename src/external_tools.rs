use log::{debug, info};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{Error, Result};
use crate::utils::DEFAULT_MATCH_WINDOW;

/// Rewrites a caller's VCF into a standard representation
pub trait Normalizer {
    fn normalize(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Merges calls from several VCFs into one clustered VCF
pub trait Clusterer {
    fn cluster(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// Runs `svtk standardize` and `svtk vcfcluster`
#[derive(Debug, Clone)]
pub struct SvtkCommand {
    pub program: PathBuf,
    /// Prefix for IDs written by standardize, original IDs are kept when None
    pub id_prefix: Option<String>,
    pub include_reference_sites: bool,
    /// Prefix for the IDs of merged records
    pub cluster_prefix: String,
    pub max_distance: i64,
    pub min_overlap: f64,
    pub svtypes: Vec<String>,
}

impl Default for SvtkCommand {
    fn default() -> Self {
        SvtkCommand {
            program: PathBuf::from("svtk"),
            id_prefix: None,
            include_reference_sites: false,
            cluster_prefix: "merged".to_string(),
            max_distance: DEFAULT_MATCH_WINDOW,
            min_overlap: 0.7,
            svtypes: ["INS", "DEL", "DUP", "INV", "BND"]
                .iter()
                .map(|svtype| svtype.to_string())
                .collect(),
        }
    }
}

impl SvtkCommand {
    /// Arguments of `svtk standardize`. Svaba output is read with the manta parser.
    pub fn standardize_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["standardize".into()];
        if let Some(prefix) = &self.id_prefix {
            args.push("-p".into());
            args.push(prefix.into());
        } else if self.include_reference_sites {
            args.push("--call-null-sites".into());
            args.push("include-reference-sites".into());
        }
        args.push(input.into());
        args.push(output.into());
        args.push("manta".into());
        args
    }

    pub fn vcfcluster_args(&self, mergelist: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "vcfcluster".into(),
            "--preserve-ids".into(),
            "--svtypes".into(),
            self.svtypes.join(",").into(),
            "-d".into(),
            self.max_distance.to_string().into(),
            "-f".into(),
            self.min_overlap.to_string().into(),
            "-p".into(),
            self.cluster_prefix.clone().into(),
            mergelist.into(),
            output.into(),
        ]
    }

    fn run(&self, args: Vec<OsString>) -> Result<()> {
        debug!("Running {} {:?}", self.program.display(), args);
        let status = Command::new(&self.program).args(&args).status()?;
        if !status.success() {
            return Err(Error::ExternalTool {
                tool: self.program.display().to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Write the list of VCFs handed to vcfcluster, one path per line
pub fn write_mergelist(inputs: &[PathBuf], mergelist: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(mergelist)?);
    for input in inputs {
        writeln!(writer, "{}", input.display())?;
    }
    writer.flush()?;
    Ok(())
}

impl Normalizer for SvtkCommand {
    fn normalize(&self, input: &Path, output: &Path) -> Result<()> {
        self.run(self.standardize_args(input, output))?;
        info!("Standardized {} to {}", input.display(), output.display());
        Ok(())
    }
}

impl Clusterer for SvtkCommand {
    fn cluster(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let mergelist = output.with_extension("mergelist");
        write_mergelist(inputs, &mergelist)?;
        self.run(self.vcfcluster_args(&mergelist, output))?;
        info!("Clustered {} VCFs into {}", inputs.len(), output.display());
        Ok(())
    }
}
