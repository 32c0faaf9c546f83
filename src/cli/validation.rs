// validation.rs - Input validation utilities

use crate::cli::args::{Args, DEFAULT_PREFIX};
use crate::core::driver::{ProfileConfig, DEFAULT_SCALE_READS};
use crate::core::regime::{ShiftRegimes, DEFAULT_MP_FROM, DEFAULT_MP_TO, DEFAULT_NG_FROM, DEFAULT_NG_STEP, DEFAULT_NG_TO};
use crate::error::{Result, SspError};
use crate::metrics::MetricRegistry;
use crate::output::{OutputFormat, OutputSpec};
use regex::Regex;
use std::path::PathBuf;

/// Fragment length used when profiling is skipped
pub const DEFAULT_FLEN: u32 = 150;

pub struct ValidationResult {
    pub genome_table: PathBuf,
    pub reads: PathBuf,
    pub profile: ProfileConfig,
    pub chr_include_regex: Option<Regex>,
    pub chr_exclude_regex: Option<Regex>,
    pub flen: u32,
}

fn compile(pattern: Option<&String>, what: &str) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| SspError::Configuration(format!("Invalid {} regex: {}", what, e)))
        })
        .transpose()
}

fn required(value: Option<&String>, flag: &str) -> Result<PathBuf> {
    value
        .map(PathBuf::from)
        .ok_or_else(|| SspError::Configuration(format!("{} is required", flag)))
}

/// Validate all command line arguments
pub fn validate_args(args: &Args, command_line: &str) -> Result<ValidationResult> {
    let genome_table = required(args.gt.as_ref(), "--gt")?;
    let reads = required(args.input.as_ref(), "--input")?;

    // Validate metric
    let registry = MetricRegistry::new();
    let metric = registry.resolve(&args.metric)?;

    let format: OutputFormat = args.format.parse().map_err(SspError::Configuration)?;

    let regimes = ShiftRegimes::new(
        args.mp_from.unwrap_or(DEFAULT_MP_FROM),
        args.mp_to.unwrap_or(DEFAULT_MP_TO),
        args.ng_from.unwrap_or(DEFAULT_NG_FROM),
        args.ng_to.unwrap_or(DEFAULT_NG_TO),
        args.ng_step.unwrap_or(DEFAULT_NG_STEP),
    )?;

    let defaults = ProfileConfig::default();
    let threads = args.threads.unwrap_or(defaults.threads);
    if threads == 0 {
        return Err(SspError::Configuration(
            "Number of threads must be greater than 0".to_string(),
        ));
    }

    let flen = args.flen.unwrap_or(DEFAULT_FLEN);
    if flen == 0 {
        return Err(SspError::Configuration(
            "Fragment length must be greater than 0".to_string(),
        ));
    }
    let scale_reads = args.nrpm.unwrap_or(DEFAULT_SCALE_READS);
    if scale_reads == 0 {
        return Err(SspError::Configuration(
            "Normalized read total must be greater than 0".to_string(),
        ));
    }

    let output = OutputSpec {
        dir: PathBuf::from(args.odir.as_deref().unwrap_or(".")),
        prefix: args.output.clone().unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        format,
        command_line: command_line.to_string(),
    };

    Ok(ValidationResult {
        genome_table,
        reads,
        profile: ProfileConfig {
            regimes,
            metric: metric.name().to_string(),
            threads,
            scale_reads,
            output: Some(output),
            show_progress: !args.no_progress,
        },
        chr_include_regex: compile(args.include_chr.as_ref(), "include_chr")?,
        chr_exclude_regex: compile(args.exclude_chr.as_ref(), "exclude_chr")?,
        flen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn validate(cli: &[&str]) -> Result<ValidationResult> {
        let args = Args::from_args(&["strandshift"], cli).unwrap();
        validate_args(&args, "strandshift")
    }

    #[test]
    fn test_defaults() {
        let v = validate(&["--gt", "g.tsv", "-i", "r.tsv"]).unwrap();
        assert_eq!(v.profile.metric, "jaccard");
        assert_eq!(v.profile.regimes, ShiftRegimes::default());
        assert_eq!(v.flen, DEFAULT_FLEN);
        let out = v.profile.output.unwrap();
        assert_eq!(out.prefix, DEFAULT_PREFIX);
        assert_eq!(out.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_configuration_errors() {
        for cli in [
            vec!["-i", "r.tsv"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--metric", "pearson"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--mp-to", "0"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--ng-step", "0"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--threads", "0"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--format", "nexus"],
            vec!["--gt", "g.tsv", "-i", "r.tsv", "--include-chr", "chr("],
        ] {
            let err = validate(&cli).err().unwrap();
            assert!(matches!(err, SspError::Configuration(_)), "{:?} -> {}", cli, err);
        }
    }

    #[test]
    fn test_regimes_and_filters() {
        let v = validate(&[
            "--gt", "g.tsv", "-i", "r.tsv", "--mp-from", "50", "--mp-to", "400", "--ng-from", "1000",
            "--ng-to", "5000", "--ng-step", "100", "--exclude-chr", "^chrUn",
        ])
        .unwrap();
        assert_eq!(v.profile.regimes.fine_len(), 350);
        assert!(v.chr_exclude_regex.unwrap().is_match("chrUn_gl000220"));
        assert!(v.chr_include_regex.is_none());
    }
}
