// mod.rs - Profile, read-statistics and summary writers

use crate::core::profile::ShiftProfile;
use crate::core::regime::Regime;
use crate::core::selector::FragmentEstimate;
use crate::data::GenomeReads;
use crate::error::{Result, SspError};
use crate::metrics::Polarity;
use log::info;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Tabular output flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            OutputFormat::Csv => b',',
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unsupported output format: {}. Use: tsv, csv", other)),
        }
    }
}

/// Where and how result files are written
#[derive(Debug, Clone)]
pub struct OutputSpec {
    pub dir: PathBuf,
    pub prefix: String,
    pub format: OutputFormat,
    /// Echoed into every file header
    pub command_line: String,
}

impl OutputSpec {
    fn path(&self, stem: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.{}", self.prefix, stem, ext))
    }

    /// `<dir>/<prefix>.<metric>.<chrom>.<ext>`
    pub fn chromosome_path(&self, metric: &str, chrom: &str) -> PathBuf {
        self.path(&format!("{}.{}", metric, chrom), self.format.extension())
    }

    /// `<dir>/<prefix>.<metric>.<ext>`
    pub fn genome_path(&self, metric: &str) -> PathBuf {
        self.path(metric, self.format.extension())
    }

    pub fn summary_path(&self, metric: &str) -> PathBuf {
        self.path(&format!("{}.summary", metric), "json")
    }

    pub fn read_stats_path(&self) -> PathBuf {
        self.path("readstats", self.format.extension())
    }
}

/// Scalars shared by every row of one profile table
#[derive(Debug, Clone, Copy)]
pub struct ProfileScaling {
    /// Reads-per-10M weight of the whole run
    pub reads_weight: f64,
    pub polarity: Polarity,
}

#[derive(Debug, Serialize)]
struct ProfileRow {
    offset: usize,
    score: f64,
    proportion: f64,
    per_10m_reads: f64,
    per_background: Option<f64>,
    regime: &'static str,
}

#[derive(Debug, Serialize)]
struct ReadStatsRow<'a> {
    chromosome: &'a str,
    length: u64,
    autosome: bool,
    reads: u64,
    nonredundant: u64,
    redundant: u64,
    normalized: f64,
    depth: f64,
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).map_err(|e| SspError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| SspError::io(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_header(writer: &mut impl Write, spec: &OutputSpec, extra: &[(&str, String)]) -> std::io::Result<()> {
    writeln!(writer, "# Command: {}", spec.command_line)?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "# strandshift v{}", env!("CARGO_PKG_VERSION"))?;
    for (key, value) in extra {
        writeln!(writer, "# {}: {}", key, value)?;
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| v.to_string())
}

/// Write one profile as an offset table, fine regime first
pub fn write_profile(
    path: &Path,
    spec: &OutputSpec,
    metric: &str,
    profile: &ShiftProfile,
    scaling: ProfileScaling,
) -> Result<()> {
    let io_err = |e: std::io::Error| SspError::io(path, e);
    let mut writer = create_file(path)?;

    let best = profile.best(scaling.polarity);
    write_header(
        &mut writer,
        spec,
        &[
            ("Metric", metric.to_string()),
            ("Scope", profile.name.clone()),
            ("Non-redundant reads", profile.nread.to_string()),
            ("Background mean", fmt_opt(profile.background_mean())),
            ("NSC", fmt_opt(profile.nsc(scaling.polarity))),
            (
                "Fragment length",
                best.map_or_else(|| "NA".to_string(), |(o, _)| o.to_string()),
            ),
        ],
    )
    .map_err(io_err)?;

    let total = profile.fine_sum();
    let ratio = profile.control_ratio();
    let mut table = csv::WriterBuilder::new()
        .delimiter(spec.format.delimiter())
        .from_writer(writer);
    for regime in [Regime::Fine, Regime::Background] {
        for (&offset, &score) in profile.map(regime) {
            table
                .serialize(ProfileRow {
                    offset,
                    score,
                    proportion: if total != 0.0 { score / total } else { 0.0 },
                    per_10m_reads: score * scaling.reads_weight,
                    per_background: ratio.map(|r| score * r),
                    regime: regime.label(),
                })
                .map_err(|e| io_err(e.into()))?;
        }
    }
    table.flush().map_err(io_err)?;

    info!("Profile {} written to {}", profile.name, path.display());
    Ok(())
}

/// Per-chromosome read counts, normalized counts and depth
pub fn write_read_stats(path: &Path, spec: &OutputSpec, genome: &GenomeReads) -> Result<()> {
    let io_err = |e: std::io::Error| SspError::io(path, e);
    let mut writer = create_file(path)?;
    write_header(
        &mut writer,
        spec,
        &[
            ("Genome length", genome.genome_len().to_string()),
            ("Genome depth", genome.depth.to_string()),
        ],
    )
    .map_err(io_err)?;

    let mut table = csv::WriterBuilder::new()
        .delimiter(spec.format.delimiter())
        .from_writer(writer);
    for chrom in genome.chromosomes() {
        table
            .serialize(ReadStatsRow {
                chromosome: chrom.name(),
                length: chrom.len(),
                autosome: chrom.is_autosome(),
                reads: chrom.nread(),
                nonredundant: chrom.nread_nonred(),
                redundant: chrom.nread_red(),
                normalized: chrom.nread_rpm(),
                depth: chrom.depth,
            })
            .map_err(|e| io_err(e.into()))?;
    }
    table.flush().map_err(io_err)?;
    Ok(())
}

/// Chromosome left out of the genome profile
#[derive(Debug, Clone, Serialize)]
pub struct ExcludedChromosome {
    pub name: String,
    pub reason: String,
}

/// Run-level JSON summary
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub version: String,
    pub generated: String,
    pub command: String,
    pub metric: String,
    pub polarity: Polarity,
    pub estimate: FragmentEstimate,
    pub genome_reads: u64,
    pub genome_nonredundant_reads: u64,
    pub reads_weight: f64,
    pub chromosomes_profiled: Vec<String>,
    pub chromosomes_excluded: Vec<ExcludedChromosome>,
    pub failed_outputs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(spec: &OutputSpec, metric: &str, polarity: Polarity, estimate: FragmentEstimate) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated: chrono::Utc::now().to_rfc3339(),
            command: spec.command_line.clone(),
            metric: metric.to_string(),
            polarity,
            estimate,
            genome_reads: 0,
            genome_nonredundant_reads: 0,
            reads_weight: 0.0,
            chromosomes_profiled: Vec::new(),
            chromosomes_excluded: Vec::new(),
            failed_outputs: Vec::new(),
        }
    }
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, summary).map_err(|e| SspError::io(path, e.into()))?;
    writeln!(writer).and_then(|_| writer.flush()).map_err(|e| SspError::io(path, e))?;
    Ok(())
}
