// config.rs - Configuration file support

use crate::error::{Result, SspError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Input/Output
    pub gt: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub odir: Option<String>,
    pub format: Option<String>,

    // Profiling
    pub metric: Option<String>,
    pub mp_from: Option<usize>,
    pub mp_to: Option<usize>,
    pub ng_from: Option<usize>,
    pub ng_to: Option<usize>,
    pub ng_step: Option<usize>,

    // Performance
    pub threads: Option<usize>,

    // Chromosome filtering
    pub include_chr: Option<String>,
    pub exclude_chr: Option<String>,

    // Read model
    pub nomodel: Option<bool>,
    pub flen: Option<u32>,
    pub nrpm: Option<u64>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SspError::io(path, e))?;
        let config = Self::from_toml(&content).map_err(|e| {
            SspError::Configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SspError::Configuration(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| SspError::io(path, e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# strandshift.toml - Configuration file for strandshift
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Genome table: chromosome<TAB>length[<TAB>autosome|allosome]
gt = "/path/to/genome_table.tsv"

# Read table: chromosome<TAB>start<TAB>strand[<TAB>read_length[<TAB>duplicate]]
input = "/path/to/reads.tsv"

# Output prefix and directory
output = "sample"
odir = "results"

# Output format: tsv, csv
format = "tsv"

# =============================================================================
# PROFILING
# =============================================================================

# Shift metric: jaccard, exjaccard, ccp, hdp
metric = "jaccard"

# Fine regime [mp_from, mp_to): candidate fragment lengths
mp_from = 0
mp_to = 1000

# Background regime: ng_from, ng_from + ng_step, ... below ng_to
ng_from = 500000
ng_to = 1000000
ng_step = 5000

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 8

# =============================================================================
# CHROMOSOME FILTERING
# =============================================================================

# Profile only chromosomes matching regex pattern
# include_chr = "^chr[0-9]+$"

# Skip chromosomes matching regex pattern
# exclude_chr = "_random$|^chrUn"

# =============================================================================
# READ MODEL
# =============================================================================

# Skip profiling and use flen as the fragment length
nomodel = false
flen = 150

# Normalized read total for per-strand counts
nrpm = 10000000

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs without profiling (dry run)
dry_run = false
"#
        .to_string()
    }
}
