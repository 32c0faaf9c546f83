// lib.rs - strandshift library root

//! # strandshift - strand shift profiling for single-end ChIP-seq reads
//!
//! Reads on the forward strand pile up one fragment length upstream of the
//! matching reverse-strand reads. Shifting the reverse-strand signal over a
//! range of offsets and scoring its agreement with the forward strand gives a
//! profile whose best offset estimates the fragment length.
//!
//! ## Features
//!
//! - **Four metrics**: bit Jaccard, weighted Jaccard, cross-correlation and
//!   Hamming distance, selected by name through [`metrics::MetricRegistry`]
//! - **Two regimes**: a fine regime of candidate lengths and a sparse
//!   background regime far from any real shift, used for the NSC
//! - **Parallel**: chromosome groups run on a rayon pool; the weighted
//!   metrics also split the fine regime across workers
//! - **Deterministic**: the genome profile is folded in chromosome order
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use strandshift::prelude::*;
//! use std::path::Path;
//!
//! let registry = load_genome_table(Path::new("genome_table.tsv"))?;
//! let mut genome = GenomeReads::new(&registry);
//! load_reads(Path::new("reads.tsv"), &mut genome)?;
//!
//! let driver = ProfileDriver::new(ProfileConfig {
//!     metric: "jaccard".to_string(),
//!     ..ProfileConfig::default()
//! })?;
//! let report = driver.run(&genome)?;
//! println!("fragment length: {}", report.estimate.length);
//! # Ok::<(), strandshift::SspError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod metrics;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{compute_profile, select_fragment_length, FragmentEstimate};
    pub use crate::core::{ProfileConfig, ProfileDriver, ProfileReport, ShiftProfile, ShiftRegimes};
    pub use crate::data::loaders::{load_genome_table, load_reads};
    pub use crate::data::{ChromosomeInfo, ChromosomeRegistry, Fragment, GenomeReads, Strand};
    pub use crate::error::{Result, SspError};
    pub use crate::metrics::{BitJaccard, CrossCorrelation, Hamming, WeightedJaccard};
    pub use crate::metrics::{MetricRegistry, Polarity, ProfileMetric, ShiftMetric};
    pub use crate::output::{OutputFormat, OutputSpec};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{ProfileConfig, ProfileDriver, ProfileReport, ShiftProfile};
pub use error::SspError;
pub use metrics::MetricRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "strandshift v{} - Strand shift profiling for fragment-length estimation",
        VERSION
    )
}
