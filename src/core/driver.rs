// driver.rs - Parallel profile driver over chromosome groups

use crate::core::profile::{GenomeProfile, ShiftProfile};
use crate::core::regime::ShiftRegimes;
use crate::core::selector::{select_fragment_length, FragmentEstimate};
use crate::data::{ChromosomeReads, GenomeReads};
use crate::error::{Result, SspError};
use crate::metrics::{MetricRegistry, Polarity, ProfileMetric, DEFAULT_METRIC};
use crate::output::{self, ExcludedChromosome, OutputSpec, ProfileScaling, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;

/// Normalized read total used for per-10M scaling
pub const DEFAULT_SCALE_READS: u64 = 10_000_000;

/// Validated settings of one profiling run
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub regimes: ShiftRegimes,
    pub metric: String,
    pub threads: usize,
    pub scale_reads: u64,
    pub output: Option<OutputSpec>,
    pub show_progress: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            regimes: ShiftRegimes::default(),
            metric: DEFAULT_METRIC.to_string(),
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            scale_reads: DEFAULT_SCALE_READS,
            output: None,
            show_progress: false,
        }
    }
}

/// What happened to one chromosome
#[derive(Debug)]
pub enum ChromosomeOutcome {
    Profiled {
        profile: ShiftProfile,
        autosome: bool,
        /// Set when the chromosome's output file could not be written
        write_error: Option<SspError>,
    },
    NoSignal {
        name: String,
        reason: String,
    },
}

impl ChromosomeOutcome {
    pub fn name(&self) -> &str {
        match self {
            ChromosomeOutcome::Profiled { profile, .. } => &profile.name,
            ChromosomeOutcome::NoSignal { name, .. } => name,
        }
    }

    pub fn profile(&self) -> Option<&ShiftProfile> {
        match self {
            ChromosomeOutcome::Profiled { profile, .. } => Some(profile),
            ChromosomeOutcome::NoSignal { .. } => None,
        }
    }
}

/// Result of a full run
#[derive(Debug)]
pub struct ProfileReport {
    pub metric: &'static str,
    pub polarity: Polarity,
    pub genome: ShiftProfile,
    pub estimate: FragmentEstimate,
    pub reads_weight: f64,
    /// Per chromosome, in registry order
    pub outcomes: Vec<ChromosomeOutcome>,
}

impl ProfileReport {
    /// Chromosomes folded into the genome profile
    pub fn folded(&self) -> impl Iterator<Item = &ShiftProfile> {
        self.outcomes.iter().filter_map(|o| match o {
            ChromosomeOutcome::Profiled {
                profile,
                autosome: true,
                ..
            } => Some(profile),
            _ => None,
        })
    }

    pub fn excluded(&self) -> Vec<ExcludedChromosome> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ChromosomeOutcome::NoSignal { name, reason } => Some(ExcludedChromosome {
                    name: name.clone(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Runs one metric over every chromosome and folds the genome profile
pub struct ProfileDriver {
    config: ProfileConfig,
    registry: MetricRegistry,
}

impl ProfileDriver {
    /// Validate `config`; every configuration error surfaces here, before
    /// any worker exists
    pub fn new(config: ProfileConfig) -> Result<Self> {
        let registry = MetricRegistry::new();
        config.regimes.validate()?;
        registry.resolve(&config.metric)?;
        if config.threads == 0 {
            return Err(SspError::Configuration(
                "Number of threads must be greater than 0".to_string(),
            ));
        }
        if config.scale_reads == 0 {
            return Err(SspError::Configuration(
                "Normalized read total must be greater than 0".to_string(),
            ));
        }
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn run(&self, genome: &GenomeReads) -> Result<ProfileReport> {
        let metric = self.registry.resolve(&self.config.metric)?;
        let threads = self.config.threads;
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

        let autosome_reads = genome.autosome_nread_nonred();
        let reads_weight = if autosome_reads == 0 {
            0.0
        } else {
            self.config.scale_reads as f64 / autosome_reads as f64
        };
        let scaling = ProfileScaling {
            reads_weight,
            polarity: metric.polarity(),
        };

        let chromosomes = genome.chromosomes();
        let groups = genome.partition(threads);
        info!(
            "Profiling {} chromosomes in {} groups with {} ({} threads)",
            chromosomes.len(),
            groups.len(),
            metric.name(),
            threads
        );

        let pb = self.progress_bar(chromosomes.len() as u64);
        let grouped: Vec<Vec<ChromosomeOutcome>> = pool.install(|| {
            groups
                .into_par_iter()
                .map(|range| {
                    chromosomes[range]
                        .iter()
                        .map(|chrom| {
                            let outcome = self.process(metric, chrom, scaling);
                            pb.inc(1);
                            outcome
                        })
                        .collect()
                })
                .collect()
        });
        pb.finish_and_clear();
        let outcomes: Vec<ChromosomeOutcome> = grouped.into_iter().flatten().collect();

        let mut accumulator = GenomeProfile::new();
        for outcome in &outcomes {
            if let ChromosomeOutcome::Profiled {
                profile,
                autosome: true,
                ..
            } = outcome
            {
                accumulator.fold(profile);
            }
        }
        info!(
            "Genome profile folded from {} chromosomes",
            accumulator.folded().len()
        );
        let genome_profile = accumulator.into_profile();
        if genome_profile.is_empty() {
            return Err(SspError::no_signal(
                "genome",
                "no autosome produced a profile",
            ));
        }
        let estimate = select_fragment_length(&genome_profile, metric.polarity())?;

        let report = ProfileReport {
            metric: metric.name(),
            polarity: metric.polarity(),
            genome: genome_profile,
            estimate,
            reads_weight,
            outcomes,
        };
        if let Some(spec) = &self.config.output {
            self.write_genome(spec, genome, &report, scaling)?;
        }
        Ok(report)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chromosomes {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Profile one chromosome and write its file. Only `NoSignal` is
    /// absorbed here; a failed write is logged and recorded.
    fn process(&self, metric: &dyn ProfileMetric, chrom: &ChromosomeReads, scaling: ProfileScaling) -> ChromosomeOutcome {
        #[cfg(feature = "debug-stats")]
        let started = std::time::Instant::now();

        let profile = match metric.profile(chrom, &self.config.regimes, self.config.threads) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("{}; excluded from the genome profile", e);
                let reason = match e {
                    SspError::NoSignal { reason, .. } => reason,
                    other => other.to_string(),
                };
                return ChromosomeOutcome::NoSignal {
                    name: chrom.name().to_string(),
                    reason,
                };
            }
        };

        #[cfg(feature = "debug-stats")]
        log::debug!(
            "{}: profiled {} offsets in {:.2?}",
            chrom.name(),
            profile.mp.len() + profile.nc.len(),
            started.elapsed()
        );

        let write_error = self.config.output.as_ref().and_then(|spec| {
            let path = spec.chromosome_path(metric.name(), chrom.name());
            output::write_profile(&path, spec, metric.name(), &profile, scaling)
                .err()
                .inspect(|e| error!("{}", e))
        });

        ChromosomeOutcome::Profiled {
            profile,
            autosome: chrom.is_autosome(),
            write_error,
        }
    }

    fn write_genome(&self, spec: &OutputSpec, genome: &GenomeReads, report: &ProfileReport, scaling: ProfileScaling) -> Result<()> {
        let path = spec.genome_path(report.metric);
        output::write_profile(&path, spec, report.metric, &report.genome, scaling)?;

        let mut summary = RunSummary::new(spec, report.metric, report.polarity, report.estimate.clone());
        summary.genome_reads = genome.nread();
        summary.genome_nonredundant_reads = genome.nread_nonred();
        summary.reads_weight = report.reads_weight;
        summary.chromosomes_profiled = report.folded().map(|p| p.name.clone()).collect();
        summary.chromosomes_excluded = report.excluded();
        summary.failed_outputs = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                ChromosomeOutcome::Profiled {
                    write_error: Some(SspError::Io { path, .. }),
                    ..
                } => Some(path.clone()),
                _ => None,
            })
            .collect();
        output::write_summary_json(&spec.summary_path(report.metric), &summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChromosomeInfo, ChromosomeRegistry, Fragment, Strand};

    fn genome(chroms: &[(&str, u64, &[u32], &[u32])]) -> GenomeReads {
        let registry = ChromosomeRegistry::from_chromosomes(
            chroms.iter().map(|&(n, l, _, _)| ChromosomeInfo::new(n, l)).collect(),
        )
        .unwrap();
        let mut genome = GenomeReads::new(&registry);
        for &(name, _, fwd, rev) in chroms {
            for &p in fwd {
                genome.add_fragment(&Fragment::single_end(name, Strand::Forward, p, 36)).unwrap();
            }
            for &p in rev {
                genome.add_fragment(&Fragment::single_end(name, Strand::Reverse, p, 36)).unwrap();
            }
        }
        genome
    }

    fn config(metric: &str, threads: usize) -> ProfileConfig {
        ProfileConfig {
            regimes: ShiftRegimes::new(0, 301, 400, 1_000, 100).unwrap(),
            metric: metric.to_string(),
            threads,
            ..ProfileConfig::default()
        }
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            ProfileDriver::new(config("pearson", 2)).err(),
            Some(SspError::Configuration(_))
        ));
        assert!(ProfileDriver::new(config("jaccard", 0)).is_err());
        let mut bad = config("jaccard", 1);
        bad.regimes.ng_step = 0;
        assert!(ProfileDriver::new(bad).is_err());
    }

    #[test]
    fn test_allosomes_and_empty_strands_are_not_folded() {
        let fwd: &[u32] = &[100, 100, 200, 300];
        let rev: &[u32] = &[250, 250, 350, 450];
        let none: &[u32] = &[];
        let genome = genome(&[
            ("chr1", 5_000, fwd, rev),
            ("chr2", 5_000, fwd, none),
            ("chrX", 5_000, fwd, rev),
        ]);
        let report = ProfileDriver::new(config("jaccard", 2)).unwrap().run(&genome).unwrap();

        assert_eq!(report.estimate.length, 150);
        assert_eq!(report.genome.nread, 8);
        assert_eq!(report.folded().count(), 1);
        assert_eq!(report.excluded().len(), 1);
        assert_eq!(report.excluded()[0].name, "chr2");
        assert!(report.outcomes[2].profile().is_some());
    }

    #[test]
    fn test_genome_without_signal_is_fatal() {
        let fwd: &[u32] = &[100];
        let rev: &[u32] = &[];
        let genome = genome(&[("chr1", 5_000, fwd, rev)]);
        let err = ProfileDriver::new(config("exjaccard", 1)).unwrap().run(&genome).unwrap_err();
        assert!(err.is_no_signal());
    }
}
