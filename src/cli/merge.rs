// merge.rs - Merge configuration file with CLI arguments

use crate::cli::args::DEFAULT_FORMAT;
use crate::cli::{Args, Config};
use crate::error::Result;
use crate::metrics::DEFAULT_METRIC;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.gt.is_none() {
            self.gt = config.gt;
        }
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.odir.is_none() {
            self.odir = config.odir;
        }

        // String settings with defaults (only override defaults, not explicit CLI values)
        if let Some(format) = config.format {
            if self.format == DEFAULT_FORMAT {
                self.format = format;
            }
        }
        if let Some(metric) = config.metric {
            if self.metric == DEFAULT_METRIC {
                self.metric = metric;
            }
        }

        // Offset regimes
        self.mp_from = self.mp_from.or(config.mp_from);
        self.mp_to = self.mp_to.or(config.mp_to);
        self.ng_from = self.ng_from.or(config.ng_from);
        self.ng_to = self.ng_to.or(config.ng_to);
        self.ng_step = self.ng_step.or(config.ng_step);

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Chromosome filtering
        if self.include_chr.is_none() {
            self.include_chr = config.include_chr;
        }
        if self.exclude_chr.is_none() {
            self.exclude_chr = config.exclude_chr;
        }

        // Read model
        self.flen = self.flen.or(config.flen);
        self.nrpm = self.nrpm.or(config.nrpm);

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.nomodel && config.nomodel.unwrap_or(false) {
            self.nomodel = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn args(cli: &[&str]) -> Args {
        Args::from_args(&["strandshift"], cli).unwrap()
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = Config {
            metric: Some("ccp".to_string()),
            mp_to: Some(500),
            threads: Some(2),
            gt: Some("config_gt.tsv".to_string()),
            ..Config::new()
        };
        let merged = args(&["--metric", "hdp", "--gt", "cli_gt.tsv"]).merge_with_config(config);
        assert_eq!(merged.metric, "hdp");
        assert_eq!(merged.gt.as_deref(), Some("cli_gt.tsv"));
        assert_eq!(merged.mp_to, Some(500));
        assert_eq!(merged.threads, Some(2));
    }

    #[test]
    fn test_config_wins_over_defaults() {
        let config = Config {
            metric: Some("exjaccard".to_string()),
            format: Some("csv".to_string()),
            nomodel: Some(true),
            flen: Some(200),
            ..Config::new()
        };
        let merged = args(&[]).merge_with_config(config);
        assert_eq!(merged.metric, "exjaccard");
        assert_eq!(merged.format, "csv");
        assert!(merged.nomodel);
        assert_eq!(merged.flen, Some(200));
        assert_eq!(merged.ng_step, None);
    }
}
