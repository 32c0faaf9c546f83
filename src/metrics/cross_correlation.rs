// cross_correlation.rs - Pearson-style strand cross-correlation

use super::traits::{Polarity, ShiftMetric};
use crate::core::profile::ShiftProfile;
use crate::core::signal::{count_signal, CountSignal};
use crate::data::StrandReads;

/// Mean-centred dot product of the count signals, scaled once the profile
/// is complete by `1 / (sd_fwd * sd_rev * (N - 1))`
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossCorrelation;

impl CrossCorrelation {
    pub const NAME: &'static str = "ccp";
}

/// Moments of both signals over the comparison window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean_fwd: f64,
    pub mean_rev: f64,
    pub sd_fwd: f64,
    pub sd_rev: f64,
    pub n: usize,
}

/// Mean and sample standard deviation
fn mean_sd(values: &[u16]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let ss: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
    (mean, (ss / (n - 1.0)).sqrt())
}

impl ShiftMetric for CrossCorrelation {
    type Signal = CountSignal;
    type Stats = Moments;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Cross-correlation coefficient of read-start counts"
    }

    fn polarity(&self) -> Polarity {
        Polarity::HigherIsBetter
    }

    fn build_signal(&self, reads: &StrandReads, len: usize) -> CountSignal {
        count_signal(reads, 0..len)
    }

    fn prepare(&self, fwd: &CountSignal, rev: &CountSignal, end4mp: usize) -> Result<Moments, String> {
        if end4mp < 2 {
            return Err(format!("comparison window of {} positions is too short", end4mp));
        }
        let (mean_fwd, sd_fwd) = mean_sd(&fwd[..end4mp]);
        let (mean_rev, sd_rev) = mean_sd(&rev[..end4mp]);
        if sd_fwd == 0.0 || sd_rev == 0.0 {
            return Err("constant signal inside the comparison window".to_string());
        }
        Ok(Moments {
            mean_fwd,
            mean_rev,
            sd_fwd,
            sd_rev,
            n: end4mp,
        })
    }

    fn score_at(&self, m: &Moments, fwd: &CountSignal, rev: &CountSignal, end4mp: usize, step: usize) -> f64 {
        fwd[..end4mp]
            .iter()
            .zip(&rev[step..step + end4mp])
            .map(|(&f, &r)| (f as f64 - m.mean_fwd) * (r as f64 - m.mean_rev))
            .sum()
    }

    fn finish(&self, m: &Moments, profile: &mut ShiftProfile) {
        profile.scale(1.0 / (m.sd_fwd * m.sd_rev * (m.n - 1) as f64));
    }
}
