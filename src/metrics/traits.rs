// traits.rs - Shift metric capability set

use crate::core::profile::{compute_profile, ShiftProfile};
use crate::core::regime::{Regime, ShiftRegimes};
use crate::data::{ChromosomeReads, StrandReads};
use crate::error::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Direction in which a score improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl Polarity {
    /// Whether `candidate` strictly beats `incumbent`
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Polarity::HigherIsBetter => candidate > incumbent,
            Polarity::LowerIsBetter => candidate < incumbent,
        }
    }
}

/// One strand-shift metric: how to build its signals and score one offset.
///
/// `fill` drives both regimes. The default scores fine-regime sub-ranges on
/// the current rayon pool, each worker collecting into a private map that
/// is merged after join, then scores the background regime sequentially.
pub trait ShiftMetric: Send + Sync {
    type Signal: Send + Sync;
    type Stats: Send + Sync;

    /// Tag used on the command line and in output file names
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn polarity(&self) -> Polarity;

    /// Signal over `[0, len)` of one strand
    fn build_signal(&self, reads: &StrandReads, len: usize) -> Self::Signal;

    /// Offset-independent quantities. An `Err` carries the reason the
    /// signals cannot be scored.
    fn prepare(&self, fwd: &Self::Signal, rev: &Self::Signal, end4mp: usize) -> std::result::Result<Self::Stats, String>;

    /// Score reverse shifted by `step` against forward over `[0, end4mp)`
    fn score_at(&self, stats: &Self::Stats, fwd: &Self::Signal, rev: &Self::Signal, end4mp: usize, step: usize) -> f64;

    /// Profile-wide adjustment applied once every offset is scored
    fn finish(&self, _stats: &Self::Stats, _profile: &mut ShiftProfile) {}

    fn fill(
        &self,
        stats: &Self::Stats,
        fwd: &Self::Signal,
        rev: Self::Signal,
        regimes: &ShiftRegimes,
        workers: usize,
        profile: &mut ShiftProfile,
    ) {
        let end4mp = profile.end4mp;
        let locals: Vec<BTreeMap<usize, f64>> = regimes
            .split_fine(workers)
            .into_par_iter()
            .map(|range| {
                range
                    .map(|step| (step, self.score_at(stats, fwd, &rev, end4mp, step)))
                    .collect()
            })
            .collect();
        for local in locals {
            profile.merge_fine(local);
        }

        for step in regimes.background_offsets() {
            let score = self.score_at(stats, fwd, &rev, end4mp, step);
            profile.set(Regime::Background, step, score);
        }
    }
}

/// Object-safe view of a [`ShiftMetric`], used by the registry and driver
pub trait ProfileMetric: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn polarity(&self) -> Polarity;

    /// Full fine + background profile of one chromosome
    fn profile(&self, chrom: &ChromosomeReads, regimes: &ShiftRegimes, workers: usize) -> Result<ShiftProfile>;
}

impl<M: ShiftMetric> ProfileMetric for M {
    fn name(&self) -> &'static str {
        ShiftMetric::name(self)
    }

    fn description(&self) -> &'static str {
        ShiftMetric::description(self)
    }

    fn polarity(&self) -> Polarity {
        ShiftMetric::polarity(self)
    }

    fn profile(&self, chrom: &ChromosomeReads, regimes: &ShiftRegimes, workers: usize) -> Result<ShiftProfile> {
        compute_profile(self, chrom, regimes, workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity() {
        assert!(Polarity::HigherIsBetter.improves(0.9, 0.5));
        assert!(!Polarity::HigherIsBetter.improves(0.5, 0.5));
        assert!(Polarity::LowerIsBetter.improves(1.0, 2.0));
        assert!(!Polarity::LowerIsBetter.improves(2.0, 2.0));
    }
}
