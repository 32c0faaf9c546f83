// weighted_jaccard.rs - Jaccard similarity over read-start counts

use super::traits::{Polarity, ShiftMetric};
use crate::core::signal::{count_signal, mass, CountSignal};
use crate::data::StrandReads;

/// Weighted (Ruzicka) Jaccard: `xy / (xx + yy - xy)` where `xy` is the
/// summed per-position minimum of the two count signals and `xx`, `yy` are
/// the strand masses.
///
/// Scores differ from a max-overlap weighted Jaccard, which sums
/// `max(fwd, rev)` over positions where both strands have reads. That
/// variant reports larger values and can exceed 1; this one stays in
/// `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedJaccard;

#[derive(Debug, Clone, Copy)]
pub struct MassTotals {
    /// `xx + yy`
    pub xysum: u64,
}

impl WeightedJaccard {
    pub const NAME: &'static str = "exjaccard";
}

impl ShiftMetric for WeightedJaccard {
    type Signal = CountSignal;
    type Stats = MassTotals;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Weighted Jaccard index of read-start counts"
    }

    fn polarity(&self) -> Polarity {
        Polarity::HigherIsBetter
    }

    fn build_signal(&self, reads: &StrandReads, len: usize) -> CountSignal {
        count_signal(reads, 0..len)
    }

    fn prepare(&self, fwd: &CountSignal, rev: &CountSignal, _end4mp: usize) -> Result<MassTotals, String> {
        let (xx, yy) = (mass(fwd), mass(rev));
        if xx == 0 || yy == 0 {
            return Err(format!("empty count signal (forward {}, reverse {})", xx, yy));
        }
        Ok(MassTotals { xysum: xx + yy })
    }

    fn score_at(&self, stats: &MassTotals, fwd: &CountSignal, rev: &CountSignal, end4mp: usize, step: usize) -> f64 {
        let xy: u64 = fwd[..end4mp]
            .iter()
            .zip(&rev[step..step + end4mp])
            .map(|(&f, &r)| f.min(r) as u64)
            .sum();
        xy as f64 / (stats.xysum - xy) as f64
    }
}
