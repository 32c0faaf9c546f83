// bit_jaccard.rs - Jaccard similarity over read-start presence bits

use super::traits::{Polarity, ShiftMetric};
use crate::core::profile::ShiftProfile;
use crate::core::regime::ShiftRegimes;
use crate::core::signal::{bit_signal, count_pairwise, shifted_pairs, walk_offsets, BitSignal};
use crate::data::StrandReads;

#[derive(Debug, Clone, Copy, Default)]
pub struct BitJaccard;

impl BitJaccard {
    pub const NAME: &'static str = "jaccard";
}

/// Popcounts of both whole signals
#[derive(Debug, Clone, Copy)]
pub struct PresenceTotals {
    pub xysum: u64,
}

fn ratio(xy: u64, xysum: u64) -> f64 {
    xy as f64 / (xysum - xy) as f64
}

impl ShiftMetric for BitJaccard {
    type Signal = BitSignal;
    type Stats = PresenceTotals;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Jaccard index of read-start presence"
    }

    fn polarity(&self) -> Polarity {
        Polarity::HigherIsBetter
    }

    fn build_signal(&self, reads: &StrandReads, len: usize) -> BitSignal {
        bit_signal(reads, 0..len)
    }

    fn prepare(&self, fwd: &BitSignal, rev: &BitSignal, _end4mp: usize) -> Result<PresenceTotals, String> {
        let (xx, yy) = (fwd.count_ones() as u64, rev.count_ones() as u64);
        if xx == 0 || yy == 0 {
            return Err(format!("empty presence signal (forward {}, reverse {})", xx, yy));
        }
        Ok(PresenceTotals { xysum: xx + yy })
    }

    /// Direct evaluation at one offset, without the incremental shift. Bit
    /// metrics compare the whole signal; reverse bits shifted past the start
    /// are dropped.
    fn score_at(&self, stats: &PresenceTotals, fwd: &BitSignal, rev: &BitSignal, _end4mp: usize, step: usize) -> f64 {
        let xy = shifted_pairs(fwd, rev, step).filter(|&(f, r)| f && r).count() as u64;
        ratio(xy, stats.xysum)
    }

    fn fill(
        &self,
        stats: &PresenceTotals,
        fwd: &BitSignal,
        rev: BitSignal,
        regimes: &ShiftRegimes,
        _workers: usize,
        profile: &mut ShiftProfile,
    ) {
        walk_offsets(rev, regimes, |regime, step, shifted| {
            let xy = count_pairwise(fwd, shifted, fwd.len(), |a, b| a & b);
            profile.set(regime, step, ratio(xy, stats.xysum));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;

    #[test]
    fn test_identical_signals_score_one() {
        let metric = BitJaccard;
        let mut fwd = bitvec![u64, Lsb0; 0; 100];
        fwd.set(3, true);
        fwd.set(40, true);
        fwd.set(90, true);
        let stats = metric.prepare(&fwd, &fwd, 50).unwrap();
        assert_eq!(metric.score_at(&stats, &fwd, &fwd, 50, 0), 1.0);
    }

    #[test]
    fn test_fill_matches_direct() {
        let metric = BitJaccard;
        let regimes = ShiftRegimes::new(0, 20, 30, 60, 10).unwrap();
        let mut fwd = bitvec![u64, Lsb0; 0; 200];
        let mut rev = bitvec![u64, Lsb0; 0; 200];
        for i in [5, 17, 64, 90, 128] {
            fwd.set(i, true);
            rev.set(i + 12, true);
        }
        let end4mp = regimes.end4mp(200);
        let stats = metric.prepare(&fwd, &rev, end4mp).unwrap();
        let mut profile = ShiftProfile::new("chr1", 10, 200, end4mp);
        metric.fill(&stats, &fwd, rev.clone(), &regimes, 1, &mut profile);

        for (&step, &score) in profile.mp.iter().chain(profile.nc.iter()) {
            assert_eq!(score, metric.score_at(&stats, &fwd, &rev, end4mp, step), "offset {}", step);
        }
        assert_eq!(profile.mp[&12], 1.0);
    }
}
