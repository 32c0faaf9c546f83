// hamming.rs - Hamming distance between presence signals

use super::traits::{Polarity, ShiftMetric};
use crate::core::profile::ShiftProfile;
use crate::core::regime::ShiftRegimes;
use crate::core::signal::{bit_signal, count_pairwise, shifted_pairs, walk_offsets, BitSignal};
use crate::data::StrandReads;

/// Positions where exactly one strand has a read start, over the whole
/// signal. Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl Hamming {
    pub const NAME: &'static str = "hdp";
}

impl ShiftMetric for Hamming {
    type Signal = BitSignal;
    type Stats = ();

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Hamming distance of read-start presence"
    }

    fn polarity(&self) -> Polarity {
        Polarity::LowerIsBetter
    }

    fn build_signal(&self, reads: &StrandReads, len: usize) -> BitSignal {
        bit_signal(reads, 0..len)
    }

    fn prepare(&self, fwd: &BitSignal, rev: &BitSignal, _end4mp: usize) -> Result<(), String> {
        if fwd.not_any() || rev.not_any() {
            return Err("empty presence signal".to_string());
        }
        Ok(())
    }

    fn score_at(&self, _stats: &(), fwd: &BitSignal, rev: &BitSignal, _end4mp: usize, step: usize) -> f64 {
        shifted_pairs(fwd, rev, step).filter(|&(f, r)| f != r).count() as f64
    }

    fn fill(
        &self,
        _stats: &(),
        fwd: &BitSignal,
        rev: BitSignal,
        regimes: &ShiftRegimes,
        _workers: usize,
        profile: &mut ShiftProfile,
    ) {
        walk_offsets(rev, regimes, |regime, step, shifted| {
            let diff = count_pairwise(fwd, shifted, fwd.len(), |a, b| a ^ b);
            profile.set(regime, step, diff as f64);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;

    #[test]
    fn test_identical_signals_distance_zero() {
        let mut fwd = bitvec![u64, Lsb0; 0; 64];
        fwd.set(7, true);
        fwd.set(30, true);
        assert_eq!(Hamming.score_at(&(), &fwd, &fwd, 40, 0), 0.0);
    }

    #[test]
    fn test_disjoint_signals() {
        let mut fwd = bitvec![u64, Lsb0; 0; 64];
        let mut rev = bitvec![u64, Lsb0; 0; 64];
        fwd.set(2, true);
        rev.set(10, true);
        assert_eq!(Hamming.score_at(&(), &fwd, &rev, 32, 0), 2.0);
        assert_eq!(Hamming.score_at(&(), &fwd, &rev, 32, 8), 0.0);
        assert!(Hamming.prepare(&bitvec![u64, Lsb0; 0; 64], &rev, 32).is_err());
    }

    #[test]
    fn test_fill_matches_direct() {
        let regimes = ShiftRegimes::new(1, 40, 50, 90, 13).unwrap();
        let mut fwd = bitvec![u64, Lsb0; 0; 300];
        let mut rev = bitvec![u64, Lsb0; 0; 300];
        for i in (0..300).step_by(7) {
            fwd.set(i, true);
        }
        for i in (3..300).step_by(11) {
            rev.set(i, true);
        }
        let end4mp = regimes.end4mp(300);
        let mut profile = ShiftProfile::new("chr1", 0, 300, end4mp);
        Hamming.fill(&(), &fwd, rev.clone(), &regimes, 4, &mut profile);
        assert_eq!(profile.mp.len(), 39);
        assert_eq!(profile.nc.len(), 4);
        for (&step, &score) in profile.mp.iter().chain(profile.nc.iter()) {
            assert_eq!(score, Hamming.score_at(&(), &fwd, &rev, end4mp, step));
        }
    }
}
