// profile.rs - Shift-offset profiles per chromosome and genome

use crate::core::regime::{Regime, ShiftRegimes};
use crate::data::{ChromosomeReads, Strand};
use crate::error::{Result, SspError};
use crate::metrics::{Polarity, ShiftMetric};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Offset → score maps of one chromosome (or the genome) for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftProfile {
    pub name: String,
    /// Fine regime scores
    pub mp: BTreeMap<usize, f64>,
    /// Background regime scores
    pub nc: BTreeMap<usize, f64>,
    /// Non-redundant reads behind the profile
    pub nread: u64,
    pub len: u64,
    /// Comparison window end
    pub end4mp: usize,
}

impl ShiftProfile {
    pub fn new(name: impl Into<String>, nread: u64, len: u64, end4mp: usize) -> Self {
        Self {
            name: name.into(),
            mp: BTreeMap::new(),
            nc: BTreeMap::new(),
            nread,
            len,
            end4mp,
        }
    }

    pub fn set(&mut self, regime: Regime, offset: usize, score: f64) {
        self.map_mut(regime).insert(offset, score);
    }

    pub fn map(&self, regime: Regime) -> &BTreeMap<usize, f64> {
        match regime {
            Regime::Fine => &self.mp,
            Regime::Background => &self.nc,
        }
    }

    fn map_mut(&mut self, regime: Regime) -> &mut BTreeMap<usize, f64> {
        match regime {
            Regime::Fine => &mut self.mp,
            Regime::Background => &mut self.nc,
        }
    }

    /// Merge a worker's private fine-regime map. Worker ranges are disjoint.
    pub fn merge_fine(&mut self, local: BTreeMap<usize, f64>) {
        self.mp.extend(local);
    }

    pub fn scale(&mut self, factor: f64) {
        for v in self.mp.values_mut().chain(self.nc.values_mut()) {
            *v *= factor;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mp.is_empty()
    }

    pub fn fine_sum(&self) -> f64 {
        self.mp.values().sum()
    }

    /// Mean background score
    pub fn background_mean(&self) -> Option<f64> {
        if self.nc.is_empty() {
            return None;
        }
        Some(self.nc.values().sum::<f64>() / self.nc.len() as f64)
    }

    /// `1 / background_mean`, the per-background scaling factor
    pub fn control_ratio(&self) -> Option<f64> {
        self.background_mean()
            .filter(|bk| bk.is_finite() && *bk != 0.0)
            .map(|bk| 1.0 / bk)
    }

    /// Best-scoring fine-regime offset; ties go to the smallest offset and
    /// NaN scores are ignored
    pub fn best(&self, polarity: Polarity) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (&offset, &score) in self.mp.iter().filter(|(_, s)| !s.is_nan()) {
            match best {
                Some((_, b)) if !polarity.improves(score, b) => {}
                _ => best = Some((offset, score)),
            }
        }
        best
    }

    /// Normalized strand coefficient: best fine score over the background mean
    pub fn nsc(&self, polarity: Polarity) -> Option<f64> {
        let (_, score) = self.best(polarity)?;
        self.control_ratio().map(|r| score * r)
    }
}

/// Genome-wide accumulator, folded from finished chromosome profiles
#[derive(Debug, Clone)]
pub struct GenomeProfile {
    profile: ShiftProfile,
    folded: Vec<String>,
}

impl GenomeProfile {
    pub fn new() -> Self {
        Self {
            profile: ShiftProfile::new("genome", 0, 0, 0),
            folded: Vec::new(),
        }
    }

    /// Add a chromosome's offsets and read count into the genome totals
    pub fn fold(&mut self, chrom: &ShiftProfile) {
        for (&offset, &score) in &chrom.mp {
            *self.profile.mp.entry(offset).or_insert(0.0) += score;
        }
        for (&offset, &score) in &chrom.nc {
            *self.profile.nc.entry(offset).or_insert(0.0) += score;
        }
        self.profile.nread += chrom.nread;
        self.profile.len += chrom.len;
        self.profile.end4mp += chrom.end4mp;
        self.folded.push(chrom.name.clone());
    }

    pub fn folded(&self) -> &[String] {
        &self.folded
    }

    pub fn profile(&self) -> &ShiftProfile {
        &self.profile
    }

    pub fn into_profile(self) -> ShiftProfile {
        self.profile
    }
}

impl Default for GenomeProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Build both strand signals of `chrom` and score every offset of both
/// regimes with `metric`. `workers` bounds the fine-regime split for metrics
/// that score offsets in parallel.
pub fn compute_profile<M: ShiftMetric>(
    metric: &M,
    chrom: &ChromosomeReads,
    regimes: &ShiftRegimes,
    workers: usize,
) -> Result<ShiftProfile> {
    regimes.validate()?;
    let name = chrom.name();
    for strand in Strand::BOTH {
        if chrom.strand(strand).nread_nonred() == 0 {
            return Err(SspError::no_signal(
                name,
                format!("no non-redundant reads on the {} strand", strand),
            ));
        }
    }

    let len = chrom.len() as usize;
    let end4mp = regimes.end4mp(len);
    if end4mp == 0 {
        return Err(SspError::no_signal(
            name,
            format!(
                "length {} does not exceed the largest offset {}",
                len,
                regimes.max_offset()
            ),
        ));
    }

    let fwd = metric.build_signal(chrom.strand(Strand::Forward), len);
    let rev = metric.build_signal(chrom.strand(Strand::Reverse), len);
    let stats = metric
        .prepare(&fwd, &rev, end4mp)
        .map_err(|reason| SspError::no_signal(name, reason))?;

    let mut profile = ShiftProfile::new(name, chrom.nread_nonred(), chrom.len(), end4mp);
    metric.fill(&stats, &fwd, rev, regimes, workers, &mut profile);
    metric.finish(&stats, &mut profile);

    debug!(
        "{}: {} {} fine and {} background offsets over {} positions",
        name,
        metric.name(),
        profile.mp.len(),
        profile.nc.len(),
        end4mp
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Fragment;
    use crate::metrics::BitJaccard;

    fn profile(name: &str, fine: &[(usize, f64)], background: &[(usize, f64)], nread: u64) -> ShiftProfile {
        let mut p = ShiftProfile::new(name, nread, 10_000, 9_000);
        for &(o, s) in fine {
            p.set(Regime::Fine, o, s);
        }
        for &(o, s) in background {
            p.set(Regime::Background, o, s);
        }
        p
    }

    #[test]
    fn test_best_respects_polarity_and_ties() {
        let p = profile("chr1", &[(10, 0.2), (20, 0.8), (30, 0.8), (40, 0.1)], &[], 1);
        assert_eq!(p.best(Polarity::HigherIsBetter), Some((20, 0.8)));
        assert_eq!(p.best(Polarity::LowerIsBetter), Some((40, 0.1)));
        assert_eq!(ShiftProfile::new("e", 0, 0, 0).best(Polarity::HigherIsBetter), None);
    }

    #[test]
    fn test_best_skips_nan() {
        let p = profile("chr1", &[(1, f64::NAN), (2, 0.5)], &[], 1);
        assert_eq!(p.best(Polarity::HigherIsBetter), Some((2, 0.5)));
    }

    #[test]
    fn test_background_and_nsc() {
        let p = profile("chr1", &[(100, 0.6)], &[(1000, 0.1), (2000, 0.3)], 1);
        assert!((p.background_mean().unwrap() - 0.2).abs() < 1e-12);
        assert!((p.control_ratio().unwrap() - 5.0).abs() < 1e-12);
        assert!((p.nsc(Polarity::HigherIsBetter).unwrap() - 3.0).abs() < 1e-12);

        let zero_bg = profile("chr2", &[(100, 0.6)], &[(1000, 0.0)], 1);
        assert_eq!(zero_bg.control_ratio(), None);
    }

    #[test]
    fn test_genome_fold_sums() {
        let mut genome = GenomeProfile::new();
        genome.fold(&profile("chr1", &[(1, 1.0), (2, 2.0)], &[(100, 0.5)], 10));
        genome.fold(&profile("chr2", &[(1, 0.5), (2, 1.0)], &[(100, 0.25)], 4));
        let g = genome.profile();
        assert_eq!(g.mp[&1], 1.5);
        assert_eq!(g.mp[&2], 3.0);
        assert_eq!(g.nc[&100], 0.75);
        assert_eq!(g.nread, 14);
        assert_eq!(genome.folded(), &["chr1".to_string(), "chr2".to_string()]);
    }

    fn reads(name: &str, len: u64, fwd: &[u32], rev: &[u32]) -> ChromosomeReads {
        let mut chrom = ChromosomeReads::new(crate::data::ChromosomeInfo::new(name, len));
        for &p in fwd {
            chrom.add_fragment(&Fragment::single_end(name, Strand::Forward, p, 36));
        }
        for &p in rev {
            chrom.add_fragment(&Fragment::single_end(name, Strand::Reverse, p, 36));
        }
        chrom
    }

    #[test]
    fn test_compute_profile_finds_shift() {
        let regimes = ShiftRegimes::new(0, 301, 400, 1_000, 100).unwrap();
        let chrom = reads("chr1", 5_000, &[100, 100, 200, 300], &[250, 250, 350, 450]);
        let profile = compute_profile(&BitJaccard, &chrom, &regimes, 1).unwrap();
        assert_eq!(profile.mp.len(), 301);
        assert_eq!(profile.nc.len(), 6);
        assert_eq!(profile.nread, 8);
        assert_eq!(profile.best(Polarity::HigherIsBetter), Some((150, 1.0)));
    }

    #[test]
    fn test_compute_profile_no_signal() {
        let regimes = ShiftRegimes::new(0, 301, 400, 1_000, 100).unwrap();
        let one_strand = reads("chr1", 5_000, &[100, 200], &[]);
        let err = compute_profile(&BitJaccard, &one_strand, &regimes, 1).unwrap_err();
        assert!(err.is_no_signal());

        let short = reads("chr2", 900, &[100], &[250]);
        assert!(compute_profile(&BitJaccard, &short, &regimes, 1)
            .unwrap_err()
            .is_no_signal());
    }

    #[test]
    fn test_compute_profile_rejects_invalid_regimes() {
        let chrom = reads("chr1", 5_000, &[100, 100, 200, 300], &[250, 250, 350, 450]);
        let zero_step = ShiftRegimes {
            mp_from: 0,
            mp_to: 300,
            ng_from: 1_000,
            ng_to: 2_000,
            ng_step: 0,
        };
        let empty_fine = ShiftRegimes {
            mp_from: 300,
            mp_to: 300,
            ..zero_step.clone()
        };
        let no_fine = ShiftRegimes {
            mp_from: 0,
            mp_to: 0,
            ng_step: 100,
            ..zero_step.clone()
        };
        for regimes in [zero_step, empty_fine, no_fine] {
            assert!(matches!(
                compute_profile(&BitJaccard, &chrom, &regimes, 1),
                Err(SspError::Configuration(_))
            ));
            assert!(matches!(
                compute_profile(&crate::metrics::WeightedJaccard, &chrom, &regimes, 4),
                Err(SspError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_merge_and_scale() {
        let mut p = ShiftProfile::new("chr1", 0, 0, 0);
        let mut a = BTreeMap::new();
        a.insert(0, 1.0);
        let mut b = BTreeMap::new();
        b.insert(1, 2.0);
        p.merge_fine(a);
        p.merge_fine(b);
        p.set(Regime::Background, 10, 4.0);
        p.scale(0.5);
        assert_eq!(p.mp.len(), 2);
        assert_eq!(p.mp[&1], 1.0);
        assert_eq!(p.nc[&10], 2.0);
        assert_eq!(p.fine_sum(), 1.5);
    }
}
