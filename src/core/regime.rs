// regime.rs - Fine and background shift-offset regimes

use crate::error::{Result, SspError};
use serde::{Deserialize, Serialize};
use std::iter::StepBy;
use std::ops::Range;

pub const DEFAULT_MP_FROM: usize = 0;
pub const DEFAULT_MP_TO: usize = 1_000;
pub const DEFAULT_NG_FROM: usize = 500_000;
pub const DEFAULT_NG_TO: usize = 1_000_000;
pub const DEFAULT_NG_STEP: usize = 5_000;

/// Which of the two offset regimes a score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Offsets plausible as a fragment length
    Fine,
    /// Far offsets used as the no-correlation baseline
    Background,
}

impl Regime {
    pub fn label(self) -> &'static str {
        match self {
            Regime::Fine => "fine",
            Regime::Background => "background",
        }
    }
}

/// Offset bounds: fine regime `[mp_from, mp_to)` with step 1, background
/// regime `ng_from, ng_from + ng_step, ...` below `ng_to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRegimes {
    pub mp_from: usize,
    pub mp_to: usize,
    pub ng_from: usize,
    pub ng_to: usize,
    pub ng_step: usize,
}

impl Default for ShiftRegimes {
    fn default() -> Self {
        Self {
            mp_from: DEFAULT_MP_FROM,
            mp_to: DEFAULT_MP_TO,
            ng_from: DEFAULT_NG_FROM,
            ng_to: DEFAULT_NG_TO,
            ng_step: DEFAULT_NG_STEP,
        }
    }
}

impl ShiftRegimes {
    pub fn new(mp_from: usize, mp_to: usize, ng_from: usize, ng_to: usize, ng_step: usize) -> Result<Self> {
        let regimes = Self {
            mp_from,
            mp_to,
            ng_from,
            ng_to,
            ng_step,
        };
        regimes.validate()?;
        Ok(regimes)
    }

    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| Err(SspError::Configuration(msg));
        if self.mp_to == 0 || self.ng_from == 0 || self.ng_to == 0 || self.ng_step == 0 {
            return err(format!(
                "Offset bounds must be positive (mp_to={}, ng_from={}, ng_to={}, ng_step={})",
                self.mp_to, self.ng_from, self.ng_to, self.ng_step
            ));
        }
        if self.mp_from >= self.mp_to {
            return err(format!(
                "Fine regime is empty: mp_from ({}) must be below mp_to ({})",
                self.mp_from, self.mp_to
            ));
        }
        if self.ng_from >= self.ng_to {
            return err(format!(
                "Background regime is empty: ng_from ({}) must be below ng_to ({})",
                self.ng_from, self.ng_to
            ));
        }
        if self.ng_from < self.mp_to {
            return err(format!(
                "Background regime must start at or beyond the fine regime (ng_from={} < mp_to={})",
                self.ng_from, self.mp_to
            ));
        }
        Ok(())
    }

    pub fn fine_offsets(&self) -> Range<usize> {
        self.mp_from..self.mp_to
    }

    pub fn background_offsets(&self) -> StepBy<Range<usize>> {
        (self.ng_from..self.ng_to).step_by(self.ng_step)
    }

    pub fn fine_len(&self) -> usize {
        self.mp_to - self.mp_from
    }

    /// Largest offset evaluated by either regime
    pub fn max_offset(&self) -> usize {
        let last_ng = self.ng_from + (self.ng_to - 1 - self.ng_from) / self.ng_step * self.ng_step;
        last_ng.max(self.mp_to - 1)
    }

    /// End of the comparison window for a signal of length `len`: `j + step`
    /// stays inside the signal for every evaluated offset. Zero when the
    /// signal is not longer than the largest offset.
    pub fn end4mp(&self, len: usize) -> usize {
        len.saturating_sub(self.max_offset())
    }

    /// Split the fine regime into at most `parts` contiguous sub-ranges
    pub fn split_fine(&self, parts: usize) -> Vec<Range<usize>> {
        let parts = parts.clamp(1, self.fine_len());
        let base = self.fine_len() / parts;
        let extra = self.fine_len() % parts;
        let mut ranges = Vec::with_capacity(parts);
        let mut start = self.mp_from;
        for i in 0..parts {
            let width = base + usize::from(i < extra);
            ranges.push(start..start + width);
            start += width;
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let regimes = ShiftRegimes::default();
        assert!(regimes.validate().is_ok());
        assert_eq!(regimes.background_offsets().count(), 100);
        assert_eq!(regimes.max_offset(), 995_000);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(ShiftRegimes::new(0, 0, 500, 1000, 10).is_err());
        assert!(ShiftRegimes::new(300, 200, 500, 1000, 10).is_err());
        assert!(ShiftRegimes::new(0, 300, 500, 500, 10).is_err());
        assert!(ShiftRegimes::new(0, 300, 500, 1000, 0).is_err());
        assert!(ShiftRegimes::new(0, 600, 500, 1000, 10).is_err());
        assert!(matches!(
            ShiftRegimes::new(0, 0, 0, 0, 0).unwrap_err(),
            SspError::Configuration(_)
        ));
    }

    #[test]
    fn test_end4mp() {
        let regimes = ShiftRegimes::new(0, 301, 400, 1000, 100).unwrap();
        assert_eq!(regimes.max_offset(), 900);
        assert_eq!(regimes.end4mp(5_000), 4_100);
        assert_eq!(regimes.end4mp(900), 0);
        assert_eq!(regimes.end4mp(10), 0);
    }

    #[test]
    fn test_split_fine_is_disjoint_and_complete() {
        let regimes = ShiftRegimes::new(5, 105, 200, 300, 10).unwrap();
        for parts in [1, 3, 7, 100, 500] {
            let ranges = regimes.split_fine(parts);
            assert!(ranges.len() <= parts.max(1));
            assert_eq!(ranges.first().unwrap().start, 5);
            assert_eq!(ranges.last().unwrap().end, 105);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            assert!(ranges.iter().all(|r| !r.is_empty()));
        }
    }
}
