// selector.rs - Fragment-length selection from a genome profile

use crate::core::profile::ShiftProfile;
use crate::error::{Result, SspError};
use crate::metrics::Polarity;
use serde::Serialize;

/// Selected fragment length and the scores around it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentEstimate {
    /// Offset in base pairs
    pub length: usize,
    pub score: f64,
    pub background_mean: Option<f64>,
    pub nsc: Option<f64>,
}

/// Pick the best fine-regime offset of `profile`; ties go to the smallest
/// offset. An empty (or all-NaN) profile is `NoSignal`.
pub fn select_fragment_length(profile: &ShiftProfile, polarity: Polarity) -> Result<FragmentEstimate> {
    let (length, score) = profile
        .best(polarity)
        .ok_or_else(|| SspError::no_signal(&profile.name, "no scored fine-regime offsets"))?;
    Ok(FragmentEstimate {
        length,
        score,
        background_mean: profile.background_mean(),
        nsc: profile.control_ratio().map(|r| score * r),
    })
}
