// mod.rs - Core logic module

pub mod driver;
pub mod profile;
pub mod regime;
pub mod selector;
pub mod signal;

// Re-export main types for convenience
pub use driver::{ChromosomeOutcome, ProfileConfig, ProfileDriver, ProfileReport, DEFAULT_SCALE_READS};
pub use profile::{compute_profile, GenomeProfile, ShiftProfile};
pub use regime::{Regime, ShiftRegimes};
pub use selector::{select_fragment_length, FragmentEstimate};
pub use signal::{bit_signal, count_signal, BitSignal, CountSignal};
