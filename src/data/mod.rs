// mod.rs - Read model and chromosome registry

pub mod genome;
pub mod loaders;
pub mod read;

// Re-export main types for convenience
pub use genome::{ChromosomeClass, ChromosomeInfo, ChromosomeReads, ChromosomeRegistry, GenomeReads};
pub use read::{Fragment, Read, Strand, StrandReads};
