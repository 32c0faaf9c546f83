// read.rs - Read, fragment and per-strand read collection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strand of a mapped read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub const BOTH: [Strand; 2] = [Strand::Forward, Strand::Reverse];

    pub fn index(self) -> usize {
        match self {
            Strand::Forward => 0,
            Strand::Reverse => 1,
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "F" | "f" | "0" => Ok(Strand::Forward),
            "-" | "R" | "r" | "1" => Ok(Strand::Reverse),
            other => Err(format!("Invalid strand '{}'. Use + or -", other)),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// Mapped fragment as delivered by ingestion; consumed into a [`Read`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub chrom: String,
    pub strand: Strand,
    /// 0-based 5' position of the sequenced end
    pub f3: u32,
    /// Observed fragment length (paired-end only, 0 otherwise)
    pub fraglen: u32,
    pub readlen: u32,
    pub duplicate: bool,
}

impl Fragment {
    pub fn single_end(chrom: impl Into<String>, strand: Strand, f3: u32, readlen: u32) -> Self {
        Self {
            chrom: chrom.into(),
            strand,
            f3,
            fraglen: 0,
            readlen,
            duplicate: false,
        }
    }
}

/// One sequenced read
#[derive(Debug, Clone, PartialEq)]
pub struct Read {
    /// 5' start of the sequenced end
    pub f3: u32,
    /// Inferred 5' start of the other fragment end; equals `f3` until a
    /// fragment length is known
    pub f5: i64,
    /// Normalization weight; zero for duplicates once a weight is applied
    pub weight: f64,
    pub duplicate: bool,
    pub inpeak: bool,
}

impl Read {
    pub fn from_fragment(frag: &Fragment) -> Self {
        let mut read = Self {
            f3: frag.f3,
            f5: frag.f3 as i64,
            weight: 1.0,
            duplicate: frag.duplicate,
            inpeak: false,
        };
        read.extend(frag.strand, frag.fraglen);
        read
    }

    /// Set `f5` from a fragment length, downstream for forward reads and
    /// upstream for reverse reads
    pub fn extend(&mut self, strand: Strand, flen: u32) {
        self.f5 = match strand {
            Strand::Forward => self.f3 as i64 + flen as i64,
            Strand::Reverse => self.f3 as i64 - flen as i64,
        };
    }
}

/// Append-only collection of the reads on one strand of one chromosome
#[derive(Debug, Clone, Default)]
pub struct StrandReads {
    reads: Vec<Read>,
    nread_rpm: f64,
}

impl StrandReads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, read: Read) {
        self.reads.push(read);
    }

    pub fn reads(&self) -> &[Read] {
        &self.reads
    }

    /// Mutable access for downstream passes (duplicate marking, F5, in-peak)
    pub fn reads_mut(&mut self) -> &mut [Read] {
        &mut self.reads
    }

    pub fn nread(&self) -> u64 {
        self.reads.len() as u64
    }

    pub fn nread_nonred(&self) -> u64 {
        self.reads.iter().filter(|r| !r.duplicate).count() as u64
    }

    pub fn nread_red(&self) -> u64 {
        self.reads.iter().filter(|r| r.duplicate).count() as u64
    }

    /// Normalized read count, set by [`StrandReads::set_weight`]
    pub fn nread_rpm(&self) -> f64 {
        self.nread_rpm
    }

    /// Weight every non-redundant read by `w`; duplicates carry no weight
    pub fn set_weight(&mut self, w: f64) {
        for read in &mut self.reads {
            read.weight = if read.duplicate { 0.0 } else { w };
        }
        self.nread_rpm = self.reads.iter().map(|r| r.weight).sum();
    }

    pub fn set_f5(&mut self, strand: Strand, flen: u32) {
        for read in &mut self.reads {
            read.extend(strand, flen);
        }
    }
}
