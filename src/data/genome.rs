// genome.rs - Chromosome registry and per-chromosome read statistics

use crate::data::read::{Fragment, Read, Strand, StrandReads};
use crate::error::{Result, SspError};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Whether a chromosome takes part in genome-wide aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromosomeClass {
    Autosome,
    Allosome,
}

impl ChromosomeClass {
    /// Classify from the chromosome name: sex and organellar chromosomes are
    /// allosomes, everything else is an autosome
    pub fn from_name(name: &str) -> Self {
        let bare = name
            .strip_prefix("chr")
            .or_else(|| name.strip_prefix("Chr"))
            .unwrap_or(name);
        match bare.to_ascii_uppercase().as_str() {
            "X" | "Y" | "M" | "MT" | "W" | "Z" => ChromosomeClass::Allosome,
            _ => ChromosomeClass::Autosome,
        }
    }

    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "autosome" | "a" => Ok(ChromosomeClass::Autosome),
            "allosome" | "sex" | "s" => Ok(ChromosomeClass::Allosome),
            other => Err(format!(
                "Invalid chromosome class '{}'. Use autosome or allosome",
                other
            )),
        }
    }
}

/// Registry entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeInfo {
    pub name: String,
    pub len: u64,
    pub class: ChromosomeClass,
}

impl ChromosomeInfo {
    pub fn new(name: impl Into<String>, len: u64) -> Self {
        let name = name.into();
        let class = ChromosomeClass::from_name(&name);
        Self { name, len, class }
    }

    pub fn with_class(name: impl Into<String>, len: u64, class: ChromosomeClass) -> Self {
        Self {
            name: name.into(),
            len,
            class,
        }
    }

    pub fn is_autosome(&self) -> bool {
        self.class == ChromosomeClass::Autosome
    }
}

/// Ordered chromosome registry (genome table)
#[derive(Debug, Clone, Default)]
pub struct ChromosomeRegistry {
    chromosomes: Vec<ChromosomeInfo>,
    index: HashMap<String, usize>,
}

impl ChromosomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chromosomes(chromosomes: Vec<ChromosomeInfo>) -> Result<Self> {
        let mut registry = Self::new();
        for chrom in chromosomes {
            registry.register(chrom)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, chrom: ChromosomeInfo) -> Result<()> {
        if self.index.contains_key(&chrom.name) {
            return Err(SspError::Configuration(format!(
                "Chromosome '{}' listed twice in the genome table",
                chrom.name
            )));
        }
        self.index.insert(chrom.name.clone(), self.chromosomes.len());
        self.chromosomes.push(chrom);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ChromosomeInfo> {
        self.index.get(name).map(|&i| &self.chromosomes[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn chromosomes(&self) -> &[ChromosomeInfo] {
        &self.chromosomes
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Keep only chromosomes passing the include/exclude patterns
    pub fn filtered(&self, include: Option<&Regex>, exclude: Option<&Regex>) -> Result<Self> {
        let kept = self
            .chromosomes
            .iter()
            .filter(|c| include.map_or(true, |re| re.is_match(&c.name)))
            .filter(|c| exclude.map_or(true, |re| !re.is_match(&c.name)))
            .cloned()
            .collect();
        Self::from_chromosomes(kept)
    }
}

/// Reads and derived statistics of one chromosome
#[derive(Debug, Clone)]
pub struct ChromosomeReads {
    pub info: ChromosomeInfo,
    strands: [StrandReads; 2],
    pub depth: f64,
    pub weight: f64,
}

impl ChromosomeReads {
    pub fn new(info: ChromosomeInfo) -> Self {
        Self {
            info,
            strands: [StrandReads::new(), StrandReads::new()],
            depth: 0.0,
            weight: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn len(&self) -> u64 {
        self.info.len
    }

    pub fn is_empty(&self) -> bool {
        self.strands.iter().all(|s| s.nread() == 0)
    }

    pub fn is_autosome(&self) -> bool {
        self.info.is_autosome()
    }

    pub fn strand(&self, strand: Strand) -> &StrandReads {
        &self.strands[strand.index()]
    }

    pub fn strand_mut(&mut self, strand: Strand) -> &mut StrandReads {
        &mut self.strands[strand.index()]
    }

    pub fn add_fragment(&mut self, frag: &Fragment) {
        self.strands[frag.strand.index()].push(Read::from_fragment(frag));
    }

    pub fn nread(&self) -> u64 {
        self.strands.iter().map(|s| s.nread()).sum()
    }

    pub fn nread_nonred(&self) -> u64 {
        self.strands.iter().map(|s| s.nread_nonred()).sum()
    }

    pub fn nread_red(&self) -> u64 {
        self.strands.iter().map(|s| s.nread_red()).sum()
    }

    pub fn nread_rpm(&self) -> f64 {
        self.strands.iter().map(|s| s.nread_rpm()).sum()
    }

    pub fn set_f5(&mut self, flen: u32) {
        for strand in Strand::BOTH {
            self.strands[strand.index()].set_f5(strand, flen);
        }
    }

    /// Average read depth once reads are extended to `flen`
    pub fn calc_depth(&mut self, flen: u32) {
        self.depth = depth(self.nread_nonred(), flen, self.info.len);
    }

    pub fn set_weight(&mut self, w: f64) {
        self.weight = w;
        for strand in &mut self.strands {
            strand.set_weight(w);
        }
    }
}

fn depth(nread_nonred: u64, flen: u32, len: u64) -> f64 {
    if len == 0 {
        0.0
    } else {
        nread_nonred as f64 * flen as f64 / len as f64
    }
}

/// All chromosomes' reads, in registry order
#[derive(Debug, Clone)]
pub struct GenomeReads {
    chromosomes: Vec<ChromosomeReads>,
    index: HashMap<String, usize>,
    dropped: BTreeMap<String, u64>,
    pub depth: f64,
}

impl GenomeReads {
    pub fn new(registry: &ChromosomeRegistry) -> Self {
        let chromosomes: Vec<ChromosomeReads> = registry
            .chromosomes()
            .iter()
            .cloned()
            .map(ChromosomeReads::new)
            .collect();
        let index = chromosomes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name().to_string(), i))
            .collect();
        Self {
            chromosomes,
            index,
            dropped: BTreeMap::new(),
            depth: 0.0,
        }
    }

    /// Add one fragment, failing with `MissingChromosomeData` when its
    /// chromosome is not registered
    pub fn add_fragment(&mut self, frag: &Fragment) -> Result<()> {
        match self.index.get(&frag.chrom) {
            Some(&i) => {
                self.chromosomes[i].add_fragment(frag);
                Ok(())
            }
            None => Err(SspError::MissingChromosomeData {
                chrom: frag.chrom.clone(),
            }),
        }
    }

    /// Add fragments, dropping those on unknown chromosomes with one warning
    /// per chromosome name. Returns the number of reads kept.
    pub fn ingest<I>(&mut self, fragments: I) -> u64
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut kept = 0;
        for frag in fragments {
            match self.add_fragment(&frag) {
                Ok(()) => kept += 1,
                Err(SspError::MissingChromosomeData { chrom }) => {
                    let count = self.dropped.entry(chrom.clone()).or_insert(0);
                    if *count == 0 {
                        warn!("{} is not in the genome table; its reads are skipped", chrom);
                    }
                    *count += 1;
                }
                Err(e) => warn!("Skipping read: {}", e),
            }
        }
        kept
    }

    /// Reads dropped per unknown chromosome name
    pub fn dropped(&self) -> &BTreeMap<String, u64> {
        &self.dropped
    }

    pub fn chromosomes(&self) -> &[ChromosomeReads] {
        &self.chromosomes
    }

    pub fn chromosomes_mut(&mut self) -> &mut [ChromosomeReads] {
        &mut self.chromosomes
    }

    pub fn get(&self, name: &str) -> Option<&ChromosomeReads> {
        self.index.get(name).map(|&i| &self.chromosomes[i])
    }

    pub fn nread(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.nread()).sum()
    }

    pub fn nread_nonred(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.nread_nonred()).sum()
    }

    pub fn nread_red(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.nread_red()).sum()
    }

    /// Non-redundant reads on autosomes, the base of genome-wide scaling
    pub fn autosome_nread_nonred(&self) -> u64 {
        self.chromosomes
            .iter()
            .filter(|c| c.is_autosome())
            .map(|c| c.nread_nonred())
            .sum()
    }

    pub fn genome_len(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.len()).sum()
    }

    pub fn set_f5(&mut self, flen: u32) {
        for chrom in &mut self.chromosomes {
            chrom.set_f5(flen);
        }
    }

    pub fn calc_depth(&mut self, flen: u32) {
        for chrom in &mut self.chromosomes {
            chrom.calc_depth(flen);
        }
        self.depth = depth(self.nread_nonred(), flen, self.genome_len());
    }

    /// Weight reads so the autosomes total `target` non-redundant reads, the
    /// same base as the per-10M profile column. Returns the weight applied.
    pub fn normalize_to(&mut self, target: u64) -> f64 {
        let total = self.autosome_nread_nonred();
        let w = if total == 0 {
            0.0
        } else {
            target as f64 / total as f64
        };
        for chrom in &mut self.chromosomes {
            chrom.set_weight(w);
        }
        w
    }

    /// Split chromosomes into at most `ngroups` contiguous groups holding
    /// roughly equal numbers of non-redundant reads
    pub fn partition(&self, ngroups: usize) -> Vec<Range<usize>> {
        let counts: Vec<u64> = self.chromosomes.iter().map(|c| c.nread_nonred()).collect();
        let groups = partition_by_weight(&counts, ngroups);
        debug!("Partitioned {} chromosomes into {} groups", counts.len(), groups.len());
        groups
    }
}

/// Greedy contiguous split of `weights` into at most `ngroups` ranges whose
/// sums approach `total / ngroups`
pub fn partition_by_weight(weights: &[u64], ngroups: usize) -> Vec<Range<usize>> {
    if weights.is_empty() {
        return Vec::new();
    }
    let ngroups = ngroups.clamp(1, weights.len());
    let total: u64 = weights.iter().sum();
    let target = (total as f64 / ngroups as f64).max(1.0);

    let mut groups = Vec::with_capacity(ngroups);
    let mut start = 0;
    let mut acc = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        let remaining_items = weights.len() - i - 1;
        let remaining_groups = ngroups - groups.len() - 1;
        let full = acc as f64 >= target;
        // Leave at least one chromosome for every group still to be opened
        if remaining_groups > 0 && (full || remaining_items == remaining_groups) {
            groups.push(start..i + 1);
            start = i + 1;
            acc = 0;
        }
    }
    if start < weights.len() {
        groups.push(start..weights.len());
    }
    groups
}
