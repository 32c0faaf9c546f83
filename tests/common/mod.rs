#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strandshift::data::{ChromosomeInfo, ChromosomeRegistry, Fragment, GenomeReads, Read, Strand, StrandReads};

/// Per-chromosome forward and reverse read starts
pub struct ChromSpec {
    pub name: &'static str,
    pub len: u64,
    pub fwd: Vec<u32>,
    pub rev: Vec<u32>,
}

pub fn genome(chroms: &[ChromSpec]) -> GenomeReads {
    let registry = ChromosomeRegistry::from_chromosomes(
        chroms.iter().map(|c| ChromosomeInfo::new(c.name, c.len)).collect(),
    )
    .expect("unique chromosome names");
    let mut genome = GenomeReads::new(&registry);
    let fragments = chroms.iter().flat_map(|c| {
        let fwd = c.fwd.iter().map(move |&p| Fragment::single_end(c.name, Strand::Forward, p, 36));
        let rev = c.rev.iter().map(move |&p| Fragment::single_end(c.name, Strand::Reverse, p, 36));
        fwd.chain(rev)
    });
    genome.ingest(fragments);
    genome
}

pub fn strand(positions: &[u32]) -> StrandReads {
    let mut reads = StrandReads::new();
    for &p in positions {
        reads.push(Read::from_fragment(&Fragment::single_end("chr1", Strand::Forward, p, 36)));
    }
    reads
}

/// `n` uniformly scattered starts in `[0, len)`
pub fn uniform_positions(rng: &mut StdRng, n: usize, len: u32) -> Vec<u32> {
    (0..n).map(|_| rng.gen_range(0..len)).collect()
}

/// Forward starts scattered uniformly, reverse starts `shift` downstream
pub fn shifted_chromosome(name: &'static str, len: u64, n: usize, shift: u32, seed: u64) -> ChromSpec {
    let mut rng = StdRng::seed_from_u64(seed);
    let fwd = uniform_positions(&mut rng, n, len as u32 - shift);
    let rev = fwd.iter().map(|&p| p + shift).collect();
    ChromSpec { name, len, fwd, rev }
}

/// Independent uniform starts on both strands
pub fn random_chromosome(name: &'static str, len: u64, n: usize, seed: u64) -> ChromSpec {
    let mut rng = StdRng::seed_from_u64(seed);
    let fwd = uniform_positions(&mut rng, n, len as u32);
    let rev = uniform_positions(&mut rng, n, len as u32);
    ChromSpec { name, len, fwd, rev }
}
