// signal.rs - Per-strand density signals over a coordinate window

use crate::core::regime::{Regime, ShiftRegimes};
use crate::data::StrandReads;
use bitvec::prelude::*;
use std::ops::Range;

/// Read starts per position
pub type CountSignal = Vec<u16>;

/// Read-start presence per position
pub type BitSignal = BitVec<u64, Lsb0>;

fn positions<'a>(reads: &'a StrandReads, window: &'a Range<usize>) -> impl Iterator<Item = usize> + 'a {
    reads
        .reads()
        .iter()
        .filter(|r| !r.duplicate)
        .map(|r| r.f3 as usize)
        .filter(move |pos| window.contains(pos))
        .map(move |pos| pos - window.start)
}

/// Count the non-duplicate read starts inside `window`
pub fn count_signal(reads: &StrandReads, window: Range<usize>) -> CountSignal {
    let mut signal = vec![0u16; window.len()];
    for offset in positions(reads, &window) {
        signal[offset] = signal[offset].saturating_add(1);
    }
    signal
}

/// Mark positions inside `window` holding at least one non-duplicate read start
pub fn bit_signal(reads: &StrandReads, window: Range<usize>) -> BitSignal {
    let mut signal = bitvec![u64, Lsb0; 0; window.len()];
    for offset in positions(reads, &window) {
        signal.set(offset, true);
    }
    signal
}

pub fn mass(signal: &[u16]) -> u64 {
    signal.iter().map(|&v| v as u64).sum()
}

/// Popcount of `op(a, b)` over positions `[0, len)`, a word at a time
pub fn count_pairwise(a: &BitSignal, b: &BitSignal, len: usize, op: impl Fn(u64, u64) -> u64) -> u64 {
    let len = len.min(a.len()).min(b.len());
    let (aw, bw) = (a.as_raw_slice(), b.as_raw_slice());
    let full = len / 64;
    let rem = len % 64;

    let mut n: u64 = aw[..full]
        .iter()
        .zip(&bw[..full])
        .map(|(&x, &y)| op(x, y).count_ones() as u64)
        .sum();
    if rem > 0 {
        let mask = (1u64 << rem) - 1;
        n += (op(aw[full], bw[full]) & mask).count_ones() as u64;
    }
    n
}

/// `(fwd[j], rev[j + step])` over every forward position; reverse bits past
/// the end read as unset
pub fn shifted_pairs<'a>(fwd: &'a BitSignal, rev: &'a BitSignal, step: usize) -> impl Iterator<Item = (bool, bool)> + 'a {
    fwd.iter()
        .by_vals()
        .enumerate()
        .map(move |(j, f)| (f, rev.get(j + step).is_some_and(|b| *b)))
}

/// Walk a reverse-strand bitset through every offset of both regimes,
/// shifting it towards position zero incrementally instead of rebuilding it
/// per offset. At each visit, bit `j` of the yielded signal is bit
/// `j + step` of the unshifted input.
pub fn walk_offsets(mut rev: BitSignal, regimes: &ShiftRegimes, mut visit: impl FnMut(Regime, usize, &BitSignal)) {
    let mut shifted = 0;
    let mut advance = |rev: &mut BitSignal, step: usize| {
        let by = step - shifted;
        if by >= rev.len() {
            rev.fill(false);
        } else if by > 0 {
            rev.shift_left(by);
        }
        shifted = step;
    };

    for step in regimes.fine_offsets() {
        advance(&mut rev, step);
        visit(Regime::Fine, step, &rev);
    }
    for step in regimes.background_offsets() {
        advance(&mut rev, step);
        visit(Regime::Background, step, &rev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Fragment, Read, Strand};

    fn strand(positions: &[u32], duplicates: &[u32]) -> StrandReads {
        let mut reads = StrandReads::new();
        for &p in positions {
            reads.push(Read::from_fragment(&Fragment::single_end("chr1", Strand::Forward, p, 36)));
        }
        for &p in duplicates {
            let mut frag = Fragment::single_end("chr1", Strand::Forward, p, 36);
            frag.duplicate = true;
            reads.push(Read::from_fragment(&frag));
        }
        reads
    }

    #[test]
    fn test_count_signal_accumulates() {
        let reads = strand(&[100, 100, 200, 300, 5_000], &[200]);
        let signal = count_signal(&reads, 0..1_000);
        assert_eq!(signal.len(), 1_000);
        assert_eq!(signal[100], 2);
        assert_eq!(signal[200], 1);
        assert_eq!(signal[300], 1);
        assert_eq!(mass(&signal), 4);
    }

    #[test]
    fn test_window_offsets_and_bounds() {
        let reads = strand(&[99, 100, 149, 150], &[]);
        let signal = count_signal(&reads, 100..150);
        assert_eq!(signal.len(), 50);
        assert_eq!(signal[0], 1);
        assert_eq!(signal[49], 1);
        assert_eq!(mass(&signal), 2);
    }

    #[test]
    fn test_bit_signal_loses_multiplicity() {
        let reads = strand(&[100, 100, 200], &[300]);
        let signal = bit_signal(&reads, 0..400);
        assert_eq!(signal.count_ones(), 2);
        assert!(signal[100]);
        assert!(!signal[300]);
    }

    #[test]
    fn test_count_pairwise_masks_tail() {
        let mut a = bitvec![u64, Lsb0; 0; 130];
        let mut b = bitvec![u64, Lsb0; 0; 130];
        for i in [0, 63, 64, 127, 128, 129] {
            a.set(i, true);
            b.set(i, true);
        }
        assert_eq!(count_pairwise(&a, &b, 130, |x, y| x & y), 6);
        assert_eq!(count_pairwise(&a, &b, 128, |x, y| x & y), 4);
        assert_eq!(count_pairwise(&a, &b, 65, |x, y| x & y), 3);
        assert_eq!(count_pairwise(&a, &b, 130, |x, y| x ^ y), 0);
    }

    #[test]
    fn test_shifted_pairs_pads_with_unset() {
        let mut fwd = bitvec![u64, Lsb0; 0; 8];
        let mut rev = bitvec![u64, Lsb0; 0; 8];
        fwd.set(1, true);
        rev.set(4, true);
        rev.set(7, true);
        let pairs: Vec<(bool, bool)> = shifted_pairs(&fwd, &rev, 3).collect();
        assert_eq!(pairs.len(), 8);
        assert_eq!(pairs[1], (true, true));
        assert_eq!(pairs[4], (false, true));
        assert!(pairs[5..].iter().all(|&(_, r)| !r));
    }

    #[test]
    fn test_walk_offsets_matches_direct_shift() {
        let regimes = ShiftRegimes::new(3, 10, 20, 50, 7).unwrap();
        let mut rev = bitvec![u64, Lsb0; 0; 200];
        for i in (0..200).step_by(3) {
            rev.set(i, true);
        }
        let original = rev.clone();

        let mut visited = Vec::new();
        walk_offsets(rev, &regimes, |regime, step, shifted| {
            for j in 0..(200 - step) {
                assert_eq!(shifted[j], original[j + step], "offset {} position {}", step, j);
            }
            visited.push((regime, step));
        });

        assert_eq!(visited.len(), 7 + 5);
        assert_eq!(visited[0], (Regime::Fine, 3));
        assert_eq!(visited[7], (Regime::Background, 20));
        assert_eq!(visited.last(), Some(&(Regime::Background, 48)));
    }
}
