//! Reachability index
//!
//! For every suffix `values[i..]` of the pool, a bitset of the sums some subset of that
//! suffix can reach. Bit `s + offset` is set iff sum `s` is reachable, where `offset` is the
//! magnitude of the sum of all negative values, so every sum between the pool's minimum and
//! maximum subset sums maps to a bit. The empty subset makes sum zero reachable from every
//! suffix.
//!
//! Each bitset is as wide as the range of achievable sums, so memory grows with the
//! magnitude of the amounts as well as their number.

use std::fmt;

use bitvec::prelude::*;
use tracing::{debug, warn};

use crate::solvers::SolverError;

/// Indexes holding more than this many bits across all suffixes are logged as expensive.
pub const WIDE_INDEX_BITS: usize = 1 << 27;

type SumSet = BitVec<usize, Lsb0>;

/// Per-suffix reachable-sum bitsets for a pool of minor-unit values.
pub struct ReachabilityIndex {
    suffixes: Vec<SumSet>,
    offset: i64,
    width: usize,
}

impl ReachabilityIndex {
    /// Builds the index for `values`, from the last suffix back to the first.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SumRangeTooWide`] if the range of achievable sums cannot be
    /// addressed on this platform.
    pub fn build(values: &[i64]) -> Result<Self, SolverError> {
        let min: i128 = values.iter().map(|&v| i128::from(v.min(0))).sum();
        let max: i128 = values.iter().map(|&v| i128::from(v.max(0))).sum();

        let too_wide = || SolverError::SumRangeTooWide { min, max };

        let offset = i64::try_from(-min).map_err(|_err| too_wide())?;
        let width = usize::try_from(max - min + 1).map_err(|_err| too_wide())?;
        let zero = usize::try_from(offset).map_err(|_err| too_wide())?;

        let suffix_count = values.len().saturating_add(1);
        let total_bits = width.saturating_mul(suffix_count);

        if total_bits > WIDE_INDEX_BITS {
            warn!(
                width,
                suffixes = suffix_count,
                total_bits,
                "reachable-sum index is very large; memory use may be high"
            );
        }

        let mut current: SumSet = bitvec![usize, Lsb0; 0; width];
        current.set(zero, true);

        let mut suffixes = Vec::with_capacity(suffix_count);
        suffixes.push(current.clone());

        for &value in values.iter().rev() {
            let by = usize::try_from(value.unsigned_abs()).unwrap_or(usize::MAX);

            // Shifts of the full width or more push every bit out of range.
            if by > 0 && by < width {
                let mut shifted = current.clone();

                if value > 0 {
                    shifted.shift_right(by);
                } else {
                    shifted.shift_left(by);
                }

                current |= shifted.as_bitslice();
            }

            suffixes.push(current.clone());
        }

        suffixes.reverse();

        debug!(width, offset, suffixes = suffixes.len(), "built reachability index");

        Ok(Self {
            suffixes,
            offset,
            width,
        })
    }

    /// Whether some subset of the suffix starting at `position` sums to `remaining`.
    ///
    /// Positions past the end of the pool and sums outside the representable range are
    /// never reachable.
    pub fn can_reach(&self, position: usize, remaining: i128) -> bool {
        let Some(bits) = self.suffixes.get(position) else {
            return false;
        };

        let Ok(slot) = usize::try_from(remaining + i128::from(self.offset)) else {
            return false;
        };

        bits.get(slot).is_some_and(|bit| *bit)
    }

    /// Bit position of sum zero.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Number of representable sums.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of suffix bitsets (pool length plus one).
    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }

    /// Bits held across every suffix.
    pub fn total_bits(&self) -> usize {
        self.width.saturating_mul(self.suffixes.len())
    }

    /// Every reachable sum from the suffix starting at `position`, ascending.
    pub fn reachable_sums(&self, position: usize) -> Vec<i128> {
        self.suffixes
            .get(position)
            .map(|bits| {
                bits.iter_ones()
                    .filter_map(|slot| i128::try_from(slot).ok())
                    .map(|slot| slot - i128::from(self.offset))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for ReachabilityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReachabilityIndex")
            .field("offset", &self.offset)
            .field("width", &self.width)
            .field("suffixes", &self.suffixes.len())
            .finish()
    }
}
