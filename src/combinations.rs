//! Combinations

use smallvec::{SmallVec, smallvec};

/// Pool positions making up a combination.
pub type IndexList = SmallVec<[usize; 16]>;

/// A set of pool positions whose values sum exactly to the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combination {
    indices: IndexList,
    sum: i64,
}

impl Combination {
    /// Creates a new combination.
    pub fn new(indices: impl Into<IndexList>, sum: i64) -> Self {
        Self {
            indices: indices.into(),
            sum,
        }
    }

    /// Pool positions, in the order they were chosen.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Sum of the chosen values in minor units.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Number of chosen values.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pool positions in `0..pool_len` not present in the combination, ascending.
    pub fn unused(&self, pool_len: usize) -> IndexList {
        let mut used: SmallVec<[bool; 64]> = smallvec![false; pool_len];

        for &idx in &self.indices {
            if let Some(flag) = used.get_mut(idx) {
                *flag = true;
            }
        }

        used.iter()
            .enumerate()
            .filter_map(|(idx, &flag)| (!flag).then_some(idx))
            .collect()
    }
}
