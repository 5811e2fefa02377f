//! Array extents and row-major offset arithmetic.

use smallvec::SmallVec;
use std::fmt;

use crate::error::AllocError;

/// Highest supported number of dimensions.
pub const MAX_RANK: usize = 4;

/// The per-axis lengths of an array, outermost axis first.
///
/// Holds between 1 and [`MAX_RANK`] extents. Uses `SmallVec<[usize; 4]>`
/// so extents never touch the heap. Any extent may be zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extents(SmallVec<[usize; MAX_RANK]>);

impl Extents {
    /// Build extents from a slice, validating the rank.
    pub fn new(extents: &[usize]) -> Result<Self, AllocError> {
        if extents.is_empty() || extents.len() > MAX_RANK {
            return Err(AllocError::InvalidRank {
                rank: extents.len(),
            });
        }
        Ok(Self(SmallVec::from_slice(extents)))
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// The extents as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Product of all extents.
    ///
    /// Returns [`AllocError::SizeOverflow`] if the product does not fit
    /// in `usize`.
    pub fn total_elements(&self) -> Result<usize, AllocError> {
        self.0
            .iter()
            .try_fold(1usize, |acc, &e| acc.checked_mul(e))
            .ok_or(AllocError::SizeOverflow)
    }

    /// Total byte length for elements of `width` bytes.
    pub fn total_bytes(&self, width: usize) -> Result<usize, AllocError> {
        self.total_elements()?
            .checked_mul(width)
            .ok_or(AllocError::SizeOverflow)
    }

    /// Row-major element strides: `stride[k] = Π_{m>k} e_m`.
    ///
    /// Callers must have checked [`total_elements`](Self::total_elements)
    /// first; every suffix product is bounded by the total unless an
    /// extent is zero, in which case strides saturate.
    pub fn strides(&self) -> SmallVec<[usize; MAX_RANK]> {
        let mut strides: SmallVec<[usize; MAX_RANK]> = SmallVec::from_elem(1, self.rank());
        for k in (0..self.rank().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1].saturating_mul(self.0[k + 1]);
        }
        strides
    }

    /// Whether `index` has the right rank and lies inside every extent.
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.rank() && index.iter().zip(self.0.iter()).all(|(&i, &e)| i < e)
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("x")?;
            }
            write!(f, "{e}")?;
            first = false;
        }
        Ok(())
    }
}

/// Element offset of `index` inside an array of the given extents.
///
/// Computes `Σ_k i_k × Π_{m>k} e_m`. Returns `None` if the rank differs
/// or any coordinate is out of range.
pub fn row_major_offset(extents: &Extents, index: &[usize]) -> Option<usize> {
    if !extents.contains(index) {
        return None;
    }
    let strides = extents.strides();
    Some(index.iter().zip(strides.iter()).map(|(&i, &s)| i * s).sum())
}
