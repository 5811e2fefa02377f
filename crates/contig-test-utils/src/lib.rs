//! Test utilities and allocator doubles for contig development.
//!
//! Provides a failure-injecting [`RawAlloc`](contig_arena::RawAlloc)
//! ([`FailingAlloc`]) and closed-form row-major helpers that do not share
//! code with the arena's index structure, so tests can compare the two.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod failing;

pub use failing::FailingAlloc;

use contig_core::ElementType;

/// Byte offset of `index` in a row-major array, straight from the formula
/// `Σ_k ( i_k × Π_{m>k} e_m ) × width`.
pub fn closed_form_offset(extents: &[usize], index: &[usize], element: ElementType) -> usize {
    assert_eq!(extents.len(), index.len(), "rank mismatch");
    let mut offset = 0;
    for k in 0..index.len() {
        let stride: usize = extents[k + 1..].iter().product();
        offset += index[k] * stride;
    }
    offset * element.width()
}

/// Every index of an array with the given extents, in row-major order.
pub fn all_indices(extents: &[usize]) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    for &e in extents {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                (0..e).map(move |i| {
                    let mut next = prefix.clone();
                    next.push(i);
                    next
                })
            })
            .collect();
    }
    out
}
