//! Benchmark shapes for contig allocation.
//!
//! Provides fixed extents shared by the criterion benches:
//!
//! - [`SMALL_SHAPES`]: one cheap shape per rank
//! - [`LARGE_SHAPES`]: roughly one million elements per rank

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use contig_core::ElementType;

/// Small shapes, one per rank 1..=4.
pub const SMALL_SHAPES: [&[usize]; 4] = [&[64], &[8, 8], &[4, 4, 4], &[2, 4, 4, 2]];

/// Shapes of about 1M elements, one per rank 1..=4.
///
/// Index overhead grows with rank while the flat buffer stays the same
/// size, so these separate buffer cost from index cost.
pub const LARGE_SHAPES: [&[usize]; 4] = [
    &[1 << 20],
    &[1024, 1024],
    &[128, 128, 64],
    &[32, 32, 32, 32],
];

/// Element type used by benches that do not vary it.
pub const BENCH_ELEMENT: ElementType = ElementType::Double;

/// Human-readable label for a shape, e.g. `"1024x1024"`.
pub fn shape_label(extents: &[usize]) -> String {
    extents
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_shapes_have_equal_element_counts() {
        for shape in LARGE_SHAPES {
            assert_eq!(shape.iter().product::<usize>(), 1 << 20);
        }
    }

    #[test]
    fn label_joins_extents() {
        assert_eq!(shape_label(&[3, 4, 5]), "3x4x5");
    }
}
