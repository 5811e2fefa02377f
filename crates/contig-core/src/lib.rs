//! Core types for contiguous multidimensional array allocation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the element type tags and their byte widths, the [`Extents`] of an
//! array together with its row-major offset arithmetic, and the
//! [`AllocError`] kinds reported by every allocation path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod shape;

pub use element::{width_of_tag, Element, ElementType};
pub use error::AllocError;
pub use shape::{row_major_offset, Extents, MAX_RANK};
