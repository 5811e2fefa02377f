//! Element type tags and their byte widths.
//!
//! [`ElementType`] is the closed set of numeric types an array can hold.
//! Each tag resolves once per allocation to a fixed byte width via
//! [`ElementType::width`]. Raw numeric tags coming from outside the type
//! system go through [`ElementType::from_tag`], which is the only place an
//! unsupported tag can surface.

use std::fmt;

use crate::error::AllocError;

/// Numeric element type stored in an array.
///
/// The discriminants are stable and match declaration order, so a tag
/// can round-trip through a plain `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ElementType {
    /// 32-bit signed integer.
    Int = 0,
    /// 32-bit unsigned integer.
    UnsignedInt = 1,
    /// Single byte character.
    Char = 2,
    /// 64-bit signed integer (LP64 `long`).
    Long = 3,
    /// 32-bit IEEE float.
    Float = 4,
    /// 64-bit IEEE float.
    Double = 5,
}

impl ElementType {
    /// All supported element types, in tag order.
    pub const ALL: [ElementType; 6] = [
        Self::Int,
        Self::UnsignedInt,
        Self::Char,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    /// Size of one element in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Int => std::mem::size_of::<i32>(),
            Self::UnsignedInt => std::mem::size_of::<u32>(),
            Self::Char => std::mem::size_of::<u8>(),
            Self::Long => std::mem::size_of::<i64>(),
            Self::Float => std::mem::size_of::<f32>(),
            Self::Double => std::mem::size_of::<f64>(),
        }
    }

    /// The numeric tag of this type.
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Resolve a raw numeric tag.
    ///
    /// Returns [`AllocError::UnsupportedType`] for any tag outside `0..=5`.
    pub fn from_tag(tag: u32) -> Result<Self, AllocError> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(AllocError::UnsupportedType { tag })
    }
}

impl TryFrom<u32> for ElementType {
    type Error = AllocError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::UnsignedInt => "unsigned int",
            Self::Char => "char",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}

/// Byte width of a raw element tag.
///
/// Unknown tags are rejected before any allocation is attempted.
pub fn width_of_tag(tag: u32) -> Result<usize, AllocError> {
    ElementType::from_tag(tag).map(ElementType::width)
}

/// A Rust type that can be read from or written to an array element.
///
/// `Char` arrays accept both `i8` and `u8`.
pub trait Element: bytemuck::Pod {
    /// The tag this Rust type corresponds to.
    const TYPE: ElementType;
}

impl Element for i32 {
    const TYPE: ElementType = ElementType::Int;
}

impl Element for u32 {
    const TYPE: ElementType = ElementType::UnsignedInt;
}

impl Element for i8 {
    const TYPE: ElementType = ElementType::Char;
}

impl Element for u8 {
    const TYPE: ElementType = ElementType::Char;
}

impl Element for i64 {
    const TYPE: ElementType = ElementType::Long;
}

impl Element for f32 {
    const TYPE: ElementType = ElementType::Float;
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::Double;
}
