//! Host-side layout descriptions for uniform records.

use std::fmt;

use bytemuck::Pod;

/// Scalar type a field's components are read as on both sides.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    F32,
    U32,
    I32,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::F32 => f.write_str("f32"),
            ScalarKind::U32 => f.write_str("u32"),
            ScalarKind::I32 => f.write_str("i32"),
        }
    }
}

/// Host field types with a single scalar component type.
///
/// Arrays (vectors, matrices, padding runs) take their element's kind.
pub trait ScalarField {
    const KIND: ScalarKind;
}

impl ScalarField for f32 {
    const KIND: ScalarKind = ScalarKind::F32;
}

impl ScalarField for u32 {
    const KIND: ScalarKind = ScalarKind::U32;
}

impl ScalarField for i32 {
    const KIND: ScalarKind = ScalarKind::I32;
}

impl<T: ScalarField, const N: usize> ScalarField for [T; N] {
    const KIND: ScalarKind = T::KIND;
}

/// Byte placement of one record field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
    pub kind: ScalarKind,
}

impl FieldLayout {
    /// Padding fields carry a leading underscore and are not matched by name
    /// against the device declaration.
    #[inline]
    pub fn is_padding(&self) -> bool {
        self.name.starts_with('_')
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// A uniform record shared with the shader stages.
///
/// `DEVICE_SIZE` and `DEVICE_ALIGN` are the sizes the WGSL uniform layout
/// rules assign to `DEVICE_NAME`. Implementations pin them with compile-time
/// assertions; [`verify_contract`](crate::verify_contract) re-derives them
/// from the shader source at startup.
pub trait GpuRecord: Pod {
    /// Name of the matching WGSL struct.
    const DEVICE_NAME: &'static str;
    const DEVICE_SIZE: usize;
    const DEVICE_ALIGN: usize;
    /// Every field in declaration order, padding included.
    const FIELDS: &'static [FieldLayout];

    /// Host size in bytes.
    #[inline]
    fn host_size() -> usize {
        std::mem::size_of::<Self>()
    }

    #[inline]
    fn host_align() -> usize {
        std::mem::align_of::<Self>()
    }
}

/// Builds a `&'static [FieldLayout]` for a `#[repr(C)]` record.
macro_rules! field_layout {
    ($record:ty { $( $field:ident : $ty:ty ),+ $(,)? }) => {
        &[$(
            $crate::layout::FieldLayout {
                name: stringify!($field),
                offset: ::std::mem::offset_of!($record, $field),
                size: ::std::mem::size_of::<$ty>(),
                kind: <$ty as $crate::layout::ScalarField>::KIND,
            },
        )+]
    };
}

pub(crate) use field_layout;

/// Returns `true` if `fields` are in order, do not overlap, and cover
/// `0..size` without gaps.
pub const fn fields_tile(fields: &[FieldLayout], size: usize) -> bool {
    let mut cursor = 0;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].offset != cursor {
            return false;
        }
        cursor = fields[i].end();
        i += 1;
    }
    cursor == size
}

/// Size of one element when `T` is packed repeatedly into a buffer whose
/// offsets must be multiples of `offset_alignment` (e.g. dynamic uniform
/// offsets).
pub fn padded_stride<T: GpuRecord>(offset_alignment: u64) -> u64 {
    let size = T::host_size() as u64;
    let align = offset_alignment.max(1);
    size.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn f(name: &'static str, offset: usize, size: usize) -> FieldLayout {
        FieldLayout {
            name,
            offset,
            size,
            kind: ScalarKind::F32,
        }
    }

    #[test]
    fn tiling_accepts_contiguous_fields() {
        let fields = [f("a", 0, 64), f("b", 64, 4), f("_pad", 68, 12)];
        assert!(fields_tile(&fields, 80));
    }

    #[test]
    fn tiling_rejects_gap() {
        let fields = [f("a", 0, 12), f("b", 16, 4)];
        assert!(!fields_tile(&fields, 20));
    }

    #[test]
    fn tiling_rejects_overlap() {
        let fields = [f("a", 0, 12), f("b", 8, 4)];
        assert!(!fields_tile(&fields, 12));
    }

    #[test]
    fn tiling_rejects_trailing_bytes() {
        let fields = [f("a", 0, 12)];
        assert!(!fields_tile(&fields, 16));
    }

    #[test]
    fn arrays_take_their_element_kind() {
        assert_eq!(<[[f32; 4]; 4] as ScalarField>::KIND, ScalarKind::F32);
        assert_eq!(<[u32; 2] as ScalarField>::KIND, ScalarKind::U32);
        assert_eq!(<i32 as ScalarField>::KIND, ScalarKind::I32);
    }

    #[test]
    fn padding_is_recognised_by_prefix() {
        assert!(f("_pad", 0, 4).is_padding());
        assert!(!f("depth", 0, 4).is_padding());
    }
}
