//! Wire primitives: little-endian scalar encoding
//!
//! Semua integer multi-byte di wire adalah little-endian. Read selalu
//! bounds-checked: offset yang keluar dari buffer menjadi `CorruptBufferError`,
//! tidak pernah panic.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{CorruptBufferError, Result};

/// Unsigned offset, relatif terhadap posisi penyimpanannya sendiri
pub type UOffsetT = u32;
/// Signed offset dari table ke vtable-nya
pub type SOffsetT = i32;
/// Entry vtable: offset field relatif ke awal table
pub type VOffsetT = u16;

pub const SIZE_UOFFSET: usize = std::mem::size_of::<UOffsetT>();
pub const SIZE_SOFFSET: usize = std::mem::size_of::<SOffsetT>();
pub const SIZE_VOFFSET: usize = std::mem::size_of::<VOffsetT>();

/// Header vtable: byte-length vtable + byte-length table inline data
pub const VTABLE_HEADER_SIZE: usize = 2 * SIZE_VOFFSET;

/// Ukuran maksimum buffer (offset harus muat di i32)
pub const MAX_BUFFER_SIZE: usize = (1 << 31) - 1;

/// Slot vtable (byte offset di dalam vtable) untuk field index ke-`index`
#[inline(always)]
pub const fn field_index_to_slot(index: usize) -> VOffsetT {
    (VTABLE_HEADER_SIZE + index * SIZE_VOFFSET) as VOffsetT
}

/// Kebalikan dari [`field_index_to_slot`]
#[inline(always)]
pub const fn slot_to_field_index(slot: VOffsetT) -> usize {
    (slot as usize - VTABLE_HEADER_SIZE) / SIZE_VOFFSET
}

/// Fixed-width value yang bisa ditulis langsung ke wire
///
/// Default-elision butuh `PartialEq`: slot hanya ditulis jika value != default.
pub trait Scalar: Copy + PartialEq + Sized {
    const WIDTH: usize;

    /// `src` minimal `WIDTH` bytes
    fn read_le(src: &[u8]) -> Self;

    /// `dst` minimal `WIDTH` bytes
    fn write_le(self, dst: &mut [u8]);
}

macro_rules! impl_scalar_le {
    ($($ty:ty => $read:ident, $write:ident;)*) => {$(
        impl Scalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline(always)]
            fn read_le(src: &[u8]) -> Self {
                LittleEndian::$read(src)
            }

            #[inline(always)]
            fn write_le(self, dst: &mut [u8]) {
                LittleEndian::$write(dst, self)
            }
        }
    )*};
}

impl_scalar_le! {
    u16 => read_u16, write_u16;
    i16 => read_i16, write_i16;
    u32 => read_u32, write_u32;
    i32 => read_i32, write_i32;
    u64 => read_u64, write_u64;
    i64 => read_i64, write_i64;
    f32 => read_f32, write_f32;
    f64 => read_f64, write_f64;
}

// Single-byte types: tidak ada byte order
impl Scalar for u8 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0]
    }

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self;
    }
}

impl Scalar for i8 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0] as i8
    }

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }
}

impl Scalar for bool {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0] != 0
    }

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }
}

/// Slice `len` bytes mulai dari `pos`, atau `OutOfBounds`
#[inline(always)]
pub fn checked_range(buf: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    pos.checked_add(len)
        .and_then(|end| buf.get(pos..end))
        .ok_or_else(|| {
            CorruptBufferError::OutOfBounds {
                pos,
                len,
                buf_len: buf.len(),
            }
            .into()
        })
}

/// Baca scalar di posisi absolut `pos`
#[inline(always)]
pub fn read_scalar_at<T: Scalar>(buf: &[u8], pos: usize) -> Result<T> {
    checked_range(buf, pos, T::WIDTH).map(T::read_le)
}

/// Resolve uoffset yang tersimpan di `pos` menjadi posisi absolut target
#[inline(always)]
pub fn follow_uoffset(buf: &[u8], pos: usize) -> Result<usize> {
    let off = read_scalar_at::<UOffsetT>(buf, pos)? as usize;
    match pos.checked_add(off) {
        Some(target) if target < buf.len() => Ok(target),
        _ => Err(CorruptBufferError::BadOffset { pos }.into()),
    }
}

/// Jumlah padding agar `buf_size` menjadi kelipatan `scalar_size`
#[inline(always)]
pub fn padding_bytes(buf_size: usize, scalar_size: usize) -> usize {
    (!buf_size).wrapping_add(1) & (scalar_size.wrapping_sub(1))
}
