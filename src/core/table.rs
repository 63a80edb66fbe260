//! Table Reader: lazy field resolution langsung dari buffer
//!
//! Tidak ada decode di depan. `Table` hanya (buffer, posisi); setiap akses
//! field berjalan lewat vtable saat itu juga.
//!
//! Layout table:
//! ```text
//!  vtable:  [vt_len: u16][table_len: u16][slot 0: u16][slot 1: u16]...
//!  table:   [soffset: i32 = table - vtable][field data...]
//! ```

use std::marker::PhantomData;

use super::vector::Vector;
use super::wire::{
    checked_range, follow_uoffset, read_scalar_at, Scalar, SOffsetT, UOffsetT, VOffsetT,
    SIZE_UOFFSET, SIZE_VOFFSET, VTABLE_HEADER_SIZE,
};
use crate::error::{CorruptBufferError, Result};

/// Tipe yang bisa dibaca dari posisi absolut di buffer
///
/// `INLINE_SIZE` adalah lebar yang dipakai tipe ini di dalam table atau
/// vector. Untuk tipe yang selalu diakses lewat offset (string, table)
/// nilainya lebar uoffset.
pub trait Follow<'buf> {
    type Inner;
    const INLINE_SIZE: usize;

    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner>;
}

macro_rules! impl_follow_scalar {
    ($($ty:ty),*) => {$(
        impl<'buf> Follow<'buf> for $ty {
            type Inner = $ty;
            const INLINE_SIZE: usize = <$ty as Scalar>::WIDTH;

            #[inline(always)]
            fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
                read_scalar_at::<$ty>(buf, loc)
            }
        }
    )*};
}

impl_follow_scalar!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Indirection: nilai di `loc` adalah uoffset relatif ke `loc` sendiri,
/// BUKAN relatif ke awal table.
///
/// Satu-satunya tempat aritmetika offset-of-offset dilakukan; semua accessor
/// entity mendelegasikan ke sini.
pub struct ForwardsUOffset<T>(PhantomData<T>);

impl<'buf, T: Follow<'buf>> Follow<'buf> for ForwardsUOffset<T> {
    type Inner = T::Inner;
    const INLINE_SIZE: usize = SIZE_UOFFSET;

    #[inline(always)]
    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
        let target = follow_uoffset(buf, loc)?;
        T::follow(buf, target)
    }
}

/// String: `[len: u32][bytes...]`, terminator tidak wajib
impl<'buf> Follow<'buf> for &'buf str {
    type Inner = &'buf str;
    const INLINE_SIZE: usize = SIZE_UOFFSET;

    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
        let bytes = <&'buf [u8]>::follow(buf, loc)?;
        std::str::from_utf8(bytes)
            .map_err(|_| CorruptBufferError::InvalidUtf8 { pos: loc }.into())
    }
}

/// Byte string: layout sama dengan string, tanpa validasi UTF-8
impl<'buf> Follow<'buf> for &'buf [u8] {
    type Inner = &'buf [u8];
    const INLINE_SIZE: usize = SIZE_UOFFSET;

    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
        let len = read_scalar_at::<UOffsetT>(buf, loc)? as usize;
        checked_range(buf, loc + SIZE_UOFFSET, len)
    }
}

/// View vtable milik satu table
#[derive(Debug, Clone, Copy)]
pub struct VTable<'buf> {
    buf: &'buf [u8],
    loc: usize,
    num_bytes: usize,
}

impl<'buf> VTable<'buf> {
    /// Resolve vtable untuk table di `table_loc`, termasuk cek bounds
    pub fn for_table(buf: &'buf [u8], table_loc: usize) -> Result<Self> {
        let soffset = read_scalar_at::<SOffsetT>(buf, table_loc)?;
        let loc = table_loc as i64 - soffset as i64;
        if loc < 0 || loc as usize >= buf.len() {
            return Err(CorruptBufferError::BadOffset { pos: table_loc }.into());
        }
        let loc = loc as usize;

        let num_bytes = read_scalar_at::<VOffsetT>(buf, loc)? as usize;
        if num_bytes < VTABLE_HEADER_SIZE || num_bytes % SIZE_VOFFSET != 0 {
            return Err(CorruptBufferError::MalformedVtable {
                pos: loc,
                reason: "length is shorter than the header or odd",
            }
            .into());
        }
        checked_range(buf, loc, num_bytes)?;

        Ok(Self {
            buf,
            loc,
            num_bytes,
        })
    }

    /// Posisi absolut vtable
    pub fn loc(&self) -> usize {
        self.loc
    }

    /// Byte-length vtable (header + slot entries)
    pub fn num_bytes(&self) -> usize {
        self.num_bytes
    }

    /// Jumlah slot yang tercatat
    pub fn num_fields(&self) -> usize {
        (self.num_bytes - VTABLE_HEADER_SIZE) / SIZE_VOFFSET
    }

    /// Byte-length inline data table (termasuk soffset header)
    pub fn object_inline_num_bytes(&self) -> Result<usize> {
        read_scalar_at::<VOffsetT>(self.buf, self.loc + SIZE_VOFFSET).map(|n| n as usize)
    }

    /// Offset field di dalam table, 0 jika tidak ditulis
    ///
    /// Slot di luar panjang vtable (schema lebih baru dari buffer) juga 0.
    pub fn get(&self, slot: VOffsetT) -> Result<VOffsetT> {
        let slot = slot as usize;
        if slot < VTABLE_HEADER_SIZE || slot + SIZE_VOFFSET > self.num_bytes {
            return Ok(0);
        }
        read_scalar_at::<VOffsetT>(self.buf, self.loc + slot)
    }
}

/// View ke satu table di buffer. `Copy`, tanpa state mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table<'buf> {
    buf: &'buf [u8],
    loc: usize,
}

impl<'buf> Table<'buf> {
    /// O(1), tidak ada validasi di sini
    #[inline(always)]
    pub fn new(buf: &'buf [u8], loc: usize) -> Self {
        Self { buf, loc }
    }

    #[inline(always)]
    pub fn buf(&self) -> &'buf [u8] {
        self.buf
    }

    #[inline(always)]
    pub fn loc(&self) -> usize {
        self.loc
    }

    pub fn vtable(&self) -> Result<VTable<'buf>> {
        VTable::for_table(self.buf, self.loc)
    }

    /// Offset field relatif ke awal table; 0 berarti absent
    pub fn field_offset(&self, slot: VOffsetT) -> Result<VOffsetT> {
        self.vtable()?.get(slot)
    }

    /// Baca field `T` di `slot`, `None` jika absent
    #[inline]
    pub fn get<T: Follow<'buf>>(&self, slot: VOffsetT) -> Result<Option<T::Inner>> {
        match self.field_offset(slot)? {
            0 => Ok(None),
            off => T::follow(self.buf, self.loc + off as usize).map(Some),
        }
    }

    /// Scalar field dengan default eksplisit
    #[inline]
    pub fn get_scalar<T: Scalar + Follow<'buf, Inner = T>>(
        &self,
        slot: VOffsetT,
        default: T,
    ) -> Result<T> {
        Ok(self.get::<T>(slot)?.unwrap_or(default))
    }

    /// Field reference (string / child table), `None` jika absent
    #[inline]
    pub fn get_optional<T: Follow<'buf>>(&self, slot: VOffsetT) -> Result<Option<T::Inner>> {
        self.get::<ForwardsUOffset<T>>(slot)
    }

    /// Vector field, kosong jika absent
    #[inline]
    pub fn get_vector<T: Follow<'buf>>(&self, slot: VOffsetT) -> Result<Vector<'buf, T>> {
        Ok(self
            .get::<ForwardsUOffset<Vector<'buf, T>>>(slot)?
            .unwrap_or_default())
    }
}

impl<'buf> Follow<'buf> for Table<'buf> {
    type Inner = Table<'buf>;
    const INLINE_SIZE: usize = SIZE_UOFFSET;

    #[inline(always)]
    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
        Ok(Table::new(buf, loc))
    }
}

/// Resolve root table dari buffer yang sudah di-finish
///
/// Byte 0..4 adalah uoffset ke root table.
pub fn root<'buf, T: Follow<'buf>>(buf: &'buf [u8]) -> Result<T::Inner> {
    if buf.len() < SIZE_UOFFSET {
        return Err(CorruptBufferError::TooSmall(buf.len()).into());
    }
    ForwardsUOffset::<T>::follow(buf, 0)
}
