//! Vector: `[count: u32][elem 0][elem 1]...`
//!
//! Element scalar di-pack rapat; element table/string berupa uoffset relatif
//! ke posisi element itu sendiri. Urutan storage = urutan insert.

use std::fmt;
use std::marker::PhantomData;

use super::table::Follow;
use super::wire::{checked_range, read_scalar_at, UOffsetT, SIZE_UOFFSET};
use crate::error::{FlatError, Result};

/// View ke vector di dalam buffer
pub struct Vector<'buf, T> {
    buf: &'buf [u8],
    /// Posisi element pertama (setelah length prefix)
    loc: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// Manual impls: `T` hanya marker, tidak perlu Clone/Copy
impl<'buf, T> Clone for Vector<'buf, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'buf, T> Copy for Vector<'buf, T> {}

impl<'buf, T> Default for Vector<'buf, T> {
    fn default() -> Self {
        Self {
            buf: &[],
            loc: 0,
            len: 0,
            _marker: PhantomData,
        }
    }
}

impl<'buf, T> fmt::Debug for Vector<'buf, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("loc", &self.loc)
            .field("len", &self.len)
            .finish()
    }
}

impl<'buf, T> Vector<'buf, T> {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'buf, T: Follow<'buf>> Vector<'buf, T> {
    /// Element ke-`index` dalam urutan insert
    #[inline]
    pub fn get(&self, index: usize) -> Result<T::Inner> {
        if index >= self.len {
            return Err(FlatError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        T::follow(self.buf, self.loc + index * T::INLINE_SIZE)
    }

    pub fn iter(&self) -> VectorIter<'buf, T> {
        VectorIter {
            vector: *self,
            index: 0,
        }
    }

    /// Collect semua element; error pertama menghentikan proses
    pub fn to_vec(&self) -> Result<Vec<T::Inner>> {
        self.iter().collect()
    }

    /// Raw bytes dari seluruh element (zero-copy)
    pub fn bytes(&self) -> &'buf [u8] {
        // Bounds sudah dicek di follow()
        &self.buf[self.loc..self.loc + self.len * T::INLINE_SIZE]
    }
}

impl<'buf, T: Follow<'buf>> Follow<'buf> for Vector<'buf, T> {
    type Inner = Vector<'buf, T>;
    const INLINE_SIZE: usize = SIZE_UOFFSET;

    fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
        let len = read_scalar_at::<UOffsetT>(buf, loc)? as usize;
        let start = loc + SIZE_UOFFSET;
        let byte_len = len
            .checked_mul(T::INLINE_SIZE)
            .unwrap_or(usize::MAX);
        checked_range(buf, start, byte_len)?;

        Ok(Vector {
            buf,
            loc: start,
            len,
            _marker: PhantomData,
        })
    }
}

/// Iterator element vector, masing-masing di-resolve lazy
pub struct VectorIter<'buf, T> {
    vector: Vector<'buf, T>,
    index: usize,
}

impl<'buf, T: Follow<'buf>> Iterator for VectorIter<'buf, T> {
    type Item = Result<T::Inner>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.len {
            return None;
        }
        let item = self.vector.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<'buf, T: Follow<'buf>> ExactSizeIterator for VectorIter<'buf, T> {}

impl<'buf, T: Follow<'buf>> IntoIterator for Vector<'buf, T> {
    type Item = Result<T::Inner>;
    type IntoIter = VectorIter<'buf, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
