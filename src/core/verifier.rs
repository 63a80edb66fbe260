//! Verifier: cek seluruh buffer sebelum dibaca
//!
//! Accessor sudah bounds-checked per akses, jadi verifier tidak wajib.
//! Gunanya untuk buffer dari sumber yang tidak dipercaya: satu kali walk di
//! depan, dengan batas depth, jumlah table, dan apparent size, sehingga buffer
//! yang dibuat untuk meledakkan reader ditolak lebih awal.
//!
//! Yang dicek hanya bounds offset/length dan UTF-8 string. Enum code yang
//! tidak dikenal diterima apa adanya.

use super::table::{root, Follow, ForwardsUOffset, Table, VTable};
use super::vector::Vector;
use super::wire::{
    checked_range, follow_uoffset, read_scalar_at, Scalar, UOffsetT, VOffsetT, SIZE_SOFFSET,
    SIZE_UOFFSET,
};
use crate::error::{CorruptBufferError, Result};

/// Batas-batas verifier
#[derive(Debug, Clone)]
pub struct VerifierOptions {
    /// Kedalaman nesting table maksimum
    pub max_depth: usize,
    /// Jumlah table maksimum dalam satu buffer
    pub max_tables: usize,
    /// Total bytes yang boleh "terlihat" (data yang di-share dihitung berulang)
    pub max_apparent_size: usize,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_tables: 1_000_000,
            max_apparent_size: 1 << 31,
        }
    }
}

/// Tipe yang tahu cara memverifikasi dirinya di posisi tertentu
pub trait Verifiable {
    /// Scalar tidak perlu di-walk per element di dalam vector
    const IS_SCALAR: bool = false;

    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()>;
}

/// State walk: depth, jumlah table, apparent size
pub struct Verifier<'opts, 'buf> {
    buf: &'buf [u8],
    opts: &'opts VerifierOptions,
    depth: usize,
    num_tables: usize,
    apparent_size: usize,
}

impl<'opts, 'buf> Verifier<'opts, 'buf> {
    pub fn new(opts: &'opts VerifierOptions, buf: &'buf [u8]) -> Self {
        Self {
            buf,
            opts,
            depth: 0,
            num_tables: 0,
            apparent_size: 0,
        }
    }

    /// Range `[pos, pos + len)` harus ada di buffer
    pub fn in_buffer(&mut self, pos: usize, len: usize) -> Result<()> {
        checked_range(self.buf, pos, len)?;
        self.apparent_size = self.apparent_size.saturating_add(len);
        if self.apparent_size > self.opts.max_apparent_size {
            return Err(CorruptBufferError::ApparentSizeTooLarge(self.opts.max_apparent_size).into());
        }
        Ok(())
    }

    /// Resolve uoffset di `pos` dan cek bahwa target ada di buffer
    pub fn follow(&mut self, pos: usize) -> Result<usize> {
        self.in_buffer(pos, SIZE_UOFFSET)?;
        follow_uoffset(self.buf, pos)
    }

    fn read<T: Scalar>(&self, pos: usize) -> Result<T> {
        read_scalar_at::<T>(self.buf, pos)
    }

    /// Masuk ke table di `pos`: cek vtable dan inline data
    pub fn visit_table<'ver>(
        &'ver mut self,
        pos: usize,
    ) -> Result<TableVerifier<'ver, 'opts, 'buf>> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(CorruptBufferError::DepthLimitReached(self.opts.max_depth).into());
        }
        self.num_tables += 1;
        if self.num_tables > self.opts.max_tables {
            return Err(CorruptBufferError::TooManyTables(self.opts.max_tables).into());
        }

        let vtable = VTable::for_table(self.buf, pos)?;
        self.in_buffer(vtable.loc(), vtable.num_bytes())?;
        let inline_size = vtable.object_inline_num_bytes()?;
        if inline_size < SIZE_SOFFSET {
            return Err(CorruptBufferError::MalformedVtable {
                pos: vtable.loc(),
                reason: "table inline size is smaller than its header",
            }
            .into());
        }
        self.in_buffer(pos, inline_size)?;

        Ok(TableVerifier {
            verifier: self,
            pos,
            vtable,
        })
    }
}

/// Verifier untuk satu table yang sedang di-walk
pub struct TableVerifier<'ver, 'opts, 'buf> {
    verifier: &'ver mut Verifier<'opts, 'buf>,
    pos: usize,
    vtable: VTable<'buf>,
}

impl<'ver, 'opts, 'buf> TableVerifier<'ver, 'opts, 'buf> {
    /// Verifikasi field `T` di `slot` jika ada
    pub fn visit_field<T: Verifiable>(self, name: &'static str, slot: VOffsetT) -> Result<Self> {
        let off = self.vtable.get(slot)?;
        if off != 0 {
            let field_pos = self.pos + off as usize;
            if let Err(err) = T::run_verifier(&mut *self.verifier, field_pos) {
                tracing::debug!(field = name, table = self.pos, error = %err, "field failed verification");
                return Err(err);
            }
        }
        Ok(self)
    }

    /// Keluar dari table
    pub fn finish(self) {
        self.verifier.depth -= 1;
    }
}

macro_rules! impl_verifiable_scalar {
    ($($ty:ty),*) => {$(
        impl Verifiable for $ty {
            const IS_SCALAR: bool = true;

            #[inline]
            fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
                v.in_buffer(pos, <$ty as Scalar>::WIDTH)
            }
        }
    )*};
}

impl_verifiable_scalar!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl<T: Verifiable> Verifiable for ForwardsUOffset<T> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        let target = v.follow(pos)?;
        T::run_verifier(v, target)
    }
}

impl Verifiable for &[u8] {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.in_buffer(pos, SIZE_UOFFSET)?;
        let len = v.read::<UOffsetT>(pos)? as usize;
        v.in_buffer(pos + SIZE_UOFFSET, len)
    }
}

impl Verifiable for &str {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        <&[u8]>::run_verifier(v, pos)?;
        <&str>::follow(v.buf, pos).map(|_| ())
    }
}

impl<'a, T: Verifiable + Follow<'a>> Verifiable for Vector<'a, T> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.in_buffer(pos, SIZE_UOFFSET)?;
        let len = v.read::<UOffsetT>(pos)? as usize;
        let start = pos + SIZE_UOFFSET;
        let byte_len = len.checked_mul(T::INLINE_SIZE).unwrap_or(usize::MAX);
        v.in_buffer(start, byte_len)?;

        if !T::IS_SCALAR {
            for i in 0..len {
                T::run_verifier(v, start + i * T::INLINE_SIZE)?;
            }
        }
        Ok(())
    }
}

/// Table tanpa schema: hanya header dan vtable yang dicek
impl Verifiable for Table<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?.finish();
        Ok(())
    }
}

/// Walk seluruh buffer dengan root bertipe `T`
pub fn verify<T: Verifiable>(buf: &[u8], opts: &VerifierOptions) -> Result<()> {
    if buf.len() < SIZE_UOFFSET {
        return Err(CorruptBufferError::TooSmall(buf.len()).into());
    }
    if buf.len() > opts.max_apparent_size {
        return Err(CorruptBufferError::ApparentSizeTooLarge(opts.max_apparent_size).into());
    }

    let mut verifier = Verifier::new(opts, buf);
    ForwardsUOffset::<T>::run_verifier(&mut verifier, 0).map_err(|err| {
        tracing::debug!(bytes = buf.len(), error = %err, "buffer rejected by verifier");
        err
    })
}

/// `verify` lalu `root`
pub fn verified_root<'buf, T>(buf: &'buf [u8], opts: &VerifierOptions) -> Result<T::Inner>
where
    T: Follow<'buf> + Verifiable,
{
    verify::<T>(buf, opts)?;
    root::<T>(buf)
}
