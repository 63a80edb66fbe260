//! Buffer Writer: table encoder yang tumbuh dari belakang ke depan
//!
//! Prinsip desain:
//! - Back-to-front: child ditulis dulu, sehingga offset-nya sudah diketahui
//!   saat table parent di-close
//! - Default-elision: slot yang sama dengan default tidak memakan tempat
//! - VTable dedup: table dengan bentuk identik berbagi satu vtable
//! - Reuse: `reset()` memakai ulang alokasi yang sama
//!
//! Semua `Offset` disimpan sebagai jarak dari UJUNG buffer, jadi tetap valid
//! walaupun buffer di-grow atau di-prefix dengan root offset.

use std::fmt;
use std::marker::PhantomData;

use super::table::ForwardsUOffset;
use super::vector::Vector;
use super::wire::{
    padding_bytes, slot_to_field_index, Scalar, SOffsetT, UOffsetT, VOffsetT, MAX_BUFFER_SIZE,
    SIZE_SOFFSET, SIZE_UOFFSET, SIZE_VOFFSET, VTABLE_HEADER_SIZE,
};
use crate::error::{BuilderMisuse, FlatError, Result};

/// Handle ke object yang sudah selesai ditulis di dalam `Builder`
///
/// `T` hanya marker tipe (table reader, `&str`, `Vector<..>`), supaya field
/// table tidak bisa diisi dengan offset dari tipe yang salah.
pub struct Offset<T> {
    value: UOffsetT,
    _marker: PhantomData<T>,
}

impl<T> Offset<T> {
    #[inline(always)]
    pub fn new(value: UOffsetT) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Jarak dari ujung buffer ke awal object
    #[inline(always)]
    pub fn value(&self) -> UOffsetT {
        self.value
    }

    /// Posisi absolut object di dalam buffer final sepanjang `finished_len`
    ///
    /// `None` jika offset tidak mungkin berasal dari buffer sepanjang itu.
    #[inline(always)]
    pub fn position_in(&self, finished_len: usize) -> Option<usize> {
        finished_len.checked_sub(self.value as usize)
    }
}

impl<T> Clone for Offset<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Offset<T> {}

impl<T> PartialEq for Offset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Offset<T> {}

impl<T> fmt::Debug for Offset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset({})", self.value)
    }
}

/// Builder configuration
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Alokasi awal dalam bytes
    pub initial_capacity: usize,
    /// Batas ukuran buffer; melewatinya menghasilkan `CapacityExceeded`
    pub max_buffer_size: usize,
    /// Tulis slot scalar walaupun sama dengan default
    pub force_defaults: bool,
    /// Pakai ulang vtable yang identik
    pub dedup_vtables: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_buffer_size: MAX_BUFFER_SIZE,
            force_defaults: false,
            dedup_vtables: true,
        }
    }
}

/// Konteks yang sedang terbuka
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Idle,
    Table { start: usize, field_count: usize },
    Vector {
        expected: usize,
        pushed: usize,
        elem_size: usize,
    },
}

impl Nesting {
    fn name(&self) -> &'static str {
        match self {
            Nesting::Idle => "nothing",
            Nesting::Table { .. } => "table",
            Nesting::Vector { .. } => "vector",
        }
    }
}

/// Field yang sudah ditulis di table yang sedang terbuka
#[derive(Debug, Clone, Copy)]
struct FieldLoc {
    off: UOffsetT,
    size: usize,
    slot: VOffsetT,
}

/// Single-writer buffer builder
///
/// Tidak `Sync`-safe untuk dipakai bersama: setiap producer membuat builder
/// sendiri dan menyerahkan buffer yang sudah selesai.
pub struct Builder {
    buf: Vec<u8>,
    /// Data terpakai ada di `buf[head..]`
    head: usize,
    min_align: usize,
    nesting: Nesting,
    field_locs: Vec<FieldLoc>,
    written_vtables: Vec<UOffsetT>,
    vtable_scratch: Vec<u8>,
    finished: bool,
    config: BuilderConfig,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        let capacity = config.initial_capacity.min(config.max_buffer_size);
        Self {
            buf: vec![0u8; capacity],
            head: capacity,
            min_align: 1,
            nesting: Nesting::Idle,
            field_locs: Vec::with_capacity(16),
            written_vtables: Vec::with_capacity(16),
            vtable_scratch: Vec::with_capacity(32),
            finished: false,
            config,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Reset builder untuk reuse, alokasi dipertahankan
    pub fn reset(&mut self) {
        self.head = self.buf.len();
        self.min_align = 1;
        self.nesting = Nesting::Idle;
        self.field_locs.clear();
        self.written_vtables.clear();
        self.vtable_scratch.clear();
        self.finished = false;
    }

    /// Bytes yang sudah ditulis
    #[inline(always)]
    pub fn used_space(&self) -> usize {
        self.buf.len() - self.head
    }

    /// Jumlah vtable unik yang sudah ditulis
    pub fn vtable_count(&self) -> usize {
        self.written_vtables.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Mulai table baru dengan `field_count` slot
    pub fn start_table(&mut self, field_count: usize) -> Result<()> {
        self.assert_idle("table")?;
        self.field_locs.clear();
        self.nesting = Nesting::Table {
            start: self.used_space(),
            field_count,
        };
        Ok(())
    }

    /// Tulis scalar ke `slot` hanya jika `value != default`
    #[inline]
    pub fn push_slot<T: Scalar>(&mut self, slot: VOffsetT, value: T, default: T) -> Result<()> {
        self.check_slot(slot, "push_slot")?;
        if value == default && !self.config.force_defaults {
            return Ok(());
        }
        self.push_slot_always(slot, value)
    }

    /// Tulis scalar ke `slot` tanpa default-elision
    #[inline]
    pub fn push_slot_always<T: Scalar>(&mut self, slot: VOffsetT, value: T) -> Result<()> {
        self.check_slot(slot, "push_slot_always")?;
        let off = self.push_scalar(value)?;
        self.field_locs.push(FieldLoc {
            off,
            size: T::WIDTH,
            slot,
        });
        Ok(())
    }

    /// Tulis reference (table/vector/string) ke `slot`; `None` dilewati
    #[inline]
    pub fn push_slot_offset<T>(&mut self, slot: VOffsetT, value: Option<Offset<T>>) -> Result<()> {
        self.check_slot(slot, "push_slot_offset")?;
        if let Some(target) = value {
            let off = self.push_uoffset(target.value())?;
            self.field_locs.push(FieldLoc {
                off,
                size: SIZE_UOFFSET,
                slot,
            });
        }
        Ok(())
    }

    /// Tutup table: tulis soffset header dan vtable (dedup jika bisa)
    pub fn end_table<T>(&mut self) -> Result<Offset<T>> {
        let start = match self.nesting {
            Nesting::Table { start, .. } => start,
            _ => return Err(BuilderMisuse::NoOpenTable("end_table").into()),
        };

        // Posisi soffset header dihitung dulu, sebelum ada yang ditulis
        let used = self.used_space();
        let object_revloc = used + padding_bytes(used + SIZE_SOFFSET, SIZE_SOFFSET) + SIZE_SOFFSET;

        // Padding sebelum field pertama tidak dihitung, supaya table dengan
        // bentuk sama menghasilkan vtable yang byte-identik
        let tail = self
            .field_locs
            .iter()
            .map(|f| f.off as usize - f.size)
            .min()
            .unwrap_or(object_revloc - SIZE_SOFFSET)
            .max(start);
        let inline_size = object_revloc - tail;
        if inline_size > u16::MAX as usize {
            // Table ditinggalkan; field yang sudah ditulis jadi dead space
            self.field_locs.clear();
            self.nesting = Nesting::Idle;
            return Err(BuilderMisuse::TableTooLarge(inline_size).into());
        }

        // Placeholder soffset, di-patch setelah posisi vtable diketahui
        let written = self.push_scalar::<SOffsetT>(0)? as usize;
        debug_assert_eq!(written, object_revloc);

        // Trailing slot yang tidak ditulis di-trim dari vtable
        let vt_len = self
            .field_locs
            .iter()
            .map(|f| f.slot as usize + SIZE_VOFFSET)
            .max()
            .unwrap_or(VTABLE_HEADER_SIZE);

        let scratch = &mut self.vtable_scratch;
        scratch.clear();
        scratch.resize(vt_len, 0);
        (vt_len as VOffsetT).write_le(&mut scratch[0..]);
        (inline_size as VOffsetT).write_le(&mut scratch[SIZE_VOFFSET..]);
        for field in &self.field_locs {
            let pos_in_table = (object_revloc - field.off as usize) as VOffsetT;
            pos_in_table.write_le(&mut scratch[field.slot as usize..]);
        }

        let existing = if self.config.dedup_vtables {
            self.find_written_vtable()
        } else {
            None
        };

        let vt_revloc = match existing {
            Some(revloc) => {
                tracing::trace!(revloc, "reusing vtable");
                revloc as usize
            }
            None => {
                let at = self.make_space(vt_len)?;
                self.buf[at..at + vt_len].copy_from_slice(&self.vtable_scratch);
                let revloc = self.used_space();
                self.written_vtables.push(revloc as UOffsetT);
                revloc
            }
        };

        // vtable = table - soffset
        let table_pos = self.buf.len() - object_revloc;
        let soffset = (vt_revloc as i64 - object_revloc as i64) as SOffsetT;
        soffset.write_le(&mut self.buf[table_pos..table_pos + SIZE_UOFFSET]);

        self.field_locs.clear();
        self.nesting = Nesting::Idle;
        Ok(Offset::new(object_revloc as UOffsetT))
    }

    // ------------------------------------------------------------------
    // Vectors
    // ------------------------------------------------------------------

    /// Mulai vector. Element HARUS di-push dalam urutan terbalik.
    ///
    /// `alignment` harus power of 2 dan >= `elem_size`.
    pub fn start_vector(&mut self, elem_size: usize, count: usize, alignment: usize) -> Result<()> {
        self.assert_idle("vector")?;
        debug_assert!(alignment.is_power_of_two(), "alignment must be power of 2");

        let byte_len = elem_size
            .checked_mul(count)
            .ok_or(FlatError::CapacityExceeded {
                requested: usize::MAX,
                limit: self.config.max_buffer_size,
            })?;
        self.align(byte_len, SIZE_UOFFSET)?;
        self.align(byte_len, alignment)?;
        self.nesting = Nesting::Vector {
            expected: count,
            pushed: 0,
            elem_size,
        };
        Ok(())
    }

    /// Push satu element scalar (urutan terbalik)
    #[inline]
    pub fn push_vector_element<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.bump_vector("push_vector_element", T::WIDTH)?;
        self.push_scalar(value)?;
        Ok(())
    }

    /// Push satu element reference (urutan terbalik)
    #[inline]
    pub fn push_vector_offset<T>(&mut self, value: Offset<T>) -> Result<()> {
        self.bump_vector("push_vector_offset", SIZE_UOFFSET)?;
        self.push_uoffset(value.value())?;
        Ok(())
    }

    /// Tutup vector: tulis length prefix
    pub fn end_vector<'a, T>(&mut self) -> Result<Offset<Vector<'a, T>>> {
        let count = match self.nesting {
            Nesting::Vector {
                expected, pushed, ..
            } if expected == pushed => expected,
            Nesting::Vector {
                expected, pushed, ..
            } => {
                return Err(BuilderMisuse::VectorLengthMismatch { expected, pushed }.into())
            }
            _ => return Err(BuilderMisuse::NoOpenVector("end_vector").into()),
        };
        self.nesting = Nesting::Idle;
        let off = self.push_scalar::<UOffsetT>(count as UOffsetT)?;
        Ok(Offset::new(off))
    }

    /// Vector scalar dalam urutan natural (tanpa perlu membalik)
    pub fn create_vector<'a, T: Scalar>(&mut self, items: &[T]) -> Result<Offset<Vector<'a, T>>> {
        self.start_vector(T::WIDTH, items.len(), T::WIDTH)?;
        let at = self.make_space(T::WIDTH * items.len())?;
        for (i, item) in items.iter().enumerate() {
            let pos = at + i * T::WIDTH;
            item.write_le(&mut self.buf[pos..pos + T::WIDTH]);
        }
        self.fill_vector();
        self.end_vector()
    }

    /// Vector byte (`[i8]` di schema) langsung dari raw bytes
    pub fn create_byte_vector<'a>(&mut self, bytes: &[u8]) -> Result<Offset<Vector<'a, i8>>> {
        self.start_vector(1, bytes.len(), 1)?;
        let at = self.make_space(bytes.len())?;
        self.buf[at..at + bytes.len()].copy_from_slice(bytes);
        self.fill_vector();
        self.end_vector()
    }

    /// Vector reference ke table/string, urutan natural
    pub fn create_vector_of_offsets<'a, T>(
        &mut self,
        items: &[Offset<T>],
    ) -> Result<Offset<Vector<'a, ForwardsUOffset<T>>>> {
        self.start_vector(SIZE_UOFFSET, items.len(), SIZE_UOFFSET)?;
        for item in items.iter().rev() {
            self.push_vector_offset(*item)?;
        }
        self.end_vector()
    }

    /// Tulis semua string lalu vector reference-nya
    pub fn create_vector_of_strings<'a, S: AsRef<str>>(
        &mut self,
        items: &[S],
    ) -> Result<Offset<Vector<'a, ForwardsUOffset<&'a str>>>> {
        let offsets = items
            .iter()
            .map(|s| self.create_string(s.as_ref()))
            .collect::<Result<Vec<Offset<&'a str>>>>()?;
        self.create_vector_of_offsets(&offsets)
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// String dengan length prefix dan zero terminator. Tidak ada pooling.
    pub fn create_string<'a>(&mut self, s: &str) -> Result<Offset<&'a str>> {
        self.create_byte_string(s.as_bytes())
            .map(|off| Offset::new(off.value()))
    }

    pub fn create_byte_string<'a>(&mut self, bytes: &[u8]) -> Result<Offset<&'a [u8]>> {
        self.assert_idle("string")?;
        let len = bytes.len();
        self.align(len + 1, SIZE_UOFFSET)?;
        let at = self.make_space(len + 1)?;
        self.buf[at..at + len].copy_from_slice(bytes);
        self.buf[at + len] = 0;
        let off = self.push_scalar::<UOffsetT>(len as UOffsetT)?;
        Ok(Offset::new(off))
    }

    // ------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------

    /// Tulis root offset di depan buffer dan kembalikan hasil final
    pub fn finish<T>(&mut self, root: Offset<T>) -> Result<&[u8]> {
        if self.finished {
            return Err(BuilderMisuse::AlreadyFinished("finish").into());
        }
        if self.nesting != Nesting::Idle {
            return Err(BuilderMisuse::NestedStart {
                started: "finish",
                open: self.nesting.name(),
            }
            .into());
        }

        self.track_min_align(SIZE_UOFFSET);
        let min_align = self.min_align;
        self.align(SIZE_UOFFSET, min_align)?;
        self.push_uoffset(root.value())?;
        self.finished = true;

        tracing::trace!(
            bytes = self.used_space(),
            vtables = self.written_vtables.len(),
            "finished buffer"
        );
        Ok(&self.buf[self.head..])
    }

    /// Buffer final (hanya setelah `finish`)
    pub fn finished_data(&self) -> Result<&[u8]> {
        if !self.finished {
            return Err(BuilderMisuse::NotFinished.into());
        }
        Ok(&self.buf[self.head..])
    }

    /// Serahkan buffer final (move, tanpa copy ke alokasi baru)
    pub fn into_finished(self) -> Result<Vec<u8>> {
        if !self.finished {
            return Err(BuilderMisuse::NotFinished.into());
        }
        let head = self.head;
        let mut buf = self.buf;
        buf.drain(..head);
        Ok(buf)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn assert_idle(&self, started: &'static str) -> Result<()> {
        if self.finished {
            return Err(BuilderMisuse::AlreadyFinished(started).into());
        }
        match self.nesting {
            Nesting::Idle => Ok(()),
            open => Err(BuilderMisuse::NestedStart {
                started,
                open: open.name(),
            }
            .into()),
        }
    }

    fn check_slot(&self, slot: VOffsetT, op: &'static str) -> Result<()> {
        match self.nesting {
            Nesting::Table { field_count, .. } => {
                let valid = slot as usize >= VTABLE_HEADER_SIZE
                    && slot as usize % SIZE_VOFFSET == 0
                    && slot_to_field_index(slot) < field_count;
                if !valid {
                    return Err(BuilderMisuse::SlotOutOfRange { slot, field_count }.into());
                }
                // Vtable hanya bisa menunjuk satu nilai per slot
                if self.field_locs.iter().any(|f| f.slot == slot) {
                    return Err(BuilderMisuse::DuplicateSlot(slot).into());
                }
                Ok(())
            }
            _ => Err(BuilderMisuse::NoOpenTable(op).into()),
        }
    }

    fn bump_vector(&mut self, op: &'static str, width: usize) -> Result<()> {
        match &mut self.nesting {
            Nesting::Vector {
                expected,
                pushed,
                elem_size,
            } => {
                if width != *elem_size {
                    return Err(BuilderMisuse::VectorElementSize {
                        declared: *elem_size,
                        pushed: width,
                    }
                    .into());
                }
                if *pushed >= *expected {
                    return Err(BuilderMisuse::VectorLengthMismatch {
                        expected: *expected,
                        pushed: *pushed + 1,
                    }
                    .into());
                }
                *pushed += 1;
                Ok(())
            }
            _ => Err(BuilderMisuse::NoOpenVector(op).into()),
        }
    }

    /// Dipakai oleh bulk writer: semua element sudah ditulis sekaligus
    fn fill_vector(&mut self) {
        if let Nesting::Vector {
            expected, pushed, ..
        } = &mut self.nesting
        {
            *pushed = *expected;
        }
    }

    fn find_written_vtable(&self) -> Option<UOffsetT> {
        let wanted = &self.vtable_scratch[..];
        self.written_vtables.iter().copied().find(|&revloc| {
            let pos = self.buf.len() - revloc as usize;
            self.buf.get(pos..pos + wanted.len()) == Some(wanted)
        })
    }

    #[inline(always)]
    fn track_min_align(&mut self, alignment: usize) {
        if alignment > self.min_align {
            self.min_align = alignment;
        }
    }

    /// Padding supaya `len` bytes berikutnya berakhir di batas `alignment`
    fn align(&mut self, len: usize, alignment: usize) -> Result<()> {
        self.track_min_align(alignment);
        let pad = padding_bytes(self.used_space() + len, alignment);
        if pad > 0 {
            let at = self.make_space(pad)?;
            self.buf[at..at + pad].fill(0);
        }
        Ok(())
    }

    fn push_scalar<T: Scalar>(&mut self, value: T) -> Result<UOffsetT> {
        self.align(T::WIDTH, T::WIDTH)?;
        let at = self.make_space(T::WIDTH)?;
        value.write_le(&mut self.buf[at..at + T::WIDTH]);
        Ok(self.used_space() as UOffsetT)
    }

    /// Tulis uoffset relatif terhadap posisi slot itu sendiri
    fn push_uoffset(&mut self, target: UOffsetT) -> Result<UOffsetT> {
        self.align(SIZE_UOFFSET, SIZE_UOFFSET)?;
        let used = self.used_space();
        if target == 0 || target as usize > used {
            return Err(BuilderMisuse::UnwrittenOffset {
                offset: target,
                used,
            }
            .into());
        }
        let relative = (used + SIZE_UOFFSET - target as usize) as UOffsetT;
        self.push_scalar(relative)
    }

    /// Geser head ke depan sebanyak `len`, grow jika perlu
    fn make_space(&mut self, len: usize) -> Result<usize> {
        self.ensure_capacity(len)?;
        self.head -= len;
        Ok(self.head)
    }

    fn ensure_capacity(&mut self, want: usize) -> Result<()> {
        if self.head >= want {
            return Ok(());
        }

        let limit = self.config.max_buffer_size;
        let used = self.used_space();
        let required = used.saturating_add(want);
        if required > limit {
            return Err(FlatError::CapacityExceeded {
                requested: required,
                limit,
            });
        }

        let mut new_len = self.buf.len().max(64);
        while new_len < required {
            new_len = new_len.saturating_mul(2);
        }
        let new_len = new_len.min(limit);

        // Data lama dipindah ke ujung buffer baru
        let mut grown = vec![0u8; new_len];
        grown[new_len - used..].copy_from_slice(&self.buf[self.head..]);
        tracing::trace!(old_len = self.buf.len(), new_len, "grew builder buffer");
        self.buf = grown;
        self.head = new_len - used;
        Ok(())
    }
}
