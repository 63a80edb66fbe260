//! FlatArray: typed n-dimensional array, dan list-nya

use super::enums::{ByteOrder, DType};
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    /// Array: shape, raw data, dan tipe element
    ///
    /// `buffer` berisi data mentah dalam byte order `byte_order`; reader
    /// tidak melakukan konversi apa pun.
    FlatArray
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatArrayArgs<'a> {
    pub shape: Option<Offset<Vector<'a, i64>>>,
    pub buffer: Option<Offset<Vector<'a, i8>>>,
    pub dtype: DType,
    pub byte_order: ByteOrder,
}

impl<'buf> FlatArray<'buf> {
    pub const VT_SHAPE: VOffsetT = 4;
    pub const VT_BUFFER: VOffsetT = 6;
    pub const VT_DTYPE: VOffsetT = 8;
    pub const VT_BYTE_ORDER: VOffsetT = 10;
    pub const FIELD_COUNT: usize = 4;

    pub fn create<'a>(b: &mut Builder, args: &FlatArrayArgs<'a>) -> Result<Offset<FlatArray<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot_offset(Self::VT_SHAPE, args.shape)?;
        b.push_slot_offset(Self::VT_BUFFER, args.buffer)?;
        b.push_slot(Self::VT_DTYPE, args.dtype, DType::INHERIT)?;
        b.push_slot(Self::VT_BYTE_ORDER, args.byte_order, ByteOrder::LE)?;
        b.end_table()
    }

    pub fn shape(&self) -> Result<Vector<'buf, i64>> {
        self.table.get_vector::<i64>(Self::VT_SHAPE)
    }

    pub fn buffer(&self) -> Result<Vector<'buf, i8>> {
        self.table.get_vector::<i8>(Self::VT_BUFFER)
    }

    /// Data mentah tanpa copy; kosong jika field tidak ditulis
    pub fn buffer_bytes(&self) -> Result<&'buf [u8]> {
        Ok(self.buffer()?.bytes())
    }

    pub fn dtype(&self) -> Result<DType> {
        self.table.get_scalar(Self::VT_DTYPE, DType::INHERIT)
    }

    pub fn byte_order(&self) -> Result<ByteOrder> {
        self.table.get_scalar(Self::VT_BYTE_ORDER, ByteOrder::LE)
    }
}

impl Verifiable for FlatArray<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, i64>>>("shape", Self::VT_SHAPE)?
            .visit_field::<ForwardsUOffset<Vector<'_, i8>>>("buffer", Self::VT_BUFFER)?
            .visit_field::<DType>("dtype", Self::VT_DTYPE)?
            .visit_field::<ByteOrder>("byte_order", Self::VT_BYTE_ORDER)?
            .finish();
        Ok(())
    }
}

flat_table! {
    /// Vector of FlatArray
    FlatArrayList
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatArrayListArgs<'a> {
    pub list: Option<Offset<Vector<'a, ForwardsUOffset<FlatArray<'a>>>>>,
}

impl<'buf> FlatArrayList<'buf> {
    pub const VT_LIST: VOffsetT = 4;
    pub const FIELD_COUNT: usize = 1;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FlatArrayListArgs<'a>,
    ) -> Result<Offset<FlatArrayList<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot_offset(Self::VT_LIST, args.list)?;
        b.end_table()
    }

    pub fn list(&self) -> Result<Vector<'buf, ForwardsUOffset<FlatArray<'buf>>>> {
        self.table.get_vector(Self::VT_LIST)
    }

    pub fn list_len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

impl Verifiable for FlatArrayList<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<FlatArray<'_>>>>>(
                "list",
                Self::VT_LIST,
            )?
            .finish();
        Ok(())
    }
}
