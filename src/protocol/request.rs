//! Request/response: inference request, response status, drop request

use super::configuration::FlatConfiguration;
use super::variable::FlatVariable;
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    /// Inference request: id, input variables, dan konfigurasi eksekusi
    FlatInferenceRequest
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatInferenceRequestArgs<'a> {
    pub id: i64,
    pub variables: Option<Offset<Vector<'a, ForwardsUOffset<FlatVariable<'a>>>>>,
    pub configuration: Option<Offset<FlatConfiguration<'a>>>,
}

impl<'buf> FlatInferenceRequest<'buf> {
    pub const VT_ID: VOffsetT = 4;
    pub const VT_VARIABLES: VOffsetT = 6;
    pub const VT_CONFIGURATION: VOffsetT = 8;
    pub const FIELD_COUNT: usize = 3;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FlatInferenceRequestArgs<'a>,
    ) -> Result<Offset<FlatInferenceRequest<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i64>(Self::VT_ID, args.id, 0)?;
        b.push_slot_offset(Self::VT_CONFIGURATION, args.configuration)?;
        b.push_slot_offset(Self::VT_VARIABLES, args.variables)?;
        b.end_table()
    }

    pub fn id(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_ID, 0)
    }

    /// Input variables, urutan sesuai saat dibangun
    pub fn variables(&self) -> Result<Vector<'buf, ForwardsUOffset<FlatVariable<'buf>>>> {
        self.table.get_vector(Self::VT_VARIABLES)
    }

    pub fn variables_len(&self) -> Result<usize> {
        Ok(self.variables()?.len())
    }

    pub fn configuration(&self) -> Result<Option<FlatConfiguration<'buf>>> {
        self.table.get_optional::<FlatConfiguration>(Self::VT_CONFIGURATION)
    }
}

impl Verifiable for FlatInferenceRequest<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i64>("id", Self::VT_ID)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<FlatVariable<'_>>>>>(
                "variables",
                Self::VT_VARIABLES,
            )?
            .visit_field::<ForwardsUOffset<FlatConfiguration<'_>>>(
                "configuration",
                Self::VT_CONFIGURATION,
            )?
            .finish();
        Ok(())
    }
}

flat_table! {
    /// Status akhir sebuah request
    FlatResponse
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatResponseArgs {
    pub status: i32,
}

impl<'buf> FlatResponse<'buf> {
    pub const VT_STATUS: VOffsetT = 4;
    pub const FIELD_COUNT: usize = 1;

    pub fn create<'a>(b: &mut Builder, args: &FlatResponseArgs) -> Result<Offset<FlatResponse<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i32>(Self::VT_STATUS, args.status, 0)?;
        b.end_table()
    }

    pub fn status(&self) -> Result<i32> {
        self.table.get_scalar::<i32>(Self::VT_STATUS, 0)
    }
}

impl Verifiable for FlatResponse<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i32>("status", Self::VT_STATUS)?
            .finish();
        Ok(())
    }
}

flat_table! {
    /// Minta engine melepas state milik request `id`
    FlatDropRequest
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatDropRequestArgs {
    pub id: i64,
}

impl<'buf> FlatDropRequest<'buf> {
    pub const VT_ID: VOffsetT = 4;
    pub const FIELD_COUNT: usize = 1;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FlatDropRequestArgs,
    ) -> Result<Offset<FlatDropRequest<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i64>(Self::VT_ID, args.id, 0)?;
        b.end_table()
    }

    pub fn id(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_ID, 0)
    }
}

impl Verifiable for FlatDropRequest<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i64>("id", Self::VT_ID)?
            .finish();
        Ok(())
    }
}
