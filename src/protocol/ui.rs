//! Monitoring records: hardware state dan static info
//!
//! Dikirim out-of-band dari eksekusi, bukan bagian dari request/response.

use super::enums::UiInfoType;
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    /// Snapshot counter memory (bytes)
    UiHardwareState
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UiHardwareStateArgs<'a> {
    /// Satu entry per device
    pub gpu_memory: Option<Offset<Vector<'a, i64>>>,
    pub host_memory: i64,
}

impl<'buf> UiHardwareState<'buf> {
    pub const VT_GPU_MEMORY: VOffsetT = 4;
    pub const VT_HOST_MEMORY: VOffsetT = 6;
    pub const FIELD_COUNT: usize = 2;

    pub fn create<'a>(
        b: &mut Builder,
        args: &UiHardwareStateArgs<'a>,
    ) -> Result<Offset<UiHardwareState<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i64>(Self::VT_HOST_MEMORY, args.host_memory, 0)?;
        b.push_slot_offset(Self::VT_GPU_MEMORY, args.gpu_memory)?;
        b.end_table()
    }

    pub fn gpu_memory(&self) -> Result<Vector<'buf, i64>> {
        self.table.get_vector::<i64>(Self::VT_GPU_MEMORY)
    }

    pub fn gpu_memory_len(&self) -> Result<usize> {
        Ok(self.gpu_memory()?.len())
    }

    pub fn host_memory(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_HOST_MEMORY, 0)
    }
}

impl Verifiable for UiHardwareState<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<Vector<'_, i64>>>("gpu_memory", Self::VT_GPU_MEMORY)?
            .visit_field::<i64>("host_memory", Self::VT_HOST_MEMORY)?
            .finish();
        Ok(())
    }
}

flat_table! {
    /// Tag jenis payload static info
    UiStaticInfoRecord
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UiStaticInfoRecordArgs {
    pub info_type: UiInfoType,
}

impl<'buf> UiStaticInfoRecord<'buf> {
    pub const VT_INFO_TYPE: VOffsetT = 4;
    pub const FIELD_COUNT: usize = 1;

    pub fn create<'a>(
        b: &mut Builder,
        args: &UiStaticInfoRecordArgs,
    ) -> Result<Offset<UiStaticInfoRecord<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot(Self::VT_INFO_TYPE, args.info_type, UiInfoType::GRAPH_STRUCTURE)?;
        b.end_table()
    }

    pub fn info_type(&self) -> Result<UiInfoType> {
        self.table.get_scalar(Self::VT_INFO_TYPE, UiInfoType::GRAPH_STRUCTURE)
    }
}

impl Verifiable for UiStaticInfoRecord<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<UiInfoType>("info_type", Self::VT_INFO_TYPE)?
            .finish();
        Ok(())
    }
}
