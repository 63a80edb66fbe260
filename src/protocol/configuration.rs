//! FlatConfiguration: mode eksekusi untuk satu inference request

use super::enums::{Direction, ExecutionMode, OutputMode, ProfilingMode};
use crate::core::wire::VOffsetT;
use crate::core::{Builder, Offset, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    FlatConfiguration
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatConfigurationArgs {
    pub id: i64,
    pub execution_mode: ExecutionMode,
    pub profiling_mode: ProfilingMode,
    pub output_mode: OutputMode,
    pub timestats: bool,
    pub footprint_forward: i64,
    pub footprint_backward: i64,
    pub direction: Direction,
}

impl<'buf> FlatConfiguration<'buf> {
    pub const VT_ID: VOffsetT = 4;
    pub const VT_EXECUTION_MODE: VOffsetT = 6;
    pub const VT_PROFILING_MODE: VOffsetT = 8;
    pub const VT_OUTPUT_MODE: VOffsetT = 10;
    pub const VT_TIMESTATS: VOffsetT = 12;
    pub const VT_FOOTPRINT_FORWARD: VOffsetT = 14;
    pub const VT_FOOTPRINT_BACKWARD: VOffsetT = 16;
    pub const VT_DIRECTION: VOffsetT = 18;
    pub const FIELD_COUNT: usize = 8;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FlatConfigurationArgs,
    ) -> Result<Offset<FlatConfiguration<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        // 8-byte field dulu supaya padding minimal
        b.push_slot::<i64>(Self::VT_FOOTPRINT_BACKWARD, args.footprint_backward, 0)?;
        b.push_slot::<i64>(Self::VT_FOOTPRINT_FORWARD, args.footprint_forward, 0)?;
        b.push_slot::<i64>(Self::VT_ID, args.id, 0)?;
        b.push_slot(Self::VT_DIRECTION, args.direction, Direction::FORWARD_ONLY)?;
        b.push_slot(Self::VT_TIMESTATS, args.timestats, false)?;
        b.push_slot(Self::VT_OUTPUT_MODE, args.output_mode, OutputMode::IMPLICIT)?;
        b.push_slot(Self::VT_PROFILING_MODE, args.profiling_mode, ProfilingMode::NONE)?;
        b.push_slot(Self::VT_EXECUTION_MODE, args.execution_mode, ExecutionMode::SEQUENTIAL)?;
        b.end_table()
    }

    pub fn id(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_ID, 0)
    }

    pub fn execution_mode(&self) -> Result<ExecutionMode> {
        self.table.get_scalar(Self::VT_EXECUTION_MODE, ExecutionMode::SEQUENTIAL)
    }

    pub fn profiling_mode(&self) -> Result<ProfilingMode> {
        self.table.get_scalar(Self::VT_PROFILING_MODE, ProfilingMode::NONE)
    }

    pub fn output_mode(&self) -> Result<OutputMode> {
        self.table.get_scalar(Self::VT_OUTPUT_MODE, OutputMode::IMPLICIT)
    }

    pub fn timestats(&self) -> Result<bool> {
        self.table.get_scalar(Self::VT_TIMESTATS, false)
    }

    pub fn footprint_forward(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_FOOTPRINT_FORWARD, 0)
    }

    pub fn footprint_backward(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_FOOTPRINT_BACKWARD, 0)
    }

    pub fn direction(&self) -> Result<Direction> {
        self.table.get_scalar(Self::VT_DIRECTION, Direction::FORWARD_ONLY)
    }
}

impl Verifiable for FlatConfiguration<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i64>("id", Self::VT_ID)?
            .visit_field::<ExecutionMode>("execution_mode", Self::VT_EXECUTION_MODE)?
            .visit_field::<ProfilingMode>("profiling_mode", Self::VT_PROFILING_MODE)?
            .visit_field::<OutputMode>("output_mode", Self::VT_OUTPUT_MODE)?
            .visit_field::<bool>("timestats", Self::VT_TIMESTATS)?
            .visit_field::<i64>("footprint_forward", Self::VT_FOOTPRINT_FORWARD)?
            .visit_field::<i64>("footprint_backward", Self::VT_FOOTPRINT_BACKWARD)?
            .visit_field::<Direction>("direction", Self::VT_DIRECTION)?
            .finish();
        Ok(())
    }
}
