//! FrameIteration: satu iterasi loop di dalam execution frame

use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    /// Identitas satu iterasi di dalam frame bernama
    FrameIteration
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameIterationArgs<'a> {
    pub frame: Option<Offset<&'a str>>,
    pub iteration: u16,
}

impl<'buf> FrameIteration<'buf> {
    pub const VT_FRAME: VOffsetT = 4;
    pub const VT_ITERATION: VOffsetT = 6;
    pub const FIELD_COUNT: usize = 2;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FrameIterationArgs<'a>,
    ) -> Result<Offset<FrameIteration<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot_offset(Self::VT_FRAME, args.frame)?;
        b.push_slot::<u16>(Self::VT_ITERATION, args.iteration, 0)?;
        b.end_table()
    }

    /// Nama frame, `None` jika tidak ditulis
    pub fn frame(&self) -> Result<Option<&'buf str>> {
        self.table.get_optional::<&str>(Self::VT_FRAME)
    }

    pub fn iteration(&self) -> Result<u16> {
        self.table.get_scalar::<u16>(Self::VT_ITERATION, 0)
    }
}

impl Verifiable for FrameIteration<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<&str>>("frame", Self::VT_FRAME)?
            .visit_field::<u16>("iteration", Self::VT_ITERATION)?
            .finish();
        Ok(())
    }
}
