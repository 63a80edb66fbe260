//! Protocol Layer: Entity schemas di atas Builder/Reader
//!
//! Prinsip desain:
//! - Slot number adalah wire contract: tidak pernah di-renumber atau dipakai ulang
//! - Entity tidak punya logic: hanya slot, tipe field, dan default
//! - Enum terbuka: code yang tidak dikenal diteruskan apa adanya

/// Reader struct untuk satu table: view `Copy` di atas [`Table`](crate::core::Table)
macro_rules! flat_table {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'buf> {
            table: $crate::core::Table<'buf>,
        }

        impl<'buf> $name<'buf> {
            #[inline(always)]
            pub fn from_table(table: $crate::core::Table<'buf>) -> Self {
                Self { table }
            }

            #[inline(always)]
            pub fn table(&self) -> $crate::core::Table<'buf> {
                self.table
            }
        }

        impl<'buf> $crate::core::Follow<'buf> for $name<'buf> {
            type Inner = $name<'buf>;
            const INLINE_SIZE: usize = $crate::core::wire::SIZE_UOFFSET;

            #[inline(always)]
            fn follow(buf: &'buf [u8], loc: usize) -> $crate::Result<Self::Inner> {
                Ok(Self::from_table($crate::core::Table::new(buf, loc)))
            }
        }
    };
}

mod array;
mod configuration;
mod enums;
mod frame;
mod graph;
mod request;
mod ui;
mod updater;
mod variable;

pub use array::{FlatArray, FlatArrayArgs, FlatArrayList, FlatArrayListArgs};
pub use configuration::{FlatConfiguration, FlatConfigurationArgs};
pub use enums::{
    ByteOrder, DType, Direction, ExecutionMode, OpType, OutputMode, ProfilingMode, UiInfoType,
    VarType,
};
pub use frame::{FrameIteration, FrameIterationArgs};
pub use graph::{FlatGraph, FlatGraphArgs};
pub use request::{
    FlatDropRequest, FlatDropRequestArgs, FlatInferenceRequest, FlatInferenceRequestArgs,
    FlatResponse, FlatResponseArgs,
};
pub use ui::{UiHardwareState, UiHardwareStateArgs, UiStaticInfoRecord, UiStaticInfoRecordArgs};
pub use updater::{UpdaterState, UpdaterStateArgs};
pub use variable::{FlatVariable, FlatVariableArgs, IntPair, IntPairArgs};
