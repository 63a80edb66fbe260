//! FlatGraph: satu graph lengkap beserta variable, output, dan state optimizer
//!
//! `nodes` disimpan sebagai table tanpa schema: layout node belum di-bind di
//! crate ini, jadi reader hanya mendapat `Table` mentah.

use super::configuration::FlatConfiguration;
use super::updater::UpdaterState;
use super::variable::{FlatVariable, IntPair};
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Table, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    FlatGraph
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGraphArgs<'a> {
    pub id: i64,
    pub variables: Option<Offset<Vector<'a, ForwardsUOffset<FlatVariable<'a>>>>>,
    pub nodes: Option<Offset<Vector<'a, ForwardsUOffset<Table<'a>>>>>,
    pub outputs: Option<Offset<Vector<'a, ForwardsUOffset<IntPair<'a>>>>>,
    pub configuration: Option<Offset<FlatConfiguration<'a>>>,
    pub placeholders: Option<Offset<Vector<'a, ForwardsUOffset<&'a str>>>>,
    pub loss_variables: Option<Offset<Vector<'a, ForwardsUOffset<&'a str>>>>,
    pub training_config: Option<Offset<&'a str>>,
    pub updater_state: Option<Offset<Vector<'a, ForwardsUOffset<UpdaterState<'a>>>>>,
}

impl<'buf> FlatGraph<'buf> {
    pub const VT_ID: VOffsetT = 4;
    pub const VT_VARIABLES: VOffsetT = 6;
    pub const VT_NODES: VOffsetT = 8;
    pub const VT_OUTPUTS: VOffsetT = 10;
    pub const VT_CONFIGURATION: VOffsetT = 12;
    pub const VT_PLACEHOLDERS: VOffsetT = 14;
    pub const VT_LOSS_VARIABLES: VOffsetT = 16;
    pub const VT_TRAINING_CONFIG: VOffsetT = 18;
    pub const VT_UPDATER_STATE: VOffsetT = 20;
    pub const FIELD_COUNT: usize = 9;

    pub fn create<'a>(b: &mut Builder, args: &FlatGraphArgs<'a>) -> Result<Offset<FlatGraph<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i64>(Self::VT_ID, args.id, 0)?;
        b.push_slot_offset(Self::VT_UPDATER_STATE, args.updater_state)?;
        b.push_slot_offset(Self::VT_TRAINING_CONFIG, args.training_config)?;
        b.push_slot_offset(Self::VT_LOSS_VARIABLES, args.loss_variables)?;
        b.push_slot_offset(Self::VT_PLACEHOLDERS, args.placeholders)?;
        b.push_slot_offset(Self::VT_CONFIGURATION, args.configuration)?;
        b.push_slot_offset(Self::VT_OUTPUTS, args.outputs)?;
        b.push_slot_offset(Self::VT_NODES, args.nodes)?;
        b.push_slot_offset(Self::VT_VARIABLES, args.variables)?;
        b.end_table()
    }

    pub fn id(&self) -> Result<i64> {
        self.table.get_scalar::<i64>(Self::VT_ID, 0)
    }

    pub fn variables(&self) -> Result<Vector<'buf, ForwardsUOffset<FlatVariable<'buf>>>> {
        self.table.get_vector(Self::VT_VARIABLES)
    }

    pub fn variables_len(&self) -> Result<usize> {
        Ok(self.variables()?.len())
    }

    /// Node mentah, tanpa schema
    pub fn nodes(&self) -> Result<Vector<'buf, ForwardsUOffset<Table<'buf>>>> {
        self.table.get_vector(Self::VT_NODES)
    }

    pub fn nodes_len(&self) -> Result<usize> {
        Ok(self.nodes()?.len())
    }

    pub fn outputs(&self) -> Result<Vector<'buf, ForwardsUOffset<IntPair<'buf>>>> {
        self.table.get_vector(Self::VT_OUTPUTS)
    }

    pub fn outputs_len(&self) -> Result<usize> {
        Ok(self.outputs()?.len())
    }

    pub fn configuration(&self) -> Result<Option<FlatConfiguration<'buf>>> {
        self.table.get_optional::<FlatConfiguration>(Self::VT_CONFIGURATION)
    }

    pub fn placeholders(&self) -> Result<Vector<'buf, ForwardsUOffset<&'buf str>>> {
        self.table.get_vector(Self::VT_PLACEHOLDERS)
    }

    pub fn placeholders_len(&self) -> Result<usize> {
        Ok(self.placeholders()?.len())
    }

    pub fn loss_variables(&self) -> Result<Vector<'buf, ForwardsUOffset<&'buf str>>> {
        self.table.get_vector(Self::VT_LOSS_VARIABLES)
    }

    pub fn loss_variables_len(&self) -> Result<usize> {
        Ok(self.loss_variables()?.len())
    }

    pub fn training_config(&self) -> Result<Option<&'buf str>> {
        self.table.get_optional::<&str>(Self::VT_TRAINING_CONFIG)
    }

    pub fn updater_state(&self) -> Result<Vector<'buf, ForwardsUOffset<UpdaterState<'buf>>>> {
        self.table.get_vector(Self::VT_UPDATER_STATE)
    }

    pub fn updater_state_len(&self) -> Result<usize> {
        Ok(self.updater_state()?.len())
    }
}

impl Verifiable for FlatGraph<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i64>("id", Self::VT_ID)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<FlatVariable<'_>>>>>(
                "variables",
                Self::VT_VARIABLES,
            )?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<Table<'_>>>>>(
                "nodes",
                Self::VT_NODES,
            )?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<IntPair<'_>>>>>(
                "outputs",
                Self::VT_OUTPUTS,
            )?
            .visit_field::<ForwardsUOffset<FlatConfiguration<'_>>>(
                "configuration",
                Self::VT_CONFIGURATION,
            )?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<&str>>>>(
                "placeholders",
                Self::VT_PLACEHOLDERS,
            )?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<&str>>>>(
                "loss_variables",
                Self::VT_LOSS_VARIABLES,
            )?
            .visit_field::<ForwardsUOffset<&str>>("training_config", Self::VT_TRAINING_CONFIG)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<UpdaterState<'_>>>>>(
                "updater_state",
                Self::VT_UPDATER_STATE,
            )?
            .finish();
        Ok(())
    }
}
