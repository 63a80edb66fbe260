//! UpdaterState: state optimizer untuk satu parameter
//!
//! `keys` dan `values` adalah dua vector paralel (key ke-i berpasangan dengan
//! value ke-i). Panjang keduanya tidak dicek di sini; engine yang membuat
//! record ini yang menjaga konvensi tersebut.

use super::array::FlatArray;
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    UpdaterState
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdaterStateArgs<'a> {
    pub param_name: Option<Offset<&'a str>>,
    pub updater_state_keys: Option<Offset<Vector<'a, ForwardsUOffset<&'a str>>>>,
    pub updater_state_values: Option<Offset<Vector<'a, ForwardsUOffset<FlatArray<'a>>>>>,
}

impl<'buf> UpdaterState<'buf> {
    pub const VT_PARAM_NAME: VOffsetT = 4;
    pub const VT_UPDATER_STATE_KEYS: VOffsetT = 6;
    pub const VT_UPDATER_STATE_VALUES: VOffsetT = 8;
    pub const FIELD_COUNT: usize = 3;

    pub fn create<'a>(
        b: &mut Builder,
        args: &UpdaterStateArgs<'a>,
    ) -> Result<Offset<UpdaterState<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot_offset(Self::VT_UPDATER_STATE_VALUES, args.updater_state_values)?;
        b.push_slot_offset(Self::VT_UPDATER_STATE_KEYS, args.updater_state_keys)?;
        b.push_slot_offset(Self::VT_PARAM_NAME, args.param_name)?;
        b.end_table()
    }

    pub fn param_name(&self) -> Result<Option<&'buf str>> {
        self.table.get_optional::<&str>(Self::VT_PARAM_NAME)
    }

    pub fn updater_state_keys(&self) -> Result<Vector<'buf, ForwardsUOffset<&'buf str>>> {
        self.table.get_vector(Self::VT_UPDATER_STATE_KEYS)
    }

    pub fn updater_state_keys_len(&self) -> Result<usize> {
        Ok(self.updater_state_keys()?.len())
    }

    pub fn updater_state_values(&self) -> Result<Vector<'buf, ForwardsUOffset<FlatArray<'buf>>>> {
        self.table.get_vector(Self::VT_UPDATER_STATE_VALUES)
    }

    pub fn updater_state_values_len(&self) -> Result<usize> {
        Ok(self.updater_state_values()?.len())
    }

    /// Pasangan (key, value) ke-`index`
    pub fn entry(&self, index: usize) -> Result<(&'buf str, FlatArray<'buf>)> {
        Ok((
            self.updater_state_keys()?.get(index)?,
            self.updater_state_values()?.get(index)?,
        ))
    }
}

impl Verifiable for UpdaterState<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<&str>>("param_name", Self::VT_PARAM_NAME)?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<&str>>>>(
                "updater_state_keys",
                Self::VT_UPDATER_STATE_KEYS,
            )?
            .visit_field::<ForwardsUOffset<Vector<'_, ForwardsUOffset<FlatArray<'_>>>>>(
                "updater_state_values",
                Self::VT_UPDATER_STATE_VALUES,
            )?
            .finish();
        Ok(())
    }
}
