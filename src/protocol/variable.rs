//! FlatVariable: variable graph beserta identitas dan datanya

use super::array::FlatArray;
use super::enums::{DType, VarType};
use crate::core::wire::VOffsetT;
use crate::core::{Builder, ForwardsUOffset, Offset, Vector, Verifiable, Verifier};
use crate::error::Result;

flat_table! {
    /// Pasangan (node id, output index)
    IntPair
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntPairArgs {
    pub first: i32,
    pub second: i32,
}

impl<'buf> IntPair<'buf> {
    pub const VT_FIRST: VOffsetT = 4;
    pub const VT_SECOND: VOffsetT = 6;
    pub const FIELD_COUNT: usize = 2;

    pub fn create<'a>(b: &mut Builder, args: &IntPairArgs) -> Result<Offset<IntPair<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot::<i32>(Self::VT_SECOND, args.second, 0)?;
        b.push_slot::<i32>(Self::VT_FIRST, args.first, 0)?;
        b.end_table()
    }

    pub fn first(&self) -> Result<i32> {
        self.table.get_scalar::<i32>(Self::VT_FIRST, 0)
    }

    pub fn second(&self) -> Result<i32> {
        self.table.get_scalar::<i32>(Self::VT_SECOND, 0)
    }
}

impl Verifiable for IntPair<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<i32>("first", Self::VT_FIRST)?
            .visit_field::<i32>("second", Self::VT_SECOND)?
            .finish();
        Ok(())
    }
}

flat_table! {
    /// Variable: nama, id, shape, data, dan control dependency
    FlatVariable
}

type StringVector<'a> = Vector<'a, ForwardsUOffset<&'a str>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatVariableArgs<'a> {
    pub id: Option<Offset<IntPair<'a>>>,
    pub name: Option<Offset<&'a str>>,
    pub dtype: DType,
    pub shape: Option<Offset<Vector<'a, i64>>>,
    pub ndarray: Option<Offset<FlatArray<'a>>>,
    pub device: i32,
    pub variable_type: VarType,
    pub control_deps: Option<Offset<StringVector<'a>>>,
    pub control_dep_for_op: Option<Offset<StringVector<'a>>>,
    pub control_deps_for_var: Option<Offset<StringVector<'a>>>,
}

impl<'buf> FlatVariable<'buf> {
    pub const VT_ID: VOffsetT = 4;
    pub const VT_NAME: VOffsetT = 6;
    pub const VT_DTYPE: VOffsetT = 8;
    pub const VT_SHAPE: VOffsetT = 10;
    pub const VT_NDARRAY: VOffsetT = 12;
    pub const VT_DEVICE: VOffsetT = 14;
    pub const VT_VARIABLE_TYPE: VOffsetT = 16;
    pub const VT_CONTROL_DEPS: VOffsetT = 18;
    pub const VT_CONTROL_DEP_FOR_OP: VOffsetT = 20;
    pub const VT_CONTROL_DEPS_FOR_VAR: VOffsetT = 22;
    pub const FIELD_COUNT: usize = 10;

    pub fn create<'a>(
        b: &mut Builder,
        args: &FlatVariableArgs<'a>,
    ) -> Result<Offset<FlatVariable<'a>>> {
        b.start_table(Self::FIELD_COUNT)?;
        b.push_slot_offset(Self::VT_CONTROL_DEPS_FOR_VAR, args.control_deps_for_var)?;
        b.push_slot_offset(Self::VT_CONTROL_DEP_FOR_OP, args.control_dep_for_op)?;
        b.push_slot_offset(Self::VT_CONTROL_DEPS, args.control_deps)?;
        b.push_slot::<i32>(Self::VT_DEVICE, args.device, 0)?;
        b.push_slot_offset(Self::VT_NDARRAY, args.ndarray)?;
        b.push_slot_offset(Self::VT_SHAPE, args.shape)?;
        b.push_slot_offset(Self::VT_NAME, args.name)?;
        b.push_slot_offset(Self::VT_ID, args.id)?;
        b.push_slot(Self::VT_VARIABLE_TYPE, args.variable_type, VarType::VARIABLE)?;
        b.push_slot(Self::VT_DTYPE, args.dtype, DType::INHERIT)?;
        b.end_table()
    }

    pub fn id(&self) -> Result<Option<IntPair<'buf>>> {
        self.table.get_optional::<IntPair>(Self::VT_ID)
    }

    pub fn name(&self) -> Result<Option<&'buf str>> {
        self.table.get_optional::<&str>(Self::VT_NAME)
    }

    pub fn dtype(&self) -> Result<DType> {
        self.table.get_scalar(Self::VT_DTYPE, DType::INHERIT)
    }

    pub fn shape(&self) -> Result<Vector<'buf, i64>> {
        self.table.get_vector::<i64>(Self::VT_SHAPE)
    }

    pub fn ndarray(&self) -> Result<Option<FlatArray<'buf>>> {
        self.table.get_optional::<FlatArray>(Self::VT_NDARRAY)
    }

    pub fn device(&self) -> Result<i32> {
        self.table.get_scalar::<i32>(Self::VT_DEVICE, 0)
    }

    pub fn variable_type(&self) -> Result<VarType> {
        self.table.get_scalar(Self::VT_VARIABLE_TYPE, VarType::VARIABLE)
    }

    pub fn control_deps(&self) -> Result<StringVector<'buf>> {
        self.table.get_vector(Self::VT_CONTROL_DEPS)
    }

    pub fn control_dep_for_op(&self) -> Result<StringVector<'buf>> {
        self.table.get_vector(Self::VT_CONTROL_DEP_FOR_OP)
    }

    pub fn control_deps_for_var(&self) -> Result<StringVector<'buf>> {
        self.table.get_vector(Self::VT_CONTROL_DEPS_FOR_VAR)
    }
}

impl Verifiable for FlatVariable<'_> {
    fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<IntPair<'_>>>("id", Self::VT_ID)?
            .visit_field::<ForwardsUOffset<&str>>("name", Self::VT_NAME)?
            .visit_field::<DType>("dtype", Self::VT_DTYPE)?
            .visit_field::<ForwardsUOffset<Vector<'_, i64>>>("shape", Self::VT_SHAPE)?
            .visit_field::<ForwardsUOffset<FlatArray<'_>>>("ndarray", Self::VT_NDARRAY)?
            .visit_field::<i32>("device", Self::VT_DEVICE)?
            .visit_field::<VarType>("variable_type", Self::VT_VARIABLE_TYPE)?
            .visit_field::<ForwardsUOffset<StringVector<'_>>>("control_deps", Self::VT_CONTROL_DEPS)?
            .visit_field::<ForwardsUOffset<StringVector<'_>>>(
                "control_dep_for_op",
                Self::VT_CONTROL_DEP_FOR_OP,
            )?
            .visit_field::<ForwardsUOffset<StringVector<'_>>>(
                "control_deps_for_var",
                Self::VT_CONTROL_DEPS_FOR_VAR,
            )?
            .finish();
        Ok(())
    }
}
