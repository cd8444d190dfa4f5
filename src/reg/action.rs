use super::{Error, Field, FieldLocation, FieldType, FieldValue, ModifiedWrite};
use alloc::vec::Vec;

/// Operation requested on a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Reads the field.
    Read,
    /// Writes a run-time value.
    Write,
    /// Writes a constant value.
    WriteLiteral,
    /// Sets a single-bit field.
    Set,
    /// Clears a single-bit field.
    Clear,
    /// Resets a single-bit flag, which is cleared by writing one.
    Reset,
    /// Toggles a single-bit field.
    Toggle,
    /// XORs the field with a run-time value.
    Xor,
    /// XORs the field with a constant value.
    XorLiteral,
}

/// Field location paired with an operation.
///
/// Actions are plain values: they can be built in `const` context, stored in
/// `static` lists, and passed to [`apply`](super::apply) any number of times.
/// Use the factory functions, such as [`read`] or [`set`], to create them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    location: FieldLocation,
    kind: ActionKind,
    value: u64,
}

/// Ordering barrier between register operations.
///
/// Operations on different sides of a sequence point are never merged, and
/// everything before the barrier is complete before anything after it
/// starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequencePoint;

/// Sequence point constant.
pub const SEQUENCE_POINT: SequencePoint = SequencePoint;

/// Element of an operation list.
///
/// Lists can nest: a group of actions shared by several call sites can be
/// kept in a `static` and passed along with other items.
///
/// ```
/// use drone_regops::reg::{self, Item};
///
/// drone_regops::reg::map! {
///     /// Reset and clock control.
///     pub mod RCC;
///
///     /// Peripheral clock enable register.
///     APB2ENR {
///         0x4002_1018 0x20;
///         IOPAEN { 2 1 ReadWrite }
///         IOPBEN { 3 1 ReadWrite }
///     }
/// }
///
/// static CLOCKS: &[Item<'static>] = &[
///     Item::Action(reg::set(rcc::apb2enr::IOPAEN)),
///     Item::Action(reg::set(rcc::apb2enr::IOPBEN)),
/// ];
///
/// let mut bus = reg::Recorder::new();
/// reg::apply_on(&mut bus, &reg::items![CLOCKS, reg::SEQUENCE_POINT]).unwrap();
/// assert_eq!(bus.value(0x4002_1018), 0b1100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item<'a> {
    /// Single action.
    Action(Action),
    /// Flat list of actions.
    Actions(&'a [Action]),
    /// Nested list of items.
    Group(&'a [Item<'a>]),
    /// Ordering barrier.
    SequencePoint,
}

/// Lowered form of an action, as consumed by the merge engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Read,
    WriteLiteral(u64),
    WriteRuntime(u64),
    XorLiteral(u64),
    XorRuntime(u64),
}

impl Action {
    /// Creates a new action. `value` is relative to the field offset.
    #[inline]
    pub const fn new(location: FieldLocation, kind: ActionKind, value: u64) -> Self {
        Self { location, kind, value }
    }

    /// Returns the field location.
    #[inline]
    pub const fn location(&self) -> &FieldLocation {
        &self.location
    }

    /// Returns the operation kind.
    #[inline]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Returns the operand, relative to the field offset.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns `true` if the operand is supplied at run-time.
    #[inline]
    pub const fn is_runtime(&self) -> bool {
        matches!(self.kind, ActionKind::Write | ActionKind::Xor)
    }

    /// Checks the action against its field and lowers it.
    pub(crate) fn lower(&self) -> Result<Op, Error> {
        let location = &self.location;
        location.validate()?;
        let address = location.address().addr();
        let mask = location.mask();
        let access = location.access();
        if self.kind == ActionKind::Read {
            if !access.is_readable() {
                return Err(Error::NotReadable { address, mask });
            }
            return Ok(Op::Read);
        }
        if !access.is_writable() {
            return Err(Error::NotWritable { address, mask });
        }
        if matches!(
            self.kind,
            ActionKind::Set | ActionKind::Clear | ActionKind::Reset | ActionKind::Toggle
        ) && !location.is_bit()
        {
            return Err(Error::NotSingleBit { address, mask });
        }
        if matches!(self.kind, ActionKind::Toggle | ActionKind::Xor | ActionKind::XorLiteral)
            && !access.is_toggle_on_write()
        {
            return Err(Error::NotToggleOnWrite { address, mask });
        }
        let runtime = self.value.wrapping_shl(location.shift()) & mask;
        Ok(match self.kind {
            ActionKind::Read => Op::Read,
            ActionKind::Write => Op::WriteRuntime(runtime),
            ActionKind::WriteLiteral => Op::WriteLiteral(self.literal()?),
            ActionKind::Set => Op::WriteLiteral(mask),
            ActionKind::Clear if access.write == ModifiedWrite::OneToToggle => Op::XorLiteral(0),
            ActionKind::Clear => Op::WriteLiteral(0),
            ActionKind::Reset => {
                if !access.is_set_to_clear() {
                    return Err(Error::NotSetToClear { address, mask });
                }
                Op::WriteLiteral(mask)
            }
            ActionKind::Toggle => Op::XorLiteral(mask),
            ActionKind::Xor => Op::XorRuntime(runtime),
            ActionKind::XorLiteral => Op::XorLiteral(self.literal()?),
        })
    }

    fn literal(&self) -> Result<u64, Error> {
        let shift = self.location.shift();
        let mask = self.location.mask();
        let literal = self.value.wrapping_shl(shift);
        if literal >> shift != self.value || literal & !mask != 0 {
            return Err(Error::LiteralOutOfRange {
                address: self.location.address().addr(),
                mask,
                value: self.value,
            });
        }
        Ok(literal)
    }
}

/// Reads the field.
#[inline]
pub const fn read<T: FieldType>(field: Field<T>) -> Action {
    Action::new(*field.location(), ActionKind::Read, 0)
}

/// Writes a run-time `value` to the field.
///
/// Bits of `value` which don't fit into the field are dropped.
#[inline]
pub fn write<T: FieldType>(field: Field<T>, value: T) -> Action {
    Action::new(*field.location(), ActionKind::Write, value.into_bits())
}

/// Writes constant `bits` to the field.
///
/// The bits are relative to the field offset. They must fit into the field,
/// otherwise [`apply`](super::apply) rejects the action.
#[inline]
pub const fn write_literal<T: FieldType>(field: Field<T>, bits: u64) -> Action {
    Action::new(*field.location(), ActionKind::WriteLiteral, bits)
}

/// Writes a constant field value.
#[inline]
pub const fn write_value<T: FieldType>(value: FieldValue<T>) -> Action {
    write_literal(value.field(), value.bits())
}

/// Sets a single-bit field.
#[inline]
pub const fn set<T: FieldType>(field: Field<T>) -> Action {
    Action::new(*field.location(), ActionKind::Set, 1)
}

/// Clears a single-bit field.
///
/// For a field toggled by writing one, this writes zero to it, leaving the
/// bit unchanged.
#[inline]
pub const fn clear<T: FieldType>(field: Field<T>) -> Action {
    Action::new(*field.location(), ActionKind::Clear, 0)
}

/// Resets a single-bit flag which is cleared by writing one.
#[inline]
pub const fn reset<T: FieldType>(field: Field<T>) -> Action {
    Action::new(*field.location(), ActionKind::Reset, 1)
}

/// Toggles a single-bit field which is toggled by writing one.
///
/// The bit is written as one, other bits of the field as zero. Fields with
/// other write behaviours are rejected, as the hardware wouldn't toggle them.
#[inline]
pub const fn toggle<T: FieldType>(field: Field<T>) -> Action {
    Action::new(*field.location(), ActionKind::Toggle, 1)
}

/// XORs the field with a run-time `value`.
///
/// `value` is written to a field which is toggled by writing ones, so the
/// hardware flips exactly the bits set in `value`. Fields with other write
/// behaviours are rejected.
#[inline]
pub fn xor<T: FieldType>(field: Field<T>, value: T) -> Action {
    Action::new(*field.location(), ActionKind::Xor, value.into_bits())
}

/// XORs the field with constant `bits`, relative to the field offset. See
/// [`xor`].
#[inline]
pub const fn xor_literal<T: FieldType>(field: Field<T>, bits: u64) -> Action {
    Action::new(*field.location(), ActionKind::XorLiteral, bits)
}

impl From<Action> for Item<'_> {
    #[inline]
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<SequencePoint> for Item<'_> {
    #[inline]
    fn from(SequencePoint: SequencePoint) -> Self {
        Self::SequencePoint
    }
}

impl<'a> From<&'a [Action]> for Item<'a> {
    #[inline]
    fn from(actions: &'a [Action]) -> Self {
        Self::Actions(actions)
    }
}

impl<'a, const N: usize> From<&'a [Action; N]> for Item<'a> {
    #[inline]
    fn from(actions: &'a [Action; N]) -> Self {
        Self::Actions(actions)
    }
}

impl<'a> From<&'a Vec<Action>> for Item<'a> {
    #[inline]
    fn from(actions: &'a Vec<Action>) -> Self {
        Self::Actions(actions)
    }
}

impl<'a> From<&'a [Item<'a>]> for Item<'a> {
    #[inline]
    fn from(items: &'a [Item<'a>]) -> Self {
        Self::Group(items)
    }
}

impl<'a, const N: usize> From<&'a [Item<'a>; N]> for Item<'a> {
    #[inline]
    fn from(items: &'a [Item<'a>; N]) -> Self {
        Self::Group(items)
    }
}

/// Builds an array of [`Item`]s from actions, action lists, nested item
/// lists, and sequence points.
#[macro_export]
macro_rules! items {
    ($($item:expr),* $(,)?) => {
        [$($crate::reg::Item::from($item)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reg::{rw_bit, rw_field, Access, AccessKind, Address, Width};

    const REG: Address = unsafe { Address::new(0x2000, Width::U32) };

    #[test]
    fn lower_factories() {
        let bit = rw_bit(REG, 4);
        let field = rw_field::<u32>(REG, 11, 8);
        assert_eq!(read(field).lower(), Ok(Op::Read));
        assert_eq!(write(field, 0x1F).lower(), Ok(Op::WriteRuntime(0xF00)));
        assert_eq!(write_literal(field, 0x5).lower(), Ok(Op::WriteLiteral(0x500)));
        assert_eq!(write_value(field.value(0x3)).lower(), Ok(Op::WriteLiteral(0x300)));
        assert_eq!(set(bit).lower(), Ok(Op::WriteLiteral(0x10)));
        assert_eq!(clear(bit).lower(), Ok(Op::WriteLiteral(0)));
    }

    #[test]
    fn lower_toggles() {
        let bit = Field::<bool>::new(FieldLocation::new(REG, 0x10, Access::ONE_TO_TOGGLE));
        let field = Field::<u32>::new(FieldLocation::new(REG, 0xF00, Access::ONE_TO_TOGGLE));
        assert_eq!(toggle(bit).lower(), Ok(Op::XorLiteral(0x10)));
        assert_eq!(xor(field, 0x6).lower(), Ok(Op::XorRuntime(0x600)));
        assert_eq!(xor_literal(field, 0x6).lower(), Ok(Op::XorLiteral(0x600)));
    }

    #[test]
    fn toggle_needs_toggle_on_write() {
        let bit = rw_bit(REG, 4);
        let field = rw_field::<u32>(REG, 11, 8);
        assert_eq!(
            toggle(bit).lower(),
            Err(Error::NotToggleOnWrite { address: 0x2000, mask: 0x10 })
        );
        assert_eq!(
            xor(field, 0x6).lower(),
            Err(Error::NotToggleOnWrite { address: 0x2000, mask: 0xF00 })
        );
        assert_eq!(
            xor_literal(field, 0x6).lower(),
            Err(Error::NotToggleOnWrite { address: 0x2000, mask: 0xF00 })
        );
        let zero_to_toggle = FieldLocation::new(
            REG,
            0x10,
            Access::new(AccessKind::ReadWrite).write(ModifiedWrite::ZeroToToggle),
        );
        assert_eq!(
            toggle(Field::<bool>::new(zero_to_toggle)).lower(),
            Err(Error::NotToggleOnWrite { address: 0x2000, mask: 0x10 })
        );
    }

    #[test]
    fn clear_toggle_on_write() {
        let location = FieldLocation::new(
            REG,
            0x2,
            Access::new(AccessKind::ReadWrite).write(ModifiedWrite::OneToToggle),
        );
        assert_eq!(clear(Field::<bool>::new(location)).lower(), Ok(Op::XorLiteral(0)));
    }

    #[test]
    fn reset_requires_set_to_clear() {
        let plain = rw_bit(REG, 0);
        assert_eq!(
            reset(plain).lower(),
            Err(Error::NotSetToClear { address: 0x2000, mask: 0x1 })
        );
        let flag = Field::<bool>::new(FieldLocation::new(REG, 0x1, Access::ONE_TO_CLEAR));
        assert_eq!(reset(flag).lower(), Ok(Op::WriteLiteral(0x1)));
    }

    #[test]
    fn single_bit_only() {
        let field = rw_field::<u32>(REG, 1, 0);
        for action in [set(field), clear(field), reset(field), toggle(field)] {
            assert_eq!(action.lower(), Err(Error::NotSingleBit { address: 0x2000, mask: 0x3 }));
        }
    }

    #[test]
    fn literal_out_of_range() {
        let field = rw_field::<u32>(REG, 11, 8);
        assert_eq!(
            write_literal(field, 0x10).lower(),
            Err(Error::LiteralOutOfRange { address: 0x2000, mask: 0xF00, value: 0x10 })
        );
        let top = Field::<u64>::new(FieldLocation::new(
            unsafe { Address::new(0x2000, Width::U64) },
            0xF << 60,
            Access::ONE_TO_TOGGLE,
        ));
        assert_eq!(
            xor_literal(top, 0x1F).lower(),
            Err(Error::LiteralOutOfRange { address: 0x2000, mask: 0xF << 60, value: 0x1F })
        );
    }

    #[test]
    fn access_kind() {
        let ro = crate::reg::ro_bit(REG, 0);
        let wo = crate::reg::wo_bit(REG, 0);
        assert_eq!(set(ro).lower(), Err(Error::NotWritable { address: 0x2000, mask: 0x1 }));
        assert_eq!(read(wo).lower(), Err(Error::NotReadable { address: 0x2000, mask: 0x1 }));
        assert_eq!(read(ro).lower(), Ok(Op::Read));
        assert_eq!(set(wo).lower(), Ok(Op::WriteLiteral(0x1)));
    }
}
