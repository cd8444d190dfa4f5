use super::{
    exec::execute,
    merge::{plan, MergedOp, Plan},
    normalize::{flatten, Category},
    Bus, Error, FieldType, FieldValue, Item, Mmio, Reads,
};
use crate::platform::Interrupts;
use alloc::vec::Vec;

/// Validated and merged operation list, ready to run.
struct Pipeline {
    plan: Plan,
    args: Vec<u64>,
    reads: Reads,
}

impl Pipeline {
    fn new(items: &[Item<'_>]) -> Result<Self, Error> {
        let flat = flatten(items)?;
        let plan = plan(&flat.entries)?;
        Ok(Self { plan, args: flat.args, reads: Reads::new(flat.reads) })
    }

    fn run<B: Bus + ?Sized>(mut self, bus: &mut B) -> Reads {
        let plan = core::mem::take(&mut self.plan);
        for step in &plan.steps {
            self.run_step(bus, step);
        }
        self.reads
    }

    fn run_isolated<B: Bus + ?Sized>(mut self, bus: &mut B) -> Reads {
        let plan = core::mem::take(&mut self.plan);
        for step in &plan.steps {
            Interrupts::paused(|| self.run_step(bus, step));
        }
        self.reads
    }

    fn run_step<B: Bus + ?Sized>(&mut self, bus: &mut B, step: &[MergedOp]) {
        for op in step {
            let runtime = op.inputs.iter().fold(0, |value, &input| value | self.args[input]);
            let value = execute(bus, op, runtime);
            if op.category == Category::Read {
                self.reads.record(op.address.addr(), op.mask, value);
            }
        }
    }
}

/// Applies register operations to memory-mapped registers.
///
/// The items are validated, split into steps at sequence points, merged per
/// register inside each step, and executed step by step in ascending address
/// order. Returns the requested reads; the result is empty if nothing was
/// read.
///
/// # Errors
///
/// If any operation is invalid or operations on one register can't be merged.
/// Nothing is executed in that case.
#[inline]
pub fn apply(items: &[Item<'_>]) -> Result<Reads, Error> {
    apply_on(&mut Mmio, items)
}

/// Applies register operations to `bus`. See [`apply`].
///
/// # Errors
///
/// See [`apply`].
pub fn apply_on<B: Bus + ?Sized>(bus: &mut B, items: &[Item<'_>]) -> Result<Reads, Error> {
    Ok(Pipeline::new(items)?.run(bus))
}

/// Applies register operations inside a single critical section.
///
/// No interrupt handler observes the registers between the first and the last
/// transaction. Validation happens before interrupts are disabled.
///
/// # Errors
///
/// See [`apply`].
#[inline]
pub fn atomic(items: &[Item<'_>]) -> Result<Reads, Error> {
    atomic_on(&mut Mmio, items)
}

/// Applies register operations to `bus` inside a single critical section. See
/// [`atomic`].
///
/// # Errors
///
/// See [`apply`].
pub fn atomic_on<B: Bus + ?Sized>(bus: &mut B, items: &[Item<'_>]) -> Result<Reads, Error> {
    let pipeline = Pipeline::new(items)?;
    Ok(Interrupts::paused(|| pipeline.run(bus)))
}

/// Applies register operations, running each step in its own critical
/// section.
///
/// Interrupts may run between steps, but never observe a step half-applied.
/// Compared to [`atomic`], this keeps interrupt latency bounded by the longest
/// step.
///
/// # Errors
///
/// See [`apply`].
#[inline]
pub fn isolated(items: &[Item<'_>]) -> Result<Reads, Error> {
    isolated_on(&mut Mmio, items)
}

/// Applies register operations to `bus`, running each step in its own
/// critical section. See [`isolated`].
///
/// # Errors
///
/// See [`apply`].
pub fn isolated_on<B: Bus + ?Sized>(bus: &mut B, items: &[Item<'_>]) -> Result<Reads, Error> {
    Ok(Pipeline::new(items)?.run_isolated(bus))
}

/// Reads the field of `value` and compares it with the constant.
///
/// # Errors
///
/// If the field is not readable.
#[inline]
pub fn field_equals<T: FieldType>(value: FieldValue<T>) -> Result<bool, Error> {
    field_equals_on(&mut Mmio, value)
}

/// Reads the field of `value` from `bus` and compares it with the constant.
///
/// # Errors
///
/// If the field is not readable.
pub fn field_equals_on<B: Bus + ?Sized, T: FieldType>(
    bus: &mut B,
    value: FieldValue<T>,
) -> Result<bool, Error> {
    let reads = apply_on(bus, &[Item::Action(super::read(value.field()))])?;
    Ok(reads.matches(&value))
}

/// Applies register operations given as a list of items.
///
/// Accepts anything convertible into [`Item`](crate::reg::Item): actions,
/// action lists, nested item lists, and sequence points. With a leading `in
/// bus;` the operations are applied to the given [`Bus`](crate::reg::Bus)
/// instead of memory-mapped registers.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::{self, Address, Recorder, Width};
///
/// const CR: Address = unsafe { Address::new(0x4000_0000, Width::U32) };
///
/// let mut bus = Recorder::new();
/// let reads = drone_regops::apply!(in &mut bus;
///     reg::set(reg::rw_bit(CR, 0)),
///     reg::SEQUENCE_POINT,
///     reg::read(reg::rw_bit(CR, 0)),
/// )
/// .unwrap();
/// assert_eq!(reads.into_value::<bool>(), Some(true));
/// ```
#[macro_export]
macro_rules! apply {
    (in $bus:expr; $($item:expr),* $(,)?) => {
        $crate::reg::apply_on($bus, &$crate::items![$($item),*])
    };
    ($($item:expr),* $(,)?) => {
        $crate::reg::apply(&$crate::items![$($item),*])
    };
}

/// Applies register operations inside a single critical section. See
/// [`apply!`] for the syntax and [`reg::atomic`](crate::reg::atomic) for
/// details.
#[macro_export]
macro_rules! atomic {
    (in $bus:expr; $($item:expr),* $(,)?) => {
        $crate::reg::atomic_on($bus, &$crate::items![$($item),*])
    };
    ($($item:expr),* $(,)?) => {
        $crate::reg::atomic(&$crate::items![$($item),*])
    };
}

/// Applies register operations with one critical section per step. See
/// [`apply!`] for the syntax and [`reg::isolated`](crate::reg::isolated) for
/// details.
#[macro_export]
macro_rules! isolated {
    (in $bus:expr; $($item:expr),* $(,)?) => {
        $crate::reg::isolated_on($bus, &$crate::items![$($item),*])
    };
    ($($item:expr),* $(,)?) => {
        $crate::reg::isolated(&$crate::items![$($item),*])
    };
}
