use super::{merge::MergedOp, normalize::Category, trace, Address, Width};
use core::ptr::{read_volatile, write_volatile};

/// Register bus.
///
/// The execution seam of the pipeline: merged operations are carried out as
/// loads and stores on a bus. [`Mmio`] talks to real hardware, while
/// [`Recorder`](super::Recorder) keeps registers in memory.
///
/// Implementations must access exactly `address.width()` bits. Values passed
/// to `store` never have bits outside of the register width.
pub trait Bus {
    /// Reads the register at `address`.
    fn load(&mut self, address: &Address) -> u64;

    /// Writes `value` to the register at `address`.
    fn store(&mut self, address: &Address, value: u64);
}

/// Memory-mapped register bus.
///
/// Every access is a volatile access of the register width.
#[derive(Debug, Default)]
pub struct Mmio;

impl Bus for Mmio {
    #[inline]
    fn load(&mut self, address: &Address) -> u64 {
        let addr = address.addr();
        // Address construction is unsafe, and its contract guarantees a valid
        // register of this width.
        unsafe {
            match address.width() {
                Width::U8 => u64::from(read_volatile(addr as *const u8)),
                Width::U16 => u64::from(read_volatile(addr as *const u16)),
                Width::U32 => u64::from(read_volatile(addr as *const u32)),
                Width::U64 => read_volatile(addr as *const u64),
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    #[inline]
    fn store(&mut self, address: &Address, value: u64) {
        let addr = address.addr();
        unsafe {
            match address.width() {
                Width::U8 => write_volatile(addr as *mut u8, value as u8),
                Width::U16 => write_volatile(addr as *mut u16, value as u16),
                Width::U32 => write_volatile(addr as *mut u32, value as u32),
                Width::U64 => write_volatile(addr as *mut u64, value),
            }
        }
    }
}

/// Carries out one merged operation. Returns the loaded value for reads and
/// the stored value for writes.
pub(crate) fn execute<B: Bus + ?Sized>(bus: &mut B, op: &MergedOp, runtime: u64) -> u64 {
    let address = &op.address;
    if op.category == Category::Read {
        let value = bus.load(address);
        trace::load(address, value);
        return value;
    }
    let all = address.width().all_bits();
    let clear_or_zero = op.mask | address.write_ignored_if_zero();
    let one = address.write_ignored_if_one() & !op.mask;
    let fixed = one | clear_or_zero;
    let mut value = 0;
    // No sense reading if every bit is overwritten anyway.
    if fixed != all {
        value = bus.load(address);
        trace::load(address, value);
        value &= !clear_or_zero;
    }
    value |= one;
    match op.category {
        Category::Xor => value ^= op.literal | runtime,
        Category::Write | Category::Read => value |= op.literal | runtime,
    }
    value &= all;
    bus.store(address, value);
    trace::store(address, value);
    value
}
