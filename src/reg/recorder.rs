use super::{Address, Bus};
use alloc::{collections::BTreeMap, vec::Vec};

/// Single bus transaction observed by a [`Recorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// Register read.
    Load {
        /// Register address.
        address: usize,
        /// Loaded value.
        value: u64,
    },
    /// Register write.
    Store {
        /// Register address.
        address: usize,
        /// Stored value.
        value: u64,
    },
}

/// In-memory register bus which records every transaction.
///
/// Registers start at zero unless preset with [`Recorder::with_value`]. Stores
/// keep the written value as is, no hardware write semantics are emulated.
/// Useful for unit-testing register sequences on the host.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::{self, Recorder, Transaction};
///
/// let field = reg::rw_field::<u32>(unsafe { reg::Address::new(0x1000, reg::Width::U32) }, 3, 0);
/// let mut bus = Recorder::new().with_value(0x1000, 0xF0);
/// reg::apply_on(&mut bus, &reg::items![reg::write(field, 5)]).unwrap();
/// assert_eq!(bus.transactions(), [
///     Transaction::Load { address: 0x1000, value: 0xF0 },
///     Transaction::Store { address: 0x1000, value: 0xF5 },
/// ]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    memory: BTreeMap<usize, u64>,
    log: Vec<Transaction>,
}

impl Recorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the register at `address` with `value`.
    #[must_use]
    pub fn with_value(mut self, address: usize, value: u64) -> Self {
        self.set_value(address, value);
        self
    }

    /// Overwrites the register at `address` without recording a
    /// transaction. Emulates a change made by hardware.
    pub fn set_value(&mut self, address: usize, value: u64) {
        self.memory.insert(address, value);
    }

    /// Returns the current value of the register at `address`.
    pub fn value(&self, address: usize) -> u64 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    /// Returns all transactions in the order they happened.
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Returns the number of recorded loads.
    pub fn loads(&self) -> usize {
        self.log.iter().filter(|t| matches!(t, Transaction::Load { .. })).count()
    }

    /// Returns the number of recorded stores.
    pub fn stores(&self) -> usize {
        self.log.iter().filter(|t| matches!(t, Transaction::Store { .. })).count()
    }

    /// Forgets recorded transactions, keeping register values.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl Bus for Recorder {
    fn load(&mut self, address: &Address) -> u64 {
        let value = self.value(address.addr()) & address.width().all_bits();
        self.log.push(Transaction::Load { address: address.addr(), value });
        value
    }

    fn store(&mut self, address: &Address, value: u64) {
        self.memory.insert(address.addr(), value);
        self.log.push(Transaction::Store { address: address.addr(), value });
    }
}
