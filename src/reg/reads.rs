use super::{Field, FieldLocation, FieldType, FieldValue};
use alloc::vec::Vec;

/// Values read by one [`apply`](super::apply) call.
///
/// Holds one raw value per distinct register address and decodes requested
/// fields out of them. Fields which were merged into a single bus read share
/// the raw value, each decoding only its own bits.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::{self, Address, Recorder, Width};
///
/// const SR: Address = unsafe { Address::new(0x4001_3800, Width::U32) };
/// const RXNE: reg::Field<bool> = reg::ro_bit(SR, 5);
/// const TXE: reg::Field<bool> = reg::ro_bit(SR, 7);
///
/// let mut bus = Recorder::new().with_value(0x4001_3800, 0x80);
/// let reads = reg::apply_on(&mut bus, &reg::items![reg::read(RXNE), reg::read(TXE)]).unwrap();
/// assert_eq!(bus.loads(), 1);
/// assert_eq!(reads.get(RXNE), Some(false));
/// assert_eq!(reads.get(TXE), Some(true));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reads {
    // Sorted by address.
    slots: Vec<(usize, u64)>,
    fields: Vec<FieldLocation>,
}

impl Reads {
    pub(crate) fn new(fields: Vec<FieldLocation>) -> Self {
        let mut slots = fields.iter().map(|field| (field.address().addr(), 0)).collect::<Vec<_>>();
        slots.sort_unstable_by_key(|&(address, _)| address);
        slots.dedup_by_key(|&mut (address, _)| address);
        Self { slots, fields }
    }

    /// Stores the bits of `raw` selected by `mask` into the slot of
    /// `address`. A later read of the same bits replaces the earlier one.
    pub(crate) fn record(&mut self, address: usize, mask: u64, raw: u64) {
        if let Ok(index) = self.slots.binary_search_by_key(&address, |&(address, _)| address) {
            let slot = &mut self.slots[index].1;
            *slot = (*slot & !mask) | (raw & mask);
        }
    }

    /// Returns the number of requested fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field was read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the requested field locations in request order.
    #[inline]
    pub fn fields(&self) -> &[FieldLocation] {
        &self.fields
    }

    /// Returns the raw value collected for the register at `address`.
    pub fn raw(&self, address: usize) -> Option<u64> {
        self.slots
            .binary_search_by_key(&address, |&(address, _)| address)
            .ok()
            .map(|index| self.slots[index].1)
    }

    /// Returns the bits of `location`, shifted down to bit 0.
    ///
    /// Returns `None` if the location wasn't requested.
    pub fn decode(&self, location: &FieldLocation) -> Option<u64> {
        if !self.fields.contains(location) {
            return None;
        }
        let raw = self.raw(location.address().addr())?;
        Some((raw & location.mask()) >> location.shift())
    }

    /// Returns the decoded value of `field`, or `None` if it wasn't requested.
    pub fn get<T: FieldType>(&self, field: Field<T>) -> Option<T> {
        self.decode(field.location()).map(T::from_bits)
    }

    /// Returns the decoded value of the `index`-th requested field.
    pub fn get_at<T: FieldType>(&self, index: usize) -> Option<T> {
        self.fields.get(index).and_then(|location| self.decode(location)).map(T::from_bits)
    }

    /// Converts the result into the value of the only requested field.
    ///
    /// Returns `None` unless exactly one field was read.
    pub fn into_value<T: FieldType>(self) -> Option<T> {
        match self.fields.as_slice() {
            [location] => self.decode(location).map(T::from_bits),
            _ => None,
        }
    }

    /// Returns `true` if the field of `value` was read and holds its bits.
    pub fn matches<T: FieldType>(&self, value: &FieldValue<T>) -> bool {
        self.decode(value.field().location()) == Some(value.bits())
    }
}
