use super::{Access, Address, Error};
use core::{fmt, marker::PhantomData};

/// Addressed, masked bit-range of a register with its access rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    address: Address,
    mask: u64,
    access: Access,
}

/// Decoded value type of a register field.
///
/// Implement this trait for enums to read and write fields as enums.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::FieldType;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Mode {
///     Input,
///     Output,
///     Alternate,
///     Analog,
/// }
///
/// impl FieldType for Mode {
///     fn from_bits(bits: u64) -> Self {
///         match bits {
///             0 => Self::Input,
///             1 => Self::Output,
///             2 => Self::Alternate,
///             _ => Self::Analog,
///         }
///     }
///
///     fn into_bits(self) -> u64 {
///         self as u64
///     }
/// }
///
/// assert_eq!(Mode::from_bits(2), Mode::Alternate);
/// ```
pub trait FieldType: Sized {
    /// Converts raw field bits, already shifted to bit 0, into the value.
    fn from_bits(bits: u64) -> Self;

    /// Converts the value into raw field bits, starting at bit 0.
    fn into_bits(self) -> u64;
}

/// Register field with a decoded value type.
///
/// This is the typed handle used by operation factories, such as
/// [`read`](super::read) and [`write`](super::write), and by
/// [`Reads::get`](super::Reads::get).
pub struct Field<T: FieldType = u64> {
    location: FieldLocation,
    _ty: PhantomData<fn() -> T>,
}

/// Register field paired with a constant value.
pub struct FieldValue<T: FieldType = u64> {
    field: Field<T>,
    bits: u64,
}

impl FieldLocation {
    /// Creates a new field location.
    #[inline]
    pub const fn new(address: Address, mask: u64, access: Access) -> Self {
        Self { address, mask, access }
    }

    /// Returns the register address.
    #[inline]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    /// Returns the field mask.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.mask
    }

    /// Returns the access rules.
    #[inline]
    pub const fn access(&self) -> &Access {
        &self.access
    }

    /// Returns the offset of the lowest field bit.
    #[inline]
    pub const fn shift(&self) -> u32 {
        self.mask.trailing_zeros()
    }

    /// Returns `true` if the field is a single bit.
    #[inline]
    pub const fn is_bit(&self) -> bool {
        self.mask.is_power_of_two()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.address.validate()?;
        let address = self.address.addr();
        if self.mask == 0 {
            return Err(Error::EmptyMask { address });
        }
        if self.mask & !self.address.width().all_bits() != 0 {
            return Err(Error::MaskOutOfRange { address, mask: self.mask });
        }
        Ok(())
    }
}

impl<T: FieldType> Field<T> {
    /// Creates a new typed field.
    #[inline]
    pub const fn new(location: FieldLocation) -> Self {
        Self { location, _ty: PhantomData }
    }

    /// Returns the field location.
    #[inline]
    pub const fn location(&self) -> &FieldLocation {
        &self.location
    }

    /// Pairs the field with raw `bits`, relative to the field offset.
    #[inline]
    pub const fn value(self, bits: u64) -> FieldValue<T> {
        FieldValue { field: self, bits }
    }
}

impl<T: FieldType> Clone for Field<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FieldType> Copy for Field<T> {}

impl<T: FieldType> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl<T: FieldType> Eq for Field<T> {}

impl<T: FieldType> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.location).finish()
    }
}

impl<T: FieldType> FieldValue<T> {
    /// Returns the field.
    #[inline]
    pub const fn field(&self) -> Field<T> {
        self.field
    }

    /// Returns the raw bits, relative to the field offset.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Returns the decoded value.
    #[inline]
    pub fn value(&self) -> T {
        T::from_bits(self.bits)
    }
}

impl<T: FieldType> Clone for FieldValue<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FieldType> Copy for FieldValue<T> {}

impl<T: FieldType> fmt::Debug for FieldValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("location", &self.field.location)
            .field("bits", &self.bits)
            .finish()
    }
}

impl FieldType for bool {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits != 0
    }

    #[inline]
    fn into_bits(self) -> u64 {
        u64::from(self)
    }
}

macro_rules! field_type {
    ($type:ty) => {
        impl FieldType for $type {
            #[allow(clippy::cast_possible_truncation)]
            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $type
            }

            #[inline]
            fn into_bits(self) -> u64 {
                self as u64
            }
        }
    };
}

field_type!(u8);
field_type!(u16);
field_type!(u32);
field_type!(u64);
field_type!(usize);

/// Returns a mask with bits from `low` to `high` inclusive set.
///
/// # Panics
///
/// If `high` is less than `low` or not less than 64.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::mask_from_range;
///
/// assert_eq!(mask_from_range(7, 4), 0xF0);
/// assert_eq!(mask_from_range(0, 0), 0x01);
/// ```
pub const fn mask_from_range(high: u32, low: u32) -> u64 {
    assert!(low <= high && high < 64, "invalid bit range");
    (u64::MAX >> (63 - high)) & (u64::MAX << low)
}

/// Readable and writable single-bit field at `bit`.
pub const fn rw_bit(address: Address, bit: u32) -> Field<bool> {
    Field::new(FieldLocation::new(address, mask_from_range(bit, bit), Access::READ_WRITE))
}

/// Read-only single-bit field at `bit`.
pub const fn ro_bit(address: Address, bit: u32) -> Field<bool> {
    Field::new(FieldLocation::new(address, mask_from_range(bit, bit), Access::READ_ONLY))
}

/// Write-only single-bit field at `bit`.
pub const fn wo_bit(address: Address, bit: u32) -> Field<bool> {
    Field::new(FieldLocation::new(address, mask_from_range(bit, bit), Access::WRITE_ONLY))
}

/// Readable and writable field spanning bits `low..=high`.
pub const fn rw_field<T: FieldType>(address: Address, high: u32, low: u32) -> Field<T> {
    Field::new(FieldLocation::new(address, mask_from_range(high, low), Access::READ_WRITE))
}

/// Read-only field spanning bits `low..=high`.
pub const fn ro_field<T: FieldType>(address: Address, high: u32, low: u32) -> Field<T> {
    Field::new(FieldLocation::new(address, mask_from_range(high, low), Access::READ_ONLY))
}

/// Write-only field spanning bits `low..=high`.
pub const fn wo_field<T: FieldType>(address: Address, high: u32, low: u32) -> Field<T> {
    Field::new(FieldLocation::new(address, mask_from_range(high, low), Access::WRITE_ONLY))
}
