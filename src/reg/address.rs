use super::Error;

/// Bit-width of a memory-mapped register.
///
/// Every bus access to a register uses exactly this width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    /// 8-bit register.
    U8,
    /// 16-bit register.
    U16,
    /// 32-bit register.
    U32,
    /// 64-bit register.
    U64,
}

impl Width {
    /// Returns the width from the register bit size.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            16 => Some(Self::U16),
            32 => Some(Self::U32),
            64 => Some(Self::U64),
            _ => None,
        }
    }

    /// Returns the register bit size.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
            Self::U64 => 64,
        }
    }

    /// Returns a mask with every bit of the register set.
    #[inline]
    pub const fn all_bits(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }
}

/// Memory-mapped register address together with its write semantics.
///
/// `write_ignored_if_zero` marks bits which are always written as zero,
/// regardless of the requested value: writing zero to them has no effect on
/// hardware (e.g. write-one-to-clear flags of other fields).
/// `write_ignored_if_one` marks bits which are always written as one for the
/// same reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    addr: usize,
    width: Width,
    write_ignored_if_zero: u64,
    write_ignored_if_one: u64,
}

impl Address {
    /// Creates a new register address without fixed bits.
    ///
    /// # Safety
    ///
    /// `addr` must be a valid memory-mapped register of `width` bits for the
    /// whole lifetime of the program. Operations on this address are executed
    /// with volatile accesses by [`apply`](super::apply).
    #[inline]
    pub const unsafe fn new(addr: usize, width: Width) -> Self {
        Self { addr, width, write_ignored_if_zero: 0, write_ignored_if_one: 0 }
    }

    /// Returns a copy of the address with the given write-ignored-if-zero
    /// mask.
    #[must_use]
    #[inline]
    pub const fn with_write_ignored_if_zero(mut self, mask: u64) -> Self {
        self.write_ignored_if_zero = mask;
        self
    }

    /// Returns a copy of the address with the given write-ignored-if-one mask.
    #[must_use]
    #[inline]
    pub const fn with_write_ignored_if_one(mut self, mask: u64) -> Self {
        self.write_ignored_if_one = mask;
        self
    }

    /// Returns the raw memory address.
    #[inline]
    pub const fn addr(&self) -> usize {
        self.addr
    }

    /// Returns the register width.
    #[inline]
    pub const fn width(&self) -> Width {
        self.width
    }

    /// Bits that are written as zero on every write.
    #[inline]
    pub const fn write_ignored_if_zero(&self) -> u64 {
        self.write_ignored_if_zero
    }

    /// Bits that are written as one on every write.
    #[inline]
    pub const fn write_ignored_if_one(&self) -> u64 {
        self.write_ignored_if_one
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let all = self.width.all_bits();
        if (self.write_ignored_if_zero | self.write_ignored_if_one) & !all != 0
            || self.write_ignored_if_zero & self.write_ignored_if_one != 0
        {
            return Err(Error::BadAddressMasks { address: self.addr });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_bits() {
        assert_eq!(Width::U8.all_bits(), 0xFF);
        assert_eq!(Width::U16.all_bits(), 0xFFFF);
        assert_eq!(Width::U32.all_bits(), 0xFFFF_FFFF);
        assert_eq!(Width::U64.all_bits(), u64::MAX);
        assert_eq!(Width::from_bits(32), Some(Width::U32));
        assert_eq!(Width::from_bits(24), None);
    }

    #[test]
    fn masks_validation() {
        let address = unsafe { Address::new(0x1000, Width::U8) };
        assert!(address.with_write_ignored_if_zero(0x0F).validate().is_ok());
        assert_eq!(
            address.with_write_ignored_if_zero(0x100).validate(),
            Err(Error::BadAddressMasks { address: 0x1000 })
        );
        assert_eq!(
            address.with_write_ignored_if_zero(0x03).with_write_ignored_if_one(0x06).validate(),
            Err(Error::BadAddressMasks { address: 0x1000 })
        );
    }
}
