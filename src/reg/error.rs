use core::fmt;

/// Error returned when a set of register operations is rejected.
///
/// Every error is detected before the first bus transaction, so a rejected
/// call never leaves hardware in a half-applied state. The `address` field of
/// each variant is the raw address of the offending register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Field mask is zero.
    EmptyMask {
        /// Register address.
        address: usize,
    },
    /// Field mask has bits outside of the register width.
    MaskOutOfRange {
        /// Register address.
        address: usize,
        /// Offending mask.
        mask: u64,
    },
    /// Literal value doesn't fit into the field.
    LiteralOutOfRange {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
        /// Offending value, relative to the field offset.
        value: u64,
    },
    /// Set, clear, toggle, or reset on a multi-bit field.
    NotSingleBit {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Reset on a field which isn't cleared by writing one.
    NotSetToClear {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Toggle or XOR on a field which isn't toggled by writing one.
    NotToggleOnWrite {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Read from a write-only field.
    NotReadable {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Write to a read-only field.
    NotWritable {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Write-ignored masks exceed the register width or intersect.
    BadAddressMasks {
        /// Register address.
        address: usize,
    },
    /// The same register address is described with different widths or
    /// write-ignored masks.
    AddressMismatch {
        /// Register address.
        address: usize,
    },
    /// Reads, writes, and XORs are mixed on one register without a sequence
    /// point between them.
    Conflict {
        /// Register address.
        address: usize,
    },
    /// Operations on one register overlap and can't be merged.
    Overlap {
        /// Register address.
        address: usize,
        /// Overlapping bits.
        mask: u64,
    },
    /// Override doesn't correspond to any default.
    NotInDefaults {
        /// Register address.
        address: usize,
        /// Field mask.
        mask: u64,
    },
    /// Sequence point inside a list which can't have one.
    UnexpectedSequencePoint,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EmptyMask { address } => write!(f, "empty field mask at {address:#010X}"),
            Self::MaskOutOfRange { address, mask } => {
                write!(f, "field mask {mask:#X} exceeds the register width at {address:#010X}")
            }
            Self::LiteralOutOfRange { address, mask, value } => {
                write!(f, "value {value:#X} doesn't fit field {mask:#X} at {address:#010X}")
            }
            Self::NotSingleBit { address, mask } => {
                write!(f, "field {mask:#X} at {address:#010X} is not a single bit")
            }
            Self::NotSetToClear { address, mask } => {
                write!(f, "field {mask:#X} at {address:#010X} is not cleared by writing one")
            }
            Self::NotToggleOnWrite { address, mask } => {
                write!(f, "field {mask:#X} at {address:#010X} is not toggled by writing one")
            }
            Self::NotReadable { address, mask } => {
                write!(f, "field {mask:#X} at {address:#010X} is not readable")
            }
            Self::NotWritable { address, mask } => {
                write!(f, "field {mask:#X} at {address:#010X} is not writable")
            }
            Self::BadAddressMasks { address } => {
                write!(f, "invalid write-ignored masks at {address:#010X}")
            }
            Self::AddressMismatch { address } => {
                write!(f, "register at {address:#010X} is described inconsistently")
            }
            Self::Conflict { address } => write!(
                f,
                "mixed operations on register {address:#010X} need a sequence point between them"
            ),
            Self::Overlap { address, mask } => {
                write!(f, "operations overlap on bits {mask:#X} at {address:#010X}")
            }
            Self::NotInDefaults { address, mask } => {
                write!(f, "override of field {mask:#X} at {address:#010X} has no default")
            }
            Self::UnexpectedSequencePoint => f.write_str("unexpected sequence point"),
        }
    }
}

impl core::error::Error for Error {}
