/// Access permissions of a register field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// The field can only be read.
    ReadOnly,
    /// The field can only be written.
    WriteOnly,
    /// The field can be read and written.
    ReadWrite,
    /// The field can be written once after reset and can't be read.
    WriteOnce,
    /// The field can be read and written once after reset.
    ReadWriteOnce,
}

/// Side effect of writing to a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifiedWrite {
    /// The written value is stored as is.
    Normal,
    /// Writing one clears the bit, writing zero has no effect.
    OneToClear,
    /// Writing one sets the bit, writing zero has no effect.
    OneToSet,
    /// Writing one toggles the bit, writing zero has no effect.
    OneToToggle,
    /// Writing zero clears the bit, writing one has no effect.
    ZeroToClear,
    /// Writing zero sets the bit, writing one has no effect.
    ZeroToSet,
    /// Writing zero toggles the bit, writing one has no effect.
    ZeroToToggle,
    /// Any write clears the field.
    Clear,
    /// Any write sets the field.
    Set,
    /// Any write modifies the field in an undefined way.
    Modify,
}

/// Side effect of reading a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadAction {
    /// Reading has no side effects.
    Normal,
    /// The field is cleared after a read.
    Clear,
    /// The field is set after a read.
    Set,
    /// The field is modified in some way after a read.
    Modify,
    /// A read has side effects in other fields or registers.
    ModifyExternal,
}

/// Complete access rules of a register field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Access {
    /// Access permissions.
    pub kind: AccessKind,
    /// Side effect of reading.
    pub read: ReadAction,
    /// Side effect of writing.
    pub write: ModifiedWrite,
}

impl Access {
    /// Plain readable and writable field.
    pub const READ_WRITE: Self = Self::new(AccessKind::ReadWrite);

    /// Plain read-only field.
    pub const READ_ONLY: Self = Self::new(AccessKind::ReadOnly);

    /// Plain write-only field.
    pub const WRITE_ONLY: Self = Self::new(AccessKind::WriteOnly);

    /// Readable flag which is cleared by writing one.
    pub const ONE_TO_CLEAR: Self = Self::new(AccessKind::ReadWrite).write(ModifiedWrite::OneToClear);

    /// Readable field whose bits are toggled by writing ones.
    pub const ONE_TO_TOGGLE: Self =
        Self::new(AccessKind::ReadWrite).write(ModifiedWrite::OneToToggle);

    /// Creates access rules without side effects.
    #[inline]
    pub const fn new(kind: AccessKind) -> Self {
        Self { kind, read: ReadAction::Normal, write: ModifiedWrite::Normal }
    }

    /// Returns a copy with the given read side effect.
    #[must_use]
    #[inline]
    pub const fn read(mut self, read: ReadAction) -> Self {
        self.read = read;
        self
    }

    /// Returns a copy with the given write side effect.
    #[must_use]
    #[inline]
    pub const fn write(mut self, write: ModifiedWrite) -> Self {
        self.write = write;
        self
    }

    /// Returns `true` if the field can be read.
    #[inline]
    pub const fn is_readable(&self) -> bool {
        matches!(self.kind, AccessKind::ReadOnly | AccessKind::ReadWrite | AccessKind::ReadWriteOnce)
    }

    /// Returns `true` if the field can be written.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        !matches!(self.kind, AccessKind::ReadOnly)
    }

    /// Returns `true` if writing one to the field clears it.
    #[inline]
    pub const fn is_set_to_clear(&self) -> bool {
        matches!(self.write, ModifiedWrite::OneToClear)
    }

    /// Returns `true` if writing one to a bit of the field toggles it.
    #[inline]
    pub const fn is_toggle_on_write(&self) -> bool {
        matches!(self.write, ModifiedWrite::OneToToggle)
    }
}
