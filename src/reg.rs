//! Register operations.
//!
//! # Declaring registers
//!
//! Registers and their fields are plain constants. They can be written by
//! hand, or generated with the [`map!`] macro:
//!
//! ```
//! use drone_regops::reg;
//!
//! reg::map! {
//!     /// General-purpose I/O port A.
//!     pub mod GPIOA;
//!
//!     /// Port configuration register low.
//!     CRL {
//!         0x4001_0800 0x20; // memory address and bit size
//!         /// Port 0 mode.
//!         MODE0 { 0 2 ReadWrite } // offset, width, and access
//!         /// Port 0 configuration.
//!         CNF0 { 2 2 ReadWrite as u8 } // decoded value type
//!     }
//!
//!     /// Port input data register.
//!     IDR {
//!         0x4001_0808 0x20;
//!         IDR0 { 0 1 ReadOnly }
//!     }
//! }
//!
//! assert_eq!(gpioa::crl::ADDRESS.addr(), 0x4001_0800);
//! assert_eq!(gpioa::crl::CNF0.location().mask(), 0b1100);
//! ```
//!
//! # Applying operations
//!
//! Operations are built with factory functions, such as [`read`], [`write`],
//! [`set`], [`clear`], or [`toggle`], and passed together to [`apply`]. All
//! operations before a [`SEQUENCE_POINT`] finish before the operations after
//! it start. Operations between sequence points which target the same register
//! are merged into a single read-modify-write:
//!
//! ```
//! use drone_regops::reg::{self, Recorder, Transaction};
//! # drone_regops::reg::map! {
//! #     pub mod GPIOA;
//! #     CRL {
//! #         0x4001_0800 0x20;
//! #         MODE0 { 0 2 ReadWrite }
//! #         CNF0 { 2 2 ReadWrite as u8 }
//! #     }
//! # }
//!
//! let mut bus = Recorder::new().with_value(0x4001_0800, 0x4444_4444);
//! drone_regops::apply!(in &mut bus;
//!     reg::write(gpioa::crl::MODE0, 0b11),
//!     reg::write_literal(gpioa::crl::CNF0, 0b00),
//! )
//! .unwrap();
//! assert_eq!(bus.transactions(), [
//!     Transaction::Load { address: 0x4001_0800, value: 0x4444_4444 },
//!     Transaction::Store { address: 0x4001_0800, value: 0x4444_4443 },
//! ]);
//! ```

mod access;
mod action;
mod address;
mod apply;
mod defaults;
mod error;
mod exec;
mod field;
mod merge;
mod normalize;
mod reads;
mod recorder;
mod trace;

pub use self::{
    access::{Access, AccessKind, ModifiedWrite, ReadAction},
    action::{
        clear, read, reset, set, toggle, write, write_literal, write_value, xor, xor_literal,
        Action, ActionKind, Item, SequencePoint, SEQUENCE_POINT,
    },
    address::{Address, Width},
    apply::{
        apply, apply_on, atomic, atomic_on, field_equals, field_equals_on, isolated, isolated_on,
    },
    defaults::Defaults,
    error::Error,
    exec::{Bus, Mmio},
    field::{
        mask_from_range, ro_bit, ro_field, rw_bit, rw_field, wo_bit, wo_field, Field,
        FieldLocation, FieldType, FieldValue,
    },
    reads::Reads,
    recorder::{Recorder, Transaction},
};
pub use crate::{apply, atomic, isolated, items};
pub use drone_regops_macros::reg_map as map;

pub(crate) use self::action::Op;

mod compile_tests {
    //! ```compile_fail
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     WIDE { 0x4000_0000 0x20; FIELD { 30 4 ReadWrite } }
    //! }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     ODD { 0x4000_0000 0x18; FIELD { 0 4 ReadWrite } }
    //! }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     EMPTY { 0x4000_0000 0x20; FIELD { 0 0 ReadWrite } }
    //! }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     MASKS { 0x4000_0000 0x08 0x0F 0x01; FIELD { 4 4 ReadWrite } }
    //! }
    //! fn main() {}
    //! ```
    //!
    //! ```compile_fail
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     ACCESS { 0x4000_0000 0x20; FIELD { 0 1 ReadSometimes } }
    //! }
    //! fn main() {}
    //! ```
    //!
    //! ```
    //! drone_regops::reg::map! {
    //!     pub mod TST;
    //!     GOOD { 0x4000_0000 0x08 0xF0 0x00; FIELD { 0 4 ReadWrite OneToClear ReadClear } }
    //! }
    //! fn main() {
    //!     assert_eq!(tst::good::FIELD.location().mask(), 0x0F);
    //!     assert_eq!(tst::good::ADDRESS.write_ignored_if_zero(), 0xF0);
    //! }
    //! ```
}
