//! Register operation scheduler for Drone, an Embedded Operating System.
//!
//! This crate turns declarative lists of register field operations into the
//! minimal sequence of memory-mapped bus transactions. A caller describes what
//! should happen to the fields (read this one, write that value, toggle a
//! flag), and [`reg::apply`] validates the list, merges operations that land
//! on the same register, executes them in address order, and decodes the
//! requested reads.
//!
//! ```
//! use drone_regops::reg::{self, Recorder};
//!
//! drone_regops::reg::map! {
//!     /// Test block.
//!     pub mod TIM;
//!
//!     /// Control register.
//!     CR {
//!         0x4000_0000 0x20;
//!         /// Counter enable.
//!         CEN { 0 1 ReadWrite }
//!         /// Clock division.
//!         CKD { 8 2 ReadWrite }
//!     }
//! }
//!
//! let mut bus = Recorder::new();
//! reg::apply_on(&mut bus, &reg::items![reg::set(tim::cr::CEN), reg::write(tim::cr::CKD, 2)])
//!     .unwrap();
//! assert_eq!(bus.value(0x4000_0000), 0x0201);
//! ```
//!
//! # Platform hooks
//!
//! On bare-metal targets the platform crate provides the following symbols:
//! `drone_save_and_disable_interrupts`, `drone_restore_interrupts`,
//! `drone_log_is_enabled`, `drone_log_write_bytes`. On hosted targets, or
//! with the `host` cargo feature, they are emulated.
//!
//! # Cargo features
//!
//! * `host` - emulate platform hooks even on bare-metal targets.
//! * `atomics` - use acquire/release atomics in [`sync::Queue`] for multi-core
//!   targets.
//! * `xip` - place critical sections into `.time_critical` RAM code.

#![warn(missing_docs, unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]
#![no_std]

extern crate alloc;

#[macro_use]
mod atomic_macros;

pub mod log;
pub mod platform;
pub mod reg;
pub mod sync;
