//! Logging support.
//!
//! Log output is multiplexed over numbered ports of the debug probe. Writes to
//! a port nobody listens to are dropped, so callers check
//! [`Port::is_enabled`] first. Register transactions are traced to
//! [`REGTRACE_PORT`].

mod port;

pub use self::port::Port;

#[cfg(not(any(feature = "host", not(target_os = "none"))))]
extern "C" {
    fn drone_log_is_enabled(port: u8) -> bool;
    fn drone_log_write_bytes(port: u8, exclusive: bool, buffer: *const u8, count: usize);
}

/// Number of available log ports.
pub const PORTS_COUNT: u8 = 32;

/// Port number of the register transaction trace stream.
pub const REGTRACE_PORT: u8 = 30;
