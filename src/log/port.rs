#[cfg(not(any(feature = "host", not(target_os = "none"))))]
use super::{drone_log_is_enabled, drone_log_write_bytes};
use super::PORTS_COUNT;

/// Logger port handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Port(u8);

impl Port {
    /// Creates a new port handle.
    ///
    /// # Panics
    ///
    /// If `port` is more than or equal to [`PORTS_COUNT`].
    #[inline]
    pub const fn new(port: u8) -> Self {
        assert!(port < PORTS_COUNT);
        Self(port)
    }

    /// Returns the port number.
    #[inline]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns `true` if the debug probe is connected and listening to the
    /// `port` stream.
    ///
    /// Always `false` on hosted targets.
    #[inline]
    pub fn is_enabled(self) -> bool {
        #[cfg(any(feature = "host", not(target_os = "none")))]
        return false;
        #[cfg(not(any(feature = "host", not(target_os = "none"))))]
        unsafe {
            drone_log_is_enabled(self.0)
        }
    }

    /// Writes an atomic byte sequence to the port.
    ///
    /// The bytes are never interleaved with concurrent writes to the same
    /// port, so a reader sees each record whole.
    #[cfg_attr(
        any(feature = "host", not(target_os = "none")),
        allow(unused_variables, clippy::unused_self)
    )]
    #[inline]
    pub fn write_transaction(self, bytes: &[u8]) -> Self {
        #[cfg(not(any(feature = "host", not(target_os = "none"))))]
        unsafe {
            drone_log_write_bytes(self.0, true, bytes.as_ptr(), bytes.len());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::REGTRACE_PORT;

    #[test]
    fn hosted_ports_are_silent() {
        let port = Port::new(REGTRACE_PORT);
        assert_eq!(port.number(), 30);
        assert!(!port.is_enabled());
        assert_eq!(port.write_transaction(&[1, 2, 3]), port);
    }

    #[test]
    #[should_panic]
    fn port_out_of_range() {
        let _ = Port::new(PORTS_COUNT);
    }
}
