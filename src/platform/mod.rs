//! Platform hooks.

mod interrupts;

pub use self::interrupts::Interrupts;

#[cfg(not(any(feature = "host", not(target_os = "none"))))]
extern "C" {
    fn drone_save_and_disable_interrupts() -> u32;
    fn drone_restore_interrupts(status: u32);
}
