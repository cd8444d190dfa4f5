#[cfg(not(any(feature = "host", not(target_os = "none"))))]
use super::{drone_restore_interrupts, drone_save_and_disable_interrupts};
#[cfg(any(feature = "host", not(target_os = "none")))]
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(any(feature = "host", not(target_os = "none")))]
static ENABLED: AtomicBool = AtomicBool::new(true);

#[cfg(any(feature = "host", not(target_os = "none")))]
static DISABLED_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Critical section.
///
/// A critical section is a block of code surrounded by interrupts disable and
/// interrupts re-enable instructions. This type disables interrupts on creation
/// and restores the previous state on drop. Critical sections are allowed to be
/// nested: an inner section never re-enables interrupts disabled by an outer
/// one.
///
/// [`reg::atomic`](crate::reg::atomic) runs a whole register transaction set
/// inside a critical section, so that no interrupt handler observes a
/// half-applied configuration.
///
/// # Priority inversion hazard
///
/// On devices which execute code from an external flash via XIP (eXecute In
/// Place), a XIP cache miss inside a critical section blocks every higher
/// priority thread until the cache line is loaded.
///
/// To mitigate this issue, there is a cargo feature called `xip`. When enabled,
/// [`Interrupts::paused`] is marked `#[inline(never)]` and `#[link_section =
/// ".time_critical"]`. All code in `.time_critical` link section is first
/// copied into RAM at application startup. Care must be taken to not access
/// anything from XIP memory region inside the critical section.
///
/// If using [`Interrupts::pause`], actions from the above paragraph should be
/// taken manually.
///
/// # Hosted targets
///
/// On hosted targets, or with the `host` feature, the interrupt state is a
/// process-wide flag, which can be inspected with [`Interrupts::enabled`] and
/// [`Interrupts::disabled_count`].
pub struct Interrupts {
    save: u32,
}

impl Interrupts {
    /// Creates a new critical section handle.
    ///
    /// This function disables all interrupts for the current CPU. The previous
    /// state is restored when this instance is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_regops::platform::Interrupts;
    ///
    /// let mut x = 0;
    /// {
    ///     let _critical = Interrupts::pause();
    ///     x += 1;
    /// }
    /// assert_eq!(x, 1);
    /// ```
    #[inline]
    pub fn pause() -> Self {
        #[cfg(any(feature = "host", not(target_os = "none")))]
        let save = {
            let enabled = ENABLED.swap(false, Ordering::SeqCst);
            if enabled {
                DISABLED_COUNT.fetch_add(1, Ordering::SeqCst);
            }
            u32::from(enabled)
        };
        #[cfg(not(any(feature = "host", not(target_os = "none"))))]
        let save = unsafe { drone_save_and_disable_interrupts() };
        Self { save }
    }

    /// Runs a closure inside a critical section.
    ///
    /// All interrupts for the current CPU are disabled before executing the
    /// closure and restored to the previous state after the closure has
    /// executed, including when it panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_regops::platform::Interrupts;
    ///
    /// let mut x = 0;
    /// Interrupts::paused(|| {
    ///     x += 1;
    /// });
    /// assert_eq!(x, 1);
    /// ```
    #[cfg_attr(not(feature = "xip"), inline)]
    #[cfg_attr(feature = "xip", inline(never))]
    #[cfg_attr(feature = "xip", link_section = ".time_critical")]
    pub fn paused<R, F: FnOnce() -> R>(f: F) -> R {
        let _paused = Self::pause();
        f()
    }

    /// Returns `true` if interrupts are currently enabled.
    ///
    /// Only available on hosted targets, where the state is emulated.
    #[cfg(any(feature = "host", not(target_os = "none")))]
    #[inline]
    pub fn enabled() -> bool {
        ENABLED.load(Ordering::SeqCst)
    }

    /// Returns how many times interrupts went from enabled to disabled.
    ///
    /// Nested sections don't count. Only available on hosted targets.
    #[cfg(any(feature = "host", not(target_os = "none")))]
    #[inline]
    pub fn disabled_count() -> usize {
        DISABLED_COUNT.load(Ordering::SeqCst)
    }
}

impl Drop for Interrupts {
    #[inline]
    fn drop(&mut self) {
        let Self { save } = *self;
        #[cfg(any(feature = "host", not(target_os = "none")))]
        ENABLED.store(save != 0, Ordering::SeqCst);
        #[cfg(not(any(feature = "host", not(target_os = "none"))))]
        unsafe {
            drone_restore_interrupts(save);
        }
    }
}
