// Single-core targets only need the compiler not to reorder accesses around
// the index, so a relaxed access plus a signal fence is enough there.

macro_rules! load_atomic {
    ($atomic:expr, $ordering:ident) => {{
        #[cfg(not(any(feature = "atomics", loom)))]
        {
            let value = $atomic.load(core::sync::atomic::Ordering::Relaxed);
            core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::$ordering);
            value
        }
        #[cfg(any(feature = "atomics", loom))]
        {
            $atomic.load(core::sync::atomic::Ordering::$ordering)
        }
    }};
}

macro_rules! store_atomic {
    ($atomic:expr, $value:expr, $ordering:ident) => {{
        #[cfg(not(any(feature = "atomics", loom)))]
        {
            core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::$ordering);
            $atomic.store($value, core::sync::atomic::Ordering::Relaxed)
        }
        #[cfg(any(feature = "atomics", loom))]
        {
            $atomic.store($value, core::sync::atomic::Ordering::$ordering)
        }
    }};
}

macro_rules! maybe_const_fn {
    ($(#[$($attr:tt)*])* $vis:vis const fn $name:ident($($args:tt)*) -> $ret:ty { $($body:tt)* }) => {
        #[cfg(not(loom))]
        $(#[$($attr)*])* $vis const fn $name($($args)*) -> $ret { $($body)* }
        #[cfg(loom)]
        $(#[$($attr)*])* $vis fn $name($($args)*) -> $ret { $($body)* }
    };
}
