//! A single-producer, single-consumer ring queue.
//!
//! The queue moves `Copy` values from an interrupt handler to the main line
//! code (or the other way around) without locking. Exactly one context may
//! push and exactly one context may pop; any other usage is undefined.
//!
//! On single-core targets the indices are accessed with relaxed atomics
//! separated from the payload by a compiler fence. With the `atomics` feature
//! the indices use acquire/release orderings instead.
//!
//! # Examples
//!
//! ```
//! use drone_regops::sync::Queue;
//!
//! static RX: Queue<u8, 8> = Queue::new();
//!
//! RX.push(b'a');
//! RX.push_slice(b"bc");
//! assert_eq!(RX.len(), 3);
//! assert_eq!(RX.pop(), Some(b'a'));
//! let mut rest = [0; 2];
//! assert!(RX.pop_into(&mut rest));
//! assert_eq!(&rest, b"bc");
//! assert!(RX.is_empty());
//! ```

use core::{cell::UnsafeCell, marker::PhantomData, mem::MaybeUninit};

#[cfg(not(loom))]
use core::sync::atomic::{AtomicUsize, Ordering};
#[cfg(loom)]
use loom::sync::atomic::{AtomicUsize, Ordering};

/// Reaction to a push into a full queue.
pub trait OverflowPolicy {
    /// Called instead of storing the values that don't fit.
    fn overflow();
}

/// Panics on overflow.
pub struct Panic;

/// Silently drops the values that don't fit.
pub struct Ignore;

impl OverflowPolicy for Panic {
    #[inline]
    fn overflow() {
        panic!("queue overflow");
    }
}

impl OverflowPolicy for Ignore {
    #[inline]
    fn overflow() {}
}

/// A fixed-capacity single-producer, single-consumer queue.
///
/// One slot is always kept free to tell a full queue from an empty one, so the
/// queue holds at most `N - 1` values.
pub struct Queue<T: Copy, const N: usize, P: OverflowPolicy = Panic> {
    // Written by the consumer only.
    head: AtomicUsize,
    // Written by the producer only.
    tail: AtomicUsize,
    buffer: UnsafeCell<[MaybeUninit<T>; N]>,
    _policy: PhantomData<P>,
}

unsafe impl<T: Copy + Send, const N: usize, P: OverflowPolicy> Sync for Queue<T, N, P> {}

impl<T: Copy, const N: usize, P: OverflowPolicy> Queue<T, N, P> {
    const MIN_SIZE: () = assert!(N > 1, "queue size must be at least 2");

    maybe_const_fn! {
        /// Creates a new empty queue.
        #[allow(clippy::let_unit_value)]
        #[inline]
        pub const fn new() -> Self {
            let () = Self::MIN_SIZE;
            Self {
                head: AtomicUsize::new(0),
                tail: AtomicUsize::new(0),
                buffer: UnsafeCell::new([MaybeUninit::uninit(); N]),
                _policy: PhantomData,
            }
        }
    }

    /// Returns the maximum number of values the queue can hold.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Returns the number of values in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = load_atomic!(self.tail, Acquire);
        let head = load_atomic!(self.head, Acquire);
        (tail + N - head) % N
    }

    /// Returns `true` if the queue contains no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a value to the back of the queue.
    ///
    /// Must be called from the producer context only. If the queue is full,
    /// the overflow policy `P` decides what happens.
    pub fn push(&self, value: T) {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) % N;
        if next == load_atomic!(self.head, Acquire) {
            P::overflow();
            return;
        }
        unsafe { self.slot(tail).write(MaybeUninit::new(value)) };
        store_atomic!(self.tail, next, Release);
    }

    /// Appends all `values` to the back of the queue at once.
    ///
    /// Either all values are published or, if they don't fit, none of them
    /// and the overflow policy `P` is invoked. Must be called from the producer
    /// context only.
    pub fn push_slice(&self, values: &[T]) {
        let mut tail = self.tail.load(Ordering::Relaxed);
        let head = load_atomic!(self.head, Acquire);
        let free = N - 1 - (tail + N - head) % N;
        if values.len() > free {
            P::overflow();
            return;
        }
        for value in values {
            unsafe { self.slot(tail).write(MaybeUninit::new(*value)) };
            tail = (tail + 1) % N;
        }
        store_atomic!(self.tail, tail, Release);
    }

    /// Returns the front value without removing it.
    ///
    /// Must be called from the consumer context only.
    pub fn front(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        if head == load_atomic!(self.tail, Acquire) {
            return None;
        }
        Some(unsafe { self.slot(head).read().assume_init() })
    }

    /// Removes the front value and returns it.
    ///
    /// Must be called from the consumer context only.
    pub fn pop(&self) -> Option<T> {
        let value = self.front()?;
        self.advance(1);
        Some(value)
    }

    /// Removes the front value without reading it. Returns `false` if the
    /// queue is empty.
    ///
    /// Must be called from the consumer context only.
    pub fn discard(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.advance(1);
        true
    }

    /// Fills `out` with values from the front of the queue.
    ///
    /// Returns `false` and leaves the queue untouched if it holds fewer values
    /// than `out.len()`. Must be called from the consumer context only.
    pub fn pop_into(&self, out: &mut [T]) -> bool {
        if self.len() < out.len() {
            return false;
        }
        let mut head = self.head.load(Ordering::Relaxed);
        for value in out.iter_mut() {
            *value = unsafe { self.slot(head).read().assume_init() };
            head = (head + 1) % N;
        }
        store_atomic!(self.head, head, Release);
        true
    }

    /// Drops every value currently in the queue.
    ///
    /// Must be called from the consumer context only.
    pub fn clear(&self) {
        let tail = load_atomic!(self.tail, Acquire);
        store_atomic!(self.head, tail, Release);
    }

    fn advance(&self, count: usize) {
        let head = self.head.load(Ordering::Relaxed);
        store_atomic!(self.head, (head + count) % N, Release);
    }

    unsafe fn slot(&self, index: usize) -> *mut MaybeUninit<T> {
        debug_assert!(index < N);
        unsafe { self.buffer.get().cast::<MaybeUninit<T>>().add(index) }
    }
}

impl<T: Copy, const N: usize, P: OverflowPolicy> Default for Queue<T, N, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let queue = Queue::<u32, 4>::new();
        assert_eq!(queue.capacity(), 3);
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.front(), Some(1));
        assert_eq!(queue.pop(), Some(1));
        queue.push(3);
        queue.push(4);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn wraps_around() {
        let queue = Queue::<u8, 3>::new();
        for round in 0..10 {
            queue.push_slice(&[round, round + 1]);
            let mut out = [0; 2];
            assert!(queue.pop_into(&mut out));
            assert_eq!(out, [round, round + 1]);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_into_needs_enough_values() {
        let queue = Queue::<u8, 8>::new();
        queue.push_slice(b"ab");
        let mut out = [0; 3];
        assert!(!queue.pop_into(&mut out));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    #[should_panic(expected = "queue overflow")]
    fn overflow_panics() {
        let queue = Queue::<u8, 2>::new();
        queue.push(1);
        queue.push(2);
    }

    #[test]
    fn overflow_ignored() {
        let queue = Queue::<u8, 4, Ignore>::new();
        queue.push_slice(&[1, 2]);
        queue.push_slice(&[3, 4]);
        assert_eq!(queue.len(), 2);
        queue.push(3);
        queue.push(4);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(1));
    }

    #[test]
    fn discard_and_clear() {
        let queue = Queue::<u16, 5>::new();
        assert!(!queue.discard());
        queue.push_slice(&[10, 20, 30]);
        assert!(queue.discard());
        assert_eq!(queue.front(), Some(20));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.front(), None);
    }
}
