use super::Address;
use crate::log::{Port, REGTRACE_PORT};
use core::mem;

const LOAD: u8 = 0;
const STORE: u8 = 1;

const RECORD_SIZE: usize = 1 + mem::size_of::<usize>() + mem::size_of::<u64>();

#[inline(always)]
pub(crate) fn load(address: &Address, value: u64) {
    if Port::new(REGTRACE_PORT).is_enabled() {
        trace(LOAD, address.addr(), value);
    }
}

#[inline(always)]
pub(crate) fn store(address: &Address, value: u64) {
    if Port::new(REGTRACE_PORT).is_enabled() {
        trace(STORE, address.addr(), value);
    }
}

#[inline(never)]
fn trace(tag: u8, address: usize, value: u64) {
    Port::new(REGTRACE_PORT).write_transaction(&record(tag, address, value));
}

fn record(tag: u8, address: usize, value: u64) -> [u8; RECORD_SIZE] {
    let mut buffer = [0; RECORD_SIZE];
    let (head, tail) = buffer.split_at_mut(1 + mem::size_of::<usize>());
    head[0] = tag;
    head[1..].copy_from_slice(&address.to_be_bytes());
    tail.copy_from_slice(&value.to_be_bytes());
    buffer
}
