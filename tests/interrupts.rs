#![cfg(not(loom))]

use drone_regops::{
    platform::Interrupts,
    reg::{self, Address, Bus, Recorder, Width},
};

const CR: Address = unsafe { Address::new(0x1000, Width::U32) };
const DR: Address = unsafe { Address::new(0x2000, Width::U32) };

/// Bus which remembers whether interrupts were enabled on every transaction.
#[derive(Default)]
struct Witness {
    memory: Recorder,
    enabled: Vec<bool>,
}

impl Bus for Witness {
    fn load(&mut self, address: &Address) -> u64 {
        self.enabled.push(Interrupts::enabled());
        self.memory.load(address)
    }

    fn store(&mut self, address: &Address, value: u64) {
        self.enabled.push(Interrupts::enabled());
        self.memory.store(address, value);
    }
}

// The emulated interrupt state is process-wide, so everything touching it
// lives in a single test.
#[test]
fn critical_sections() {
    assert!(Interrupts::enabled());
    let count = Interrupts::disabled_count();
    {
        let _outer = Interrupts::pause();
        assert!(!Interrupts::enabled());
        Interrupts::paused(|| assert!(!Interrupts::enabled()));
        assert!(!Interrupts::enabled());
    }
    assert!(Interrupts::enabled());
    assert_eq!(Interrupts::disabled_count(), count + 1);

    let en = reg::rw_bit(CR, 0);
    let data = reg::rw_field::<u32>(DR, 7, 0);
    let steps = reg::items![
        reg::set(en),
        reg::write(data, 0x5A),
        reg::SEQUENCE_POINT,
        reg::read(data),
        reg::SEQUENCE_POINT,
        reg::clear(en),
    ];

    let mut bus = Witness::default();
    let count = Interrupts::disabled_count();
    reg::apply_on(&mut bus, &steps).unwrap();
    assert_eq!(bus.enabled, [true; 7]);
    assert_eq!(Interrupts::disabled_count(), count);

    let mut bus = Witness::default();
    let count = Interrupts::disabled_count();
    let reads = reg::atomic_on(&mut bus, &steps).unwrap();
    assert_eq!(reads.get(data), Some(0x5A));
    assert_eq!(bus.enabled, [false; 7]);
    assert_eq!(Interrupts::disabled_count(), count + 1);
    assert!(Interrupts::enabled());

    let mut bus = Witness::default();
    let count = Interrupts::disabled_count();
    reg::isolated_on(&mut bus, &steps).unwrap();
    assert_eq!(bus.enabled, [false; 7]);
    assert_eq!(Interrupts::disabled_count(), count + 3);
    assert!(Interrupts::enabled());

    let count = Interrupts::disabled_count();
    assert!(reg::atomic_on(&mut bus, &reg::items![reg::write_literal(en, 2)]).is_err());
    assert!(reg::isolated_on(&mut bus, &reg::items![reg::write_literal(en, 2)]).is_err());
    assert_eq!(Interrupts::disabled_count(), count);
    assert!(Interrupts::enabled());
    assert_eq!(bus.memory.value(0x1000), 0);
}
