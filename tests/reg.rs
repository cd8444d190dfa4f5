use drone_regops::reg::{self, Defaults, Error, Item, Recorder, Transaction};

reg::map! {
    /// Test block doc attribute
    #[doc = "test block attribute"]
    pub mod TST;

    /// Control register.
    CTRL {
        0x1000 0x20;
        LOW { 0 4 ReadWrite }
        HIGH { 4 4 ReadWrite }
        EN { 8 1 ReadWrite }
    }

    STAT {
        0x2000 0x10;
        FLAG { 0 1 ReadWrite OneToClear }
        READY { 1 1 ReadOnly }
        TGL { 2 1 ReadWrite OneToToggle }
    }

    DATA {
        0x0800 0x08;
        BYTE { 0 8 ReadWrite as u8 }
    }

    ICR {
        0x3000 0x20 0xFFFF_FF00 0x00;
        CODE { 0 8 WriteOnly }
    }
}

#[test]
fn generated_constants() {
    assert_eq!(tst::ctrl::ADDRESS.addr(), 0x1000);
    assert_eq!(tst::ctrl::HIGH.location().mask(), 0xF0);
    assert_eq!(tst::ctrl::EN.location().shift(), 8);
    assert!(tst::stat::FLAG.location().access().is_set_to_clear());
    assert!(!tst::stat::READY.location().access().is_writable());
    assert_eq!(tst::icr::ADDRESS.write_ignored_if_zero(), 0xFFFF_FF00);
}

#[test]
fn write_then_read() {
    let mut bus = Recorder::new();
    reg::apply_on(&mut bus, &reg::items![reg::write(tst::ctrl::LOW, 8)]).unwrap();
    let reads = reg::apply_on(&mut bus, &reg::items![reg::read(tst::ctrl::LOW)]).unwrap();
    assert_eq!(reads.get(tst::ctrl::LOW), Some(8));
    assert_eq!(reads.into_value::<u32>(), Some(8));
}

#[test]
fn same_register_is_merged() {
    let mut bus = Recorder::new().with_value(0x1000, 0xABCD_1234);
    reg::apply_on(
        &mut bus,
        &reg::items![reg::write_literal(tst::ctrl::LOW, 0x3), reg::write_literal(tst::ctrl::HIGH, 0x5)],
    )
    .unwrap();
    assert_eq!(bus.transactions(), [
        Transaction::Load { address: 0x1000, value: 0xABCD_1234 },
        Transaction::Store { address: 0x1000, value: 0xABCD_1253 },
    ]);
}

#[test]
fn shared_read() {
    let mut bus = Recorder::new().with_value(0x1000, 0x1A5);
    let reads = reg::apply_on(
        &mut bus,
        &reg::items![reg::read(tst::ctrl::LOW), reg::read(tst::ctrl::HIGH), reg::read(tst::ctrl::EN)],
    )
    .unwrap();
    assert_eq!(bus.loads(), 1);
    assert_eq!(bus.stores(), 0);
    assert_eq!(reads.len(), 3);
    assert_eq!(reads.get(tst::ctrl::LOW), Some(0x5));
    assert_eq!(reads.get(tst::ctrl::HIGH), Some(0xA));
    assert_eq!(reads.get(tst::ctrl::EN), Some(true));
    assert_eq!(reads.get(tst::stat::READY), None);
}

#[test]
fn sorted_by_address() {
    let mut bus = Recorder::new();
    reg::apply_on(&mut bus, &reg::items![reg::set(tst::ctrl::EN), reg::write(tst::data::BYTE, 0x42)])
        .unwrap();
    assert_eq!(bus.transactions(), [
        Transaction::Store { address: 0x0800, value: 0x42 },
        Transaction::Load { address: 0x1000, value: 0 },
        Transaction::Store { address: 0x1000, value: 0x100 },
    ]);
}

#[test]
fn sequence_point_keeps_order() {
    let mut bus = Recorder::new();
    reg::apply_on(
        &mut bus,
        &reg::items![reg::set(tst::ctrl::EN), reg::SEQUENCE_POINT, reg::write(tst::data::BYTE, 0x42)],
    )
    .unwrap();
    assert_eq!(bus.transactions(), [
        Transaction::Load { address: 0x1000, value: 0 },
        Transaction::Store { address: 0x1000, value: 0x100 },
        Transaction::Store { address: 0x0800, value: 0x42 },
    ]);
}

#[test]
fn sequence_point_splits_same_register() {
    let mut bus = Recorder::new();
    reg::apply_on(
        &mut bus,
        &reg::items![reg::set(tst::ctrl::EN), reg::SEQUENCE_POINT, reg::clear(tst::ctrl::EN)],
    )
    .unwrap();
    assert_eq!(bus.stores(), 2);
    assert_eq!(bus.value(0x1000), 0);
}

#[test]
fn write_ignored_bits_skip_load() {
    let mut bus = Recorder::new().with_value(0x3000, 0xFFFF_FFFF);
    reg::apply_on(&mut bus, &reg::items![reg::write_literal(tst::icr::CODE, 0x12)]).unwrap();
    assert_eq!(bus.transactions(), [Transaction::Store { address: 0x3000, value: 0x12 }]);
}

#[test]
fn reset_flag() {
    let mut bus = Recorder::new().with_value(0x2000, 0x2);
    reg::apply_on(&mut bus, &reg::items![reg::reset(tst::stat::FLAG)]).unwrap();
    assert_eq!(bus.value(0x2000), 0x3);
}

#[test]
fn invalid_operation_does_nothing() {
    let mut bus = Recorder::new();
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::set(tst::data::BYTE), reg::set(tst::ctrl::EN)]),
        Err(Error::NotSingleBit { address: 0x0800, mask: 0xFF })
    );
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::set(tst::ctrl::EN), reg::reset(tst::ctrl::EN)]),
        Err(Error::NotSetToClear { address: 0x1000, mask: 0x100 })
    );
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::write_literal(tst::ctrl::LOW, 0x10)]),
        Err(Error::LiteralOutOfRange { address: 0x1000, mask: 0xF, value: 0x10 })
    );
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::read(tst::icr::CODE)]),
        Err(Error::NotReadable { address: 0x3000, mask: 0xFF })
    );
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::set(tst::stat::READY)]),
        Err(Error::NotWritable { address: 0x2000, mask: 0x2 })
    );
    assert!(bus.transactions().is_empty());
}

#[test]
fn conflicting_operations() {
    let mut bus = Recorder::new();
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::read(tst::ctrl::LOW), reg::set(tst::ctrl::EN)]),
        Err(Error::Conflict { address: 0x1000 })
    );
    assert_eq!(
        reg::apply_on(
            &mut bus,
            &reg::items![reg::write(tst::ctrl::LOW, 1), reg::write(tst::ctrl::LOW, 2)]
        ),
        Err(Error::Overlap { address: 0x1000, mask: 0xF })
    );
    assert!(bus.transactions().is_empty());
    reg::apply_on(
        &mut bus,
        &reg::items![reg::read(tst::ctrl::LOW), reg::SEQUENCE_POINT, reg::set(tst::ctrl::EN)],
    )
    .unwrap();
    assert_eq!(bus.loads(), 2);
    assert_eq!(bus.stores(), 1);
}

#[test]
fn agreeing_literals_are_merged() {
    let mut bus = Recorder::new();
    reg::apply_on(
        &mut bus,
        &reg::items![reg::write_literal(tst::ctrl::LOW, 0x5), reg::write_literal(tst::ctrl::LOW, 0x5)],
    )
    .unwrap();
    assert_eq!(bus.stores(), 1);
    assert_eq!(bus.value(0x1000), 0x5);
}

#[test]
fn toggle_bit() {
    let mut bus = Recorder::new().with_value(0x2000, 0x6);
    reg::apply_on(&mut bus, &reg::items![reg::toggle(tst::stat::TGL)]).unwrap();
    assert_eq!(bus.value(0x2000), 0x6);
    reg::apply_on(&mut bus, &reg::items![reg::clear(tst::stat::TGL)]).unwrap();
    assert_eq!(bus.value(0x2000), 0x2);
}

#[test]
fn toggle_needs_toggle_on_write() {
    let mut bus = Recorder::new().with_value(0x1000, 0x1F0);
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::toggle(tst::ctrl::EN)]),
        Err(Error::NotToggleOnWrite { address: 0x1000, mask: 0x100 })
    );
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::xor(tst::ctrl::HIGH, 0x3)]),
        Err(Error::NotToggleOnWrite { address: 0x1000, mask: 0xF0 })
    );
    assert!(bus.transactions().is_empty());
    assert_eq!(bus.value(0x1000), 0x1F0);
}

#[test]
fn address_described_twice() {
    let wide = reg::rw_bit(unsafe { reg::Address::new(0x1000, reg::Width::U32) }, 0);
    let narrow = reg::rw_bit(unsafe { reg::Address::new(0x1000, reg::Width::U16) }, 1);
    let mut bus = Recorder::new();
    assert_eq!(
        reg::apply_on(&mut bus, &reg::items![reg::set(wide), reg::SEQUENCE_POINT, reg::set(narrow)]),
        Err(Error::AddressMismatch { address: 0x1000 })
    );
    assert_eq!(
        reg::apply_on(
            &mut bus,
            &reg::items![reg::read(tst::ctrl::EN), reg::SEQUENCE_POINT, reg::read(narrow)]
        ),
        Err(Error::AddressMismatch { address: 0x1000 })
    );
    assert!(bus.transactions().is_empty());
}

#[test]
fn nested_groups() {
    static LOW: [Item<'static>; 2] = [
        Item::Action(reg::write_literal(tst::ctrl::LOW, 0x3)),
        Item::Action(reg::write_literal(tst::ctrl::HIGH, 0x5)),
    ];
    let mut bus = Recorder::new();
    let reads = reg::apply_on(
        &mut bus,
        &reg::items![&LOW, reg::SEQUENCE_POINT, reg::read(tst::ctrl::HIGH)],
    )
    .unwrap();
    assert_eq!(reads.get(tst::ctrl::HIGH), Some(0x5));
    assert_eq!(bus.value(0x1000), 0x53);
}

#[test]
fn macros() {
    let mut bus = Recorder::new();
    drone_regops::apply!(in &mut bus; reg::set(tst::ctrl::EN)).unwrap();
    drone_regops::atomic!(in &mut bus; reg::write(tst::ctrl::LOW, 7)).unwrap();
    let reads = drone_regops::isolated!(in &mut bus;
        reg::write(tst::data::BYTE, 0xAA),
        reg::SEQUENCE_POINT,
        reg::read(tst::ctrl::LOW),
        reg::read(tst::data::BYTE),
    )
    .unwrap();
    assert_eq!(reads.get(tst::ctrl::LOW), Some(7));
    assert_eq!(reads.get(tst::data::BYTE), Some(0xAA));
    assert_eq!(bus.value(0x1000), 0x107);
}

#[test]
fn field_equals() {
    let mut bus = Recorder::new().with_value(0x2000, 0x2);
    assert_eq!(reg::field_equals_on(&mut bus, tst::stat::READY.value(1)), Ok(true));
    assert_eq!(reg::field_equals_on(&mut bus, tst::stat::FLAG.value(1)), Ok(false));
    assert_eq!(
        reg::field_equals_on(&mut bus, tst::icr::CODE.value(0)),
        Err(Error::NotReadable { address: 0x3000, mask: 0xFF })
    );
}

#[test]
fn defaults_with_overrides() {
    static CTRL: Defaults<'static> = Defaults::new(&[
        Item::Action(reg::write_literal(tst::ctrl::LOW, 0x1)),
        Item::Action(reg::write_literal(tst::ctrl::HIGH, 0x2)),
        Item::Action(reg::set(tst::ctrl::EN)),
    ]);
    let mut bus = Recorder::new();
    CTRL.apply_on(&mut bus, &reg::items![reg::write_literal(tst::ctrl::HIGH, 0xF)]).unwrap();
    assert_eq!(bus.value(0x1000), 0x1F1);
    assert_eq!(
        CTRL.apply_on(&mut bus, &reg::items![reg::write(tst::data::BYTE, 1)]),
        Err(Error::NotInDefaults { address: 0x0800, mask: 0xFF })
    );
}

#[test]
fn empty_list() {
    let mut bus = Recorder::new();
    let reads = reg::apply_on(&mut bus, &[]).unwrap();
    assert!(reads.is_empty());
    assert!(bus.transactions().is_empty());
    assert!(reg::apply_on(&mut bus, &reg::items![reg::SEQUENCE_POINT, reg::SEQUENCE_POINT])
        .unwrap()
        .is_empty());
    assert!(bus.transactions().is_empty());
}
