use super::{apply_on, Action, Bus, Error, Item, Mmio, Reads};
use alloc::vec::Vec;

/// Default configuration of a set of fields, which call sites may partially
/// override.
///
/// # Examples
///
/// ```
/// use drone_regops::reg::{self, Address, Defaults, Item, Recorder, Width};
///
/// const CR: Address = unsafe { Address::new(0x4001_3000, Width::U16) };
/// const SPE: reg::Field<bool> = reg::rw_bit(CR, 6);
/// const BR: reg::Field<u16> = reg::rw_field(CR, 5, 3);
///
/// static SPI: Defaults<'static> = Defaults::new(&[
///     Item::Action(reg::set(SPE)),
///     Item::Action(reg::write_literal(BR, 0b111)),
/// ]);
///
/// let mut bus = Recorder::new();
/// SPI.apply_on(&mut bus, &reg::items![reg::write_literal(BR, 0b010)]).unwrap();
/// assert_eq!(bus.value(0x4001_3000), 0b0101_0000);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Defaults<'a> {
    items: &'a [Item<'a>],
}

impl<'a> Defaults<'a> {
    /// Creates a new set of defaults.
    #[inline]
    pub const fn new(items: &'a [Item<'a>]) -> Self {
        Self { items }
    }

    /// Returns `overrides` followed by every default whose field is not
    /// overridden.
    ///
    /// # Errors
    ///
    /// If an override targets a field without a default, or any of the lists
    /// contains a sequence point.
    pub fn merge(&self, overrides: &[Item<'_>]) -> Result<Vec<Action>, Error> {
        let mut defaults = Vec::new();
        collect(self.items, &mut defaults)?;
        let mut merged = Vec::new();
        collect(overrides, &mut merged)?;
        for action in &merged {
            let location = action.location();
            if !defaults.iter().any(|default| default.location() == location) {
                return Err(Error::NotInDefaults {
                    address: location.address().addr(),
                    mask: location.mask(),
                });
            }
        }
        defaults.retain(|default| {
            !merged.iter().any(|action| action.location() == default.location())
        });
        merged.extend(defaults);
        Ok(merged)
    }

    /// Applies the defaults with `overrides` to memory-mapped registers.
    ///
    /// # Errors
    ///
    /// See [`Defaults::merge`] and [`apply`](super::apply).
    #[inline]
    pub fn apply(&self, overrides: &[Item<'_>]) -> Result<Reads, Error> {
        self.apply_on(&mut Mmio, overrides)
    }

    /// Applies the defaults with `overrides` to `bus`.
    ///
    /// # Errors
    ///
    /// See [`Defaults::merge`] and [`apply`](super::apply).
    pub fn apply_on<B: Bus + ?Sized>(
        &self,
        bus: &mut B,
        overrides: &[Item<'_>],
    ) -> Result<Reads, Error> {
        let actions = self.merge(overrides)?;
        apply_on(bus, &[Item::Actions(&actions)])
    }
}

fn collect(items: &[Item<'_>], actions: &mut Vec<Action>) -> Result<(), Error> {
    for item in items {
        match *item {
            Item::Action(action) => actions.push(action),
            Item::Actions(list) => actions.extend_from_slice(list),
            Item::Group(items) => collect(items, actions)?,
            Item::SequencePoint => return Err(Error::UnexpectedSequencePoint),
        }
    }
    Ok(())
}
