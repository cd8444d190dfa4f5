use super::{Action, Address, Error, FieldLocation, Item, Op};
use alloc::{collections::BTreeMap, vec::Vec};

/// Operation family. Only operations of the same family can merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Read,
    Write,
    Xor,
}

/// Validated operation with its run-time operand moved to the argument table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IndexedOp {
    pub(crate) address: Address,
    pub(crate) mask: u64,
    pub(crate) category: Category,
    pub(crate) literal: u64,
    pub(crate) input: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    Op(IndexedOp),
    SequencePoint,
}

/// Flat, order-preserving form of an operation list.
#[derive(Debug, Default)]
pub(crate) struct Flat {
    pub(crate) entries: Vec<Entry>,
    /// Run-time operands, indexed by [`IndexedOp::input`].
    pub(crate) args: Vec<u64>,
    /// Every requested read, in request order.
    pub(crate) reads: Vec<FieldLocation>,
    // Every register seen so far, across all steps.
    registers: BTreeMap<usize, Address>,
}

/// Flattens nested items depth-first and validates every action.
///
/// Nothing is executed here, so a rejected list leaves hardware untouched.
pub(crate) fn flatten(items: &[Item<'_>]) -> Result<Flat, Error> {
    let mut flat = Flat::default();
    flat.extend(items)?;
    Ok(flat)
}

impl Flat {
    fn extend(&mut self, items: &[Item<'_>]) -> Result<(), Error> {
        for item in items {
            match *item {
                Item::Action(ref action) => self.push(action)?,
                Item::Actions(actions) => {
                    for action in actions {
                        self.push(action)?;
                    }
                }
                Item::Group(items) => self.extend(items)?,
                Item::SequencePoint => self.entries.push(Entry::SequencePoint),
            }
        }
        Ok(())
    }

    fn push(&mut self, action: &Action) -> Result<(), Error> {
        let location = action.location();
        let address = *location.address();
        if let Some(known) = self.registers.insert(address.addr(), address) {
            if known != address {
                return Err(Error::AddressMismatch { address: address.addr() });
            }
        }
        let (category, literal, runtime) = match action.lower()? {
            Op::Read => {
                self.reads.push(*location);
                (Category::Read, 0, None)
            }
            Op::WriteLiteral(literal) => (Category::Write, literal, None),
            Op::WriteRuntime(value) => (Category::Write, 0, Some(value)),
            Op::XorLiteral(literal) => (Category::Xor, literal, None),
            Op::XorRuntime(value) => (Category::Xor, 0, Some(value)),
        };
        let input = runtime.map(|value| {
            self.args.push(value);
            self.args.len() - 1
        });
        self.entries.push(Entry::Op(IndexedOp {
            address,
            mask: location.mask(),
            category,
            literal,
            input,
        }));
        Ok(())
    }
}
