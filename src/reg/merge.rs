//! Merging of same-register operations.
//!
//! The flat operation stream is split at sequence points into steps. Inside a
//! step the operations are stably sorted by address and every run of
//! operations on one register folds into a single [`MergedOp`]. The fold only
//! takes unions of masks and ORs of literals, so the result doesn't depend on
//! the order the operations were listed in.

use super::{
    normalize::{Category, Entry, IndexedOp},
    Address, Error,
};
use alloc::vec::Vec;
use core::mem;

/// One bus-level operation produced by merging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MergedOp {
    pub(crate) address: Address,
    pub(crate) category: Category,
    pub(crate) mask: u64,
    pub(crate) literal: u64,
    /// Bits supplied by run-time operands.
    pub(crate) runtime_mask: u64,
    /// Argument slots ORed into the run-time operand.
    pub(crate) inputs: Vec<usize>,
}

/// Merged operations grouped by step, each step sorted by address.
#[derive(Debug, Default)]
pub(crate) struct Plan {
    pub(crate) steps: Vec<Vec<MergedOp>>,
}

/// Splits `entries` into steps and merges each of them.
pub(crate) fn plan(entries: &[Entry]) -> Result<Plan, Error> {
    let mut plan = Plan::default();
    let mut step = Vec::new();
    for entry in entries {
        match *entry {
            Entry::Op(op) => step.push(op),
            Entry::SequencePoint => {
                if !step.is_empty() {
                    plan.steps.push(merge_step(mem::take(&mut step))?);
                }
            }
        }
    }
    if !step.is_empty() {
        plan.steps.push(merge_step(step)?);
    }
    Ok(plan)
}

fn merge_step(mut ops: Vec<IndexedOp>) -> Result<Vec<MergedOp>, Error> {
    ops.sort_by_key(|op| op.address.addr());
    let mut merged: Vec<MergedOp> = Vec::with_capacity(ops.len());
    for op in ops {
        match merged.last_mut() {
            Some(last) if last.address.addr() == op.address.addr() => last.fold(&op)?,
            _ => merged.push(MergedOp::from(op)),
        }
    }
    Ok(merged)
}

impl From<IndexedOp> for MergedOp {
    fn from(op: IndexedOp) -> Self {
        let IndexedOp { address, mask, category, literal, input } = op;
        let mut inputs = Vec::new();
        inputs.extend(input);
        Self {
            address,
            category,
            mask,
            literal,
            runtime_mask: if input.is_some() { mask } else { 0 },
            inputs,
        }
    }
}

impl MergedOp {
    fn fold(&mut self, op: &IndexedOp) -> Result<(), Error> {
        let address = self.address.addr();
        if self.address != op.address {
            return Err(Error::AddressMismatch { address });
        }
        if self.category != op.category {
            return Err(Error::Conflict { address });
        }
        let overlap = self.mask & op.mask;
        match self.category {
            Category::Read => {}
            Category::Write => {
                // Literals may overlap as long as they agree, run-time values
                // can't be checked.
                if overlap & self.runtime_mask != 0 {
                    return Err(Error::Overlap { address, mask: overlap & self.runtime_mask });
                }
                if op.input.is_some() && overlap != 0 {
                    return Err(Error::Overlap { address, mask: overlap });
                }
                let disagree = (self.literal ^ op.literal) & overlap;
                if disagree != 0 {
                    return Err(Error::Overlap { address, mask: disagree });
                }
            }
            Category::Xor => {
                if overlap != 0 {
                    return Err(Error::Overlap { address, mask: overlap });
                }
            }
        }
        self.mask |= op.mask;
        self.literal |= op.literal;
        if let Some(input) = op.input {
            self.runtime_mask |= op.mask;
            self.inputs.push(input);
        }
        Ok(())
    }
}
