//! Static taxonomy tables.
//!
//! - [`TypeKind`]: flat type-kind table, keyed by the raw native kind.
//! - [`VALUE_TAXONOMY`]: ordered decision tree of capability probes.
//! - [`const_expr_slot`]: opcode table for the constant-expression branch.

mod opcode;
mod types;
mod values;

pub use opcode::{const_expr_slot, ConstExprKind, ConstExprSlot, Opcode};
pub use types::{TypeCategory, TypeKind};
pub use values::{Probe, TaxonomyNode, ValueKind, VALUE_TAXONOMY};

#[cfg(test)]
mod tests;
