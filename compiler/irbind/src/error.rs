//! Classification failures.
//!
//! Every variant means the binding's static taxonomy and the linked native
//! library disagree. None of them is recoverable: the panicking gates
//! ([`Context::ty`](crate::Context::ty), [`Context::value`](crate::Context::value))
//! abort with the message, and the `try_` gates hand it to the caller.

use std::fmt;

use crate::handle::{TypeRef, ValueRef};
use crate::taxonomy::Opcode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// `LLVMGetTypeKind` returned a kind absent from the type table.
    UnknownTypeKind { handle: TypeRef, raw: u32 },
    /// A constant expression reported an opcode absent from the opcode table.
    UnknownOpcode { handle: ValueRef, raw: u32 },
    /// A constant expression reported an opcode that cannot head one.
    ImpossibleConstExpr { handle: ValueRef, opcode: Opcode },
    /// No top-level probe matched and unknown values are rejected.
    UnclassifiedValue { handle: ValueRef },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::UnknownTypeKind { handle, raw } => write!(
                f,
                "taxonomy drift: type {handle:?} has kind {raw}, which the type table does not know"
            ),
            BindError::UnknownOpcode { handle, raw } => write!(
                f,
                "taxonomy drift: constant expression {handle:?} has opcode {raw}, which the opcode table does not know"
            ),
            BindError::ImpossibleConstExpr { handle, opcode } => write!(
                f,
                "taxonomy drift: constant expression {handle:?} has opcode {opcode}, which cannot form a constant expression"
            ),
            BindError::UnclassifiedValue { handle } => write!(
                f,
                "taxonomy drift: value {handle:?} matches no top-level class (set IRBIND_TOLERATE_UNKNOWN=1 to accept it as a bare Value)"
            ),
        }
    }
}

impl std::error::Error for BindError {}
