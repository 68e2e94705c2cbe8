//! Typed views over classified values.
//!
//! The value tree is a closed enum ([`ValueKind`]); capability groups that
//! span unrelated branches of it are traits over views instead of
//! inheritance. `LoadInst` and `StoreInst` share [`MemoryAccess`]; the
//! instruction and constant-expression forms of a comparison share
//! [`Comparison`].
//!
//! Views have no public constructor. The only way to get one is
//! [`Value::downcast`], which checks the classified kind first.

use smallvec::SmallVec;

use crate::block::BasicBlock;
use crate::taxonomy::{ConstExprKind, Opcode, ValueKind};
use crate::value::Value;

pub(crate) mod sealed {
    use crate::value::Value;

    /// Not nameable outside the crate, so views cannot be built from
    /// arbitrary values.
    pub trait Sealed {
        fn wrap(value: Value) -> Self;
    }
}

/// Anything backed by a canonical [`Value`].
pub trait AsValue {
    fn as_value(&self) -> &Value;
}

/// A typed view selectable by [`Value::downcast`].
pub trait ValueVariant: sealed::Sealed + AsValue + Sized {
    /// True if a value of `kind` may be viewed as `Self`.
    fn accepts(kind: ValueKind) -> bool;
}

macro_rules! define_view {
    ($(#[$meta:meta])* $name:ident, |$kind:ident| $accepts:expr) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(Value);

        impl sealed::Sealed for $name {
            fn wrap(value: Value) -> Self {
                Self(value)
            }
        }

        impl AsValue for $name {
            fn as_value(&self) -> &Value {
                &self.0
            }
        }

        impl ValueVariant for $name {
            fn accepts($kind: ValueKind) -> bool {
                $accepts
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.0, f)
            }
        }
    };
}

define_view!(
    /// Any instruction.
    Instruction,
    |kind| kind.is_a(ValueKind::Instruction)
);

define_view!(
    /// Any block terminator.
    Terminator,
    |kind| kind.is_a(ValueKind::TerminatorInst)
);

define_view!(LoadInst, |kind| kind == ValueKind::LoadInst);

define_view!(StoreInst, |kind| kind == ValueKind::StoreInst);

define_view!(AtomicRmwInst, |kind| kind == ValueKind::AtomicRmwInst);

define_view!(AtomicCmpXchgInst, |kind| kind == ValueKind::AtomicCmpXchgInst);

define_view!(
    /// Integer comparison, as an instruction or a constant expression.
    ICmp,
    |kind| matches!(
        kind,
        ValueKind::ICmpInst | ValueKind::ConstExpr(ConstExprKind::ICmp)
    )
);

define_view!(
    /// Floating-point comparison, as an instruction or a constant expression.
    FCmp,
    |kind| matches!(
        kind,
        ValueKind::FCmpInst | ValueKind::ConstExpr(ConstExprKind::FCmp)
    )
);

impl Instruction {
    /// `None` if the native opcode is newer than this binding.
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_raw(self.0.native().instruction_opcode(self.0.handle()))
    }

    /// The block containing this instruction; `None` if detached.
    pub fn parent_block(&self) -> Option<BasicBlock> {
        let block = self.0.native().instruction_parent(self.0.handle());
        self.0.context().basic_block(block)
    }

    pub fn next_instruction(&self) -> Option<Value> {
        let next = self.0.native().next_instruction(self.0.handle());
        self.0.context().value(next)
    }
}

impl Terminator {
    /// Successor blocks in operand order.
    pub fn successors(&self) -> SmallVec<[BasicBlock; 2]> {
        let native = self.0.native();
        let term = self.0.handle();
        (0..native.num_successors(term))
            .filter_map(|index| self.0.context().basic_block(native.successor(term, index)))
            .collect()
    }
}

/// Instructions carrying a volatile flag.
pub trait MemoryAccess: AsValue {
    fn is_volatile(&self) -> bool {
        let value = self.as_value();
        value.native().is_volatile(value.handle())
    }

    fn set_volatile(&self, volatile: bool) {
        let value = self.as_value();
        value.native().set_volatile(value.handle(), volatile);
    }
}

impl MemoryAccess for LoadInst {}
impl MemoryAccess for StoreInst {}
impl MemoryAccess for AtomicRmwInst {}
impl MemoryAccess for AtomicCmpXchgInst {}

/// Comparisons, whether instructions or constant expressions.
pub trait Comparison: AsValue {
    /// Raw native predicate.
    fn raw_predicate(&self) -> u32;

    /// True for the constant-expression form.
    fn is_constant(&self) -> bool {
        self.as_value().kind().const_expr().is_some()
    }
}

impl Comparison for ICmp {
    fn raw_predicate(&self) -> u32 {
        self.0.native().icmp_predicate(self.0.handle())
    }
}

impl Comparison for FCmp {
    fn raw_predicate(&self) -> u32 {
        self.0.native().fcmp_predicate(self.0.handle())
    }
}

/// `LLVMIntPredicate`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl IntPredicate {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        let pred = match raw {
            32 => Self::Eq,
            33 => Self::Ne,
            34 => Self::Ugt,
            35 => Self::Uge,
            36 => Self::Ult,
            37 => Self::Ule,
            38 => Self::Sgt,
            39 => Self::Sge,
            40 => Self::Slt,
            41 => Self::Sle,
            _ => return None,
        };
        Some(pred)
    }
}

/// `LLVMRealPredicate`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RealPredicate {
    False,
    Oeq,
    Ogt,
    Oge,
    Olt,
    Ole,
    One,
    Ord,
    Uno,
    Ueq,
    Ugt,
    Uge,
    Ult,
    Ule,
    Une,
    True,
}

impl RealPredicate {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        let pred = match raw {
            0 => Self::False,
            1 => Self::Oeq,
            2 => Self::Ogt,
            3 => Self::Oge,
            4 => Self::Olt,
            5 => Self::Ole,
            6 => Self::One,
            7 => Self::Ord,
            8 => Self::Uno,
            9 => Self::Ueq,
            10 => Self::Ugt,
            11 => Self::Uge,
            12 => Self::Ult,
            13 => Self::Ule,
            14 => Self::Une,
            15 => Self::True,
            _ => return None,
        };
        Some(pred)
    }
}

impl ICmp {
    pub fn predicate(&self) -> Option<IntPredicate> {
        IntPredicate::from_raw(self.raw_predicate())
    }
}

impl FCmp {
    pub fn predicate(&self) -> Option<RealPredicate> {
        RealPredicate::from_raw(self.raw_predicate())
    }
}
