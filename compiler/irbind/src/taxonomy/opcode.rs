//! Instruction opcodes and the constant-expression opcode table.
//!
//! Constant expressions are classified in two stages: the predicate chain
//! only establishes "this is a `ConstantExpr`", then the expression's opcode
//! selects the leaf from [`const_expr_slot`].

use std::fmt;

/// `LLVMOpcode`, numbered as in the LLVM 17 C API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Terminators
    Ret,
    Br,
    Switch,
    IndirectBr,
    Invoke,
    Unreachable,
    CallBr,

    // Unary
    FNeg,

    // Binary
    Add,
    FAdd,
    Sub,
    FSub,
    Mul,
    FMul,
    UDiv,
    SDiv,
    FDiv,
    URem,
    SRem,
    FRem,

    // Bitwise
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,

    // Memory
    Alloca,
    Load,
    Store,
    GetElementPtr,

    // Casts
    Trunc,
    ZExt,
    SExt,
    FpToUi,
    FpToSi,
    UiToFp,
    SiToFp,
    FpTrunc,
    FpExt,
    PtrToInt,
    IntToPtr,
    BitCast,
    AddrSpaceCast,

    // Other
    ICmp,
    FCmp,
    Phi,
    Call,
    Select,
    UserOp1,
    UserOp2,
    VaArg,
    ExtractElement,
    InsertElement,
    ShuffleVector,
    ExtractValue,
    InsertValue,
    Freeze,

    // Atomics
    Fence,
    AtomicCmpXchg,
    AtomicRmw,

    // Exception handling
    Resume,
    LandingPad,
    CleanupRet,
    CatchRet,
    CatchPad,
    CleanupPad,
    CatchSwitch,
}

macro_rules! opcode_numbering {
    ($($op:ident = $raw:literal,)*) => {
        impl Opcode {
            /// Every opcode of the enumeration.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$op,)*];

            /// Map the raw value of `LLVMGetConstOpcode`/`LLVMGetInstructionOpcode`.
            pub const fn from_raw(raw: u32) -> Option<Self> {
                match raw {
                    $($raw => Some(Opcode::$op),)*
                    _ => None,
                }
            }

            pub const fn to_raw(self) -> u32 {
                match self {
                    $(Opcode::$op => $raw,)*
                }
            }
        }
    };
}

opcode_numbering! {
    Ret = 1,
    Br = 2,
    Switch = 3,
    IndirectBr = 4,
    Invoke = 5,
    Unreachable = 7,
    CallBr = 67,
    FNeg = 66,
    Add = 8,
    FAdd = 9,
    Sub = 10,
    FSub = 11,
    Mul = 12,
    FMul = 13,
    UDiv = 14,
    SDiv = 15,
    FDiv = 16,
    URem = 17,
    SRem = 18,
    FRem = 19,
    Shl = 20,
    LShr = 21,
    AShr = 22,
    And = 23,
    Or = 24,
    Xor = 25,
    Alloca = 26,
    Load = 27,
    Store = 28,
    GetElementPtr = 29,
    Trunc = 30,
    ZExt = 31,
    SExt = 32,
    FpToUi = 33,
    FpToSi = 34,
    UiToFp = 35,
    SiToFp = 36,
    FpTrunc = 37,
    FpExt = 38,
    PtrToInt = 39,
    IntToPtr = 40,
    BitCast = 41,
    AddrSpaceCast = 60,
    ICmp = 42,
    FCmp = 43,
    Phi = 44,
    Call = 45,
    Select = 46,
    UserOp1 = 47,
    UserOp2 = 48,
    VaArg = 49,
    ExtractElement = 50,
    InsertElement = 51,
    ShuffleVector = 52,
    ExtractValue = 53,
    InsertValue = 54,
    Freeze = 68,
    Fence = 55,
    AtomicCmpXchg = 56,
    AtomicRmw = 57,
    Resume = 58,
    LandingPad = 59,
    CleanupRet = 61,
    CatchRet = 62,
    CatchPad = 63,
    CleanupPad = 64,
    CatchSwitch = 65,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Leaf variant of a constant expression, selected by opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstExprKind {
    Add,
    Sub,
    Mul,
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,
    Trunc,
    ZExt,
    SExt,
    FpToUi,
    FpToSi,
    UiToFp,
    SiToFp,
    FpTrunc,
    FpExt,
    PtrToInt,
    IntToPtr,
    BitCast,
    AddrSpaceCast,
    GetElementPtr,
    ICmp,
    FCmp,
    ExtractElement,
    InsertElement,
    ShuffleVector,
}

/// Entry of the constant-expression opcode table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstExprSlot {
    Kind(ConstExprKind),
    /// The opcode can never head a constant expression.
    Impossible,
}

/// Look up the constant-expression leaf for `opcode`.
pub const fn const_expr_slot(opcode: Opcode) -> ConstExprSlot {
    use ConstExprKind as K;

    let kind = match opcode {
        Opcode::Add => K::Add,
        Opcode::Sub => K::Sub,
        Opcode::Mul => K::Mul,
        Opcode::Shl => K::Shl,
        Opcode::LShr => K::LShr,
        Opcode::AShr => K::AShr,
        Opcode::And => K::And,
        Opcode::Or => K::Or,
        Opcode::Xor => K::Xor,
        Opcode::Trunc => K::Trunc,
        Opcode::ZExt => K::ZExt,
        Opcode::SExt => K::SExt,
        Opcode::FpToUi => K::FpToUi,
        Opcode::FpToSi => K::FpToSi,
        Opcode::UiToFp => K::UiToFp,
        Opcode::SiToFp => K::SiToFp,
        Opcode::FpTrunc => K::FpTrunc,
        Opcode::FpExt => K::FpExt,
        Opcode::PtrToInt => K::PtrToInt,
        Opcode::IntToPtr => K::IntToPtr,
        Opcode::BitCast => K::BitCast,
        Opcode::AddrSpaceCast => K::AddrSpaceCast,
        Opcode::GetElementPtr => K::GetElementPtr,
        Opcode::ICmp => K::ICmp,
        Opcode::FCmp => K::FCmp,
        Opcode::ExtractElement => K::ExtractElement,
        Opcode::InsertElement => K::InsertElement,
        Opcode::ShuffleVector => K::ShuffleVector,

        // Removed from constant expressions by LLVM 17.
        Opcode::FNeg
        | Opcode::FAdd
        | Opcode::FSub
        | Opcode::FMul
        | Opcode::UDiv
        | Opcode::SDiv
        | Opcode::FDiv
        | Opcode::URem
        | Opcode::SRem
        | Opcode::FRem
        | Opcode::Select
        | Opcode::ExtractValue
        | Opcode::InsertValue => return ConstExprSlot::Impossible,

        Opcode::Ret
        | Opcode::Br
        | Opcode::Switch
        | Opcode::IndirectBr
        | Opcode::Invoke
        | Opcode::Unreachable
        | Opcode::CallBr
        | Opcode::Alloca
        | Opcode::Load
        | Opcode::Store
        | Opcode::Phi
        | Opcode::Call
        | Opcode::UserOp1
        | Opcode::UserOp2
        | Opcode::VaArg
        | Opcode::Freeze
        | Opcode::Fence
        | Opcode::AtomicCmpXchg
        | Opcode::AtomicRmw
        | Opcode::Resume
        | Opcode::LandingPad
        | Opcode::CleanupRet
        | Opcode::CatchRet
        | Opcode::CatchPad
        | Opcode::CleanupPad
        | Opcode::CatchSwitch => return ConstExprSlot::Impossible,
    };
    ConstExprSlot::Kind(kind)
}

impl ConstExprKind {
    /// Every constant-expression leaf.
    pub const ALL: [ConstExprKind; 28] = [
        ConstExprKind::Add,
        ConstExprKind::Sub,
        ConstExprKind::Mul,
        ConstExprKind::Shl,
        ConstExprKind::LShr,
        ConstExprKind::AShr,
        ConstExprKind::And,
        ConstExprKind::Or,
        ConstExprKind::Xor,
        ConstExprKind::Trunc,
        ConstExprKind::ZExt,
        ConstExprKind::SExt,
        ConstExprKind::FpToUi,
        ConstExprKind::FpToSi,
        ConstExprKind::UiToFp,
        ConstExprKind::SiToFp,
        ConstExprKind::FpTrunc,
        ConstExprKind::FpExt,
        ConstExprKind::PtrToInt,
        ConstExprKind::IntToPtr,
        ConstExprKind::BitCast,
        ConstExprKind::AddrSpaceCast,
        ConstExprKind::GetElementPtr,
        ConstExprKind::ICmp,
        ConstExprKind::FCmp,
        ConstExprKind::ExtractElement,
        ConstExprKind::InsertElement,
        ConstExprKind::ShuffleVector,
    ];

    /// The opcode this leaf is selected by.
    pub const fn opcode(self) -> Opcode {
        match self {
            ConstExprKind::Add => Opcode::Add,
            ConstExprKind::Sub => Opcode::Sub,
            ConstExprKind::Mul => Opcode::Mul,
            ConstExprKind::Shl => Opcode::Shl,
            ConstExprKind::LShr => Opcode::LShr,
            ConstExprKind::AShr => Opcode::AShr,
            ConstExprKind::And => Opcode::And,
            ConstExprKind::Or => Opcode::Or,
            ConstExprKind::Xor => Opcode::Xor,
            ConstExprKind::Trunc => Opcode::Trunc,
            ConstExprKind::ZExt => Opcode::ZExt,
            ConstExprKind::SExt => Opcode::SExt,
            ConstExprKind::FpToUi => Opcode::FpToUi,
            ConstExprKind::FpToSi => Opcode::FpToSi,
            ConstExprKind::UiToFp => Opcode::UiToFp,
            ConstExprKind::SiToFp => Opcode::SiToFp,
            ConstExprKind::FpTrunc => Opcode::FpTrunc,
            ConstExprKind::FpExt => Opcode::FpExt,
            ConstExprKind::PtrToInt => Opcode::PtrToInt,
            ConstExprKind::IntToPtr => Opcode::IntToPtr,
            ConstExprKind::BitCast => Opcode::BitCast,
            ConstExprKind::AddrSpaceCast => Opcode::AddrSpaceCast,
            ConstExprKind::GetElementPtr => Opcode::GetElementPtr,
            ConstExprKind::ICmp => Opcode::ICmp,
            ConstExprKind::FCmp => Opcode::FCmp,
            ConstExprKind::ExtractElement => Opcode::ExtractElement,
            ConstExprKind::InsertElement => Opcode::InsertElement,
            ConstExprKind::ShuffleVector => Opcode::ShuffleVector,
        }
    }

    /// True for the two comparison leaves.
    pub const fn is_comparison(self) -> bool {
        matches!(self, ConstExprKind::ICmp | ConstExprKind::FCmp)
    }

    /// True for the cast leaves.
    pub const fn is_cast(self) -> bool {
        matches!(
            self,
            ConstExprKind::Trunc
                | ConstExprKind::ZExt
                | ConstExprKind::SExt
                | ConstExprKind::FpToUi
                | ConstExprKind::FpToSi
                | ConstExprKind::UiToFp
                | ConstExprKind::SiToFp
                | ConstExprKind::FpTrunc
                | ConstExprKind::FpExt
                | ConstExprKind::PtrToInt
                | ConstExprKind::IntToPtr
                | ConstExprKind::BitCast
                | ConstExprKind::AddrSpaceCast
        )
    }
}

impl fmt::Display for ConstExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstantExpr::{self:?}")
    }
}
