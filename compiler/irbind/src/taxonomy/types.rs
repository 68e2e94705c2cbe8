//! Type taxonomy.
//!
//! Types need no predicate chain: the native library returns a flat kind
//! directly, and this table maps it onto a wrapper variant.

use std::fmt;

/// Concrete type variant, one per `LLVMTypeKind` known to this binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Half,
    BFloat,
    Float,
    Double,
    X86Fp80,
    Fp128,
    PpcFp128,
    Label,
    Integer,
    Function,
    Struct,
    Array,
    Pointer,
    Vector,
    ScalableVector,
    Metadata,
    X86Mmx,
    Token,
    X86Amx,
    TargetExt,
}

/// Abstract grouping above the concrete type variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Floating-point types.
    Real,
    /// Array, pointer and vector types.
    Sequential,
    /// Everything else stands alone.
    Standalone,
}

impl TypeKind {
    /// Every kind, in native enumeration order.
    pub const ALL: [TypeKind; 21] = [
        TypeKind::Void,
        TypeKind::Half,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::X86Fp80,
        TypeKind::Fp128,
        TypeKind::PpcFp128,
        TypeKind::Label,
        TypeKind::Integer,
        TypeKind::Function,
        TypeKind::Struct,
        TypeKind::Array,
        TypeKind::Pointer,
        TypeKind::Vector,
        TypeKind::Metadata,
        TypeKind::X86Mmx,
        TypeKind::Token,
        TypeKind::ScalableVector,
        TypeKind::BFloat,
        TypeKind::X86Amx,
        TypeKind::TargetExt,
    ];

    /// Map the raw value of `LLVMGetTypeKind`.
    ///
    /// `None` means the linked library knows a kind this binding does not.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        let kind = match raw {
            0 => TypeKind::Void,
            1 => TypeKind::Half,
            2 => TypeKind::Float,
            3 => TypeKind::Double,
            4 => TypeKind::X86Fp80,
            5 => TypeKind::Fp128,
            6 => TypeKind::PpcFp128,
            7 => TypeKind::Label,
            8 => TypeKind::Integer,
            9 => TypeKind::Function,
            10 => TypeKind::Struct,
            11 => TypeKind::Array,
            12 => TypeKind::Pointer,
            13 => TypeKind::Vector,
            14 => TypeKind::Metadata,
            15 => TypeKind::X86Mmx,
            16 => TypeKind::Token,
            17 => TypeKind::ScalableVector,
            18 => TypeKind::BFloat,
            19 => TypeKind::X86Amx,
            20 => TypeKind::TargetExt,
            _ => return None,
        };
        Some(kind)
    }

    /// The raw `LLVMTypeKind` value.
    pub const fn to_raw(self) -> u32 {
        match self {
            TypeKind::Void => 0,
            TypeKind::Half => 1,
            TypeKind::Float => 2,
            TypeKind::Double => 3,
            TypeKind::X86Fp80 => 4,
            TypeKind::Fp128 => 5,
            TypeKind::PpcFp128 => 6,
            TypeKind::Label => 7,
            TypeKind::Integer => 8,
            TypeKind::Function => 9,
            TypeKind::Struct => 10,
            TypeKind::Array => 11,
            TypeKind::Pointer => 12,
            TypeKind::Vector => 13,
            TypeKind::Metadata => 14,
            TypeKind::X86Mmx => 15,
            TypeKind::Token => 16,
            TypeKind::ScalableVector => 17,
            TypeKind::BFloat => 18,
            TypeKind::X86Amx => 19,
            TypeKind::TargetExt => 20,
        }
    }

    pub const fn category(self) -> TypeCategory {
        match self {
            TypeKind::Half
            | TypeKind::BFloat
            | TypeKind::Float
            | TypeKind::Double
            | TypeKind::X86Fp80
            | TypeKind::Fp128
            | TypeKind::PpcFp128 => TypeCategory::Real,
            TypeKind::Array | TypeKind::Pointer | TypeKind::Vector | TypeKind::ScalableVector => {
                TypeCategory::Sequential
            }
            TypeKind::Void
            | TypeKind::Label
            | TypeKind::Integer
            | TypeKind::Function
            | TypeKind::Struct
            | TypeKind::Metadata
            | TypeKind::X86Mmx
            | TypeKind::Token
            | TypeKind::X86Amx
            | TypeKind::TargetExt => TypeCategory::Standalone,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Void => "VoidType",
            TypeKind::Half => "HalfType",
            TypeKind::BFloat => "BFloatType",
            TypeKind::Float => "FloatType",
            TypeKind::Double => "DoubleType",
            TypeKind::X86Fp80 => "X86FP80Type",
            TypeKind::Fp128 => "FP128Type",
            TypeKind::PpcFp128 => "PPCFP128Type",
            TypeKind::Label => "LabelType",
            TypeKind::Integer => "IntegerType",
            TypeKind::Function => "FunctionType",
            TypeKind::Struct => "StructType",
            TypeKind::Array => "ArrayType",
            TypeKind::Pointer => "PointerType",
            TypeKind::Vector => "VectorType",
            TypeKind::ScalableVector => "ScalableVectorType",
            TypeKind::Metadata => "MetadataType",
            TypeKind::X86Mmx => "X86MMXType",
            TypeKind::Token => "TokenType",
            TypeKind::X86Amx => "X86AMXType",
            TypeKind::TargetExt => "TargetExtType",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
