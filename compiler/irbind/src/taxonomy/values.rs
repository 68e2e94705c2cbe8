//! Value taxonomy.
//!
//! One [`Probe`] exists per node of the value tree; each is answered by a
//! single native capability predicate (`LLVMIsA*`). [`VALUE_TAXONOMY`] fixes
//! both the shape of the tree and the order siblings are tried in. The
//! classifier walks it, and [`ValueKind::parent`] reads it back, so the tree
//! is the only place the hierarchy is written down.

use std::fmt;

use super::opcode::ConstExprKind;

macro_rules! value_nodes {
    ($($node:ident => $name:literal,)*) => {
        /// Capability predicate: "is this value an instance of the class?".
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Probe {
            $($node,)*
        }

        impl Probe {
            /// Every predicate the native library must answer.
            pub const ALL: &'static [Probe] = &[$(Probe::$node,)*];

            /// Name of the native class the predicate tests for.
            pub const fn class_name(self) -> &'static str {
                match self {
                    $(Probe::$node => $name,)*
                }
            }

            /// The kind a value gets when this probe is the deepest match.
            pub const fn kind(self) -> ValueKind {
                match self {
                    $(Probe::$node => ValueKind::$node,)*
                }
            }
        }

        /// Classified value variant.
        ///
        /// Leaves and abstract categories share the enum: a value that
        /// matches a category but none of its children is classified at the
        /// category. `Value` is the abstract root, only produced under
        /// [`UnknownValuePolicy::Tolerate`](crate::UnknownValuePolicy::Tolerate).
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum ValueKind {
            Value,
            $($node,)*
            ConstExpr(ConstExprKind),
        }

        impl ValueKind {
            /// Native class name of the variant.
            pub const fn name(self) -> &'static str {
                match self {
                    ValueKind::Value => "Value",
                    $(ValueKind::$node => $name,)*
                    ValueKind::ConstExpr(_) => "ConstantExpr",
                }
            }

            /// The probe that selects this kind, if any.
            pub const fn probe(self) -> Option<Probe> {
                match self {
                    $(ValueKind::$node => Some(Probe::$node),)*
                    ValueKind::Value | ValueKind::ConstExpr(_) => None,
                }
            }
        }
    };
}

value_nodes! {
    Argument => "Argument",
    BasicBlock => "BasicBlock",
    InlineAsm => "InlineAsm",
    MdNode => "MDNode",
    MdString => "MDString",
    User => "User",
    Constant => "Constant",
    BlockAddress => "BlockAddress",
    ConstantAggregateZero => "ConstantAggregateZero",
    ConstantArray => "ConstantArray",
    ConstantDataSequential => "ConstantDataSequential",
    ConstantDataArray => "ConstantDataArray",
    ConstantDataVector => "ConstantDataVector",
    ConstantExpr => "ConstantExpr",
    ConstantFp => "ConstantFP",
    ConstantInt => "ConstantInt",
    ConstantPointerNull => "ConstantPointerNull",
    ConstantStruct => "ConstantStruct",
    ConstantTokenNone => "ConstantTokenNone",
    ConstantVector => "ConstantVector",
    GlobalValue => "GlobalValue",
    GlobalAlias => "GlobalAlias",
    GlobalObject => "GlobalObject",
    Function => "Function",
    GlobalVariable => "GlobalVariable",
    GlobalIFunc => "GlobalIFunc",
    PoisonValue => "PoisonValue",
    UndefValue => "UndefValue",
    Instruction => "Instruction",
    UnaryOperator => "UnaryOperator",
    BinaryOperator => "BinaryOperator",
    CallInst => "CallInst",
    IntrinsicInst => "IntrinsicInst",
    DbgInfoIntrinsic => "DbgInfoIntrinsic",
    DbgVariableIntrinsic => "DbgVariableIntrinsic",
    DbgDeclareInst => "DbgDeclareInst",
    DbgLabelInst => "DbgLabelInst",
    MemIntrinsic => "MemIntrinsic",
    MemCpyInst => "MemCpyInst",
    MemMoveInst => "MemMoveInst",
    MemSetInst => "MemSetInst",
    CmpInst => "CmpInst",
    FCmpInst => "FCmpInst",
    ICmpInst => "ICmpInst",
    ExtractElementInst => "ExtractElementInst",
    GetElementPtrInst => "GetElementPtrInst",
    InsertElementInst => "InsertElementInst",
    InsertValueInst => "InsertValueInst",
    LandingPadInst => "LandingPadInst",
    PhiNode => "PHINode",
    SelectInst => "SelectInst",
    ShuffleVectorInst => "ShuffleVectorInst",
    StoreInst => "StoreInst",
    TerminatorInst => "TerminatorInst",
    BranchInst => "BranchInst",
    IndirectBrInst => "IndirectBrInst",
    InvokeInst => "InvokeInst",
    ReturnInst => "ReturnInst",
    SwitchInst => "SwitchInst",
    UnreachableInst => "UnreachableInst",
    ResumeInst => "ResumeInst",
    CleanupReturnInst => "CleanupReturnInst",
    CatchReturnInst => "CatchReturnInst",
    CatchSwitchInst => "CatchSwitchInst",
    CallBrInst => "CallBrInst",
    FuncletPadInst => "FuncletPadInst",
    CatchPadInst => "CatchPadInst",
    CleanupPadInst => "CleanupPadInst",
    UnaryInstruction => "UnaryInstruction",
    AllocaInst => "AllocaInst",
    CastInst => "CastInst",
    AddrSpaceCastInst => "AddrSpaceCastInst",
    BitCastInst => "BitCastInst",
    FpExtInst => "FPExtInst",
    FpToSiInst => "FPToSIInst",
    FpToUiInst => "FPToUIInst",
    FpTruncInst => "FPTruncInst",
    IntToPtrInst => "IntToPtrInst",
    PtrToIntInst => "PtrToIntInst",
    SExtInst => "SExtInst",
    SiToFpInst => "SIToFPInst",
    TruncInst => "TruncInst",
    UiToFpInst => "UIToFPInst",
    ZExtInst => "ZExtInst",
    ExtractValueInst => "ExtractValueInst",
    LoadInst => "LoadInst",
    VaArgInst => "VAArgInst",
    FreezeInst => "FreezeInst",
    AtomicCmpXchgInst => "AtomicCmpXchgInst",
    AtomicRmwInst => "AtomicRMWInst",
    FenceInst => "FenceInst",
}

/// Node of the value decision tree.
#[derive(Debug)]
pub struct TaxonomyNode {
    pub probe: Probe,
    /// Tried in order once `probe` has matched.
    pub children: &'static [TaxonomyNode],
}

macro_rules! tree {
    ($($probe:ident $({ $($children:tt)* })?),* $(,)?) => {
        &[$(TaxonomyNode {
            probe: Probe::$probe,
            children: tree!(@children $({ $($children)* })?),
        }),*]
    };
    (@children) => { &[] };
    (@children { $($children:tt)* }) => { tree!($($children)*) };
}

/// The value decision tree, top level first.
///
/// Sibling order matters where the native hierarchy nests classes that
/// look like siblings here: `PoisonValue` is an `UndefValue`, so it must be
/// probed first.
pub static VALUE_TAXONOMY: &[TaxonomyNode] = tree![
    Argument,
    BasicBlock,
    InlineAsm,
    MdNode,
    MdString,
    User {
        Constant {
            BlockAddress,
            ConstantAggregateZero,
            ConstantArray,
            ConstantDataSequential {
                ConstantDataArray,
                ConstantDataVector,
            },
            ConstantExpr,
            ConstantFp,
            ConstantInt,
            ConstantPointerNull,
            ConstantStruct,
            ConstantTokenNone,
            ConstantVector,
            GlobalValue {
                GlobalAlias,
                GlobalObject {
                    Function,
                    GlobalVariable,
                    GlobalIFunc,
                },
            },
            PoisonValue,
            UndefValue,
        },
        Instruction {
            UnaryOperator,
            BinaryOperator,
            CallInst {
                IntrinsicInst {
                    DbgInfoIntrinsic {
                        DbgVariableIntrinsic {
                            DbgDeclareInst,
                        },
                        DbgLabelInst,
                    },
                    MemIntrinsic {
                        MemCpyInst,
                        MemMoveInst,
                        MemSetInst,
                    },
                },
            },
            CmpInst {
                FCmpInst,
                ICmpInst,
            },
            ExtractElementInst,
            GetElementPtrInst,
            InsertElementInst,
            InsertValueInst,
            LandingPadInst,
            PhiNode,
            SelectInst,
            ShuffleVectorInst,
            StoreInst,
            TerminatorInst {
                BranchInst,
                IndirectBrInst,
                InvokeInst,
                ReturnInst,
                SwitchInst,
                UnreachableInst,
                ResumeInst,
                CleanupReturnInst,
                CatchReturnInst,
                CatchSwitchInst,
                CallBrInst,
            },
            FuncletPadInst {
                CatchPadInst,
                CleanupPadInst,
            },
            UnaryInstruction {
                AllocaInst,
                CastInst {
                    AddrSpaceCastInst,
                    BitCastInst,
                    FpExtInst,
                    FpToSiInst,
                    FpToUiInst,
                    FpTruncInst,
                    IntToPtrInst,
                    PtrToIntInst,
                    SExtInst,
                    SiToFpInst,
                    TruncInst,
                    UiToFpInst,
                    ZExtInst,
                },
                ExtractValueInst,
                LoadInst,
                VaArgInst,
                FreezeInst,
            },
            AtomicCmpXchgInst,
            AtomicRmwInst,
            FenceInst,
        },
    },
];

/// Find the parent kind of `target` below `nodes`, whose own parent is `parent`.
fn parent_in(nodes: &'static [TaxonomyNode], target: Probe, parent: ValueKind) -> Option<ValueKind> {
    for node in nodes {
        if node.probe == target {
            return Some(parent);
        }
        if let Some(found) = parent_in(node.children, target, node.probe.kind()) {
            return Some(found);
        }
    }
    None
}

impl ValueKind {
    /// Immediate parent category; `None` only for the root.
    pub fn parent(self) -> Option<ValueKind> {
        match self {
            ValueKind::Value => None,
            ValueKind::ConstExpr(_) => Some(ValueKind::ConstantExpr),
            other => {
                let probe = other.probe()?;
                parent_in(VALUE_TAXONOMY, probe, ValueKind::Value)
            }
        }
    }

    /// Parent, grandparent, ... up to and including `Value`.
    pub fn ancestors(self) -> impl Iterator<Item = ValueKind> {
        std::iter::successors(self.parent(), |kind| kind.parent())
    }

    /// True if `self` is `category` or descends from it.
    pub fn is_a(self, category: ValueKind) -> bool {
        self == category || self.ancestors().any(|kind| kind == category)
    }

    /// True for categories with children in the tree.
    pub fn is_abstract(self) -> bool {
        match self {
            ValueKind::Value | ValueKind::ConstantExpr => true,
            ValueKind::ConstExpr(_) => false,
            other => other
                .probe()
                .and_then(|probe| find_node(VALUE_TAXONOMY, probe))
                .is_some_and(|node| !node.children.is_empty()),
        }
    }

    /// The constant-expression leaf, if this is one.
    pub const fn const_expr(self) -> Option<ConstExprKind> {
        match self {
            ValueKind::ConstExpr(kind) => Some(kind),
            _ => None,
        }
    }
}

fn find_node(nodes: &'static [TaxonomyNode], target: Probe) -> Option<&'static TaxonomyNode> {
    nodes.iter().find_map(|node| {
        if node.probe == target {
            Some(node)
        } else {
            find_node(node.children, target)
        }
    })
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::ConstExpr(kind) => fmt::Display::fmt(kind, f),
            other => f.write_str(other.name()),
        }
    }
}
