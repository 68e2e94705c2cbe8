//! The native capability.
//!
//! Every foreign call made on behalf of a wrapper goes through
//! [`NativeApi`]. A [`Context`](crate::Context) holds the capability as an
//! injected `Arc<dyn NativeApi>`; the caches and classifiers never link the
//! native library themselves. `irbind_llvm` provides the LLVM implementation.
//!
//! Methods mirror single LLVM-C entry points. Null results are returned as
//! null handles, never as errors.

use crate::handle::{BlockRef, ContextRef, TypeRef, UseRef, ValueRef};
use crate::taxonomy::Probe;

pub trait NativeApi: Send + Sync {
    // -- Contexts --

    /// `LLVMContextCreate`.
    fn create_context(&self) -> ContextRef;

    /// `LLVMContextDispose`. Invalidates every handle created under `cx`.
    fn dispose_context(&self, cx: ContextRef);

    // -- Types --

    /// Raw `LLVMGetTypeKind`.
    fn type_kind(&self, ty: TypeRef) -> u32;

    /// `LLVMGetIntTypeWidth`. Only meaningful for integer types.
    fn int_type_width(&self, ty: TypeRef) -> u32;

    // -- Classification --

    /// The `LLVMIsA*` predicate selected by `probe`.
    fn is_a(&self, value: ValueRef, probe: Probe) -> bool;

    /// Raw `LLVMGetConstOpcode`. Only meaningful for constant expressions.
    fn const_opcode(&self, value: ValueRef) -> u32;

    // -- Values --

    /// `LLVMTypeOf`.
    fn type_of(&self, value: ValueRef) -> TypeRef;

    /// `LLVMGetValueName2`.
    fn value_name(&self, value: ValueRef) -> String;

    /// `LLVMSetValueName2`.
    fn set_value_name(&self, value: ValueRef, name: &str);

    /// `LLVMGetFirstUse`.
    fn first_use(&self, value: ValueRef) -> UseRef;

    /// `LLVMGetNextUse`.
    fn next_use(&self, u: UseRef) -> UseRef;

    /// `LLVMGetUser`.
    fn use_user(&self, u: UseRef) -> ValueRef;

    // -- Instructions --

    /// Raw `LLVMGetInstructionOpcode`.
    fn instruction_opcode(&self, inst: ValueRef) -> u32;

    /// `LLVMGetInstructionParent`.
    fn instruction_parent(&self, inst: ValueRef) -> BlockRef;

    /// `LLVMGetNextInstruction`.
    fn next_instruction(&self, inst: ValueRef) -> ValueRef;

    /// `LLVMGetVolatile`.
    fn is_volatile(&self, inst: ValueRef) -> bool;

    /// `LLVMSetVolatile`.
    fn set_volatile(&self, inst: ValueRef, volatile: bool);

    /// Raw `LLVMGetICmpPredicate`.
    fn icmp_predicate(&self, value: ValueRef) -> u32;

    /// Raw `LLVMGetFCmpPredicate`.
    fn fcmp_predicate(&self, value: ValueRef) -> u32;

    /// `LLVMGetNumSuccessors`.
    fn num_successors(&self, term: ValueRef) -> u32;

    /// `LLVMGetSuccessor`.
    fn successor(&self, term: ValueRef, index: u32) -> BlockRef;

    // -- Basic blocks --

    /// `LLVMValueAsBasicBlock`.
    fn value_as_basic_block(&self, value: ValueRef) -> BlockRef;

    /// `LLVMBasicBlockAsValue`.
    fn basic_block_as_value(&self, block: BlockRef) -> ValueRef;

    /// `LLVMGetBasicBlockParent`.
    fn block_parent(&self, block: BlockRef) -> ValueRef;

    /// `LLVMGetBasicBlockTerminator`.
    fn block_terminator(&self, block: BlockRef) -> ValueRef;

    /// `LLVMGetNextBasicBlock`.
    fn next_block(&self, block: BlockRef) -> BlockRef;

    /// `LLVMGetPreviousBasicBlock`.
    fn previous_block(&self, block: BlockRef) -> BlockRef;

    /// `LLVMGetFirstInstruction`.
    fn first_instruction(&self, block: BlockRef) -> ValueRef;

    /// `LLVMGetLastInstruction`.
    fn last_instruction(&self, block: BlockRef) -> ValueRef;

    /// `LLVMMoveBasicBlockBefore`.
    fn move_block_before(&self, block: BlockRef, position: BlockRef);

    /// `LLVMMoveBasicBlockAfter`.
    fn move_block_after(&self, block: BlockRef, position: BlockRef);

    /// `LLVMInsertBasicBlockInContext`.
    fn insert_block_before(&self, cx: ContextRef, before: BlockRef, name: &str) -> BlockRef;

    /// `LLVMDeleteBasicBlock`. The block's handles dangle afterwards.
    fn delete_block(&self, block: BlockRef);
}
