//! LLVM 17 implementation of [`irbind::NativeApi`] over `llvm-sys`.
//!
//! Every method is a single C call with handle conversion on either side.
//! The caller keeps handles valid: a handle passed in must belong to a live
//! context, and mutating calls must not race with other users of the same
//! LLVM context (LLVM contexts are not thread-safe, only the wrapper caches
//! are).
//!
//! Handles reach this crate only through `unsafe` constructors, whose
//! contract ("null or a live object of this kind") is what every `SAFETY`
//! comment below leans on.
//!
//! # Usage
//!
//! ```ignore
//! let cx = irbind_llvm::create();
//! let raw = unsafe { LLVMInt32TypeInContext(cx.raw().as_ptr()) };
//! let i32_ty = cx.ty(unsafe { TypeRef::from_ptr(raw) });
//! ```

use std::sync::{Arc, OnceLock};

use llvm_sys::core::*;
use llvm_sys::prelude::{
    LLVMBasicBlockRef, LLVMContextRef, LLVMTypeRef, LLVMUseRef, LLVMValueRef,
};
use tracing::trace;

use irbind::{
    BlockRef, Context, ContextOptions, ContextRef, NativeApi, Probe, TypeRef, UseRef, ValueRef,
};

mod probe;

/// Stateless: all state lives in LLVM.
#[derive(Debug, Default, Clone, Copy)]
pub struct LlvmNative;

/// The one capability instance, so every binding of a given LLVM context
/// is registered under the same library.
fn native() -> Arc<dyn NativeApi> {
    static NATIVE: OnceLock<Arc<LlvmNative>> = OnceLock::new();
    NATIVE.get_or_init(|| Arc::new(LlvmNative)).clone()
}

/// A fresh LLVM context, disposed with the last wrapper.
///
/// Options come from the environment ([`ContextOptions::from_env`]).
pub fn create() -> Context {
    Context::with_options(native(), ContextOptions::from_env())
}

/// Bind an LLVM context owned elsewhere (for example by inkwell).
///
/// The binding never disposes `raw`. Attaching the same context again while
/// a binding is alive returns that binding.
///
/// # Safety
/// `raw` must be a live LLVM context that outlives every wrapper obtained
/// through the returned [`Context`].
pub unsafe fn attach(raw: LLVMContextRef) -> Context {
    // SAFETY: the caller guarantees `raw` is a live context.
    let raw = unsafe { ContextRef::from_ptr(raw) };
    Context::attach(native(), raw, ContextOptions::from_env())
}

// Conversions between the binding's handles and llvm-sys pointers.

fn cx(handle: ContextRef) -> LLVMContextRef {
    handle.as_ptr()
}

fn ty(handle: TypeRef) -> LLVMTypeRef {
    handle.as_ptr()
}

fn val(handle: ValueRef) -> LLVMValueRef {
    handle.as_ptr()
}

fn bb(handle: BlockRef) -> LLVMBasicBlockRef {
    handle.as_ptr()
}

fn use_(handle: UseRef) -> LLVMUseRef {
    handle.as_ptr()
}

// Every call below passes handles that are live by the handle contract
// and gets back either null or a live object of the kind it is wrapped as.
impl NativeApi for LlvmNative {
    fn create_context(&self) -> ContextRef {
        // SAFETY: LLVMContextCreate has no preconditions and returns a new context.
        unsafe { ContextRef::from_ptr(LLVMContextCreate()) }
    }

    fn dispose_context(&self, raw: ContextRef) {
        trace!(?raw, "LLVMContextDispose");
        // SAFETY: only called once, by the binding that created `raw`.
        unsafe { LLVMContextDispose(cx(raw)) }
    }

    fn type_kind(&self, t: TypeRef) -> u32 {
        // SAFETY: `t` is a live type.
        unsafe { LLVMGetTypeKind(ty(t)) as u32 }
    }

    fn int_type_width(&self, t: TypeRef) -> u32 {
        // SAFETY: `t` is a live type; only asked of integer types.
        unsafe { LLVMGetIntTypeWidth(ty(t)) }
    }

    fn is_a(&self, v: ValueRef, probe: Probe) -> bool {
        let predicate = probe::predicate(probe);
        // SAFETY: `v` is a live value; LLVMIsA* accepts any value.
        !unsafe { predicate(val(v)) }.is_null()
    }

    fn const_opcode(&self, v: ValueRef) -> u32 {
        // SAFETY: `v` is a live constant expression (checked by the classifier).
        unsafe { LLVMGetConstOpcode(val(v)) as u32 }
    }

    fn type_of(&self, v: ValueRef) -> TypeRef {
        // SAFETY: `v` is a live value; the result is its live type.
        unsafe { TypeRef::from_ptr(LLVMTypeOf(val(v))) }
    }

    fn value_name(&self, v: ValueRef) -> String {
        let mut len = 0usize;
        // SAFETY: `v` is a live value; `len` outlives the call.
        let ptr = unsafe { LLVMGetValueName2(val(v), &mut len) };
        if ptr.is_null() || len == 0 {
            return String::new();
        }
        // SAFETY: LLVM returns `len` readable bytes owned by the value,
        // which stays alive for the duration of the copy.
        let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) };
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn set_value_name(&self, v: ValueRef, name: &str) {
        // SAFETY: `v` is a live value. LLVMSetValueName2 copies exactly
        // `name.len()` bytes, so no NUL terminator is needed and the
        // pointer of an empty name is never read.
        unsafe { LLVMSetValueName2(val(v), name.as_ptr().cast(), name.len()) }
    }

    fn first_use(&self, v: ValueRef) -> UseRef {
        // SAFETY: `v` is a live value; the result is null or a live use.
        unsafe { UseRef::from_ptr(LLVMGetFirstUse(val(v))) }
    }

    fn next_use(&self, u: UseRef) -> UseRef {
        // SAFETY: `u` is a live use; the result is null or a live use.
        unsafe { UseRef::from_ptr(LLVMGetNextUse(use_(u))) }
    }

    fn use_user(&self, u: UseRef) -> ValueRef {
        // SAFETY: `u` is a live use; its user is a live value.
        unsafe { ValueRef::from_ptr(LLVMGetUser(use_(u))) }
    }

    fn instruction_opcode(&self, inst: ValueRef) -> u32 {
        // SAFETY: `inst` is a live instruction.
        unsafe { LLVMGetInstructionOpcode(val(inst)) as u32 }
    }

    fn instruction_parent(&self, inst: ValueRef) -> BlockRef {
        // SAFETY: `inst` is a live instruction; the result is null or its block.
        unsafe { BlockRef::from_ptr(LLVMGetInstructionParent(val(inst))) }
    }

    fn next_instruction(&self, inst: ValueRef) -> ValueRef {
        // SAFETY: `inst` is a live instruction; the result is null or live.
        unsafe { ValueRef::from_ptr(LLVMGetNextInstruction(val(inst))) }
    }

    fn is_volatile(&self, inst: ValueRef) -> bool {
        // SAFETY: `inst` is a live memory access (checked by its view).
        unsafe { LLVMGetVolatile(val(inst)) != 0 }
    }

    fn set_volatile(&self, inst: ValueRef, volatile: bool) {
        // SAFETY: `inst` is a live memory access (checked by its view).
        unsafe { LLVMSetVolatile(val(inst), i32::from(volatile)) }
    }

    fn icmp_predicate(&self, v: ValueRef) -> u32 {
        // SAFETY: `v` is a live integer comparison (checked by its view).
        unsafe { LLVMGetICmpPredicate(val(v)) as u32 }
    }

    fn fcmp_predicate(&self, v: ValueRef) -> u32 {
        // SAFETY: `v` is a live real comparison (checked by its view).
        unsafe { LLVMGetFCmpPredicate(val(v)) as u32 }
    }

    fn num_successors(&self, term: ValueRef) -> u32 {
        // SAFETY: `term` is a live terminator (checked by its view).
        unsafe { LLVMGetNumSuccessors(val(term)) }
    }

    fn successor(&self, term: ValueRef, index: u32) -> BlockRef {
        // SAFETY: `term` is a live terminator and `index` is below its
        // successor count.
        unsafe { BlockRef::from_ptr(LLVMGetSuccessor(val(term), index)) }
    }

    fn value_as_basic_block(&self, v: ValueRef) -> BlockRef {
        // SAFETY: `v` is a live value classified as a basic block.
        unsafe { BlockRef::from_ptr(LLVMValueAsBasicBlock(val(v))) }
    }

    fn basic_block_as_value(&self, block: BlockRef) -> ValueRef {
        // SAFETY: `block` is a live block.
        unsafe { ValueRef::from_ptr(LLVMBasicBlockAsValue(bb(block))) }
    }

    fn block_parent(&self, block: BlockRef) -> ValueRef {
        // SAFETY: `block` is a live block; the result is null or its function.
        unsafe { ValueRef::from_ptr(LLVMGetBasicBlockParent(bb(block))) }
    }

    fn block_terminator(&self, block: BlockRef) -> ValueRef {
        // SAFETY: `block` is a live block; the result is null or live.
        unsafe { ValueRef::from_ptr(LLVMGetBasicBlockTerminator(bb(block))) }
    }

    fn next_block(&self, block: BlockRef) -> BlockRef {
        // SAFETY: `block` is a live block; the result is null or live.
        unsafe { BlockRef::from_ptr(LLVMGetNextBasicBlock(bb(block))) }
    }

    fn previous_block(&self, block: BlockRef) -> BlockRef {
        // SAFETY: `block` is a live block; the result is null or live.
        unsafe { BlockRef::from_ptr(LLVMGetPreviousBasicBlock(bb(block))) }
    }

    fn first_instruction(&self, block: BlockRef) -> ValueRef {
        // SAFETY: `block` is a live block; the result is null or live.
        unsafe { ValueRef::from_ptr(LLVMGetFirstInstruction(bb(block))) }
    }

    fn last_instruction(&self, block: BlockRef) -> ValueRef {
        // SAFETY: `block` is a live block; the result is null or live.
        unsafe { ValueRef::from_ptr(LLVMGetLastInstruction(bb(block))) }
    }

    fn move_block_before(&self, block: BlockRef, position: BlockRef) {
        // SAFETY: both blocks are live.
        unsafe { LLVMMoveBasicBlockBefore(bb(block), bb(position)) }
    }

    fn move_block_after(&self, block: BlockRef, position: BlockRef) {
        // SAFETY: both blocks are live.
        unsafe { LLVMMoveBasicBlockAfter(bb(block), bb(position)) }
    }

    fn insert_block_before(&self, raw: ContextRef, before: BlockRef, name: &str) -> BlockRef {
        // SAFETY: `raw` and `before` are live, and `c""` is NUL-terminated.
        // The block is created unnamed and named afterwards so names with
        // interior NULs survive intact.
        let block = unsafe { LLVMInsertBasicBlockInContext(cx(raw), bb(before), c"".as_ptr()) };
        // SAFETY: `block` was just created. LLVMSetValueName2 copies exactly
        // `name.len()` bytes, so no CString is needed, even for "".
        unsafe { LLVMSetValueName2(LLVMBasicBlockAsValue(block), name.as_ptr().cast(), name.len()) };
        // SAFETY: freshly created and owned by `raw`.
        unsafe { BlockRef::from_ptr(block) }
    }

    fn delete_block(&self, block: BlockRef) {
        // SAFETY: `block` is live; the binding forgets its cached wrappers
        // before this call and never uses the handle again.
        unsafe { LLVMDeleteBasicBlock(bb(block)) }
    }
}
