//! Basic blocks and their two native shapes.
//!
//! The native library hands out a basic block either as a value
//! (`LLVMValueRef`) or as a block (`LLVMBasicBlockRef`), at different
//! addresses. The canonical wrapper is keyed by the value-shaped handle;
//! the block-shaped one is converted on first use and kept on the wrapper.
//! Block navigation and mutation use the block shape, generic value
//! operations (type, name, users) the value shape.

use smallvec::SmallVec;
use tracing::trace;

use crate::context::Context;
use crate::handle::BlockRef;
use crate::taxonomy::ValueKind;
use crate::value::Value;
use crate::variant::{sealed, AsValue, Instruction, Terminator, ValueVariant};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BasicBlock(Value);

impl sealed::Sealed for BasicBlock {
    fn wrap(value: Value) -> Self {
        Self(value)
    }
}

impl AsValue for BasicBlock {
    fn as_value(&self) -> &Value {
        &self.0
    }
}

impl ValueVariant for BasicBlock {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::BasicBlock
    }
}

impl Context {
    /// Canonical wrapper for a block-shaped handle; `None` for null.
    ///
    /// Goes through the value gate, so the result is the same object as
    /// `value(basic_block_as_value(block))`.
    pub fn basic_block(&self, block: BlockRef) -> Option<BasicBlock> {
        let block = block.non_null()?;
        let value = self.value(self.native().basic_block_as_value(block))?;
        let bb = value.downcast::<BasicBlock>()?;
        // Already known; spares the conversion later. Keeps the first value
        // if one was cached.
        let _ = bb.0.block_slot().set(block);
        Some(bb)
    }
}

impl BasicBlock {
    /// The block-shaped handle, converted once per wrapper.
    pub fn block_ref(&self) -> BlockRef {
        *self.0.block_slot().get_or_init(|| {
            let block = self.0.native().value_as_basic_block(self.0.handle());
            trace!(value = ?self.0.handle(), ?block, "converted block handle");
            block
        })
    }

    pub fn context(&self) -> &Context {
        self.0.context()
    }

    pub fn name(&self) -> String {
        self.0.name()
    }

    /// The function containing this block.
    pub fn parent(&self) -> Option<Value> {
        let func = self.0.native().block_parent(self.block_ref());
        self.context().value(func)
    }

    /// `None` while the block is not yet terminated.
    pub fn terminator(&self) -> Option<Terminator> {
        let term = self.0.native().block_terminator(self.block_ref());
        self.context().value(term)?.downcast()
    }

    pub fn successors(&self) -> SmallVec<[BasicBlock; 2]> {
        self.terminator()
            .map(|term| term.successors())
            .unwrap_or_default()
    }

    /// Blocks whose terminator branches here, each listed once in
    /// first-seen use order.
    pub fn predecessors(&self) -> SmallVec<[BasicBlock; 4]> {
        let mut preds: SmallVec<[BasicBlock; 4]> = SmallVec::new();
        for user in self.0.users() {
            if !user.is_a(ValueKind::TerminatorInst) {
                continue;
            }
            let Some(parent) = user
                .downcast::<Instruction>()
                .and_then(|inst| inst.parent_block())
            else {
                continue;
            };
            if !preds.contains(&parent) {
                preds.push(parent);
            }
        }
        preds
    }

    pub fn next(&self) -> Option<BasicBlock> {
        let next = self.0.native().next_block(self.block_ref());
        self.context().basic_block(next)
    }

    pub fn previous(&self) -> Option<BasicBlock> {
        let prev = self.0.native().previous_block(self.block_ref());
        self.context().basic_block(prev)
    }

    pub fn first_instruction(&self) -> Option<Value> {
        let first = self.0.native().first_instruction(self.block_ref());
        self.context().value(first)
    }

    pub fn last_instruction(&self) -> Option<Value> {
        let last = self.0.native().last_instruction(self.block_ref());
        self.context().value(last)
    }

    /// Instructions in order.
    pub fn instructions(&self) -> impl Iterator<Item = Value> {
        std::iter::successors(self.first_instruction(), |inst| {
            inst.downcast::<Instruction>()?.next_instruction()
        })
    }

    /// Move this block right before `position` in the function layout.
    pub fn move_before(&self, position: &BasicBlock) {
        self.0
            .native()
            .move_block_before(self.block_ref(), position.block_ref());
    }

    /// Move this block right after `position` in the function layout.
    pub fn move_after(&self, position: &BasicBlock) {
        self.0
            .native()
            .move_block_after(self.block_ref(), position.block_ref());
    }

    /// Create a new empty block right before this one.
    pub fn insert_before(&self, name: &str) -> Option<BasicBlock> {
        let cx = self.context();
        let block = self
            .0
            .native()
            .insert_block_before(cx.raw(), self.block_ref(), name);
        cx.basic_block(block)
    }

    /// Delete the native block and drop it, and every instruction it
    /// contains, from the value cache.
    ///
    /// Other clones of these wrappers keep existing but must not be used:
    /// their handles dangle.
    pub fn delete(self) {
        let native = self.0.native();
        let cx = self.context();
        let block = self.block_ref();
        trace!(value = ?self.0.handle(), ?block, "deleting block");

        // Walked natively so deletion does not classify anything.
        let mut inst = native.first_instruction(block);
        while let Some(current) = inst.non_null() {
            inst = native.next_instruction(current);
            cx.forget_value(current);
        }
        cx.forget_value(self.0.handle());
        native.delete_block(block);
    }
}

impl std::fmt::Debug for BasicBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}
