//! In-memory stand-in for the native library.
//!
//! Values are described by the exact set of probes they answer `true` to,
//! so tests state the class hierarchy of each fixture explicitly. Call
//! counters let tests check which foreign calls a gate made. Only compiled
//! in test builds.

#![allow(unsafe_code, reason = "the fake mints handles for objects it owns")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::{Context, ContextOptions};
use crate::handle::{BlockRef, ContextRef, TypeRef, UseRef, ValueRef};
use crate::native::NativeApi;
use crate::taxonomy::{Opcode, Probe, TypeKind};

const BASE_ADDR: usize = 0x7f00_0000_1000;
const ADDR_STRIDE: usize = 0x40;

struct FakeType {
    raw_kind: u32,
    width: u32,
}

#[derive(Default)]
struct FakeValue {
    probes: Vec<Probe>,
    opcode: u32,
    ty: TypeRef,
    name: String,
    volatile: bool,
    predicate: u32,
    /// Containing block, for instructions.
    parent: BlockRef,
    successors: Vec<BlockRef>,
    uses: Vec<UseRef>,
}

struct FakeBlock {
    value: ValueRef,
    function: ValueRef,
    instructions: Vec<ValueRef>,
}

struct FakeUse {
    used: ValueRef,
    user: ValueRef,
}

#[derive(Default)]
struct FakeState {
    allocated: usize,
    live_contexts: FxHashSet<ContextRef>,
    disposed: Vec<ContextRef>,
    types: FxHashMap<TypeRef, FakeType>,
    int_types: FxHashMap<(ContextRef, u32), TypeRef>,
    values: FxHashMap<ValueRef, FakeValue>,
    blocks: FxHashMap<BlockRef, FakeBlock>,
    /// Block order per function.
    layouts: FxHashMap<ValueRef, Vec<BlockRef>>,
    uses: FxHashMap<UseRef, FakeUse>,
}

impl FakeState {
    fn alloc(&mut self) -> usize {
        self.allocated += 1;
        BASE_ADDR + self.allocated * ADDR_STRIDE
    }

    fn add_value(&mut self, value: FakeValue) -> ValueRef {
        // SAFETY: the address is live in `values` until deleted.
        let handle = unsafe { ValueRef::from_addr(self.alloc()) };
        self.values.insert(handle, value);
        handle
    }

    fn add_use(&mut self, used: ValueRef, user: ValueRef) -> UseRef {
        // SAFETY: live in `uses`.
        let u = unsafe { UseRef::from_addr(self.alloc()) };
        self.uses.insert(u, FakeUse { used, user });
        if let Some(value) = self.values.get_mut(&used) {
            value.uses.push(u);
        }
        u
    }

    fn block_position(&self, block: BlockRef) -> Option<(ValueRef, usize)> {
        let function = self.blocks.get(&block)?.function;
        let index = self.layouts.get(&function)?.iter().position(|&b| b == block)?;
        Some((function, index))
    }

    fn detach_block(&mut self, block: BlockRef) -> Option<ValueRef> {
        let (function, index) = self.block_position(block)?;
        self.layouts.get_mut(&function)?.remove(index);
        Some(function)
    }

    fn block_at(&self, block: BlockRef, offset: isize) -> BlockRef {
        self.block_position(block)
            .and_then(|(function, index)| {
                let target = index.checked_add_signed(offset)?;
                self.layouts.get(&function)?.get(target).copied()
            })
            .unwrap_or(BlockRef::NULL)
    }
}

#[derive(Default)]
pub(crate) struct FakeNative {
    state: Mutex<FakeState>,
    probe_calls: AtomicUsize,
    type_kind_calls: AtomicUsize,
    conversions: AtomicUsize,
    probe_log: Mutex<Vec<Probe>>,
}

impl FakeNative {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // -- Counters --

    /// Number of `is_a` calls so far.
    pub(crate) fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn type_kind_calls(&self) -> usize {
        self.type_kind_calls.load(Ordering::SeqCst)
    }

    /// Number of value→block conversions so far.
    pub(crate) fn conversions(&self) -> usize {
        self.conversions.load(Ordering::SeqCst)
    }

    /// Probes asked since the last call, in order.
    pub(crate) fn take_probe_log(&self) -> Vec<Probe> {
        std::mem::take(&mut *self.probe_log.lock())
    }

    pub(crate) fn disposed(&self) -> Vec<ContextRef> {
        self.state.lock().disposed.clone()
    }

    // -- Types --

    /// Integer type, deduplicated per context and width like the real library.
    pub(crate) fn int_type(&self, cx: ContextRef, width: u32) -> TypeRef {
        let mut state = self.state.lock();
        if let Some(&ty) = state.int_types.get(&(cx, width)) {
            return ty;
        }
        // SAFETY: live in `types`.
        let ty = unsafe { TypeRef::from_addr(state.alloc()) };
        state.types.insert(
            ty,
            FakeType {
                raw_kind: TypeKind::Integer.to_raw(),
                width,
            },
        );
        state.int_types.insert((cx, width), ty);
        ty
    }

    /// Type with an arbitrary raw kind, never deduplicated.
    pub(crate) fn raw_type(&self, raw_kind: u32) -> TypeRef {
        let mut state = self.state.lock();
        // SAFETY: live in `types`.
        let ty = unsafe { TypeRef::from_addr(state.alloc()) };
        state.types.insert(ty, FakeType { raw_kind, width: 0 });
        ty
    }

    // -- Values --

    /// Free-standing value answering exactly `probes`.
    pub(crate) fn value(&self, probes: &[Probe]) -> ValueRef {
        self.state.lock().add_value(FakeValue {
            probes: probes.to_vec(),
            ..FakeValue::default()
        })
    }

    /// Constant expression with a raw opcode.
    pub(crate) fn const_expr(&self, raw_opcode: u32) -> ValueRef {
        self.state.lock().add_value(FakeValue {
            probes: vec![Probe::User, Probe::Constant, Probe::ConstantExpr],
            opcode: raw_opcode,
            ..FakeValue::default()
        })
    }

    pub(crate) fn function(&self) -> ValueRef {
        let mut state = self.state.lock();
        let func = state.add_value(FakeValue {
            probes: vec![
                Probe::User,
                Probe::Constant,
                Probe::GlobalValue,
                Probe::GlobalObject,
                Probe::Function,
            ],
            ..FakeValue::default()
        });
        state.layouts.insert(func, Vec::new());
        func
    }

    /// Append an empty block to `function`.
    pub(crate) fn append_block(&self, function: ValueRef, name: &str) -> BlockRef {
        let mut state = self.state.lock();
        let block = Self::new_block(&mut state, function, name);
        state.layouts.entry(function).or_default().push(block);
        block
    }

    fn new_block(state: &mut FakeState, function: ValueRef, name: &str) -> BlockRef {
        let value = state.add_value(FakeValue {
            probes: vec![Probe::BasicBlock],
            name: name.to_owned(),
            ..FakeValue::default()
        });
        // SAFETY: live in `blocks` until deleted.
        let block = unsafe { BlockRef::from_addr(state.alloc()) };
        state.blocks.insert(
            block,
            FakeBlock {
                value,
                function,
                instructions: Vec::new(),
            },
        );
        block
    }

    /// Value-shaped handle of `block`, without counting a conversion.
    pub(crate) fn block_value(&self, block: BlockRef) -> ValueRef {
        self.state
            .lock()
            .blocks
            .get(&block)
            .map_or(ValueRef::NULL, |b| b.value)
    }

    /// Append an instruction to `block`. `User` and `Instruction` are implied.
    pub(crate) fn instruction(&self, block: BlockRef, probes: &[Probe], opcode: Opcode) -> ValueRef {
        let mut state = self.state.lock();
        let mut all = vec![Probe::User, Probe::Instruction];
        all.extend_from_slice(probes);
        let inst = state.add_value(FakeValue {
            probes: all,
            opcode: opcode.to_raw(),
            parent: block,
            ..FakeValue::default()
        });
        if let Some(b) = state.blocks.get_mut(&block) {
            b.instructions.push(inst);
        }
        inst
    }

    /// Terminate `block` with a branch to `targets`.
    pub(crate) fn branch(&self, block: BlockRef, targets: &[BlockRef]) -> ValueRef {
        let term = self.instruction(
            block,
            &[Probe::TerminatorInst, Probe::BranchInst],
            Opcode::Br,
        );
        let mut state = self.state.lock();
        if let Some(value) = state.values.get_mut(&term) {
            value.successors = targets.to_vec();
        }
        for target in targets {
            let Some(target_value) = state.blocks.get(target).map(|b| b.value) else {
                continue;
            };
            state.add_use(target_value, term);
        }
        term
    }

    /// Put a fresh free-standing value at the address of a destroyed one,
    /// the way an allocator reuses freed memory.
    pub(crate) fn reuse_address(&self, dead: ValueRef, probes: &[Probe]) {
        let mut state = self.state.lock();
        assert!(!state.values.contains_key(&dead), "{dead:?} is still live");
        state.values.insert(
            dead,
            FakeValue {
                probes: probes.to_vec(),
                ..FakeValue::default()
            },
        );
    }

    pub(crate) fn value_exists(&self, value: ValueRef) -> bool {
        self.state.lock().values.contains_key(&value)
    }

    /// Record that `user` uses `used`.
    pub(crate) fn add_use(&self, used: ValueRef, user: ValueRef) -> UseRef {
        self.state.lock().add_use(used, user)
    }

    pub(crate) fn set_type(&self, value: ValueRef, ty: TypeRef) {
        if let Some(v) = self.state.lock().values.get_mut(&value) {
            v.ty = ty;
        }
    }

    pub(crate) fn set_predicate(&self, value: ValueRef, raw: u32) {
        if let Some(v) = self.state.lock().values.get_mut(&value) {
            v.predicate = raw;
        }
    }

    pub(crate) fn layout(&self, function: ValueRef) -> Vec<BlockRef> {
        self.state
            .lock()
            .layouts
            .get(&function)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn block_exists(&self, block: BlockRef) -> bool {
        self.state.lock().blocks.contains_key(&block)
    }
}

impl NativeApi for FakeNative {
    fn create_context(&self) -> ContextRef {
        let mut state = self.state.lock();
        // SAFETY: live in `live_contexts` until disposed.
        let cx = unsafe { ContextRef::from_addr(state.alloc()) };
        state.live_contexts.insert(cx);
        cx
    }

    fn dispose_context(&self, cx: ContextRef) {
        let mut state = self.state.lock();
        state.live_contexts.remove(&cx);
        state.disposed.push(cx);
    }

    fn type_kind(&self, ty: TypeRef) -> u32 {
        self.type_kind_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .types
            .get(&ty)
            .map_or(u32::MAX, |t| t.raw_kind)
    }

    fn int_type_width(&self, ty: TypeRef) -> u32 {
        self.state.lock().types.get(&ty).map_or(0, |t| t.width)
    }

    fn is_a(&self, value: ValueRef, probe: Probe) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probe_log.lock().push(probe);
        self.state
            .lock()
            .values
            .get(&value)
            .is_some_and(|v| v.probes.contains(&probe))
    }

    fn const_opcode(&self, value: ValueRef) -> u32 {
        self.state.lock().values.get(&value).map_or(0, |v| v.opcode)
    }

    fn type_of(&self, value: ValueRef) -> TypeRef {
        self.state
            .lock()
            .values
            .get(&value)
            .map_or(TypeRef::NULL, |v| v.ty)
    }

    fn value_name(&self, value: ValueRef) -> String {
        self.state
            .lock()
            .values
            .get(&value)
            .map(|v| v.name.clone())
            .unwrap_or_default()
    }

    fn set_value_name(&self, value: ValueRef, name: &str) {
        if let Some(v) = self.state.lock().values.get_mut(&value) {
            v.name = name.to_owned();
        }
    }

    fn first_use(&self, value: ValueRef) -> UseRef {
        self.state
            .lock()
            .values
            .get(&value)
            .and_then(|v| v.uses.first().copied())
            .unwrap_or(UseRef::NULL)
    }

    fn next_use(&self, u: UseRef) -> UseRef {
        let state = self.state.lock();
        let Some(used) = state.uses.get(&u).map(|fake| fake.used) else {
            return UseRef::NULL;
        };
        state
            .values
            .get(&used)
            .and_then(|v| {
                let index = v.uses.iter().position(|&x| x == u)?;
                v.uses.get(index + 1).copied()
            })
            .unwrap_or(UseRef::NULL)
    }

    fn use_user(&self, u: UseRef) -> ValueRef {
        self.state
            .lock()
            .uses
            .get(&u)
            .map_or(ValueRef::NULL, |fake| fake.user)
    }

    fn instruction_opcode(&self, inst: ValueRef) -> u32 {
        self.const_opcode(inst)
    }

    fn instruction_parent(&self, inst: ValueRef) -> BlockRef {
        self.state
            .lock()
            .values
            .get(&inst)
            .map_or(BlockRef::NULL, |v| v.parent)
    }

    fn next_instruction(&self, inst: ValueRef) -> ValueRef {
        let state = self.state.lock();
        let Some(parent) = state.values.get(&inst).map(|v| v.parent) else {
            return ValueRef::NULL;
        };
        state
            .blocks
            .get(&parent)
            .and_then(|b| {
                let index = b.instructions.iter().position(|&i| i == inst)?;
                b.instructions.get(index + 1).copied()
            })
            .unwrap_or(ValueRef::NULL)
    }

    fn is_volatile(&self, inst: ValueRef) -> bool {
        self.state
            .lock()
            .values
            .get(&inst)
            .is_some_and(|v| v.volatile)
    }

    fn set_volatile(&self, inst: ValueRef, volatile: bool) {
        if let Some(v) = self.state.lock().values.get_mut(&inst) {
            v.volatile = volatile;
        }
    }

    fn icmp_predicate(&self, value: ValueRef) -> u32 {
        self.state
            .lock()
            .values
            .get(&value)
            .map_or(0, |v| v.predicate)
    }

    fn fcmp_predicate(&self, value: ValueRef) -> u32 {
        self.icmp_predicate(value)
    }

    fn num_successors(&self, term: ValueRef) -> u32 {
        self.state
            .lock()
            .values
            .get(&term)
            .map_or(0, |v| u32::try_from(v.successors.len()).unwrap_or(u32::MAX))
    }

    fn successor(&self, term: ValueRef, index: u32) -> BlockRef {
        self.state
            .lock()
            .values
            .get(&term)
            .and_then(|v| v.successors.get(index as usize).copied())
            .unwrap_or(BlockRef::NULL)
    }

    fn value_as_basic_block(&self, value: ValueRef) -> BlockRef {
        self.conversions.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .blocks
            .iter()
            .find(|(_, b)| b.value == value)
            .map_or(BlockRef::NULL, |(&block, _)| block)
    }

    fn basic_block_as_value(&self, block: BlockRef) -> ValueRef {
        self.block_value(block)
    }

    fn block_parent(&self, block: BlockRef) -> ValueRef {
        self.state
            .lock()
            .blocks
            .get(&block)
            .map_or(ValueRef::NULL, |b| b.function)
    }

    fn block_terminator(&self, block: BlockRef) -> ValueRef {
        let state = self.state.lock();
        state
            .blocks
            .get(&block)
            .and_then(|b| b.instructions.last().copied())
            .filter(|last| {
                state
                    .values
                    .get(last)
                    .is_some_and(|v| v.probes.contains(&Probe::TerminatorInst))
            })
            .unwrap_or(ValueRef::NULL)
    }

    fn next_block(&self, block: BlockRef) -> BlockRef {
        self.state.lock().block_at(block, 1)
    }

    fn previous_block(&self, block: BlockRef) -> BlockRef {
        self.state.lock().block_at(block, -1)
    }

    fn first_instruction(&self, block: BlockRef) -> ValueRef {
        self.state
            .lock()
            .blocks
            .get(&block)
            .and_then(|b| b.instructions.first().copied())
            .unwrap_or(ValueRef::NULL)
    }

    fn last_instruction(&self, block: BlockRef) -> ValueRef {
        self.state
            .lock()
            .blocks
            .get(&block)
            .and_then(|b| b.instructions.last().copied())
            .unwrap_or(ValueRef::NULL)
    }

    fn move_block_before(&self, block: BlockRef, position: BlockRef) {
        let mut state = self.state.lock();
        let Some(function) = state.detach_block(block) else {
            return;
        };
        let Some((_, index)) = state.block_position(position) else {
            return;
        };
        if let Some(layout) = state.layouts.get_mut(&function) {
            layout.insert(index, block);
        }
    }

    fn move_block_after(&self, block: BlockRef, position: BlockRef) {
        let mut state = self.state.lock();
        let Some(function) = state.detach_block(block) else {
            return;
        };
        let Some((_, index)) = state.block_position(position) else {
            return;
        };
        if let Some(layout) = state.layouts.get_mut(&function) {
            layout.insert(index + 1, block);
        }
    }

    fn insert_block_before(&self, _cx: ContextRef, before: BlockRef, name: &str) -> BlockRef {
        let mut state = self.state.lock();
        let Some((function, index)) = state.block_position(before) else {
            return BlockRef::NULL;
        };
        let block = Self::new_block(&mut state, function, name);
        if let Some(layout) = state.layouts.get_mut(&function) {
            layout.insert(index, block);
        }
        block
    }

    fn delete_block(&self, block: BlockRef) {
        let mut state = self.state.lock();
        state.detach_block(block);
        if let Some(removed) = state.blocks.remove(&block) {
            state.values.remove(&removed.value);
            for inst in removed.instructions {
                state.values.remove(&inst);
            }
        }
    }
}

/// A fake library and an owned context over it.
pub(crate) fn fake_context() -> (Arc<FakeNative>, Context) {
    fake_context_with(ContextOptions::default())
}

pub(crate) fn fake_context_with(options: ContextOptions) -> (Arc<FakeNative>, Context) {
    let native = FakeNative::new();
    let cx = Context::with_options(native.clone(), options);
    (native, cx)
}
