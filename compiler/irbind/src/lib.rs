//! Canonical, classified wrappers over the LLVM C API.
//!
//! The C API hands out opaque pointers. This crate turns them into wrapper
//! objects with two guarantees the C API lacks:
//!
//! - **Canonical identity**: within one [`Context`], looking up the same
//!   native handle twice yields the same wrapper object for as long as
//!   anyone holds it ([`Type`] and [`Value`] compare by identity).
//! - **Static shape**: every wrapper carries its concrete variant
//!   ([`TypeKind`], [`ValueKind`]), chosen once when the handle is first
//!   seen.
//!
//! # Architecture
//!
//! - **Handles** (`handle.rs`): address-carrying newtypes for native pointers
//! - **Taxonomy** (`taxonomy/`): type-kind table, value decision tree,
//!   constant-expression opcode table
//! - **Cache** (`cache.rs`): weak, address-keyed wrapper maps, two per context
//! - **Classifier** (`classify.rs`): handle → variant
//! - **Gates** (`context.rs`): [`Context::ty`], [`Context::value`], the only
//!   construction path for wrappers
//! - **Blocks** (`block.rs`): [`BasicBlock`] with its lazily converted
//!   block-shaped handle
//! - **Views** (`variant.rs`): typed views and capability traits
//!
//! All foreign calls go through an injected [`NativeApi`]; `irbind_llvm`
//! implements it over `llvm-sys`.
//!
//! # Debugging
//!
//! - `RUST_LOG=irbind=debug`: context creation and disposal
//! - `RUST_LOG=irbind=trace`: every cache miss and classification
//! - `IRBIND_TOLERATE_UNKNOWN=1`: wrap unclassifiable values as bare
//!   `Value` instead of failing (read by [`ContextOptions::from_env`])

mod block;
mod cache;
mod classify;
mod context;
mod error;
mod handle;
mod native;
mod taxonomy;
mod ty;
mod value;
mod variant;

#[cfg(test)]
mod test_helpers;

pub use block::BasicBlock;
pub use cache::WeakCache;
pub use classify::{classify_const_expr, classify_type, classify_value};
pub use context::{Context, ContextOptions, UnknownValuePolicy, TOLERATE_UNKNOWN_ENV};
pub use error::BindError;
pub use handle::{BlockRef, ContextRef, TypeRef, UseRef, ValueRef};
pub use native::NativeApi;
pub use taxonomy::{
    const_expr_slot, ConstExprKind, ConstExprSlot, Opcode, Probe, TaxonomyNode, TypeCategory,
    TypeKind, ValueKind, VALUE_TAXONOMY,
};
pub use ty::Type;
pub use value::Value;
pub use variant::{
    AsValue, AtomicCmpXchgInst, AtomicRmwInst, Comparison, FCmp, ICmp, Instruction, IntPredicate,
    LoadInst, MemoryAccess, RealPredicate, StoreInst, Terminator, ValueVariant,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
