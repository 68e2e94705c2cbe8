//! Value wrappers.
//!
//! [`Value`] carries the classified [`ValueKind`]; typed access to a
//! particular variant goes through [`Value::downcast`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::context::Context;
use crate::handle::{BlockRef, ValueRef};
use crate::native::NativeApi;
use crate::taxonomy::ValueKind;
use crate::ty::Type;
use crate::variant::{AsValue, ValueVariant};

pub(crate) struct ValueData {
    handle: ValueRef,
    kind: ValueKind,
    context: Context,
    /// Block-shaped handle, filled on first use. Basic blocks only.
    block: OnceLock<BlockRef>,
}

impl ValueData {
    pub(crate) fn new(handle: ValueRef, kind: ValueKind, context: Context) -> Self {
        Self {
            handle,
            kind,
            context,
            block: OnceLock::new(),
        }
    }
}

/// Canonical wrapper for a native value.
///
/// Only obtainable through [`Context::value`]. While any clone is alive,
/// every lookup of the same handle in the same context returns this object,
/// so `==` is identity.
#[derive(Clone)]
pub struct Value(Arc<ValueData>);

impl Value {
    pub(crate) fn from_data(data: Arc<ValueData>) -> Self {
        Self(data)
    }

    pub(crate) fn native(&self) -> &dyn NativeApi {
        self.0.context.native()
    }

    pub(crate) fn block_slot(&self) -> &OnceLock<BlockRef> {
        &self.0.block
    }

    /// The value-shaped native handle, for passing back into foreign calls.
    pub fn handle(&self) -> ValueRef {
        self.0.handle
    }

    pub fn kind(&self) -> ValueKind {
        self.0.kind
    }

    /// True if the variant is `category` or one of its descendants.
    pub fn is_a(&self, category: ValueKind) -> bool {
        self.0.kind.is_a(category)
    }

    /// The owning context.
    pub fn context(&self) -> &Context {
        &self.0.context
    }

    /// Typed view of this value, if its variant fits `V`.
    pub fn downcast<V: ValueVariant>(&self) -> Option<V> {
        V::accepts(self.kind()).then(|| V::wrap(self.clone()))
    }

    /// The canonical type wrapper of this value.
    ///
    /// # Panics
    /// Panics on taxonomy drift in the value's type.
    pub fn type_of(&self) -> Option<Type> {
        self.context().ty(self.native().type_of(self.handle()))
    }

    pub fn name(&self) -> String {
        self.native().value_name(self.handle())
    }

    pub fn set_name(&self, name: &str) {
        self.native().set_value_name(self.handle(), name);
    }

    /// Users of this value, one per use, in use-list order.
    pub fn users(&self) -> impl Iterator<Item = Value> + '_ {
        let native = self.native();
        std::iter::successors(native.first_use(self.handle()).non_null(), move |u| {
            native.next_use(*u).non_null()
        })
        .filter_map(move |u| self.context().value(native.use_user(u)))
    }
}

impl AsValue for Value {
    fn as_value(&self) -> &Value {
        self
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.kind(), self.handle().addr())
    }
}
