//! Type wrappers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::context::Context;
use crate::handle::TypeRef;
use crate::taxonomy::{TypeCategory, TypeKind};

pub(crate) struct TypeData {
    handle: TypeRef,
    kind: TypeKind,
    context: Context,
}

impl TypeData {
    pub(crate) fn new(handle: TypeRef, kind: TypeKind, context: Context) -> Self {
        Self {
            handle,
            kind,
            context,
        }
    }
}

/// Canonical wrapper for a native type.
///
/// Only obtainable through [`Context::ty`]. While any clone is alive, every
/// lookup of the same handle in the same context returns this object, so
/// `==` is identity.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

impl Type {
    pub(crate) fn from_data(data: Arc<TypeData>) -> Self {
        Self(data)
    }

    /// The native handle, for passing back into foreign calls.
    pub fn handle(&self) -> TypeRef {
        self.0.handle
    }

    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    pub fn category(&self) -> TypeCategory {
        self.0.kind.category()
    }

    /// Floating-point types.
    pub fn is_real(&self) -> bool {
        self.category() == TypeCategory::Real
    }

    /// Array, pointer and vector types.
    pub fn is_sequential(&self) -> bool {
        self.category() == TypeCategory::Sequential
    }

    /// The owning context.
    pub fn context(&self) -> &Context {
        &self.0.context
    }

    /// Bit width of an integer type; `None` for every other kind.
    pub fn int_width(&self) -> Option<u32> {
        (self.kind() == TypeKind::Integer)
            .then(|| self.context().native().int_type_width(self.handle()))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.kind(), self.handle().addr())
    }
}
