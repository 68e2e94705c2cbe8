//! Contexts and the interning gates.
//!
//! A [`Context`] is the lifetime scope for everything the native library
//! allocates under it, and it owns the only two caches wrappers live in.
//! [`Context::ty`] and [`Context::value`] are the only way to obtain a
//! wrapper: they short-circuit null handles, return the cached wrapper on a
//! hit, and on a miss classify the handle, build exactly that variant and
//! record it.
//!
//! # Lifetime
//!
//! Wrappers hold their `Context`, so an owned native context is disposed
//! only after the last wrapper is dropped. An attached context
//! ([`Context::attach`]) belongs to someone else; dereferencing its wrappers
//! after the owner disposes it is the caller's problem.
//!
//! # One binding per native context
//!
//! Live contexts are registered process-wide under their native library and
//! native context handle. Attaching a native context that already has a
//! live binding returns that binding, so one native context never has two
//! cache pairs.

use std::fmt;
use std::sync::{Arc, LazyLock, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::cache::WeakCache;
use crate::classify::{classify_type, classify_value};
use crate::error::BindError;
use crate::handle::{ContextRef, TypeRef, ValueRef};
use crate::native::NativeApi;
use crate::ty::{Type, TypeData};
use crate::value::{Value, ValueData};

/// Environment variable selecting [`UnknownValuePolicy::Tolerate`].
pub const TOLERATE_UNKNOWN_ENV: &str = "IRBIND_TOLERATE_UNKNOWN";

/// What to do with a value that matches no top-level class.
///
/// Such a value means the linked library is newer than this binding's
/// taxonomy. Rejecting is the default so drift is caught the first time it
/// happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownValuePolicy {
    /// Fail with [`BindError::UnclassifiedValue`].
    #[default]
    Reject,
    /// Wrap it as the abstract [`ValueKind::Value`](crate::ValueKind::Value).
    Tolerate,
}

impl UnknownValuePolicy {
    /// Parse the value of [`TOLERATE_UNKNOWN_ENV`].
    ///
    /// Unset, empty and `0` reject; anything else tolerates.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "0") => Self::Reject,
            Some(_) => Self::Tolerate,
        }
    }
}

impl fmt::Display for UnknownValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Tolerate => write!(f, "tolerate"),
        }
    }
}

/// Per-context configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextOptions {
    pub unknown_values: UnknownValuePolicy,
}

impl ContextOptions {
    /// Defaults, overridden by `IRBIND_TOLERATE_UNKNOWN`.
    pub fn from_env() -> Self {
        let raw = std::env::var(TOLERATE_UNKNOWN_ENV).ok();
        Self {
            unknown_values: UnknownValuePolicy::from_env_value(raw.as_deref()),
        }
    }

    #[must_use]
    pub fn with_unknown_values(mut self, policy: UnknownValuePolicy) -> Self {
        self.unknown_values = policy;
        self
    }
}

/// `(native library, native context)` of a binding.
type BindingKey = (usize, usize);

static BINDINGS: LazyLock<Mutex<FxHashMap<BindingKey, Weak<ContextInner>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

fn binding_key(native: &Arc<dyn NativeApi>, raw: ContextRef) -> BindingKey {
    (Arc::as_ptr(native).cast::<()>() as usize, raw.addr())
}

struct ContextInner {
    native: Arc<dyn NativeApi>,
    raw: ContextRef,
    /// Whether dropping the last reference disposes `raw`.
    owned: bool,
    options: ContextOptions,
    types: WeakCache<TypeData>,
    values: WeakCache<ValueData>,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        let key = binding_key(&self.native, self.raw);
        let this: *const ContextInner = self;
        let mut bindings = BINDINGS.lock();
        // A rebinding may already have replaced this entry.
        if bindings.get(&key).is_some_and(|entry| entry.as_ptr() == this) {
            bindings.remove(&key);
        }
        drop(bindings);

        if self.owned {
            debug!(raw = ?self.raw, "disposing native context");
            self.native.dispose_context(self.raw);
        }
    }
}

/// Root lifetime scope with its type and value caches.
///
/// Cheap to clone; clones share caches. Equality is identity.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create a native context with default options.
    pub fn new(native: Arc<dyn NativeApi>) -> Self {
        Self::with_options(native, ContextOptions::default())
    }

    /// Create a native context, disposed when the last reference goes away.
    pub fn with_options(native: Arc<dyn NativeApi>, options: ContextOptions) -> Self {
        let raw = native.create_context();
        debug!(?raw, policy = %options.unknown_values, "created native context");
        Self::from_parts(native, raw, true, options).register()
    }

    /// Bind a native context owned elsewhere. It is never disposed here.
    ///
    /// While a binding for `raw` under the same `native` is alive, that
    /// binding is returned (with its own options and ownership) instead of a
    /// new one.
    pub fn attach(native: Arc<dyn NativeApi>, raw: ContextRef, options: ContextOptions) -> Self {
        let key = binding_key(&native, raw);
        let mut bindings = BINDINGS.lock();
        if let Some(inner) = bindings.get(&key).and_then(Weak::upgrade) {
            trace!(?raw, "reusing live binding");
            return Self { inner };
        }
        debug!(?raw, policy = %options.unknown_values, "attached native context");
        let cx = Self::from_parts(native, raw, false, options);
        bindings.insert(key, Arc::downgrade(&cx.inner));
        cx
    }

    fn from_parts(
        native: Arc<dyn NativeApi>,
        raw: ContextRef,
        owned: bool,
        options: ContextOptions,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                native,
                raw,
                owned,
                options,
                types: WeakCache::new(),
                values: WeakCache::new(),
            }),
        }
    }

    fn register(self) -> Self {
        let key = binding_key(&self.inner.native, self.inner.raw);
        BINDINGS.lock().insert(key, Arc::downgrade(&self.inner));
        self
    }

    /// The native context handle.
    pub fn raw(&self) -> ContextRef {
        self.inner.raw
    }

    pub fn options(&self) -> ContextOptions {
        self.inner.options
    }

    /// True if this context disposes its native context on drop.
    pub fn is_owned(&self) -> bool {
        self.inner.owned
    }

    /// True if both refer to the same context (and therefore the same caches).
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn native(&self) -> &dyn NativeApi {
        self.inner.native.as_ref()
    }

    // -- Interning gates --

    /// Canonical wrapper for a type handle; `Ok(None)` for null.
    pub fn try_ty(&self, handle: TypeRef) -> Result<Option<Type>, BindError> {
        let Some(handle) = handle.non_null() else {
            return Ok(None);
        };
        let data = self.inner.types.get_or_try_insert_with(handle.addr(), || {
            let kind = classify_type(self.native(), handle)?;
            trace!(?handle, %kind, "interned type");
            Ok::<_, BindError>(Arc::new(TypeData::new(handle, kind, self.clone())))
        })?;
        Ok(Some(Type::from_data(data)))
    }

    /// Canonical wrapper for a type handle; `None` for null.
    ///
    /// # Panics
    /// Panics on taxonomy drift (an unknown type kind).
    pub fn ty(&self, handle: TypeRef) -> Option<Type> {
        self.try_ty(handle).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Canonical wrapper for a value handle; `Ok(None)` for null.
    pub fn try_value(&self, handle: ValueRef) -> Result<Option<Value>, BindError> {
        let Some(handle) = handle.non_null() else {
            return Ok(None);
        };
        let policy = self.inner.options.unknown_values;
        let data = self.inner.values.get_or_try_insert_with(handle.addr(), || {
            let kind = classify_value(self.native(), handle, policy)?;
            trace!(?handle, %kind, "interned value");
            Ok::<_, BindError>(Arc::new(ValueData::new(handle, kind, self.clone())))
        })?;
        Ok(Some(Value::from_data(data)))
    }

    /// Canonical wrapper for a value handle; `None` for null.
    ///
    /// # Panics
    /// Panics on taxonomy drift (unknown or impossible constant-expression
    /// opcode, or an unclassifiable value under
    /// [`UnknownValuePolicy::Reject`]).
    pub fn value(&self, handle: ValueRef) -> Option<Value> {
        self.try_value(handle).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Drop the cache entry for a value whose native object was destroyed.
    pub(crate) fn forget_value(&self, handle: ValueRef) {
        if self.inner.values.forget(handle.addr()) {
            trace!(?handle, "forgot destroyed value");
        }
    }

    // -- Diagnostics --

    /// Number of live type wrappers.
    pub fn live_types(&self) -> usize {
        self.inner.types.live_len()
    }

    /// Number of live value wrappers.
    pub fn live_values(&self) -> usize {
        self.inner.values.live_len()
    }

    /// True if a live type wrapper is cached for `handle`.
    pub fn has_type(&self, handle: TypeRef) -> bool {
        self.inner.types.contains(handle.addr())
    }

    /// True if a live value wrapper is cached for `handle`.
    pub fn has_value(&self, handle: ValueRef) -> bool {
        self.inner.values.contains(handle.addr())
    }

    /// Cache entries of both caches, dead ones included.
    pub fn cache_entries(&self) -> usize {
        self.inner.types.raw_len() + self.inner.values.raw_len()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("raw", &self.inner.raw)
            .field("owned", &self.inner.owned)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}
