//! Raw native handles.
//!
//! A handle is a foreign pointer carried as its numeric address. The address
//! is both the cache key and the payload forwarded back to the native
//! library. Nothing in this crate dereferences a handle or releases the
//! object behind it; lifetime belongs to the native context (or the module
//! that contains the object).
//!
//! # Safety
//!
//! Every foreign call made with a handle trusts it, so a handle can only be
//! minted through `unsafe` constructors. The contract is that the address is
//! null or a live native object of the handle's kind, belonging to the
//! library it will be passed to. Handles returned by a [`NativeApi`]
//! implementation satisfy it by construction.
//!
//! [`NativeApi`]: crate::NativeApi

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// The null handle, also the `Default`. Gates map it to `None`
            /// before any lookup.
            pub const NULL: Self = Self(0);

            /// Wrap a raw address.
            ///
            /// # Safety
            /// `addr` must be 0 or the address of a live native object of
            /// this kind, owned by the library the handle is passed to.
            #[allow(unsafe_code, reason = "constructors carry the liveness contract")]
            #[inline]
            pub const unsafe fn from_addr(addr: usize) -> Self {
                Self(addr)
            }

            /// Wrap a foreign pointer.
            ///
            /// # Safety
            /// Same contract as [`Self::from_addr`]: null or live.
            #[allow(unsafe_code, reason = "constructors carry the liveness contract")]
            #[inline]
            pub unsafe fn from_ptr<T>(ptr: *mut T) -> Self {
                Self(ptr as usize)
            }

            /// Numeric address of the handle.
            #[inline]
            pub const fn addr(self) -> usize {
                self.0
            }

            /// The handle as a foreign pointer, for passing back across the FFI.
            #[inline]
            pub fn as_ptr<T>(self) -> *mut T {
                self.0 as *mut T
            }

            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// `None` for the null handle.
            #[inline]
            pub const fn non_null(self) -> Option<Self> {
                if self.is_null() {
                    None
                } else {
                    Some(self)
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.0)
            }
        }
    };
}

define_handle!(
    /// Native context handle (`LLVMContextRef`).
    ContextRef
);

define_handle!(
    /// Native type handle (`LLVMTypeRef`).
    TypeRef
);

define_handle!(
    /// Value-shaped native handle (`LLVMValueRef`).
    ValueRef
);

define_handle!(
    /// Block-shaped native handle (`LLVMBasicBlockRef`).
    ///
    /// Denotes the same entity as the value-shaped handle of a basic block,
    /// at a different address.
    BlockRef
);

define_handle!(
    /// Use-list entry handle (`LLVMUseRef`).
    UseRef
);
