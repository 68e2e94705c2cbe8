//! Handle classification.
//!
//! Pure functions of (native capability, handle): the same unchanged handle
//! always yields the same variant. Nothing here touches a cache; the gates
//! in [`context`](crate::context) decide when classification runs.

use tracing::{trace, warn};

use crate::context::UnknownValuePolicy;
use crate::error::BindError;
use crate::handle::{TypeRef, ValueRef};
use crate::native::NativeApi;
use crate::taxonomy::{
    const_expr_slot, ConstExprKind, ConstExprSlot, Opcode, Probe, TaxonomyNode, TypeKind,
    ValueKind, VALUE_TAXONOMY,
};

/// Classify a non-null type handle with one `type_kind` query.
pub fn classify_type(native: &dyn NativeApi, ty: TypeRef) -> Result<TypeKind, BindError> {
    let raw = native.type_kind(ty);
    TypeKind::from_raw(raw).ok_or(BindError::UnknownTypeKind { handle: ty, raw })
}

/// Classify a non-null value handle by walking [`VALUE_TAXONOMY`].
///
/// At every level the first matching probe decides descent; a level where
/// nothing matches classifies the value at the parent category. Only the
/// top level can fail, and only under [`UnknownValuePolicy::Reject`].
pub fn classify_value(
    native: &dyn NativeApi,
    value: ValueRef,
    policy: UnknownValuePolicy,
) -> Result<ValueKind, BindError> {
    let Some(mut node) = first_match(native, value, VALUE_TAXONOMY) else {
        return match policy {
            UnknownValuePolicy::Reject => Err(BindError::UnclassifiedValue { handle: value }),
            UnknownValuePolicy::Tolerate => {
                warn!(?value, "value matches no known class; wrapping as bare Value");
                Ok(ValueKind::Value)
            }
        };
    };

    while let Some(child) = first_match(native, value, node.children) {
        node = child;
    }
    trace!(?value, class = node.probe.class_name(), "predicate chain settled");

    match node.probe {
        Probe::ConstantExpr => classify_const_expr(native, value).map(ValueKind::ConstExpr),
        probe => Ok(probe.kind()),
    }
}

/// Second stage for constant expressions: opcode → leaf.
pub fn classify_const_expr(
    native: &dyn NativeApi,
    value: ValueRef,
) -> Result<ConstExprKind, BindError> {
    let raw = native.const_opcode(value);
    let opcode = Opcode::from_raw(raw).ok_or(BindError::UnknownOpcode { handle: value, raw })?;
    match const_expr_slot(opcode) {
        ConstExprSlot::Kind(kind) => Ok(kind),
        ConstExprSlot::Impossible => Err(BindError::ImpossibleConstExpr {
            handle: value,
            opcode,
        }),
    }
}

fn first_match(
    native: &dyn NativeApi,
    value: ValueRef,
    nodes: &'static [TaxonomyNode],
) -> Option<&'static TaxonomyNode> {
    nodes.iter().find(|node| native.is_a(value, node.probe))
}
