#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use super::*;

fn walk(nodes: &'static [TaxonomyNode], out: &mut Vec<Probe>) {
    for node in nodes {
        out.push(node.probe);
        walk(node.children, out);
    }
}

// Type kinds

#[test]
fn type_kind_raw_values_round_trip() {
    for (raw, kind) in TypeKind::ALL.iter().enumerate() {
        let raw = u32::try_from(raw).unwrap();
        assert_eq!(kind.to_raw(), raw);
        assert_eq!(TypeKind::from_raw(raw), Some(*kind));
    }
}

#[test]
fn type_kind_outside_table_is_unknown() {
    assert_eq!(TypeKind::from_raw(21), None);
    assert_eq!(TypeKind::from_raw(u32::MAX), None);
}

#[test]
fn type_categories() {
    assert_eq!(TypeKind::Double.category(), TypeCategory::Real);
    assert_eq!(TypeKind::PpcFp128.category(), TypeCategory::Real);
    assert_eq!(TypeKind::Pointer.category(), TypeCategory::Sequential);
    assert_eq!(TypeKind::ScalableVector.category(), TypeCategory::Sequential);
    assert_eq!(TypeKind::Integer.category(), TypeCategory::Standalone);
    assert_eq!(TypeKind::Struct.category(), TypeCategory::Standalone);
}

// Opcodes

#[test]
fn opcode_numbering_is_a_bijection() {
    let mut seen = FxHashSet::default();
    for &op in Opcode::ALL {
        assert!(seen.insert(op.to_raw()), "duplicate raw value for {op}");
        assert_eq!(Opcode::from_raw(op.to_raw()), Some(op));
    }
    assert_eq!(Opcode::ALL.len(), 67);
}

#[test]
fn opcode_gaps_are_unknown() {
    // 0 is unused and 6 was the removed `Unwind` opcode.
    assert_eq!(Opcode::from_raw(0), None);
    assert_eq!(Opcode::from_raw(6), None);
    assert_eq!(Opcode::from_raw(69), None);
}

#[test]
fn const_expr_table_is_complete() {
    // Constant-expression opcodes LLVM 17 can still form.
    let legal = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Shl,
        Opcode::LShr,
        Opcode::AShr,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Trunc,
        Opcode::ZExt,
        Opcode::SExt,
        Opcode::FpToUi,
        Opcode::FpToSi,
        Opcode::UiToFp,
        Opcode::SiToFp,
        Opcode::FpTrunc,
        Opcode::FpExt,
        Opcode::PtrToInt,
        Opcode::IntToPtr,
        Opcode::BitCast,
        Opcode::AddrSpaceCast,
        Opcode::GetElementPtr,
        Opcode::ICmp,
        Opcode::FCmp,
        Opcode::ExtractElement,
        Opcode::InsertElement,
        Opcode::ShuffleVector,
    ];

    let mut reached = FxHashSet::default();
    for &op in Opcode::ALL {
        match const_expr_slot(op) {
            ConstExprSlot::Impossible => {
                assert!(!legal.contains(&op), "{op} should form a constant expression");
            }
            ConstExprSlot::Kind(kind) => {
                assert!(legal.contains(&op), "{op} cannot form a constant expression");
                assert_eq!(kind.opcode(), op);
                assert!(reached.insert(kind), "{kind} reached twice");
            }
        }
    }
    assert_eq!(reached.len(), legal.len());
    assert_eq!(ConstExprKind::ALL.len(), legal.len());
}

#[test]
fn removed_const_expr_opcodes_are_impossible() {
    for op in [
        Opcode::FNeg,
        Opcode::FAdd,
        Opcode::UDiv,
        Opcode::SRem,
        Opcode::Select,
        Opcode::ExtractValue,
        Opcode::InsertValue,
    ] {
        assert_eq!(const_expr_slot(op), ConstExprSlot::Impossible, "{op}");
    }
}

#[test]
fn const_expr_groups() {
    assert!(ConstExprKind::ICmp.is_comparison());
    assert!(ConstExprKind::FCmp.is_comparison());
    assert!(!ConstExprKind::Add.is_comparison());
    assert!(ConstExprKind::AddrSpaceCast.is_cast());
    assert!(!ConstExprKind::GetElementPtr.is_cast());
}

// Value tree

#[test]
fn every_probe_appears_once_in_the_tree() {
    let mut probes = Vec::new();
    walk(VALUE_TAXONOMY, &mut probes);

    let unique: FxHashSet<Probe> = probes.iter().copied().collect();
    assert_eq!(unique.len(), probes.len());
    assert_eq!(probes.len(), Probe::ALL.len());
}

#[test]
fn every_kind_chains_up_to_the_root() {
    for &probe in Probe::ALL {
        let kind = probe.kind();
        assert_eq!(kind.ancestors().last(), Some(ValueKind::Value), "{kind}");
        assert!(kind.is_a(ValueKind::Value));
    }
}

#[test]
fn top_level_order() {
    let top: Vec<Probe> = VALUE_TAXONOMY.iter().map(|node| node.probe).collect();
    assert_eq!(
        top,
        vec![
            Probe::Argument,
            Probe::BasicBlock,
            Probe::InlineAsm,
            Probe::MdNode,
            Probe::MdString,
            Probe::User,
        ]
    );
}

#[test]
fn poison_is_probed_before_undef() {
    let constants = VALUE_TAXONOMY
        .iter()
        .find(|node| node.probe == Probe::User)
        .and_then(|user| user.children.iter().find(|n| n.probe == Probe::Constant))
        .unwrap();
    let position = |probe| {
        constants
            .children
            .iter()
            .position(|node| node.probe == probe)
            .unwrap()
    };
    assert!(position(Probe::PoisonValue) < position(Probe::UndefValue));
}

#[test]
fn parents_follow_the_tree() {
    assert_eq!(ValueKind::FCmpInst.parent(), Some(ValueKind::CmpInst));
    assert_eq!(ValueKind::CmpInst.parent(), Some(ValueKind::Instruction));
    assert_eq!(ValueKind::Instruction.parent(), Some(ValueKind::User));
    assert_eq!(ValueKind::BasicBlock.parent(), Some(ValueKind::Value));
    assert_eq!(ValueKind::DbgDeclareInst.parent(), Some(ValueKind::DbgVariableIntrinsic));
    assert_eq!(ValueKind::Function.parent(), Some(ValueKind::GlobalObject));
    assert_eq!(ValueKind::Value.parent(), None);
}

#[test]
fn const_expr_leaves_sit_under_constant_expr() {
    let add = ValueKind::ConstExpr(ConstExprKind::Add);
    assert_eq!(add.parent(), Some(ValueKind::ConstantExpr));
    assert!(add.is_a(ValueKind::Constant));
    assert!(!add.is_a(ValueKind::Instruction));
    assert_eq!(add.const_expr(), Some(ConstExprKind::Add));
    assert_eq!(add.name(), "ConstantExpr");
    assert_eq!(add.to_string(), "ConstantExpr::Add");
}

#[test]
fn abstract_categories() {
    assert!(ValueKind::Value.is_abstract());
    assert!(ValueKind::Instruction.is_abstract());
    assert!(ValueKind::CastInst.is_abstract());
    assert!(ValueKind::ConstantExpr.is_abstract());
    assert!(!ValueKind::FCmpInst.is_abstract());
    assert!(!ValueKind::ConstExpr(ConstExprKind::Xor).is_abstract());
    assert!(!ValueKind::BasicBlock.is_abstract());
}

#[test]
fn class_names_match_native_spelling() {
    assert_eq!(Probe::PhiNode.class_name(), "PHINode");
    assert_eq!(Probe::ConstantFp.class_name(), "ConstantFP");
    assert_eq!(ValueKind::AtomicRmwInst.name(), "AtomicRMWInst");
    assert_eq!(ValueKind::Value.to_string(), "Value");
}
