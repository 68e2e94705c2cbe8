//! `Probe` → `LLVMIsA*`.

use llvm_sys::core::*;
use llvm_sys::prelude::LLVMValueRef;

use irbind::Probe;

type IsA = unsafe extern "C" fn(LLVMValueRef) -> LLVMValueRef;

/// The C predicate answering `probe`. Each returns its argument on a
/// match and null otherwise.
pub(crate) fn predicate(probe: Probe) -> IsA {
    match probe {
        Probe::Argument => LLVMIsAArgument,
        Probe::BasicBlock => LLVMIsABasicBlock,
        Probe::InlineAsm => LLVMIsAInlineAsm,
        Probe::MdNode => LLVMIsAMDNode,
        Probe::MdString => LLVMIsAMDString,
        Probe::User => LLVMIsAUser,
        Probe::Constant => LLVMIsAConstant,
        Probe::BlockAddress => LLVMIsABlockAddress,
        Probe::ConstantAggregateZero => LLVMIsAConstantAggregateZero,
        Probe::ConstantArray => LLVMIsAConstantArray,
        Probe::ConstantDataSequential => LLVMIsAConstantDataSequential,
        Probe::ConstantDataArray => LLVMIsAConstantDataArray,
        Probe::ConstantDataVector => LLVMIsAConstantDataVector,
        Probe::ConstantExpr => LLVMIsAConstantExpr,
        Probe::ConstantFp => LLVMIsAConstantFP,
        Probe::ConstantInt => LLVMIsAConstantInt,
        Probe::ConstantPointerNull => LLVMIsAConstantPointerNull,
        Probe::ConstantStruct => LLVMIsAConstantStruct,
        Probe::ConstantTokenNone => LLVMIsAConstantTokenNone,
        Probe::ConstantVector => LLVMIsAConstantVector,
        Probe::GlobalValue => LLVMIsAGlobalValue,
        Probe::GlobalAlias => LLVMIsAGlobalAlias,
        Probe::GlobalObject => LLVMIsAGlobalObject,
        Probe::Function => LLVMIsAFunction,
        Probe::GlobalVariable => LLVMIsAGlobalVariable,
        Probe::GlobalIFunc => LLVMIsAGlobalIFunc,
        Probe::PoisonValue => LLVMIsAPoisonValue,
        Probe::UndefValue => LLVMIsAUndefValue,
        Probe::Instruction => LLVMIsAInstruction,
        Probe::UnaryOperator => LLVMIsAUnaryOperator,
        Probe::BinaryOperator => LLVMIsABinaryOperator,
        Probe::CallInst => LLVMIsACallInst,
        Probe::IntrinsicInst => LLVMIsAIntrinsicInst,
        Probe::DbgInfoIntrinsic => LLVMIsADbgInfoIntrinsic,
        Probe::DbgVariableIntrinsic => LLVMIsADbgVariableIntrinsic,
        Probe::DbgDeclareInst => LLVMIsADbgDeclareInst,
        Probe::DbgLabelInst => LLVMIsADbgLabelInst,
        Probe::MemIntrinsic => LLVMIsAMemIntrinsic,
        Probe::MemCpyInst => LLVMIsAMemCpyInst,
        Probe::MemMoveInst => LLVMIsAMemMoveInst,
        Probe::MemSetInst => LLVMIsAMemSetInst,
        Probe::CmpInst => LLVMIsACmpInst,
        Probe::FCmpInst => LLVMIsAFCmpInst,
        Probe::ICmpInst => LLVMIsAICmpInst,
        Probe::ExtractElementInst => LLVMIsAExtractElementInst,
        Probe::GetElementPtrInst => LLVMIsAGetElementPtrInst,
        Probe::InsertElementInst => LLVMIsAInsertElementInst,
        Probe::InsertValueInst => LLVMIsAInsertValueInst,
        Probe::LandingPadInst => LLVMIsALandingPadInst,
        Probe::PhiNode => LLVMIsAPHINode,
        Probe::SelectInst => LLVMIsASelectInst,
        Probe::ShuffleVectorInst => LLVMIsAShuffleVectorInst,
        Probe::StoreInst => LLVMIsAStoreInst,
        // Only reached below `Instruction`; the C side assumes an instruction.
        Probe::TerminatorInst => LLVMIsATerminatorInst,
        Probe::BranchInst => LLVMIsABranchInst,
        Probe::IndirectBrInst => LLVMIsAIndirectBrInst,
        Probe::InvokeInst => LLVMIsAInvokeInst,
        Probe::ReturnInst => LLVMIsAReturnInst,
        Probe::SwitchInst => LLVMIsASwitchInst,
        Probe::UnreachableInst => LLVMIsAUnreachableInst,
        Probe::ResumeInst => LLVMIsAResumeInst,
        Probe::CleanupReturnInst => LLVMIsACleanupReturnInst,
        Probe::CatchReturnInst => LLVMIsACatchReturnInst,
        Probe::CatchSwitchInst => LLVMIsACatchSwitchInst,
        Probe::CallBrInst => LLVMIsACallBrInst,
        Probe::FuncletPadInst => LLVMIsAFuncletPadInst,
        Probe::CatchPadInst => LLVMIsACatchPadInst,
        Probe::CleanupPadInst => LLVMIsACleanupPadInst,
        Probe::UnaryInstruction => LLVMIsAUnaryInstruction,
        Probe::AllocaInst => LLVMIsAAllocaInst,
        Probe::CastInst => LLVMIsACastInst,
        Probe::AddrSpaceCastInst => LLVMIsAAddrSpaceCastInst,
        Probe::BitCastInst => LLVMIsABitCastInst,
        Probe::FpExtInst => LLVMIsAFPExtInst,
        Probe::FpToSiInst => LLVMIsAFPToSIInst,
        Probe::FpToUiInst => LLVMIsAFPToUIInst,
        Probe::FpTruncInst => LLVMIsAFPTruncInst,
        Probe::IntToPtrInst => LLVMIsAIntToPtrInst,
        Probe::PtrToIntInst => LLVMIsAPtrToIntInst,
        Probe::SExtInst => LLVMIsASExtInst,
        Probe::SiToFpInst => LLVMIsASIToFPInst,
        Probe::TruncInst => LLVMIsATruncInst,
        Probe::UiToFpInst => LLVMIsAUIToFPInst,
        Probe::ZExtInst => LLVMIsAZExtInst,
        Probe::ExtractValueInst => LLVMIsAExtractValueInst,
        Probe::LoadInst => LLVMIsALoadInst,
        Probe::VaArgInst => LLVMIsAVAArgInst,
        Probe::FreezeInst => LLVMIsAFreezeInst,
        Probe::AtomicCmpXchgInst => LLVMIsAAtomicCmpXchgInst,
        Probe::AtomicRmwInst => LLVMIsAAtomicRMWInst,
        Probe::FenceInst => LLVMIsAFenceInst,
    }
}
