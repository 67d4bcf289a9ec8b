//! Handler implementations and the two execution loops.
//!
//! The optimized loop walks the plan's stream, calling the handler stored in
//! each cell; gas and stack bounds for fixed-cost opcodes were validated on
//! block entry, so handlers run unchecked. The minimal loop walks raw
//! bytecode with a per-opcode requirements check in front of every
//! instruction.

use crate::{
    common::{Output, StatusCode},
    frame::Frame,
    instructions::{
        arithmetic, bitwise, boolean, control, external,
        instruction_table::{get_instruction_table, InstructionTable},
        logging, memory, stack_manip, storage,
    },
    opcode::{fused, OpCode},
    plan::{BlockMetadata, Handler, MinimalPlan, Plan},
    stack::Stack,
    tracing::Tracer,
};
use bytes::Bytes;
use ethereum_types::U256;

/// Validate a block's static requirements and debit its gas.
#[inline]
pub(crate) fn enter_block(frame: &mut Frame, meta: BlockMetadata) -> Result<(), StatusCode> {
    if (meta.static_gas as i64) > frame.gas_left {
        return Err(StatusCode::OutOfGas);
    }

    let height = frame.stack.len() as i32;
    if height + (meta.min_stack as i32) < 0 {
        return Err(StatusCode::StackUnderflow);
    }
    if height + meta.max_stack as i32 > Stack::limit() as i32 {
        return Err(StatusCode::StackOverflow);
    }

    frame.gas_left -= meta.static_gas as i64;
    Ok(())
}

macro_rules! stack_instr {
    ($name:ident, $imp:path) => {
        fn $name(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
            $imp(&mut frame.stack);
            Ok(idx + 1)
        }
    };
}

macro_rules! frame_instr {
    ($name:ident, $imp:path) => {
        fn $name(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
            $imp(frame);
            Ok(idx + 1)
        }
    };
}

macro_rules! frame_try_instr {
    ($name:ident, $imp:path) => {
        fn $name(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
            $imp(frame)?;
            Ok(idx + 1)
        }
    };
}

stack_instr!(op_add, arithmetic::add);
stack_instr!(op_mul, arithmetic::mul);
stack_instr!(op_sub, arithmetic::sub);
stack_instr!(op_div, arithmetic::div);
stack_instr!(op_sdiv, arithmetic::sdiv);
stack_instr!(op_mod, arithmetic::modulo);
stack_instr!(op_smod, arithmetic::smod);
stack_instr!(op_addmod, arithmetic::addmod);
stack_instr!(op_mulmod, arithmetic::mulmod);
stack_instr!(op_signextend, arithmetic::signextend);

stack_instr!(op_lt, boolean::lt);
stack_instr!(op_gt, boolean::gt);
stack_instr!(op_slt, boolean::slt);
stack_instr!(op_sgt, boolean::sgt);
stack_instr!(op_eq, boolean::eq);
stack_instr!(op_iszero, boolean::iszero);
stack_instr!(op_and, boolean::and);
stack_instr!(op_or, boolean::or);
stack_instr!(op_xor, boolean::xor);
stack_instr!(op_not, boolean::not);
stack_instr!(op_byte, bitwise::byte);
stack_instr!(op_shl, bitwise::shl);
stack_instr!(op_shr, bitwise::shr);
stack_instr!(op_sar, bitwise::sar);
stack_instr!(op_pop, stack_manip::pop);

frame_try_instr!(op_exp, arithmetic::exp);
frame_try_instr!(op_keccak256, memory::keccak256);
frame_try_instr!(op_mload, memory::mload);
frame_try_instr!(op_mstore, memory::mstore);
frame_try_instr!(op_mstore8, memory::mstore8);
frame_try_instr!(op_mcopy, memory::mcopy);
frame_try_instr!(op_calldatacopy, memory::calldatacopy);
frame_try_instr!(op_codecopy, memory::codecopy);
frame_try_instr!(op_balance, external::balance);
frame_try_instr!(op_sload, storage::sload);
frame_try_instr!(op_sstore, storage::sstore);
frame_try_instr!(op_tstore, storage::tstore);

frame_instr!(op_address, external::address);
frame_instr!(op_caller, external::caller);
frame_instr!(op_callvalue, external::callvalue);
frame_instr!(op_calldataload, external::calldataload);
frame_instr!(op_calldatasize, external::calldatasize);
frame_instr!(op_origin, external::origin);
frame_instr!(op_gasprice, external::gasprice);
frame_instr!(op_coinbase, external::coinbase);
frame_instr!(op_timestamp, external::timestamp);
frame_instr!(op_number, external::number);
frame_instr!(op_prevrandao, external::prevrandao);
frame_instr!(op_gaslimit, external::gaslimit);
frame_instr!(op_chainid, external::chainid);
frame_instr!(op_basefee, external::basefee);
frame_instr!(op_selfbalance, external::selfbalance);
frame_instr!(op_msize, memory::msize);
frame_instr!(op_gas, control::gas);
frame_instr!(op_tload, storage::tload);

fn op_stop(_frame: &mut Frame, _plan: &Plan, _idx: usize) -> Result<usize, StatusCode> {
    Err(StatusCode::Success)
}

fn op_invalid(_frame: &mut Frame, _plan: &Plan, _idx: usize) -> Result<usize, StatusCode> {
    Err(StatusCode::InvalidOpcode)
}

fn op_return(frame: &mut Frame, _plan: &Plan, _idx: usize) -> Result<usize, StatusCode> {
    control::ret(frame)?;
    Err(StatusCode::Success)
}

fn op_revert(frame: &mut Frame, _plan: &Plan, _idx: usize) -> Result<usize, StatusCode> {
    control::ret(frame)?;
    Err(StatusCode::Revert)
}

fn op_codesize(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    memory::codesize(&mut frame.stack, frame.code);
    Ok(idx + 1)
}

fn op_jumpdest(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    enter_block(frame, plan.block_meta(idx + 1))?;
    Ok(idx + 2)
}

fn op_pc(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    frame.stack.push(plan.inline_value(idx + 1).into());
    Ok(idx + 2)
}

fn op_push0(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    frame.stack.push(U256::zero());
    Ok(idx + 1)
}

fn op_push_inline(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    frame.stack.push(U256::from(plan.inline_value(idx + 1) as u64));
    Ok(idx + 2)
}

fn op_push_wide(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    frame.stack.push(*plan.const_word(idx + 1));
    Ok(idx + 2)
}

fn op_dup<const N: usize>(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    stack_manip::dup(&mut frame.stack, N);
    Ok(idx + 1)
}

fn op_swap<const N: usize>(
    frame: &mut Frame,
    _plan: &Plan,
    idx: usize,
) -> Result<usize, StatusCode> {
    stack_manip::swap(&mut frame.stack, N);
    Ok(idx + 1)
}

fn op_log<const N: usize>(frame: &mut Frame, _plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    logging::log(frame, N)?;
    Ok(idx + 1)
}

/// Resolve a dynamic jump destination to its stream index.
#[inline]
fn jump_to(plan: &Plan, dst: U256) -> Result<usize, StatusCode> {
    if dst > U256::from(u32::MAX) {
        return Err(StatusCode::InvalidJump);
    }
    plan.lookup_stream_index(dst.as_usize())
        .ok_or(StatusCode::InvalidJump)
}

fn op_jump(frame: &mut Frame, plan: &Plan, _idx: usize) -> Result<usize, StatusCode> {
    let dst = frame.stack.pop();
    jump_to(plan, dst)
}

fn op_jumpi(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    let dst = frame.stack.pop();
    let condition = frame.stack.pop();
    if !condition.is_zero() {
        jump_to(plan, dst)
    } else {
        Ok(idx + 1)
    }
}

macro_rules! fused_arith {
    ($inline_name:ident, $pointer_name:ident, $imp:expr) => {
        fn $inline_name(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
            let imm = U256::from(plan.inline_value(idx + 1) as u64);
            let other = frame.stack.pop();
            frame.stack.push($imp(imm, other));
            Ok(idx + 2)
        }

        fn $pointer_name(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
            let imm = *plan.const_word(idx + 1);
            let other = frame.stack.pop();
            frame.stack.push($imp(imm, other));
            Ok(idx + 2)
        }
    };
}

// The immediate takes the place of the PUSH result: for DIV it is the
// dividend, the popped operand the divisor.
fused_arith!(op_push_add_inline, op_push_add_pointer, |a: U256, b: U256| a
    .overflowing_add(b)
    .0);
fused_arith!(op_push_mul_inline, op_push_mul_pointer, |a: U256, b: U256| a
    .overflowing_mul(b)
    .0);
fused_arith!(op_push_div_inline, op_push_div_pointer, |a: U256, b: U256| {
    if b.is_zero() {
        U256::zero()
    } else {
        a / b
    }
});

fn op_push_jump_inline(_frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    let dst = plan.inline_value(idx + 1);
    plan.lookup_stream_index(dst).ok_or(StatusCode::InvalidJump)
}

fn op_push_jump_pointer(_frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    jump_to(plan, *plan.const_word(idx + 1))
}

fn op_push_jumpi_inline(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    let condition = frame.stack.pop();
    if !condition.is_zero() {
        let dst = plan.inline_value(idx + 1);
        plan.lookup_stream_index(dst).ok_or(StatusCode::InvalidJump)
    } else {
        Ok(idx + 2)
    }
}

fn op_push_jumpi_pointer(frame: &mut Frame, plan: &Plan, idx: usize) -> Result<usize, StatusCode> {
    let condition = frame.stack.pop();
    if !condition.is_zero() {
        jump_to(plan, *plan.const_word(idx + 1))
    } else {
        Ok(idx + 2)
    }
}

/// Handler for a non-PUSH opcode. Unassigned bytes and the opcodes this
/// layer does not execute (calls, creates, selfdestruct) resolve to the
/// invalid handler.
pub(crate) fn stream_handler(op: OpCode) -> Handler {
    debug_assert!(!op.is_push(), "PUSH emission picks its own handler");

    match op {
        OpCode::STOP => op_stop,
        OpCode::ADD => op_add,
        OpCode::MUL => op_mul,
        OpCode::SUB => op_sub,
        OpCode::DIV => op_div,
        OpCode::SDIV => op_sdiv,
        OpCode::MOD => op_mod,
        OpCode::SMOD => op_smod,
        OpCode::ADDMOD => op_addmod,
        OpCode::MULMOD => op_mulmod,
        OpCode::EXP => op_exp,
        OpCode::SIGNEXTEND => op_signextend,
        OpCode::LT => op_lt,
        OpCode::GT => op_gt,
        OpCode::SLT => op_slt,
        OpCode::SGT => op_sgt,
        OpCode::EQ => op_eq,
        OpCode::ISZERO => op_iszero,
        OpCode::AND => op_and,
        OpCode::OR => op_or,
        OpCode::XOR => op_xor,
        OpCode::NOT => op_not,
        OpCode::BYTE => op_byte,
        OpCode::SHL => op_shl,
        OpCode::SHR => op_shr,
        OpCode::SAR => op_sar,
        OpCode::KECCAK256 => op_keccak256,
        OpCode::ADDRESS => op_address,
        OpCode::BALANCE => op_balance,
        OpCode::ORIGIN => op_origin,
        OpCode::CALLER => op_caller,
        OpCode::CALLVALUE => op_callvalue,
        OpCode::CALLDATALOAD => op_calldataload,
        OpCode::CALLDATASIZE => op_calldatasize,
        OpCode::CALLDATACOPY => op_calldatacopy,
        OpCode::CODESIZE => op_codesize,
        OpCode::CODECOPY => op_codecopy,
        OpCode::GASPRICE => op_gasprice,
        OpCode::COINBASE => op_coinbase,
        OpCode::TIMESTAMP => op_timestamp,
        OpCode::NUMBER => op_number,
        OpCode::PREVRANDAO => op_prevrandao,
        OpCode::GASLIMIT => op_gaslimit,
        OpCode::CHAINID => op_chainid,
        OpCode::SELFBALANCE => op_selfbalance,
        OpCode::BASEFEE => op_basefee,
        OpCode::POP => op_pop,
        OpCode::MLOAD => op_mload,
        OpCode::MSTORE => op_mstore,
        OpCode::MSTORE8 => op_mstore8,
        OpCode::SLOAD => op_sload,
        OpCode::SSTORE => op_sstore,
        OpCode::JUMP => op_jump,
        OpCode::JUMPI => op_jumpi,
        OpCode::PC => op_pc,
        OpCode::MSIZE => op_msize,
        OpCode::GAS => op_gas,
        OpCode::JUMPDEST => op_jumpdest,
        OpCode::TLOAD => op_tload,
        OpCode::TSTORE => op_tstore,
        OpCode::MCOPY => op_mcopy,
        OpCode::PUSH0 => op_push0,
        OpCode::DUP1 => op_dup::<1>,
        OpCode::DUP2 => op_dup::<2>,
        OpCode::DUP3 => op_dup::<3>,
        OpCode::DUP4 => op_dup::<4>,
        OpCode::DUP5 => op_dup::<5>,
        OpCode::DUP6 => op_dup::<6>,
        OpCode::DUP7 => op_dup::<7>,
        OpCode::DUP8 => op_dup::<8>,
        OpCode::DUP9 => op_dup::<9>,
        OpCode::DUP10 => op_dup::<10>,
        OpCode::DUP11 => op_dup::<11>,
        OpCode::DUP12 => op_dup::<12>,
        OpCode::DUP13 => op_dup::<13>,
        OpCode::DUP14 => op_dup::<14>,
        OpCode::DUP15 => op_dup::<15>,
        OpCode::DUP16 => op_dup::<16>,
        OpCode::SWAP1 => op_swap::<1>,
        OpCode::SWAP2 => op_swap::<2>,
        OpCode::SWAP3 => op_swap::<3>,
        OpCode::SWAP4 => op_swap::<4>,
        OpCode::SWAP5 => op_swap::<5>,
        OpCode::SWAP6 => op_swap::<6>,
        OpCode::SWAP7 => op_swap::<7>,
        OpCode::SWAP8 => op_swap::<8>,
        OpCode::SWAP9 => op_swap::<9>,
        OpCode::SWAP10 => op_swap::<10>,
        OpCode::SWAP11 => op_swap::<11>,
        OpCode::SWAP12 => op_swap::<12>,
        OpCode::SWAP13 => op_swap::<13>,
        OpCode::SWAP14 => op_swap::<14>,
        OpCode::SWAP15 => op_swap::<15>,
        OpCode::SWAP16 => op_swap::<16>,
        OpCode::LOG0 => op_log::<0>,
        OpCode::LOG1 => op_log::<1>,
        OpCode::LOG2 => op_log::<2>,
        OpCode::LOG3 => op_log::<3>,
        OpCode::LOG4 => op_log::<4>,
        OpCode::RETURN => op_return,
        OpCode::REVERT => op_revert,
        _ => op_invalid,
    }
}

/// Handler for PUSH1..PUSH32, by payload placement.
pub(crate) fn push_stream_handler(inline: bool) -> Handler {
    if inline {
        op_push_inline
    } else {
        op_push_wide
    }
}

/// Handler for one of the ten synthetic fused opcodes.
pub(crate) fn fused_stream_handler(op: u16) -> Handler {
    match op {
        fused::PUSH_ADD_INLINE => op_push_add_inline,
        fused::PUSH_ADD_POINTER => op_push_add_pointer,
        fused::PUSH_MUL_INLINE => op_push_mul_inline,
        fused::PUSH_MUL_POINTER => op_push_mul_pointer,
        fused::PUSH_DIV_INLINE => op_push_div_inline,
        fused::PUSH_DIV_POINTER => op_push_div_pointer,
        fused::PUSH_JUMP_INLINE => op_push_jump_inline,
        fused::PUSH_JUMP_POINTER => op_push_jump_pointer,
        fused::PUSH_JUMPI_INLINE => op_push_jumpi_inline,
        fused::PUSH_JUMPI_POINTER => op_push_jumpi_pointer,
        other => unreachable!("not a fused opcode: {:#x}", other),
    }
}

/// Fold a terminal status into the call's [`Output`], transferring logs on
/// success and discarding them otherwise.
fn finish<T: Tracer>(frame: &mut Frame, status: StatusCode, tracer: &mut T) -> Output {
    let output = match status {
        StatusCode::Success => Output {
            status_code: StatusCode::Success,
            gas_left: frame.gas_left,
            output_data: core::mem::take(&mut frame.output_data),
            logs: core::mem::take(&mut frame.logs),
        },
        StatusCode::Revert => {
            frame.logs.clear();
            Output {
                status_code: StatusCode::Revert,
                gas_left: frame.gas_left,
                output_data: core::mem::take(&mut frame.output_data),
                logs: Vec::new(),
            }
        }
        fault => {
            if !T::DUMMY {
                tracer.notify_error(frame, fault);
            }
            frame.logs.clear();
            Output {
                status_code: fault,
                gas_left: 0,
                output_data: Bytes::new(),
                logs: Vec::new(),
            }
        }
    };

    if !T::DUMMY {
        tracer.notify_execution_end(&output);
    }

    output
}

/// Execute an optimized plan against the frame.
pub(crate) fn run<T: Tracer>(plan: &Plan, frame: &mut Frame, tracer: &mut T) -> Output {
    if !T::DUMMY {
        tracer.notify_execution_start(frame.code, frame.gas_left);
    }

    let status = match enter_block(frame, plan.entry_block) {
        Err(status) => status,
        Ok(()) => {
            let mut idx = 0;
            loop {
                if !T::DUMMY {
                    tracer.notify_instruction_start(frame);
                }
                match (plan.handler(idx))(frame, plan, idx) {
                    Ok(next) => {
                        if !T::DUMMY {
                            tracer.notify_instruction_end(frame);
                        }
                        idx = next;
                    }
                    Err(status) => break status,
                }
            }
        }
    };

    finish(frame, status, tracer)
}

fn check_requirements(
    instruction_table: &InstructionTable,
    frame: &mut Frame,
    op: OpCode,
) -> Result<(), StatusCode> {
    let metrics = if let Some(v) = instruction_table[op.to_usize()] {
        v
    } else {
        return Err(StatusCode::InvalidOpcode);
    };

    frame.gas_left -= metrics.gas_cost as i64;
    if frame.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    let stack_size = frame.stack.len();
    if stack_size == Stack::limit() {
        if metrics.can_overflow_stack {
            return Err(StatusCode::StackOverflow);
        }
    } else if stack_size < metrics.stack_height_required.into() {
        return Err(StatusCode::StackUnderflow);
    }

    Ok(())
}

fn minimal_jump(frame: &mut Frame, plan: &MinimalPlan) -> Result<usize, StatusCode> {
    let dst = frame.stack.pop();
    if dst >= U256::from(plan.code.len()) || !plan.is_jumpdest(dst.as_usize()) {
        return Err(StatusCode::InvalidJump);
    }

    Ok(dst.as_usize())
}

fn exec_minimal<T: Tracer>(
    plan: &MinimalPlan,
    frame: &mut Frame,
    tracer: &mut T,
) -> Result<(), StatusCode> {
    let instruction_table = get_instruction_table();

    let mut pc = 0;

    loop {
        if pc >= plan.code.len() {
            // Implicit STOP past the end of the code.
            break;
        }

        let op = OpCode(plan.code[pc]);

        if !T::DUMMY {
            tracer.notify_instruction_start(frame);
        }

        check_requirements(instruction_table, frame, op)?;

        match op {
            OpCode::STOP => {
                break;
            }
            OpCode::ADD => {
                arithmetic::add(&mut frame.stack);
            }
            OpCode::MUL => {
                arithmetic::mul(&mut frame.stack);
            }
            OpCode::SUB => {
                arithmetic::sub(&mut frame.stack);
            }
            OpCode::DIV => {
                arithmetic::div(&mut frame.stack);
            }
            OpCode::SDIV => {
                arithmetic::sdiv(&mut frame.stack);
            }
            OpCode::MOD => {
                arithmetic::modulo(&mut frame.stack);
            }
            OpCode::SMOD => {
                arithmetic::smod(&mut frame.stack);
            }
            OpCode::ADDMOD => {
                arithmetic::addmod(&mut frame.stack);
            }
            OpCode::MULMOD => {
                arithmetic::mulmod(&mut frame.stack);
            }
            OpCode::EXP => {
                arithmetic::exp(frame)?;
            }
            OpCode::SIGNEXTEND => {
                arithmetic::signextend(&mut frame.stack);
            }
            OpCode::LT => {
                boolean::lt(&mut frame.stack);
            }
            OpCode::GT => {
                boolean::gt(&mut frame.stack);
            }
            OpCode::SLT => {
                boolean::slt(&mut frame.stack);
            }
            OpCode::SGT => {
                boolean::sgt(&mut frame.stack);
            }
            OpCode::EQ => {
                boolean::eq(&mut frame.stack);
            }
            OpCode::ISZERO => {
                boolean::iszero(&mut frame.stack);
            }
            OpCode::AND => {
                boolean::and(&mut frame.stack);
            }
            OpCode::OR => {
                boolean::or(&mut frame.stack);
            }
            OpCode::XOR => {
                boolean::xor(&mut frame.stack);
            }
            OpCode::NOT => {
                boolean::not(&mut frame.stack);
            }
            OpCode::BYTE => {
                bitwise::byte(&mut frame.stack);
            }
            OpCode::SHL => {
                bitwise::shl(&mut frame.stack);
            }
            OpCode::SHR => {
                bitwise::shr(&mut frame.stack);
            }
            OpCode::SAR => {
                bitwise::sar(&mut frame.stack);
            }
            OpCode::KECCAK256 => {
                memory::keccak256(frame)?;
            }
            OpCode::ADDRESS => {
                external::address(frame);
            }
            OpCode::BALANCE => {
                external::balance(frame)?;
            }
            OpCode::ORIGIN => {
                external::origin(frame);
            }
            OpCode::CALLER => {
                external::caller(frame);
            }
            OpCode::CALLVALUE => {
                external::callvalue(frame);
            }
            OpCode::CALLDATALOAD => {
                external::calldataload(frame);
            }
            OpCode::CALLDATASIZE => {
                external::calldatasize(frame);
            }
            OpCode::CALLDATACOPY => {
                memory::calldatacopy(frame)?;
            }
            OpCode::CODESIZE => {
                memory::codesize(&mut frame.stack, frame.code);
            }
            OpCode::CODECOPY => {
                memory::codecopy(frame)?;
            }
            OpCode::GASPRICE => {
                external::gasprice(frame);
            }
            OpCode::COINBASE => {
                external::coinbase(frame);
            }
            OpCode::TIMESTAMP => {
                external::timestamp(frame);
            }
            OpCode::NUMBER => {
                external::number(frame);
            }
            OpCode::PREVRANDAO => {
                external::prevrandao(frame);
            }
            OpCode::GASLIMIT => {
                external::gaslimit(frame);
            }
            OpCode::CHAINID => {
                external::chainid(frame);
            }
            OpCode::SELFBALANCE => {
                external::selfbalance(frame);
            }
            OpCode::BASEFEE => {
                external::basefee(frame);
            }
            OpCode::POP => {
                stack_manip::pop(&mut frame.stack);
            }
            OpCode::MLOAD => {
                memory::mload(frame)?;
            }
            OpCode::MSTORE => {
                memory::mstore(frame)?;
            }
            OpCode::MSTORE8 => {
                memory::mstore8(frame)?;
            }
            OpCode::SLOAD => {
                storage::sload(frame)?;
            }
            OpCode::SSTORE => {
                storage::sstore(frame)?;
            }
            OpCode::JUMP => {
                pc = minimal_jump(frame, plan)?;
                if !T::DUMMY {
                    tracer.notify_instruction_end(frame);
                }
                continue;
            }
            OpCode::JUMPI => {
                if !frame.stack.get(1).is_zero() {
                    pc = minimal_jump(frame, plan)?;
                    frame.stack.pop();
                    if !T::DUMMY {
                        tracer.notify_instruction_end(frame);
                    }
                    continue;
                } else {
                    frame.stack.pop();
                    frame.stack.pop();
                }
            }
            OpCode::PC => frame.stack.push(pc.into()),
            OpCode::MSIZE => memory::msize(frame),
            OpCode::GAS => control::gas(frame),
            OpCode::JUMPDEST => {}
            OpCode::TLOAD => {
                storage::tload(frame);
            }
            OpCode::TSTORE => {
                storage::tstore(frame)?;
            }
            OpCode::MCOPY => {
                memory::mcopy(frame)?;
            }
            OpCode::PUSH0 => frame.stack.push(U256::zero()),
            OpCode::PUSH1
            | OpCode::PUSH2
            | OpCode::PUSH3
            | OpCode::PUSH4
            | OpCode::PUSH5
            | OpCode::PUSH6
            | OpCode::PUSH7
            | OpCode::PUSH8
            | OpCode::PUSH9
            | OpCode::PUSH10
            | OpCode::PUSH11
            | OpCode::PUSH12
            | OpCode::PUSH13
            | OpCode::PUSH14
            | OpCode::PUSH15
            | OpCode::PUSH16
            | OpCode::PUSH17
            | OpCode::PUSH18
            | OpCode::PUSH19
            | OpCode::PUSH20
            | OpCode::PUSH21
            | OpCode::PUSH22
            | OpCode::PUSH23
            | OpCode::PUSH24
            | OpCode::PUSH25
            | OpCode::PUSH26
            | OpCode::PUSH27
            | OpCode::PUSH28
            | OpCode::PUSH29
            | OpCode::PUSH30
            | OpCode::PUSH31
            | OpCode::PUSH32 => {
                let start = core::cmp::min(pc + 1, plan.code.len());
                pc += stack_manip::load_push(
                    &mut frame.stack,
                    &plan.code[start..],
                    op.immediate_len(),
                );
            }
            OpCode::DUP1
            | OpCode::DUP2
            | OpCode::DUP3
            | OpCode::DUP4
            | OpCode::DUP5
            | OpCode::DUP6
            | OpCode::DUP7
            | OpCode::DUP8
            | OpCode::DUP9
            | OpCode::DUP10
            | OpCode::DUP11
            | OpCode::DUP12
            | OpCode::DUP13
            | OpCode::DUP14
            | OpCode::DUP15
            | OpCode::DUP16 => {
                stack_manip::dup(
                    &mut frame.stack,
                    op.to_usize() - OpCode::DUP1.to_usize() + 1,
                );
            }
            OpCode::SWAP1
            | OpCode::SWAP2
            | OpCode::SWAP3
            | OpCode::SWAP4
            | OpCode::SWAP5
            | OpCode::SWAP6
            | OpCode::SWAP7
            | OpCode::SWAP8
            | OpCode::SWAP9
            | OpCode::SWAP10
            | OpCode::SWAP11
            | OpCode::SWAP12
            | OpCode::SWAP13
            | OpCode::SWAP14
            | OpCode::SWAP15
            | OpCode::SWAP16 => stack_manip::swap(
                &mut frame.stack,
                op.to_usize() - OpCode::SWAP1.to_usize() + 1,
            ),
            OpCode::LOG0 | OpCode::LOG1 | OpCode::LOG2 | OpCode::LOG3 | OpCode::LOG4 => {
                logging::log(frame, op.to_usize() - OpCode::LOG0.to_usize())?;
            }
            OpCode::RETURN => {
                control::ret(frame)?;
                break;
            }
            OpCode::REVERT => {
                control::ret(frame)?;
                return Err(StatusCode::Revert);
            }
            OpCode::INVALID => {
                return Err(StatusCode::InvalidOpcode);
            }
            other => {
                unreachable!("reached unhandled opcode: {}", other);
            }
        }

        if !T::DUMMY {
            tracer.notify_instruction_end(frame);
        }

        pc += 1;
    }

    Ok(())
}

/// Execute a minimal plan against the frame.
pub(crate) fn run_minimal<T: Tracer>(
    plan: &MinimalPlan,
    frame: &mut Frame,
    tracer: &mut T,
) -> Output {
    if !T::DUMMY {
        tracer.notify_execution_start(frame.code, frame.gas_left);
    }

    let status = match exec_minimal(plan, frame, tracer) {
        Ok(()) => StatusCode::Success,
        Err(status) => status,
    };

    finish(frame, status, tracer)
}
