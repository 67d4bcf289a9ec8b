use ethereum_types::{Address, U256};
use evmhugin::{opcode::OpCode, util::*, StatusCode};
use hex_literal::hex;

#[test]
fn push_push_add() {
    EvmTester::new()
        .code([0x60, 0x05, 0x60, 0x0a, 0x01, 0x00])
        .gas(100)
        .status(StatusCode::Success)
        .gas_used(9)
        .stack_top(15)
        .stack_height(1)
        .check();
}

#[test]
fn jump_to_jumpdest() {
    // PUSH1 4, JUMP, STOP, JUMPDEST, PUSH1 42, STOP
    EvmTester::new()
        .code([0x60, 0x04, 0x56, 0x00, 0x5b, 0x60, 0x2a, 0x00])
        .status(StatusCode::Success)
        .stack_top(42)
        .stack_height(1)
        .check();
}

#[test]
fn jump_to_non_jumpdest() {
    // Destination 3 is a STOP, not a JUMPDEST.
    EvmTester::new()
        .code([0x60, 0x03, 0x56, 0x00, 0x00])
        .status(StatusCode::InvalidJump)
        .check();
}

#[test]
fn jump_into_push_data() {
    // The 0x5b at position 4 is PUSH immediate data, not a JUMPDEST.
    EvmTester::new()
        .code([0x60, 0x04, 0x56, 0x61, 0x5b, 0x5b, 0x00])
        .status(StatusCode::InvalidJump)
        .check();
}

#[test]
fn push0() {
    EvmTester::new()
        .code([0x5f, 0x00])
        .status(StatusCode::Success)
        .stack_top(0)
        .stack_height(1)
        .check();
}

#[test]
fn add_wraps_at_word_width() {
    // PUSH32 2^256-1, PUSH1 1, ADD, STOP
    let mut code = vec![0x7f];
    code.extend_from_slice(&[0xff; 32]);
    code.extend_from_slice(&[0x60, 0x01, 0x01, 0x00]);

    EvmTester::new()
        .code(code)
        .status(StatusCode::Success)
        .stack_top(0)
        .stack_height(1)
        .check();
}

#[test]
fn keccak256_of_zero_memory() {
    // PUSH1 32, PUSH1 0, KECCAK256, STOP
    EvmTester::new()
        .code([0x60, 0x20, 0x60, 0x00, 0x20, 0x00])
        .status(StatusCode::Success)
        .stack_top(U256::from_big_endian(&hex!(
            "290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
        )))
        .memory_size(32)
        .check();
}

#[test]
fn log_in_static_context() {
    // PUSH1 topic, PUSH1 len, PUSH1 off, LOG1
    EvmTester::new()
        .code([0x60, 0xaa, 0x60, 0x00, 0x60, 0x00, 0xa1, 0x00])
        .static_mode()
        .status(StatusCode::WriteProtection)
        .log_count(0)
        .check();
}

#[test]
fn log_records_topics_and_data() {
    let output = EvmTester::new()
        .code(
            Bytecode::new()
                .mstore8_value(0, 0x42)
                .pushv(0xaa) // topic
                .pushv(1) // length
                .pushv(0) // offset
                .opcode(OpCode::LOG1)
                .opcode(OpCode::STOP),
        )
        .status(StatusCode::Success)
        .log_count(1)
        .check();

    let log = &output.logs[0];
    assert_eq!(log.topics.len(), 1);
    assert_eq!(U256::from_big_endian(log.topics[0].as_bytes()), 0xaa.into());
    assert_eq!(&log.data[..], &[0x42]);
}

#[test]
fn logs_discarded_on_revert() {
    let output = EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0xaa)
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::LOG1)
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::REVERT),
        )
        .status(StatusCode::Revert)
        .log_count(0)
        .check();

    assert!(output.output_data.is_empty());
}

#[test]
fn return_top_word() {
    EvmTester::new()
        .code(Bytecode::new().pushv(0x1234).ret_top())
        .status(StatusCode::Success)
        .output_value(0x1234)
        .check();
}

#[test]
fn revert_keeps_gas_and_output() {
    let output = EvmTester::new()
        .code(Bytecode::new().pushv(7).ret_top())
        .status(StatusCode::Success)
        .check();
    assert!(output.gas_left > 0);

    let output = EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(7)
                .mstore(0)
                .pushv(0x20)
                .pushv(0)
                .opcode(OpCode::REVERT),
        )
        .status(StatusCode::Revert)
        .output_value(7)
        .check();
    assert!(output.gas_left > 0);
}

#[test]
fn invalid_opcode() {
    EvmTester::new()
        .code([0xfe])
        .status(StatusCode::InvalidOpcode)
        .check();

    // Unassigned byte.
    EvmTester::new()
        .code([0x0c])
        .status(StatusCode::InvalidOpcode)
        .check();

    // Call-family opcodes are not executable at this layer.
    EvmTester::new()
        .code([0xf1])
        .status(StatusCode::InvalidOpcode)
        .check();
}

#[test]
fn out_of_gas() {
    EvmTester::new()
        .code([0x60, 0x05, 0x60, 0x0a, 0x01, 0x00])
        .gas(8)
        .status(StatusCode::OutOfGas)
        .check();
}

#[test]
fn stack_underflow() {
    EvmTester::new()
        .code([0x01, 0x00])
        .status(StatusCode::StackUnderflow)
        .check();
}

#[test]
fn stack_overflow() {
    // 1025 pushes.
    EvmTester::new()
        .code((1025 * Bytecode::new().pushv(1)).opcode(OpCode::STOP))
        .status(StatusCode::StackOverflow)
        .check();

    // 1024 is fine.
    EvmTester::new()
        .code((1024 * Bytecode::new().pushv(1)).opcode(OpCode::STOP))
        .status(StatusCode::Success)
        .stack_height(1024)
        .check();
}

#[test]
fn arithmetic_edge_cases() {
    // SDIV of MIN by -1 wraps back to MIN.
    let min = Bytecode::new()
        .pushb(hex!("8000000000000000000000000000000000000000000000000000000000000000"));
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(U256::MAX) // -1, divisor
                .append_bc(min)
                .opcode(OpCode::SDIV)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_data(hex!(
            "8000000000000000000000000000000000000000000000000000000000000000"
        ))
        .check();

    // DIV and MOD by zero yield zero.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(1)
                .opcode(OpCode::DIV)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0)
        .check();

    // EXP: 2^10 = 1024, and 0^0 = 1.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(10)
                .pushv(2)
                .opcode(OpCode::EXP)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(1024)
        .check();
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .pushv(0)
                .opcode(OpCode::EXP)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(1)
        .check();
}

#[test]
fn signextend_and_byte() {
    // SIGNEXTEND(0, 0xff) = -1.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0xff)
                .pushv(0)
                .opcode(OpCode::SIGNEXTEND)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_data([0xff; 32])
        .check();

    // BYTE(31, x) is the least significant byte.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0x1234)
                .pushv(31)
                .opcode(OpCode::BYTE)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0x34)
        .check();
}

#[test]
fn mstore8_rounds_memory_to_word() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .mstore8_value(33, 0xff)
                .opcode(OpCode::MSIZE)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(64)
        .check();
}

#[test]
fn mcopy_handles_overlap() {
    // Store 0x0102..08 at 0, copy bytes [0..32) to 2, return [0..32).
    EvmTester::new()
        .code(
            Bytecode::new()
                .mstore_value(0, U256::from_big_endian(&hex!(
                    "0102030405060708000000000000000000000000000000000000000000000000"
                )))
                .pushv(30) // len
                .pushv(0) // src
                .pushv(2) // dst
                .opcode(OpCode::MCOPY)
                .ret(0, 0x20),
        )
        .status(StatusCode::Success)
        .output_data(hex!(
            "0102010203040506070800000000000000000000000000000000000000000000"
        ))
        .check();
}

#[test]
fn memory_expansion_is_charged() {
    // MSTORE at offset 0 with an otherwise empty block: 3 (PUSH) + 3 (PUSH)
    // + 3 (MSTORE) static + 3 expansion for one word.
    EvmTester::new()
        .code(Bytecode::new().mstore_value(0, 1).opcode(OpCode::STOP))
        .status(StatusCode::Success)
        .gas_used(12)
        .check();
}

#[test]
fn memory_offset_out_of_bounds() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(U256::MAX)
                .opcode(OpCode::MLOAD)
                .opcode(OpCode::STOP),
        )
        .status(StatusCode::OutOfBounds)
        .check();
}

#[test]
fn sstore_and_sload_roundtrip() {
    let addr = Address::zero();

    let output = EvmTester::new()
        .code(
            Bytecode::new()
                .sstore(1, 0x2a)
                .sload(1)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0x2a)
        .check();
    assert!(output.logs.is_empty());

    // Pre-seeded storage is visible.
    EvmTester::new()
        .apply_db_fn(move |db| {
            use evmhugin::Database;
            db.set_storage(addr, 7.into(), 0xbeef.into());
        })
        .code(Bytecode::new().sload(7).ret_top())
        .status(StatusCode::Success)
        .output_value(0xbeef)
        .check();
}

#[test]
fn sstore_in_static_context() {
    EvmTester::new()
        .code(Bytecode::new().sstore(1, 2).opcode(OpCode::STOP))
        .static_mode()
        .status(StatusCode::WriteProtection)
        .check();
}

#[test]
fn transient_storage_roundtrip() {
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0x2a)
                .pushv(1)
                .opcode(OpCode::TSTORE)
                .pushv(1)
                .opcode(OpCode::TLOAD)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(0x2a)
        .check();

    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0x2a)
                .pushv(1)
                .opcode(OpCode::TSTORE)
                .opcode(OpCode::STOP),
        )
        .static_mode()
        .status(StatusCode::WriteProtection)
        .check();
}

#[test]
fn calldata_ops() {
    // CALLDATALOAD at 0 returns the first word, zero-padded.
    EvmTester::new()
        .input(vec![0x11, 0x22])
        .code(
            Bytecode::new()
                .pushv(0)
                .opcode(OpCode::CALLDATALOAD)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_data(hex!(
            "1122000000000000000000000000000000000000000000000000000000000000"
        ))
        .check();

    EvmTester::new()
        .input(vec![0; 5])
        .code(Bytecode::new().opcode(OpCode::CALLDATASIZE).ret_top())
        .status(StatusCode::Success)
        .output_value(5)
        .check();

    // CALLDATACOPY pads the tail with zeros.
    EvmTester::new()
        .input(vec![0xaa, 0xbb])
        .code(
            Bytecode::new()
                .pushv(0x20) // len
                .pushv(0) // src
                .pushv(0) // dst
                .opcode(OpCode::CALLDATACOPY)
                .ret(0, 0x20),
        )
        .status(StatusCode::Success)
        .output_data(hex!(
            "aabb000000000000000000000000000000000000000000000000000000000000"
        ))
        .check();
}

#[test]
fn environment_ops() {
    let tester = EvmTester::new().apply_host_fn(|host| {
        host.tx_context.block_number = 42;
        host.tx_context.block_timestamp = 1234;
        host.tx_context.block_base_fee = 7.into();
        host.tx_context.chain_id = 1.into();
        host.tx_context.block_gas_limit = 30_000_000;
    });

    tester
        .clone()
        .code(Bytecode::new().opcode(OpCode::NUMBER).ret_top())
        .status(StatusCode::Success)
        .output_value(42)
        .check();

    tester
        .clone()
        .code(Bytecode::new().opcode(OpCode::TIMESTAMP).ret_top())
        .status(StatusCode::Success)
        .output_value(1234)
        .check();

    tester
        .clone()
        .code(Bytecode::new().opcode(OpCode::BASEFEE).ret_top())
        .status(StatusCode::Success)
        .output_value(7)
        .check();

    tester
        .clone()
        .code(Bytecode::new().opcode(OpCode::CHAINID).ret_top())
        .status(StatusCode::Success)
        .output_value(1)
        .check();

    tester
        .code(Bytecode::new().opcode(OpCode::GASLIMIT).ret_top())
        .status(StatusCode::Success)
        .output_value(30_000_000u64)
        .check();
}

#[test]
fn self_context_ops() {
    // ADDRESS and CALLVALUE reflect the message.
    EvmTester::new()
        .value(99)
        .code(Bytecode::new().opcode(OpCode::CALLVALUE).ret_top())
        .status(StatusCode::Success)
        .output_value(99)
        .check();

    EvmTester::new()
        .code(Bytecode::new().opcode(OpCode::ADDRESS).ret_top())
        .status(StatusCode::Success)
        .output_value(0)
        .check();
}

#[test]
fn balance_uses_access_pricing() {
    let addr = Address::from_low_u64_be(0xbe);

    let output = EvmTester::new()
        .apply_db_fn(move |db| db.set_balance(addr, 1000.into()))
        .code(
            Bytecode::new()
                .pushv(0xbe)
                .opcode(OpCode::BALANCE)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(1000)
        .check();

    // Cold account access was charged on top of the static costs.
    assert!(10_000_000 - output.gas_left >= 2600);
}

#[test]
fn pc_reports_bytecode_position() {
    // PUSH1 0, POP, PC at bytecode position 3.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0)
                .opcode(OpCode::POP)
                .opcode(OpCode::PC)
                .ret_top(),
        )
        .status(StatusCode::Success)
        .output_value(3)
        .check();
}

#[test]
fn codesize_and_codecopy() {
    let code = Bytecode::new()
        .opcode(OpCode::CODESIZE)
        .ret_top()
        .build();
    let len = code.len();
    EvmTester::new()
        .code(code)
        .status(StatusCode::Success)
        .output_value(len as u64)
        .check();

    // Copy the first two bytes of the code itself.
    EvmTester::new()
        .code(
            Bytecode::new()
                .pushv(0x20) // len
                .pushv(0) // src
                .pushv(0) // dst
                .opcode(OpCode::CODECOPY)
                .ret(0, 2),
        )
        .status(StatusCode::Success)
        .output_data([0x60, 0x20])
        .check();
}

#[test]
fn conditional_jump_falls_through_on_zero() {
    // PUSH1 0, PUSH1 8, JUMPI, PUSH1 1, STOP, JUMPDEST, PUSH1 2, STOP
    EvmTester::new()
        .code([
            0x60, 0x00, 0x60, 0x08, 0x57, 0x60, 0x01, 0x00, 0x5b, 0x60, 0x02, 0x00,
        ])
        .status(StatusCode::Success)
        .stack_top(1)
        .check();

    // Nonzero condition takes the jump.
    EvmTester::new()
        .code([
            0x60, 0x01, 0x60, 0x08, 0x57, 0x60, 0x01, 0x00, 0x5b, 0x60, 0x02, 0x00,
        ])
        .status(StatusCode::Success)
        .stack_top(2)
        .check();
}

#[test]
fn journal_records_sstore() {
    let tester = EvmTester::new().apply_db_fn(|db| {
        use evmhugin::Database;
        db.set_storage(Address::zero(), 5.into(), 0x11.into());
    });

    // The mocked host records the previous value of every SSTORE; the
    // journal itself lives behind the tester, so assert via gas: a second
    // store to the same slot is warm.
    let cold = tester
        .clone()
        .code(Bytecode::new().sstore(5, 0x22).opcode(OpCode::STOP))
        .status(StatusCode::Success)
        .check();
    let warm = tester
        .code(
            Bytecode::new()
                .sstore(5, 0x22)
                .sstore(5, 0x33)
                .opcode(OpCode::STOP),
        )
        .status(StatusCode::Success)
        .check();

    let cold_used = 10_000_000 - cold.gas_left;
    let warm_used = 10_000_000 - warm.gas_left;
    // Second write costs the warm price (100) plus its pushes.
    assert!(warm_used - cold_used < 2100);
}
