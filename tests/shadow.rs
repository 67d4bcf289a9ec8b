//! Shadow execution: the fused plan and the minimal plan must agree on
//! observable state for any program legal under both.

use ethereum_types::U256;
use evmhugin::tracing::NoopTracer;
use evmhugin::{Config, Frame, Message, MinimalPlan, Output, Plan, StatusCode};
use rand::{Rng, SeedableRng};

fn run_both<'a>(code: &'a [u8], gas: i64) -> (Output, Output, Frame<'a>, Frame<'a>) {
    let plan = Plan::analyze(code);
    let minimal = MinimalPlan::analyze(code);
    let config = Config::default();

    let message = Message {
        gas,
        ..Message::default()
    };

    let mut fused_frame = Frame::new(message.clone(), code, &config, None, None).unwrap();
    let fused = fused_frame.execute(&plan, &mut NoopTracer);

    let mut minimal_frame = Frame::new(message, code, &config, None, None).unwrap();
    let minimal = minimal_frame.execute_minimal(&minimal, &mut NoopTracer);

    (fused, minimal, fused_frame, minimal_frame)
}

#[test]
fn fused_pairs_match_minimal() {
    // PUSH1 b, PUSH1 a, OP for each fusible arithmetic opcode, with
    // operand sets covering zero divisors and wrapping.
    for op in [0x01u8, 0x02, 0x04] {
        for (a, b) in [(5u8, 10u8), (0, 7), (7, 0), (255, 3), (1, 255)] {
            let code = [0x60, b, 0x60, a, op, 0x00];
            let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);

            assert_eq!(fused.status_code, StatusCode::Success, "op {:#x}", op);
            assert_eq!(minimal.status_code, StatusCode::Success);
            assert!(f1.same_state(&f2), "op {:#x} a {} b {}", op, a, b);
            assert_eq!(f1.stack().len(), 1);
        }
    }

    // Wide immediates fuse through the constants table.
    let mut code = vec![0x60, 0x07, 0x7f];
    code.extend_from_slice(&[0xff; 32]);
    code.extend_from_slice(&[0x04, 0x00]); // DIV: MAX / 7
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);
    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(*f1.stack().peek(), U256::MAX / U256::from(7));
}

#[test]
fn fused_jump_validates_destination() {
    // Scenario: fused PUSH+JUMP to a non-JUMPDEST faults identically.
    let code = [0x60, 0x03, 0x56, 0x00, 0x00];
    let (fused, minimal, _, _) = run_both(&code, 1_000_000);
    assert_eq!(fused.status_code, StatusCode::InvalidJump);
    assert_eq!(minimal.status_code, StatusCode::InvalidJump);
    assert_eq!(fused.gas_left, 0);
}

#[test]
fn dynamic_jumps_resolve_via_lookup() {
    // The DUP1/POP shuffle keeps the JUMP from fusing with a PUSH, so the
    // destination goes through the PC-to-stream lookup.
    // PUSH1 6; DUP1; POP; JUMP; STOP; JUMPDEST; PUSH1 42; STOP
    let code = [0x60, 0x06, 0x80, 0x50, 0x56, 0x00, 0x5b, 0x60, 0x2a, 0x00];
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);
    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(*f1.stack().peek(), 42.into());

    // Same for a non-fused JUMPI with a true condition.
    // PUSH1 1; PUSH1 8; DUP1; POP; JUMPI; STOP; JUMPDEST; PUSH1 42; STOP
    let code = [
        0x60, 0x01, 0x60, 0x08, 0x80, 0x50, 0x57, 0x00, 0x5b, 0x60, 0x2a, 0x00,
    ];
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);
    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(*f1.stack().peek(), 42.into());
}

#[test]
fn countdown_loop() {
    // PUSH1 5; JUMPDEST; PUSH1 1; SWAP1; SUB; DUP1; PUSH1 2; JUMPI; STOP
    // Counts 5 down to 0 through a fused conditional jump.
    let code = [
        0x60, 0x05, 0x5b, 0x60, 0x01, 0x90, 0x03, 0x80, 0x60, 0x02, 0x57, 0x00,
    ];
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);

    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(f1.stack().len(), 1);
    assert_eq!(*f1.stack().peek(), U256::zero());

    // Every loop iteration executes its whole block, so even the gas
    // counters agree here.
    assert_eq!(fused.gas_left, minimal.gas_left);
}

#[test]
fn truncated_push_executes_zero_padded() {
    // PUSH2 with one data byte: the missing byte reads as zero and the
    // code ends in an implicit STOP.
    let code = [0x61, 0xaa];
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);

    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(*f1.stack().peek(), 0xaa00.into());
}

#[test]
fn memory_and_hash_programs_match() {
    // MSTORE/MSTORE8/MCOPY/KECCAK256 exercise the dynamic-cost path in
    // both plans: store 42 at 0, a marker byte at 31, copy [0..32) to
    // [32..64), then hash the whole buffer.
    let code = [
        0x60, 0x2a, 0x60, 0x00, 0x52, // MSTORE(0, 42)
        0x60, 0xff, 0x60, 0x1f, 0x53, // MSTORE8(31, 0xff)
        0x60, 0x20, 0x60, 0x00, 0x60, 0x20, 0x5e, // MCOPY(32, 0, 32)
        0x60, 0x40, 0x60, 0x00, 0x20, // KECCAK256(0, 64)
        0x00,
    ];
    let (fused, minimal, f1, f2) = run_both(&code, 1_000_000);

    assert_eq!(fused.status_code, StatusCode::Success);
    assert_eq!(minimal.status_code, StatusCode::Success);
    assert!(f1.same_state(&f2));
    assert_eq!(f1.memory().size(), 64);
    assert_eq!(fused.gas_left, minimal.gas_left);
}

#[test]
fn random_straight_line_programs_match() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    // Stack-safe binary opcodes.
    const BINOPS: &[u8] = &[
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x0b, 0x10, 0x11, 0x12, 0x13, 0x14, 0x16,
        0x17, 0x18, 0x1a, 0x1b, 0x1c, 0x1d,
    ];

    for _ in 0..64 {
        let mut code = Vec::new();

        // Seed the stack with pushes of varied width.
        let pushes = rng.gen_range(4..12);
        for _ in 0..pushes {
            let n = rng.gen_range(1..=8u8);
            code.push(0x60 + n - 1);
            for _ in 0..n {
                code.push(rng.gen());
            }
        }

        // Fold with random binary ops, never draining below one item.
        for _ in 0..pushes - 1 {
            code.push(BINOPS[rng.gen_range(0..BINOPS.len())]);
        }

        // Some unary seasoning.
        if rng.gen_bool(0.5) {
            code.push(0x19); // NOT
        }
        if rng.gen_bool(0.5) {
            code.push(0x15); // ISZERO
        }

        code.push(0x00);

        let (fused, minimal, f1, f2) = run_both(&code, 10_000_000);

        assert_eq!(fused.status_code, StatusCode::Success, "code {:02x?}", code);
        assert_eq!(minimal.status_code, StatusCode::Success);
        assert!(f1.same_state(&f2), "state diverged for {:02x?}", code);
        assert_eq!(f1.stack().len(), 1);

        // Straight-line code with no dead tail: gas agrees too.
        assert_eq!(fused.gas_left, minimal.gas_left, "code {:02x?}", code);
    }
}

#[test]
fn deep_clone_snapshots_execution_state() {
    let code = [0x60, 0x05, 0x60, 0x0a, 0x01, 0x00];
    let config = Config::default();
    let mut frame = Frame::new(Message::default(), &code, &config, None, None).unwrap();

    let before = frame.deep_clone();
    assert!(frame.same_state(&before));

    let plan = Plan::analyze(&code);
    frame.execute(&plan, &mut NoopTracer);

    // Execution left a result on the stack; the snapshot is unchanged.
    assert!(!frame.same_state(&before));
    assert_eq!(before.stack().len(), 0);
    assert_eq!(frame.stack().len(), 1);
}
