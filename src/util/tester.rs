use crate::{
    common::{Message, Output, StatusCode},
    config::Config,
    db::InMemoryDatabase,
    frame::Frame,
    plan::{MinimalPlan, Plan},
    tracing::NoopTracer,
    util::{Bytecode, MockedHost},
};
use bytes::Bytes;
use educe::Educe;
use ethereum_types::U256;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
enum GasCheck {
    Used(i64),
    Left(i64),
}

/// Tester that executes EVM bytecode with `MockedHost` and
/// `InMemoryDatabase` collaborators and runs the configured checks.
///
/// Every `check()` executes the code twice: once through the fused plan and
/// once through the minimal plan against identical collaborator copies, and
/// asserts that both runs agree on status, output, logs and frame state
/// before applying the caller's expectations to the fused run.
#[derive(Clone, Educe)]
#[educe(Debug)]
#[must_use]
pub struct EvmTester {
    host: MockedHost,
    db: InMemoryDatabase,
    #[educe(Debug(ignore))]
    apply_host_fns: Vec<Arc<dyn Fn(&mut MockedHost)>>,
    #[educe(Debug(ignore))]
    apply_db_fns: Vec<Arc<dyn Fn(&mut InMemoryDatabase)>>,
    #[educe(Debug(ignore))]
    inspect_output_fn: Arc<dyn Fn(&[u8])>,
    message: Message,
    code: Bytes,
    gas_check: Option<GasCheck>,
    expected_status_codes: Option<Vec<StatusCode>>,
    expected_output_data: Option<Vec<u8>>,
    expected_stack_top: Option<U256>,
    expected_stack_height: Option<usize>,
    expected_memory_size: Option<usize>,
    expected_log_count: Option<usize>,
}

impl Default for EvmTester {
    fn default() -> Self {
        Self::new()
    }
}

impl EvmTester {
    pub fn new() -> Self {
        Self {
            host: MockedHost::default(),
            db: InMemoryDatabase::new(),
            apply_host_fns: Vec::new(),
            apply_db_fns: Vec::new(),
            inspect_output_fn: Arc::new(|_| ()),
            message: Message {
                gas: 10_000_000,
                ..Message::default()
            },
            code: Bytes::new(),
            gas_check: None,
            expected_status_codes: None,
            expected_output_data: None,
            expected_stack_top: None,
            expected_stack_height: None,
            expected_memory_size: None,
            expected_log_count: None,
        }
    }

    /// Set code to be executed.
    pub fn code(mut self, code: impl Into<Bytecode>) -> Self {
        self.code = code.into().build().into();
        self
    }

    /// Set gas for execution.
    pub fn gas(mut self, gas: i64) -> Self {
        self.message.gas = gas;
        self
    }

    /// Execute in static mode.
    pub fn static_mode(mut self) -> Self {
        self.message.is_static = true;
        self
    }

    /// Set the call value.
    pub fn value(mut self, value: impl Into<U256>) -> Self {
        self.message.value = value.into();
        self
    }

    /// Set the call input bytes served by the host.
    pub fn input(mut self, input: impl Into<Bytes>) -> Self {
        self.host.input = input.into();
        self
    }

    /// Queue a mutation of the host before execution.
    pub fn apply_host_fn(mut self, f: impl Fn(&mut MockedHost) + 'static) -> Self {
        self.apply_host_fns.push(Arc::new(f));
        self
    }

    /// Queue a mutation of the database before execution.
    pub fn apply_db_fn(mut self, f: impl Fn(&mut InMemoryDatabase) + 'static) -> Self {
        self.apply_db_fns.push(Arc::new(f));
        self
    }

    /// Expect this status code.
    pub fn status(mut self, expected: StatusCode) -> Self {
        self.expected_status_codes = Some(vec![expected]);
        self
    }

    /// Expect one of these status codes.
    pub fn status_one_of(mut self, expected: impl IntoIterator<Item = StatusCode>) -> Self {
        self.expected_status_codes = Some(expected.into_iter().collect());
        self
    }

    /// Expect this much gas to have been consumed.
    pub fn gas_used(mut self, expected: i64) -> Self {
        self.gas_check = Some(GasCheck::Used(expected));
        self
    }

    /// Expect this much gas to be left.
    pub fn gas_left(mut self, expected: i64) -> Self {
        self.gas_check = Some(GasCheck::Left(expected));
        self
    }

    /// Expect the output to equal these bytes.
    pub fn output_data(mut self, expected: impl AsRef<[u8]>) -> Self {
        self.expected_output_data = Some(expected.as_ref().to_vec());
        self
    }

    /// Expect the output to be one word with this value.
    pub fn output_value(mut self, expected: impl Into<U256>) -> Self {
        let mut b = [0; 32];
        expected.into().to_big_endian(&mut b);
        self.expected_output_data = Some(b.to_vec());
        self
    }

    /// Expect this value on top of the stack after execution.
    pub fn stack_top(mut self, expected: impl Into<U256>) -> Self {
        self.expected_stack_top = Some(expected.into());
        self
    }

    /// Expect this stack height after execution.
    pub fn stack_height(mut self, expected: usize) -> Self {
        self.expected_stack_height = Some(expected);
        self
    }

    /// Expect this logical memory size after execution.
    pub fn memory_size(mut self, expected: usize) -> Self {
        self.expected_memory_size = Some(expected);
        self
    }

    /// Expect this many emitted logs.
    pub fn log_count(mut self, expected: usize) -> Self {
        self.expected_log_count = Some(expected);
        self
    }

    /// Inspect the raw output bytes.
    pub fn inspect_output(mut self, f: impl Fn(&[u8]) + 'static) -> Self {
        self.inspect_output_fn = Arc::new(f);
        self
    }

    /// Execute the code and run the checks, returning the fused-plan output.
    pub fn check(self) -> Output {
        let config = Config::default();
        let code = self.code.clone();

        let plan = Plan::analyze(&code);
        let minimal = MinimalPlan::analyze(&code);

        let mut host = self.host.clone();
        for f in &self.apply_host_fns {
            f(&mut host);
        }
        let mut db = self.db.clone();
        for f in &self.apply_db_fns {
            f(&mut db);
        }
        let mut shadow_host = host.clone();
        let mut shadow_db = db.clone();

        let mut frame = Frame::new(
            self.message.clone(),
            &code,
            &config,
            Some(&mut db),
            Some(&mut host),
        )
        .expect("frame construction");
        let output = frame.execute(&plan, &mut NoopTracer);

        let mut shadow_frame = Frame::new(
            self.message.clone(),
            &code,
            &config,
            Some(&mut shadow_db),
            Some(&mut shadow_host),
        )
        .expect("frame construction");
        let shadow_output = shadow_frame.execute_minimal(&minimal, &mut NoopTracer);

        assert_eq!(
            output.status_code, shadow_output.status_code,
            "fused and minimal plans disagree on status"
        );
        assert_eq!(
            output.output_data, shadow_output.output_data,
            "fused and minimal plans disagree on output"
        );
        assert_eq!(
            output.logs, shadow_output.logs,
            "fused and minimal plans disagree on logs"
        );
        // On faults the fused plan stops at the block boundary while the
        // minimal plan stops at the offending instruction, so partial frame
        // state is only comparable on normal termination.
        if matches!(
            output.status_code,
            StatusCode::Success | StatusCode::Revert
        ) {
            assert!(
                frame.same_state(&shadow_frame),
                "fused and minimal frames diverged"
            );
        }

        if let Some(expected) = &self.expected_status_codes {
            assert!(
                expected.contains(&output.status_code),
                "wrong status: {}, expected one of {:?}",
                output.status_code,
                expected
            );
        }

        match self.gas_check {
            Some(GasCheck::Used(expected)) => {
                assert_eq!(self.message.gas - output.gas_left, expected, "wrong gas used")
            }
            Some(GasCheck::Left(expected)) => {
                assert_eq!(output.gas_left, expected, "wrong gas left")
            }
            None => {}
        }

        if let Some(expected) = &self.expected_output_data {
            assert_eq!(&output.output_data[..], &expected[..], "wrong output");
        }

        if let Some(expected) = self.expected_stack_top {
            assert!(!frame.stack().is_empty(), "stack is empty");
            assert_eq!(*frame.stack().peek(), expected, "wrong stack top");
        }

        if let Some(expected) = self.expected_stack_height {
            assert_eq!(frame.stack().len(), expected, "wrong stack height");
        }

        if let Some(expected) = self.expected_memory_size {
            assert_eq!(frame.memory().size(), expected, "wrong memory size");
        }

        if let Some(expected) = self.expected_log_count {
            assert_eq!(output.logs.len(), expected, "wrong log count");
        }

        (self.inspect_output_fn)(&output.output_data);

        output
    }
}
