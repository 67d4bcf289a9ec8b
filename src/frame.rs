use crate::{
    common::{Log, Message, Output, StatusCode},
    config::Config,
    db::Database,
    host::{Host, TxContext},
    interpreter,
    memory::Memory,
    plan::{MinimalPlan, Plan},
    stack::Stack,
    tracing::Tracer,
};
use bytes::Bytes;
use ethereum_types::{Address, U256};
use getset::{Getters, MutGetters};

/// Per-call execution context.
///
/// Owns the stack, memory, gas counter, log and output buffers, and borrows
/// the bytecode and the two collaborators for the duration of the call. A
/// frame never outlives its bytecode; it is created by the enclosing EVM per
/// call and dropped on return.
#[derive(Getters, MutGetters)]
pub struct Frame<'a> {
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) gas_left: i64,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) stack: Stack,
    #[getset(get = "pub", get_mut = "pub")]
    pub(crate) memory: Memory,
    pub(crate) code: &'a [u8],
    pub(crate) address: Address,
    pub(crate) caller: Address,
    pub(crate) value: U256,
    pub(crate) input_data: Bytes,
    pub(crate) tx_context: TxContext,
    pub(crate) is_static: bool,
    #[getset(get = "pub")]
    pub(crate) logs: Vec<Log>,
    #[getset(get = "pub")]
    pub(crate) output_data: Bytes,
    pub(crate) memory_limit: usize,
    pub(crate) db: Option<&'a mut dyn Database>,
    pub(crate) host: Option<&'a mut dyn Host>,
}

impl<'a> std::fmt::Debug for Frame<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("gas_left", &self.gas_left)
            .field("stack", &self.stack)
            .field("memory", &self.memory)
            .field("code_len", &self.code.len())
            .field("address", &self.address)
            .field("caller", &self.caller)
            .field("value", &self.value)
            .field("input_data", &self.input_data)
            .field("tx_context", &self.tx_context)
            .field("is_static", &self.is_static)
            .field("logs", &self.logs)
            .field("output_data", &self.output_data)
            .field("memory_limit", &self.memory_limit)
            .field("db", &self.db.is_some())
            .field("host", &self.host.is_some())
            .finish()
    }
}

impl<'a> Frame<'a> {
    /// Construct a frame for one call.
    ///
    /// Collaborators are optional: with no database, storage reads as zero
    /// and writes vanish; with no host, the environment reads as empty and
    /// state access is free.
    pub fn new(
        message: Message,
        code: &'a [u8],
        config: &Config,
        db: Option<&'a mut dyn Database>,
        host: Option<&'a mut dyn Host>,
    ) -> Result<Self, StatusCode> {
        if code.len() > config.max_bytecode_size {
            return Err(StatusCode::BytecodeTooLarge);
        }

        let memory = Memory::with_capacity(config.initial_memory_capacity)?;

        let (tx_context, input_data) = match &host {
            Some(host) => (host.tx_context(), host.call_input()),
            None => (TxContext::default(), Bytes::new()),
        };

        Ok(Self {
            gas_left: message.gas,
            stack: Stack::default(),
            memory,
            code,
            address: message.address,
            caller: message.caller,
            value: message.value,
            input_data,
            tx_context,
            is_static: message.is_static,
            logs: Vec::new(),
            output_data: Bytes::new(),
            memory_limit: config.memory_limit,
            db,
            host,
        })
    }

    pub fn code(&self) -> &[u8] {
        self.code
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Run the fused plan to completion.
    pub fn execute<T: Tracer>(&mut self, plan: &Plan, tracer: &mut T) -> Output {
        interpreter::run(plan, self, tracer)
    }

    /// Run the bitmap-backed minimal plan to completion.
    pub fn execute_minimal<T: Tracer>(&mut self, plan: &MinimalPlan, tracer: &mut T) -> Output {
        interpreter::run_minimal(plan, self, tracer)
    }

    /// Independent copy of the frame's own state for shadow execution.
    ///
    /// The bytecode stays shared; the collaborator borrows are not carried
    /// over, so the clone reads empty state.
    pub fn deep_clone(&self) -> Frame<'a> {
        Frame {
            gas_left: self.gas_left,
            stack: self.stack.clone(),
            memory: self.memory.clone(),
            code: self.code,
            address: self.address,
            caller: self.caller,
            value: self.value,
            input_data: self.input_data.clone(),
            tx_context: self.tx_context.clone(),
            is_static: self.is_static,
            logs: self.logs.clone(),
            output_data: self.output_data.clone(),
            memory_limit: self.memory_limit,
            db: None,
            host: None,
        }
    }

    /// Structural comparison of two frames' observable state: stack,
    /// memory, logs, output and call context.
    ///
    /// Gas is deliberately excluded; the fused plan debits a block's static
    /// gas up front while the minimal plan debits per instruction, so the
    /// counters only agree at matching block boundaries.
    pub fn same_state(&self, other: &Frame) -> bool {
        self.stack == other.stack
            && self.memory == other.memory
            && self.logs == other.logs
            && self.output_data == other.output_data
            && self.address == other.address
            && self.caller == other.caller
            && self.value == other.value
            && self.is_static == other.is_static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_bytecode() {
        let config = Config::default();
        let code = vec![0u8; config.max_bytecode_size + 1];
        let err = Frame::new(Message::default(), &code, &config, None, None).unwrap_err();
        assert_eq!(err, StatusCode::BytecodeTooLarge);

        let code = vec![0u8; config.max_bytecode_size];
        assert!(Frame::new(Message::default(), &code, &config, None, None).is_ok());
    }

    #[test]
    fn deep_clone_is_independent() {
        let code = [0x00];
        let config = Config::default();
        let mut frame = Frame::new(Message::default(), &code, &config, None, None).unwrap();
        frame.stack.push(42.into());

        let mut copy = frame.deep_clone();
        assert!(frame.same_state(&copy));

        copy.stack.push(7.into());
        assert!(!frame.same_state(&copy));
    }
}
