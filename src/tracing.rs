use crate::{
    common::{Output, StatusCode},
    frame::Frame,
};

/// Observation points around handler execution.
///
/// All methods default to no-ops; `DUMMY` lets the interpreter skip the
/// calls entirely so that a [`NoopTracer`] costs nothing.
pub trait Tracer {
    const DUMMY: bool = false;

    fn notify_execution_start(&mut self, _code: &[u8], _gas: i64) {}

    fn notify_instruction_start(&mut self, _frame: &Frame) {}

    fn notify_instruction_end(&mut self, _frame: &Frame) {}

    fn notify_error(&mut self, _frame: &Frame, _status: StatusCode) {}

    fn notify_execution_end(&mut self, _output: &Output) {}
}

/// Tracer that does nothing and compiles away.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    const DUMMY: bool = true;
}

/// Tracer that prints one line per executed instruction to stdout.
#[derive(Clone, Debug, Default)]
pub struct StdoutTracer {
    executed: u64,
}

impl Tracer for StdoutTracer {
    fn notify_execution_start(&mut self, code: &[u8], gas: i64) {
        self.executed = 0;
        println!("evm: executing {} bytes of code with {} gas", code.len(), gas);
    }

    fn notify_instruction_start(&mut self, frame: &Frame) {
        let top = if frame.stack().is_empty() {
            "-".to_string()
        } else {
            format!("{:x}", frame.stack().peek())
        };
        println!(
            "{:>6} | gas {:>10} | stack {:>4} | top {}",
            self.executed,
            frame.gas_left(),
            frame.stack().len(),
            top
        );
        self.executed += 1;
    }

    fn notify_error(&mut self, _frame: &Frame, status: StatusCode) {
        println!("evm: fault after {} instructions: {}", self.executed, status);
    }

    fn notify_execution_end(&mut self, output: &Output) {
        println!(
            "evm: {} gas_left={} output=0x{}",
            output.status_code,
            output.gas_left,
            hex::encode(&output.output_data)
        );
    }
}
