use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use strum_macros::Display;

/// The machine word all opcode semantics are written against.
///
/// Arithmetic is modulo `2^256`; signed operations reinterpret the bit
/// pattern as two's complement of the same width. Swapping the width means
/// swapping this alias.
pub type Word = U256;

/// Status of an execution or of a single handler.
///
/// `Success` doubles as the internal STOP sentinel: handlers that terminate
/// the call normally return `Err(StatusCode::Success)` and the interpreter
/// folds it into a successful [`Output`]. Everything from `StackOverflow`
/// down is a fault that aborts the current call.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatusCode {
    /// Execution finished with success.
    #[strum(serialize = "success")]
    Success = 0,

    /// Execution terminated with REVERT opcode.
    ///
    /// Remaining gas MAY be non-zero and output data MAY be present;
    /// accumulated logs are discarded.
    #[strum(serialize = "revert")]
    Revert = 1,

    /// The execution has attempted to put more items on the stack
    /// than the capacity allows.
    #[strum(serialize = "stack overflow")]
    StackOverflow = 2,

    /// An opcode required more stack items than were present.
    #[strum(serialize = "stack underflow")]
    StackUnderflow = 3,

    /// A gas debit drove the gas counter below zero.
    #[strum(serialize = "out of gas")]
    OutOfGas = 4,

    /// A memory offset or size is not representable, or expansion would
    /// exceed the configured memory limit.
    #[strum(serialize = "out of bounds")]
    OutOfBounds = 5,

    /// Jump destination is not a JUMPDEST outside PUSH data.
    #[strum(serialize = "invalid jump destination")]
    InvalidJump = 6,

    /// An unassigned byte, or the designated INVALID instruction.
    #[strum(serialize = "invalid opcode")]
    InvalidOpcode = 7,

    /// A state-modifying opcode was executed in a static context.
    #[strum(serialize = "write protection")]
    WriteProtection = 8,

    /// Bytecode exceeded the configured size limit at frame construction.
    #[strum(serialize = "bytecode too large")]
    BytecodeTooLarge = 9,

    /// The allocator refused a request made on behalf of the frame.
    #[strum(serialize = "allocation error")]
    AllocationError = 10,
}

/// Parameters of a single call, handed to [`crate::Frame::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// The account whose code is executing.
    pub address: Address,

    /// The sender of the message.
    pub caller: Address,

    /// The amount of Ether transferred with the message.
    pub value: U256,

    /// The amount of gas for message execution.
    pub gas: i64,

    /// Static call mode.
    pub is_static: bool,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            address: Address::zero(),
            caller: Address::zero(),
            value: U256::zero(),
            gas: i64::MAX,
            is_static: false,
        }
    }
}

/// A single log record emitted by LOG0..LOG4.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Up to four indexed topics.
    pub topics: Vec<H256>,
    /// Unindexed payload.
    pub data: Bytes,
}

/// Result of executing a frame to completion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Output {
    /// Execution exited with this status code.
    pub status_code: StatusCode,
    /// How much gas was left after execution. Zero on faults.
    pub gas_left: i64,
    /// Output data returned by RETURN or REVERT.
    pub output_data: Bytes,
    /// Logs emitted during execution. Empty unless `status_code` is
    /// `Success`.
    pub logs: Vec<Log>,
}

#[inline]
pub(crate) fn u256_to_address(v: U256) -> Address {
    H256(v.into()).into()
}

#[inline]
pub(crate) fn address_to_u256(v: Address) -> U256 {
    U256::from_big_endian(&v.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_display() {
        assert_eq!(StatusCode::Success.to_string(), "success");
        assert_eq!(StatusCode::OutOfGas.to_string(), "out of gas");
        assert_eq!(
            StatusCode::InvalidJump.to_string(),
            "invalid jump destination"
        );
    }

    #[test]
    fn address_word_roundtrip() {
        let addr = Address::from_low_u64_be(0xdeadbeef);
        assert_eq!(u256_to_address(address_to_u256(addr)), addr);
        // The upper 12 bytes of the word are dropped.
        let tagged = address_to_u256(addr) | (U256::one() << 200);
        assert_eq!(u256_to_address(tagged), addr);
    }
}
