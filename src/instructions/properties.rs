use crate::opcode::OpCode;
use once_cell::sync::Lazy;

pub(crate) const WARM_STORAGE_READ_COST: u16 = 100;
pub(crate) const COLD_SLOAD_COST: u16 = 2100;
pub(crate) const COLD_ACCOUNT_ACCESS_COST: u16 = 2600;

/// Gas per word of copied data (CALLDATACOPY, CODECOPY, MCOPY).
pub(crate) const COPY_WORD_COST: i64 = 3;
/// Gas per word of KECCAK256 input.
pub(crate) const KECCAK_WORD_COST: i64 = 6;
/// Gas per byte of LOG data.
pub(crate) const LOG_DATA_COST: i64 = 8;
/// Gas per significant byte of the EXP exponent.
pub(crate) const EXP_BYTE_COST: i64 = 50;
/// Linear coefficient of the memory expansion formula.
pub(crate) const MEMORY_WORD_COST: i64 = 3;

/// Static per-opcode information.
///
/// `base_gas` is the fixed cost accumulated into block metadata by the
/// analyzer; opcodes with purely dynamic pricing (SLOAD, SSTORE, BALANCE)
/// carry zero here and charge inside their handler.
#[derive(Clone, Copy, Debug)]
pub struct Properties {
    /// The instruction name.
    pub name: &'static str,
    /// Fixed gas debited once per block for this opcode.
    pub base_gas: u16,
    /// The number of stack items the instruction pops.
    pub stack_in: u8,
    /// The number of stack items the instruction pushes.
    pub stack_out: u8,
    /// Immediate bytes following the opcode in the bytecode.
    pub immediate_len: u8,
}

impl Properties {
    const fn new(name: &'static str, base_gas: u16, stack_in: u8, stack_out: u8) -> Self {
        Self {
            name,
            base_gas,
            stack_in,
            stack_out,
            immediate_len: 0,
        }
    }

    const fn push(name: &'static str, immediate_len: u8) -> Self {
        Self {
            name,
            base_gas: 3,
            stack_in: 0,
            stack_out: 1,
            immediate_len,
        }
    }
}

pub static PROPERTIES: Lazy<[Option<Properties>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];

    table[OpCode::STOP.to_usize()] = Some(Properties::new("STOP", 0, 0, 0));
    table[OpCode::ADD.to_usize()] = Some(Properties::new("ADD", 3, 2, 1));
    table[OpCode::MUL.to_usize()] = Some(Properties::new("MUL", 5, 2, 1));
    table[OpCode::SUB.to_usize()] = Some(Properties::new("SUB", 3, 2, 1));
    table[OpCode::DIV.to_usize()] = Some(Properties::new("DIV", 5, 2, 1));
    table[OpCode::SDIV.to_usize()] = Some(Properties::new("SDIV", 5, 2, 1));
    table[OpCode::MOD.to_usize()] = Some(Properties::new("MOD", 5, 2, 1));
    table[OpCode::SMOD.to_usize()] = Some(Properties::new("SMOD", 5, 2, 1));
    table[OpCode::ADDMOD.to_usize()] = Some(Properties::new("ADDMOD", 8, 3, 1));
    table[OpCode::MULMOD.to_usize()] = Some(Properties::new("MULMOD", 8, 3, 1));
    table[OpCode::EXP.to_usize()] = Some(Properties::new("EXP", 10, 2, 1));
    table[OpCode::SIGNEXTEND.to_usize()] = Some(Properties::new("SIGNEXTEND", 5, 2, 1));

    table[OpCode::LT.to_usize()] = Some(Properties::new("LT", 3, 2, 1));
    table[OpCode::GT.to_usize()] = Some(Properties::new("GT", 3, 2, 1));
    table[OpCode::SLT.to_usize()] = Some(Properties::new("SLT", 3, 2, 1));
    table[OpCode::SGT.to_usize()] = Some(Properties::new("SGT", 3, 2, 1));
    table[OpCode::EQ.to_usize()] = Some(Properties::new("EQ", 3, 2, 1));
    table[OpCode::ISZERO.to_usize()] = Some(Properties::new("ISZERO", 3, 1, 1));
    table[OpCode::AND.to_usize()] = Some(Properties::new("AND", 3, 2, 1));
    table[OpCode::OR.to_usize()] = Some(Properties::new("OR", 3, 2, 1));
    table[OpCode::XOR.to_usize()] = Some(Properties::new("XOR", 3, 2, 1));
    table[OpCode::NOT.to_usize()] = Some(Properties::new("NOT", 3, 1, 1));
    table[OpCode::BYTE.to_usize()] = Some(Properties::new("BYTE", 3, 2, 1));
    table[OpCode::SHL.to_usize()] = Some(Properties::new("SHL", 3, 2, 1));
    table[OpCode::SHR.to_usize()] = Some(Properties::new("SHR", 3, 2, 1));
    table[OpCode::SAR.to_usize()] = Some(Properties::new("SAR", 3, 2, 1));

    table[OpCode::KECCAK256.to_usize()] = Some(Properties::new("KECCAK256", 30, 2, 1));

    table[OpCode::ADDRESS.to_usize()] = Some(Properties::new("ADDRESS", 2, 0, 1));
    table[OpCode::BALANCE.to_usize()] = Some(Properties::new("BALANCE", 0, 1, 1));
    table[OpCode::ORIGIN.to_usize()] = Some(Properties::new("ORIGIN", 2, 0, 1));
    table[OpCode::CALLER.to_usize()] = Some(Properties::new("CALLER", 2, 0, 1));
    table[OpCode::CALLVALUE.to_usize()] = Some(Properties::new("CALLVALUE", 2, 0, 1));
    table[OpCode::CALLDATALOAD.to_usize()] = Some(Properties::new("CALLDATALOAD", 3, 1, 1));
    table[OpCode::CALLDATASIZE.to_usize()] = Some(Properties::new("CALLDATASIZE", 2, 0, 1));
    table[OpCode::CALLDATACOPY.to_usize()] = Some(Properties::new("CALLDATACOPY", 3, 3, 0));
    table[OpCode::CODESIZE.to_usize()] = Some(Properties::new("CODESIZE", 2, 0, 1));
    table[OpCode::CODECOPY.to_usize()] = Some(Properties::new("CODECOPY", 3, 3, 0));
    table[OpCode::GASPRICE.to_usize()] = Some(Properties::new("GASPRICE", 2, 0, 1));

    table[OpCode::COINBASE.to_usize()] = Some(Properties::new("COINBASE", 2, 0, 1));
    table[OpCode::TIMESTAMP.to_usize()] = Some(Properties::new("TIMESTAMP", 2, 0, 1));
    table[OpCode::NUMBER.to_usize()] = Some(Properties::new("NUMBER", 2, 0, 1));
    table[OpCode::PREVRANDAO.to_usize()] = Some(Properties::new("PREVRANDAO", 2, 0, 1));
    table[OpCode::GASLIMIT.to_usize()] = Some(Properties::new("GASLIMIT", 2, 0, 1));
    table[OpCode::CHAINID.to_usize()] = Some(Properties::new("CHAINID", 2, 0, 1));
    table[OpCode::SELFBALANCE.to_usize()] = Some(Properties::new("SELFBALANCE", 5, 0, 1));
    table[OpCode::BASEFEE.to_usize()] = Some(Properties::new("BASEFEE", 2, 0, 1));

    table[OpCode::POP.to_usize()] = Some(Properties::new("POP", 2, 1, 0));
    table[OpCode::MLOAD.to_usize()] = Some(Properties::new("MLOAD", 3, 1, 1));
    table[OpCode::MSTORE.to_usize()] = Some(Properties::new("MSTORE", 3, 2, 0));
    table[OpCode::MSTORE8.to_usize()] = Some(Properties::new("MSTORE8", 3, 2, 0));
    table[OpCode::SLOAD.to_usize()] = Some(Properties::new("SLOAD", 0, 1, 1));
    table[OpCode::SSTORE.to_usize()] = Some(Properties::new("SSTORE", 0, 2, 0));
    table[OpCode::JUMP.to_usize()] = Some(Properties::new("JUMP", 8, 1, 0));
    table[OpCode::JUMPI.to_usize()] = Some(Properties::new("JUMPI", 10, 2, 0));
    table[OpCode::PC.to_usize()] = Some(Properties::new("PC", 2, 0, 1));
    table[OpCode::MSIZE.to_usize()] = Some(Properties::new("MSIZE", 2, 0, 1));
    table[OpCode::GAS.to_usize()] = Some(Properties::new("GAS", 2, 0, 1));
    table[OpCode::JUMPDEST.to_usize()] = Some(Properties::new("JUMPDEST", 1, 0, 0));
    table[OpCode::TLOAD.to_usize()] = Some(Properties::new("TLOAD", 100, 1, 1));
    table[OpCode::TSTORE.to_usize()] = Some(Properties::new("TSTORE", 100, 2, 0));
    table[OpCode::MCOPY.to_usize()] = Some(Properties::new("MCOPY", 3, 3, 0));
    table[OpCode::PUSH0.to_usize()] = Some(Properties::new("PUSH0", 2, 0, 1));

    table[OpCode::PUSH1.to_usize()] = Some(Properties::push("PUSH1", 1));
    table[OpCode::PUSH2.to_usize()] = Some(Properties::push("PUSH2", 2));
    table[OpCode::PUSH3.to_usize()] = Some(Properties::push("PUSH3", 3));
    table[OpCode::PUSH4.to_usize()] = Some(Properties::push("PUSH4", 4));
    table[OpCode::PUSH5.to_usize()] = Some(Properties::push("PUSH5", 5));
    table[OpCode::PUSH6.to_usize()] = Some(Properties::push("PUSH6", 6));
    table[OpCode::PUSH7.to_usize()] = Some(Properties::push("PUSH7", 7));
    table[OpCode::PUSH8.to_usize()] = Some(Properties::push("PUSH8", 8));
    table[OpCode::PUSH9.to_usize()] = Some(Properties::push("PUSH9", 9));
    table[OpCode::PUSH10.to_usize()] = Some(Properties::push("PUSH10", 10));
    table[OpCode::PUSH11.to_usize()] = Some(Properties::push("PUSH11", 11));
    table[OpCode::PUSH12.to_usize()] = Some(Properties::push("PUSH12", 12));
    table[OpCode::PUSH13.to_usize()] = Some(Properties::push("PUSH13", 13));
    table[OpCode::PUSH14.to_usize()] = Some(Properties::push("PUSH14", 14));
    table[OpCode::PUSH15.to_usize()] = Some(Properties::push("PUSH15", 15));
    table[OpCode::PUSH16.to_usize()] = Some(Properties::push("PUSH16", 16));
    table[OpCode::PUSH17.to_usize()] = Some(Properties::push("PUSH17", 17));
    table[OpCode::PUSH18.to_usize()] = Some(Properties::push("PUSH18", 18));
    table[OpCode::PUSH19.to_usize()] = Some(Properties::push("PUSH19", 19));
    table[OpCode::PUSH20.to_usize()] = Some(Properties::push("PUSH20", 20));
    table[OpCode::PUSH21.to_usize()] = Some(Properties::push("PUSH21", 21));
    table[OpCode::PUSH22.to_usize()] = Some(Properties::push("PUSH22", 22));
    table[OpCode::PUSH23.to_usize()] = Some(Properties::push("PUSH23", 23));
    table[OpCode::PUSH24.to_usize()] = Some(Properties::push("PUSH24", 24));
    table[OpCode::PUSH25.to_usize()] = Some(Properties::push("PUSH25", 25));
    table[OpCode::PUSH26.to_usize()] = Some(Properties::push("PUSH26", 26));
    table[OpCode::PUSH27.to_usize()] = Some(Properties::push("PUSH27", 27));
    table[OpCode::PUSH28.to_usize()] = Some(Properties::push("PUSH28", 28));
    table[OpCode::PUSH29.to_usize()] = Some(Properties::push("PUSH29", 29));
    table[OpCode::PUSH30.to_usize()] = Some(Properties::push("PUSH30", 30));
    table[OpCode::PUSH31.to_usize()] = Some(Properties::push("PUSH31", 31));
    table[OpCode::PUSH32.to_usize()] = Some(Properties::push("PUSH32", 32));

    table[OpCode::DUP1.to_usize()] = Some(Properties::new("DUP1", 3, 1, 2));
    table[OpCode::DUP2.to_usize()] = Some(Properties::new("DUP2", 3, 2, 3));
    table[OpCode::DUP3.to_usize()] = Some(Properties::new("DUP3", 3, 3, 4));
    table[OpCode::DUP4.to_usize()] = Some(Properties::new("DUP4", 3, 4, 5));
    table[OpCode::DUP5.to_usize()] = Some(Properties::new("DUP5", 3, 5, 6));
    table[OpCode::DUP6.to_usize()] = Some(Properties::new("DUP6", 3, 6, 7));
    table[OpCode::DUP7.to_usize()] = Some(Properties::new("DUP7", 3, 7, 8));
    table[OpCode::DUP8.to_usize()] = Some(Properties::new("DUP8", 3, 8, 9));
    table[OpCode::DUP9.to_usize()] = Some(Properties::new("DUP9", 3, 9, 10));
    table[OpCode::DUP10.to_usize()] = Some(Properties::new("DUP10", 3, 10, 11));
    table[OpCode::DUP11.to_usize()] = Some(Properties::new("DUP11", 3, 11, 12));
    table[OpCode::DUP12.to_usize()] = Some(Properties::new("DUP12", 3, 12, 13));
    table[OpCode::DUP13.to_usize()] = Some(Properties::new("DUP13", 3, 13, 14));
    table[OpCode::DUP14.to_usize()] = Some(Properties::new("DUP14", 3, 14, 15));
    table[OpCode::DUP15.to_usize()] = Some(Properties::new("DUP15", 3, 15, 16));
    table[OpCode::DUP16.to_usize()] = Some(Properties::new("DUP16", 3, 16, 17));

    table[OpCode::SWAP1.to_usize()] = Some(Properties::new("SWAP1", 3, 2, 2));
    table[OpCode::SWAP2.to_usize()] = Some(Properties::new("SWAP2", 3, 3, 3));
    table[OpCode::SWAP3.to_usize()] = Some(Properties::new("SWAP3", 3, 4, 4));
    table[OpCode::SWAP4.to_usize()] = Some(Properties::new("SWAP4", 3, 5, 5));
    table[OpCode::SWAP5.to_usize()] = Some(Properties::new("SWAP5", 3, 6, 6));
    table[OpCode::SWAP6.to_usize()] = Some(Properties::new("SWAP6", 3, 7, 7));
    table[OpCode::SWAP7.to_usize()] = Some(Properties::new("SWAP7", 3, 8, 8));
    table[OpCode::SWAP8.to_usize()] = Some(Properties::new("SWAP8", 3, 9, 9));
    table[OpCode::SWAP9.to_usize()] = Some(Properties::new("SWAP9", 3, 10, 10));
    table[OpCode::SWAP10.to_usize()] = Some(Properties::new("SWAP10", 3, 11, 11));
    table[OpCode::SWAP11.to_usize()] = Some(Properties::new("SWAP11", 3, 12, 12));
    table[OpCode::SWAP12.to_usize()] = Some(Properties::new("SWAP12", 3, 13, 13));
    table[OpCode::SWAP13.to_usize()] = Some(Properties::new("SWAP13", 3, 14, 14));
    table[OpCode::SWAP14.to_usize()] = Some(Properties::new("SWAP14", 3, 15, 15));
    table[OpCode::SWAP15.to_usize()] = Some(Properties::new("SWAP15", 3, 16, 16));
    table[OpCode::SWAP16.to_usize()] = Some(Properties::new("SWAP16", 3, 17, 17));

    table[OpCode::LOG0.to_usize()] = Some(Properties::new("LOG0", 375, 2, 0));
    table[OpCode::LOG1.to_usize()] = Some(Properties::new("LOG1", 750, 3, 0));
    table[OpCode::LOG2.to_usize()] = Some(Properties::new("LOG2", 1125, 4, 0));
    table[OpCode::LOG3.to_usize()] = Some(Properties::new("LOG3", 1500, 5, 0));
    table[OpCode::LOG4.to_usize()] = Some(Properties::new("LOG4", 1875, 6, 0));

    table[OpCode::RETURN.to_usize()] = Some(Properties::new("RETURN", 0, 2, 0));
    table[OpCode::REVERT.to_usize()] = Some(Properties::new("REVERT", 0, 2, 0));
    table[OpCode::INVALID.to_usize()] = Some(Properties::new("INVALID", 0, 0, 0));

    table
});
