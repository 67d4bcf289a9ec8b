use crate::{
    analysis::Bitmap,
    common::StatusCode,
    frame::Frame,
    instructions::stack_manip,
    opcode::OpCode,
};
use bytes::Bytes;
use core::fmt;
use ethereum_types::U256;

/// Routine implementing one (possibly fused) instruction.
///
/// A handler receives the stream index of its own slot and returns the index
/// to continue at; termination is signalled through the error channel
/// (`StatusCode::Success` for STOP/RETURN).
pub(crate) type Handler = fn(&mut Frame<'_>, &Plan, usize) -> Result<usize, StatusCode>;

/// Per-basic-block static requirements, computed once by the analyzer and
/// checked once on block entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct BlockMetadata {
    /// Sum of the base gas of every opcode in the block.
    pub static_gas: u32,
    /// Lowest signed stack-height excursion relative to the height at block
    /// entry, measured before each opcode pops its inputs. Non-positive.
    pub min_stack: i16,
    /// Highest stack-height excursion relative to the height at block entry.
    pub max_stack: i16,
}

/// One cell of the instruction stream.
///
/// The variant is not stored: a cell holds a handler unless the preceding
/// handler's opcode carries metadata, in which case the cell after it is the
/// payload (an inline immediate, a constants-table index, or inline block
/// metadata). The accessors on [`Plan`] encode which field is live at which
/// position.
#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) union StreamElement {
    pub(crate) handler: Handler,
    pub(crate) value: usize,
    #[cfg(target_pointer_width = "64")]
    pub(crate) block: BlockMetadata,
}

// The whole design hinges on stream cells being exactly one machine word.
const _: () = assert!(
    core::mem::size_of::<StreamElement>() == core::mem::size_of::<usize>()
);
const _: () = assert!(core::mem::size_of::<BlockMetadata>() == 8);

/// Pack block metadata into a constants-table word. Used on targets whose
/// pointers are too narrow to hold the triple inline.
#[cfg(any(test, not(target_pointer_width = "64")))]
pub(crate) fn encode_block_metadata(meta: BlockMetadata) -> U256 {
    let raw = meta.static_gas as u64
        | ((meta.min_stack as u16 as u64) << 32)
        | ((meta.max_stack as u16 as u64) << 48);
    U256::from(raw)
}

#[cfg(any(test, not(target_pointer_width = "64")))]
pub(crate) fn decode_block_metadata(word: &U256) -> BlockMetadata {
    let raw = word.low_u64();
    BlockMetadata {
        static_gas: raw as u32,
        min_stack: (raw >> 32) as u16 as i16,
        max_stack: (raw >> 48) as u16 as i16,
    }
}

/// Analyzed, fused form of a bytecode: the instruction stream, the
/// constants table for payloads wider than a pointer, and the sorted
/// PC-to-stream mapping for dynamic jumps.
///
/// Immutable after construction and shareable across concurrent executions.
pub struct Plan {
    pub(crate) stream: Vec<StreamElement>,
    pub(crate) constants: Vec<U256>,
    /// `(bytecode PC, stream index)` of every JUMPDEST, ascending by PC.
    pub(crate) jump_table: Vec<(u32, u32)>,
    /// Metadata of the block starting at PC 0.
    pub(crate) entry_block: BlockMetadata,
}

impl Plan {
    /// Handler stored at `idx`.
    ///
    /// Every position reachable by the interpreter loop holds a handler by
    /// construction of the stream.
    #[inline]
    pub(crate) fn handler(&self, idx: usize) -> Handler {
        unsafe { self.stream[idx].handler }
    }

    /// Inline payload at `idx`: a small PUSH immediate, a PC value, or a
    /// constants-table index. Only valid at a metadata position following a
    /// handler that was emitted with an inline or pointer payload.
    #[inline]
    pub(crate) fn inline_value(&self, idx: usize) -> usize {
        unsafe { self.stream[idx].value }
    }

    /// Wide payload at `idx`, resolved through the constants table.
    #[inline]
    pub(crate) fn const_word(&self, idx: usize) -> &U256 {
        &self.constants[self.inline_value(idx)]
    }

    /// Block metadata at `idx`. Only valid at the position following a
    /// JUMPDEST handler.
    #[inline]
    #[cfg(target_pointer_width = "64")]
    pub(crate) fn block_meta(&self, idx: usize) -> BlockMetadata {
        unsafe { self.stream[idx].block }
    }

    #[inline]
    #[cfg(not(target_pointer_width = "64"))]
    pub(crate) fn block_meta(&self, idx: usize) -> BlockMetadata {
        decode_block_metadata(self.const_word(idx))
    }

    /// Stream index of the JUMPDEST at bytecode position `pc`, if there is
    /// one outside PUSH data. Binary search over the jump table.
    pub fn lookup_stream_index(&self, pc: usize) -> Option<usize> {
        let pc = u32::try_from(pc).ok()?;
        self.jump_table
            .binary_search_by_key(&pc, |&(pc, _)| pc)
            .ok()
            .map(|i| self.jump_table[i].1 as usize)
    }

    /// Metadata of the block entered at PC 0.
    pub fn entry_block(&self) -> BlockMetadata {
        self.entry_block
    }

    /// Metadata of the block opened by the JUMPDEST at `pc`, if any.
    pub fn block_metadata_of(&self, pc: usize) -> Option<BlockMetadata> {
        let idx = self.lookup_stream_index(pc)?;
        Some(self.block_meta(idx + 1))
    }

    pub fn stream_len(&self) -> usize {
        self.stream.len()
    }

    pub fn constants_len(&self) -> usize {
        self.constants.len()
    }

    /// Number of valid dynamic jump destinations.
    pub fn jumpdest_count(&self) -> usize {
        self.jump_table.len()
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("stream_len", &self.stream.len())
            .field("constants_len", &self.constants.len())
            .field("jumpdests", &self.jump_table.len())
            .field("entry_block", &self.entry_block)
            .finish()
    }
}

/// Unfused plan: the raw bytecode plus the three classification bitmaps.
///
/// Dispatch works directly in the PC domain with per-opcode requirement
/// checks; it implements the same observable semantics as [`Plan`] and
/// serves as the reference in shadow execution.
#[derive(Clone, Debug)]
pub struct MinimalPlan {
    pub(crate) code: Bytes,
    pub(crate) op_start: Bitmap,
    pub(crate) push_data: Bitmap,
    pub(crate) jumpdest: Bitmap,
}

impl MinimalPlan {
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn is_op_start(&self, pc: usize) -> bool {
        self.op_start.get(pc)
    }

    pub fn is_push_data(&self, pc: usize) -> bool {
        self.push_data.get(pc)
    }

    pub fn is_jumpdest(&self, pc: usize) -> bool {
        self.jumpdest.get(pc)
    }

    /// Number of valid dynamic jump destinations.
    pub fn jumpdest_count(&self) -> usize {
        self.jumpdest.count_ones()
    }

    /// PUSH immediate of the opcode at `pc`, zero-padded past the end of
    /// the code.
    pub(crate) fn push_value(&self, pc: usize, n: usize) -> U256 {
        let start = core::cmp::min(pc + 1, self.code.len());
        stack_manip::push_value(&self.code[start..], n)
    }

    /// PC of the next instruction after the one at `pc`, accounting for
    /// PUSH immediates.
    pub fn skip(&self, pc: usize) -> usize {
        pc + 1 + OpCode(self.code[pc]).immediate_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_metadata_word_roundtrip() {
        for meta in [
            BlockMetadata::default(),
            BlockMetadata {
                static_gas: 9,
                min_stack: 0,
                max_stack: 2,
            },
            BlockMetadata {
                static_gas: u32::MAX,
                min_stack: i16::MIN,
                max_stack: i16::MAX,
            },
            BlockMetadata {
                static_gas: 1,
                min_stack: -17,
                max_stack: 1,
            },
        ] {
            assert_eq!(decode_block_metadata(&encode_block_metadata(meta)), meta);
        }
    }
}
