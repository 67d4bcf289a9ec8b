//! Two-pass bytecode analysis.
//!
//! Pass 1 classifies every byte (opcode start, PUSH data, JUMPDEST) into
//! bitmaps. Pass 2 walks the opcode starts again, accumulating per-block
//! static gas and stack bounds, and emits the fused instruction stream.

use crate::{
    instructions::properties::PROPERTIES,
    instructions::stack_manip::push_value,
    interpreter::{fused_stream_handler, push_stream_handler, stream_handler},
    opcode::{fused, OpCode},
    plan::{BlockMetadata, MinimalPlan, Plan, StreamElement},
};
use bytes::Bytes;
use ethereum_types::U256;

/// Dense bit set over bytecode positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    bits: Vec<u64>,
    len: usize,
}

impl Bitmap {
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![0; (len + 63) / 64],
            len,
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize) {
        self.bits[i / 64] |= 1 << (i % 64);
    }

    /// Out-of-range positions read as unset.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        i < self.len && self.bits[i / 64] & (1 << (i % 64)) != 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Result of the classification pass.
pub struct Classification {
    pub op_start: Bitmap,
    pub push_data: Bitmap,
    pub jumpdest: Bitmap,
}

/// Pass 1: walk the bytes in program order, marking opcode starts and PUSH
/// immediate bytes, then scan for JUMPDESTs masked by the PUSH-data map.
pub fn classify(code: &[u8]) -> Classification {
    let mut op_start = Bitmap::new(code.len());
    let mut push_data = Bitmap::new(code.len());

    let mut i = 0;
    while i < code.len() {
        op_start.set(i);
        let n = OpCode(code[i]).immediate_len();
        let data_end = core::cmp::min(i + 1 + n, code.len());
        for j in i + 1..data_end {
            push_data.set(j);
        }
        i += 1 + n;
    }

    let jumpdest = mark_jumpdests_swar(code, &push_data);
    debug_assert_eq!(jumpdest, mark_jumpdests_scalar(code, &push_data));

    Classification {
        op_start,
        push_data,
        jumpdest,
    }
}

/// Byte-at-a-time JUMPDEST scan.
pub fn mark_jumpdests_scalar(code: &[u8], push_data: &Bitmap) -> Bitmap {
    let mut map = Bitmap::new(code.len());
    for (i, &byte) in code.iter().enumerate() {
        if byte == OpCode::JUMPDEST.to_u8() && !push_data.get(i) {
            map.set(i);
        }
    }
    map
}

/// Word-at-a-time JUMPDEST scan.
///
/// Eight bytes are compared per step using the carry-free zero-byte test;
/// hits are masked with the PUSH-data map before being recorded, which is
/// what makes the equality scan correct.
pub fn mark_jumpdests_swar(code: &[u8], push_data: &Bitmap) -> Bitmap {
    const LO: u64 = 0x0101_0101_0101_0101;
    const HI: u64 = 0x8080_8080_8080_8080;
    let target = LO * OpCode::JUMPDEST.to_u8() as u64;

    let mut map = Bitmap::new(code.len());

    let mut base = 0;
    for chunk in code.chunks_exact(8) {
        let word = u64::from_le_bytes(chunk.try_into().expect("chunk of 8"));
        let x = word ^ target;
        // High bit set exactly where a byte of `x` is zero; no carries leak
        // between lanes.
        let mut hits = !((((x & !HI) + !HI) | x) | !HI);
        while hits != 0 {
            let i = base + (hits.trailing_zeros() / 8) as usize;
            if !push_data.get(i) {
                map.set(i);
            }
            hits &= hits - 1;
        }
        base += 8;
    }

    for (j, &byte) in code[base..].iter().enumerate() {
        if byte == OpCode::JUMPDEST.to_u8() && !push_data.get(base + j) {
            map.set(base + j);
        }
    }

    map
}

/// The five opcodes a PUSH fuses with.
#[derive(Clone, Copy, Debug)]
enum Fusion {
    Add,
    Mul,
    Div,
    Jump,
    Jumpi,
}

impl Fusion {
    fn of(op: OpCode) -> Option<Fusion> {
        match op {
            OpCode::ADD => Some(Fusion::Add),
            OpCode::MUL => Some(Fusion::Mul),
            OpCode::DIV => Some(Fusion::Div),
            OpCode::JUMP => Some(Fusion::Jump),
            OpCode::JUMPI => Some(Fusion::Jumpi),
            _ => None,
        }
    }

    fn opcode(self, inline: bool) -> u16 {
        match (self, inline) {
            (Fusion::Add, true) => fused::PUSH_ADD_INLINE,
            (Fusion::Add, false) => fused::PUSH_ADD_POINTER,
            (Fusion::Mul, true) => fused::PUSH_MUL_INLINE,
            (Fusion::Mul, false) => fused::PUSH_MUL_POINTER,
            (Fusion::Div, true) => fused::PUSH_DIV_INLINE,
            (Fusion::Div, false) => fused::PUSH_DIV_POINTER,
            (Fusion::Jump, true) => fused::PUSH_JUMP_INLINE,
            (Fusion::Jump, false) => fused::PUSH_JUMP_POINTER,
            (Fusion::Jumpi, true) => fused::PUSH_JUMPI_INLINE,
            (Fusion::Jumpi, false) => fused::PUSH_JUMPI_POINTER,
        }
    }
}

/// Where the currently open block's metadata goes once the block closes.
enum MetaSlot {
    Entry,
    Stream(usize),
}

/// Accumulator for one basic block.
#[derive(Default)]
struct BlockAccumulator {
    gas: u64,
    height: i32,
    min_h: i32,
    max_h: i32,
}

impl BlockAccumulator {
    fn track(&mut self, stack_in: u8, stack_out: u8, base_gas: u16) {
        self.gas += base_gas as u64;
        self.min_h = core::cmp::min(self.min_h, self.height - stack_in as i32);
        self.height += stack_out as i32 - stack_in as i32;
        self.max_h = core::cmp::max(self.max_h, self.height);
    }

    fn finalize(&mut self) -> BlockMetadata {
        let meta = BlockMetadata {
            static_gas: core::cmp::min(self.gas, u32::MAX as u64) as u32,
            min_stack: self.min_h.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            max_stack: self.max_h.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
        };
        *self = Self::default();
        meta
    }
}

impl Plan {
    /// Analyze bytecode into an optimized plan.
    ///
    /// The analyzer accepts any well-formed or malformed input: truncated
    /// PUSH immediates read as zero-padded, unassigned bytes become the
    /// invalid instruction. Size limits are the frame's concern.
    pub fn analyze(code: &[u8]) -> Plan {
        debug_assert!(code.len() <= u32::MAX as usize);

        let classification = classify(code);

        let mut stream: Vec<StreamElement> = Vec::with_capacity(code.len() + 2);
        let mut constants: Vec<U256> = Vec::new();
        let mut jump_table: Vec<(u32, u32)> =
            Vec::with_capacity(classification.jumpdest.count_ones());
        let mut entry_block = BlockMetadata::default();

        let inline_capacity = core::mem::size_of::<usize>();

        let mut acc = BlockAccumulator::default();
        let mut meta_slot = MetaSlot::Entry;
        let mut skip_emit = false;

        fn close_block(
            slot: &MetaSlot,
            meta: BlockMetadata,
            stream: &mut [StreamElement],
            constants: &mut [U256],
            entry_block: &mut BlockMetadata,
        ) {
            match *slot {
                MetaSlot::Entry => *entry_block = meta,
                MetaSlot::Stream(at) => write_block_metadata(stream, constants, at, meta),
            }
        }

        let mut i = 0;
        while i < code.len() {
            let op = OpCode(code[i]);

            if op == OpCode::JUMPDEST {
                debug_assert!(!skip_emit, "fusion may not span a JUMPDEST");
                debug_assert!(
                    classification.jumpdest.get(i),
                    "classification and emission walk disagree at {}",
                    i
                );

                // Close the previous block; the JUMPDEST opens the next one
                // and its own base gas belongs to it.
                let meta = acc.finalize();
                close_block(&meta_slot, meta, &mut stream, &mut constants, &mut entry_block);

                jump_table.push((i as u32, stream.len() as u32));
                stream.push(StreamElement {
                    handler: stream_handler(op),
                });
                meta_slot = MetaSlot::Stream(stream.len());
                push_block_metadata_placeholder(&mut stream, &mut constants);

                let p = PROPERTIES[op.to_usize()].expect("JUMPDEST is assigned");
                acc.track(p.stack_in, p.stack_out, p.base_gas);
                i += 1;
                continue;
            }

            if let Some(p) = &PROPERTIES[op.to_usize()] {
                acc.track(p.stack_in, p.stack_out, p.base_gas);
            }

            if skip_emit {
                // This opcode was folded into the preceding fused
                // instruction; it still contributed to the block above.
                skip_emit = false;
                i += 1;
                continue;
            }

            if op.is_push() {
                let n = op.immediate_len();
                let value = push_value(&code[core::cmp::min(i + 1, code.len())..], n);
                let inline = n <= inline_capacity;

                let next = i + 1 + n;
                let fusion = if next < code.len() {
                    Fusion::of(OpCode(code[next]))
                } else {
                    None
                };

                let handler = match fusion {
                    Some(f) => {
                        skip_emit = true;
                        fused_stream_handler(f.opcode(inline))
                    }
                    None => push_stream_handler(inline),
                };
                stream.push(StreamElement { handler });

                if inline {
                    stream.push(StreamElement {
                        value: value.low_u64() as usize,
                    });
                } else {
                    constants.push(value);
                    stream.push(StreamElement {
                        value: constants.len() - 1,
                    });
                }

                i = next;
                continue;
            }

            if op == OpCode::PC {
                stream.push(StreamElement {
                    handler: stream_handler(op),
                });
                stream.push(StreamElement { value: i });
                i += 1;
                continue;
            }

            stream.push(StreamElement {
                handler: stream_handler(op),
            });
            i += 1;
        }

        let meta = acc.finalize();
        close_block(&meta_slot, meta, &mut stream, &mut constants, &mut entry_block);

        // Running off the end of the code is an implicit STOP.
        stream.push(StreamElement {
            handler: stream_handler(OpCode::STOP),
        });

        Plan {
            stream,
            constants,
            jump_table,
            entry_block,
        }
    }
}

#[cfg(target_pointer_width = "64")]
fn push_block_metadata_placeholder(stream: &mut Vec<StreamElement>, _constants: &mut Vec<U256>) {
    stream.push(StreamElement {
        block: BlockMetadata::default(),
    });
}

#[cfg(not(target_pointer_width = "64"))]
fn push_block_metadata_placeholder(stream: &mut Vec<StreamElement>, constants: &mut Vec<U256>) {
    constants.push(U256::zero());
    stream.push(StreamElement {
        value: constants.len() - 1,
    });
}

#[cfg(target_pointer_width = "64")]
fn write_block_metadata(
    stream: &mut [StreamElement],
    _constants: &mut [U256],
    at: usize,
    meta: BlockMetadata,
) {
    stream[at] = StreamElement { block: meta };
}

#[cfg(not(target_pointer_width = "64"))]
fn write_block_metadata(
    stream: &mut [StreamElement],
    constants: &mut [U256],
    at: usize,
    meta: BlockMetadata,
) {
    let index = unsafe { stream[at].value };
    constants[index] = crate::plan::encode_block_metadata(meta);
}

impl MinimalPlan {
    /// Analyze bytecode into the bitmap-backed minimal plan.
    pub fn analyze(code: impl AsRef<[u8]>) -> MinimalPlan {
        let code = Bytes::copy_from_slice(code.as_ref());
        let classification = classify(&code);

        MinimalPlan {
            code,
            op_start: classification.op_start,
            push_data: classification.push_data,
            jumpdest: classification.jumpdest,
        }
    }
}
