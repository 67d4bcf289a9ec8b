use crate::instructions::properties::PROPERTIES;
use once_cell::race::OnceBox;

/// Per-opcode requirements checked before each instruction when executing
/// without precomputed block metadata (the minimal plan).
#[derive(Clone, Copy, Debug)]
pub struct InstructionTableEntry {
    pub gas_cost: u16,
    pub stack_height_required: u8,
    pub can_overflow_stack: bool,
}

pub type InstructionTable = [Option<InstructionTableEntry>; 256];

pub static INSTRUCTION_TABLE: OnceBox<InstructionTable> = OnceBox::new();

pub fn get_instruction_table() -> &'static InstructionTable {
    INSTRUCTION_TABLE.get_or_init(|| {
        let mut table = Box::new([None; 256]);

        for (opcode, properties) in PROPERTIES.iter().enumerate() {
            if let Some(p) = properties {
                // No instruction grows the stack by more than one item, so
                // overflow is only possible at the capacity boundary.
                debug_assert!(p.stack_out as i32 - p.stack_in as i32 <= 1);

                table[opcode] = Some(InstructionTableEntry {
                    gas_cost: p.base_gas,
                    stack_height_required: p.stack_in,
                    can_overflow_stack: p.stack_out > p.stack_in,
                });
            }
        }

        table
    })
}
