use super::memory::verify_memory_region;
use crate::{common::StatusCode, frame::Frame};

/// Shared tail of RETURN and REVERT: copy the addressed memory region into
/// the frame's output buffer. The operands stay on the stack since the call
/// ends here either way.
pub(crate) fn ret(frame: &mut Frame) -> Result<(), StatusCode> {
    let offset = *frame.stack.get(0);
    let size = *frame.stack.get(1);

    if let Some(region) = verify_memory_region(frame, offset, size)? {
        frame.output_data = frame.memory[region.offset..region.offset + region.size.get()]
            .to_vec()
            .into();
    }

    Ok(())
}

pub(crate) fn gas(frame: &mut Frame) {
    // Reflects the block's up-front static debit.
    frame.stack.push(frame.gas_left.into());
}
