use super::properties::{COPY_WORD_COST, KECCAK_WORD_COST, MEMORY_WORD_COST};
use crate::{common::StatusCode, frame::Frame, memory::num_words, stack::Stack};
use core::cmp::min;
use core::num::NonZeroUsize;
use ethereum_types::U256;
use sha3::{Digest, Keccak256};

pub(crate) const MAX_BUFFER_SIZE: u32 = u32::MAX;

pub(crate) struct MemoryRegion {
    pub offset: usize,
    pub size: NonZeroUsize,
}

/// Check that `[offset, offset + size)` is addressable, debit the expansion
/// cost delta, and grow the memory to cover the region word-aligned.
pub(crate) fn verify_memory_region_fixed(
    frame: &mut Frame,
    offset: U256,
    size: NonZeroUsize,
) -> Result<MemoryRegion, StatusCode> {
    if offset > U256::from(MAX_BUFFER_SIZE) {
        return Err(StatusCode::OutOfBounds);
    }
    let offset = offset.as_usize();

    let new_size = offset
        .checked_add(size.get())
        .ok_or(StatusCode::OutOfBounds)?;
    if new_size > frame.memory_limit {
        return Err(StatusCode::OutOfBounds);
    }

    let current_size = frame.memory.len();
    if new_size > current_size {
        let new_words = num_words(new_size) as i64;
        let current_words = (current_size / 32) as i64;
        let new_cost = MEMORY_WORD_COST * new_words + new_words * new_words / 512;
        let current_cost = MEMORY_WORD_COST * current_words + current_words * current_words / 512;

        frame.gas_left -= new_cost - current_cost;
        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        frame.memory.grow_to_words(new_words as usize)?;
    }

    Ok(MemoryRegion {
        offset,
        size,
    })
}

/// Variant for stack-supplied sizes; a zero size touches no memory at all.
pub(crate) fn verify_memory_region(
    frame: &mut Frame,
    offset: U256,
    size: U256,
) -> Result<Option<MemoryRegion>, StatusCode> {
    if size.is_zero() {
        return Ok(None);
    }

    if size > U256::from(MAX_BUFFER_SIZE) {
        return Err(StatusCode::OutOfBounds);
    }

    let size = NonZeroUsize::new(size.as_usize()).expect("nonzero checked above");
    verify_memory_region_fixed(frame, offset, size).map(Some)
}

pub(crate) fn mload(frame: &mut Frame) -> Result<(), StatusCode> {
    let index = frame.stack.pop();

    let region =
        verify_memory_region_fixed(frame, index, NonZeroUsize::new(32).expect("nonzero"))?;

    let value = frame.memory.load32(region.offset);
    frame.stack.push(value);

    Ok(())
}

pub(crate) fn mstore(frame: &mut Frame) -> Result<(), StatusCode> {
    let index = frame.stack.pop();
    let value = frame.stack.pop();

    let region =
        verify_memory_region_fixed(frame, index, NonZeroUsize::new(32).expect("nonzero"))?;

    frame.memory.store32(region.offset, value);

    Ok(())
}

pub(crate) fn mstore8(frame: &mut Frame) -> Result<(), StatusCode> {
    let index = frame.stack.pop();
    let value = frame.stack.pop();

    let region = verify_memory_region_fixed(frame, index, NonZeroUsize::new(1).expect("nonzero"))?;

    frame.memory.store8(region.offset, (value.low_u32() & 0xff) as u8);

    Ok(())
}

pub(crate) fn msize(frame: &mut Frame) {
    frame.stack.push(frame.memory.len().into());
}

pub(crate) fn mcopy(frame: &mut Frame) -> Result<(), StatusCode> {
    let dst = frame.stack.pop();
    let src = frame.stack.pop();
    let size = frame.stack.pop();

    if size.is_zero() {
        return Ok(());
    }
    if size > U256::from(MAX_BUFFER_SIZE) {
        return Err(StatusCode::OutOfBounds);
    }
    let len = NonZeroUsize::new(size.as_usize()).expect("nonzero checked above");

    // One expansion covering both the source and the destination range.
    let far = core::cmp::max(dst, src);
    verify_memory_region_fixed(frame, far, len)?;

    let copy_cost = num_words(len.get()) as i64 * COPY_WORD_COST;
    frame.gas_left -= copy_cost;
    if frame.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    frame
        .memory
        .copy(dst.as_usize(), src.as_usize(), len.get());

    Ok(())
}

pub(crate) fn keccak256(frame: &mut Frame) -> Result<(), StatusCode> {
    let index = frame.stack.pop();
    let size = frame.stack.pop();

    let region = verify_memory_region(frame, index, size)?;

    let digest = Keccak256::digest(if let Some(region) = &region {
        let cost = num_words(region.size.get()) as i64 * KECCAK_WORD_COST;
        frame.gas_left -= cost;
        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        &frame.memory[region.offset..region.offset + region.size.get()]
    } else {
        &[]
    });

    frame.stack.push(U256::from_big_endian(&digest));

    Ok(())
}

pub(crate) fn calldatacopy(frame: &mut Frame) -> Result<(), StatusCode> {
    let mem_index = frame.stack.pop();
    let input_index = frame.stack.pop();
    let size = frame.stack.pop();

    let region = verify_memory_region(frame, mem_index, size)?;

    if let Some(region) = &region {
        let copy_cost = num_words(region.size.get()) as i64 * COPY_WORD_COST;
        frame.gas_left -= copy_cost;
        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        let input_len = U256::from(frame.input_data.len());
        let src = min(input_len, input_index).as_usize();
        let copy_size = min(region.size.get(), frame.input_data.len() - src);

        if copy_size > 0 {
            frame.memory[region.offset..region.offset + copy_size]
                .copy_from_slice(&frame.input_data[src..src + copy_size]);
        }

        if region.size.get() - copy_size > 0 {
            frame.memory[region.offset + copy_size..region.offset + region.size.get()].fill(0);
        }
    }

    Ok(())
}

pub(crate) fn codesize(stack: &mut Stack, code: &[u8]) {
    stack.push(code.len().into())
}

pub(crate) fn codecopy(frame: &mut Frame) -> Result<(), StatusCode> {
    let mem_index = frame.stack.pop();
    let input_index = frame.stack.pop();
    let size = frame.stack.pop();

    let region = verify_memory_region(frame, mem_index, size)?;

    if let Some(region) = region {
        let copy_cost = num_words(region.size.get()) as i64 * COPY_WORD_COST;
        frame.gas_left -= copy_cost;
        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        let src = min(U256::from(frame.code.len()), input_index).as_usize();
        let copy_size = min(region.size.get(), frame.code.len() - src);

        if copy_size > 0 {
            frame.memory[region.offset..region.offset + copy_size]
                .copy_from_slice(&frame.code[src..src + copy_size]);
        }

        if region.size.get() - copy_size > 0 {
            frame.memory[region.offset + copy_size..region.offset + region.size.get()].fill(0);
        }
    }

    Ok(())
}
