use super::memory::verify_memory_region;
use super::properties::LOG_DATA_COST;
use crate::{
    common::{Log, StatusCode},
    frame::Frame,
};
use bytes::Bytes;
use ethereum_types::H256;

pub(crate) fn log(frame: &mut Frame, num_topics: usize) -> Result<(), StatusCode> {
    if frame.is_static {
        return Err(StatusCode::WriteProtection);
    }

    let offset = frame.stack.pop();
    let size = frame.stack.pop();

    let region = verify_memory_region(frame, offset, size)?;

    let mut topics = Vec::new();
    topics
        .try_reserve(num_topics)
        .map_err(|_| StatusCode::AllocationError)?;
    for _ in 0..num_topics {
        let mut b = [0; 32];
        frame.stack.pop().to_big_endian(&mut b);
        topics.push(H256(b));
    }

    let data = if let Some(region) = &region {
        let data_cost = region.size.get() as i64 * LOG_DATA_COST;
        frame.gas_left -= data_cost;
        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }

        Bytes::copy_from_slice(&frame.memory[region.offset..region.offset + region.size.get()])
    } else {
        Bytes::new()
    };

    frame
        .logs
        .try_reserve(1)
        .map_err(|_| StatusCode::AllocationError)?;
    frame.logs.push(Log {
        address: frame.address,
        topics,
        data,
    });

    Ok(())
}
