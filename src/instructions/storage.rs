use crate::{common::StatusCode, frame::Frame};
use ethereum_types::U256;

pub(crate) fn sload(frame: &mut Frame) -> Result<(), StatusCode> {
    let key = frame.stack.pop();
    let address = frame.address;

    let cost = match &mut frame.host {
        Some(host) => host.access_storage_slot(address, key) as i64,
        None => 0,
    };
    frame.gas_left -= cost;
    if frame.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    let value = match &frame.db {
        Some(db) => db.get_storage(address, key),
        None => U256::zero(),
    };
    frame.stack.push(value);

    Ok(())
}

pub(crate) fn sstore(frame: &mut Frame) -> Result<(), StatusCode> {
    if frame.is_static {
        return Err(StatusCode::WriteProtection);
    }

    let key = frame.stack.pop();
    let value = frame.stack.pop();
    let address = frame.address;

    let cost = match &mut frame.host {
        Some(host) => host.access_storage_slot(address, key) as i64,
        None => 0,
    };
    frame.gas_left -= cost;
    if frame.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    let prev = match &frame.db {
        Some(db) => db.get_storage(address, key),
        None => U256::zero(),
    };
    if let Some(host) = &mut frame.host {
        host.record_storage_change(address, key, prev);
    }
    if let Some(db) = &mut frame.db {
        db.set_storage(address, key, value);
    }

    Ok(())
}

pub(crate) fn tload(frame: &mut Frame) {
    let key = frame.stack.pop();

    let value = match &frame.db {
        Some(db) => db.get_transient_storage(frame.address, key),
        None => U256::zero(),
    };
    frame.stack.push(value);
}

pub(crate) fn tstore(frame: &mut Frame) -> Result<(), StatusCode> {
    if frame.is_static {
        return Err(StatusCode::WriteProtection);
    }

    let key = frame.stack.pop();
    let value = frame.stack.pop();
    let address = frame.address;

    if let Some(db) = &mut frame.db {
        db.set_transient_storage(address, key, value);
    }

    Ok(())
}
