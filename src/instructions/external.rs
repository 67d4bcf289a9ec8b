use crate::{
    common::{address_to_u256, u256_to_address, StatusCode},
    frame::Frame,
};
use core::cmp::min;
use ethereum_types::U256;

pub(crate) fn address(frame: &mut Frame) {
    frame.stack.push(address_to_u256(frame.address));
}

pub(crate) fn caller(frame: &mut Frame) {
    frame.stack.push(address_to_u256(frame.caller));
}

pub(crate) fn callvalue(frame: &mut Frame) {
    frame.stack.push(frame.value);
}

pub(crate) fn balance(frame: &mut Frame) -> Result<(), StatusCode> {
    let addr = u256_to_address(frame.stack.pop());

    let cost = match &mut frame.host {
        Some(host) => host.access_address(addr) as i64,
        None => 0,
    };
    frame.gas_left -= cost;
    if frame.gas_left < 0 {
        return Err(StatusCode::OutOfGas);
    }

    let balance = match &frame.db {
        Some(db) => db.get_balance(addr),
        None => U256::zero(),
    };
    frame.stack.push(balance);

    Ok(())
}

pub(crate) fn selfbalance(frame: &mut Frame) {
    // The executing account is always warm.
    let balance = match &frame.db {
        Some(db) => db.get_balance(frame.address),
        None => U256::zero(),
    };
    frame.stack.push(balance);
}

pub(crate) fn origin(frame: &mut Frame) {
    frame.stack.push(address_to_u256(frame.tx_context.tx_origin));
}

pub(crate) fn gasprice(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.tx_gas_price);
}

pub(crate) fn coinbase(frame: &mut Frame) {
    frame
        .stack
        .push(address_to_u256(frame.tx_context.block_coinbase));
}

pub(crate) fn timestamp(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.block_timestamp.into());
}

pub(crate) fn number(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.block_number.into());
}

pub(crate) fn prevrandao(frame: &mut Frame) {
    frame
        .stack
        .push(U256::from_big_endian(frame.tx_context.block_prev_randao.as_bytes()));
}

pub(crate) fn gaslimit(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.block_gas_limit.into());
}

pub(crate) fn chainid(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.chain_id);
}

pub(crate) fn basefee(frame: &mut Frame) {
    frame.stack.push(frame.tx_context.block_base_fee);
}

pub(crate) fn calldataload(frame: &mut Frame) {
    let index = frame.stack.pop();

    let input_len = frame.input_data.len();

    frame.stack.push({
        if index > U256::from(input_len) {
            U256::zero()
        } else {
            let index_usize = index.as_usize();
            let end = min(index_usize + 32, input_len);

            let mut data = [0; 32];
            data[..end - index_usize].copy_from_slice(&frame.input_data[index_usize..end]);

            data.into()
        }
    });
}

pub(crate) fn calldatasize(frame: &mut Frame) {
    frame.stack.push(frame.input_data.len().into());
}
