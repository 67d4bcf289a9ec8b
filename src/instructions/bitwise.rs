use super::i256::{Sign, I256};
use crate::stack::Stack;
use ethereum_types::U256;

#[inline]
pub(crate) fn byte(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    // BYTE(i, x): the i-th byte counted from the most significant end.
    let ret = if a >= U256::from(32) {
        U256::zero()
    } else {
        U256::from(b.byte(31 - a.as_usize()))
    };

    stack.push(ret)
}

#[inline]
pub(crate) fn shl(stack: &mut Stack) {
    let shift = stack.pop();
    let value = stack.pop();

    let ret = if value.is_zero() || shift >= U256::from(256) {
        U256::zero()
    } else {
        value << shift.as_usize()
    };

    stack.push(ret)
}

#[inline]
pub(crate) fn shr(stack: &mut Stack) {
    let shift = stack.pop();
    let value = stack.pop();

    let ret = if value.is_zero() || shift >= U256::from(256) {
        U256::zero()
    } else {
        value >> shift.as_usize()
    };

    stack.push(ret)
}

#[inline]
pub(crate) fn sar(stack: &mut Stack) {
    let shift = stack.pop();
    let value = I256::from(stack.pop());

    let ret = if value == I256::zero() || shift >= U256::from(256) {
        match value.0 {
            // value is 0 or >=1, pushing 0
            Sign::Plus | Sign::NoSign => U256::zero(),
            // value is <0, pushing -1
            Sign::Minus => I256(Sign::Minus, U256::one()).into(),
        }
    } else {
        let shift = shift.as_usize();

        match value.0 {
            Sign::Plus | Sign::NoSign => U256::from(value) >> shift,
            Sign::Minus => {
                // Arithmetic shift of a negative: shift the offset-by-one
                // magnitude, then undo the offset.
                let shifted = ((value.1.overflowing_sub(U256::one()).0) >> shift)
                    .overflowing_add(U256::one())
                    .0;
                I256(Sign::Minus, shifted).into()
            }
        }
    };

    stack.push(ret)
}
