use super::i256::I256;
use super::properties::EXP_BYTE_COST;
use crate::{common::StatusCode, frame::Frame, stack::Stack};
use core::convert::TryInto;
use ethereum_types::{U256, U512};

pub(crate) fn add(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a.overflowing_add(b).0);
}

pub(crate) fn mul(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a.overflowing_mul(b).0);
}

pub(crate) fn sub(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a.overflowing_sub(b).0);
}

pub(crate) fn div(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(if b.is_zero() { U256::zero() } else { a / b });
}

pub(crate) fn sdiv(stack: &mut Stack) {
    let a = I256::from(stack.pop());
    let b = I256::from(stack.pop());
    let v = a / b;
    stack.push(v.into());
}

pub(crate) fn modulo(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    let v = if b.is_zero() { U256::zero() } else { a % b };
    stack.push(v);
}

pub(crate) fn smod(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    let v = if b.is_zero() {
        U256::zero()
    } else {
        let v = I256::from(a) % I256::from(b);
        v.into()
    };

    stack.push(v);
}

pub(crate) fn addmod(stack: &mut Stack) {
    let a = U512::from(stack.pop());
    let b = U512::from(stack.pop());
    let c = U512::from(stack.pop());

    let v = if c.is_zero() {
        U256::zero()
    } else {
        let v = (a + b) % c;
        v.try_into().expect("modulus fits the word")
    };

    stack.push(v);
}

pub(crate) fn mulmod(stack: &mut Stack) {
    let a = U512::from(stack.pop());
    let b = U512::from(stack.pop());
    let c = U512::from(stack.pop());

    let v = if c.is_zero() {
        U256::zero()
    } else {
        let v = (a * b) % c;
        v.try_into().expect("modulus fits the word")
    };

    stack.push(v);
}

fn log2floor(value: U256) -> u64 {
    debug_assert!(!value.is_zero());
    let mut l: u64 = 256;
    for i in 0..4 {
        let i = 3 - i;
        if value.0[i] == 0u64 {
            l -= 64;
        } else {
            l -= value.0[i].leading_zeros() as u64;
            if l == 0 {
                return l;
            } else {
                return l - 1;
            }
        }
    }
    l
}

pub(crate) fn exp(frame: &mut Frame) -> Result<(), StatusCode> {
    let mut base = frame.stack.pop();
    let mut power = frame.stack.pop();

    if !power.is_zero() {
        let additional_gas = EXP_BYTE_COST * (log2floor(power) / 8 + 1) as i64;

        frame.gas_left -= additional_gas;

        if frame.gas_left < 0 {
            return Err(StatusCode::OutOfGas);
        }
    }

    let mut v = U256::one();

    while !power.is_zero() {
        if !(power & U256::one()).is_zero() {
            v = v.overflowing_mul(base).0;
        }
        power >>= 1;
        base = base.overflowing_mul(base).0;
    }

    frame.stack.push(v);

    Ok(())
}

pub(crate) fn signextend(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    let v = if a >= U256::from(31) {
        b
    } else {
        let t = 8 * a.as_usize() + 7;
        let mask = (U256::one() << (t + 1)).overflowing_sub(U256::one()).0;
        if b.bit(t) {
            b | !mask
        } else {
            b & mask
        }
    };

    stack.push(v);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run2(f: fn(&mut Stack), a: U256, b: U256) -> U256 {
        let mut stack = Stack::default();
        stack.push(b);
        stack.push(a);
        f(&mut stack);
        stack.pop()
    }

    #[test]
    fn wrapping() {
        assert_eq!(run2(add, U256::MAX, 1.into()), U256::zero());
        assert_eq!(run2(sub, U256::zero(), 1.into()), U256::MAX);
        assert_eq!(run2(mul, U256::MAX, 2.into()), U256::MAX - U256::one());
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(run2(div, 1.into(), U256::zero()), U256::zero());
        assert_eq!(run2(modulo, 1.into(), U256::zero()), U256::zero());
    }

    #[test]
    fn modular() {
        let mut stack = Stack::default();
        // ADDMOD(MAX, 2, 3): the sum is computed in more than 256 bits.
        stack.push(3.into());
        stack.push(2.into());
        stack.push(U256::MAX);
        addmod(&mut stack);
        let three = U256::from(3);
        assert_eq!(stack.pop(), (U256::MAX % three + U256::from(2)) % three);

        stack.push(U256::zero());
        stack.push(2.into());
        stack.push(U256::MAX);
        mulmod(&mut stack);
        assert_eq!(stack.pop(), U256::zero());
    }

    #[test]
    fn sign_extension() {
        // Extend 0xff from byte 0: all ones.
        assert_eq!(run2(signextend, 0.into(), 0xff.into()), U256::MAX);
        // 0x7f stays positive.
        assert_eq!(run2(signextend, 0.into(), 0x7f.into()), 0x7f.into());
        // k >= 31 is the identity.
        assert_eq!(run2(signextend, 31.into(), 0xff.into()), 0xff.into());
        assert_eq!(run2(signextend, U256::MAX, 0xff.into()), 0xff.into());
        // Bits above the extension byte are discarded.
        assert_eq!(
            run2(signextend, 0.into(), 0x1234.into()),
            0x34.into()
        );
    }
}
