use super::i256::I256;
use crate::stack::Stack;
use ethereum_types::U256;

#[inline]
pub(crate) fn lt(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    stack.push(if a.lt(&b) { U256::one() } else { U256::zero() })
}

#[inline]
pub(crate) fn gt(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    stack.push(if a.gt(&b) { U256::one() } else { U256::zero() })
}

#[inline]
pub(crate) fn slt(stack: &mut Stack) {
    let a: I256 = stack.pop().into();
    let b: I256 = stack.pop().into();

    stack.push(if a.lt(&b) { U256::one() } else { U256::zero() })
}

#[inline]
pub(crate) fn sgt(stack: &mut Stack) {
    let a: I256 = stack.pop().into();
    let b: I256 = stack.pop().into();

    stack.push(if a.gt(&b) { U256::one() } else { U256::zero() })
}

#[inline]
pub(crate) fn eq(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();

    stack.push(if a.eq(&b) { U256::one() } else { U256::zero() })
}

#[inline]
pub(crate) fn iszero(stack: &mut Stack) {
    let a = stack.pop();
    stack.push(if a.is_zero() {
        U256::one()
    } else {
        U256::zero()
    })
}

#[inline]
pub(crate) fn and(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a & b);
}

#[inline]
pub(crate) fn or(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a | b);
}

#[inline]
pub(crate) fn xor(stack: &mut Stack) {
    let a = stack.pop();
    let b = stack.pop();
    stack.push(a ^ b);
}

#[inline]
pub(crate) fn not(stack: &mut Stack) {
    let a = stack.pop();
    stack.push(!a);
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
    fn unsigned_comparisons() {
        assert_eq!(run2(lt, 1.into(), 2.into()), U256::one());
        assert_eq!(run2(lt, 2.into(), 1.into()), U256::zero());
        assert_eq!(run2(gt, 2.into(), 1.into()), U256::one());
        assert_eq!(run2(eq, 7.into(), 7.into()), U256::one());
    }

    #[test]
    fn signed_comparisons() {
        let minus_one = U256::MAX;
        assert_eq!(run2(slt, minus_one, U256::zero()), U256::one());
        assert_eq!(run2(sgt, minus_one, U256::zero()), U256::zero());
        assert_eq!(run2(sgt, U256::zero(), minus_one), U256::one());
        // Unsigned LT disagrees on the same operands.
        assert_eq!(run2(lt, minus_one, U256::zero()), U256::zero());
    }
}
