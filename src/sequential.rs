use num_bigint::BigUint;

use crate::error::FactorialError;
use crate::request::check_n;

/// Ascending loop into a running total that starts at the empty product.
pub fn iterative(n: i64) -> Result<BigUint, FactorialError> {
    let n = check_n(n)?;
    Ok(iterative_unchecked(n))
}

pub(crate) fn iterative_unchecked(n: u64) -> BigUint {
    let mut result = BigUint::from(1u32);
    for i in 1..=n {
        result *= i;
    }
    result
}

pub fn fold(n: i64) -> Result<BigUint, FactorialError> {
    let n = check_n(n)?;
    Ok(fold_unchecked(n))
}

pub(crate) fn fold_unchecked(n: u64) -> BigUint {
    (1..=n).fold(BigUint::from(1u32), |acc, i| acc * i)
}

/// Builds the whole list of factors first, then reduces it in one go.
pub fn range_product(n: i64) -> Result<BigUint, FactorialError> {
    let n = check_n(n)?;
    Ok(range_product_unchecked(n))
}

pub(crate) fn range_product_unchecked(n: u64) -> BigUint {
    let factors: Vec<BigUint> = (1..=n).map(BigUint::from).collect();
    factors.into_iter().product()
}

pub fn recursive(n: i64) -> Result<BigUint, FactorialError> {
    let n = check_n(n)?;
    Ok(recursive_unchecked(n))
}

pub(crate) fn recursive_unchecked(n: u64) -> BigUint {
    if n == 0 {
        return BigUint::from(1u32);
    }
    // One frame per factor, so the stack is grown on demand.
    stacker::maybe_grow(64 * 1024, 4 * 1024 * 1024, || recursive_unchecked(n - 1) * n)
}

/// Fixed-width variant, for callers that want a machine integer.
pub fn iterative_u64(n: i64) -> Result<u64, FactorialError> {
    let n = check_n(n)?;
    (1..=n).try_fold(1u64, |acc, i| {
        acc.checked_mul(i)
            .ok_or(FactorialError::ArithmeticOverflow { n, width: u64::BITS })
    })
}
