use num_bigint::BigUint;

use crate::error::FactorialError;
use crate::request::check_n;
use crate::sequential::iterative_unchecked;

/// On-demand `(k, k!)` pairs starting from `(0, 1)`.
///
/// Each value is derived from the one before it, and nothing past the
/// element being yielded is ever computed. Every producer keeps its own
/// cursor; call [`lazy_sequence`] again to start over.
#[derive(Clone, Debug)]
pub struct LazyFactorials {
    next_index: u64,
    previous: Option<BigUint>,
}

pub fn lazy_sequence() -> LazyFactorials {
    LazyFactorials {
        next_index: 0,
        previous: None,
    }
}

impl LazyFactorials {
    /// How many elements this producer has computed so far.
    pub fn evaluated(&self) -> u64 {
        self.next_index
    }
}

impl Iterator for LazyFactorials {
    type Item = (u64, BigUint);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        let value = match self.previous.take() {
            None => BigUint::from(1u32),
            Some(previous) => previous * index,
        };
        self.previous = Some(value.clone());
        self.next_index = index.checked_add(1)?;
        Some((index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

pub fn lazy(n: i64) -> Result<BigUint, FactorialError> {
    lazy_unchecked(check_n(n)?)
}

pub(crate) fn lazy_unchecked(n: u64) -> Result<BigUint, FactorialError> {
    let overflow = FactorialError::ArithmeticOverflow {
        n,
        width: usize::BITS,
    };
    let index = usize::try_from(n).map_err(|_| overflow.clone())?;
    lazy_sequence()
        .nth(index)
        .map(|(_, value)| value)
        .ok_or(overflow)
}

/// A thunk for `n!` that recomputes on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deferred {
    n: u64,
}

impl Deferred {
    pub fn new(n: i64) -> Result<Self, FactorialError> {
        Ok(Self::unsigned(check_n(n)?))
    }

    pub(crate) fn unsigned(n: u64) -> Self {
        Self { n }
    }

    pub fn force(&self) -> BigUint {
        tracing::trace!(n = self.n, "forcing deferred factorial");
        iterative_unchecked(self.n)
    }

    pub fn into_fn(self) -> impl Fn() -> BigUint {
        move || self.force()
    }
}

pub fn deferred(n: i64) -> Result<BigUint, FactorialError> {
    let thunk = Deferred::new(n)?.into_fn();
    Ok(thunk())
}

/// Something that produces a value once asked to.
pub trait ValueComputer {
    type Value;

    fn compute(&self) -> Self::Value;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Factorial {
    n: u64,
}

impl ValueComputer for Factorial {
    type Value = BigUint;

    fn compute(&self) -> BigUint {
        iterative_unchecked(self.n)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FactorialBuilder {
    n: i64,
}

impl FactorialBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factorial(mut self, n: i64) -> Self {
        self.n = n;
        self
    }

    pub fn build(self) -> Result<Factorial, FactorialError> {
        Ok(Factorial { n: check_n(self.n)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_identity() {
        let first: Vec<_> = lazy_sequence().take(5).collect();
        let expected: Vec<(u64, BigUint)> = [1u32, 1, 2, 6, 24]
            .into_iter()
            .enumerate()
            .map(|(k, v)| (k as u64, BigUint::from(v)))
            .collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn test_nth_element() {
        assert_eq!(lazy_sequence().nth(7), Some((7, BigUint::from(5040u32))));
    }

    #[test]
    fn test_restartable() {
        let first = lazy_sequence().nth(12);
        let second = lazy_sequence().nth(12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_does_not_force_past_request() {
        let mut sequence = lazy_sequence();
        assert_eq!(sequence.nth(4), Some((4, BigUint::from(24u32))));
        assert_eq!(sequence.evaluated(), 5);
        assert_eq!(sequence.next(), Some((5, BigUint::from(120u32))));
        assert_eq!(sequence.evaluated(), 6);
    }

    #[test]
    fn test_independent_producers() {
        let mut a = lazy_sequence();
        let mut b = a.clone();
        a.nth(3);
        assert_eq!(b.next(), Some((0, BigUint::from(1u32))));
        assert_eq!(a.next(), Some((4, BigUint::from(24u32))));
    }

    #[test]
    fn test_lazy_strategy() {
        assert_eq!(lazy(0).unwrap(), BigUint::from(1u32));
        assert_eq!(lazy(10).unwrap(), BigUint::from(3628800u32));
        assert!(lazy(-1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_deferred_recomputes() {
        let thunk = Deferred::new(6).unwrap().into_fn();
        assert_eq!(thunk(), BigUint::from(720u32));
        assert_eq!(thunk(), BigUint::from(720u32));
        assert_eq!(deferred(0).unwrap(), BigUint::from(1u32));
        assert!(Deferred::new(-5).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_builder() {
        let computer = FactorialBuilder::new().factorial(5).build().unwrap();
        assert_eq!(computer.compute(), BigUint::from(120u32));
        assert!(FactorialBuilder::new()
            .factorial(-1)
            .build()
            .unwrap_err()
            .is_invalid_argument());
    }
}
