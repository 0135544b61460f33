use num_bigint::BigUint;

use crate::error::FactorialError;
use crate::request::check_n;

/// Either a finished value or the next step to take.
pub enum Bounce<T> {
    Done(T),
    More(Box<dyn FnOnce() -> Bounce<T>>),
}

impl<T> Bounce<T> {
    pub fn more(next: impl FnOnce() -> Bounce<T> + 'static) -> Self {
        Self::More(Box::new(next))
    }
}

/// Runs continuations until one of them produces a value.
pub fn run<T>(mut bounce: Bounce<T>) -> T {
    loop {
        match bounce {
            Bounce::Done(value) => return value,
            Bounce::More(next) => bounce = next(),
        }
    }
}

fn advance(limit: u64, step: u64, value: BigUint) -> Bounce<BigUint> {
    if step >= limit {
        return Bounce::Done(value);
    }
    Bounce::more(move || {
        let step = step + 1;
        let value = value * step;
        advance(limit, step, value)
    })
}

pub fn trampoline(n: i64) -> Result<BigUint, FactorialError> {
    let n = check_n(n)?;
    Ok(trampoline_unchecked(n))
}

pub(crate) fn trampoline_unchecked(n: u64) -> BigUint {
    run(advance(n, 1, BigUint::from(1u32)))
}
