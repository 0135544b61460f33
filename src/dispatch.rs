use num_bigint::BigUint;

use crate::error::FactorialError;
use crate::request::check_n;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    Continuing { step: u64, value: BigUint },
    Done { value: BigUint },
}

impl State {
    pub fn start() -> Self {
        Self::Continuing {
            step: 1,
            value: BigUint::from(1u32),
        }
    }
}

/// Advances the machine by one transition.
///
/// While `step < limit` the running value absorbs `step` and the step moves
/// on; the last transition multiplies in the limit itself.
pub fn transition(state: State, limit: u64) -> State {
    match state {
        State::Continuing { step, value } if step < limit => State::Continuing {
            step: step + 1,
            value: value * step,
        },
        State::Continuing { value, .. } => State::Done {
            value: value * limit.max(1),
        },
        done @ State::Done { .. } => done,
    }
}

pub fn dispatch(n: i64) -> Result<BigUint, FactorialError> {
    let limit = check_n(n)?;
    Ok(dispatch_unchecked(limit))
}

pub(crate) fn dispatch_unchecked(limit: u64) -> BigUint {
    let mut state = State::start();
    loop {
        state = match state {
            State::Done { value } => return value,
            continuing => transition(continuing, limit),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::iterative_unchecked;

    #[test]
    fn test_transitions() {
        let state = transition(State::start(), 3);
        assert_eq!(
            state,
            State::Continuing {
                step: 2,
                value: BigUint::from(1u32)
            }
        );
        let state = transition(state, 3);
        assert_eq!(
            state,
            State::Continuing {
                step: 3,
                value: BigUint::from(2u32)
            }
        );
        let state = transition(state, 3);
        assert_eq!(
            state,
            State::Done {
                value: BigUint::from(6u32)
            }
        );
        assert_eq!(transition(state.clone(), 3), state);
    }

    #[test]
    fn test_matches_reference() {
        for n in [0, 1, 2, 5, 10, 20, 64] {
            assert_eq!(dispatch(n as i64).unwrap(), iterative_unchecked(n));
        }
    }

    #[test]
    fn test_negative_input() {
        assert!(dispatch(-7).unwrap_err().is_invalid_argument());
    }
}
