#![cfg(test)]

use num_bigint::BigUint;

use crate::sequential::iterative_unchecked;
use crate::{factorial, factorial_with, lazy_sequence, FactorialRequest, ParallelConfig, Strategy};

fn reference(n: u64) -> BigUint {
    iterative_unchecked(n)
}

#[test]
fn test_reference_base_cases() {
    assert_eq!(reference(0), BigUint::from(1u32));
    assert_eq!(reference(1), BigUint::from(1u32));
}

#[test]
fn test_every_strategy_matches_reference() -> Result<(), String> {
    for n in [0u64, 1, 5, 10, 20] {
        for strategy in Strategy::ALL {
            let actual = factorial(strategy, n as i64, None).map_err(|e| e.to_string())?;
            if actual != reference(n) {
                return Err(format!("{strategy} disagrees at n = {n}: {actual}"));
            }
        }
    }
    Ok(())
}

#[test]
fn test_partitioned_strategies_invariant_to_chunk_size() -> Result<(), String> {
    let config = ParallelConfig::default().with_workers(3).map_err(|e| e.to_string())?;
    for n in [0u64, 1, 5, 10, 20] {
        for chunk_size in [1, 2, 3, n.max(1), n + 5] {
            for strategy in Strategy::ALL.into_iter().filter(|s| s.is_partitioned()) {
                let request = FactorialRequest::from_unsigned(n, Some(chunk_size))
                    .map_err(|e| e.to_string())?;
                let actual = factorial_with(strategy, request, &config).map_err(|e| e.to_string())?;
                if actual != reference(n) {
                    return Err(format!(
                        "{strategy} disagrees at n = {n}, chunk size {chunk_size}"
                    ));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_concrete_scenarios() {
    assert_eq!(
        factorial(Strategy::Iterative, 5, None).unwrap(),
        BigUint::from(120u32)
    );
    assert_eq!(
        factorial(Strategy::Fold, 0, None).unwrap(),
        BigUint::from(1u32)
    );
    assert_eq!(
        factorial(Strategy::ThreadPool, 10, Some(3)).unwrap(),
        BigUint::from(3628800u32)
    );
    assert_eq!(lazy_sequence().nth(7).unwrap().1, BigUint::from(5040u32));
    assert_eq!(
        factorial(Strategy::Trampoline, 5, None).unwrap(),
        BigUint::from(120u32)
    );
    assert!(factorial(Strategy::Iterative, -1, None)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn test_invalid_input_fails_everywhere() {
    for strategy in Strategy::ALL {
        assert!(factorial(strategy, -1, None).unwrap_err().is_invalid_argument());
        assert!(factorial(strategy, 4, Some(0)).unwrap_err().is_invalid_argument());
    }
}

#[test]
fn test_large_input_agrees() {
    let expected = reference(1000);
    for strategy in Strategy::ALL {
        assert_eq!(factorial(strategy, 1000, Some(64)).unwrap(), expected, "{strategy}");
    }
}
