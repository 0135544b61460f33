use std::fmt::Display;
use std::time::{Duration, Instant};

use colored::Colorize;
use indexmap::IndexMap;
use num_bigint::BigUint;

use crate::error::FactorialError;
use crate::request::{FactorialRequest, ParallelConfig};
use crate::sequential::iterative_unchecked;
use crate::strategy::{factorial_with, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    Passed,
    Mismatch { expected: BigUint, actual: BigUint },
    Failed(FactorialError),
}

impl CheckStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckStatus::Passed)
    }
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "passed"),
            CheckStatus::Mismatch { expected, actual } => {
                write!(f, "mismatch: expected {expected}, got {actual}")
            }
            CheckStatus::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub strategy: Strategy,
    pub n: u64,
    pub chunk_size: Option<u64>,
    pub duration: Duration,
    pub status: CheckStatus,
}

/// Results of a cross-check, grouped per strategy in [`Strategy::ALL`] order.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub results: IndexMap<Strategy, Vec<CheckResult>>,
    pub duration: Duration,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }

    pub fn passed(&self) -> usize {
        self.results
            .values()
            .flatten()
            .filter(|result| result.status.is_passed())
            .count()
    }

    pub fn is_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

/// Runs every strategy for every `n` against the iterative reference.
///
/// Partitioned strategies run once per chunk size; the others once per `n`.
pub fn run_checks(ns: &[u64], chunk_sizes: &[u64], config: &ParallelConfig) -> CheckReport {
    let start_time = Instant::now();
    let mut report = CheckReport::default();

    for &n in ns {
        let expected = iterative_unchecked(n);
        for strategy in Strategy::ALL {
            let chunk_sizes: Vec<Option<u64>> = match strategy.is_partitioned() {
                true if !chunk_sizes.is_empty() => chunk_sizes.iter().copied().map(Some).collect(),
                _ => vec![None],
            };
            for chunk_size in chunk_sizes {
                let result = check_single(strategy, n, chunk_size, &expected, config);
                if !result.status.is_passed() {
                    tracing::warn!(%strategy, n, ?chunk_size, status = %result.status, "check failed");
                }
                report.results.entry(strategy).or_default().push(result);
            }
        }
    }

    report.duration = start_time.elapsed();
    tracing::info!(
        total = report.total(),
        passed = report.passed(),
        "cross-check finished"
    );
    report
}

fn check_single(
    strategy: Strategy,
    n: u64,
    chunk_size: Option<u64>,
    expected: &BigUint,
    config: &ParallelConfig,
) -> CheckResult {
    let start = Instant::now();
    let outcome = FactorialRequest::from_unsigned(n, chunk_size)
        .and_then(|request| factorial_with(strategy, request, config));
    let status = match outcome {
        Ok(actual) if &actual == expected => CheckStatus::Passed,
        Ok(actual) => CheckStatus::Mismatch {
            expected: expected.clone(),
            actual,
        },
        Err(error) => CheckStatus::Failed(error),
    };
    CheckResult {
        strategy,
        n,
        chunk_size,
        duration: start.elapsed(),
        status,
    }
}

pub fn print_report(report: &CheckReport) {
    for (strategy, results) in &report.results {
        let passed = results.iter().filter(|r| r.status.is_passed()).count();
        let header = format!("{strategy} ({passed}/{})", results.len());
        if passed == results.len() {
            println!("{} {}", "✓".bright_green(), header);
        } else {
            println!("{} {}", "✗".bright_red(), header.bright_red());
        }

        for result in results.iter().filter(|r| !r.status.is_passed()) {
            let chunk = match result.chunk_size {
                Some(chunk_size) => format!(", chunk size {chunk_size}"),
                None => String::new(),
            };
            println!(
                "    n = {}{}: {} {}",
                result.n,
                chunk,
                result.status.to_string().red(),
                format!("({:.2?})", result.duration).dimmed()
            );
        }
    }

    println!();
    print_summary(report.total(), report.passed(), report.duration);
}

fn print_summary(total: usize, passed: usize, duration: Duration) {
    let failed = total - passed;

    print!("Check result: ");
    if failed == 0 {
        print!("{}", "ok".bright_green());
    } else {
        print!("{}", "FAILED".bright_red());
    }

    println!(
        ". {} passed; {} failed; finished in {:.2}s",
        passed.to_string().bright_green(),
        if failed > 0 {
            failed.to_string().bright_red()
        } else {
            failed.to_string().normal()
        },
        duration.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_strategies_pass() {
        let config = ParallelConfig::default().with_workers(2).unwrap();
        let report = run_checks(&[0, 1, 5, 10, 20], &[1, 2, 3, 25], &config);
        assert!(report.is_passed(), "{report:?}");
        assert_eq!(report.results.len(), Strategy::ALL.len());
        // 8 unpartitioned strategies once per n, 3 partitioned ones per chunk size.
        assert_eq!(report.total(), 5 * (8 + 3 * 4));
    }

    #[test]
    fn test_groups_follow_strategy_order() {
        let report = run_checks(&[3], &[], &ParallelConfig::default());
        let order: Vec<_> = report.results.keys().copied().collect();
        assert_eq!(order, Strategy::ALL.to_vec());
        assert_eq!(report.total(), Strategy::ALL.len());
    }

    #[test]
    fn test_zero_chunk_size_fails_instead_of_computing() {
        let report = run_checks(&[5], &[0], &ParallelConfig::default());
        for strategy in Strategy::ALL.into_iter().filter(|s| s.is_partitioned()) {
            assert_eq!(
                report.results[&strategy][0].status,
                CheckStatus::Failed(FactorialError::invalid("chunk_size", 0))
            );
        }
        assert_eq!(report.passed(), Strategy::ALL.len() - 3);
    }

    #[test]
    fn test_failed_status_display() {
        let status = CheckStatus::Failed(FactorialError::invalid("workers", 0));
        assert!(!status.is_passed());
        assert_eq!(status.to_string(), "failed: invalid argument `workers`: 0");
    }

    #[test]
    fn test_invalid_config_reported_per_strategy() {
        let config = ParallelConfig {
            workers: 0,
            default_chunk_size: 4,
        };
        let report = run_checks(&[5], &[2], &config);
        assert!(!report.is_passed());
        for strategy in Strategy::ALL {
            let passed = report.results[&strategy][0].status.is_passed();
            assert_eq!(passed, !strategy.is_partitioned());
        }
    }
}
