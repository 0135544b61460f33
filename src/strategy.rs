use std::fmt::{self, Display};
use std::str::FromStr;

use num_bigint::BigUint;
use serde::Serialize;

use crate::error::FactorialError;
use crate::lazy::Deferred;
use crate::partition::{chunk_product, partition};
use crate::request::{FactorialRequest, ParallelConfig};
use crate::{dispatch, lazy, parallel, sequential, trampoline};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Iterative,
    Fold,
    RangeProduct,
    Recursive,
    ThreadPool,
    SharedAccumulator,
    Agent,
    Lazy,
    Deferred,
    Trampoline,
    Dispatch,
}

impl Strategy {
    pub const ALL: [Strategy; 11] = [
        Strategy::Iterative,
        Strategy::Fold,
        Strategy::RangeProduct,
        Strategy::Recursive,
        Strategy::ThreadPool,
        Strategy::SharedAccumulator,
        Strategy::Agent,
        Strategy::Lazy,
        Strategy::Deferred,
        Strategy::Trampoline,
        Strategy::Dispatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Iterative => "iterative",
            Strategy::Fold => "fold",
            Strategy::RangeProduct => "range-product",
            Strategy::Recursive => "recursive",
            Strategy::ThreadPool => "thread-pool",
            Strategy::SharedAccumulator => "shared-accumulator",
            Strategy::Agent => "agent",
            Strategy::Lazy => "lazy",
            Strategy::Deferred => "deferred",
            Strategy::Trampoline => "trampoline",
            Strategy::Dispatch => "dispatch",
        }
    }

    /// Whether the strategy splits the range into chunks.
    pub fn is_partitioned(self) -> bool {
        matches!(
            self,
            Strategy::ThreadPool | Strategy::SharedAccumulator | Strategy::Agent
        )
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy `{}`, expected one of: ", self.0)?;
        let names: Vec<_> = Strategy::ALL.iter().map(|s| s.name()).collect();
        f.write_str(&names.join(", "))
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

/// Computes `n!` with the given strategy and the default parallel config.
pub fn factorial(
    strategy: Strategy,
    n: i64,
    chunk_size: Option<i64>,
) -> Result<BigUint, FactorialError> {
    let request = FactorialRequest::new(n, chunk_size)?;
    factorial_with(strategy, request, &ParallelConfig::default())
}

pub fn factorial_with(
    strategy: Strategy,
    request: FactorialRequest,
    config: &ParallelConfig,
) -> Result<BigUint, FactorialError> {
    let n = request.n();
    tracing::debug!(%strategy, n, chunk_size = ?request.chunk_size(), "computing factorial");
    let chunks = || partition(n, request.chunk_size_or(config));
    match strategy {
        Strategy::Iterative => Ok(sequential::iterative_unchecked(n)),
        Strategy::Fold => Ok(sequential::fold_unchecked(n)),
        Strategy::RangeProduct => Ok(sequential::range_product_unchecked(n)),
        Strategy::Recursive => Ok(sequential::recursive_unchecked(n)),
        Strategy::ThreadPool => parallel::run_thread_pool(chunks()?, config, chunk_product),
        Strategy::SharedAccumulator => {
            parallel::run_shared_accumulator(chunks()?, config, chunk_product)
        }
        Strategy::Agent => parallel::run_agent(chunks()?, config, chunk_product),
        Strategy::Lazy => lazy::lazy_unchecked(n),
        Strategy::Deferred => Ok(Deferred::unsigned(n).force()),
        Strategy::Trampoline => Ok(trampoline::trampoline_unchecked(n)),
        Strategy::Dispatch => Ok(dispatch::dispatch_unchecked(n)),
    }
}
