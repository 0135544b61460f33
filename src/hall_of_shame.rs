//! Known-bad concurrent factorials.
//!
//! Nothing else in the crate calls into this module. Each function here
//! reproduces a broken pattern on purpose so tests can pin down what goes
//! wrong; the strategies in [`crate::parallel`] are the repaired versions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Barrier;
use std::thread;

use num_bigint::BigUint;
use tokio::runtime::Handle;

use crate::error::FactorialError;
use crate::partition::partition;

/// Every worker reads the shared product, multiplies locally and writes it
/// back as two separate atomic operations. Concurrent workers overwrite each
/// other, so chunk products go missing.
///
/// A barrier between the read and the write makes every worker read the
/// initial `1` before anyone writes, so the last writer wins outright: with
/// more than one chunk the result is a single chunk's product, never `n!`.
/// With exactly one chunk there is nobody to race and the result is exact.
pub fn lost_update_product(n: u64, chunk_size: u64) -> Result<u64, FactorialError> {
    if n > 20 {
        return Err(FactorialError::ArithmeticOverflow { n, width: u64::BITS });
    }
    let partition = partition(n, chunk_size)?;
    let shared = AtomicU64::new(1);
    let interleave = Barrier::new(partition.len());
    thread::scope(|scope| {
        for chunk in partition.chunks() {
            let (shared, interleave) = (&shared, &interleave);
            let chunk = chunk.clone();
            scope.spawn(move || {
                let product: u64 = chunk.product();
                let seen = shared.load(Ordering::SeqCst);
                interleave.wait();
                shared.store(seen * product, Ordering::SeqCst);
            });
        }
    });
    Ok(shared.into_inner())
}

fn resubmit(
    handle: Handle,
    progress: async_watch::Sender<(u64, BigUint)>,
    limit: u64,
    step: u64,
    value: BigUint,
) {
    if progress.send((step, value.clone())).is_err() || step >= limit {
        return;
    }
    let next = handle.clone();
    drop(handle.spawn(async move {
        let step = step + 1;
        resubmit(next, progress, limit, step, value * step)
    }));
}

/// A task that keeps resubmitting itself, raced by a caller that waits for
/// just one update. Returns whatever `(k, k!)` the caller happened to see.
///
/// On a single-threaded runtime the first update is already published before
/// any resubmitted task gets to run, so the caller sees `(0, 1)` and drops
/// the rest of the chain along with the runtime. For `n > 0` that is never
/// `(n, n!)`.
pub fn resubmitting_agent(n: u64) -> Result<(u64, BigUint), FactorialError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|error| FactorialError::Runtime(error.to_string()))?;
    Ok(runtime.block_on(async move {
        let (progress, mut observer) = async_watch::channel((0, BigUint::from(1u32)));
        resubmit(Handle::current(), progress, n, 0, BigUint::from(1u32));
        // Waits for *a* change, not for the last one.
        if observer.changed().await.is_err() {
            // The chain already finished; the last value it sent is still readable.
            tracing::debug!(n, "agent finished before the first update was observed");
        }
        let seen = (*observer.borrow()).clone();
        seen
    }))
}

/// The same self-resubmitting task, observed until it reports step `n`.
pub fn resubmitting_agent_joined(n: u64) -> Result<BigUint, FactorialError> {
    let runtime =
        tokio::runtime::Runtime::new().map_err(|error| FactorialError::Runtime(error.to_string()))?;
    runtime.block_on(async move {
        let (progress, mut observer) = async_watch::channel((0, BigUint::from(1u32)));
        resubmit(Handle::current(), progress, n, 0, BigUint::from(1u32));
        loop {
            let (step, value) = (*observer.borrow()).clone();
            if step >= n {
                return Ok(value);
            }
            if observer.changed().await.is_err() {
                let (step, value) = (*observer.borrow()).clone();
                return match step >= n {
                    true => Ok(value),
                    false => Err(FactorialError::Runtime(
                        "agent stopped before reaching the limit".to_owned(),
                    )),
                };
            }
        }
    })
}
