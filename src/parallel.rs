//! Partition-parallel strategies.
//!
//! All of them split `[1, n]` with [`partition`], compute chunk products
//! concurrently and only combine once every worker has been joined.

use std::any::Any;
use std::ops::RangeInclusive;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, PoisonError};
use std::thread;

use futures::executor::{block_on, ThreadPool};
use futures::future::join_all;
use futures::task::{SpawnError, SpawnExt};
use futures::FutureExt;
use num_bigint::BigUint;
use tokio::sync::{mpsc, oneshot};

use crate::error::{panic_message, FactorialError};
use crate::partition::{chunk_product, combine, partition, Partition};
use crate::request::{FactorialRequest, ParallelConfig};
use crate::spawn::RuntimeSpawn;
use crate::strategy::Strategy;

type Panic = Box<dyn Any + Send>;

fn partition_request(
    n: i64,
    chunk_size: i64,
    config: &ParallelConfig,
) -> Result<Partition, FactorialError> {
    let request = FactorialRequest::new(n, Some(chunk_size))?;
    partition(request.n(), request.chunk_size_or(config))
}

/// Map-reduce over a `futures` thread pool.
pub fn thread_pool(
    n: i64,
    chunk_size: i64,
    config: &ParallelConfig,
) -> Result<BigUint, FactorialError> {
    let partition = partition_request(n, chunk_size, config)?;
    run_thread_pool(partition, config, chunk_product)
}

/// Workers multiply straight into one mutex-guarded accumulator.
pub fn shared_accumulator(
    n: i64,
    chunk_size: i64,
    config: &ParallelConfig,
) -> Result<BigUint, FactorialError> {
    let partition = partition_request(n, chunk_size, config)?;
    run_shared_accumulator(partition, config, chunk_product)
}

/// Chunk tasks report their products to a single agent that owns the
/// accumulator.
pub fn agent(n: i64, chunk_size: i64, config: &ParallelConfig) -> Result<BigUint, FactorialError> {
    let partition = partition_request(n, chunk_size, config)?;
    run_agent(partition, config, chunk_product)
}

fn worker_failure(strategy: Strategy, message: String) -> FactorialError {
    tracing::warn!(%strategy, %message, "chunk worker failed");
    FactorialError::WorkerFailed { strategy, message }
}

pub(crate) fn run_thread_pool<F>(
    partition: Partition,
    config: &ParallelConfig,
    work: F,
) -> Result<BigUint, FactorialError>
where
    F: Fn(RangeInclusive<u64>) -> BigUint + Clone + Send + 'static,
{
    tracing::debug!(
        n = partition.n(),
        chunks = partition.len(),
        workers = config.workers,
        "thread pool map-reduce"
    );
    let pool = ThreadPool::builder()
        .pool_size(config.checked_workers()?)
        .name_prefix("factorial-chunk-")
        .create()
        .map_err(|error| FactorialError::Runtime(error.to_string()))?;

    let handles = partition
        .into_chunks()
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let work = work.clone();
            pool.spawn_with_handle(
                AssertUnwindSafe(async move {
                    tracing::trace!(index, ?chunk, "multiplying chunk");
                    work(chunk)
                })
                .catch_unwind(),
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| FactorialError::Runtime(error.to_string()))?;

    // Join barrier: every chunk finishes before anything is combined.
    let products: Vec<Result<BigUint, Panic>> = block_on(join_all(handles));

    let products = products
        .into_iter()
        .map(|product| {
            product.map_err(|panic| worker_failure(Strategy::ThreadPool, panic_message(panic)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(combine(products))
}

pub(crate) fn run_shared_accumulator<F>(
    partition: Partition,
    config: &ParallelConfig,
    work: F,
) -> Result<BigUint, FactorialError>
where
    F: Fn(RangeInclusive<u64>) -> BigUint + Sync,
{
    let workers = config.checked_workers()?.min(partition.len());
    tracing::debug!(
        n = partition.n(),
        chunks = partition.len(),
        workers,
        "shared accumulator"
    );
    let accumulator = Mutex::new(BigUint::from(1u32));
    let queue = Mutex::new(partition.into_chunks().into_iter());
    let (accumulator_ref, queue, work) = (&accumulator, &queue, &work);

    let outcomes: Vec<Result<(), Panic>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || loop {
                    let Some(chunk) = queue.lock().unwrap_or_else(PoisonError::into_inner).next()
                    else {
                        break;
                    };
                    let product = work(chunk);
                    *accumulator_ref
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner) *= product;
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join()).collect()
    });

    for outcome in outcomes {
        outcome.map_err(|panic| {
            worker_failure(Strategy::SharedAccumulator, panic_message(panic))
        })?;
    }
    Ok(accumulator
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner))
}

async fn accumulate(mut inbox: mpsc::UnboundedReceiver<BigUint>, done: oneshot::Sender<BigUint>) {
    let mut value = BigUint::from(1u32);
    let mut received = 0usize;
    while let Some(product) = inbox.recv().await {
        value *= product;
        received += 1;
    }
    tracing::trace!(received, "agent drained its inbox");
    // The receiver is only gone if the caller gave up.
    let _ = done.send(value);
}

pub(crate) fn run_agent<F>(
    partition: Partition,
    config: &ParallelConfig,
    work: F,
) -> Result<BigUint, FactorialError>
where
    F: Fn(RangeInclusive<u64>) -> BigUint + Clone + Send + 'static,
{
    tracing::debug!(
        n = partition.n(),
        chunks = partition.len(),
        workers = config.workers,
        "agent accumulation"
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.checked_workers()?)
        .thread_name("factorial-agent")
        .build()
        .map_err(|error| FactorialError::Runtime(error.to_string()))?;
    let spawner = RuntimeSpawn::from_handle(runtime.handle().clone());
    runtime.block_on(agent_session(spawner, partition, work))
}

async fn agent_session<F>(
    spawner: RuntimeSpawn,
    partition: Partition,
    work: F,
) -> Result<BigUint, FactorialError>
where
    F: Fn(RangeInclusive<u64>) -> BigUint + Clone + Send + 'static,
{
    let spawn_error = |error: SpawnError| FactorialError::Runtime(error.to_string());
    let (inbox, outbox) = mpsc::unbounded_channel();
    let (done, result) = oneshot::channel();
    spawner.spawn(accumulate(outbox, done)).map_err(spawn_error)?;

    let tasks = partition
        .into_chunks()
        .into_iter()
        .map(|chunk| {
            let inbox = inbox.clone();
            let work = work.clone();
            spawner.spawn_with_handle(
                AssertUnwindSafe(async move {
                    inbox
                        .send(work(chunk))
                        .map_err(|_| "agent stopped receiving".to_owned())
                })
                .catch_unwind(),
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(spawn_error)?;
    // Only the chunk tasks hold senders now, so the agent stops once they are done.
    drop(inbox);

    let outcomes: Vec<Result<Result<(), String>, Panic>> = join_all(tasks).await;
    let value = result
        .await
        .map_err(|_| FactorialError::Runtime("agent dropped its result".to_owned()));
    tracing::trace!(tasks = spawner.spawned(), "agent joined");

    for outcome in outcomes {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(message)) => return Err(worker_failure(Strategy::Agent, message)),
            Err(panic) => return Err(worker_failure(Strategy::Agent, panic_message(panic))),
        }
    }
    value
}
