use std::future::IntoFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::task::{FutureObj, Spawn, SpawnError};

/// Spawns futures onto a tokio runtime through the `futures` spawn traits,
/// counting how many tasks went out.
#[derive(Clone)]
pub(crate) struct RuntimeSpawn {
    tokio: tokio::runtime::Handle,
    spawned: Arc<AtomicUsize>,
}

impl RuntimeSpawn {
    pub(crate) fn from_handle(handle: tokio::runtime::Handle) -> Self {
        Self {
            tokio: handle,
            spawned: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl Spawn for RuntimeSpawn {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
        self.spawned.fetch_add(1, Ordering::Relaxed);
        drop(self.tokio.spawn(future.into_future()));
        Ok(())
    }
}
