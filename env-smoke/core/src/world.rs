// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::SmokeError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// In-process group of ranks sharing one barrier and one cancellation token
pub struct World {
    size: usize,
    barrier: Arc<Barrier>,
    cancellation_token: CancellationToken,
}

impl World {
    pub fn new(size: usize) -> Result<Self, SmokeError> {
        Self::with_cancellation(size, CancellationToken::new())
    }

    pub fn with_cancellation(
        size: usize,
        cancellation_token: CancellationToken,
    ) -> Result<Self, SmokeError> {
        if size == 0 {
            return Err(SmokeError::WorldTooSmall { size, min: 1 });
        }
        Ok(Self {
            size,
            barrier: Arc::new(Barrier::new(size)),
            cancellation_token,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns a clone of the cancellation token for external control
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn rank(&self, id: usize) -> Rank {
        Rank {
            id,
            size: self.size,
            barrier: self.barrier.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }

    /// Spawns one task per rank and gathers their results in rank order.
    ///
    /// A failing or panicking rank cancels the world so peers blocked in a
    /// barrier or a receive return instead of hanging. The first error that
    /// is not a cancellation wins.
    pub async fn run<F, Fut, T>(&self, mut spawn_rank: F) -> Result<Vec<T>, SmokeError>
    where
        F: FnMut(Rank) -> Fut,
        Fut: Future<Output = Result<T, SmokeError>> + Send + 'static,
        T: Send + 'static,
    {
        let handles: Vec<_> = (0..self.size)
            .map(|id| {
                let task = spawn_rank(self.rank(id));
                let token = self.cancellation_token.clone();
                tokio::spawn(async move {
                    // Cancels on error and on panic
                    let guard = token.drop_guard();
                    let result = task.await;
                    if result.is_ok() {
                        guard.disarm();
                    }
                    result
                })
            })
            .collect();

        let mut results = Vec::with_capacity(self.size);
        let mut errors = Vec::new();
        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(value)) => results.push(value),
                Ok(Err(e)) => {
                    debug!(rank, error = %e, "rank returned an error");
                    errors.push(e);
                }
                Err(e) => {
                    self.cancellation_token.cancel();
                    errors.push(SmokeError::RankFailed {
                        rank,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() {
            return Ok(results);
        }
        let position = errors
            .iter()
            .position(|e| !matches!(e, SmokeError::Cancelled))
            .unwrap_or(0);
        Err(errors.swap_remove(position))
    }
}

/// One rank's view of the world
#[derive(Clone)]
pub struct Rank {
    id: usize,
    size: usize,
    barrier: Arc<Barrier>,
    cancellation_token: CancellationToken,
}

impl Rank {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_root(&self) -> bool {
        self.id == 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Cancels the whole world, waking every rank blocked on a collective
    pub fn abort(&self) {
        self.cancellation_token.cancel();
    }

    /// Resolves once the world is cancelled
    pub async fn cancelled(&self) {
        self.cancellation_token.cancelled().await
    }

    /// Waits until every rank reaches the barrier, or the world is cancelled
    pub async fn barrier(&self) -> Result<(), SmokeError> {
        tokio::select! {
            _ = self.barrier.wait() => Ok(()),
            _ = self.cancellation_token.cancelled() => Err(SmokeError::Cancelled),
        }
    }
}
