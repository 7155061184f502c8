// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Detector, Rank, Sample, ScatterPlan, SmokeConfig, SmokeError, World};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Throughput of one scatter benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterReport {
    pub detector: Detector,
    pub num_events: usize,
    pub bytes_per_element: usize,
    pub hz: f64,
    pub mb_per_sec: f64,
    pub barrier_before: bool,
    pub barrier_after: bool,
    pub with_copy: bool,
}

impl std::fmt::Display for ScatterReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scatterv: {} of {} events of {:2} byte elements. Rate={:6.1} Hz at {:6.1} MB/sec. Barriers: before={} after={} withCopy={}",
            self.detector,
            self.num_events,
            self.bytes_per_element,
            self.hz,
            self.mb_per_sec,
            self.barrier_before,
            self.barrier_after,
            self.with_copy
        )
    }
}

/// Repeatedly scatters one detector frame from the root to every other rank.
///
/// Each receiver checks that the first element of its slice matches the
/// root's frame at the slice offset.
pub async fn run_scatter<T: Sample>(
    world: &World,
    config: &SmokeConfig,
) -> Result<ScatterReport, SmokeError> {
    if world.size() < 2 {
        return Err(SmokeError::WorldTooSmall {
            size: world.size(),
            min: 2,
        });
    }

    let frame: Arc<Vec<T>> = Arc::new(config.detector.frame(config.seed));
    let plan = Arc::new(ScatterPlan::new(frame.len(), world.size())?);
    plan.validate()?;
    debug!(counts = ?plan.counts(), offsets = ?plan.offsets(), "scatter plan");

    let mut senders = Vec::with_capacity(plan.receivers());
    let mut receivers = Vec::with_capacity(plan.receivers());
    for _ in 0..plan.receivers() {
        let (tx, rx) = mpsc::channel::<Vec<T>>(1);
        senders.push(tx);
        receivers.push(rx);
    }
    let mut senders = Some(senders);
    let mut receivers = receivers.into_iter();

    let start = Instant::now();
    world
        .run(|rank| {
            let frame = frame.clone();
            let plan = plan.clone();
            let config = config.clone();
            let senders = if rank.is_root() { senders.take() } else { None };
            let receiver = if rank.is_root() { None } else { receivers.next() };
            async move {
                match (senders, receiver) {
                    (Some(senders), _) => scatter_root(rank, &frame, &plan, &config, senders).await,
                    (None, Some(receiver)) => {
                        scatter_receiver(rank, &frame, &plan, &config, receiver).await
                    }
                    (None, None) => Err(SmokeError::RankFailed {
                        rank: rank.id(),
                        reason: "no channel assigned".to_string(),
                    }),
                }
            }
        })
        .await?;
    let elapsed = start.elapsed().as_secs_f64().max(f64::EPSILON);

    let bytes_per_element = T::ELEMENT_TYPE.bytes_per_element();
    let megabytes =
        (bytes_per_element * frame.len() * config.num_events) as f64 / (1u64 << 20) as f64;

    let report = ScatterReport {
        detector: config.detector,
        num_events: config.num_events,
        bytes_per_element,
        hz: config.num_events as f64 / elapsed,
        mb_per_sec: megabytes / elapsed,
        barrier_before: config.barrier_before,
        barrier_after: config.barrier_after,
        with_copy: config.with_copy,
    };
    info!(hz = report.hz, mb_per_sec = report.mb_per_sec, "scatter finished");
    Ok(report)
}

async fn scatter_root<T: Sample>(
    rank: Rank,
    frame: &[T],
    plan: &ScatterPlan,
    config: &SmokeConfig,
    senders: Vec<mpsc::Sender<Vec<T>>>,
) -> Result<(), SmokeError> {
    let mut send_buffer: Vec<T> = Vec::with_capacity(if config.with_copy { frame.len() } else { 0 });

    for _event in 0..config.num_events {
        if rank.is_cancelled() {
            return Err(SmokeError::Cancelled);
        }
        if config.barrier_before {
            rank.barrier().await?;
        }

        let source: &[T] = if config.with_copy {
            send_buffer.clear();
            send_buffer.extend_from_slice(frame);
            &send_buffer
        } else {
            frame
        };

        for (index, tx) in senders.iter().enumerate() {
            let receiver = index + 1;
            if tx.send(plan.slice(source, receiver).to_vec()).await.is_err() {
                if rank.is_cancelled() {
                    return Err(SmokeError::Cancelled);
                }
                return Err(SmokeError::RankFailed {
                    rank: receiver,
                    reason: "receiver hung up".to_string(),
                });
            }
        }

        if config.barrier_after {
            rank.barrier().await?;
        }
    }
    Ok(())
}

async fn scatter_receiver<T: Sample>(
    rank: Rank,
    frame: &[T],
    plan: &ScatterPlan,
    config: &SmokeConfig,
    mut receiver: mpsc::Receiver<Vec<T>>,
) -> Result<(), SmokeError> {
    let id = rank.id();
    let offset = plan.offset(id);
    let expected = plan.slice(frame, id);

    for event in 0..config.num_events {
        if config.barrier_before {
            rank.barrier().await?;
        }

        let received = tokio::select! {
            received = receiver.recv() => received,
            _ = rank.cancelled() => return Err(SmokeError::Cancelled),
        };
        let Some(received) = received else {
            if rank.is_cancelled() {
                return Err(SmokeError::Cancelled);
            }
            rank.abort();
            return Err(SmokeError::RankFailed {
                rank: id,
                reason: "root hung up".to_string(),
            });
        };

        if let Err(e) = check_slice(id, event, offset, expected, &received) {
            rank.abort();
            return Err(e);
        }

        if config.barrier_after {
            rank.barrier().await?;
        }
    }
    Ok(())
}

/// Compares a received slice with the root's slice for `rank`.
///
/// Only the length and the first element are compared.
pub fn check_slice<T: Sample>(
    rank: usize,
    event: usize,
    offset: usize,
    expected: &[T],
    received: &[T],
) -> Result<(), SmokeError> {
    if received.len() == expected.len() && received.first() == expected.first() {
        return Ok(());
    }
    Err(SmokeError::ScatterMismatch {
        rank,
        event,
        offset,
        expected: format!("{} elements starting {:?}", expected.len(), expected.first()),
        received: format!("{} elements starting {:?}", received.len(), received.first()),
    })
}
