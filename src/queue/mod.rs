//! In-process queue transport for deferred cleanup
//!
//! [`TokioQueue`] is the reference [`CleanupQueue`]: one consumer task per
//! queue name over an unbounded mpsc channel, spawned lazily on first
//! submit. Submission is fire-and-forget; a failed job is reported through
//! the worker's error log, which is this transport's failure-reporting
//! surface. Retry and dead-lettering belong to a real queue system.

use crate::core::error::CleanError;
use crate::core::job::{CleanupJob, JobExecutor};
use crate::core::service::CleanupQueue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Tokio-task-backed cleanup queue
pub struct TokioQueue {
    executor: Arc<JobExecutor>,
    senders: Mutex<HashMap<String, mpsc::UnboundedSender<CleanupJob>>>,
}

impl TokioQueue {
    pub fn new(executor: Arc<JobExecutor>) -> Self {
        Self {
            executor,
            senders: Mutex::new(HashMap::new()),
        }
    }

    fn spawn_worker(&self, queue_name: &str) -> mpsc::UnboundedSender<CleanupJob> {
        let (tx, mut rx) = mpsc::unbounded_channel::<CleanupJob>();
        let executor = Arc::clone(&self.executor);
        let queue = queue_name.to_string();

        tokio::spawn(async move {
            tracing::debug!(queue = %queue, "cleanup queue worker started");

            while let Some(job) = rx.recv().await {
                if let Err(err) = executor.execute(&job).await {
                    tracing::error!(
                        queue = %queue,
                        relation = %job.relation,
                        owner = %job.owner.id,
                        error = %err,
                        "queued cleanup failed"
                    );
                }
            }

            tracing::debug!(queue = %queue, "cleanup queue worker stopped");
        });

        tx
    }
}

#[async_trait]
impl CleanupQueue for TokioQueue {
    async fn submit(&self, job: CleanupJob, queue_name: &str) -> Result<(), CleanError> {
        let sender = {
            let mut senders = self.senders.lock().map_err(|e| CleanError::Queue {
                queue: queue_name.to_string(),
                relation: job.relation.clone(),
                message: format!("failed to acquire queue lock: {e}"),
            })?;

            match senders.get(queue_name) {
                Some(sender) if !sender.is_closed() => sender.clone(),
                _ => {
                    let sender = self.spawn_worker(queue_name);
                    senders.insert(queue_name.to_string(), sender.clone());
                    sender
                }
            }
        };

        sender.send(job).map_err(|e| CleanError::Queue {
            queue: queue_name.to_string(),
            relation: e.0.relation,
            message: "queue worker stopped".to_string(),
        })
    }
}
