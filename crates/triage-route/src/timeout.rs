//! Inference deadline
//!
//! Runs each `transform` call on a worker thread and stops waiting once the
//! deadline passes. The worker is detached on timeout; the batch fails.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::model::{ModelError, TopicModel, Transform};

pub struct TimeoutModel {
    inner: Arc<dyn TopicModel>,
    timeout: Duration,
}

impl TimeoutModel {
    pub fn new(inner: Arc<dyn TopicModel>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `model` when a timeout is set; `None` waits forever.
    pub fn wrap(model: Arc<dyn TopicModel>, timeout: Option<Duration>) -> Arc<dyn TopicModel> {
        match timeout {
            Some(timeout) => Arc::new(Self::new(model, timeout)),
            None => model,
        }
    }
}

impl TopicModel for TimeoutModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn topic_count(&self) -> Option<usize> {
        self.inner.topic_count()
    }

    fn transform(&self, documents: &[String]) -> Result<Transform, ModelError> {
        let (tx, rx) = mpsc::channel();
        let model = Arc::clone(&self.inner);
        let documents = documents.to_vec();
        thread::Builder::new()
            .name(format!("infer-{}", self.inner.name()))
            .spawn(move || {
                let _ = tx.send(model.transform(&documents));
            })
            .map_err(|e| ModelError::Worker {
                model: self.inner.name().to_string(),
                reason: format!("failed to spawn: {e}"),
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    model = self.inner.name(),
                    secs = self.timeout.as_secs(),
                    "inference timed out"
                );
                Err(ModelError::Timeout {
                    model: self.inner.name().to_string(),
                    after: self.timeout,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(ModelError::Worker {
                model: self.inner.name().to_string(),
                reason: "worker exited without a result".to_string(),
            }),
        }
    }
}
