use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::Sender;

use crate::models::error::CaptureError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Serial execution context for hardware configuration.
///
/// Jobs run one at a time, in submission order, on a dedicated thread.
/// Callers on other threads block until their job has run; a job submitted
/// from the queue thread itself runs inline.
pub struct SessionQueue {
    sender: Option<Sender<Job>>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl SessionQueue {
    pub fn new(label: &str) -> Result<Self, CaptureError> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();

        let handle = thread::Builder::new()
            .name(label.into())
            .spawn(move || {
                for job in receiver.iter() {
                    // A panicking job drops its reply sender; the queue keeps serving.
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        log::error!("session queue job panicked");
                    }
                }
            })
            .map_err(|e| {
                CaptureError::ConfigurationFailed(format!("failed to spawn session queue: {}", e))
            })?;

        Ok(Self {
            sender: Some(sender),
            thread_id: handle.thread().id(),
            handle: Some(handle),
        })
    }

    /// Whether the calling thread is the queue's thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Run `job` on the queue and wait for its result.
    pub fn run_sync<F, R>(&self, job: F) -> Result<R, CaptureError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_current() {
            return Ok(job());
        }

        let sender = self.sender.as_ref().ok_or_else(queue_stopped)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        sender
            .send(Box::new(move || {
                let _ = reply_tx.send(job());
            }))
            .map_err(|_| queue_stopped())?;

        // A job that panics drops its reply sender without sending.
        reply_rx
            .recv()
            .map_err(|_| CaptureError::ConfigurationFailed("configuration job panicked".into()))
    }
}

impl Drop for SessionQueue {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

fn queue_stopped() -> CaptureError {
    CaptureError::ConfigurationFailed("session queue is not running".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_on_queue_thread() {
        let queue = SessionQueue::new("test-session-queue").unwrap();
        let name = queue
            .run_sync(|| thread::current().name().map(str::to_owned))
            .unwrap();
        assert_eq!(name.as_deref(), Some("test-session-queue"));
        assert!(!queue.is_current());
    }

    #[test]
    fn jobs_run_in_order() {
        let queue = SessionQueue::new("ordered-queue").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for expected in 0..5 {
            let counter = Arc::clone(&counter);
            let seen = queue
                .run_sync(move || counter.fetch_add(1, Ordering::SeqCst))
                .unwrap();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn panicking_job_reports_error() {
        let queue = SessionQueue::new("panicking-queue").unwrap();
        let result: Result<(), _> = queue.run_sync(|| panic!("device exploded"));
        assert!(matches!(result, Err(CaptureError::ConfigurationFailed(_))));
    }

    #[test]
    fn queue_keeps_serving_after_a_panic() {
        let queue = SessionQueue::new("recovering-queue").unwrap();
        let _ = queue.run_sync(|| panic!("device exploded"));

        assert_eq!(queue.run_sync(|| 42).ok(), Some(42));
        assert_eq!(queue.run_sync(|| 7).ok(), Some(7));
    }
}
