use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::models::error::CaptureError;
use crate::traits::camera_device::MediaKind;
use crate::traits::capture_session::CaptureSession;
use crate::traits::preview_layer::PreviewLayer;

/// Who is using a shared session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumerKind {
    Recorder,
    Preview,
}

struct SharedSession {
    session: Mutex<Box<dyn CaptureSession>>,
    consumers: Mutex<HashMap<u64, ConsumerKind>>,
    next_consumer: AtomicU64,
}

/// Reference-counted handle to the capture session shared by the recorder
/// and the preview.
///
/// All graph changes go through [`SessionHandle::transaction`], which holds
/// the session lock for the whole begin/commit bracket. The lock is not
/// reentrant: opening a transaction while holding one on the same thread
/// deadlocks.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<SharedSession>,
}

impl SessionHandle {
    pub fn new(session: Box<dyn CaptureSession>) -> Self {
        Self {
            shared: Arc::new(SharedSession {
                session: Mutex::new(session),
                consumers: Mutex::new(HashMap::new()),
                next_consumer: AtomicU64::new(1),
            }),
        }
    }

    /// Open a configuration transaction, blocking until no other is open.
    pub fn transaction(&self) -> ConfigurationTransaction<'_> {
        ConfigurationTransaction::open(self.shared.session.lock())
    }

    pub fn same_session(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn has_input(&self, kind: MediaKind) -> bool {
        self.shared.session.lock().has_input(kind)
    }

    pub fn has_output(&self) -> bool {
        self.shared.session.lock().has_output()
    }

    pub fn is_running(&self) -> bool {
        self.shared.session.lock().is_running()
    }

    pub fn start_running(&self) {
        let mut session = self.shared.session.lock();
        if !session.is_running() {
            session.start_running();
            log::info!("capture session running");
        }
    }

    pub fn stop_running(&self) {
        let mut session = self.shared.session.lock();
        if session.is_running() {
            session.stop_running();
            log::info!("capture session stopped");
        }
    }

    /// Bind a new preview layer to this session.
    pub fn connect_preview(&self) -> Result<Arc<dyn PreviewLayer>, CaptureError> {
        self.shared.session.lock().connect_preview()
    }

    /// Register a consumer. The session stays alive while the lease does.
    pub fn attach(&self, kind: ConsumerKind) -> ConsumerLease {
        let id = self.shared.next_consumer.fetch_add(1, Ordering::Relaxed);
        self.shared.consumers.lock().insert(id, kind);
        log::debug!("{:?} consumer #{} attached", kind, id);
        ConsumerLease {
            shared: Arc::clone(&self.shared),
            id,
            kind,
        }
    }

    pub fn consumer_count(&self) -> usize {
        self.shared.consumers.lock().len()
    }

    pub fn consumers_of(&self, kind: ConsumerKind) -> usize {
        self.shared
            .consumers
            .lock()
            .values()
            .filter(|k| **k == kind)
            .count()
    }
}

/// A consumer's claim on a shared session; dropping it detaches.
pub struct ConsumerLease {
    shared: Arc<SharedSession>,
    id: u64,
    kind: ConsumerKind,
}

impl ConsumerLease {
    pub fn kind(&self) -> ConsumerKind {
        self.kind
    }

    /// Whether this lease belongs to `handle`'s session.
    pub fn is_for(&self, handle: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.shared, &handle.shared)
    }
}

impl Drop for ConsumerLease {
    fn drop(&mut self) {
        self.shared.consumers.lock().remove(&self.id);
        log::debug!("{:?} consumer #{} detached", self.kind, self.id);
    }
}

/// An open begin/commit bracket on the session.
///
/// Dereferences to the session for graph changes. The bracket is committed
/// exactly once, when the transaction is dropped, whichever way the caller
/// leaves the scope.
pub struct ConfigurationTransaction<'a> {
    session: MutexGuard<'a, Box<dyn CaptureSession>>,
}

impl<'a> ConfigurationTransaction<'a> {
    fn open(mut session: MutexGuard<'a, Box<dyn CaptureSession>>) -> Self {
        session.begin_configuration();
        Self { session }
    }
}

impl Deref for ConfigurationTransaction<'_> {
    type Target = dyn CaptureSession;

    fn deref(&self) -> &Self::Target {
        &**self.session
    }
}

impl DerefMut for ConfigurationTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut **self.session
    }
}

impl Drop for ConfigurationTransaction<'_> {
    fn drop(&mut self) {
        self.session.commit_configuration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSession;

    #[test]
    fn transaction_commits_once_on_drop() {
        let (session, log) = FakeSession::new();
        let handle = SessionHandle::new(Box::new(session));

        {
            let _tx = handle.transaction();
            assert_eq!(log.lock().begins, 1);
            assert_eq!(log.lock().commits, 0);
        }
        assert_eq!(log.lock().commits, 1);
    }

    #[test]
    fn transaction_commits_on_early_return() {
        fn failing_step(handle: &SessionHandle) -> Result<(), CaptureError> {
            let _tx = handle.transaction();
            let camera: Option<()> = None;
            camera.ok_or(CaptureError::NoCameraAvailable)?;
            Ok(())
        }

        let (session, log) = FakeSession::new();
        let handle = SessionHandle::new(Box::new(session));

        assert!(failing_step(&handle).is_err());
        assert_eq!(log.lock().begins, 1);
        assert_eq!(log.lock().commits, 1);
    }

    #[test]
    fn clones_share_one_session() {
        let (session, _log) = FakeSession::new();
        let handle = SessionHandle::new(Box::new(session));
        let clone = handle.clone();
        let (other, _) = FakeSession::new();
        let other = SessionHandle::new(Box::new(other));

        assert!(handle.same_session(&clone));
        assert!(!handle.same_session(&other));
    }

    #[test]
    fn leases_attach_and_detach() {
        let (session, _log) = FakeSession::new();
        let handle = SessionHandle::new(Box::new(session));

        let recorder = handle.attach(ConsumerKind::Recorder);
        let preview = handle.attach(ConsumerKind::Preview);
        assert_eq!(handle.consumer_count(), 2);
        assert_eq!(handle.consumers_of(ConsumerKind::Preview), 1);
        assert!(preview.is_for(&handle));

        drop(preview);
        assert_eq!(handle.consumer_count(), 1);
        assert_eq!(recorder.kind(), ConsumerKind::Recorder);
    }

    #[test]
    fn start_running_is_idempotent() {
        let (session, log) = FakeSession::new();
        let handle = SessionHandle::new(Box::new(session));

        handle.start_running();
        handle.start_running();
        assert!(handle.is_running());
        assert_eq!(log.lock().starts, 1);
    }
}
