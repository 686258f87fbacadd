//! In-process capture session.

use std::sync::Arc;

use parking_lot::Mutex;

use slowmo_capture_core::models::error::CaptureError;
use slowmo_capture_core::traits::camera_device::MediaKind;
use slowmo_capture_core::traits::capture_session::{CaptureInput, CaptureSession};
use slowmo_capture_core::traits::movie_output::MovieFileOutput;
use slowmo_capture_core::traits::preview_layer::PreviewLayer;

use crate::virtual_preview::VirtualPreviewLayer;

/// Observable counters for one session, shared with the backend.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub begins: usize,
    pub commits: usize,
    /// Deepest begin/commit nesting observed.
    pub max_depth: usize,
    pub inputs: Vec<MediaKind>,
    pub outputs: usize,
    pub running: bool,
    pub previews: usize,
}

impl SessionStats {
    /// Every opened transaction was committed.
    pub fn is_balanced(&self) -> bool {
        self.begins == self.commits
    }
}

pub struct VirtualSession {
    reject_inputs: bool,
    depth: usize,
    inputs: Vec<CaptureInput>,
    outputs: Vec<Arc<dyn MovieFileOutput>>,
    running: bool,
    stats: Arc<Mutex<SessionStats>>,
}

impl VirtualSession {
    pub fn new(reject_inputs: bool) -> (Self, Arc<Mutex<SessionStats>>) {
        let stats = Arc::new(Mutex::new(SessionStats::default()));
        let session = Self {
            reject_inputs,
            depth: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            running: false,
            stats: Arc::clone(&stats),
        };
        (session, stats)
    }

    fn sync_stats(&self) {
        let mut stats = self.stats.lock();
        stats.inputs = self.inputs.iter().map(CaptureInput::kind).collect();
        stats.outputs = self.outputs.len();
        stats.running = self.running;
    }
}

impl CaptureSession for VirtualSession {
    fn begin_configuration(&mut self) {
        self.depth += 1;
        let mut stats = self.stats.lock();
        stats.begins += 1;
        stats.max_depth = stats.max_depth.max(self.depth);
    }

    fn commit_configuration(&mut self) {
        if self.depth == 0 {
            log::warn!("commit without matching begin_configuration");
            return;
        }
        self.depth -= 1;
        self.stats.lock().commits += 1;
    }

    fn add_input(&mut self, input: CaptureInput) -> Result<(), CaptureError> {
        let kind = input.kind();
        if self.reject_inputs {
            return Err(CaptureError::InputAttach(format!("session rejected {:?} input", kind)));
        }
        if self.has_input(kind) {
            return Err(CaptureError::InputAttach(format!("{:?} input already attached", kind)));
        }
        self.inputs.push(input);
        self.sync_stats();
        Ok(())
    }

    fn has_input(&self, kind: MediaKind) -> bool {
        self.inputs.iter().any(|i| i.kind() == kind)
    }

    fn add_output(&mut self, output: Arc<dyn MovieFileOutput>) -> Result<(), CaptureError> {
        if !self.outputs.is_empty() {
            return Err(CaptureError::ConfigurationFailed(
                "session already has a movie output".into(),
            ));
        }
        self.outputs.push(output);
        self.sync_stats();
        Ok(())
    }

    fn has_output(&self) -> bool {
        !self.outputs.is_empty()
    }

    fn remove_all(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
        self.sync_stats();
    }

    fn start_running(&mut self) {
        self.running = true;
        self.sync_stats();
    }

    fn stop_running(&mut self) {
        self.running = false;
        self.sync_stats();
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn connect_preview(&mut self) -> Result<Arc<dyn PreviewLayer>, CaptureError> {
        self.stats.lock().previews += 1;
        Ok(Arc::new(VirtualPreviewLayer::default()))
    }
}
