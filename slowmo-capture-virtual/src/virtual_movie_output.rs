//! Movie-file output that writes a small frame container on a writer thread.
//!
//! Container layout (little-endian):
//! - header: magic `SLMO`, version `u16`, width `u32`, height `u32`,
//!   frame duration value `i64`, frame duration timescale `i32`
//! - one record per frame: index `u64`, presentation time in duration units
//!   `i64`, 16 bytes of payload
//!
//! Frames are emitted at the camera's pinned rate. Completion is reported to
//! the delegate from the writer thread once the file is flushed and closed.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use slowmo_capture_core::models::error::CaptureError;
use slowmo_capture_core::models::format::FrameDuration;
use slowmo_capture_core::traits::movie_output::{MovieFileOutput, RecordingDelegate};

use crate::virtual_camera::VirtualCamera;

const MAGIC: &[u8; 4] = b"SLMO";
const VERSION: u16 = 1;
const HEADER_LEN: u64 = 4 + 2 + 4 + 4 + 8 + 4;
const FRAME_PAYLOAD_LEN: usize = 16;
const FRAME_RECORD_LEN: u64 = 8 + 8 + FRAME_PAYLOAD_LEN as u64;
/// Rate used when the camera was never pinned.
const DEFAULT_FPS: u32 = 30;

/// What a finished container holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerInfo {
    pub width: u32,
    pub height: u32,
    pub frame_duration: FrameDuration,
    pub frames: u64,
}

impl ContainerInfo {
    fn write_header(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&VERSION.to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.frame_duration.value.to_le_bytes())?;
        w.write_all(&self.frame_duration.timescale.to_le_bytes())
    }
}

/// Read back the header and frame count of a container file.
pub fn inspect(path: &Path) -> io::Result<ContainerInfo> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut header = [0u8; HEADER_LEN as usize];
    file.read_exact(&mut header)?;

    if &header[0..4] != MAGIC {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "not a virtual movie file"));
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported container version {}", version),
        ));
    }
    let body = len - HEADER_LEN;
    if body % FRAME_RECORD_LEN != 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "truncated frame record"));
    }

    let u32_at = |at: usize| {
        u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
    };
    let mut value = [0u8; 8];
    value.copy_from_slice(&header[14..22]);
    let mut timescale = [0u8; 4];
    timescale.copy_from_slice(&header[22..26]);

    Ok(ContainerInfo {
        width: u32_at(6),
        height: u32_at(10),
        frame_duration: FrameDuration {
            value: i64::from_le_bytes(value),
            timescale: i32::from_le_bytes(timescale),
        },
        frames: body / FRAME_RECORD_LEN,
    })
}

/// Writes container files for a session's recordings.
pub struct VirtualMovieOutput {
    camera: Option<Arc<VirtualCamera>>,
    fail_with: Option<String>,
    /// True from an accepted start until the file is closed.
    recording: Arc<AtomicBool>,
    /// Stop signal of the active writer.
    running: Mutex<Option<Arc<AtomicBool>>>,
    writer: Mutex<Option<thread::JoinHandle<()>>>,
}

impl VirtualMovieOutput {
    pub fn new(camera: Option<Arc<VirtualCamera>>, fail_with: Option<String>) -> Self {
        Self {
            camera,
            fail_with,
            recording: Arc::new(AtomicBool::new(false)),
            running: Mutex::new(None),
            writer: Mutex::new(None),
        }
    }

    fn container_header(&self) -> ContainerInfo {
        let camera = self.camera.as_deref();
        let (width, height) = camera
            .and_then(VirtualCamera::active_format)
            .map(|f| (f.width.max(0) as u32, f.height.max(0) as u32))
            .unwrap_or((0, 0));
        let frame_duration = camera
            .and_then(VirtualCamera::frame_durations)
            .map(|(min, _)| min)
            .unwrap_or(FrameDuration {
                value: 1,
                timescale: DEFAULT_FPS as i32,
            });
        ContainerInfo {
            width,
            height,
            frame_duration,
            frames: 0,
        }
    }
}

impl MovieFileOutput for VirtualMovieOutput {
    fn start_recording(
        &self,
        path: &Path,
        delegate: Arc<dyn RecordingDelegate>,
    ) -> Result<(), CaptureError> {
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::RecordingFailed("output is already recording".into()));
        }

        let file = match File::create(path) {
            Ok(file) => file,
            Err(e) => {
                self.recording.store(false, Ordering::SeqCst);
                return Err(CaptureError::StorageError(format!(
                    "could not create {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let header = self.container_header();
        let running = Arc::new(AtomicBool::new(true));
        let job = WriterJob {
            path: path.to_path_buf(),
            header,
            running: Arc::clone(&running),
            recording: Arc::clone(&self.recording),
            fail_with: self.fail_with.clone(),
            delegate,
        };

        let handle = thread::Builder::new()
            .name("virtual-movie-writer".into())
            .spawn(move || job.run(file))
            .map_err(|e| {
                self.recording.store(false, Ordering::SeqCst);
                CaptureError::RecordingFailed(format!("failed to spawn writer thread: {}", e))
            })?;

        *self.running.lock() = Some(running);
        // The previous writer has already closed its file; let it finish on its own.
        *self.writer.lock() = Some(handle);
        Ok(())
    }

    fn stop_recording(&self) {
        match self.running.lock().take() {
            Some(running) => running.store(false, Ordering::SeqCst),
            None => log::debug!("stop requested with no active writer"),
        }
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }
}

impl Drop for VirtualMovieOutput {
    fn drop(&mut self) {
        if let Some(running) = self.running.lock().take() {
            running.store(false, Ordering::SeqCst);
        }
        if let Some(handle) = self.writer.lock().take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

struct WriterJob {
    path: PathBuf,
    header: ContainerInfo,
    running: Arc<AtomicBool>,
    recording: Arc<AtomicBool>,
    fail_with: Option<String>,
    delegate: Arc<dyn RecordingDelegate>,
}

impl WriterJob {
    fn run(self, file: File) {
        self.delegate.did_start_recording(&self.path);

        let written = write_frames(file, &self.header, &self.running);
        self.recording.store(false, Ordering::SeqCst);

        let error = match (written, self.fail_with) {
            (Err(e), _) => {
                log::error!("virtual movie write failed: {}", e);
                Some(e.to_string())
            }
            (Ok(_), Some(message)) => Some(message),
            (Ok(frames), None) => {
                log::info!("wrote {} frames to {}", frames, self.path.display());
                None
            }
        };
        self.delegate.did_finish_recording(&self.path, error);
    }
}

fn write_frames(file: File, header: &ContainerInfo, running: &AtomicBool) -> io::Result<u64> {
    let mut w = BufWriter::new(file);
    header.write_header(&mut w)?;

    let interval = Duration::from_secs_f64(header.frame_duration.as_secs_f64());
    let started = Instant::now();
    let mut frames: u64 = 0;
    while running.load(Ordering::SeqCst) {
        w.write_all(&frames.to_le_bytes())?;
        let pts = frames as i64 * header.frame_duration.value;
        w.write_all(&pts.to_le_bytes())?;
        w.write_all(&[(frames % 256) as u8; FRAME_PAYLOAD_LEN])?;
        frames += 1;

        let due = started + interval.mul_f64(frames as f64);
        if let Some(wait) = due.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    w.flush()?;
    let file = w.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(frames)
}
