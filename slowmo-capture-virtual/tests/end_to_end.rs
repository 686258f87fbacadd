//! Method-call scenarios against the virtual backend.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use slowmo_capture_core::{
    CaptureBackend, ConsumerKind, DeviceOrientation, FrameDuration, MediaKind, MethodCall,
    MethodResponse, MethodResult, PreviewSurfaceAdapter, RecorderConfig, SlowmoRecorderPlugin,
    SurfaceSize, VideoOrientation,
};
use slowmo_capture_virtual::{inspect, VirtualBackend, VirtualCameraProfile};

struct Harness {
    backend: Arc<VirtualBackend>,
    plugin: SlowmoRecorderPlugin,
    dir: tempfile::TempDir,
}

impl Harness {
    fn new(profile: VirtualCameraProfile) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(VirtualBackend::new(profile).unwrap());
        let config = RecorderConfig {
            output_directory: dir.path().to_path_buf(),
            ..Default::default()
        };
        let plugin =
            SlowmoRecorderPlugin::new(Arc::clone(&backend) as Arc<dyn CaptureBackend>, config)
                .unwrap();
        Self { backend, plugin, dir }
    }

    fn call(&self, method: &str, arguments: Value) -> MethodResponse {
        let (result, rx) = MethodResult::channel();
        self.plugin.handle(MethodCall::new(method, arguments), result);
        rx.recv_timeout(Duration::from_secs(10)).unwrap()
    }

    fn start(&self, fps: u32, resolution: &str) -> MethodResponse {
        self.call("startRecording", json!({ "fps": fps, "resolution": resolution }))
    }

    fn stop(&self) -> MethodResponse {
        self.call("stopRecording", Value::Null)
    }
}

fn path_of(response: &MethodResponse) -> &str {
    match response {
        MethodResponse::Success { value } => value.as_str().unwrap(),
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn records_1080p_at_240_fps() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());

    assert_eq!(h.start(240, "1080p"), MethodResponse::success(true));
    thread::sleep(Duration::from_millis(50));
    let stopped = h.stop();

    let path = Path::new(path_of(&stopped));
    assert!(path.is_absolute());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mov"));
    assert!(path.starts_with(h.dir.path().canonicalize().unwrap()));

    let info = inspect(path).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
    assert_eq!(info.frame_duration, FrameDuration::per_frame(240).unwrap());

    let camera = h.backend.camera().unwrap();
    assert_eq!(camera.active_format().map(|f| f.handle.0), Some(7));
    assert!(!camera.is_locked());
    assert!(h.plugin.recorder().state().is_idle());
}

#[test]
fn unreachable_rate_is_format_not_found() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());

    let response = h.start(1000, "1080p");
    assert_eq!(response.error_code(), Some("FORMAT_NOT_FOUND"));
    assert!(h.plugin.recorder().state().is_idle());
    assert!(h.backend.camera().unwrap().active_format().is_none());
}

#[test]
fn stop_without_start_is_not_recording() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());
    assert_eq!(h.stop().error_code(), Some("NOT_RECORDING"));
}

#[test]
fn missing_microphone_records_video_only() {
    let h = Harness::new(VirtualCameraProfile::no_microphone());

    assert!(h.start(120, "1080p").is_success());
    let stats = h.backend.session_stats(0).unwrap();
    assert_eq!(stats.inputs, vec![MediaKind::Video]);

    assert!(h.stop().is_success());
}

#[test]
fn unknown_resolution_uses_720p() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());

    assert!(h.start(240, "4k").is_success());
    let format = h.backend.camera().unwrap().active_format().unwrap();
    assert_eq!((format.width, format.height), (1280, 720));
    assert!(h.stop().is_success());
}

#[test]
fn missing_camera_is_no_camera() {
    let h = Harness::new(VirtualCameraProfile::no_camera());
    assert_eq!(h.start(240, "720p").error_code(), Some("NO_CAMERA"));
}

#[test]
fn refused_lock_is_config_error_and_commits_once() {
    let h = Harness::new(VirtualCameraProfile {
        refuse_lock: true,
        ..Default::default()
    });

    assert_eq!(h.start(240, "1080p").error_code(), Some("CONFIG_ERROR"));
    assert!(h.plugin.recorder().state().is_idle());

    let stats = h.backend.session_stats(0).unwrap();
    assert!(stats.is_balanced());
    assert!(!stats.running);
}

#[test]
fn rejected_inputs_are_input_error() {
    let h = Harness::new(VirtualCameraProfile {
        reject_inputs: true,
        ..Default::default()
    });
    assert_eq!(h.start(240, "1080p").error_code(), Some("INPUT_ERROR"));
}

#[test]
fn second_start_is_already_recording() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());

    assert!(h.start(240, "720p").is_success());
    assert_eq!(h.start(240, "720p").error_code(), Some("ALREADY_RECORDING"));
    assert!(h.stop().is_success());
}

#[test]
fn output_failure_is_rec_error_then_recovers() {
    let h = Harness::new(VirtualCameraProfile {
        fail_output: Some("media services were reset".into()),
        ..Default::default()
    });

    assert!(h.start(60, "1080p").is_success());
    let response = h.stop();
    assert_eq!(response.error_code(), Some("REC_ERROR"));
    assert!(h.plugin.recorder().state().is_idle());

    // The failure ends the recording; the next start is accepted.
    assert!(h.start(60, "1080p").is_success());
}

#[test]
fn consecutive_recordings_reuse_the_session() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());

    assert!(h.start(240, "1080p").is_success());
    let first = path_of(&h.stop()).to_owned();
    assert!(h.start(120, "1080p").is_success());
    let second = path_of(&h.stop()).to_owned();

    assert_ne!(first, second);
    assert_eq!(h.backend.session_count(), 1);
    let stats = h.backend.session_stats(0).unwrap();
    assert_eq!(stats.inputs, vec![MediaKind::Video, MediaKind::Audio]);
    assert_eq!(stats.outputs, 1);
    assert!(stats.is_balanced());
}

#[test]
fn preview_shares_the_recorder_session() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());
    let manager = h.plugin.session_manager();

    let preview = PreviewSurfaceAdapter::attach(manager, SurfaceSize::new(390.0, 844.0)).unwrap();
    assert!(h.start(240, "1080p").is_success());

    let session = manager.session().unwrap();
    assert!(preview.session().same_session(&session));
    assert_eq!(session.consumers_of(ConsumerKind::Preview), 1);
    assert_eq!(session.consumers_of(ConsumerKind::Recorder), 1);
    assert_eq!(h.backend.session_count(), 1);

    assert_eq!(
        preview.handle_orientation_change(DeviceOrientation::LandscapeRight),
        Some(VideoOrientation::LandscapeLeft)
    );
    assert_eq!(preview.layer().video_orientation().map(|o| o.rotation_angle()), Some(180.0));

    assert!(h.stop().is_success());
    drop(preview);
    assert_eq!(session.consumers_of(ConsumerKind::Preview), 0);
    assert!(session.is_running());
}

#[test]
fn platform_version_and_unknown_methods() {
    let h = Harness::new(VirtualCameraProfile::iphone_like());
    assert_eq!(
        h.call("getPlatformVersion", Value::Null),
        MethodResponse::success("VirtualOS 17.0")
    );
    assert_eq!(h.call("setTorch", json!({ "on": true })), MethodResponse::NotImplemented);
}

#[test]
fn concurrent_preview_and_start_share_one_session() {
    for _ in 0..25 {
        let h = Harness::new(VirtualCameraProfile::iphone_like());
        let barrier = Barrier::new(2);

        thread::scope(|s| {
            s.spawn(|| {
                barrier.wait();
                let surface = SurfaceSize::new(1.0, 1.0);
                PreviewSurfaceAdapter::attach(h.plugin.session_manager(), surface).unwrap()
            });
            s.spawn(|| {
                barrier.wait();
                assert!(h.start(240, "1080p").is_success());
            });
        });
        assert!(h.stop().is_success());

        assert_eq!(h.backend.session_count(), 1);
        let stats = h.backend.session_stats(0).unwrap();
        assert_eq!(stats.max_depth, 1);
        assert!(stats.is_balanced());
        assert_eq!(stats.inputs, vec![MediaKind::Video, MediaKind::Audio]);
    }
}
