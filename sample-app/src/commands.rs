use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde_json::{json, Value};

use slowmo_capture_core::{
    CaptureBackend, MethodCall, MethodResponse, MethodResult, PreviewSurfaceAdapter, RecorderConfig,
    SlowmoRecorderPlugin, SurfaceSize,
};
use slowmo_capture_virtual::{inspect, VirtualBackend, VirtualCameraProfile};

use crate::console_delegate::ConsoleDelegate;

/// Simulated hardware to record from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileArg {
    Iphone,
    NoCamera,
    NoMicrophone,
}

impl ProfileArg {
    fn profile(self) -> VirtualCameraProfile {
        match self {
            Self::Iphone => VirtualCameraProfile::iphone_like(),
            Self::NoCamera => VirtualCameraProfile::no_camera(),
            Self::NoMicrophone => VirtualCameraProfile::no_microphone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RecordOptions {
    /// Target frame rate
    #[arg(short, long, default_value_t = 240)]
    pub fps: u32,

    /// Resolution tier: 720p or 1080p (anything else records at 720p)
    #[arg(short, long, default_value = "1080p")]
    pub resolution: String,

    /// How long to record (seconds)
    #[arg(short, long, default_value_t = 1.0)]
    pub seconds: f64,

    /// Directory to write the recording to (defaults to the temp dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Record video only
    #[arg(long)]
    pub no_mic: bool,

    /// Simulated device
    #[arg(long, value_enum, default_value_t = ProfileArg::Iphone)]
    pub profile: ProfileArg,
}

fn plugin(profile: ProfileArg, config: RecorderConfig) -> Result<SlowmoRecorderPlugin, String> {
    let backend = VirtualBackend::new(profile.profile()).map_err(|e| e.to_string())?;
    SlowmoRecorderPlugin::new(Arc::new(backend) as Arc<dyn CaptureBackend>, config)
        .map_err(|e| e.to_string())
}

/// Dispatch one call and wait for its reply.
fn call(plugin: &SlowmoRecorderPlugin, method: &str, arguments: Value) -> Result<Value, String> {
    let (result, rx) = MethodResult::channel();
    plugin.handle(MethodCall::new(method, arguments), result);
    match rx.recv() {
        Ok(MethodResponse::Success { value }) => Ok(value),
        Ok(MethodResponse::Error { code, message, .. }) => Err(format!("{}: {}", code, message)),
        Ok(MethodResponse::NotImplemented) => Err(format!("{} is not implemented", method)),
        Err(_) => Err(format!("{} was dropped without a reply", method)),
    }
}

pub fn record(options: RecordOptions, json: bool) -> Result<(), String> {
    if !options.seconds.is_finite() || options.seconds < 0.0 {
        return Err(format!("invalid duration: {}", options.seconds));
    }
    let mut config = RecorderConfig {
        enable_audio: !options.no_mic,
        ..Default::default()
    };
    if let Some(dir) = options.output_dir {
        config.output_directory = dir;
    }

    let plugin = plugin(options.profile, config)?;
    plugin.recorder().set_delegate(Arc::new(ConsoleDelegate::new(json)));

    let surface = SurfaceSize::new(390.0, 844.0);
    let preview = PreviewSurfaceAdapter::attach(plugin.session_manager(), surface)
        .map_err(|e| e.to_string())?;

    call(
        &plugin,
        "startRecording",
        json!({ "fps": options.fps, "resolution": options.resolution }),
    )?;
    thread::sleep(Duration::from_secs_f64(options.seconds));
    let stopped = call(&plugin, "stopRecording", Value::Null)?;
    drop(preview);

    let path = stopped
        .as_str()
        .ok_or_else(|| format!("unexpected stop reply: {}", stopped))?;
    let info = inspect(Path::new(path)).map_err(|e| format!("could not read {}: {}", path, e))?;

    if json {
        println!(
            "{}",
            json!({
                "path": path,
                "width": info.width,
                "height": info.height,
                "fps": info.frame_duration.frames_per_second(),
                "frames": info.frames,
            })
        );
    } else {
        println!("{}", path);
        println!(
            "  {}x{} @ {:.0} fps, {} frames",
            info.width,
            info.height,
            info.frame_duration.frames_per_second(),
            info.frames
        );
    }
    Ok(())
}

pub fn formats(profile: ProfileArg, json: bool) -> Result<(), String> {
    let profile = profile.profile();
    if json {
        println!("{}", serde_json::to_string_pretty(&profile.formats).map_err(|e| e.to_string())?);
    } else if profile.formats.is_empty() {
        println!("no camera");
    } else {
        for format in &profile.formats {
            println!("{}", format);
        }
    }
    Ok(())
}

pub fn version(profile: ProfileArg, json: bool) -> Result<(), String> {
    let plugin = plugin(profile, RecorderConfig::default())?;
    let platform = call(&plugin, "getPlatformVersion", Value::Null)?;
    if json {
        println!(
            "{}",
            json!({ "version": env!("CARGO_PKG_VERSION"), "platform": platform })
        );
    } else {
        println!("slowmo-sample {}", env!("CARGO_PKG_VERSION"));
        println!("platform: {}", platform.as_str().unwrap_or_default());
    }
    Ok(())
}
