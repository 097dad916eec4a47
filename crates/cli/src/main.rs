use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;

use facewatch_core::detection::domain::face_detector::FaceDetector;
use facewatch_core::detection::infrastructure::scripted_detector::ScriptedDetector;
use facewatch_core::geolocation::domain::geolocator::{Geolocator, NullGeolocator};
use facewatch_core::geolocation::infrastructure::ip_api_geolocator::IpApiGeolocator;
use facewatch_core::pipeline::alert_state::{AlertEvent, AlertState};
use facewatch_core::pipeline::renderer::{FrameSink, Renderer};
use facewatch_core::session::export::export_session;
use facewatch_core::session::recorder::SessionRecorder;
use facewatch_core::session::summary_store::SummaryStore;
use facewatch_core::shared::clock::SystemClock;
use facewatch_core::shared::constants::RENDER_INTERVAL_MS;
use facewatch_core::shared::frame::Frame;
use facewatch_core::video::infrastructure::image_sequence_camera::ImageSequenceCamera;

/// Session recorder for live face recognition feeds.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Directory of frames to feed as the camera input.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// JSON detection script matching the frame sequence.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Label of the identity that triggers target-acquired alerts.
    #[arg(long, default_value = "Mara")]
    known_label: String,

    /// Root directory for session logs and snapshots.
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// Recording duration in seconds.
    #[arg(long, default_value = "10")]
    duration: u64,

    /// Loop the frame sequence instead of stopping at the end.
    #[arg(long)]
    loop_frames: bool,

    /// Skip geolocation lookups.
    #[arg(long)]
    offline: bool,

    /// Write the finished session to this zip archive.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Display poll interval in milliseconds.
    #[arg(long, default_value_t = RENDER_INTERVAL_MS)]
    render_interval_ms: u64,

    /// Print the most recent session summary and exit.
    #[arg(long)]
    last_summary: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Terminal display: logs frame cadence and alert banners. There is no
/// persistent overlay on a terminal, so alerts are acknowledged as soon
/// as they are printed.
struct ConsoleSink {
    alert_state: Arc<Mutex<AlertState>>,
    frames_shown: u64,
}

impl FrameSink for ConsoleSink {
    fn display(&mut self, frame: &Frame) {
        self.frames_shown += 1;
        log::debug!(
            "frame {} ({}x{})",
            frame.index(),
            frame.width(),
            frame.height()
        );
    }

    fn target_acquired(&mut self, event: &AlertEvent) {
        println!("TARGET ACQUIRED: {} at {}", event.label, event.at);
        self.alert_state
            .lock()
            .expect("alert state lock poisoned")
            .acknowledge();
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let storage_root = storage_root(&cli)?;
    let logs_dir = storage_root.join("session_logs");
    let snapshots_dir = storage_root.join("session_snapshots");

    if cli.last_summary {
        return print_last_summary(&logs_dir);
    }

    validate(&cli)?;
    let frames = cli.frames.as_ref().unwrap();

    let camera = ImageSequenceCamera::open(frames, cli.loop_frames)?;
    let detector: Box<dyn FaceDetector> = match &cli.detections {
        Some(path) => Box::new(ScriptedDetector::from_file(path)?),
        None => Box::new(ScriptedDetector::new(Default::default())),
    };
    let geolocator: Box<dyn Geolocator> = if cli.offline {
        Box::new(NullGeolocator)
    } else {
        Box::new(IpApiGeolocator::new())
    };

    let mut recorder = SessionRecorder::new(
        &logs_dir,
        &snapshots_dir,
        cli.known_label.clone(),
        Arc::new(SystemClock),
    );
    let handles = recorder.start(Box::new(camera), detector, geolocator)?;

    let render_stop = Arc::new(AtomicBool::new(false));
    let renderer = Renderer::new(
        handles.frame_buffer,
        handles.alerts,
        ConsoleSink {
            alert_state: handles.alert_state,
            frames_shown: 0,
        },
    );
    let render_handle = {
        let stop = render_stop.clone();
        let interval = Duration::from_millis(cli.render_interval_ms);
        std::thread::spawn(move || renderer.run(&stop, interval))
    };

    log::info!("recording for {}s", cli.duration);
    std::thread::sleep(Duration::from_secs(cli.duration));

    let summary = recorder.stop()?;
    render_stop.store(true, Ordering::Relaxed);
    let sink = render_handle
        .join()
        .map_err(|_| "renderer thread panicked")?;
    log::info!("displayed {} frames", sink.frames_shown);

    println!("{}", summary.render());

    if let Some(dest) = &cli.export {
        export_session(&summary.path, &snapshots_dir, dest)?;
        println!("Exported to {}", dest.display());
    }

    Ok(())
}

fn print_last_summary(logs_dir: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = SummaryStore::new(logs_dir);
    match store.latest() {
        Some(path) => {
            println!("{}", store.read(&path)?);
            Ok(())
        }
        None => Err("no recorded sessions found".into()),
    }
}

fn storage_root(cli: &Cli) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(root) = &cli.storage_root {
        return Ok(root.clone());
    }
    let data = dirs::data_dir().ok_or("could not determine a data directory")?;
    Ok(data.join("facewatch"))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let frames = cli
        .frames
        .as_ref()
        .ok_or("--frames is required unless --last-summary is used")?;
    if !frames.is_dir() {
        return Err(format!("frames directory not found: {}", frames.display()).into());
    }
    if cli.duration == 0 {
        return Err("--duration must be at least 1 second".into());
    }
    Ok(())
}
