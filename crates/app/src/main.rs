use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voiceover_core::{
    script, ClipHandle, EngineConfig, InputScript, Snapshot, Timeline, VideoPlayback,
    VoiceCapture,
};

fn main() -> voiceover_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            config,
            no_capture,
        } => run_replay(&script, config.as_deref(), !no_capture),
        Commands::Config { output } => run_config(output.as_deref()),
    }
}

fn run_replay(
    path: &Path,
    config: Option<&Path>,
    capture_supported: bool,
) -> voiceover_core::Result<()> {
    tracing::info!(?path, "replaying input script");

    let mut input = InputScript::load(path)?;
    if let Some(config) = config {
        input.config = EngineConfig::load(config)?;
    }

    let capture = ConsoleCapture {
        supported: capture_supported,
    };
    let mut timeline = Timeline::new(input.config.clone(), ConsoleVideo, capture)?;
    timeline.subscribe_commits(|region| tracing::info!(?region, "commit"));
    timeline.subscribe_errors(|err| tracing::warn!(%err, "error"));

    let report = script::replay(&mut timeline, &input.events);
    tracing::info!(
        applied = report.applied,
        rejected = report.rejected.len(),
        "replay finished"
    );

    let snapshot = Snapshot::of(&timeline);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_config(output: Option<&Path>) -> voiceover_core::Result<()> {
    let json = EngineConfig::default().to_json_pretty()?;
    match output {
        Some(path) => {
            tracing::info!(?path, "writing default configuration");
            std::fs::write(path, json)?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Stand-in video element that only logs the commands it receives.
struct ConsoleVideo;

impl VideoPlayback for ConsoleVideo {
    fn seek_to(&mut self, fraction: f64) {
        tracing::info!(fraction, "video seek");
    }

    fn set_playing(&mut self, playing: bool) {
        tracing::info!(playing, "video playback");
    }
}

/// Stand-in capture device. Device confirmations come from the script.
struct ConsoleCapture {
    supported: bool,
}

impl VoiceCapture for ConsoleCapture {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start_recording(&mut self) {
        tracing::info!("capture start requested");
    }

    fn stop_recording(&mut self) {
        tracing::info!("capture stop requested");
    }

    fn play_clip(&mut self, clip: &ClipHandle) {
        tracing::info!(clip = clip.id, "voice playback");
    }

    fn stop_clip(&mut self) {
        tracing::info!("voice playback stopped");
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Voice-over timeline engine driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON input script and print the resulting timeline state.
    Replay {
        /// Path to the script file.
        script: PathBuf,
        /// Configuration file overriding the one embedded in the script.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Behave as if the host had no audio capture API.
        #[arg(long)]
        no_capture: bool,
    },
    /// Print or write the default engine configuration.
    Config {
        /// Where to write the configuration instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
