//! sign_live: interactive entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sign_live::app::{run, AppConfig, SourceKind};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sign_live", about = "Recognize hand signs from landmark frames")]
struct Cli {
    /// Replay detections from an NDJSON file instead of simulating
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Read frames from a LeapMotion controller
    #[cfg(feature = "leap")]
    #[arg(long, conflicts_with = "replay")]
    leap: bool,

    /// TOML rule table; the baseline table when omitted
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// Frames a new symbol must persist before it is shown (1 = off)
    #[arg(long, default_value_t = 1)]
    hold_frames: u32,

    /// Simulation rate, and replay rate
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Log symbol changes instead of opening a window
    #[arg(long)]
    no_window: bool,

    /// Draw the overlay unmirrored
    #[arg(long)]
    no_mirror: bool,
}

impl Cli {
    fn source(&self) -> SourceKind {
        #[cfg(feature = "leap")]
        if self.leap {
            return SourceKind::Leap;
        }
        match &self.replay {
            Some(path) => SourceKind::Replay(path.clone()),
            None       => SourceKind::Sim,
        }
    }

    fn into_config(self) -> AppConfig {
        AppConfig {
            source:         self.source(),
            rules:          self.rules,
            hold_frames:    self.hold_frames,
            frame_interval: Duration::from_secs(1) / self.fps,
            window:         !self.no_window,
            mirror:         !self.no_mirror,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sign_live=info,sign_table=info".into()),
        )
        .init();

    #[cfg(feature = "leap")]
    info!("built with LeapMotion support (--leap)");
    #[cfg(not(feature = "leap"))]
    info!("keyboard simulation and replay (build with --features leap for hardware)");

    run(Cli::parse().into_config())
}
