//! Top-level application state and run loop.
//!
//! `AppState` owns the rule table, the display debouncer and the most recent
//! classified frame. `run` wires a frame source to the classifier thread and
//! drives either the viewer window or the headless logger.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use hand_frame::Detection;
use sign_table::{Classified, GestureClassifier, GestureRuleTable, Outcome, Symbol, SymbolDebouncer};
use tracing::info;

use crate::source::{
    spawn_frame_source, spawn_stdin_keys, ReplayFrameSource, SimFrameSource, SimKey,
};
use crate::viewer::Viewer;
use crate::worker::spawn_classifier;

pub const CAPTION_IDLE:       &str = "Show your hand to the camera";
pub const CAPTION_RECOGNIZED: &str = "Letter recognized!";

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Sim,
    Replay(PathBuf),
    #[cfg(feature = "leap")]
    Leap,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source:      SourceKind,
    /// TOML rule table; the baseline table when `None`.
    pub rules:       Option<PathBuf>,
    /// Consecutive frames before the displayed symbol changes; `<= 1` is off.
    pub hold_frames: u32,
    /// Sim tick, and the pause between replayed frames.
    pub frame_interval: Duration,
    pub window:      bool,
    pub mirror:      bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:         SourceKind::Sim,
            rules:          None,
            hold_frames:    1,
            frame_interval: Duration::from_millis(33),
            window:         true,
            mirror:         true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameStats
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames:       u64,
    pub recognized:   u64,
    pub unrecognized: u64,
    pub no_hand:      u64,
    pub invalid:      u64,
}

impl FrameStats {
    fn record(&mut self, outcome: &Outcome) {
        self.frames += 1;
        match outcome {
            Outcome::Recognized      => self.recognized += 1,
            Outcome::Unrecognized    => self.unrecognized += 1,
            Outcome::NoHand          => self.no_hand += 1,
            Outcome::InvalidFrame(_) => self.invalid += 1,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    table:     Arc<GestureRuleTable>,
    debouncer: SymbolDebouncer,
    latest:    Option<Classified>,
    stats:     FrameStats,
    /// Set once the frame source has hung up.
    pub source_done: bool,
}

impl AppState {
    pub fn new(table: Arc<GestureRuleTable>, hold_frames: u32) -> Self {
        let debouncer = SymbolDebouncer::new(hold_frames, table.sentinel().clone());
        AppState { table, debouncer, latest: None, stats: FrameStats::default(), source_done: false }
    }

    /// Take one classified frame. Returns true when the displayed symbol changed.
    pub fn handle(&mut self, classified: Classified) -> bool {
        self.stats.record(&classified.outcome);
        let before = self.debouncer.shown().clone();
        let changed = *self.debouncer.push(&classified.symbol) != before;
        self.latest = Some(classified);
        changed
    }

    pub fn table(&self) -> &GestureRuleTable { &self.table }

    /// The debounced symbol; the raw one is on [`AppState::latest`].
    pub fn shown(&self) -> &Symbol { self.debouncer.shown() }

    pub fn latest(&self) -> Option<&Classified> { self.latest.as_ref() }

    pub fn stats(&self) -> FrameStats { self.stats }

    pub fn is_recognized(&self) -> bool { !self.table.is_sentinel(self.shown()) }

    pub fn caption(&self) -> &'static str {
        if self.is_recognized() { CAPTION_RECOGNIZED } else { CAPTION_IDLE }
    }

    pub fn status(&self) -> String {
        let s = self.stats;
        let tail = if self.source_done { "  (source finished)" } else { "" };
        format!(
            "frames {}  recognized {}  other {}  no hand {}  invalid {}{tail}",
            s.frames, s.recognized, s.unrecognized, s.no_hand, s.invalid,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Main loop
// ════════════════════════════════════════════════════════════════════════════

/// Start the frame source. Also returns the key sender when simulating.
fn start_source(cfg: &AppConfig) -> anyhow::Result<(Receiver<Detection>, Option<Sender<SimKey>>)> {
    match &cfg.source {
        SourceKind::Sim => {
            let (sim_tx, sim_rx) = mpsc::channel();
            let frames = spawn_frame_source(SimFrameSource::new(sim_rx, cfg.frame_interval));
            Ok((frames, Some(sim_tx)))
        }
        SourceKind::Replay(path) => {
            let replay = ReplayFrameSource::open(path, Some(cfg.frame_interval))?;
            Ok((spawn_frame_source(replay), None))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok((spawn_frame_source(crate::source::LeapFrameSource), None)),
    }
}

pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let table = Arc::new(
        GestureRuleTable::load_or_baseline(cfg.rules.as_deref())
            .context("failed loading rule table")?,
    );
    let classifier = GestureClassifier::new(Arc::clone(&table));

    // ── Source → classifier thread ────────────────────────────────────────
    let (frames, sim_tx) = start_source(&cfg)?;
    let classified = spawn_classifier(classifier, frames);

    let mut app = AppState::new(table, cfg.hold_frames);
    info!(source = ?cfg.source, hold_frames = cfg.hold_frames, gestures = app.table().len(), "starting");

    if cfg.window {
        run_window(&mut app, &classified, sim_tx, cfg.mirror)?;
    } else {
        run_headless(&mut app, &classified, sim_tx);
    }

    let s = app.stats();
    info!(
        frames = s.frames, recognized = s.recognized, unrecognized = s.unrecognized,
        no_hand = s.no_hand, invalid = s.invalid, "stopped",
    );
    Ok(())
}

fn run_window(
    app:        &mut AppState,
    classified: &Receiver<Classified>,
    sim_tx:     Option<Sender<SimKey>>,
    mirror:     bool,
) -> anyhow::Result<()> {
    let mut vis = Viewer::new(sim_tx, mirror)?;

    while vis.is_open() {
        if !vis.poll_input() { break; }

        loop {
            match classified.try_recv() {
                Ok(c) => {
                    if app.handle(c) {
                        info!(symbol = %app.shown(), "symbol changed");
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !app.source_done {
                        info!("frame source finished");
                        app.source_done = true;
                    }
                    break;
                }
            }
        }

        vis.render(app)?;
    }
    Ok(())
}

fn run_headless(app: &mut AppState, classified: &Receiver<Classified>, sim_tx: Option<Sender<SimKey>>) {
    if let Some(tx) = sim_tx {
        info!("keys on stdin: 1-5 toggle, A B D L W 0 shapes, N hand, M malformed, Q quit");
        spawn_stdin_keys(tx);
    }

    for c in classified.iter() {
        let signature = c.signature.map(|s| s.to_string());
        if app.handle(c) {
            info!(
                symbol = %app.shown(),
                signature = signature.as_deref().unwrap_or("-----"),
                caption = app.caption(),
                "symbol changed",
            );
        }
    }
    app.source_done = true;
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
