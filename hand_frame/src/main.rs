//! frame_probe: print the finger-state signature of every detection in a
//! replay file (or stdin).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hand_frame::{finger_states, Detection, FingerStates, HandPose};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "frame_probe", about = "Extract finger-state signatures from hand landmark detections")]
struct Cli {
    /// NDJSON replay file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Instead of reading, write one synthetic detection per signature
    /// (e.g. `--emit 01000 11111`)
    #[arg(long, num_args = 1.., value_name = "SIGNATURE")]
    emit: Vec<FingerStates>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frame_probe=info,hand_frame=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !cli.emit.is_empty() {
        for states in &cli.emit {
            let line = Detection::single(HandPose::new(*states).landmarks()).to_json_line()?;
            writeln!(out, "{line}")?;
        }
        return Ok(());
    }

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    probe(reader, &mut out)
}

/// One `line<TAB>verdict` row per non-blank input line that parses as JSON.
fn probe(reader: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    for (n, line) in reader.lines().enumerate() {
        let line = line.context("failed reading detection line")?;
        if line.trim().is_empty() { continue; }

        let detection = match Detection::from_json_line(&line) {
            Ok(d) => d,
            Err(e) => {
                warn!(line = n + 1, "skipping unparsable detection: {e}");
                continue;
            }
        };

        let verdict = match detection.first_hand() {
            None => "no-hand".to_string(),
            Some(hand) => match finger_states(hand) {
                Ok(states) => states.to_string(),
                Err(e) => {
                    debug!(line = n + 1, "{e}");
                    format!("invalid ({e})")
                }
            },
        };
        writeln!(out, "{}\t{}", n + 1, verdict)?;
    }
    Ok(())
}
