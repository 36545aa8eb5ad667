//! Landmark frame sources: keyboard simulation, NDJSON replay, LeapMotion.
//!
//! The public interface is [`Detection`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from real hardware, a
//! recording, or the keyboard simulator. A source ends by returning, which
//! drops its sender and disconnects the consumer.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use hand_frame::{Detection, Digit, FingerStates, HandPose, Landmark};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed opening replay {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait: unified interface for hw, replay and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`Detection`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Detection>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<Detection> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource: keyboard-driven synthetic hand
// ════════════════════════════════════════════════════════════════════════════

/// Simulation keys, from the viewer window or from stdin in headless mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    /// `1`–`5`: flip one digit.
    Toggle(Digit),
    /// `A B D L W`, and `0` for the open hand: jump to a whole hand shape.
    Shape(FingerStates),
    /// `N`: hide / show the hand.
    NoHand,
    /// `M`: send one truncated 18-landmark hand.
    Malformed,
    /// `Q`: stop the source.
    Quit,
}

impl SimKey {
    pub fn from_char(c: char) -> Option<SimKey> {
        let shape = |bits| Some(SimKey::Shape(FingerStates::from_bits_truncate(bits)));
        match c.to_ascii_lowercase() {
            '1' => Some(SimKey::Toggle(Digit::Thumb)),
            '2' => Some(SimKey::Toggle(Digit::Index)),
            '3' => Some(SimKey::Toggle(Digit::Middle)),
            '4' => Some(SimKey::Toggle(Digit::Ring)),
            '5' => Some(SimKey::Toggle(Digit::Pinky)),
            'a' => shape(0b00000),
            'b' => shape(0b01111),
            'd' => shape(0b01000),
            'l' => shape(0b01100),
            'w' => shape(0b01110),
            '0' => shape(0b11111),
            'n' => Some(SimKey::NoHand),
            'm' => Some(SimKey::Malformed),
            'q' => Some(SimKey::Quit),
            _   => None,
        }
    }
}

/// The simulated hand between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHand {
    pub states:    FingerStates,
    pub visible:   bool,
    malformed_next: bool,
}

/// Frames a simulated malformed hand is cut down to.
const MALFORMED_LEN: usize = 18;

impl SimHand {
    pub fn new(states: FingerStates) -> Self {
        SimHand { states, visible: true, malformed_next: false }
    }

    /// Apply a key. Returns false for [`SimKey::Quit`].
    pub fn apply(&mut self, key: SimKey) -> bool {
        match key {
            SimKey::Toggle(d)  => { self.states = self.states.toggled(d); self.visible = true; }
            SimKey::Shape(s)   => { self.states = s; self.visible = true; }
            SimKey::NoHand     => self.visible = !self.visible,
            SimKey::Malformed  => self.malformed_next = true,
            SimKey::Quit       => return false,
        }
        true
    }

    /// The detection for the current tick.
    pub fn detection(&mut self) -> Detection {
        if !self.visible {
            return Detection::none();
        }
        let mut pts = HandPose::new(self.states).landmarks();
        if std::mem::take(&mut self.malformed_next) {
            pts.truncate(MALFORMED_LEN);
        }
        Detection::single(pts)
    }
}

/// Emits the simulated hand once per `interval`, applying keys as they
/// arrive on `rx`.
pub struct SimFrameSource {
    pub rx:       Receiver<SimKey>,
    pub interval: Duration,
    pub hand:     SimHand,
}

impl SimFrameSource {
    pub fn new(rx: Receiver<SimKey>, interval: Duration) -> Self {
        SimFrameSource { rx, interval, hand: SimHand::new(FingerStates::EXTENDED) }
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<Detection>) {
        let SimFrameSource { rx, interval, mut hand } = *self;
        let mut next_tick = Instant::now();

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(key) => {
                    debug!(?key, "sim key");
                    if !hand.apply(key) { return; }
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            if tx.send(hand.detection()).is_err() { return; }
            next_tick += interval;
        }
    }
}

/// Headless mode: read simulation keys from stdin, one or more per line.
pub fn spawn_stdin_keys(tx: Sender<SimKey>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for key in line.chars().filter_map(SimKey::from_char) {
                if tx.send(key).is_err() { return; }
                if key == SimKey::Quit { return; }
            }
        }
        let _ = tx.send(SimKey::Quit);
    });
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayFrameSource: recorded detector output
// ════════════════════════════════════════════════════════════════════════════

/// Replays an NDJSON file of detections (see [`Detection::from_json_line`]).
pub struct ReplayFrameSource {
    reader:   Box<dyn BufRead + Send>,
    interval: Option<Duration>,
    label:    String,
}

impl ReplayFrameSource {
    pub fn open(path: &Path, interval: Option<Duration>) -> Result<Self, SourceError> {
        let file = File::open(path)
            .map_err(|source| SourceError::Open { path: path.to_path_buf(), source })?;
        Ok(Self::from_reader(BufReader::new(file), interval, path.display().to_string()))
    }

    pub fn from_reader(
        reader:   impl BufRead + Send + 'static,
        interval: Option<Duration>,
        label:    impl Into<String>,
    ) -> Self {
        ReplayFrameSource { reader: Box::new(reader), interval, label: label.into() }
    }
}

impl FrameSource for ReplayFrameSource {
    fn run(self: Box<Self>, tx: Sender<Detection>) {
        let ReplayFrameSource { reader, interval, label } = *self;
        let mut sent = 0usize;

        for (n, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => { warn!("{label}: read error at line {}: {e}", n + 1); break; }
            };
            if line.trim().is_empty() { continue; }

            let detection = match Detection::from_json_line(&line) {
                Ok(d) => d,
                Err(e) => { warn!("{label}:{}: skipping unparsable detection: {e}", n + 1); continue; }
            };
            if tx.send(detection).is_err() { return; }
            sent += 1;

            if let Some(dt) = interval { thread::sleep(dt); }
        }
        info!("{label}: replay finished after {sent} frames");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Half-width and depth of the tracked volume above the device, mm.
const LEAP_HALF_SPAN_MM: f32 = 200.0;

/// Project a LeapMotion point (mm, device origin, y up) into the image-like
/// coordinates the extractor expects, as seen from above: `x` stays
/// left-to-right, the far edge (−z) is the top of the image, height above
/// the device becomes depth.
pub fn leap_point_to_landmark(x: f32, y: f32, z: f32) -> Landmark {
    let span = 2.0 * LEAP_HALF_SPAN_MM;
    Landmark::new(0.5 + x / span, 0.5 + z / span, -y / span)
}

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Each tracking frame becomes one [`Detection`]; every hand is converted
/// (the forearm's wrist end, then the next joint of the metacarpal,
/// proximal, intermediate and distal bone of each digit) and the classifier
/// keeps the first.
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<Detection>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => { tracing::error!("failed to create LeapC connection: {e:?}"); return; }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {e:?}");
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let detection = Detection {
                    hands: hands.iter().map(leap_hand_landmarks).collect(),
                };
                if tx.send(detection).is_err() { return; }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_hand_landmarks(hand: &leaprs::Hand) -> Vec<Landmark> {
    let wrist = hand.arm().next_joint();
    let joints = hand.digits().flat_map(|digit| {
        [digit.metacarpal(), digit.proximal(), digit.intermediate(), digit.distal()]
            .map(|bone| {
                let j = bone.next_joint();
                (j.x, j.y, j.z)
            })
    });
    leap_points_to_hand((wrist.x, wrist.y, wrist.z), joints)
}

/// Wrist first, then the digit joints in thumb-to-pinky, base-to-tip order.
pub fn leap_points_to_hand(
    wrist:  (f32, f32, f32),
    joints: impl IntoIterator<Item = (f32, f32, f32)>,
) -> Vec<Landmark> {
    std::iter::once(wrist)
        .chain(joints)
        .map(|(x, y, z)| leap_point_to_landmark(x, y, z))
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn keys_map_to_digits_and_shapes() {
        assert_eq!(SimKey::from_char('2'), Some(SimKey::Toggle(Digit::Index)));
        assert_eq!(SimKey::from_char('D'), SimKey::from_char('d'));
        assert_eq!(
            SimKey::from_char('l'),
            Some(SimKey::Shape("01100".parse().unwrap())),
        );
        assert_eq!(SimKey::from_char('x'), None);
    }

    #[test]
    fn toggle_flips_one_digit() {
        let mut h = SimHand::new(FingerStates::CURLED);
        assert!(h.apply(SimKey::Toggle(Digit::Middle)));
        assert_eq!(h.states.to_string(), "00100");
    }

    #[test]
    fn no_hand_sends_empty_detection() {
        let mut h = SimHand::new(FingerStates::EXTENDED);
        h.apply(SimKey::NoHand);
        assert!(!h.detection().has_hand());
        h.apply(SimKey::NoHand);
        assert!(h.detection().has_hand());
    }

    #[test]
    fn shape_makes_hand_visible_again() {
        let mut h = SimHand::new(FingerStates::EXTENDED);
        h.apply(SimKey::NoHand);
        h.apply(SimKey::from_char('a').unwrap());
        assert!(h.visible);
        assert_eq!(h.states, FingerStates::CURLED);
    }

    #[test]
    fn malformed_is_one_shot() {
        let mut h = SimHand::new(FingerStates::EXTENDED);
        h.apply(SimKey::Malformed);
        assert_eq!(h.detection().first_hand().map(<[_]>::len), Some(MALFORMED_LEN));
        assert_eq!(h.detection().first_hand().map(<[_]>::len), Some(21));
    }

    #[test]
    fn quit_stops() {
        assert!(!SimHand::new(FingerStates::CURLED).apply(SimKey::Quit));
    }

    #[test]
    fn sim_source_emits_then_stops_on_quit() {
        let (key_tx, key_rx) = mpsc::channel();
        let frames = spawn_frame_source(SimFrameSource::new(key_rx, Duration::from_millis(1)));

        let first = frames.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.first_hand().map(<[_]>::len), Some(21));

        key_tx.send(SimKey::Quit).unwrap();
        // Drain until the source hangs up.
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match frames.recv_timeout(Duration::from_millis(100)) {
                Ok(_) => assert!(Instant::now() < deadline, "source never stopped"),
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => assert!(Instant::now() < deadline),
            }
        }
    }

    #[test]
    fn replay_skips_bad_lines_and_blank_lines() {
        let hand = Detection::single(HandPose::new(FingerStates::CURLED).landmarks());
        let text = format!("null\n\n{{oops\n{}\n[]\n", hand.to_json_line().unwrap());
        let src = ReplayFrameSource::from_reader(Cursor::new(text), None, "test");

        let got: Vec<Detection> = spawn_frame_source(src).iter().collect();
        assert_eq!(got.len(), 3);
        assert!(!got[0].has_hand());
        assert_eq!(got[1], hand);
        assert!(!got[2].has_hand());
    }

    #[test]
    fn replay_forwards_hand_with_missing_coordinate() {
        let mut pts = HandPose::new(FingerStates::CURLED).landmarks();
        pts[8].x = f32::NAN;
        let line = Detection::single(pts).to_json_line().unwrap().replacen(r#""x":null,"#, "", 1);
        let src = ReplayFrameSource::from_reader(Cursor::new(line), None, "test");

        let got: Vec<Detection> = spawn_frame_source(src).iter().collect();
        assert_eq!(got.len(), 1);
        let hand = got[0].first_hand().unwrap();
        assert_eq!(hand.len(), 21);
        assert!(hand[8].x.is_nan());
    }

    #[test]
    fn replay_missing_file_errors() {
        let err = ReplayFrameSource::open(Path::new("/nonexistent/frames.ndjson"), None);
        assert!(matches!(err, Err(SourceError::Open { .. })));
    }

    #[test]
    fn leap_wrist_is_landmark_zero() {
        let wrist = (0.0, 150.0, 120.0);
        let joints = (0..20).map(|i| (i as f32, 200.0, -(i as f32)));
        let hand = leap_points_to_hand(wrist, joints);

        assert_eq!(hand.len(), 21);
        assert_eq!(hand[0], leap_point_to_landmark(0.0, 150.0, 120.0));
        assert_eq!(hand[20], leap_point_to_landmark(19.0, 200.0, -19.0));
        // The forearm end sits nearer the user than every digit joint.
        assert!(hand[1..].iter().all(|p| p.y < hand[0].y));
    }

    #[test]
    fn leap_projection_axes() {
        let centre = leap_point_to_landmark(0.0, 200.0, 0.0);
        assert_eq!((centre.x, centre.y), (0.5, 0.5));

        // Further from the user (−z) is higher in the image.
        let far = leap_point_to_landmark(0.0, 200.0, -100.0);
        assert!(far.y < centre.y);

        // User's left (−x) is image left.
        let left = leap_point_to_landmark(-100.0, 200.0, 0.0);
        assert!(left.x < centre.x);
    }
}
