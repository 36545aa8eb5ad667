//! Classification thread: detections in, classified frames out.
//!
//! ```text
//! FrameSource ──Detection──► classifier thread ──Classified──► app loop
//! ```
//!
//! Hanging up either end stops the thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use hand_frame::Detection;
use sign_table::{Classified, GestureClassifier};
use tracing::debug;

/// Spawn the classifier on its own thread and return the receiving end.
pub fn spawn_classifier(
    classifier: GestureClassifier,
    frames:     Receiver<Detection>,
) -> Receiver<Classified> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || classify_frames(&classifier, frames, tx));
    rx
}

fn classify_frames(
    classifier: &GestureClassifier,
    frames:     Receiver<Detection>,
    tx:         Sender<Classified>,
) {
    let mut count = 0u64;
    for detection in frames {
        if tx.send(classifier.process(detection)).is_err() {
            debug!("classified receiver dropped after {count} frames");
            return;
        }
        count += 1;
    }
    debug!("frame source closed after {count} frames");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_frame::{FingerStates, HandPose};
    use sign_table::Outcome;

    #[test]
    fn classifies_in_order_then_closes() {
        let (tx, rx) = mpsc::channel();
        let out = spawn_classifier(GestureClassifier::baseline(), rx);

        for sig in ["01000", "01100", "10101"] {
            let pose = HandPose::new(sig.parse::<FingerStates>().unwrap());
            tx.send(Detection::single(pose.landmarks())).unwrap();
        }
        tx.send(Detection::none()).unwrap();
        drop(tx);

        let got: Vec<Classified> = out.iter().collect();
        let symbols: Vec<&str> = got.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, ["D", "L", "-", "-"]);
        assert_eq!(got[2].outcome, Outcome::Unrecognized);
        assert_eq!(got[3].outcome, Outcome::NoHand);
    }
}
