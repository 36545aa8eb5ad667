//! The gesture classifier and the per-frame pipeline.
//!
//! ```text
//! Detection ──► first hand? ──► LandmarkFrame ──► FingerStates ──► table ──► Symbol
//!                  │ no              │ invalid                        │ miss
//!                  └─────────────────┴────────────── sentinel ◄───────┘
//! ```
//!
//! Nothing here can fail: every path ends in a symbol.

use std::sync::Arc;

use hand_frame::{Detection, FingerStates, InvalidFrame, Landmark, LandmarkFrame};
use tracing::trace;

use crate::symbol::Symbol;
use crate::table::GestureRuleTable;

// ════════════════════════════════════════════════════════════════════════════
// Outcome / Classified
// ════════════════════════════════════════════════════════════════════════════

/// Why a frame produced the symbol it did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The signature is in the table.
    Recognized,
    /// Valid hand, signature not in the table.
    Unrecognized,
    /// The detector reported no hand.
    NoHand,
    /// The detector's hand was malformed; extraction never ran.
    InvalidFrame(InvalidFrame),
}

/// One pipeline invocation: the raw landmarks for overlay drawing and the
/// symbol for display, as independent outputs.
#[derive(Clone, Debug, PartialEq)]
pub struct Classified {
    /// The first detected hand, forwarded untouched (even when invalid).
    pub landmarks: Option<Vec<Landmark>>,
    pub signature: Option<FingerStates>,
    pub symbol:    Symbol,
    pub outcome:   Outcome,
}

impl Classified {
    pub fn is_recognized(&self) -> bool {
        self.outcome == Outcome::Recognized
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Exact-match classifier over an injected, shared rule table.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    table: Arc<GestureRuleTable>,
}

impl GestureClassifier {
    pub fn new(table: Arc<GestureRuleTable>) -> Self {
        GestureClassifier { table }
    }

    pub fn baseline() -> Self {
        Self::new(Arc::new(GestureRuleTable::baseline()))
    }

    pub fn table(&self) -> &GestureRuleTable { &self.table }

    pub fn sentinel(&self) -> &Symbol { self.table.sentinel() }

    /// Signature → symbol. Misses resolve to the sentinel.
    pub fn classify(&self, signature: FingerStates) -> &Symbol {
        self.table.symbol_for(signature)
    }

    /// Raw landmarks → symbol. Malformed hands resolve to the sentinel.
    pub fn classify_landmarks(&self, landmarks: &[Landmark]) -> &Symbol {
        match LandmarkFrame::from_slice(landmarks) {
            Ok(frame) => self.classify(frame.finger_states()),
            Err(_)    => self.sentinel(),
        }
    }

    /// Full per-frame pipeline. Consumes the detection so the landmarks can
    /// be handed on without copying.
    pub fn process(&self, detection: Detection) -> Classified {
        let Some(hand) = detection.hands.into_iter().next() else {
            return Classified {
                landmarks: None,
                signature: None,
                symbol:    self.sentinel().clone(),
                outcome:   Outcome::NoHand,
            };
        };

        let frame = match LandmarkFrame::from_slice(&hand) {
            Ok(f) => f,
            Err(e) => {
                trace!("{e}");
                return Classified {
                    landmarks: Some(hand),
                    signature: None,
                    symbol:    self.sentinel().clone(),
                    outcome:   Outcome::InvalidFrame(e),
                };
            }
        };

        let signature = frame.finger_states();
        let (symbol, outcome) = match self.table.lookup(signature) {
            Some(rule) => (rule.symbol.clone(), Outcome::Recognized),
            None       => (self.sentinel().clone(), Outcome::Unrecognized),
        };
        trace!(%signature, %symbol, "classified");

        Classified { landmarks: Some(hand), signature: Some(signature), symbol, outcome }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self { Self::baseline() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_frame::{Digit, HandPose};
    use crate::table::GestureRule;

    fn sig(s: &str) -> FingerStates { s.parse().unwrap() }

    fn hand(s: &str) -> Detection {
        Detection::single(HandPose::new(sig(s)).landmarks())
    }

    #[test]
    fn every_signature_has_a_defined_symbol() {
        let c = GestureClassifier::baseline();
        let known = ["A", "B", "D", "L", "W", "5", "-"];
        let mut hits = 0;
        for s in FingerStates::all() {
            let sym = c.classify(s);
            assert!(known.contains(&sym.as_str()), "{s} → {sym}");
            if sym != c.sentinel() { hits += 1; }
        }
        assert_eq!(hits, 6);
    }

    #[test]
    fn each_rule_recognized_from_an_engineered_frame() {
        let c = GestureClassifier::baseline();
        for rule in c.table().rules() {
            let out = c.process(Detection::single(HandPose::new(rule.signature).landmarks()));
            assert_eq!(out.symbol, rule.symbol, "signature {}", rule.signature);
            assert_eq!(out.signature, Some(rule.signature));
            assert!(out.is_recognized());
        }
    }

    #[test]
    fn fist_is_a() {
        // Every finger tip below its PIP, thumb tip right of its IP.
        let out = GestureClassifier::baseline().process(hand("00000"));
        assert_eq!(out.signature, Some(FingerStates::CURLED));
        assert_eq!(out.symbol, "A");
    }

    #[test]
    fn open_hand_is_5() {
        let out = GestureClassifier::baseline().process(hand("11111"));
        assert_eq!(out.symbol, "5");
    }

    #[test]
    fn index_only_is_d() {
        let pose = HandPose::new(FingerStates::from_digits(&[Digit::Index]));
        let out = GestureClassifier::baseline().process(Detection::single(pose.landmarks()));
        assert_eq!(out.signature.map(|s| s.to_string()).as_deref(), Some("01000"));
        assert_eq!(out.symbol, "D");
    }

    #[test]
    fn no_hand_is_sentinel() {
        let out = GestureClassifier::baseline().process(Detection::none());
        assert_eq!(out.symbol, "-");
        assert_eq!(out.outcome, Outcome::NoHand);
        assert!(out.landmarks.is_none());
        assert!(out.signature.is_none());
    }

    #[test]
    fn eighteen_landmarks_is_sentinel() {
        let mut pts = HandPose::new(FingerStates::EXTENDED).landmarks();
        pts.truncate(18);
        let out = GestureClassifier::baseline().process(Detection::single(pts.clone()));
        assert_eq!(out.symbol, "-");
        assert_eq!(out.outcome, Outcome::InvalidFrame(InvalidFrame::WrongLength(18)));
        assert_eq!(out.signature, None);
        // Still forwarded for the overlay.
        assert_eq!(out.landmarks, Some(pts));
    }

    #[test]
    fn ties_classify_as_a() {
        let frame = HandPose::tied_frame();
        let out = GestureClassifier::baseline().process(Detection::single(frame.points().to_vec()));
        assert_eq!(out.symbol, "A");
    }

    #[test]
    fn unknown_shape_is_unrecognized() {
        let out = GestureClassifier::baseline().process(hand("10001"));
        assert_eq!(out.symbol, "-");
        assert_eq!(out.outcome, Outcome::Unrecognized);
        assert_eq!(out.signature, Some(sig("10001")));
    }

    #[test]
    fn only_first_hand_is_classified() {
        let d = Detection {
            hands: vec![
                HandPose::new(sig("01000")).landmarks(),
                HandPose::new(sig("11111")).landmarks(),
            ],
        };
        assert_eq!(GestureClassifier::baseline().process(d).symbol, "D");
    }

    #[test]
    fn malformed_first_hand_is_not_rescued_by_second() {
        let d = Detection {
            hands: vec![vec![Landmark::default(); 5], HandPose::new(sig("11111")).landmarks()],
        };
        assert_eq!(GestureClassifier::baseline().process(d).symbol, "-");
    }

    #[test]
    fn classify_landmarks_handles_bad_input() {
        let c = GestureClassifier::baseline();
        assert_eq!(c.classify_landmarks(&[]), "-");
        assert_eq!(c.classify_landmarks(&HandPose::new(sig("01110")).landmarks()), "W");
    }

    #[test]
    fn deterministic_across_calls() {
        let c = GestureClassifier::baseline();
        let pts = HandPose::new(sig("01111")).with_offset(0.05, -0.1).landmarks();
        let first = c.process(Detection::single(pts.clone()));
        for _ in 0..50 {
            assert_eq!(c.process(Detection::single(pts.clone())), first);
        }
    }

    #[test]
    fn injected_table_replaces_baseline() {
        let table = GestureRuleTable::new(
            [GestureRule::new(sig("11000"), Symbol::new("Gun").unwrap())],
            Symbol::new("?").unwrap(),
        ).unwrap();
        let c = GestureClassifier::new(Arc::new(table));
        assert_eq!(c.process(hand("11000")).symbol, "Gun");
        assert_eq!(c.process(hand("00000")).symbol, "?");
        assert_eq!(c.process(Detection::none()).symbol, "?");
    }
}
