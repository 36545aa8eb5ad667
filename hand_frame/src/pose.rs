//! Synthetic hands.
//!
//! [`HandPose`] lays out a plausible upright right hand whose extracted
//! signature is exactly the one it was built from. The keyboard simulator
//! and the tests use it in place of a real detector.

use crate::fingers::{Digit, FingerStates};
use crate::landmark::{Landmark, LandmarkFrame, LANDMARK_COUNT, WRIST};

const WRIST_POS: (f32, f32) = (0.50, 0.90);

/// Column of each non-thumb finger (index … pinky).
const FINGER_X: [f32; 4] = [0.42, 0.50, 0.58, 0.66];

/// y of MCP, PIP, DIP, tip for a straight finger.
const EXTENDED_Y: [f32; 4] = [0.66, 0.54, 0.46, 0.38];
/// y of MCP, PIP, DIP, tip for a finger folded into the palm.
const CURLED_Y:   [f32; 4] = [0.66, 0.60, 0.66, 0.70];

/// Thumb CMC, MCP, IP as (x, y); the tip depends on the thumb bit.
const THUMB_JOINTS: [(f32, f32); 3] = [(0.42, 0.84), (0.36, 0.78), (0.32, 0.72)];
const THUMB_TIP_OUT: (f32, f32) = (0.26, 0.68);
const THUMB_TIP_IN:  (f32, f32) = (0.40, 0.70);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    pub states: FingerStates,
    /// Added to every landmark, to move the hand around the image.
    pub offset: (f32, f32),
}

impl HandPose {
    pub fn new(states: FingerStates) -> Self {
        HandPose { states, offset: (0.0, 0.0) }
    }

    pub fn with_offset(mut self, dx: f32, dy: f32) -> Self {
        self.offset = (dx, dy);
        self
    }

    /// The 21 detector-ordered landmarks.
    pub fn landmarks(&self) -> Vec<Landmark> {
        self.points().to_vec()
    }

    pub fn frame(&self) -> LandmarkFrame {
        LandmarkFrame::from_trusted(self.points())
    }

    fn points(&self) -> [Landmark; LANDMARK_COUNT] {
        let (dx, dy) = self.offset;
        let mut pts = [Landmark::default(); LANDMARK_COUNT];

        pts[WRIST] = Landmark::new(WRIST_POS.0, WRIST_POS.1, 0.0);

        let thumb_tip = if self.states.is_extended(Digit::Thumb) { THUMB_TIP_OUT } else { THUMB_TIP_IN };
        let thumb = THUMB_JOINTS.iter().copied().chain(std::iter::once(thumb_tip));
        for (i, (x, y)) in thumb.enumerate() {
            pts[1 + i] = Landmark::new(x, y, -0.02 * (i + 1) as f32);
        }

        for (f, digit) in Digit::ALL[1..].iter().enumerate() {
            let ys = if self.states.is_extended(*digit) { EXTENDED_Y } else { CURLED_Y };
            let base = digit.tip() - 3;
            for (j, y) in ys.iter().enumerate() {
                pts[base + j] = Landmark::new(FINGER_X[f], *y, -0.01 * j as f32);
            }
        }

        for p in pts.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
        pts
    }

    /// A hand where every compared tip sits exactly level with its
    /// reference joint, so every digit reads as curled.
    pub fn tied_frame() -> LandmarkFrame {
        let mut pts = HandPose::new(FingerStates::EXTENDED).points();
        for d in Digit::ALL {
            let joint = pts[d.reference_joint()];
            let tip = &mut pts[d.tip()];
            match d {
                Digit::Thumb => tip.x = joint.x,
                _            => tip.y = joint.y,
            }
        }
        LandmarkFrame::from_trusted(pts)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_21_points() {
        for s in FingerStates::all() {
            assert_eq!(HandPose::new(s).landmarks().len(), LANDMARK_COUNT);
        }
    }

    #[test]
    fn offset_moves_every_point() {
        let a = HandPose::new(FingerStates::CURLED).landmarks();
        let b = HandPose::new(FingerStates::CURLED).with_offset(0.1, -0.2).landmarks();
        for (p, q) in a.iter().zip(&b) {
            assert!((q.x - p.x - 0.1).abs() < 1e-6);
            assert!((q.y - p.y + 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn offset_keeps_signature() {
        let s: FingerStates = "10110".parse().unwrap();
        let frame = HandPose::new(s).with_offset(-0.2, 0.05).frame();
        assert_eq!(frame.finger_states(), s);
    }

    #[test]
    fn tied_frame_has_equal_coordinates() {
        let f = HandPose::tied_frame();
        assert_eq!(f.get(Digit::Thumb.tip()).x, f.get(Digit::Thumb.reference_joint()).x);
        for d in &Digit::ALL[1..] {
            assert_eq!(f.get(d.tip()).y, f.get(d.reference_joint()).y);
        }
    }
}
