//! Landmarks and the validated 21-point [`LandmarkFrame`].

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks in one hand frame.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Bones drawn by the skeleton overlay, in detector topology.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),  (THUMB_CMC, THUMB_MCP),   (THUMB_MCP, THUMB_IP),   (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),  (INDEX_MCP, INDEX_PIP),   (INDEX_PIP, INDEX_DIP),  (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),  (RING_MCP, RING_PIP),     (RING_PIP, RING_DIP),     (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),   (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),  (PINKY_PIP, PINKY_DIP),   (PINKY_DIP, PINKY_TIP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked joint or fingertip.
///
/// An absent or `null` `x`/`y` deserializes as NaN so the hand still reaches
/// frame validation and is rejected there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate")]
    pub x: f32,
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate")]
    pub y: f32,
    /// Relative depth. Not used by finger-state extraction.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    fn is_finite_xy(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn missing_coordinate() -> f32 { f32::NAN }

fn coordinate<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(d)?.unwrap_or(f32::NAN))
}

// ════════════════════════════════════════════════════════════════════════════
// InvalidFrame
// ════════════════════════════════════════════════════════════════════════════

/// A detector frame that cannot be used for finger-state extraction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidFrame {
    #[error("invalid frame: expected 21 landmarks, got {0}")]
    WrongLength(usize),

    #[error("invalid frame: landmark {0} has a missing or non-finite coordinate")]
    NonFiniteCoordinate(usize),
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// Exactly 21 landmarks whose `x`/`y` are finite.
///
/// Construction is the only validation point; everything downstream indexes
/// the array directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate a raw detector hand.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self, InvalidFrame> {
        let points: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|_| InvalidFrame::WrongLength(landmarks.len()))?;
        Self::new(points)
    }

    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, InvalidFrame> {
        if let Some(bad) = points.iter().position(|p| !p.is_finite_xy()) {
            return Err(InvalidFrame::NonFiniteCoordinate(bad));
        }
        Ok(LandmarkFrame { points })
    }

    /// For points built in-crate from finite constants.
    pub(crate) fn from_trusted(points: [Landmark; LANDMARK_COUNT]) -> Self {
        debug_assert!(points.iter().all(Landmark::is_finite_xy));
        LandmarkFrame { points }
    }

    /// Landmark at a fixed anatomical index (see the `*_TIP`, `*_PIP` consts).
    ///
    /// # Panics
    /// If `index >= LANDMARK_COUNT`.
    pub fn get(&self, index: usize) -> &Landmark {
        &self.points[index]
    }

    pub fn wrist(&self) -> &Landmark { &self.points[WRIST] }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }
}

impl TryFrom<&[Landmark]> for LandmarkFrame {
    type Error = InvalidFrame;

    fn try_from(landmarks: &[Landmark]) -> Result<Self, Self::Error> {
        LandmarkFrame::from_slice(landmarks)
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkFrame {
    type Error = InvalidFrame;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        LandmarkFrame::from_slice(&landmarks)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<Landmark> {
        (0..n).map(|i| Landmark::new(i as f32 * 0.01, 0.5, 0.0)).collect()
    }

    #[test]
    fn accepts_exactly_21() {
        let frame = LandmarkFrame::from_slice(&grid(21)).unwrap();
        assert!((frame.get(PINKY_TIP).x - 0.20).abs() < 1e-6);
        assert_eq!(frame.wrist().x, 0.0);
    }

    #[test]
    fn rejects_short_frame() {
        assert_eq!(
            LandmarkFrame::from_slice(&grid(18)),
            Err(InvalidFrame::WrongLength(18)),
        );
    }

    #[test]
    fn rejects_long_frame() {
        assert_eq!(
            LandmarkFrame::try_from(grid(22)),
            Err(InvalidFrame::WrongLength(22)),
        );
    }

    #[test]
    fn rejects_empty_frame() {
        assert_eq!(LandmarkFrame::from_slice(&[]), Err(InvalidFrame::WrongLength(0)));
    }

    #[test]
    fn rejects_nan_coordinate() {
        let mut pts = grid(21);
        pts[INDEX_TIP].y = f32::NAN;
        assert_eq!(
            LandmarkFrame::from_slice(&pts),
            Err(InvalidFrame::NonFiniteCoordinate(INDEX_TIP)),
        );
    }

    #[test]
    fn non_finite_depth_is_ignored() {
        let mut pts = grid(21);
        pts[WRIST].z = f32::INFINITY;
        assert!(LandmarkFrame::from_slice(&pts).is_ok());
    }

    #[test]
    fn connections_stay_in_range() {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }

    #[test]
    fn missing_coordinate_fails_validation() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"z":0.1}"#).unwrap();
        assert!(lm.y.is_nan());
        let lm: Landmark = serde_json::from_str(r#"{"x":null,"y":0.5}"#).unwrap();
        assert!(lm.x.is_nan());

        let mut pts = grid(21);
        pts[MIDDLE_PIP] = lm;
        assert_eq!(
            LandmarkFrame::from_slice(&pts),
            Err(InvalidFrame::NonFiniteCoordinate(MIDDLE_PIP)),
        );
    }

    #[test]
    fn landmark_z_defaults_when_absent() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.75, 0.0));
    }
}
