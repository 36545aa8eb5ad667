//! Finger-state extraction: 21 landmarks → 5-bit signature.
//!
//! One bit per digit, thumb first. A bit is set when the digit is extended.
//!
//! * **Thumb**: tip `x` strictly left of the IP joint (`x` at index 3).
//!   Assumes one fixed handedness facing the camera; not mirror-corrected.
//! * **Index … pinky**: tip `y` strictly above (numerically less than) the
//!   PIP joint two points down the same chain.
//!
//! Equal coordinates count as curled.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::landmark::{InvalidFrame, Landmark, LandmarkFrame};

// ════════════════════════════════════════════════════════════════════════════
// Digit
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Digit {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Digit {
    /// Signature order.
    pub const ALL: [Digit; 5] = [Digit::Thumb, Digit::Index, Digit::Middle, Digit::Ring, Digit::Pinky];

    /// Position in the signature string (0 = leftmost).
    pub fn position(self) -> usize {
        self as usize
    }

    /// Landmark index of this digit's tip.
    pub fn tip(self) -> usize {
        4 + 4 * self.position()
    }

    /// Landmark the tip is compared against.
    pub fn reference_joint(self) -> usize {
        match self {
            Digit::Thumb => self.tip() - 1,
            _            => self.tip() - 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Digit::Thumb  => "thumb",
            Digit::Index  => "index",
            Digit::Middle => "middle",
            Digit::Ring   => "ring",
            Digit::Pinky  => "pinky",
        }
    }

    fn is_extended_in(self, frame: &LandmarkFrame) -> bool {
        let tip   = frame.get(self.tip());
        let joint = frame.get(self.reference_joint());
        match self {
            Digit::Thumb => tip.x < joint.x,
            _            => tip.y < joint.y,
        }
    }

    /// Bit mask inside a [`FingerStates`]; the thumb is the most significant
    /// of the five bits so numeric order equals string order.
    fn mask(self) -> u8 {
        1 << (4 - self.position())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerStates: the signature
// ════════════════════════════════════════════════════════════════════════════

/// Five extended/curled bits in the order thumb, index, middle, ring, pinky.
///
/// Displays (and parses) as the five-character string used by rule tables,
/// e.g. `"01000"` for "index finger up".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerStates(u8);

impl FingerStates {
    /// Number of distinct signatures.
    pub const COUNT: usize = 32;

    pub const CURLED:   FingerStates = FingerStates(0b00000);
    pub const EXTENDED: FingerStates = FingerStates(0b11111);

    /// Build from per-digit flags in signature order.
    pub fn new(extended: [bool; 5]) -> Self {
        Digit::ALL.iter()
            .zip(extended)
            .fold(Self::CURLED, |acc, (&d, on)| acc.with(d, on))
    }

    /// Only the given digits extended.
    pub fn from_digits(digits: &[Digit]) -> Self {
        digits.iter().fold(Self::CURLED, |acc, &d| acc.with(d, true))
    }

    /// `bits` read as the signature string in binary; `None` above `0b11111`.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits < 32).then_some(FingerStates(bits))
    }

    /// Like [`from_bits`](Self::from_bits) but drops bits above the fifth.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        FingerStates(bits & 0b11111)
    }

    pub fn bits(self) -> u8 { self.0 }

    pub fn is_extended(self, digit: Digit) -> bool {
        self.0 & digit.mask() != 0
    }

    pub fn with(self, digit: Digit, extended: bool) -> Self {
        if extended {
            FingerStates(self.0 | digit.mask())
        } else {
            FingerStates(self.0 & !digit.mask())
        }
    }

    pub fn toggled(self, digit: Digit) -> Self {
        FingerStates(self.0 ^ digit.mask())
    }

    pub fn extended_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Per-digit flags in signature order.
    pub fn to_array(self) -> [bool; 5] {
        Digit::ALL.map(|d| self.is_extended(d))
    }

    /// All 32 signatures in ascending order (`00000` … `11111`).
    pub fn all() -> impl Iterator<Item = FingerStates> {
        (0..32u8).map(FingerStates)
    }
}

impl fmt::Display for FingerStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in Digit::ALL {
            f.write_str(if self.is_extended(d) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A signature string that is not exactly five `0`/`1` characters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid signature {0:?}: expected five '0'/'1' characters, thumb first")]
pub struct ParseSignatureError(pub String);

impl FromStr for FingerStates {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseSignatureError(s.to_string());
        if s.len() != 5 {
            return Err(bad());
        }
        let mut states = Self::CURLED;
        for (d, c) in Digit::ALL.into_iter().zip(s.chars()) {
            match c {
                '1' => states = states.with(d, true),
                '0' => {}
                _   => return Err(bad()),
            }
        }
        Ok(states)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Extraction
// ════════════════════════════════════════════════════════════════════════════

/// Extract the signature from an already validated frame.
pub fn extract_finger_states(frame: &LandmarkFrame) -> FingerStates {
    Digit::ALL.iter().fold(FingerStates::CURLED, |acc, &d| {
        acc.with(d, d.is_extended_in(frame))
    })
}

/// Validate raw detector landmarks and extract the signature.
///
/// No per-digit comparison runs unless all 21 landmarks are present and
/// finite.
pub fn finger_states(landmarks: &[Landmark]) -> Result<FingerStates, InvalidFrame> {
    let frame = LandmarkFrame::from_slice(landmarks)?;
    Ok(extract_finger_states(&frame))
}

impl LandmarkFrame {
    pub fn finger_states(&self) -> FingerStates {
        extract_finger_states(self)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
