//! # hand_frame
//!
//! Hand landmark frames as delivered by an external hand-pose detector, and
//! the five-digit **finger-state signature** extracted from them.
//!
//! ## Landmark topology
//!
//! A frame is exactly 21 points in the detector's fixed order:
//!
//! | Index | Point |
//! |---|---|
//! | 0 | Wrist |
//! | 1–4 | Thumb CMC, MCP, IP, tip |
//! | 5–8 | Index MCP, PIP, DIP, tip |
//! | 9–12 | Middle MCP, PIP, DIP, tip |
//! | 13–16 | Ring MCP, PIP, DIP, tip |
//! | 17–20 | Pinky MCP, PIP, DIP, tip |
//!
//! `x` and `y` are normalized to the image, with `y` growing downward.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_frame::{Digit, FingerStates, HandPose};
//!
//! let states = FingerStates::from_digits(&[Digit::Index]);
//! let frame  = HandPose::new(states).frame();
//!
//! assert_eq!(frame.finger_states().to_string(), "01000");
//! ```

pub mod detection;
pub mod fingers;
pub mod landmark;
pub mod pose;

pub use detection::Detection;
pub use fingers::{extract_finger_states, finger_states, Digit, FingerStates, ParseSignatureError};
pub use landmark::{InvalidFrame, Landmark, LandmarkFrame, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use pose::HandPose;
