//! # sign_live
//!
//! Live hand-sign recognition: a landmark frame source feeds the
//! [`sign_table`] classifier on its own thread, and the result is shown in a
//! software-rendered window (or logged, headless).
//!
//! ```text
//! FrameSource ──Detection──► classifier ──Classified──► AppState ──► Viewer
//!  sim / replay / leap        (thread)                  debouncer     or log
//! ```
//!
//! ## Feature flags
//!
//! * (default): **Simulation** and **NDJSON replay**, no hardware needed.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `1`–`5` | Toggle thumb, index, middle, ring, pinky |
//! | `A` `B` `D` `L` `W` | Jump to that letter's hand shape |
//! | `0` | Open hand (`5`) |
//! | `N` | Hide / show the hand |
//! | `M` | Send one malformed 18-landmark hand |
//! | `Q` / `Escape` | Quit |
//!
//! Headless (`--no-window`) the same keys are read from stdin.

pub mod app;
pub mod source;
pub mod viewer;
pub mod worker;
