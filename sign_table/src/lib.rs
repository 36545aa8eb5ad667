//! # sign_table
//!
//! Maps the five-bit finger-state signature from [`hand_frame`] to a
//! hand-sign symbol by exact lookup in an injected [`GestureRuleTable`].
//!
//! ## Baseline table
//!
//! | Signature | Symbol | Shape |
//! |---|---|---|
//! | `00000` | A | Closed fist |
//! | `01111` | B | Four fingers up |
//! | `01000` | D | Index finger up |
//! | `01100` | L | L shape |
//! | `01110` | W | Three fingers up |
//! | `11111` | 5 | All fingers up |
//! | anything else | `-` | (sentinel) |
//!
//! ## Quick start
//!
//! ```rust
//! use sign_table::GestureClassifier;
//! use hand_frame::{Detection, HandPose, FingerStates};
//!
//! let classifier = GestureClassifier::baseline();
//! let hand = HandPose::new(FingerStates::EXTENDED).landmarks();
//!
//! let out = classifier.process(Detection::single(hand));
//! assert_eq!(out.symbol.as_str(), "5");
//! assert_eq!(classifier.process(Detection::none()).symbol.as_str(), "-");
//! ```

pub mod classifier;
pub mod debounce;
pub mod symbol;
pub mod table;

pub use classifier::{Classified, GestureClassifier, Outcome};
pub use debounce::SymbolDebouncer;
pub use symbol::{InvalidSymbol, Symbol, DEFAULT_SENTINEL};
pub use table::{GestureRule, GestureRuleTable, TableError};
