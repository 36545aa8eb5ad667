//! Optional display smoothing, layered after the classifier.
//!
//! A hand at the edge of detection makes the raw symbol flicker between a
//! letter and the sentinel. [`SymbolDebouncer`] only changes the displayed
//! symbol once the same raw symbol has been seen on `hold_frames`
//! consecutive frames. It never feeds back into classification.

use crate::symbol::Symbol;

#[derive(Clone, Debug)]
pub struct SymbolDebouncer {
    hold_frames: u32,
    shown:       Symbol,
    candidate:   Option<Symbol>,
    streak:      u32,
}

impl SymbolDebouncer {
    /// `initial` is displayed until something else is confirmed; normally
    /// the table's sentinel. `hold_frames <= 1` disables smoothing.
    pub fn new(hold_frames: u32, initial: Symbol) -> Self {
        SymbolDebouncer { hold_frames, shown: initial, candidate: None, streak: 0 }
    }

    pub fn hold_frames(&self) -> u32 { self.hold_frames }

    pub fn shown(&self) -> &Symbol { &self.shown }

    /// Feed one raw classifier output; returns the symbol to display.
    pub fn push(&mut self, raw: &Symbol) -> &Symbol {
        if self.hold_frames <= 1 || *raw == self.shown {
            if *raw != self.shown {
                self.shown = raw.clone();
            }
            self.candidate = None;
            self.streak = 0;
            return &self.shown;
        }

        if self.candidate.as_ref() == Some(raw) {
            self.streak += 1;
        } else {
            self.candidate = Some(raw.clone());
            self.streak = 1;
        }

        if self.streak >= self.hold_frames {
            self.shown = raw.clone();
            self.candidate = None;
            self.streak = 0;
        }
        &self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Symbol { Symbol::new(text).unwrap() }

    #[test]
    fn passthrough_when_disabled() {
        let mut d = SymbolDebouncer::new(1, s("-"));
        assert_eq!(d.push(&s("A")), "A");
        assert_eq!(d.push(&s("-")), "-");
        let mut d = SymbolDebouncer::new(0, s("-"));
        assert_eq!(d.push(&s("B")), "B");
    }

    #[test]
    fn needs_consecutive_frames() {
        let mut d = SymbolDebouncer::new(3, s("-"));
        assert_eq!(d.push(&s("A")), "-");
        assert_eq!(d.push(&s("A")), "-");
        assert_eq!(d.push(&s("A")), "A");
    }

    #[test]
    fn flicker_is_suppressed() {
        let mut d = SymbolDebouncer::new(3, s("-"));
        for _ in 0..3 { d.push(&s("D")); }
        assert_eq!(d.shown(), "D");
        for _ in 0..10 {
            assert_eq!(d.push(&s("-")), "D");
            assert_eq!(d.push(&s("D")), "D");
        }
    }

    #[test]
    fn interrupted_streak_restarts() {
        let mut d = SymbolDebouncer::new(3, s("-"));
        d.push(&s("A"));
        d.push(&s("A"));
        d.push(&s("B"));
        assert_eq!(d.push(&s("A")), "-");
        assert_eq!(d.push(&s("A")), "-");
        assert_eq!(d.push(&s("A")), "A");
    }
}
