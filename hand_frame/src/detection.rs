//! One detector result: zero or more hands.
//!
//! Replay files store one [`Detection`] per line as JSON:
//!
//! ```text
//! null                                   no hand
//! []                                     no hand
//! [[{"x":0.5,"y":0.9,"z":0.0}, …21…]]    one hand (extra hands ignored)
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::landmark::Landmark;

/// Serializes as the bare list of hands. Deserializes from that list or
/// from `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Detection {
    /// Raw per-hand landmark lists, unvalidated.
    pub hands: Vec<Vec<Landmark>>,
}

impl Detection {
    /// The explicit "no hand in this frame" signal.
    pub fn none() -> Self {
        Detection { hands: Vec::new() }
    }

    pub fn single(landmarks: Vec<Landmark>) -> Self {
        Detection { hands: vec![landmarks] }
    }

    /// The tracked hand. Only the first reported hand is ever used.
    pub fn first_hand(&self) -> Option<&[Landmark]> {
        self.hands.first().map(Vec::as_slice)
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }

    /// Parse one replay line (`null`, `[]`, or a list of hands).
    ///
    /// Hands with missing coordinates still parse; they fail validation
    /// later, like any other malformed hand.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.hands)
    }
}

impl<'de> Deserialize<'de> for Detection {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hands = Option::<Vec<Vec<Landmark>>>::deserialize(d)?;
        Ok(Detection { hands: hands.unwrap_or_default() })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FingerStates, HandPose};

    #[test]
    fn null_and_empty_mean_no_hand() {
        assert!(!Detection::from_json_line("null").unwrap().has_hand());
        assert!(!Detection::from_json_line("[]").unwrap().has_hand());
        assert_eq!(Detection::from_json_line(" null ").unwrap(), Detection::none());
    }

    #[test]
    fn serde_and_line_parser_agree() {
        for line in ["null", "[]", r#"[[{"x":0.1,"y":0.2}]]"#] {
            let via_serde: Detection = serde_json::from_str(line).unwrap();
            assert_eq!(via_serde, Detection::from_json_line(line).unwrap(), "{line}");
        }
    }

    #[test]
    fn hand_with_missing_coordinate_still_parses() {
        let mut hand = HandPose::new(FingerStates::EXTENDED).landmarks();
        hand[0].y = f32::NAN;
        let line = Detection::single(hand).to_json_line().unwrap();
        let without_y = line.replacen(r#","y":null"#, "", 1);
        assert_ne!(without_y, line);

        let d = Detection::from_json_line(&without_y).unwrap();
        let parsed = d.first_hand().unwrap();
        assert_eq!(parsed.len(), 21);
        assert!(parsed[0].y.is_nan());
        assert!(matches!(
            crate::finger_states(parsed),
            Err(crate::InvalidFrame::NonFiniteCoordinate(0)),
        ));
    }

    #[test]
    fn first_hand_wins() {
        let a = HandPose::new(FingerStates::CURLED).landmarks();
        let b = HandPose::new(FingerStates::EXTENDED).landmarks();
        let d = Detection { hands: vec![a.clone(), b] };
        assert_eq!(d.first_hand(), Some(a.as_slice()));
    }

    #[test]
    fn parses_hand_without_depth() {
        let d = Detection::from_json_line(r#"[[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.1}]]"#).unwrap();
        let hand = d.first_hand().unwrap();
        assert_eq!(hand.len(), 2);
        assert_eq!(hand[0].z, 0.0);
        assert_eq!(hand[1], Landmark::new(0.3, 0.4, -0.1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Detection::from_json_line("{").is_err());
        assert!(Detection::from_json_line(r#"[{"x":1}]"#).is_err());
    }

    #[test]
    fn json_line_reloads_identically() {
        let d = Detection::single(HandPose::new("01100".parse().unwrap()).landmarks());
        let line = d.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(Detection::from_json_line(&line).unwrap(), d);
    }
}
