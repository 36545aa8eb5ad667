//! The gesture rule table: exact signature → symbol.
//!
//! Tables are immutable once built. The baseline table is six hand shapes
//! from the ASL fingerspelling alphabet; any other table can be loaded from
//! TOML:
//!
//! ```toml
//! sentinel = "-"                 # optional
//!
//! [[gesture]]
//! signature   = "01000"          # thumb, index, middle, ring, pinky
//! symbol      = "D"
//! description = "Index finger up"   # optional
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hand_frame::{FingerStates, ParseSignatureError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::symbol::{InvalidSymbol, Symbol};

// ════════════════════════════════════════════════════════════════════════════
// Baseline
// ════════════════════════════════════════════════════════════════════════════

/// (signature bits, thumb first; symbol; description)
const BASELINE: [(u8, &str, &str); 6] = [
    (0b00000, "A", "Closed fist"),
    (0b01111, "B", "Four fingers up"),
    (0b01000, "D", "Index finger up"),
    (0b01100, "L", "L shape"),
    (0b01110, "W", "Three fingers up"),
    (0b11111, "5", "All fingers up"),
];

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum TableError {
    #[error("gesture #{index}: {source}")]
    Signature { index: usize, source: ParseSignatureError },

    #[error("gesture {signature}: {source}")]
    Symbol { signature: FingerStates, source: InvalidSymbol },

    #[error("sentinel: {0}")]
    Sentinel(InvalidSymbol),

    #[error("signature {signature} is mapped twice (to {first:?} and {second:?})")]
    DuplicateSignature { signature: FingerStates, first: Symbol, second: Symbol },

    #[error("gesture {signature} uses the sentinel {sentinel:?} as its symbol")]
    SentinelReused { signature: FingerStates, sentinel: Symbol },

    #[error("failed parsing rule table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed writing rule table: {0}")]
    Write(#[from] toml::ser::Error),

    #[error("failed reading {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

// ════════════════════════════════════════════════════════════════════════════
// GestureRule
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureRule {
    pub signature:   FingerStates,
    pub symbol:      Symbol,
    /// Human-readable shape, for legends.
    pub description: Option<String>,
}

impl GestureRule {
    pub fn new(signature: FingerStates, symbol: Symbol) -> Self {
        GestureRule { signature, symbol, description: None }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureRuleTable
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureRuleTable {
    rules:    BTreeMap<FingerStates, GestureRule>,
    sentinel: Symbol,
}

impl GestureRuleTable {
    /// Validate and build. Signatures must be unique and no rule may use the
    /// sentinel as its symbol.
    pub fn new(
        rules:    impl IntoIterator<Item = GestureRule>,
        sentinel: Symbol,
    ) -> Result<Self, TableError> {
        let mut table = GestureRuleTable { rules: BTreeMap::new(), sentinel };
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    /// The six-entry table: A, B, D, L, W, 5.
    pub fn baseline() -> Self {
        let rules = BASELINE.iter().map(|&(bits, sym, desc)| GestureRule {
            signature:   FingerStates::from_bits_truncate(bits),
            symbol:      Symbol::from_static(sym),
            description: Some(desc.to_string()),
        });
        GestureRuleTable {
            rules:    rules.map(|r| (r.signature, r)).collect(),
            sentinel: Symbol::default_sentinel(),
        }
    }

    /// A copy with one more rule.
    pub fn with_rule(mut self, rule: GestureRule) -> Result<Self, TableError> {
        self.insert(rule)?;
        Ok(self)
    }

    fn insert(&mut self, rule: GestureRule) -> Result<(), TableError> {
        if rule.symbol == self.sentinel {
            return Err(TableError::SentinelReused {
                signature: rule.signature,
                sentinel:  self.sentinel.clone(),
            });
        }
        if let Some(prev) = self.rules.get(&rule.signature) {
            return Err(TableError::DuplicateSignature {
                signature: rule.signature,
                first:     prev.symbol.clone(),
                second:    rule.symbol,
            });
        }
        self.rules.insert(rule.signature, rule);
        Ok(())
    }

    // ── lookup ────────────────────────────────────────────────────────────

    pub fn lookup(&self, signature: FingerStates) -> Option<&GestureRule> {
        self.rules.get(&signature)
    }

    /// The mapped symbol, or the sentinel on a miss.
    pub fn symbol_for(&self, signature: FingerStates) -> &Symbol {
        self.lookup(signature).map_or(&self.sentinel, |r| &r.symbol)
    }

    pub fn sentinel(&self) -> &Symbol { &self.sentinel }

    pub fn is_sentinel(&self, symbol: &Symbol) -> bool { *symbol == self.sentinel }

    /// Rules in ascending signature order.
    pub fn rules(&self) -> impl Iterator<Item = &GestureRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize { self.rules.len() }

    pub fn is_empty(&self) -> bool { self.rules.is_empty() }

    // ── TOML ──────────────────────────────────────────────────────────────

    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let file: RuleFile = toml::from_str(text)?;
        let sentinel = match file.sentinel {
            Some(s) => Symbol::new(s).map_err(TableError::Sentinel)?,
            None    => Symbol::default_sentinel(),
        };

        let mut rules = Vec::with_capacity(file.gesture.len());
        for (index, entry) in file.gesture.into_iter().enumerate() {
            let signature: FingerStates = entry.signature.parse()
                .map_err(|source| TableError::Signature { index, source })?;
            let symbol = Symbol::new(entry.symbol)
                .map_err(|source| TableError::Symbol { signature, source })?;
            rules.push(GestureRule { signature, symbol, description: entry.description });
        }
        Self::new(rules, sentinel)
    }

    pub fn to_toml_string(&self) -> Result<String, TableError> {
        let file = RuleFile {
            sentinel: Some(self.sentinel.to_string()),
            gesture:  self.rules().map(|r| RuleEntry {
                signature:   r.signature.to_string(),
                symbol:      r.symbol.to_string(),
                description: r.description.clone(),
            }).collect(),
        };
        Ok(toml::to_string(&file)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| TableError::Io { path: path.to_path_buf(), source })?;
        let table = Self::from_toml_str(&text)?;
        info!("loaded {} gesture rules from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load `path` if given, else the baseline table.
    pub fn load_or_baseline(path: Option<&Path>) -> Result<Self, TableError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                debug!("no rule file given, using baseline table");
                Ok(Self::baseline())
            }
        }
    }
}

impl Default for GestureRuleTable {
    fn default() -> Self { Self::baseline() }
}

// ── on-disk shape ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentinel: Option<String>,
    #[serde(default)]
    gesture:  Vec<RuleEntry>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    signature:   String,
    symbol:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
