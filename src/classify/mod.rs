//! Number classifier — validates a bet number against its game type.
//!
//! Every function here is total: invalid input yields `false` / `None`,
//! never an error. The aggregator treats `None` as "excluded".

pub mod label;
pub mod sangam;

pub use label::GameLabel;
pub use sangam::{classify_full_sangam, classify_half_sangam, FullSangam, HalfSangam, SangamLeg};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::GameType;

// ---------------------------------------------------------------------------
// Digit parsing
// ---------------------------------------------------------------------------

/// Parse a string of exactly `N` ASCII digits.
pub fn digits<const N: usize>(s: &str) -> Option<[u8; N]> {
    let bytes = s.as_bytes();
    if bytes.len() != N {
        return None;
    }
    let mut out = [0u8; N];
    for (slot, b) in out.iter_mut().zip(bytes) {
        if !b.is_ascii_digit() {
            return None;
        }
        *slot = b - b'0';
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Single digit / Jodi
// ---------------------------------------------------------------------------

/// Exactly one character, `0`–`9`.
pub fn is_single_digit(s: &str) -> bool {
    digits::<1>(s).is_some()
}

/// Exactly two digits. First belongs to the open draw, second to the close
/// draw, so `"45"` and `"54"` are different bets.
pub fn is_jodi(s: &str) -> bool {
    digits::<2>(s).is_some()
}

// ---------------------------------------------------------------------------
// Patti
// ---------------------------------------------------------------------------

/// Sub-type of a 3-digit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PattiKind {
    Single,
    Double,
    Triple,
}

impl PattiKind {
    pub fn game_type(&self) -> GameType {
        match self {
            PattiKind::Single => GameType::SinglePatti,
            PattiKind::Double => GameType::DoublePatti,
            PattiKind::Triple => GameType::TriplePatti,
        }
    }

    /// Inverse of [`PattiKind::game_type`] for the patti categories.
    pub fn from_game_type(game: GameType) -> Option<Self> {
        match game {
            GameType::SinglePatti => Some(PattiKind::Single),
            GameType::DoublePatti => Some(PattiKind::Double),
            GameType::TriplePatti => Some(PattiKind::Triple),
            _ => None,
        }
    }
}

impl fmt::Display for PattiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.game_type())
    }
}

/// Canonical double-patti rule over digits `(a, b, c)`.
///
/// Only one ordering of an asymmetric double is bettable: `112` is valid,
/// its reversal `211` is not. A trailing zero counts as the largest digit
/// (`100`, `550`).
pub fn is_canonical_double(a: u8, b: u8, c: u8) -> bool {
    if a != b && b != c {
        return false;
    }
    if a == 0 {
        return false;
    }
    if b == 0 && c == 0 {
        return true;
    }
    if a == b && c == 0 {
        return true;
    }
    c > a
}

/// Classify a 3-digit string as Single, Double or Triple patti.
///
/// Returns `None` for anything that is not exactly three ASCII digits, or
/// whose repeated digits are not in canonical double order.
pub fn classify_patti(s: &str) -> Option<PattiKind> {
    let [a, b, c] = digits::<3>(s)?;
    if a == b && b == c {
        return Some(PattiKind::Triple);
    }
    if a != b && b != c && a != c {
        return Some(PattiKind::Single);
    }
    if is_canonical_double(a, b, c) {
        return Some(PattiKind::Double);
    }
    None
}

// ---------------------------------------------------------------------------
// Category validation
// ---------------------------------------------------------------------------

/// Validate `number` against a declared category and return the key it is
/// aggregated under, or `None` if it is not a valid bet for that category.
pub fn bet_key(game: GameType, number: &str) -> Option<String> {
    match game {
        GameType::SingleDigit => is_single_digit(number).then(|| number.to_string()),
        GameType::Jodi => is_jodi(number).then(|| number.to_string()),
        GameType::SinglePatti | GameType::DoublePatti | GameType::TriplePatti => {
            let kind = classify_patti(number)?;
            (kind.game_type() == game).then(|| number.to_string())
        }
        GameType::HalfSangam => classify_half_sangam(number).map(|h| h.key()),
        GameType::FullSangam => classify_full_sangam(number).map(|f| f.key()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
