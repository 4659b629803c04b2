//! Game-type label parsing.
//!
//! Wagers carry the label the placement flow recorded, which for legacy
//! rows is free-form ("Single Pana", "SP", "single_digit", "panna").
//! Parsing is a separate step from resolution: a generic "panna" label is
//! its own variant and only gets a concrete category once the bet number
//! is looked at.

use super::classify_patti;
use crate::types::GameType;

/// Parsed form of a recorded game-type label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameLabel {
    /// The label names one category.
    Known(GameType),
    /// Generic "panna"/"pana"/"patti": sub-type comes from the number.
    Panna,
    /// Nothing recognisable. Holds the normalised label.
    Unknown(String),
}

/// Lowercase and drop everything that is not a letter or digit.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl GameLabel {
    /// Parse a recorded label. Case, whitespace and punctuation are ignored.
    pub fn parse(raw: &str) -> Self {
        let norm = normalize(raw);
        let game = match norm.as_str() {
            "singledigit" | "single" | "singleank" | "ank" | "digit" | "sd" => GameType::SingleDigit,
            "jodi" | "jodidigit" | "jori" | "pair" | "jd" => GameType::Jodi,
            "singlepatti" | "singlepana" | "singlepanna" | "sp" => GameType::SinglePatti,
            "doublepatti" | "doublepana" | "doublepanna" | "dp" => GameType::DoublePatti,
            "triplepatti" | "triplepana" | "triplepanna" | "tp" => GameType::TriplePatti,
            "halfsangam" | "hs" => GameType::HalfSangam,
            "fullsangam" | "fs" => GameType::FullSangam,
            "panna" | "pana" | "patti" | "pati" => return GameLabel::Panna,
            _ => return GameLabel::Unknown(norm),
        };
        GameLabel::Known(game)
    }

    /// Resolve to a category. Generic panna labels are re-derived from the
    /// number itself; unknown labels resolve to nothing.
    pub fn resolve(&self, bet_number: &str) -> Option<GameType> {
        match self {
            GameLabel::Known(game) => Some(*game),
            GameLabel::Panna => classify_patti(bet_number).map(|k| k.game_type()),
            GameLabel::Unknown(_) => None,
        }
    }
}

impl From<&str> for GameLabel {
    fn from(raw: &str) -> Self {
        GameLabel::parse(raw)
    }
}

impl From<GameType> for GameLabel {
    fn from(game: GameType) -> Self {
        GameLabel::Known(game)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
