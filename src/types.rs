//! Shared types for the MATKA engine.
//!
//! These types form the data model used across all modules: wagers as
//! recorded by the placement flow, the round record an operator declares
//! results on, and the domain error type.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ank;

/// Display result of a round with nothing declared.
pub const BLANK_RESULT: &str = "***-**-***";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Wager category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameType {
    SingleDigit,
    Jodi,
    SinglePatti,
    DoublePatti,
    TriplePatti,
    HalfSangam,
    FullSangam,
}

impl GameType {
    /// All categories in report order.
    pub const ALL: &'static [GameType] = &[
        GameType::SingleDigit,
        GameType::Jodi,
        GameType::SinglePatti,
        GameType::DoublePatti,
        GameType::TriplePatti,
        GameType::HalfSangam,
        GameType::FullSangam,
    ];

    /// Canonical label written by [`Wager::new`].
    pub fn code(&self) -> &'static str {
        match self {
            GameType::SingleDigit => "single_digit",
            GameType::Jodi => "jodi",
            GameType::SinglePatti => "single_patti",
            GameType::DoublePatti => "double_patti",
            GameType::TriplePatti => "triple_patti",
            GameType::HalfSangam => "half_sangam",
            GameType::FullSangam => "full_sangam",
        }
    }

    /// Whether this is one of the three 3-digit categories.
    pub fn is_patti(&self) -> bool {
        matches!(
            self,
            GameType::SinglePatti | GameType::DoublePatti | GameType::TriplePatti
        )
    }

    /// Whether the outcome needs both draws to resolve.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            GameType::Jodi | GameType::HalfSangam | GameType::FullSangam
        )
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::SingleDigit => write!(f, "Single Digit"),
            GameType::Jodi => write!(f, "Jodi"),
            GameType::SinglePatti => write!(f, "Single Patti"),
            GameType::DoublePatti => write!(f, "Double Patti"),
            GameType::TriplePatti => write!(f, "Triple Patti"),
            GameType::HalfSangam => write!(f, "Half Sangam"),
            GameType::FullSangam => write!(f, "Full Sangam"),
        }
    }
}

/// Which of the round's two draws a wager targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Session {
    Open,
    Close,
}

impl Session {
    pub const ALL: &'static [Session] = &[Session::Open, Session::Close];
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Open => write!(f, "OPEN"),
            Session::Close => write!(f, "CLOSE"),
        }
    }
}

/// Parse a session name (case-insensitive).
impl std::str::FromStr for Session {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "o" => Ok(Session::Open),
            "close" | "c" => Ok(Session::Close),
            _ => Err(anyhow::anyhow!("Unknown session: {s}")),
        }
    }
}

/// Settlement status of a wager. Only read by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WagerStatus {
    #[default]
    Pending,
    Won,
    Lost,
}

/// Round lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundState {
    /// Nothing declared yet.
    #[default]
    Open,
    /// Opening number declared, closing pending.
    Running,
    /// Both draws declared.
    Closed,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundState::Open => write!(f, "OPEN"),
            RoundState::Running => write!(f, "RUNNING"),
            RoundState::Closed => write!(f, "CLOSED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager
// ---------------------------------------------------------------------------

/// A single wager as recorded by the placement flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wager {
    pub id: String,
    pub round_id: String,
    /// Game-type label as recorded. Legacy rows carry free-form labels
    /// ("Single Pana", "SP", "panna", ...); see [`crate::classify::label`].
    pub game_type: String,
    pub bet_number: String,
    pub amount: Decimal,
    pub session: Session,
    pub bettor_id: String,
    #[serde(default)]
    pub status: WagerStatus,
    pub placed_at: DateTime<Utc>,
}

impl Wager {
    /// Build a pending wager with a fresh id and the canonical label for `game`.
    pub fn new(
        round_id: &str,
        game: GameType,
        bet_number: &str,
        amount: Decimal,
        session: Session,
        bettor_id: &str,
    ) -> Self {
        Self::with_label(round_id, game.code(), bet_number, amount, session, bettor_id)
    }

    /// Build a pending wager carrying an arbitrary recorded label.
    pub fn with_label(
        round_id: &str,
        label: &str,
        bet_number: &str,
        amount: Decimal,
        session: Session,
        bettor_id: &str,
    ) -> Self {
        Wager {
            id: uuid::Uuid::new_v4().to_string(),
            round_id: round_id.to_string(),
            game_type: label.to_string(),
            bet_number: bet_number.to_string(),
            amount,
            session,
            bettor_id: bettor_id.to_string(),
            status: WagerStatus::Pending,
            placed_at: Utc::now(),
        }
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} '{}' {:.2} by {} ({:?})",
            self.round_id,
            self.session,
            self.game_type,
            self.bet_number,
            self.amount,
            self.bettor_id,
            self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One scheduled draw instance.
///
/// `display_result` is derived from the two declared numbers and is only
/// ever written by [`crate::round`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: String,
    /// Market (bazaar) name, e.g. "Kalyan".
    pub market: String,
    pub draw_date: NaiveDate,
    pub opening_number: Option<String>,
    pub closing_number: Option<String>,
    pub display_result: String,
    pub state: RoundState,
    #[serde(default)]
    pub declared_open_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub declared_close_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} ({})",
            self.id, self.market, self.draw_date, self.display_result, self.state,
        )
    }
}

impl Round {
    /// A fresh round with nothing declared.
    pub fn new(id: &str, market: &str, draw_date: NaiveDate) -> Self {
        Round {
            id: id.to_string(),
            market: market.to_string(),
            draw_date,
            opening_number: None,
            closing_number: None,
            display_result: BLANK_RESULT.to_string(),
            state: RoundState::Open,
            declared_open_at: None,
            declared_close_at: None,
        }
    }

    /// Ank of the declared opening pana.
    pub fn open_ank(&self) -> Option<u8> {
        self.opening_number.as_deref().and_then(ank::ank)
    }

    /// Ank of the declared closing pana.
    pub fn close_ank(&self) -> Option<u8> {
        self.closing_number.as_deref().and_then(ank::ank)
    }

    /// Winning Jodi code once both draws are declared.
    pub fn jodi(&self) -> Option<String> {
        Some(format!("{}{}", self.open_ank()?, self.close_ank()?))
    }

    /// Declared number for a session.
    pub fn declared(&self, session: Session) -> Option<&str> {
        match session {
            Session::Open => self.opening_number.as_deref(),
            Session::Close => self.closing_number.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for MATKA.
#[derive(Debug, thiserror::Error)]
pub enum MatkaError {
    #[error("Round not found: {0}")]
    RoundNotFound(String),

    #[error("Round already exists: {0}")]
    RoundExists(String),

    #[error("Invalid number '{number}': {reason}")]
    InvalidNumber { number: String, reason: String },

    #[error("Round {round_id}: cannot {action} while {from}")]
    InvalidTransition {
        round_id: String,
        from: RoundState,
        action: String,
    },

    #[error("Round {0}: close declared before open")]
    CloseBeforeOpen(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
