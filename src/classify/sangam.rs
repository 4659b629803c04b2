//! Sangam (compound) keys.
//!
//! A half sangam pairs a pana from one draw with the ank of the other:
//! `"123-4"` is open pana 123 with close ank 4, `"4-123"` is open ank 4
//! with close pana 123. A full sangam pairs both panas: `"123-456"`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{classify_patti, digits};
use crate::types::Session;

/// One side of a sangam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SangamLeg {
    Pana(String),
    Ank(u8),
}

impl fmt::Display for SangamLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SangamLeg::Pana(p) => write!(f, "{p}"),
            SangamLeg::Ank(d) => write!(f, "{d}"),
        }
    }
}

/// A pana leg must be a bettable patti, not just any three digits.
fn pana_leg(s: &str) -> Option<SangamLeg> {
    classify_patti(s).map(|_| SangamLeg::Pana(s.to_string()))
}

fn ank_leg(s: &str) -> Option<SangamLeg> {
    digits::<1>(s).map(|[d]| SangamLeg::Ank(d))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfSangam {
    pub open: SangamLeg,
    pub close: SangamLeg,
}

impl HalfSangam {
    /// Aggregation key, `"<open>-<close>"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.open, self.close)
    }

    /// Session whose draw supplies the pana.
    pub fn pana_session(&self) -> Session {
        match self.open {
            SangamLeg::Pana(_) => Session::Open,
            SangamLeg::Ank(_) => Session::Close,
        }
    }
}

/// Parse `"<pana>-<digit>"` or `"<digit>-<pana>"`.
pub fn classify_half_sangam(key: &str) -> Option<HalfSangam> {
    let (left, right) = key.split_once('-')?;
    match (left.len(), right.len()) {
        (3, 1) => Some(HalfSangam {
            open: pana_leg(left)?,
            close: ank_leg(right)?,
        }),
        (1, 3) => Some(HalfSangam {
            open: ank_leg(left)?,
            close: pana_leg(right)?,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullSangam {
    pub open_pana: String,
    pub close_pana: String,
}

impl FullSangam {
    pub fn key(&self) -> String {
        format!("{}-{}", self.open_pana, self.close_pana)
    }
}

/// Parse `"<open pana>-<close pana>"`.
pub fn classify_full_sangam(key: &str) -> Option<FullSangam> {
    let (left, right) = key.split_once('-')?;
    classify_patti(left)?;
    classify_patti(right)?;
    Some(FullSangam {
        open_pana: left.to_string(),
        close_pana: right.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
