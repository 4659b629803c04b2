//! Round state engine.
//!
//! Owns the declared-number lifecycle `Open → Running → Closed → Open`
//! and is the only writer of `Round::display_result`, which is always
//! recomputed from the two declared numbers.
//!
//! Transitions are not synchronised with settlement. Callers must
//! serialise a declaration and any settlement pass on the same round.

use chrono::Utc;
use tracing::{info, warn};

use crate::ank::ank;
use crate::types::{MatkaError, Round, RoundState, BLANK_RESULT};

/// Encode the display result: `"{open}-{ank(open)}{ank(close)}-{close}"`,
/// with `***` / `*` placeholders for anything not yet declared.
pub fn encode_result(opening: Option<&str>, closing: Option<&str>) -> String {
    let pana = |n: Option<&str>| n.filter(|s| ank(s).is_some()).unwrap_or("***").to_string();
    let digit = |n: Option<&str>| match n.and_then(ank) {
        Some(a) => a.to_string(),
        None => "*".to_string(),
    };
    format!(
        "{}-{}{}-{}",
        pana(opening),
        digit(opening),
        digit(closing),
        pana(closing)
    )
}

/// Policy knobs for round transitions.
#[derive(Debug, Clone)]
pub struct RoundPolicy {
    /// Reject a close declaration while the opening number is unset.
    pub require_open_before_close: bool,
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self {
            require_open_before_close: true,
        }
    }
}

pub struct RoundStateEngine {
    policy: RoundPolicy,
}

impl RoundStateEngine {
    pub fn new(policy: RoundPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoundPolicy {
        &self.policy
    }

    fn validate(number: &str) -> Result<(), MatkaError> {
        if ank(number).is_none() {
            return Err(MatkaError::InvalidNumber {
                number: number.to_string(),
                reason: "declared number must be exactly three digits".to_string(),
            });
        }
        Ok(())
    }

    fn refresh(round: &mut Round) {
        round.display_result =
            encode_result(round.opening_number.as_deref(), round.closing_number.as_deref());
    }

    /// Declare the opening pana. Allowed while `Open` or `Running` (the
    /// latter overwrites a mistaken declaration). A closed round must be
    /// cleared first, unless it was closed without an opening under the
    /// permissive policy: then the opening is filled in and the round
    /// stays `Closed`.
    pub fn declare_open(&self, round: &mut Round, opening: &str) -> Result<(), MatkaError> {
        Self::validate(opening)?;
        let backfill = round.state == RoundState::Closed
            && round.opening_number.is_none()
            && !self.policy.require_open_before_close;
        if round.state == RoundState::Closed && !backfill {
            warn!(round_id = %round.id, "Open declaration rejected on closed round");
            return Err(MatkaError::InvalidTransition {
                round_id: round.id.clone(),
                from: round.state,
                action: "declare open".to_string(),
            });
        }

        round.opening_number = Some(opening.to_string());
        round.declared_open_at = Some(Utc::now());
        if !backfill {
            round.state = RoundState::Running;
        }
        Self::refresh(round);

        info!(
            round_id = %round.id,
            opening,
            result = %round.display_result,
            state = %round.state,
            "Opening declared"
        );
        Ok(())
    }

    /// Declare the closing pana. Re-declaring on a closed round overwrites
    /// the previous close.
    pub fn declare_close(&self, round: &mut Round, closing: &str) -> Result<(), MatkaError> {
        Self::validate(closing)?;
        if round.opening_number.is_none() && self.policy.require_open_before_close {
            warn!(round_id = %round.id, "Close declaration rejected: no opening number");
            return Err(MatkaError::CloseBeforeOpen(round.id.clone()));
        }

        round.closing_number = Some(closing.to_string());
        round.declared_close_at = Some(Utc::now());
        round.state = RoundState::Closed;
        Self::refresh(round);

        info!(
            round_id = %round.id,
            closing,
            result = %round.display_result,
            state = %round.state,
            "Closing declared"
        );
        Ok(())
    }

    /// Wipe both declarations and return the round to `Open`.
    pub fn clear_result(&self, round: &mut Round) {
        round.opening_number = None;
        round.closing_number = None;
        round.declared_open_at = None;
        round.declared_close_at = None;
        round.display_result = BLANK_RESULT.to_string();
        round.state = RoundState::Open;

        info!(round_id = %round.id, "Result cleared");
    }
}

impl Default for RoundStateEngine {
    fn default() -> Self {
        Self::new(RoundPolicy::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn round() -> Round {
        Round::new("R-1", "Kalyan", NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    fn permissive() -> RoundStateEngine {
        RoundStateEngine::new(RoundPolicy {
            require_open_before_close: false,
        })
    }

    #[test]
    fn test_encode_result() {
        assert_eq!(encode_result(None, None), "***-**-***");
        assert_eq!(encode_result(Some("123"), None), "123-6*-***");
        assert_eq!(encode_result(Some("123"), Some("456")), "123-65-456");
        assert_eq!(encode_result(None, Some("456")), "***-*5-456");
        assert_eq!(encode_result(Some("12"), None), "***-**-***");
    }

    #[test]
    fn test_full_lifecycle() {
        let engine = RoundStateEngine::default();
        let mut r = round();

        engine.declare_open(&mut r, "123").unwrap();
        assert_eq!(r.state, RoundState::Running);
        assert_eq!(r.display_result, "123-6*-***");
        assert!(r.declared_open_at.is_some());

        engine.declare_close(&mut r, "456").unwrap();
        assert_eq!(r.state, RoundState::Closed);
        assert_eq!(r.display_result, "123-65-456");
        assert_eq!(r.jodi().as_deref(), Some("65"));

        engine.clear_result(&mut r);
        assert_eq!(r.state, RoundState::Open);
        assert_eq!(r.display_result, "***-**-***");
        assert!(r.opening_number.is_none());
        assert!(r.closing_number.is_none());
        assert!(r.declared_close_at.is_none());
    }

    #[test]
    fn test_redeclare_open_while_running() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        engine.declare_open(&mut r, "123").unwrap();
        engine.declare_open(&mut r, "127").unwrap();
        assert_eq!(r.state, RoundState::Running);
        assert_eq!(r.display_result, "127-0*-***");
    }

    #[test]
    fn test_declare_open_on_closed_round_rejected() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        engine.declare_open(&mut r, "123").unwrap();
        engine.declare_close(&mut r, "456").unwrap();

        let err = engine.declare_open(&mut r, "789").unwrap_err();
        assert!(matches!(err, MatkaError::InvalidTransition { from: RoundState::Closed, .. }));
        assert_eq!(r.display_result, "123-65-456");
    }

    #[test]
    fn test_redeclare_close_on_closed_round() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        engine.declare_open(&mut r, "123").unwrap();
        engine.declare_close(&mut r, "456").unwrap();
        engine.declare_close(&mut r, "128").unwrap();
        assert_eq!(r.display_result, "123-61-128");
        assert_eq!(r.state, RoundState::Closed);
    }

    #[test]
    fn test_close_before_open_rejected_by_default() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        let err = engine.declare_close(&mut r, "456").unwrap_err();
        assert!(matches!(err, MatkaError::CloseBeforeOpen(ref id) if id == "R-1"));
        assert_eq!(r, round());
    }

    #[test]
    fn test_close_before_open_permissive() {
        let engine = permissive();
        let mut r = round();
        engine.declare_close(&mut r, "456").unwrap();
        assert_eq!(r.state, RoundState::Closed);
        assert_eq!(r.display_result, "***-*5-456");
        assert!(r.opening_number.is_none());
    }

    #[test]
    fn test_open_after_close_permissive_completes_result() {
        let engine = permissive();
        let mut r = round();
        engine.declare_close(&mut r, "456").unwrap();
        engine.declare_open(&mut r, "123").unwrap();
        assert_eq!(r.state, RoundState::Closed);
        assert_eq!(r.display_result, "123-65-456");
        assert!(r.declared_open_at.is_some());

        // Once both are set, a closed round is locked again.
        let err = engine.declare_open(&mut r, "789").unwrap_err();
        assert!(matches!(err, MatkaError::InvalidTransition { from: RoundState::Closed, .. }));
        assert_eq!(r.display_result, "123-65-456");
    }

    #[test]
    fn test_closed_round_rejects_open_under_strict_policy() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        r.closing_number = Some("456".to_string());
        r.state = RoundState::Closed;
        let err = engine.declare_open(&mut r, "123").unwrap_err();
        assert!(matches!(err, MatkaError::InvalidTransition { .. }));
        assert!(r.opening_number.is_none());
    }

    #[test]
    fn test_invalid_numbers_rejected_without_mutation() {
        let engine = RoundStateEngine::default();
        let mut r = round();
        for bad in ["12", "1234", "abc", ""] {
            let err = engine.declare_open(&mut r, bad).unwrap_err();
            assert!(matches!(err, MatkaError::InvalidNumber { .. }));
        }
        assert_eq!(r, round());

        engine.declare_open(&mut r, "123").unwrap();
        assert!(engine.declare_close(&mut r, "45").is_err());
        assert_eq!(r.state, RoundState::Running);
    }

    #[test]
    fn test_display_result_always_derived() {
        let engine = permissive();
        let mut r = round();
        r.display_result = "hand-edited".to_string();
        engine.declare_open(&mut r, "390").unwrap();
        assert_eq!(
            r.display_result,
            encode_result(r.opening_number.as_deref(), r.closing_number.as_deref())
        );
    }
}
