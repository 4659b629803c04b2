//! Exposure preview — "what is at stake if this number is declared?"
//!
//! Read-only: takes borrowed round and wagers, never mutates either, so
//! the operator can try any number of candidates before committing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ExposureAggregator;
use crate::ank::ank;
use crate::classify::{classify_patti, digits, PattiKind};
use crate::types::{GameType, Round, Session, Wager};

/// How the candidate number was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    /// A bare ank digit: only single-digit bets resolve on it.
    Digit(u8),
    /// A full pana with its ank.
    Pana { kind: PattiKind, ank: u8 },
}

/// One outcome key the candidate would make a winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeHit {
    pub category: GameType,
    pub key: String,
    pub amount: Decimal,
    pub count: u64,
    pub bettor_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSummary {
    pub session: Session,
    pub candidate: String,
    /// `None` when the candidate is neither a digit nor a bettable pana.
    pub candidate_kind: Option<CandidateKind>,
    /// Everything wagered in the session.
    pub total_amount: Decimal,
    /// Wagered on keys the candidate resolves.
    pub amount_on_candidate: Decimal,
    pub bettor_count: usize,
    pub bettor_count_on_candidate: usize,
    /// Per-key breakdown; keys with no wagers are omitted.
    pub hits: Vec<OutcomeHit>,
}

impl fmt::Display for PreviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] '{}' on_candidate={:.2} ({} bettors) of total={:.2} ({} bettors)",
            self.session,
            self.candidate,
            self.amount_on_candidate,
            self.bettor_count_on_candidate,
            self.total_amount,
            self.bettor_count,
        )
    }
}

pub struct ExposurePreviewService;

impl ExposurePreviewService {
    /// Classify a candidate declaration.
    pub fn classify_candidate(candidate: &str) -> Option<CandidateKind> {
        if let Some([d]) = digits::<1>(candidate) {
            return Some(CandidateKind::Digit(d));
        }
        let kind = classify_patti(candidate)?;
        Some(CandidateKind::Pana {
            kind,
            ank: ank(candidate)?,
        })
    }

    /// Keys, per category, that declaring `candidate` for `session` would
    /// resolve. Compound keys (jodi, sangam) are only produced for the
    /// close session once the round's opening number is known.
    pub fn outcome_keys(round: &Round, session: Session, candidate: &str) -> Vec<(GameType, String)> {
        let Some(kind) = Self::classify_candidate(candidate) else {
            return Vec::new();
        };

        let candidate_ank = match kind {
            CandidateKind::Digit(d) => d,
            CandidateKind::Pana { ank, .. } => ank,
        };

        let mut keys = vec![(GameType::SingleDigit, candidate_ank.to_string())];
        if let CandidateKind::Pana { kind, .. } = kind {
            keys.push((kind.game_type(), candidate.to_string()));
        }

        if session == Session::Close {
            let opening = round.opening_number.as_deref();
            if let Some(open_ank) = round.open_ank() {
                keys.push((GameType::Jodi, format!("{open_ank}{candidate_ank}")));
                if let (Some(open_pana), CandidateKind::Pana { .. }) = (opening, kind) {
                    keys.push((GameType::HalfSangam, format!("{open_pana}-{candidate_ank}")));
                    keys.push((GameType::HalfSangam, format!("{open_ank}-{candidate}")));
                    keys.push((GameType::FullSangam, format!("{open_pana}-{candidate}")));
                }
            }
        }
        keys
    }

    /// Preview the exposure of declaring `candidate` for `session`.
    ///
    /// Only wagers for this round and session are considered.
    pub fn preview(
        round: &Round,
        session: Session,
        candidate: &str,
        wagers: &[Wager],
    ) -> PreviewSummary {
        let scoped = wagers.iter().filter(|w| w.round_id == round.id);
        let report = ExposureAggregator::aggregate_iter(scoped, Some(session));

        let mut hits = Vec::new();
        let mut hit_bettors: BTreeSet<&str> = BTreeSet::new();
        let mut amount_on_candidate = Decimal::ZERO;

        for (category, key) in Self::outcome_keys(round, session, candidate) {
            let Some(item) = report.category(category).and_then(|c| c.item(&key)) else {
                continue;
            };
            amount_on_candidate += item.amount;
            hit_bettors.extend(item.bettors.iter().map(String::as_str));
            hits.push(OutcomeHit {
                category,
                key,
                amount: item.amount,
                count: item.count,
                bettor_count: item.bettor_count(),
            });
        }

        PreviewSummary {
            session,
            candidate: candidate.to_string(),
            candidate_kind: Self::classify_candidate(candidate),
            total_amount: report.grand_total(),
            amount_on_candidate,
            bettor_count: report.bettor_count(),
            bettor_count_on_candidate: hit_bettors.len(),
            hits,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
