//! Operator desk — the thin caller around the pure engine.
//!
//! Loads a round and its wagers from a [`RoundStore`], runs the engine,
//! and saves the round back after a successful transition. Unknown round
//! ids surface as `RoundNotFound` and are never retried.

use tracing::{info, warn};

use crate::exposure::{
    ExposureAggregator, ExposurePreviewService, ExposureReport, PreviewSummary, SessionExposure,
};
use crate::round::RoundStateEngine;
use crate::storage::RoundStore;
use crate::types::{MatkaError, Round, Session};

pub struct OperatorDesk<S: RoundStore> {
    store: S,
    engine: RoundStateEngine,
}

impl<S: RoundStore> OperatorDesk<S> {
    pub fn new(store: S, engine: RoundStateEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn round(&self, round_id: &str) -> Result<Round, MatkaError> {
        self.store.load_round(round_id)
    }

    /// Exposure for a round, one session or both.
    pub fn report(&self, round_id: &str, session: Option<Session>) -> Result<ExposureReport, MatkaError> {
        let wagers = self.store.wagers_for(round_id)?;
        Ok(ExposureAggregator::aggregate(&wagers, session))
    }

    pub fn session_report(&self, round_id: &str) -> Result<SessionExposure, MatkaError> {
        let wagers = self.store.wagers_for(round_id)?;
        Ok(ExposureAggregator::aggregate_by_session(&wagers))
    }

    /// Preview a declaration without committing it.
    pub fn preview(
        &self,
        round_id: &str,
        session: Session,
        candidate: &str,
    ) -> Result<PreviewSummary, MatkaError> {
        let round = self.store.load_round(round_id)?;
        let wagers = self.store.wagers_for(round_id)?;
        Ok(ExposurePreviewService::preview(&round, session, candidate, &wagers))
    }

    pub fn declare_open(&mut self, round_id: &str, opening: &str) -> Result<Round, MatkaError> {
        let mut round = self.store.load_round(round_id)?;
        self.engine.declare_open(&mut round, opening)?;
        self.commit(round)
    }

    pub fn declare_close(&mut self, round_id: &str, closing: &str) -> Result<Round, MatkaError> {
        let mut round = self.store.load_round(round_id)?;
        self.engine.declare_close(&mut round, closing)?;
        self.commit(round)
    }

    pub fn clear_result(&mut self, round_id: &str) -> Result<Round, MatkaError> {
        let mut round = self.store.load_round(round_id)?;
        self.engine.clear_result(&mut round);
        self.commit(round)
    }

    fn commit(&mut self, round: Round) -> Result<Round, MatkaError> {
        if let Err(e) = self.store.save_round(&round) {
            warn!(round_id = %round.id, error = %e, "Failed to save round");
            return Err(e);
        }
        info!(round_id = %round.id, result = %round.display_result, "Round saved");
        Ok(round)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
