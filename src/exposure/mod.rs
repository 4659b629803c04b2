//! Exposure aggregation — folds wagers into per-category, per-key totals.
//!
//! Wagers that fail classification are excluded from every total and
//! counted in [`ExclusionSummary`] instead of raising an error.

pub mod preview;
pub mod report;

pub use preview::{CandidateKind, ExposurePreviewService, OutcomeHit, PreviewSummary};
pub use report::{
    CategoryExposure, ExclusionReason, ExclusionSummary, ExposureReport, ItemExposure,
    SessionExposure,
};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::classify::{bet_key, GameLabel};
use crate::types::{GameType, Session, Wager};

/// Stateless aggregator. Cost is linear in the number of wagers.
pub struct ExposureAggregator;

impl ExposureAggregator {
    /// Resolve a wager to `(category, key)` or the reason it is excluded.
    pub fn classify_wager(wager: &Wager) -> Result<(GameType, String), ExclusionReason> {
        if wager.amount <= Decimal::ZERO {
            return Err(ExclusionReason::NonPositiveAmount);
        }
        let label = GameLabel::parse(&wager.game_type);
        let game = label
            .resolve(&wager.bet_number)
            .ok_or(ExclusionReason::UnknownLabel)?;
        let key = bet_key(game, &wager.bet_number).ok_or(ExclusionReason::InvalidNumber)?;
        Ok((game, key))
    }

    /// Fold `wagers` into a report. With `session` set, wagers for the
    /// other session are skipped entirely (neither counted nor excluded).
    pub fn aggregate(wagers: &[Wager], session: Option<Session>) -> ExposureReport {
        Self::aggregate_iter(wagers, session)
    }

    /// Same as [`aggregate`](Self::aggregate) over any borrowed sequence,
    /// so callers can filter without copying wagers.
    pub fn aggregate_iter<'a>(
        wagers: impl IntoIterator<Item = &'a Wager>,
        session: Option<Session>,
    ) -> ExposureReport {
        let mut report = ExposureReport::empty(session);
        for wager in wagers {
            if session.is_some_and(|s| s != wager.session) {
                continue;
            }
            Self::fold(&mut report, wager);
        }
        Self::log_summary(&report);
        report
    }

    /// Open and close reports in one pass.
    pub fn aggregate_by_session(wagers: &[Wager]) -> SessionExposure {
        let mut open = ExposureReport::empty(Some(Session::Open));
        let mut close = ExposureReport::empty(Some(Session::Close));
        for wager in wagers {
            let target = match wager.session {
                Session::Open => &mut open,
                Session::Close => &mut close,
            };
            Self::fold(target, wager);
        }
        Self::log_summary(&open);
        Self::log_summary(&close);
        SessionExposure { open, close }
    }

    fn fold(report: &mut ExposureReport, wager: &Wager) {
        match Self::classify_wager(wager) {
            Ok((game, key)) => {
                report
                    .category_mut(game)
                    .record(key, wager.amount, &wager.bettor_id);
            }
            Err(reason) => {
                debug!(
                    wager_id = %wager.id,
                    label = %wager.game_type,
                    number = %wager.bet_number,
                    reason = %reason,
                    "Wager excluded from exposure"
                );
                report.excluded.record(&wager.id, wager.amount, reason);
            }
        }
    }

    fn log_summary(report: &ExposureReport) {
        info!(
            session = ?report.session,
            included = report.total_count(),
            excluded = report.excluded.count,
            grand_total = %report.grand_total(),
            "Exposure aggregated"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wager(label: &str, number: &str, amount: Decimal, session: Session, bettor: &str) -> Wager {
        Wager::with_label("R-1", label, number, amount, session, bettor)
    }

    fn sample_wagers() -> Vec<Wager> {
        vec![
            wager("single_digit", "6", dec!(100), Session::Open, "u1"),
            wager("Single Digit", "6", dec!(50), Session::Open, "u2"),
            wager("jodi", "65", dec!(20), Session::Open, "u1"),
            wager("Single Pana", "123", dec!(40), Session::Open, "u3"),
            wager("dp", "112", dec!(30), Session::Close, "u4"),
            wager("panna", "777", dec!(10), Session::Close, "u1"),
            wager("panna", "456", dec!(15), Session::Close, "u5"),
            wager("half_sangam", "123-5", dec!(5), Session::Open, "u2"),
            wager("full sangam", "123-456", dec!(8), Session::Open, "u6"),
            // excluded
            wager("double_patti", "211", dec!(70), Session::Close, "u7"),
            wager("jodi", "6", dec!(9), Session::Open, "u7"),
            wager("red/black", "1", dec!(3), Session::Open, "u8"),
            wager("panna", "121", dec!(4), Session::Open, "u8"),
            wager("single_digit", "1", dec!(0), Session::Open, "u8"),
        ]
    }

    #[test]
    fn test_classify_wager() {
        let w = wager("panna", "112", dec!(5), Session::Open, "u1");
        assert_eq!(
            ExposureAggregator::classify_wager(&w),
            Ok((GameType::DoublePatti, "112".to_string()))
        );
        let w = wager("single_patti", "112", dec!(5), Session::Open, "u1");
        assert_eq!(
            ExposureAggregator::classify_wager(&w),
            Err(ExclusionReason::InvalidNumber)
        );
        let w = wager("jackpot", "112", dec!(5), Session::Open, "u1");
        assert_eq!(
            ExposureAggregator::classify_wager(&w),
            Err(ExclusionReason::UnknownLabel)
        );
        let w = wager("jodi", "11", dec!(-5), Session::Open, "u1");
        assert_eq!(
            ExposureAggregator::classify_wager(&w),
            Err(ExclusionReason::NonPositiveAmount)
        );
    }

    #[test]
    fn test_aggregate_category_totals() {
        let report = ExposureAggregator::aggregate(&sample_wagers(), None);

        let sd = report.category(GameType::SingleDigit).unwrap();
        assert_eq!(sd.total_amount, dec!(150));
        assert_eq!(sd.total_count, 2);
        assert_eq!(sd.item("6").unwrap().bettor_count(), 2);

        let dp = report.category(GameType::DoublePatti).unwrap();
        assert_eq!(dp.total_amount, dec!(30));
        assert!(dp.item("211").is_none());

        let sp = report.category(GameType::SinglePatti).unwrap();
        assert_eq!(sp.total_amount, dec!(55));
        assert_eq!(sp.items.len(), 2);

        let tp = report.category(GameType::TriplePatti).unwrap();
        assert_eq!(tp.amount_on("777"), dec!(10));

        assert_eq!(
            report.category(GameType::HalfSangam).unwrap().amount_on("123-5"),
            dec!(5)
        );
        assert_eq!(
            report.category(GameType::FullSangam).unwrap().amount_on("123-456"),
            dec!(8)
        );
    }

    #[test]
    fn test_aggregate_conservation() {
        let wagers = sample_wagers();
        let report = ExposureAggregator::aggregate(&wagers, None);

        let included: Decimal = wagers
            .iter()
            .filter(|w| ExposureAggregator::classify_wager(w).is_ok())
            .map(|w| w.amount)
            .sum();
        let all: Decimal = wagers.iter().map(|w| w.amount).sum();

        assert_eq!(report.grand_total(), included);
        assert_eq!(report.grand_total(), dec!(278));
        assert_eq!(report.grand_total() + report.excluded.amount, all);
        assert_eq!(report.total_count() + report.excluded.count, wagers.len() as u64);
    }

    #[test]
    fn test_aggregate_iter_over_borrowed_filter() {
        let mut wagers = sample_wagers();
        wagers.push(Wager::new("R-OTHER", GameType::SingleDigit, "1", dec!(500), Session::Open, "u9"));

        let scoped = wagers.iter().filter(|w| w.round_id != "R-OTHER");
        let report = ExposureAggregator::aggregate_iter(scoped, None);
        let reference = ExposureAggregator::aggregate(&sample_wagers(), None);

        assert_eq!(report.grand_total(), reference.grand_total());
        assert_eq!(report.categories, reference.categories);
        assert_eq!(report.excluded.count, reference.excluded.count);
    }

    #[test]
    fn test_aggregate_exclusion_diagnostics() {
        let report = ExposureAggregator::aggregate(&sample_wagers(), None);
        assert_eq!(report.excluded.count, 5);
        assert_eq!(report.excluded.count_for(ExclusionReason::InvalidNumber), 2);
        assert_eq!(report.excluded.count_for(ExclusionReason::UnknownLabel), 2);
        assert_eq!(report.excluded.count_for(ExclusionReason::NonPositiveAmount), 1);
    }

    #[test]
    fn test_aggregate_session_filter() {
        let wagers = sample_wagers();
        let open = ExposureAggregator::aggregate(&wagers, Some(Session::Open));
        let close = ExposureAggregator::aggregate(&wagers, Some(Session::Close));
        let all = ExposureAggregator::aggregate(&wagers, None);

        assert_eq!(open.session, Some(Session::Open));
        assert_eq!(close.grand_total(), dec!(55));
        assert_eq!(open.grand_total() + close.grand_total(), all.grand_total());
        assert_eq!(open.excluded.count + close.excluded.count, all.excluded.count);
    }

    #[test]
    fn test_aggregate_by_session_matches_filtered() {
        let wagers = sample_wagers();
        let split = ExposureAggregator::aggregate_by_session(&wagers);
        assert_eq!(split.open, ExposureAggregator::aggregate(&wagers, Some(Session::Open)));
        assert_eq!(split.get(Session::Close), &ExposureAggregator::aggregate(&wagers, Some(Session::Close)));
        assert_eq!(split.grand_total(), dec!(278));
    }

    #[test]
    fn test_leading_zero_single_patti_is_included() {
        let wagers = vec![wager("single_patti", "018", dec!(12), Session::Open, "u1")];
        let report = ExposureAggregator::aggregate(&wagers, None);
        assert_eq!(
            report.category(GameType::SinglePatti).unwrap().amount_on("018"),
            dec!(12)
        );
        assert_eq!(report.excluded.count, 0);
    }

    #[test]
    fn test_empty_input() {
        let report = ExposureAggregator::aggregate(&[], None);
        assert_eq!(report.grand_total(), Decimal::ZERO);
        assert_eq!(report.categories.len(), 7);
    }
}
