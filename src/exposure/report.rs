//! Exposure report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{GameType, Session};

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// Money and bettors riding on one number or key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemExposure {
    pub amount: Decimal,
    /// Number of wagers.
    pub count: u64,
    /// Distinct bettor ids.
    pub bettors: BTreeSet<String>,
}

impl ItemExposure {
    pub fn bettor_count(&self) -> usize {
        self.bettors.len()
    }

    fn add(&mut self, amount: Decimal, bettor_id: &str) {
        self.amount += amount;
        self.count += 1;
        if !self.bettors.contains(bettor_id) {
            self.bettors.insert(bettor_id.to_string());
        }
    }
}

/// Totals for one category plus its per-key buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryExposure {
    pub total_amount: Decimal,
    pub total_count: u64,
    pub items: BTreeMap<String, ItemExposure>,
}

impl CategoryExposure {
    pub(crate) fn record(&mut self, key: String, amount: Decimal, bettor_id: &str) {
        self.total_amount += amount;
        self.total_count += 1;
        self.items.entry(key).or_default().add(amount, bettor_id);
    }

    pub fn item(&self, key: &str) -> Option<&ItemExposure> {
        self.items.get(key)
    }

    /// Amount on `key`, zero if nobody bet it.
    pub fn amount_on(&self, key: &str) -> Decimal {
        self.item(key).map(|i| i.amount).unwrap_or(Decimal::ZERO)
    }

    /// Distinct bettors across all keys of this category.
    pub fn bettor_count(&self) -> usize {
        self.items
            .values()
            .flat_map(|i| i.bettors.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

// ---------------------------------------------------------------------------
// Exclusions
// ---------------------------------------------------------------------------

/// Why a wager was left out of the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Label did not parse to a category (or a generic panna label whose
    /// number is not a valid patti).
    UnknownLabel,
    /// Number is malformed for its category.
    InvalidNumber,
    /// Amount is zero or negative.
    NonPositiveAmount,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::UnknownLabel => write!(f, "unknown label"),
            ExclusionReason::InvalidNumber => write!(f, "invalid number"),
            ExclusionReason::NonPositiveAmount => write!(f, "non-positive amount"),
        }
    }
}

/// Data-quality diagnostics for excluded wagers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExclusionSummary {
    pub count: u64,
    pub amount: Decimal,
    pub by_reason: BTreeMap<ExclusionReason, u64>,
    pub wager_ids: Vec<String>,
}

impl ExclusionSummary {
    pub(crate) fn record(&mut self, wager_id: &str, amount: Decimal, reason: ExclusionReason) {
        self.count += 1;
        self.amount += amount;
        *self.by_reason.entry(reason).or_insert(0) += 1;
        self.wager_ids.push(wager_id.to_string());
    }

    pub fn count_for(&self, reason: ExclusionReason) -> u64 {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Exposure per category for one round, optionally one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    /// `None` when the report spans both sessions.
    pub session: Option<Session>,
    pub categories: BTreeMap<GameType, CategoryExposure>,
    pub excluded: ExclusionSummary,
}

impl ExposureReport {
    /// A report with every category present and zeroed.
    pub fn empty(session: Option<Session>) -> Self {
        Self {
            session,
            categories: GameType::ALL
                .iter()
                .map(|g| (*g, CategoryExposure::default()))
                .collect(),
            excluded: ExclusionSummary::default(),
        }
    }

    pub fn category(&self, game: GameType) -> Option<&CategoryExposure> {
        self.categories.get(&game)
    }

    pub(crate) fn category_mut(&mut self, game: GameType) -> &mut CategoryExposure {
        self.categories.entry(game).or_default()
    }

    /// Sum of every category's total amount.
    pub fn grand_total(&self) -> Decimal {
        self.categories.values().map(|c| c.total_amount).sum()
    }

    /// Number of wagers included across all categories.
    pub fn total_count(&self) -> u64 {
        self.categories.values().map(|c| c.total_count).sum()
    }

    /// Distinct bettors with at least one included wager.
    pub fn bettor_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|c| c.items.values())
            .flat_map(|i| i.bettors.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The `n` keys of `game` carrying the most money. Ties go to the
    /// higher wager count, then the lower key.
    pub fn top_items(&self, game: GameType, n: usize) -> Vec<(&str, &ItemExposure)> {
        let Some(cat) = self.category(game) else {
            return Vec::new();
        };
        let mut items: Vec<(&str, &ItemExposure)> =
            cat.items.iter().map(|(k, v)| (k.as_str(), v)).collect();
        items.sort_by(|(ka, a), (kb, b)| {
            b.amount
                .cmp(&a.amount)
                .then(b.count.cmp(&a.count))
                .then(ka.cmp(kb))
        });
        items.truncate(n);
        items
    }
}

impl fmt::Display for ExposureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.session {
            Some(s) => s.to_string(),
            None => "ALL".to_string(),
        };
        write!(
            f,
            "[{scope}] total={:.2} wagers={} bettors={} excluded={} ({:.2})",
            self.grand_total(),
            self.total_count(),
            self.bettor_count(),
            self.excluded.count,
            self.excluded.amount,
        )
    }
}

/// Open and close reports built from one pass over the wagers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExposure {
    pub open: ExposureReport,
    pub close: ExposureReport,
}

impl SessionExposure {
    pub fn get(&self, session: Session) -> &ExposureReport {
        match session {
            Session::Open => &self.open,
            Session::Close => &self.close,
        }
    }

    pub fn grand_total(&self) -> Decimal {
        self.open.grand_total() + self.close.grand_total()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
