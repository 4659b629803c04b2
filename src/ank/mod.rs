//! Ank grouping.
//!
//! The ank of a pana is the sum of its digits mod 10. It is both the
//! display grouping key for patti tables and a component of the round's
//! encoded result. The canonical single/double patti charts are built once
//! on first use and shared as `'static` lookup tables keyed by ank digit.

pub mod panel;

use once_cell::sync::Lazy;

use crate::classify::{classify_patti, digits, PattiKind};

/// Ank of a 3-digit string, or `None` if it is not exactly three digits.
pub fn ank(s: &str) -> Option<u8> {
    let [a, b, c] = digits::<3>(s)?;
    Some((a + b + c) % 10)
}

/// Chart ordering treats zero as the largest digit (`190`, `550`, `100`).
fn rank_to_digit(rank: u8) -> u8 {
    rank % 10
}

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Panas partitioned into ten groups by ank.
#[derive(Debug, Clone)]
pub struct AnkTable {
    groups: [Vec<String>; 10],
}

impl AnkTable {
    fn from_members<I: IntoIterator<Item = String>>(members: I) -> Self {
        let mut groups: [Vec<String>; 10] = std::array::from_fn(|_| Vec::new());
        for m in members {
            if let Some(a) = ank(&m) {
                groups[a as usize].push(m);
            }
        }
        Self { groups }
    }

    /// Members whose ank is `ank_digit`. Empty for digits above 9.
    pub fn group(&self, ank_digit: u8) -> &[String] {
        self.groups
            .get(ank_digit as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(ank, members)` for ank 0 through 9.
    pub fn groups(&self) -> impl Iterator<Item = (u8, &[String])> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (i as u8, g.as_slice()))
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pana: &str) -> bool {
        match ank(pana) {
            Some(a) => self.group(a).iter().any(|m| m == pana),
            None => false,
        }
    }
}

/// Three distinct digits, ascending with zero last: 12 per ank, 120 total.
fn build_single_patti() -> AnkTable {
    let mut members = Vec::with_capacity(120);
    for a in 1..=10u8 {
        for b in (a + 1)..=10 {
            for c in (b + 1)..=10 {
                members.push(format!(
                    "{}{}{}",
                    rank_to_digit(a),
                    rank_to_digit(b),
                    rank_to_digit(c)
                ));
            }
        }
    }
    AnkTable::from_members(members)
}

/// Every `000`–`999` that passes the canonical double rule.
fn build_double_patti() -> AnkTable {
    AnkTable::from_members(
        (0..1000)
            .map(|n| format!("{n:03}"))
            .filter(|s| classify_patti(s) == Some(PattiKind::Double)),
    )
}

fn build_triple_patti() -> AnkTable {
    AnkTable::from_members((0..10).map(|d| format!("{d}{d}{d}")))
}

static SINGLE_PATTI: Lazy<AnkTable> = Lazy::new(build_single_patti);
static DOUBLE_PATTI: Lazy<AnkTable> = Lazy::new(build_double_patti);
static TRIPLE_PATTI: Lazy<AnkTable> = Lazy::new(build_triple_patti);

pub fn single_patti_table() -> &'static AnkTable {
    &SINGLE_PATTI
}

pub fn double_patti_table() -> &'static AnkTable {
    &DOUBLE_PATTI
}

pub fn triple_patti_table() -> &'static AnkTable {
    &TRIPLE_PATTI
}

/// Canonical chart for a patti kind.
pub fn table_for(kind: PattiKind) -> &'static AnkTable {
    match kind {
        PattiKind::Single => single_patti_table(),
        PattiKind::Double => double_patti_table(),
        PattiKind::Triple => triple_patti_table(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
