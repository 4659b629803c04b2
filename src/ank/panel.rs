//! Display panels built from an exposure report.
//!
//! Patti categories are laid out as ten ank groups listing every canonical
//! chart member, including those nobody bet on. A number that classifies
//! into the category but has no chart slot (e.g. the leading-zero single
//! patti `018`) goes to its group's overflow row, so group totals always
//! add up to the category total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ank, table_for};
use crate::classify::PattiKind;
use crate::exposure::CategoryExposure;

/// One number on a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelCell {
    pub number: String,
    pub amount: Decimal,
    pub count: u64,
}

impl PanelCell {
    fn from_category(cat: &CategoryExposure, number: &str) -> Self {
        let item = cat.item(number);
        PanelCell {
            number: number.to_string(),
            amount: item.map(|i| i.amount).unwrap_or(Decimal::ZERO),
            count: item.map(|i| i.count).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnkGroupPanel {
    pub ank: u8,
    pub total_amount: Decimal,
    pub total_count: u64,
    /// Chart members in chart order.
    pub cells: Vec<PanelCell>,
    /// Bet numbers outside the chart, in key order.
    pub overflow: Vec<PanelCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnkPanel {
    pub kind: PattiKind,
    pub groups: Vec<AnkGroupPanel>,
}

impl AnkPanel {
    /// Lay out a patti category by ank.
    pub fn build(kind: PattiKind, cat: &CategoryExposure) -> Self {
        let table = table_for(kind);
        let mut groups: Vec<AnkGroupPanel> = table
            .groups()
            .map(|(a, members)| AnkGroupPanel {
                ank: a,
                total_amount: Decimal::ZERO,
                total_count: 0,
                cells: members
                    .iter()
                    .map(|m| PanelCell::from_category(cat, m))
                    .collect(),
                overflow: Vec::new(),
            })
            .collect();

        for number in cat.items.keys() {
            if table.contains(number) {
                continue;
            }
            if let Some(group) = ank(number).and_then(|a| groups.get_mut(a as usize)) {
                group.overflow.push(PanelCell::from_category(cat, number));
            }
        }

        for group in &mut groups {
            let cells = group.cells.iter().chain(group.overflow.iter());
            let (amount, count) = cells.fold((Decimal::ZERO, 0), |(a, c), cell| {
                (a + cell.amount, c + cell.count)
            });
            group.total_amount = amount;
            group.total_count = count;
        }

        Self { kind, groups }
    }

    pub fn group(&self, ank_digit: u8) -> Option<&AnkGroupPanel> {
        self.groups.iter().find(|g| g.ank == ank_digit)
    }

    pub fn total_amount(&self) -> Decimal {
        self.groups.iter().map(|g| g.total_amount).sum()
    }

    /// Number of cells across all overflow rows.
    pub fn overflow_len(&self) -> usize {
        self.groups.iter().map(|g| g.overflow.len()).sum()
    }
}

/// Single digits `0`–`9`.
pub fn digit_panel(cat: &CategoryExposure) -> Vec<PanelCell> {
    (0..10)
        .map(|d| PanelCell::from_category(cat, &d.to_string()))
        .collect()
}

/// Jodi `00`–`99` as ten rows keyed by the open digit.
pub fn jodi_grid(cat: &CategoryExposure) -> Vec<Vec<PanelCell>> {
    (0..10)
        .map(|open| {
            (0..10)
                .map(|close| PanelCell::from_category(cat, &format!("{open}{close}")))
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
