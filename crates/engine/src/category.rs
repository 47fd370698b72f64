//! The module contains the representation of a budget category.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MoneyCents, Month};

/// Whether a category plans money coming in or going out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    /// Returns the canonical string used in CSV files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A budget line planned across the twelve months of a fiscal year.
///
/// `total_year` is kept equal to the sum of the months: every write goes
/// through [`BudgetCategory::set_month`], which adjusts it by the delta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetCategory {
    pub id: i64,
    pub name: String,
    /// Display only swatch reference (e.g. `#22c55e`).
    pub color: Option<String>,
    kind: CategoryKind,
    months: [MoneyCents; 12],
    total_year: MoneyCents,
}

impl BudgetCategory {
    pub fn new(id: i64, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            kind,
            months: [MoneyCents::ZERO; 12],
            total_year: MoneyCents::ZERO,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder style month setter, used when assembling categories from
    /// server payloads.
    #[must_use]
    pub fn with_month(mut self, month: Month, amount: MoneyCents) -> Self {
        self.set_month(month, amount);
        self
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn month(&self, month: Month) -> MoneyCents {
        self.months[month.index()]
    }

    /// Amounts in calendar order.
    pub fn months(&self) -> &[MoneyCents; 12] {
        &self.months
    }

    pub fn total_year(&self) -> MoneyCents {
        self.total_year
    }

    /// Sets a month and returns the previous amount.
    pub fn set_month(&mut self, month: Month, amount: MoneyCents) -> MoneyCents {
        let previous = std::mem::replace(&mut self.months[month.index()], amount);
        self.total_year += amount - previous;
        previous
    }

    /// Rebuilds `total_year` from the months.
    pub fn recompute_total(&mut self) {
        self.total_year = self.months.iter().sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    #[test]
    fn set_month_keeps_total_in_sync() {
        let mut category = BudgetCategory::new(1, "Eventos", CategoryKind::Income);
        assert_eq!(category.set_month(month(1), MoneyCents::new(500)), MoneyCents::ZERO);
        category.set_month(month(2), MoneyCents::new(250));
        assert_eq!(category.total_year(), MoneyCents::new(750));

        let previous = category.set_month(month(1), MoneyCents::new(100));
        assert_eq!(previous, MoneyCents::new(500));
        assert_eq!(category.total_year(), MoneyCents::new(350));
        assert_eq!(category.month(month(3)), MoneyCents::ZERO);
    }

    #[test]
    fn recompute_total_matches_incremental_total() {
        let mut category = BudgetCategory::new(7, "Nómina", CategoryKind::Expense)
            .with_month(month(4), MoneyCents::new(40_000))
            .with_month(month(12), MoneyCents::new(1));
        let incremental = category.total_year();
        category.recompute_total();
        assert_eq!(category.total_year(), incremental);
        assert_eq!(incremental, MoneyCents::new(40_001));
    }
}
