//! The budget projection matrix of one fiscal year.
//!
//! The matrix owns the income and expense categories and the running monthly
//! sums per kind. Net figures are always derived (income - expense) and yearly
//! figures are the sum of the monthly ones, so every aggregate stays a
//! function of the cells:
//!
//! - `monthly_totals(m).income == Σ income[*].month(m)`
//! - `monthly_totals(m).expense == Σ expense[*].month(m)`
//! - `monthly_totals(m).net == income - expense`
//! - `yearly_totals().x == Σ_m monthly_totals(m).x`
//!
//! Cell edits adjust the running sums by the delta between the previous and
//! the new amount, so an edit costs the same regardless of how many
//! categories the year has. [`BudgetMatrix::recompute`] rebuilds everything
//! from the cells and yields the same totals.
use crate::{
    BudgetCategory, CategoryKind, EngineError, MoneyCents, Month, ResultEngine,
    cell::{CellParse, InvalidCellPolicy, parse_cell},
};

/// Income, expense and net amounts for a month or a whole year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
    pub net: MoneyCents,
}

impl Totals {
    fn new(income: MoneyCents, expense: MoneyCents) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

/// A `(category, month, amount)` triple to persist with a bulk save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectionRecord {
    pub category_id: i64,
    pub month: Month,
    pub amount: MoneyCents,
}

fn is_valid_cell(amount: MoneyCents) -> bool {
    !amount.is_negative() && amount <= MoneyCents::MAX_CELL
}

/// Sum of twelve monthly sums, `None` when it does not fit.
fn yearly_sum(sums: &[MoneyCents; 12]) -> Option<MoneyCents> {
    sums.iter()
        .try_fold(MoneyCents::ZERO, |total, sum| total.checked_add(*sum))
}

fn totals_overflow() -> EngineError {
    EngineError::InvalidAmount("budget totals out of range".to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetMatrix {
    year: i32,
    income: Vec<BudgetCategory>,
    expense: Vec<BudgetCategory>,
    monthly_income: [MoneyCents; 12],
    monthly_expense: [MoneyCents; 12],
    revision: Option<u64>,
}

impl BudgetMatrix {
    /// Creates an empty matrix for `year`.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            income: Vec::new(),
            expense: Vec::new(),
            monthly_income: [MoneyCents::ZERO; 12],
            monthly_expense: [MoneyCents::ZERO; 12],
            revision: None,
        }
    }

    /// Builds a matrix from categories in display order, then recomputes
    /// every derived amount.
    pub fn from_categories(
        year: i32,
        categories: impl IntoIterator<Item = BudgetCategory>,
    ) -> ResultEngine<Self> {
        let mut matrix = Self::new(year);
        for category in categories {
            matrix.push_category(category)?;
        }
        matrix.recompute()?;
        Ok(matrix)
    }

    #[must_use]
    pub fn with_revision(mut self, revision: Option<u64>) -> Self {
        self.revision = revision;
        self
    }

    /// Appends a category. Ids are unique across both kinds because saved
    /// projections only carry the id.
    pub fn add_category(&mut self, category: BudgetCategory) -> ResultEngine<()> {
        let mut sums = *self.running(category.kind());
        for (sum, amount) in sums.iter_mut().zip(category.months()) {
            *sum = sum.checked_add(*amount).ok_or_else(totals_overflow)?;
        }
        yearly_sum(&sums).ok_or_else(totals_overflow)?;

        let kind = category.kind();
        self.push_category(category)?;
        *self.running_mut(kind) = sums;
        Ok(())
    }

    fn push_category(&mut self, category: BudgetCategory) -> ResultEngine<()> {
        if self.category(category.id).is_some() {
            return Err(EngineError::DuplicateCategory(category.id));
        }
        if let Some(amount) = category.months().iter().find(|a| !is_valid_cell(**a)) {
            return Err(EngineError::InvalidAmount(format!(
                "category {}: {amount}",
                category.id
            )));
        }
        match category.kind() {
            CategoryKind::Income => self.income.push(category),
            CategoryKind::Expense => self.expense.push(category),
        }
        Ok(())
    }

    fn running(&self, kind: CategoryKind) -> &[MoneyCents; 12] {
        match kind {
            CategoryKind::Income => &self.monthly_income,
            CategoryKind::Expense => &self.monthly_expense,
        }
    }

    fn running_mut(&mut self, kind: CategoryKind) -> &mut [MoneyCents; 12] {
        match kind {
            CategoryKind::Income => &mut self.monthly_income,
            CategoryKind::Expense => &mut self.monthly_expense,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn income_categories(&self) -> &[BudgetCategory] {
        &self.income
    }

    pub fn expense_categories(&self) -> &[BudgetCategory] {
        &self.expense
    }

    pub fn categories(&self, kind: CategoryKind) -> &[BudgetCategory] {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
        }
    }

    pub fn category(&self, id: i64) -> Option<&BudgetCategory> {
        self.income
            .iter()
            .chain(self.expense.iter())
            .find(|category| category.id == id)
    }

    pub fn monthly_totals(&self, month: Month) -> Totals {
        let idx = month.index();
        Totals::new(self.monthly_income[idx], self.monthly_expense[idx])
    }

    pub fn yearly_totals(&self) -> Totals {
        Totals::new(
            self.monthly_income.iter().sum(),
            self.monthly_expense.iter().sum(),
        )
    }

    /// Parses `raw` and writes it into the cell `(category_id, month)`.
    ///
    /// `kind` must match the category. With [`InvalidCellPolicy::Reject`]
    /// suspicious input fails with [`EngineError::InvalidAmount`] and nothing
    /// changes; otherwise the coerced amount is written and the parse result
    /// (with its diagnostic) is returned.
    pub fn set_cell(
        &mut self,
        category_id: i64,
        month: u8,
        kind: CategoryKind,
        raw: &str,
        policy: InvalidCellPolicy,
    ) -> ResultEngine<CellParse> {
        let month = Month::new(month)?;
        let parsed = parse_cell(raw);
        if policy == InvalidCellPolicy::Reject && parsed.is_suspicious() {
            let reason = parsed
                .diagnostic
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(EngineError::InvalidAmount(format!("{raw:?}: {reason}")));
        }

        self.set_amount(category_id, month, kind, parsed.amount)?;
        Ok(parsed)
    }

    /// Writes an already parsed amount into a cell.
    ///
    /// The monthly and yearly sums are checked before anything changes, so a
    /// refused amount leaves the matrix as it was.
    pub fn set_amount(
        &mut self,
        category_id: i64,
        month: Month,
        kind: CategoryKind,
        amount: MoneyCents,
    ) -> ResultEngine<()> {
        if !is_valid_cell(amount) {
            return Err(EngineError::InvalidAmount(format!(
                "{amount} is not a valid cell amount"
            )));
        }

        let Some(previous) = self
            .categories(kind)
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.month(month))
        else {
            return Err(if self.category(category_id).is_some() {
                EngineError::KindMismatch {
                    id: category_id,
                    expected: kind.as_str(),
                }
            } else {
                EngineError::UnknownCategory(category_id)
            });
        };

        let mut sums = *self.running(kind);
        let idx = month.index();
        sums[idx] = sums[idx]
            .checked_sub(previous)
            .and_then(|sum| sum.checked_add(amount))
            .ok_or_else(totals_overflow)?;
        yearly_sum(&sums).ok_or_else(totals_overflow)?;

        let categories = match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
        };
        let category = categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(EngineError::UnknownCategory(category_id))?;
        category.set_month(month, amount);
        *self.running_mut(kind) = sums;
        Ok(())
    }

    /// Rebuilds every derived amount from the cells.
    pub fn recompute(&mut self) -> ResultEngine<()> {
        let income = Self::column_sums(&mut self.income)?;
        let expense = Self::column_sums(&mut self.expense)?;
        self.monthly_income = income;
        self.monthly_expense = expense;
        Ok(())
    }

    fn column_sums(categories: &mut [BudgetCategory]) -> ResultEngine<[MoneyCents; 12]> {
        let mut sums = [MoneyCents::ZERO; 12];
        for category in categories {
            category.recompute_total();
            for (sum, amount) in sums.iter_mut().zip(category.months()) {
                *sum = sum.checked_add(*amount).ok_or_else(totals_overflow)?;
            }
        }
        yearly_sum(&sums).ok_or_else(totals_overflow)?;
        Ok(sums)
    }

    /// Flattens the matrix into the records to persist: income categories
    /// first, then expense, months in calendar order.
    ///
    /// Only amounts greater than zero are emitted, so a cell cleared to 0 is
    /// removed from the server side representation instead of stored as 0.
    pub fn projections(&self) -> Vec<ProjectionRecord> {
        self.income
            .iter()
            .chain(self.expense.iter())
            .flat_map(|category| {
                Month::all().filter_map(move |month| {
                    let amount = category.month(month);
                    amount.is_positive().then_some(ProjectionRecord {
                        category_id: category.id,
                        month,
                        amount,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn matrix() -> BudgetMatrix {
        BudgetMatrix::from_categories(
            2025,
            [
                BudgetCategory::new(1, "Eventos", CategoryKind::Income),
                BudgetCategory::new(2, "Concesiones", CategoryKind::Income),
                BudgetCategory::new(10, "Nómina", CategoryKind::Expense),
            ],
        )
        .unwrap()
    }

    #[test]
    fn set_cell_updates_category_and_aggregates() {
        let mut matrix = matrix();
        matrix
            .set_cell(1, 1, CategoryKind::Income, "1,000", InvalidCellPolicy::Coerce)
            .unwrap();
        matrix
            .set_cell(2, 1, CategoryKind::Income, "250.50", InvalidCellPolicy::Coerce)
            .unwrap();
        matrix
            .set_cell(10, 1, CategoryKind::Expense, "400", InvalidCellPolicy::Coerce)
            .unwrap();

        let january = matrix.monthly_totals(month(1));
        assert_eq!(january.income, MoneyCents::new(125_050));
        assert_eq!(january.expense, MoneyCents::new(40_000));
        assert_eq!(january.net, MoneyCents::new(85_050));
        assert_eq!(matrix.yearly_totals(), january);
        assert_eq!(
            matrix.category(1).unwrap().total_year(),
            MoneyCents::new(100_000)
        );
    }

    #[test]
    fn overwrite_adjusts_running_sums() {
        let mut matrix = matrix();
        matrix
            .set_cell(1, 6, CategoryKind::Income, "900", InvalidCellPolicy::Coerce)
            .unwrap();
        matrix
            .set_cell(1, 6, CategoryKind::Income, "100", InvalidCellPolicy::Coerce)
            .unwrap();

        assert_eq!(matrix.monthly_totals(month(6)).income, MoneyCents::new(10_000));
        assert_eq!(matrix.yearly_totals().income, MoneyCents::new(10_000));
    }

    #[test]
    fn unknown_category_and_kind_mismatch() {
        let mut matrix = matrix();
        assert_eq!(
            matrix.set_cell(99, 1, CategoryKind::Income, "1", InvalidCellPolicy::Coerce),
            Err(EngineError::UnknownCategory(99))
        );
        assert_eq!(
            matrix.set_cell(10, 1, CategoryKind::Income, "1", InvalidCellPolicy::Coerce),
            Err(EngineError::KindMismatch {
                id: 10,
                expected: "income"
            })
        );
        assert_eq!(
            matrix.set_cell(1, 13, CategoryKind::Income, "1", InvalidCellPolicy::Coerce),
            Err(EngineError::InvalidMonth(13))
        );
    }

    #[test]
    fn reject_policy_leaves_cell_untouched() {
        let mut matrix = matrix();
        matrix
            .set_cell(1, 2, CategoryKind::Income, "300", InvalidCellPolicy::Reject)
            .unwrap();

        let err = matrix
            .set_cell(1, 2, CategoryKind::Income, "3oo", InvalidCellPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        assert_eq!(matrix.category(1).unwrap().month(month(2)), MoneyCents::new(30_000));

        // Clearing a cell is never suspicious.
        matrix
            .set_cell(1, 2, CategoryKind::Income, "", InvalidCellPolicy::Reject)
            .unwrap();
        assert_eq!(matrix.category(1).unwrap().month(month(2)), MoneyCents::ZERO);
    }

    #[test]
    fn duplicate_ids_are_refused_across_kinds() {
        let mut matrix = matrix();
        let err = matrix
            .add_category(BudgetCategory::new(1, "Copia", CategoryKind::Expense))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateCategory(1));
    }

    #[test]
    fn add_category_folds_existing_amounts_into_totals() {
        let mut matrix = matrix();
        matrix
            .add_category(
                BudgetCategory::new(11, "Mantenimiento", CategoryKind::Expense)
                    .with_month(month(3), MoneyCents::new(7_500)),
            )
            .unwrap();
        assert_eq!(matrix.monthly_totals(month(3)).expense, MoneyCents::new(7_500));
        assert_eq!(matrix.yearly_totals().net, MoneyCents::new(-7_500));
    }

    #[test]
    fn oversized_amounts_never_reach_the_sums() {
        let mut matrix = matrix();
        for category_id in [1, 2] {
            let parsed = matrix
                .set_cell(
                    category_id,
                    4,
                    CategoryKind::Income,
                    "90,000,000,000,000,000",
                    InvalidCellPolicy::Coerce,
                )
                .unwrap();
            assert_eq!(parsed.amount, MoneyCents::ZERO);
        }
        assert_eq!(matrix.yearly_totals(), Totals::default());

        let err = matrix
            .set_cell(
                1,
                4,
                CategoryKind::Income,
                "90,000,000,000,000,000",
                InvalidCellPolicy::Reject,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn set_amount_refuses_cells_above_the_limit() {
        let mut matrix = matrix();
        matrix
            .set_amount(1, month(5), CategoryKind::Income, MoneyCents::MAX_CELL)
            .unwrap();
        let before = matrix.clone();

        let err = matrix
            .set_amount(2, month(5), CategoryKind::Income, MoneyCents::new(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        assert_eq!(matrix, before);
        assert_eq!(matrix.yearly_totals().income, MoneyCents::MAX_CELL);
    }

    #[test]
    fn categories_with_oversized_cells_are_refused() {
        let mut matrix = matrix();
        let err = matrix
            .add_category(
                BudgetCategory::new(12, "Desbordada", CategoryKind::Expense)
                    .with_month(month(1), MoneyCents::new(i64::MAX)),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        assert!(matrix.category(12).is_none());
        assert_eq!(matrix.yearly_totals(), Totals::default());
    }

    #[test]
    fn projections_skip_zero_cells() {
        let mut matrix = matrix();
        matrix
            .set_cell(1, 1, CategoryKind::Income, "500", InvalidCellPolicy::Coerce)
            .unwrap();
        matrix
            .set_cell(1, 2, CategoryKind::Income, "0", InvalidCellPolicy::Coerce)
            .unwrap();

        assert_eq!(
            matrix.projections(),
            vec![ProjectionRecord {
                category_id: 1,
                month: month(1),
                amount: MoneyCents::new(50_000),
            }]
        );
    }
}
