//! Mapping between wire types and engine types.

use api_types::projection::{self as wire, CategoryProjection};
use engine::{BudgetCategory, BudgetMatrix, CategoryKind, EngineError, MoneyCents, Month};

fn amount_from_wire(category_id: i64, value: f64) -> Result<MoneyCents, EngineError> {
    match MoneyCents::from_major(value) {
        Some(amount) if !amount.is_negative() => Ok(amount),
        _ => Err(EngineError::InvalidAmount(format!(
            "category {category_id}: {value}"
        ))),
    }
}

fn category_from_wire(
    projection: CategoryProjection,
    kind: CategoryKind,
) -> Result<BudgetCategory, EngineError> {
    let mut category = BudgetCategory::new(projection.category_id, projection.category_name, kind);
    category.color = projection.category_color;
    for (month, value) in projection.months {
        let month = Month::new(month)?;
        category.set_month(month, amount_from_wire(category.id, value)?);
    }
    Ok(category)
}

/// Builds the engine matrix from a server payload.
///
/// Totals sent by the server are ignored and recomputed from the cells.
pub fn matrix_from_wire(matrix: wire::BudgetMatrix) -> Result<BudgetMatrix, EngineError> {
    let income = matrix
        .income_categories
        .into_iter()
        .map(|c| category_from_wire(c, CategoryKind::Income));
    let expense = matrix
        .expense_categories
        .into_iter()
        .map(|c| category_from_wire(c, CategoryKind::Expense));
    let categories = income.chain(expense).collect::<Result<Vec<_>, _>>()?;

    Ok(BudgetMatrix::from_categories(matrix.year, categories)?.with_revision(matrix.revision))
}

/// Request body for the bulk save of `matrix`: only cells greater than zero.
pub fn bulk_save_from_matrix(matrix: &BudgetMatrix) -> wire::BulkSave {
    let projections = matrix
        .projections()
        .into_iter()
        .map(|record| wire::Projection {
            category_id: record.category_id,
            month: record.month.number(),
            projected_amount: record.amount.to_major(),
        })
        .collect();

    wire::BulkSave {
        year: matrix.year(),
        projections,
        expected_revision: matrix.revision(),
    }
}
