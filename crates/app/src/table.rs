//! Plain text rendering of the matrix and of CSV previews.
use engine::{BudgetCategory, BudgetMatrix, CsvPreview, MoneyCents, Month, Totals};

const NAME_WIDTH: usize = 20;
const AMOUNT_WIDTH: usize = 11;

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut short = name.chars().take(width - 1).collect::<String>();
    short.push('…');
    short
}

fn row(out: &mut String, label: &str, amounts: impl IntoIterator<Item = MoneyCents>) {
    out.push_str(&format!("{:<NAME_WIDTH$}", truncate(label, NAME_WIDTH)));
    for amount in amounts {
        out.push_str(&format!(" {:>AMOUNT_WIDTH$}", amount.grouped()));
    }
    out.push('\n');
}

fn category_row(out: &mut String, category: &BudgetCategory) {
    let label = format!("{} {}", category.id, category.name);
    row(
        out,
        &label,
        category
            .months()
            .iter()
            .copied()
            .chain([category.total_year()]),
    );
}

fn totals_row(out: &mut String, label: &str, matrix: &BudgetMatrix, pick: fn(Totals) -> MoneyCents) {
    row(
        out,
        label,
        Month::all()
            .map(|month| pick(matrix.monthly_totals(month)))
            .chain([pick(matrix.yearly_totals())]),
    );
}

/// Renders the matrix as a fixed width table: categories by kind, one column
/// per month plus the yearly total, and the income/expense/net rows.
pub fn render_matrix(matrix: &BudgetMatrix, modified: bool) -> String {
    let marker = if modified { " (sin guardar)" } else { "" };
    let mut out = format!("Presupuesto {}{marker}\n", matrix.year());

    out.push_str(&format!("{:<NAME_WIDTH$}", ""));
    for month in Month::all() {
        out.push_str(&format!(" {:>AMOUNT_WIDTH$}", month.short_name()));
    }
    out.push_str(&format!(" {:>AMOUNT_WIDTH$}\n", "Total"));

    out.push_str("Ingresos\n");
    for category in matrix.income_categories() {
        category_row(&mut out, category);
    }
    out.push_str("Gastos\n");
    for category in matrix.expense_categories() {
        category_row(&mut out, category);
    }

    out.push('\n');
    totals_row(&mut out, "Total ingresos", matrix, |t| t.income);
    totals_row(&mut out, "Total gastos", matrix, |t| t.expense);
    totals_row(&mut out, "Neto", matrix, |t| t.net);
    out
}

pub fn render_preview(preview: &CsvPreview) -> String {
    if preview.is_empty() {
        return "(archivo vacío)\n".to_string();
    }

    let mut widths = vec![0; preview.width()];
    for record in &preview.rows {
        for (idx, field) in record.iter().enumerate() {
            widths[idx] = widths[idx].max(field.chars().count());
        }
    }

    let mut out = String::new();
    for record in &preview.rows {
        let line = record
            .iter()
            .zip(&widths)
            .map(|(field, width)| format!("{field:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
