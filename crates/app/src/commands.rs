use engine::{CategoryKind, render_csv};
use presupuesto_client::{BudgetApi, Notifier, Planner, preview_file};

use crate::{
    config::{Command, Format},
    editor,
    error::{AppError, Result},
    table,
};

/// A single `CATEGORY_ID:MONTH=AMOUNT` edit. The amount stays raw: the engine
/// parses it with the configured policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub category_id: i64,
    pub month: u8,
    pub raw: String,
}

impl CellEdit {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || AppError::InvalidEdit(input.to_string());
        let (cell, raw) = input.split_once('=').ok_or_else(invalid)?;
        let (category_id, month) = cell.split_once(':').ok_or_else(invalid)?;

        Ok(Self {
            category_id: category_id.trim().parse().map_err(|_| invalid())?,
            month: month.trim().parse().map_err(|_| invalid())?,
            raw: raw.to_string(),
        })
    }
}

/// Kind of the category `id` in the loaded matrix.
pub fn kind_of<A: BudgetApi, N: Notifier>(planner: &Planner<A, N>, id: i64) -> Result<CategoryKind> {
    let matrix = planner.matrix().ok_or(AppError::NotLoaded)?;
    matrix
        .category(id)
        .map(|category| category.kind())
        .ok_or(AppError::Engine(engine::EngineError::UnknownCategory(id)))
}

pub fn apply_edit<A: BudgetApi, N: Notifier>(
    planner: &mut Planner<A, N>,
    edit: &CellEdit,
) -> Result<()> {
    let kind = kind_of(planner, edit.category_id)?;
    let parsed = planner.set_cell(edit.category_id, edit.month, kind, &edit.raw)?;
    tracing::debug!(
        "cell {}/{} = {} ({:?})",
        edit.category_id,
        edit.month,
        parsed.amount,
        parsed.diagnostic
    );
    Ok(())
}

pub fn print_matrix<A: BudgetApi, N: Notifier>(planner: &Planner<A, N>, format: Format) -> Result<()> {
    let matrix = planner.matrix().ok_or(AppError::NotLoaded)?;
    match format {
        Format::Table => print!("{}", table::render_matrix(matrix, planner.state().is_modified())),
        Format::Csv => print!("{}", render_csv(matrix)?),
    }
    Ok(())
}

pub async fn run<A: BudgetApi, N: Notifier>(planner: &mut Planner<A, N>, command: Command) -> Result<()> {
    let year = planner.year();

    match command {
        Command::Show { format } => {
            planner.load(year).await?;
            print_matrix(planner, format)?;
        }
        Command::Set { edits } => {
            let edits = edits
                .iter()
                .map(|edit| CellEdit::parse(edit))
                .collect::<Result<Vec<_>>>()?;
            planner.load(year).await?;
            for edit in &edits {
                apply_edit(planner, edit)?;
            }
            if planner.state().can_save() {
                let sent = planner.save().await?;
                println!("{sent} proyecciones guardadas");
            } else {
                tracing::info!("nothing to save for {year}");
            }
        }
        // Local only: the file is read and shown, the server is not called.
        Command::Preview { file } => {
            let preview = preview_file(&file).await?;
            print!("{}", table::render_preview(&preview));
        }
        Command::Import { file } => {
            planner.load(year).await?;
            let preview = planner.open_import(&file).await?;
            print!("{}", table::render_preview(&preview));
            let imported = planner.confirm_import().await?;
            println!("{imported} registros importados");
        }
        Command::Export => {
            let path = planner.export_csv().await?;
            println!("{}", path.display());
        }
        Command::Edit => {
            planner.load(year).await?;
            editor::run(planner).await?;
        }
    }

    Ok(())
}
