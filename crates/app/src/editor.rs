//! Line editor over the budget page.
//!
//! Reads one command per line from stdin and drives the [`Planner`] through
//! the same steps as the page: edit cells, save, switch year, import with a
//! preview to confirm, export. Failures are reported and the loop goes on.
use std::path::PathBuf;

use presupuesto_client::{BudgetApi, Notifier, Planner};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    commands::{CellEdit, apply_edit, print_matrix},
    config::Format,
    error::{AppError, Result},
    table,
};

const HELP: &str = "\
comandos:
  set ID:MES=IMPORTE ...   escribe celdas (ej. set 3:1=1,500)
  save                     guarda las proyecciones
  show [csv]               muestra la matriz
  year AÑO                 cambia de año (descarta cambios sin guardar)
  reload                   vuelve a cargar el año
  import ARCHIVO           abre la importación con vista previa
  confirm | cancel         confirma o cancela la importación abierta
  export                   descarga el CSV del año
  help                     esta ayuda
  quit                     salir";

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorCommand {
    Set(Vec<CellEdit>),
    Save,
    Show(Format),
    Year(i32),
    Reload,
    Import(PathBuf),
    Confirm,
    Cancel,
    Export,
    Help,
    Quit,
}

impl EditorCommand {
    fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest = words.collect::<Vec<_>>();
        let unknown = || AppError::UnknownCommand(line.trim().to_string());

        let command = match (head, rest.as_slice()) {
            ("set", edits) if !edits.is_empty() => Self::Set(
                edits
                    .iter()
                    .map(|edit| CellEdit::parse(edit))
                    .collect::<Result<_>>()?,
            ),
            ("save", []) => Self::Save,
            ("show", []) => Self::Show(Format::Table),
            ("show", ["csv"]) => Self::Show(Format::Csv),
            ("year", [year]) => Self::Year(year.parse().map_err(|_| unknown())?),
            ("reload", []) => Self::Reload,
            // File names may contain spaces.
            ("import", parts) if !parts.is_empty() => Self::Import(PathBuf::from(parts.join(" "))),
            ("confirm", []) => Self::Confirm,
            ("cancel", []) => Self::Cancel,
            ("export", []) => Self::Export,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => return Err(unknown()),
        };
        Ok(Some(command))
    }
}

/// Runs one command. Returns `false` when the editor should stop.
async fn execute<A: BudgetApi, N: Notifier>(
    planner: &mut Planner<A, N>,
    command: EditorCommand,
) -> Result<bool> {
    match command {
        EditorCommand::Set(edits) => {
            for edit in &edits {
                apply_edit(planner, edit)?;
            }
        }
        EditorCommand::Save => {
            if planner.state().can_save() {
                planner.save().await?;
            } else {
                planner.notifier().info("No hay cambios que guardar");
            }
        }
        EditorCommand::Show(format) => print_matrix(planner, format)?,
        EditorCommand::Year(year) => {
            planner.load(year).await?;
            print_matrix(planner, Format::Table)?;
        }
        EditorCommand::Reload => {
            planner.reload().await?;
            print_matrix(planner, Format::Table)?;
        }
        EditorCommand::Import(path) => {
            let preview = planner.open_import(&path).await?;
            print!("{}", table::render_preview(&preview));
            println!("escribe `confirm` para importar o `cancel` para cerrar");
        }
        EditorCommand::Confirm => {
            planner.confirm_import().await?;
            print_matrix(planner, Format::Table)?;
        }
        EditorCommand::Cancel => planner.cancel_import()?,
        EditorCommand::Export => {
            let path = planner.export_csv().await?;
            println!("{}", path.display());
        }
        EditorCommand::Help => println!("{HELP}"),
        EditorCommand::Quit => {
            if planner.state().is_modified() {
                tracing::warn!("leaving editor with unsaved edits for {}", planner.year());
            }
            return Ok(false);
        }
    }
    Ok(true)
}

pub async fn run<A: BudgetApi, N: Notifier>(planner: &mut Planner<A, N>) -> Result<()> {
    print_matrix(planner, Format::Table)?;
    println!("`help` para ver los comandos");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match EditorCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match execute(planner, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("  {err}"),
        }
    }
    Ok(())
}
