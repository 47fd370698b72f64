//! Budget planning page: drives the engine reducer with calls to the API.
//!
//! Each operation moves the [`PlannerState`] through its phases, calls the
//! backend, and reports the outcome to the user through the [`Notifier`].
//! Failures never lose local edits: a failed save or import leaves the matrix
//! and the modified flag as they were, so the user can retry.
use std::path::{Path, PathBuf};

use engine::{
    Action, BudgetMatrix, CategoryKind, CellParse, CsvPreview, EngineError, InvalidCellPolicy,
    PlannerState, Reduced,
};

use crate::{
    api::BudgetApi,
    convert::{bulk_save_from_matrix, matrix_from_wire},
    error::{ExportError, ImportError, LoadError, SaveError},
    notify::Notifier,
};

/// File accepted by the import dialog, held until the user confirms.
#[derive(Debug)]
struct PendingImport {
    file_name: String,
    content: Vec<u8>,
}

/// Returns `true` when `path` has a CSV media type, judged by extension.
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// File name used for the export of `year`.
pub fn export_file_name(year: i32) -> String {
    format!("presupuesto_{year}.csv")
}

async fn read_preview(path: &Path) -> Result<(Vec<u8>, CsvPreview), ImportError> {
    let content = tokio::fs::read(path).await?;
    let preview = CsvPreview::from_bytes(&content)?;
    Ok((content, preview))
}

/// Previews a local CSV file without a page or a server.
pub async fn preview_file(path: &Path) -> Result<CsvPreview, ImportError> {
    if !is_csv(path) {
        return Err(ImportError::InvalidFileType(path.to_path_buf()));
    }
    let (_, preview) = read_preview(path).await?;
    Ok(preview)
}

pub struct Planner<A, N> {
    api: A,
    notifier: N,
    state: PlannerState,
    download_dir: PathBuf,
    pending_import: Option<PendingImport>,
}

impl<A: BudgetApi, N: Notifier> Planner<A, N> {
    pub fn new(
        api: A,
        notifier: N,
        year: i32,
        policy: InvalidCellPolicy,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api,
            notifier,
            state: PlannerState::new(year, policy),
            download_dir: download_dir.into(),
            pending_import: None,
        }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn matrix(&self) -> Option<&BudgetMatrix> {
        self.state.matrix()
    }

    pub fn year(&self) -> i32 {
        self.state.year()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Selects `year` and fetches its matrix. Pending edits are discarded.
    pub async fn load(&mut self, year: i32) -> Result<(), LoadError> {
        if self.state.reduce(Action::LoadRequested { year })? == Reduced::DiscardedEdits {
            tracing::warn!("unsaved budget edits discarded, loading year {year}");
        }

        match self.fetch(year).await {
            Ok(matrix) => {
                tracing::info!(
                    "loaded budget {year}: {} income, {} expense categories",
                    matrix.income_categories().len(),
                    matrix.expense_categories().len()
                );
                self.state.reduce(Action::MatrixLoaded(matrix))?;
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load budget {year}: {err}");
                self.state.reduce(Action::LoadFailed)?;
                self.notifier
                    .error(format!("No se pudo cargar el presupuesto {year}"));
                Err(err)
            }
        }
    }

    /// Fetches the selected year again.
    pub async fn reload(&mut self) -> Result<(), LoadError> {
        self.load(self.state.year()).await
    }

    async fn fetch(&self, year: i32) -> Result<BudgetMatrix, LoadError> {
        let payload = self.api.fetch_matrix(year).await?;
        Ok(matrix_from_wire(payload)?)
    }

    /// Replaces the clean matrix with the server's copy after a save or an
    /// import. On failure the page keeps the matrix it has and stays ready.
    async fn refresh(&mut self) {
        let year = self.state.year();
        let refreshed = match self.fetch(year).await {
            Ok(matrix) => self
                .state
                .reduce(Action::Refreshed(matrix))
                .map_err(LoadError::from),
            Err(err) => Err(err),
        };

        if let Err(err) = refreshed {
            tracing::error!("failed to refresh budget {year}: {err}");
            self.notifier
                .error(format!("No se pudo actualizar el presupuesto {year}"));
        }
    }

    /// Writes a raw value into a cell and recalculates the totals.
    ///
    /// Malformed input is coerced to 0 and logged, unless the policy is
    /// [`InvalidCellPolicy::Reject`], in which case the edit is refused.
    pub fn set_cell(
        &mut self,
        category_id: i64,
        month: u8,
        kind: CategoryKind,
        raw: &str,
    ) -> Result<CellParse, EngineError> {
        let reduced = self.state.reduce(Action::SetCell {
            category_id,
            month,
            kind,
            raw: raw.to_string(),
        });

        match reduced {
            Ok(Reduced::Cell(parsed)) => {
                if let Some(diagnostic) = parsed.diagnostic.as_ref().filter(|d| d.is_suspicious()) {
                    tracing::warn!(
                        "cell {category_id}/{month}: {raw:?} {diagnostic}"
                    );
                }
                Ok(parsed)
            }
            Ok(_) => Err(EngineError::InvalidTransition {
                action: "set cell",
                phase: self.state.phase().as_str(),
            }),
            Err(err @ EngineError::InvalidAmount(_)) => {
                self.notifier.error(format!("Importe no válido: {raw}"));
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Sends every projection greater than zero to the server, then fetches
    /// the canonical matrix again. Returns the number of projections sent;
    /// a failed refetch is reported but the save still counts.
    pub async fn save(&mut self) -> Result<usize, SaveError> {
        self.state.reduce(Action::SaveRequested)?;
        let Some(matrix) = self.state.matrix() else {
            self.state.reduce(Action::SaveFailed)?;
            return Err(SaveError::Engine(EngineError::InvalidTransition {
                action: "save",
                phase: "ready without matrix",
            }));
        };

        let payload = bulk_save_from_matrix(matrix);
        let count = payload.projections.len();

        match self.api.bulk_save(&payload).await {
            Ok(()) => {
                self.state.reduce(Action::MarkSaved)?;
                tracing::info!("saved {count} projections for {}", payload.year);
                self.notifier.success("Presupuesto guardado");
                self.refresh().await;
                Ok(count)
            }
            Err(err) => {
                self.state.reduce(Action::SaveFailed)?;
                let err = SaveError::from(err);
                tracing::error!("failed to save budget {}: {err}", payload.year);
                let message = match &err {
                    SaveError::Conflict(_) => {
                        "El presupuesto fue modificado por otro usuario; recarga antes de guardar"
                    }
                    _ => "No se pudo guardar el presupuesto",
                };
                self.notifier.error(message);
                Err(err)
            }
        }
    }

    /// Reads `path` and opens the import dialog with a preview of its first
    /// records. Nothing is sent to the server yet.
    pub async fn open_import(&mut self, path: &Path) -> Result<CsvPreview, ImportError> {
        if !is_csv(path) {
            self.notifier
                .error("Selecciona un archivo CSV para importar");
            return Err(ImportError::InvalidFileType(path.to_path_buf()));
        }
        if !self.state.can_import() {
            return Err(EngineError::InvalidTransition {
                action: "open import",
                phase: self.state.phase().as_str(),
            }
            .into());
        }

        let (content, preview) = match read_preview(path).await {
            Ok(read) => read,
            Err(err) => {
                tracing::error!("failed to read {}: {err}", path.display());
                self.notifier.error("No se pudo leer el archivo");
                return Err(err);
            }
        };
        self.state
            .reduce(Action::ImportDialogOpened(preview.clone()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.csv".to_string());
        self.pending_import = Some(PendingImport { file_name, content });
        Ok(preview)
    }

    pub fn cancel_import(&mut self) -> Result<(), ImportError> {
        self.state.reduce(Action::ImportDialogClosed)?;
        self.pending_import = None;
        Ok(())
    }

    /// Uploads the file of the open import dialog. On success the local
    /// edits are superseded and the matrix is fetched again.
    pub async fn confirm_import(&mut self) -> Result<u64, ImportError> {
        let Some(pending) = self.pending_import.as_ref() else {
            return Err(ImportError::NoPendingImport);
        };
        self.state.reduce(Action::ImportStarted)?;

        let year = self.state.year();
        let result = self
            .api
            .import_csv(year, &pending.file_name, pending.content.clone())
            .await;

        match result {
            Ok(result) => {
                self.state.reduce(Action::ImportSucceeded)?;
                self.pending_import = None;
                tracing::info!("imported {} records for {year}", result.records_imported);
                self.notifier.success(format!(
                    "Se importaron {} registros",
                    result.records_imported
                ));
                self.refresh().await;
                Ok(result.records_imported)
            }
            Err(err) => {
                self.state.reduce(Action::ImportFailed)?;
                tracing::error!("failed to import budget for {year}: {err}");
                self.notifier.error("No se pudo importar el archivo");
                Err(err.into())
            }
        }
    }

    /// Opens the dialog for `path` and confirms it right away.
    pub async fn import_csv(&mut self, path: &Path) -> Result<u64, ImportError> {
        self.open_import(path).await?;
        match self.confirm_import().await {
            Ok(count) => Ok(count),
            Err(err) => {
                // Leave the page usable when there is no one to retry.
                if let Err(close_err) = self.cancel_import() {
                    tracing::debug!("import dialog already closed: {close_err}");
                }
                Err(err)
            }
        }
    }

    /// Downloads the server rendered CSV of the selected year into the
    /// download directory. The in-memory matrix is left untouched.
    pub async fn export_csv(&self) -> Result<PathBuf, ExportError> {
        let year = self.state.year();
        match self.write_export(year).await {
            Ok(path) => {
                tracing::info!("exported budget {year} to {}", path.display());
                self.notifier
                    .success(format!("Exportado {}", path.display()));
                Ok(path)
            }
            Err(err) => {
                tracing::error!("failed to export budget {year}: {err}");
                self.notifier.error("No se pudo exportar el presupuesto");
                Err(err)
            }
        }
    }

    async fn write_export(&self, year: i32) -> Result<PathBuf, ExportError> {
        let csv = self.api.export_csv(year).await?;
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.download_dir.join(export_file_name(year));
        tokio::fs::write(&path, csv).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_check_uses_extension() {
        assert!(is_csv(Path::new("presupuesto.csv")));
        assert!(is_csv(Path::new("/tmp/PRESUPUESTO.CSV")));
        assert!(!is_csv(Path::new("presupuesto.xlsx")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[test]
    fn export_file_name_includes_year() {
        assert_eq!(export_file_name(2025), "presupuesto_2025.csv");
    }
}
