//! State of the budget planning page as a reducer.
//!
//! Every change to the page goes through [`PlannerState::reduce`] with an
//! [`Action`]. The state owns the selected year, the loaded matrix, the
//! modified flag and the phase of the page:
//!
//! ```text
//! Idle -> Loading -> Ready <-> (edits) -> Saving -> Ready
//! Ready -> ImportDialogOpen -> Importing -> Ready
//!                                       \-> ImportDialogOpen (on failure)
//! ```
//!
//! After a save or an import the page refetches the matrix with
//! [`Action::Refreshed`], which swaps the matrix in place and stays `Ready`.
//! A failed refetch changes nothing.
//!
//! Actions that do not fit the current phase are refused with
//! [`EngineError::InvalidTransition`], which is what keeps two mutating
//! requests from running at the same time.
use crate::{
    BudgetMatrix, CategoryKind, EngineError, ResultEngine,
    cell::{CellParse, InvalidCellPolicy},
    csv_io::CsvPreview,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Saving,
    ImportDialogOpen(CsvPreview),
    Importing(CsvPreview),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::ImportDialogOpen(_) => "import dialog open",
            Self::Importing(_) => "importing",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Select a year and start fetching its matrix. Unsaved edits are dropped.
    LoadRequested { year: i32 },
    MatrixLoaded(BudgetMatrix),
    LoadFailed,
    /// A refetch of the selected year while the page is ready and clean.
    Refreshed(BudgetMatrix),
    SetCell {
        category_id: i64,
        month: u8,
        kind: CategoryKind,
        raw: String,
    },
    SaveRequested,
    MarkSaved,
    SaveFailed,
    ImportDialogOpened(CsvPreview),
    ImportDialogClosed,
    ImportStarted,
    ImportSucceeded,
    ImportFailed,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::LoadRequested { .. } => "load",
            Self::MatrixLoaded(_) => "matrix loaded",
            Self::LoadFailed => "load failed",
            Self::Refreshed(_) => "refreshed",
            Self::SetCell { .. } => "set cell",
            Self::SaveRequested => "save",
            Self::MarkSaved => "mark saved",
            Self::SaveFailed => "save failed",
            Self::ImportDialogOpened(_) => "open import",
            Self::ImportDialogClosed => "close import",
            Self::ImportStarted => "import",
            Self::ImportSucceeded => "import succeeded",
            Self::ImportFailed => "import failed",
        }
    }
}

/// What a successful [`PlannerState::reduce`] call did, beyond the state
/// change itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduced {
    Done,
    /// A cell was written; carries the parse diagnostics.
    Cell(CellParse),
    /// The year changed while edits were pending; they are gone.
    DiscardedEdits,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerState {
    year: i32,
    matrix: Option<BudgetMatrix>,
    phase: Phase,
    modified: bool,
    policy: InvalidCellPolicy,
}

impl PlannerState {
    pub fn new(year: i32, policy: InvalidCellPolicy) -> Self {
        Self {
            year,
            matrix: None,
            phase: Phase::Idle,
            modified: false,
            policy,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn matrix(&self) -> Option<&BudgetMatrix> {
        self.matrix.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn policy(&self) -> InvalidCellPolicy {
        self.policy
    }

    /// Save is enabled only for a loaded page with pending edits.
    pub fn can_save(&self) -> bool {
        self.phase == Phase::Ready && self.modified
    }

    pub fn can_import(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::ImportDialogOpen(_))
    }

    fn refuse(&self, action: &Action) -> EngineError {
        EngineError::InvalidTransition {
            action: action.name(),
            phase: self.phase.as_str(),
        }
    }

    pub fn reduce(&mut self, action: Action) -> ResultEngine<Reduced> {
        match (&self.phase, action) {
            (Phase::Saving | Phase::Importing(_), action @ Action::LoadRequested { .. }) => {
                Err(self.refuse(&action))
            }
            (_, Action::LoadRequested { year }) => {
                let discarded = self.modified;
                self.year = year;
                self.matrix = None;
                self.modified = false;
                self.phase = Phase::Loading;
                Ok(if discarded {
                    Reduced::DiscardedEdits
                } else {
                    Reduced::Done
                })
            }
            (Phase::Loading, Action::MatrixLoaded(matrix)) => {
                if matrix.year() != self.year {
                    return Err(EngineError::InvalidTransition {
                        action: "matrix loaded for another year",
                        phase: self.phase.as_str(),
                    });
                }
                self.matrix = Some(matrix);
                self.phase = Phase::Ready;
                Ok(Reduced::Done)
            }
            (Phase::Loading, Action::LoadFailed) => {
                self.phase = Phase::Idle;
                Ok(Reduced::Done)
            }
            (Phase::Ready, Action::Refreshed(matrix))
                if !self.modified && matrix.year() == self.year =>
            {
                self.matrix = Some(matrix);
                Ok(Reduced::Done)
            }
            (
                Phase::Ready,
                Action::SetCell {
                    category_id,
                    month,
                    kind,
                    raw,
                },
            ) => {
                let Some(matrix) = self.matrix.as_mut() else {
                    return Err(EngineError::InvalidTransition {
                        action: "set cell",
                        phase: "ready without matrix",
                    });
                };
                let parsed = matrix.set_cell(category_id, month, kind, &raw, self.policy)?;
                self.modified = true;
                Ok(Reduced::Cell(parsed))
            }
            (Phase::Ready, Action::SaveRequested) if self.modified => {
                self.phase = Phase::Saving;
                Ok(Reduced::Done)
            }
            (Phase::Saving, Action::MarkSaved) => {
                self.modified = false;
                self.phase = Phase::Ready;
                Ok(Reduced::Done)
            }
            (Phase::Saving, Action::SaveFailed) => {
                self.phase = Phase::Ready;
                Ok(Reduced::Done)
            }
            (Phase::Ready | Phase::ImportDialogOpen(_), Action::ImportDialogOpened(preview)) => {
                self.phase = Phase::ImportDialogOpen(preview);
                Ok(Reduced::Done)
            }
            (Phase::ImportDialogOpen(_), Action::ImportDialogClosed) => {
                self.phase = Phase::Ready;
                Ok(Reduced::Done)
            }
            (Phase::ImportDialogOpen(preview), Action::ImportStarted) => {
                self.phase = Phase::Importing(preview.clone());
                Ok(Reduced::Done)
            }
            (Phase::Importing(_), Action::ImportSucceeded) => {
                self.modified = false;
                self.phase = Phase::Ready;
                Ok(Reduced::Done)
            }
            (Phase::Importing(preview), Action::ImportFailed) => {
                self.phase = Phase::ImportDialogOpen(preview.clone());
                Ok(Reduced::Done)
            }
            (_, action) => Err(self.refuse(&action)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BudgetCategory, MoneyCents, Month};

    fn loaded(year: i32) -> PlannerState {
        let mut state = PlannerState::new(year, InvalidCellPolicy::Coerce);
        state.reduce(Action::LoadRequested { year }).unwrap();
        let matrix = BudgetMatrix::from_categories(
            year,
            [
                BudgetCategory::new(1, "Eventos", CategoryKind::Income),
                BudgetCategory::new(2, "Nómina", CategoryKind::Expense),
            ],
        )
        .unwrap();
        state.reduce(Action::MatrixLoaded(matrix)).unwrap();
        state
    }

    fn set(category_id: i64, month: u8, kind: CategoryKind, raw: &str) -> Action {
        Action::SetCell {
            category_id,
            month,
            kind,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn load_then_edit_marks_modified() {
        let mut state = loaded(2025);
        assert_eq!(state.phase(), &Phase::Ready);
        assert!(!state.can_save());

        let reduced = state
            .reduce(set(1, 3, CategoryKind::Income, "abc"))
            .unwrap();
        let Reduced::Cell(parsed) = reduced else {
            panic!("expected a cell outcome");
        };
        assert!(parsed.is_suspicious());
        assert!(state.is_modified());
        assert!(state.can_save());
        let month = Month::new(3).unwrap();
        assert_eq!(
            state.matrix().unwrap().category(1).unwrap().month(month),
            MoneyCents::ZERO
        );
    }

    #[test]
    fn save_round_trip_clears_modified() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();

        state.reduce(Action::SaveRequested).unwrap();
        assert_eq!(state.phase(), &Phase::Saving);
        assert!(!state.can_save());

        state.reduce(Action::MarkSaved).unwrap();
        assert_eq!(state.phase(), &Phase::Ready);
        assert!(!state.is_modified());
    }

    #[test]
    fn failed_save_keeps_edits() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();
        state.reduce(Action::SaveRequested).unwrap();
        state.reduce(Action::SaveFailed).unwrap();

        assert!(state.is_modified());
        assert!(state.can_save());
        let month = Month::JANUARY;
        assert_eq!(
            state.matrix().unwrap().category(1).unwrap().month(month),
            MoneyCents::new(1_000)
        );
    }

    #[test]
    fn second_save_while_saving_is_refused() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();
        state.reduce(Action::SaveRequested).unwrap();

        let err = state.reduce(Action::SaveRequested).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                action: "save",
                phase: "saving"
            }
        );
    }

    #[test]
    fn save_without_edits_is_refused() {
        let mut state = loaded(2025);
        assert!(state.reduce(Action::SaveRequested).is_err());
    }

    #[test]
    fn edits_while_saving_are_refused() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();
        state.reduce(Action::SaveRequested).unwrap();
        assert!(state.reduce(set(1, 2, CategoryKind::Income, "5")).is_err());
    }

    #[test]
    fn year_switch_discards_edits() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();

        let reduced = state.reduce(Action::LoadRequested { year: 2026 }).unwrap();
        assert_eq!(reduced, Reduced::DiscardedEdits);
        assert_eq!(state.year(), 2026);
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.matrix().is_none());
        assert!(!state.is_modified());
    }

    #[test]
    fn stale_matrix_is_refused() {
        let mut state = PlannerState::new(2025, InvalidCellPolicy::Coerce);
        state.reduce(Action::LoadRequested { year: 2025 }).unwrap();
        let err = state
            .reduce(Action::MatrixLoaded(BudgetMatrix::new(2024)))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert_eq!(state.phase(), &Phase::Loading);
    }

    #[test]
    fn load_failure_returns_to_idle() {
        let mut state = PlannerState::new(2025, InvalidCellPolicy::Coerce);
        state.reduce(Action::LoadRequested { year: 2025 }).unwrap();
        state.reduce(Action::LoadFailed).unwrap();
        assert_eq!(state.phase(), &Phase::Idle);
    }

    #[test]
    fn import_flow_supersedes_local_edits() {
        let mut state = loaded(2025);
        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();

        let preview = CsvPreview {
            rows: vec![vec!["Category".to_string()]],
        };
        state
            .reduce(Action::ImportDialogOpened(preview.clone()))
            .unwrap();
        state.reduce(Action::ImportStarted).unwrap();
        assert!(!state.can_import());
        assert!(state.reduce(Action::ImportStarted).is_err());
        assert!(state.reduce(Action::LoadRequested { year: 2025 }).is_err());

        state.reduce(Action::ImportSucceeded).unwrap();
        assert_eq!(state.phase(), &Phase::Ready);
        assert!(!state.is_modified());
    }

    #[test]
    fn failed_import_reopens_dialog() {
        let mut state = loaded(2025);
        let preview = CsvPreview {
            rows: vec![vec!["a".to_string(), "b".to_string()]],
        };
        state
            .reduce(Action::ImportDialogOpened(preview.clone()))
            .unwrap();
        state.reduce(Action::ImportStarted).unwrap();
        state.reduce(Action::ImportFailed).unwrap();
        assert_eq!(state.phase(), &Phase::ImportDialogOpen(preview));

        state.reduce(Action::ImportDialogClosed).unwrap();
        assert_eq!(state.phase(), &Phase::Ready);
    }

    #[test]
    fn refresh_replaces_matrix_and_stays_ready() {
        let mut state = loaded(2025);
        let fresh = BudgetMatrix::from_categories(
            2025,
            [BudgetCategory::new(1, "Eventos", CategoryKind::Income)
                .with_month(Month::JANUARY, MoneyCents::new(9_900))],
        )
        .unwrap();

        state.reduce(Action::Refreshed(fresh.clone())).unwrap();
        assert_eq!(state.phase(), &Phase::Ready);
        assert_eq!(state.matrix(), Some(&fresh));
    }

    #[test]
    fn refresh_never_overwrites_edits_or_other_years() {
        let mut state = loaded(2025);
        assert!(
            state
                .reduce(Action::Refreshed(BudgetMatrix::new(2024)))
                .is_err()
        );

        state.reduce(set(1, 1, CategoryKind::Income, "10")).unwrap();
        let before = state.clone();
        assert!(
            state
                .reduce(Action::Refreshed(BudgetMatrix::new(2025)))
                .is_err()
        );
        assert_eq!(state, before);

        state.reduce(Action::SaveRequested).unwrap();
        assert!(
            state
                .reduce(Action::Refreshed(BudgetMatrix::new(2025)))
                .is_err()
        );
    }
}
