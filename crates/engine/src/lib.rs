//! Budget projection engine.
//!
//! Holds one fiscal year of planned income and expenses per category and
//! month ([`BudgetMatrix`]), keeps its monthly and yearly totals consistent
//! with the cells, and models the planning page as a reducer
//! ([`PlannerState`]). The engine is synchronous and performs no I/O; talking
//! to the server is up to the client crate.

pub use category::{BudgetCategory, CategoryKind};
pub use cell::{CellParse, InvalidCellPolicy, ParseDiagnostic, parse_cell};
pub use csv_io::{CsvPreview, PREVIEW_ROWS, csv_header, render_csv};
pub use error::EngineError;
pub use matrix::{BudgetMatrix, ProjectionRecord, Totals};
pub use money::MoneyCents;
pub use month::Month;
pub use planner::{Action, Phase, PlannerState, Reduced};

mod category;
mod cell;
mod csv_io;
mod error;
mod matrix;
mod money;
mod month;
mod planner;

type ResultEngine<T> = Result<T, EngineError>;
