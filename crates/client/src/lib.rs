//! Client side of the budget planning page.
//!
//! Talks to the `budget-projections` REST endpoints, keeps the engine state
//! of the page in sync with the server, and reports outcomes through a
//! [`Notifier`].

pub use api::BudgetApi;
pub use client::Client;
pub use convert::{bulk_save_from_matrix, matrix_from_wire};
pub use error::{ClientError, ExportError, ImportError, LoadError, SaveError};
pub use notify::{Notifier, Toast, ToastLevel, ToastLog};
pub use planner::{Planner, export_file_name, is_csv, preview_file};

mod api;
mod client;
mod convert;
mod error;
mod notify;
mod planner;
