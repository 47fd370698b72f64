//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`UnknownCategory`] thrown when a cell references a missing category.
//! - [`DuplicateCategory`] thrown when a matrix gets the same category twice.
//! - [`KindMismatch`] thrown when a category is addressed with the wrong kind.
//! - [`InvalidMonth`] thrown for month numbers outside `1..=12`.
//! - [`InvalidAmount`] thrown for amounts refused by the cell policy.
//! - [`InvalidTransition`] thrown when the planner receives an action that is
//!   not allowed in its current phase.
//! - [`Csv`] thrown when a CSV file cannot be read or written.
//!
//!  [`UnknownCategory`]: EngineError::UnknownCategory
//!  [`DuplicateCategory`]: EngineError::DuplicateCategory
//!  [`KindMismatch`]: EngineError::KindMismatch
//!  [`InvalidMonth`]: EngineError::InvalidMonth
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`Csv`]: EngineError::Csv
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("category {0} not found")]
    UnknownCategory(i64),
    #[error("category {0} already present")]
    DuplicateCategory(i64),
    #[error("category {id} is not an {expected} category")]
    KindMismatch { id: i64, expected: &'static str },
    #[error("invalid month: {0}")]
    InvalidMonth(u8),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("action {action} not allowed while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownCategory(a), Self::UnknownCategory(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (
                Self::KindMismatch { id: a, expected: x },
                Self::KindMismatch { id: b, expected: y },
            ) => a == b && x == y,
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::InvalidTransition {
                    action: a,
                    phase: x,
                },
                Self::InvalidTransition {
                    action: b,
                    phase: y,
                },
            ) => a == b && x == y,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
