use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

const NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// A month of the fiscal year, `1..=12`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    pub fn new(number: u8) -> ResultEngine<Self> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(EngineError::InvalidMonth(number))
        }
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero based position, for indexing per-month arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Short label used in narrow table columns (`Ene`, `Feb`, ...).
    #[must_use]
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl TryFrom<u8> for Month {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value)
    }
}

impl From<Month> for u8 {
    fn from(value: Month) -> Self {
        value.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
