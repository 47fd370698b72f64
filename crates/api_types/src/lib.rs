use serde::{Deserialize, Serialize};

/// Error body returned by the server on non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod projection {
    use std::collections::BTreeMap;

    use super::*;

    /// Amount per month, keyed by month number (1-12).
    ///
    /// JSON object keys are strings (`{"1": 500.0}`); missing months mean 0.
    pub type MonthAmounts = BTreeMap<u8, f64>;

    /// A budget line as returned by `GET /budget-projections/{year}`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryProjection {
        pub category_id: i64,
        pub category_name: String,
        #[serde(default)]
        pub category_color: Option<String>,
        #[serde(default)]
        pub months: MonthAmounts,
        /// Derived by the server. Clients recompute it from `months`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub total_year: Option<f64>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct KindAmounts {
        #[serde(default)]
        pub income: MonthAmounts,
        #[serde(default)]
        pub expense: MonthAmounts,
        #[serde(default)]
        pub net: MonthAmounts,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct KindTotals {
        #[serde(default)]
        pub income: f64,
        #[serde(default)]
        pub expense: f64,
        #[serde(default)]
        pub net: f64,
    }

    /// One fiscal year of projections.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetMatrix {
        pub year: i32,
        #[serde(default)]
        pub income_categories: Vec<CategoryProjection>,
        #[serde(default)]
        pub expense_categories: Vec<CategoryProjection>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub monthly_totals: Option<KindAmounts>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub yearly_totals: Option<KindTotals>,
        /// Server revision of the stored year, if the server tracks one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub revision: Option<u64>,
    }

    /// Single `(category, month, amount)` projection record.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Projection {
        pub category_id: i64,
        pub month: u8,
        pub projected_amount: f64,
    }

    /// Request body for `POST /budget-projections/bulk`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkSave {
        pub year: i32,
        pub projections: Vec<Projection>,
        /// Revision the edits were made against. The server answers
        /// `409 Conflict` when the stored revision moved on.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub expected_revision: Option<u64>,
    }

    /// Response body for `POST /budget-projections/import-csv`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImportResult {
        pub records_imported: u64,
    }
}
