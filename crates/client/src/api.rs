use std::future::Future;

use api_types::projection::{BudgetMatrix, BulkSave, ImportResult};

use crate::{client::Client, error::ClientError};

/// The REST backend as seen by the [`Planner`](crate::Planner).
///
/// [`Client`] is the HTTP implementation; tests can provide their own.
pub trait BudgetApi {
    fn fetch_matrix(
        &self,
        year: i32,
    ) -> impl Future<Output = Result<BudgetMatrix, ClientError>> + Send;

    fn bulk_save(&self, payload: &BulkSave) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn import_csv(
        &self,
        year: i32,
        file_name: &str,
        content: Vec<u8>,
    ) -> impl Future<Output = Result<ImportResult, ClientError>> + Send;

    fn export_csv(&self, year: i32) -> impl Future<Output = Result<String, ClientError>> + Send;
}

impl BudgetApi for Client {
    async fn fetch_matrix(&self, year: i32) -> Result<BudgetMatrix, ClientError> {
        Client::fetch_matrix(self, year).await
    }

    async fn bulk_save(&self, payload: &BulkSave) -> Result<(), ClientError> {
        Client::bulk_save(self, payload).await
    }

    async fn import_csv(
        &self,
        year: i32,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ImportResult, ClientError> {
        Client::import_csv(self, year, file_name, content).await
    }

    async fn export_csv(&self, year: i32) -> Result<String, ClientError> {
        Client::export_csv(self, year).await
    }
}
