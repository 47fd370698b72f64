use api_types::{
    ErrorResponse,
    projection::{BudgetMatrix, BulkSave, ImportResult},
};
use reqwest::{
    Response, Url,
    multipart::{Form, Part},
};

use crate::error::ClientError;

/// HTTP client for the `budget-projections` endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// `base_url` is the API root; paths are joined to it, so it should end
    /// with `/` when it has a path component (`http://host/api/`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::InvalidUrl(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    /// Turns a non-2xx response into a [`ClientError`], reading the
    /// `{"error": ...}` body when there is one.
    async fn check(res: Response) -> Result<Response, ClientError> {
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::error!("request failed with {status}: {body}");
        Err(ClientError::from_status(status.as_u16(), body))
    }

    /// `GET budget-projections/{year}`
    pub async fn fetch_matrix(&self, year: i32) -> Result<BudgetMatrix, ClientError> {
        let endpoint = self.endpoint(&format!("budget-projections/{year}"))?;
        tracing::debug!("GET {endpoint}");

        let res = self.http.get(endpoint).send().await?;
        let res = Self::check(res).await?;
        Ok(res.json::<BudgetMatrix>().await?)
    }

    /// `POST budget-projections/bulk`
    pub async fn bulk_save(&self, payload: &BulkSave) -> Result<(), ClientError> {
        let endpoint = self.endpoint("budget-projections/bulk")?;
        tracing::debug!(
            "POST {endpoint} ({} projections)",
            payload.projections.len()
        );

        let res = self.http.post(endpoint).json(payload).send().await?;
        Self::check(res).await?;
        Ok(())
    }

    /// `POST budget-projections/import-csv` as `multipart/form-data` with a
    /// `file` part and a `year` part.
    pub async fn import_csv(
        &self,
        year: i32,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ImportResult, ClientError> {
        let endpoint = self.endpoint("budget-projections/import-csv")?;
        tracing::debug!("POST {endpoint} ({file_name}, {} bytes)", content.len());

        let file = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new()
            .part("file", file)
            .text("year", year.to_string());

        let res = self.http.post(endpoint).multipart(form).send().await?;
        let res = Self::check(res).await?;
        Ok(res.json::<ImportResult>().await?)
    }

    /// `GET budget-projections/{year}/export-csv`, returned as raw text.
    pub async fn export_csv(&self, year: i32) -> Result<String, ClientError> {
        let endpoint = self.endpoint(&format!("budget-projections/{year}/export-csv"))?;
        tracing::debug!("GET {endpoint}");

        let res = self.http.get(endpoint).send().await?;
        let res = Self::check(res).await?;
        Ok(res.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base_path() {
        let client = Client::new("http://127.0.0.1:3000/api/").unwrap();
        assert_eq!(
            client.endpoint("budget-projections/2025").unwrap().as_str(),
            "http://127.0.0.1:3000/api/budget-projections/2025"
        );
        assert_eq!(
            client
                .endpoint("budget-projections/2025/export-csv")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:3000/api/budget-projections/2025/export-csv"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
