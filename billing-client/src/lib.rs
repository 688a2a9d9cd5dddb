//! # Billing Client SDK
//!
//! A typed Rust client for the veterinary billing API.

use billing_types::{
    CreateFacturaRequest, Decimal, DeleteFacturaResponse, FacturaId, FacturaResponse,
    RegisterServicioRequest, ServicioId, ServicioResponse,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Billing API client.
pub struct BillingClient {
    base_url: String,
    http: Client,
}

impl BillingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.http.get(self.url(&["health"])?).send().await?;
        Ok(resp.status().is_success())
    }

    /// Registers a service, or replaces the one with the same id.
    pub async fn register_servicio(
        &self,
        id: Option<String>,
        nombre: &str,
        costo: Decimal,
    ) -> Result<ServicioResponse, ClientError> {
        let req = RegisterServicioRequest {
            id,
            nombre: nombre.to_string(),
            costo,
        };
        let url = self.url(&["api", "servicio"])?;
        self.send(self.http.post(url).json(&req)).await
    }

    /// Gets a service by ID.
    pub async fn get_servicio(&self, id: &ServicioId) -> Result<ServicioResponse, ClientError> {
        let url = self.url(&["api", "servicio", id.as_str()])?;
        self.send(self.http.get(url)).await
    }

    /// Lists all services.
    pub async fn list_servicios(&self) -> Result<Vec<ServicioResponse>, ClientError> {
        let url = self.url(&["api", "servicio"])?;
        self.send(self.http.get(url)).await
    }

    /// Creates an invoice billing the given services in order.
    pub async fn create_factura(
        &self,
        servicios_ids: Vec<String>,
    ) -> Result<FacturaResponse, ClientError> {
        let req = CreateFacturaRequest {
            servicios_ids: Some(servicios_ids),
        };
        let url = self.url(&["api", "factura"])?;
        self.send(self.http.post(url).json(&req)).await
    }

    /// Gets an invoice by ID.
    pub async fn get_factura(&self, id: &FacturaId) -> Result<FacturaResponse, ClientError> {
        let url = self.url(&["api", "factura", id.as_str()])?;
        self.send(self.http.get(url)).await
    }

    /// Lists all invoices.
    pub async fn list_facturas(&self) -> Result<Vec<FacturaResponse>, ClientError> {
        let url = self.url(&["api", "factura"])?;
        self.send(self.http.get(url)).await
    }

    /// Marks an invoice as paid.
    pub async fn pay_factura(&self, id: &FacturaId) -> Result<FacturaResponse, ClientError> {
        let url = self.url(&["api", "factura", id.as_str(), "pagar"])?;
        self.send(self.http.put(url)).await
    }

    /// Deletes an invoice.
    pub async fn delete_factura(
        &self,
        id: &FacturaId,
    ) -> Result<DeleteFacturaResponse, ClientError> {
        let url = self.url(&["api", "factura", id.as_str()])?;
        self.send(self.http.delete(url)).await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BillingClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = BillingClient::new("http://localhost:3000/");
        let url = client.url(&["api", "factura"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/factura");
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        let client = BillingClient::new("http://localhost:3000");
        let url = client.url(&["api", "servicio", "a/b c?d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/servicio/a%2Fb%20c%3Fd");
    }

    #[test]
    fn test_base_path_is_kept() {
        let client = BillingClient::new("http://vet.example/billing/");
        let url = client.url(&["api", "factura", "F1", "pagar"]).unwrap();
        assert_eq!(url.as_str(), "http://vet.example/billing/api/factura/F1/pagar");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = BillingClient::new("not a url");
        assert!(matches!(client.url(&["health"]), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 404,
            message: "Factura not found: f-1".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Factura not found: f-1");
    }
}
