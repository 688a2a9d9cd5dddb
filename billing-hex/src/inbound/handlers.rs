//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use billing_types::{
    AppError, BillingRepository, CreateFacturaRequest, DeleteFacturaResponse, FacturaId,
    FacturaResponse, RegisterServicioRequest, ServicioId, ServicioResponse,
};

use crate::BillingService;

/// Application state shared across handlers.
pub struct AppState<R: BillingRepository> {
    pub service: BillingService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            // State conflicts are client errors in this API.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error processing request: {}", msg),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning extractor rejections (bad syntax, wrong
/// types, missing content type) into 400 responses with the usual error body.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError(AppError::BadRequest(rejection.body_text()))
    })
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Servicios
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, payload))]
pub async fn register_servicio<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<RegisterServicioRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let servicio = state.service.register_servicio(req).await?;
    Ok((StatusCode::CREATED, Json(ServicioResponse::from(servicio))))
}

/// List all services.
#[tracing::instrument(skip(state))]
pub async fn list_servicios<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let servicios = state.service.list_servicios().await?;
    let body: Vec<ServicioResponse> = servicios.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Get service by ID.
#[tracing::instrument(skip(state), fields(servicio_id = %id))]
pub async fn get_servicio<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let servicio = state.service.get_servicio(&ServicioId::from(id)).await?;
    Ok(Json(ServicioResponse::from(servicio)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Facturas
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, payload))]
pub async fn create_factura<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateFacturaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let factura = state.service.create_factura(req).await?;
    Ok((StatusCode::CREATED, Json(FacturaResponse::from(factura))))
}

/// List all invoices.
#[tracing::instrument(skip(state))]
pub async fn list_facturas<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let facturas = state.service.list_facturas().await?;
    let body: Vec<FacturaResponse> = facturas.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Get invoice by ID.
#[tracing::instrument(skip(state), fields(factura_id = %id))]
pub async fn get_factura<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let factura = state.service.get_factura(&FacturaId::from(id)).await?;
    Ok(Json(FacturaResponse::from(factura)))
}

/// Mark an invoice as paid.
#[tracing::instrument(skip(state), fields(factura_id = %id))]
pub async fn pay_factura<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let factura = state.service.pay_factura(&FacturaId::from(id)).await?;
    Ok(Json(FacturaResponse::from(factura)))
}

/// Delete an invoice.
#[tracing::instrument(skip(state), fields(factura_id = %id))]
pub async fn delete_factura<R: BillingRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = FacturaId::from(id);
    state.service.delete_factura(&id).await?;
    Ok(Json(DeleteFacturaResponse {
        message: "Invoice deleted".into(),
        id,
    }))
}
