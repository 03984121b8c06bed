//! HTTP error mapping to the uniform response envelope

use crate::contract::AdjudicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error payload: the envelope with `success: false` and no data
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,

    pub success: bool,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Map domain errors to the envelope. Internal details are logged and
/// never sent to clients.
pub fn map_domain_error(error: AdjudicationError) -> ApiError {
    match error {
        AdjudicationError::NotFound { .. } => {
            ApiError::new(StatusCode::NOT_FOUND, "Registro no encontrado")
                .with_detail(error.to_string())
        }
        AdjudicationError::Validation { message } => {
            ApiError::new(StatusCode::BAD_REQUEST, "Error de validación").with_detail(message)
        }
        AdjudicationError::Conflict { reason } => {
            ApiError::new(StatusCode::CONFLICT, "Conflicto").with_detail(reason)
        }
        AdjudicationError::DependentRecords { .. } => {
            ApiError::new(StatusCode::CONFLICT, "No se puede eliminar el registro")
                .with_detail(error.to_string())
        }
        AdjudicationError::ImportRejected { .. } => {
            ApiError::new(StatusCode::BAD_REQUEST, "Archivo rechazado")
                .with_detail(error.to_string())
        }
        AdjudicationError::Internal { message } => {
            tracing::error!(error = %message, "error interno");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
        }
    }
}
