use crate::invoices::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use thiserror::Error;

use super::dto::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Agent processing failed: {0}")]
    Agent(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Invoice {0} not found")]
    InvoiceNotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Extraction(_) | ApiError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(
                StorageError::MissingInvoiceNumber | StorageError::InvalidInvoiceNumber(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::NotAMapping) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Extraction("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvoiceNotFound("X".into()).to_string(),
            "Invoice X not found"
        );
        assert_eq!(
            ApiError::from(StorageError::MissingInvoiceNumber).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StorageError::NotAMapping).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
