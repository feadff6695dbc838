//! Unified error handling for the webhook server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for webhook processing.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Bad request from the webhook sender.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Shopify(_)) {
            tracing::error!(error = %self, "event processing failed");
        }

        let status = match &self {
            Self::Shopify(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // The sender only gets a generic acknowledgment; detail stays in the
        // logs and there is no replay mechanism on this side.
        let message = match &self {
            Self::Shopify(_) => "Internal error.",
            Self::BadRequest(_) => "Invalid payload.",
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("missing data".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_shopify_failure_maps_to_500() {
        let response = AppError::Shopify(ShopifyError::RetriesExhausted { attempts: 5 })
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
