//! Dispatch responses.
//!
//! # Responsibilities
//! - Describe the resolved dispatch as JSON
//! - Map routing misses to 404 with a structured body
//!
//! # Design Decisions
//! - The server does not run controllers; it reports which one would run
//! - Misses are values (`DispatchError`), converted by axum via `IntoResponse`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::routing::{Params, RouteMatch, RoutingError, Target};

/// Body returned for a matched request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchBody {
    #[serde(flatten)]
    pub target: Target,
    #[serde(skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    pub route: String,
    pub request_id: String,
}

impl DispatchBody {
    pub fn new(matched: RouteMatch, request_id: String) -> Self {
        Self {
            target: matched.target,
            params: matched.params,
            route: matched.route,
            request_id,
        }
    }
}

/// Label of a target for logs and metrics.
pub fn target_label(target: &Target) -> String {
    match target {
        Target::Action { controller, action } => format!("{controller}#{action}"),
        Target::Mounted { app, .. } => app.clone(),
    }
}

/// Errors surfaced by the dispatch handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            DispatchError::Routing(RoutingError::NotFound { method, path }) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "route_not_found",
                    message,
                    method: Some(method),
                    path: Some(path),
                },
            ),
            DispatchError::Routing(other) => {
                tracing::error!(error = %other, "Routing failure during dispatch");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "routing_error",
                        message,
                        method: None,
                        path: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
