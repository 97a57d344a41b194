//! Routing errors.

use thiserror::Error;

/// Errors raised while building the route table or resolving against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No route matches the request. Surfaced as a 404, never fatal.
    #[error("no route matches {method} {path}")]
    NotFound { method: String, path: String },

    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route `{pattern}` takes its action from the path but has no `:action` segment")]
    MissingActionSegment { pattern: String },

    #[error("route name `{0}` is already registered")]
    DuplicateName(String),

    #[error("invalid mount prefix `{prefix}`")]
    InvalidMount { prefix: String },

    #[error("no route named `{0}`")]
    UnknownRoute(String),

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParam { route: String, param: String },
}
