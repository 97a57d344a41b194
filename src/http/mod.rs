//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing::RouteTable (resolve method + path)
//!     → response.rs (dispatch JSON or 404)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{DispatchBody, DispatchError};
pub use server::{HttpServer, ServerError};
