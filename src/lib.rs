//! Spec harness route table and dispatch server library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::HarnessConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{harness_routes, HarnessOptions, MatchResult, RouteTable};
