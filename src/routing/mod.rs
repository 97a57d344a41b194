//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → pattern.rs (normalize path)
//!     → router.rs (scan routes in registration order)
//!     → matcher.rs (verb and mount-prefix checks)
//!     → pattern.rs (bind named segments)
//!     → Return: MatchResult::Matched or MatchResult::NotFound
//!
//! Table construction (at startup):
//!     HarnessOptions (spec runner present?)
//!     → table.rs (declarations)
//!     → compile patterns, check names
//!     → Freeze as Arc<RouteTable>
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod route;
pub mod router;
pub mod table;

pub use error::RoutingError;
pub use route::{ActionRef, Endpoint, MatchResult, Params, RouteInfo, RouteMatch, Target};
pub use router::RouteTable;
pub use table::{harness_routes, HarnessOptions, SpecRunnerMount};
