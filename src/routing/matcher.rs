//! Verb and mount-prefix matching.
//!
//! # Responsibilities
//! - Match the request verb against a route's verb
//! - Match mount prefixes at a path segment boundary
//!
//! # Design Decisions
//! - Verbs compare exactly, except that HEAD is served by GET routes
//! - Mount prefixes are case-sensitive, like every other path comparison
//! - `/specs` matches `/specs` and `/specs/...`, never `/specsfoo`

use std::fmt;

use axum::http::Method;

use crate::routing::error::RoutingError;

/// Which verbs a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    Only(Method),
    /// Every verb; used by mounts.
    Any,
}

impl MethodMatcher {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Any => true,
            MethodMatcher::Only(expected) => {
                expected == method || (*method == Method::HEAD && *expected == Method::GET)
            }
        }
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodMatcher::Only(method) => f.write_str(method.as_str()),
            MethodMatcher::Any => f.write_str("*"),
        }
    }
}

/// Matches a mount prefix and splits off the remainder of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Result<Self, RoutingError> {
        let prefix = prefix.into();
        let valid = prefix.starts_with('/')
            && prefix.len() > 1
            && !prefix.ends_with('/')
            && !prefix.contains("//");
        if !valid {
            return Err(RoutingError::InvalidMount { prefix });
        }
        Ok(Self { prefix })
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Returns the path below the prefix (`/` for the prefix itself).
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        match path.strip_prefix(self.prefix.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}
