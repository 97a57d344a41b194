//! Route declarations and lookup results.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::routing::error::RoutingError;
use crate::routing::matcher::{MethodMatcher, PrefixMatcher};
use crate::routing::pattern::PathPattern;

/// Name of the placeholder that selects the action on wildcard routes.
pub const ACTION_PARAM: &str = "action";

/// Parameters bound from the request path. Values are never coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// How an action route picks its action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRef {
    /// Always the same action (e.g. `pages#start`).
    Fixed(String),
    /// Taken from the `:action` path segment.
    FromPath,
}

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Action { controller: String, action: ActionRef },
    Mount { app: String },
}

impl Endpoint {
    /// `controller#action`, with `controller#:action` for wildcard routes.
    pub fn label(&self) -> String {
        match self {
            Endpoint::Action { controller, action: ActionRef::Fixed(action) } => {
                format!("{controller}#{action}")
            }
            Endpoint::Action { controller, action: ActionRef::FromPath } => {
                format!("{controller}#:{ACTION_PARAM}")
            }
            Endpoint::Mount { app } => format!("{app} (mount)"),
        }
    }
}

/// The resolved dispatch target of a matched request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Action {
        controller: String,
        action: String,
    },
    Mounted {
        app: String,
        script_name: String,
        path_info: String,
    },
}

impl Target {
    pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Target::Action {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

/// How a route matches request paths.
#[derive(Debug, Clone)]
pub(crate) enum PathMatcher {
    Pattern(PathPattern),
    Prefix(PrefixMatcher),
}

/// A single registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) name: Option<String>,
    pub(crate) method: MethodMatcher,
    pub(crate) path: PathMatcher,
    pub(crate) endpoint: Endpoint,
}

impl Route {
    /// Build an action route. Wildcard actions require an `:action` placeholder.
    pub fn action(
        method: MethodMatcher,
        pattern: PathPattern,
        endpoint: Endpoint,
    ) -> Result<Self, RoutingError> {
        if let Endpoint::Action { action: ActionRef::FromPath, .. } = &endpoint {
            if !pattern.has_param(ACTION_PARAM) {
                return Err(RoutingError::MissingActionSegment {
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        Ok(Self {
            name: None,
            method,
            path: PathMatcher::Pattern(pattern),
            endpoint,
        })
    }

    /// Build a mount that accepts every verb under `prefix`.
    pub fn mount(prefix: &str, app: impl Into<String>) -> Result<Self, RoutingError> {
        Ok(Self {
            name: None,
            method: MethodMatcher::Any,
            path: PathMatcher::Prefix(PrefixMatcher::new(prefix)?),
            endpoint: Endpoint::Mount { app: app.into() },
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn method(&self) -> &MethodMatcher {
        &self.method
    }

    /// The path as it appears in route listings.
    pub fn path_display(&self) -> String {
        match &self.path {
            PathMatcher::Pattern(pattern) => pattern.to_string(),
            PathMatcher::Prefix(prefix) => prefix.as_str().to_string(),
        }
    }

    /// Resolve this route against a normalized path. The method is checked
    /// by the caller.
    pub(crate) fn resolve(&self, path: &str) -> Option<RouteMatch> {
        match (&self.path, &self.endpoint) {
            (PathMatcher::Pattern(pattern), Endpoint::Action { controller, action }) => {
                let params = pattern.matches(path)?;
                let action = match action {
                    ActionRef::Fixed(name) => name.clone(),
                    ActionRef::FromPath => params.get(ACTION_PARAM)?.to_string(),
                };
                Some(RouteMatch {
                    target: Target::Action {
                        controller: controller.clone(),
                        action,
                    },
                    params,
                    route: self.describe(),
                })
            }
            (PathMatcher::Prefix(prefix), Endpoint::Mount { app }) => {
                let path_info = prefix.strip(path)?;
                Some(RouteMatch {
                    target: Target::Mounted {
                        app: app.clone(),
                        script_name: prefix.as_str().to_string(),
                        path_info: path_info.to_string(),
                    },
                    params: Params::new(),
                    route: self.describe(),
                })
            }
            _ => None,
        }
    }

    fn describe(&self) -> String {
        format!("{} {}", self.method, self.path_display())
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            name: self.name.clone(),
            verb: self.method.to_string(),
            path: self.path_display(),
            endpoint: self.endpoint.label(),
        }
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub target: Target,
    pub params: Params,
    /// `VERB /pattern` of the route that matched, for logs.
    pub route: String,
}

impl RouteMatch {
    pub fn controller(&self) -> Option<&str> {
        match &self.target {
            Target::Action { controller, .. } => Some(controller),
            Target::Mounted { .. } => None,
        }
    }

    pub fn action(&self) -> Option<&str> {
        match &self.target {
            Target::Action { action, .. } => Some(action),
            Target::Mounted { .. } => None,
        }
    }
}

/// Outcome of a route table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(RouteMatch),
    NotFound,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn as_match(&self) -> Option<&RouteMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            MatchResult::NotFound => None,
        }
    }

    /// Convert to a `Result`, reporting the request on a miss.
    pub fn into_result(self, method: &str, path: &str) -> Result<RouteMatch, RoutingError> {
        match self {
            MatchResult::Matched(m) => Ok(m),
            MatchResult::NotFound => Err(RoutingError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

/// Row of the route listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub name: Option<String>,
    pub verb: String,
    pub path: String,
    pub endpoint: String,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>22} {:<6} {:<36} {}",
            self.name.as_deref().unwrap_or(""),
            self.verb,
            self.path,
            self.endpoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_wildcard_route_requires_action_segment() {
        let pattern = PathPattern::parse_with_format("/method_test/:id").unwrap();
        let err = Route::action(
            MethodMatcher::Only(Method::GET),
            pattern,
            Endpoint::Action {
                controller: "method_test".into(),
                action: ActionRef::FromPath,
            },
        )
        .unwrap_err();
        assert!(matches!(err, RoutingError::MissingActionSegment { .. }));
    }

    #[test]
    fn test_resolve_fixed_action() {
        let route = Route::action(
            MethodMatcher::Only(Method::GET),
            PathPattern::parse("/").unwrap(),
            Endpoint::Action {
                controller: "pages".into(),
                action: ActionRef::Fixed("start".into()),
            },
        )
        .unwrap();

        let m = route.resolve("/").unwrap();
        assert_eq!(m.target, Target::action("pages", "start"));
        assert!(m.params.is_empty());
        assert_eq!(m.route, "GET /");
    }

    #[test]
    fn test_resolve_mount() {
        let route = Route::mount("/specs", "spec_runner").unwrap();
        let m = route.resolve("/specs/models/user").unwrap();
        assert_eq!(
            m.target,
            Target::Mounted {
                app: "spec_runner".into(),
                script_name: "/specs".into(),
                path_info: "/models/user".into(),
            }
        );
        assert_eq!(m.controller(), None);
        assert!(route.resolve("/specsfoo").is_none());
    }

    #[test]
    fn test_endpoint_labels() {
        let wildcard = Endpoint::Action {
            controller: "css_test".into(),
            action: ActionRef::FromPath,
        };
        assert_eq!(wildcard.label(), "css_test#:action");
        assert_eq!(
            Endpoint::Mount { app: "spec_runner".into() }.label(),
            "spec_runner (mount)"
        );
    }

    #[test]
    fn test_params_serialize_as_object() {
        let params: Params = [("action", "foo")].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "action": "foo" })
        );
    }

    #[test]
    fn test_into_result_reports_request() {
        let err = MatchResult::NotFound.into_result("POST", "/css_test/bar").unwrap_err();
        assert_eq!(err.to_string(), "no route matches POST /css_test/bar");
    }
}
