//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route matching a request
//! - Return the match or an explicit NotFound
//! - Generate paths for named routes
//!
//! # Design Decisions
//! - Immutable once shared (`Arc<RouteTable>`), so lookups need no locks
//! - O(n) scan in registration order; first match wins
//! - Explicit NotFound rather than a silent default

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::error::RoutingError;
use crate::routing::matcher::MethodMatcher;
use crate::routing::pattern::{normalize_path, PathPattern};
use crate::routing::route::{
    Endpoint, MatchResult, Params, PathMatcher, Route, RouteInfo,
};

/// Ordered table of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action route for `method`. Every action route accepts an
    /// optional `.format` suffix.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        endpoint: Endpoint,
    ) -> Result<&mut Self, RoutingError> {
        let route = Route::action(
            MethodMatcher::Only(method),
            PathPattern::parse_with_format(pattern)?,
            endpoint,
        )?;
        self.push(route)
    }

    /// Like [`register`](Self::register), giving the route a unique name.
    pub fn register_named(
        &mut self,
        name: &str,
        method: Method,
        pattern: &str,
        endpoint: Endpoint,
    ) -> Result<&mut Self, RoutingError> {
        let route = Route::action(
            MethodMatcher::Only(method),
            PathPattern::parse_with_format(pattern)?,
            endpoint,
        )?
        .named(name);
        self.push(route)
    }

    /// Attach a sub-application under `prefix` for every verb.
    pub fn mount(
        &mut self,
        name: &str,
        prefix: &str,
        app: &str,
    ) -> Result<&mut Self, RoutingError> {
        self.push(Route::mount(prefix, app)?.named(name))
    }

    /// Append an already built route, enforcing unique names.
    pub fn push(&mut self, route: Route) -> Result<&mut Self, RoutingError> {
        if let Some(name) = route.name() {
            if self.names.contains_key(name) {
                return Err(RoutingError::DuplicateName(name.to_string()));
            }
            self.names.insert(name.to_string(), self.routes.len());
        }
        self.routes.push(route);
        Ok(self)
    }

    /// Find the first route matching `method` and `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> MatchResult {
        let path = normalize_path(path);
        self.routes
            .iter()
            .filter(|route| route.method.matches(method))
            .find_map(|route| route.resolve(&path))
            .map_or(MatchResult::NotFound, MatchResult::Matched)
    }

    /// String form of [`match_route`](Self::match_route). An unknown verb
    /// matches nothing.
    pub fn match_str(&self, method: &str, path: &str) -> MatchResult {
        match Method::from_bytes(method.to_ascii_uppercase().as_bytes()) {
            Ok(method) => self.match_route(&method, path),
            Err(_) => MatchResult::NotFound,
        }
    }

    /// Build the path of a named route.
    pub fn path_for(&self, name: &str, params: &Params) -> Result<String, RoutingError> {
        let route = self
            .route(name)
            .ok_or_else(|| RoutingError::UnknownRoute(name.to_string()))?;
        match &route.path {
            PathMatcher::Pattern(pattern) => pattern.render(name, params),
            PathMatcher::Prefix(prefix) => Ok(prefix.as_str().to_string()),
        }
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&i| &self.routes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Listing rows in registration order.
    pub fn describe(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(Route::info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::{ActionRef, Target};

    fn wildcard(controller: &str) -> Endpoint {
        Endpoint::Action {
            controller: controller.into(),
            action: ActionRef::FromPath,
        }
    }

    fn fixed(controller: &str, action: &str) -> Endpoint {
        Endpoint::Action {
            controller: controller.into(),
            action: ActionRef::Fixed(action.into()),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RouteTable::new();
        table
            .register(Method::GET, "/items/special", fixed("items", "special"))
            .unwrap()
            .register(Method::GET, "/items/:action", wildcard("items"))
            .unwrap();

        let m = table.match_route(&Method::GET, "/items/special");
        assert_eq!(
            m.as_match().unwrap().target,
            Target::action("items", "special")
        );

        let m = table.match_route(&Method::GET, "/items/other");
        assert_eq!(m.as_match().unwrap().target, Target::action("items", "other"));
    }

    #[test]
    fn test_verb_filters_before_path() {
        let mut table = RouteTable::new();
        table
            .register(Method::POST, "/form", fixed("form", "create"))
            .unwrap()
            .register(Method::GET, "/form", fixed("form", "show"))
            .unwrap();

        let m = table.match_route(&Method::GET, "/form");
        assert_eq!(m.as_match().unwrap().action(), Some("show"));
        assert_eq!(table.match_route(&Method::DELETE, "/form"), MatchResult::NotFound);
    }

    #[test]
    fn test_match_str() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/", fixed("pages", "start")).unwrap();

        assert!(table.match_str("get", "/").is_match());
        assert!(table.match_str("GET", "").is_match());
        assert_eq!(table.match_str("GE T", "/"), MatchResult::NotFound);
        assert_eq!(table.match_str("", "/"), MatchResult::NotFound);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut table = RouteTable::new();
        table
            .register_named("root", Method::GET, "/", fixed("pages", "start"))
            .unwrap();
        let err = table
            .register_named("root", Method::GET, "/home", fixed("pages", "home"))
            .unwrap_err();
        assert_eq!(err, RoutingError::DuplicateName("root".into()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_path_for() {
        let mut table = RouteTable::new();
        table
            .register_named("item", Method::GET, "/items/:id", fixed("items", "show"))
            .unwrap()
            .mount("runner", "/specs", "spec_runner")
            .unwrap();

        let params: Params = [("id", "7")].into_iter().collect();
        assert_eq!(table.path_for("item", &params).unwrap(), "/items/7");
        assert_eq!(table.path_for("runner", &Params::new()).unwrap(), "/specs");
        assert_eq!(
            table.path_for("missing", &Params::new()).unwrap_err(),
            RoutingError::UnknownRoute("missing".into())
        );
        assert!(matches!(
            table.path_for("item", &Params::new()),
            Err(RoutingError::MissingParam { .. })
        ));
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        assert_eq!(table.match_route(&Method::GET, "/"), MatchResult::NotFound);
    }
}
