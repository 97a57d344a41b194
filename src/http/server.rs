//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch and listing handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Resolve every request through the route table
//! - Report the resolved dispatch, or 404 on a miss
//! - Serve until the shutdown coordinator fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, HarnessConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{target_label, DispatchBody, DispatchError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::{harness_routes, MatchResult, RouteInfo, RouteTable, RoutingError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
}

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("route table: {0}")]
    Routing(#[from] RoutingError),
}

/// HTTP server for the spec harness.
pub struct HttpServer {
    router: Router,
    config: HarnessConfig,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Validate `config`, then build the route table and the server
    /// around it.
    pub fn new(config: HarnessConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let table = Arc::new(harness_routes(&config.harness_options())?);

        tracing::info!(
            routes = table.len(),
            spec_runner = config.spec_runner.enabled,
            "Route table built"
        );

        let state = AppState {
            table: table.clone(),
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            table,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HarnessConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler));

        if config.introspection.enabled {
            router = router.route(
                &config.introspection.path,
                get(list_routes_handler).fallback(dispatch_handler),
            );
        }

        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for serving it elsewhere or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }
}

/// Resolve the request and report where it would be dispatched.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let path = uri.path();

    match state.table.match_route(&method, path) {
        MatchResult::Matched(matched) => {
            let target = target_label(&matched.target);
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = %matched.route,
                target = %target,
                "Route matched"
            );
            metrics::record_dispatch(method.as_str(), 200, &matched.route, start_time);
            Json(DispatchBody::new(matched, request_id)).into_response()
        }
        MatchResult::NotFound => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_dispatch(method.as_str(), 404, metrics::NO_ROUTE, start_time);
            DispatchError::from(RoutingError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
            .into_response()
        }
    }
}

/// List the routes in registration order.
async fn list_routes_handler(State(state): State<AppState>) -> Json<Vec<RouteInfo>> {
    Json(state.table.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::validation::ValidationError;

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn server(config: HarnessConfig) -> HttpServer {
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_root() {
        let (status, body) = send(server(HarnessConfig::default()).router(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["controller"], "pages");
        assert_eq!(body["action"], "start");
    }

    #[tokio::test]
    async fn test_dispatch_not_found() {
        let (status, body) =
            send(server(HarnessConfig::default()).router(), Method::POST, "/css_test/bar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "route_not_found");
        assert_eq!(body["method"], "POST");
        assert_eq!(body["path"], "/css_test/bar");
    }

    #[tokio::test]
    async fn test_introspection_lists_routes() {
        let (status, body) =
            send(server(HarnessConfig::default()).router(), Method::GET, "/_harness/routes").await;
        assert_eq!(status, StatusCode::OK);
        let routes = body.as_array().unwrap();
        assert_eq!(routes.len(), 11);
        assert_eq!(routes[0]["name"], "root");
        assert_eq!(routes[0]["endpoint"], "pages#start");
    }

    #[tokio::test]
    async fn test_introspection_other_verbs_fall_through() {
        let (status, body) =
            send(server(HarnessConfig::default()).router(), Method::POST, "/_harness/routes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "route_not_found");
    }

    #[tokio::test]
    async fn test_introspection_disabled() {
        let mut config = HarnessConfig::default();
        config.introspection.enabled = false;
        let (status, _) = send(server(config).router(), Method::GET, "/_harness/routes").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_mount_fails_construction() {
        let mut config = HarnessConfig::default();
        config.spec_runner.enabled = true;
        config.spec_runner.mount_path = "specs".into();
        assert!(matches!(
            HttpServer::new(config),
            Err(ServerError::Config(ConfigError::Validation(errors)))
                if errors == vec![ValidationError::InvalidMountPath("specs".into())]
        ));
    }

    #[test]
    fn test_overlapping_introspection_path_is_rejected() {
        for path in ["/", "/{*rest}", "/css_test/:x", "/css_test/routes"] {
            let mut config = HarnessConfig::default();
            config.introspection.path = path.into();
            assert!(
                matches!(HttpServer::new(config), Err(ServerError::Config(_))),
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_dispatch_metrics_labelled_by_route() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        let router = server(HarnessConfig::default()).router();
        for path in ["/method_test/first", "/method_test/second", "/method_test/third.json"] {
            let (status, _) = send(router.clone(), Method::GET, path).await;
            assert_eq!(status, StatusCode::OK);
        }

        let rendered = handle.render();
        let totals: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("harness_dispatch_total{"))
            .collect();
        assert_eq!(totals.len(), 1, "{rendered}");
        assert!(totals[0].contains(r#"route="GET /method_test/:action(.:format)""#));
        assert!(totals[0].ends_with(" 3"));
        assert!(!rendered.contains("first"));
    }
}
