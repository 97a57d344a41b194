//! The spec harness route declarations.
//!
//! Built once at startup. The spec runner mount only exists when the
//! options say the runner is available; otherwise `/specs` is a plain miss.

use axum::http::Method;

use crate::routing::error::RoutingError;
use crate::routing::route::{ActionRef, Endpoint};
use crate::routing::router::RouteTable;

/// Default mount point of the spec runner.
pub const SPEC_RUNNER_PATH: &str = "/specs";

/// Default name of the spec runner sub-application.
pub const SPEC_RUNNER_APP: &str = "spec_runner";

/// Route name of the spec runner mount, for path generation.
pub const SPEC_RUNNER_ROUTE: &str = "spec_runner";

/// Where and under what name the spec runner is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunnerMount {
    pub mount_path: String,
    pub app: String,
}

impl Default for SpecRunnerMount {
    fn default() -> Self {
        Self {
            mount_path: SPEC_RUNNER_PATH.to_string(),
            app: SPEC_RUNNER_APP.to_string(),
        }
    }
}

/// Options resolved once before the table is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessOptions {
    /// `None` when the spec runner is not available in this process.
    pub spec_runner: Option<SpecRunnerMount>,
}

impl HarnessOptions {
    pub fn with_spec_runner() -> Self {
        Self {
            spec_runner: Some(SpecRunnerMount::default()),
        }
    }
}

/// Actions a singular resource can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    New,
    Create,
}

impl ResourceAction {
    fn method(self) -> Method {
        match self {
            ResourceAction::New => Method::GET,
            ResourceAction::Create => Method::POST,
        }
    }

    fn action(self) -> &'static str {
        match self {
            ResourceAction::New => "new",
            ResourceAction::Create => "create",
        }
    }
}

/// Build the harness route table.
pub fn harness_routes(options: &HarnessOptions) -> Result<RouteTable, RoutingError> {
    let mut table = RouteTable::new();

    if let Some(runner) = &options.spec_runner {
        table.mount(SPEC_RUNNER_ROUTE, &runner.mount_path, &runner.app)?;
    }

    table.register_named("root", Method::GET, "/", action("pages", "start"))?;

    table
        .register(Method::GET, "/method_test/:action", wildcard("method_test"))?
        .register(Method::POST, "/method_test/:action", wildcard("method_test"))?;

    table
        .register(Method::GET, "/binding_test/:action", wildcard("binding_test"))?
        .register(Method::GET, "/css_test/:action", wildcard("css_test"))?
        .register(Method::GET, "/error_test/:action", wildcard("error_test"))?
        .register(Method::POST, "/error_test/:action", wildcard("error_test"))?;

    let form_actions = [ResourceAction::New, ResourceAction::Create];
    resource(&mut table, "form_test", "basic", &form_actions)?;
    resource(&mut table, "form_test", "upload", &form_actions)?;

    Ok(table)
}

/// Register a singular resource under `namespace`.
///
/// `new` is `GET /ns/res/new` named `new_ns_res`; `create` is
/// `POST /ns/res` named `ns_res`. The controller is `ns/res`.
pub fn resource(
    table: &mut RouteTable,
    namespace: &str,
    name: &str,
    actions: &[ResourceAction],
) -> Result<(), RoutingError> {
    let controller = format!("{namespace}/{name}");
    let base_name = format!("{namespace}_{name}");
    let base_path = format!("/{namespace}/{name}");

    for &kind in actions {
        let (route_name, path) = match kind {
            ResourceAction::New => (format!("new_{base_name}"), format!("{base_path}/new")),
            ResourceAction::Create => (base_name.clone(), base_path.clone()),
        };
        table.register_named(&route_name, kind.method(), &path, action(&controller, kind.action()))?;
    }

    Ok(())
}

fn action(controller: &str, action: &str) -> Endpoint {
    Endpoint::Action {
        controller: controller.to_string(),
        action: ActionRef::Fixed(action.to_string()),
    }
}

fn wildcard(controller: &str) -> Endpoint {
    Endpoint::Action {
        controller: controller.to_string(),
        action: ActionRef::FromPath,
    }
}
