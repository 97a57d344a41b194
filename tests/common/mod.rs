//! Shared utilities for integration testing.

use std::net::SocketAddr;

use spec_harness_router::{HarnessConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A harness server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with `config`. The listener is bound before this returns,
/// so requests can be sent immediately.
pub async fn start_server(config: HarnessConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        shutdown,
        client,
    }
}

/// Default config with the spec runner mounted.
#[allow(dead_code)]
pub fn config_with_spec_runner() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.spec_runner.enabled = true;
    config
}
