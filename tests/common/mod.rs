//! Shared utilities for integration testing.

use std::net::SocketAddr;

use minimal_routes::config::parse_config;
use minimal_routes::http::HttpServer;
use minimal_routes::lifecycle::Shutdown;
use minimal_routes::render::DebugApp;

/// Route table shared by the integration tests.
pub const ROUTES: &str = r#"
[routes.home]
page = "/"

[routes.product]
page = "/product"
pattern = "/products/:slug"

[routes.files]
page = "/files"
pattern = "/files/:path+"

[routes.weird]
page = "/weird"
pattern = "/weird/:optional_repeat*/:duplicate/:duplicate"
"#;

/// Build a server for `config` without binding it.
pub fn server(config: &str) -> HttpServer {
    let config = parse_config(config).unwrap();
    HttpServer::from_config(config, DebugApp::new()).unwrap()
}

/// Start a server on an ephemeral port. Trigger the returned handle to stop it.
pub async fn spawn_server(config: &str) -> (SocketAddr, Shutdown) {
    let server = server(config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
