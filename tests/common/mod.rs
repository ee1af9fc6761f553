//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ethereum_balance_exporter::config::loader::parse_config_with;
use ethereum_balance_exporter::{HttpServer, NetworkRegistry, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers `eth_getBalance` with a fixed reply, echoing the request id.
struct BalanceReply {
    payload: Value,
    delay: Duration,
}

impl Respond for BalanceReply {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.get("id").cloned())
            .unwrap_or(Value::Null);

        let mut body = json!({ "jsonrpc": "2.0", "id": id });
        if let (Some(body), Some(payload)) = (body.as_object_mut(), self.payload.as_object()) {
            body.extend(payload.clone());
        }
        ResponseTemplate::new(200).set_body_json(body).set_delay(self.delay)
    }
}

async fn start_node(payload: Value, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBalance" })))
        .respond_with(BalanceReply { payload, delay })
        .mount(&server)
        .await;
    server
}

/// A JSON-RPC node reporting `balance_hex` wei for every account.
pub async fn start_rpc_node(balance_hex: &str) -> MockServer {
    start_node(json!({ "result": balance_hex }), Duration::ZERO).await
}

/// A node that answers only after `delay`.
pub async fn start_slow_rpc_node(balance_hex: &str, delay: Duration) -> MockServer {
    start_node(json!({ "result": balance_hex }), delay).await
}

/// A node that answers every balance query with a JSON-RPC error.
pub async fn start_failing_rpc_node() -> MockServer {
    start_node(
        json!({ "error": { "code": -32000, "message": "header not found" } }),
        Duration::ZERO,
    )
    .await
}

/// A running exporter bound to an ephemeral port.
pub struct Exporter {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Exporter {
    pub fn url(&self) -> String {
        format!("http://{}/metrics", self.addr)
    }
}

impl Drop for Exporter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Validate `yaml`, build the registry and serve it.
pub async fn start_exporter(yaml: &str) -> Exporter {
    let config = Arc::new(parse_config_with(yaml, |_| None).expect("test config must be valid"));
    let registry = Arc::new(NetworkRegistry::connect(&config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, registry);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Exporter { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Lines of `body` that are `ethereum_balance` gauge samples.
pub fn balance_samples(body: &str) -> Vec<String> {
    body.lines()
        .filter(|l| l.starts_with("ethereum_balance{"))
        .map(str::to_string)
        .collect()
}
