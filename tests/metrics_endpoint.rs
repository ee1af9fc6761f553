//! End-to-end scrapes against mock JSON-RPC nodes.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
// 13349950070172682 wei
const BALANCE_HEX: &str = "0x2f6db577b3ac0a";

#[tokio::test]
async fn test_scrape_reports_balance() {
    let node = common::start_rpc_node(BALANCE_HEX).await;
    let exporter = common::start_exporter(&format!(
        r#"
networks:
  - name: mainnet
    rpc-endpoint: {}
addresses:
  - address: "{ALICE}"
    name: alice
    network: mainnet
"#,
        node.uri()
    ))
    .await;

    let res = common::client().get(exporter.url()).send().await.expect("exporter unreachable");
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();

    assert_eq!(
        common::balance_samples(&body),
        vec![format!(
            "ethereum_balance{{address=\"{ALICE}\",address_name=\"alice\",network_name=\"mainnet\"}} 1.3349950070172682e+16"
        )]
    );
    assert!(!body.contains("ethereum_balance_errors_total{"));
}

#[tokio::test]
async fn test_unreachable_network_degrades_scrape() {
    let node = common::start_rpc_node(BALANCE_HEX).await;
    let exporter = common::start_exporter(&format!(
        r#"
networks:
  - name: mainnet
    rpc-endpoint: {}
  - name: offline
    rpc-endpoint: http://127.0.0.1:9
addresses:
  - address: "{ALICE}"
    name: alice
    network: mainnet
  - address: "{BOB}"
    name: bob
    network: offline
scrape:
  rpc_timeout_secs: 2
  deadline_secs: 5
"#,
        node.uri()
    ))
    .await;

    let res = common::client().get(exporter.url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();

    let samples = common::balance_samples(&body);
    assert_eq!(samples.len(), 1);
    assert!(samples[0].contains("address_name=\"alice\""));
    assert!(body.contains(&format!(
        "ethereum_balance_errors_total{{address=\"{BOB}\",address_name=\"bob\",network_name=\"offline\"}} 1"
    )));
}

#[tokio::test]
async fn test_slow_node_times_out() {
    let node = common::start_slow_rpc_node(BALANCE_HEX, Duration::from_secs(5)).await;
    let exporter = common::start_exporter(&format!(
        r#"
networks:
  - name: mainnet
    rpc-endpoint: {}
addresses:
  - address: "{ALICE}"
    name: alice
    network: mainnet
scrape:
  rpc_timeout_secs: 1
  deadline_secs: 3
"#,
        node.uri()
    ))
    .await;

    let res = common::client().get(exporter.url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();

    assert!(common::balance_samples(&body).is_empty());
    assert!(body.contains("ethereum_balance_errors_total{"));
}

#[tokio::test]
async fn test_rpc_error_counts_per_scrape() {
    let node = common::start_failing_rpc_node().await;
    let exporter = common::start_exporter(&format!(
        r#"
networks:
  - name: mainnet
    rpc-endpoint: {}
addresses:
  - address: "{ALICE}"
    name: alice
    network: mainnet
"#,
        node.uri()
    ))
    .await;

    let client = common::client();
    for expected in 1..=2 {
        let body = client.get(exporter.url()).send().await.unwrap().text().await.unwrap();
        assert!(common::balance_samples(&body).is_empty());
        assert!(body.contains(&format!("network_name=\"mainnet\"}} {expected}")), "body: {body}");
    }
}

#[tokio::test]
async fn test_static_bearer_token() {
    let node = common::start_rpc_node(BALANCE_HEX).await;
    let exporter = common::start_exporter(&format!(
        r#"
networks:
  - name: mainnet
    rpc-endpoint: {}
addresses:
  - address: "{ALICE}"
    name: alice
    network: mainnet
static_bearer_token: token-123
"#,
        node.uri()
    ))
    .await;

    let client = common::client();
    let res = client.get(exporter.url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let error: serde_json::Value = res.json().await.unwrap();
    assert_eq!(error["error"], "Authorization header missing");

    let res = client.get(exporter.url()).bearer_auth("token-123").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::balance_samples(&res.text().await.unwrap()).len(), 1);
}
