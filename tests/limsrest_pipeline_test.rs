//! End-to-end tests of the aggregation pipeline over HTTP
//!
//! A local mockito server stands in for LimsRest; the real client, transport
//! and orchestrator run against it.

use metadb_checker::adapters::limsrest::LimsRestClient;
use metadb_checker::config::{secret_string, AggregationConfig, LimsRestConfig, ManifestSelection};
use metadb_checker::core::aggregate::Aggregator;
use metadb_checker::core::output::write_json_lines;
use metadb_checker::domain::{CheckerError, Cutoff, LimsRestError};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

const BASIC_AUTH: &str = "Basic Y2hlY2tlcjpzM2NyZXQ=";
const CUTOFF_MILLIS: i64 = 1_614_211_200_000;

fn aggregator_for(server: &ServerGuard, password: &str) -> Aggregator {
    let config = LimsRestConfig {
        base_url: server.url(),
        username: "checker".to_string(),
        password: Some(secret_string(password.to_string())),
        ..Default::default()
    };
    let client = LimsRestClient::from_config(&config, ManifestSelection::First).unwrap();
    let (_tx, rx) = watch::channel(false);
    Aggregator::new(Arc::new(client), AggregationConfig::default(), rx)
}

async fn mock_deliveries(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", "/LimsRest/api/getDeliveries")
        .match_query(Matcher::UrlEncoded(
            "timestamp".into(),
            CUTOFF_MILLIS.to_string(),
        ))
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_shell(
    server: &mut ServerGuard,
    request_id: &str,
    samples: &[&str],
) -> mockito::Mock {
    let stubs: Vec<_> = samples
        .iter()
        .map(|s| json!({"igoSampleId": s, "igocomplete": true, "investigatorSampleId": null}))
        .collect();

    server
        .mock("GET", "/LimsRest/api/getRequestSamples")
        .match_query(Matcher::UrlEncoded("request".into(), request_id.into()))
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_body(
            json!({
                "requestId": request_id,
                "investigatorName": "Jane Doe",
                "piEmail": "pi@example.org",
                "recipe": "IMPACT468",
                "isCmoRequest": true,
                "pooledNormals": null,
                "samples": stubs
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_manifest(
    server: &mut ServerGuard,
    sample_id: &str,
    body: serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", "/LimsRest/api/getSampleManifest")
        .match_query(Matcher::UrlEncoded("igoSampleId".into(), sample_id.into()))
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await
}

fn manifest_body(sample_id: &str) -> serde_json::Value {
    json!([{
        "igoId": sample_id,
        "cmoPatientId": format!("C-{sample_id}"),
        "baitSet": "IMPACT468_BAITS",
        "libraries": [{
            "barcodeId": "DUAL_IDT_LIB_1",
            "dnaInputNg": 200.0,
            "runs": [{
                "runId": "PITT_0500",
                "flowCellId": "HCYYWBBXY",
                "fastqs": [format!("/igo/delivery/{sample_id}_R1.fastq.gz")]
            }]
        }]
    }])
}

#[tokio::test]
async fn test_full_pipeline_over_http() {
    let mut server = Server::new_async().await;
    let deliveries = mock_deliveries(
        &mut server,
        json!([{"deliveryDate": 1614268800000i64, "request": "06000_AB"}]),
    )
    .await;
    let shell = mock_shell(&mut server, "06000_AB", &["06000_AB_1", "06000_AB_2"]).await;
    let first = mock_manifest(&mut server, "06000_AB_1", manifest_body("06000_AB_1")).await;
    let second = mock_manifest(&mut server, "06000_AB_2", manifest_body("06000_AB_2")).await;

    let results = aggregator_for(&server, "s3cret")
        .aggregate(Cutoff::from_millis(CUTOFF_MILLIS))
        .await
        .unwrap();

    deliveries.assert_async().await;
    shell.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;

    assert_eq!(results.len(), 1);
    let request = results.iter().next().unwrap();
    assert_eq!(request.metadata.investigator_name, "Jane Doe");
    assert!(request.metadata.pooled_normals.is_empty());
    assert_eq!(request.samples.len(), 2);
    assert_eq!(request.samples[1].cmo_patient_id, "C-06000_AB_2");
    assert_eq!(request.samples[0].run_count(), 1);

    let mut out = Vec::new();
    write_json_lines(&results, &mut out).unwrap();
    let line: serde_json::Value =
        serde_json::from_str(String::from_utf8(out).unwrap().trim_end()).unwrap();
    assert_eq!(line["requestId"], "06000_AB");
    assert_eq!(line["piEmail"], "pi@example.org");
    assert_eq!(line["isCmoRequest"], true);
    assert_eq!(line["samples"][0]["libraries"][0]["runs"][0]["runId"], "PITT_0500");
}

#[tokio::test]
async fn test_rejected_credentials_fail_the_run() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/LimsRest/api/getDeliveries")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = aggregator_for(&server, "wrong")
        .aggregate(Cutoff::from_millis(CUTOFF_MILLIS))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckerError::Request(LimsRestError::Authentication { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_manifest_server_error_fails_the_run() {
    let mut server = Server::new_async().await;
    let _deliveries = mock_deliveries(
        &mut server,
        json!([
            {"deliveryDate": 1614268800000i64, "request": "06000_AB"},
            {"deliveryDate": 1614355200000i64, "request": "06000_AC"}
        ]),
    )
    .await;
    let _shell_ab = mock_shell(&mut server, "06000_AB", &["06000_AB_1"]).await;
    let _shell_ac = mock_shell(&mut server, "06000_AC", &["06000_AC_1"]).await;
    let _manifest_ab = mock_manifest(&mut server, "06000_AB_1", manifest_body("06000_AB_1")).await;
    let _manifest_ac = server
        .mock("GET", "/LimsRest/api/getSampleManifest")
        .match_query(Matcher::UrlEncoded("igoSampleId".into(), "06000_AC_1".into()))
        .with_status(500)
        .with_body("java.lang.NullPointerException")
        .create_async()
        .await;

    let err = aggregator_for(&server, "s3cret")
        .aggregate(Cutoff::from_millis(CUTOFF_MILLIS))
        .await
        .unwrap_err();

    match err {
        CheckerError::Request(LimsRestError::Status { status, body, .. }) => {
            assert_eq!(status, 500);
            assert!(body.contains("NullPointerException"));
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_manifest_array_over_http() {
    let mut server = Server::new_async().await;
    let _deliveries = mock_deliveries(
        &mut server,
        json!([{"deliveryDate": 1614268800000i64, "request": "06000_AB"}]),
    )
    .await;
    let _shell = mock_shell(&mut server, "06000_AB", &["06000_AB_1"]).await;
    let _manifest = mock_manifest(&mut server, "06000_AB_1", json!([])).await;

    let err = aggregator_for(&server, "s3cret")
        .aggregate(Cutoff::from_millis(CUTOFF_MILLIS))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckerError::EmptyResult { .. }));
}

#[tokio::test]
async fn test_no_deliveries_over_http() {
    let mut server = Server::new_async().await;
    let _deliveries = mock_deliveries(&mut server, json!([])).await;

    let results = aggregator_for(&server, "s3cret")
        .aggregate(Cutoff::from_millis(CUTOFF_MILLIS))
        .await
        .unwrap();

    assert!(results.is_empty());
}
