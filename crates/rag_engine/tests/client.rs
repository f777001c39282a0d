use std::io::Write;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rag_engine::{ApiSettings, FailureKind, RagApi, ReqwestRagClient};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestRagClient {
    ReqwestRagClient::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn ingest_text_posts_exact_json_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/text"))
        .and(body_json(json!({"source_name": "notes", "text": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "stored", "chunks": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server)
        .ingest_text("notes", "hello")
        .await
        .expect("ingest ok");
    assert_eq!(receipt.chunks, 7);
    assert_eq!(receipt.status.as_deref(), Some("stored"));
}

#[tokio::test]
async fn server_detail_is_carried_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/text"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Empty text after cleanup"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .ingest_text("notes", "")
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 400,
            detail: Some("Empty text after cleanup".to_string()),
        }
    );
    assert_eq!(err.detail(), Some("Empty text after cleanup"));
    assert_eq!(err.to_string(), "Empty text after cleanup");
}

#[tokio::test]
async fn missing_or_non_json_detail_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ingest/text"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search("q", 5).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 500,
            detail: None
        }
    );

    let err = client.ingest_text("n", "t").await.unwrap_err();
    assert_eq!(err.detail(), None);
    assert!(matches!(err.kind, FailureKind::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn validation_detail_lists_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "query"], "msg": "field required", "type": "missing"},
                {"loc": ["body", "limit"], "msg": "not an int", "type": "int_parsing"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).search("", 5).await.unwrap_err();
    assert_eq!(err.detail(), Some("field required; not an int"));
}

#[tokio::test]
async fn search_posts_query_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": "what is rust", "limit": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"source_name": "a.md", "source_type": "markdown", "content": "alpha", "score": 0.91},
                {"source_name": "b.pdf", "source_type": "pdf", "content": "beta", "score": 0.42}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client_for(&server)
        .search("what is rust", 5)
        .await
        .expect("search ok");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source_name, "a.md");
    assert_eq!(hits[1].source_type, "pdf");
    assert_eq!(hits[1].content, "beta");
}

#[tokio::test]
async fn search_without_results_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let hits = client_for(&server).search("q", 5).await.expect("search ok");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).ingest_text("n", "t").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn ingest_file_uploads_multipart_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest/file"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("# Title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "stored", "chunks": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new()
        .suffix(".md")
        .tempfile()
        .expect("temp file");
    file.write_all(b"# Title\n\nbody\n").expect("write");
    file.flush().expect("flush");

    let receipt = client_for(&server)
        .ingest_file(file.path())
        .await
        .expect("upload ok");
    assert_eq!(receipt.chunks, 3);

    let requests = server.received_requests().await.expect("recorded");
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    let file_name = file.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(body.contains(&format!("filename=\"{file_name}\"")));
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = NamedTempFile::new().expect("temp file");
    let gone = temp.path().with_extension("missing.md");
    let err = client_for(&server).ingest_file(&gone).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::FileRead);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = ReqwestRagClient::new(ApiSettings {
        base_url: format!("{}/api/", server.uri()),
        ..ApiSettings::default()
    })
    .expect("client");
    let health = client.health().await.expect("health ok");
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn request_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"results": []})),
        )
        .mount(&server)
        .await;

    let client = ReqwestRagClient::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..ApiSettings::default()
    })
    .expect("client");
    let err = client.search("q", 5).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestRagClient::new(ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
