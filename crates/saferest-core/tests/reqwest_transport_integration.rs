//! Integration tests for the reqwest-backed transport.
//!
//! These tests run the full client against mock HTTP servers.

use std::future::Future;
use std::time::Duration;

use saferest_core::{
    create_client, Client, ClientConfig, ReadRequest, TransportError, WriteRequest,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One-shot HTTP server for responses wiremock cannot produce
async fn raw_server<F, Fut>(respond: F) -> String
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            respond(stream).await;
        }
    });
    format!("http://{addr}")
}

fn client_for(server: &MockServer) -> Client {
    create_client(ClientConfig::new().with_base_url(format!("{}/api/", server.uri())))
        .expect("client should build")
}

#[tokio::test]
async fn get_joins_base_url_and_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("done", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let todos: Value = client
        .get(ReadRequest::new("/todos").query("done", "false"))
        .await
        .unwrap();
    assert_eq!(todos, json!([{"id": 1}]));
}

#[tokio::test]
async fn post_sends_json_body_headers_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(header("x-tenant", "acme"))
        .and(header("content-type", "application/json"))
        .and(basic_auth("service", "s3cret"))
        .and(body_json(json!({"title": "from test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_auth("service", "s3cret")
        .with_header("X-Tenant", "acme");
    let client: Client = create_client(config).unwrap();

    let (err, created) = client
        .post::<Value, _, _>(WriteRequest::new("api/todos", json!({"title": "from test"})).safe())
        .await
        .into_parts();
    assert!(err.is_none(), "unexpected error: {err:?}");
    assert_eq!(created.unwrap()["id"], 42);
}

#[tokio::test]
async fn error_response_is_raw_in_throwing_mode() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "err": {"message": "read only", "code": "READ_ONLY"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .delete::<Value, _>(ReadRequest::new("todos/1"))
        .await
        .unwrap_err();

    match err {
        TransportError::Response {
            status,
            status_text,
            data,
            ..
        } => {
            assert_eq!(status, 403);
            assert_eq!(status_text, "Forbidden");
            assert_eq!(data["err"]["code"], "READ_ONLY");
        }
        other => panic!("expected response failure, got {other:?}"),
    }
}

#[tokio::test]
async fn error_response_is_normalized_in_safe_mode() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"message": "version conflict", "code": "STALE"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .put::<Value, _, _>(WriteRequest::new("/todos/1", json!({"title": "x"})).safe())
        .await;

    let err = response.error().unwrap();
    assert_eq!(err.status(), 409);
    assert_eq!(err.status_text(), "Conflict");
    assert_eq!(err.message(), "version conflict");
    assert_eq!(err.code().map(String::as_str), Some("STALE"));
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (err, _) = client
        .patch::<Value, _, _>(WriteRequest::new("/todos/1", json!({})).safe())
        .await
        .into_parts();
    let err = err.unwrap();
    assert_eq!(err.status(), 502);
    assert_eq!(err.message(), "Bad Gateway");
}

#[tokio::test]
async fn empty_success_body_decodes_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let deleted: Option<Value> = client.delete(ReadRequest::new("/todos/1")).await.unwrap();
    assert!(deleted.is_none());
}

#[tokio::test]
async fn connection_failure_normalizes_to_status_zero() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client: Client = create_client(ClientConfig::new().with_base_url(uri)).unwrap();

    let raw = client.get::<Value, _>(ReadRequest::new("/todos")).await;
    assert!(matches!(raw, Err(TransportError::Network { .. })));

    let (err, data) = client
        .get::<Value, _>(ReadRequest::new("/todos").safe())
        .await
        .into_parts();
    let err = err.unwrap();
    assert!(data.is_none());
    assert_eq!(err.status(), 0);
    assert_eq!(err.status_text(), "Unknown Error");
    assert_eq!(err.message(), "Unhandled Rejection");
}

#[tokio::test]
async fn per_call_timeout_is_passed_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (err, _) = client
        .get::<Value, _>(ReadRequest::new("/slow").timeout(Duration::from_millis(50)).safe())
        .await
        .into_parts();
    assert_eq!(err.unwrap().message(), "Unhandled Rejection");
}

#[tokio::test]
async fn body_limit_is_enforced_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client: Client = create_client(
        ClientConfig::new()
            .with_base_url(server.uri())
            .with_max_body_length(16),
    )
    .unwrap();

    let oversized = WriteRequest::new("/todos", json!({"title": "far too long for the limit"}));
    let err = client.post::<Value, _, _>(oversized).await.unwrap_err();
    assert!(matches!(err, TransportError::BodyTooLarge { limit: 16, .. }));
}

#[tokio::test]
async fn content_limit_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(1024)))
        .mount(&server)
        .await;

    let client: Client = create_client(
        ClientConfig::new()
            .with_base_url(server.uri())
            .with_max_content_length(128),
    )
    .unwrap();

    let err = client.get::<Value, _>(ReadRequest::new("/big")).await.unwrap_err();
    assert!(matches!(err, TransportError::ContentTooLarge { limit: 128, .. }));
}

#[tokio::test]
async fn content_limit_stops_reading_a_chunked_body() {
    let uri = raw_server(|mut stream| async move {
        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: application/json\r\n\
                    Transfer-Encoding: chunked\r\n\r\n";
        if stream.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        let chunk = format!("400\r\n{}\r\n", "x".repeat(1024));
        // 8 MiB in 1 KiB chunks; the client hangs up long before the end
        for _ in 0..8 * 1024 {
            if stream.write_all(chunk.as_bytes()).await.is_err() {
                return;
            }
        }
        let _ = stream.write_all(b"0\r\n\r\n").await;
    })
    .await;

    let client: Client = create_client(
        ClientConfig::new()
            .with_base_url(uri)
            .with_max_content_length(128),
    )
    .unwrap();

    let err = client.get::<Value, _>(ReadRequest::new("/stream")).await.unwrap_err();
    match err {
        TransportError::ContentTooLarge { length, limit } => {
            assert_eq!(limit, 128);
            assert!(length <= 128 + 1024, "read {length} bytes past a 128 byte limit");
        }
        other => panic!("expected content limit failure, got {other:?}"),
    }
}

#[tokio::test]
async fn server_reason_phrase_becomes_status_text() {
    let uri = raw_server(|mut stream| async move {
        let body = r#"{"fields":["title"]}"#;
        let response = format!(
            "HTTP/1.1 400 Validation Failed\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
    })
    .await;

    let client: Client = create_client(ClientConfig::new().with_base_url(uri)).unwrap();
    let (err, _) = client
        .get::<Value, _>(ReadRequest::new("/todos").safe())
        .await
        .into_parts();
    let err = err.unwrap();
    assert_eq!(err.status(), 400);
    assert_eq!(err.status_text(), "Validation Failed");
    assert_eq!(err.message(), "Validation Failed");
}

#[tokio::test]
async fn path_with_colon_is_joined_onto_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users:search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let users: Value = client.get(ReadRequest::new("users:search")).await.unwrap();
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn relative_url_without_base_is_invalid() {
    let client: Client = create_client(ClientConfig::default()).unwrap();
    let err = client
        .get::<Value, _>(ReadRequest::new("/todos"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::InvalidRequest { .. }));
}
