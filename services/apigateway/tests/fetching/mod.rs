mod live;

use super::example_config;
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use gwexport_apigateway::{ExportClient, ExportFormat, RequestSigner};
use gwexport_core::time::parse_rfc3339;
use gwexport_core::{Context, Error, ErrorKind, HttpSend};
use http::StatusCode;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

/// MockHttpSend records the request it receives and answers with a fixed response.
#[derive(Debug, Clone)]
struct MockHttpSend {
    status: StatusCode,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
    received: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
            received: Arc::default(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    fn received(&self) -> Vec<http::Request<Bytes>> {
        std::mem::take(&mut *self.received.lock().expect("lock poisoned"))
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
    ) -> gwexport_core::Result<http::Response<Bytes>> {
        self.received.lock().expect("lock poisoned").push(req);

        let mut builder = http::Response::builder().status(self.status);
        for (k, v) in &self.headers {
            builder = builder.header(*k, *v);
        }
        Ok(builder.body(Bytes::from_static(self.body.as_bytes()))?)
    }
}

/// FailingHttpSend fails like a refused connection.
#[derive(Debug)]
struct FailingHttpSend;

#[async_trait]
impl HttpSend for FailingHttpSend {
    async fn http_send(
        &self,
        _: http::Request<Bytes>,
    ) -> gwexport_core::Result<http::Response<Bytes>> {
        Err(Error::transport("connection refused").set_retryable(true))
    }
}

#[tokio::test]
async fn test_fetch_success() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{"swagger":"2.0","info":{"title":"PetStore","version":"1"},"paths":{}}"#,
    );
    let ctx = Context::new().with_http_send(http.clone());
    let signer = RequestSigner::new(example_config()).with_format(ExportFormat::Json);
    let client = ExportClient::new(ctx, signer);

    let export = client
        .fetch_at(parse_rfc3339("2024-01-15T12:00:00Z")?)
        .await?;
    assert_eq!(export.format(), ExportFormat::Json);
    assert_eq!(export.json()?["info"]["title"], "PetStore");

    let received = http.received();
    assert_eq!(received.len(), 1);
    let req = &received[0];
    assert_eq!(req.method(), http::Method::GET);
    assert_eq!(
        req.uri().to_string(),
        "https://apigateway.us-east-1.amazonaws.com/restapis/abc123/stages/prod/exports/swagger"
    );
    assert_eq!(req.headers()["host"], "apigateway.us-east-1.amazonaws.com");
    assert_eq!(req.headers()["x-amz-date"], "20240115T120000Z");
    assert_eq!(req.headers()["accept"], "application/json");
    assert_eq!(
        req.headers()["authorization"],
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240115/us-east-1/apigateway/aws4_request, \
         SignedHeaders=host;x-amz-date, \
         Signature=fe5b912c068ce90fff12dce04abe1feae00cc6f54f3cde6dfe2b81f1465b6477"
    );
    assert!(req.body().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_fetch_signs_every_request() -> Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "{}");
    let ctx = Context::new().with_http_send(http.clone());
    let client = ExportClient::new(ctx, RequestSigner::new(example_config()));

    client.fetch_at(parse_rfc3339("2024-01-15T12:00:00Z")?).await?;
    client.fetch_at(parse_rfc3339("2024-01-15T12:00:01Z")?).await?;

    let received = http.received();
    assert_eq!(received.len(), 2);
    assert_ne!(
        received[0].headers()["authorization"],
        received[1].headers()["authorization"]
    );
    assert!(received[0].headers().get("accept").is_none());
    Ok(())
}

#[tokio::test]
async fn test_fetch_forbidden() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::FORBIDDEN,
        r#"{"message":"The security token included in the request is invalid."}"#,
    )
    .with_header("x-amzn-ErrorType", "UnrecognizedClientException")
    .with_header("x-amzn-RequestId", "0b4f0f6e-1111-4f0a-8f0e-222222222222");
    let ctx = Context::new().with_http_send(http);
    let client = ExportClient::new(ctx, RequestSigner::new(example_config()));

    let err = client
        .fetch_at(parse_rfc3339("2024-01-15T12:00:00Z")?)
        .await
        .expect_err("403 must be rejected");

    assert_eq!(err.kind(), ErrorKind::AuthenticationRejected);
    assert!(!err.is_retryable());
    assert_eq!(
        err.payload(),
        Some(&serde_json::json!({
            "message": "The security token included in the request is invalid."
        }))
    );
    assert!(err
        .context()
        .contains(&"error_type: UnrecognizedClientException".to_string()));
    assert!(err
        .context()
        .contains(&"request_id: 0b4f0f6e-1111-4f0a-8f0e-222222222222".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_fetch_not_found() -> Result<()> {
    let http = MockHttpSend::new(
        StatusCode::NOT_FOUND,
        r#"{"message":"Invalid stage identifier specified"}"#,
    );
    let ctx = Context::new().with_http_send(http);
    let client = ExportClient::new(ctx, RequestSigner::new(example_config()));

    let err = client
        .fetch_at(parse_rfc3339("2024-01-15T12:00:00Z")?)
        .await
        .expect_err("404 must fail");

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.payload().is_none());
    assert!(err.to_string().contains("404 Not Found"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_transport_error() -> Result<()> {
    let ctx = Context::new().with_http_send(FailingHttpSend);
    let client = ExportClient::new(ctx, RequestSigner::new(example_config()));

    let err = client
        .fetch_at(parse_rfc3339("2024-01-15T12:00:00Z")?)
        .await
        .expect_err("transport must fail");

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_fetch_without_http_client() -> Result<()> {
    let client = ExportClient::new(Context::new(), RequestSigner::new(example_config()));

    let err = client.fetch().await.expect_err("noop http send must fail");
    assert_eq!(err.kind(), ErrorKind::Transport);
    Ok(())
}
