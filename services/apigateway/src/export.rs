use crate::constants::{X_AMZN_ERROR_TYPE, X_AMZN_REQUEST_ID};
use crate::{ExportFormat, RequestSigner};
use bytes::Bytes;
use gwexport_core::time::{now, DateTime};
use gwexport_core::{Context, Error, Result};
use http::{HeaderMap, StatusCode};
use log::{debug, warn};

/// ExportClient fetches the swagger export of one stage.
///
/// There is no retry: a failed fetch is reported as is and the caller decides
/// whether to call again.
#[derive(Debug, Clone)]
pub struct ExportClient {
    ctx: Context,
    signer: RequestSigner,
}

impl ExportClient {
    /// Create a new client sending requests through the given context.
    pub fn new(ctx: Context, signer: RequestSigner) -> Self {
        Self { ctx, signer }
    }

    /// Fetch the export, signed with the current time.
    pub async fn fetch(&self) -> Result<Export> {
        self.fetch_at(now()).await
    }

    /// Fetch the export, signed with the given time.
    ///
    /// - 2xx: returns the body.
    /// - 403: fails with [`ErrorKind::AuthenticationRejected`](gwexport_core::ErrorKind::AuthenticationRejected),
    ///   the body parsed as JSON is attached as payload.
    /// - others: fails with [`ErrorKind::Unexpected`](gwexport_core::ErrorKind::Unexpected).
    ///
    /// Transport failures are returned as reported by the context's
    /// [`HttpSend`](gwexport_core::HttpSend).
    pub async fn fetch_at(&self, now: DateTime) -> Result<Export> {
        let signed = self.signer.sign(now)?;
        let uri = signed.uri();
        debug!("fetching export from {uri}");

        let resp = self.ctx.http_send(signed.into_http_request()?).await?;
        let (parts, body) = resp.into_parts();

        let body = check_response(parts.status, &parts.headers, body)
            .map_err(|e| e.with_context(format!("uri: {uri}")))?;

        Ok(Export {
            format: self.signer.format().unwrap_or_default(),
            body,
        })
    }
}

/// Export is the successful response of an export request.
#[derive(Debug, Clone)]
pub struct Export {
    format: ExportFormat,
    body: Bytes,
}

impl Export {
    /// The format that was requested.
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response body as text.
    pub fn text(&self) -> Result<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Parse the body as a JSON document.
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::unexpected("failed to parse export as json")
                .with_source(e)
                .with_context(format!("response_length: {}", self.body.len()))
        })
    }

    /// Consume the export and take the body out.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Classify a response by its status.
fn check_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Result<Bytes> {
    if status.is_success() {
        return Ok(body);
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let error_type = header(X_AMZN_ERROR_TYPE);
    let request_id = header(X_AMZN_REQUEST_ID);

    let mut err = if status == StatusCode::FORBIDDEN {
        // Api gateway answers with `{"message": "..."}`, but keep whatever came back.
        let payload = serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
        });
        warn!("export request rejected: {payload}");

        let message = payload
            .get("message")
            .or_else(|| payload.get("Message"))
            .and_then(|v| v.as_str())
            .unwrap_or("request rejected by api gateway")
            .to_string();
        Error::authentication_rejected(message).with_payload(payload)
    } else {
        Error::unexpected("api gateway returned error")
            .with_context(format!("status: {status}"))
            .with_context(format!("body: {}", String::from_utf8_lossy(&body)))
    };

    if let Some(v) = error_type {
        err = err.with_context(format!("error_type: {v}"));
    }
    if let Some(v) = request_id {
        err = err.with_context(format!("request_id: {v}"));
    }
    Err(err)
}
