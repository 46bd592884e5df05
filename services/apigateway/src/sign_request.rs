use crate::constants::{ALGORITHM, SERVICE, SIGNED_HEADERS, TERMINATOR, X_AMZ_DATE};
use crate::SigningConfig;
use bytes::Bytes;
use gwexport_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256, EMPTY_STRING_SHA256};
use gwexport_core::time::{format_date, format_iso8601, DateTime};
use gwexport_core::Result;
use http::header::{ACCEPT, AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderValue, Method};
use log::debug;
use std::fmt::Write;

/// Representation the export is requested in.
///
/// Rendered as the `Accept` header, which is sent but never signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// `application/json`
    #[default]
    Json,
    /// `application/yaml`
    Yaml,
}

impl ExportFormat {
    /// Media type used in the `Accept` header.
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Yaml => "application/yaml",
        }
    }
}

/// RequestSigner implements AWS SigV4 for the API Gateway export request.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
/// - [GetExport](https://docs.aws.amazon.com/apigateway/latest/api/API_GetExport.html)
///
/// Only `GET /restapis/{id}/stages/{stage}/exports/swagger` without query or
/// body is signed, with `host` and `x-amz-date` as the signed headers.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: SigningConfig,
    format: Option<ExportFormat>,
}

impl RequestSigner {
    /// Create a new signer for the given config.
    pub fn new(config: SigningConfig) -> Self {
        Self {
            config,
            format: None,
        }
    }

    /// Send an `Accept` header asking for the given format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// The config used by this signer.
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// The requested format, if any.
    pub fn format(&self) -> Option<ExportFormat> {
        self.format
    }

    /// Sign the export request at the given time.
    ///
    /// The caller owns the clock: signing twice with the same `now` yields
    /// byte-identical output. A signature is time-bound, so sign again for
    /// every request sent.
    pub fn sign(&self, now: DateTime) -> Result<SignedRequest> {
        let cfg = &self.config;
        let host = host(cfg.region());
        let path = export_path(cfg.rest_api_id(), cfg.stage());
        let timestamp = format_iso8601(now);

        // Task 1: canonical request.
        let creq = canonical_request_string(&host, &path, &timestamp)?;
        debug!("calculated canonical request: {creq}");

        // Task 2: string to sign.
        let scope = credential_scope(now, cfg.region());
        debug!("calculated scope: {scope}");
        let string_to_sign = string_to_sign(&timestamp, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        // Task 3: signature.
        let signing_key = generate_signing_key(cfg.secret_access_key(), now, cfg.region());
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        // Task 4: headers.
        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            cfg.access_key_id(),
        ))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(HOST, HeaderValue::from_str(&host)?);
        headers.insert(X_AMZ_DATE, HeaderValue::from_str(&timestamp)?);
        headers.insert(AUTHORIZATION, authorization);
        if let Some(format) = self.format {
            headers.insert(ACCEPT, HeaderValue::from_static(format.media_type()));
        }

        Ok(SignedRequest {
            method: Method::GET,
            host,
            path,
            headers,
        })
    }
}

/// SignedRequest describes the request handed to the HTTP transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method, always `GET`.
    pub method: Method,
    /// Host like `apigateway.us-east-1.amazonaws.com`.
    pub host: String,
    /// Path like `/restapis/abc123/stages/prod/exports/swagger`.
    pub path: String,
    /// `host`, `x-amz-date`, `authorization` and optionally `accept`.
    pub headers: HeaderMap,
}

impl SignedRequest {
    /// Full https uri of this request.
    pub fn uri(&self) -> String {
        format!("https://{}{}", self.host, self.path)
    }

    /// Get the authorization header value.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Convert into a bodiless `http::Request` ready to be sent.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        let uri = self.uri();
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(Bytes::new())?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

/// Host of the api gateway control plane in the given region.
pub fn host(region: &str) -> String {
    format!("{SERVICE}.{region}.amazonaws.com")
}

/// Path of the swagger export of the given stage.
pub fn export_path(rest_api_id: &str, stage: &str) -> String {
    format!("/restapis/{rest_api_id}/stages/{stage}/exports/swagger")
}

/// Scope: "20220313/<region>/apigateway/aws4_request"
pub fn credential_scope(now: DateTime, region: &str) -> String {
    format!("{}/{region}/{SERVICE}/{TERMINATOR}", format_date(now))
}

/// Build the canonical request.
///
/// ```text
/// GET
/// /restapis/<rest_api_id>/stages/<stage>/exports/swagger
///
/// host:<host>
/// x-amz-date:<timestamp>
///
/// host;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
///
/// Every line is written on its own; a stray space anywhere still yields a
/// well-formed signature that the service will reject.
pub fn canonical_request_string(host: &str, path: &str, timestamp: &str) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", Method::GET)?;
    // Insert path, only unreserved characters are accepted so it's already encoded.
    writeln!(f, "{path}")?;
    // Insert query, which is always empty.
    writeln!(f)?;
    // Insert signed headers, sorted by name.
    writeln!(f, "{}:{host}", HOST)?;
    writeln!(f, "{X_AMZ_DATE}:{timestamp}")?;
    writeln!(f)?;
    writeln!(f, "{SIGNED_HEADERS}")?;
    // Insert payload hash, there is no body.
    write!(f, "{EMPTY_STRING_SHA256}")?;

    Ok(f)
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/apigateway/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(timestamp: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// Derive the signing key.
///
/// Each step feeds its raw digest as the key of the next one; only the final
/// signature is hex encoded.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), SERVICE.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), TERMINATOR.as_bytes())
}
