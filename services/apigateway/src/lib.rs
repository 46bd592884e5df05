//! AWS API Gateway export signer
//!
//! Signs `GET /restapis/{id}/stages/{stage}/exports/swagger` with AWS SigV4
//! and fetches the export through a [`Context`](gwexport_core::Context).
//!
//! ## Example
//!
//! ```no_run
//! use gwexport_apigateway::{ExportClient, ExportFormat, RequestSigner, SigningConfig};
//! use gwexport_core::{time, Context};
//!
//! # async fn example() -> gwexport_core::Result<()> {
//! let cfg = SigningConfig::new("AKIDEXAMPLE", "secret", "us-east-1", "abc123", "prod")?;
//! let signer = RequestSigner::new(cfg).with_format(ExportFormat::Json);
//!
//! // Sign without sending.
//! let signed = signer.sign(time::now())?;
//! println!("{}", signed.uri());
//!
//! // Or sign and send through a context with a configured http client.
//! let client = ExportClient::new(Context::new(), signer);
//! let swagger = client.fetch().await?.json()?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{AWS_ACCESS_KEY_ID, AWS_DEFAULT_REGION, AWS_REGION, AWS_SECRET_ACCESS_KEY};
pub use constants::{GWEXPORT_REST_API_ID, GWEXPORT_STAGE};

mod config;
pub use config::SigningConfig;

mod sign_request;
pub use sign_request::{
    canonical_request_string, credential_scope, export_path, generate_signing_key, host,
    string_to_sign, ExportFormat, RequestSigner, SignedRequest,
};

mod export;
pub use export::{Export, ExportClient};
