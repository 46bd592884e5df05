use crate::constants::*;
use gwexport_core::utils::Redact;
use gwexport_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// SigningConfig carries everything needed to sign one export request.
///
/// All fields are required and validated on construction, so a config that
/// exists is always signable.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    rest_api_id: String,
    stage: String,
}

impl Debug for SigningConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("rest_api_id", &self.rest_api_id)
            .field("stage", &self.stage)
            .finish()
    }
}

impl SigningConfig {
    /// Create a new config, rejecting any missing or malformed field with
    /// [`ErrorKind::ConfigInvalid`](gwexport_core::ErrorKind::ConfigInvalid).
    ///
    /// - `region` must only contain lowercase ascii letters, digits and `-`.
    /// - `rest_api_id` and `stage` must only contain unreserved URI characters,
    ///   they are placed into the request path verbatim.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        rest_api_id: impl Into<String>,
        stage: impl Into<String>,
    ) -> Result<Self> {
        let cfg = Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            rest_api_id: rest_api_id.into(),
            stage: stage.into(),
        };

        check_token("access_key_id", &cfg.access_key_id)?;
        check_token("secret_access_key", &cfg.secret_access_key)?;
        check_required("region", &cfg.region)?;
        if !cfg
            .region
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(Error::config_invalid(
                "region must only contain lowercase letters, digits and '-'",
            )
            .with_context(format!("region: {}", cfg.region)));
        }
        check_path_segment("rest_api_id", &cfg.rest_api_id)?;
        check_path_segment("stage", &cfg.stage)?;

        Ok(cfg)
    }

    /// Load config from env.
    ///
    /// - `access_key_id` from [`AWS_ACCESS_KEY_ID`]
    /// - `secret_access_key` from [`AWS_SECRET_ACCESS_KEY`]
    /// - `region` from [`AWS_REGION`], then [`AWS_DEFAULT_REGION`]
    /// - `rest_api_id` from [`GWEXPORT_REST_API_ID`]
    /// - `stage` from [`GWEXPORT_STAGE`]
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let envs = ctx.env_vars();
        let get = |key: &str| envs.get(key).cloned().unwrap_or_default();

        let region = envs
            .get(AWS_REGION)
            .or_else(|| envs.get(AWS_DEFAULT_REGION))
            .cloned()
            .unwrap_or_default();

        Self::new(
            get(AWS_ACCESS_KEY_ID),
            get(AWS_SECRET_ACCESS_KEY),
            region,
            get(GWEXPORT_REST_API_ID),
            get(GWEXPORT_STAGE),
        )
    }

    /// Access key id used in the credential of the authorization header.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key that seeds the signing key chain.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// AWS region like `us-east-1`.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Identifier of the REST API to export.
    pub fn rest_api_id(&self) -> &str {
        &self.rest_api_id
    }

    /// Deployment stage to export.
    pub fn stage(&self) -> &str {
        &self.stage
    }
}

fn check_required(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::config_invalid(format!("{name} is required")));
    }
    Ok(())
}

/// Credentials are used verbatim, so surrounding or embedded whitespace is
/// almost always a copy-paste mistake.
fn check_token(name: &str, value: &str) -> Result<()> {
    check_required(name, value)?;
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::config_invalid(format!(
            "{name} must not contain whitespace or control characters"
        )));
    }
    Ok(())
}

fn check_path_segment(name: &str, value: &str) -> Result<()> {
    check_required(name, value)?;
    if !value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
    {
        return Err(Error::config_invalid(format!(
            "{name} must only contain unreserved uri characters"
        ))
        .with_context(format!("{name}: {value}")));
    }
    Ok(())
}
