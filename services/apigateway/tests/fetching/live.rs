use anyhow::Result;
use gwexport_apigateway::{ExportClient, ExportFormat, RequestSigner, SigningConfig};
use gwexport_core::{Context, ErrorKind, OsEnv};
use gwexport_http_send_reqwest::ReqwestHttpSend;
use log::warn;
use std::env;

/// Initialize live test environment.
///
/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`,
/// `GWEXPORT_REST_API_ID` and `GWEXPORT_STAGE`.
fn init_live_test() -> Option<(Context, SigningConfig)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("GWEXPORT_TEST").unwrap_or_default() != "on" {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let cfg = SigningConfig::from_env(&ctx).expect("signing config must be set in env");

    Some((ctx, cfg))
}

#[tokio::test]
async fn test_fetch_live() -> Result<()> {
    let Some((ctx, cfg)) = init_live_test() else {
        warn!("GWEXPORT_TEST is not set, skipped");
        return Ok(());
    };

    let client = ExportClient::new(ctx, RequestSigner::new(cfg).with_format(ExportFormat::Json));
    let swagger = client.fetch().await?.json()?;
    let version = swagger.get("swagger").or_else(|| swagger.get("openapi"));

    assert!(version.is_some());
    Ok(())
}

#[tokio::test]
async fn test_fetch_live_with_wrong_secret() -> Result<()> {
    let Some((ctx, cfg)) = init_live_test() else {
        warn!("GWEXPORT_TEST is not set, skipped");
        return Ok(());
    };

    let cfg = SigningConfig::new(
        cfg.access_key_id(),
        "not-the-secret",
        cfg.region(),
        cfg.rest_api_id(),
        cfg.stage(),
    )?;
    let client = ExportClient::new(ctx, RequestSigner::new(cfg));

    let err = client
        .fetch()
        .await
        .expect_err("wrong secret must be rejected");
    assert_eq!(err.kind(), ErrorKind::AuthenticationRejected);
    assert!(err.payload().is_some());
    Ok(())
}
