use std::time::Duration;

use anyhow::Result;
use gwexport::apigateway::{ExportClient, ExportFormat, RequestSigner, SigningConfig};
use gwexport::{Context, OsEnv};
use gwexport_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    // A client with its own timeout and user agent instead of the default one.
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("gwexport-example/0.1")
        .build()?;

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(OsEnv);
    let cfg = SigningConfig::from_env(&ctx)?;

    let client = ExportClient::new(ctx, RequestSigner::new(cfg).with_format(ExportFormat::Yaml));
    match client.fetch().await {
        Ok(export) => println!("{}", export.text()?),
        Err(err) => {
            eprintln!("fetch failed: {err}");
            if let Some(payload) = err.payload() {
                eprintln!("{payload}");
            }
        }
    }

    Ok(())
}
