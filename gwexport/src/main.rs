use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gwexport::apigateway::{
    Export, ExportClient, ExportFormat, RequestSigner, SignedRequest, SigningConfig, AWS_REGION,
    GWEXPORT_REST_API_ID, GWEXPORT_STAGE,
};
use gwexport::time::{self, DateTime};
use gwexport::{default_context, Context, Error, Result, StaticEnv};
use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Fetch the swagger export of an API Gateway stage.
///
/// Credentials are read from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY.
#[derive(Parser, Debug)]
#[command(name = "gwexport", version, about, long_about = None)]
struct Args {
    /// Identifier of the REST API.
    #[arg(long, env = "GWEXPORT_REST_API_ID")]
    rest_api_id: String,

    /// Deployment stage to export.
    #[arg(long, env = "GWEXPORT_STAGE")]
    stage: String,

    /// AWS region, falls back to AWS_DEFAULT_REGION.
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Format to request the export in.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the export to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Sign at this RFC3339 time instead of now.
    #[arg(long, value_parser = time::parse_rfc3339)]
    time: Option<DateTime>,

    /// Print the signed request instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl From<Format> for ExportFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Json => ExportFormat::Json,
            Format::Yaml => ExportFormat::Yaml,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenv::dotenv();
    env_logger::init();

    let args = Args::parse();
    match run(args, default_context(), &mut tokio::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run<W>(args: Args, ctx: Context, stdout: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let cfg = signing_config(&args, &ctx)?;
    debug!("loaded signing config: {cfg:?}");

    let signer = RequestSigner::new(cfg).with_format(args.format.into());
    let now = args.time.unwrap_or_else(time::now);

    let content = if args.dry_run {
        render_signed_request(&signer.sign(now)?)?.into_bytes()
    } else {
        let export = ExportClient::new(ctx, signer).fetch_at(now).await?;
        render_export(&export)?
    };

    match &args.output {
        Some(path) => write_file(path, &content).await,
        None => {
            stdout.write_all(&content).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Flags take precedence over the environment of `ctx`.
fn signing_config(args: &Args, ctx: &Context) -> Result<SigningConfig> {
    let mut envs = ctx.env_vars();
    envs.insert(GWEXPORT_REST_API_ID.to_string(), args.rest_api_id.clone());
    envs.insert(GWEXPORT_STAGE.to_string(), args.stage.clone());
    if let Some(region) = &args.region {
        envs.insert(AWS_REGION.to_string(), region.clone());
    }

    SigningConfig::from_env(&Context::new().with_env(StaticEnv { envs }))
}

/// Request line followed by one `name: value` line per header.
fn render_signed_request(req: &SignedRequest) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} {}", req.method, req.uri())?;
    for (name, value) in req.headers.iter() {
        writeln!(out, "{name}: {}", value.to_str()?)?;
    }
    Ok(out)
}

/// JSON is re-printed pretty, YAML is kept as received.
fn render_export(export: &Export) -> Result<Vec<u8>> {
    match export.format() {
        ExportFormat::Json => {
            let mut out = serde_json::to_vec_pretty(&export.json()?)?;
            out.push(b'\n');
            Ok(out)
        }
        ExportFormat::Yaml => Ok(export.body().to_vec()),
    }
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    tokio::fs::write(path, content).await.map_err(|e| {
        Error::unexpected("failed to write output")
            .with_source(e)
            .with_context(format!("path: {}", path.display()))
    })
}

fn report(err: &Error) {
    eprintln!("error: {err}");
    if let Some(payload) = err.payload() {
        let payload = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        eprintln!("{payload}");
    }
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = cause.source();
    }
}
