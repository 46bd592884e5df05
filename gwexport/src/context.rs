use gwexport_core::{Context, OsEnv};
use gwexport_http_send_reqwest::ReqwestHttpSend;

/// Create a context with a reqwest http client and the OS environment.
///
/// ```no_run
/// let ctx = gwexport::default_context();
/// assert!(ctx.env_var("PATH").is_some());
/// ```
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
