use crate::constants::*;
use crate::error::{classify_response, Error, Result};
use crate::{Action, Config, Credential, DefaultCredentialProvider, RequestSigner};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST};
use http::Method;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tcsign_core::{Context, ProvideCredential, Signer};

/// Client sends signed requests to Tencent Cloud APIs.
///
/// The client is immutable once built and cheap to clone, so a single
/// instance can be shared between tasks.
///
/// ```no_run
/// use serde_json::{json, Value};
/// use tcsign_core::{Context, OsEnv};
/// use tcsign_http_send_reqwest::ReqwestHttpSend;
/// use tcsign_tencent_cloud::{Action, Client, Config};
///
/// # async fn example() -> tcsign_tencent_cloud::Result<()> {
/// let ctx = Context::new()
///     .with_http_send(ReqwestHttpSend::default())
///     .with_env(OsEnv);
/// let config = Config::from_env(&ctx).with_region("ap-shanghai");
/// let client = Client::new(ctx, config);
///
/// let action = Action::new("cvm", "DescribeInstances", "2017-03-12");
/// let resp: Value = client.send(&action, &json!({"Limit": 1})).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<Config>,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client loading credentials through [`DefaultCredentialProvider`].
    pub fn new(ctx: Context, config: Config) -> Self {
        let provider = DefaultCredentialProvider::new(config.clone());
        Self::with_credential_provider(ctx, config, provider)
    }

    /// Create a client loading credentials through `provider`.
    pub fn with_credential_provider(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        Self::with_signer(config, Signer::new(ctx, provider, RequestSigner::new()))
    }

    /// Create a client from a pre-built signer.
    pub fn with_signer(config: Config, signer: Signer<Credential>) -> Self {
        Self {
            config: Arc::new(config),
            signer,
        }
    }

    /// The config this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Invoke `action` with `request` as JSON payload and decode the response into `T`.
    ///
    /// Either a fully decoded response or an error is returned, never both.
    pub async fn send<R, T>(&self, action: &Action, request: &R) -> Result<T>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(request)?;
        let req = self.build_request(action)?;

        let (mut parts, ()) = req.into_parts();
        self.signer
            .sign(&mut parts, &body)
            .await
            .map_err(Error::Sign)?;
        let req = http::Request::from_parts(parts, Bytes::from(body));

        debug!(
            "sending {} to {}",
            action.action(),
            req.uri().authority().map(|v| v.as_str()).unwrap_or_default()
        );
        let resp = self
            .signer
            .context()
            .http_send(req)
            .await
            .map_err(Error::Transport)?;

        classify_response(resp.status(), resp.body())
    }

    fn build_request(&self, action: &Action) -> Result<http::Request<()>> {
        let host = action.host(self.config.domain_or_default());

        http::Request::builder()
            .method(Method::POST)
            .uri(format!("https://{host}{HTTP_URI}"))
            .header(HOST, host.as_str())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(X_TC_ACTION, action.action())
            .header(X_TC_VERSION, action.version())
            .header(X_TC_LANGUAGE, self.config.language_or_default())
            .header(X_TC_REGION, self.config.region_or_default())
            .header(X_TC_REQUEST_CLIENT, self.config.request_client_or_default())
            .extension(action.clone())
            .body(())
            .map_err(|e| Error::Sign(e.into()))
    }
}
