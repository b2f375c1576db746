use crate::constants::*;
use std::fmt::{Debug, Formatter};
use tcsign_core::utils::Redact;
use tcsign_core::Context;

/// Config for Tencent Cloud API clients.
///
/// Built once and handed to [`crate::Client::new`]. The client never mutates it.
#[derive(Clone, Default)]
pub struct Config {
    /// Region sent as `X-TC-Region`, defaults to `ap-guangzhou`.
    pub region: Option<String>,
    /// Language sent as `X-TC-Language`, defaults to `zh-CN`.
    pub language: Option<String>,
    /// Secret ID
    pub secret_id: Option<String>,
    /// Secret Key
    pub secret_key: Option<String>,
    /// Security token for temporary credentials
    pub security_token: Option<String>,
    /// Root domain used to build hosts, defaults to `tencentcloudapi.com`.
    pub domain: Option<String>,
    /// Client identifier sent as `X-TC-RequestClient`.
    pub request_client: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("language", &self.language)
            .field("secret_id", &Redact::from(&self.secret_id))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("security_token", &Redact::from(&self.security_token))
            .field("domain", &self.domain)
            .field("request_client", &self.request_client)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            region: ctx
                .env_var(TENCENTCLOUD_REGION)
                .or_else(|| ctx.env_var(TKE_REGION)),
            language: ctx.env_var(TENCENTCLOUD_LANGUAGE),
            secret_id: ctx
                .env_var(TENCENTCLOUD_SECRET_ID)
                .or_else(|| ctx.env_var(TKE_SECRET_ID)),
            secret_key: ctx
                .env_var(TENCENTCLOUD_SECRET_KEY)
                .or_else(|| ctx.env_var(TKE_SECRET_KEY)),
            security_token: ctx
                .env_var(TENCENTCLOUD_TOKEN)
                .or_else(|| ctx.env_var(TENCENTCLOUD_SECURITY_TOKEN))
                .or_else(|| ctx.env_var(QCLOUD_SECRET_TOKEN)),
            domain: None,
            request_client: None,
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the secret id and secret key.
    pub fn with_secret(mut self, id: impl Into<String>, key: impl Into<String>) -> Self {
        self.secret_id = Some(id.into());
        self.secret_key = Some(key.into());
        self
    }

    /// Set the security token.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }

    /// Set the root domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the request client identifier.
    pub fn with_request_client(mut self, request_client: impl Into<String>) -> Self {
        self.request_client = Some(request_client.into());
        self
    }

    pub(crate) fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub(crate) fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub(crate) fn domain_or_default(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }

    pub(crate) fn request_client_or_default(&self) -> &str {
        self.request_client
            .as_deref()
            .unwrap_or(DEFAULT_REQUEST_CLIENT)
    }
}
