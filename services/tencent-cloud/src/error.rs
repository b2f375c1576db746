use http::StatusCode;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Result returned by [`crate::Client`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by [`crate::Client`].
///
/// Nothing is retried: every variant reaches the caller as produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be signed, usually because no valid credential
    /// is available.
    #[error("sign request failed")]
    Sign(#[source] tcsign_core::Error),
    /// The transport failed or the response is not a Tencent Cloud API
    /// response at all.
    #[error("send request failed")]
    Transport(#[source] tcsign_core::Error),
    /// The request could not be encoded or the response could not be decoded.
    #[error("serialize or deserialize payload failed")]
    Serialization(#[from] serde_json::Error),
    /// The service answered with a structured error.
    #[error(transparent)]
    Service(ServiceError),
}

impl Error {
    /// The service error carried by this error, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(err) => Some(err),
            _ => None,
        }
    }
}

/// ServiceError is the error envelope returned inside a Tencent Cloud API
/// response.
///
/// Callers branch on `code`, for example `AuthFailure.SignatureExpire` or
/// `RequestLimitExceeded`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[TencentCloudSDKError] Code={code}, Message={message}, RequestId={request_id}")]
pub struct ServiceError {
    /// Error code, never empty.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Request id assigned by the service.
    pub request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorEnvelope {
    response: ErrorEnvelopeResponse,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorEnvelopeResponse {
    error: ErrorEnvelopeError,
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorEnvelopeError {
    code: String,
    message: String,
}

/// Classify a raw response body as success or service error.
///
/// Only the error code is inspected before decoding into `T`, so `T` never
/// has to model the error envelope.
pub fn classify_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    let envelope: ErrorEnvelope = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(err) if status.is_success() => return Err(Error::Serialization(err)),
        Err(err) => {
            return Err(Error::Transport(
                tcsign_core::Error::unexpected(format!(
                    "unexpected response status {status}: {}",
                    String::from_utf8_lossy(body)
                ))
                .with_source(err),
            ))
        }
    };

    let resp = envelope.response;
    if !resp.error.code.is_empty() {
        debug!(
            "service returned error {} for request {}",
            resp.error.code, resp.request_id
        );
        return Err(Error::Service(ServiceError {
            code: resp.error.code,
            message: resp.error.message,
            request_id: resp.request_id,
        }));
    }

    Ok(serde_json::from_slice(body)?)
}
