//! Tencent Cloud API signer and client.
//!
//! Implements [TC3-HMAC-SHA256](https://www.tencentcloud.com/document/api/213/33224)
//! for the JSON API family (`POST /` with a JSON body) and a thin [`Client`]
//! that signs, dispatches and classifies calls.
//!
//! - [`CanonicalRequest`] builds and hashes the canonical request.
//! - [`RequestSigner`] derives the scoped signing key and sets `Authorization`.
//! - [`classify_response`] tells a structured [`ServiceError`] from success.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod action;
pub use action::Action;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod canonical_request;
pub use canonical_request::CanonicalRequest;

mod sign_request;
pub use sign_request::{derive_authorization, generate_signing_key, RequestSigner};

mod provide_credential;
pub use provide_credential::*;

mod error;
pub use error::{classify_response, Error, Result, ServiceError};

mod client;
pub use client::Client;
