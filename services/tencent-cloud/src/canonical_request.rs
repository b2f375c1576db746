use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderName};
use log::debug;
use tcsign_core::hash::hex_sha256;
use tcsign_core::{Error, Result};

/// Headers covered by the signature.
///
/// The server recomputes the canonical request from exactly these headers, so
/// this list must stay in sync with what the remote side expects.
const SIGNED_HEADERS: [HeaderName; 2] = [CONTENT_TYPE, HOST];

/// CanonicalRequest is the hashed, deterministic form of a request.
///
/// ```text
/// POST
/// /
///
/// content-type:application/json
/// host:cvm.tencentcloudapi.com
///
/// content-type;host
/// <hex(sha256(body))>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Hex encoded SHA-256 of the canonical request string.
    pub canonical_hash: String,
    /// Sorted signed header names joined by `;`, e.g. `content-type;host`.
    pub signed_headers: String,
    /// `name:value\n` for every signed header, in the same order.
    pub signed_header_values: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// `body` must be the exact bytes that will be sent. Both `content-type`
    /// and `host` must be present in `headers`.
    pub fn build(
        method: &str,
        uri: &str,
        query: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Self> {
        let mut picked = Vec::with_capacity(SIGNED_HEADERS.len());
        for name in SIGNED_HEADERS.iter() {
            let value = headers.get(name).ok_or_else(|| {
                Error::request_invalid(format!("signed header {name} is missing"))
            })?;
            let value = value.to_str().map_err(|e| {
                Error::request_invalid(format!("signed header {name} is not visible ascii"))
                    .with_source(e)
            })?;
            picked.push((name.as_str().to_ascii_lowercase(), value));
        }
        // Never rely on the container order, the server sorts by name.
        picked.sort_by(|a, b| a.0.cmp(&b.0));

        let signed_headers = picked
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let signed_header_values = picked.iter().fold(String::new(), |mut s, (k, v)| {
            s.push_str(k);
            s.push(':');
            s.push_str(v);
            s.push('\n');
            s
        });

        let payload_hash = hex_sha256(body);
        let canonical_request = [
            method,
            uri,
            query,
            &signed_header_values,
            &signed_headers,
            &payload_hash,
        ]
        .join("\n");
        debug!("calculated canonical request: {canonical_request}");

        Ok(Self {
            canonical_hash: hex_sha256(canonical_request.as_bytes()),
            signed_headers,
            signed_header_values,
        })
    }
}
