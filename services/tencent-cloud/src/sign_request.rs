use crate::canonical_request::CanonicalRequest;
use crate::constants::*;
use crate::{Action, Credential};
use async_trait::async_trait;
use http::header::{AUTHORIZATION, HOST};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use tcsign_core::hash::{hex_hmac_sha256, hmac_sha256};
use tcsign_core::time::{format_date, format_timestamp, now, DateTime};
use tcsign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};

/// RequestSigner that implements TC3-HMAC-SHA256.
///
/// - [Signature v3](https://www.tencentcloud.com/document/api/213/33224)
///
/// The service used in the credential scope is taken from the [`Action`]
/// stored in the request extensions, falling back to the one configured via
/// [`RequestSigner::with_service`].
#[derive(Debug, Default)]
pub struct RequestSigner {
    service: Option<String>,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new TC3 request signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `service` for requests that carry no [`Action`] extension.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn service<'a>(&'a self, req: &'a Parts) -> Result<&'a str> {
        if let Some(action) = req.extensions.get::<Action>() {
            return Ok(action.service());
        }
        self.service.as_deref().ok_or_else(|| {
            Error::request_invalid("request carries no action and signer has no service")
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("no credential found for signing"));
        };
        if cred.secret_id.is_empty() || cred.secret_key.is_empty() {
            return Err(Error::credential_invalid("secret id or secret key is empty"));
        }
        if !cred.is_valid() {
            return Err(Error::credential_expired(format!(
                "credential expired at {:?}",
                cred.expires_in
            )));
        }

        check_request_line(req)?;
        let service = self.service(req)?.to_string();

        // Capture the instant once: both the timestamp header and the scope
        // date must come from it.
        let now = self.time.unwrap_or_else(now);
        let mut signing_req = SigningRequest::build(req)?;

        if signing_req.headers.get(HOST).is_none() {
            let host = HeaderValue::from_str(signing_req.authority.as_str())?;
            signing_req.headers.insert(HOST, host);
        }
        signing_req
            .headers
            .insert(X_TC_TIMESTAMP, HeaderValue::from_str(&format_timestamp(now))?);

        let creq = CanonicalRequest::build(
            HTTP_METHOD,
            HTTP_URI,
            HTTP_QUERY,
            &signing_req.headers,
            body,
        )?;
        let authorization = derive_authorization(&creq, cred, &service, now);

        signing_req.headers.insert(AUTHORIZATION, {
            let mut value = HeaderValue::from_str(&authorization)?;
            value.set_sensitive(true);
            value
        });
        if let Some(token) = &cred.security_token {
            signing_req.headers.insert(X_TC_TOKEN, {
                let mut value = HeaderValue::from_str(token)?;
                value.set_sensitive(true);
                value
            });
        }

        signing_req.apply(req)
    }
}

/// The JSON API family is always `POST /` without query.
fn check_request_line(req: &Parts) -> Result<()> {
    if req.method.as_str() != HTTP_METHOD {
        return Err(Error::request_invalid(format!(
            "method {} is not supported, only {HTTP_METHOD} can be signed",
            req.method
        )));
    }
    if req.uri.path() != HTTP_URI || req.uri.query().is_some_and(|q| !q.is_empty()) {
        return Err(Error::request_invalid(format!(
            "uri {} is not supported, only {HTTP_URI} without query can be signed",
            req.uri
        )));
    }
    Ok(())
}

/// Build the `Authorization` header value for `creq`.
///
/// `now` provides both the UTC calendar date of the credential scope and the
/// unix seconds in the string to sign.
pub fn derive_authorization(
    creq: &CanonicalRequest,
    cred: &Credential,
    service: &str,
    now: DateTime,
) -> String {
    let date = format_date(now);

    // Scope: "<secret_id>/2024-01-01/<service>/tc3_request"
    let scope = format!("{}/{date}/{service}/{TC3_REQUEST}", cred.secret_id);
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(now, &scope, &creq.canonical_hash);
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key = generate_signing_key(&cred.secret_key, &date, service);
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    format!(
        "{ALGORITHM} Credential={scope}, SignedHeaders={}, Signature={signature}",
        creq.signed_headers
    )
}

/// StringToSign:
///
/// ```text
/// TC3-HMAC-SHA256
/// 1704067200
/// <secret_id>/2024-01-01/<service>/tc3_request
/// <hashed_canonical_request>
/// ```
fn string_to_sign(now: DateTime, scope: &str, canonical_hash: &str) -> String {
    [ALGORITHM, &format_timestamp(now), scope, canonical_hash].join("\n")
}

/// Derive the request-scoped signing key.
///
/// Every round keys the next one with its raw output, never the hex form.
pub fn generate_signing_key(secret: &str, date: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{TC3_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(&sign_date, service.as_bytes());
    // Sign request
    hmac_sha256(&sign_service, TC3_REQUEST.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use http::header::CONTENT_TYPE;
    use http::Request;
    use pretty_assertions::assert_eq;
    use tcsign_core::ErrorKind;
    use test_case::test_case;

    const SECRET_ID: &str = "AKIDEXAMPLE";
    const SECRET_KEY: &str = "test_secret_key";
    const BODY: &[u8] = br#"{"Limit":1,"Offset":0}"#;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn test_request() -> Parts {
        let mut req = Request::builder()
            .method("POST")
            .uri("https://test.tencentcloudapi.com/")
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(X_TC_ACTION, "DescribeInstances")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(Action::new("test", "DescribeInstances", "2017-03-12"));
        req.into_parts().0
    }

    #[test]
    fn test_generate_signing_key() {
        let key = generate_signing_key(SECRET_KEY, "2024-01-01", "test");
        assert_eq!(
            hex::encode(key),
            "ed705887e30da9f20049763e9c7766c68d5c1fb62ca7d2305dfdd934b97de4af"
        );
    }

    #[test]
    fn test_derive_authorization_golden() {
        let creq = CanonicalRequest {
            canonical_hash: "0".repeat(64),
            signed_headers: "content-type;host".to_string(),
            signed_header_values: String::new(),
        };
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        assert_eq!(
            derive_authorization(&creq, &cred, "test", test_time()),
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2024-01-01/test/tc3_request, \
             SignedHeaders=content-type;host, \
             Signature=c1bd833168faa7096fbaf2a0cde566e8cbd0d6e450c0657685568649485e4329"
        );
    }

    #[tokio::test]
    async fn test_sign_request() -> Result<()> {
        let signer = RequestSigner::new().with_time(test_time());
        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let mut req = test_request();

        signer
            .sign_request(&Context::new(), &mut req, BODY, Some(&cred))
            .await?;

        assert_eq!(req.headers[HOST], "test.tencentcloudapi.com");
        assert_eq!(req.headers[X_TC_TIMESTAMP], "1704067200");
        assert_eq!(
            req.headers[AUTHORIZATION].to_str().unwrap(),
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2024-01-01/test/tc3_request, \
             SignedHeaders=content-type;host, \
             Signature=de4b7b1076670de9ecfec5387e59b9a24181e6f1a8df68992caca899e75e3b9d"
        );
        assert!(req.headers[AUTHORIZATION].is_sensitive());
        assert!(req.headers.get(X_TC_TOKEN).is_none());
        assert_eq!(req.uri.to_string(), "https://test.tencentcloudapi.com/");
        Ok(())
    }

    #[tokio::test]
    async fn test_timestamp_and_scope_share_one_instant() -> Result<()> {
        // One second before midnight UTC, the date must not roll over.
        let t = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let signer = RequestSigner::new().with_time(t);
        let mut req = test_request();

        signer
            .sign_request(
                &Context::new(),
                &mut req,
                BODY,
                Some(&Credential::new(SECRET_ID, SECRET_KEY)),
            )
            .await?;

        let ts: i64 = req.headers[X_TC_TIMESTAMP].to_str().unwrap().parse().unwrap();
        let date = format_date(tcsign_core::time::from_timestamp(ts)?);
        assert_eq!(date, "2023-12-31");
        assert!(req.headers[AUTHORIZATION]
            .to_str()
            .unwrap()
            .contains(&format!("Credential={SECRET_ID}/{date}/test/tc3_request")));
        Ok(())
    }

    #[tokio::test]
    async fn test_different_instants_give_different_signatures() -> Result<()> {
        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let mut signatures = Vec::new();
        for t in [test_time(), test_time() + chrono::TimeDelta::try_seconds(60).unwrap()] {
            let mut req = test_request();
            RequestSigner::new()
                .with_time(t)
                .sign_request(&Context::new(), &mut req, BODY, Some(&cred))
                .await?;
            signatures.push(req.headers[AUTHORIZATION].to_str().unwrap().to_string());
        }

        assert_ne!(signatures[0], signatures[1]);
        assert!(signatures[1].ends_with(
            "Signature=32f0895a3898db9194a72e952d623d49a259804ad633f98bd2f76ab2584b618a"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_secret_key_never_leaks() -> Result<()> {
        let cred = Credential {
            security_token: Some("temporary-token".to_string()),
            ..Credential::new(SECRET_ID, SECRET_KEY)
        };
        let mut req = test_request();
        RequestSigner::new()
            .sign_request(&Context::new(), &mut req, BODY, Some(&cred))
            .await?;

        assert_eq!(req.headers[X_TC_TOKEN], "temporary-token");
        for (name, value) in req.headers.iter() {
            assert!(
                !value.to_str().unwrap().contains(SECRET_KEY),
                "header {name} leaks the secret key"
            );
        }

        let mut headers = http::HeaderMap::new();
        headers.insert(HOST, "test.tencentcloudapi.com".parse().unwrap());
        headers.insert(CONTENT_TYPE, CONTENT_TYPE_JSON.parse().unwrap());
        let creq = CanonicalRequest::build(HTTP_METHOD, HTTP_URI, HTTP_QUERY, &headers, BODY)?;
        assert!(!creq.signed_header_values.contains(SECRET_KEY));
        assert!(!creq.canonical_hash.contains(SECRET_KEY));

        let scope = format!("{SECRET_ID}/2024-01-01/test/{TC3_REQUEST}");
        let sts = string_to_sign(test_time(), &scope, &creq.canonical_hash);
        assert!(!sts.contains(SECRET_KEY));
        Ok(())
    }

    #[test]
    fn test_scope_with_secret_id_is_signed() {
        let creq = CanonicalRequest {
            canonical_hash: "0".repeat(64),
            signed_headers: "content-type;host".to_string(),
            signed_header_values: String::new(),
        };
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let scope = format!("{SECRET_ID}/2024-01-01/test/{TC3_REQUEST}");
        let key = generate_signing_key(SECRET_KEY, "2024-01-01", "test");
        let expected = hex_hmac_sha256(
            &key,
            string_to_sign(test_time(), &scope, &creq.canonical_hash).as_bytes(),
        );

        let authorization = derive_authorization(&creq, &cred, "test", test_time());
        assert!(authorization.contains(&format!("Credential={scope}, ")));
        assert!(authorization.ends_with(&format!("Signature={expected}")));
    }

    #[test]
    fn test_string_to_sign_layout() {
        let scope = format!("{SECRET_ID}/2024-01-01/test/{TC3_REQUEST}");
        assert_eq!(
            string_to_sign(test_time(), &scope, &"0".repeat(64)),
            format!(
                "TC3-HMAC-SHA256\n1704067200\nAKIDEXAMPLE/2024-01-01/test/tc3_request\n{}",
                "0".repeat(64)
            )
        );
    }

    #[tokio::test]
    async fn test_service_from_signer_config() -> Result<()> {
        let mut req = test_request();
        req.extensions.clear();

        let err = RequestSigner::new()
            .with_time(test_time())
            .sign_request(
                &Context::new(),
                &mut req,
                BODY,
                Some(&Credential::new(SECRET_ID, SECRET_KEY)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        RequestSigner::new()
            .with_service("test")
            .with_time(test_time())
            .sign_request(
                &Context::new(),
                &mut req,
                BODY,
                Some(&Credential::new(SECRET_ID, SECRET_KEY)),
            )
            .await?;
        assert!(req.headers[AUTHORIZATION]
            .to_str()
            .unwrap()
            .ends_with("de4b7b1076670de9ecfec5387e59b9a24181e6f1a8df68992caca899e75e3b9d"));
        Ok(())
    }

    #[test_case("GET", "https://test.tencentcloudapi.com/" ; "get method")]
    #[test_case("POST", "https://test.tencentcloudapi.com/v2" ; "non root path")]
    #[test_case("POST", "https://test.tencentcloudapi.com/?Action=Run" ; "with query")]
    fn test_reject_unsupported_request_line(method: &str, uri: &str) {
        let (req, _) = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(())
            .unwrap()
            .into_parts();

        let err = check_request_line(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_reject_missing_or_expired_credential() {
        let signer = RequestSigner::new();

        let err = signer
            .sign_request(&Context::new(), &mut test_request(), BODY, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        let expired = Credential {
            expires_in: Some(tcsign_core::time::now() - chrono::TimeDelta::try_hours(1).unwrap()),
            ..Credential::new(SECRET_ID, SECRET_KEY)
        };
        let err = signer
            .sign_request(&Context::new(), &mut test_request(), BODY, Some(&expired))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialExpired);
    }
}
