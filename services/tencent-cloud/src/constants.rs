// Env values used by tencent cloud services.
pub const TENCENTCLOUD_REGION: &str = "TENCENTCLOUD_REGION";
pub const TKE_REGION: &str = "TKE_REGION";
pub const TENCENTCLOUD_LANGUAGE: &str = "TENCENTCLOUD_LANGUAGE";
pub const TENCENTCLOUD_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
pub const TKE_SECRET_ID: &str = "TKE_SECRET_ID";
pub const TENCENTCLOUD_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
pub const TKE_SECRET_KEY: &str = "TKE_SECRET_KEY";
pub const TENCENTCLOUD_TOKEN: &str = "TENCENTCLOUD_TOKEN";
pub const TENCENTCLOUD_SECURITY_TOKEN: &str = "TENCENTCLOUD_SECURITY_TOKEN";
pub const QCLOUD_SECRET_TOKEN: &str = "QCLOUD_SECRET_TOKEN";

// Headers used by the TC3 protocol.
pub const X_TC_ACTION: &str = "x-tc-action";
pub const X_TC_VERSION: &str = "x-tc-version";
pub const X_TC_TIMESTAMP: &str = "x-tc-timestamp";
pub const X_TC_LANGUAGE: &str = "x-tc-language";
pub const X_TC_REGION: &str = "x-tc-region";
pub const X_TC_REQUEST_CLIENT: &str = "x-tc-requestclient";
pub const X_TC_TOKEN: &str = "x-tc-token";

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const TC3_REQUEST: &str = "tc3_request";
/// Prefix prepended to the secret key before the first HMAC round.
pub const TC3_KEY_PREFIX: &str = "TC3";

pub const CONTENT_TYPE_JSON: &str = "application/json";

// The JSON API family only accepts `POST /` with an empty query.
pub const HTTP_METHOD: &str = "POST";
pub const HTTP_URI: &str = "/";
pub const HTTP_QUERY: &str = "";

pub const DEFAULT_DOMAIN: &str = "tencentcloudapi.com";
pub const DEFAULT_REGION: &str = "ap-guangzhou";
pub const DEFAULT_LANGUAGE: &str = "zh-CN";
pub const DEFAULT_REQUEST_CLIENT: &str = "tcsign";
