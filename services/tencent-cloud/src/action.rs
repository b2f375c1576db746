/// Action identifies a single Tencent Cloud API operation.
///
/// ```
/// use tcsign_tencent_cloud::Action;
///
/// let action = Action::new("cvm", "DescribeInstances", "2017-03-12");
/// assert_eq!(action.host("tencentcloudapi.com"), "cvm.tencentcloudapi.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    service: String,
    action: String,
    version: String,
    host: Option<String>,
}

impl Action {
    /// Create a new action for `service`.
    pub fn new(
        service: impl Into<String>,
        action: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
            version: version.into(),
            host: None,
        }
    }

    /// Send this action to `host` instead of `{service}.{domain}`.
    ///
    /// The credential scope still uses the service name.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Service name, e.g. `cvm`.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Action name, e.g. `DescribeInstances`.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// API version, e.g. `2017-03-12`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Host serving this action under `domain`.
    pub fn host(&self, domain: &str) -> String {
        match &self.host {
            Some(host) => host.clone(),
            None => format!("{}.{}", self.service, domain),
        }
    }
}
