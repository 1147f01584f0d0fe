use indexmap::IndexMap;

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Caller-level settings applied to every compiled request.
///
/// It can be deserialized from your application configuration:
///
/// ```yaml
/// base_url: "https://api.example.com/v2"
/// user_agent: "inventory-sync/1.4"
/// headers:
///   x-tenant: acme
/// ```
pub struct ClientConfig {
    /// The URL relative path templates are joined to.
    ///
    /// A trailing `/` is ignored.
    ///
    /// # Default
    ///
    /// There is no base URL: every descriptor must use an absolute template.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Headers added to every request, after the ones set by the descriptor.
    ///
    /// They override descriptor headers with the same name.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// The value of the `User-Agent` header.
    ///
    /// An entry in [`headers`](Self::headers) takes precedence.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// The boundary used for `multipart/form-data` bodies.
    ///
    /// # Default
    ///
    /// A boundary is derived from a hash of the form parts: the same form always gets the
    /// same boundary.
    #[serde(default)]
    pub multipart_boundary: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header to every request.
    ///
    /// Setting the same header twice keeps the last value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn multipart_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.multipart_boundary = Some(boundary.into());
        self
    }
}
