use crate::error::Result;
use crate::models::VersionInfo;
use crate::request::RequestClient;
use crate::transport::{Body, Method, Transport};

/// `/version` endpoint.
#[derive(Debug)]
pub struct Version<'a, T> {
    api: &'a RequestClient<T>,
}

impl<'a, T: Transport> Version<'a, T> {
    pub(crate) const fn new(api: &'a RequestClient<T>) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<VersionInfo> {
        self.api.request(Method::Get, "/version", Body::Empty).await
    }

    /// Version for display; failures degrade to [`VersionInfo::unavailable`].
    pub async fn get_or_unavailable(&self) -> VersionInfo {
        match self.get().await {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!(error = %e, "Server version unavailable");
                VersionInfo::unavailable()
            }
        }
    }
}
