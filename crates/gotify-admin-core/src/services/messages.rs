use serde::de::IgnoredAny;
use tracing::info;

use crate::error::Result;
use crate::models::{Message, PagedMessages};
use crate::request::RequestClient;
use crate::transport::{Body, Method, Transport};

/// Page size used when the caller has no preference.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 100;

/// `/message` endpoints.
///
/// The API cannot filter by application, so the per-application helpers work
/// on the full (limited) list.
#[derive(Debug)]
pub struct Messages<'a, T> {
    api: &'a RequestClient<T>,
}

impl<'a, T: Transport> Messages<'a, T> {
    pub(crate) const fn new(api: &'a RequestClient<T>) -> Self {
        Self { api }
    }

    /// Most recent messages, newest first.
    pub async fn list(&self, limit: u32) -> Result<Vec<Message>> {
        let paged: PagedMessages = self
            .api
            .request(Method::Get, &format!("/message?limit={limit}"), Body::Empty)
            .await?;
        Ok(paged.messages)
    }

    /// The subset of [`list`](Self::list) sent by application `app_id`.
    pub async fn list_by_application(&self, app_id: u64, limit: u32) -> Result<Vec<Message>> {
        let mut messages = self.list(limit).await?;
        messages.retain(|m| m.appid == app_id);
        Ok(messages)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(Method::Delete, &format!("/message/{id}"), Body::Empty)
            .await?;
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(Method::Delete, "/message", Body::Empty)
            .await?;
        info!("Deleted all messages");
        Ok(())
    }

    /// Delete, one by one, every message of application `app_id` among the
    /// newest `limit`.
    ///
    /// Stops at the first failure; messages deleted before it stay deleted.
    pub async fn delete_all_by_application(&self, app_id: u64, limit: u32) -> Result<usize> {
        let messages = self.list_by_application(app_id, limit).await?;
        for message in &messages {
            self.delete(message.id).await?;
        }
        info!(app_id, count = messages.len(), "Deleted application messages");
        Ok(messages.len())
    }
}
