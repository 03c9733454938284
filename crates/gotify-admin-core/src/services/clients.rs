use serde::de::IgnoredAny;
use tracing::info;

use crate::error::Result;
use crate::models::{Client, ClientParams};
use crate::request::RequestClient;
use crate::transport::{Body, Method, Transport};

/// `/client` endpoints.
#[derive(Debug)]
pub struct Clients<'a, T> {
    api: &'a RequestClient<T>,
}

impl<'a, T: Transport> Clients<'a, T> {
    pub(crate) const fn new(api: &'a RequestClient<T>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Client>> {
        self.api.request(Method::Get, "/client", Body::Empty).await
    }

    pub async fn get(&self, id: u64) -> Result<Client> {
        self.api
            .request(Method::Get, &format!("/client/{id}"), Body::Empty)
            .await
    }

    pub async fn create(&self, name: &str) -> Result<Client> {
        let client: Client = self
            .api
            .send_json(Method::Post, "/client", &ClientParams { name })
            .await?;
        info!(id = client.id, name, "Created client");
        Ok(client)
    }

    pub async fn update(&self, id: u64, name: &str) -> Result<Client> {
        self.api
            .send_json(Method::Put, &format!("/client/{id}"), &ClientParams { name })
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(Method::Delete, &format!("/client/{id}"), Body::Empty)
            .await?;
        info!(id, "Deleted client");
        Ok(())
    }
}
