use serde::de::IgnoredAny;
use tracing::info;

use crate::error::Result;
use crate::models::{CreateUser, UpdateUser, User};
use crate::request::RequestClient;
use crate::transport::{Body, Method, Transport};

/// `/user` endpoints.
///
/// Updates go through `POST /user/{id}` with `{name, admin, pass?}`; the
/// password is only sent when it changes.
#[derive(Debug)]
pub struct Users<'a, T> {
    api: &'a RequestClient<T>,
}

impl<'a, T: Transport> Users<'a, T> {
    pub(crate) const fn new(api: &'a RequestClient<T>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.api.request(Method::Get, "/user", Body::Empty).await
    }

    pub async fn get(&self, id: u64) -> Result<User> {
        self.api
            .request(Method::Get, &format!("/user/{id}"), Body::Empty)
            .await
    }

    /// The user owning the session token.
    pub async fn current(&self) -> Result<User> {
        self.api
            .request(Method::Get, "/current/user", Body::Empty)
            .await
    }

    pub async fn create(&self, name: &str, pass: &str, admin: bool) -> Result<User> {
        let user: User = self
            .api
            .send_json(Method::Post, "/user", &CreateUser { name, pass, admin })
            .await?;
        info!(id = user.id, name, admin, "Created user");
        Ok(user)
    }

    pub async fn update(&self, id: u64, name: &str, pass: Option<&str>, admin: bool) -> Result<User> {
        let payload = UpdateUser { name, admin, pass };
        let user: User = self
            .api
            .send_json(Method::Post, &format!("/user/{id}"), &payload)
            .await?;
        Ok(user)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(Method::Delete, &format!("/user/{id}"), Body::Empty)
            .await?;
        info!(id, "Deleted user");
        Ok(())
    }
}
