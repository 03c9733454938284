//! Request client: session token injection and response classification.
//!
//! Every resource service funnels through [`RequestClient::request`], which
//! refuses to send anything without a stored token and maps outcomes onto
//! [`Error`]. Login is the only exchange that uses HTTP Basic instead.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::Client;
use crate::services::{Applications, Clients, Messages, Users, Version};
use crate::session::{ClientIdentity, SessionStore};
use crate::transport::{
    Body, Credentials, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport,
};

/// Default name of the client created at login.
pub const DEFAULT_CLIENT_NAME: &str = "gotify-admin";

/// Configuration for connecting to a Gotify server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL (e.g., "<https://push.example.com>").
    pub base_url: String,
    /// Name given to the client created at login.
    pub client_name: String,
}

/// Error body returned by the Gotify API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Authenticated access to the Gotify REST API.
pub struct RequestClient<T = ReqwestTransport> {
    transport: T,
    session: Arc<SessionStore>,
    client_name: String,
}

impl<T> std::fmt::Debug for RequestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("session", &self.session)
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}

impl RequestClient<ReqwestTransport> {
    /// Create a client talking to a real server over HTTP(S).
    pub fn connect(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.base_url)
            .map_err(|e| Error::validation(format!("Invalid server URL: {e}")))?;
        Ok(Self::with_transport(
            transport,
            session,
            config.client_name.clone(),
        ))
    }
}

impl<T: Transport> RequestClient<T> {
    pub fn with_transport(transport: T, session: Arc<SessionStore>, client_name: String) -> Self {
        Self {
            transport,
            session,
            client_name,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchange credentials for a client token and persist the session.
    ///
    /// A rejected login persists nothing.
    pub async fn login(&self, username: &str, password: &str) -> Result<Client> {
        let request = HttpRequest {
            method: Method::Post,
            path: "/client".into(),
            credentials: Credentials::Basic {
                username: username.into(),
                password: password.into(),
            },
            body: Body::Json(serde_json::json!({ "name": self.client_name })),
        };
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Login request failed");
            Error::Network(e.0)
        })?;
        if response.status == 401 {
            warn!(username, "Login rejected");
            return Err(Error::Api {
                status: 401,
                message: "invalid credentials".into(),
            });
        }

        let client: Client = decode_response(response)?;
        self.session.persist(
            &client.token,
            &ClientIdentity {
                id: client.id,
                name: client.name.clone(),
            },
        )?;
        info!(client_id = client.id, username, "Logged in");
        Ok(client)
    }

    /// Drop the persisted session.
    pub fn logout(&self) -> Result<()> {
        self.session.logout()?;
        info!("Logged out");
        Ok(())
    }

    /// Send an authenticated request and decode the JSON answer.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
    ) -> Result<R> {
        let Some(token) = self.session.token() else {
            debug!(path, "Refusing request without a session token");
            return Err(Error::Auth);
        };
        debug!(method = method.as_str(), path, "API request");

        let request = HttpRequest {
            method,
            path: path.into(),
            credentials: Credentials::Token(token),
            body,
        };
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(method = method.as_str(), path, error = %e, "Transport failure");
            Error::Network(e.0)
        })?;
        if !response.is_success() {
            warn!(method = method.as_str(), path, status = response.status, "API error");
        }
        decode_response(response)
    }

    /// Like [`request`](Self::request) with a JSON payload.
    pub async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<R> {
        let value = serde_json::to_value(payload)
            .map_err(|e| Error::validation(format!("Unserializable payload: {e}")))?;
        self.request(method, path, Body::Json(value)).await
    }

    pub const fn applications(&self) -> Applications<'_, T> {
        Applications::new(self)
    }

    pub const fn clients(&self) -> Clients<'_, T> {
        Clients::new(self)
    }

    pub const fn users(&self) -> Users<'_, T> {
        Users::new(self)
    }

    pub const fn messages(&self) -> Messages<'_, T> {
        Messages::new(self)
    }

    pub const fn version(&self) -> Version<'_, T> {
        Version::new(self)
    }
}

/// Classify a response: decoded JSON on 2xx, [`Error::Api`] otherwise.
///
/// An empty 2xx body decodes as `{}`; an unreadable one is reported as a 500.
pub fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    if !response.is_success() {
        return Err(api_error(&response));
    }

    let decoded = if response.body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_slice(&response.body)
    };
    decoded.map_err(|e| {
        warn!(error = %e, "Invalid JSON response");
        Error::Api {
            status: 500,
            message: "Invalid JSON response".into(),
        }
    })
}

fn api_error(response: &HttpResponse) -> Error {
    let body: Option<ApiErrorBody> = serde_json::from_slice(&response.body).ok();
    let message = body
        .and_then(|b| {
            [b.error_description, b.error]
                .into_iter()
                .find(|s| !s.is_empty())
        })
        .unwrap_or_else(|| response.reason.clone());
    Error::Api {
        status: response.status,
        message,
    }
}
