//! HTTP transport seam.
//!
//! [`RequestClient`](crate::request::RequestClient) describes requests as plain
//! data; a [`Transport`] delivers them. Production code uses
//! [`ReqwestTransport`], tests substitute in-process fakes.

use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

/// Custom header carrying a Gotify client token.
pub const TOKEN_HEADER: &str = "X-Gotify-Key";

/// Transport-level failure (connection refused, TLS, DNS, ...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A file sent as the `file` field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Read a file from disk, guessing the MIME type from its extension.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .map(String::from);
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// Passed through untouched; the transport builds the form and boundary.
    Multipart(FilePart),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as [`TOKEN_HEADER`].
    Token(String),
    /// HTTP Basic, only used to obtain a token.
    Basic { username: String, password: String },
}

/// A request relative to the server base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path plus optional query string, e.g. `/message?limit=100`.
    pub path: String,
    pub credentials: Credentials,
    pub body: Body,
}

impl HttpRequest {
    /// The token header value, if this request authenticates with a token.
    pub fn token(&self) -> Option<&str> {
        match &self.credentials {
            Credentials::Token(t) => Some(t),
            Credentials::Basic { .. } => None,
        }
    }

    /// Path without the query string.
    pub fn route(&self) -> &str {
        self.path.split_once('?').map_or(&self.path, |(p, _)| p)
    }

    /// Value of query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.path.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. `"Not Found"`.
    pub reason: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Delivers requests to a Gotify server.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        if base_url.trim().is_empty() {
            return Err(TransportError("server URL is empty".into()));
        }

        // reqwest is built with rustls-no-provider; Err only means a provider is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .user_agent(concat!("gotify-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = self.url(&request.path);
        debug!(method = request.method.as_str(), %url, "Sending request");

        let mut builder = self
            .http
            .request(method, &url)
            .header(ACCEPT, "application/json");

        builder = match request.credentials {
            Credentials::Token(token) => builder.header(TOKEN_HEADER, token),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        };

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| TransportError(e.to_string()))?;
                builder.header(CONTENT_TYPE, "application/json").body(bytes)
            }
            Body::Multipart(file) => {
                let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(mime) = file.mime {
                    part = part
                        .mime_str(&mime)
                        .map_err(|e| TransportError(e.to_string()))?;
                }
                builder.multipart(reqwest::multipart::Form::new().part("file", part))
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").into(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            path: path.into(),
            credentials: Credentials::Token("t".into()),
            body: Body::Empty,
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(ReqwestTransport::new("").is_err());
        assert!(ReqwestTransport::new("   ").is_err());
    }

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let transport = ReqwestTransport::new("https://push.example.com/").unwrap();
        assert_eq!(
            transport.url("/application"),
            "https://push.example.com/application"
        );
    }

    #[test]
    fn route_and_query_are_split() {
        let req = get("/message?limit=50&since=3");
        assert_eq!(req.route(), "/message");
        assert_eq!(req.query_param("limit"), Some("50"));
        assert_eq!(req.query_param("since"), Some("3"));
        assert_eq!(req.query_param("missing"), None);
        assert_eq!(get("/user").route(), "/user");
    }

    #[test]
    fn token_only_for_token_credentials() {
        assert_eq!(get("/x").token(), Some("t"));
        let basic = HttpRequest {
            credentials: Credentials::Basic {
                username: "u".into(),
                password: "p".into(),
            },
            ..get("/client")
        };
        assert!(basic.token().is_none());
    }

    #[test]
    fn file_part_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let part = FilePart::from_path(&path).unwrap();
        assert_eq!(part.file_name, "icon.PNG");
        assert_eq!(part.mime.as_deref(), Some("image/png"));
        assert_eq!(part.bytes.len(), 4);
    }
}
