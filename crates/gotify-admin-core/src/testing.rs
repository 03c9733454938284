//! In-process transports for tests.
//!
//! [`FakeGotify`] keeps applications, clients, users and messages in memory
//! and answers the endpoints the console uses, enforcing token and Basic
//! authentication. [`RecordingTransport`] replays canned responses.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    Application, Client, DEFAULT_APP_IMAGE, Message, PagedMessages, Paging, User, VersionInfo,
};
use crate::transport::{Body, Credentials, HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Debug)]
struct StoredUser {
    user: User,
    pass: String,
}

#[derive(Debug)]
struct StoredClient {
    client: Client,
    owner: u64,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    users: Vec<StoredUser>,
    clients: Vec<StoredClient>,
    applications: Vec<Application>,
    messages: Vec<Message>,
    requests: Vec<HttpRequest>,
    offline: bool,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Stateful stand-in for a Gotify server.
#[derive(Debug)]
pub struct FakeGotify {
    state: Mutex<State>,
}

impl Default for FakeGotify {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGotify {
    /// A server with a single `admin`/`admin` administrator.
    pub fn new() -> Self {
        let fake = Self {
            state: Mutex::new(State::default()),
        };
        fake.add_user("admin", "admin", true);
        fake
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self, name: &str, pass: &str, admin: bool) -> User {
        let mut state = self.lock();
        let user = User {
            id: state.next_id(),
            name: name.into(),
            admin,
        };
        state.users.push(StoredUser {
            user: user.clone(),
            pass: pass.into(),
        });
        user
    }

    /// A client owned by the first user; its token authenticates requests.
    pub fn add_client(&self, name: &str) -> Client {
        let mut state = self.lock();
        let owner = state.users.first().map_or(0, |u| u.user.id);
        let id = state.next_id();
        let client = Client {
            id,
            token: format!("C{id:014}"),
            name: name.into(),
            last_used: None,
        };
        state.clients.push(StoredClient {
            client: client.clone(),
            owner,
        });
        client
    }

    pub fn add_application(&self, name: &str, description: &str) -> Application {
        let mut state = self.lock();
        let app = new_application(state.next_id(), name, description);
        state.applications.push(app.clone());
        app
    }

    pub fn add_message(&self, appid: u64, title: &str, body: &str, priority: u32) -> Message {
        let mut state = self.lock();
        let message = Message {
            id: state.next_id(),
            appid,
            message: body.into(),
            title: title.into(),
            priority,
            date: "2026-01-01T00:00:00Z".into(),
            extras: None,
        };
        state.messages.push(message.clone());
        message
    }

    /// Make every subsequent request fail at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.lock().applications.clone()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.lock().clients.iter().map(|c| c.client.clone()).collect()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.iter().map(|u| u.user.clone()).collect()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.lock();
        let Some(caller) = authenticate(&state, &request.credentials) else {
            return error(401, "you need to provide a valid access token or user credentials to access this api");
        };

        let route = request.route().to_string();
        let segments: Vec<&str> = route.trim_matches('/').split('/').collect();
        let id = segments.get(1).and_then(|s| s.parse::<u64>().ok());

        match (request.method, segments.as_slice()) {
            (Method::Get, ["version"]) => ok(&VersionInfo {
                version: "2.6.1".into(),
                commit: "abcdef".into(),
                build_date: "2026-01-01".into(),
            }),
            (Method::Get, ["current", "user"]) => {
                match state.users.iter().find(|u| u.user.id == caller) {
                    Some(u) => ok(&u.user),
                    None => error(404, "user does not exist"),
                }
            }

            (Method::Get, ["application"]) => ok(&state.applications),
            (Method::Post, ["application"]) => {
                let (name, description) = (str_field(&request.body, "name"), str_field(&request.body, "description"));
                if name.is_empty() {
                    return error(400, "Field 'name' is required");
                }
                let app = new_application(state.next_id(), &name, &description);
                state.applications.push(app.clone());
                ok(&app)
            }
            (Method::Get, ["application", _]) => match find(&state.applications, id, |a| a.id) {
                Some(app) => ok(app),
                None => error(404, "app does not exist"),
            },
            (Method::Put, ["application", _]) => {
                let name = str_field(&request.body, "name");
                let description = str_field(&request.body, "description");
                match state.applications.iter_mut().find(|a| Some(a.id) == id) {
                    Some(app) => {
                        app.name = name;
                        app.description = description;
                        ok(app)
                    }
                    None => error(404, "app does not exist"),
                }
            }
            (Method::Delete, ["application", _]) => {
                let before = state.applications.len();
                state.applications.retain(|a| Some(a.id) != id);
                if state.applications.len() == before {
                    return error(404, "app does not exist");
                }
                state.messages.retain(|m| Some(m.appid) != id);
                empty()
            }
            (Method::Post, ["application", _, "image"]) => {
                let Body::Multipart(file) = &request.body else {
                    return error(400, "file is required");
                };
                if file.mime.is_none() {
                    return error(400, "file must be an image");
                }
                match state.applications.iter_mut().find(|a| Some(a.id) == id) {
                    Some(app) => {
                        app.image = format!("image/{}", file.file_name);
                        ok(app)
                    }
                    None => error(404, "app does not exist"),
                }
            }
            (Method::Delete, ["application", _, "image"]) => {
                match state.applications.iter_mut().find(|a| Some(a.id) == id) {
                    Some(app) => {
                        app.image = DEFAULT_APP_IMAGE.into();
                        empty()
                    }
                    None => error(404, "app does not exist"),
                }
            }

            (Method::Get, ["client"]) => {
                let clients: Vec<&Client> = state.clients.iter().map(|c| &c.client).collect();
                ok(&clients)
            }
            (Method::Post, ["client"]) => {
                let name = str_field(&request.body, "name");
                if name.is_empty() {
                    return error(400, "Field 'name' is required");
                }
                let id = state.next_id();
                let client = Client {
                    id,
                    token: format!("C{id:014}"),
                    name,
                    last_used: None,
                };
                state.clients.push(StoredClient {
                    client: client.clone(),
                    owner: caller,
                });
                ok(&client)
            }
            (Method::Get, ["client", _]) => {
                match state.clients.iter().find(|c| Some(c.client.id) == id) {
                    Some(c) => ok(&c.client),
                    None => error(404, "client does not exist"),
                }
            }
            (Method::Put, ["client", _]) => {
                let name = str_field(&request.body, "name");
                match state.clients.iter_mut().find(|c| Some(c.client.id) == id) {
                    Some(c) => {
                        c.client.name = name;
                        ok(&c.client)
                    }
                    None => error(404, "client does not exist"),
                }
            }
            (Method::Delete, ["client", _]) => {
                let before = state.clients.len();
                state.clients.retain(|c| Some(c.client.id) != id);
                if state.clients.len() == before {
                    error(404, "client does not exist")
                } else {
                    empty()
                }
            }

            (Method::Get, ["user"]) => {
                let users: Vec<&User> = state.users.iter().map(|u| &u.user).collect();
                ok(&users)
            }
            (Method::Post, ["user"]) => {
                let name = str_field(&request.body, "name");
                let pass = str_field(&request.body, "pass");
                if name.is_empty() || pass.is_empty() {
                    return error(400, "Field 'name' and 'pass' are required");
                }
                if state.users.iter().any(|u| u.user.name == name) {
                    return error(400, "username already exists");
                }
                let user = User {
                    id: state.next_id(),
                    name,
                    admin: bool_field(&request.body, "admin"),
                };
                state.users.push(StoredUser {
                    user: user.clone(),
                    pass,
                });
                ok(&user)
            }
            (Method::Get, ["user", _]) => match state.users.iter().find(|u| Some(u.user.id) == id) {
                Some(u) => ok(&u.user),
                None => error(404, "user does not exist"),
            },
            (Method::Post, ["user", _]) => {
                let name = str_field(&request.body, "name");
                let pass = str_field(&request.body, "pass");
                let admin = bool_field(&request.body, "admin");
                match state.users.iter_mut().find(|u| Some(u.user.id) == id) {
                    Some(u) => {
                        u.user.name = name;
                        u.user.admin = admin;
                        if !pass.is_empty() {
                            u.pass = pass;
                        }
                        ok(&u.user)
                    }
                    None => error(404, "user does not exist"),
                }
            }
            (Method::Delete, ["user", _]) => {
                let before = state.users.len();
                state.users.retain(|u| Some(u.user.id) != id);
                if state.users.len() == before {
                    error(404, "user does not exist")
                } else {
                    empty()
                }
            }

            (Method::Get, ["message"]) => {
                let limit = request
                    .query_param("limit")
                    .and_then(|l| l.parse::<usize>().ok())
                    .unwrap_or(100);
                let messages: Vec<Message> =
                    state.messages.iter().rev().take(limit).cloned().collect();
                ok(&PagedMessages {
                    paging: Paging {
                        size: u32::try_from(messages.len()).unwrap_or(u32::MAX),
                        since: 0,
                        limit: u32::try_from(limit).unwrap_or(u32::MAX),
                        next: None,
                    },
                    messages,
                })
            }
            (Method::Delete, ["message"]) => {
                state.messages.clear();
                empty()
            }
            (Method::Delete, ["message", _]) => {
                let before = state.messages.len();
                state.messages.retain(|m| Some(m.id) != id);
                if state.messages.len() == before {
                    error(404, "message does not exist")
                } else {
                    empty()
                }
            }

            _ => error(404, "page not found"),
        }
    }
}

impl Transport for FakeGotify {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        {
            let mut state = self.lock();
            state.requests.push(request.clone());
            if state.offline {
                return Err(TransportError("connection refused".into()));
            }
        }
        Ok(self.handle(&request))
    }
}

/// Replays queued responses and records what was sent.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(HttpResponse {
                status,
                reason: reason(status).into(),
                body: body.as_bytes().to_vec(),
            }));
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError(message)),
            None => Err(TransportError("no response queued".into())),
        }
    }
}

fn authenticate(state: &State, credentials: &Credentials) -> Option<u64> {
    match credentials {
        Credentials::Token(token) => state
            .clients
            .iter()
            .find(|c| &c.client.token == token)
            .map(|c| c.owner),
        Credentials::Basic { username, password } => state
            .users
            .iter()
            .find(|u| &u.user.name == username && &u.pass == password)
            .map(|u| u.user.id),
    }
}

fn new_application(id: u64, name: &str, description: &str) -> Application {
    Application {
        id,
        token: format!("A{id:014}"),
        name: name.into(),
        description: description.into(),
        internal: false,
        image: DEFAULT_APP_IMAGE.into(),
        default_priority: 0,
        last_used: None,
    }
}

fn find<T>(items: &[T], id: Option<u64>, key: impl Fn(&T) -> u64) -> Option<&T> {
    items.iter().find(|item| Some(key(item)) == id)
}

fn json_field<'a>(body: &'a Body, name: &str) -> Option<&'a Value> {
    match body {
        Body::Json(value) => value.get(name),
        _ => None,
    }
}

fn str_field(body: &Body, name: &str) -> String {
    json_field(body, name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_field(body: &Body, name: &str) -> bool {
    json_field(body, name)
        .and_then(Value::as_bool)
        .unwrap_or_default()
}

fn ok(value: &impl Serialize) -> HttpResponse {
    HttpResponse {
        status: 200,
        reason: "OK".into(),
        body: serde_json::to_vec(value).unwrap_or_default(),
    }
}

fn empty() -> HttpResponse {
    HttpResponse {
        status: 200,
        reason: "OK".into(),
        body: Vec::new(),
    }
}

fn error(status: u16, description: &str) -> HttpResponse {
    let body = serde_json::json!({
        "error": reason(status),
        "errorCode": status,
        "errorDescription": description,
    });
    HttpResponse {
        status,
        reason: reason(status).into(),
        body: serde_json::to_vec(&body).unwrap_or_default(),
    }
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
