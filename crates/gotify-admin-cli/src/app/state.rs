//! Console state: routes, login, and dispatch of user actions to pages.

use tracing::{info, warn};

use gotify_admin_core::models::{Application, Client, User, VersionInfo};
use gotify_admin_core::{ClientIdentity, ReqwestTransport, RequestClient, Transport};

use super::form::{FieldSpec, FormMode, FormState, Tone};
use super::guard::Guard;
use super::messages::MessagesPage;
use super::page::{Outcome, ResourcePage};
use super::resource::Resource;

/// Protected pages reachable from the header tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Messages,
    Applications,
    Clients,
    Users,
}

impl Route {
    pub const ALL: [Self; 4] = [
        Self::Messages,
        Self::Applications,
        Self::Clients,
        Self::Users,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Messages => "Messages",
            Self::Applications => Application::TITLE,
            Self::Clients => Client::TITLE,
            Self::Users => User::TITLE,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Messages => 0,
            Self::Applications => 1,
            Self::Clients => 2,
            Self::Users => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Checking,
    Login,
    Browse,
    Form,
    Confirm,
}

/// A user intent, decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextRoute,
    PrevRoute,
    GoTo(Route),
    Up,
    Down,
    Left,
    Right,
    Refresh,
    New,
    Edit,
    Delete,
    DeleteAll,
    ToggleToken,
    Logout,
    Submit,
    Cancel,
    FocusNext,
    FocusPrev,
    Type(char),
    Backspace,
    DismissError,
}

const SESSION_EXPIRED: &str = "Session expired, please log in again";

fn login_form() -> FormState {
    FormState::new(
        FormMode::Create,
        "Login",
        vec![
            FieldSpec::text("username", "Username").required(),
            FieldSpec::secret("password", "Password").required(),
        ],
    )
}

/// The whole console.
#[derive(Debug)]
pub struct Console<T = ReqwestTransport> {
    api: RequestClient<T>,
    base_url: String,
    pub guard: Guard,
    pub route: Route,
    pub login: FormState,
    pub version: VersionInfo,
    pub identity: Option<ClientIdentity>,
    pub messages: MessagesPage,
    pub applications: ResourcePage<Application>,
    pub clients: ResourcePage<Client>,
    pub users: ResourcePage<User>,
    pub should_quit: bool,
}

impl<T: Transport> Console<T> {
    pub fn new(api: RequestClient<T>, base_url: impl Into<String>, message_limit: u32) -> Self {
        Self {
            api,
            base_url: base_url.into(),
            guard: Guard::default(),
            route: Route::Messages,
            login: login_form(),
            version: VersionInfo::unavailable(),
            identity: None,
            messages: MessagesPage::new(message_limit),
            applications: ResourcePage::new(),
            clients: ResourcePage::new(),
            users: ResourcePage::new(),
            should_quit: false,
        }
    }

    pub const fn api(&self) -> &RequestClient<T> {
        &self.api
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> Mode {
        match self.guard {
            Guard::Checking => Mode::Checking,
            Guard::Unauthenticated { .. } => Mode::Login,
            Guard::Authenticated => {
                let (form, confirm) = match self.route {
                    Route::Messages => (false, self.messages.confirm.is_some()),
                    Route::Applications => {
                        (self.applications.form.is_some(), self.applications.confirm.is_some())
                    }
                    Route::Clients => (self.clients.form.is_some(), self.clients.confirm.is_some()),
                    Route::Users => (self.users.form.is_some(), self.users.confirm.is_some()),
                };
                if confirm {
                    Mode::Confirm
                } else if form {
                    Mode::Form
                } else {
                    Mode::Browse
                }
            }
        }
    }

    /// Error banner of the visible page.
    pub fn banner(&self) -> Option<&str> {
        match self.route {
            Route::Messages => self.messages.error.as_deref(),
            Route::Applications => self.applications.error.as_deref(),
            Route::Clients => self.clients.error.as_deref(),
            Route::Users => self.users.error.as_deref(),
        }
    }

    /// Whether the visible page is fetching.
    pub const fn loading(&self) -> bool {
        match self.route {
            Route::Messages => self.messages.loading,
            Route::Applications => self.applications.loading,
            Route::Clients => self.clients.loading,
            Route::Users => self.users.loading,
        }
    }

    /// Resolve the session guard and, when logged in, load the first page.
    pub async fn start(&mut self) {
        self.guard.check(self.api.session(), self.route);
        if self.guard.is_authenticated() {
            self.enter().await;
        }
    }

    async fn enter(&mut self) {
        self.identity = self.api.session().client();
        self.version = self.api.version().get_or_unavailable().await;
        self.refresh().await;
    }

    pub async fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        if let Err(message) = self.login.validate_required() {
            self.login.fail(message);
            return;
        }
        self.login.begin_submit();
        let username = self.login.text("username").to_string();
        let password = self.login.value("password").to_string();
        match self.api.login(&username, &password).await {
            Ok(_) => {
                self.login = login_form();
                if let Some(route) = self.guard.login_succeeded() {
                    self.route = route;
                }
                self.enter().await;
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.login.set("password", "");
                self.login.fail(e.banner());
            }
        }
    }

    /// Clear the session and return to the login view.
    pub fn logout(&mut self) {
        if let Err(e) = self.api.logout() {
            warn!(error = %e, "Could not clear the stored session");
        }
        self.reset_session_state();
    }

    fn reset_session_state(&mut self) {
        self.guard.revoke(self.route);
        self.identity = None;
        self.login = login_form();
        self.messages = MessagesPage::new(self.messages.limit);
        self.applications = ResourcePage::new();
        self.clients = ResourcePage::new();
        self.users = ResourcePage::new();
    }

    fn settle(&mut self, outcome: Outcome) {
        if outcome == Outcome::SessionExpired {
            info!("Session rejected by server");
            self.logout();
            self.login.error = Some(SESSION_EXPIRED.into());
        }
    }

    pub async fn navigate(&mut self, route: Route) {
        if route != self.route {
            self.route = route;
            self.refresh().await;
        }
    }

    /// Re-fetch the visible page.
    pub async fn refresh(&mut self) {
        let outcome = match self.route {
            Route::Messages => self.messages.load(&self.api).await,
            Route::Applications => self.applications.load(&self.api).await,
            Route::Clients => self.clients.load(&self.api).await,
            Route::Users => self.users.load(&self.api).await,
        };
        self.settle(outcome);
    }

    /// Apply `action` in the current mode.
    pub async fn dispatch(&mut self, action: Action) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }
        match self.mode() {
            Mode::Checking => {}
            Mode::Login => self.login_action(action).await,
            Mode::Browse => self.browse_action(action).await,
            Mode::Form | Mode::Confirm => {
                let api = &self.api;
                let outcome = match self.route {
                    Route::Messages => messages_modal_action(&mut self.messages, api, action).await,
                    Route::Applications => {
                        page_modal_action(&mut self.applications, api, action).await
                    }
                    Route::Clients => page_modal_action(&mut self.clients, api, action).await,
                    Route::Users => page_modal_action(&mut self.users, api, action).await,
                };
                self.settle(outcome);
            }
        }
    }

    async fn login_action(&mut self, action: Action) {
        match action {
            Action::Submit => self.submit_login().await,
            Action::Type(c) => self.login.insert_char(c),
            Action::Backspace => self.login.backspace(),
            Action::FocusNext | Action::Down => self.login.focus_next(),
            Action::FocusPrev | Action::Up => self.login.focus_prev(),
            Action::Cancel => self.should_quit = true,
            _ => {}
        }
    }

    /// Deleting the client this console signs in with ends the session.
    fn ask_delete_client(&mut self) {
        self.clients.ask_delete();
        let own = self.identity.as_ref().map(|c| c.id);
        if let Some(confirm) = self.clients.confirm.as_mut().filter(|c| Some(c.action) == own) {
            confirm.tone = Tone::Warning;
            confirm
                .message
                .push_str(" This console is signed in with it and will log out.");
        }
    }

    async fn browse_action(&mut self, action: Action) {
        match action {
            Action::NextRoute => self.navigate(self.route.next()).await,
            Action::PrevRoute => self.navigate(self.route.prev()).await,
            Action::GoTo(route) => self.navigate(route).await,
            Action::Refresh => self.refresh().await,
            Action::Logout => self.logout(),
            Action::Delete if self.route == Route::Clients => self.ask_delete_client(),
            Action::New if self.route == Route::Messages => {
                self.navigate(Route::Applications).await;
                if self.guard.is_authenticated() {
                    self.applications.open_create();
                }
            }
            _ => {
                let outcome = match self.route {
                    Route::Messages => {
                        messages_browse_action(&mut self.messages, &self.api, action).await
                    }
                    Route::Applications => page_browse_action(&mut self.applications, action),
                    Route::Clients => page_browse_action(&mut self.clients, action),
                    Route::Users => page_browse_action(&mut self.users, action),
                };
                self.settle(outcome);
            }
        }
    }
}

fn page_browse_action<R: Resource>(page: &mut ResourcePage<R>, action: Action) -> Outcome {
    match action {
        Action::Up => page.select_prev(),
        Action::Down => page.select_next(),
        Action::New => page.open_create(),
        Action::Edit => page.open_edit(),
        Action::Delete => page.ask_delete(),
        Action::ToggleToken => page.toggle_token(),
        Action::DismissError | Action::Cancel => page.dismiss_error(),
        _ => {}
    }
    Outcome::Done
}

async fn page_modal_action<R: Resource, T: Transport>(
    page: &mut ResourcePage<R>,
    api: &RequestClient<T>,
    action: Action,
) -> Outcome {
    if page.confirm.is_some() {
        return match action {
            Action::Submit => page.confirm_delete(api).await,
            Action::Cancel => {
                page.cancel_confirm();
                Outcome::Done
            }
            _ => Outcome::Done,
        };
    }
    let Some(form) = page.form.as_mut() else {
        return Outcome::Done;
    };
    match action {
        Action::Submit => return page.submit(api).await,
        Action::Cancel => page.close_form(),
        Action::Type(c) => form.insert_char(c),
        Action::Backspace => form.backspace(),
        Action::FocusNext | Action::Down => form.focus_next(),
        Action::FocusPrev | Action::Up => form.focus_prev(),
        _ => {}
    }
    Outcome::Done
}

async fn messages_browse_action<T: Transport>(
    page: &mut MessagesPage,
    api: &RequestClient<T>,
    action: Action,
) -> Outcome {
    match action {
        Action::Up => page.select_prev(),
        Action::Down => page.select_next(),
        Action::Left => return page.shift_filter(api, -1).await,
        Action::Right => return page.shift_filter(api, 1).await,
        Action::Delete => page.ask_delete_selected(),
        Action::DeleteAll => page.ask_delete_all(),
        Action::DismissError | Action::Cancel => page.dismiss_error(),
        _ => {}
    }
    Outcome::Done
}

async fn messages_modal_action<T: Transport>(
    page: &mut MessagesPage,
    api: &RequestClient<T>,
    action: Action,
) -> Outcome {
    match action {
        Action::Submit => page.confirm_delete(api).await,
        Action::Cancel => {
            page.cancel_confirm();
            Outcome::Done
        }
        _ => Outcome::Done,
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
