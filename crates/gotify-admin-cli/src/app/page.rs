//! Generic list/detail page with create, edit and delete dialogs.

use tracing::{debug, warn};

use gotify_admin_core::{Error, RequestClient, Transport};

use super::form::{ConfirmState, FormState};
use super::resource::{Resource, SaveError};

/// What a page operation means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The server no longer accepts the session.
    SessionExpired,
}

impl Outcome {
    /// Record `err` as the page banner and classify it.
    pub(crate) fn from_error(banner: &mut Option<String>, err: &Error) -> Self {
        warn!(error = %err, "Page operation failed");
        *banner = Some(err.banner());
        if err.is_auth_failure() {
            Self::SessionExpired
        } else {
            Self::Done
        }
    }
}

/// State of the applications, clients or users page.
#[derive(Debug, Clone)]
pub struct ResourcePage<R> {
    pub items: Vec<R>,
    pub selected: Option<u64>,
    pub loading: bool,
    /// Dismissable error banner.
    pub error: Option<String>,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmState<u64>>,
    pub reveal_token: bool,
}

impl<R: Resource> Default for ResourcePage<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourcePage<R> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            form: None,
            confirm: None,
            reveal_token: false,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .and_then(|id| self.items.iter().position(|item| item.id() == id))
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.selected_index().and_then(|i| self.items.get(i))
    }

    /// Whether a modal currently owns the keyboard.
    pub const fn has_modal(&self) -> bool {
        self.form.is_some() || self.confirm.is_some()
    }

    fn select_at(&mut self, index: usize) {
        let id = self.items.get(index).map(Resource::id);
        if id != self.selected {
            self.reveal_token = false;
        }
        self.selected = id;
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let next = self
            .selected_index()
            .map_or(0, |i| (i + 1).min(self.items.len() - 1));
        self.select_at(next);
    }

    pub fn select_prev(&mut self) {
        let prev = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.select_at(prev);
    }

    /// Keep the selection when its item survived, else take the item now
    /// at `fallback` (or the last one), else the first.
    fn reconcile_selection(&mut self, fallback: Option<usize>) {
        if self.selected_index().is_some() {
            return;
        }
        if self.items.is_empty() {
            self.selected = None;
            self.reveal_token = false;
            return;
        }
        let index = fallback.map_or(0, |i| i.min(self.items.len() - 1));
        self.select_at(index);
    }

    /// Fetch the list from the server.
    pub async fn load<T: Transport>(&mut self, api: &RequestClient<T>) -> Outcome {
        let position = self.selected_index();
        self.fetch(api, position).await
    }

    async fn fetch<T: Transport>(
        &mut self,
        api: &RequestClient<T>,
        fallback: Option<usize>,
    ) -> Outcome {
        self.loading = true;
        self.error = None;
        let result = R::list(api).await;
        self.loading = false;
        match result {
            Ok(items) => {
                debug!(resource = R::NOUN, count = items.len(), "Loaded list");
                self.items = items;
                self.reconcile_selection(fallback);
                Outcome::Done
            }
            Err(e) => {
                self.items.clear();
                self.selected = None;
                Outcome::from_error(&mut self.error, &e)
            }
        }
    }

    pub fn open_create(&mut self) {
        self.form = Some(R::create_form());
    }

    pub fn open_edit(&mut self) {
        if let Some(item) = self.selected_item() {
            self.form = Some(item.edit_form());
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Validate and save the open form; on success close it and re-fetch.
    pub async fn submit<T: Transport>(&mut self, api: &RequestClient<T>) -> Outcome {
        let Some(form) = self.form.as_mut() else {
            return Outcome::Done;
        };
        if form.submitting {
            return Outcome::Done;
        }
        if let Err(message) = form.validate_required().and_then(|()| R::validate(form)) {
            form.fail(message);
            return Outcome::Done;
        }

        form.begin_submit();
        match R::save(api, form).await {
            Ok(saved) => {
                self.form = None;
                self.selected = Some(saved.id());
                self.load(api).await
            }
            // The item exists now; resubmitting the create form would duplicate it.
            Err(SaveError {
                error,
                stored: Some(stored),
            }) => {
                self.form = None;
                self.selected = Some(stored.id());
                let outcome = self.load(api).await;
                if outcome == Outcome::SessionExpired {
                    return outcome;
                }
                Outcome::from_error(&mut self.error, &error)
            }
            Err(SaveError { error, .. }) => {
                form.fail(error.banner());
                if error.is_auth_failure() {
                    Outcome::SessionExpired
                } else {
                    Outcome::Done
                }
            }
        }
    }

    /// Ask for confirmation before deleting the selected item.
    pub fn ask_delete(&mut self) {
        if let Some(item) = self.selected_item() {
            self.confirm = Some(ConfirmState::danger(
                format!("Delete {}", R::NOUN),
                format!(
                    "Delete {} \"{}\"? This cannot be undone.",
                    R::NOUN,
                    item.name()
                ),
                item.id(),
            ));
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    /// Run the confirmed deletion and re-fetch.
    pub async fn confirm_delete<T: Transport>(&mut self, api: &RequestClient<T>) -> Outcome {
        let Some(confirm) = self.confirm.as_mut() else {
            return Outcome::Done;
        };
        if confirm.busy {
            return Outcome::Done;
        }
        confirm.busy = true;
        let id = confirm.action;
        let position = self.items.iter().position(|item| item.id() == id);

        let result = R::delete(api, id).await;
        self.confirm = None;
        match result {
            Ok(()) => {
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.fetch(api, position).await
            }
            Err(e) => Outcome::from_error(&mut self.error, &e),
        }
    }

    pub fn toggle_token(&mut self) {
        if self.selected_item().and_then(Resource::token).is_some() {
            self.reveal_token = !self.reveal_token;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
