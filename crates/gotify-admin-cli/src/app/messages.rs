//! Dashboard: messages grouped by application.

use tracing::debug;

use gotify_admin_core::models::{Application, EnrichedMessage};
use gotify_admin_core::services::DEFAULT_MESSAGE_LIMIT;
use gotify_admin_core::{RequestClient, Transport};

use super::form::ConfirmState;
use super::page::Outcome;

/// A message deletion waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    One(u64),
    /// Every message, or every message of one application.
    All { application: Option<u64> },
}

/// State of the messages page.
#[derive(Debug, Clone)]
pub struct MessagesPage {
    pub applications: Vec<Application>,
    pub messages: Vec<EnrichedMessage>,
    /// Application filter; `None` shows all messages.
    pub filter: Option<u64>,
    pub selected: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
    pub confirm: Option<ConfirmState<PendingDelete>>,
    pub limit: u32,
}

impl Default for MessagesPage {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}

impl MessagesPage {
    pub const fn new(limit: u32) -> Self {
        Self {
            applications: Vec::new(),
            messages: Vec::new(),
            filter: None,
            selected: None,
            loading: false,
            error: None,
            confirm: None,
            limit,
        }
    }

    /// Sidebar entries: "all" (`None`) followed by every application.
    pub fn sidebar(&self) -> impl Iterator<Item = Option<&Application>> {
        std::iter::once(None).chain(self.applications.iter().map(Some))
    }

    fn sidebar_index(&self) -> usize {
        self.filter
            .and_then(|id| self.applications.iter().position(|a| a.id == id))
            .map_or(0, |i| i + 1)
    }

    /// Name of the application the list is filtered by.
    pub fn filter_name(&self) -> Option<&str> {
        let id = self.filter?;
        self.applications
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.as_str())
    }

    pub fn selected_message(&self) -> Option<&EnrichedMessage> {
        let id = self.selected?;
        self.messages.iter().find(|m| m.message.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.messages.iter().position(|m| m.message.id == id)
    }

    /// The message after the selected one, else the one before it.
    fn neighbour_of_selected(&self) -> Option<u64> {
        let i = self.selected_index()?;
        self.messages
            .get(i + 1)
            .or_else(|| i.checked_sub(1).and_then(|p| self.messages.get(p)))
            .map(|m| m.message.id)
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let next = self
            .selected_index()
            .map_or(0, |i| (i + 1).min(self.messages.len() - 1));
        self.selected = Some(self.messages[next].message.id);
    }

    pub fn select_prev(&mut self) {
        let prev = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.selected = self.messages.get(prev).map(|m| m.message.id);
    }

    /// Fetch applications and the messages matching the current filter.
    pub async fn load<T: Transport>(&mut self, api: &RequestClient<T>) -> Outcome {
        self.loading = true;
        self.error = None;
        let result = self.fetch(api).await;
        self.loading = false;
        match result {
            Ok(()) => Outcome::Done,
            Err(e) => {
                self.messages.clear();
                self.selected = None;
                Outcome::from_error(&mut self.error, &e)
            }
        }
    }

    async fn fetch<T: Transport>(&mut self, api: &RequestClient<T>) -> gotify_admin_core::Result<()> {
        self.applications = api.applications().list().await?;
        if self
            .filter
            .is_some_and(|id| !self.applications.iter().any(|a| a.id == id))
        {
            self.filter = None;
        }

        let messages = match self.filter {
            Some(app_id) => {
                api.messages()
                    .list_by_application(app_id, self.limit)
                    .await?
            }
            None => api.messages().list(self.limit).await?,
        };
        debug!(count = messages.len(), filter = ?self.filter, "Loaded messages");
        self.messages = EnrichedMessage::enrich(messages, &self.applications);
        if self.selected_index().is_none() {
            self.selected = self.messages.first().map(|m| m.message.id);
        }
        Ok(())
    }

    /// Move the application filter by `step` entries in the sidebar and reload.
    pub async fn shift_filter<T: Transport>(&mut self, api: &RequestClient<T>, step: isize) -> Outcome {
        let len = self.applications.len() + 1;
        let current = self.sidebar_index();
        let next = current.saturating_add_signed(step).min(len - 1);
        if next == current {
            return Outcome::Done;
        }
        self.filter = next
            .checked_sub(1)
            .and_then(|i| self.applications.get(i))
            .map(|a| a.id);
        self.selected = None;
        self.load(api).await
    }

    pub fn ask_delete_selected(&mut self) {
        if let Some(entry) = self.selected_message() {
            let title = if entry.message.title.is_empty() {
                "this message".to_string()
            } else {
                format!("\"{}\"", entry.message.title)
            };
            self.confirm = Some(ConfirmState::danger(
                "Delete message",
                format!("Delete {title}? This cannot be undone."),
                PendingDelete::One(entry.message.id),
            ));
        }
    }

    pub fn ask_delete_all(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let message = match self.filter_name() {
            Some(name) => format!("Delete every message of \"{name}\"? This cannot be undone."),
            None => "Delete every message? This cannot be undone.".to_string(),
        };
        self.confirm = Some(ConfirmState::danger(
            "Delete all messages",
            message,
            PendingDelete::All {
                application: self.filter,
            },
        ));
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    pub async fn confirm_delete<T: Transport>(&mut self, api: &RequestClient<T>) -> Outcome {
        let Some(confirm) = self.confirm.as_mut() else {
            return Outcome::Done;
        };
        if confirm.busy {
            return Outcome::Done;
        }
        confirm.busy = true;
        let pending = confirm.action;

        let messages = api.messages();
        let result = match pending {
            PendingDelete::One(id) => messages.delete(id).await,
            PendingDelete::All { application: None } => messages.delete_all().await,
            PendingDelete::All {
                application: Some(app_id),
            } => messages
                .delete_all_by_application(app_id, self.limit)
                .await
                .map(|_| ()),
        };
        self.confirm = None;
        match result {
            Ok(()) => {
                if matches!(pending, PendingDelete::One(id) if self.selected == Some(id)) {
                    self.selected = self.neighbour_of_selected();
                }
                self.load(api).await
            }
            Err(e) => Outcome::from_error(&mut self.error, &e),
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
