//! Resource descriptors: what a generic page needs to know about
//! applications, clients and users.

use std::future::Future;
use std::path::Path;

use gotify_admin_core::models::{Application, Client, User};
use gotify_admin_core::services::{image_url, validate_image};
use gotify_admin_core::{Error, FilePart, RequestClient, Result, Transport};

use super::form::{FieldSpec, FormMode, FormState};

/// Placeholder shown instead of a hidden token.
pub const MASKED_TOKEN: &str = "••••••••••••••••";

/// A label/value line of the detail panel.
pub type DetailRow = (&'static str, String);

/// A failed save. `stored` is set when the item already exists on the
/// server and only a follow-up step failed.
#[derive(Debug)]
pub struct SaveError<R> {
    pub error: Error,
    pub stored: Option<R>,
}

impl<R> From<Error> for SaveError<R> {
    fn from(error: Error) -> Self {
        Self {
            error,
            stored: None,
        }
    }
}

/// Result of [`Resource::save`].
pub type SaveResult<R> = std::result::Result<R, SaveError<R>>;

/// Capabilities a list/detail page needs from its resource.
pub trait Resource: Clone {
    /// Page title, e.g. "Applications".
    const TITLE: &'static str;
    /// Singular noun, e.g. "application".
    const NOUN: &'static str;

    fn id(&self) -> u64;
    fn name(&self) -> &str;

    /// Secret token, when the resource has one.
    fn token(&self) -> Option<&str> {
        None
    }

    /// Text of the entry in the list column.
    fn list_label(&self) -> String {
        self.name().to_string()
    }

    fn detail_rows(&self, base_url: &str, reveal_token: bool) -> Vec<DetailRow>;

    /// How to use this item from outside the console, if that applies.
    fn usage(&self, _base_url: &str, _reveal_token: bool) -> Option<String> {
        None
    }

    /// Form schema for `mode`.
    fn form_fields(mode: FormMode) -> Vec<FieldSpec>;

    /// Edit form pre-filled with this item.
    fn edit_form(&self) -> FormState;

    fn create_form() -> FormState {
        FormState::new(
            FormMode::Create,
            format!("New {}", Self::NOUN),
            Self::form_fields(FormMode::Create),
        )
    }

    /// Rules beyond required fields; runs before any request.
    fn validate(_form: &FormState) -> std::result::Result<(), String> {
        Ok(())
    }

    fn list<T: Transport>(api: &RequestClient<T>) -> impl Future<Output = Result<Vec<Self>>>;

    /// Create or update from a validated form.
    fn save<T: Transport>(
        api: &RequestClient<T>,
        form: &FormState,
    ) -> impl Future<Output = SaveResult<Self>>;

    fn delete<T: Transport>(api: &RequestClient<T>, id: u64) -> impl Future<Output = Result<()>>;
}

fn token_row(token: Option<&str>, reveal: bool) -> String {
    match token {
        None => "(unavailable)".into(),
        Some(t) if reveal => t.to_string(),
        Some(_) => MASKED_TOKEN.into(),
    }
}

fn last_used(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| "never".into())
}

/// A ready-to-run `curl` invocation sending a message as `app`.
pub fn usage_snippet(base_url: &str, app: &Application) -> String {
    let token = if app.token.is_empty() {
        "<token>"
    } else {
        app.token.as_str()
    };
    let priority = if app.default_priority == 0 {
        5
    } else {
        app.default_priority
    };
    format!(
        "curl -X POST \"{}/message\" \\\n  -H \"X-Gotify-Key: {token}\" \\\n  -H \"Content-Type: application/json\" \\\n  -d '{{\"message\":\"Hello from cURL\", \"title\":\"Notification\", \"priority\":{priority}}}'",
        base_url.trim_end_matches('/')
    )
}

/// Up to two upper-case initials of `name`, `?` when empty.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "?".into()
    } else {
        letters
    }
}

/// Stable palette slot for `name`, below `palette_len`.
pub fn avatar_slot(name: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let sum: usize = name.chars().map(|c| c as usize).sum();
    sum % palette_len
}

impl Resource for Application {
    const TITLE: &'static str = "Applications";
    const NOUN: &'static str = "application";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn token(&self) -> Option<&str> {
        (!self.token.is_empty()).then_some(self.token.as_str())
    }

    fn list_label(&self) -> String {
        format!("[{}] {}", initials(&self.name), self.name)
    }

    fn detail_rows(&self, base_url: &str, reveal_token: bool) -> Vec<DetailRow> {
        vec![
            ("ID", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Description", self.description.clone()),
            ("Token", token_row(self.token(), reveal_token)),
            (
                "Image",
                image_url(base_url, &self.image).unwrap_or_else(|| "default".into()),
            ),
            ("Priority", self.default_priority.to_string()),
            ("Internal", if self.internal { "yes" } else { "no" }.into()),
            ("Last used", last_used(self.last_used.as_ref())),
        ]
    }

    fn usage(&self, base_url: &str, reveal_token: bool) -> Option<String> {
        if reveal_token {
            return Some(usage_snippet(base_url, self));
        }
        let masked = Self {
            token: String::new(),
            ..self.clone()
        };
        Some(usage_snippet(base_url, &masked))
    }

    fn form_fields(mode: FormMode) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::text("name", "Application name").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::text("image", "Image file"),
        ];
        if !mode.is_create() {
            fields.push(FieldSpec::toggle("remove_image", "Remove current image"));
        }
        fields
    }

    fn edit_form(&self) -> FormState {
        let mode = FormMode::Edit(self.id);
        FormState::new(mode, "Edit application", Self::form_fields(mode))
            .with_value("name", &self.name)
            .with_value("description", &self.description)
    }

    async fn list<T: Transport>(api: &RequestClient<T>) -> Result<Vec<Self>> {
        api.applications().list().await
    }

    async fn save<T: Transport>(api: &RequestClient<T>, form: &FormState) -> SaveResult<Self> {
        let apps = api.applications();
        let (name, description) = (form.text("name"), form.text("description"));
        // An unusable image fails before any request.
        let image = match form.text("image") {
            "" => None,
            path => {
                let file = FilePart::from_path(Path::new(path)).map_err(|e| {
                    Error::validation(format!("Cannot read image {path}: {e}"))
                })?;
                validate_image(&file)?;
                Some(file)
            }
        };

        let app = match form.mode {
            FormMode::Create => apps.create(name, description).await?,
            FormMode::Edit(id) => apps.update(id, name, description).await?,
        };
        let created = form.mode.is_create();
        let stored = |error: Error| SaveError {
            error,
            stored: created.then(|| app.clone()),
        };
        if let Some(file) = image {
            return apps.upload_image(app.id, file).await.map_err(stored);
        }
        if form.flag("remove_image") && app.has_custom_image() {
            apps.delete_image(app.id).await.map_err(stored)?;
            return apps.get(app.id).await.map_err(stored);
        }
        Ok(app)
    }

    async fn delete<T: Transport>(api: &RequestClient<T>, id: u64) -> Result<()> {
        api.applications().delete(id).await
    }
}

impl Resource for Client {
    const TITLE: &'static str = "Clients";
    const NOUN: &'static str = "client";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn token(&self) -> Option<&str> {
        (!self.token.is_empty()).then_some(self.token.as_str())
    }

    fn detail_rows(&self, _base_url: &str, reveal_token: bool) -> Vec<DetailRow> {
        vec![
            ("ID", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Token", token_row(self.token(), reveal_token)),
            ("Last used", last_used(self.last_used.as_ref())),
        ]
    }

    fn form_fields(_mode: FormMode) -> Vec<FieldSpec> {
        vec![FieldSpec::text("name", "Client name").required()]
    }

    fn edit_form(&self) -> FormState {
        let mode = FormMode::Edit(self.id);
        FormState::new(mode, "Edit client", Self::form_fields(mode)).with_value("name", &self.name)
    }

    async fn list<T: Transport>(api: &RequestClient<T>) -> Result<Vec<Self>> {
        api.clients().list().await
    }

    async fn save<T: Transport>(api: &RequestClient<T>, form: &FormState) -> SaveResult<Self> {
        let name = form.text("name");
        let saved = match form.mode {
            FormMode::Create => api.clients().create(name).await?,
            FormMode::Edit(id) => api.clients().update(id, name).await?,
        };
        Ok(saved)
    }

    async fn delete<T: Transport>(api: &RequestClient<T>, id: u64) -> Result<()> {
        api.clients().delete(id).await
    }
}

impl Resource for User {
    const TITLE: &'static str = "Users";
    const NOUN: &'static str = "user";

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn list_label(&self) -> String {
        if self.admin {
            format!("{} (admin)", self.name)
        } else {
            self.name.clone()
        }
    }

    fn detail_rows(&self, _base_url: &str, _reveal_token: bool) -> Vec<DetailRow> {
        vec![
            ("ID", self.id.to_string()),
            ("Name", self.name.clone()),
            ("Role", if self.admin { "admin" } else { "user" }.into()),
        ]
    }

    fn form_fields(mode: FormMode) -> Vec<FieldSpec> {
        let pass = FieldSpec::secret("pass", "Password");
        vec![
            FieldSpec::text("name", "Username").required(),
            if mode.is_create() { pass.required() } else { pass },
            FieldSpec::secret("confirm", "Confirm password"),
            FieldSpec::toggle("admin", "Administrator"),
        ]
    }

    fn edit_form(&self) -> FormState {
        let mode = FormMode::Edit(self.id);
        FormState::new(mode, "Edit user", Self::form_fields(mode))
            .with_value("name", &self.name)
            .with_flag("admin", self.admin)
    }

    /// A given password must match its confirmation.
    fn validate(form: &FormState) -> std::result::Result<(), String> {
        let pass = form.value("pass");
        if !pass.is_empty() && pass != form.value("confirm") {
            return Err("Passwords do not match".into());
        }
        Ok(())
    }

    async fn list<T: Transport>(api: &RequestClient<T>) -> Result<Vec<Self>> {
        api.users().list().await
    }

    async fn save<T: Transport>(api: &RequestClient<T>, form: &FormState) -> SaveResult<Self> {
        let (name, pass, admin) = (form.text("name"), form.value("pass"), form.flag("admin"));
        let saved = match form.mode {
            FormMode::Create => api.users().create(name, pass, admin).await?,
            FormMode::Edit(id) => {
                let pass = (!pass.is_empty()).then_some(pass);
                api.users().update(id, name, pass, admin).await?
            }
        };
        Ok(saved)
    }

    async fn delete<T: Transport>(api: &RequestClient<T>, id: u64) -> Result<()> {
        api.users().delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn app() -> Application {
        Application {
            id: 4,
            token: "AbCdEf".into(),
            name: "backup server".into(),
            description: "nightly".into(),
            internal: false,
            image: "static/defaultapp.png".into(),
            default_priority: 0,
            last_used: None,
        }
    }

    #[test]
    fn initials_take_first_letters_of_two_words() {
        assert_eq!(initials("backup server jobs"), "BS");
        assert_eq!(initials("ci"), "C");
        assert_eq!(initials("  "), "?");
    }

    #[test]
    fn avatar_slot_is_stable_and_in_range() {
        let slot = avatar_slot("ci", 9);
        assert!(slot < 9);
        assert_eq!(slot, avatar_slot("ci", 9));
        assert_eq!(avatar_slot("anything", 0), 0);
    }

    #[test]
    fn token_is_masked_until_revealed() {
        let rows = app().detail_rows("https://push.test", false);
        assert!(rows.contains(&("Token", MASKED_TOKEN.to_string())));
        let rows = app().detail_rows("https://push.test", true);
        assert!(rows.contains(&("Token", "AbCdEf".to_string())));
    }

    #[test]
    fn default_image_is_labelled_default() {
        let rows = app().detail_rows("https://push.test", false);
        assert!(rows.contains(&("Image", "default".to_string())));
    }

    #[test]
    fn snippet_uses_token_and_fallback_priority() {
        let snippet = usage_snippet("https://push.test/", &app());
        assert!(snippet.contains("https://push.test/message"));
        assert!(snippet.contains("X-Gotify-Key: AbCdEf"));
        assert!(snippet.contains("\"priority\":5"));
    }

    #[test]
    fn user_create_requires_password() {
        let form = User::create_form().with_value("name", "bob");
        assert_eq!(form.validate_required().unwrap_err(), "Password is required");
    }

    #[test]
    fn user_edit_password_is_optional_but_must_match() {
        let user = User {
            id: 2,
            name: "bob".into(),
            admin: true,
        };
        let form = user.edit_form();
        assert!(form.flag("admin"));
        assert!(form.validate_required().is_ok());
        assert!(User::validate(&form).is_ok());

        let form = form.with_value("pass", "a").with_value("confirm", "b");
        assert_eq!(User::validate(&form).unwrap_err(), "Passwords do not match");
    }

    #[test]
    fn application_edit_form_offers_image_removal() {
        let form = app().edit_form();
        assert_eq!(form.value("name"), "backup server");
        assert!(form.fields().iter().any(|f| f.key == "remove_image"));
        assert!(
            !Application::create_form()
                .fields()
                .iter()
                .any(|f| f.key == "remove_image")
        );
    }
}
