//! Modal dialog state: create/edit forms and delete confirmations.
//!
//! Forms validate synchronously; a submit that fails validation never reaches
//! the network.

/// Whether a form creates a new item or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

impl FormMode {
    pub const fn is_create(self) -> bool {
        matches!(self, Self::Create)
    }

    /// Label of the submit action.
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Edit(_) => "Save",
        }
    }
}

/// How a field is edited and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Masked when rendered.
    Secret,
    /// On/off; stored as `"true"` or empty.
    Toggle,
}

/// One entry of a form schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
        }
    }

    pub const fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label)
        }
    }

    pub const fn toggle(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Toggle,
            ..Self::text(key, label)
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// An open create/edit modal.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub title: String,
    fields: Vec<FieldSpec>,
    values: Vec<String>,
    /// Index of the field receiving input.
    pub focus: usize,
    /// Inline error shown inside the modal.
    pub error: Option<String>,
    pub submitting: bool,
}

const TOGGLE_ON: &str = "true";

impl FormState {
    pub fn new(mode: FormMode, title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        let values = vec![String::new(); fields.len()];
        Self {
            mode,
            title: title.into(),
            fields,
            values,
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    /// Pre-fill a field, e.g. with the current value of an edited item.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn with_flag(self, key: &str, on: bool) -> Self {
        self.with_value(key, if on { TOGGLE_ON } else { "" })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields paired with their raw values, in schema order.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldSpec, &str)> {
        self.fields
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    fn index(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Raw value of `key` (empty for unknown keys).
    pub fn value(&self, key: &str) -> &str {
        self.index(key)
            .and_then(|i| self.values.get(i))
            .map_or("", String::as_str)
    }

    /// Trimmed value of `key`.
    pub fn text(&self, key: &str) -> &str {
        self.value(key).trim()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.value(key) == TOGGLE_ON
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(i) = self.index(key) {
            self.values[i] = value.into();
        }
    }

    pub fn focused(&self) -> Option<&FieldSpec> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self
                .focus
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Type a character into the focused field. Space flips a toggle.
    pub fn insert_char(&mut self, c: char) {
        match self.focused().map(|f| f.kind) {
            Some(FieldKind::Toggle) => {
                if c == ' ' {
                    self.toggle();
                }
            }
            Some(_) => self.values[self.focus].push(c),
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FieldKind::Text | FieldKind::Secret) = self.focused().map(|f| f.kind) {
            self.values[self.focus].pop();
        }
    }

    /// Flip the focused toggle field.
    pub fn toggle(&mut self) {
        let Some(spec) = self.focused().copied() else {
            return;
        };
        if spec.kind == FieldKind::Toggle {
            let on = !self.flag(spec.key);
            self.values[self.focus] = if on { TOGGLE_ON.into() } else { String::new() };
        }
    }

    /// Check that every required field has a non-blank value.
    pub fn validate_required(&self) -> Result<(), String> {
        match self.entries().find(|(spec, value)| spec.required && value.trim().is_empty()) {
            Some((spec, _)) => Err(format!("{} is required", spec.label)),
            None => Ok(()),
        }
    }

    /// Mark a submit as started, clearing the previous error.
    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    /// Keep the modal open with `message` shown inline.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }
}

/// Visual weight of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Danger,
    /// Recoverable, but with side effects on this console.
    Warning,
}

/// A pending "are you sure?" dialog carrying the action it confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState<A> {
    pub title: String,
    pub message: String,
    pub tone: Tone,
    pub busy: bool,
    pub action: A,
}

impl<A> ConfirmState<A> {
    pub fn danger(title: impl Into<String>, message: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: Tone::Danger,
            busy: false,
            action,
        }
    }
}
