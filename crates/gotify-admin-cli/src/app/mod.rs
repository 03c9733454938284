//! Console state: session guard, pages and dialogs.

pub mod form;
pub mod guard;
pub mod messages;
pub mod page;
pub mod resource;
mod state;

pub use form::{ConfirmState, FieldKind, FieldSpec, FormMode, FormState, Tone};
pub use guard::Guard;
pub use messages::{MessagesPage, PendingDelete};
pub use page::{Outcome, ResourcePage};
pub use resource::{Resource, SaveError, SaveResult};
pub use state::{Action, Console, Mode, Route};
