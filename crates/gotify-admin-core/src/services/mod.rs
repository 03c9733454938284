//! Resource services.
//!
//! Thin, borrowed views over a [`RequestClient`](crate::request::RequestClient),
//! one per REST resource. Each operation is a single endpoint call (the
//! per-application message helpers excepted); errors propagate unchanged.

mod applications;
mod clients;
mod messages;
mod users;
mod version;

pub use applications::{Applications, image_url, validate_image};
pub use clients::Clients;
pub use messages::{DEFAULT_MESSAGE_LIMIT, Messages};
pub use users::Users;
pub use version::Version;
