//! Gotify REST API types.
//!
//! Field names follow the server's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Image path the server reports for applications without a custom icon.
pub const DEFAULT_APP_IMAGE: &str = "static/defaultapp.png";

/// Label used when a message references an application that is not loaded.
pub const UNKNOWN_APPLICATION: &str = "Unknown application";

/// A registered notification sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    #[serde(default)]
    pub token: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub default_priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
}

impl Application {
    /// Whether the application carries an uploaded icon.
    pub fn has_custom_image(&self) -> bool {
        !self.image.is_empty() && self.image != DEFAULT_APP_IMAGE
    }
}

/// A registered notification receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: u64,
    #[serde(default)]
    pub token: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
}

/// A server account. The password is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub appid: u64,
    pub message: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: u32,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

/// Paging metadata of `GET /message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub since: u64,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Envelope of `GET /message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagedMessages {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub paging: Paging,
}

/// Server build information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub build_date: String,
}

impl VersionInfo {
    /// Placeholder shown when the server version cannot be read.
    pub fn unavailable() -> Self {
        Self {
            version: "N/A".into(),
            commit: String::new(),
            build_date: String::new(),
        }
    }
}

/// Display band of a message priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityBand {
    Low,
    Medium,
    High,
}

impl PriorityBand {
    pub const fn of(priority: u32) -> Self {
        match priority {
            0..=3 => Self::Low,
            4..=7 => Self::Medium,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A message paired with the application it came from, if that application is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMessage {
    pub message: Message,
    pub application: Option<Application>,
}

impl EnrichedMessage {
    /// Look up each message's application in `applications`.
    pub fn enrich(messages: Vec<Message>, applications: &[Application]) -> Vec<Self> {
        messages
            .into_iter()
            .map(|message| {
                let application = applications
                    .iter()
                    .find(|app| app.id == message.appid)
                    .cloned();
                Self {
                    message,
                    application,
                }
            })
            .collect()
    }

    pub fn application_name(&self) -> &str {
        self.application
            .as_ref()
            .map_or(UNKNOWN_APPLICATION, |app| app.name.as_str())
    }
}

// Request payloads.

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationParams<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientParams<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser<'a> {
    pub name: &'a str,
    pub pass: &'a str,
    pub admin: bool,
}

/// Update payload of `POST /user/{id}`; the password is only sent when changed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUser<'a> {
    pub name: &'a str,
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_application_full() {
        let json = r#"{
            "id": 3,
            "token": "AWH0wZ5r0Mbac.r",
            "name": "Backup server",
            "description": "nightly jobs",
            "internal": false,
            "image": "image/image.jpeg",
            "defaultPriority": 5,
            "lastUsed": "2026-01-01T00:00:00Z"
        }"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.id, 3);
        assert_eq!(app.default_priority, 5);
        assert_eq!(app.last_used.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert!(app.has_custom_image());
    }

    #[test]
    fn deserialize_application_minimal() {
        let app: Application = serde_json::from_str(r#"{"id": 1, "name": "a"}"#).unwrap();
        assert!(app.description.is_empty());
        assert!(app.last_used.is_none());
        assert!(!app.has_custom_image());
    }

    #[test]
    fn default_image_is_not_custom() {
        let app: Application =
            serde_json::from_str(r#"{"id": 1, "name": "a", "image": "static/defaultapp.png"}"#)
                .unwrap();
        assert!(!app.has_custom_image());
    }

    #[test]
    fn user_payload_omits_unchanged_password() {
        let json = serde_json::to_value(UpdateUser {
            name: "bob",
            admin: true,
            pass: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"name": "bob", "admin": true}));
    }

    #[test]
    fn paged_messages_tolerates_missing_paging() {
        let paged: PagedMessages = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        assert!(paged.messages.is_empty());
        assert_eq!(paged.paging, Paging::default());
    }

    #[test]
    fn priority_bands() {
        assert_eq!(PriorityBand::of(0), PriorityBand::Low);
        assert_eq!(PriorityBand::of(3), PriorityBand::Low);
        assert_eq!(PriorityBand::of(4), PriorityBand::Medium);
        assert_eq!(PriorityBand::of(7), PriorityBand::Medium);
        assert_eq!(PriorityBand::of(8), PriorityBand::High);
        assert_eq!(PriorityBand::of(10), PriorityBand::High);
    }

    #[test]
    fn enrich_falls_back_to_unknown_application() {
        let apps = vec![Application {
            id: 1,
            token: String::new(),
            name: "Backups".into(),
            description: String::new(),
            internal: false,
            image: String::new(),
            default_priority: 0,
            last_used: None,
        }];
        let messages = vec![
            Message {
                id: 10,
                appid: 1,
                message: "done".into(),
                title: String::new(),
                priority: 2,
                date: "2026-01-01T00:00:00Z".into(),
                extras: None,
            },
            Message {
                id: 11,
                appid: 99,
                message: "orphan".into(),
                title: String::new(),
                priority: 2,
                date: "2026-01-01T00:00:00Z".into(),
                extras: None,
            },
        ];
        let enriched = EnrichedMessage::enrich(messages, &apps);
        assert_eq!(enriched[0].application_name(), "Backups");
        assert_eq!(enriched[1].application_name(), UNKNOWN_APPLICATION);
    }
}
