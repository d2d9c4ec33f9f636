pub mod fftt;
pub mod forms;

use entity::{admin, contact_message, player};
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars::{self, JsonSchema};

/// One normalized entry of a proxied RSS feed. Every field falls back to an
/// empty string when the upstream item does not carry it.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct FeedEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub items: Vec<FeedItem>,
}

impl FeedEnvelope {
    pub fn filled(source: &str, items: Vec<FeedItem>) -> Self {
        Self {
            success: true,
            source: Some(source.to_string()),
            error: None,
            items,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            source: None,
            error: Some(error.to_string()),
            items: Vec::new(),
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Contact endpoint envelope. Reports through a `message` field while the
/// feed proxies use `error`; the field name stays as deployed clients
/// expect it.
#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct ContactOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Default)]
pub struct SyncReport {
    pub success: bool,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub inserted: usize,
    #[serde(default)]
    pub updated: usize,
    pub message: String,
}

impl SyncReport {
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            ..Default::default()
        }
    }
}

impl From<fftt::SyncSummary> for SyncReport {
    fn from(summary: fftt::SyncSummary) -> Self {
        Self {
            success: true,
            total: summary.total,
            inserted: summary.inserted,
            updated: summary.updated,
            message: "Player roster synchronized".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct PlayerRanking {
    pub licence: String,
    pub first_name: String,
    pub last_name: String,
    pub points: i32,
    pub exact_points: f64,
    pub category: Option<String>,
}

impl From<player::Model> for PlayerRanking {
    fn from(p: player::Model) -> Self {
        Self {
            licence: p.licence,
            first_name: p.first_name,
            last_name: p.last_name,
            points: p.points,
            exact_points: p.exact_points,
            category: p.category,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct AdminInfo {
    pub email: String,
    pub name: String,
}

impl From<admin::Model> for AdminInfo {
    fn from(a: admin::Model) -> Self {
        Self {
            email: a.email,
            name: a.name,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct ContactMessageInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

impl From<contact_message::Model> for ContactMessageInfo {
    fn from(m: contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            subject: m.subject,
            message: m.message,
            status: m.status,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_envelope_failure_has_error_and_no_source() {
        let envelope = FeedEnvelope::failed("upstream down");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "upstream down");
        assert!(json.get("source").is_none());
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn feed_item_serializes_pub_date_in_rss_casing() {
        let item = FeedItem {
            pub_date: "Mon, 01 Jan 2024 10:00:00 +0100".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("pubDate").is_some());
        assert!(json.get("pub_date").is_none());
    }
}
