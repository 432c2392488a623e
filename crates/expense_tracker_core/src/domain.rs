//! crates/expense_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client.
//! These structs are independent of any transport or storage detail, but
//! their serde shapes are deliberately lenient: the remote API is not under
//! our control and has been observed sending ids and amounts as either JSON
//! strings or numbers, and omitting fields outright.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// The authenticated user's profile as the auth endpoints return it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier. Some deployments send it under `userId`.
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "opt_string_or_number"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// The owner id written into expense payloads. `"0"` when the server
    /// never told us who we are.
    pub fn owner_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| "0".to_string())
    }
}

/// The authenticated session: token plus profile. Exists in memory exactly
/// when durable storage holds both halves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The fixed expense categories offered by every form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Shopping,
    Healthcare,
    /// Also the bucket for any category string we do not recognize.
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Utilities,
        Category::Shopping,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Shopping => "Shopping",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }

    /// Exact-name lookup, as the category dropdown submits it.
    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One expense record as fetched from the server.
///
/// The server is the sole source of truth; the client never persists these
/// beyond a page's in-memory list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: Category,
    /// Kept as the wire string: some servers send a bare calendar date,
    /// others a full datetime. Ordering and truncation live in `view`.
    #[serde(default)]
    pub date: String,
    #[serde(
        default,
        rename = "userId",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<String>,
}

/// The write shape for create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpensePayload {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: String,
    /// Sent on create only; update replaces the record in place.
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
