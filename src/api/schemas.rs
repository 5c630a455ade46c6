//! Wire types for the challenge/discussion API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paginated response envelope. `items` is one page, `total` the full count.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        ListResponse {
            items: Vec::new(),
            total: 0,
            offset: 0,
            limit: 0,
        }
    }
}

pub type ChallengeList = ListResponse<Challenge>;
pub type ConversationList = ListResponse<Conversation>;
pub type PostList = ListResponse<Post>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    pub id: i64,
    /// Slug used in URLs, e.g. `/challenges/{challenge_id}`.
    pub challenge_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Conversation status. Statuses this client does not know are kept verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ConversationStatus {
    Open,
    InProgress,
    WaitingForUser,
    Resolved,
    Closed,
    Other(String),
}

impl ConversationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConversationStatus::Open => "OPEN",
            ConversationStatus::InProgress => "IN_PROGRESS",
            ConversationStatus::WaitingForUser => "WAITING_FOR_USER",
            ConversationStatus::Resolved => "RESOLVED",
            ConversationStatus::Closed => "CLOSED",
            ConversationStatus::Other(s) => s,
        }
    }
}

impl From<String> for ConversationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OPEN" => ConversationStatus::Open,
            "IN_PROGRESS" => ConversationStatus::InProgress,
            "WAITING_FOR_USER" => ConversationStatus::WaitingForUser,
            "RESOLVED" => ConversationStatus::Resolved,
            "CLOSED" => ConversationStatus::Closed,
            _ => ConversationStatus::Other(s),
        }
    }
}

impl From<ConversationStatus> for String {
    fn from(status: ConversationStatus) -> Self {
        match status {
            ConversationStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub topic: String,
    pub category: String,
    pub status: ConversationStatus,
    #[serde(default)]
    pub challenge_id: Option<i64>,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Name of the user who opened the conversation.
    pub user: String,
    /// Chronological. Never reordered locally.
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Support,
    User,
    Other(String),
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "support" => UserRole::Support,
            "user" => UserRole::User,
            _ => UserRole::Other(s),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Support => "support".to_owned(),
            UserRole::User => "user".to_owned(),
            UserRole::Other(s) => s,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InitialPost {
    pub user: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateConversation {
    pub topic: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_post: Option<InitialPost>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatePost {
    pub content: String,
}

/// Server timestamps arrive either with an offset or naive (UTC implied).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`"))),
                None => Ok(None),
            }
        }
    }
}
