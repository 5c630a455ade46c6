//! Parameter bags for list endpoints.
//!
//! Absent fields are left out of the query string entirely.

use crate::api::schemas::{ConversationStatus, Difficulty};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn new(offset: u64, limit: u64) -> Self {
        PageQuery {
            offset: Some(offset),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<ConversationStatus>,
    pub category: Option<String>,
    /// Challenge slug.
    pub challenge_id: Option<String>,
}

/// Anything that can be rendered as `key=value&...`.
pub trait QueryParams {
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Returns `""` when there are no params, `"?a=1&b=2"` otherwise.
    fn to_query_string(&self) -> String {
        let params = self.params();
        if params.is_empty() {
            return String::new();
        }

        let encoded: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

fn push_page(params: &mut Vec<(&'static str, String)>, offset: Option<u64>, limit: Option<u64>) {
    if let Some(offset) = offset {
        params.push(("offset", offset.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
}

// Empty strings are treated like absent filters.
fn push_text(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.push((key, value.to_owned()));
    }
}

impl QueryParams for PageQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_page(&mut params, self.offset, self.limit);
        params
    }
}

impl QueryParams for ChallengeQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_page(&mut params, self.offset, self.limit);
        push_text(&mut params, "difficulty", self.difficulty.map(|d| d.as_str()));
        push_text(&mut params, "category", self.category.as_deref());
        params
    }
}

impl QueryParams for ConversationQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_page(&mut params, self.offset, self.limit);
        push_text(&mut params, "status", self.status.as_ref().map(|s| s.as_str()));
        push_text(&mut params, "category", self.category.as_deref());
        push_text(&mut params, "challenge_id", self.challenge_id.as_deref());
        params
    }
}
