//! Request and response shapes of the platform API

pub mod query;
pub mod schemas;

pub use query::{ChallengeQuery, ConversationQuery, PageQuery, QueryParams};
pub use schemas::*;
