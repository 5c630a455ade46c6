//! DI "Interfaces"

use crate::api::{
    Challenge, ChallengeList, ChallengeQuery, Conversation, ConversationList, ConversationQuery,
    CreateConversation, CreatePost, PageQuery, Post, PostList, User,
};
use crate::core::error::Result;
use async_trait::async_trait;

/// Typed access to the challenge/discussion platform.
///
/// Every method issues exactly one request and never retries. Input is not
/// validated locally; the server is the only judge of what is acceptable.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Lists challenges, optionally filtered by difficulty and category.
    async fn get_challenges(&self, query: ChallengeQuery) -> Result<ChallengeList>;

    /// Fetches one challenge by its slug.
    ///
    /// Returns a 404 [`crate::core::error::ApiError::Server`] if it doesn't exist.
    async fn get_challenge(&self, challenge_id: &str) -> Result<Challenge>;

    /// Lists the conversations attached to a challenge, newest first.
    async fn get_challenge_conversations(
        &self,
        challenge_id: &str,
        page: PageQuery,
    ) -> Result<ConversationList>;

    async fn get_conversations(&self, query: ConversationQuery) -> Result<ConversationList>;

    /// Lists conversations opened by the current caller.
    async fn get_user_conversations(&self, page: PageQuery) -> Result<ConversationList>;

    async fn get_conversation(&self, conversation_id: i64) -> Result<Conversation>;

    /// Creates a conversation. If `initial_post` is set the server seeds it.
    async fn create_conversation(&self, conversation: CreateConversation) -> Result<Conversation>;

    async fn get_posts(&self, conversation_id: i64, page: PageQuery) -> Result<PostList>;

    async fn create_post(&self, conversation_id: i64, post: CreatePost) -> Result<Post>;

    /// The identity the server associates with this caller.
    async fn get_user(&self) -> Result<User>;
}
