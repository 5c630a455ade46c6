//! HTTP implementation of [`PlatformApi`]

use crate::api::{
    Challenge, ChallengeList, ChallengeQuery, Conversation, ConversationList, ConversationQuery,
    CreateConversation, CreatePost, PageQuery, Post, PostList, QueryParams, User,
};
use crate::core::error::Result;
use crate::core::traits::PlatformApi;
use crate::infrastructure::config::ApiConfig;
use crate::infrastructure::response::handle_response;
use async_trait::async_trait;
use di::{Ref, inject, injectable};
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub struct HttpPlatformApi {
    config: ApiConfig,
    client: Client,
}

#[injectable(PlatformApi)]
impl HttpPlatformApi {
    #[inject]
    pub fn create(config: Ref<ApiConfig>) -> HttpPlatformApi {
        let config = (*config).clone();
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                error!("failed to build HTTP client ({e}), using defaults");
                Client::new()
            });

        HttpPlatformApi { config, client }
    }
}

impl HttpPlatformApi {
    pub fn new(config: ApiConfig) -> Result<HttpPlatformApi> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(HttpPlatformApi { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.url(path);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.config.url(path);
        debug!("POST {url}");

        let response = self.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn get_challenges(&self, query: ChallengeQuery) -> Result<ChallengeList> {
        self.get(&format!("/challenges{}", query.to_query_string())).await
    }

    async fn get_challenge(&self, challenge_id: &str) -> Result<Challenge> {
        self.get(&format!("/challenges/{}", urlencoding::encode(challenge_id)))
            .await
    }

    async fn get_challenge_conversations(
        &self,
        challenge_id: &str,
        page: PageQuery,
    ) -> Result<ConversationList> {
        self.get(&format!(
            "/challenges/{}/conversations{}",
            urlencoding::encode(challenge_id),
            page.to_query_string()
        ))
        .await
    }

    async fn get_conversations(&self, query: ConversationQuery) -> Result<ConversationList> {
        self.get(&format!("/conversations{}", query.to_query_string()))
            .await
    }

    async fn get_user_conversations(&self, page: PageQuery) -> Result<ConversationList> {
        self.get(&format!("/conversations/user{}", page.to_query_string()))
            .await
    }

    async fn get_conversation(&self, conversation_id: i64) -> Result<Conversation> {
        self.get(&format!("/conversations/{conversation_id}")).await
    }

    async fn create_conversation(&self, conversation: CreateConversation) -> Result<Conversation> {
        self.post("/conversations", &conversation).await
    }

    async fn get_posts(&self, conversation_id: i64, page: PageQuery) -> Result<PostList> {
        self.get(&format!(
            "/conversations/{conversation_id}/posts{}",
            page.to_query_string()
        ))
        .await
    }

    async fn create_post(&self, conversation_id: i64, post: CreatePost) -> Result<Post> {
        self.post(&format!("/conversations/{conversation_id}/posts"), &post)
            .await
    }

    async fn get_user(&self) -> Result<User> {
        self.get("/user").await
    }
}
