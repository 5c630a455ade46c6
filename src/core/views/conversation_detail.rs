//! A single conversation and its post feed

use crate::api::{Conversation, CreatePost, Post, User};
use crate::core::traits::PlatformApi;
use crate::core::views::state::{StateCell, ViewState};
use chrono::{DateTime, Utc};
use di::Ref;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationDetailData {
    pub user: User,
    pub conversation: Conversation,
}

/// Appends `post` after all existing posts and stamps `updated_at`.
///
/// `now` is the client's clock, not the server's.
pub fn append_post(conversation: &mut Conversation, post: Post, now: DateTime<Utc>) {
    conversation.posts.push(post);
    conversation.updated_at = now;
}

pub struct ConversationDetailView {
    api: Ref<dyn PlatformApi>,
    conversation_id: i64,
    state: StateCell<ConversationDetailData>,
    draft: String,
}

impl ConversationDetailView {
    pub fn new(api: Ref<dyn PlatformApi>, conversation_id: i64) -> ConversationDetailView {
        ConversationDetailView {
            api,
            conversation_id,
            state: StateCell::new(),
            draft: String::new(),
        }
    }

    pub fn conversation_id(&self) -> i64 {
        self.conversation_id
    }

    pub fn state(&self) -> ViewState<ConversationDetailData> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ConversationDetailData>> {
        self.state.subscribe()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, content: impl Into<String>) {
        self.draft = content.into();
    }

    pub async fn load(&mut self) {
        self.state.begin_loading();

        let (conversation, user) = tokio::join!(
            self.api.get_conversation(self.conversation_id),
            self.api.get_user()
        );

        self.state.finish_loading(
            conversation.and_then(|conversation| user.map(|user| ConversationDetailData { user, conversation })),
        );
    }

    pub async fn set_conversation_id(&mut self, conversation_id: i64) {
        self.conversation_id = conversation_id;
        self.load().await;
    }

    /// Sends the draft and appends the created post locally without a refetch.
    pub async fn submit_post(&mut self) -> Option<Post> {
        if self.draft.trim().is_empty() {
            return None;
        }
        let mut data = self.state.begin_submitting()?;

        let request = CreatePost {
            content: self.draft.clone(),
        };
        match self.api.create_post(self.conversation_id, request).await {
            Ok(post) => {
                append_post(&mut data.conversation, post.clone(), Utc::now());
                self.state.set(ViewState::Ready(data));
                self.draft.clear();
                Some(post)
            }
            Err(e) => {
                self.state.fail_submitting(data, &e);
                None
            }
        }
    }
}
