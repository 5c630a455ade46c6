//! A challenge together with its discussion threads

use crate::api::{Challenge, Conversation, ConversationQuery, CreateConversation, CreatePost, User};
use crate::core::error::ApiError;
use crate::core::traits::PlatformApi;
use crate::core::views::state::{StateCell, ViewState};
use di::Ref;
use log::{debug, warn};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeDetailData {
    pub user: User,
    pub challenge: Challenge,
    pub conversations: Vec<Conversation>,
}

pub struct ChallengeDetailView {
    api: Ref<dyn PlatformApi>,
    challenge_id: String,
    state: StateCell<ChallengeDetailData>,
    draft: String,
    /// Discussion opened by a submit whose post then failed.
    pending_conversation: Option<i64>,
}

/// Topic used when the first post on a challenge opens a new thread.
pub fn discussion_topic(challenge: &Challenge) -> String {
    format!("Discussion for {}", challenge.title)
}

impl ChallengeDetailView {
    pub fn new(api: Ref<dyn PlatformApi>, challenge_id: impl Into<String>) -> ChallengeDetailView {
        ChallengeDetailView {
            api,
            challenge_id: challenge_id.into(),
            state: StateCell::new(),
            draft: String::new(),
            pending_conversation: None,
        }
    }

    pub fn challenge_id(&self) -> &str {
        &self.challenge_id
    }

    pub fn state(&self) -> ViewState<ChallengeDetailData> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ChallengeDetailData>> {
        self.state.subscribe()
    }

    /// Discussion a blank-target retry will post into instead of opening a
    /// new one.
    pub fn pending_conversation(&self) -> Option<i64> {
        self.pending_conversation
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, content: impl Into<String>) {
        self.draft = content.into();
    }

    pub async fn load(&mut self) {
        self.state.begin_loading();
        let result = self.fetch().await;
        self.state.finish_loading(result);
    }

    /// Navigating to another challenge reloads everything.
    pub async fn set_challenge_id(&mut self, challenge_id: impl Into<String>) {
        self.challenge_id = challenge_id.into();
        self.pending_conversation = None;
        self.load().await;
    }

    async fn fetch(&self) -> Result<ChallengeDetailData, ApiError> {
        let query = ConversationQuery {
            challenge_id: Some(self.challenge_id.clone()),
            ..Default::default()
        };

        let (challenge, conversations, user) = tokio::join!(
            self.api.get_challenge(&self.challenge_id),
            self.api.get_conversations(query),
            self.api.get_user(),
        );

        Ok(ChallengeDetailData {
            challenge: challenge?,
            conversations: conversations?.items,
            user: user?,
        })
    }

    /// Posts the draft into `conversation_id`, or into a freshly created
    /// discussion when `None`, then reloads the whole view.
    ///
    /// If the post fails after a discussion was opened, the next `None`
    /// submit reuses that discussion.
    ///
    /// Returns `false` without doing anything if the draft is blank or there
    /// is no loaded challenge.
    pub async fn submit_post(&mut self, conversation_id: Option<i64>) -> bool {
        if self.draft.trim().is_empty() {
            return false;
        }
        let Some(mut data) = self.state.begin_submitting() else {
            return false;
        };

        let target = match conversation_id.or(self.pending_conversation) {
            Some(id) => id,
            None => match self.open_discussion(&data.challenge).await {
                Ok(conversation) => {
                    let id = conversation.id;
                    data.conversations.push(conversation);
                    id
                }
                Err(e) => {
                    self.state.fail_submitting(data, &e);
                    return false;
                }
            },
        };

        let post = CreatePost {
            content: self.draft.clone(),
        };
        if let Err(e) = self.api.create_post(target, post).await {
            warn!("failed to post to conversation {target}: {e}");
            if conversation_id.is_none() {
                self.pending_conversation = Some(target);
            }
            self.state.fail_submitting(data, &e);
            return false;
        }

        let result = self.fetch().await;
        self.state.finish_loading(result);
        self.pending_conversation = None;
        self.draft.clear();
        true
    }

    async fn open_discussion(&self, challenge: &Challenge) -> Result<Conversation, ApiError> {
        debug!("opening discussion for challenge {}", challenge.challenge_id);
        self.api
            .create_conversation(CreateConversation {
                topic: discussion_topic(challenge),
                category: challenge.category.clone(),
                challenge_id: Some(challenge.id),
                initial_post: None,
            })
            .await
    }
}
