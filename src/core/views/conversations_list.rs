//! The caller's conversations with a local search box

use crate::api::{Conversation, ConversationList, PageQuery};
use crate::core::traits::PlatformApi;
use crate::core::views::state::{StateCell, ViewState};
use di::Ref;
use tokio::sync::watch;

/// Case-insensitive substring match on topic and category.
///
/// Only looks at what is already loaded; it never queries the server.
pub fn filter_conversations<'a>(conversations: &'a [Conversation], term: &str) -> Vec<&'a Conversation> {
    let term = term.to_lowercase();
    conversations
        .iter()
        .filter(|c| c.topic.to_lowercase().contains(&term) || c.category.to_lowercase().contains(&term))
        .collect()
}

pub struct ConversationsListView {
    api: Ref<dyn PlatformApi>,
    state: StateCell<ConversationList>,
    search_term: String,
}

impl ConversationsListView {
    pub fn new(api: Ref<dyn PlatformApi>) -> ConversationsListView {
        ConversationsListView {
            api,
            state: StateCell::new(),
            search_term: String::new(),
        }
    }

    pub fn state(&self) -> ViewState<ConversationList> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ConversationList>> {
        self.state.subscribe()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub async fn load(&mut self) {
        self.state.begin_loading();
        let result = self.api.get_user_conversations(PageQuery::default()).await;
        self.state.finish_loading(result);
    }

    /// Loaded conversations matching the search term. Empty while loading or
    /// after a failed load.
    pub fn filtered(&self) -> Vec<Conversation> {
        self.state
            .with_data(|list| {
                filter_conversations(&list.items, &self.search_term)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
