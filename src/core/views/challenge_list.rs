//! Paginated, filterable challenge list

use crate::api::{ChallengeList, ChallengeQuery, Difficulty, User};
use crate::core::views::pagination::{DEFAULT_PAGE_SIZE, offset_for_page, total_pages};
use crate::core::views::state::{StateCell, ViewState};
use crate::core::traits::PlatformApi;
use di::Ref;
use log::debug;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeFilters {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeListData {
    pub user: User,
    pub challenges: ChallengeList,
}

pub struct ChallengeListView {
    api: Ref<dyn PlatformApi>,
    state: StateCell<ChallengeListData>,
    page: u64,
    limit: u64,
    filters: ChallengeFilters,
}

impl ChallengeListView {
    pub fn new(api: Ref<dyn PlatformApi>) -> ChallengeListView {
        ChallengeListView {
            api,
            state: StateCell::new(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            filters: ChallengeFilters::default(),
        }
    }

    /// Sets the starting page without fetching.
    pub fn with_page(mut self, page: u64) -> ChallengeListView {
        self.page = page.max(1);
        self
    }

    /// Sets the starting filters without fetching.
    pub fn with_filters(mut self, filters: ChallengeFilters) -> ChallengeListView {
        self.filters = filters;
        self
    }

    pub fn state(&self) -> ViewState<ChallengeListData> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ChallengeListData>> {
        self.state.subscribe()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn filters(&self) -> &ChallengeFilters {
        &self.filters
    }

    /// Zero until the first page has loaded.
    pub fn total_pages(&self) -> u64 {
        self.state
            .with_data(|data| total_pages(data.challenges.total, self.limit))
            .unwrap_or(0)
    }

    pub fn query(&self) -> ChallengeQuery {
        ChallengeQuery {
            offset: Some(offset_for_page(self.page, self.limit)),
            limit: Some(self.limit),
            difficulty: self.filters.difficulty,
            category: self.filters.category.clone(),
        }
    }

    /// Fetches the current page and the caller's identity concurrently.
    pub async fn load(&mut self) {
        self.state.begin_loading();

        let query = self.query();
        debug!("loading challenges page {} ({query:?})", self.page);
        let (challenges, user) = tokio::join!(self.api.get_challenges(query), self.api.get_user());

        self.state.finish_loading(
            challenges.and_then(|challenges| user.map(|user| ChallengeListData { user, challenges })),
        );
    }

    pub async fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
        self.load().await;
    }

    /// Changing any filter goes back to the first page.
    pub async fn set_filters(&mut self, filters: ChallengeFilters) {
        self.filters = filters;
        self.page = 1;
        self.load().await;
    }

    pub async fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        let filters = ChallengeFilters {
            difficulty,
            ..self.filters.clone()
        };
        self.set_filters(filters).await;
    }

    pub async fn set_category(&mut self, category: Option<String>) {
        let filters = ChallengeFilters {
            category: category.filter(|c| !c.is_empty()),
            ..self.filters.clone()
        };
        self.set_filters(filters).await;
    }
}
