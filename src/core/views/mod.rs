//! View models: per-screen state machines driven by [`crate::core::traits::PlatformApi`].

pub mod challenge_detail;
pub mod challenge_list;
pub mod conversation_detail;
pub mod conversations_list;
pub mod pagination;
pub mod state;

pub use challenge_detail::{ChallengeDetailData, ChallengeDetailView};
pub use challenge_list::{ChallengeFilters, ChallengeListData, ChallengeListView};
pub use conversation_detail::{ConversationDetailData, ConversationDetailView};
pub use conversations_list::ConversationsListView;
pub use state::{StateCell, ViewState};
