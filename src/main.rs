//! Command-line front-end for the coding-challenge and discussion platform
//!
//! (c) Softlandia 2025

use challenge_hub::api::{Difficulty, PageQuery};
use challenge_hub::core::traits::PlatformApi;
use challenge_hub::core::views::{
    ChallengeDetailView, ChallengeFilters, ChallengeListView, ConversationDetailView,
    ConversationsListView,
};
use challenge_hub::infrastructure::client::HttpPlatformApi;
use challenge_hub::infrastructure::config::ApiConfig;
use challenge_hub::render::Renderer;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use di::{Injectable, Ref, ServiceCollection, ServiceProvider};
use log::info;
use std::process::ExitCode;
use tokio::runtime::{Builder, Runtime};

#[derive(Parser)]
#[command(name = "challenge-hub")]
#[command(about = "Browse coding challenges and discuss them", long_about = None)]
struct Cli {
    /// Base URL of the platform API (overrides CHALLENGE_HUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List challenges, ten per page
    Challenges {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a challenge and its discussions
    Challenge { id: String },
    /// Post to a challenge's discussion, opening a new one unless --conversation is given
    Discuss {
        id: String,
        content: String,
        #[arg(long)]
        conversation: Option<i64>,
    },
    /// List your conversations
    Conversations {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show a conversation with all posts
    Conversation { id: i64 },
    /// Add a post to a conversation
    Post { conversation: i64, content: String },
    /// Page through the posts of a conversation
    Posts {
        conversation: i64,
        #[arg(long)]
        offset: Option<u64>,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Show the current user
    Whoami,
}

fn main() -> anyhow::Result<ExitCode> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;

    let succeeded = runtime.block_on(run(cli))?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_provider() -> anyhow::Result<ServiceProvider> {
    ServiceCollection::new()
        .add(ApiConfig::singleton())
        .add(HttpPlatformApi::singleton())
        .build_provider()
        .map_err(|e| anyhow!("invalid service configuration: {e:?}"))
}

/// `--api-url` bypasses the environment-backed config registered in the provider.
fn resolve_api(
    provider: &ServiceProvider,
    api_url: Option<String>,
) -> anyhow::Result<(String, Ref<dyn PlatformApi>)> {
    match api_url {
        Some(url) => {
            let config = ApiConfig::create().with_base_url(url);
            let base_url = config.base_url().to_owned();
            let api: Ref<dyn PlatformApi> = Ref::new(HttpPlatformApi::new(config)?);
            Ok((base_url, api))
        }
        None => {
            let config = provider.get_required::<ApiConfig>();
            Ok((
                config.base_url().to_owned(),
                provider.get_required::<dyn PlatformApi>(),
            ))
        }
    }
}

/// Runs one command and prints its view. Returns `false` if the view ended in
/// an error state.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let provider = build_provider()?;
    let (base_url, api) = resolve_api(&provider, cli.api_url)?;
    let renderer = Renderer::new()?;

    info!("using API at {base_url}");

    let (output, succeeded) = match cli.command {
        Commands::Challenges {
            page,
            difficulty,
            category,
        } => {
            let mut view = ChallengeListView::new(api)
                .with_filters(ChallengeFilters {
                    difficulty,
                    category,
                })
                .with_page(page);
            view.load().await;

            let state = view.state();
            let output =
                renderer.challenge_list(&state, view.filters(), view.page(), view.total_pages())?;
            (output, state.error().is_none())
        }
        Commands::Challenge { id } => {
            let mut view = ChallengeDetailView::new(api, id);
            view.load().await;

            let state = view.state();
            (renderer.challenge_detail(&state)?, state.error().is_none())
        }
        Commands::Discuss {
            id,
            content,
            conversation,
        } => {
            let mut view = ChallengeDetailView::new(api, id);
            view.load().await;
            view.set_draft(content);
            view.submit_post(conversation).await;

            let state = view.state();
            (renderer.challenge_detail(&state)?, state.error().is_none())
        }
        Commands::Conversations { search } => {
            let mut view = ConversationsListView::new(api);
            view.load().await;
            view.set_search_term(search);

            let state = view.state();
            let output = renderer.conversations_list(&state, &view.filtered(), view.search_term())?;
            (output, state.error().is_none())
        }
        Commands::Conversation { id } => {
            let mut view = ConversationDetailView::new(api, id);
            view.load().await;

            let state = view.state();
            (renderer.conversation_detail(&state)?, state.error().is_none())
        }
        Commands::Post {
            conversation,
            content,
        } => {
            let mut view = ConversationDetailView::new(api, conversation);
            view.load().await;
            view.set_draft(content);
            view.submit_post().await;

            let state = view.state();
            (renderer.conversation_detail(&state)?, state.error().is_none())
        }
        Commands::Posts {
            conversation,
            offset,
            limit,
        } => match api.get_posts(conversation, PageQuery { offset, limit }).await {
            Ok(posts) => (renderer.post_list(&posts)?, true),
            Err(e) => (renderer.error(&e.to_string())?, false),
        },
        Commands::Whoami => match api.get_user().await {
            Ok(user) => (renderer.user(&user)?, true),
            Err(e) => (renderer.error(&e.to_string())?, false),
        },
    };

    print!("{output}");
    Ok(succeeded)
}
