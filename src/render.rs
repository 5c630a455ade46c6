//! Plain-text rendering of view states

use crate::api::{Conversation, ConversationList, Post, PostList, User};
use crate::core::views::{ChallengeDetailData, ChallengeFilters, ChallengeListData, ConversationDetailData, ViewState};
use chrono::{DateTime, Utc};
use minijinja::{Environment, Value, context};

const CHALLENGE_LIST: &str = r#"Coding Challenges
Signed in as {{ user.username }}
{% if difficulty or category %}
Filters:{% if difficulty %} difficulty={{ difficulty }}{% endif %}{% if category %} category={{ category }}{% endif %}

{% endif %}
{% for c in challenges %}
[{{ c.difficulty }}] {{ c.title }} ({{ c.points }} pts, {{ c.category }})
    id: {{ c.challenge_id }}
{% if c.tags %}
    tags: {{ c.tags|join(", ") }}
{% endif %}
{% else %}
No challenges found. Try adjusting your filters.
{% endfor %}

Page {{ page }} of {{ total_pages }}
"#;

const CHALLENGE_DETAIL: &str = r#"{{ challenge.title }}
[{{ challenge.difficulty }}] {{ challenge.category }} - {{ challenge.points }} pts

{{ challenge.description }}
{% if challenge.learning_objectives %}

Learning objectives:
{% for objective in challenge.learning_objectives %}
  - {{ objective }}
{% endfor %}
{% endif %}
{% if challenge.hints %}

Hints:
{% for hint in challenge.hints %}
  - {{ hint }}
{% endfor %}
{% endif %}

Discussions ({{ conversations|length }})
{% for c in conversations %}
#{{ c.id }} {{ c.topic }} [{{ c.status|lower }}] by {{ c.user }}
{% for p in c.posts %}
    {{ p.user }} ({{ p.timestamp }}): {{ p.content }}
{% endfor %}
{% else %}
No discussions yet. Start one with `challenge-hub discuss {{ challenge.challenge_id }} "<message>"`.
{% endfor %}
{% if submitting %}
Posting...
{% endif %}
"#;

const CONVERSATION_DETAIL: &str = r#"{{ conversation.topic }}
{{ conversation.category }} | {{ conversation.status|lower }} | started by {{ conversation.user }} | updated {{ conversation.updated_at }}

{% for p in conversation.posts %}
{% if p.user == user.username %}*{% else %} {% endif %} {{ p.user }} - {{ p.timestamp }}
    {{ p.content }}
{% else %}
No posts yet.
{% endfor %}
{% if submitting %}
Posting...
{% endif %}
"#;

const CONVERSATIONS_LIST: &str = r#"My Conversations
{% if search %}
Search: "{{ search }}" ({{ conversations|length }} of {{ loaded }})
{% endif %}
{% for c in conversations %}
#{{ c.id }} {{ c.topic }} [{{ c.status|lower }}] {{ c.category }} - {{ c.post_count }} posts, updated {{ c.updated_at }}
{% else %}
{% if search %}
No conversations match your search.
{% else %}
You have no conversations yet.
{% endif %}
{% endfor %}
"#;

const POST_LIST: &str = r#"{% for p in posts %}
{{ p.user }} - {{ p.timestamp }}
    {{ p.content }}
{% else %}
No posts.
{% endfor %}
Showing {{ shown }} of {{ total }} (offset {{ offset }})
"#;

const USER: &str = "{{ username }} <{{ email }}> ({{ role }})\n";

const ERROR: &str = r#"Error: {{ message }}

Back to Challenges: challenge-hub challenges
"#;

pub struct Renderer {
    env: Environment<'static>,
}

fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y %H:%M").to_string()
}

fn post_value(post: &Post) -> Value {
    context! {
        id => post.id,
        user => post.user,
        content => post.content,
        timestamp => format_time(&post.timestamp),
    }
}

fn conversation_value(conversation: &Conversation) -> Value {
    let posts: Vec<Value> = conversation.posts.iter().map(post_value).collect();
    context! {
        id => conversation.id,
        topic => conversation.topic,
        category => conversation.category,
        status => conversation.status.as_str(),
        user => conversation.user,
        post_count => conversation.posts.len(),
        posts => posts,
        updated_at => format_time(&conversation.updated_at),
    }
}

impl Renderer {
    pub fn new() -> Result<Renderer, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template("challenge_list", CHALLENGE_LIST)?;
        env.add_template("challenge_detail", CHALLENGE_DETAIL)?;
        env.add_template("conversation_detail", CONVERSATION_DETAIL)?;
        env.add_template("conversations_list", CONVERSATIONS_LIST)?;
        env.add_template("post_list", POST_LIST)?;
        env.add_template("user", USER)?;
        env.add_template("error", ERROR)?;

        Ok(Renderer { env })
    }

    fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// Shared handling of loading and error states. A failed submission shows
    /// the retained data followed by the error banner.
    fn render_state<T>(
        &self,
        state: &ViewState<T>,
        body: impl FnOnce(&T, bool) -> Result<String, minijinja::Error>,
    ) -> Result<String, minijinja::Error> {
        match state {
            ViewState::Loading => Ok("Loading...\n".to_owned()),
            ViewState::Ready(data) => body(data, false),
            ViewState::Submitting(data) => body(data, true),
            ViewState::Errored { message, retained } => {
                let banner = self.render("error", context! { message => message })?;
                match retained {
                    Some(data) => Ok(format!("{}\n{}", body(data, false)?, banner)),
                    None => Ok(banner),
                }
            }
        }
    }

    pub fn challenge_list(
        &self,
        state: &ViewState<ChallengeListData>,
        filters: &ChallengeFilters,
        page: u64,
        total_pages: u64,
    ) -> Result<String, minijinja::Error> {
        self.render_state(state, |data, _| {
            self.render(
                "challenge_list",
                context! {
                    user => Value::from_serialize(&data.user),
                    challenges => Value::from_serialize(&data.challenges.items),
                    difficulty => filters.difficulty.map(|d| d.as_str()),
                    category => filters.category,
                    page => page,
                    total_pages => total_pages,
                },
            )
        })
    }

    pub fn challenge_detail(&self, state: &ViewState<ChallengeDetailData>) -> Result<String, minijinja::Error> {
        self.render_state(state, |data, submitting| {
            let conversations: Vec<Value> = data.conversations.iter().map(conversation_value).collect();
            self.render(
                "challenge_detail",
                context! {
                    challenge => Value::from_serialize(&data.challenge),
                    conversations => conversations,
                    submitting => submitting,
                },
            )
        })
    }

    pub fn conversation_detail(
        &self,
        state: &ViewState<ConversationDetailData>,
    ) -> Result<String, minijinja::Error> {
        self.render_state(state, |data, submitting| {
            self.render(
                "conversation_detail",
                context! {
                    conversation => conversation_value(&data.conversation),
                    user => Value::from_serialize(&data.user),
                    submitting => submitting,
                },
            )
        })
    }

    /// `shown` is the already-filtered subset of the loaded page.
    pub fn conversations_list(
        &self,
        state: &ViewState<ConversationList>,
        shown: &[Conversation],
        search: &str,
    ) -> Result<String, minijinja::Error> {
        self.render_state(state, |list, _| {
            let conversations: Vec<Value> = shown.iter().map(conversation_value).collect();
            self.render(
                "conversations_list",
                context! {
                    conversations => conversations,
                    loaded => list.items.len(),
                    search => search,
                },
            )
        })
    }

    pub fn post_list(&self, posts: &PostList) -> Result<String, minijinja::Error> {
        let items: Vec<Value> = posts.items.iter().map(post_value).collect();
        self.render(
            "post_list",
            context! {
                posts => items,
                shown => posts.items.len(),
                total => posts.total,
                offset => posts.offset,
            },
        )
    }

    pub fn user(&self, user: &User) -> Result<String, minijinja::Error> {
        self.render("user", Value::from_serialize(user))
    }

    pub fn error(&self, message: &str) -> Result<String, minijinja::Error> {
        self.render("error", context! { message => message })
    }
}
