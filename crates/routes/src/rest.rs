//! REST-backed routes: home (users + posts), user detail, post detail, and
//! comment detail. Each refresh describes its resources as one FetchPlan;
//! the gate is consulted before any network call and the plan renders only
//! on joint success.

use std::sync::Arc;

use mode_control::{gate, ModeStore};
use rest_client::{FetchPlan, PlanData, ResourceSpec, RestClient, TransportError};
use shared::{
    domain::SourceFamily,
    rest::{Comment, Post, User},
};
use tracing::debug;

use crate::{
    state::{FetchState, RouteState},
    view::RouteView,
};

/// Presentation policy, not a correctness rule.
pub const POST_DISPLAY_LIMIT: usize = 20;

/// Placeholder rendered when a cross-resource join finds no match.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

pub struct RestContext {
    pub store: ModeStore,
    pub client: RestClient,
}

impl RestContext {
    pub fn new(store: ModeStore, client: RestClient) -> Arc<Self> {
        Arc::new(Self { store, client })
    }
}

/// Gate sequencing shared by every REST route: zero network calls when the
/// gate disables REST; otherwise a fresh plan generation starts.
fn begin_if_enabled<T: Clone>(ctx: &RestContext, state: &RouteState<T>) -> Option<u64> {
    if !gate::allows(ctx.store.mode(), SourceFamily::Rest) {
        debug!("REST disabled by source gate; route stays inert");
        state.reset();
        return None;
    }
    Some(state.begin())
}

fn project<T: Clone>(ctx: &RestContext, state: &RouteState<T>) -> RouteView<T> {
    let active = gate::active_source(ctx.store.mode());
    if !active.allows(SourceFamily::Rest) {
        return RouteView::SourceDisabled {
            required: SourceFamily::Rest,
            active,
        };
    }
    RouteView::from_fetch(state.current())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub post: Post,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestHomeView {
    pub users: Vec<User>,
    pub posts: Vec<PostCard>,
}

impl RestHomeView {
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

pub struct RestHomeRoute {
    ctx: Arc<RestContext>,
    state: RouteState<RestHomeView>,
}

impl RestHomeRoute {
    pub fn new(ctx: Arc<RestContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<RestHomeView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<RestHomeView>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let plan = FetchPlan::new(vec![
            ResourceSpec::new("posts", self.ctx.client.posts_url()),
            ResourceSpec::new("users", self.ctx.client.users_url()),
        ]);
        let state = match self.ctx.client.execute(&plan).await {
            Ok(data) => compose_home(&data),
            Err(err) => FetchState::Error(err.to_string()),
        };
        self.state.resolve(generation, state);
    }
}

fn compose_home(data: &PlanData) -> FetchState<RestHomeView> {
    match home_view(data) {
        Ok(view) => FetchState::Success(view),
        Err(err) => FetchState::Error(err.to_string()),
    }
}

fn home_view(data: &PlanData) -> Result<RestHomeView, TransportError> {
    let posts: Vec<Post> = data.decode("posts")?;
    let users: Vec<User> = data.decode("users")?;

    let posts = posts
        .into_iter()
        .take(POST_DISPLAY_LIMIT)
        .map(|post| {
            let author_name = users
                .iter()
                .find(|user| user.id == post.user_id)
                .map(|user| user.name.clone())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
            PostCard { post, author_name }
        })
        .collect();

    Ok(RestHomeView { users, posts })
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDetailView {
    pub user: User,
    pub posts: Vec<Post>,
}

pub struct UserRoute {
    ctx: Arc<RestContext>,
    state: RouteState<UserDetailView>,
}

impl UserRoute {
    pub fn new(ctx: Arc<RestContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<UserDetailView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<UserDetailView>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, user_id: u64) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let plan = FetchPlan::new(vec![
            ResourceSpec::new("user", self.ctx.client.user_url(user_id)),
            ResourceSpec::new("posts", self.ctx.client.user_posts_url(user_id)),
        ]);
        let state = match self.ctx.client.execute(&plan).await {
            Ok(data) => match user_view(&data) {
                Ok(view) => FetchState::Success(view),
                Err(err) => FetchState::Error(err.to_string()),
            },
            Err(err) => FetchState::Error(err.to_string()),
        };
        self.state.resolve(generation, state);
    }
}

fn user_view(data: &PlanData) -> Result<UserDetailView, TransportError> {
    Ok(UserDetailView {
        user: data.decode("user")?,
        posts: data.decode("posts")?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDetailView {
    pub post: Post,
    pub author: User,
    pub comments: Vec<Comment>,
}

pub struct PostRoute {
    ctx: Arc<RestContext>,
    state: RouteState<PostDetailView>,
}

impl PostRoute {
    pub fn new(ctx: Arc<RestContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<PostDetailView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<PostDetailView>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, user_id: u64, post_id: u64) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let plan = FetchPlan::new(vec![
            ResourceSpec::new("post", self.ctx.client.post_url(post_id)),
            ResourceSpec::new("user", self.ctx.client.user_url(user_id)),
            ResourceSpec::new("comments", self.ctx.client.post_comments_url(post_id)),
        ]);
        let state = match self.ctx.client.execute(&plan).await {
            Ok(data) => match post_view(&data) {
                Ok(view) => FetchState::Success(view),
                Err(err) => FetchState::Error(err.to_string()),
            },
            Err(err) => FetchState::Error(err.to_string()),
        };
        self.state.resolve(generation, state);
    }
}

fn post_view(data: &PlanData) -> Result<PostDetailView, TransportError> {
    Ok(PostDetailView {
        post: data.decode("post")?,
        author: data.decode("user")?,
        comments: data.decode("comments")?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDetailView {
    pub comment: Comment,
    pub post: Post,
    pub author: User,
}

pub struct CommentRoute {
    ctx: Arc<RestContext>,
    state: RouteState<CommentDetailView>,
}

impl CommentRoute {
    pub fn new(ctx: Arc<RestContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<CommentDetailView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<CommentDetailView>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, user_id: u64, post_id: u64, comment_id: u64) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let plan = FetchPlan::new(vec![
            ResourceSpec::new("comment", self.ctx.client.comment_url(comment_id)),
            ResourceSpec::new("post", self.ctx.client.post_url(post_id)),
            ResourceSpec::new("user", self.ctx.client.user_url(user_id)),
        ]);
        let state = match self.ctx.client.execute(&plan).await {
            Ok(data) => match comment_view(&data) {
                Ok(view) => FetchState::Success(view),
                Err(err) => FetchState::Error(err.to_string()),
            },
            Err(err) => FetchState::Error(err.to_string()),
        };
        self.state.resolve(generation, state);
    }
}

fn comment_view(data: &PlanData) -> Result<CommentDetailView, TransportError> {
    Ok(CommentDetailView {
        comment: data.decode("comment")?,
        post: data.decode("post")?,
        author: data.decode("user")?,
    })
}
