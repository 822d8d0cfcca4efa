use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use graph_client::GraphClient;
use mode_control::{ModeChannel, ModeStore, NullHostLink, SignalOutcome};
use rest_client::RestClient;
use routes::{
    graph::{
        CountriesRoute, CountryRoute, GraphContext, LanguageDetailRoute, LanguageRoute,
    },
    rest::{CommentRoute, PostRoute, RestContext, RestHomeRoute, UserRoute},
    RouteView,
};
use shared::domain::Mode;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Current,
    Preview,
    Draft,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Current => Mode::Current,
            ModeArg::Preview => Mode::Preview,
            ModeArg::Draft => Mode::Draft,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Drill-down explorer over a REST and a graph back end")]
struct Args {
    /// Set the mode directly, as the embedding host would.
    #[arg(long)]
    mode: Option<ModeArg>,
    /// Raw cross-window envelope to feed through the mode channel first.
    #[arg(long)]
    signal: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// REST home: users plus recent posts.
    RestHome,
    /// One user with their posts.
    User { user_id: u64 },
    /// One post with author and comments.
    Post { user_id: u64, post_id: u64 },
    /// One comment with its post and author.
    Comment {
        user_id: u64,
        post_id: u64,
        comment_id: u64,
    },
    /// Graph home: the country list.
    Countries,
    /// One country by code.
    Country { code: String },
    /// One language within a country.
    Language { code: String, lang: String },
    /// One drill-down topic for a language.
    Detail {
        code: String,
        lang: String,
        detail_id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let settings = load_settings();

    let store = ModeStore::new();
    let channel = ModeChannel::new(store.clone(), Arc::new(NullHostLink));
    if settings.announce_ready {
        channel.announce_ready().await?;
    }

    if let Some(raw) = &args.signal {
        match channel.receive(raw) {
            SignalOutcome::Applied(mode) => info!(%mode, "host signal applied"),
            SignalOutcome::Rejected => {
                println!(
                    "Ignored malformed host signal ({} rejected so far)",
                    channel.rejected_count()
                );
            }
        }
    }
    if let Some(mode) = args.mode {
        store.set(mode.into());
    }

    if store.interaction_disabled() {
        println!("[draft mode: interactions disabled]");
    }

    let rest_ctx = RestContext::new(store.clone(), RestClient::new(&settings.rest_base_url));
    let graph_ctx = GraphContext::new(store.clone(), GraphClient::new(&settings.graph_endpoint));

    match args.command {
        Command::RestHome => {
            let route = RestHomeRoute::new(rest_ctx);
            route.refresh().await;
            render(route.view(), |view| {
                println!("Users ({})", view.user_count());
                for user in &view.users {
                    println!("  {} (@{}) <{}>", user.name, user.username, user.email);
                }
                println!("Recent Posts ({})", view.posts.len());
                for card in &view.posts {
                    println!("  #{} {} — by {}", card.post.id, card.post.title, card.author_name);
                }
            });
        }
        Command::User { user_id } => {
            let route = UserRoute::new(rest_ctx);
            route.refresh(user_id).await;
            render(route.view(), |view| {
                let user = &view.user;
                println!("{} (@{})", user.name, user.username);
                println!("  email:   {}", user.email);
                println!("  company: {}", user.company.name);
                println!("  address: {}, {}", user.address.street, user.address.city);
                println!("Posts by {} ({})", user.name, view.posts.len());
                for post in &view.posts {
                    println!("  #{} {}", post.id, post.title);
                }
            });
        }
        Command::Post { user_id, post_id } => {
            let route = PostRoute::new(rest_ctx);
            route.refresh(user_id, post_id).await;
            render(route.view(), |view| {
                println!("{}", view.post.title);
                println!("By {} (@{})", view.author.name, view.author.username);
                println!("{}", view.post.body);
                println!("Comments ({})", view.comments.len());
                for comment in &view.comments {
                    println!("  {} <{}>", comment.name, comment.email);
                }
            });
        }
        Command::Comment {
            user_id,
            post_id,
            comment_id,
        } => {
            let route = CommentRoute::new(rest_ctx);
            route.refresh(user_id, post_id, comment_id).await;
            render(route.view(), |view| {
                println!("Comment: {}", view.comment.name);
                println!("  on post: {}", view.post.title);
                println!("  author:  {}", view.author.name);
                println!("{}", view.comment.body);
            });
        }
        Command::Countries => {
            let route = CountriesRoute::new(graph_ctx);
            route.refresh().await;
            render(route.view(), |view| {
                println!("Countries (showing {} of {})", view.shown.len(), view.total);
                for country in &view.shown {
                    let languages: Vec<&str> =
                        country.languages.iter().map(|l| l.name.as_str()).collect();
                    println!(
                        "  {} {} [{}] — {}",
                        country.emoji,
                        country.name,
                        country.code,
                        languages.join(", ")
                    );
                }
            });
        }
        Command::Country { code } => {
            let route = CountryRoute::new(graph_ctx);
            route.refresh(&code).await;
            render(route.view(), |view| {
                let country = &view.country;
                println!("{} {} [{}]", country.emoji, country.name, country.code);
                if let Some(capital) = &country.capital {
                    println!("  capital:  {capital}");
                }
                if let Some(currency) = &country.currency {
                    println!("  currency: {currency}");
                }
                println!("  phone:    +{}", country.phone);
                println!("  languages:");
                for language in &country.languages {
                    println!("    {} [{}]", language.name, language.code);
                }
                if !country.states.is_empty() {
                    println!("  states: {}", country.states.len());
                }
            });
        }
        Command::Language { code, lang } => {
            let route = LanguageRoute::new(graph_ctx);
            route.refresh(&code, &lang).await;
            render(route.view(), |view| {
                println!("{} in {}", view.language.name, view.country_name);
                println!("Topics:");
                for topic in &view.topics {
                    println!("  {}. {}", topic.id, topic.title);
                }
                if !view.other_countries.is_empty() {
                    println!("Also spoken in:");
                    for country in view.other_countries.iter().take(6) {
                        println!("  {} {}", country.emoji, country.name);
                    }
                    if view.other_countries.len() > 6 {
                        println!("  … and {} more", view.other_countries.len() - 6);
                    }
                }
            });
        }
        Command::Detail {
            code,
            lang,
            detail_id,
        } => {
            let route = LanguageDetailRoute::new(graph_ctx);
            route.refresh(&code, &lang, detail_id).await;
            render(route.view(), |view| {
                println!("{} ({})", view.content.title, view.content.kind.as_str());
                println!("{}", view.content.summary);
            });
        }
    }

    Ok(())
}

fn render<T>(view: RouteView<T>, ready: impl FnOnce(&T)) {
    match view {
        RouteView::SourceDisabled { required, active } => {
            println!("This route needs the {required} source, but the current mode enables {active}.");
        }
        RouteView::Idle => println!("Nothing loaded yet."),
        RouteView::Loading => println!("Loading…"),
        RouteView::Ready(value) => ready(&value),
        RouteView::NotFound(reason) => println!("Not found: {reason}"),
        RouteView::Failed(reason) => println!("Error loading data: {reason} (retry re-runs the whole plan)"),
    }
}
