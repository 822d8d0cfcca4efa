//! Graph-backed routes: countries list, country detail, language detail,
//! and the per-language topic pages. Queries run stale-then-fresh through
//! the shared graph client; secondary state (other countries sharing a
//! language, topic lists) is derived purely from fetched data.

use std::sync::Arc;

use graph_client::{
    derive::{self, DetailContent, DetailTopic},
    GraphClient, GraphQueryError, QueryStream,
};
use mode_control::{gate, ModeStore};
use shared::{
    domain::SourceFamily,
    graph::{CountryDetail, CountrySummary, Language},
};
use tracing::debug;

use crate::{
    state::{FetchState, RouteState},
    view::{Located, RouteView},
};

/// Presentation policy for the country list, mirroring the REST post cap.
pub const COUNTRY_DISPLAY_LIMIT: usize = 20;

pub struct GraphContext {
    pub store: ModeStore,
    pub client: Arc<GraphClient>,
}

impl GraphContext {
    pub fn new(store: ModeStore, client: Arc<GraphClient>) -> Arc<Self> {
        Arc::new(Self { store, client })
    }
}

fn begin_if_enabled<T: Clone>(ctx: &GraphContext, state: &RouteState<T>) -> Option<u64> {
    if !gate::allows(ctx.store.mode(), SourceFamily::Graph) {
        debug!("graph disabled by source gate; route stays inert");
        state.reset();
        return None;
    }
    Some(state.begin())
}

fn project<T: Clone>(ctx: &GraphContext, state: &RouteState<Located<T>>) -> RouteView<T> {
    let active = gate::active_source(ctx.store.mode());
    if !active.allows(SourceFamily::Graph) {
        return RouteView::SourceDisabled {
            required: SourceFamily::Graph,
            active,
        };
    }
    RouteView::from_located(state.current())
}

/// Drain a stale-then-fresh stream to its terminal value. The cached
/// snapshot (if any) arrives first and the fresh value replaces it; an
/// error anywhere is terminal.
async fn settle<T>(mut rx: QueryStream<T>) -> Result<Option<T>, GraphQueryError> {
    let mut last = None;
    while let Some(item) = rx.recv().await {
        match item {
            Ok(update) => last = Some(update.into_value()),
            Err(err) => return Err(err),
        }
    }
    Ok(last)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountriesView {
    pub shown: Vec<CountrySummary>,
    pub total: usize,
}

pub struct CountriesRoute {
    ctx: Arc<GraphContext>,
    state: RouteState<Located<CountriesView>>,
}

impl CountriesRoute {
    pub fn new(ctx: Arc<GraphContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<CountriesView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<Located<CountriesView>>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let mut rx = self.ctx.client.subscribe_countries();
        while let Some(item) = rx.recv().await {
            let state = match item {
                Ok(update) => {
                    let countries = update.into_value();
                    let total = countries.len();
                    let shown = countries
                        .into_iter()
                        .take(COUNTRY_DISPLAY_LIMIT)
                        .collect();
                    FetchState::Success(Located::Found(CountriesView { shown, total }))
                }
                Err(err) => FetchState::Error(err.to_string()),
            };
            if !self.state.resolve(generation, state) {
                return;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryView {
    pub country: CountryDetail,
}

pub struct CountryRoute {
    ctx: Arc<GraphContext>,
    state: RouteState<Located<CountryView>>,
}

impl CountryRoute {
    pub fn new(ctx: Arc<GraphContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<CountryView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<Located<CountryView>>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, code: &str) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let mut rx = self.ctx.client.subscribe_country(code);
        while let Some(item) = rx.recv().await {
            let state = match item {
                Ok(update) => match update.into_value() {
                    Some(country) => FetchState::Success(Located::Found(CountryView { country })),
                    None => FetchState::Success(Located::Missing(format!(
                        "Country \"{code}\" not found"
                    ))),
                },
                Err(err) => FetchState::Error(err.to_string()),
            };
            if !self.state.resolve(generation, state) {
                return;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageView {
    pub country_code: String,
    pub country_name: String,
    pub language: Language,
    pub topics: Vec<DetailTopic>,
    pub other_countries: Vec<CountrySummary>,
}

pub struct LanguageRoute {
    ctx: Arc<GraphContext>,
    state: RouteState<Located<LanguageView>>,
}

impl LanguageRoute {
    pub fn new(ctx: Arc<GraphContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<LanguageView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<FetchState<Located<LanguageView>>> {
        self.state.subscribe()
    }

    /// Joined pair of queries: the country (for its language list) and the
    /// full country list (to derive which other countries share the
    /// language). The route settles only when both have; either failure
    /// collapses the pair.
    pub async fn refresh(&self, code: &str, lang_code: &str) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let country_rx = self.ctx.client.subscribe_country(code);
        let countries_rx = self.ctx.client.subscribe_countries();
        let (country, countries) = tokio::join!(settle(country_rx), settle(countries_rx));

        let state = match (country, countries) {
            (Ok(Some(Some(country))), Ok(Some(all))) => {
                match derive::find_language(&country, lang_code) {
                    Some(language) => {
                        let other_countries =
                            derive::countries_sharing_language(&all, code, lang_code)
                                .into_iter()
                                .cloned()
                                .collect();
                        FetchState::Success(Located::Found(LanguageView {
                            country_code: country.code.clone(),
                            country_name: country.name.clone(),
                            language: language.clone(),
                            topics: derive::language_topics(language),
                            other_countries,
                        }))
                    }
                    None => FetchState::Success(Located::Missing(format!(
                        "Language \"{lang_code}\" is not spoken in {}",
                        country.name
                    ))),
                }
            }
            (Ok(Some(None)), _) => {
                FetchState::Success(Located::Missing(format!("Country \"{code}\" not found")))
            }
            (Err(err), _) | (_, Err(err)) => FetchState::Error(err.to_string()),
            _ => FetchState::Error("graph queries produced no data".to_string()),
        };
        self.state.resolve(generation, state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageDetailView {
    pub country_name: String,
    pub language: Language,
    pub content: DetailContent,
}

pub struct LanguageDetailRoute {
    ctx: Arc<GraphContext>,
    state: RouteState<Located<LanguageDetailView>>,
}

impl LanguageDetailRoute {
    pub fn new(ctx: Arc<GraphContext>) -> Self {
        Self {
            ctx,
            state: RouteState::new(),
        }
    }

    pub fn view(&self) -> RouteView<LanguageDetailView> {
        project(&self.ctx, &self.state)
    }

    pub fn subscribe(
        &self,
    ) -> tokio::sync::watch::Receiver<FetchState<Located<LanguageDetailView>>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, code: &str, lang_code: &str, detail_id: u64) {
        let Some(generation) = begin_if_enabled(&self.ctx, &self.state) else {
            return;
        };
        let country = settle(self.ctx.client.subscribe_country(code)).await;

        let state = match country {
            Ok(Some(Some(country))) => match derive::find_language(&country, lang_code) {
                Some(language) => match derive::topic_content(language, detail_id) {
                    Some(content) => FetchState::Success(Located::Found(LanguageDetailView {
                        country_name: country.name.clone(),
                        language: language.clone(),
                        content,
                    })),
                    None => FetchState::Success(Located::Missing(format!(
                        "No detail {detail_id} for {}",
                        language.name
                    ))),
                },
                None => FetchState::Success(Located::Missing(format!(
                    "Language \"{lang_code}\" is not spoken in {}",
                    country.name
                ))),
            },
            Ok(Some(None)) => {
                FetchState::Success(Located::Missing(format!("Country \"{code}\" not found")))
            }
            Ok(None) => FetchState::Error("graph query produced no data".to_string()),
            Err(err) => FetchState::Error(err.to_string()),
        };
        self.state.resolve(generation, state);
    }
}
