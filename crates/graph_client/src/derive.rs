//! Pure derivations over already-fetched graph entities. Nothing here
//! performs I/O; every function is a plain projection over cached data so
//! each one is independently testable.

use shared::graph::{CountryDetail, CountrySummary, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    Grammar,
    Phrases,
    Writing,
    History,
}

impl TopicKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TopicKind::Grammar => "grammar",
            TopicKind::Phrases => "phrases",
            TopicKind::Writing => "writing",
            TopicKind::History => "history",
        }
    }

    fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(TopicKind::Grammar),
            2 => Some(TopicKind::Phrases),
            3 => Some(TopicKind::Writing),
            4 => Some(TopicKind::History),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTopic {
    pub id: u64,
    pub title: String,
    pub kind: TopicKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailContent {
    pub title: String,
    pub kind: TopicKind,
    pub summary: String,
}

pub fn find_language<'a>(country: &'a CountryDetail, lang_code: &str) -> Option<&'a Language> {
    country.languages.iter().find(|lang| lang.code == lang_code)
}

/// Countries other than `current_code` whose language list contains
/// `lang_code`.
pub fn countries_sharing_language<'a>(
    all: &'a [CountrySummary],
    current_code: &str,
    lang_code: &str,
) -> Vec<&'a CountrySummary> {
    all.iter()
        .filter(|country| {
            country.code != current_code
                && country.languages.iter().any(|lang| lang.code == lang_code)
        })
        .collect()
}

fn topic_title(language: &Language, kind: TopicKind) -> String {
    match kind {
        TopicKind::Grammar => format!("{} Grammar Rules", language.name),
        TopicKind::Phrases => format!("Common {} Phrases", language.name),
        TopicKind::Writing => format!("{} Writing System", language.name),
        TopicKind::History => format!("{} History", language.name),
    }
}

/// The fixed drill-down topics offered for every language. The graph
/// endpoint has no language-detail operation, so these are synthesized
/// locally from the language record.
pub fn language_topics(language: &Language) -> Vec<DetailTopic> {
    [
        TopicKind::Grammar,
        TopicKind::Phrases,
        TopicKind::Writing,
        TopicKind::History,
    ]
    .into_iter()
    .enumerate()
    .map(|(index, kind)| DetailTopic {
        id: index as u64 + 1,
        title: topic_title(language, kind),
        kind,
    })
    .collect()
}

pub fn topic_content(language: &Language, id: u64) -> Option<DetailContent> {
    let kind = TopicKind::from_id(id)?;
    let summary = match kind {
        TopicKind::Grammar => format!(
            "{} follows grammatical structures specific to its linguistic \
             family: word order, tense and aspect, pronoun usage, and \
             agreement rules.",
            language.name
        ),
        TopicKind::Phrases => format!(
            "Essential {} phrases for everyday communication: greetings, \
             courtesy expressions, and common travel questions.",
            language.name
        ),
        TopicKind::Writing => format!(
            "The {} writing system: script type and direction, punctuation \
             conventions, and modern standardization.",
            language.name
        ),
        TopicKind::History => format!(
            "The development of {} across regions and eras, from its \
             origins to its present-day distribution.",
            language.name
        ),
    };
    Some(DetailContent {
        title: topic_title(language, kind),
        kind,
        summary,
    })
}
