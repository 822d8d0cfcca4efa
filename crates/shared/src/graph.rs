//! Entity shapes of the graph-backed countries endpoint. The list and
//! by-code queries select different field sets, hence the summary/detail
//! split; both are `PartialEq` so fresh-vs-cached diffing is structural.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
}

/// Shape selected by the list-all query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
    pub emoji: String,
    pub languages: Vec<Language>,
    pub continent: Continent,
}

/// Shape selected by the by-code query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub code: String,
    pub name: String,
    pub emoji: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    pub languages: Vec<Language>,
    pub continent: Continent,
    #[serde(default)]
    pub states: Vec<CountryState>,
}

impl CountryDetail {
    /// Projection down to the list-query field set.
    pub fn to_summary(&self) -> CountrySummary {
        CountrySummary {
            code: self.code.clone(),
            name: self.name.clone(),
            emoji: self.emoji.clone(),
            languages: self.languages.clone(),
            continent: Continent {
                code: self.continent.code.clone(),
                name: self.continent.name.clone(),
            },
        }
    }
}
