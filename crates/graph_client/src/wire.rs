//! Wire shapes for the graph endpoint: a plain POST body with `query` and
//! `variables`, and the standard response envelope with `data`/`errors`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::graph::{CountryDetail, CountrySummary};

pub const GET_COUNTRIES: &str = "\
query GetCountries {
  countries {
    code
    name
    emoji
    languages { code name }
    continent { name }
  }
}";

pub const GET_COUNTRY: &str = "\
query GetCountry($code: ID!) {
  country(code: $code) {
    code
    name
    emoji
    phone
    capital
    currency
    languages { code name }
    continent { name code }
    states { name code }
  }
}";

#[derive(Debug, Serialize)]
pub struct GraphRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct GraphResponse {
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CountriesData {
    pub countries: Vec<CountrySummary>,
}

#[derive(Debug, Deserialize)]
pub struct CountryData {
    pub country: Option<CountryDetail>,
}
