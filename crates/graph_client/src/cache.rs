//! Normalized entity cache for the graph source. Records are keyed by
//! country code; every write is a whole-record replacement, never a
//! field-level merge. A read matches only when the cached record carries
//! the fields the query selects.

use std::collections::HashMap;

use shared::graph::{CountryDetail, CountrySummary};

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub summary: CountrySummary,
    pub detail: Option<CountryDetail>,
}

#[derive(Debug, Default)]
pub struct GraphCache {
    records: HashMap<String, CountryRecord>,
    list_order: Vec<String>,
    list_complete: bool,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for the list-all query; only valid once a full list response
    /// has been reconciled.
    pub fn read_countries(&self) -> Option<Vec<CountrySummary>> {
        if !self.list_complete {
            return None;
        }
        Some(
            self.list_order
                .iter()
                .filter_map(|code| self.records.get(code))
                .map(|record| record.summary.clone())
                .collect(),
        )
    }

    /// Snapshot for the by-code query; only matches records that were
    /// written by a detail response.
    pub fn read_country(&self, code: &str) -> Option<CountryDetail> {
        self.records.get(code).and_then(|record| record.detail.clone())
    }

    /// Reconcile a full list response. Each entry replaces its record
    /// wholly, so a previously detailed record is demoted to summary-only
    /// and the next detail read revalidates over the network.
    pub fn write_countries(&mut self, countries: &[CountrySummary]) {
        self.records = countries
            .iter()
            .map(|summary| {
                (
                    summary.code.clone(),
                    CountryRecord {
                        summary: summary.clone(),
                        detail: None,
                    },
                )
            })
            .collect();
        self.list_order = countries.iter().map(|c| c.code.clone()).collect();
        self.list_complete = true;
    }

    /// Reconcile a by-code response as one whole-record replacement.
    pub fn write_country(&mut self, detail: &CountryDetail) {
        self.records.insert(
            detail.code.clone(),
            CountryRecord {
                summary: detail.to_summary(),
                detail: Some(detail.clone()),
            },
        );
    }

    /// Drop a record whose entity the endpoint no longer knows. The code is
    /// also removed from the list order so a later list read skips it.
    pub fn remove_country(&mut self, code: &str) {
        self.records.remove(code);
        self.list_order.retain(|listed| listed != code);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::graph::{Continent, Language};

    fn summary(code: &str, name: &str) -> CountrySummary {
        CountrySummary {
            code: code.into(),
            name: name.into(),
            emoji: "🏳".into(),
            languages: vec![Language {
                code: "en".into(),
                name: "English".into(),
            }],
            continent: Continent {
                code: None,
                name: "Europe".into(),
            },
        }
    }

    fn detail(code: &str, name: &str) -> CountryDetail {
        CountryDetail {
            code: code.into(),
            name: name.into(),
            emoji: "🏳".into(),
            phone: "1".into(),
            capital: Some("Capital".into()),
            currency: Some("EUR".into()),
            languages: vec![Language {
                code: "en".into(),
                name: "English".into(),
            }],
            continent: Continent {
                code: Some("EU".into()),
                name: "Europe".into(),
            },
            states: Vec::new(),
        }
    }

    #[test]
    fn list_read_requires_a_complete_list_write() {
        let mut cache = GraphCache::new();
        cache.write_country(&detail("CH", "Switzerland"));
        assert!(cache.read_countries().is_none());

        cache.write_countries(&[summary("CH", "Switzerland"), summary("FR", "France")]);
        let listed = cache.read_countries().expect("list cached");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].code, "CH");
        assert_eq!(listed[1].code, "FR");
    }

    #[test]
    fn detail_read_requires_a_detail_write() {
        let mut cache = GraphCache::new();
        cache.write_countries(&[summary("CH", "Switzerland")]);
        assert!(cache.read_country("CH").is_none());

        cache.write_country(&detail("CH", "Switzerland"));
        assert_eq!(
            cache.read_country("CH").expect("detail cached").capital,
            Some("Capital".into())
        );
    }

    #[test]
    fn list_write_replaces_detailed_records_wholly() {
        let mut cache = GraphCache::new();
        cache.write_country(&detail("CH", "Switzerland"));
        assert!(cache.read_country("CH").is_some());

        cache.write_countries(&[summary("CH", "Switzerland")]);
        // Whole-record replacement: detail fields are gone, not merged.
        assert!(cache.read_country("CH").is_none());
    }

    #[test]
    fn removal_drops_the_record_and_its_list_entry() {
        let mut cache = GraphCache::new();
        cache.write_countries(&[summary("CH", "Switzerland"), summary("FR", "France")]);
        cache.write_country(&detail("CH", "Switzerland"));

        cache.remove_country("CH");
        assert!(cache.read_country("CH").is_none());
        let listed = cache.read_countries().expect("list still complete");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, "FR");
    }

    #[test]
    fn detail_write_replaces_the_previous_record() {
        let mut cache = GraphCache::new();
        cache.write_country(&detail("CH", "Switzerland"));
        let mut renamed = detail("CH", "Schweiz");
        renamed.capital = None;
        cache.write_country(&renamed);

        let record = cache.read_country("CH").expect("cached");
        assert_eq!(record.name, "Schweiz");
        assert_eq!(record.capital, None);
    }
}
