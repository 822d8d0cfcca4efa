use std::{collections::HashMap, fs};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rest_base_url: String,
    pub graph_endpoint: String,
    pub announce_ready: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_base_url: "https://jsonplaceholder.typicode.com".into(),
            graph_endpoint: "https://countries.trevorblades.com/".into(),
            announce_ready: true,
        }
    }
}

/// Defaults, overridden by an optional `explorer.toml`, overridden by
/// environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("explorer.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply(&mut settings, |key| file_cfg.get(key).cloned());
        }
    }

    apply(&mut settings, |key| {
        std::env::var(format!("EXPLORER__{}", key.to_uppercase())).ok()
    });

    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("rest_base_url") {
        settings.rest_base_url = v;
    }
    if let Some(v) = lookup("graph_endpoint") {
        settings.graph_endpoint = v;
    }
    if let Some(v) = lookup("announce_ready") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.announce_ready = parsed;
        }
    }
}
