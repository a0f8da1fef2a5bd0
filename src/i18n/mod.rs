//! UI labels and month names for the built-in languages. Lookups fall back to
//! English, then to the key itself.

use anyhow::Result;
use std::collections::HashMap;

/// Built-in language files: (language, YAML source)
const LANGUAGES: &[(&str, &str)] = &[
    ("pt-BR", include_str!("languages/pt-BR.yml")),
    ("en", include_str!("languages/en.yml")),
];

/// Labels of one language, flattened to dotted keys
#[derive(Debug, Clone, Default)]
struct Catalog {
    labels: HashMap<String, String>,
    months: Vec<String>,
}

impl Catalog {
    fn parse(source: &str) -> Result<Self> {
        let root: serde_yaml::Mapping = serde_yaml::from_str(source)?;
        let mut catalog = Catalog::default();
        for (key, value) in &root {
            let Some(key) = key.as_str() else { continue };
            match value {
                serde_yaml::Value::Sequence(items) if key == "months" => {
                    catalog.months = items.iter().filter_map(scalar).collect();
                }
                _ => catalog.flatten(key, value),
            }
        }
        Ok(catalog)
    }

    fn flatten(&mut self, prefix: &str, value: &serde_yaml::Value) {
        if let serde_yaml::Value::Mapping(map) = value {
            for (key, child) in map {
                if let Some(key) = key.as_str() {
                    self.flatten(&format!("{}.{}", prefix, key), child);
                }
            }
        } else if let Some(text) = scalar(value) {
            self.labels.insert(prefix.to_string(), text);
        }
    }
}

fn scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Labels for the configured language, English underneath
#[derive(Debug, Clone)]
pub struct I18n {
    language: String,
    catalog: Catalog,
    english: Catalog,
}

impl I18n {
    /// Load the labels for `language`
    pub fn new(language: &str) -> Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, source) in LANGUAGES {
            catalogs.insert(*lang, Catalog::parse(source)?);
        }

        let english = catalogs.get("en").cloned().unwrap_or_default();
        let catalog = match catalogs.remove(language) {
            Some(catalog) => catalog,
            None => {
                tracing::warn!("No translations for {:?}, using English labels", language);
                english.clone()
            }
        };

        Ok(Self {
            language: language.to_string(),
            catalog,
            english,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Label for a dotted key such as `post.loading`
    pub fn get(&self, key: &str) -> String {
        self.catalog
            .labels
            .get(key)
            .or_else(|| self.english.labels.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Label with `%d` replaced by a count
    pub fn get_count(&self, key: &str, count: usize) -> String {
        self.get(key).replace("%d", &count.to_string())
    }

    /// Label with `%s` replaced by a value
    pub fn get_with(&self, key: &str, value: &str) -> String {
        self.get(key).replace("%s", value)
    }

    /// Abbreviated month names, January first
    pub fn months(&self) -> Vec<String> {
        if self.catalog.months.len() == 12 {
            self.catalog.months.clone()
        } else {
            self.english.months.clone()
        }
    }
}
