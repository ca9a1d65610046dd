use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Catalog entry as the engine consumes it. The engine never mutates
/// products; the catalog source owns their lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub previous_price: Option<f64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Lower-cased concatenation of every searchable attribute. Past search
    /// terms are matched against this corpus as substrings, so a term
    /// matching both name and description still counts once.
    pub fn search_corpus(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.tags.join(" "),
            self.categories.join(" ")
        )
        .to_lowercase()
    }

    /// Lower-cased name + description, the narrower corpus used by the
    /// session and trending paths.
    pub fn display_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }

    /// Whether the product was created within the freshness window. An
    /// absent `created_at` is treated as not new.
    pub fn is_new(&self, now: DateTime<Utc>, window_days: i64) -> bool {
        self.created_at
            .map(|created| now - created < chrono::Duration::days(window_days))
            .unwrap_or(false)
    }
}
