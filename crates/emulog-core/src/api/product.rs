use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::ProductCatalog;
use crate::report::model::EmbedReport;

/// Descriptive metadata for a recognized product serial.
///
/// Always carries a `status`; `code` and `title` are best-effort and may be
/// absent for logs that never identified themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductInfo {
    pub code: Option<String>,
    pub title: Option<String>,
    pub status: String,
}

impl ProductInfo {
    /// Placeholder record for logs with no recognizable serial.
    pub fn unknown() -> Self {
        Self {
            code: None,
            title: None,
            status: "Unknown".to_string(),
        }
    }

    /// Record for a serial that was found but could not be resolved.
    pub fn unresolved(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            title: None,
            status: "Unknown".to_string(),
        }
    }

    /// One-line textual rendering used as the header of the plain report.
    pub fn render_text(&self) -> String {
        match (&self.title, &self.code) {
            (Some(title), Some(code)) => format!("{title} [{code}] ({})", self.status),
            (Some(title), None) => format!("{title} ({})", self.status),
            (None, Some(code)) => format!("{code} ({})", self.status),
            (None, None) => format!("Unknown product ({})", self.status),
        }
    }

    /// Seeds the structured report with the product identity.
    pub fn to_embed(&self) -> EmbedReport {
        let title = self
            .title
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "Unknown product".to_string());
        EmbedReport::new(title, format!("Status: {}", self.status))
    }
}

/// Catalog entry as stored in a product database file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "Ok".to_string()
}

/// In-memory product catalog backed by a JSON map of serial -> entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(code.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProductCatalog for StaticCatalog {
    fn lookup(&self, code: &str) -> ProductInfo {
        match self.entries.get(code) {
            Some(entry) => ProductInfo {
                code: Some(code.to_string()),
                title: Some(entry.title.clone()),
                status: entry.status.clone(),
            },
            None => ProductInfo::unresolved(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        let mut c = StaticCatalog::new();
        c.insert(
            "BLUS30443",
            CatalogEntry {
                title: "Demon's Souls".to_string(),
                status: "Disc".to_string(),
            },
        );
        c
    }

    #[test]
    fn lookup_resolves_known_code() {
        let info = catalog().lookup("BLUS30443");
        assert_eq!(info.title.as_deref(), Some("Demon's Souls"));
        assert_eq!(info.status, "Disc");
    }

    #[test]
    fn lookup_falls_back_to_unresolved() {
        let info = catalog().lookup("NPEB00123");
        assert_eq!(info.code.as_deref(), Some("NPEB00123"));
        assert!(info.title.is_none());
        assert_eq!(info.status, "Unknown");
    }

    #[test]
    fn catalog_deserializes_from_plain_map() {
        let c: StaticCatalog = serde_json::from_str(
            r#"{"BLUS30443": {"title": "Demon's Souls", "status": "Disc"},
                "BCES00510": {"title": "Heavy Rain"}}"#,
        )
        .unwrap();
        assert_eq!(c.len(), 2);
        // Missing status falls back to the default.
        assert_eq!(c.lookup("BCES00510").status, "Ok");
    }

    #[test]
    fn render_text_covers_partial_identities() {
        assert_eq!(ProductInfo::unknown().render_text(), "Unknown product (Unknown)");
        assert_eq!(
            ProductInfo::unresolved("BLUS30443").render_text(),
            "BLUS30443 (Unknown)"
        );
        let full = catalog().lookup("BLUS30443");
        assert_eq!(full.render_text(), "Demon's Souls [BLUS30443] (Disc)");
    }

    #[test]
    fn to_embed_prefers_title_over_code() {
        let embed = catalog().lookup("BLUS30443").to_embed();
        assert_eq!(embed.title, "Demon's Souls");
        assert_eq!(embed.description, "Status: Disc");

        let embed = ProductInfo::unresolved("BLUS30443").to_embed();
        assert_eq!(embed.title, "BLUS30443");
    }
}
