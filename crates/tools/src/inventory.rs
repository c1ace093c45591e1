//! Installed-application inventory and fuzzy name resolution.
//!
//! The list comes from the backend's `get_installed_apps` command and is
//! re-queried once it is older than [`REFRESH_INTERVAL`].

use crate::backend::{Backend, BackendError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Minimum similarity for a name to count as a match.
pub const APP_MATCH_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstalledApp {
    pub name: String,
    pub path: String,
}

pub struct AppInventory {
    backend: Arc<dyn Backend>,
    apps: Vec<InstalledApp>,
    refreshed_at: Option<Instant>,
}

impl AppInventory {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            apps: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn is_stale(&self) -> bool {
        match self.refreshed_at {
            Some(at) => at.elapsed() >= REFRESH_INTERVAL,
            None => true,
        }
    }

    /// Re-query the backend. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<usize, BackendError> {
        let raw = self.backend.invoke("get_installed_apps", json!({})).await?;
        let apps = parse_app_list(raw)?;
        tracing::info!("Loaded {} installed applications", apps.len());
        self.apps = apps;
        self.refreshed_at = Some(Instant::now());
        Ok(self.apps.len())
    }

    async fn ensure_fresh(&mut self) {
        if !self.is_stale() {
            return;
        }
        if let Err(e) = self.refresh().await {
            tracing::warn!("Failed to load installed applications: {}", e);
        }
    }

    pub async fn apps(&mut self) -> &[InstalledApp] {
        self.ensure_fresh().await;
        &self.apps
    }

    /// Best fuzzy match for `query`, refreshing the list first if stale.
    pub async fn find(&mut self, query: &str) -> Option<InstalledApp> {
        self.ensure_fresh().await;
        best_match(&self.apps, query).cloned()
    }
}

// The backend may hand the list over either as an array or as a JSON string.
fn parse_app_list(raw: Value) -> Result<Vec<InstalledApp>, BackendError> {
    let value = match raw {
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| BackendError::Failed(format!("Invalid app list: {}", e)))?,
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| BackendError::Failed(format!("Invalid app list: {}", e)))
}

pub fn best_match<'a>(apps: &'a [InstalledApp], query: &str) -> Option<&'a InstalledApp> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }

    apps.iter()
        .map(|app| (app, similarity(&query, &normalize(&app.name))))
        .filter(|(_, score)| *score >= APP_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(app, _)| app)
}

fn similarity(query: &str, name: &str) -> f64 {
    let whole = strsim::normalized_levenshtein(query, name);
    let tokens = query
        .split_whitespace()
        .flat_map(|q| {
            name.split_whitespace()
                .map(move |n| strsim::normalized_levenshtein(q, n))
        })
        .fold(0.0_f64, f64::max);
    whole.max(tokens)
}

/// Lowercase, transliterate Cyrillic to Latin and fold `ph` into `f`, so
/// "фотошоп" and "Photoshop" meet in the middle.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.trim().to_lowercase().chars() {
        match transliterate(ch) {
            Some(latin) => out.push_str(latin),
            None => out.push(ch),
        }
    }
    out.replace("ph", "f")
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedApps {
        reply: Value,
        calls: AtomicUsize,
    }

    impl FixedApps {
        fn new(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Backend for FixedApps {
        async fn invoke(&self, command: &str, _params: Value) -> Result<Value, BackendError> {
            assert_eq!(command, "get_installed_apps");
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn sample() -> Value {
        json!([
            {"name": "Adobe Photoshop 2024", "path": "C:\\Program Files\\Adobe\\Photoshop.exe"},
            {"name": "Google Chrome", "path": "C:\\Program Files\\Google\\chrome.exe"},
            {"name": "Notepad", "path": "C:\\Windows\\notepad.exe"}
        ])
    }

    #[test]
    fn test_normalize_transliterates() {
        assert_eq!(normalize("Фотошоп"), "fotoshop");
        assert_eq!(normalize("Photoshop"), "fotoshop");
        assert_eq!(normalize("  Хром "), "hrom");
    }

    #[tokio::test]
    async fn test_cyrillic_query_matches_latin_name() {
        let mut inventory = AppInventory::new(FixedApps::new(sample()));
        let app = inventory.find("фотошоп").await.unwrap();
        assert_eq!(app.name, "Adobe Photoshop 2024");
    }

    #[tokio::test]
    async fn test_no_match_below_threshold() {
        let mut inventory = AppInventory::new(FixedApps::new(sample()));
        assert!(inventory.find("blender").await.is_none());
        assert!(inventory.find("").await.is_none());
    }

    #[tokio::test]
    async fn test_string_payload_accepted() {
        let backend = FixedApps::new(Value::String(sample().to_string()));
        let mut inventory = AppInventory::new(backend);
        assert_eq!(inventory.refresh().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_payload_keeps_list_empty() {
        let mut inventory = AppInventory::new(FixedApps::new(json!({"oops": true})));
        assert!(inventory.refresh().await.is_err());
        assert!(inventory.apps().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_after_interval() {
        let backend = FixedApps::new(sample());
        let mut inventory = AppInventory::new(backend.clone());

        inventory.find("notepad").await.unwrap();
        inventory.find("chrome").await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(REFRESH_INTERVAL + Duration::from_secs(1)).await;
        assert!(inventory.is_stale());
        inventory.find("notepad").await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }
}
