use scraper::{Html, Selector};
use std::time::Duration;

pub const NO_RESULTS: &str = "No results found for your query.";
const RESULT_LIMIT: usize = 5;

/// DuckDuckGo HTML search.
pub struct WebSearch {
    client: reqwest::Client,
    base_url: String,
}

impl WebSearch {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url("https://html.duckduckgo.com/html/")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; lucy-agent)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub async fn search(&self, query: &str) -> Result<String, reqwest::Error> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));
        tracing::info!("Web search: {}", query);

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let results = parse_results(&body, RESULT_LIMIT);
        if results.is_empty() {
            Ok(NO_RESULTS.to_string())
        } else {
            Ok(results.join("\n---\n"))
        }
    }
}

/// Text of each `div.result__body`, whitespace collapsed.
pub fn parse_results(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("div.result__body") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .take(limit)
        .collect()
}
